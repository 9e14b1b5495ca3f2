//! Interactive terminal front end for the assessment.
//!
//! Keys `1`-`5` pick a rating, Enter on an empty line re-submits the rating already chosen
//! for the question on screen (and does nothing on a fresh question), and `q` abandons the
//! attempt. After the last question the results are printed and, unless
//! skipped, the visitor is offered the lead form.

use crate::demo::render_results;
use crate::infra::{build_service, QuizApiService};
use clap::Args;
use readiness_quiz::config::AppConfig;
use readiness_quiz::error::AppError;
use readiness_quiz::telemetry;
use readiness_quiz::quiz::{
    LeadForm, Question, QuizResults, QuizServiceError, QuizSettings, SessionId, SessionSnapshot,
    SubmissionStatus,
};
use std::io::{self, BufRead, Write};
use tracing::info;

const PROGRESS_WIDTH: usize = 30;

#[derive(Args, Debug, Default)]
pub(crate) struct TakeArgs {
    /// Skip the pause and fade between questions
    #[arg(long)]
    pub(crate) no_delay: bool,
    /// Finish after the results without offering the lead form
    #[arg(long)]
    pub(crate) skip_lead: bool,
}

pub(crate) async fn run_interactive(args: TakeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init_for_terminal(&config.telemetry)?;

    let settings = if args.no_delay {
        QuizSettings {
            score_denominator: config.quiz.score_denominator,
            ..QuizSettings::immediate()
        }
    } else {
        config.quiz
    };

    let service = build_service(settings);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = TerminalSession::new(&service, stdin.lock(), stdout.lock());
    session.offer_lead = !args.skip_lead;

    match session.run().await? {
        TerminalOutcome::Completed { results, lead } => info!(
            session_id = %results.session_id,
            score = %results.score,
            tier = results.result.category,
            lead_submitted = lead.is_some(),
            "terminal assessment finished"
        ),
        TerminalOutcome::Abandoned { at_question } => {
            info!(at_question, "terminal assessment abandoned")
        }
    }
    Ok(())
}

#[derive(Debug)]
pub(crate) enum TerminalOutcome {
    Completed {
        results: Box<QuizResults>,
        lead: Option<SubmissionStatus>,
    },
    Abandoned {
        at_question: u8,
    },
}

enum Keypress {
    Rating(i64),
    Repeat,
    Quit,
    Unrecognized(String),
}

fn parse_key(line: &str) -> Keypress {
    match line.trim() {
        "" => Keypress::Repeat,
        "q" | "Q" => Keypress::Quit,
        other => match other.parse::<i64>() {
            Ok(value) if (1..=5).contains(&value) => Keypress::Rating(value),
            _ => Keypress::Unrecognized(other.to_string()),
        },
    }
}

pub(crate) struct TerminalSession<'a, R, W> {
    service: &'a QuizApiService,
    input: R,
    output: W,
    offer_lead: bool,
}

impl<'a, R: BufRead, W: Write> TerminalSession<'a, R, W> {
    pub(crate) fn new(service: &'a QuizApiService, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
            offer_lead: true,
        }
    }

    pub(crate) async fn run(&mut self) -> Result<TerminalOutcome, AppError> {
        let mut snapshot = self.service.start()?;
        let id = snapshot.session_id.clone();
        writeln!(self.output, "AI Infrastructure Readiness Assessment")?;
        writeln!(
            self.output,
            "Rate each statement from 1 to 5. Enter confirms the highlighted rating, q quits.\n"
        )?;

        while let Some(question) = snapshot.question {
            let highlighted = snapshot
                .answers
                .get(&question.question_id())
                .map(|value| i64::from(value.get()));
            self.render_question(&snapshot, &question, highlighted)?;

            let Some(line) = self.read_line()? else {
                return Ok(self.abandon(&snapshot));
            };
            let value = match parse_key(&line) {
                Keypress::Rating(value) => value,
                Keypress::Repeat => match highlighted {
                    Some(value) => value,
                    None => {
                        writeln!(self.output, "Pick a rating from 1 to 5 first.")?;
                        continue;
                    }
                },
                Keypress::Quit => return Ok(self.abandon(&snapshot)),
                Keypress::Unrecognized(raw) => {
                    writeln!(self.output, "'{raw}' is not a rating; use 1-5 or q.")?;
                    continue;
                }
            };

            let outcome = match self.service.answer(&id, question.id, value) {
                Ok(outcome) => outcome,
                Err(QuizServiceError::Validation(err)) => {
                    writeln!(self.output, "{err}")?;
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            let choice = question.option(value as u8).map_or("", |option| option.label);
            writeln!(self.output, "Recorded {value}: {choice}\n")?;

            snapshot = match outcome.transition.from_question() {
                Some(from) => {
                    let settings = self.service.settings();
                    tokio::time::sleep(settings.advance_delay()).await;
                    tokio::time::sleep(settings.transition()).await;
                    self.service.complete_transition(&id, from)?
                }
                None => outcome.session,
            };
        }

        let results = self.service.results(&id)?;
        render_results(&mut self.output, &results)?;

        let lead = if self.offer_lead {
            self.lead_flow(&id).await?
        } else {
            None
        };

        Ok(TerminalOutcome::Completed {
            results: Box::new(results),
            lead,
        })
    }

    fn render_question(
        &mut self,
        snapshot: &SessionSnapshot,
        question: &Question,
        highlighted: Option<i64>,
    ) -> io::Result<()> {
        let filled = (snapshot.progress_fraction * PROGRESS_WIDTH as f32).round() as usize;
        writeln!(
            self.output,
            "[{}{}] {}",
            "#".repeat(filled.min(PROGRESS_WIDTH)),
            "-".repeat(PROGRESS_WIDTH.saturating_sub(filled)),
            snapshot.progress_label
        )?;
        writeln!(self.output, "{}: {}", question.topic, question.prompt)?;
        for option in &question.options {
            let marker = if highlighted == Some(i64::from(option.value)) {
                '>'
            } else {
                ' '
            };
            writeln!(self.output, " {marker}[{}] {}", option.value, option.label)?;
        }
        write!(self.output, "Your rating: ")?;
        self.output.flush()
    }

    async fn lead_flow(&mut self, id: &SessionId) -> Result<Option<SubmissionStatus>, AppError> {
        write!(
            self.output,
            "\nBook a free AI Readiness Session with our experts? [y/N] "
        )?;
        self.output.flush()?;
        let wants_session = self
            .read_line()?
            .is_some_and(|answer| answer.trim().eq_ignore_ascii_case("y"));
        if !wants_session {
            return Ok(None);
        }

        loop {
            let Some(form) = self.read_form()? else {
                return Ok(None);
            };
            writeln!(self.output, "Submitting...")?;
            match self.service.submit_lead(id, form).await {
                Ok(status) => {
                    match &status {
                        SubmissionStatus::Scheduled { message, .. } => {
                            writeln!(self.output, "Success! {message}")?
                        }
                        SubmissionStatus::Failed { reason } => {
                            writeln!(self.output, "We could not submit your details: {reason}")?
                        }
                    }
                    return Ok(Some(status));
                }
                Err(QuizServiceError::Validation(err)) => {
                    writeln!(self.output, "{err}. Please try again.")?;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn read_form(&mut self) -> io::Result<Option<LeadForm>> {
        let mut form = LeadForm::default();
        let fields: [(&str, &mut String); 6] = [
            ("First name", &mut form.first_name),
            ("Last name", &mut form.last_name),
            ("Work email", &mut form.email),
            ("Company", &mut form.company),
            ("Job title (optional)", &mut form.job_title),
            ("Phone (optional)", &mut form.phone),
        ];
        for (prompt, slot) in fields {
            write!(self.output, "{prompt}: ")?;
            self.output.flush()?;
            match Self::next_line(&mut self.input)? {
                Some(value) => *slot = value.trim().to_string(),
                None => return Ok(None),
            }
        }
        Ok(Some(form))
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        Self::next_line(&mut self.input)
    }

    fn next_line(input: &mut R) -> io::Result<Option<String>> {
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn abandon(&mut self, snapshot: &SessionSnapshot) -> TerminalOutcome {
        // Output is best effort once the visitor has left.
        let _ = writeln!(self.output, "\nAssessment abandoned.");
        TerminalOutcome::Abandoned {
            at_question: snapshot.current_question,
        }
    }
}
