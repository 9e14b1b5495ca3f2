use crate::infra::{build_service, parse_answer_list, parse_score, AnswerList};
use clap::Args;
use readiness_quiz::config::AppConfig;
use readiness_quiz::error::AppError;
use readiness_quiz::telemetry;
use readiness_quiz::quiz::{
    catalog, QuizResults, QuizServiceError, QuizSettings, Score, TierResult, TOTAL_QUESTIONS,
};
use std::io::{self, Write};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Comma-separated ratings (1-5) in question order, e.g. 5,4,3,4,5,4.
    /// Fewer than six ratings leaves the remaining questions unanswered.
    #[arg(long, value_parser = parse_answer_list)]
    pub(crate) answers: AnswerList,
    /// Print the results as JSON instead of the text summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct TierArgs {
    /// Score on the 0-5 scale; rounded to one decimal before lookup
    #[arg(long, value_parser = parse_score)]
    pub(crate) score: f64,
    /// Print the tier as JSON instead of the text summary
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init_for_terminal(&config.telemetry)?;

    let settings = QuizSettings {
        score_denominator: config.quiz.score_denominator,
        ..QuizSettings::immediate()
    };

    let results = scripted_results(settings, args.answers.values())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &results).map_err(io::Error::from)?;
        writeln!(out)?;
    } else {
        writeln!(out, "AI infrastructure readiness demo")?;
        writeln!(
            out,
            "Answers: {} of {} questions",
            results.answers.len(),
            TOTAL_QUESTIONS
        )?;
        for (question, value) in results.answers.iter() {
            writeln!(out, "  {question}: {}", value.get())?;
        }
        writeln!(out)?;
        render_results(&mut out, &results)?;
    }
    Ok(())
}

pub(crate) fn run_tier_lookup(args: TierArgs) -> Result<(), AppError> {
    let score = Score::from_value(args.score).map_err(QuizServiceError::from)?;
    let result = TierResult::for_score(score);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &result).map_err(io::Error::from)?;
        writeln!(out)?;
    } else {
        render_tier(&mut out, &result)?;
    }
    Ok(())
}

/// Drives a session through the service with the supplied ratings, skipping any
/// questions left without one.
pub(crate) fn scripted_results(
    settings: QuizSettings,
    values: &[i64],
) -> Result<QuizResults, QuizServiceError> {
    let service = build_service(settings);
    let id = service.start()?.session_id;

    for (question, value) in catalog().iter().zip(values.iter().copied()) {
        let outcome = service.answer(&id, question.id, value)?;
        if let Some(from) = outcome.transition.from_question() {
            service.complete_transition(&id, from)?;
        }
    }
    while !service.snapshot(&id)?.complete {
        service.advance(&id)?;
    }

    service.results(&id)
}

pub(crate) fn render_results<W: Write>(out: &mut W, results: &QuizResults) -> io::Result<()> {
    render_tier(out, &results.result)?;
    if results.answers.len() < usize::from(TOTAL_QUESTIONS) {
        writeln!(
            out,
            "\nNote: {} of {} questions answered ({} denominator).",
            results.answers.len(),
            TOTAL_QUESTIONS,
            results.denominator.label()
        )?;
    }
    Ok(())
}

pub(crate) fn render_tier<W: Write>(out: &mut W, result: &TierResult) -> io::Result<()> {
    writeln!(out, "{}", result.title)?;
    writeln!(out, "{}", result.description)?;
    writeln!(out, "\nRecommended next steps")?;
    for recommendation in &result.recommendations {
        writeln!(out, "- {recommendation}")?;
    }
    writeln!(out, "\nIndustry benchmark")?;
    writeln!(out, "{}", result.benchmark)?;
    Ok(())
}
