use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{AnswerRecord, AnswerValue, QuestionId, SessionId, ValidationError};
use super::questions::{self, Question, TOTAL_QUESTIONS};
use super::score::{compute_score, Score, ScoreDenominator};

/// Progress through one attempt at the assessment.
///
/// `current_question` is 1-based and stops at `TOTAL_QUESTIONS + 1`, which marks the
/// attempt as complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSession {
    id: SessionId,
    current_question: u8,
    answers: AnswerRecord,
    started_at: DateTime<Utc>,
}

const COMPLETE_SENTINEL: u8 = TOTAL_QUESTIONS + 1;

impl QuizSession {
    pub fn new(id: SessionId, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            current_question: 1,
            answers: AnswerRecord::new(),
            started_at,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn current_question(&self) -> u8 {
        self.current_question
    }

    /// The question on screen, or `None` once the attempt is complete.
    pub fn current(&self) -> Option<&'static Question> {
        questions::question(self.current_question)
    }

    pub fn answers(&self) -> &AnswerRecord {
        &self.answers
    }

    /// Upserts an answer. A later answer for the same question replaces the earlier one.
    pub fn record_answer(
        &mut self,
        question_id: QuestionId,
        value: AnswerValue,
    ) -> Result<(), ValidationError> {
        if questions::question_by_id(question_id.as_str()).is_none() {
            return Err(ValidationError::UnknownQuestion(question_id.0));
        }

        self.answers.upsert(question_id, value);
        Ok(())
    }

    /// Moves to the next question, saturating at the completion sentinel.
    pub fn advance(&mut self) -> u8 {
        if self.current_question < COMPLETE_SENTINEL {
            self.current_question += 1;
        }
        self.current_question
    }

    /// Advances only if the session is still on `expected`, so a repeated or stale
    /// transition never skips a question.
    pub fn advance_from(&mut self, expected: u8) -> u8 {
        if self.current_question == expected {
            self.advance()
        } else {
            self.current_question
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current_question > TOTAL_QUESTIONS
    }

    pub fn progress_fraction(&self) -> f32 {
        f32::from(self.displayed_question()) / f32::from(TOTAL_QUESTIONS)
    }

    pub fn progress_label(&self) -> String {
        format!(
            "Question {} of {}",
            self.displayed_question(),
            TOTAL_QUESTIONS
        )
    }

    pub fn score(&self, denominator: ScoreDenominator) -> Score {
        compute_score(&self.answers, denominator)
    }

    fn displayed_question(&self) -> u8 {
        self.current_question.min(TOTAL_QUESTIONS)
    }
}
