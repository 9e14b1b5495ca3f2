use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable key identifying one of the assessment questions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub String);

impl QuestionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for a single quiz attempt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Likert-style rating; only `1..=5` can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct AnswerValue(u8);

impl AnswerValue {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ValidationError::AnswerOutOfRange { value })
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for AnswerValue {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AnswerValue> for u8 {
    fn from(value: AnswerValue) -> Self {
        value.0
    }
}

/// Answers keyed by question. Entries are upserted and never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerRecord(BTreeMap<QuestionId, AnswerValue>);

impl AnswerRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value`, returning the answer it replaced.
    pub fn upsert(&mut self, question_id: QuestionId, value: AnswerValue) -> Option<AnswerValue> {
        self.0.insert(question_id, value)
    }

    pub fn get(&self, question_id: &QuestionId) -> Option<AnswerValue> {
        self.0.get(question_id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> u32 {
        self.0.values().map(|value| u32::from(value.get())).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, AnswerValue)> {
        self.0.iter().map(|(id, value)| (id, *value))
    }
}

/// Input rejected at the quiz boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("unknown question '{0}'")]
    UnknownQuestion(String),
    #[error("answer value {value} outside the 1-5 rating scale")]
    AnswerOutOfRange { value: i64 },
    #[error("score must be a finite number, got {0}")]
    InvalidScore(f64),
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("'{0}' is not a valid phone number")]
    InvalidPhone(String),
}
