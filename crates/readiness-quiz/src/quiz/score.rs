use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::domain::{AnswerRecord, ValidationError};
use super::questions::TOTAL_QUESTIONS;

/// Readiness score held in tenths so tier boundaries compare exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score {
    tenths: i32,
}

impl Score {
    pub const ZERO: Score = Score { tenths: 0 };
    pub const MAX: Score = Score { tenths: 50 };

    pub const fn from_tenths(tenths: i32) -> Self {
        Self { tenths }
    }

    /// Rounds an arbitrary number half-up to one decimal place.
    pub fn from_value(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::InvalidScore(value));
        }

        // Nudge past binary representation error so 4.35 rounds to 4.4.
        let scaled = (value * 10.0 + 0.5 + 1e-9).floor();
        let tenths = scaled.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32;
        Ok(Self { tenths })
    }

    pub const fn tenths(self) -> i32 {
        self.tenths
    }

    pub fn value(self) -> f64 {
        f64::from(self.tenths) / 10.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.tenths < 0 { "-" } else { "" };
        let magnitude = self.tenths.unsigned_abs();
        write!(f, "{sign}{}.{}", magnitude / 10, magnitude % 10)
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        Score::from_value(raw).map_err(serde::de::Error::custom)
    }
}

/// Divisor applied to the summed answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreDenominator {
    /// Always divide by the full question count; unanswered questions pull the score down.
    #[default]
    FixedTotal,
    /// Divide by the number of answers actually recorded.
    AnsweredCount,
}

impl ScoreDenominator {
    pub const fn label(self) -> &'static str {
        match self {
            ScoreDenominator::FixedTotal => "fixed",
            ScoreDenominator::AnsweredCount => "answered",
        }
    }
}

impl FromStr for ScoreDenominator {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fixed" | "fixed_total" | "total" => Ok(Self::FixedTotal),
            "answered" | "answered_count" => Ok(Self::AnsweredCount),
            other => Err(format!(
                "unknown score denominator '{other}' (expected 'fixed' or 'answered')"
            )),
        }
    }
}

/// Averages the recorded answers and rounds half-up to one decimal place.
pub fn compute_score(answers: &AnswerRecord, denominator: ScoreDenominator) -> Score {
    let divisor = match denominator {
        ScoreDenominator::FixedTotal => i64::from(TOTAL_QUESTIONS),
        ScoreDenominator::AnsweredCount => answers.len() as i64,
    };
    if divisor == 0 {
        return Score::ZERO;
    }

    // floor(10 * total / divisor + 1/2) without leaving integer arithmetic
    let total = i64::from(answers.total());
    let tenths = (20 * total + divisor) / (2 * divisor);
    Score::from_tenths(tenths as i32)
}
