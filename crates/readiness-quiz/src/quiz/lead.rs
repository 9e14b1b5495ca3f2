use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{AnswerRecord, ValidationError};
use super::score::Score;
use super::tiers::{resolve_tier, ResultTier};

const MIN_PHONE_DIGITS: usize = 7;

/// Raw contact form fields exactly as the browser posts them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: String,
    #[serde(alias = "title")]
    pub job_title: String,
    pub phone: String,
}

impl LeadForm {
    /// Trims every field and checks the shape of the contact details.
    pub fn validate(&self) -> Result<ContactDetails, ValidationError> {
        let first_name = required("first name", &self.first_name)?;
        let last_name = required("last name", &self.last_name)?;
        let company = required("company", &self.company)?;

        let email = required("email", &self.email)?;
        if !looks_like_email(&email) {
            return Err(ValidationError::InvalidEmail(email));
        }

        let phone = optional(&self.phone);
        if let Some(phone) = &phone {
            if !looks_like_phone(phone) {
                return Err(ValidationError::InvalidPhone(phone.clone()));
            }
        }

        Ok(ContactDetails {
            first_name,
            last_name,
            email,
            company,
            job_title: optional(&self.job_title),
            phone,
        })
    }
}

fn required(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    optional(raw).ok_or(ValidationError::MissingField(field))
}

fn optional(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && tld.len() >= 2,
        None => false,
    }
}

fn looks_like_phone(phone: &str) -> bool {
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '.'));
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    allowed && digits >= MIN_PHONE_DIGITS
}

/// Validated contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: String,
    pub job_title: Option<String>,
    pub phone: Option<String>,
}

/// Contact details joined with the finished quiz outcome, ready for a CRM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub contact: ContactDetails,
    pub score: Score,
    pub tier: ResultTier,
    pub answers: AnswerRecord,
    pub captured_at: DateTime<Utc>,
}

impl LeadRecord {
    pub fn capture(
        contact: ContactDetails,
        score: Score,
        answers: AnswerRecord,
        captured_at: DateTime<Utc>,
    ) -> Self {
        Self {
            contact,
            tier: resolve_tier(score),
            score,
            answers,
            captured_at,
        }
    }

    /// Flat field mapping expected by the marketing-automation form endpoint.
    pub fn crm_fields(&self) -> BTreeMap<&'static str, String> {
        let contact = &self.contact;
        let mut fields = BTreeMap::new();
        fields.insert("firstname", contact.first_name.clone());
        fields.insert("lastname", contact.last_name.clone());
        fields.insert("email", contact.email.clone());
        fields.insert("company", contact.company.clone());
        fields.insert("jobtitle", contact.job_title.clone().unwrap_or_default());
        fields.insert("phone", contact.phone.clone().unwrap_or_default());
        fields.insert("ai_readiness_score", self.score.to_string());
        fields
    }

    pub fn analytics_event(&self) -> AnalyticsEvent {
        AnalyticsEvent {
            name: "form_submit".to_string(),
            category: "AI Readiness Quiz".to_string(),
            label: "Lead Capture".to_string(),
            value: self.score.value(),
            company: self.contact.company.clone(),
            job_title: self.contact.job_title.clone(),
            score_category: self.tier.title(self.score),
        }
    }
}

/// Conversion event emitted once a lead is captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub name: String,
    pub category: String,
    pub label: String,
    pub value: f64,
    pub company: String,
    pub job_title: Option<String>,
    pub score_category: String,
}
