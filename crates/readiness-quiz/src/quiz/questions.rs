//! Fixed question catalog for the AI infrastructure readiness assessment.

use serde::Serialize;

use super::domain::QuestionId;

pub const TOTAL_QUESTIONS: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerOption {
    pub value: u8,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub number: u8,
    pub id: &'static str,
    pub topic: &'static str,
    pub prompt: &'static str,
    pub options: [AnswerOption; 5],
}

impl Question {
    pub fn question_id(&self) -> QuestionId {
        QuestionId::from(self.id)
    }

    pub fn option(&self, value: u8) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.value == value)
    }
}

const fn scale(labels: [&'static str; 5]) -> [AnswerOption; 5] {
    [
        AnswerOption {
            value: 1,
            label: labels[0],
        },
        AnswerOption {
            value: 2,
            label: labels[1],
        },
        AnswerOption {
            value: 3,
            label: labels[2],
        },
        AnswerOption {
            value: 4,
            label: labels[3],
        },
        AnswerOption {
            value: 5,
            label: labels[4],
        },
    ]
}

static CATALOG: [Question; TOTAL_QUESTIONS as usize] = [
    Question {
        number: 1,
        id: "compute",
        topic: "AI Compute",
        prompt: "How would you describe the compute capacity available to your AI workloads today?",
        options: scale([
            "No dedicated AI compute; workloads run on general-purpose servers",
            "Shared GPUs allocated ad hoc between teams",
            "Dedicated GPU servers for a few priority projects",
            "Validated AI compute platform with capacity planning",
            "Scalable GPU clusters sized for training and inference across the enterprise",
        ]),
    },
    Question {
        number: 2,
        id: "network",
        topic: "Networking",
        prompt: "How well does your network handle AI training and inference traffic?",
        options: scale([
            "Frequent bottlenecks; GPUs sit idle waiting on data",
            "Noticeable latency during large training jobs",
            "Adequate for current projects but not tuned for AI",
            "High-bandwidth fabric with some AI-specific tuning",
            "Fabric-aware, lossless networking designed for east-west GPU traffic",
        ]),
    },
    Question {
        number: 3,
        id: "security",
        topic: "Security",
        prompt: "How are your AI models, prompts, and training data protected?",
        options: scale([
            "No AI-specific security controls",
            "Standard perimeter controls applied to AI systems",
            "Access controls on models and data, reviewed occasionally",
            "AI-aware threat detection and model integrity checks",
            "Security-first AI design with continuous posture management",
        ]),
    },
    Question {
        number: 4,
        id: "data_pipeline",
        topic: "Data Readiness",
        prompt: "How ready is your data pipeline to feed production AI workloads?",
        options: scale([
            "Data is siloed and largely manual to access",
            "Some pipelines exist but quality is inconsistent",
            "Curated datasets for key use cases",
            "Automated pipelines with governance and lineage",
            "Real-time, governed data platform built for AI at scale",
        ]),
    },
    Question {
        number: 5,
        id: "operations",
        topic: "Operations",
        prompt: "How do you monitor, scale, and operate AI workloads in production?",
        options: scale([
            "No production AI workloads yet",
            "Manual deployment and monitoring",
            "Basic observability with manual scaling",
            "Workload observability with automated scaling",
            "Fully managed lifecycle with proactive optimization",
        ]),
    },
    Question {
        number: 6,
        id: "governance",
        topic: "Strategy & Governance",
        prompt: "How is your AI strategy governed and funded?",
        options: scale([
            "No formal AI strategy",
            "Isolated experiments driven by individual teams",
            "Executive sponsorship for a handful of initiatives",
            "Enterprise AI roadmap with model governance",
            "AI is a core business strategy with lifecycle governance and partners",
        ]),
    },
];

pub fn catalog() -> &'static [Question] {
    &CATALOG
}

/// Looks up a question by its 1-based position.
pub fn question(number: u8) -> Option<&'static Question> {
    number
        .checked_sub(1)
        .and_then(|index| CATALOG.get(usize::from(index)))
}

pub fn question_by_id(id: &str) -> Option<&'static Question> {
    CATALOG.iter().find(|question| question.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_numbered_in_order_with_unique_ids() {
        let numbers: Vec<u8> = catalog().iter().map(|question| question.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);

        let mut ids: Vec<&str> = catalog().iter().map(|question| question.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), usize::from(TOTAL_QUESTIONS));
    }

    #[test]
    fn every_question_offers_the_full_rating_scale() {
        for question in catalog() {
            let values: Vec<u8> = question.options.iter().map(|option| option.value).collect();
            assert_eq!(values, vec![1, 2, 3, 4, 5], "question {}", question.id);
        }
    }

    #[test]
    fn lookups_cover_bounds() {
        assert!(question(0).is_none());
        assert_eq!(question(1).map(|q| q.id), Some("compute"));
        assert_eq!(question(6).map(|q| q.id), Some("governance"));
        assert!(question(7).is_none());
        assert_eq!(question_by_id("network").map(|q| q.number), Some(2));
        assert!(question_by_id("budget").is_none());
    }
}
