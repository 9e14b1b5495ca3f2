use super::common::*;
use crate::quiz::domain::{AnswerValue, QuestionId, ValidationError};
use crate::quiz::questions::TOTAL_QUESTIONS;
use crate::quiz::score::{Score, ScoreDenominator};

fn rating(value: i64) -> AnswerValue {
    AnswerValue::new(value).expect("valid rating")
}

#[test]
fn new_session_starts_on_first_question() {
    let session = fresh_session();

    assert_eq!(session.current_question(), 1);
    assert!(session.answers().is_empty());
    assert!(!session.is_complete());
    assert_eq!(session.current().map(|q| q.id), Some("compute"));
    assert_eq!(session.progress_label(), "Question 1 of 6");
}

#[test]
fn advance_saturates_at_completion_sentinel() {
    let mut session = fresh_session();

    for expected in 2..=TOTAL_QUESTIONS + 1 {
        assert_eq!(session.advance(), expected);
    }
    assert!(session.is_complete());
    assert!(session.current().is_none());

    assert_eq!(session.advance(), TOTAL_QUESTIONS + 1);
    assert_eq!(session.advance(), TOTAL_QUESTIONS + 1);
    assert_eq!(session.current_question(), TOTAL_QUESTIONS + 1);
}

#[test]
fn advance_from_ignores_stale_transitions() {
    let mut session = fresh_session();

    assert_eq!(session.advance_from(1), 2);
    // A duplicate of the same scheduled transition must not skip question two.
    assert_eq!(session.advance_from(1), 2);
    assert_eq!(session.advance_from(5), 2);
    assert_eq!(session.advance_from(2), 3);
}

#[test]
fn progress_fraction_increases_and_caps_at_one() {
    let mut session = fresh_session();
    let mut previous = 0.0_f32;

    for step in 0..TOTAL_QUESTIONS {
        let fraction = session.progress_fraction();
        let expected = f32::from(step + 1) / f32::from(TOTAL_QUESTIONS);
        assert!((fraction - expected).abs() < f32::EPSILON);
        assert!(fraction > previous);
        previous = fraction;
        session.advance();
    }

    assert!(session.is_complete());
    assert!((session.progress_fraction() - 1.0).abs() < f32::EPSILON);
    assert_eq!(session.progress_label(), "Question 6 of 6");
}

#[test]
fn re_answering_keeps_only_latest_value() {
    let mut session = fresh_session();
    for question in crate::quiz::questions::catalog() {
        session
            .record_answer(QuestionId::from(question.id), rating(3))
            .expect("answer recorded");
    }

    session
        .record_answer(QuestionId::from("network"), rating(5))
        .expect("re-answer recorded");

    assert_eq!(session.answers().len(), 6);
    assert_eq!(
        session.answers().get(&QuestionId::from("network")),
        Some(rating(5))
    );
    // (3 * 5 + 5) / 6 = 3.33 -> 3.3
    assert_eq!(
        session.score(ScoreDenominator::FixedTotal),
        Score::from_tenths(33)
    );
}

#[test]
fn unknown_questions_are_rejected() {
    let mut session = fresh_session();

    let error = session
        .record_answer(QuestionId::from("budget"), rating(4))
        .expect_err("unknown question rejected");

    assert_eq!(error, ValidationError::UnknownQuestion("budget".to_string()));
    assert!(session.answers().is_empty());
}

#[test]
fn answer_values_outside_scale_are_rejected() {
    assert_eq!(
        AnswerValue::new(0),
        Err(ValidationError::AnswerOutOfRange { value: 0 })
    );
    assert_eq!(
        AnswerValue::new(6),
        Err(ValidationError::AnswerOutOfRange { value: 6 })
    );
    assert_eq!(AnswerValue::new(1).map(AnswerValue::get), Ok(1));
    assert_eq!(AnswerValue::new(5).map(AnswerValue::get), Ok(5));

    let parsed: Result<AnswerValue, _> = serde_json::from_str("7");
    assert!(parsed.is_err());
}
