use super::common::*;
use crate::quiz::domain::{AnswerRecord, AnswerValue, QuestionId};
use crate::quiz::score::{compute_score, Score, ScoreDenominator};

#[test]
fn uniform_answers_score_their_rating() {
    assert_eq!(
        compute_score(&answers_from([5; 6]), ScoreDenominator::FixedTotal),
        Score::from_tenths(50)
    );
    assert_eq!(
        compute_score(&answers_from([1; 6]), ScoreDenominator::FixedTotal),
        Score::from_tenths(10)
    );
}

#[test]
fn mixed_answers_round_half_up_to_one_decimal() {
    // 15 / 6 = 2.5 exactly
    assert_eq!(
        compute_score(&answers_from([1, 2, 3, 4, 1, 4]), ScoreDenominator::FixedTotal),
        Score::from_tenths(25)
    );
    // 29 / 6 = 4.833.. -> 4.8
    assert_eq!(
        compute_score(&answers_from([5, 5, 5, 5, 5, 4]), ScoreDenominator::FixedTotal),
        Score::from_tenths(48)
    );
    // 25 / 6 = 4.166.. -> 4.2
    assert_eq!(
        compute_score(&answers_from([4, 4, 4, 4, 4, 5]), ScoreDenominator::FixedTotal),
        Score::from_tenths(42)
    );
    // 13 / 6 = 2.1666.. -> 2.2
    assert_eq!(
        compute_score(&answers_from([2, 2, 2, 2, 2, 3]), ScoreDenominator::FixedTotal),
        Score::from_tenths(22)
    );
}

#[test]
fn every_fully_answered_session_scores_within_scale() {
    // Sums of six ratings range over 6..=30; every one must land in [1.0, 5.0].
    for total in 6..=30_i64 {
        let mut values = [1_i64; 6];
        let mut remaining = total - 6;
        for value in values.iter_mut() {
            let bump = remaining.min(4);
            *value += bump;
            remaining -= bump;
        }

        let score = compute_score(&answers_from(values), ScoreDenominator::FixedTotal);
        assert!(
            (10..=50).contains(&score.tenths()),
            "total {total} produced {score}"
        );
        assert_eq!(score.to_string().split('.').nth(1).map(str::len), Some(1));
    }
}

#[test]
fn fixed_denominator_deflates_partial_records() {
    let mut partial = AnswerRecord::new();
    partial.upsert(
        QuestionId::from("compute"),
        AnswerValue::new(5).expect("valid"),
    );
    partial.upsert(
        QuestionId::from("network"),
        AnswerValue::new(5).expect("valid"),
    );

    // 10 / 6 = 1.67 -> 1.7
    assert_eq!(
        compute_score(&partial, ScoreDenominator::FixedTotal),
        Score::from_tenths(17)
    );
    assert_eq!(
        compute_score(&partial, ScoreDenominator::AnsweredCount),
        Score::from_tenths(50)
    );
}

#[test]
fn empty_record_scores_zero_under_either_denominator() {
    let empty = AnswerRecord::new();
    assert_eq!(
        compute_score(&empty, ScoreDenominator::FixedTotal),
        Score::ZERO
    );
    assert_eq!(
        compute_score(&empty, ScoreDenominator::AnsweredCount),
        Score::ZERO
    );
}
