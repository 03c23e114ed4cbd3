//! Quiz score calculation and grade labels.

use serde::{Deserialize, Serialize};

use crate::grader::Feedback;

/// Aggregate score for one completed quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    /// Number of questions answered.
    pub total: u32,
    /// Number answered correctly.
    pub correct: u32,
    /// Number answered incorrectly.
    pub incorrect: u32,
    /// Correct percentage, rounded to one decimal place.
    pub percentage: f64,
}

/// Compute the score summary for a set of graded answers.
/// An empty quiz scores 0%.
pub fn calculate_score(results: &[Feedback]) -> ScoreSummary {
    let total = results.len() as u32;
    let correct = results.iter().filter(|r| r.is_correct).count() as u32;
    let percentage = if total > 0 {
        round1(correct as f64 / total as f64 * 100.0)
    } else {
        0.0
    };

    ScoreSummary {
        total,
        correct,
        incorrect: total - correct,
        percentage,
    }
}

/// The Lithuanian grade label for a percentage score.
pub fn grade_label(percentage: f64) -> &'static str {
    if percentage >= 90.0 {
        "Puikiai!"
    } else if percentage >= 80.0 {
        "Labai gerai!"
    } else if percentage >= 70.0 {
        "Gerai!"
    } else if percentage >= 60.0 {
        "Patenkinamai"
    } else if percentage >= 50.0 {
        "Silpnai"
    } else {
        "Reikia geriau pasimokyti"
    }
}

/// Round to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graded(is_correct: bool) -> Feedback {
        Feedback {
            is_correct,
            user_answer: "atsakymas".into(),
            correct_answer: "atsakymas".into(),
            explanation: None,
            similarity: None,
        }
    }

    #[test]
    fn score_counts_and_percentage() {
        let results = vec![graded(true), graded(true), graded(false)];
        let score = calculate_score(&results);
        assert_eq!(score.total, 3);
        assert_eq!(score.correct, 2);
        assert_eq!(score.incorrect, 1);
        assert_eq!(score.percentage, 66.7);
    }

    #[test]
    fn score_of_empty_quiz() {
        let score = calculate_score(&[]);
        assert_eq!(score.total, 0);
        assert_eq!(score.percentage, 0.0);
    }

    #[test]
    fn perfect_and_zero_scores() {
        assert_eq!(calculate_score(&[graded(true)]).percentage, 100.0);
        assert_eq!(calculate_score(&[graded(false)]).percentage, 0.0);
    }

    #[test]
    fn grade_label_bands() {
        assert_eq!(grade_label(100.0), "Puikiai!");
        assert_eq!(grade_label(90.0), "Puikiai!");
        assert_eq!(grade_label(85.0), "Labai gerai!");
        assert_eq!(grade_label(70.0), "Gerai!");
        assert_eq!(grade_label(66.7), "Patenkinamai");
        assert_eq!(grade_label(50.0), "Silpnai");
        assert_eq!(grade_label(49.9), "Reikia geriau pasimokyti");
        assert_eq!(grade_label(0.0), "Reikia geriau pasimokyti");
    }
}
