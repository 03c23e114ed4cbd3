//! Question payload parsing and validation.
//!
//! Generators return JSON, often wrapped in markdown fences; this module
//! turns that payload into `Question` values and flags the shapes the
//! grader can't do anything useful with.

use anyhow::{Context, Result};

use crate::model::{Question, QuestionKind};
use crate::traits::extract_json_from_markdown;

/// Parse a generator response into questions.
///
/// Strips markdown fences first, then expects a JSON array of question
/// objects.
pub fn parse_questions(raw: &str) -> Result<Vec<Question>> {
    let payload = extract_json_from_markdown(raw);
    let questions: Vec<Question> =
        serde_json::from_str(&payload).context("failed to parse question payload as JSON")?;
    Ok(questions)
}

/// A warning from question validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Index of the offending question (if applicable).
    pub question_index: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Validate generated questions for common issues.
///
/// Warnings are advisory: a flagged question still grades (an unknown kind
/// simply never grades correct), but the caller may want to drop or re-roll
/// flagged ones before presenting them.
pub fn validate_questions(questions: &[Question]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for (index, q) in questions.iter().enumerate() {
        if q.question.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_index: Some(index),
                message: "question text is empty".into(),
            });
        }

        if q.correct.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_index: Some(index),
                message: "correct answer is empty".into(),
            });
        }

        match q.kind {
            QuestionKind::MultipleChoice => {
                if q.options.len() != 4 {
                    warnings.push(ValidationWarning {
                        question_index: Some(index),
                        message: format!("expected 4 options, found {}", q.options.len()),
                    });
                }
                let correct = q.correct.trim().to_uppercase();
                if !matches!(correct.as_str(), "A" | "B" | "C" | "D") {
                    warnings.push(ValidationWarning {
                        question_index: Some(index),
                        message: format!("correct answer '{}' is not a letter A-D", q.correct),
                    });
                }
            }
            QuestionKind::Short => {
                if !q.options.is_empty() {
                    warnings.push(ValidationWarning {
                        question_index: Some(index),
                        message: "short answer question carries options".into(),
                    });
                }
            }
            QuestionKind::Unknown => {
                warnings.push(ValidationWarning {
                    question_index: Some(index),
                    message: "unrecognized question type, will never grade correct".into(),
                });
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_PAYLOAD: &str = r#"[
  {
    "question": "Kokia yra Lietuvos sostinė?",
    "type": "multiple_choice",
    "options": ["A) Vilnius", "B) Kaunas", "C) Klaipėda", "D) Šiauliai"],
    "correct": "A",
    "explanation": "Vilnius yra sostinė nuo 1323 m."
  },
  {
    "question": "Kas yra mitochondrija?",
    "type": "short",
    "correct": "Energijos gamykla ląstelėje",
    "explanation": "Mitochondrija gamina ATP"
  }
]"#;

    #[test]
    fn parse_valid_payload() {
        let questions = parse_questions(VALID_PAYLOAD).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].kind, QuestionKind::MultipleChoice);
        assert_eq!(questions[0].options.len(), 4);
        assert_eq!(questions[1].kind, QuestionKind::Short);
        assert_eq!(questions[1].correct, "Energijos gamykla ląstelėje");
    }

    #[test]
    fn parse_fenced_payload() {
        let fenced = format!("```json\n{VALID_PAYLOAD}\n```");
        let questions = parse_questions(&fenced).unwrap();
        assert_eq!(questions.len(), 2);
    }

    #[test]
    fn parse_malformed_payload() {
        assert!(parse_questions("this is not json").is_err());
        assert!(parse_questions("{\"not\": \"an array\"}").is_err());
    }

    #[test]
    fn validate_clean_questions() {
        let questions = parse_questions(VALID_PAYLOAD).unwrap();
        assert!(validate_questions(&questions).is_empty());
    }

    #[test]
    fn validate_multiple_choice_shape() {
        let json = r#"[{
            "question": "Q?",
            "type": "multiple_choice",
            "options": ["A) tik", "B) dvi"],
            "correct": "E"
        }]"#;
        let questions = parse_questions(json).unwrap();
        let warnings = validate_questions(&questions);
        assert!(warnings.iter().any(|w| w.message.contains("4 options")));
        assert!(warnings.iter().any(|w| w.message.contains("not a letter")));
    }

    #[test]
    fn validate_empty_fields() {
        let json = r#"[{"question": "  ", "type": "short", "correct": ""}]"#;
        let questions = parse_questions(json).unwrap();
        let warnings = validate_questions(&questions);
        assert!(warnings.iter().any(|w| w.message.contains("text is empty")));
        assert!(warnings.iter().any(|w| w.message.contains("answer is empty")));
    }

    #[test]
    fn validate_unknown_kind() {
        let json = r#"[{"question": "Q?", "type": "essay", "correct": "ilgas tekstas"}]"#;
        let questions = parse_questions(json).unwrap();
        let warnings = validate_questions(&questions);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("unrecognized"));
        assert_eq!(warnings[0].question_index, Some(0));
    }
}
