//! Core data model types for testu.
//!
//! These are the fundamental types that the entire testu system uses to
//! represent quiz questions and generated quizzes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a question expects to be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Four lettered options, one correct letter.
    MultipleChoice,
    /// Free-form text graded by the fuzzy matcher.
    Short,
    /// Anything the generator emitted that we don't recognize.
    /// Such questions deserialize fine but always grade as incorrect.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::MultipleChoice => write!(f, "multiple_choice"),
            QuestionKind::Short => write!(f, "short"),
            QuestionKind::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "multiple_choice" | "multiple-choice" | "mc" => Ok(QuestionKind::MultipleChoice),
            "short" | "short_answer" | "short-answer" => Ok(QuestionKind::Short),
            other => Err(format!("unknown question kind: {other}")),
        }
    }
}

/// A single quiz question as produced by a question generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// The question text shown to the user.
    pub question: String,
    /// How the answer is graded.
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    /// Lettered options ("A) ..." through "D) ..."), multiple choice only.
    #[serde(default)]
    pub options: Vec<String>,
    /// The canonical correct answer: a letter for multiple choice,
    /// free text for short answers.
    pub correct: String,
    /// Optional explanation shown with the feedback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Quiz difficulty requested from the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// The Lithuanian adjective used in the generation prompt.
    pub fn in_lithuanian(&self) -> &'static str {
        match self {
            Difficulty::Easy => "lengvus",
            Difficulty::Medium => "vidutinio sunkumo",
            Difficulty::Hard => "sunkius",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// A generated quiz session: topic, difficulty, and its questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    pub topic: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_display_and_parse() {
        assert_eq!(Difficulty::Easy.to_string(), "easy");
        assert_eq!(Difficulty::Medium.to_string(), "medium");
        assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!("Medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert!("impossible".parse::<Difficulty>().is_err());
    }

    #[test]
    fn difficulty_prompt_words() {
        assert_eq!(Difficulty::Easy.in_lithuanian(), "lengvus");
        assert_eq!(Difficulty::Medium.in_lithuanian(), "vidutinio sunkumo");
        assert_eq!(Difficulty::Hard.in_lithuanian(), "sunkius");
    }

    #[test]
    fn kind_parse() {
        assert_eq!(
            "multiple_choice".parse::<QuestionKind>().unwrap(),
            QuestionKind::MultipleChoice
        );
        assert_eq!("short".parse::<QuestionKind>().unwrap(), QuestionKind::Short);
        assert!("essay".parse::<QuestionKind>().is_err());
    }

    #[test]
    fn question_serde_roundtrip() {
        let q = Question {
            question: "Kokia yra Lietuvos sostinė?".into(),
            kind: QuestionKind::MultipleChoice,
            options: vec![
                "A) Vilnius".into(),
                "B) Kaunas".into(),
                "C) Klaipėda".into(),
                "D) Šiauliai".into(),
            ],
            correct: "A".into(),
            explanation: Some("Vilnius yra sostinė nuo 1323 m.".into()),
        };
        let json = serde_json::to_string(&q).unwrap();
        assert!(json.contains("\"type\":\"multiple_choice\""));
        let back: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind, QuestionKind::MultipleChoice);
        assert_eq!(back.options.len(), 4);
    }

    #[test]
    fn unrecognized_kind_deserializes_as_unknown() {
        let json = r#"{"question": "Q?", "type": "essay", "correct": "whatever"}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.kind, QuestionKind::Unknown);
        assert!(q.options.is_empty());
        assert!(q.explanation.is_none());
    }
}
