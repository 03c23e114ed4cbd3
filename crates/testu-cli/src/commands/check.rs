//! The `testu check` command: grade a single answer non-interactively.
//!
//! Useful for scripting and for poking at the grading engine:
//!
//! ```text
//! testu check --kind short --correct "x = 3" --answer "3"
//! ```

use anyhow::Result;

use testu_core::grader::{check_answer, feedback};
use testu_core::model::{Question, QuestionKind};

pub fn execute(
    kind: String,
    correct: String,
    answer: String,
    question_text: String,
    explanation: Option<String>,
    format: String,
    fail_on_incorrect: bool,
) -> Result<()> {
    let kind: QuestionKind = kind.parse().map_err(|e: String| anyhow::anyhow!("{e}"))?;

    let question = Question {
        question: question_text,
        kind,
        options: vec![],
        correct,
        explanation,
    };

    let is_correct = check_answer(&question, &answer);
    let fb = feedback(&question, &answer, is_correct);

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&fb)?),
        "text" => {
            if fb.is_correct {
                println!("correct");
            } else {
                match &fb.similarity {
                    Some(similarity) => println!(
                        "incorrect (similarity {similarity}), expected: {}",
                        fb.correct_answer
                    ),
                    None => println!("incorrect, expected: {}", fb.correct_answer),
                }
            }
            if let Some(explanation) = &fb.explanation {
                println!("{explanation}");
            }
        }
        other => anyhow::bail!("unknown format '{other}', expected 'text' or 'json'"),
    }

    if fail_on_incorrect && !is_correct {
        std::process::exit(1);
    }

    Ok(())
}
