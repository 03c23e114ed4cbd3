//! The `testu run` command: generate a quiz and take it interactively.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use testu_core::grader::{check_answer, feedback, Feedback};
use testu_core::history::{HistoryEntry, HistoryStore};
use testu_core::model::{Difficulty, Question};
use testu_core::parser::validate_questions;
use testu_core::score::{calculate_score, grade_label};
use testu_core::traits::{GenerateRequest, QuestionGenerator};
use testu_providers::{create_provider, fallback_questions, load_config_from, ProviderError};

const DEFAULT_MAX_TOKENS: u32 = 1000;

pub async fn execute(
    topic: String,
    difficulty_str: String,
    num_questions: Option<u32>,
    model: Option<String>,
    provider_name: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let difficulty: Difficulty = difficulty_str
        .parse()
        .map_err(|e: String| anyhow::anyhow!("{e}"))?;

    let config = load_config_from(config_path.as_deref())?;

    let provider_name = provider_name.unwrap_or_else(|| config.default_provider.clone());
    let Some(provider_config) = config.providers.get(&provider_name) else {
        anyhow::bail!(
            "provider '{}' not found in config. Available: {:?}. Run `testu init` to create a config file.",
            provider_name,
            config.providers.keys().collect::<Vec<_>>()
        );
    };
    let provider = create_provider(&provider_name, provider_config)?;

    let request = GenerateRequest {
        model: model.unwrap_or_else(|| config.default_model.clone()),
        topic: topic.clone(),
        difficulty,
        num_questions: num_questions.unwrap_or(config.num_questions),
        max_tokens: DEFAULT_MAX_TOKENS,
        temperature: config.default_temperature,
    };

    eprintln!(
        "Generating {} {} questions about \"{}\" via {}...",
        request.num_questions, difficulty, topic, provider_name
    );

    let questions = match generate_with_retry(
        provider.as_ref(),
        &request,
        config.max_retries,
        Duration::from_millis(config.retry_delay_ms),
    )
    .await
    {
        Ok(response) => response.questions,
        Err(e) => {
            tracing::error!("question generation failed: {e:#}");
            eprintln!("Generation failed ({e:#}); using a fallback question.");
            fallback_questions(&topic)
        }
    };

    for warning in validate_questions(&questions) {
        let prefix = warning
            .question_index
            .map(|i| format!("question {}", i + 1))
            .unwrap_or_else(|| "questions".to_string());
        eprintln!("Warning: {prefix}: {}", warning.message);
    }

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let results = run_quiz(&questions, &mut stdin.lock(), &mut stdout.lock())?;

    let score = calculate_score(&results);
    print_summary(&results);
    println!(
        "\nScore: {}/{} ({:.1}%) - {}",
        score.correct,
        score.total,
        score.percentage,
        grade_label(score.percentage)
    );

    let mut store = HistoryStore::load(&config.history_file);
    store
        .record(HistoryEntry::from_score(&topic, difficulty, &score))
        .context("failed to save quiz result")?;
    println!("Result saved to {}", config.history_file.display());

    Ok(())
}

/// Present each question, read an answer line, grade it, and print the
/// per-answer feedback.
fn run_quiz(
    questions: &[Question],
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<Vec<Feedback>> {
    let mut results = Vec::new();

    for (index, question) in questions.iter().enumerate() {
        writeln!(
            out,
            "\nQuestion {}/{}: {}",
            index + 1,
            questions.len(),
            question.question
        )?;
        for option in &question.options {
            writeln!(out, "  {option}")?;
        }
        write!(out, "> ")?;
        out.flush()?;

        let mut answer = String::new();
        input.read_line(&mut answer)?;
        let answer = answer.trim_end_matches(['\n', '\r']);

        let is_correct = check_answer(question, answer);
        let fb = feedback(question, answer, is_correct);

        if fb.is_correct {
            writeln!(out, "Correct!")?;
        } else {
            match &fb.similarity {
                Some(similarity) => writeln!(
                    out,
                    "Incorrect (similarity {similarity}). Correct answer: {}",
                    fb.correct_answer
                )?,
                None => writeln!(out, "Incorrect. Correct answer: {}", fb.correct_answer)?,
            }
        }
        if let Some(explanation) = &fb.explanation {
            writeln!(out, "  {explanation}")?;
        }

        results.push(fb);
    }

    Ok(results)
}

/// Retry generation on transient provider errors with exponential backoff,
/// honoring rate-limit hints. Permanent errors (bad key, unknown model)
/// fail immediately.
async fn generate_with_retry(
    provider: &dyn QuestionGenerator,
    request: &GenerateRequest,
    max_retries: u32,
    initial_delay: Duration,
) -> Result<testu_core::traits::GenerateResponse> {
    let mut last_error = None;
    let mut retry_delay = initial_delay;

    for retry in 0..=max_retries {
        if retry > 0 {
            tokio::time::sleep(retry_delay).await;
            retry_delay = (retry_delay * 2).min(Duration::from_secs(60));
        }
        match provider.generate(request).await {
            Ok(response) => return Ok(response),
            Err(e) => {
                if let Some(provider_err) = e.downcast_ref::<ProviderError>() {
                    if provider_err.is_permanent() {
                        return Err(e);
                    }
                    if let Some(ms) = provider_err.retry_after_ms() {
                        retry_delay = Duration::from_millis(ms);
                    }
                }
                tracing::warn!("generation attempt {} failed: {e:#}", retry + 1);
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("unknown error")))
}

fn print_summary(results: &[Feedback]) {
    let mut table = Table::new();
    table.set_header(vec!["#", "Your answer", "Correct answer", "Result"]);

    for (index, fb) in results.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&fb.user_answer),
            Cell::new(&fb.correct_answer),
            Cell::new(if fb.is_correct { "correct" } else { "wrong" }),
        ]);
    }

    println!("\n{table}");
}
