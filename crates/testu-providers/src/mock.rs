//! Mock generator for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use testu_core::model::{Question, QuestionKind};
use testu_core::traits::{
    GenerateRequest, GenerateResponse, ModelInfo, QuestionGenerator, TokenUsage,
};

/// A mock question generator for exercising the quiz flow without real
/// API calls.
///
/// Returns configurable question sets based on topic substring matching.
pub struct MockGenerator {
    /// Map of topic substring → questions.
    responses: HashMap<String, Vec<Question>>,
    /// Default questions if no topic matches.
    default_questions: Vec<Question>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<GenerateRequest>>,
}

impl MockGenerator {
    /// Create a new mock with the given topic → questions mappings.
    pub fn new(responses: HashMap<String, Vec<Question>>) -> Self {
        Self {
            responses,
            default_questions: vec![placeholder_question()],
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same questions.
    pub fn with_fixed_questions(questions: Vec<Question>) -> Self {
        Self {
            responses: HashMap::new(),
            default_questions: questions,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Get the number of calls made to this generator.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this generator.
    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

fn placeholder_question() -> Question {
    Question {
        question: "Kas yra svarbiausias dalykas apie šią temą?".into(),
        kind: QuestionKind::Short,
        options: vec![],
        correct: "Bendras atsakymas".into(),
        explanation: None,
    }
}

#[async_trait]
impl QuestionGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap() = Some(request.clone());

        let questions = self
            .responses
            .iter()
            .find(|(key, _)| request.topic.contains(key.as_str()))
            .map(|(_, qs)| qs.clone())
            .unwrap_or_else(|| self.default_questions.clone());

        let content = serde_json::to_string(&questions)?;
        let token_count = (content.len() / 4) as u32; // Rough estimate

        Ok(GenerateResponse {
            content,
            questions,
            model: request.model.clone(),
            token_usage: TokenUsage {
                prompt_tokens: (request.topic.len() / 4) as u32,
                completion_tokens: token_count,
                total_tokens: (request.topic.len() / 4) as u32 + token_count,
                estimated_cost_usd: 0.0,
            },
            latency_ms: 1,
        })
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![ModelInfo {
            id: "mock-model".into(),
            name: "Mock Model".into(),
            provider: "mock".into(),
            max_context: 100_000,
            cost_per_1k_input: 0.0,
            cost_per_1k_output: 0.0,
        }]
    }
}
