//! Groq API provider implementation.
//!
//! Groq exposes an OpenAI-compatible chat-completions endpoint; we ask the
//! model for a JSON array of quiz questions in Lithuanian and parse what
//! comes back.

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use testu_core::model::{Question, QuestionKind};
use testu_core::parser::parse_questions;
use testu_core::traits::{
    GenerateRequest, GenerateResponse, ModelInfo, QuestionGenerator, TokenUsage,
};

use crate::error::ProviderError;

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Groq chat-completions provider.
pub struct GroqProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GroqProvider {
    pub fn new(api_key: &str, base_url: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client,
        }
    }
}

/// The generation prompt: ask for a JSON-only response mixing
/// multiple_choice and short questions, in Lithuanian.
fn build_prompt(request: &GenerateRequest) -> String {
    format!(
        r#"Sugeneruok {count} {difficulty} klausimus apie "{topic}" lietuvių kalba.

Grąžink TIKTAI JSON formatą be jokio kito teksto:
[
  {{
    "question": "klausimo tekstas",
    "type": "multiple_choice",
    "options": ["A) variantas1", "B) variantas2", "C) variantas3", "D) variantas4"],
    "correct": "A",
    "explanation": "kodėl šis atsakymas teisingas"
  }},
  {{
    "question": "klausimo tekstas",
    "type": "short",
    "correct": "trumpas teisingas atsakymas",
    "explanation": "papildomas paaiškinimas"
  }}
]

Generuok įvairius klausimus - maišyk multiple_choice ir short tipo klausimus."#,
        count = request.num_questions,
        difficulty = request.difficulty.in_lithuanian(),
        topic = request.topic,
    )
}

/// A single generic question used when generation fails outright, so the
/// user still gets a quiz instead of an error screen.
pub fn fallback_questions(topic: &str) -> Vec<Question> {
    vec![Question {
        question: format!("Kas yra svarbiausias dalykas apie {topic}?"),
        kind: QuestionKind::Short,
        options: vec![],
        correct: "Bendras atsakymas".into(),
        explanation: Some("Tai pavyzdinis klausimas".into()),
    }]
}

#[derive(Serialize)]
struct GroqRequest {
    model: String,
    max_tokens: u32,
    temperature: f64,
    messages: Vec<GroqMessage>,
}

#[derive(Serialize)]
struct GroqMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct GroqResponse {
    choices: Vec<GroqChoice>,
    #[serde(default)]
    usage: GroqUsage,
    model: String,
}

#[derive(Deserialize)]
struct GroqChoice {
    message: GroqChoiceMessage,
}

#[derive(Deserialize)]
struct GroqChoiceMessage {
    content: String,
}

#[derive(Deserialize, Default)]
struct GroqUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[async_trait]
impl QuestionGenerator for GroqProvider {
    fn name(&self) -> &str {
        "groq"
    }

    #[instrument(skip(self, request), fields(model = %request.model, topic = %request.topic))]
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        let start = Instant::now();

        let body = GroqRequest {
            model: request.model.clone(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            messages: vec![GroqMessage {
                role: "user".to_string(),
                content: build_prompt(request),
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(DEFAULT_TIMEOUT_SECS)
                } else {
                    ProviderError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(ProviderError::RateLimited {
                retry_after_ms: retry_after,
            }
            .into());
        }
        if status == 401 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::AuthenticationFailed(body).into());
        }
        if status == 404 {
            return Err(ProviderError::ModelNotFound(request.model.clone()).into());
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status,
                message: body,
            }
            .into());
        }

        let api_response: GroqResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status: 0,
                message: format!("failed to parse response: {e}"),
            })?;

        let latency_ms = start.elapsed().as_millis() as u64;
        let content = api_response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default();
        let questions = parse_questions(&content)?;

        // gpt-oss-120b on Groq: $0.15/$0.75 per 1M tokens
        let estimated_cost = (api_response.usage.prompt_tokens as f64 * 0.15
            + api_response.usage.completion_tokens as f64 * 0.75)
            / 1_000_000.0;

        Ok(GenerateResponse {
            content,
            questions,
            model: api_response.model,
            token_usage: TokenUsage {
                prompt_tokens: api_response.usage.prompt_tokens,
                completion_tokens: api_response.usage.completion_tokens,
                total_tokens: api_response.usage.total_tokens,
                estimated_cost_usd: estimated_cost,
            },
            latency_ms,
        })
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![
            ModelInfo {
                id: "openai/gpt-oss-120b".into(),
                name: "GPT-OSS 120B".into(),
                provider: "groq".into(),
                max_context: 131_072,
                cost_per_1k_input: 0.00015,
                cost_per_1k_output: 0.00075,
            },
            ModelInfo {
                id: "openai/gpt-oss-20b".into(),
                name: "GPT-OSS 20B".into(),
                provider: "groq".into(),
                max_context: 131_072,
                cost_per_1k_input: 0.0001,
                cost_per_1k_output: 0.0005,
            },
            ModelInfo {
                id: "llama-3.3-70b-versatile".into(),
                name: "Llama 3.3 70B Versatile".into(),
                provider: "groq".into(),
                max_context: 131_072,
                cost_per_1k_input: 0.00059,
                cost_per_1k_output: 0.00079,
            },
        ]
    }
}
