//! testu-providers — AI question generator integrations.
//!
//! Implements the `QuestionGenerator` trait for the Groq chat-completions
//! API, plus a mock generator for tests, and the configuration layer that
//! wires providers up.

pub mod config;
pub mod error;
pub mod groq;
pub mod mock;

pub use config::{create_provider, load_config, load_config_from, ProviderConfig, TestuConfig};
pub use error::ProviderError;
pub use groq::fallback_questions;
