//! testu-core — Data model, answer grading, and score history.
//!
//! This crate defines the fundamental types, the grading engine, and the
//! history bookkeeping that the rest of the testu system builds on.

pub mod grader;
pub mod history;
pub mod model;
pub mod parser;
pub mod score;
pub mod statistics;
pub mod traits;
