//! skinquiz-core — Quiz scoring engine, data model, and catalog parsing.
//!
//! This crate defines the quiz data model, the engine that walks a user
//! through a quiz and resolves the final score to a recommendation, and
//! the TOML loader and validator for authored quiz content.

pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod scoring;

pub use engine::{QuizEngine, QuizRunState, Resolution};
pub use error::QuizError;
pub use model::{Language, Question, QuizDefinition, QuizOption, ResultBand, Text};
