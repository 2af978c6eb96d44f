//! The `skinquiz score` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use skinquiz_core::report::QuizOutcome;
use skinquiz_core::QuizEngine;

use super::{select_language, select_quiz, write_outcome};
use crate::config::load_config_from;

pub fn execute(
    quiz_path: Option<PathBuf>,
    id: Option<String>,
    answers: String,
    lang: Option<String>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let quiz = select_quiz(quiz_path, id.as_deref(), &config)?;
    let language = select_language(&quiz, lang.as_deref(), &config)?;

    let choices = parse_answers(&answers)?;
    anyhow::ensure!(
        choices.len() == quiz.questions.len(),
        "quiz '{}' has {} questions but {} answers were given",
        quiz.id,
        quiz.questions.len(),
        choices.len()
    );

    let mut engine = QuizEngine::initialize(&quiz)?;
    for (question, &choice) in choices.iter().enumerate() {
        engine
            .apply_answer_at(choice - 1)
            .with_context(|| format!("answer {choice} to question {}", question + 1))?;
    }

    let outcome = QuizOutcome::from_engine(&engine, language)?;

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        _ => {
            write_outcome(&mut std::io::stdout().lock(), &outcome)?;
        }
    }

    Ok(())
}

/// Parse "1,3,2" into 1-based option numbers.
fn parse_answers(s: &str) -> Result<Vec<usize>> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(anyhow::anyhow!("invalid answer: '{part}' (expected an option number)")),
        })
        .collect()
}
