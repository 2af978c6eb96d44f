//! The `skinquiz validate` command.

use std::path::PathBuf;

use anyhow::Result;

use skinquiz_core::parser::{load_quizzes, validate_catalog};

use super::display_title;

pub fn execute(quiz_path: PathBuf) -> Result<()> {
    let quizzes = load_quizzes(&quiz_path)?;

    for quiz in &quizzes {
        println!(
            "Quiz: {} ({} questions, {} result bands)",
            display_title(quiz, quiz.default_language),
            quiz.questions.len(),
            quiz.results.len()
        );
    }

    let warnings = validate_catalog(&quizzes);
    for w in &warnings {
        let prefix = match w.question {
            Some(q) => format!("  [{}#q{}]", w.quiz_id, q + 1),
            None => format!("  [{}]", w.quiz_id),
        };
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("All quizzes valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
