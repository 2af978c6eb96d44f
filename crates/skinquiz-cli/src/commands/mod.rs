//! Subcommand implementations and the quiz/language selection they share.

pub mod init;
pub mod list;
pub mod score;
pub mod take;
pub mod validate;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;

use skinquiz_core::parser;
use skinquiz_core::report::QuizOutcome;
use skinquiz_core::{Language, QuizDefinition};

use crate::config::SkinquizConfig;

/// Load the quiz named by `--quiz` / `--id`, falling back to the configured
/// quizzes directory.
pub fn select_quiz(
    quiz_path: Option<PathBuf>,
    id: Option<&str>,
    config: &SkinquizConfig,
) -> Result<QuizDefinition> {
    let path = quiz_path.unwrap_or_else(|| config.quizzes_dir.clone());

    if !path.is_dir() {
        let quiz = parser::parse_quiz(&path)?;
        if let Some(id) = id {
            anyhow::ensure!(
                quiz.id == id,
                "{} contains quiz '{}', not '{id}'",
                path.display(),
                quiz.id
            );
        }
        return Ok(quiz);
    }

    let mut quizzes = parser::load_quiz_directory(&path)?;
    match id {
        Some(id) => match quizzes.iter().position(|q| q.id == id) {
            Some(index) => Ok(quizzes.swap_remove(index)),
            None => anyhow::bail!(
                "quiz '{id}' not found in {}. Available: {}",
                path.display(),
                available_ids(&quizzes)
            ),
        },
        None if quizzes.len() == 1 => Ok(quizzes.remove(0)),
        None if quizzes.is_empty() => anyhow::bail!("no quizzes found in {}", path.display()),
        None => anyhow::bail!(
            "{} holds {} quizzes; pass --id (available: {})",
            path.display(),
            quizzes.len(),
            available_ids(&quizzes)
        ),
    }
}

fn available_ids(quizzes: &[QuizDefinition]) -> String {
    quizzes
        .iter()
        .map(|q| q.id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Pick the display language: `--lang` if given (must be offered by the
/// quiz), else the configured default if the quiz offers it, else the
/// quiz's own default.
pub fn select_language(
    quiz: &QuizDefinition,
    lang: Option<&str>,
    config: &SkinquizConfig,
) -> Result<Language> {
    if let Some(code) = lang {
        return Ok(quiz.language(code)?);
    }
    if quiz.supports(config.default_language) {
        Ok(config.default_language)
    } else {
        Ok(quiz.default_language)
    }
}

/// Title for listings; falls back to the quiz id when it can't be localized.
pub fn display_title(quiz: &QuizDefinition, language: Language) -> String {
    quiz.localize(&quiz.title, language)
        .map(str::to_string)
        .unwrap_or_else(|_| quiz.id.clone())
}

/// Print a completed outcome as human-readable text.
pub fn write_outcome(out: &mut impl Write, outcome: &QuizOutcome) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", outcome.quiz_title)?;
    writeln!(
        out,
        "Score: {}/{} (band {}-{})",
        outcome.total_score, outcome.max_possible_score, outcome.min_score, outcome.max_score
    )?;
    writeln!(out)?;
    writeln!(out, "{}", outcome.result_text)?;
    Ok(())
}

/// Save `outcome` under `dir` and report where it went.
pub fn save_outcome(outcome: &QuizOutcome, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(outcome.file_name());
    outcome.save_json(&path)?;
    eprintln!("Outcome saved to: {}", path.display());
    Ok(path)
}
