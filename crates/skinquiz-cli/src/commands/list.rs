//! The `skinquiz list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use skinquiz_core::parser::load_quiz_directory;
use skinquiz_core::scoring::score_bounds;
use skinquiz_core::Language;

use super::display_title;
use crate::config::load_config_from;

pub fn execute(
    dir: Option<PathBuf>,
    lang: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let dir = dir.unwrap_or(config.quizzes_dir);
    let language = match lang {
        Some(code) => code.parse::<Language>()?,
        None => config.default_language,
    };

    let quizzes = load_quiz_directory(&dir)?;
    if quizzes.is_empty() {
        println!(
            "No quizzes found in {}. Run `skinquiz init` to create an example.",
            dir.display()
        );
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Questions", "Bands", "Score range", "Languages"]);

    for quiz in &quizzes {
        let range = match score_bounds(quiz) {
            Some((lo, hi)) => format!("{lo}-{hi}"),
            None => "-".to_string(),
        };
        let languages = quiz
            .languages
            .iter()
            .map(|l| l.code())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(&quiz.id),
            Cell::new(display_title(quiz, language)),
            Cell::new(quiz.questions.len()),
            Cell::new(quiz.results.len()),
            Cell::new(range),
            Cell::new(languages),
        ]);
    }

    println!("{table}");
    Ok(())
}
