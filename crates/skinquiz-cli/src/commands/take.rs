//! The `skinquiz take` command.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;

use skinquiz_core::report::QuizOutcome;
use skinquiz_core::{Language, QuizEngine, QuizError};

use super::{save_outcome, select_language, select_quiz, write_outcome};
use crate::config::load_config_from;

/// How an interactive session ended.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionEnd {
    Completed,
    Abandoned,
}

pub fn execute(
    quiz_path: Option<PathBuf>,
    id: Option<String>,
    lang: Option<String>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let quiz = select_quiz(quiz_path, id.as_deref(), &config)?;
    let language = select_language(&quiz, lang.as_deref(), &config)?;
    let mut engine = QuizEngine::initialize(&quiz)?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match run_session(&mut engine, language, &mut stdin.lock(), &mut out)? {
        SessionEnd::Completed => {
            let outcome = QuizOutcome::from_engine(&engine, language)?;
            write_outcome(&mut out, &outcome)?;
            if let Some(dir) = output.or(config.output_dir) {
                save_outcome(&outcome, &dir)?;
            }
        }
        SessionEnd::Abandoned => {
            writeln!(out, "\nQuiz abandoned.")?;
        }
    }

    Ok(())
}

/// Prompt for answers until the quiz is completed or the user quits.
///
/// Input lines: an option number (1-based), `b`/`back` to revisit the
/// previous question, `q`/`quit` to stop. End of input counts as quitting.
pub fn run_session(
    engine: &mut QuizEngine<'_>,
    language: Language,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<SessionEnd> {
    let quiz = engine.definition();
    writeln!(out, "{}", quiz.localize(&quiz.title, language)?)?;
    let description = quiz.localize(&quiz.description, language)?;
    if !description.is_empty() {
        writeln!(out, "{description}")?;
    }

    let mut line = String::new();
    while !engine.is_completed() {
        let question = engine.current_question()?;
        let number = engine.state().current_index() + 1;
        writeln!(out)?;
        writeln!(
            out,
            "[{number}/{}] ({:.0}%) {}",
            engine.len(),
            engine.progress_fraction() * 100.0,
            quiz.localize(&question.text, language)?
        )?;
        for (i, option) in question.options.iter().enumerate() {
            writeln!(out, "  {}) {}", i + 1, quiz.localize(&option.text, language)?)?;
        }
        write!(out, "Answer (number, b = back, q = quit): ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(SessionEnd::Abandoned);
        }

        let step = match line.trim() {
            "q" | "quit" => return Ok(SessionEnd::Abandoned),
            "b" | "back" => engine.retract_last_answer().map(|_| ()),
            choice => match choice.parse::<usize>() {
                Ok(n) if n >= 1 => engine.apply_answer_at(n - 1).map(|_| ()),
                _ => {
                    writeln!(out, "  Please enter an option number.")?;
                    continue;
                }
            },
        };

        if let Err(e) = step {
            report_navigation_error(out, e)?;
        }
    }

    Ok(SessionEnd::Completed)
}

/// Navigation mistakes are shown and the prompt repeats; anything else
/// aborts the session.
fn report_navigation_error(out: &mut impl Write, error: QuizError) -> Result<()> {
    if error.is_navigation_error() {
        writeln!(out, "  {error}")?;
        Ok(())
    } else {
        Err(error.into())
    }
}
