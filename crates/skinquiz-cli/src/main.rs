//! skinquiz CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "skinquiz", version, about = "Skincare quiz runner and validator")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a quiz interactively
    Take {
        /// Path to a quiz .toml file or a directory of quizzes
        #[arg(long)]
        quiz: Option<PathBuf>,

        /// Quiz ID (required when the path holds several quizzes)
        #[arg(long)]
        id: Option<String>,

        /// Display language (ro, en)
        #[arg(long)]
        lang: Option<String>,

        /// Directory to save the outcome JSON in
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Score a full answer sequence without prompting
    Score {
        /// Path to a quiz .toml file or a directory of quizzes
        #[arg(long)]
        quiz: Option<PathBuf>,

        /// Quiz ID (required when the path holds several quizzes)
        #[arg(long)]
        id: Option<String>,

        /// 1-based option numbers, one per question (e.g. "1,3,2")
        #[arg(long)]
        answers: String,

        /// Display language (ro, en)
        #[arg(long)]
        lang: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate quiz TOML files
    Validate {
        /// Path to quiz file or directory
        #[arg(long)]
        quiz: PathBuf,
    },

    /// List available quizzes
    List {
        /// Directory of quizzes (defaults to the configured quizzes_dir)
        #[arg(long)]
        quiz: Option<PathBuf>,

        /// Display language (ro, en)
        #[arg(long)]
        lang: Option<String>,
    },

    /// Create starter config and example quiz
    Init,
}

fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("skinquiz=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Take {
            quiz,
            id,
            lang,
            output,
        } => commands::take::execute(quiz, id, lang, output, cli.config),
        Commands::Score {
            quiz,
            id,
            answers,
            lang,
            format,
        } => commands::score::execute(quiz, id, answers, lang, format, cli.config),
        Commands::Validate { quiz } => commands::validate::execute(quiz),
        Commands::List { quiz, lang } => commands::list::execute(quiz, lang, cli.config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
