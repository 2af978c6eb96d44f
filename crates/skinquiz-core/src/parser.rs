//! TOML quiz parser.
//!
//! Loads quiz definitions from TOML files and directories, and validates
//! authored content for problems the engine tolerates but authors should
//! fix (coverage gaps, overlapping bands, missing translations).

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{
    default_language, default_languages, Language, Question, QuizDefinition, QuizOption,
    ResultBand, Text,
};
use crate::scoring::{collapse_runs, total_overflows, uncovered_totals, unreachable_bands};

/// Intermediate TOML structure for parsing quiz files.
#[derive(Debug, Deserialize)]
struct TomlQuizFile {
    quiz: TomlQuizHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
    #[serde(default)]
    results: Vec<TomlResultBand>,
}

#[derive(Debug, Deserialize)]
struct TomlQuizHeader {
    id: String,
    title: TomlText,
    #[serde(default)]
    description: Option<TomlText>,
    #[serde(default)]
    languages: Option<Vec<String>>,
    #[serde(default)]
    default_language: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TomlText {
    Plain(String),
    Localized(BTreeMap<String, String>),
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    text: TomlText,
    #[serde(default)]
    options: Vec<TomlOption>,
}

#[derive(Debug, Deserialize)]
struct TomlOption {
    text: TomlText,
    score: i32,
}

#[derive(Debug, Deserialize)]
struct TomlResultBand {
    min_score: i32,
    max_score: i32,
    text: TomlText,
}

impl TomlText {
    fn into_text(self) -> Result<Text> {
        match self {
            TomlText::Plain(s) => Ok(Text::Plain(s)),
            TomlText::Localized(map) => {
                let entries = map
                    .into_iter()
                    .map(|(code, value)| Ok((code.parse::<Language>()?, value)))
                    .collect::<Result<BTreeMap<_, _>>>()?;
                Ok(Text::Localized(entries))
            }
        }
    }
}

/// Parse a single TOML file into a `QuizDefinition`.
pub fn parse_quiz(path: &Path) -> Result<QuizDefinition> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;

    parse_quiz_str(&content, path)
}

/// Parse a TOML string into a `QuizDefinition` (useful for testing).
pub fn parse_quiz_str(content: &str, source_path: &Path) -> Result<QuizDefinition> {
    let parsed: TomlQuizFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let header = parsed.quiz;
    let languages = match header.languages {
        Some(codes) => codes
            .iter()
            .map(|c| c.parse::<Language>().map_err(anyhow::Error::from))
            .collect::<Result<Vec<_>>>()?,
        None => default_languages(),
    };
    let default_language = header
        .default_language
        .map(|c| c.parse::<Language>())
        .transpose()?
        .unwrap_or_else(default_language);

    let questions = parsed
        .questions
        .into_iter()
        .enumerate()
        .map(|(qi, q)| {
            let options = q
                .options
                .into_iter()
                .map(|o| {
                    Ok(QuizOption {
                        text: o.text.into_text()?,
                        score: o.score,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Question {
                text: q
                    .text
                    .into_text()
                    .with_context(|| format!("question {}", qi + 1))?,
                options,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let results = parsed
        .results
        .into_iter()
        .map(|r| {
            Ok(ResultBand {
                min_score: r.min_score,
                max_score: r.max_score,
                text: r.text.into_text()?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(QuizDefinition {
        id: header.id,
        title: header.title.into_text()?,
        description: header
            .description
            .map(TomlText::into_text)
            .transpose()?
            .unwrap_or_default(),
        languages,
        default_language,
        questions,
        results,
    })
}

/// Recursively load all `.toml` quiz files from a directory.
///
/// Files that fail to parse are logged and skipped. The result is sorted
/// by quiz id so listings are stable.
pub fn load_quiz_directory(dir: &Path) -> Result<Vec<QuizDefinition>> {
    let mut quizzes = load_directory_unsorted(dir)?;
    quizzes.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(quizzes)
}

fn load_directory_unsorted(dir: &Path) -> Result<Vec<QuizDefinition>> {
    let mut quizzes = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            quizzes.extend(load_directory_unsorted(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_quiz(&path) {
                Ok(quiz) => quizzes.push(quiz),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(quizzes)
}

/// Load one quiz file, or every quiz under a directory.
pub fn load_quizzes(path: &Path) -> Result<Vec<QuizDefinition>> {
    if path.is_dir() {
        load_quiz_directory(path)
    } else {
        Ok(vec![parse_quiz(path)?])
    }
}

/// A warning from quiz validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The quiz the warning belongs to.
    pub quiz_id: String,
    /// Zero-based question index (if applicable).
    pub question: Option<usize>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn quiz(quiz: &QuizDefinition, message: impl Into<String>) -> Self {
        Self {
            quiz_id: quiz.id.clone(),
            question: None,
            message: message.into(),
        }
    }

    fn question(quiz: &QuizDefinition, index: usize, message: impl Into<String>) -> Self {
        Self {
            quiz_id: quiz.id.clone(),
            question: Some(index),
            message: message.into(),
        }
    }
}

/// Validate a quiz for authoring issues.
///
/// None of these stop the engine from running the quiz (except an empty
/// question list or band list, which `QuizEngine::initialize` rejects),
/// but each one changes what a user can end up seeing.
pub fn validate_quiz(quiz: &QuizDefinition) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if quiz.questions.is_empty() {
        warnings.push(ValidationWarning::quiz(quiz, "quiz has no questions"));
    }
    if quiz.results.is_empty() {
        warnings.push(ValidationWarning::quiz(quiz, "quiz has no result bands"));
    }

    if quiz.languages.is_empty() {
        warnings.push(ValidationWarning::quiz(quiz, "quiz declares no languages"));
    } else if !quiz.supports(quiz.default_language) {
        warnings.push(ValidationWarning::quiz(
            quiz,
            format!(
                "default language '{}' is not among the declared languages",
                quiz.default_language
            ),
        ));
    }

    for (qi, question) in quiz.questions.iter().enumerate() {
        if question.options.is_empty() {
            warnings.push(ValidationWarning::question(quiz, qi, "question has no options"));
        }

        let mut seen = Vec::new();
        for option in &question.options {
            if seen.contains(&&option.text) {
                warnings.push(ValidationWarning::question(
                    quiz,
                    qi,
                    "duplicate option text; answers will match the first one",
                ));
            }
            seen.push(&option.text);

            if option.score < 0 {
                warnings.push(ValidationWarning::question(
                    quiz,
                    qi,
                    format!("negative option score: {}", option.score),
                ));
            }
        }
    }

    for (bi, band) in quiz.results.iter().enumerate() {
        if band.min_score > band.max_score {
            warnings.push(ValidationWarning::quiz(
                quiz,
                format!(
                    "result band {} is empty (min_score {} > max_score {})",
                    bi + 1,
                    band.min_score,
                    band.max_score
                ),
            ));
        }
    }

    for (i, a) in quiz.results.iter().enumerate() {
        for (j, b) in quiz.results.iter().enumerate().skip(i + 1) {
            let empty = a.min_score > a.max_score || b.min_score > b.max_score;
            if !empty && a.min_score <= b.max_score && b.min_score <= a.max_score {
                warnings.push(ValidationWarning::quiz(
                    quiz,
                    format!(
                        "result bands {} and {} overlap; band {} wins for shared scores",
                        i + 1,
                        j + 1,
                        i + 1
                    ),
                ));
            }
        }
    }

    let overflows = total_overflows(quiz);
    if overflows {
        warnings.push(ValidationWarning::quiz(
            quiz,
            "option scores can push the running total past the i32 range; \
             the engine will refuse to run this quiz",
        ));
    }

    let answerable = quiz.questions.iter().all(|q| !q.options.is_empty());
    if answerable && !overflows && !quiz.results.is_empty() {
        let gaps = uncovered_totals(quiz);
        if !gaps.is_empty() {
            let runs: Vec<String> = collapse_runs(&gaps)
                .into_iter()
                .map(|(lo, hi)| {
                    if lo == hi {
                        lo.to_string()
                    } else {
                        format!("{lo}-{hi}")
                    }
                })
                .collect();
            warnings.push(ValidationWarning::quiz(
                quiz,
                format!(
                    "reachable scores not covered by any band (fall back to band 1): {}",
                    runs.join(", ")
                ),
            ));
        }

        for bi in unreachable_bands(quiz) {
            warnings.push(ValidationWarning::quiz(
                quiz,
                format!("result band {} can never be selected", bi + 1),
            ));
        }
    }

    for &language in &quiz.languages {
        let mut missing = |text: &Text, question: Option<usize>, what: &str| {
            if !text.has(language) {
                warnings.push(ValidationWarning {
                    quiz_id: quiz.id.clone(),
                    question,
                    message: format!("{what} has no '{language}' translation"),
                });
            }
        };

        missing(&quiz.title, None, "title");
        missing(&quiz.description, None, "description");
        for (qi, question) in quiz.questions.iter().enumerate() {
            missing(&question.text, Some(qi), "question text");
            for (oi, option) in question.options.iter().enumerate() {
                missing(&option.text, Some(qi), &format!("option {}", oi + 1));
            }
        }
        for (bi, band) in quiz.results.iter().enumerate() {
            missing(&band.text, None, &format!("result band {}", bi + 1));
        }
    }

    warnings
}

/// Validate a set of quizzes, including cross-quiz checks.
pub fn validate_catalog(quizzes: &[QuizDefinition]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = HashSet::new();
    for quiz in quizzes {
        if !seen_ids.insert(&quiz.id) {
            warnings.push(ValidationWarning::quiz(
                quiz,
                format!("duplicate quiz ID: {}", quiz.id),
            ));
        }
    }

    for quiz in quizzes {
        warnings.extend(validate_quiz(quiz));
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[quiz]
id = "skin-type"
title = { ro = "Ce tip de ten ai?", en = "What is your skin type?" }
description = { ro = "Afla tipul tenului tau.", en = "Find out your skin type." }
languages = ["ro", "en"]
default_language = "ro"

[[questions]]
text = { ro = "Cum se simte tenul dupa spalare?", en = "How does your skin feel after washing?" }

[[questions.options]]
text = { ro = "Tras", en = "Tight" }
score = 0

[[questions.options]]
text = { ro = "Gras", en = "Oily" }
score = 2

[[questions]]
text = { ro = "Cat de des apar imperfectiuni?", en = "How often do you break out?" }

[[questions.options]]
text = { ro = "Rar", en = "Rarely" }
score = 0

[[questions.options]]
text = { ro = "Des", en = "Often" }
score = 2

[[results]]
min_score = 0
max_score = 1
text = { ro = "Ten uscat", en = "Dry skin" }

[[results]]
min_score = 2
max_score = 4
text = { ro = "Ten gras", en = "Oily skin" }
"#;

    #[test]
    fn parse_valid_toml() {
        let quiz = parse_quiz_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(quiz.id, "skin-type");
        assert_eq!(quiz.questions.len(), 2);
        assert_eq!(quiz.questions[0].options.len(), 2);
        assert_eq!(quiz.questions[0].options[1].score, 2);
        assert_eq!(quiz.results.len(), 2);
        assert_eq!(quiz.languages, vec![Language::Ro, Language::En]);
        assert_eq!(
            quiz.localize(&quiz.results[1].text, Language::En).unwrap(),
            "Oily skin"
        );
        assert!(validate_quiz(&quiz).is_empty(), "{:?}", validate_quiz(&quiz));
    }

    #[test]
    fn parse_missing_optional_fields() {
        let toml = r#"
[quiz]
id = "minimal"
title = "Minimal"

[[questions]]
text = "Only question"
options = [{ text = "Yes", score = 1 }]

[[results]]
min_score = 0
max_score = 1
text = "Done"
"#;
        let quiz = parse_quiz_str(toml, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(quiz.default_language, Language::Ro);
        assert_eq!(quiz.languages, Language::ALL.to_vec());
        assert_eq!(quiz.description, Text::default());
        assert_eq!(quiz.questions[0].text, Text::from("Only question"));
    }

    #[test]
    fn parse_unknown_language_key() {
        let toml = r#"
[quiz]
id = "fr"
title = { fr = "Bonjour" }
"#;
        let err = parse_quiz_str(toml, &PathBuf::from("fr.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("unsupported language: fr"));
    }

    #[test]
    fn parse_unknown_declared_language() {
        let toml = r#"
[quiz]
id = "de"
title = "Hallo"
languages = ["de"]
"#;
        assert!(parse_quiz_str(toml, &PathBuf::from("de.toml")).is_err());
    }

    #[test]
    fn parse_quiz_without_questions() {
        let toml = r#"
[quiz]
id = "empty"
title = "Empty"
"#;
        let quiz = parse_quiz_str(toml, &PathBuf::from("empty.toml")).unwrap();
        assert!(quiz.questions.is_empty());
        let warnings = validate_quiz(&quiz);
        assert!(warnings.iter().any(|w| w.message.contains("no questions")));
        assert!(warnings.iter().any(|w| w.message.contains("no result bands")));
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        let result = parse_quiz_str(bad, &PathBuf::from("bad.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn validate_gap_and_overlap() {
        let toml = r#"
[quiz]
id = "gappy"
title = "Gappy"

[[questions]]
text = "Q1"
options = [{ text = "a", score = 0 }, { text = "b", score = 5 }]

[[questions]]
text = "Q2"
options = [{ text = "a", score = 0 }, { text = "b", score = 5 }]

[[results]]
min_score = 0
max_score = 6
text = "low"

[[results]]
min_score = 6
max_score = 8
text = "mid"
"#;
        let quiz = parse_quiz_str(toml, &PathBuf::from("gappy.toml")).unwrap();
        let warnings = validate_quiz(&quiz);
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("not covered") && w.message.ends_with(": 10")));
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("bands 1 and 2 overlap")));
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("band 2 can never be selected")));
    }

    #[test]
    fn validate_overflowing_scores_warns() {
        let toml = r#"
[quiz]
id = "huge"
title = "Huge"

[[questions]]
text = "Q1"
options = [{ text = "a", score = 2000000000 }]

[[questions]]
text = "Q2"
options = [{ text = "a", score = 2000000000 }]

[[results]]
min_score = 0
max_score = 10
text = "r"
"#;
        let quiz = parse_quiz_str(toml, &PathBuf::from("huge.toml")).unwrap();
        let warnings = validate_quiz(&quiz);
        assert_eq!(warnings.len(), 1, "{warnings:?}");
        assert!(warnings[0].message.contains("past the i32 range"));
    }

    #[test]
    fn empty_band_is_not_an_overlap() {
        let quiz = QuizDefinition::new(
            "inverted",
            "Inverted",
            vec![Question::new("Q", vec![QuizOption::new("x", 0), QuizOption::new("y", 10)])],
            vec![ResultBand::new(5, 3, "empty"), ResultBand::new(0, 10, "all")],
        );
        let warnings = validate_quiz(&quiz);
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("result band 1 is empty")));
        assert!(!warnings.iter().any(|w| w.message.contains("overlap")));
    }

    #[test]
    fn validate_duplicate_and_negative_options() {
        let quiz = QuizDefinition::new(
            "dupes",
            "Dupes",
            vec![Question::new(
                "Q",
                vec![QuizOption::new("same", 1), QuizOption::new("same", -2)],
            )],
            vec![ResultBand::new(-2, 1, "r")],
        );
        let warnings = validate_quiz(&quiz);
        assert!(warnings
            .iter()
            .any(|w| w.question == Some(0) && w.message.contains("duplicate option text")));
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("negative option score: -2")));
    }

    #[test]
    fn validate_missing_translation() {
        let quiz = QuizDefinition::new(
            "half",
            Text::localized([(Language::Ro, "Doar romana")]),
            vec![Question::new("Q", vec![QuizOption::new("x", 0)])],
            vec![ResultBand::new(0, 0, "r")],
        );
        let warnings = validate_quiz(&quiz);
        assert!(warnings
            .iter()
            .any(|w| w.message == "title has no 'en' translation"));
    }

    #[test]
    fn validate_default_language_not_declared() {
        let mut quiz = QuizDefinition::new(
            "en-only",
            "English",
            vec![Question::new("Q", vec![QuizOption::new("x", 0)])],
            vec![ResultBand::new(0, 0, "r")],
        );
        quiz.languages = vec![Language::En];
        let warnings = validate_quiz(&quiz);
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("default language 'ro'")));
    }

    #[test]
    fn validate_catalog_duplicate_ids() {
        let quiz = parse_quiz_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_catalog(&[quiz.clone(), quiz]);
        assert!(warnings
            .iter()
            .any(|w| w.message == "duplicate quiz ID: skin-type"));
    }

    #[test]
    fn load_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("skin.toml"), VALID_TOML).unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(
            dir.path().join("nested/minimal.toml"),
            "[quiz]\nid = \"a-minimal\"\ntitle = \"Minimal\"\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.toml"), "not toml {").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let quizzes = load_quiz_directory(dir.path()).unwrap();
        let ids: Vec<&str> = quizzes.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["a-minimal", "skin-type"]);
    }

    #[test]
    fn load_directory_rejects_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("skin.toml");
        std::fs::write(&file, VALID_TOML).unwrap();
        assert!(load_quiz_directory(&file).is_err());
        assert_eq!(load_quizzes(&file).unwrap().len(), 1);
    }
}
