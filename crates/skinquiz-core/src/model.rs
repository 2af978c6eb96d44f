//! Core data model types for skinquiz.
//!
//! A [`QuizDefinition`] is static authored content: ordered questions, each
//! with scored options, and an ordered list of score bands mapping a total
//! to a recommendation. Definitions are never mutated by the engine, so one
//! instance can back any number of concurrent quiz runs.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// Languages the brand publishes content in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ro,
    En,
}

impl Language {
    /// Every language, in declaration order.
    pub const ALL: [Language; 2] = [Language::Ro, Language::En];

    /// ISO 639-1 code.
    pub fn code(self) -> &'static str {
        match self {
            Language::Ro => "ro",
            Language::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = QuizError;

    /// Accepts bare codes and region-qualified tags (`en-GB`, `ro_RO`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_lowercase();
        match primary.as_str() {
            "ro" => Ok(Language::Ro),
            "en" => Ok(Language::En),
            _ => Err(QuizError::UnsupportedLanguage(s.trim().to_string())),
        }
    }
}

/// Authored text: either a single language-independent string or one
/// string per language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Text {
    Plain(String),
    Localized(BTreeMap<Language, String>),
}

impl Text {
    /// Build a localized text from `(language, value)` pairs.
    pub fn localized<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Language, S)>,
        S: Into<String>,
    {
        Text::Localized(entries.into_iter().map(|(l, s)| (l, s.into())).collect())
    }

    /// Look up the variant for `language`, falling back to `fallback`.
    /// Plain text is returned for any language.
    pub fn get(&self, language: Language, fallback: Language) -> Option<&str> {
        match self {
            Text::Plain(s) => Some(s.as_str()),
            Text::Localized(map) => map
                .get(&language)
                .or_else(|| map.get(&fallback))
                .map(String::as_str),
        }
    }

    /// Whether a variant exists for exactly this language (no fallback).
    pub fn has(&self, language: Language) -> bool {
        match self {
            Text::Plain(_) => true,
            Text::Localized(map) => map.contains_key(&language),
        }
    }

    /// Whether every variant is blank.
    pub fn is_empty(&self) -> bool {
        match self {
            Text::Plain(s) => s.trim().is_empty(),
            Text::Localized(map) => map.values().all(|s| s.trim().is_empty()),
        }
    }
}

impl Default for Text {
    fn default() -> Self {
        Text::Plain(String::new())
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Text::Plain(s.to_string())
    }
}

impl From<String> for Text {
    fn from(s: String) -> Self {
        Text::Plain(s)
    }
}

/// A selectable answer and the points it contributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub text: Text,
    pub score: i32,
}

impl QuizOption {
    pub fn new(text: impl Into<Text>, score: i32) -> Self {
        Self {
            text: text.into(),
            score,
        }
    }
}

/// A single question with its ordered options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: Text,
    #[serde(default)]
    pub options: Vec<QuizOption>,
}

impl Question {
    pub fn new(text: impl Into<Text>, options: Vec<QuizOption>) -> Self {
        Self {
            text: text.into(),
            options,
        }
    }

    /// Find the authored option whose text matches `text`.
    pub fn find_option(&self, text: &Text) -> Option<&QuizOption> {
        self.options.iter().find(|o| &o.text == text)
    }

    /// Highest score any option of this question awards.
    pub fn max_score(&self) -> Option<i32> {
        self.options.iter().map(|o| o.score).max()
    }

    /// Lowest score any option of this question awards.
    pub fn min_score(&self) -> Option<i32> {
        self.options.iter().map(|o| o.score).min()
    }
}

/// An inclusive score interval mapped to a recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultBand {
    pub min_score: i32,
    pub max_score: i32,
    pub text: Text,
}

impl ResultBand {
    pub fn new(min_score: i32, max_score: i32, text: impl Into<Text>) -> Self {
        Self {
            min_score,
            max_score,
            text: text.into(),
        }
    }

    /// Whether `score` lies in `[min_score, max_score]`.
    pub fn contains(&self, score: i32) -> bool {
        self.min_score <= score && score <= self.max_score
    }
}

/// A complete authored quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizDefinition {
    /// Stable identifier (e.g. "skin-type").
    pub id: String,
    pub title: Text,
    #[serde(default)]
    pub description: Text,
    /// Languages this quiz is offered in.
    #[serde(default = "default_languages")]
    pub languages: Vec<Language>,
    /// Language used when a localized text lacks the requested one.
    #[serde(default = "default_language")]
    pub default_language: Language,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub results: Vec<ResultBand>,
}

pub(crate) fn default_languages() -> Vec<Language> {
    Language::ALL.to_vec()
}

pub(crate) fn default_language() -> Language {
    Language::Ro
}

impl QuizDefinition {
    /// Create a definition offered in every brand language.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<Text>,
        questions: Vec<Question>,
        results: Vec<ResultBand>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: Text::default(),
            languages: default_languages(),
            default_language: default_language(),
            questions,
            results,
        }
    }

    /// Whether this quiz is offered in `language`.
    pub fn supports(&self, language: Language) -> bool {
        self.languages.contains(&language)
    }

    /// Resolve `text` for display in `language`.
    ///
    /// Plain text is returned unchanged. Localized text falls back to the
    /// quiz's default language when the requested variant is absent.
    pub fn localize<'t>(&self, text: &'t Text, language: Language) -> Result<&'t str, QuizError> {
        if !self.supports(language) {
            return Err(QuizError::UnsupportedLanguage(language.to_string()));
        }
        text.get(language, self.default_language)
            .ok_or_else(|| QuizError::MissingTranslation {
                language: language.to_string(),
                default: self.default_language.to_string(),
            })
    }

    /// Parse a language code and check that this quiz offers it.
    pub fn language(&self, code: &str) -> Result<Language, QuizError> {
        let language: Language = code.parse()?;
        if self.supports(language) {
            Ok(language)
        } else {
            Err(QuizError::UnsupportedLanguage(code.to_string()))
        }
    }
}
