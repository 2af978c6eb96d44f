//! Quiz outcome record with JSON persistence.
//!
//! A [`QuizOutcome`] is what a completed run hands to downstream consumers
//! (report rendering, email dispatch). It carries already-localized text so
//! consumers never need the quiz definition.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::QuizEngine;
use crate::model::Language;
use crate::scoring::score_bounds;

/// The result of one completed quiz run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizOutcome {
    /// Unique session identifier.
    pub id: Uuid,
    pub quiz_id: String,
    /// Quiz title in `language`.
    pub quiz_title: String,
    pub language: Language,
    pub total_score: i32,
    /// Highest total the quiz can produce.
    pub max_possible_score: i32,
    /// Score of each answer, in question order.
    pub answer_history: Vec<i32>,
    /// Recommendation text in `language`.
    pub result_text: String,
    /// Inclusive range of the band that was selected.
    pub min_score: i32,
    pub max_score: i32,
    /// `true` when no band contained the score and the first band was used.
    pub fallback: bool,
    /// When the run was completed.
    pub completed_at: DateTime<Utc>,
}

impl QuizOutcome {
    /// Build the outcome of a completed run, localized to `language`.
    pub fn from_engine(engine: &QuizEngine<'_>, language: Language) -> Result<Self> {
        let quiz = engine.definition();
        let resolution = engine.resolution()?;
        let state = engine.state();

        Ok(Self {
            id: Uuid::new_v4(),
            quiz_id: quiz.id.clone(),
            quiz_title: quiz.localize(&quiz.title, language)?.to_string(),
            language,
            total_score: state.total_score(),
            max_possible_score: score_bounds(quiz).map(|(_, hi)| hi).unwrap_or_default(),
            answer_history: state.answer_history().to_vec(),
            result_text: quiz.localize(&resolution.band.text, language)?.to_string(),
            min_score: resolution.band.min_score,
            max_score: resolution.band.max_score,
            fallback: !resolution.matched,
            completed_at: Utc::now(),
        })
    }

    /// Total score as a fraction of the maximum possible score.
    pub fn score_ratio(&self) -> f64 {
        if self.max_possible_score <= 0 {
            return 0.0;
        }
        (self.total_score as f64 / self.max_possible_score as f64).clamp(0.0, 1.0)
    }

    /// Save the outcome as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize outcome")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write outcome to {}", path.display()))?;
        Ok(())
    }

    /// Load an outcome from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read outcome from {}", path.display()))?;
        let outcome: QuizOutcome =
            serde_json::from_str(&content).context("failed to parse outcome JSON")?;
        Ok(outcome)
    }

    /// File name used when saving into an output directory.
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}.json",
            self.quiz_id,
            self.completed_at.format("%Y-%m-%dT%H%M%S")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Question, QuizDefinition, QuizOption, ResultBand, Text};

    fn quiz() -> QuizDefinition {
        QuizDefinition::new(
            "hydration",
            Text::localized([(Language::Ro, "Hidratare"), (Language::En, "Hydration")]),
            vec![
                Question::new("Q1", vec![QuizOption::new("a", 0), QuizOption::new("b", 3)]),
                Question::new("Q2", vec![QuizOption::new("a", 1), QuizOption::new("b", 2)]),
            ],
            vec![
                ResultBand::new(
                    0,
                    2,
                    Text::localized([
                        (Language::Ro, "Bine hidratat"),
                        (Language::En, "Well hydrated"),
                    ]),
                ),
                ResultBand::new(
                    3,
                    5,
                    Text::localized([(Language::Ro, "Deshidratat"), (Language::En, "Dehydrated")]),
                ),
            ],
        )
    }

    #[test]
    fn outcome_from_completed_run() {
        let quiz = quiz();
        let mut engine = QuizEngine::initialize(&quiz).unwrap();
        engine.apply_answer_at(1).unwrap();
        engine.apply_answer_at(1).unwrap();

        let outcome = QuizOutcome::from_engine(&engine, Language::En).unwrap();
        assert_eq!(outcome.quiz_title, "Hydration");
        assert_eq!(outcome.total_score, 5);
        assert_eq!(outcome.max_possible_score, 5);
        assert_eq!(outcome.answer_history, vec![3, 2]);
        assert_eq!(outcome.result_text, "Dehydrated");
        assert_eq!((outcome.min_score, outcome.max_score), (3, 5));
        assert!(!outcome.fallback);
        assert!((outcome.score_ratio() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn outcome_requires_completion() {
        let quiz = quiz();
        let mut engine = QuizEngine::initialize(&quiz).unwrap();
        engine.apply_answer_at(0).unwrap();
        let err = QuizOutcome::from_engine(&engine, Language::Ro).unwrap_err();
        assert!(err.to_string().contains("not completed"));
    }

    #[test]
    fn outcome_rejects_unsupported_language() {
        let mut quiz = quiz();
        quiz.languages = vec![Language::Ro];
        let mut engine = QuizEngine::initialize(&quiz).unwrap();
        engine.apply_answer_at(0).unwrap();
        engine.apply_answer_at(0).unwrap();
        assert!(QuizOutcome::from_engine(&engine, Language::En).is_err());
        let outcome = QuizOutcome::from_engine(&engine, Language::Ro).unwrap();
        assert_eq!(outcome.result_text, "Bine hidratat");
    }

    #[test]
    fn save_and_load_json() {
        let quiz = quiz();
        let mut engine = QuizEngine::initialize(&quiz).unwrap();
        engine.apply_answer_at(0).unwrap();
        engine.apply_answer_at(0).unwrap();
        let outcome = QuizOutcome::from_engine(&engine, Language::Ro).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join(outcome.file_name());
        outcome.save_json(&path).unwrap();
        let loaded = QuizOutcome::load_json(&path).unwrap();
        assert_eq!(loaded, outcome);
        assert!(outcome.file_name().starts_with("hydration-"));
    }
}
