//! CLI configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use skinquiz_core::Language;

/// Top-level skinquiz configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkinquizConfig {
    /// Directory searched for quiz files when `--quiz` is not given.
    #[serde(default = "default_quizzes_dir")]
    pub quizzes_dir: PathBuf,
    /// Language used when `--lang` is not given.
    #[serde(default = "default_language")]
    pub default_language: Language,
    /// Where completed outcomes are saved (None = don't save).
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

fn default_quizzes_dir() -> PathBuf {
    PathBuf::from("./quizzes")
}

fn default_language() -> Language {
    Language::Ro
}

impl Default for SkinquizConfig {
    fn default() -> Self {
        Self {
            quizzes_dir: default_quizzes_dir(),
            default_language: default_language(),
            output_dir: None,
        }
    }
}

/// Expand `${VAR}` references in a string. Unset variables expand to "".
///
/// Substituted values are copied as-is and never rescanned, so a value
/// that itself contains `${...}` is left literal.
fn resolve_env_vars(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + 2 + len];
        out.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + 2 + len + 1..];
    }
    out.push_str(rest);
    out
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `skinquiz.toml` in the current directory
/// 2. `~/.config/skinquiz/config.toml`
///
/// `SKINQUIZ_LANG` overrides `default_language`.
pub fn load_config_from(path: Option<&Path>) -> Result<SkinquizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("skinquiz.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<SkinquizConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => SkinquizConfig::default(),
    };

    if let Ok(code) = std::env::var("SKINQUIZ_LANG") {
        config.default_language = code
            .parse()
            .with_context(|| format!("invalid SKINQUIZ_LANG: {code}"))?;
    }

    config.quizzes_dir = resolve_path(&config.quizzes_dir);
    config.output_dir = config.output_dir.as_deref().map(resolve_path);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("skinquiz"))
}
