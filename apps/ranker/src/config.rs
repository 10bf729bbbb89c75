use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::ranking::settings::ScoringConfig;
use crate::ranking::skills::{SkillMatchMode, SkillVocabulary};

/// Which embedding backend to build at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum EmbedderConfig {
    /// Local all-MiniLM-L6-v2 through fastembed.
    FastEmbed {
        cache_dir: Option<PathBuf>,
        eager_load: bool,
    },
    /// Remote OpenAI-compatible `/embeddings` endpoint.
    Http {
        url: String,
        model: String,
        api_key: Option<String>,
        timeout: Duration,
    },
}

/// Application configuration loaded from environment variables.
/// Fails at startup on malformed values or a missing embedder URL.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub embedder: EmbedderConfig,
    pub scoring: ScoringConfig,
    pub resume_timeout: Duration,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key → value source.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let embedder = match lookup(&get, "EMBEDDER_BACKEND")
            .unwrap_or_else(|| "fastembed".to_string())
            .to_lowercase()
            .as_str()
        {
            "fastembed" | "local" => EmbedderConfig::FastEmbed {
                cache_dir: lookup(&get, "EMBEDDER_CACHE_DIR").map(PathBuf::from),
                eager_load: parse_var(&get, "EMBEDDER_EAGER_LOAD", true)?,
            },
            "http" => EmbedderConfig::Http {
                url: require_var(&get, "EMBEDDER_URL")?,
                model: lookup(&get, "EMBEDDER_MODEL")
                    .unwrap_or_else(|| "all-MiniLM-L6-v2".to_string()),
                api_key: lookup(&get, "EMBEDDER_API_KEY"),
                timeout: Duration::from_secs(parse_var(&get, "EMBEDDER_TIMEOUT_SECS", 30)?),
            },
            other => {
                return Err(anyhow!(
                    "EMBEDDER_BACKEND must be 'fastembed' or 'http', got '{other}'"
                ))
            }
        };

        let defaults = ScoringConfig::default();
        let scoring = ScoringConfig {
            vocabulary: lookup(&get, "SKILL_VOCABULARY")
                .map(|list| SkillVocabulary::new(list.split(',')))
                .unwrap_or(defaults.vocabulary),
            skill_match: parse_var(&get, "SKILL_MATCH_MODE", SkillMatchMode::Substring)?,
            experience_bonus_per_year: parse_var(
                &get,
                "EXPERIENCE_BONUS_PER_YEAR",
                defaults.experience_bonus_per_year,
            )?,
            experience_bonus_cap: parse_var(
                &get,
                "EXPERIENCE_BONUS_CAP",
                defaults.experience_bonus_cap,
            )?,
            score_precision: parse_var(&get, "SCORE_PRECISION", defaults.score_precision)?,
            bands: defaults.bands,
        };
        scoring
            .validate()
            .map_err(|e| anyhow!("invalid scoring configuration: {e}"))?;

        let resume_timeout_secs: u64 = parse_var(&get, "RESUME_TIMEOUT_SECS", 60)?;
        if resume_timeout_secs == 0 {
            return Err(anyhow!("RESUME_TIMEOUT_SECS must be greater than 0"));
        }

        Ok(Config {
            port: parse_var(&get, "PORT", 8080)?,
            rust_log: lookup(&get, "RUST_LOG").unwrap_or_else(|| "info".to_string()),
            embedder,
            scoring,
            resume_timeout: Duration::from_secs(resume_timeout_secs),
            max_upload_bytes: parse_var(&get, "MAX_UPLOAD_BYTES", 25 * 1024 * 1024)?,
        })
    }
}

/// Returns the trimmed value, treating blank as unset.
fn lookup(get: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    get(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require_var(get: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    lookup(get, key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_var<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(get, key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow!("{key} has invalid value '{raw}': {e}")),
        None => Ok(default),
    }
}
