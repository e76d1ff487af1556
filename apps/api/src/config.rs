use anyhow::{Context, Result};

use crate::humanize::HumanizeSettings;

const DEFAULT_OPENROUTER_MODEL: &str = "google/gemini-2.5-flash-lite";
const DEFAULT_HUMANIZER_API_URL: &str = "https://ai-text-humanizer.com/api.php";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub openrouter_api_key: String,
    pub openrouter_model: String,
    pub humanizer_api_url: String,
    pub humanizer_email: String,
    pub humanizer_password: String,
    pub humanizer_timeout_secs: u64,
    pub humanize: HumanizeSettings,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = HumanizeSettings::default();

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            openrouter_api_key: require_env("OPENROUTER_API_KEY")?,
            openrouter_model: std::env::var("OPENROUTER_MODEL")
                .unwrap_or_else(|_| DEFAULT_OPENROUTER_MODEL.to_string()),
            humanizer_api_url: std::env::var("HUMANIZER_API_URL")
                .unwrap_or_else(|_| DEFAULT_HUMANIZER_API_URL.to_string()),
            humanizer_email: require_env("HUMANIZER_EMAIL")?,
            humanizer_password: require_env("HUMANIZER_PASSWORD")?,
            humanizer_timeout_secs: parse_env("HUMANIZER_TIMEOUT_SECS", 30)?,
            humanize: HumanizeSettings {
                chunk_words: parse_env("HUMANIZE_CHUNK_WORDS", defaults.chunk_words)?,
                min_body_words: parse_env("HUMANIZE_MIN_BODY_WORDS", defaults.min_body_words)?,
                expansion_threshold: parse_env(
                    "HUMANIZE_EXPANSION_THRESHOLD",
                    defaults.expansion_threshold,
                )?,
                concurrency: parse_env("HUMANIZE_CONCURRENCY", defaults.concurrency)?.max(1),
            },
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads an optional numeric variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
