use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use evaluator::ollama_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

const DEFAULT_WEIGHT_DEBOUNCE_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluatorBackend {
    Ollama,
    Remote,
}

impl FromStr for EvaluatorBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "remote" => Ok(Self::Remote),
            other => bail!("Unknown EVALUATOR_BACKEND '{}', expected 'ollama' or 'remote'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub api_keys: String,
    pub evaluator_backend: EvaluatorBackend,
    pub ollama_url: String,
    pub ollama_model: String,
    pub evaluation_service_url: Option<String>,
    pub weight_debounce: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let evaluator_backend = std::env::var("EVALUATOR_BACKEND")
            .unwrap_or_else(|_| "ollama".to_string())
            .parse()?;
        let evaluation_service_url = std::env::var("EVALUATION_SERVICE_URL").ok();

        if evaluator_backend == EvaluatorBackend::Remote && evaluation_service_url.is_none() {
            bail!("EVALUATION_SERVICE_URL is required when EVALUATOR_BACKEND=remote");
        }

        let debounce_ms = match std::env::var("WEIGHT_DEBOUNCE_MS") {
            Ok(value) => value
                .parse()
                .context("WEIGHT_DEBOUNCE_MS must be a number of milliseconds")?,
            Err(_) => DEFAULT_WEIGHT_DEBOUNCE_MS,
        };

        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("PORT must be a number")?
                .parse()?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            api_keys: std::env::var("API_KEYS").unwrap_or_default(),
            evaluator_backend,
            ollama_url: std::env::var("OLLAMA_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            ollama_model: std::env::var("OLLAMA_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            evaluation_service_url,
            weight_debounce: Duration::from_millis(debounce_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parsing() {
        assert_eq!("Ollama".parse::<EvaluatorBackend>().unwrap(), EvaluatorBackend::Ollama);
        assert_eq!(" remote ".parse::<EvaluatorBackend>().unwrap(), EvaluatorBackend::Remote);
        assert!("gemini".parse::<EvaluatorBackend>().is_err());
    }
}
