use std::env;
use std::path::PathBuf;
use std::time::Duration;

use opsdesk_core::{AppError, AppResult};
use url::Url;

const DEFAULT_TOKEN_STORE_PATH: &str = ".opsdesk/local_storage.json";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;
const DEFAULT_QUERY_STALE_SECS: u64 = 0;

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub api_base_url: Url,
    pub token_store_path: PathBuf,
    pub http_timeout: Duration,
    pub query_stale_after: Duration,
}

impl ConsoleConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let raw_base_url = lookup("OPSDESK_API_URL")
            .map(|value| value.trim().trim_end_matches('/').to_owned())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AppError::Validation("OPSDESK_API_URL is required".to_owned()))?;
        let api_base_url = Url::parse(raw_base_url.as_str()).map_err(|error| {
            AppError::Validation(format!(
                "invalid OPSDESK_API_URL value '{raw_base_url}': {error}"
            ))
        })?;
        if api_base_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "OPSDESK_API_URL must be an http(s) base URL, got '{raw_base_url}'"
            )));
        }

        let token_store_path = lookup("OPSDESK_TOKEN_STORE_PATH")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_STORE_PATH));

        let http_timeout_secs = parse_u64(
            &lookup,
            "OPSDESK_HTTP_TIMEOUT_SECS",
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?;
        if http_timeout_secs == 0 {
            return Err(AppError::Validation(
                "OPSDESK_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        let query_stale_secs =
            parse_u64(&lookup, "OPSDESK_QUERY_STALE_SECS", DEFAULT_QUERY_STALE_SECS)?;

        Ok(Self {
            api_base_url,
            token_store_path,
            http_timeout: Duration::from_secs(http_timeout_secs),
            query_stale_after: Duration::from_secs(query_stale_secs),
        })
    }
}

fn parse_u64(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: u64,
) -> AppResult<u64> {
    match lookup(name) {
        Some(value) => value.trim().parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load_from(pairs: &[(&str, &str)]) -> AppResult<ConsoleConfig> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        ConsoleConfig::from_lookup(|name| values.get(name).cloned())
    }

    #[test]
    fn api_url_is_required() {
        assert!(matches!(load_from(&[]), Err(AppError::Validation(_))));
    }

    #[test]
    fn defaults_apply_when_optional_values_are_missing() {
        let config = load_from(&[("OPSDESK_API_URL", "http://localhost:8000/api/")])
            .unwrap_or_else(|_| panic!("test"));

        assert_eq!(config.api_base_url.as_str(), "http://localhost:8000/api");
        assert_eq!(config.token_store_path, PathBuf::from(DEFAULT_TOKEN_STORE_PATH));
        assert_eq!(config.http_timeout, Duration::from_secs(15));
        assert_eq!(config.query_stale_after, Duration::ZERO);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let result = load_from(&[
            ("OPSDESK_API_URL", "http://localhost:8000"),
            ("OPSDESK_HTTP_TIMEOUT_SECS", "0"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let result = load_from(&[
            ("OPSDESK_API_URL", "http://localhost:8000"),
            ("OPSDESK_QUERY_STALE_SECS", "soon"),
        ]);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn non_base_url_is_rejected() {
        let result = load_from(&[("OPSDESK_API_URL", "mailto:admin@example.com")]);
        assert!(result.is_err());
    }
}
