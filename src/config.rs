// src/config.rs

use std::env;
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

use dotenvy::dotenv;
use thiserror::Error;
use url::Url;

const DEFAULT_CURRENT_QUIZ_URL: &str = "https://www.jsonkeeper.com/b/LLQT";
const DEFAULT_SUBMISSION_URL: &str = "https://api.jsonserve.com/rJvd7g";
const DEFAULT_HISTORICAL_URL: &str = "https://api.jsonserve.com/XgAgFJ";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid URL: {source}")]
    InvalidUrl {
        var: &'static str,
        source: url::ParseError,
    },

    #[error("{var} is not a valid socket address: {source}")]
    InvalidAddr {
        var: &'static str,
        source: AddrParseError,
    },

    #[error("{var} must be 'true' or 'false', got '{value}'")]
    InvalidFlag { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Current quiz metadata feed.
    pub current_quiz_url: Url,
    /// Submission feed, one row per attempt.
    pub submission_url: Url,
    /// Historical attempts feed.
    pub historical_url: Url,
    /// Where the score distribution PNG is written.
    pub chart_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub log_dir: String,
    pub rust_log: String,
    /// Skips TLS certificate verification for the upstream feeds.
    /// Off unless explicitly enabled; only meant for feeds with broken chains.
    pub accept_invalid_certs: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds the config from `lookup`, falling back to defaults for unset variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let current_quiz_url = url_var(&lookup, "CURRENT_QUIZ_URL", DEFAULT_CURRENT_QUIZ_URL)?;
        let submission_url = url_var(&lookup, "SUBMISSION_URL", DEFAULT_SUBMISSION_URL)?;
        let historical_url = url_var(&lookup, "HISTORICAL_URL", DEFAULT_HISTORICAL_URL)?;

        let chart_path = lookup("CHART_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join("score_distribution.png"));

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:5000".to_string())
            .parse()
            .map_err(|source| ConfigError::InvalidAddr {
                var: "BIND_ADDR",
                source,
            })?;

        let log_dir = lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string());

        let rust_log = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        let accept_invalid_certs = match lookup("ACCEPT_INVALID_CERTS") {
            Some(value) => parse_flag("ACCEPT_INVALID_CERTS", &value)?,
            None => false,
        };

        Ok(Self {
            current_quiz_url,
            submission_url,
            historical_url,
            chart_path,
            bind_addr,
            log_dir,
            rust_log,
            accept_invalid_certs,
        })
    }
}

fn url_var<F>(lookup: &F, var: &'static str, default: &str) -> Result<Url, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(var).unwrap_or_else(|| default.to_string());
    Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl { var, source })
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            var,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_flag_accepts_common_spellings() {
        assert!(parse_flag("X", "true").unwrap());
        assert!(parse_flag("X", " YES ").unwrap());
        assert!(!parse_flag("X", "0").unwrap());
        assert!(!parse_flag("X", "").unwrap());
    }

    #[test]
    fn test_parse_flag_rejects_garbage() {
        let err = parse_flag("ACCEPT_INVALID_CERTS", "maybe").unwrap_err();
        assert!(err.to_string().contains("ACCEPT_INVALID_CERTS"));
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| vars.get(var).cloned()
    }

    #[test]
    fn test_from_lookup_uses_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.current_quiz_url.as_str(), DEFAULT_CURRENT_QUIZ_URL);
        assert_eq!(config.submission_url.as_str(), DEFAULT_SUBMISSION_URL);
        assert_eq!(config.historical_url.as_str(), DEFAULT_HISTORICAL_URL);
        assert_eq!(config.chart_path, env::temp_dir().join("score_distribution.png"));
        assert_eq!(config.bind_addr, "0.0.0.0:5000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.log_dir, "logs");
        assert_eq!(config.rust_log, "info");
        assert!(!config.accept_invalid_certs);
    }

    #[test]
    fn test_from_lookup_reads_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("HISTORICAL_URL", "http://127.0.0.1:9000/historical"),
            ("CHART_PATH", "/tmp/charts/out.png"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("ACCEPT_INVALID_CERTS", "true"),
        ]))
        .unwrap();

        assert_eq!(config.historical_url.as_str(), "http://127.0.0.1:9000/historical");
        assert_eq!(config.chart_path, PathBuf::from("/tmp/charts/out.png"));
        assert_eq!(config.bind_addr.port(), 8080);
        assert!(config.accept_invalid_certs);
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let err = Config::from_lookup(lookup_from(&[("SUBMISSION_URL", "not a url")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { var: "SUBMISSION_URL", .. }));

        let err = Config::from_lookup(lookup_from(&[("BIND_ADDR", "localhost")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAddr { .. }));
    }

    #[test]
    fn test_default_feed_urls_parse() {
        for raw in [
            DEFAULT_CURRENT_QUIZ_URL,
            DEFAULT_SUBMISSION_URL,
            DEFAULT_HISTORICAL_URL,
        ] {
            assert!(Url::parse(raw).is_ok(), "{raw} should parse");
        }
    }
}
