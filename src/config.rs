use std::net::SocketAddr;
use std::str::FromStr;

use chrono::Duration;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Configuration for the news provider. No key means news is disabled.
#[derive(Debug, Clone, Default)]
pub struct NewsConfig {
    pub api_key: Option<String>,
}

/// Configuration for the completion provider. No key means outlooks are disabled.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: usize,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            max_tokens: 500,
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub run_migrations: bool,
    pub bind_addr: SocketAddr,
    /// Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
    pub http_timeout_secs: u64,
    pub news: NewsConfig,
    pub llm: LlmConfig,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let secret = match var("SESSION_SECRET") {
            Some(secret) => secret,
            None => {
                warn!("SESSION_SECRET not set, generating a per-process secret; tokens will not survive restarts");
                format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
            }
        };

        let llm_defaults = LlmConfig::default();

        Ok(Self {
            database_url,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", var("DATABASE_MAX_CONNECTIONS"), 10)?,
            run_migrations: parse_or("RUN_MIGRATIONS", var("RUN_MIGRATIONS"), true)?,
            bind_addr: parse_or("BIND_ADDR", var("BIND_ADDR"), SocketAddr::from(([0, 0, 0, 0], 8000)))?,
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS")
                .map(|origins| parse_origins(&origins))
                .unwrap_or_default(),
            http_timeout_secs: parse_or("HTTP_TIMEOUT_SECS", var("HTTP_TIMEOUT_SECS"), 30)?,
            news: NewsConfig {
                api_key: var("NEWS_API_KEY"),
            },
            llm: LlmConfig {
                api_key: var("OPENAI_API_KEY"),
                model: var("OPENAI_MODEL").unwrap_or(llm_defaults.model),
                max_tokens: parse_or("LLM_MAX_TOKENS", var("LLM_MAX_TOKENS"), llm_defaults.max_tokens)?,
                temperature: parse_or("LLM_TEMPERATURE", var("LLM_TEMPERATURE"), llm_defaults.temperature)?,
            },
            session: SessionConfig {
                secret,
                ttl: session_ttl(var("SESSION_TTL_HOURS"))?,
            },
        })
    }
}

fn parse_or<T: FromStr>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { name, value }),
    }
}

/// Longest accepted session lifetime, one year.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

fn session_ttl(value: Option<String>) -> Result<Duration, ConfigError> {
    const NAME: &str = "SESSION_TTL_HOURS";
    let hours: i64 = parse_or(NAME, value, 24)?;
    if !(1..=MAX_SESSION_TTL_HOURS).contains(&hours) {
        return Err(ConfigError::Invalid { name: NAME, value: hours.to_string() });
    }
    Ok(Duration::hours(hours))
}

/// `*` anywhere in the list allows every origin.
fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect();

    if origins.iter().any(|o| o == "*") {
        Vec::new()
    } else {
        origins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_database_url_is_required() {
        let err = config_from(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn test_defaults_when_optional_keys_absent() {
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/stockwatch")]).unwrap();

        assert_eq!(config.database_max_connections, 10);
        assert!(config.run_migrations);
        assert_eq!(config.bind_addr.port(), 8000);
        assert!(config.cors_allowed_origins.is_empty());
        assert!(config.news.api_key.is_none());
        assert!(config.llm.api_key.is_none());
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.session.ttl, Duration::hours(24));
        assert!(!config.session.secret.is_empty());
    }

    #[test]
    fn test_blank_keys_count_as_absent() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/stockwatch"),
            ("NEWS_API_KEY", "   "),
        ])
        .unwrap();
        assert!(config.news.api_key.is_none());
    }

    #[test]
    fn test_invalid_numeric_value_names_the_variable() {
        let err = config_from(&[
            ("DATABASE_URL", "postgres://localhost/stockwatch"),
            ("SESSION_TTL_HOURS", "soon"),
        ])
        .unwrap_err();

        assert_eq!(err.to_string(), "invalid value for SESSION_TTL_HOURS: \"soon\"");
    }

    #[test]
    fn test_session_ttl_must_be_in_range() {
        for bad in ["0", "-5", "9223372036854775807"] {
            let err = config_from(&[
                ("DATABASE_URL", "postgres://localhost/stockwatch"),
                ("SESSION_TTL_HOURS", bad),
            ])
            .unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { name: "SESSION_TTL_HOURS", .. }), "{}", bad);
        }

        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/stockwatch"),
            ("SESSION_TTL_HOURS", "8760"),
        ])
        .unwrap();
        assert_eq!(config.session.ttl, Duration::hours(MAX_SESSION_TTL_HOURS));
    }

    #[test]
    fn test_cors_origins() {
        assert_eq!(
            parse_origins("http://localhost:3000, https://app.example.com"),
            vec!["http://localhost:3000", "https://app.example.com"]
        );
        assert!(parse_origins("*").is_empty());
    }
}
