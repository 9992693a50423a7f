use std::env;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(String),

    #[error("Invalid {key} value: {reason}")]
    Invalid { key: String, reason: String },
}

impl From<ConfigError> for std::io::Error {
    fn from(err: ConfigError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string())
    }
}

/// Loads `.env.{RUST_ENV}` and falls back to `.env`.
pub fn load_env_files() -> String {
    let environment = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
    let env_file = format!(".env.{}", environment);
    if dotenvy::from_filename(&env_file).is_err() {
        dotenvy::dotenv().ok();
    }
    environment
}

pub fn required(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key.to_string()))
}

pub fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parses `key` when set, otherwise returns `default`.
pub fn parse_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional(key) {
        Some(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            key: key.to_string(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

pub fn flag(key: &str) -> bool {
    matches!(
        optional(key).as_deref().map(str::to_ascii_lowercase).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

/// Lowercase ASCII slug: "Init Stack!" becomes "init-stack".
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;
    for c in value.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Project-wide settings shared by emails, tokens and the health check.
#[derive(Debug, Clone)]
pub struct ProjectSettings {
    pub name: String,
    pub version: String,
    pub environment: String,
    /// Origin used to build links in emails, without a trailing slash
    pub public_base_url: String,
}

impl ProjectSettings {
    pub fn from_env(environment: &str, host: &str, port: &str) -> Self {
        let name = optional("PROJECT_NAME").unwrap_or_else(|| "InitStack".to_string());
        let version =
            optional("PROJECT_VERSION").unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());
        let public_base_url = optional("PUBLIC_BASE_URL")
            .unwrap_or_else(|| format!("http://{host}:{port}"))
            .trim_end_matches('/')
            .to_string();

        Self {
            name,
            version,
            environment: environment.to_string(),
            public_base_url,
        }
    }

    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("InitStack"), "initstack");
        assert_eq!(slugify("  Init  Stack!! API "), "init-stack-api");
        assert_eq!(slugify("--"), "");
    }

    #[test]
    fn parse_or_uses_default_when_unset() {
        let value: i64 = parse_or("USER_ACCOUNTS_TEST_UNSET_EXPIRY", 1800).unwrap();
        assert_eq!(value, 1800);
    }

    #[test]
    fn parse_or_reports_invalid_values() {
        std::env::set_var("USER_ACCOUNTS_TEST_BAD_EXPIRY", "soon");
        let result: Result<i64, _> = parse_or("USER_ACCOUNTS_TEST_BAD_EXPIRY", 1800);
        std::env::remove_var("USER_ACCOUNTS_TEST_BAD_EXPIRY");

        match result {
            Err(ConfigError::Invalid { key, .. }) => {
                assert_eq!(key, "USER_ACCOUNTS_TEST_BAD_EXPIRY")
            }
            other => panic!("expected Invalid error, got {:?}", other),
        }
    }

    #[test]
    fn config_error_converts_to_io_error() {
        let err: std::io::Error = ConfigError::Missing("REDIS_URL".to_string()).into();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
        assert_eq!(err.to_string(), "REDIS_URL is not set");
    }
}
