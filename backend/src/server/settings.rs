//! Environment-driven server settings.
//!
//! Every variable is read through [`mockable::Env`] so parsing can be tested
//! without touching the process environment.

use mockable::Env;

const DATABASE_URL_ENV: &str = "DATABASE_URL";
const DATABASE_SSL_ENV: &str = "DATABASE_SSL";
const POOL_MAX_SIZE_ENV: &str = "DATABASE_POOL_MAX_SIZE";
const HOST_ENV: &str = "HOST";
const PORT_ENV: &str = "PORT";
const CORS_ORIGIN_ENV: &str = "CORS_ORIGIN";
const NODE_ENV: &str = "NODE_ENV";
const APP_ENV: &str = "APP_ENV";
const RUST_LOG_ENV: &str = "RUST_LOG";
const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_ENVIRONMENT: &str = "development";
const DEFAULT_LOG_FILTER: &str = "info";

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no";
const PORT_EXPECTED: &str = "an integer between 1 and 65535";
const POOL_EXPECTED: &str = "a positive integer";

/// Errors raised while reading server settings.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    /// A required environment variable is missing or blank.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Origins allowed by the CORS policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// `*`: any origin.
    Any,
    /// Explicit allow-list.
    List(Vec<String>),
}

impl CorsOrigins {
    fn parse(raw: Option<String>) -> Self {
        let Some(raw) = raw else {
            return Self::Any;
        };
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_owned)
            .collect();
        if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
            Self::Any
        } else {
            Self::List(origins)
        }
    }
}

/// Settings needed to start the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub database_url: String,
    pub database_ssl: bool,
    pub pool_max_size: u32,
    pub host: String,
    pub port: u16,
    pub cors_origins: CorsOrigins,
    /// Environment name reported by `GET /health`.
    pub environment: String,
}

impl ServerSettings {
    /// Read settings from `env`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use briki_api::server::ServerSettings;
    /// use mockable::MockEnv;
    ///
    /// let mut env = MockEnv::new();
    /// env.expect_string().returning(|name| match name {
    ///     "DATABASE_URL" => Some("postgres://localhost/briki".to_owned()),
    ///     "PORT" => Some("8080".to_owned()),
    ///     _ => None,
    /// });
    ///
    /// let settings = ServerSettings::from_env(&env).expect("valid settings");
    /// assert_eq!(settings.port, 8080);
    /// assert_eq!(settings.host, "0.0.0.0");
    /// ```
    pub fn from_env<E: Env>(env: &E) -> Result<Self, SettingsError> {
        let database_url =
            non_blank(env, DATABASE_URL_ENV).ok_or(SettingsError::MissingEnv {
                name: DATABASE_URL_ENV,
            })?;
        let database_ssl = match non_blank(env, DATABASE_SSL_ENV) {
            Some(value) => parse_bool(&value).ok_or(SettingsError::InvalidEnv {
                name: DATABASE_SSL_ENV,
                value,
                expected: BOOL_EXPECTED,
            })?,
            None => false,
        };
        let pool_max_size = match non_blank(env, POOL_MAX_SIZE_ENV) {
            Some(value) => value
                .parse::<u32>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or(SettingsError::InvalidEnv {
                    name: POOL_MAX_SIZE_ENV,
                    value,
                    expected: POOL_EXPECTED,
                })?,
            None => DEFAULT_POOL_MAX_SIZE,
        };
        let port = match non_blank(env, PORT_ENV) {
            Some(value) => value
                .parse::<u16>()
                .ok()
                .filter(|port| *port > 0)
                .ok_or(SettingsError::InvalidEnv {
                    name: PORT_ENV,
                    value,
                    expected: PORT_EXPECTED,
                })?,
            None => DEFAULT_PORT,
        };
        let host = non_blank(env, HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let environment = non_blank(env, NODE_ENV)
            .or_else(|| non_blank(env, APP_ENV))
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_owned());

        Ok(Self {
            database_url,
            database_ssl,
            pool_max_size,
            host,
            port,
            cors_origins: CorsOrigins::parse(non_blank(env, CORS_ORIGIN_ENV)),
            environment,
        })
    }
}

/// Tracing filter directive: `RUST_LOG`, then `LOG_LEVEL`, then `info`.
pub fn log_filter<E: Env>(env: &E) -> String {
    non_blank(env, RUST_LOG_ENV)
        .or_else(|| non_blank(env, LOG_LEVEL_ENV))
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned())
}

fn non_blank<E: Env>(env: &E, name: &str) -> Option<String> {
    env.string(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
