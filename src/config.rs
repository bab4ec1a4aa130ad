//! Runtime settings and tuning knobs.
//!
//! [`Settings::from_env`] reads `NL2QUERY_*` variables. Required values
//! fail loudly when absent and numeric values fail loudly when malformed;
//! nothing is silently defaulted except absent optional keys.

use crate::db::DEFAULT_MAX_POOL_SIZE;
use crate::tenant::{DbUrl, TenantDomainError};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Environment variable holding the internal database URL.
pub const DATABASE_URL_VAR: &str = "NL2QUERY_DATABASE_URL";
/// Environment variable holding the internal pool size.
pub const DATABASE_POOL_SIZE_VAR: &str = "NL2QUERY_DATABASE_POOL_SIZE";
/// Environment variable holding the base64 URL encryption key.
pub const ENCRYPTION_KEY_VAR: &str = "NL2QUERY_ENCRYPTION_KEY";
/// Environment variable holding the embedding endpoint base URL.
pub const EMBEDDING_URL_VAR: &str = "NL2QUERY_EMBEDDING_URL";
/// Environment variable holding the embedding model name.
pub const EMBEDDING_MODEL_VAR: &str = "NL2QUERY_EMBEDDING_MODEL";
/// Environment variable holding the LLM endpoint base URL.
pub const LLM_URL_VAR: &str = "NL2QUERY_LLM_URL";
/// Environment variable holding the LLM model name.
pub const LLM_MODEL_VAR: &str = "NL2QUERY_LLM_MODEL";
/// Environment variable holding the bearer token for both endpoints.
pub const API_KEY_VAR: &str = "NL2QUERY_API_KEY";
/// Environment variable overriding [`QueryPipelineConfig::query_fix_attempts`].
pub const QUERY_FIX_ATTEMPTS_VAR: &str = "NL2QUERY_QUERY_FIX_ATTEMPTS";
/// Environment variable overriding [`QueryPipelineConfig::execution_retry_limit`].
pub const EXECUTION_RETRY_LIMIT_VAR: &str = "NL2QUERY_EXECUTION_RETRY_LIMIT";
/// Environment variable overriding [`QueryPipelineConfig::context_limit`].
pub const CONTEXT_LIMIT_VAR: &str = "NL2QUERY_CONTEXT_LIMIT";
/// Environment variable overriding [`IngestionWorkerConfig::concurrency`].
pub const WORKER_CONCURRENCY_VAR: &str = "NL2QUERY_WORKER_CONCURRENCY";

const DEFAULT_ENDPOINT_URL: &str = "https://api.openai.com/v1";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

/// Errors raised while loading settings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is absent or blank.
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable holds an unparseable value.
    #[error("{name} has invalid value '{value}': {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
        /// Parse failure description.
        reason: String,
    },

    /// The internal database URL is unusable.
    #[error(transparent)]
    DatabaseUrl(#[from] TenantDomainError),
}

/// Bounds of the prompt-to-query retry state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryPipelineConfig {
    /// Inner-loop generations allowed to repair validation failures.
    pub query_fix_attempts: usize,
    /// Outer-loop retries allowed after execution failures.
    pub execution_retry_limit: usize,
    /// Number of schema vectors retrieved as LLM context.
    pub context_limit: usize,
}

impl Default for QueryPipelineConfig {
    fn default() -> Self {
        Self {
            query_fix_attempts: 3,
            execution_retry_limit: 2,
            context_limit: 10,
        }
    }
}

impl QueryPipelineConfig {
    /// Upper bound on LLM calls for one prompt.
    #[must_use]
    pub const fn max_generations(&self) -> usize {
        self.execution_retry_limit
            .saturating_add(1)
            .saturating_mul(self.query_fix_attempts.saturating_add(2))
    }
}

/// Ingestion worker pool sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionWorkerConfig {
    /// Maximum tasks processed at once.
    pub concurrency: usize,
}

impl Default for IngestionWorkerConfig {
    fn default() -> Self {
        Self { concurrency: 4 }
    }
}

/// OpenAI-compatible endpoint settings.
#[derive(Clone, PartialEq, Eq)]
pub struct EndpointSettings {
    /// Base URL, for example `https://api.openai.com/v1`.
    pub base_url: String,
    /// Model name.
    pub model: String,
    /// Optional bearer token.
    pub api_key: Option<String>,
}

impl fmt::Debug for EndpointSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointSettings")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Complete service settings.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    /// Internal database holding workspaces and statuses.
    pub database_url: DbUrl,
    /// Internal connection pool size.
    pub database_pool_size: u32,
    /// Base64 of the 32-byte URL encryption key.
    pub encryption_key: String,
    /// Embedding endpoint.
    pub embedding: EndpointSettings,
    /// LLM endpoint.
    pub llm: EndpointSettings,
    /// Query pipeline bounds.
    pub query: QueryPipelineConfig,
    /// Worker pool sizing.
    pub worker: IngestionWorkerConfig,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("database_url", &self.database_url)
            .field("database_pool_size", &self.database_pool_size)
            .field("encryption_key", &"<redacted>")
            .field("embedding", &self.embedding)
            .field("llm", &self.llm)
            .field("query", &self.query)
            .field("worker", &self.worker)
            .finish()
    }
}

impl Settings {
    /// Loads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a
    /// value does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads settings through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a
    /// value does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let required = |name: &'static str| read(name).ok_or(ConfigError::Missing(name));

        let defaults = QueryPipelineConfig::default();
        let api_key = read(API_KEY_VAR);

        Ok(Self {
            database_url: DbUrl::new(required(DATABASE_URL_VAR)?)?,
            database_pool_size: parse_or(
                DATABASE_POOL_SIZE_VAR,
                read(DATABASE_POOL_SIZE_VAR),
                DEFAULT_MAX_POOL_SIZE,
            )?,
            encryption_key: required(ENCRYPTION_KEY_VAR)?,
            embedding: EndpointSettings {
                base_url: read(EMBEDDING_URL_VAR)
                    .unwrap_or_else(|| DEFAULT_ENDPOINT_URL.to_owned()),
                model: read(EMBEDDING_MODEL_VAR)
                    .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_owned()),
                api_key: api_key.clone(),
            },
            llm: EndpointSettings {
                base_url: read(LLM_URL_VAR).unwrap_or_else(|| DEFAULT_ENDPOINT_URL.to_owned()),
                model: read(LLM_MODEL_VAR).unwrap_or_else(|| DEFAULT_LLM_MODEL.to_owned()),
                api_key,
            },
            query: QueryPipelineConfig {
                query_fix_attempts: parse_or(
                    QUERY_FIX_ATTEMPTS_VAR,
                    read(QUERY_FIX_ATTEMPTS_VAR),
                    defaults.query_fix_attempts,
                )?,
                execution_retry_limit: parse_or(
                    EXECUTION_RETRY_LIMIT_VAR,
                    read(EXECUTION_RETRY_LIMIT_VAR),
                    defaults.execution_retry_limit,
                )?,
                context_limit: parse_or(
                    CONTEXT_LIMIT_VAR,
                    read(CONTEXT_LIMIT_VAR),
                    defaults.context_limit,
                )?,
            },
            worker: IngestionWorkerConfig {
                concurrency: parse_or(
                    WORKER_CONCURRENCY_VAR,
                    read(WORKER_CONCURRENCY_VAR),
                    IngestionWorkerConfig::default().concurrency,
                )?,
            },
        })
    }
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let Some(value) = raw else {
        return Ok(default);
    };
    value.parse().map_err(|err: T::Err| ConfigError::Invalid {
        name,
        reason: err.to_string(),
        value,
    })
}
