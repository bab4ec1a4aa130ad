//! Structured error surfaced to outer layers.
//!
//! Service errors keep their own variants for matching inside the crate;
//! front-ends convert them into an [`ApiError`] carrying an HTTP-like status
//! code, a stable message, and ordered diagnostic details.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status code for a rejected request because ingestion is running.
pub const STATUS_CONFLICT: u16 = 409;

/// Status code for invalid caller input.
pub const STATUS_BAD_REQUEST: u16 = 400;

/// Status code for a request abandoned by its caller.
pub const STATUS_CLIENT_CLOSED_REQUEST: u16 = 499;

/// Status code for collaborator or storage failures.
pub const STATUS_INTERNAL: u16 = 500;

/// Message carried by the in-progress sentinel.
pub const STATUS_IN_PROGRESS_MESSAGE: &str = "Workspace ingestion is in progress";

/// Message carried by the ingestion-failed sentinel.
pub const STATUS_FAILED_MESSAGE: &str = "Workspace ingestion has failed";

/// Structured error with a status code and ordered additional details.
///
/// Rendering is `message` alone when there are no details, otherwise
/// `message: detail1; detail2`.
///
/// # Examples
///
/// ```
/// use nl2query::error::ApiError;
///
/// let error = ApiError::new(400, "Validation failed")
///     .with_info("name is required")
///     .with_info("age must be positive");
/// assert_eq!(
///     error.to_string(),
///     "Validation failed: name is required; age must be positive"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    status_code: u16,
    message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    additional_error_info: Vec<String>,
}

impl ApiError {
    /// Creates an error without additional details.
    #[must_use]
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
            additional_error_info: Vec::new(),
        }
    }

    /// Sentinel returned while a tenant's ingestion is running.
    #[must_use]
    pub fn status_in_progress() -> Self {
        Self::new(STATUS_CONFLICT, STATUS_IN_PROGRESS_MESSAGE)
    }

    /// Sentinel describing a failed ingestion.
    #[must_use]
    pub fn ingestion_failed() -> Self {
        Self::new(STATUS_INTERNAL, STATUS_FAILED_MESSAGE)
    }

    /// Appends one detail.
    #[must_use]
    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.additional_error_info.push(info.into());
        self
    }

    /// Appends details in iteration order.
    #[must_use]
    pub fn with_batch_info<I, S>(mut self, infos: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.additional_error_info
            .extend(infos.into_iter().map(Into::into));
        self
    }

    /// Returns the HTTP-like status code.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Returns the primary message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the ordered additional details.
    #[must_use]
    pub fn additional_error_info(&self) -> &[String] {
        &self.additional_error_info
    }

    /// Returns `true` when this error is the in-progress sentinel.
    #[must_use]
    pub fn is_status_in_progress(&self) -> bool {
        self.status_code == STATUS_CONFLICT && self.message == STATUS_IN_PROGRESS_MESSAGE
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if !self.additional_error_info.is_empty() {
            write!(f, ": {}", self.additional_error_info.join("; "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}
