//! Ingestion status values and registry records.

use super::ParseIngestionStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle flag for a tenant's schema ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IngestionStatus {
    /// A worker is embedding the tenant's schema.
    InProgress,
    /// The last ingestion finished, or none has been recorded.
    Done,
    /// The last ingestion failed.
    Error,
    /// The last ingestion finished with an advisory.
    Warn,
}

impl IngestionStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
            Self::Error => "ERROR",
            Self::Warn => "WARN",
        }
    }
}

impl fmt::Display for IngestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for IngestionStatus {
    type Error = ParseIngestionStatusError;

    fn try_from(value: &str) -> Result<Self, ParseIngestionStatusError> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "IN_PROGRESS" => Ok(Self::InProgress),
            "DONE" => Ok(Self::Done),
            "ERROR" => Ok(Self::Error),
            "WARN" => Ok(Self::Warn),
            _ => Err(ParseIngestionStatusError(value.to_owned())),
        }
    }
}

/// Status flag with an optional human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    status: IngestionStatus,
    message: Option<String>,
}

impl StatusRecord {
    /// Creates a record, dropping blank messages.
    #[must_use]
    pub fn new(status: IngestionStatus, message: Option<String>) -> Self {
        let message = message
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());
        Self { status, message }
    }

    /// Record reported when the registry holds nothing for a tenant.
    #[must_use]
    pub const fn done() -> Self {
        Self {
            status: IngestionStatus::Done,
            message: None,
        }
    }

    /// Returns the status flag.
    #[must_use]
    pub const fn status(&self) -> IngestionStatus {
        self.status
    }

    /// Returns the optional message.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns `true` while a worker holds the tenant.
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.status == IngestionStatus::InProgress
    }

    /// Returns `true` when the last ingestion failed.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status == IngestionStatus::Error
    }
}

impl Default for StatusRecord {
    fn default() -> Self {
        Self::done()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(IngestionStatus::InProgress)]
    #[case(IngestionStatus::Done)]
    #[case(IngestionStatus::Error)]
    #[case(IngestionStatus::Warn)]
    fn storage_form_parses_back(#[case] status: IngestionStatus) {
        assert_eq!(IngestionStatus::try_from(status.as_str()), Ok(status));
    }

    #[test]
    fn parsing_is_case_insensitive_and_rejects_unknown_values() {
        assert_eq!(
            IngestionStatus::try_from(" in_progress "),
            Ok(IngestionStatus::InProgress)
        );
        assert_eq!(
            IngestionStatus::try_from("PENDING"),
            Err(ParseIngestionStatusError("PENDING".to_owned()))
        );
    }

    #[test]
    fn blank_messages_are_dropped() {
        let record = StatusRecord::new(IngestionStatus::Error, Some("   ".to_owned()));
        assert_eq!(record.message(), None);
        assert!(!record.is_in_progress());
        assert!(record.is_error());
    }

    #[test]
    fn default_record_is_done_without_message() {
        let record = StatusRecord::default();
        assert_eq!(record.status(), IngestionStatus::Done);
        assert_eq!(record.message(), None);
    }
}
