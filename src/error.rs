//! Error types shared by the domain, ports and use cases.
//!
//! Three families, matching how the journal reacts to them:
//! - `ValidationError`: input rejected, nothing mutated
//! - `StorageError`: key-value store read/write failure
//! - `JournalError::NotFound`: record id no longer present

use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::records::{RecordId, RecordKind};

/// Input rejected before any state was touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Trade sequence number outside `1..=max`.
    #[error("trade number must be between 1 and {max}, got {got}")]
    InvalidTradeNumber { got: u8, max: u8 },

    /// Amount must be strictly positive.
    #[error("{field} must be greater than 0, got {got}")]
    NonPositiveAmount { field: &'static str, got: Decimal },

    /// Withdrawal larger than the current account balance.
    #[error("withdrawal amount {requested} exceeds account balance {available}")]
    ExceedsBalance {
        requested: Decimal,
        available: Decimal,
    },

    /// Daily trade cap already reached for the target date.
    #[error("maximum {cap} trades per day reached for {date}")]
    DailyCapReached { date: chrono::NaiveDate, cap: u8 },

    /// Selected-data export with nothing selected.
    #[error("select at least one data type to export")]
    NothingSelected,

    /// Value could not be parsed.
    #[error("invalid {field}: {value}")]
    Unparseable { field: &'static str, value: String },
}

/// Failure talking to the key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store could not be read.
    #[error("storage read failed for `{key}`: {reason}")]
    Read { key: String, reason: String },

    /// The backing store could not be written.
    #[error("storage write failed for `{key}`: {reason}")]
    Write { key: String, reason: String },

    /// A value could not be encoded for storage.
    #[error("failed to encode `{key}`")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level error returned by journal operations.
#[derive(Debug, Error)]
pub enum JournalError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Operation on an id that is not in the collection.
    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: RecordId },

    /// The report collaborator failed to publish a document.
    #[error("report export failed: {0}")]
    Report(String),
}

impl JournalError {
    /// Shorthand for a not-found error.
    pub const fn not_found(kind: RecordKind, id: RecordId) -> Self {
        Self::NotFound { kind, id }
    }

    /// Whether the error left state untouched.
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound { .. })
    }

    /// Short user-facing text for a notification.
    pub fn toast(&self) -> String {
        match self {
            Self::Validation(ValidationError::DailyCapReached { cap, .. }) => {
                format!("Maximum {cap} trades per day reached!")
            }
            Self::Validation(ValidationError::ExceedsBalance { .. }) => {
                "Withdrawal amount exceeds account balance!".to_string()
            }
            Self::Validation(ValidationError::NothingSelected) => {
                "Please select at least one data type to export".to_string()
            }
            Self::Validation(ValidationError::MissingField(field)) => {
                format!("Please fill in the {field}")
            }
            other => other.to_string(),
        }
    }
}
