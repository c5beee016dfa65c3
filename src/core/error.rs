//! Error taxonomy for fetching, validating and refreshing finance data

use reqwest::StatusCode;
use std::fmt::Display;

/// Failure of a single request against the finance API.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Transport error for {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error: {status} for {endpoint}")]
    Http { endpoint: String, status: StatusCode },

    #[error("Request to {endpoint} failed after {attempts} attempts: {last}")]
    RetryExhausted {
        endpoint: String,
        attempts: usize,
        #[source]
        last: Box<FetchError>,
    },

    #[error("Invalid URL for {endpoint}: {reason}")]
    InvalidUrl { endpoint: String, reason: String },

    #[error("Failed to parse JSON response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    pub fn endpoint(&self) -> &str {
        match self {
            FetchError::Transport { endpoint, .. }
            | FetchError::Http { endpoint, .. }
            | FetchError::RetryExhausted { endpoint, .. }
            | FetchError::InvalidUrl { endpoint, .. }
            | FetchError::Decode { endpoint, .. } => endpoint,
        }
    }

    /// True for 4xx responses, looking through `RetryExhausted`.
    pub fn is_client_error(&self) -> bool {
        match self {
            FetchError::Http { status, .. } => status.is_client_error(),
            FetchError::RetryExhausted { last, .. } => last.is_client_error(),
            _ => false,
        }
    }
}

/// Client-side rejection of a form before anything is sent.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in all fields ({0} is missing)")]
    MissingField(&'static str),

    #[error("Amount must be a number, got '{0}'")]
    InvalidAmount(String),

    #[error("Amount must not be zero")]
    ZeroAmount,

    #[error("Budget must be a positive number, got '{0}'")]
    InvalidBudget(String),

    #[error("Invalid date '{0}'. Use YYYY-MM-DD")]
    InvalidDate(String),

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
}

/// Which form a submission originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    Transaction,
    DeleteTransaction,
    Budget,
    DeleteBudget,
    Category,
}

impl Display for FormKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                FormKind::Transaction => "transaction",
                FormKind::DeleteTransaction => "delete transaction",
                FormKind::Budget => "budget",
                FormKind::DeleteBudget => "delete budget",
                FormKind::Category => "category",
            }
        )
    }
}

/// Outcome-level failures surfaced by the refresh orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("A {0} submission is already in progress")]
    Busy(FormKind),

    #[error("{action} failed: {source}")]
    Mutation {
        action: &'static str,
        #[source]
        source: FetchError,
    },

    #[error("Refresh failed, showing previously loaded data: {0}")]
    Refresh(#[source] FetchError),

    #[error("Error loading application data: {combined}; fallback also failed: {fallback}")]
    Initialization {
        combined: FetchError,
        #[source]
        fallback: FetchError,
    },
}

impl AppError {
    /// Whether the application can keep showing its previous state.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Initialization { .. })
    }
}
