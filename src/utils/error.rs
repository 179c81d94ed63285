//! Error types for the kitis engine
//!
//! Each enum is closed and produced at the point of failure.

use thiserror::Error;

use crate::models::{Role, Source};

/// Errors detected locally while validating a schedule request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Role is not one of group / lecturer / room
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    /// Entity is not listed in the directory for the role
    #[error("Unknown {role}: {entity}")]
    UnknownEntity { role: Role, entity: String },

    /// Request body is missing fields or is not valid JSON
    #[error("Malformed request: {0}")]
    MalformedRequest(String),
}

/// Errors that can occur while talking to the upstream host
#[derive(Error, Debug)]
pub enum FetchError {
    /// Timeouts or connection failures survived every attempt
    #[error("Host is not accessible: {url} ({attempts} attempts)")]
    NetworkUnavailable { url: String, attempts: u32 },

    /// Transport failed with something other than a timeout or refused connection
    #[error("Unexpected transport error: {0}")]
    UnexpectedTransport(String),

    /// Host kept answering 401/403 after every identity rotation
    #[error("Identity rotation exhausted after {rotations} attempts")]
    IdentityExhausted { rotations: u32 },

    /// Liveness probe got a non-2xx answer other than 401/403
    #[error("Host returned {0}")]
    UpstreamUnhealthy(u16),

    /// Data fetch got a non-2xx answer
    #[error("Unexpected status: {0}")]
    Status(u16),

    /// Index for the source could not be fetched at startup
    #[error("Directory unavailable: {0}")]
    DirectoryUnavailable(Source),

    /// Content decoding error
    #[error("Decoding error: {0}")]
    Decode(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl FetchError {
    /// Check if the same request may succeed later
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NetworkUnavailable { .. }
                | Self::IdentityExhausted { .. }
                | Self::UpstreamUnhealthy(_)
                | Self::DirectoryUnavailable(_)
        ) || matches!(self, Self::Status(code) if *code >= 500)
    }
}

/// Errors that can occur while normalizing a schedule page
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A fixed page landmark (heading, timestamp block, table) is missing
    #[error("Page landmark not found: {0}")]
    MissingLandmark(&'static str),

    /// Row matches none of the known row shapes
    #[error("Unexpected row shape at row {row}: {cells} cells")]
    UnexpectedRowShape { row: usize, cells: usize },

    /// Continuation row appeared before any row that opens a day
    #[error("Continuation row {row} has no preceding date")]
    ContinuationBeforeDate { row: usize },

    /// Day cell is not "<date> <weekday>"
    #[error("Malformed day cell: {0:?}")]
    MalformedDayCell(String),

    /// Weekday abbreviation outside the known seven
    #[error("Unknown weekday abbreviation: {0:?}")]
    UnknownWeekday(String),

    /// Lesson number has no bell-time entry
    #[error("No bell time for lesson {number:?} on {date}")]
    UnknownLessonNumber { date: String, number: String },
}
