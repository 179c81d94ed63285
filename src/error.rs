//! Unified error handling for the kitis crate
//!
//! This module consolidates the domain-specific errors into a single `Error`
//! enum and classifies them for the transport layer.
//!
//! # Architecture
//!
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`FailureSignal`] - Protocol-level outcome reported to API callers
//! - [`Error`] - Unified error enum wrapping all domain-specific errors

use std::io;
use thiserror::Error;

pub use crate::utils::error::{FetchError, ParseError, ValidationError};

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Malformed request, unknown role or entity
    Validation,
    /// Network-related errors (timeout, blocking, upstream status)
    Network,
    /// Table structure or bell lookup errors
    Parsing,
    /// Snapshot and other file I/O
    Storage,
    /// Configuration errors
    Config,
}

/// Failure outcome exposed to API callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureSignal {
    InvalidRole,
    UnknownEntity,
    NetworkUnavailable,
    UpstreamFormatError,
}

impl FailureSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRole => "invalid_role",
            Self::UnknownEntity => "unknown_entity",
            Self::NetworkUnavailable => "network_unavailable",
            Self::UpstreamFormatError => "upstream_format_error",
        }
    }
}

/// Unified error type for the kitis crate
#[derive(Error, Debug)]
pub enum Error {
    /// Request validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Upstream fetch errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Schedule page parse errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Get the error category for handling strategies
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Fetch(_) => ErrorCategory::Network,
            Self::Parse(_) | Self::Json(_) => ErrorCategory::Parsing,
            Self::Io(_) => ErrorCategory::Storage,
            Self::Config(_) => ErrorCategory::Config,
        }
    }

    /// Check if this error is recoverable (a later request may succeed)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_recoverable(),
            Self::Io(_) => true,
            Self::Validation(_) | Self::Parse(_) | Self::Json(_) | Self::Config(_) => false,
        }
    }

    /// Map to the protocol-level failure reported to API callers
    pub fn signal(&self) -> FailureSignal {
        match self {
            Self::Validation(ValidationError::UnknownEntity { .. }) => FailureSignal::UnknownEntity,
            Self::Validation(_) => FailureSignal::InvalidRole,
            Self::Fetch(FetchError::Decode(_) | FetchError::InvalidUrl(_)) => {
                FailureSignal::UpstreamFormatError
            }
            Self::Fetch(_) | Self::Io(_) | Self::Config(_) => FailureSignal::NetworkUnavailable,
            Self::Parse(_) | Self::Json(_) => FailureSignal::UpstreamFormatError,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
