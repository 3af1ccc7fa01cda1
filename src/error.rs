//! Error types for the translation layer
//!
//! Nothing in this taxonomy ever reaches the display surface as a hard
//! failure; callers degrade to the original text. The variants exist so
//! call sites can log with the right severity and tests can assert on
//! failure classes.

use std::fmt;

/// Errors that can occur while translating or persisting translations
#[derive(Debug)]
#[non_exhaustive]
pub enum TranslationError {
    /// Translate was called with empty input; not a fault, just a no-op
    EmptyInput,

    /// The external translation capability reported an error
    EngineFailure { reason: String },

    /// Reading, writing, or scanning the persistent tier failed
    PersistenceIo {
        operation: String,
        source: std::io::Error,
    },

    /// Creating a translation session failed
    SessionUnavailable { reason: String },
}

impl fmt::Display for TranslationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "Translation requested for empty input"),
            Self::EngineFailure { reason } => {
                write!(f, "Translation engine failed: {}", reason)
            }
            Self::PersistenceIo { operation, source } => {
                write!(f, "Translation cache I/O failed ({}): {}", operation, source)
            }
            Self::SessionUnavailable { reason } => {
                write!(f, "Translation session unavailable: {}", reason)
            }
        }
    }
}

impl std::error::Error for TranslationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::PersistenceIo { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TranslationError {
    fn from(source: std::io::Error) -> Self {
        Self::PersistenceIo {
            operation: "cache storage".to_string(),
            source,
        }
    }
}

impl TranslationError {
    /// Build a [`TranslationError::PersistenceIo`] with an operation label
    #[must_use]
    pub fn persistence(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::PersistenceIo {
            operation: operation.into(),
            source,
        }
    }

    /// Check if this is the empty-input no-op case
    #[must_use]
    pub const fn is_empty_input(&self) -> bool {
        matches!(self, Self::EmptyInput)
    }

    /// Check if the translation capability itself failed
    ///
    /// Session-creation failures count: callers treat them exactly like an
    /// engine failure and fall back to the original text.
    #[must_use]
    pub const fn is_engine_failure(&self) -> bool {
        matches!(
            self,
            Self::EngineFailure { .. } | Self::SessionUnavailable { .. }
        )
    }

    /// Check if the persistent cache tier failed
    #[must_use]
    pub const fn is_persistence(&self) -> bool {
        matches!(self, Self::PersistenceIo { .. })
    }

    /// Get the appropriate log level for this error
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        match self {
            // Empty input is a routine no-op, not a failure
            Self::EmptyInput => tracing::Level::DEBUG,
            // A failed read is a miss and a failed write leaves the
            // in-memory value intact, so persistence trouble is a warning
            Self::PersistenceIo { .. } => tracing::Level::WARN,
            // Engine and session failures lose user-visible functionality
            Self::EngineFailure { .. } | Self::SessionUnavailable { .. } => tracing::Level::ERROR,
        }
    }
}
