//! Capability interface to the external translation engine
//!
//! The engine itself belongs to the host platform; this crate only sees it
//! through the traits below. [`EngineClient`] owns the session lifecycle
//! and dispatch; [`mock`] provides a deterministic implementation for
//! tests.

pub mod client;
pub mod mock;

pub use client::EngineClient;
pub use mock::MockEngine;

use crate::error::TranslationError;
use crate::types::LanguageTag;
use async_trait::async_trait;
use std::sync::Arc;

/// Whether the engine can translate into a given language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityStatus {
    /// The language cannot be translated into
    Unsupported,
    /// Translation is possible, possibly after an on-demand asset download
    Supported,
    /// Language assets are already present
    Installed,
}

impl AvailabilityStatus {
    /// Usable now or after a transparent download
    ///
    /// Callers never see the supported/installed distinction; both count
    /// as available.
    #[must_use]
    pub const fn is_usable(self) -> bool {
        matches!(self, Self::Supported | Self::Installed)
    }
}

/// A live translation session bound to one target language
///
/// Sessions are produced by a [`TranslationProvider`] and owned by the
/// [`EngineClient`]; callers never construct one directly. The source
/// language is auto-detected by the engine.
#[async_trait]
pub trait TranslationSession: Send + Sync {
    /// Translate one text into the session's target language
    async fn translate(&self, text: &str) -> Result<String, TranslationError>;

    /// Release engine-side resources; the session is dead afterwards
    fn invalidate(&self);
}

/// Factory and capability metadata for the external engine
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Create a session targeting `language`
    async fn create_session(
        &self,
        language: &LanguageTag,
    ) -> Result<Arc<dyn TranslationSession>, TranslationError>;

    /// Report whether `language` can be translated into
    async fn availability(&self, language: &LanguageTag) -> AvailabilityStatus;
}
