//! Cache-first translation layer for feed reader articles
//!
//! Sits between article presentation and a pluggable machine translation
//! engine. Translated titles and bodies are cached in a bounded memory
//! tier backed by one-file-per-entry persistent storage, requests flow
//! through a lazily created engine session, and every failure degrades to
//! the original text instead of an error.
//!
//! Bring an engine by implementing [`TranslationProvider`] and
//! [`TranslationSession`]; [`MockEngine`] ships for tests. [`Translator`]
//! is the entry point for everything else.

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod segment;
pub mod translator;
pub mod types;

pub use cache::{CacheKey, CacheStats, TranslationCache};
pub use config::{
    BatchConcurrency, CacheConfig, EngineConfig, MemoryCapacity, RenderingConfig, TranslationConfig,
};
pub use engine::{
    AvailabilityStatus, EngineClient, MockEngine, TranslationProvider, TranslationSession,
};
pub use error::TranslationError;
pub use segment::{Segmenter, TextUnit};
pub use translator::Translator;
pub use types::{ArticleId, ContentKind, LanguageTag, RenderMode, ValidationError};
