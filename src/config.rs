//! Configuration for the translation layer
//!
//! All fields default, so an empty TOML document (or `Default::default()`)
//! is a valid configuration. Scalar invariants are enforced by newtypes at
//! deserialization time rather than checked at use sites.

use crate::types::{LanguageTag, RenderMode};
use nutype::nutype;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Maximum number of entries held by the in-memory cache tier
#[nutype(
    validate(greater = 0),
    derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)
)]
pub struct MemoryCapacity(u64);

/// Maximum number of concurrently in-flight engine calls during a batch
#[nutype(
    validate(greater = 0),
    derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)
)]
pub struct BatchConcurrency(usize);

fn default_cache_directory() -> PathBuf {
    std::env::temp_dir().join("translation-cache")
}

fn default_memory_capacity() -> MemoryCapacity {
    MemoryCapacity::try_new(1000).expect("1000 is non-zero")
}

fn default_batch_concurrency() -> BatchConcurrency {
    BatchConcurrency::try_new(4).expect("4 is non-zero")
}

/// Top-level configuration
///
/// # Examples
/// ```
/// use article_translator::config::TranslationConfig;
///
/// let config = TranslationConfig::from_toml_str(
///     r#"
///     [engine]
///     target_language = "fr"
///
///     [rendering]
///     mode = "translation-only"
///     "#,
/// )
/// .unwrap();
/// assert_eq!(config.engine.target_language.unwrap().as_str(), "fr");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TranslationConfig {
    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub rendering: RenderingConfig,
}

impl TranslationConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// Cache tier settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory holding one file per persisted translation
    ///
    /// Process-scoped cache area; the host environment may purge it between
    /// runs and the cache tolerates it being absent at startup.
    #[serde(default = "default_cache_directory")]
    pub directory: PathBuf,

    /// Entry-count bound for the in-memory tier
    #[serde(default = "default_memory_capacity")]
    pub memory_capacity: MemoryCapacity,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            directory: default_cache_directory(),
            memory_capacity: default_memory_capacity(),
        }
    }
}

/// Capability client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Target language override; absent means the system display language
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_language: Option<LanguageTag>,

    /// Concurrency cap for batch translation fan-out
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: BatchConcurrency,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_language: None,
            batch_concurrency: default_batch_concurrency(),
        }
    }
}

/// Display composition settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RenderingConfig {
    /// How translated text is combined with the original
    #[serde(default)]
    pub mode: RenderMode,
}
