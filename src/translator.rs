//! Cache-first orchestration of article translation
//!
//! [`Translator`] is the front door. Every operation is gated on the
//! caller's enablement flag before anything else happens, the cache is
//! consulted before the engine, and failures degrade to the original
//! text. Nothing in this module surfaces an error to the caller; a
//! translation that cannot be produced leaves the article as it was.

use crate::cache::{CacheKey, TranslationCache};
use crate::config::TranslationConfig;
use crate::engine::{EngineClient, TranslationProvider};
use crate::error::TranslationError;
use crate::segment::Segmenter;
use crate::types::{ArticleId, ContentKind, LanguageTag, RenderMode};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Preferences that may change while the process runs
#[derive(Debug, Clone, Default)]
struct TranslationSettings {
    /// Explicit target; `None` resolves to the system locale per call
    target_language: Option<LanguageTag>,
    mode: RenderMode,
}

/// Cache-first translation front end
///
/// Cheap to clone; clones share the cache tiers, the engine session and
/// the runtime settings.
#[derive(Clone)]
pub struct Translator {
    cache: TranslationCache,
    engine: EngineClient,
    segmenter: Arc<Segmenter>,
    settings: Arc<RwLock<TranslationSettings>>,
}

impl Translator {
    /// Build a translator from configuration and an engine provider
    ///
    /// Opens the cache, creating its directory if needed. No engine
    /// session is created until the first translation asks for one.
    pub async fn new(
        config: TranslationConfig,
        provider: Arc<dyn TranslationProvider>,
    ) -> Result<Self, TranslationError> {
        let cache = TranslationCache::open(&config.cache).await?;
        let engine = EngineClient::new(provider, config.engine.batch_concurrency);
        let settings = TranslationSettings {
            target_language: config.engine.target_language,
            mode: config.rendering.mode,
        };

        Ok(Self {
            cache,
            engine,
            segmenter: Arc::new(Segmenter::new()),
            settings: Arc::new(RwLock::new(settings)),
        })
    }

    /// The language translations are produced in right now
    pub async fn target_language(&self) -> LanguageTag {
        let settings = self.settings.read().await;
        settings
            .target_language
            .clone()
            .unwrap_or_else(LanguageTag::system_default)
    }

    /// Override the target language, or pass `None` to follow the system
    /// locale again
    ///
    /// Takes effect for subsequent calls. Entries cached under the old
    /// language stay cached, and an existing engine session is kept; call
    /// [`invalidate_session`](Self::invalidate_session) if the engine pins
    /// its language pair at session creation.
    pub async fn set_target_language(&self, language: Option<LanguageTag>) {
        debug!(language = ?language, "translation target language updated");
        self.settings.write().await.target_language = language;
    }

    /// Switch how translated titles and bodies are composed
    ///
    /// Affects future compositions only; bodies already cached keep the
    /// mode they were composed with until cleared.
    pub async fn set_render_mode(&self, mode: RenderMode) {
        debug!(mode = ?mode, "translation render mode updated");
        self.settings.write().await.mode = mode;
    }

    /// Whether the engine can translate into the active target language
    pub async fn is_available(&self) -> bool {
        let target = self.target_language().await;
        self.engine.is_available(&target).await
    }

    /// Drop the engine session so the next translation starts fresh
    pub async fn invalidate_session(&self) {
        self.engine.invalidate_session().await;
    }

    /// The cache backing this translator
    #[must_use]
    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// Translate an article title, consulting the cache first
    ///
    /// Returns `None` when translation is disabled for the article, when
    /// the title is empty, or when the engine cannot produce a result.
    /// Successful translations are cached before they are returned. The
    /// cache lookup runs before the empty-title guard, so a previously
    /// cached title still answers for an article whose title has since
    /// gone missing.
    pub async fn translated_title(
        &self,
        article: &ArticleId,
        enabled: bool,
        title: &str,
    ) -> Option<String> {
        if !enabled {
            return None;
        }

        let target = self.target_language().await;
        let key = CacheKey::new(article.clone(), ContentKind::Title, target.clone());
        if let Some(cached) = self.cache.get(&key).await {
            return Some(cached.to_string());
        }

        if title.is_empty() {
            return None;
        }

        let translated = self.engine.translate(title, &target).await?;
        self.cache.insert(&key, &translated).await;
        Some(translated)
    }

    /// Title ready for display: translated per the render mode, or the
    /// original untouched when no translation is available
    ///
    /// Bilingual mode stacks the original above the translation separated
    /// by a newline; translation-only replaces the title outright.
    pub async fn formatted_title(&self, article: &ArticleId, enabled: bool, title: &str) -> String {
        let Some(translated) = self.translated_title(article, enabled, title).await else {
            return title.to_string();
        };

        match self.render_mode().await {
            RenderMode::Bilingual => format!("{title}\n{translated}"),
            RenderMode::TranslationOnly => translated,
        }
    }

    /// Translate an article body, returning display-ready markup
    ///
    /// The composed result is cached under the article's body key, so the
    /// next call is a hit even when every unit failed and the body came
    /// through unchanged. Units that fail to translate keep their original
    /// markup. A body with no recognizable units passes through untouched
    /// and uncached.
    pub async fn translate_body(&self, article: &ArticleId, enabled: bool, body: &str) -> String {
        if !enabled {
            return body.to_string();
        }

        let target = self.target_language().await;
        let key = CacheKey::new(article.clone(), ContentKind::Body, target.clone());
        if let Some(cached) = self.cache.get(&key).await {
            return cached.to_string();
        }

        let units = self.segmenter.extract_units(body);
        if units.is_empty() {
            debug!(article = %article, "no translatable units in body");
            return body.to_string();
        }

        let translatable: Vec<_> = units.iter().filter(|unit| unit.is_translatable()).collect();
        let texts: Vec<String> = translatable.iter().map(|unit| unit.text.clone()).collect();
        debug!(
            article = %article,
            units = translatable.len(),
            "translating body units"
        );
        let translations = self.engine.translate_batch(texts, &target).await;

        let mode = self.render_mode().await;
        let mut composed = body.to_string();
        for (unit, translation) in translatable.iter().zip(translations) {
            if let Some(translation) = translation {
                let rendered = unit.render(&translation, mode);
                composed = composed.replace(&unit.markup, &rendered);
            }
        }

        // Cached even when nothing changed, so segmentation is not redone
        // on the next view of the same article.
        self.cache.insert(&key, &composed).await;
        composed
    }

    async fn render_mode(&self) -> RenderMode {
        self.settings.read().await.mode
    }
}
