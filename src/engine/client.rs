//! Session-managed dispatch to the translation engine
//!
//! One reusable session per client, created lazily on first use and kept
//! until explicitly invalidated. The session is deliberately not recreated
//! when a caller asks for a different target language; hosts invalidate on
//! language change. Engine trouble never escapes as an error: every failure
//! path returns `None` and the caller falls back to the original text.

use super::{TranslationProvider, TranslationSession};
use crate::config::BatchConcurrency;
use crate::types::LanguageTag;
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

/// Client over an injected [`TranslationProvider`]
///
/// Cheap to clone; clones share the provider and the live session.
#[derive(Clone)]
pub struct EngineClient {
    provider: Arc<dyn TranslationProvider>,
    session: Arc<Mutex<Option<Arc<dyn TranslationSession>>>>,
    batch_concurrency: usize,
}

impl EngineClient {
    #[must_use]
    pub fn new(provider: Arc<dyn TranslationProvider>, batch_concurrency: BatchConcurrency) -> Self {
        Self {
            provider,
            session: Arc::new(Mutex::new(None)),
            batch_concurrency: batch_concurrency.into_inner(),
        }
    }

    /// Translate one text, lazily creating the session on first use
    ///
    /// Returns `None` for empty input (silently), for session-creation
    /// failure, and for engine errors (both logged).
    pub async fn translate(&self, text: &str, target: &LanguageTag) -> Option<String> {
        if text.is_empty() {
            debug!("translation skipped for empty input");
            return None;
        }

        let session = self.session_for(target).await?;
        match session.translate(text).await {
            Ok(translated) => Some(translated),
            Err(e) => {
                error!(target = %target, error = %e, "translation failed");
                None
            }
        }
    }

    /// Translate many texts, results index-aligned with the input
    ///
    /// Fans out one task per item, capped by the configured concurrency,
    /// and returns only after every task resolves. A failed item is `None`
    /// at its index; the output length always equals the input length.
    pub async fn translate_batch(
        &self,
        texts: Vec<String>,
        target: &LanguageTag,
    ) -> Vec<Option<String>> {
        if texts.is_empty() {
            return Vec::new();
        }

        let count = texts.len();
        let limit = Arc::new(Semaphore::new(self.batch_concurrency));
        let mut tasks: JoinSet<(usize, Option<String>)> = JoinSet::new();

        for (index, text) in texts.into_iter().enumerate() {
            let client = self.clone();
            let target = target.clone();
            let limit = Arc::clone(&limit);
            tasks.spawn(async move {
                // The semaphore is never closed while tasks hold it.
                let Ok(_permit) = limit.acquire().await else {
                    return (index, None);
                };
                (index, client.translate(&text, &target).await)
            });
        }

        let mut results: Vec<Option<String>> = vec![None; count];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, translated)) => results[index] = translated,
                Err(e) => warn!(error = %e, "batch translation task failed to join"),
            }
        }
        results
    }

    /// Whether the engine can translate into `target`
    ///
    /// Installed and merely supported both count as available.
    pub async fn is_available(&self, target: &LanguageTag) -> bool {
        self.provider.availability(target).await.is_usable()
    }

    /// Destroy the current session, if any
    ///
    /// The next translate call recreates one lazily.
    pub async fn invalidate_session(&self) {
        let mut guard = self.session.lock().await;
        if let Some(session) = guard.take() {
            session.invalidate();
            debug!("translation session invalidated");
        }
    }

    /// Get the live session, creating one for `target` if none exists
    ///
    /// Creation is serialized under the session lock so concurrent first
    /// use cannot double-create; translate calls themselves run outside
    /// the lock. An existing session is reused even when `target` differs
    /// from the language it was created for.
    async fn session_for(&self, target: &LanguageTag) -> Option<Arc<dyn TranslationSession>> {
        let mut guard = self.session.lock().await;
        if let Some(session) = guard.as_ref() {
            return Some(Arc::clone(session));
        }

        match self.provider.create_session(target).await {
            Ok(session) => {
                debug!(target = %target, "translation session created");
                *guard = Some(Arc::clone(&session));
                Some(session)
            }
            Err(e) => {
                error!(target = %target, error = %e, "failed to create translation session");
                None
            }
        }
    }
}
