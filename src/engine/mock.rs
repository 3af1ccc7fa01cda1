//! Mock translation engine
//!
//! Deterministic provider/session pair standing in for a host platform
//! engine. Translations are the input prefixed with the target language
//! (`"[fr] Hello"`), so assertions can see both the text and the session's
//! language. Supports failure injection, artificial latency, and call
//! accounting. Used by this crate's tests and by hosts wiring their own.

use super::{AvailabilityStatus, TranslationProvider, TranslationSession};
use crate::error::TranslationError;
use crate::types::LanguageTag;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct MockCounters {
    create_attempts: AtomicU64,
    sessions_created: AtomicU64,
    translate_calls: AtomicU64,
    invalidations: AtomicU64,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

/// Configurable mock engine
///
/// Clones share counters and failure state, so a test can keep one handle
/// for assertions after handing a clone to the client.
#[derive(Clone)]
pub struct MockEngine {
    availability: AvailabilityStatus,
    fail_session_creation: bool,
    delay: Option<Duration>,
    failing_texts: Arc<Mutex<HashSet<String>>>,
    counters: Arc<MockCounters>,
}

impl MockEngine {
    /// An installed, always-succeeding engine with no latency
    #[must_use]
    pub fn new() -> Self {
        Self {
            availability: AvailabilityStatus::Installed,
            fail_session_creation: false,
            delay: None,
            failing_texts: Arc::new(Mutex::new(HashSet::new())),
            counters: Arc::new(MockCounters::default()),
        }
    }

    /// Override the reported availability status
    #[must_use]
    pub fn with_availability(mut self, availability: AvailabilityStatus) -> Self {
        self.availability = availability;
        self
    }

    /// Make every session-creation attempt fail
    #[must_use]
    pub fn with_session_failures(mut self) -> Self {
        self.fail_session_creation = true;
        self
    }

    /// Sleep this long inside every translate call
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make translation of exactly `text` fail
    #[must_use]
    pub fn failing_on(self, text: &str) -> Self {
        self.failing_texts.lock().unwrap().insert(text.to_string());
        self
    }

    /// Sessions handed out so far
    #[must_use]
    pub fn sessions_created(&self) -> u64 {
        self.counters.sessions_created.load(Ordering::Relaxed)
    }

    /// Session-creation attempts, including failed ones
    #[must_use]
    pub fn create_attempts(&self) -> u64 {
        self.counters.create_attempts.load(Ordering::Relaxed)
    }

    /// Translate calls that reached a session
    #[must_use]
    pub fn translate_calls(&self) -> u64 {
        self.counters.translate_calls.load(Ordering::Relaxed)
    }

    /// How often sessions were invalidated
    #[must_use]
    pub fn invalidations(&self) -> u64 {
        self.counters.invalidations.load(Ordering::Relaxed)
    }

    /// Highest number of translate calls observed in flight at once
    #[must_use]
    pub fn peak_concurrency(&self) -> usize {
        self.counters.peak_in_flight.load(Ordering::Relaxed)
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranslationProvider for MockEngine {
    async fn create_session(
        &self,
        language: &LanguageTag,
    ) -> Result<Arc<dyn TranslationSession>, TranslationError> {
        self.counters.create_attempts.fetch_add(1, Ordering::Relaxed);
        if self.fail_session_creation {
            return Err(TranslationError::SessionUnavailable {
                reason: "mock session creation disabled".to_string(),
            });
        }
        self.counters.sessions_created.fetch_add(1, Ordering::Relaxed);
        Ok(Arc::new(MockSession {
            target: language.clone(),
            delay: self.delay,
            failing_texts: Arc::clone(&self.failing_texts),
            counters: Arc::clone(&self.counters),
        }))
    }

    async fn availability(&self, _language: &LanguageTag) -> AvailabilityStatus {
        self.availability
    }
}

/// Session handed out by [`MockEngine`]
pub struct MockSession {
    target: LanguageTag,
    delay: Option<Duration>,
    failing_texts: Arc<Mutex<HashSet<String>>>,
    counters: Arc<MockCounters>,
}

#[async_trait]
impl TranslationSession for MockSession {
    async fn translate(&self, text: &str) -> Result<String, TranslationError> {
        self.counters.translate_calls.fetch_add(1, Ordering::Relaxed);
        let in_flight = self.counters.in_flight.fetch_add(1, Ordering::Relaxed) + 1;
        self.counters
            .peak_in_flight
            .fetch_max(in_flight, Ordering::Relaxed);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let result = if self.failing_texts.lock().unwrap().contains(text) {
            Err(TranslationError::EngineFailure {
                reason: format!("mock failure for {text:?}"),
            })
        } else {
            Ok(format!("[{}] {}", self.target, text))
        };

        self.counters.in_flight.fetch_sub(1, Ordering::Relaxed);
        result
    }

    fn invalidate(&self) {
        self.counters.invalidations.fetch_add(1, Ordering::Relaxed);
    }
}
