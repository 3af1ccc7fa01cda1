//! Deterministic cache keys
//!
//! A [`CacheKey`] identifies one translated value: which article, which
//! part of it, and into which language. Its storage rendering doubles as
//! the persistent-tier file name, so the id and language components are
//! percent-encoded to keep the `_` separators unambiguous and the name
//! safe as a single path component.

use crate::types::{ArticleId, ContentKind, LanguageTag};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::fmt;

/// Characters escaped inside storage-key components
///
/// `_` collides with the separator, `%` with the escape itself; the rest
/// keep the rendered key usable as a file name on common filesystems.
const COMPONENT_ESCAPES: &AsciiSet = &CONTROLS
    .add(b'_')
    .add(b'%')
    .add(b'/')
    .add(b'\\')
    .add(b':')
    .add(b'*')
    .add(b'?')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'|')
    .add(b' ');

/// Identity of one cached translation
///
/// Two lookups with the same `(article, kind, language)` tuple observe the
/// same cached value until it is explicitly cleared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    article: ArticleId,
    kind: ContentKind,
    language: LanguageTag,
}

impl CacheKey {
    #[must_use]
    pub fn new(article: ArticleId, kind: ContentKind, language: LanguageTag) -> Self {
        Self {
            article,
            kind,
            language,
        }
    }

    #[must_use]
    pub fn article(&self) -> &ArticleId {
        &self.article
    }

    #[must_use]
    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    #[must_use]
    pub fn language(&self) -> &LanguageTag {
        &self.language
    }

    /// Render the key as `{article}_{kind}_{language}`
    ///
    /// The rendering is deterministic and injective: it is used both as the
    /// memory-tier map key and as the persistent-tier file name, and
    /// [`parse`](Self::parse) inverts it exactly.
    ///
    /// # Examples
    /// ```
    /// use article_translator::cache::CacheKey;
    /// use article_translator::types::{ArticleId, ContentKind, LanguageTag};
    ///
    /// let key = CacheKey::new(
    ///     ArticleId::new("feed_7".to_string()).unwrap(),
    ///     ContentKind::Title,
    ///     LanguageTag::new("en".to_string()).unwrap(),
    /// );
    /// assert_eq!(key.storage_key(), "feed%5F7_title_en");
    /// assert_eq!(CacheKey::parse("feed%5F7_title_en"), Some(key));
    /// ```
    #[must_use]
    pub fn storage_key(&self) -> String {
        let article = utf8_percent_encode(self.article.as_str(), COMPONENT_ESCAPES);
        let language = utf8_percent_encode(self.language.as_str(), COMPONENT_ESCAPES);
        format!("{}_{}_{}", article, self.kind.as_str(), language)
    }

    /// Parse a storage key back into its components
    ///
    /// Returns `None` for anything that was not produced by
    /// [`storage_key`](Self::storage_key); directory scans use this to skip
    /// foreign files.
    #[must_use]
    pub fn parse(storage_key: &str) -> Option<Self> {
        let mut parts = storage_key.split('_');
        let (article, kind, language) = match (parts.next(), parts.next(), parts.next(), parts.next())
        {
            (Some(article), Some(kind), Some(language), None) => (article, kind, language),
            _ => return None,
        };

        let article = percent_decode_str(article).decode_utf8().ok()?;
        let article = ArticleId::new(article.into_owned()).ok()?;
        let kind = ContentKind::parse(kind)?;
        let language = percent_decode_str(language).decode_utf8().ok()?;
        let language = LanguageTag::new(language.into_owned()).ok()?;

        Some(Self::new(article, kind, language))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key())
    }
}
