//! Core identifier and discriminator types for translation requests
//!
//! Validated string newtypes enforce their invariants at construction time,
//! so the rest of the crate never re-checks them.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Validation errors for string types
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("article id cannot be empty or whitespace")]
    EmptyArticleId,

    #[error("language tag cannot be empty")]
    EmptyLanguageTag,

    #[error("invalid language tag: {0}")]
    InvalidLanguageTag(String),
}

/// Macro to generate validated string newtypes.
///
/// Each generated type gets:
/// - A `new()` constructor that validates
/// - `as_str()` getter
/// - `AsRef<str>`, `Deref`, `Display`, `TryFrom` impls
/// - Serde `Serialize` and `Deserialize` with validation
macro_rules! validated_string {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident(String) {
            validation: |$s_param:ident| $validation:expr,
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
        #[serde(transparent)]
        $vis struct $name(String);

        impl $name {
            #[doc = concat!("Create a new ", stringify!($name), " after validation")]
            pub fn new($s_param: String) -> Result<Self, ValidationError> {
                let validate = || $validation;
                validate()?;
                Ok(Self($s_param))
            }

            #[doc = concat!("Get the ", stringify!($name), " as a string slice")]
            #[must_use]
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            #[inline]
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            #[inline]
            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from($s_param: String) -> Result<Self, Self::Error> {
                Self::new($s_param)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = ValidationError;

            fn try_from($s_param: &str) -> Result<Self, Self::Error> {
                Self::new($s_param.to_owned())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::new(s).map_err(serde::de::Error::custom)
            }
        }
    };
}

validated_string! {
    /// Opaque identifier for a piece of content (an article)
    ///
    /// Treated as an opaque token: any non-empty, non-whitespace string is
    /// accepted. The cache percent-encodes it before using it in storage
    /// keys, so ids may contain separators or path characters.
    ///
    /// # Examples
    /// ```
    /// use article_translator::types::ArticleId;
    ///
    /// let id = ArticleId::new("feed-42:item-7".to_string()).unwrap();
    /// assert_eq!(id.as_str(), "feed-42:item-7");
    /// assert!(ArticleId::new("   ".to_string()).is_err());
    /// ```
    pub struct ArticleId(String) {
        validation: |s| {
            if s.trim().is_empty() {
                Err(ValidationError::EmptyArticleId)
            } else {
                Ok(())
            }
        },
    }
}

/// Longest accepted language tag, in bytes
///
/// Generous upper bound for BCP 47 style tags ("zh-Hans-CN" is 10).
const MAX_LANGUAGE_TAG_LEN: usize = 35;

validated_string! {
    /// Target language tag ("en", "fr", "zh-Hans")
    ///
    /// ASCII alphanumerics and `-` only. Tags are compared and cached
    /// verbatim; no case normalization is applied.
    ///
    /// # Examples
    /// ```
    /// use article_translator::types::LanguageTag;
    ///
    /// let tag = LanguageTag::new("zh-Hans".to_string()).unwrap();
    /// assert_eq!(tag.as_str(), "zh-Hans");
    /// assert!(LanguageTag::new("no spaces".to_string()).is_err());
    /// ```
    pub struct LanguageTag(String) {
        validation: |s| {
            if s.is_empty() {
                Err(ValidationError::EmptyLanguageTag)
            } else if s.len() > MAX_LANGUAGE_TAG_LEN
                || !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
            {
                Err(ValidationError::InvalidLanguageTag(s.clone()))
            } else {
                Ok(())
            }
        },
    }
}

impl LanguageTag {
    /// The language used when nothing else can be resolved
    fn fallback() -> Self {
        Self("en".to_owned())
    }

    /// Resolve the system display language from the environment
    ///
    /// Reads `LANG` and reduces it to its primary subtag. Unset, `C`, and
    /// `POSIX` locales resolve to `"en"`.
    #[must_use]
    pub fn system_default() -> Self {
        std::env::var("LANG")
            .ok()
            .as_deref()
            .and_then(Self::from_locale)
            .unwrap_or_else(Self::fallback)
    }

    /// Extract the primary language subtag from a POSIX locale string
    ///
    /// Returns `None` for locales that carry no language ("C", "POSIX",
    /// empty).
    ///
    /// # Examples
    /// ```
    /// use article_translator::types::LanguageTag;
    ///
    /// let tag = LanguageTag::from_locale("en_US.UTF-8").unwrap();
    /// assert_eq!(tag.as_str(), "en");
    /// assert!(LanguageTag::from_locale("C.UTF-8").is_none());
    /// ```
    #[must_use]
    pub fn from_locale(raw: &str) -> Option<Self> {
        let primary = raw
            .split(['.', '@'])
            .next()
            .and_then(|prefix| prefix.split('_').next())
            .unwrap_or_default();

        if primary.is_empty()
            || primary.eq_ignore_ascii_case("c")
            || primary.eq_ignore_ascii_case("posix")
        {
            return None;
        }

        Self::new(primary.to_owned()).ok()
    }
}

/// Which part of an article a cached translation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Title,
    Body,
}

impl ContentKind {
    /// Stable name used inside storage keys
    #[must_use]
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Body => "body",
        }
    }

    /// Inverse of [`as_str`](Self::as_str)
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "title" => Some(Self::Title),
            "body" => Some(Self::Body),
            _ => None,
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How translated text is combined with the original for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    /// Original text followed by its translation
    #[default]
    Bilingual,
    /// Translation replaces the original text
    TranslationOnly,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct TagHolder {
        tag: LanguageTag,
    }

    #[derive(Deserialize)]
    struct ModeHolder {
        mode: RenderMode,
    }

    // ArticleId tests
    #[test]
    fn test_article_id_accepts_opaque_strings() {
        let id = ArticleId::new("a1b2c3_d4".to_string()).unwrap();
        assert_eq!(id.as_str(), "a1b2c3_d4");
        assert_eq!(id.to_string(), "a1b2c3_d4");
    }

    #[test]
    fn test_article_id_rejects_empty() {
        assert_eq!(
            ArticleId::new(String::new()),
            Err(ValidationError::EmptyArticleId)
        );
        assert_eq!(
            ArticleId::new("  \t".to_string()),
            Err(ValidationError::EmptyArticleId)
        );
    }

    #[test]
    fn test_article_id_try_from() {
        let id = ArticleId::try_from("abc").unwrap();
        assert_eq!(id.as_str(), "abc");
        assert!(ArticleId::try_from("").is_err());
    }

    // LanguageTag tests
    #[test]
    fn test_language_tag_valid() {
        for tag in ["en", "fr", "zh-Hans", "pt-BR", "de"] {
            assert!(LanguageTag::try_from(tag).is_ok(), "rejected {tag}");
        }
    }

    #[test]
    fn test_language_tag_invalid() {
        assert_eq!(
            LanguageTag::new(String::new()),
            Err(ValidationError::EmptyLanguageTag)
        );
        assert!(matches!(
            LanguageTag::try_from("en US"),
            Err(ValidationError::InvalidLanguageTag(_))
        ));
        assert!(matches!(
            LanguageTag::try_from("en_US"),
            Err(ValidationError::InvalidLanguageTag(_))
        ));
        let oversized = "a".repeat(MAX_LANGUAGE_TAG_LEN + 1);
        assert!(LanguageTag::new(oversized).is_err());
    }

    #[test]
    fn test_language_tag_case_preserved() {
        let tag = LanguageTag::try_from("zh-Hans").unwrap();
        assert_eq!(tag.as_str(), "zh-Hans");
        assert_ne!(tag, LanguageTag::try_from("zh-hans").unwrap());
    }

    #[test]
    fn test_language_tag_serde_validates() {
        let ok: TagHolder = toml::from_str("tag = \"en\"").unwrap();
        assert_eq!(ok.tag.as_str(), "en");
        assert!(toml::from_str::<TagHolder>("tag = \"not a tag\"").is_err());
    }

    #[test]
    fn test_from_locale_full_posix_form() {
        assert_eq!(
            LanguageTag::from_locale("en_US.UTF-8").unwrap().as_str(),
            "en"
        );
        assert_eq!(
            LanguageTag::from_locale("fr_FR@euro").unwrap().as_str(),
            "fr"
        );
        assert_eq!(LanguageTag::from_locale("de").unwrap().as_str(), "de");
    }

    #[test]
    fn test_from_locale_no_language() {
        assert!(LanguageTag::from_locale("C").is_none());
        assert!(LanguageTag::from_locale("C.UTF-8").is_none());
        assert!(LanguageTag::from_locale("POSIX").is_none());
        assert!(LanguageTag::from_locale("").is_none());
    }

    #[test]
    fn test_system_default_always_valid() {
        // Whatever LANG holds, resolution must produce a usable tag.
        let tag = LanguageTag::system_default();
        assert!(!tag.as_str().is_empty());
    }

    // ContentKind tests
    #[test]
    fn test_content_kind_round_trip() {
        assert_eq!(ContentKind::parse("title"), Some(ContentKind::Title));
        assert_eq!(ContentKind::parse("body"), Some(ContentKind::Body));
        assert_eq!(ContentKind::parse("footer"), None);
        assert_eq!(ContentKind::Title.as_str(), "title");
        assert_eq!(ContentKind::Body.to_string(), "body");
    }

    // RenderMode tests
    #[test]
    fn test_render_mode_default_is_bilingual() {
        assert_eq!(RenderMode::default(), RenderMode::Bilingual);
    }

    #[test]
    fn test_render_mode_serde_names() {
        let bilingual: ModeHolder = toml::from_str("mode = \"bilingual\"").unwrap();
        assert_eq!(bilingual.mode, RenderMode::Bilingual);
        let only: ModeHolder = toml::from_str("mode = \"translation-only\"").unwrap();
        assert_eq!(only.mode, RenderMode::TranslationOnly);
    }
}
