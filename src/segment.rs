//! Translatable-unit extraction and reinsertion for marked-up bodies
//!
//! Deliberately simple and regex-driven: each supported container type is
//! scanned independently with a non-greedy pattern. Nested containers of
//! the same type therefore terminate at the first closing tag, and units
//! come out grouped by pattern type rather than in strict document order.
//! Both behaviors are part of the contract; swapping in a structural
//! parser would change which units exist.

use crate::types::RenderMode;
use regex::Regex;

/// Trimmed plain text at or below this many characters is treated as noise
/// (bullets, single characters) and skipped entirely
pub const MIN_TRANSLATABLE_CHARS: usize = 3;

/// Container patterns, each matched independently over the whole body
const BLOCK_PATTERNS: [&str; 4] = [
    r"(?s)<p[^>]*>(.*?)</p>",
    r"(?s)<div[^>]*>(.*?)</div>",
    r"(?s)<li[^>]*>(.*?)</li>",
    r"(?s)<h[1-6][^>]*>(.*?)</h[1-6]>",
];

/// Matches any tag; used to strip markup nested inside a captured unit
const INNER_TAG_PATTERN: &str = "<[^>]+>";

/// One extracted translatable fragment
///
/// `text` is the plain text with nested tags stripped; `markup` is the
/// original span including its container tags, kept verbatim as the anchor
/// for reinsertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextUnit {
    pub text: String,
    pub markup: String,
}

impl TextUnit {
    /// Whether this unit carries enough text to be worth translating
    ///
    /// # Examples
    /// ```
    /// use article_translator::segment::TextUnit;
    ///
    /// let noise = TextUnit {
    ///     text: " • ".to_string(),
    ///     markup: "<li> • </li>".to_string(),
    /// };
    /// assert!(!noise.is_translatable());
    /// ```
    #[must_use]
    pub fn is_translatable(&self) -> bool {
        self.text.trim().chars().count() > MIN_TRANSLATABLE_CHARS
    }

    /// Produce the replacement markup for this unit's translation
    ///
    /// Bilingual keeps the original span and appends a translation block;
    /// translation-only swaps the plain text inside the span. In
    /// translation-only mode a unit whose plain text is not a contiguous
    /// substring of its markup (nested tags were stripped from the middle)
    /// renders unchanged.
    #[must_use]
    pub fn render(&self, translation: &str, mode: RenderMode) -> String {
        match mode {
            RenderMode::Bilingual => {
                format!(
                    "{}<div class=\"translation\">{}</div>",
                    self.markup, translation
                )
            }
            RenderMode::TranslationOnly => self.markup.replace(&self.text, translation),
        }
    }
}

/// Regex-based unit extractor
///
/// Compile-once wrapper around the container patterns; construct one and
/// reuse it for every body.
#[derive(Debug)]
pub struct Segmenter {
    blocks: Vec<Regex>,
    inner_tag: Regex,
}

impl Segmenter {
    #[must_use]
    pub fn new() -> Self {
        let blocks = BLOCK_PATTERNS
            .iter()
            .map(|pattern| Regex::new(pattern).expect("hard-coded pattern compiles"))
            .collect();
        let inner_tag = Regex::new(INNER_TAG_PATTERN).expect("hard-coded pattern compiles");
        Self { blocks, inner_tag }
    }

    /// Extract translatable units from `markup`
    ///
    /// Units whose plain text trims to nothing are dropped here; short
    /// units survive extraction and are filtered by
    /// [`TextUnit::is_translatable`] at translation time.
    #[must_use]
    pub fn extract_units(&self, markup: &str) -> Vec<TextUnit> {
        let mut units = Vec::new();

        for pattern in &self.blocks {
            for captures in pattern.captures_iter(markup) {
                let (Some(whole), Some(inner)) = (captures.get(0), captures.get(1)) else {
                    continue;
                };

                let text = self.inner_tag.replace_all(inner.as_str(), "");
                if text.trim().is_empty() {
                    continue;
                }

                units.push(TextUnit {
                    text: text.into_owned(),
                    markup: whole.as_str().to_string(),
                });
            }
        }

        units
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(text: &str, markup: &str) -> TextUnit {
        TextUnit {
            text: text.to_string(),
            markup: markup.to_string(),
        }
    }

    #[test]
    fn test_extract_simple_paragraph() {
        let segmenter = Segmenter::new();
        let units = segmenter.extract_units("<p>Hello world</p>");
        assert_eq!(units, vec![unit("Hello world", "<p>Hello world</p>")]);
    }

    #[test]
    fn test_extract_keeps_tag_attributes_in_markup() {
        let segmenter = Segmenter::new();
        let units = segmenter.extract_units(r#"<p class="lead">Intro text</p>"#);
        assert_eq!(
            units,
            vec![unit("Intro text", r#"<p class="lead">Intro text</p>"#)]
        );
    }

    #[test]
    fn test_extract_strips_nested_tags_from_text() {
        let segmenter = Segmenter::new();
        let units = segmenter.extract_units("<p>Hello <em>brave</em> world</p>");
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].text, "Hello brave world");
        assert_eq!(units[0].markup, "<p>Hello <em>brave</em> world</p>");
    }

    #[test]
    fn test_extract_spans_newlines() {
        let segmenter = Segmenter::new();
        let units = segmenter.extract_units("<p>line one\nline two</p>");
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].text, "line one\nline two");
    }

    #[test]
    fn test_extract_groups_by_pattern_not_document_order() {
        let segmenter = Segmenter::new();
        // The div appears first in the document, but paragraph matches are
        // collected first.
        let units = segmenter.extract_units("<div>block text</div><p>para text</p>");
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].text, "para text");
        assert_eq!(units[1].text, "block text");
    }

    #[test]
    fn test_extract_list_items() {
        let segmenter = Segmenter::new();
        let units = segmenter.extract_units("<ul><li>Item one</li><li>Item two</li></ul>");
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].text, "Item one");
        assert_eq!(units[1].text, "Item two");
    }

    #[test]
    fn test_extract_headings_any_level() {
        let segmenter = Segmenter::new();
        let units = segmenter.extract_units("<h1>Big title</h1><h4>Small title</h4>");
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].text, "Big title");
        assert_eq!(units[1].text, "Small title");
    }

    #[test]
    fn test_heading_close_level_not_checked() {
        // The heading pattern accepts any closing level, so a mismatched
        // pair still produces a unit.
        let segmenter = Segmenter::new();
        let units = segmenter.extract_units("<h2>Loose heading</h3>");
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].markup, "<h2>Loose heading</h3>");
    }

    #[test]
    fn test_nested_same_type_terminates_at_first_close() {
        let segmenter = Segmenter::new();
        let units = segmenter.extract_units("<div>outer <div>inner</div> tail</div>");
        // Non-greedy matching stops at the first closing tag; the tail is
        // never captured. Accepted limitation of the pattern approach.
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].markup, "<div>outer <div>inner</div>");
        assert_eq!(units[0].text, "outer inner");
    }

    #[test]
    fn test_nested_different_types_both_match() {
        let segmenter = Segmenter::new();
        let units = segmenter.extract_units("<div><p>text here</p></div>");
        // Both the paragraph and its enclosing div capture the same plain
        // text; reinsertion tolerates the overlap because the second
        // replacement finds no remaining anchor.
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].text, "text here");
        assert_eq!(units[1].text, "text here");
        assert_eq!(units[0].markup, "<p>text here</p>");
        assert_eq!(units[1].markup, "<div><p>text here</p></div>");
    }

    #[test]
    fn test_empty_and_whitespace_units_dropped() {
        let segmenter = Segmenter::new();
        assert!(segmenter.extract_units("<p></p>").is_empty());
        assert!(segmenter.extract_units("<p>   \n</p>").is_empty());
        // Only markup inside: stripping leaves nothing.
        assert!(segmenter.extract_units("<p><br></p>").is_empty());
    }

    #[test]
    fn test_no_units_in_plain_text() {
        let segmenter = Segmenter::new();
        assert!(segmenter
            .extract_units("Just a plain sentence with no markup.")
            .is_empty());
    }

    #[test]
    fn test_is_translatable_threshold() {
        assert!(!unit("Hi!", "<p>Hi!</p>").is_translatable());
        assert!(unit("Hi!!", "<p>Hi!!</p>").is_translatable());
        // Trimming happens before counting.
        assert!(!unit("  ab  ", "<p>  ab  </p>").is_translatable());
        // Characters, not bytes.
        assert!(!unit("日本", "<p>日本</p>").is_translatable());
        assert!(unit("héllo", "<p>héllo</p>").is_translatable());
    }

    #[test]
    fn test_render_bilingual_keeps_original() {
        let u = unit("Hello", "<p>Hello</p>");
        let rendered = u.render("Bonjour", RenderMode::Bilingual);
        assert_eq!(
            rendered,
            "<p>Hello</p><div class=\"translation\">Bonjour</div>"
        );
    }

    #[test]
    fn test_render_translation_only_swaps_text() {
        let u = unit("Hello", "<p>Hello</p>");
        let rendered = u.render("Bonjour", RenderMode::TranslationOnly);
        assert_eq!(rendered, "<p>Bonjour</p>");
        assert!(!rendered.contains("Hello"));
    }

    #[test]
    fn test_render_translation_only_replaces_every_occurrence() {
        let u = unit("ha", "<p>ha ha</p>");
        let rendered = u.render("ho", RenderMode::TranslationOnly);
        assert_eq!(rendered, "<p>ho ho</p>");
    }

    #[test]
    fn test_render_translation_only_with_stripped_tags_is_noop() {
        // The stripped plain text is not a contiguous substring of the
        // markup, so the swap finds nothing and the span stays original.
        let u = unit("Hello brave world", "<p>Hello <em>brave</em> world</p>");
        let rendered = u.render("Bonjour", RenderMode::TranslationOnly);
        assert_eq!(rendered, "<p>Hello <em>brave</em> world</p>");
    }
}
