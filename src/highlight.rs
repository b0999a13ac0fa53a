use regex::RegexBuilder;
use thiserror::Error;

use crate::dom::{NodeId, PageDocument};

pub const ARTICLE_CONTENT_CLASS: &str = "article-content";

#[derive(Debug, Error)]
pub enum HighlightError {
    /// The search text is compiled as a pattern unescaped; metacharacters
    /// in it surface here instead of matching literally.
    #[error("invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Wrap every case-insensitive occurrence of `search_text` in the
/// region's markup in `<mark>` tags, keeping the matched text's original
/// case.
///
/// Reassigns the region's whole markup; anything tied to the old markup
/// is lost. Empty or whitespace-only search text leaves the region
/// untouched.
pub fn highlight_search_text(
    doc: &mut PageDocument,
    region: NodeId,
    search_text: &str,
) -> Result<(), HighlightError> {
    if search_text.trim().is_empty() {
        return Ok(());
    }

    let pattern = RegexBuilder::new(search_text)
        .case_insensitive(true)
        .build()?;

    let content = doc.element(region).markup().to_string();
    let marked = pattern.replace_all(&content, |caps: &regex::Captures| {
        format!("<mark>{}</mark>", &caps[0])
    });
    doc.element_mut(region).set_markup(marked.into_owned());
    Ok(())
}

/// Convenience wrapper targeting the article content region; a page
/// without one is left untouched.
pub fn highlight_article_content(
    doc: &mut PageDocument,
    search_text: &str,
) -> Result<(), HighlightError> {
    let Some(region) = doc.by_class(ARTICLE_CONTENT_CLASS).first().copied() else {
        return Ok(());
    };
    highlight_search_text(doc, region, search_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;

    fn article(markup: &str) -> (PageDocument, NodeId) {
        let mut doc = PageDocument::new();
        let region = doc.insert(
            Element::new("div")
                .with_class(ARTICLE_CONTENT_CLASS)
                .with_markup(markup),
        );
        (doc, region)
    }

    #[test]
    fn wraps_matches_preserving_original_case() {
        let (mut doc, region) = article("The Cat sat");

        highlight_search_text(&mut doc, region, "cat").unwrap();

        assert_eq!(doc.element(region).markup(), "The <mark>Cat</mark> sat");
    }

    #[test]
    fn wraps_every_occurrence() {
        let (mut doc, region) = article("cat CAT Cat");

        highlight_search_text(&mut doc, region, "cat").unwrap();

        assert_eq!(
            doc.element(region).markup(),
            "<mark>cat</mark> <mark>CAT</mark> <mark>Cat</mark>"
        );
    }

    #[test]
    fn empty_and_whitespace_queries_are_no_ops() {
        let (mut doc, region) = article("The Cat sat");

        highlight_search_text(&mut doc, region, "").unwrap();
        highlight_search_text(&mut doc, region, "   ").unwrap();

        assert_eq!(doc.element(region).markup(), "The Cat sat");
    }

    #[test]
    fn metacharacters_are_not_escaped() {
        // A valid pattern matches as a pattern, not literally.
        let (mut doc, region) = article("cab car");

        highlight_search_text(&mut doc, region, "ca.").unwrap();

        assert_eq!(
            doc.element(region).markup(),
            "<mark>cab</mark> <mark>car</mark>"
        );
    }

    #[test]
    fn malformed_pattern_errors_and_leaves_region_untouched() {
        let (mut doc, region) = article("The Cat sat");

        let err = highlight_search_text(&mut doc, region, "(cat").unwrap_err();

        assert!(matches!(err, HighlightError::Pattern(_)));
        assert_eq!(doc.element(region).markup(), "The Cat sat");
    }

    #[test]
    fn article_wrapper_skips_pages_without_the_region() {
        let mut doc = PageDocument::new();
        doc.insert(Element::new("div").with_markup("no articles here"));

        highlight_article_content(&mut doc, "cat").unwrap();
    }

    #[test]
    fn article_wrapper_targets_the_region() {
        let (mut doc, region) = article("a cat appeared");

        highlight_article_content(&mut doc, "cat").unwrap();

        assert_eq!(
            doc.element(region).markup(),
            "a <mark>cat</mark> appeared"
        );
    }
}
