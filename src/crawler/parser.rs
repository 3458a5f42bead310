//! Markup helpers shared by the listing and detail parsers
//!
//! Text extraction here follows one rule everywhere: every descendant text
//! node is trimmed, empty pieces are dropped, and the rest are concatenated
//! without a separator.

use scraper::{ElementRef, Selector};

/// Compiles a constant CSS selector
macro_rules! parse_selector {
    ($s:expr) => {
        scraper::Selector::parse($s).expect(concat!("Invalid CSS selector: ", $s))
    };
}

pub(crate) use parse_selector;

/// Returns the trimmed, concatenated text of an element
pub fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// Returns the first descendant of `element` matching `selector`
pub fn select_first<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    element.select(selector).next()
}

/// Returns the stripped text of the last descendant matching `selector`
///
/// The job board nests a qualifier span before the value span
/// (`<span>upto</span><span>₹50,000</span>`); the value is always last.
pub fn last_descendant_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element.select(selector).last().map(stripped_text)
}

/// Returns the stripped text of the last direct child element named `tag`
pub fn last_child_text(element: ElementRef<'_>, tag: &str) -> Option<String> {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == tag)
        .last()
        .map(stripped_text)
}

/// Returns the text of every comment node under `element`, in document order
pub fn comments(element: ElementRef<'_>) -> Vec<&str> {
    element
        .descendants()
        .filter_map(|node| node.value().as_comment())
        .map(|comment| &**comment)
        .collect()
}
