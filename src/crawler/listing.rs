//! Category listing page parser
//!
//! One `div.drop__container` per job post. Inside it, the `div.drop__card`
//! carries the visible fields and a comment somewhere in the container carries
//! the detail page link.

use crate::crawler::comment::DetailLinkPattern;
use crate::crawler::parser::{
    comments, last_descendant_text, parse_selector, select_first, stripped_text,
};
use crate::record::{or_not_found, ListingFragment};
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};

lazy_static! {
    static ref CONTAINER: Selector = parse_selector!("div.drop__container");
    static ref CARD: Selector = parse_selector!("div.drop__card");
    static ref PROFESSION: Selector = parse_selector!("span.drop__profession");
    static ref SALARY: Selector = parse_selector!("span.salary-price");
    static ref EXPERIENCE: Selector = parse_selector!("span.drop__exp");
    static ref QUALIFICATION: Selector = parse_selector!("div.salary");
    static ref SPAN: Selector = parse_selector!("span");
}

/// Result of parsing one category page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedListingPage {
    /// Number of listing containers on the page, including skipped ones
    pub containers: usize,

    /// Fragments in document order
    pub fragments: Vec<ListingFragment>,
}

/// Parses a category listing page into listing fragments
///
/// Containers without a card are skipped. Every other container produces a
/// fragment; a missing node only blanks its own field.
///
/// # Example
///
/// ```
/// use jobyaari_scraper::crawler::{parse_listing_page, DetailLinkPattern};
///
/// let html = r#"<div class="drop__container"><div class="drop__card">
///     <span class="drop__profession">Acme Corp</span></div></div>"#;
/// let pattern = DetailLinkPattern::new("https://jobyaari.com/jobdetails/").unwrap();
/// let page = parse_listing_page(html, &pattern);
/// assert_eq!(page.fragments[0].organization_name, "Acme Corp");
/// ```
pub fn parse_listing_page(html: &str, pattern: &DetailLinkPattern) -> ParsedListingPage {
    let document = Html::parse_document(html);

    let mut page = ParsedListingPage::default();
    for (position, container) in document.select(&CONTAINER).enumerate() {
        page.containers += 1;
        match parse_container(container, position, pattern) {
            Some(fragment) => page.fragments.push(fragment),
            None => tracing::debug!("Skipping listing container {}: no card", position),
        }
    }

    page
}

fn parse_container(
    container: ElementRef<'_>,
    position: usize,
    pattern: &DetailLinkPattern,
) -> Option<ListingFragment> {
    let card = select_first(container, &CARD)?;

    Some(ListingFragment {
        position,
        organization_name: or_not_found(extract_organization(card)),
        salary: or_not_found(extract_salary(card)),
        experience: or_not_found(extract_experience(card)),
        qualification: or_not_found(extract_qualification(card)),
        post_url: pattern.find_in(comments(container)),
    })
}

fn extract_organization(card: ElementRef<'_>) -> Option<String> {
    select_first(card, &PROFESSION).map(stripped_text)
}

fn extract_salary(card: ElementRef<'_>) -> Option<String> {
    select_first(card, &SALARY).and_then(|node| last_descendant_text(node, &SPAN))
}

fn extract_experience(card: ElementRef<'_>) -> Option<String> {
    select_first(card, &EXPERIENCE)
        .and_then(|node| last_descendant_text(node, &SPAN))
        .map(|text| strip_years(&text))
}

fn extract_qualification(card: ElementRef<'_>) -> Option<String> {
    select_first(card, &QUALIFICATION).map(stripped_text)
}

/// Drops a trailing `Years` unit label: `"2 Years"` becomes `"2"`
fn strip_years(text: &str) -> String {
    let text = text.trim();
    text.strip_suffix("Years").unwrap_or(text).trim().to_string()
}
