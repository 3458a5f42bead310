//! Detail page parser
//!
//! Extracts the two fields only the detail page carries: the age limit and
//! the number of job openings.

use crate::crawler::parser::{last_child_text, parse_selector, select_first, stripped_text};
use crate::record::{or_not_found, DetailFields};
use lazy_static::lazy_static;
use scraper::{Html, Selector};

lazy_static! {
    static ref AGE: Selector = parse_selector!("li.age-list div.job-location");
    static ref DETAIL_ROWS: Selector = parse_selector!("div.job-detail-detail ul.list li");
    static ref ROW_LABEL: Selector = parse_selector!("div.text");
    static ref ROW_DETAILS: Selector = parse_selector!("div.details");
}

/// Label of the detail row holding the vacancy count
pub const OPENINGS_LABEL: &str = "Job Openings";

/// What the detail page yielded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDetailPage {
    pub fields: DetailFields,

    /// Whether a `Job Openings` row was found at all
    pub openings_row_found: bool,
}

/// Parses a detail page
///
/// The first row whose label contains `Job Openings` and that has a details
/// node decides the vacancy count; later rows are never consulted.
pub fn parse_detail_page(html: &str) -> ParsedDetailPage {
    let document = Html::parse_document(html);

    let age_limit = document.select(&AGE).next().map(stripped_text);

    let mut openings_row_found = false;
    let mut vacancies = None;
    for row in document.select(&DETAIL_ROWS) {
        let Some(label) = select_first(row, &ROW_LABEL) else {
            continue;
        };
        if !label.text().collect::<String>().contains(OPENINGS_LABEL) {
            continue;
        }
        let Some(details) = select_first(row, &ROW_DETAILS) else {
            continue;
        };

        openings_row_found = true;
        vacancies = last_child_text(details, "div");
        break;
    }

    ParsedDetailPage {
        fields: DetailFields {
            vacancies: or_not_found(vacancies),
            age_limit: or_not_found(age_limit),
        },
        openings_row_found,
    }
}
