//! The persisted job listing record
//!
//! A [`JobListing`] is built from a [`ListingFragment`] (what the category page
//! alone reveals) and optionally enriched with [`DetailFields`] from the
//! listing's detail page.

use serde::{Deserialize, Serialize};

/// Placeholder for a field that could not be recovered from markup
pub const NOT_FOUND: &str = "Not Found";

/// Column order of the persisted dataset
pub const COLUMNS: [&str; 8] = [
    "Category",
    "Organization Name",
    "Vacancies",
    "Salary",
    "Age Limit",
    "Experience",
    "Qualification",
    "Post URL",
];

/// Returns the extracted value or the sentinel
pub fn or_not_found(value: Option<String>) -> String {
    value.unwrap_or_else(|| NOT_FOUND.to_string())
}

/// Returns true if the value is the sentinel
pub fn is_not_found(value: &str) -> bool {
    value == NOT_FOUND
}

/// A listing as extracted from a category page, before detail enrichment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingFragment {
    /// Position of the source container in document order
    pub position: usize,
    pub organization_name: String,
    pub salary: String,
    pub experience: String,
    pub qualification: String,
    /// Detail page link recovered from comment markup
    pub post_url: Option<String>,
}

/// Fields recovered from a listing's detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailFields {
    pub vacancies: String,
    pub age_limit: String,
}

impl DetailFields {
    /// Both fields unrecovered (detail page missing or unreachable)
    pub fn not_found() -> Self {
        Self {
            vacancies: NOT_FOUND.to_string(),
            age_limit: NOT_FOUND.to_string(),
        }
    }
}

/// One row of the dataset
///
/// Field order is the column order of the CSV file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobListing {
    #[serde(rename = "Category")]
    pub category: String,

    #[serde(rename = "Organization Name")]
    pub organization_name: String,

    #[serde(rename = "Vacancies")]
    pub vacancies: String,

    #[serde(rename = "Salary")]
    pub salary: String,

    #[serde(rename = "Age Limit")]
    pub age_limit: String,

    #[serde(rename = "Experience")]
    pub experience: String,

    #[serde(rename = "Qualification")]
    pub qualification: String,

    #[serde(rename = "Post URL")]
    pub post_url: String,
}

impl JobListing {
    /// Builds a listing from a fragment with detail fields still unresolved
    pub fn from_fragment(category: &str, fragment: ListingFragment) -> Self {
        Self {
            category: category.to_string(),
            organization_name: fragment.organization_name,
            vacancies: NOT_FOUND.to_string(),
            salary: fragment.salary,
            age_limit: NOT_FOUND.to_string(),
            experience: fragment.experience,
            qualification: fragment.qualification,
            post_url: or_not_found(fragment.post_url),
        }
    }

    /// Merges detail page fields into this listing
    pub fn merge_detail(&mut self, detail: DetailFields) {
        self.vacancies = detail.vacancies;
        self.age_limit = detail.age_limit;
    }

    /// Whether this listing belongs in the persisted dataset
    pub fn is_retained(&self) -> bool {
        !is_not_found(&self.organization_name)
    }

    /// Whether a detail page link was recovered for this listing
    pub fn has_post_url(&self) -> bool {
        !is_not_found(&self.post_url)
    }

    /// Field values in column order
    pub fn fields(&self) -> [&str; 8] {
        [
            &self.category,
            &self.organization_name,
            &self.vacancies,
            &self.salary,
            &self.age_limit,
            &self.experience,
            &self.qualification,
            &self.post_url,
        ]
    }
}
