//! Detail link recovery from comment markup
//!
//! The job board renders each listing card without a visible link to its
//! detail page; the link only survives inside an HTML comment left in the
//! container, e.g. `<!-- <a href="https://jobyaari.com/jobdetails/1234"> -->`.

use regex::Regex;

/// Matches `href="<prefix><id>"` inside comment text
#[derive(Debug, Clone)]
pub struct DetailLinkPattern {
    regex: Regex,
}

impl DetailLinkPattern {
    /// Builds the pattern for detail pages living under `prefix`
    pub fn new(prefix: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!(r#"href="({}(\d+))""#, regex::escape(prefix)))?;
        Ok(Self { regex })
    }

    /// Returns the first detail URL in `comment` with a positive listing id
    pub fn find(&self, comment: &str) -> Option<String> {
        self.regex
            .captures_iter(comment)
            .find(|caps| caps[2].bytes().any(|b| b != b'0'))
            .map(|caps| caps[1].to_string())
    }

    /// Returns the first detail URL across comments, in the given order
    pub fn find_in<'a, I>(&self, comments: I) -> Option<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        comments.into_iter().find_map(|comment| self.find(comment))
    }
}
