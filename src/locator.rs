use regex::Regex;
use url::Url;

use crate::collection::Collection;
use crate::error::{Error, Result};

/// Finds chapter locators on one listing page, in document order.
pub trait LocatorExtractor: Send + Sync {
    fn extract(&self, page_markup: &str, collection: &Collection) -> Result<Vec<Url>>;
}

/// Matches chapter paths of the shape `/{slug}-{digits}.{extension}` and
/// drops the leading decoy block. The slug may be written raw or
/// percent-encoded.
#[derive(Debug, Clone)]
pub struct PatternExtractor {
    extension: String,
    decoy_count: usize,
}

impl PatternExtractor {
    pub fn new(extension: impl Into<String>, decoy_count: usize) -> Self {
        Self {
            extension: extension.into(),
            decoy_count,
        }
    }

    fn chapter_path_pattern(&self, collection: &Collection) -> Result<Regex> {
        let mut slugs = vec![regex::escape(collection.slug())];
        if collection.encoded_slug() != collection.slug() {
            slugs.push(regex::escape(collection.encoded_slug()));
        }
        let pattern = format!(
            r"/(?:{})-\d+\.{}",
            slugs.join("|"),
            regex::escape(&self.extension)
        );
        Regex::new(&pattern).map_err(|err| Error::parse(format!("build chapter pattern: {err}")))
    }
}

impl LocatorExtractor for PatternExtractor {
    fn extract(&self, page_markup: &str, collection: &Collection) -> Result<Vec<Url>> {
        let pattern = self.chapter_path_pattern(collection)?;
        pattern
            .find_iter(page_markup)
            .skip(self.decoy_count)
            .map(|found| {
                let absolute = format!("{}{}", collection.base_address(), found.as_str());
                Url::parse(&absolute).map_err(|err| {
                    Error::parse(format!("build chapter locator {absolute}: {err}"))
                })
            })
            .collect()
    }
}
