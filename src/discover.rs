use std::path::Path;

use url::Url;

use crate::collection::Collection;
use crate::error::Result;
use crate::locator::LocatorExtractor;
use crate::pager::Pager;
use crate::transport::Transport;

pub struct Discovery<'a> {
    pub transport: &'a Transport,
    pub pager: &'a Pager,
    pub extractor: &'a dyn LocatorExtractor,
    pub page_query_param: &'a str,
}

impl Discovery<'_> {
    /// Walks every listing page and returns chapter locators in page order,
    /// then document order within a page. Any page failure aborts the walk.
    ///
    /// When `anchor_copy` is set the anchor page markup is written there.
    pub async fn discover_all(
        &self,
        collection: &Collection,
        anchor_copy: Option<&Path>,
    ) -> Result<Vec<Url>> {
        let home = collection.home_address();
        tracing::info!(url = %home, "fetching anchor page");
        let anchor = self
            .transport
            .get_text(home)
            .await
            .inspect_err(|err| tracing::error!(url = %home, %err, "anchor page fetch failed"))?;
        if let Some(path) = anchor_copy {
            crate::store::write_text(path, &anchor)?;
        }

        let pages = self
            .pager
            .pages_total(&anchor)
            .inspect_err(|err| tracing::error!(url = %home, %err, "no pagination bound"))?;

        let mut locators = Vec::new();
        for page in 1..=pages {
            let page_url = collection.listing_address(self.page_query_param, page);
            tracing::info!(page, pages, "extracting chapter urls from listing page");
            let markup = self
                .transport
                .get_text(&page_url)
                .await
                .inspect_err(|err| {
                    tracing::error!(page, url = %page_url, %err, "listing page fetch failed");
                })?;
            let found = self
                .extractor
                .extract(&markup, collection)
                .inspect_err(|err| {
                    tracing::error!(page, %err, "listing page extraction failed");
                })?;
            tracing::info!(page, count = found.len(), "chapter urls retrieved");
            locators.extend(found);
        }

        tracing::info!(total = locators.len(), "chapter discovery complete");
        Ok(locators)
    }
}
