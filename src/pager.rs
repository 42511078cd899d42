use regex::Regex;

use crate::error::{Error, Result};

/// Reads the number of listing pages from the anchor page.
///
/// The anchor page links to the last listing page with an element like
/// `<a href="/novel/?page=12" data-page="12">Final »</a>`. Text and inline
/// tags may come before the label, but the match never crosses a closing
/// `</a>`.
#[derive(Debug, Clone)]
pub struct Pager {
    marker: Regex,
    digits: Regex,
}

impl Pager {
    pub fn new(last_page_label: &str) -> Result<Self> {
        let pattern = format!(
            r#"data-page="\d+"[^>]*>(?:[^<]|<[^/][^>]*>|</[^a][^>]*>)*?{}"#,
            regex::escape(last_page_label)
        );
        let marker = Regex::new(&pattern)
            .map_err(|err| Error::parse(format!("build last page marker pattern: {err}")))?;
        let digits = Regex::new(r"\d+")
            .map_err(|err| Error::parse(format!("build digits pattern: {err}")))?;
        Ok(Self { marker, digits })
    }

    /// Returns the last listing page number. The first marker wins.
    pub fn pages_total(&self, anchor_markup: &str) -> Result<u32> {
        let fragment = self
            .marker
            .find(anchor_markup)
            .ok_or_else(|| Error::parse("last page marker not found"))?
            .as_str();
        let digits = self
            .digits
            .find(fragment)
            .ok_or_else(|| Error::parse(format!("no page number in marker: {fragment}")))?
            .as_str();
        let pages: u32 = digits
            .parse()
            .map_err(|err| Error::parse(format!("page number {digits}: {err}")))?;
        if pages == 0 {
            return Err(Error::parse("last page marker points at page 0"));
        }

        tracing::info!(pages, "pages in chapter listing");
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::LAST_PAGE_LABEL;

    fn pager() -> Pager {
        Pager::new(LAST_PAGE_LABEL).expect("build pager")
    }

    #[test]
    fn reads_last_page_from_marker() -> anyhow::Result<()> {
        let html = r#"<ul class="pagination">
  <li><a href="/demo/?page=2" data-page="2">2</a></li>
  <li><a href="/demo/?page=3" data-page="3">Final »</a></li>
</ul>"#;
        assert_eq!(pager().pages_total(html)?, 3);
        Ok(())
    }

    #[test]
    fn tolerates_inline_tags_around_label() -> anyhow::Result<()> {
        let html = r#"<a class="last" data-page="41" href="/demo/?page=41"><span>Final</span> »</a>"#;
        assert_eq!(pager().pages_total(html)?, 41);
        Ok(())
    }

    #[test]
    fn accepts_text_before_label() -> anyhow::Result<()> {
        let entity = r#"<a href="/demo/?page=3" data-page="3">&raquo; Final</a>"#;
        assert_eq!(pager().pages_total(entity)?, 3);

        let sentence = r#"<a data-page="5" href="/demo/?page=5">Ir a la página Final</a>"#;
        assert_eq!(pager().pages_total(sentence)?, 5);
        Ok(())
    }

    #[test]
    fn label_after_closing_tag_belongs_to_next_element() -> anyhow::Result<()> {
        let html = r#"<a data-page="2">Next</a> <a data-page="8"><i></i> Final</a>"#;
        assert_eq!(pager().pages_total(html)?, 8);
        Ok(())
    }

    #[test]
    fn single_page_collection() -> anyhow::Result<()> {
        let html = r#"<a href="/demo/?page=1" data-page="1">Final</a>"#;
        assert_eq!(pager().pages_total(html)?, 1);
        Ok(())
    }

    #[test]
    fn first_marker_wins() -> anyhow::Result<()> {
        let html = r#"<a data-page="7">Final</a>
<a data-page="9">Final</a>"#;
        assert_eq!(pager().pages_total(html)?, 7);
        Ok(())
    }

    #[test]
    fn missing_marker_is_a_parse_error() {
        let html = r#"<a href="/demo/?page=2" data-page="2">Next »</a>"#;
        assert!(matches!(pager().pages_total(html), Err(Error::Parse { .. })));
    }

    #[test]
    fn zero_or_overflowing_page_is_a_parse_error() {
        assert!(matches!(
            pager().pages_total(r#"<a data-page="0">Final</a>"#),
            Err(Error::Parse { .. })
        ));
        assert!(matches!(
            pager().pages_total(r#"<a data-page="99999999999">Final</a>"#),
            Err(Error::Parse { .. })
        ));
    }
}
