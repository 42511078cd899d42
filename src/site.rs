/// Number of "trending" links every listing page renders before the real
/// chapter list. They share the chapter URL shape, so they are dropped by
/// position.
pub const DEFAULT_DECOY_COUNT: usize = 6;
pub const DEFAULT_CHAPTER_EXTENSION: &str = "html";
pub const LAST_PAGE_LABEL: &str = "Final";
pub const CHAPTER_TITLE_CLASS: &str = "chapter-title";
pub const CHAPTER_BODY_ID: &str = "chapter-content";
pub const PAGE_QUERY_PARAM: &str = "page";

/// Markup facts about the site being downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteProfile {
    pub decoy_count: usize,
    pub chapter_extension: String,
    pub last_page_label: String,
    pub title_class: String,
    pub body_id: String,
    pub page_query_param: String,
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            decoy_count: DEFAULT_DECOY_COUNT,
            chapter_extension: DEFAULT_CHAPTER_EXTENSION.to_owned(),
            last_page_label: LAST_PAGE_LABEL.to_owned(),
            title_class: CHAPTER_TITLE_CLASS.to_owned(),
            body_id: CHAPTER_BODY_ID.to_owned(),
            page_query_param: PAGE_QUERY_PARAM.to_owned(),
        }
    }
}
