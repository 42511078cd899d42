use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const CHAPTERS_DIR: &str = "chapters";
pub const HOME_PAGE_FILE: &str = "home.html";
pub const MANIFEST_FILE: &str = "chapters.jsonl";

/// Where a run writes its output:
///
/// ```text
/// <root>/home.html
/// <root>/<slug>/<slug>.html
/// <root>/<slug>/chapters.jsonl
/// <root>/<slug>/chapters/<seq>_<dashed-title>.html
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
    slug: String,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>, slug: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            slug: slug.into(),
        }
    }

    pub fn home_page_path(&self) -> PathBuf {
        self.root.join(HOME_PAGE_FILE)
    }

    pub fn collection_dir(&self) -> PathBuf {
        self.root.join(&self.slug)
    }

    pub fn chapters_dir(&self) -> PathBuf {
        self.collection_dir().join(CHAPTERS_DIR)
    }

    pub fn collection_path(&self) -> PathBuf {
        self.collection_dir().join(format!("{}.html", self.slug))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.collection_dir().join(MANIFEST_FILE)
    }

    pub fn chapter_path(&self, file_stem: &str) -> PathBuf {
        self.chapters_dir().join(format!("{file_stem}.html"))
    }

    pub fn create_dirs(&self) -> Result<()> {
        let chapters_dir = self.chapters_dir();
        std::fs::create_dir_all(&chapters_dir).map_err(|err| Error::io(&chapters_dir, err))
    }
}

/// Writes `text` to `path`, replacing any previous content.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    if let Some(parent_dir) = path.parent()
        && !parent_dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent_dir).map_err(|err| Error::io(parent_dir, err))?;
    }

    std::fs::write(path, text).map_err(|err| Error::io(path, err))
}
