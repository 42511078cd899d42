use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::PathBuf;

use crate::chapter::Chapter;
use crate::error::{Error, Result};
use crate::formats::ChapterRecord;
use crate::store::{self, OutputLayout};
use crate::template::Templates;

/// Renders chapters through the templates and writes them into the output
/// layout.
#[derive(Debug, Clone)]
pub struct Assembler {
    layout: OutputLayout,
    templates: Templates,
    collection_title: String,
}

impl Assembler {
    pub fn new(
        layout: OutputLayout,
        templates: Templates,
        collection_title: impl Into<String>,
    ) -> Self {
        Self {
            layout,
            templates,
            collection_title: collection_title.into(),
        }
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    pub fn render_chapter(&self, chapter: &Chapter) -> Result<String> {
        self.templates.render_chapter(&chapter.title, &chapter.body)
    }

    pub fn chapter_path(&self, chapter: &Chapter) -> PathBuf {
        let stem = format!("{}_{}", chapter.sequence_padded, dashed_title(&chapter.title));
        self.layout.chapter_path(&stem)
    }

    pub fn persist_chapter(&self, chapter: &Chapter) -> Result<PathBuf> {
        let path = self.chapter_path(chapter);
        store::write_text(&path, &self.render_chapter(chapter)?)?;
        Ok(path)
    }

    /// Renders the collection document with every chapter in the given order.
    pub fn render_collection(&self, chapters: &[Chapter]) -> Result<String> {
        let documents = chapters
            .iter()
            .map(|chapter| self.render_chapter(chapter))
            .collect::<Result<Vec<_>>>()?;
        self.templates
            .render_novel(&self.collection_title, &documents)
    }

    pub fn assemble_collection(&self, chapters: &[Chapter]) -> Result<(String, PathBuf)> {
        let document = self.render_collection(chapters)?;
        let path = self.layout.collection_path();
        store::write_text(&path, &document)?;
        Ok((document, path))
    }

    pub fn write_manifest(&self, records: &[ChapterRecord]) -> Result<PathBuf> {
        let path = self.layout.manifest_path();
        let file = File::create(&path).map_err(|err| Error::io(&path, err))?;
        let mut out = BufWriter::new(file);
        for record in records {
            serde_json::to_writer(&mut out, record)
                .map_err(|err| Error::io(&path, std::io::Error::other(err)))?;
            out.write_all(b"\n").map_err(|err| Error::io(&path, err))?;
        }
        out.flush().map_err(|err| Error::io(&path, err))?;
        Ok(path)
    }
}

/// Lower-cased title with whitespace runs replaced by `-`, keeping only
/// characters that are safe in a file name.
pub fn dashed_title(title: &str) -> String {
    title
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|ch| ch.is_alphanumeric() || *ch == '-' || *ch == '_')
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
