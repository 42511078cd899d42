use url::Url;

use crate::assemble::Assembler;
use crate::error::{Error, Result};
use crate::render::Renderer;
use crate::site::SiteProfile;

/// Separator placed between paragraphs of a chapter body.
pub const PARAGRAPH_BREAK: &str = "<br><br>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// 1-based position in the collection.
    pub sequence: usize,
    /// `sequence` zero-padded to the width of the chapter count.
    pub sequence_padded: String,
    pub title: String,
    /// Plain text with paragraphs joined by [`PARAGRAPH_BREAK`].
    pub body: String,
    pub locator: Url,
}

/// Loads one chapter page and builds its [`Chapter`] value.
pub async fn fetch_chapter(
    renderer: &mut dyn Renderer,
    site: &SiteProfile,
    locator: &Url,
    sequence: usize,
    total: usize,
) -> Result<Chapter> {
    renderer.navigate(locator).await?;

    let title = renderer
        .text_by_class(&site.title_class)
        .await?
        .ok_or_else(|| Error::extraction(locator, format!("title .{}", site.title_class)))?;
    let body = renderer
        .text_by_id(&site.body_id)
        .await?
        .ok_or_else(|| Error::extraction(locator, format!("body #{}", site.body_id)))?;

    Ok(Chapter {
        sequence,
        sequence_padded: pad_sequence(sequence, total),
        title: title_case(title.trim()),
        body: normalize_paragraphs(&body),
        locator: locator.clone(),
    })
}

/// Fetches a chapter and persists it right away, so completed chapters stay
/// on disk when a later one fails.
pub async fn fetch_and_normalize(
    renderer: &mut dyn Renderer,
    assembler: &Assembler,
    site: &SiteProfile,
    locator: &Url,
    sequence: usize,
    total: usize,
) -> Result<Chapter> {
    let chapter = fetch_chapter(renderer, site, locator, sequence, total).await?;
    let path = assembler.persist_chapter(&chapter)?;
    tracing::debug!(sequence, path = %path.display(), "saved chapter");
    Ok(chapter)
}

/// Replaces every run of line breaks with [`PARAGRAPH_BREAK`].
pub fn normalize_paragraphs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_break = false;
    for ch in text.chars() {
        if ch == '\n' || ch == '\r' {
            if !in_break {
                out.push_str(PARAGRAPH_BREAK);
                in_break = true;
            }
            continue;
        }
        in_break = false;
        out.push(ch);
    }
    out
}

/// `sequence` left-padded with zeros to the number of digits in `total`.
pub fn pad_sequence(sequence: usize, total: usize) -> String {
    let width = total.to_string().len();
    format!("{sequence:0width$}")
}

/// Upper-cases the first letter of every word and lower-cases the rest. A
/// word starts at any letter that does not follow another letter.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}
