// ABOUTME: Deck assembly for deckmark documents
// ABOUTME: Runs front matter, slide segmentation and outline compilation for one document

use log::{debug, info, warn};
use std::fs;
use std::path::Path;

use crate::agenda::{AgendaResolver, NoAgenda, PageRef};
use crate::errors::{DeckError, Result};
use crate::frontmatter::{split_front_matter, FrontMatter};
use crate::outline::{compile_outline, Outline};
use crate::slides::{segment_slides, Slide, SlideKind, PLACEHOLDER_TITLE};
use crate::utils;

/// Everything produced by parsing one document. Owned by the caller; nothing
/// is shared between documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    /// Markdown file name the deck was parsed from.
    pub name: String,
    pub front_matter: Option<FrontMatter>,
    pub slides: Vec<Slide>,
    pub outline: Outline,
    pub parent_page: PageRef,
    pub next_page: Option<PageRef>,
}

impl Deck {
    /// Parse a document. Never fails; malformed markup yields a best-effort deck.
    pub fn parse(name: &str, text: &str, agenda: Option<&dyn AgendaResolver>) -> Self {
        let (front_matter, body) = split_front_matter(text);
        let slides = segment_slides(body, front_matter.as_ref());
        let outline = compile_outline(body, front_matter.as_ref(), name, agenda);

        let resolver: &dyn AgendaResolver = agenda.unwrap_or(&NoAgenda);
        let parent_page = resolver.parent_page(name);
        let next_page = resolver.next_document(name);

        debug!(
            "Parsed {}: {} slides, {} outline branches, front matter: {}",
            name,
            slides.len(),
            outline.branches.len(),
            front_matter.is_some()
        );

        Self {
            name: name.to_string(),
            front_matter,
            slides,
            outline,
            parent_page,
            next_page,
        }
    }

    /// Read and parse a markdown file named on the command line. An empty
    /// file is reported as nothing to parse.
    pub fn from_file(path: &Path, agenda: Option<&dyn AgendaResolver>) -> Result<Self> {
        let text = read_markdown(path)?;
        if text.trim().is_empty() {
            return Err(DeckError::EmptyInputError(path.to_path_buf()));
        }
        Ok(Self::parse(&utils::path_file_name(path), &text, agenda))
    }

    /// Read and parse a markdown file found in a source directory. Empty
    /// files still produce a deck with a single placeholder title slide.
    pub fn load(path: &Path, agenda: Option<&dyn AgendaResolver>) -> Result<Self> {
        let text = read_markdown(path)?;
        if text.trim().is_empty() {
            warn!("{:?} is empty, writing a placeholder deck", path);
        }
        Ok(Self::parse(&utils::path_file_name(path), &text, agenda))
    }

    /// Deck title: front matter, else the title slide's heading, else the placeholder.
    pub fn title(&self) -> &str {
        match self.slides.first().map(|slide| &slide.kind) {
            Some(SlideKind::Title { title }) => title,
            _ => PLACEHOLDER_TITLE,
        }
    }

    pub fn page(&self) -> PageRef {
        PageRef::for_markdown(&self.name)
    }
}

fn read_markdown(path: &Path) -> Result<String> {
    info!("Parsing markdown: {:?}", path);
    utils::validate_file_exists(path)?;
    Ok(fs::read_to_string(path)?)
}
