// ABOUTME: Agenda document handling for multi-document decks
// ABOUTME: Resolves parent, next and child pages for a document from an AGENDA.md outline

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::classify;
use crate::errors::Result;
use crate::outline::{Outline, OutlineBranch, OutlineLeaf, OutlineTarget};
use crate::utils;

static CHAPTER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^## \[(.+?)\]\((.+?)\)$").unwrap());
static SECTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^### \[(.+?)\]\((.+?)\)$").unwrap());

/// The page every document falls back to.
pub const INDEX_PAGE: &str = "index.html";

/// Reference to a generated page, e.g. `02-tools.html`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PageRef(String);

impl PageRef {
    pub fn new(page: impl Into<String>) -> Self {
        Self(page.into())
    }

    pub fn index() -> Self {
        Self::new(INDEX_PAGE)
    }

    /// Page generated for a markdown path: its file stem plus `.html`.
    pub fn for_markdown(path: &str) -> Self {
        Self(utils::html_file_name(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildSection {
    pub title: String,
    pub page: PageRef,
}

/// Cross-document lookups keyed by markdown file name.
pub trait AgendaResolver {
    fn parent_page(&self, name: &str) -> PageRef;
    fn next_document(&self, name: &str) -> Option<PageRef>;
    fn child_sections(&self, name: &str) -> Vec<ChildSection>;
}

/// Resolver used when there is no agenda: no parent, no next, no children.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAgenda;

impl AgendaResolver for NoAgenda {
    fn parent_page(&self, _name: &str) -> PageRef {
        PageRef::index()
    }

    fn next_document(&self, _name: &str) -> Option<PageRef> {
        None
    }

    fn child_sections(&self, _name: &str) -> Vec<ChildSection> {
        Vec::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AgendaEntry {
    title: String,
    source: String,
}

impl AgendaEntry {
    fn page(&self) -> PageRef {
        PageRef::for_markdown(&self.source)
    }

    fn matches(&self, name: &str) -> bool {
        utils::file_name(&self.source) == utils::file_name(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AgendaChapter {
    entry: AgendaEntry,
    sections: Vec<AgendaEntry>,
}

/// A parsed agenda: `# Title`, chapters as `## [Title](file.md)` and their
/// sections as `### [Title](file.md)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Agenda {
    title: Option<String>,
    chapters: Vec<AgendaChapter>,
}

impl Agenda {
    pub fn parse(text: &str) -> Self {
        let mut agenda = Agenda::default();
        for line in text.lines() {
            let line = line.trim_end();
            if agenda.title.is_none() {
                if let Some((1, title)) = classify::heading(line) {
                    agenda.title = Some(title.to_string());
                    continue;
                }
            }
            if let Some(entry) = entry(&CHAPTER_RE, line) {
                agenda.chapters.push(AgendaChapter {
                    entry,
                    sections: Vec::new(),
                });
            } else if let Some(entry) = entry(&SECTION_RE, line) {
                match agenda.chapters.last_mut() {
                    Some(chapter) => chapter.sections.push(entry),
                    None => debug!("Agenda section before any chapter ignored: {}", line),
                }
            }
        }
        agenda
    }

    pub fn load(path: &Path) -> Result<Self> {
        utils::validate_file_exists(path)?;
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// Load an agenda if one exists, degrading to `None` on any failure.
    pub fn load_optional(path: &Path) -> Option<Self> {
        if !path.is_file() {
            return None;
        }
        match Self::load(path) {
            Ok(agenda) => Some(agenda),
            Err(e) => {
                warn!("Ignoring unreadable agenda {:?}: {}", path, e);
                None
            }
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Chapters and sections in reading order.
    fn entries(&self) -> impl Iterator<Item = &AgendaEntry> {
        self.chapters
            .iter()
            .flat_map(|chapter| std::iter::once(&chapter.entry).chain(chapter.sections.iter()))
    }

    /// Pages in reading order, used by site generation to order chapters.
    pub fn pages(&self) -> Vec<PageRef> {
        self.entries().map(AgendaEntry::page).collect()
    }

    /// The agenda's own outline: chapters as branches, sections as leaves.
    pub fn outline(&self) -> Outline {
        let branches = self
            .chapters
            .iter()
            .map(|chapter| OutlineBranch {
                title: chapter.entry.title.clone(),
                target: Some(OutlineTarget::Page(chapter.entry.page())),
                children: chapter
                    .sections
                    .iter()
                    .map(|section| OutlineLeaf {
                        title: section.title.clone(),
                        target: OutlineTarget::Page(section.page()),
                    })
                    .collect(),
            })
            .collect();
        Outline {
            title: self.title.clone().unwrap_or_default(),
            branches,
        }
    }
}

impl AgendaResolver for Agenda {
    fn parent_page(&self, name: &str) -> PageRef {
        self.chapters
            .iter()
            .find(|chapter| chapter.sections.iter().any(|s| s.matches(name)))
            .map(|chapter| chapter.entry.page())
            .unwrap_or_else(PageRef::index)
    }

    fn next_document(&self, name: &str) -> Option<PageRef> {
        let mut entries = self.entries().skip_while(|entry| !entry.matches(name));
        entries.next()?;
        entries.next().map(AgendaEntry::page)
    }

    fn child_sections(&self, name: &str) -> Vec<ChildSection> {
        self.chapters
            .iter()
            .find(|chapter| chapter.entry.matches(name))
            .map(|chapter| {
                chapter
                    .sections
                    .iter()
                    .map(|section| ChildSection {
                        title: section.title.clone(),
                        page: section.page(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn entry(re: &Regex, line: &str) -> Option<AgendaEntry> {
    let caps = re.captures(line)?;
    Some(AgendaEntry {
        title: caps.get(1)?.as_str().to_string(),
        source: caps.get(2)?.as_str().to_string(),
    })
}
