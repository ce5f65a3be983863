// ABOUTME: Slide segmentation for deckmark documents
// ABOUTME: Splits the document at thematic breaks and classifies each resulting slide

use serde::Serialize;

use crate::blocks::{LIVE_DIAGRAM_LANGUAGES, REMOTE_DIAGRAM_LANGUAGES};
use crate::classify;
use crate::frontmatter::FrontMatter;
use crate::scan::{self, LineRole, ScannedLine};

/// Title used when neither front matter nor a level-1 heading names the deck.
pub const PLACEHOLDER_TITLE: &str = "Slide";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlideKind {
    /// Ordinal 0: carries the deck title and hosts the outline.
    Title { title: String },
    /// Table slides are passed through as markdown.
    Table,
    Regular { has_text: bool },
}

/// A level-2 heading of a later slide, listed on its chapter's slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildHeading {
    pub title: String,
    pub slide_ordinal: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slide {
    pub ordinal: usize,
    pub kind: SlideKind,
    pub raw_content: String,
    /// Most recent level-1 heading at or before this slide. Empty on the title slide.
    pub chapter_title: String,
    pub child_headings: Vec<ChildHeading>,
}

impl Slide {
    pub fn is_title(&self) -> bool {
        matches!(self.kind, SlideKind::Title { .. })
    }
}

/// One break-delimited stretch of source, with what the slide passes need to know.
#[derive(Debug, Default)]
struct Segment<'a> {
    lines: Vec<ScannedLine<'a>>,
}

impl<'a> Segment<'a> {
    /// Source of the segment without surrounding blank lines. Indentation of
    /// the first line is kept so re-splitting the content finds the same breaks.
    fn raw_content(&self) -> String {
        let lines: Vec<&str> = self
            .lines
            .iter()
            .map(|line| line.text)
            .skip_while(|text| text.trim().is_empty())
            .collect();
        lines.join("\n").trim_end().to_string()
    }

    fn first_heading(&self, level: u8) -> Option<&'a str> {
        self.lines
            .iter()
            .filter_map(ScannedLine::heading)
            .find(|(found, _)| *found == level)
            .map(|(_, text)| text)
    }

    /// Column separators together with a header-separator row, outside fences.
    fn is_table(&self) -> bool {
        let content = || {
            self.lines
                .iter()
                .filter(|line| line.role == LineRole::Content)
        };
        content().any(|line| line.text.contains('|'))
            && content().any(|line| classify::is_table_separator(line.text))
    }

    /// Anything besides headings, image-only lines, comments and diagrams.
    fn has_text(&self) -> bool {
        self.lines.iter().any(|line| {
            if line.is_fenced() {
                return !line.fence_language().is_some_and(is_diagram_language);
            }
            let trimmed = line.text.trim();
            !(trimmed.is_empty()
                || trimmed.starts_with('#')
                || trimmed.starts_with("<!--")
                || classify::image_only(trimmed).is_some())
        })
    }
}

fn is_diagram_language(language: &str) -> bool {
    let language = language.to_lowercase();
    LIVE_DIAGRAM_LANGUAGES.contains(&language.as_str())
        || REMOTE_DIAGRAM_LANGUAGES.contains(&language.as_str())
}

fn segments(body: &str) -> Vec<Segment<'_>> {
    let mut segments = vec![Segment::default()];
    for line in scan::scan(body) {
        match line.role {
            LineRole::Break => segments.push(Segment::default()),
            _ => {
                if let Some(current) = segments.last_mut() {
                    current.lines.push(line);
                }
            }
        }
    }
    segments
}

/// Split a document body (front matter already removed) into slides.
///
/// With front matter a synthetic empty slide takes ordinal 0, so the first
/// real segment becomes ordinal 1.
pub fn segment_slides(body: &str, front_matter: Option<&FrontMatter>) -> Vec<Slide> {
    let mut segments = segments(body);
    if front_matter.is_some() {
        segments.insert(0, Segment::default());
    }

    let (mut slides, _) = segments.iter().enumerate().fold(
        (Vec::with_capacity(segments.len()), String::new()),
        |(mut slides, chapter), (ordinal, segment)| {
            let chapter = segment
                .first_heading(1)
                .map(str::to_string)
                .unwrap_or(chapter);
            slides.push(build_slide(ordinal, segment, &chapter, front_matter));
            (slides, chapter)
        },
    );

    attach_child_headings(&mut slides, &segments);
    slides
}

fn build_slide(
    ordinal: usize,
    segment: &Segment<'_>,
    chapter: &str,
    front_matter: Option<&FrontMatter>,
) -> Slide {
    let (kind, chapter_title) = if ordinal == 0 {
        let title = match front_matter {
            Some(front_matter) => front_matter.title.clone(),
            None if !chapter.is_empty() => chapter.to_string(),
            None => PLACEHOLDER_TITLE.to_string(),
        };
        (SlideKind::Title { title }, String::new())
    } else if segment.is_table() {
        (SlideKind::Table, chapter.to_string())
    } else {
        let has_text = segment.has_text();
        (SlideKind::Regular { has_text }, chapter.to_string())
    };

    Slide {
        ordinal,
        kind,
        raw_content: segment.raw_content(),
        chapter_title,
        child_headings: Vec::new(),
    }
}

/// Every slide with a level-1 heading lists the level-2 headings of the
/// slides that follow it, up to the next level-1 heading.
fn attach_child_headings(slides: &mut [Slide], segments: &[Segment<'_>]) {
    let mut chapter: Option<usize> = None;
    for (ordinal, segment) in segments.iter().enumerate() {
        if segment.first_heading(1).is_some() {
            chapter = Some(ordinal);
            continue;
        }
        if let (Some(owner), Some(title)) = (chapter, segment.first_heading(2)) {
            slides[owner].child_headings.push(ChildHeading {
                title: title.to_string(),
                slide_ordinal: ordinal,
            });
        }
    }
}
