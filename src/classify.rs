// ABOUTME: Line classification for the deckmark markdown dialect
// ABOUTME: Decides which block construct a single source line begins or continues

use once_cell::sync::Lazy;
use regex::Regex;

static BULLET_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([ \t]*)([-*])\s+(.*)$").unwrap());
static ORDERED_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([ \t]*)(\d+)\.\s+(.*)$").unwrap());
static IMAGE_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^!\[([^\]]*)\]\(([^)]+)\)\s*$").unwrap());
static TABLE_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\|?[\s\-:|]+\|\s*$").unwrap());
static FENCE_LANGUAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```(\w+)").unwrap());

/// The thematic-break marker that separates slides.
pub const THEMATIC_BREAK: &str = "---";

const FENCE_MARKER: &str = "```";

/// Bullet character of an unordered list item. Kept apart for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bullet {
    /// `-`
    Dash,
    /// `*`
    Dot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMarker {
    Bullet(Bullet),
    Ordered(u64),
}

impl ListMarker {
    pub fn is_ordered(&self) -> bool {
        matches!(self, ListMarker::Ordered(_))
    }

    /// Two markers belong to the same list when both are ordered or both are bullets.
    pub fn same_list_kind(&self, other: &ListMarker) -> bool {
        self.is_ordered() == other.is_ordered()
    }
}

/// Minimal lookback state the classifier needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineContext {
    pub in_fence: bool,
    pub in_list: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// Opens or closes a fence. `language` is only meaningful on the opening line.
    FenceDelimiter { language: Option<&'a str> },
    /// Verbatim line inside a fence.
    FenceContent(&'a str),
    Heading { level: u8, text: &'a str },
    Blockquote(&'a str),
    ListItem {
        marker: ListMarker,
        depth: usize,
        text: &'a str,
    },
    /// Indented, non-blank text while a list is open.
    Continuation { indent: usize, text: &'a str },
    TableRow(&'a str),
    Blank,
    Image { alt: &'a str, src: &'a str },
    Paragraph(&'a str),
}

/// Classify one line. First match wins, in this order: fence delimiter,
/// heading, blockquote, list item, table row, blank, image-only, paragraph.
pub fn classify<'a>(line: &'a str, ctx: &LineContext) -> LineClass<'a> {
    if is_fence_delimiter(line) {
        return LineClass::FenceDelimiter {
            language: fence_language(line),
        };
    }
    if ctx.in_fence {
        return LineClass::FenceContent(line);
    }
    if let Some((level, text)) = heading(line) {
        return LineClass::Heading { level, text };
    }
    if let Some(text) = line.strip_prefix('>') {
        return LineClass::Blockquote(text.strip_prefix(' ').unwrap_or(text));
    }
    if let Some((marker, depth, text)) = list_item(line) {
        return LineClass::ListItem {
            marker,
            depth,
            text,
        };
    }
    if ctx.in_list && !line.trim().is_empty() && line.starts_with([' ', '\t']) {
        return LineClass::Continuation {
            indent: indent_width(line),
            text: line.trim(),
        };
    }
    if line.starts_with('|') {
        return LineClass::TableRow(line);
    }
    if line.trim().is_empty() {
        return LineClass::Blank;
    }
    if let Some((alt, src)) = image_only(line) {
        return LineClass::Image { alt, src };
    }
    LineClass::Paragraph(line)
}

pub fn is_fence_delimiter(line: &str) -> bool {
    line.trim_start().starts_with(FENCE_MARKER)
}

/// Language tag of an opening fence line, e.g. `mermaid` for "```mermaid".
pub fn fence_language(line: &str) -> Option<&str> {
    FENCE_LANGUAGE_RE
        .captures(line.trim_start())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn is_thematic_break(line: &str) -> bool {
    line.trim_end() == THEMATIC_BREAK
}

/// Heading level and text for `# `, `## ` and `### ` lines.
pub fn heading(line: &str) -> Option<(u8, &str)> {
    // Longest prefix first so "## x" never reads as a level-1 heading.
    for (level, prefix) in [(3u8, "### "), (2, "## "), (1, "# ")] {
        if let Some(rest) = line.strip_prefix(prefix) {
            let text = rest.trim_end();
            if text.is_empty() {
                return None;
            }
            return Some((level, text));
        }
    }
    None
}

/// Header-separator row of a table, e.g. `|---|:--:|`.
pub fn is_table_separator(line: &str) -> bool {
    line.contains('-') && TABLE_SEPARATOR_RE.is_match(line)
}

/// Alt text and source of a line that holds nothing but one image reference.
pub fn image_only(line: &str) -> Option<(&str, &str)> {
    let caps = IMAGE_LINE_RE.captures(line)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Leading whitespace width with each tab expanded to two spaces.
pub fn indent_width(line: &str) -> usize {
    line.chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(|c| if c == '\t' { 2 } else { 1 })
        .sum()
}

fn list_item(line: &str) -> Option<(ListMarker, usize, &str)> {
    if let Some(caps) = BULLET_ITEM_RE.captures(line) {
        let bullet = match caps.get(2)?.as_str() {
            "*" => Bullet::Dot,
            _ => Bullet::Dash,
        };
        let depth = indent_width(caps.get(1)?.as_str()) / 2;
        return Some((ListMarker::Bullet(bullet), depth, caps.get(3)?.as_str()));
    }
    let caps = ORDERED_ITEM_RE.captures(line)?;
    let number = caps.get(2)?.as_str().parse().unwrap_or(1);
    let depth = indent_width(caps.get(1)?.as_str()) / 2;
    Some((ListMarker::Ordered(number), depth, caps.get(3)?.as_str()))
}
