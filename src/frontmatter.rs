// ABOUTME: Front-matter handling for deckmark documents
// ABOUTME: Extracts the optional title block and strips it from the slide source

use once_cell::sync::Lazy;
use regex::Regex;

use crate::classify::THEMATIC_BREAK;

static TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^title:\s*(.+)$").unwrap());

/// Metadata from the leading `---` block. Only produced when a title is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: String,
}

impl FrontMatter {
    /// Slide ordinals are shifted by this amount: the title slide is synthetic.
    pub fn ordinal_offset(front_matter: Option<&FrontMatter>) -> usize {
        usize::from(front_matter.is_some())
    }
}

/// Split a document into its front matter and the remaining body.
///
/// A leading block without a closing delimiter is left in place and no front
/// matter is returned. A closed block without a `title:` line is stripped, but
/// also yields no front matter, so ordinals are not shifted.
pub fn split_front_matter(text: &str) -> (Option<FrontMatter>, &str) {
    let mut lines = text.split_inclusive('\n');
    let mut offset = match lines.next() {
        Some(first) if first.trim_end() == THEMATIC_BREAK => first.len(),
        _ => return (None, text),
    };
    let mut title = None;
    for line in lines {
        offset += line.len();
        if line.trim_end() == THEMATIC_BREAK {
            let front_matter = title.map(|title| FrontMatter { title });
            return (front_matter, text[offset..].trim());
        }
        if title.is_none() {
            title = parse_title(line.trim_end());
        }
    }

    (None, text)
}

fn parse_title(line: &str) -> Option<String> {
    let caps = TITLE_RE.captures(line)?;
    let value = caps.get(1)?.as_str().trim();
    let unquoted = ['"', '\'']
        .iter()
        .find_map(|q| value.strip_prefix(*q).and_then(|v| v.strip_suffix(*q)))
        .unwrap_or(value);
    if unquoted.is_empty() {
        None
    } else {
        Some(unquoted.to_string())
    }
}
