// ABOUTME: Shared marker/fence scanner used by the slide segmenter and the outline compiler
// ABOUTME: Tags every source line with its role so both passes count slide breaks identically

use crate::classify;

/// Role of a line as seen by the slide-level passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole<'a> {
    /// Ordinary line outside any fence.
    Content,
    /// Thematic break outside a fence: ends the current slide.
    Break,
    FenceOpen { language: Option<&'a str> },
    /// Verbatim line inside a fence. Never a break, heading or table row.
    Fenced { language: Option<&'a str> },
    FenceClose { language: Option<&'a str> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannedLine<'a> {
    pub text: &'a str,
    pub role: LineRole<'a>,
}

impl<'a> ScannedLine<'a> {
    /// Heading level and text, for content lines only.
    pub fn heading(&self) -> Option<(u8, &'a str)> {
        match self.role {
            LineRole::Content => classify::heading(self.text),
            _ => None,
        }
    }

    pub fn is_fenced(&self) -> bool {
        !matches!(self.role, LineRole::Content | LineRole::Break)
    }

    /// Fence language when the line belongs to a fence, delimiters included.
    pub fn fence_language(&self) -> Option<&'a str> {
        match self.role {
            LineRole::FenceOpen { language }
            | LineRole::Fenced { language }
            | LineRole::FenceClose { language } => language,
            LineRole::Content | LineRole::Break => None,
        }
    }
}

/// Iterator over the lines of a document, tracking fence state.
pub struct Scanner<'a> {
    lines: std::str::Lines<'a>,
    open_fence: Option<Option<&'a str>>,
}

impl<'a> Iterator for Scanner<'a> {
    type Item = ScannedLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.lines.next()?;
        let role = match self.open_fence {
            Some(language) if classify::is_fence_delimiter(text) => {
                self.open_fence = None;
                LineRole::FenceClose { language }
            }
            Some(language) => LineRole::Fenced { language },
            None if classify::is_fence_delimiter(text) => {
                let language = classify::fence_language(text);
                self.open_fence = Some(language);
                LineRole::FenceOpen { language }
            }
            None if classify::is_thematic_break(text) => LineRole::Break,
            None => LineRole::Content,
        };
        Some(ScannedLine { text, role })
    }
}

pub fn scan(text: &str) -> Scanner<'_> {
    Scanner {
        lines: text.lines(),
        open_fence: None,
    }
}

/// Number of slide breaks in `text`.
pub fn count_breaks(text: &str) -> usize {
    scan(text)
        .filter(|line| line.role == LineRole::Break)
        .count()
}
