// ABOUTME: Inline markup rendering for deckmark
// ABOUTME: Rewrites images, links, bold spans and inline code in one fixed-order pass

use once_cell::sync::Lazy;
use regex::Regex;

static IMAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap());
static LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());
static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").unwrap());

/// Render the inline markup of one line.
///
/// Images are rewritten before links since every image reference also reads
/// as a link. There is no escaping and no nested emphasis.
pub fn render_inline(text: &str) -> String {
    let text = IMAGE_RE.replace_all(text, r#"<img src="${2}" alt="${1}">"#);
    let text = LINK_RE.replace_all(&text, r#"<a href="${2}">${1}</a>"#);
    let text = BOLD_RE.replace_all(&text, "<strong>${1}</strong>");
    CODE_RE.replace_all(&text, "<code>${1}</code>").into_owned()
}
