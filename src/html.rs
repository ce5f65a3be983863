// ABOUTME: HTML generation module for the deckmark application
// ABOUTME: Renders blocks and slides to markup and wraps decks in a minimal page shell

use log::info;
use std::fs;
use std::path::Path;

use crate::agenda::Agenda;
use crate::blocks::{parse_blocks, Block, FenceKind, FencedBlock, ItemPart, List, ListItem};
use crate::classify::{Bullet, ListMarker};
use crate::config::Config;
use crate::deck::Deck;
use crate::errors::Result;
use crate::inline::render_inline;
use crate::outline::Outline;
use crate::slides::{Slide, SlideKind};
use crate::utils;

/// Render markdown source to markup.
pub fn render_markdown(markdown: &str) -> String {
    render_blocks(&parse_blocks(markdown))
}

pub fn render_blocks(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Heading { level: 1, text } => format!(r#"<h1 class="outline-title">{}</h1>"#, text),
        Block::Heading { level: 2, text } => format!(r#"<h2 class="title">{}</h2>"#, text),
        Block::Heading { level, text } => format!("<h{0}>{1}</h{0}>", level, text),
        Block::Paragraph(text) => format!("<p>{}</p>", render_inline(text)),
        Block::List(list) => render_list(list),
        Block::Blockquote(lines) => {
            let body: Vec<String> = lines.iter().map(|line| render_inline(line)).collect();
            format!("<blockquote>\n{}\n</blockquote>", body.join("<br>\n"))
        }
        Block::Fenced(fence) => render_fence(fence),
        Block::Table(rows) => rows.join("\n"),
        Block::Image { alt, src } => format!(
            r#"<div class="media-container"><img src="{}" alt="{}"></div>"#,
            src, alt
        ),
    }
}

fn render_list(list: &List) -> String {
    let tag = if list.ordered { "ol" } else { "ul" };
    let mut lines = vec![format!("<{}>", tag)];
    lines.extend(list.items.iter().map(render_item));
    lines.push(format!("</{}>", tag));
    lines.join("\n")
}

fn render_item(item: &ListItem) -> String {
    let class = match item.marker {
        ListMarker::Bullet(Bullet::Dash) => r#" class="bullet-dash""#,
        ListMarker::Bullet(Bullet::Dot) => r#" class="bullet-dot""#,
        ListMarker::Ordered(_) => "",
    };
    let mut out = format!("<li{}>", class);
    let mut seen_text = false;
    for part in &item.parts {
        match part {
            ItemPart::Text(text) => {
                if seen_text {
                    out.push_str("<br>");
                }
                out.push_str(&render_inline(text));
                seen_text = true;
            }
            ItemPart::List(list) => {
                out.push('\n');
                out.push_str(&render_list(list));
                out.push('\n');
            }
        }
    }
    out.push_str("</li>");
    out
}

fn render_fence(fence: &FencedBlock) -> String {
    let source = fence.source();
    match fence.kind() {
        FenceKind::LiveDiagram => {
            format!("<div class=\"media-container mermaid\">\n{}\n</div>", source)
        }
        FenceKind::RemoteDiagram => format!(
            "<div class=\"media-container kroki\" data-type=\"{}\">\n{}\n</div>",
            fence.language.as_deref().unwrap_or_default(),
            source
        ),
        FenceKind::Code => {
            let class = fence
                .language
                .as_deref()
                .map(|lang| format!(r#" class="language-{}""#, lang))
                .unwrap_or_default();
            format!(
                r#"<pre class="code-wrapper"><code{}>{}</code></pre>"#,
                class,
                html_escape::encode_text(&source)
            )
        }
    }
}

/// Render one slide as a `<section>`.
pub fn render_slide(slide: &Slide) -> String {
    match &slide.kind {
        SlideKind::Title { .. } => r#"<section id="toc-placeholder"></section>"#.to_string(),
        SlideKind::Table => format!(
            "<section data-markdown>\n<textarea data-template>\n{}\n</textarea>\n</section>",
            slide.raw_content
        ),
        SlideKind::Regular { has_text } => render_regular_slide(slide, *has_text),
    }
}

fn render_regular_slide(slide: &Slide, has_text: bool) -> String {
    let blocks = parse_blocks(&slide.raw_content);

    // Content after the first level-2 heading (else level-1) is the slide body.
    let split = [2u8, 1]
        .iter()
        .find_map(|wanted| {
            blocks
                .iter()
                .position(|block| matches!(block, Block::Heading { level, .. } if level == wanted))
        })
        .map(|index| index + 1);

    let (mut body, title_only) = match split {
        Some(index) => {
            let head = render_blocks(&blocks[..index]);
            let rest = render_blocks(&blocks[index..]);
            if rest.trim().is_empty() {
                (head, true)
            } else {
                (
                    format!("{}\n<div class=\"theContents\">\n{}\n</div>", head, rest),
                    false,
                )
            }
        }
        None => {
            let all = render_blocks(&blocks);
            if all.trim().is_empty() {
                (all, false)
            } else {
                (format!("<div class=\"theContents\">\n{}\n</div>", all), false)
            }
        }
    };

    if title_only && !slide.child_headings.is_empty() {
        let items: Vec<String> = slide
            .child_headings
            .iter()
            .map(|child| format!(r##"<li><a href="#/{}">{}</a></li>"##, child.slide_ordinal, child.title))
            .collect();
        body.push_str(&format!(
            "\n<ul class=\"chapter-list\" style=\"column-count: {}\">\n{}\n</ul>",
            items.len(),
            items.join("\n")
        ));
    }

    let classes: Vec<&str> = [(title_only, "title-slide"), (has_text, "has-text")]
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, class)| *class)
        .collect();
    let class_attr = if classes.is_empty() {
        String::new()
    } else {
        format!(r#" class="{}""#, classes.join(" "))
    };
    let chapter_attr = if slide.chapter_title.is_empty() {
        String::new()
    } else {
        format!(
            r#" data-chapter-title="{}""#,
            html_escape::encode_double_quoted_attribute(&slide.chapter_title)
        )
    };

    format!("<section{}{}>\n{}\n</section>", class_attr, chapter_attr, body)
}

/// Outline as JSON safe to embed in a `<script>` element.
fn outline_json(outline: &Outline) -> Result<String> {
    let json = serde_json::to_string(&outline.to_mind_map())?;
    Ok(json.replace("</", "<\\/"))
}

fn page_head(title: &str) -> String {
    let mut head = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    head.push_str("<meta charset=\"UTF-8\">\n");
    head.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    head.push_str(&format!(
        "<title>{}</title>\n",
        html_escape::encode_text(title)
    ));
    head.push_str("</head>\n");
    head
}

fn outline_scripts(outline: &Outline, depth: usize) -> Result<String> {
    Ok(format!(
        "<script id=\"outline-data\" type=\"application/json\">{}</script>\n\
         <script id=\"outline-options\" type=\"application/json\">{{\"initialExpandLevel\":{}}}</script>\n",
        outline_json(outline)?,
        depth
    ))
}

/// Generate the page for one deck.
pub fn generate_html(deck: &Deck, config: &Config, has_agenda: bool) -> Result<String> {
    info!("Generating HTML for {} ({} slides)", deck.name, deck.slides.len());

    let mut html_doc = page_head(deck.title());
    let next_attr = deck
        .next_page
        .as_ref()
        .map(|page| format!(r#" data-next-page="{}""#, page))
        .unwrap_or_default();
    html_doc.push_str(&format!(
        "<body data-parent-page=\"{}\"{}>\n",
        deck.parent_page, next_attr
    ));
    html_doc.push_str("<div class=\"reveal\">\n<div class=\"slides\">\n");

    let sections: Vec<String> = deck.slides.iter().map(render_slide).collect();
    html_doc.push_str(&sections.join("\n\n"));

    html_doc.push_str("\n</div>\n</div>\n");
    html_doc.push_str(&outline_scripts(
        &deck.outline,
        config.outline_depth_for(has_agenda),
    )?);
    html_doc.push_str("</body>\n</html>\n");

    Ok(html_doc)
}

/// Generate the index page of a multi-document deck from its agenda.
pub fn generate_index_html(agenda: &Agenda, config: &Config) -> Result<String> {
    let outline = agenda.outline();
    let title = agenda.title().unwrap_or("Index");
    info!("Generating index page for {}", title);

    let mut html_doc = page_head(title);
    let first_page = agenda
        .pages()
        .into_iter()
        .next()
        .map(|page| format!(r#" data-next-page="{}""#, page))
        .unwrap_or_default();
    html_doc.push_str(&format!("<body{}>\n", first_page));
    html_doc.push_str(&format!(
        "<div class=\"header\">\n<h1>{}</h1>\n</div>\n<svg id=\"mindmap\"></svg>\n",
        html_escape::encode_text(title)
    ));
    html_doc.push_str(&outline_scripts(&outline, config.outline_depth)?);
    html_doc.push_str("</body>\n</html>\n");

    Ok(html_doc)
}

/// Utility function to write HTML content to a file
pub fn write_html_to_file(html_content: &str, output_path: &Path) -> Result<()> {
    info!("Writing HTML to file: {:?}", output_path);
    utils::ensure_parent_directory_exists(output_path)?;
    fs::write(output_path, html_content)?;
    Ok(())
}
