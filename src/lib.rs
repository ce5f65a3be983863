// ABOUTME: Library module for the deckmark program.
// ABOUTME: Contains the markdown block parser, slide segmenter and outline compiler.

// Reexport modules
pub mod agenda;
pub mod blocks;
pub mod classify;
pub mod config;
pub mod deck;
pub mod errors;
pub mod frontmatter;
pub mod html;
pub mod inline;
pub mod outline;
pub mod scan;
pub mod site;
pub mod slides;
pub mod utils;
pub mod watch;

// Reexport common types and functions
pub use agenda::{Agenda, AgendaResolver, ChildSection, NoAgenda, PageRef};
pub use blocks::{parse_blocks, Block, FenceKind, FencedBlock, List, ListItem};
pub use classify::{classify, LineClass, LineContext};
pub use config::Config;
pub use deck::Deck;
pub use errors::{DeckError, Result};
pub use frontmatter::{split_front_matter, FrontMatter};
pub use html::{generate_html, generate_index_html, render_markdown, render_slide, write_html_to_file};
pub use inline::render_inline;
pub use outline::{compile_outline, Outline, OutlineBranch, OutlineLeaf, OutlineTarget};
pub use site::{build_directory, build_file};
pub use slides::{segment_slides, ChildHeading, Slide, SlideKind};
pub use watch::{watch_markdown, WatchConfig};
