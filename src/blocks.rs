// ABOUTME: Block parser for the deckmark markdown dialect
// ABOUTME: Turns slide source into headings, nested lists, quotes, fences, tables and images

use log::trace;

use crate::classify::{self, LineClass, LineContext, ListMarker};

/// Languages drawn by a diagram service rather than in the page.
pub const REMOTE_DIAGRAM_LANGUAGES: &[&str] = &[
    "blockdiag",
    "seqdiag",
    "actdiag",
    "nwdiag",
    "packetdiag",
    "rackdiag",
    "ditaa",
    "dot",
    "graphviz",
    "vega",
    "vegalite",
    "plantuml",
];

/// Languages drawn client-side in the page.
pub const LIVE_DIAGRAM_LANGUAGES: &[&str] = &["mermaid"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph(String),
    List(List),
    Blockquote(Vec<String>),
    Fenced(FencedBlock),
    /// Table rows, verbatim.
    Table(Vec<String>),
    Image { alt: String, src: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
    LiveDiagram,
    RemoteDiagram,
    Code,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FencedBlock {
    pub language: Option<String>,
    pub lines: Vec<String>,
}

impl FencedBlock {
    pub fn kind(&self) -> FenceKind {
        match self.language.as_deref() {
            Some(lang) if LIVE_DIAGRAM_LANGUAGES.contains(&lang) => FenceKind::LiveDiagram,
            Some(lang) if REMOTE_DIAGRAM_LANGUAGES.contains(&lang) => FenceKind::RemoteDiagram,
            _ => FenceKind::Code,
        }
    }

    pub fn source(&self) -> String {
        self.lines.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub ordered: bool,
    pub items: Vec<ListItem>,
}

impl List {
    /// Items in this list and every nested list.
    pub fn item_count(&self) -> usize {
        self.items
            .iter()
            .map(|item| 1 + item.nested_lists().map(List::item_count).sum::<usize>())
            .sum()
    }

    /// Deepest nesting level below this list (0 when flat).
    pub fn depth(&self) -> usize {
        self.items
            .iter()
            .flat_map(ListItem::nested_lists)
            .map(|list| 1 + list.depth())
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub marker: ListMarker,
    /// Item text, continuation lines and nested lists in source order.
    pub parts: Vec<ItemPart>,
}

impl ListItem {
    pub fn nested_lists(&self) -> impl Iterator<Item = &List> {
        self.parts.iter().filter_map(|part| match part {
            ItemPart::List(list) => Some(list),
            ItemPart::Text(_) => None,
        })
    }

    /// The first line of the item.
    pub fn text(&self) -> &str {
        match self.parts.first() {
            Some(ItemPart::Text(text)) => text,
            _ => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemPart {
    Text(String),
    List(List),
}

/// Parse slide source into blocks. Never fails: unterminated fences run to the
/// end of input and open lists or quotes are closed at the end.
pub fn parse_blocks(text: &str) -> Vec<Block> {
    let mut parser = BlockParser::default();
    for line in text.lines() {
        parser.feed(line);
    }
    parser.finish()
}

#[derive(Debug, Default)]
enum OpenBlock {
    #[default]
    Nothing,
    List(ListBuilder),
    Blockquote(Vec<String>),
    Fence(FencedBlock),
    Table(Vec<String>),
}

#[derive(Debug, Default)]
struct BlockParser {
    blocks: Vec<Block>,
    open: OpenBlock,
}

impl BlockParser {
    fn context(&self) -> LineContext {
        LineContext {
            in_fence: matches!(self.open, OpenBlock::Fence(_)),
            in_list: matches!(self.open, OpenBlock::List(_)),
        }
    }

    fn feed(&mut self, line: &str) {
        let class = classify::classify(line, &self.context());
        trace!("{:?} <- {:?}", class, line);

        match class {
            LineClass::FenceDelimiter { language } => {
                if matches!(self.open, OpenBlock::Fence(_)) {
                    self.close();
                } else {
                    self.close();
                    self.open = OpenBlock::Fence(FencedBlock {
                        language: language.map(str::to_string),
                        lines: Vec::new(),
                    });
                }
            }
            LineClass::FenceContent(raw) => {
                if let OpenBlock::Fence(fence) = &mut self.open {
                    fence.lines.push(raw.to_string());
                }
            }
            LineClass::Heading { level, text } => {
                self.close();
                self.blocks.push(Block::Heading {
                    level,
                    text: text.to_string(),
                });
            }
            LineClass::Blockquote(text) => match &mut self.open {
                OpenBlock::Blockquote(lines) => lines.push(text.to_string()),
                _ => {
                    self.close();
                    self.open = OpenBlock::Blockquote(vec![text.to_string()]);
                }
            },
            LineClass::ListItem {
                marker,
                depth,
                text,
            } => self.list_item(line, marker, depth, text),
            LineClass::Continuation { indent, text } => {
                if let OpenBlock::List(list) = &mut self.open {
                    list.continuation(indent, text);
                }
            }
            LineClass::TableRow(row) => match &mut self.open {
                OpenBlock::Table(rows) => rows.push(row.to_string()),
                _ => {
                    self.close();
                    self.open = OpenBlock::Table(vec![row.to_string()]);
                }
            },
            LineClass::Blank => self.close(),
            LineClass::Image { alt, src } => {
                self.close();
                self.blocks.push(Block::Image {
                    alt: alt.to_string(),
                    src: src.to_string(),
                });
            }
            LineClass::Paragraph(text) => {
                self.close();
                self.blocks.push(Block::Paragraph(text.to_string()));
            }
        }
    }

    fn list_item(&mut self, line: &str, marker: ListMarker, depth: usize, text: &str) {
        if let OpenBlock::List(list) = &mut self.open {
            if list.accepts(&marker) {
                list.push_item(marker, depth, text);
                return;
            }
            // An indented item of the other list kind reads as item text.
            let indent = classify::indent_width(line);
            if indent > 0 {
                list.continuation(indent, line.trim());
                return;
            }
        }
        self.close();
        self.open = OpenBlock::List(ListBuilder::new(marker, depth, text));
    }

    /// Close whatever construct is open and emit it.
    fn close(&mut self) {
        match std::mem::take(&mut self.open) {
            OpenBlock::Nothing => {}
            OpenBlock::List(list) => self.blocks.push(Block::List(list.finish())),
            OpenBlock::Blockquote(lines) => self.blocks.push(Block::Blockquote(lines)),
            OpenBlock::Fence(fence) => self.blocks.push(Block::Fenced(fence)),
            OpenBlock::Table(rows) => {
                if rows.len() >= 2 && rows.iter().any(|row| classify::is_table_separator(row)) {
                    self.blocks.push(Block::Table(rows));
                } else {
                    self.blocks.extend(rows.into_iter().map(Block::Paragraph));
                }
            }
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.close();
        self.blocks
    }
}

#[derive(Debug)]
struct ItemNode {
    marker: ListMarker,
    parts: Vec<NodePart>,
}

#[derive(Debug)]
enum NodePart {
    Text(String),
    List(usize),
}

#[derive(Debug)]
struct ListNode {
    ordered: bool,
    items: Vec<usize>,
}

#[derive(Debug, Clone, Copy)]
struct OpenList {
    list: usize,
    depth: usize,
}

/// Builds a nested list in arenas. `path` holds the open lists from the root
/// down; new items always go to the innermost one.
#[derive(Debug)]
pub(crate) struct ListBuilder {
    lists: Vec<ListNode>,
    items: Vec<ItemNode>,
    path: Vec<OpenList>,
    closed: usize,
}

impl ListBuilder {
    pub(crate) fn new(marker: ListMarker, depth: usize, text: &str) -> Self {
        let mut builder = Self {
            lists: vec![ListNode {
                ordered: marker.is_ordered(),
                items: Vec::new(),
            }],
            items: Vec::new(),
            path: vec![OpenList { list: 0, depth }],
            closed: 0,
        };
        builder.append_item(marker, text);
        builder
    }

    fn accepts(&self, marker: &ListMarker) -> bool {
        self.items
            .first()
            .map_or(true, |first| first.marker.same_list_kind(marker))
    }

    fn innermost(&self) -> OpenList {
        // The root list is never popped while the builder is alive.
        self.path[self.path.len() - 1]
    }

    pub(crate) fn push_item(&mut self, marker: ListMarker, depth: usize, text: &str) {
        while self.path.len() > 1 && self.innermost().depth > depth {
            self.close_innermost();
        }
        if depth > self.innermost().depth {
            self.open_nested(marker, depth);
        }
        self.append_item(marker, text);
    }

    /// Indented text under an open item. Lists too deep for the indent are
    /// closed first; the text then continues the innermost remaining item.
    pub(crate) fn continuation(&mut self, indent: usize, text: &str) {
        while self.path.len() > 1 && indent < self.innermost().depth * 2 + 2 {
            self.close_innermost();
        }
        let list = self.innermost().list;
        if let Some(&item) = self.lists[list].items.last() {
            self.items[item].parts.push(NodePart::Text(text.to_string()));
        }
    }

    fn open_nested(&mut self, marker: ListMarker, depth: usize) {
        let parent_list = self.innermost().list;
        let id = self.lists.len();
        self.lists.push(ListNode {
            ordered: marker.is_ordered(),
            items: Vec::new(),
        });
        // Open lists always hold at least one item.
        if let Some(&parent) = self.lists[parent_list].items.last() {
            self.items[parent].parts.push(NodePart::List(id));
        }
        self.path.push(OpenList { list: id, depth });
    }

    fn append_item(&mut self, marker: ListMarker, text: &str) {
        let id = self.items.len();
        self.items.push(ItemNode {
            marker,
            parts: vec![NodePart::Text(text.to_string())],
        });
        let list = self.innermost().list;
        self.lists[list].items.push(id);
    }

    fn close_innermost(&mut self) {
        self.path.pop();
        self.closed += 1;
    }

    /// Lists closed so far, the root included once finished.
    #[cfg(test)]
    pub(crate) fn closed(&self) -> usize {
        self.closed
    }

    #[cfg(test)]
    pub(crate) fn open_depth(&self) -> usize {
        self.path.len()
    }

    /// Close every open list, innermost first, and hand out the tree.
    pub(crate) fn finish(mut self) -> List {
        while !self.path.is_empty() {
            self.close_innermost();
        }
        trace!("list finished after {} closings", self.closed);
        self.build_list(0)
    }

    fn build_list(&mut self, id: usize) -> List {
        let item_ids = std::mem::take(&mut self.lists[id].items);
        let items = item_ids.into_iter().map(|item| self.build_item(item)).collect();
        List {
            ordered: self.lists[id].ordered,
            items,
        }
    }

    fn build_item(&mut self, id: usize) -> ListItem {
        let parts = std::mem::take(&mut self.items[id].parts)
            .into_iter()
            .map(|part| match part {
                NodePart::Text(text) => ItemPart::Text(text),
                NodePart::List(list) => ItemPart::List(self.build_list(list)),
            })
            .collect();
        ListItem {
            marker: self.items[id].marker,
            parts,
        }
    }
}
