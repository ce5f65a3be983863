// ABOUTME: Outline compilation for deckmark documents
// ABOUTME: Builds the heading tree whose entries point at slide ordinals

use serde::Serialize;

use crate::agenda::{AgendaResolver, PageRef};
use crate::frontmatter::FrontMatter;
use crate::scan::{self, LineRole};

/// Title of the extra branch listing a document's agenda sections.
pub const SUBSECTIONS_TITLE: &str = "Sub-chapters";

/// Where an outline entry leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlineTarget {
    Slide(usize),
    Page(PageRef),
}

impl OutlineTarget {
    pub fn href(&self) -> String {
        match self {
            OutlineTarget::Slide(ordinal) => format!("#/{}", ordinal),
            OutlineTarget::Page(page) => page.to_string(),
        }
    }

    pub fn slide_ordinal(&self) -> Option<usize> {
        match self {
            OutlineTarget::Slide(ordinal) => Some(*ordinal),
            OutlineTarget::Page(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineLeaf {
    pub title: String,
    pub target: OutlineTarget,
}

/// A level-1 heading and the level-2 headings under it. Anonymous branches
/// (level-2 headings before any level-1) have an empty title and no target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineBranch {
    pub title: String,
    pub target: Option<OutlineTarget>,
    pub children: Vec<OutlineLeaf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Outline {
    pub title: String,
    pub branches: Vec<OutlineBranch>,
}

/// Node shape consumed by the mind-map view: `{ content, children }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MindMapNode {
    pub content: String,
    pub children: Vec<MindMapNode>,
}

impl MindMapNode {
    fn leaf(content: String) -> Self {
        Self {
            content,
            children: Vec::new(),
        }
    }
}

fn link(title: &str, target: &OutlineTarget) -> String {
    format!(r#"<a href="{}">{}</a>"#, target.href(), title)
}

impl Outline {
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Every leaf of every branch, in document order.
    pub fn leaves(&self) -> impl Iterator<Item = &OutlineLeaf> {
        self.branches.iter().flat_map(|branch| branch.children.iter())
    }

    pub fn to_mind_map(&self) -> MindMapNode {
        MindMapNode {
            content: self.title.clone(),
            children: self
                .branches
                .iter()
                .map(|branch| MindMapNode {
                    content: match &branch.target {
                        Some(target) => link(&branch.title, target),
                        None => branch.title.clone(),
                    },
                    children: branch
                        .children
                        .iter()
                        .map(|leaf| MindMapNode::leaf(link(&leaf.title, &leaf.target)))
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Compile the outline of a document body (front matter already removed).
///
/// Breaks are counted by the same scanner the slide segmenter splits on, so
/// every slide target equals the ordinal of the slide holding the heading.
/// Agenda sections of `name`, if any, are appended as one extra branch.
pub fn compile_outline(
    body: &str,
    front_matter: Option<&FrontMatter>,
    name: &str,
    agenda: Option<&dyn AgendaResolver>,
) -> Outline {
    let mut outline = Outline {
        title: front_matter
            .map(|front_matter| front_matter.title.clone())
            .unwrap_or_default(),
        branches: Vec::new(),
    };
    let mut ordinal = FrontMatter::ordinal_offset(front_matter);

    for line in scan::scan(body) {
        if line.role == LineRole::Break {
            ordinal += 1;
            continue;
        }
        match line.heading() {
            Some((1, title)) => outline.branches.push(OutlineBranch {
                title: title.to_string(),
                target: Some(OutlineTarget::Slide(ordinal)),
                children: Vec::new(),
            }),
            Some((2, title)) => {
                if outline.branches.is_empty() {
                    outline.branches.push(OutlineBranch {
                        title: String::new(),
                        target: None,
                        children: Vec::new(),
                    });
                }
                if let Some(branch) = outline.branches.last_mut() {
                    branch.children.push(OutlineLeaf {
                        title: title.to_string(),
                        target: OutlineTarget::Slide(ordinal),
                    });
                }
            }
            _ => {}
        }
    }

    if let Some(agenda) = agenda {
        let sections = agenda.child_sections(name);
        if !sections.is_empty() {
            outline.branches.push(OutlineBranch {
                title: SUBSECTIONS_TITLE.to_string(),
                target: None,
                children: sections
                    .into_iter()
                    .map(|section| OutlineLeaf {
                        title: section.title,
                        target: OutlineTarget::Page(section.page),
                    })
                    .collect(),
            });
        }
    }

    outline
}
