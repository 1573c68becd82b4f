//! # Plain-Text Outline
//!
//! An indented outline of the record, two columns per nesting level:
//!
//! ```text
//! personal_info:
//!   name: Ada Lovelace
//! education:
//!   -
//!     degree: BSc
//!     notes: []
//!   awards: {}
//! ```
//!
//! Empty containers end in `[]` or `{}` so they stay distinct from a null
//! value (`key:`). A string value that itself ends in one of those markers
//! is written in double quotes.
//!
//! [`parse_outline`] reads the indentation back into the same tree that
//! [`outline_nodes`] builds, so nesting survives a round trip through text.

use std::path::PathBuf;

use mycv_core::{CvError, CvRecord, Scalar, SectionContent};

/// Columns of indentation per nesting level.
pub const INDENT: usize = 2;

/// Written in place of the children of an empty sequence.
pub const EMPTY_SEQUENCE: &str = "[]";
/// Written in place of the children of an empty mapping.
pub const EMPTY_MAPPING: &str = "{}";

/// One outline line and the lines nested under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
    pub label: String,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    /// Whether this line stands for an empty sequence or mapping.
    pub fn is_empty_container(&self) -> bool {
        self.children.is_empty()
            && [EMPTY_SEQUENCE, EMPTY_MAPPING].iter().any(|marker| {
                self.label
                    .strip_suffix(*marker)
                    .is_some_and(|rest| rest.ends_with(' '))
            })
    }

    /// 1 for a scalar line. An empty container counts its missing level,
    /// so the depth matches [`SectionContent::depth`] plus one.
    pub fn depth(&self) -> usize {
        let below = if self.is_empty_container() { 1 } else { 0 };
        1 + self
            .children
            .iter()
            .map(OutlineNode::depth)
            .max()
            .unwrap_or(below)
    }
}

/// Build the outline tree for a record.
pub fn outline_nodes(record: &CvRecord) -> Vec<OutlineNode> {
    record
        .iter()
        .map(|(heading, content)| keyed_node(heading, content))
        .collect()
}

/// Render the outline as text, one node per line.
pub fn render_outline(record: &CvRecord) -> String {
    let mut out = String::new();
    for node in outline_nodes(record) {
        write_node(&mut out, &node, 0);
    }
    out
}

/// Parse outline text back into nodes.
///
/// # Errors
///
/// `ParseError` if a line's indentation is not a multiple of two columns
/// or jumps more than one level deeper than the line before it.
pub fn parse_outline(text: &str) -> Result<Vec<OutlineNode>, CvError> {
    let mut roots = Vec::new();
    // stack[i] is the open node at level i.
    let mut stack: Vec<OutlineNode> = Vec::new();

    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let indent = line.len() - line.trim_start_matches(' ').len();
        if indent % INDENT != 0 {
            return Err(outline_error(format!(
                "line {}: indentation of {indent} is not a multiple of {INDENT}",
                lineno + 1
            )));
        }
        let level = indent / INDENT;
        if level > stack.len() {
            return Err(outline_error(format!(
                "line {}: indented {} levels under a level-{} line",
                lineno + 1,
                level,
                stack.len().saturating_sub(1)
            )));
        }
        while stack.len() > level {
            close_top(&mut stack, &mut roots);
        }
        stack.push(OutlineNode::leaf(line[indent..].trim_end()));
    }
    while !stack.is_empty() {
        close_top(&mut stack, &mut roots);
    }
    Ok(roots)
}

fn close_top(stack: &mut Vec<OutlineNode>, roots: &mut Vec<OutlineNode>) {
    if let Some(done) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(done),
            None => roots.push(done),
        }
    }
}

fn outline_error(reason: String) -> CvError {
    CvError::ParseError {
        path: PathBuf::from("<outline>"),
        reason,
    }
}

fn keyed_node(key: &str, content: &SectionContent) -> OutlineNode {
    let key = single_line(key);
    node(&format!("{key}:"), content)
}

fn item_node(content: &SectionContent) -> OutlineNode {
    node("-", content)
}

fn node(prefix: &str, content: &SectionContent) -> OutlineNode {
    match content {
        SectionContent::Scalar(s) => OutlineNode::leaf(label(&format!("{prefix} {}", scalar_text(s)))),
        SectionContent::Sequence(items) if items.is_empty() => {
            OutlineNode::leaf(format!("{prefix} {EMPTY_SEQUENCE}"))
        }
        SectionContent::Mapping(m) if m.is_empty() => {
            OutlineNode::leaf(format!("{prefix} {EMPTY_MAPPING}"))
        }
        container => OutlineNode {
            label: prefix.to_string(),
            children: child_nodes(container),
        },
    }
}

fn scalar_text(scalar: &Scalar) -> String {
    let text = single_line(&scalar.to_string());
    if text.ends_with(EMPTY_SEQUENCE) || text.ends_with(EMPTY_MAPPING) {
        format!("\"{text}\"")
    } else {
        text
    }
}

fn child_nodes(content: &SectionContent) -> Vec<OutlineNode> {
    match content {
        SectionContent::Mapping(m) => m.iter().map(|(k, v)| keyed_node(k, v)).collect(),
        SectionContent::Sequence(items) => items.iter().map(item_node).collect(),
        SectionContent::Scalar(_) => Vec::new(),
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn label(text: &str) -> String {
    text.trim_end().to_string()
}

fn write_node(out: &mut String, node: &OutlineNode, level: usize) {
    out.push_str(&" ".repeat(level * INDENT));
    out.push_str(&node.label);
    out.push('\n');
    for child in &node.children {
        write_node(out, child, level + 1);
    }
}
