//! PostCSS-shaped nodes

use serde::Serialize;

/// Point in the source, 1-based like PostCSS. Columns count bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourcePoint {
    pub line: u32,
    pub column: u32,
    pub offset: usize,
}

/// Node span. `end` points at the last character of the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceSpan {
    pub start: SourcePoint,
    pub end: SourcePoint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ForeignKind {
    Root,
    AtRule { name: String, params: String },
    Rule { selector: String },
    Decl { prop: String, value: String, important: bool },
    Comment { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignNode {
    pub kind: ForeignKind,
    pub span: Option<SourceSpan>,
    pub nodes: Vec<ForeignNode>,
}

impl ForeignNode {
    pub fn new(kind: ForeignKind, span: Option<SourceSpan>) -> Self {
        Self {
            kind,
            span,
            nodes: Vec::new(),
        }
    }

    /// PostCSS `type` string
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            ForeignKind::Root => "root",
            ForeignKind::AtRule { .. } => "atrule",
            ForeignKind::Rule { .. } => "rule",
            ForeignKind::Decl { .. } => "decl",
            ForeignKind::Comment { .. } => "comment",
        }
    }

    /// This node and all descendants in pre-order
    pub fn walk(&self) -> impl Iterator<Item = &ForeignNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.nodes.iter().rev());
            Some(node)
        })
    }
}

/// A tree node that may carry a source span
pub trait SpanNode: Sized {
    fn span(&self) -> Option<SourceSpan>;
    fn children(&self) -> &[Self];
}

impl SpanNode for ForeignNode {
    fn span(&self) -> Option<SourceSpan> {
        self.span
    }

    fn children(&self) -> &[Self] {
        &self.nodes
    }
}
