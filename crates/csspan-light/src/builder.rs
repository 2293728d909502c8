//! Event-stream tree builder
//!
//! Consumes enter/leaf/exit events from a depth-first visitor and grows a
//! [`LightTree`]. The engine only reports where nodes start, so every node
//! is created provisional and its end is backfilled once a later located
//! node (or the end of the document) shows where its branch closed.
//!
//! Ends are inferred by walking back from the next start: the shallowest
//! closed depth ends right before that start, and each deeper depth ends
//! on the last non-whitespace character before the closing delimiter of
//! the depth above it.

use std::collections::{BTreeMap, HashMap};

use csspan_text::{OffsetRange, SourceText};

use crate::{LightError, LightNode, LightTree, NodeData, NodeId, NodeKind, NodeState};

/// One visitor event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitEvent {
    Enter(NodeKind, NodeData),
    Leaf(NodeKind, NodeData),
    Exit(NodeKind),
}

/// Builds a [`LightTree`] from visitor events
pub struct TreeBuilder {
    source: SourceText,
    nodes: Vec<LightNode>,
    /// Start offset per node, indexed by id
    starts: Vec<usize>,
    /// End offset per resolved node
    ends: Vec<Option<usize>>,
    roots: Vec<NodeId>,
    /// Open containers
    stack: Vec<NodeId>,
    /// Last visited node
    prev: Option<NodeId>,
    /// Unresolved nodes keyed by depth
    pending: BTreeMap<usize, Vec<NodeId>>,
}

impl TreeBuilder {
    pub fn new(source: SourceText) -> Self {
        Self {
            source,
            nodes: Vec::new(),
            starts: Vec::new(),
            ends: Vec::new(),
            roots: Vec::new(),
            stack: Vec::new(),
            prev: None,
            pending: BTreeMap::new(),
        }
    }

    pub fn source(&self) -> &SourceText {
        &self.source
    }

    /// Depth the next visited node will get
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Innermost open container
    pub fn current(&self) -> Option<NodeId> {
        self.stack.last().copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Feed one event. Returns the node the event created or closed.
    pub fn push(&mut self, event: VisitEvent) -> Result<NodeId, LightError> {
        match event {
            VisitEvent::Enter(kind, data) => self.enter(kind, data),
            VisitEvent::Leaf(kind, data) => self.leaf(kind, data),
            VisitEvent::Exit(kind) => self.exit(kind),
        }
    }

    /// Open a container node
    pub fn enter(&mut self, kind: NodeKind, data: NodeData) -> Result<NodeId, LightError> {
        if !kind.is_container() {
            return Err(LightError::NotContainer { kind });
        }
        let id = self.visit(kind, data)?;
        self.stack.push(id);
        Ok(id)
    }

    /// Record a node without children
    pub fn leaf(&mut self, kind: NodeKind, data: NodeData) -> Result<NodeId, LightError> {
        self.visit(kind, data)
    }

    /// Close the innermost container
    pub fn exit(&mut self, kind: NodeKind) -> Result<NodeId, LightError> {
        let Some(&top) = self.stack.last() else {
            return Err(LightError::UnbalancedExit { expected: None, found: kind });
        };
        let open = self.nodes[top.index()].kind;
        if open != kind {
            return Err(LightError::UnbalancedExit {
                expected: Some(open),
                found: kind,
            });
        }
        self.stack.pop();
        Ok(top)
    }

    /// Resolve everything still pending against the end of the document
    pub fn finish(mut self) -> Result<LightTree, LightError> {
        if !self.stack.is_empty() {
            tracing::warn!("{} containers still open at end of stream", self.stack.len());
        }
        self.resolve_pending(0, self.source.len())?;

        tracing::debug!(
            "Built tree with {} nodes ({} roots)",
            self.nodes.len(),
            self.roots.len()
        );
        Ok(LightTree::new(self.source, self.nodes, self.roots))
    }

    fn visit(&mut self, kind: NodeKind, data: NodeData) -> Result<NodeId, LightError> {
        let id = NodeId(self.nodes.len() as u32);
        let depth = self.stack.len();
        let parent = self.stack.last().copied();

        let floor = parent.map_or(0, |parent| self.starts[parent.index()]);
        let located = match data.location {
            Some(location) => {
                let offset = self.source.offset_of(location.position.line, location.position.column, false)?;
                Some(offset.max(floor))
            }
            None => None,
        };
        let start = match located {
            Some(offset) => offset,
            None => self.inherited_start(depth, parent).max(floor),
        };

        // Close finished branches before this node joins the pending set
        if let Some(boundary) = located {
            let prev_depth = self.prev.map(|prev| self.nodes[prev.index()].depth);
            let closes_branch = depth == 0 || prev_depth.is_some_and(|prev_depth| prev_depth >= depth);
            let stale = self.pending.range(depth..).next().is_some();
            if closes_branch || stale {
                self.resolve_pending(depth, boundary)?;
            }
            self.trim_siblings(parent, boundary)?;
        }

        let mut node = LightNode::new(id, kind, data, depth, self.source.position_of(start)?);
        node.parent = parent;
        let prev_sibling = match parent {
            Some(parent) => {
                let siblings = &mut self.nodes[parent.index()].children;
                let prev_sibling = siblings.last().copied();
                siblings.push(id);
                prev_sibling
            }
            None => {
                let prev_sibling = self.roots.last().copied();
                self.roots.push(id);
                prev_sibling
            }
        };
        if let Some(prev_sibling) = prev_sibling {
            self.nodes[prev_sibling.index()].next = Some(id);
            node.prev = Some(prev_sibling);
        }

        tracing::trace!("{} {:?} at depth {} starts at {}", kind, id, depth, start);
        self.nodes.push(node);
        self.starts.push(start);
        self.ends.push(None);
        self.pending.entry(depth).or_default().push(id);
        self.prev = Some(id);
        Ok(id)
    }

    /// Start for a node the engine gave no location
    fn inherited_start(&self, depth: usize, parent: Option<NodeId>) -> usize {
        let sibling = self.pending.get(&depth).and_then(|ids| ids.last());
        let fallback = match parent {
            Some(parent) => Some(parent),
            None => self.roots.last().copied(),
        };
        sibling
            .copied()
            .or(fallback)
            .map_or(0, |id| self.starts[id.index()])
    }

    /// Resolve every pending node at `from_depth` or deeper.
    ///
    /// `boundary` is the start of the node that closed the branch, or the
    /// document length. Each node at `from_depth` ends before the next
    /// larger sibling start, deeper nodes walk back from their ancestor's
    /// end. Nodes already starting past `boundary` arrived out of source
    /// order and stay pending with their subtrees.
    fn resolve_pending(&mut self, from_depth: usize, boundary: usize) -> Result<(), LightError> {
        let closed = self.pending.split_off(&from_depth);
        let Some(&deepest) = closed.keys().next_back() else {
            return Ok(());
        };
        let levels = deepest - from_depth + 1;

        let heads = closed.get(&from_depth).cloned().unwrap_or_default();
        let mut head_starts: Vec<usize> = heads.iter().map(|id| self.starts[id.index()]).collect();
        head_starts.sort_unstable();
        head_starts.dedup();

        let mut head_ends: HashMap<NodeId, Vec<usize>> = HashMap::new();
        for &head in &heads {
            let start = self.starts[head.index()];
            if start > boundary {
                continue;
            }
            let next = head_starts.iter().copied().find(|&other| other > start);
            let own_boundary = next.map_or(boundary, |next| next.min(boundary));
            head_ends.insert(head, closing_ends(self.source.text(), own_boundary, levels));
        }
        let default_ends = closing_ends(self.source.text(), boundary, levels);

        for (depth, ids) in closed {
            let mut resolved = 0;
            for id in ids {
                let head = self.ancestor_at(id, from_depth);
                let ends = match head {
                    Some(head) if self.starts[head.index()] > boundary => {
                        self.pending.entry(depth).or_default().push(id);
                        continue;
                    }
                    Some(head) => head_ends.get(&head).unwrap_or(&default_ends),
                    None => &default_ends,
                };
                let end = ends[depth - from_depth];
                self.resolve(id, end)?;
                resolved += 1;
            }
            tracing::trace!("Backfilled {} nodes at depth {} from {}", resolved, depth, boundary);
        }
        Ok(())
    }

    /// Ancestor of `id` (or `id` itself) at `depth`
    fn ancestor_at(&self, mut id: NodeId, depth: usize) -> Option<NodeId> {
        while self.nodes[id.index()].depth > depth {
            id = self.nodes[id.index()].parent?;
        }
        (self.nodes[id.index()].depth == depth).then_some(id)
    }

    /// Cut resolved siblings that cover `start` back to it.
    ///
    /// Only happens when a node is visited after a sibling that follows it
    /// in the source.
    fn trim_siblings(&mut self, parent: Option<NodeId>, start: usize) -> Result<(), LightError> {
        let siblings = match parent {
            Some(parent) => &self.nodes[parent.index()].children,
            None => &self.roots,
        };
        let mut stack = Vec::new();
        for &id in siblings.iter().rev() {
            match self.ends[id.index()] {
                Some(end) if end <= start => break,
                Some(_) if self.starts[id.index()] < start => stack.push(id),
                _ => {}
            }
        }

        while let Some(id) = stack.pop() {
            if self.ends[id.index()].is_some_and(|end| end > start) {
                tracing::trace!("Trimming {:?} to {}", id, start);
                self.resolve(id, start)?;
            }
            stack.extend(self.nodes[id.index()].children.iter().copied());
        }
        Ok(())
    }

    fn resolve(&mut self, id: NodeId, end: usize) -> Result<(), LightError> {
        let start = self.starts[id.index()];
        let end = end.max(start);
        let range = self.source.text_range(OffsetRange::new(start, end))?;
        self.nodes[id.index()].state = NodeState::Resolved { range };
        self.ends[id.index()] = Some(end);
        Ok(())
    }
}

/// Exclusive end offsets for `levels` closed depths, shallowest first
fn closing_ends(text: &str, boundary: usize, levels: usize) -> Vec<usize> {
    let mut ends = Vec::with_capacity(levels);
    let mut end = boundary;
    for level in 0..levels {
        if level > 0 {
            end = match last_non_whitespace(text, end) {
                Some((delimiter, _)) => last_non_whitespace(text, delimiter).map_or(0, |(idx, len)| idx + len),
                None => 0,
            };
        }
        ends.push(end);
    }
    ends
}

/// Offset and byte length of the last non-whitespace character before `before`
fn last_non_whitespace(text: &str, before: usize) -> Option<(usize, usize)> {
    text.get(..before)?
        .char_indices()
        .rev()
        .find(|(_, ch)| !ch.is_whitespace())
        .map(|(idx, ch)| (idx, ch.len_utf8()))
}
