//! Range store

use std::collections::HashMap;
use std::hash::Hash;

use csspan_text::{OffsetRange, SourceText, TextRange};

use crate::{IndexError, locate};

#[derive(Debug, Clone)]
struct Entry<K> {
    key: K,
    range: OffsetRange,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Resolved byte ranges for the nodes of one tree.
///
/// Entries keep construction order, which is document order for CSS.
/// Ranges mirror tree structure: two ranges are either disjoint or nested.
#[derive(Debug, Clone)]
pub struct RangeStore<K> {
    entries: Vec<Entry<K>>,
    roots: Vec<usize>,
    ordinals: HashMap<K, usize>,
}

impl<K: Copy + Eq + Hash> RangeStore<K> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            roots: Vec::new(),
            ordinals: HashMap::new(),
        }
    }

    /// Start building a store whose line/column ranges resolve against `source`
    pub fn builder(source: &SourceText) -> RangeStoreBuilder<'_, K> {
        RangeStoreBuilder {
            source,
            store: Self::new(),
        }
    }

    /// Number of indexed nodes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Byte range of a node
    pub fn range_of(&self, key: K) -> Option<OffsetRange> {
        self.ordinals.get(&key).map(|&ordinal| self.entries[ordinal].range)
    }

    /// Ordinal (construction order) of a node
    pub fn index_of(&self, key: K) -> Option<usize> {
        self.ordinals.get(&key).copied()
    }

    /// Node stored at an ordinal
    pub fn key_at(&self, ordinal: usize) -> Option<K> {
        self.entries.get(ordinal).map(|entry| entry.key)
    }

    /// Nearest indexed ancestor of a node
    pub fn parent_of(&self, key: K) -> Option<K> {
        let ordinal = self.index_of(key)?;
        self.entries[ordinal].parent.map(|parent| self.entries[parent].key)
    }

    /// Indexed children of a node, in order
    pub fn children_of(&self, key: K) -> impl Iterator<Item = K> + '_ {
        let children = match self.index_of(key) {
            Some(ordinal) => self.entries[ordinal].children.as_slice(),
            None => &[],
        };
        children.iter().map(move |&child| self.entries[child].key)
    }

    /// Top-level nodes, in order
    pub fn roots(&self) -> impl Iterator<Item = K> + '_ {
        self.roots.iter().map(move |&root| self.entries[root].key)
    }

    /// All nodes with their ranges, in construction order
    pub fn iter(&self) -> impl Iterator<Item = (K, OffsetRange)> + '_ {
        self.entries.iter().map(|entry| (entry.key, entry.range))
    }

    /// Find the node covering `offset`.
    ///
    /// Searches the top-level ranges, then descends exactly one level into
    /// the covering node's children. A child wins over its parent on a
    /// shared boundary.
    pub fn node_at_offset(&self, offset: usize) -> Option<K> {
        let root = self.find_in(&self.roots, offset)?;
        let found = self.find_in(&self.entries[root].children, offset).unwrap_or(root);
        Some(self.entries[found].key)
    }

    /// Find the deepest node covering `offset`
    pub fn deepest_node_at_offset(&self, offset: usize) -> Option<K> {
        let mut found = self.find_in(&self.roots, offset)?;
        while let Some(child) = self.find_in(&self.entries[found].children, offset) {
            found = child;
        }
        Some(self.entries[found].key)
    }

    fn find_in(&self, candidates: &[usize], offset: usize) -> Option<usize> {
        match candidates.binary_search_by(|&ordinal| locate(&self.entries[ordinal].range, offset)) {
            Ok(idx) => Some(candidates[idx]),
            // Siblings are expected to be sorted and disjoint. Unlocated
            // siblings may share a range, which can throw the search off.
            Err(_) => candidates
                .iter()
                .copied()
                .filter(|&ordinal| self.entries[ordinal].range.contains(offset))
                .min_by_key(|&ordinal| self.entries[ordinal].range.len()),
        }
    }
}

impl<K: Copy + Eq + Hash> Default for RangeStore<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Incremental builder for a [`RangeStore`]
pub struct RangeStoreBuilder<'s, K> {
    source: &'s SourceText,
    store: RangeStore<K>,
}

impl<K: Copy + Eq + Hash> RangeStoreBuilder<'_, K> {
    /// Index a node by its line/column range.
    ///
    /// `parent` is the nearest already indexed ancestor; an unknown parent
    /// makes the node a root. Returns the node's ordinal.
    pub fn push(&mut self, key: K, parent: Option<K>, range: TextRange) -> Result<usize, IndexError> {
        let offsets = self.source.offset_range(range)?;
        self.push_offsets(key, parent, offsets)
    }

    /// Index a node by its byte range
    pub fn push_offsets(&mut self, key: K, parent: Option<K>, range: OffsetRange) -> Result<usize, IndexError> {
        let store = &mut self.store;
        if let Some(&ordinal) = store.ordinals.get(&key) {
            return Err(IndexError::DuplicateKey { ordinal });
        }

        let ordinal = store.entries.len();
        let parent = parent.and_then(|parent| store.ordinals.get(&parent).copied());
        match parent {
            Some(parent_ordinal) => {
                let parent_range = store.entries[parent_ordinal].range;
                if !parent_range.covers(&range) {
                    tracing::warn!(
                        "Range {} of entry {} escapes parent range {}",
                        range,
                        ordinal,
                        parent_range
                    );
                }
                store.entries[parent_ordinal].children.push(ordinal);
            }
            None => store.roots.push(ordinal),
        }

        store.entries.push(Entry {
            key,
            range,
            parent,
            children: Vec::new(),
        });
        store.ordinals.insert(key, ordinal);
        Ok(ordinal)
    }

    /// Source text the builder resolves against
    pub fn source(&self) -> &SourceText {
        self.source
    }

    /// Finish building
    pub fn finish(self) -> RangeStore<K> {
        tracing::debug!(
            "Indexed {} ranges ({} roots)",
            self.store.entries.len(),
            self.store.roots.len()
        );
        self.store
    }
}
