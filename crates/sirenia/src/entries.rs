//! Layer, entry, and slot bookkeeping shared by the ordering and coordinate
//! passes.
//!
//! Entries live in one arena for the whole run; layers and slot lists refer to
//! them by index, so later passes can reorder freely without touching
//! ownership.

use crate::model::LinkCategory;
use crate::preprocess::NodeIx;

pub type EntryIx = usize;

/// Identifies one bundled connection: the link's root node plus its direction
/// flag. Every slot carries the channel index of the connection it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChannelIx {
    pub root: NodeIx,
    pub category: LinkCategory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Vertex(NodeIx),
    Edge(NodeIx),
    /// Pass-through entry carrying a channel across an intermediate layer.
    LinkNode(ChannelIx),
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub kind: EntryKind,
    /// Zero-based index into [`Layers::layers`].
    pub layer: usize,
    /// Connection points on the previous-layer side, in drawing order.
    pub low: Vec<ChannelIx>,
    /// Connection points on the next-layer side, in drawing order.
    pub high: Vec<ChannelIx>,
}

#[derive(Debug, Default)]
pub struct Layers {
    pub entries: Vec<Entry>,
    /// Entry order per layer; the ordering passes rewrite these lists.
    pub layers: Vec<Vec<EntryIx>>,
    /// Preprocessed node index to its entry.
    pub node_entry: Vec<EntryIx>,
}

impl Layers {
    /// Index of each entry within its layer, for the whole arena.
    pub fn positions(&self) -> Vec<usize> {
        let mut pos = vec![0usize; self.entries.len()];
        for layer in &self.layers {
            for (i, &e) in layer.iter().enumerate() {
                pos[e] = i;
            }
        }
        pos
    }
}
