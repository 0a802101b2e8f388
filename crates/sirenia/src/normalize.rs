//! Link materialization.
//!
//! Expands every preprocessed link into per-layer slots and inserts link-node
//! entries in the intermediate layers, so no connection ever skips a layer.
//! Link nodes are shared per channel: every leaf of the same connection runs
//! through the same chain until it peels off at its own layer.

use crate::entries::{ChannelIx, Entry, EntryIx, EntryKind, Layers};
use crate::error::{Error, Result};
use crate::preprocess::{Graph, NodeIx, NodeKind};
use crate::rank::Ranking;
use rustc_hash::FxHashMap;

pub fn build_layers(g: &Graph, ranking: &Ranking) -> Result<Layers> {
    let count = (ranking.max - ranking.min + 1).max(1) as usize;
    let mut ls = Layers {
        entries: Vec::with_capacity(g.nodes.len()),
        layers: vec![Vec::new(); count],
        node_entry: vec![0; g.nodes.len()],
    };

    for (ix, node) in g.nodes.iter().enumerate() {
        let layer = layer_of(ranking, ix);
        let kind = match node.kind {
            NodeKind::Vertex => EntryKind::Vertex(ix),
            NodeKind::Edge => EntryKind::Edge(ix),
        };
        ls.node_entry[ix] = push_entry(&mut ls, kind, layer);
    }

    let mut link_nodes: FxHashMap<(ChannelIx, usize), EntryIx> = FxHashMap::default();

    for link in &g.links {
        let channel = ChannelIx {
            root: link.root,
            category: link.category,
        };
        let root_layer = layer_of(ranking, link.root);
        for &leaf in &link.leaves {
            let leaf_layer = layer_of(ranking, leaf);
            if leaf_layer == root_layer {
                return Err(Error::SameLayerLink {
                    root: g.id(link.root).to_string(),
                    leaf: g.id(leaf).to_string(),
                    layer: ranking.layer[link.root],
                });
            }

            // The lower endpoint exits through a high slot, the upper
            // endpoint receives through a low slot, whichever of the two is
            // the link's root.
            let (lo, hi) = if root_layer < leaf_layer {
                (link.root, leaf)
            } else {
                (leaf, link.root)
            };
            push_slot(&mut ls.entries[ls.node_entry[lo]].high, channel);
            push_slot(&mut ls.entries[ls.node_entry[hi]].low, channel);

            let lo_layer = root_layer.min(leaf_layer);
            let hi_layer = root_layer.max(leaf_layer);
            for layer in lo_layer + 1..hi_layer {
                link_nodes.entry((channel, layer)).or_insert_with(|| {
                    let e = push_entry(&mut ls, EntryKind::LinkNode(channel), layer);
                    ls.entries[e].low.push(channel);
                    ls.entries[e].high.push(channel);
                    e
                });
            }
        }
    }

    Ok(ls)
}

fn push_entry(ls: &mut Layers, kind: EntryKind, layer: usize) -> EntryIx {
    let ix = ls.entries.len();
    ls.entries.push(Entry {
        kind,
        layer,
        low: Vec::new(),
        high: Vec::new(),
    });
    ls.layers[layer].push(ix);
    ix
}

/// One slot per entry, side, and channel: same-channel fan-out bundles onto a
/// shared trunk instead of widening the entry.
fn push_slot(slots: &mut Vec<ChannelIx>, channel: ChannelIx) {
    if !slots.contains(&channel) {
        slots.push(channel);
    }
}

fn layer_of(ranking: &Ranking, ix: NodeIx) -> usize {
    (ranking.layer[ix] - ranking.min).max(0) as usize
}
