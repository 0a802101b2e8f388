//! Coordinate generation.
//!
//! Sizes every entry from its slot counts, stacks layer bands and channel
//! bands top to bottom, centers each layer on the widest one, and grows one
//! bundled routing tree per connection through the channel router.

pub mod channel;

use crate::entries::{ChannelIx, EntryIx, EntryKind, Layers};
use crate::error::Result;
use crate::model::{
    EntryMetrics, LayoutCoordinates, LayoutParams, Rect, RouteNode, TreeLink,
};
use crate::preprocess::Graph;
use channel::{Band, Direction};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

pub type TreeIx = usize;

/// Routing-tree node arena. Parent/child relations are index links; the entry
/// position that created a node owns it exclusively, everything else holds
/// lookups only.
#[derive(Debug, Default)]
pub struct TreeArena {
    pub nodes: Vec<TreeNodeData>,
}

#[derive(Debug, Clone)]
pub struct TreeNodeData {
    pub x: f64,
    pub y: f64,
    pub children: Vec<TreeIx>,
}

impl TreeArena {
    pub fn push(&mut self, x: f64, y: f64) -> TreeIx {
        self.nodes.push(TreeNodeData {
            x,
            y,
            children: Vec::new(),
        });
        self.nodes.len() - 1
    }

    pub fn attach(&mut self, parent: TreeIx, child: TreeIx) {
        self.nodes[parent].children.push(child);
    }
}

/// Geometry owned by one entry: its rectangle and one tree node per slot.
#[derive(Debug, Clone)]
pub struct EntryPosition {
    pub rect: Rect,
    pub low_nodes: Vec<TreeIx>,
    pub high_nodes: Vec<TreeIx>,
}

pub fn position(g: &Graph, ls: &Layers, params: &LayoutParams) -> Result<LayoutCoordinates> {
    let mut arena = TreeArena::default();
    let mut positions = size_entries(ls, params);

    let mut bands: Vec<Band> = (0..ls.layers.len().saturating_sub(1))
        .map(|b| Band::build(ls, b, params.link_width))
        .collect();

    // Y pass: alternate layer bands and channel bands top to bottom. Entries
    // are centered in a fixed-height layer band; channel bands take whatever
    // their lane count needs.
    let layer_band_h = layer_band_height(params);
    let mut y = 0.0;
    for (i, layer) in ls.layers.iter().enumerate() {
        for &e in layer {
            let h = positions[e].rect.height;
            positions[e].rect.y = y + (layer_band_h - h) / 2.0;
        }
        y += layer_band_h;
        if let Some(band) = bands.get_mut(i) {
            band.y = y;
            y += band.height;
        }
    }

    // X pass: entries left to right in sorted order, layers centered on the
    // widest one.
    let widths: Vec<f64> = ls
        .layers
        .iter()
        .map(|layer| layer.iter().map(|&e| span_x(&positions[e].rect)).sum())
        .collect();
    let max_width = widths.iter().copied().fold(0.0f64, f64::max);
    for (layer, width) in ls.layers.iter().zip(&widths) {
        let mut x = (max_width - width) / 2.0;
        for &e in layer {
            x += positions[e].rect.margin_x;
            positions[e].rect.x = x;
            x += positions[e].rect.width + positions[e].rect.margin_x;
        }
    }

    // One tree node per slot, sitting on the entry's low or high edge, with
    // slot x positions evenly subdividing the entry's width.
    for (e, p) in positions.iter_mut().enumerate() {
        let entry = &ls.entries[e];
        let (top, bottom) = (p.rect.y, p.rect.y + p.rect.height);
        p.low_nodes = slot_nodes(&mut arena, &p.rect, entry.low.len(), top);
        p.high_nodes = slot_nodes(&mut arena, &p.rect, entry.high.len(), bottom);
    }

    let links = route_links(g, ls, &positions, &bands, &mut arena)?;
    tracing::debug!(
        bands = bands.len(),
        routes = links.len(),
        "generated coordinates"
    );

    let mut boxes = BTreeMap::new();
    for (e, entry) in ls.entries.iter().enumerate() {
        match entry.kind {
            EntryKind::Vertex(n) | EntryKind::Edge(n) => {
                boxes.insert(g.id(n).to_string(), positions[e].rect);
            }
            EntryKind::LinkNode(_) => {}
        }
    }

    Ok(LayoutCoordinates { boxes, links })
}

fn size_entries(ls: &Layers, params: &LayoutParams) -> Vec<EntryPosition> {
    ls.entries
        .iter()
        .map(|entry| {
            let m = metrics_for(&entry.kind, params);
            let slots = entry.low.len().max(entry.high.len());
            let width = m.min_x.max(params.link_width * slots as f64);
            EntryPosition {
                rect: Rect {
                    x: 0.0,
                    y: 0.0,
                    width,
                    height: m.min_y,
                    margin_x: m.margin_x,
                    margin_y: m.margin_y,
                },
                low_nodes: Vec::new(),
                high_nodes: Vec::new(),
            }
        })
        .collect()
}

fn metrics_for(kind: &EntryKind, params: &LayoutParams) -> EntryMetrics {
    match kind {
        EntryKind::Vertex(_) => params.vertex,
        EntryKind::Edge(_) => params.hyperedge,
        EntryKind::LinkNode(_) => params.link_node,
    }
}

/// Every layer band is tall enough for the bigger of the two real entry
/// types, margins included.
fn layer_band_height(params: &LayoutParams) -> f64 {
    let v = params.vertex.min_y + 2.0 * params.vertex.margin_y;
    let e = params.hyperedge.min_y + 2.0 * params.hyperedge.margin_y;
    v.max(e)
}

fn span_x(rect: &Rect) -> f64 {
    rect.width + 2.0 * rect.margin_x
}

fn slot_nodes(arena: &mut TreeArena, rect: &Rect, count: usize, y: f64) -> Vec<TreeIx> {
    (0..count)
        .map(|i| {
            let x = rect.x + rect.width * (i as f64 + 0.5) / count as f64;
            arena.push(x, y)
        })
        .collect()
}

/// Grows every connection's routing tree. A link whose leaves sit on both
/// sides of its root (feedback present) yields one tree per travel
/// direction, each with a single root slot.
fn route_links(
    g: &Graph,
    ls: &Layers,
    positions: &[EntryPosition],
    bands: &[Band],
    arena: &mut TreeArena,
) -> Result<Vec<TreeLink>> {
    let mut out = Vec::new();
    for link in &g.links {
        let channel = ChannelIx {
            root: link.root,
            category: link.category,
        };
        let root_entry = ls.node_entry[link.root];
        let root_layer = ls.entries[root_entry].layer;

        let mut down: Vec<EntryIx> = Vec::new();
        let mut up: Vec<EntryIx> = Vec::new();
        for &leaf in &link.leaves {
            let e = ls.node_entry[leaf];
            if ls.entries[e].layer > root_layer {
                down.push(e);
            } else {
                up.push(e);
            }
        }

        for (leaves, direction) in [(&down, Direction::Down), (&up, Direction::Up)] {
            if leaves.is_empty() {
                continue;
            }
            let root = grow_tree(
                g, ls, positions, bands, arena, channel, root_entry, leaves, direction,
            )?;
            out.push(TreeLink {
                category: link.category,
                root,
            });
        }
    }
    Ok(out)
}

/// Walks one connection outward from its root slot, a band at a time,
/// attaching trunk and leaf nodes until no continuation branch remains.
#[allow(clippy::too_many_arguments)]
fn grow_tree(
    g: &Graph,
    ls: &Layers,
    positions: &[EntryPosition],
    bands: &[Band],
    arena: &mut TreeArena,
    channel: ChannelIx,
    root_entry: EntryIx,
    leaves: &[EntryIx],
    direction: Direction,
) -> Result<RouteNode> {
    let mut by_layer: FxHashMap<usize, Vec<EntryIx>> = FxHashMap::default();
    for &leaf in leaves {
        by_layer
            .entry(ls.entries[leaf].layer)
            .or_default()
            .push(leaf);
    }

    let root_node = channel::slot_node(ls, positions, root_entry, channel, direction.near_side());
    let mut entry = root_entry;
    let mut current = root_node;

    loop {
        let band_ix = match direction {
            Direction::Down => ls.entries[entry].layer,
            Direction::Up => ls.entries[entry].layer - 1,
        };
        let far_layer = match direction {
            Direction::Down => band_ix + 1,
            Direction::Up => band_ix,
        };
        let far_leaves = by_layer.get(&far_layer).cloned().unwrap_or_default();

        let step = bands[band_ix].attach(
            g, ls, positions, arena, channel, current, &far_leaves, direction,
        )?;
        let Some(branch) = step else { break };
        entry = branch.entry;
        current = branch.node;
    }

    Ok(materialize(arena, root_node))
}

fn materialize(arena: &TreeArena, ix: TreeIx) -> RouteNode {
    let node = &arena.nodes[ix];
    RouteNode {
        x: node.x,
        y: node.y,
        children: node
            .children
            .iter()
            .map(|&c| materialize(arena, c))
            .collect(),
    }
}
