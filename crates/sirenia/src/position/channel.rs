//! Channel routing.
//!
//! A band is the routing strip between two adjacent layers. Every channel
//! crossing the band gets its own horizontal trunk lane; the router appends
//! tree nodes at the correct trunk position and reports at most one
//! continuation branch into the far layer. The router never owns tree nodes,
//! it only looks them up to attach children.

use super::{EntryPosition, TreeArena, TreeIx};
use crate::entries::{ChannelIx, EntryIx, EntryKind, Layers};
use crate::error::{Error, Result};
use crate::preprocess::Graph;
use rustc_hash::FxHashMap;

/// Which way a route travels through a band, relative to layer order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Down,
    Up,
}

/// Which slot list of an entry a route attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Low,
    High,
}

impl Direction {
    /// Slot side the route exits its current entry through.
    pub fn near_side(self) -> Side {
        match self {
            Direction::Down => Side::High,
            Direction::Up => Side::Low,
        }
    }

    /// Slot side the route arrives at on the far layer.
    pub fn far_side(self) -> Side {
        match self {
            Direction::Down => Side::Low,
            Direction::Up => Side::High,
        }
    }
}

/// The single continuation of a route beyond the current band.
#[derive(Debug, Clone, Copy)]
pub struct Branch {
    pub direction: Direction,
    pub entry: EntryIx,
    /// Tree node the next step grows from (the link node's exit slot).
    pub node: TreeIx,
}

#[derive(Debug)]
pub struct Band {
    pub index: usize,
    pub y: f64,
    pub height: f64,
    link_width: f64,
    lanes: FxHashMap<ChannelIx, usize>,
}

impl Band {
    /// Lanes are assigned in upper-layer slot order, which keeps trunk
    /// positions deterministic for a given entry ordering.
    pub fn build(ls: &Layers, index: usize, link_width: f64) -> Self {
        let mut lanes: FxHashMap<ChannelIx, usize> = FxHashMap::default();
        for &e in &ls.layers[index] {
            for &c in &ls.entries[e].high {
                let next = lanes.len();
                lanes.entry(c).or_insert(next);
            }
        }
        let height = link_width * (lanes.len() as f64 + 1.0);
        Self {
            index,
            y: 0.0,
            height,
            link_width,
            lanes,
        }
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    pub fn trunk_y(&self, channel: ChannelIx) -> f64 {
        let lane = self.lanes.get(&channel).copied().unwrap_or(0);
        self.y + self.link_width * (lane as f64 + 1.0)
    }

    /// Drops `from` onto the channel's trunk, hangs every far-side leaf slot
    /// off the trunk, and reports the continuation branch if the channel
    /// keeps going past the far layer. More than one continuation means the
    /// link builder produced a malformed structure.
    #[allow(clippy::too_many_arguments)]
    pub fn attach(
        &self,
        g: &Graph,
        ls: &Layers,
        positions: &[EntryPosition],
        arena: &mut TreeArena,
        channel: ChannelIx,
        from: TreeIx,
        far_leaves: &[EntryIx],
        direction: Direction,
    ) -> Result<Option<Branch>> {
        let trunk_y = self.trunk_y(channel);
        let drop = arena.push(arena.nodes[from].x, trunk_y);
        arena.attach(from, drop);

        let far_layer = match direction {
            Direction::Down => self.index + 1,
            Direction::Up => self.index,
        };

        let mut continuation: Option<EntryIx> = None;
        for &e in &ls.layers[far_layer] {
            if ls.entries[e].kind == EntryKind::LinkNode(channel)
                && continuation.replace(e).is_some()
            {
                return Err(Error::MultipleBranches {
                    root: g.id(channel.root).to_string(),
                    band: self.index,
                });
            }
        }

        for &leaf in far_leaves {
            let slot = slot_node(ls, positions, leaf, channel, direction.far_side());
            let bend = arena.push(arena.nodes[slot].x, trunk_y);
            arena.attach(drop, bend);
            arena.attach(bend, slot);
        }

        let Some(entry) = continuation else {
            return Ok(None);
        };
        let enter = slot_node(ls, positions, entry, channel, direction.far_side());
        let exit = slot_node(ls, positions, entry, channel, direction.near_side());
        let bend = arena.push(arena.nodes[enter].x, trunk_y);
        arena.attach(drop, bend);
        arena.attach(bend, enter);
        // Pass straight through the link node into the next band.
        arena.attach(enter, exit);
        Ok(Some(Branch {
            direction,
            entry,
            node: exit,
        }))
    }
}

/// The tree node owned by `entry` for `channel` on the given side.
pub fn slot_node(
    ls: &Layers,
    positions: &[EntryPosition],
    entry: EntryIx,
    channel: ChannelIx,
    side: Side,
) -> TreeIx {
    let (slots, nodes) = match side {
        Side::Low => (&ls.entries[entry].low, &positions[entry].low_nodes),
        Side::High => (&ls.entries[entry].high, &positions[entry].high_nodes),
    };
    let i = slots
        .iter()
        .position(|&c| c == channel)
        .expect("entry has no slot for channel");
    nodes[i]
}
