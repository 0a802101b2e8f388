//! Input, configuration, and output types.
//!
//! These are intentionally lightweight and `Clone`-friendly so hosts can keep a
//! finished layout around (or serialize it) without touching the engine again.

use serde::Serialize;
use std::collections::BTreeMap;

/// A directed hypergraph: items as vertices, processes as hyperedges.
///
/// Vertex and hyperedge identities are opaque strings supplied by the host;
/// the engine only requires them to be unique.
#[derive(Debug, Clone, Default)]
pub struct Hypergraph {
    pub vertices: Vec<String>,
    pub hyperedges: Vec<Hyperedge>,
}

/// A process consuming `inbound` vertices and producing `outbound` vertices.
///
/// Either side may be empty; such hyperedges still appear in the layout, they
/// simply have no connections on that side.
#[derive(Debug, Clone)]
pub struct Hyperedge {
    pub id: String,
    pub inbound: Vec<String>,
    pub outbound: Vec<String>,
}

impl Hypergraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, id: impl Into<String>) -> &mut Self {
        self.vertices.push(id.into());
        self
    }

    pub fn add_hyperedge(
        &mut self,
        id: impl Into<String>,
        inbound: &[&str],
        outbound: &[&str],
    ) -> &mut Self {
        self.hyperedges.push(Hyperedge {
            id: id.into(),
            inbound: inbound.iter().map(|s| s.to_string()).collect(),
            outbound: outbound.iter().map(|s| s.to_string()).collect(),
        });
        self
    }
}

/// Sizing for one entry type: minimum core size plus outer margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryMetrics {
    pub min_x: f64,
    pub margin_x: f64,
    pub min_y: f64,
    pub margin_y: f64,
}

/// Layout configuration supplied by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutParams {
    /// Horizontal space reserved per connection slot; also the lane pitch
    /// inside channel bands.
    pub link_width: f64,
    pub vertex: EntryMetrics,
    pub hyperedge: EntryMetrics,
    pub link_node: EntryMetrics,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            link_width: 6.0,
            vertex: EntryMetrics {
                min_x: 32.0,
                margin_x: 8.0,
                min_y: 32.0,
                margin_y: 4.0,
            },
            hyperedge: EntryMetrics {
                min_x: 48.0,
                margin_x: 12.0,
                min_y: 32.0,
                margin_y: 4.0,
            },
            link_node: EntryMetrics {
                min_x: 6.0,
                margin_x: 3.0,
                min_y: 6.0,
                margin_y: 3.0,
            },
        }
    }
}

/// Final geometry of one vertex or hyperedge box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub margin_x: f64,
    pub margin_y: f64,
}

/// Whether a link follows its hyperedge's output side (root to leaves) or its
/// input side (leaves to root).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkCategory {
    Forward,
    Backward,
}

/// One node of a finished routing tree, with final coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteNode {
    pub x: f64,
    pub y: f64,
    pub children: Vec<RouteNode>,
}

/// A bundled route from one slot of the connection's root entry to the
/// corresponding slots of every other endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeLink {
    pub category: LinkCategory,
    pub root: RouteNode,
}

/// The complete result of one layout run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutCoordinates {
    /// Final rectangle per vertex and hyperedge identity.
    pub boxes: BTreeMap<String, Rect>,
    pub links: Vec<TreeLink>,
}
