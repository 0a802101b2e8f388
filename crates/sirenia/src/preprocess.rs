//! Graph preprocessing.
//!
//! Turns the input hypergraph into a simplified node/link graph suitable for
//! cycle analysis, keeping a bidirectional mapping back to the original
//! identities. Nothing is dropped: hyperedges with an empty side keep their
//! node and simply have no link in that direction.

use crate::error::{Error, Result};
use crate::model::{Hypergraph, LinkCategory};
use rustc_hash::FxHashMap;
use std::collections::HashMap;

pub type NodeIx = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Vertex,
    Edge,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
}

/// One directed side of a hyperedge: a root node plus the leaf set it fans
/// out to. Keeping the fan-out on a single link preserves the hyperedge's
/// identity for bundled routing later.
#[derive(Debug, Clone)]
pub struct Link {
    pub root: NodeIx,
    pub category: LinkCategory,
    pub leaves: Vec<NodeIx>,
}

#[derive(Debug, Default)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    /// Suggested-order distance per node, with the same ordering semantics as
    /// the caller's vertex map.
    pub distances: Vec<i64>,
    index: FxHashMap<String, NodeIx>,
}

impl Graph {
    pub fn node_ix(&self, id: &str) -> Option<NodeIx> {
        self.index.get(id).copied()
    }

    pub fn id(&self, ix: NodeIx) -> &str {
        &self.nodes[ix].id
    }

    fn insert(&mut self, id: &str, kind: NodeKind, distance: i64) -> Result<NodeIx> {
        let ix = self.nodes.len();
        if self.index.insert(id.to_string(), ix).is_some() {
            return Err(Error::DuplicateId { id: id.to_string() });
        }
        self.nodes.push(Node {
            id: id.to_string(),
            kind,
        });
        self.distances.push(distance);
        Ok(ix)
    }
}

pub fn build(input: &Hypergraph, distances: &HashMap<String, i64>) -> Result<Graph> {
    let mut g = Graph::default();

    for v in &input.vertices {
        // Unreferenced vertices may be absent from the order map; referenced
        // ones are checked below.
        let d = distances.get(v).copied().unwrap_or(0);
        g.insert(v, NodeKind::Vertex, d)?;
    }

    for edge in &input.hyperedges {
        let inbound = resolve_side(&g, distances, &edge.id, &edge.inbound)?;
        let outbound = resolve_side(&g, distances, &edge.id, &edge.outbound)?;

        // A process sits at or after everything it consumes.
        let d = inbound
            .iter()
            .map(|&ix| g.distances[ix])
            .max()
            .or_else(|| outbound.iter().map(|&ix| g.distances[ix]).min())
            .unwrap_or(0);

        let root = g.insert(&edge.id, NodeKind::Edge, d)?;
        if !outbound.is_empty() {
            g.links.push(Link {
                root,
                category: LinkCategory::Forward,
                leaves: outbound,
            });
        }
        if !inbound.is_empty() {
            g.links.push(Link {
                root,
                category: LinkCategory::Backward,
                leaves: inbound,
            });
        }
    }

    Ok(g)
}

fn resolve_side(
    g: &Graph,
    distances: &HashMap<String, i64>,
    edge_id: &str,
    ids: &[String],
) -> Result<Vec<NodeIx>> {
    let mut out: Vec<NodeIx> = Vec::with_capacity(ids.len());
    for v in ids {
        let ix = match g.node_ix(v) {
            Some(ix) if g.nodes[ix].kind == NodeKind::Vertex => ix,
            _ => {
                return Err(Error::UndefinedVertex {
                    vertex: v.clone(),
                    hyperedge: edge_id.to_string(),
                });
            }
        };
        if !distances.contains_key(v) {
            return Err(Error::MissingDistance { vertex: v.clone() });
        }
        if !out.contains(&ix) {
            out.push(ix);
        }
    }
    Ok(out)
}
