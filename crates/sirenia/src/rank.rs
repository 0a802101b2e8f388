//! Layer assignment.
//!
//! Linearizes the preprocessed graph by strongly connected components, using
//! the caller's suggested order to decide which intra-component link leaves to
//! treat as feedback, then places every node at the lowest layer consistent
//! with the remaining links.

use crate::model::LinkCategory;
use crate::preprocess::{Graph, NodeIx};

#[derive(Debug, Clone)]
pub struct Ranking {
    /// Layer per node; `min` or greater.
    pub layer: Vec<i32>,
    pub min: i32,
    pub max: i32,
}

/// Assigns every node a layer, `base` or greater. Feedback leaves picked in
/// step two are ignored for placement only; they still exist for the link
/// builder and end up drawn against the layer direction.
pub fn assign_layers(g: &Graph, base: i32) -> Ranking {
    let n = g.nodes.len();
    if n == 0 {
        return Ranking {
            layer: Vec::new(),
            min: base,
            max: base,
        };
    }

    let full = edges(g, |_, _, _| true);
    let comps = scc::components(&succ_list(n, &full));
    let mut comp_of = vec![0usize; n];
    for (ci, comp) in comps.iter().enumerate() {
        for &v in comp {
            comp_of[v] = ci;
        }
    }

    // Every inter-component edge is kept. Inside a component, a leaf survives
    // only when it agrees with the suggested order relative to the link's
    // root; the dropped leaves are the feedback set. The order map decides,
    // never an arbitrary choice.
    let reduced = edges(g, |root, leaf, category| {
        if comp_of[root] != comp_of[leaf] {
            return true;
        }
        match category {
            LinkCategory::Forward => g.distances[leaf] >= g.distances[root],
            LinkCategory::Backward => g.distances[leaf] <= g.distances[root],
        }
    });

    let comps = scc::components(&succ_list(n, &reduced));
    let mut comp_of = vec![0usize; n];
    for (ci, comp) in comps.iter().enumerate() {
        for &v in comp {
            comp_of[v] = ci;
        }
    }
    let preds = pred_list(n, &reduced);

    // Components come out sinks-first, so the reversed walk sees every
    // cross-component predecessor placed before its dependents. Inside a
    // component that is still cyclic (order ties), the priority pass settles
    // members whose in-component predecessors are done; the deferred pass
    // seeds the remainder in stable node order at the base layer.
    let mut layer: Vec<Option<i32>> = vec![None; n];
    for comp in comps.iter().rev() {
        let mut remaining: Vec<NodeIx> = comp.clone();
        while !remaining.is_empty() {
            let mut still = Vec::with_capacity(remaining.len());
            let mut placed_any = false;
            for &v in &remaining {
                let ready = preds[v]
                    .iter()
                    .all(|&p| comp_of[p] != comp_of[v] || layer[p].is_some());
                if ready {
                    layer[v] = Some(place_at(&preds[v], &layer, base));
                    placed_any = true;
                } else {
                    still.push(v);
                }
            }
            remaining = still;
            if !placed_any && !remaining.is_empty() {
                let v = remaining.remove(0);
                layer[v] = Some(place_at(&preds[v], &layer, base));
            }
        }
    }

    let layer: Vec<i32> = layer.into_iter().map(|l| l.unwrap_or(base)).collect();
    let min = layer.iter().copied().min().unwrap_or(base);
    let max = layer.iter().copied().max().unwrap_or(base);
    Ranking { layer, min, max }
}

fn place_at(preds: &[NodeIx], layer: &[Option<i32>], base: i32) -> i32 {
    preds
        .iter()
        .filter_map(|&p| layer[p])
        .map(|l| l + 1)
        .max()
        .unwrap_or(base)
        .max(base)
}

/// Directed edges induced by the links: forward fan-out points root to leaf,
/// backward fan-in points leaf to root.
fn edges(g: &Graph, mut keep: impl FnMut(NodeIx, NodeIx, LinkCategory) -> bool) -> Vec<(NodeIx, NodeIx)> {
    let mut out = Vec::new();
    for link in &g.links {
        for &leaf in &link.leaves {
            if !keep(link.root, leaf, link.category) {
                continue;
            }
            let (from, to) = match link.category {
                LinkCategory::Forward => (link.root, leaf),
                LinkCategory::Backward => (leaf, link.root),
            };
            out.push((from, to));
        }
    }
    out
}

fn succ_list(n: usize, edges: &[(NodeIx, NodeIx)]) -> Vec<Vec<NodeIx>> {
    let mut succ = vec![Vec::new(); n];
    for &(v, w) in edges {
        succ[v].push(w);
    }
    succ
}

fn pred_list(n: usize, edges: &[(NodeIx, NodeIx)]) -> Vec<Vec<NodeIx>> {
    let mut pred = vec![Vec::new(); n];
    for &(v, w) in edges {
        pred[w].push(v);
    }
    pred
}

pub mod scc {
    //! Strongly connected components (Tarjan) over an index adjacency list.

    struct Tarjan<'a> {
        succ: &'a [Vec<usize>],
        index: usize,
        stack: Vec<usize>,
        on_stack: Vec<bool>,
        indices: Vec<Option<usize>>,
        lowlink: Vec<usize>,
        comps: Vec<Vec<usize>>,
    }

    impl Tarjan<'_> {
        fn strongconnect(&mut self, v: usize) {
            self.indices[v] = Some(self.index);
            self.lowlink[v] = self.index;
            self.index += 1;
            self.stack.push(v);
            self.on_stack[v] = true;

            let succ = self.succ;
            for &w in &succ[v] {
                if self.indices[w].is_none() {
                    self.strongconnect(w);
                    self.lowlink[v] = self.lowlink[v].min(self.lowlink[w]);
                } else if self.on_stack[w] {
                    let w_index = self.indices[w].unwrap_or(0);
                    self.lowlink[v] = self.lowlink[v].min(w_index);
                }
            }

            if Some(self.lowlink[v]) == self.indices[v] {
                let mut comp = Vec::new();
                while let Some(w) = self.stack.pop() {
                    self.on_stack[w] = false;
                    comp.push(w);
                    if w == v {
                        break;
                    }
                }
                // Deterministic member order inside a component.
                comp.sort_unstable();
                self.comps.push(comp);
            }
        }
    }

    /// Components come out sinks-first (reverse topological order of the
    /// condensation).
    pub fn components(succ: &[Vec<usize>]) -> Vec<Vec<usize>> {
        let n = succ.len();
        let mut tarjan = Tarjan {
            succ,
            index: 0,
            stack: Vec::new(),
            on_stack: vec![false; n],
            indices: vec![None; n],
            lowlink: vec![0; n],
            comps: Vec::new(),
        };
        for v in 0..n {
            if tarjan.indices[v].is_none() {
                tarjan.strongconnect(v);
            }
        }
        tarjan.comps
    }
}
