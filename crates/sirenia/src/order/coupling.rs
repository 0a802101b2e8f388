//! Global placement by root coupling.
//!
//! Roots (entries with no predecessor toward the previous layer) anchor the
//! horizontal order. Every entry accumulates per-root dependency path counts
//! in layer order; two roots whose dependency trees overlap through shared
//! downstream entries attract each other, and a greedy insertion orders the
//! roots so strongly coupled pairs sit close together. Everything else lands
//! at the path-count-weighted barycenter of its roots.

use super::Bands;
use crate::entries::{EntryIx, Layers};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;

#[derive(Debug, Default)]
pub struct RootPlacement {
    /// Roots in discovery (layer) order.
    pub roots: Vec<EntryIx>,
    /// Roots in their final sequence order.
    pub sequence: Vec<EntryIx>,
    /// Per-entry dependency path counts, keyed by root entry, sorted by root.
    pub paths: Vec<Vec<(EntryIx, f64)>>,
    /// Total dependency path count per entry.
    pub counts: Vec<f64>,
    /// Computed horizontal key per entry.
    pub x: Vec<f64>,
    coupling: FxHashMap<(EntryIx, EntryIx), f64>,
}

impl RootPlacement {
    /// Coupling score between two roots; symmetric by construction.
    pub fn coupling(&self, a: EntryIx, b: EntryIx) -> f64 {
        let key = (a.min(b), a.max(b));
        self.coupling.get(&key).copied().unwrap_or(0.0)
    }
}

pub fn place(ls: &Layers, bands: &Bands) -> RootPlacement {
    let n = ls.entries.len();
    let mut preds: Vec<Vec<EntryIx>> = vec![Vec::new(); n];
    for seg in &bands.segments {
        for &(u, l) in seg {
            preds[l].push(u);
        }
    }

    // Forward accumulation in layer order: an entry's path counts are the
    // sums over its predecessor segments.
    let mut paths: Vec<FxHashMap<EntryIx, f64>> = vec![FxHashMap::default(); n];
    let mut counts = vec![0.0f64; n];
    let mut roots: Vec<EntryIx> = Vec::new();

    for layer in &ls.layers {
        for &e in layer {
            if preds[e].is_empty() {
                paths[e].insert(e, 1.0);
                counts[e] = 1.0;
                roots.push(e);
                continue;
            }
            let mut acc: FxHashMap<EntryIx, f64> = FxHashMap::default();
            let mut total = 0.0;
            for &p in &preds[e] {
                for (&r, &c) in &paths[p] {
                    *acc.entry(r).or_insert(0.0) += c;
                }
                total += counts[p];
            }
            paths[e] = acc;
            counts[e] = total;
        }
    }

    let paths: Vec<Vec<(EntryIx, f64)>> = paths
        .into_iter()
        .map(|m| {
            let mut v: Vec<(EntryIx, f64)> = m.into_iter().collect();
            v.sort_unstable_by_key(|&(r, _)| r);
            v
        })
        .collect();

    // coupling(r1, r2) = sum over entries sharing both roots of
    // paths[r1] * paths[r2] / counts^2.
    let mut coupling: FxHashMap<(EntryIx, EntryIx), f64> = FxHashMap::default();
    for e in 0..n {
        if counts[e] <= 0.0 || paths[e].len() < 2 {
            continue;
        }
        let denom = counts[e] * counts[e];
        let rs = &paths[e];
        for i in 0..rs.len() {
            for j in i + 1..rs.len() {
                *coupling.entry((rs[i].0, rs[j].0)).or_insert(0.0) += rs[i].1 * rs[j].1 / denom;
            }
        }
    }

    // Greedy insertion: strongest pairings first, each root dropped at the
    // position that maximizes the potential-energy score. Ties keep
    // discovery order (the sort is stable).
    let mut peak: FxHashMap<EntryIx, f64> = FxHashMap::default();
    for (&(a, b), &c) in &coupling {
        let pa = peak.entry(a).or_insert(0.0);
        *pa = pa.max(c);
        let pb = peak.entry(b).or_insert(0.0);
        *pb = pb.max(c);
    }
    let mut by_peak = roots.clone();
    by_peak.sort_by(|&a, &b| {
        let pa = peak.get(&a).copied().unwrap_or(0.0);
        let pb = peak.get(&b).copied().unwrap_or(0.0);
        pb.partial_cmp(&pa).unwrap_or(Ordering::Equal)
    });

    let mut sequence: Vec<EntryIx> = Vec::with_capacity(by_peak.len());
    for &r in &by_peak {
        let mut best_pos = 0usize;
        let mut best_ep = f64::NEG_INFINITY;
        for pos in 0..=sequence.len() {
            let mut candidate = sequence.clone();
            candidate.insert(pos, r);
            let ep = potential_energy(&candidate, &coupling);
            if ep > best_ep {
                best_ep = ep;
                best_pos = pos;
            }
        }
        sequence.insert(best_pos, r);
    }

    let mut seq_pos: FxHashMap<EntryIx, f64> = FxHashMap::default();
    for (i, &r) in sequence.iter().enumerate() {
        seq_pos.insert(r, i as f64);
    }

    // Roots take their sequence rank; everything else takes the weighted
    // barycenter of its roots.
    let mut x = vec![0.0f64; n];
    for e in 0..n {
        if let Some(&p) = seq_pos.get(&e) {
            x[e] = p;
            continue;
        }
        if counts[e] > 0.0 {
            let mut sum = 0.0;
            for &(r, c) in &paths[e] {
                sum += c * seq_pos.get(&r).copied().unwrap_or(0.0);
            }
            x[e] = sum / counts[e];
        }
    }

    RootPlacement {
        roots,
        sequence,
        paths,
        counts,
        x,
        coupling,
    }
}

/// Sorts every layer by the computed key. The sort is stable, so ties keep
/// the pre-existing order.
pub fn apply(ls: &mut Layers, placement: &RootPlacement) {
    for layer in &mut ls.layers {
        layer.sort_by(|&a, &b| {
            placement.x[a]
                .partial_cmp(&placement.x[b])
                .unwrap_or(Ordering::Equal)
        });
    }
}

/// Strongly coupled roots pull toward each other with a force decaying with
/// sequence distance, like gravity.
fn potential_energy(seq: &[EntryIx], coupling: &FxHashMap<(EntryIx, EntryIx), f64>) -> f64 {
    let mut ep = 0.0;
    for i in 0..seq.len() {
        for j in i + 1..seq.len() {
            let key = (seq[i].min(seq[j]), seq[i].max(seq[j]));
            if let Some(c) = coupling.get(&key) {
                ep += c / (j - i) as f64;
            }
        }
    }
    ep
}
