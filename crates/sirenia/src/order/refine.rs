//! Local crossing refinement.
//!
//! Alternating down/up barycenter sweeps over the layers. A sweep's ordering
//! is adopted only when it lowers the crossing count, so the result is never
//! worse than the ordering it starts from. Stops after four sweeps without
//! improvement.

use super::{Bands, cross_count};
use crate::entries::{EntryIx, Layers};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;

pub fn refine(ls: &mut Layers) {
    if ls.layers.len() < 2 {
        return;
    }
    let bands = Bands::build(ls);

    let mut best = ls.layers.clone();
    let mut best_cc = cross_count(&best, &bands, ls.entries.len());

    let mut i = 0usize;
    let mut last_best = 0usize;
    while last_best < 4 && best_cc > 0.0 {
        if i % 2 == 0 {
            sweep_down(ls, &bands);
        } else {
            sweep_up(ls, &bands);
        }

        let cc = cross_count(&ls.layers, &bands, ls.entries.len());
        tracing::trace!(sweep = i, crossings = cc, "refinement sweep");
        if cc < best_cc {
            best_cc = cc;
            best = ls.layers.clone();
            last_best = 0;
        }
        i += 1;
        last_best += 1;
    }

    ls.layers = best;
}

fn sweep_down(ls: &mut Layers, bands: &Bands) {
    for b in 1..ls.layers.len() {
        let fixed = index_of(&ls.layers[b - 1]);
        let keys = barycenters(&ls.layers[b], &bands.segments[b - 1], &fixed, false);
        sort_layer(&mut ls.layers[b], &keys);
    }
}

fn sweep_up(ls: &mut Layers, bands: &Bands) {
    for b in (0..ls.layers.len() - 1).rev() {
        let fixed = index_of(&ls.layers[b + 1]);
        let keys = barycenters(&ls.layers[b], &bands.segments[b], &fixed, true);
        sort_layer(&mut ls.layers[b], &keys);
    }
}

fn index_of(layer: &[EntryIx]) -> FxHashMap<EntryIx, usize> {
    layer.iter().enumerate().map(|(i, &e)| (e, i)).collect()
}

/// Mean fixed-side neighbor position per movable entry; entries with no
/// neighbors hold their current position.
fn barycenters(
    layer: &[EntryIx],
    segments: &[(EntryIx, EntryIx)],
    fixed_pos: &FxHashMap<EntryIx, usize>,
    lower_fixed: bool,
) -> FxHashMap<EntryIx, f64> {
    let mut sums: FxHashMap<EntryIx, (f64, f64)> = FxHashMap::default();
    for &(u, l) in segments {
        let (movable, fixed) = if lower_fixed { (u, l) } else { (l, u) };
        if let Some(&p) = fixed_pos.get(&fixed) {
            let s = sums.entry(movable).or_insert((0.0, 0.0));
            s.0 += p as f64;
            s.1 += 1.0;
        }
    }

    let mut keys = FxHashMap::default();
    for (i, &e) in layer.iter().enumerate() {
        let key = match sums.get(&e) {
            Some(&(sum, count)) if count > 0.0 => sum / count,
            _ => i as f64,
        };
        keys.insert(e, key);
    }
    keys
}

fn sort_layer(layer: &mut [EntryIx], keys: &FxHashMap<EntryIx, f64>) {
    layer.sort_by(|a, b| {
        let ka = keys.get(a).copied().unwrap_or(0.0);
        let kb = keys.get(b).copied().unwrap_or(0.0);
        ka.partial_cmp(&kb).unwrap_or(Ordering::Equal)
    });
}
