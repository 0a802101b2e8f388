//! Slot ordering.
//!
//! With the entry order settled, each entry's connection points are reordered
//! to match the horizontal order of their opposite entries in the adjacent
//! layer. Entry ordering and layer assignment are never touched.

use crate::entries::{ChannelIx, Layers};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;

pub fn sort_slots(ls: &mut Layers) {
    let pos = ls.positions();
    let band_count = ls.layers.len().saturating_sub(1);

    for b in 0..band_count {
        let upper = side_means(ls, b, true, &pos);
        let lower = side_means(ls, b + 1, false, &pos);

        let Layers {
            layers, entries, ..
        } = &mut *ls;
        for &e in &layers[b + 1] {
            sort_side(&mut entries[e].low, &upper);
        }
        for &e in &layers[b] {
            sort_side(&mut entries[e].high, &lower);
        }
    }
}

/// Mean in-layer position of each channel's endpoints on one side of a band.
fn side_means(
    ls: &Layers,
    layer: usize,
    high_side: bool,
    pos: &[usize],
) -> FxHashMap<ChannelIx, f64> {
    let mut sums: FxHashMap<ChannelIx, (f64, f64)> = FxHashMap::default();
    for &e in &ls.layers[layer] {
        let slots = if high_side {
            &ls.entries[e].high
        } else {
            &ls.entries[e].low
        };
        for &c in slots {
            let s = sums.entry(c).or_insert((0.0, 0.0));
            s.0 += pos[e] as f64;
            s.1 += 1.0;
        }
    }
    sums.into_iter().map(|(c, (sum, n))| (c, sum / n)).collect()
}

fn sort_side(slots: &mut [ChannelIx], means: &FxHashMap<ChannelIx, f64>) {
    slots.sort_by(|a, b| {
        let ka = means.get(a).copied().unwrap_or(f64::MAX);
        let kb = means.get(b).copied().unwrap_or(f64::MAX);
        ka.partial_cmp(&kb).unwrap_or(Ordering::Equal)
    });
}
