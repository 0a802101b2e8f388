//! Crossing counter.
//!
//! Accumulator-tree count of pairwise segment inversions between adjacent
//! layers, summed over every channel band.

use super::Bands;
use crate::entries::EntryIx;

pub fn cross_count(layers: &[Vec<EntryIx>], bands: &Bands, entry_count: usize) -> f64 {
    let mut pos = vec![0usize; entry_count];
    for layer in layers {
        for (i, &e) in layer.iter().enumerate() {
            pos[e] = i;
        }
    }

    let mut cc = 0.0;
    for (b, seg) in bands.segments.iter().enumerate() {
        let south_len = layers.get(b + 1).map(Vec::len).unwrap_or(0);
        cc += two_layer_cross_count(seg, &pos, south_len);
    }
    cc
}

fn two_layer_cross_count(segments: &[(EntryIx, EntryIx)], pos: &[usize], south_len: usize) -> f64 {
    if south_len == 0 || segments.is_empty() {
        return 0.0;
    }

    let mut south_entries: Vec<(usize, usize)> = segments
        .iter()
        .map(|&(u, l)| (pos[u], pos[l]))
        .collect();
    south_entries.sort_unstable();

    // Build the accumulator tree over south positions.
    let mut first_index: usize = 1;
    while first_index < south_len {
        first_index <<= 1;
    }
    let tree_size = 2 * first_index - 1;
    first_index -= 1;
    let mut tree: Vec<f64> = vec![0.0; tree_size];

    let mut cc: f64 = 0.0;
    for &(_, south_pos) in &south_entries {
        let mut index = south_pos + first_index;
        tree[index] += 1.0;
        let mut weight_sum: f64 = 0.0;
        while index > 0 {
            if index % 2 == 1 {
                weight_sum += tree[index + 1];
            }
            index = (index - 1) >> 1;
            tree[index] += 1.0;
        }
        cc += weight_sum;
    }

    cc
}
