//! Entry ordering and crossing minimization.
//!
//! Two passes: a global root-coupling placement, then a local sweep that only
//! keeps orderings with fewer crossings. A final slot pass reorders each
//! entry's connection points against the adjacent layers.

mod coupling;
mod cross_count;
mod refine;
mod slots;

pub use coupling::{RootPlacement, apply, place};
pub use cross_count::cross_count;
pub use refine::refine;
pub use slots::sort_slots;

use crate::entries::{ChannelIx, EntryIx, Layers};
use rustc_hash::FxHashMap;

/// Connection segments per channel band, as (upper entry, lower entry)
/// pairs between adjacent layers.
#[derive(Debug, Default)]
pub struct Bands {
    pub segments: Vec<Vec<(EntryIx, EntryIx)>>,
}

impl Bands {
    pub fn build(ls: &Layers) -> Self {
        let count = ls.layers.len().saturating_sub(1);
        let mut segments = vec![Vec::new(); count];
        for (b, seg) in segments.iter_mut().enumerate() {
            let mut upper: FxHashMap<ChannelIx, Vec<EntryIx>> = FxHashMap::default();
            for &e in &ls.layers[b] {
                for &c in &ls.entries[e].high {
                    upper.entry(c).or_default().push(e);
                }
            }
            for &e in &ls.layers[b + 1] {
                for &c in &ls.entries[e].low {
                    if let Some(us) = upper.get(&c) {
                        for &u in us {
                            seg.push((u, e));
                        }
                    }
                }
            }
        }
        Self { segments }
    }
}
