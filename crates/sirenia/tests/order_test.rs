use sirenia::Hypergraph;
use sirenia::entries::{ChannelIx, Entry, EntryIx, EntryKind, Layers};
use sirenia::model::LinkCategory;
use sirenia::order::{self, Bands};
use sirenia::preprocess::{self, Graph};
use sirenia::{normalize, rank};
use std::collections::HashMap;

fn distances(pairs: &[(&str, i64)]) -> HashMap<String, i64> {
    pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect()
}

fn pipeline(hg: &Hypergraph, d: &HashMap<String, i64>) -> (Graph, Layers, Bands) {
    let g = preprocess::build(hg, d).unwrap();
    let ranking = rank::assign_layers(&g, 1);
    let ls = normalize::build_layers(&g, &ranking).unwrap();
    let bands = Bands::build(&ls);
    (g, ls, bands)
}

fn channel(root: usize) -> ChannelIx {
    ChannelIx {
        root,
        category: LinkCategory::Forward,
    }
}

fn entry(layer: usize, low: &[ChannelIx], high: &[ChannelIx]) -> Entry {
    Entry {
        kind: EntryKind::Vertex(0),
        layer,
        low: low.to_vec(),
        high: high.to_vec(),
    }
}

fn hand_layers(entries: Vec<Entry>, layers: Vec<Vec<EntryIx>>) -> Layers {
    Layers {
        entries,
        layers,
        node_entry: Vec::new(),
    }
}

#[test]
fn cross_count_returns_0_for_an_empty_layering() {
    let ls = hand_layers(Vec::new(), Vec::new());
    let bands = Bands::build(&ls);
    assert_eq!(order::cross_count(&ls.layers, &bands, 0), 0.0);
}

#[test]
fn cross_count_returns_0_for_a_layering_with_no_crossings() {
    let ls = hand_layers(
        vec![
            entry(0, &[], &[channel(0)]),
            entry(0, &[], &[channel(1)]),
            entry(1, &[channel(0)], &[]),
            entry(1, &[channel(1)], &[]),
        ],
        vec![vec![0, 1], vec![2, 3]],
    );
    let bands = Bands::build(&ls);
    assert_eq!(order::cross_count(&ls.layers, &bands, 4), 0.0);
}

#[test]
fn cross_count_returns_1_for_a_layering_with_1_crossing() {
    let ls = hand_layers(
        vec![
            entry(0, &[], &[channel(0)]),
            entry(0, &[], &[channel(1)]),
            entry(1, &[channel(0)], &[]),
            entry(1, &[channel(1)], &[]),
        ],
        vec![vec![0, 1], vec![3, 2]],
    );
    let bands = Bands::build(&ls);
    assert_eq!(order::cross_count(&ls.layers, &bands, 4), 1.0);
}

#[test]
fn cross_count_sums_across_bands() {
    let ls = hand_layers(
        vec![
            entry(0, &[], &[channel(0)]),
            entry(0, &[], &[channel(1)]),
            entry(1, &[channel(0)], &[channel(2)]),
            entry(1, &[channel(1)], &[channel(3)]),
            entry(2, &[channel(2)], &[]),
            entry(2, &[channel(3)], &[]),
        ],
        vec![vec![0, 1], vec![3, 2], vec![4, 5]],
    );
    let bands = Bands::build(&ls);
    assert_eq!(order::cross_count(&ls.layers, &bands, 6), 2.0);
}

#[test]
fn refine_untangles_a_crossed_pair() {
    let mut ls = hand_layers(
        vec![
            entry(0, &[], &[channel(0)]),
            entry(0, &[], &[channel(1)]),
            entry(1, &[channel(0)], &[]),
            entry(1, &[channel(1)], &[]),
        ],
        vec![vec![0, 1], vec![3, 2]],
    );
    let bands = Bands::build(&ls);
    assert_eq!(order::cross_count(&ls.layers, &bands, 4), 1.0);

    order::refine(&mut ls);
    assert_eq!(order::cross_count(&ls.layers, &bands, 4), 0.0);
}

#[test]
fn refine_never_makes_an_ordering_worse() {
    let mut hg = Hypergraph::new();
    for v in ["a", "b", "c", "d", "w", "x", "y", "z"] {
        hg.add_vertex(v);
    }
    hg.add_hyperedge("p1", &["a", "c"], &["w"]);
    hg.add_hyperedge("p2", &["b", "d"], &["x"]);
    hg.add_hyperedge("p3", &["a", "d"], &["y"]);
    hg.add_hyperedge("p4", &["b", "c"], &["z"]);

    let d = distances(&[
        ("a", 0),
        ("b", 0),
        ("c", 0),
        ("d", 0),
        ("w", 1),
        ("x", 1),
        ("y", 1),
        ("z", 1),
    ]);
    let (_, mut ls, bands) = pipeline(&hg, &d);
    let placement = order::place(&ls, &bands);
    order::apply(&mut ls, &placement);

    let before = order::cross_count(&ls.layers, &bands, ls.entries.len());
    order::refine(&mut ls);
    let after = order::cross_count(&ls.layers, &bands, ls.entries.len());
    assert!(after <= before, "refinement went from {before} to {after}");
}

#[test]
fn coupling_is_symmetric_and_counts_shared_descendants() {
    let mut hg = Hypergraph::new();
    hg.add_vertex("A").add_vertex("B").add_vertex("C");
    hg.add_hyperedge("E1", &["A", "B"], &["C"]);

    let d = distances(&[("A", 0), ("B", 0), ("C", 1)]);
    let (g, ls, bands) = pipeline(&hg, &d);
    let placement = order::place(&ls, &bands);

    let a = ls.node_entry[g.node_ix("A").unwrap()];
    let b = ls.node_entry[g.node_ix("B").unwrap()];

    // E1 and C each see one path from A and one from B out of two total:
    // 2 * (1 * 1 / 4).
    assert_eq!(placement.coupling(a, b), 0.5);
    assert_eq!(placement.coupling(a, b), placement.coupling(b, a));
}

#[test]
fn barycenters_stay_within_the_positions_of_their_roots() {
    let mut hg = Hypergraph::new();
    for v in ["A", "B", "C", "D", "X", "Y"] {
        hg.add_vertex(v);
    }
    hg.add_hyperedge("E1", &["A", "B"], &["X"]);
    hg.add_hyperedge("E2", &["C", "D"], &["Y"]);

    let d = distances(&[
        ("A", 0),
        ("B", 0),
        ("C", 0),
        ("D", 0),
        ("X", 1),
        ("Y", 1),
    ]);
    let (_, ls, bands) = pipeline(&hg, &d);
    let placement = order::place(&ls, &bands);

    let mut seq_pos: HashMap<EntryIx, f64> = HashMap::new();
    for (i, &r) in placement.sequence.iter().enumerate() {
        seq_pos.insert(r, i as f64);
    }

    for e in 0..ls.entries.len() {
        if seq_pos.contains_key(&e) {
            continue;
        }
        let root_positions: Vec<f64> = placement.paths[e]
            .iter()
            .map(|&(r, _)| seq_pos[&r])
            .collect();
        assert!(!root_positions.is_empty());
        let min = root_positions.iter().copied().fold(f64::INFINITY, f64::min);
        let max = root_positions
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        assert!(
            placement.x[e] >= min && placement.x[e] <= max,
            "entry {e} placed at {} outside [{min}, {max}]",
            placement.x[e]
        );
    }
}

#[test]
fn strongly_coupled_roots_end_up_adjacent() {
    let mut hg = Hypergraph::new();
    for v in ["A", "B", "C", "X", "Y"] {
        hg.add_vertex(v);
    }
    hg.add_hyperedge("E1", &["A", "B"], &["X"]);
    hg.add_hyperedge("E2", &["C"], &["Y"]);

    let d = distances(&[("A", 0), ("B", 0), ("C", 0), ("X", 1), ("Y", 1)]);
    let (g, mut ls, bands) = pipeline(&hg, &d);
    let placement = order::place(&ls, &bands);

    let a = ls.node_entry[g.node_ix("A").unwrap()];
    let b = ls.node_entry[g.node_ix("B").unwrap()];
    let pos_a = placement.sequence.iter().position(|&r| r == a).unwrap();
    let pos_b = placement.sequence.iter().position(|&r| r == b).unwrap();
    assert_eq!(pos_a.abs_diff(pos_b), 1);

    // Applying the placement sorts every layer by the computed key, with the
    // uncoupled root pushed to one side.
    order::apply(&mut ls, &placement);
    let c = ls.node_entry[g.node_ix("C").unwrap()];
    let first_layer = &ls.layers[0];
    assert!(first_layer[0] == c || first_layer[first_layer.len() - 1] == c);
}

#[test]
fn sort_slots_matches_the_opposite_layer_order() {
    let mut ls = hand_layers(
        vec![
            entry(0, &[], &[channel(10)]),
            entry(0, &[], &[channel(11)]),
            entry(1, &[channel(11), channel(10)], &[]),
        ],
        vec![vec![0, 1], vec![2]],
    );

    order::sort_slots(&mut ls);
    assert_eq!(ls.entries[2].low, vec![channel(10), channel(11)]);
    // Entry order itself is untouched.
    assert_eq!(ls.layers[0], vec![0, 1]);
}
