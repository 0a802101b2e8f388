use sirenia::Hypergraph;
use sirenia::model::LinkCategory;
use sirenia::preprocess::{self, Graph};
use sirenia::rank::{self, Ranking};
use std::collections::HashMap;

fn distances(pairs: &[(&str, i64)]) -> HashMap<String, i64> {
    pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect()
}

fn layer(g: &Graph, ranking: &Ranking, id: &str) -> i32 {
    ranking.layer[g.node_ix(id).unwrap()]
}

/// Every connection must end up spanning at least one layer; links that were
/// not picked as feedback point strictly downward.
fn assert_no_flat_links(g: &Graph, ranking: &Ranking) {
    for link in &g.links {
        for &leaf in &link.leaves {
            assert_ne!(
                ranking.layer[link.root],
                ranking.layer[leaf],
                "link {} -> {} is flat",
                g.id(link.root),
                g.id(leaf)
            );
        }
    }
}

#[test]
fn rank_layers_point_forward_on_acyclic_input() {
    let mut hg = Hypergraph::new();
    hg.add_vertex("A").add_vertex("B").add_vertex("C");
    hg.add_hyperedge("E1", &["A"], &["B"]);
    hg.add_hyperedge("E2", &["B"], &["C"]);

    let g = preprocess::build(&hg, &distances(&[("A", 0), ("B", 1), ("C", 2)])).unwrap();
    let ranking = rank::assign_layers(&g, 1);

    assert_eq!(layer(&g, &ranking, "A"), 1);
    assert_eq!(layer(&g, &ranking, "E1"), 2);
    assert_eq!(layer(&g, &ranking, "B"), 3);
    assert_eq!(layer(&g, &ranking, "E2"), 4);
    assert_eq!(layer(&g, &ranking, "C"), 5);

    for link in &g.links {
        for &leaf in &link.leaves {
            match link.category {
                LinkCategory::Forward => {
                    assert!(ranking.layer[leaf] > ranking.layer[link.root]);
                }
                LinkCategory::Backward => {
                    assert!(ranking.layer[leaf] < ranking.layer[link.root]);
                }
            }
        }
    }
}

#[test]
fn rank_terminates_on_a_two_hyperedge_cycle() {
    let mut hg = Hypergraph::new();
    hg.add_vertex("A").add_vertex("B");
    hg.add_hyperedge("E1", &["A"], &["B"]);
    hg.add_hyperedge("E2", &["B"], &["A"]);

    let g = preprocess::build(&hg, &distances(&[("A", 0), ("B", 1)])).unwrap();
    let ranking = rank::assign_layers(&g, 1);

    // E2's output link back to A is the feedback edge: the suggested order
    // places A before B, so the acyclic pass ignores it.
    assert_eq!(layer(&g, &ranking, "A"), 1);
    assert_eq!(layer(&g, &ranking, "E1"), 2);
    assert_eq!(layer(&g, &ranking, "B"), 3);
    assert_eq!(layer(&g, &ranking, "E2"), 4);
    assert_no_flat_links(&g, &ranking);
}

#[test]
fn rank_terminates_on_a_self_referencing_hyperedge() {
    let mut hg = Hypergraph::new();
    hg.add_vertex("A");
    hg.add_hyperedge("E", &["A"], &["A"]);

    let g = preprocess::build(&hg, &distances(&[("A", 0)])).unwrap();
    let ranking = rank::assign_layers(&g, 1);

    assert_eq!(layer(&g, &ranking, "A"), 1);
    assert_eq!(layer(&g, &ranking, "E"), 2);
    assert_no_flat_links(&g, &ranking);
}

#[test]
fn rank_respects_the_base_layer() {
    let mut hg = Hypergraph::new();
    hg.add_vertex("A").add_vertex("B");
    hg.add_hyperedge("E", &["A"], &["B"]);

    let g = preprocess::build(&hg, &distances(&[("A", 0), ("B", 1)])).unwrap();
    let ranking = rank::assign_layers(&g, 3);

    assert_eq!(ranking.min, 3);
    assert_eq!(layer(&g, &ranking, "A"), 3);
    assert_eq!(layer(&g, &ranking, "B"), 5);
}

#[test]
fn rank_starts_disconnected_components_at_the_base() {
    let mut hg = Hypergraph::new();
    hg.add_vertex("A").add_vertex("B").add_vertex("X").add_vertex("Y");
    hg.add_hyperedge("E1", &["A"], &["B"]);
    hg.add_hyperedge("E2", &["X"], &["Y"]);

    let g = preprocess::build(
        &hg,
        &distances(&[("A", 0), ("B", 1), ("X", 0), ("Y", 1)]),
    )
    .unwrap();
    let ranking = rank::assign_layers(&g, 1);

    assert_eq!(layer(&g, &ranking, "A"), 1);
    assert_eq!(layer(&g, &ranking, "X"), 1);
    assert_eq!(layer(&g, &ranking, "B"), layer(&g, &ranking, "Y"));
}

#[test]
fn rank_prefers_the_suggested_order_inside_larger_cycles() {
    // Three processes in a ring; distances pick where the ring breaks.
    let mut hg = Hypergraph::new();
    hg.add_vertex("a").add_vertex("b").add_vertex("c");
    hg.add_hyperedge("p1", &["a"], &["b"]);
    hg.add_hyperedge("p2", &["b"], &["c"]);
    hg.add_hyperedge("p3", &["c"], &["a"]);

    let g = preprocess::build(&hg, &distances(&[("a", 0), ("b", 1), ("c", 2)])).unwrap();
    let ranking = rank::assign_layers(&g, 1);

    assert_eq!(layer(&g, &ranking, "a"), 1);
    assert_eq!(layer(&g, &ranking, "b"), 3);
    assert_eq!(layer(&g, &ranking, "c"), 5);
    assert_eq!(layer(&g, &ranking, "p3"), 6);
    assert_no_flat_links(&g, &ranking);
}
