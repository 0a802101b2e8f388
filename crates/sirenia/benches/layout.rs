use criterion::{Criterion, criterion_group, criterion_main};
use sirenia::{Hypergraph, LayoutParams};
use std::collections::HashMap;
use std::hint::black_box;

/// A production-chain shaped graph: `depth` tiers of items, each tier
/// produced from the previous one by `width` processes with overlapping
/// inputs.
fn chain(width: usize, depth: usize) -> (Hypergraph, HashMap<String, i64>) {
    let mut hg = Hypergraph::new();
    let mut distances = HashMap::new();

    for tier in 0..depth {
        for i in 0..width {
            let id = format!("item_{tier}_{i}");
            distances.insert(id.clone(), tier as i64);
            hg.add_vertex(id);
        }
    }

    for tier in 1..depth {
        for i in 0..width {
            let inputs: Vec<String> = (0..2)
                .map(|k| format!("item_{}_{}", tier - 1, (i + k) % width))
                .collect();
            let inputs: Vec<&str> = inputs.iter().map(String::as_str).collect();
            let output = format!("item_{tier}_{i}");
            hg.add_hyperedge(format!("proc_{tier}_{i}"), &inputs, &[output.as_str()]);
        }
    }

    (hg, distances)
}

fn bench_layout(c: &mut Criterion) {
    let params = LayoutParams::default();

    for (width, depth) in [(4usize, 6usize), (6, 12)] {
        let (hg, distances) = chain(width, depth);
        c.bench_function(&format!("layout chain {width}x{depth}"), |b| {
            b.iter(|| sirenia::layout(black_box(&hg), &distances, &params));
        });
    }
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
