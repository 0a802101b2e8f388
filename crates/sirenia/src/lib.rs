//! Layered hypergraph diagram layout.
//!
//! Computes box positions and bundled, tree-shaped connection routes for a
//! directed hypergraph of items (vertices) and processes (hyperedges), so a
//! rendering layer can draw the diagram without further geometric reasoning.
//!
//! The pipeline runs strictly forward, one stage at a time:
//!
//! 1. [`preprocess`] simplifies the hypergraph into a node/link graph.
//! 2. [`rank`] breaks cycles against the suggested order and assigns layers.
//! 3. [`normalize`] materializes slots and inserts link-node chains.
//! 4. [`order`] minimizes crossings and orders each entry's slots.
//! 5. [`position`] produces rectangles and channel-routed trees.
//!
//! A run either returns a complete, internally consistent
//! [`LayoutCoordinates`] value or an [`Error`]; there is no partial output.

pub mod entries;
pub mod error;
pub mod model;
pub mod normalize;
pub mod order;
pub mod position;
pub mod preprocess;
pub mod rank;

pub use error::{Error, Result};
pub use model::{
    EntryMetrics, Hyperedge, Hypergraph, LayoutCoordinates, LayoutParams, LinkCategory, Rect,
    RouteNode, TreeLink,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lays out `input` using the caller's suggested vertex order.
///
/// `distances` must cover every vertex referenced by a hyperedge; it only
/// suggests an ordering, the final layering is derived from the links with
/// the distances breaking cycles.
pub fn layout(
    input: &Hypergraph,
    distances: &std::collections::HashMap<String, i64>,
    params: &LayoutParams,
) -> Result<LayoutCoordinates> {
    let graph = preprocess::build(input, distances)?;
    tracing::debug!(
        nodes = graph.nodes.len(),
        links = graph.links.len(),
        "preprocessed hypergraph"
    );
    if graph.nodes.is_empty() {
        return Ok(LayoutCoordinates::default());
    }

    let ranking = rank::assign_layers(&graph, 1);
    tracing::debug!(min = ranking.min, max = ranking.max, "assigned layers");

    let mut layers = normalize::build_layers(&graph, &ranking)?;

    let bands = order::Bands::build(&layers);
    let placement = order::place(&layers, &bands);
    order::apply(&mut layers, &placement);
    order::refine(&mut layers);
    order::sort_slots(&mut layers);
    tracing::debug!(entries = layers.entries.len(), "ordered layers");

    position::position(&graph, &layers, params)
}
