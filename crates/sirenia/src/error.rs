//! Error taxonomy.
//!
//! Configuration errors mean the caller must fix the input. Internal
//! consistency failures mean an earlier pipeline stage produced an impossible
//! structure; the run aborts rather than emit a partially-correct layout.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("vertex `{vertex}` is referenced by hyperedge `{hyperedge}` but never defined")]
    UndefinedVertex { vertex: String, hyperedge: String },

    #[error("vertex `{vertex}` is missing from the suggested order map")]
    MissingDistance { vertex: String },

    #[error("`{id}` is defined more than once")]
    DuplicateId { id: String },

    #[error("link from `{root}` to `{leaf}` has both endpoints in layer {layer}")]
    SameLayerLink {
        root: String,
        leaf: String,
        layer: i32,
    },

    #[error("channel rooted at `{root}` has more than one continuation out of band {band}")]
    MultipleBranches { root: String, band: usize },
}
