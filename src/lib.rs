//! depgraph - Dependency graph model, persistence and rendering for multi-project builds
//!
//! This crate identifies build dependencies with [`Coordinates`], derives a
//! duplicate-free [`DependencyGraph`] from a resolved component tree, stores
//! graphs as JSON [`GraphView`]s and renders them as DOT or topological text.
//!
//! # Example
//!
//! ```rust
//! use depgraph::{parse, DependencyGraph, GraphWriter};
//!
//! let mut graph = DependencyGraph::new();
//! graph.add_edge(parse(":app")?, parse(":lib")?);
//! graph.add_edge(parse(":lib")?, parse("com.google:guava:1.0")?);
//!
//! let text = GraphWriter::new(":").topological(&graph)?;
//! assert_eq!(text, "com.google:guava:1.0 1\n:lib 1\n:app 0\n");
//! # Ok::<(), depgraph::Error>(())
//! ```

pub mod coordinates;
pub mod graph;
pub mod view;
pub mod writer;

pub use coordinates::{
    parse, ConstructionError, Coordinates, IdentifierError, ParseError, ROOT_BUILD_PATH,
};
pub use graph::{BuildError, DependencyGraph, GraphBuilder, ResolutionResult};
pub use view::{DeserializationError, GraphView, SourceKind, Variant};
pub use writer::{CycleError, GraphWriter, RenderError, RenderFormat};

/// Any error raised by this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Cycle(#[from] CycleError),

    #[error(transparent)]
    Deserialization(#[from] DeserializationError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Result alias over [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
