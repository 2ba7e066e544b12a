//! Identity of dependency graph nodes.
//!
//! This module provides the [`Coordinates`] value type together with its
//! equivalence rules, parsing and file-name derivation.
//!
//! # Example
//!
//! ```rust
//! use depgraph::coordinates::{parse, Coordinates};
//!
//! let app: Coordinates = parse(":app").unwrap();
//! let lib = parse("com.example:lib:1.0").unwrap();
//!
//! assert!(app.is_project());
//! assert_eq!(lib.ga().as_deref(), Some("com.example:lib"));
//! assert_eq!(lib.to_file_name(), "com.example__lib");
//! ```

mod error;
pub mod fingerprint;
mod parse;
mod types;

pub use error::{ConstructionError, IdentifierError};
pub use parse::{parse, ParseError, ParseResult, ROOT_BUILD_PATH};
pub use types::{
    Coordinates, IncludedBuildCoordinates, ModuleCoordinates, Notation, ProjectCoordinates,
    VariantIdentification,
};
