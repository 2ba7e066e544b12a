//! Named, immutable snapshots of a dependency graph.
//!
//! A [`GraphView`] ties a [`DependencyGraph`] to the variant and configuration
//! it was computed for. The [`json`] submodule persists views across processes.

pub mod json;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::graph::DependencyGraph;

pub use json::DeserializationError;

/// Kind of source set a variant was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceKind {
    Main,
    Test,
    AndroidTest,
    TestFixtures,
    Custom,
}

impl std::str::FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "main" => Ok(SourceKind::Main),
            "test" => Ok(SourceKind::Test),
            "android-test" | "android_test" => Ok(SourceKind::AndroidTest),
            "test-fixtures" | "test_fixtures" => Ok(SourceKind::TestFixtures),
            "custom" => Ok(SourceKind::Custom),
            _ => Err(format!(
                "Unknown source kind: '{}'. Valid kinds: main, test, android-test, test-fixtures, custom",
                s
            )),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Main => write!(f, "main"),
            SourceKind::Test => write!(f, "test"),
            SourceKind::AndroidTest => write!(f, "android-test"),
            SourceKind::TestFixtures => write!(f, "test-fixtures"),
            SourceKind::Custom => write!(f, "custom"),
        }
    }
}

/// A build variant, e.g. `debug`/`Main` or `main`/`Test`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variant {
    /// Variant name
    pub variant: String,
    /// Source set kind
    pub kind: SourceKind,
}

impl Variant {
    pub fn new(variant: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            variant: variant.into(),
            kind,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.variant, self.kind)
    }
}

/// A graph computed for one variant and configuration.
///
/// Views are never mutated after construction and can be shared freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphView {
    variant: Variant,
    configuration_name: String,
    graph: DependencyGraph,
}

impl GraphView {
    pub fn new(
        variant: Variant,
        configuration_name: impl Into<String>,
        graph: DependencyGraph,
    ) -> Self {
        Self {
            variant,
            configuration_name: configuration_name.into(),
            graph,
        }
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    pub fn configuration_name(&self) -> &str {
        &self.configuration_name
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }
}
