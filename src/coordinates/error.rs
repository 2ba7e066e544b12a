//! Errors raised while constructing or rendering coordinates.

/// A coordinate value would violate one of its structural invariants.
///
/// These indicate a bug in whatever produced the value (the resolution engine
/// adapter or a corrupt persisted view), not bad user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstructionError {
    /// A required identity field was empty.
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    /// A project or build path is not a `:`-prefixed path without empty segments.
    #[error("{field} must be ':' or a ':'-separated path but was '{value}'")]
    NotAPath { field: &'static str, value: String },

    /// The project path does not end with the artifact name.
    #[error("project path '{project_path}' must be ':' or end with ':{artifact}'")]
    ArtifactMismatch {
        project_path: String,
        artifact: String,
    },

    /// A project path was supplied without the build it belongs to.
    #[error("if projectPath is provided, buildPath must also be provided (projectPath '{project_path}')")]
    MissingBuildPath { project_path: String },
}

/// A caller asked for a notation whose backing field is absent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    /// GA notation requested for a coordinate without a group.
    #[error("'{0}' has no group, cannot render group:artifact notation")]
    MissingGroup(String),

    /// Project notation requested for a coordinate without a project path.
    #[error("'{0}' has no project path, cannot render project notation")]
    MissingProjectPath(String),
}
