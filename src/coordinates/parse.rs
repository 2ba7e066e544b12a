//! Parsing of raw coordinate strings.
//!
//! Accepted shapes:
//!
//! - `:path:to:project` - a project of the root build
//! - `group:artifact:version`
//! - `group:artifact`
//!
//! Anything else is rejected with [`ParseError`]; nothing is coerced.

use std::str::FromStr;

use tracing::trace;

use super::error::ConstructionError;
use super::types::{Coordinates, ModuleCoordinates, ProjectCoordinates};

/// Build path assigned to projects parsed from a bare `:path` string.
pub const ROOT_BUILD_PATH: &str = ":";

/// Errors that can occur while parsing a coordinate string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The string has none of the accepted shapes.
    #[error("'{0}' is not a coordinate: expected ':project', 'group:artifact' or 'group:artifact:version'")]
    Malformed(String),

    /// The string had an accepted shape but an invalid segment.
    #[error("'{raw}' is not a valid coordinate: {source}")]
    Invalid {
        raw: String,
        #[source]
        source: ConstructionError,
    },
}

/// Result type alias for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a raw coordinate string.
///
/// # Example
///
/// ```rust
/// use depgraph::coordinates::parse;
///
/// let app = parse(":app").unwrap();
/// assert_eq!(app.project_path(), Some(":app"));
///
/// let lib = parse("com.x:lib:1.0").unwrap();
/// assert_eq!(lib.version(), Some("1.0"));
/// assert_eq!(parse("com.x:lib").unwrap().version(), None);
///
/// assert!(parse("bad").is_err());
/// ```
pub fn parse(raw: &str) -> ParseResult<Coordinates> {
    trace!(raw, "parsing coordinate");

    let invalid = |source: ConstructionError| ParseError::Invalid {
        raw: raw.to_string(),
        source,
    };

    if raw.starts_with(':') {
        return ProjectCoordinates::new(raw, ROOT_BUILD_PATH)
            .map(Coordinates::Project)
            .map_err(invalid);
    }

    let segments: Vec<&str> = raw.split(':').collect();
    match segments.as_slice() {
        [group, artifact, version] => {
            ModuleCoordinates::new(*group, *artifact, Some((*version).to_string()))
                .map(Coordinates::Module)
                .map_err(invalid)
        }
        [group, artifact] if !group.is_empty() && !artifact.is_empty() => {
            ModuleCoordinates::new(*group, *artifact, None)
                .map(Coordinates::Module)
                .map_err(invalid)
        }
        _ => Err(ParseError::Malformed(raw.to_string())),
    }
}

impl FromStr for Coordinates {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}
