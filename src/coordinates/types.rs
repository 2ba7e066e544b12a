//! The `Coordinates` value type and its identity rules.
//!
//! A coordinate identifies one node of a resolved dependency graph. It is one
//! of three shapes:
//!
//! - [`ModuleCoordinates`] - a published component (`group:artifact[:version]`)
//! - [`ProjectCoordinates`] - a local project inside a specific build
//! - [`IncludedBuildCoordinates`] - a reference, from one build, to a project
//!   that lives in another build of the same composite
//!
//! All three carry a [`VariantIdentification`]. Its capabilities take part in
//! identity, its attributes and the version are for reporting only.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::{ConstructionError, IdentifierError};
use super::fingerprint::capabilities_fingerprint;

/// Capabilities and attributes of the variant a coordinate was selected as.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct VariantIdentification {
    /// Capability strings (`group:name`). Identity-relevant.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub capabilities: BTreeSet<String>,
    /// Variant attributes. Reporting-only.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl VariantIdentification {
    /// Creates a variant identification with the given capabilities and no attributes.
    pub fn with_capabilities<I, S>(capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            capabilities: capabilities.into_iter().map(Into::into).collect(),
            attributes: BTreeMap::new(),
        }
    }

    /// Adds an attribute, replacing any previous value for `key`.
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Returns true if neither capabilities nor attributes are set.
    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty() && self.attributes.is_empty()
    }
}

/// Which field a coordinate is preferably rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notation {
    /// `group:artifact`
    Module,
    /// `:project:path`
    Project,
}

/// A published component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleCoordinates {
    group: String,
    artifact: String,
    version: Option<String>,
    variant: VariantIdentification,
}

impl ModuleCoordinates {
    /// Creates module coordinates, validating that group and artifact are present.
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: Option<String>,
    ) -> Result<Self, ConstructionError> {
        let group = group.into();
        let artifact = artifact.into();
        require_non_empty("group", &group)?;
        require_non_empty("artifact", &artifact)?;
        if let Some(v) = &version {
            require_non_empty("version", v)?;
        }
        Ok(Self {
            group,
            artifact,
            version,
            variant: VariantIdentification::default(),
        })
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

/// A local project within a specific build.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectCoordinates {
    project_path: String,
    build_path: String,
    variant: VariantIdentification,
}

impl ProjectCoordinates {
    /// Creates project coordinates. Both paths must be `:` or `:a:b`-style paths.
    pub fn new(
        project_path: impl Into<String>,
        build_path: impl Into<String>,
    ) -> Result<Self, ConstructionError> {
        let project_path = project_path.into();
        let build_path = build_path.into();
        require_path("projectPath", &project_path)?;
        require_path("buildPath", &build_path)?;
        Ok(Self {
            project_path,
            build_path,
            variant: VariantIdentification::default(),
        })
    }

    pub fn project_path(&self) -> &str {
        &self.project_path
    }

    pub fn build_path(&self) -> &str {
        &self.build_path
    }

    /// The project name: the last segment of the project path, empty for `:`.
    pub fn artifact(&self) -> &str {
        self.project_path
            .rsplit_once(':')
            .map_or(self.project_path.as_str(), |(_, name)| name)
    }

    /// Replaces the variant identification.
    pub fn with_variant(mut self, variant: VariantIdentification) -> Self {
        self.variant = variant;
        self
    }

    pub fn variant(&self) -> &VariantIdentification {
        &self.variant
    }
}

/// A project of another participating build, seen from the current build.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IncludedBuildCoordinates {
    group: String,
    artifact: String,
    version: Option<String>,
    resolved_project: ProjectCoordinates,
    variant: VariantIdentification,
}

impl IncludedBuildCoordinates {
    /// Creates an included-build reference to `resolved_project`, requested as
    /// `group:artifact[:version]`.
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: Option<String>,
        resolved_project: ProjectCoordinates,
    ) -> Result<Self, ConstructionError> {
        let group = group.into();
        let artifact = artifact.into();
        require_non_empty("group", &group)?;
        require_non_empty("artifact", &artifact)?;
        if let Some(v) = &version {
            require_non_empty("version", v)?;
        }
        require_project_matches_artifact(resolved_project.project_path(), &artifact)?;
        let variant = resolved_project.variant.clone();
        Ok(Self {
            group,
            artifact,
            version,
            resolved_project,
            variant,
        })
    }

    pub fn resolved_project(&self) -> &ProjectCoordinates {
        &self.resolved_project
    }

    /// The build the referenced project lives in.
    pub fn target_build_path(&self) -> &str {
        self.resolved_project.build_path()
    }
}

/// Identity of one dependency graph node.
///
/// Equality, hashing and ordering are structural over every field. Use
/// [`Coordinates::matches`] for the looser "same dependency" equivalence.
///
/// # Example
///
/// ```rust
/// use depgraph::coordinates::{Coordinates, VariantIdentification};
///
/// let plain = Coordinates::module("g", "a", None).unwrap();
/// let explicit = Coordinates::module("g", "a", None)
///     .unwrap()
///     .with_variant(VariantIdentification::with_capabilities(["g:a"]));
///
/// assert_ne!(plain, explicit);
/// assert!(plain.matches(&explicit));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "CoordinatesRepr", into = "CoordinatesRepr")]
pub enum Coordinates {
    Module(ModuleCoordinates),
    Project(ProjectCoordinates),
    IncludedBuild(IncludedBuildCoordinates),
}

impl Coordinates {
    /// Shorthand for [`ModuleCoordinates::new`].
    pub fn module(
        group: &str,
        artifact: &str,
        version: Option<&str>,
    ) -> Result<Self, ConstructionError> {
        ModuleCoordinates::new(group, artifact, version.map(str::to_owned)).map(Self::Module)
    }

    /// Shorthand for [`ProjectCoordinates::new`].
    pub fn project(project_path: &str, build_path: &str) -> Result<Self, ConstructionError> {
        ProjectCoordinates::new(project_path, build_path).map(Self::Project)
    }

    /// Shorthand for [`IncludedBuildCoordinates::new`].
    pub fn included_build(
        group: &str,
        artifact: &str,
        version: Option<&str>,
        resolved_project: ProjectCoordinates,
    ) -> Result<Self, ConstructionError> {
        IncludedBuildCoordinates::new(
            group,
            artifact,
            version.map(str::to_owned),
            resolved_project,
        )
        .map(Self::IncludedBuild)
    }

    /// Replaces the variant identification of this coordinate.
    pub fn with_variant(mut self, variant: VariantIdentification) -> Self {
        match &mut self {
            Self::Module(m) => m.variant = variant,
            Self::Project(p) => p.variant = variant,
            Self::IncludedBuild(i) => {
                i.resolved_project.variant = variant.clone();
                i.variant = variant;
            }
        }
        self
    }

    pub fn variant(&self) -> &VariantIdentification {
        match self {
            Self::Module(m) => &m.variant,
            Self::Project(p) => &p.variant,
            Self::IncludedBuild(i) => &i.variant,
        }
    }

    pub fn capabilities(&self) -> &BTreeSet<String> {
        &self.variant().capabilities
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.variant().attributes
    }

    pub fn group(&self) -> Option<&str> {
        match self {
            Self::Module(m) => Some(&m.group),
            Self::Project(_) => None,
            Self::IncludedBuild(i) => Some(&i.group),
        }
    }

    pub fn artifact(&self) -> &str {
        match self {
            Self::Module(m) => &m.artifact,
            Self::Project(p) => p.artifact(),
            Self::IncludedBuild(i) => &i.artifact,
        }
    }

    pub fn version(&self) -> Option<&str> {
        match self {
            Self::Module(m) => m.version.as_deref(),
            Self::Project(_) => None,
            Self::IncludedBuild(i) => i.version.as_deref(),
        }
    }

    pub fn project_path(&self) -> Option<&str> {
        match self {
            Self::Module(_) => None,
            Self::Project(p) => Some(&p.project_path),
            Self::IncludedBuild(i) => Some(&i.resolved_project.project_path),
        }
    }

    pub fn build_path(&self) -> Option<&str> {
        match self {
            Self::Module(_) => None,
            Self::Project(p) => Some(&p.build_path),
            Self::IncludedBuild(i) => Some(i.target_build_path()),
        }
    }

    /// Returns true for plain project coordinates.
    pub fn is_project(&self) -> bool {
        matches!(self, Self::Project(_))
    }

    /// `group:artifact`, or `None` when the group is unknown.
    pub fn ga(&self) -> Option<String> {
        self.group().map(|g| format!("{}:{}", g, self.artifact()))
    }

    /// Human-readable label: `g:a[:v]` for modules and included builds, the
    /// project path for projects.
    pub fn label(&self) -> String {
        match self {
            Self::Project(p) => p.project_path.clone(),
            Self::Module(ModuleCoordinates {
                group,
                artifact,
                version,
                ..
            })
            | Self::IncludedBuild(IncludedBuildCoordinates {
                group,
                artifact,
                version,
                ..
            }) => match version {
                Some(v) => format!("{}:{}:{}", group, artifact, v),
                None => format!("{}:{}", group, artifact),
            },
        }
    }

    pub fn preferred_notation(&self) -> Notation {
        match self {
            Self::Module(_) => Notation::Module,
            Self::Project(_) | Self::IncludedBuild(_) => Notation::Project,
        }
    }

    /// Whether `capability` is this coordinate's implicit default capability.
    pub fn is_default_capability(&self, capability: &str) -> bool {
        match self.ga() {
            Some(ga) => capability == ga,
            None => capability
                .strip_suffix(self.artifact())
                .is_some_and(|rest| rest.ends_with(':')),
        }
    }

    /// Capabilities with the default capability stripped.
    pub fn non_default_capabilities(&self) -> BTreeSet<&str> {
        self.capabilities()
            .iter()
            .map(String::as_str)
            .filter(|c| !self.is_default_capability(c))
            .collect()
    }

    /// Drops the default capability from the variant. Coordinates that
    /// [`matches`](Coordinates::matches) each other only through the default
    /// capability become equal.
    pub fn without_default_capability(self) -> Self {
        let mut variant = self.variant().clone();
        variant
            .capabilities
            .retain(|capability| !self.is_default_capability(capability));
        self.with_variant(variant)
    }

    /// Equivalence: same GA (both groups known) or same build and project path,
    /// and the same capabilities once the default capability is ignored.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depgraph::coordinates::{Coordinates, VariantIdentification};
    ///
    /// let main = Coordinates::module("g", "a", Some("1.0")).unwrap();
    /// let fixtures = main
    ///     .clone()
    ///     .with_variant(VariantIdentification::with_capabilities(["g:a", "g:a-fixtures"]));
    ///
    /// assert!(main.matches(&main));
    /// assert!(!main.matches(&fixtures));
    /// ```
    pub fn matches(&self, other: &Coordinates) -> bool {
        let same_ga = matches!((self.ga(), other.ga()), (Some(a), Some(b)) if a == b);
        let same_project = match (
            self.build_path(),
            self.project_path(),
            other.build_path(),
            other.project_path(),
        ) {
            (Some(b1), Some(p1), Some(b2), Some(p2)) => b1 == b2 && p1 == p2,
            _ => false,
        };

        (same_ga || same_project)
            && self.non_default_capabilities() == other.non_default_capabilities()
    }

    /// Exact comparison of `id` against the project path or the GA.
    pub fn matches_id(&self, id: &str) -> bool {
        self.project_path() == Some(id) || self.ga().as_deref() == Some(id)
    }

    /// Tests `pattern` against the project path or the GA.
    pub fn matches_pattern(&self, pattern: &Regex) -> bool {
        self.project_path().is_some_and(|p| pattern.is_match(p))
            || self.ga().is_some_and(|ga| pattern.is_match(&ga))
    }

    /// The identifier to show for this coordinate when reporting from `from`.
    ///
    /// Project notation is only used when both live in the same build;
    /// otherwise the GA is used.
    pub fn preferred_identifier(&self, from: &Coordinates) -> Result<String, IdentifierError> {
        match self.preferred_notation() {
            Notation::Project if from.build_path() == self.build_path() => self
                .project_path()
                .map(str::to_owned)
                .ok_or_else(|| IdentifierError::MissingProjectPath(self.label())),
            _ => self
                .ga()
                .ok_or_else(|| IdentifierError::MissingGroup(self.label())),
        }
    }

    /// A deterministic, filesystem-safe name for this coordinate.
    ///
    /// Coordinates that share a GA or project path but differ in non-default
    /// capabilities get a `__<fingerprint>` suffix, so they never collide.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depgraph::coordinates::Coordinates;
    ///
    /// let c = Coordinates::project(":lib:core", ":").unwrap();
    /// assert_eq!(c.to_file_name(), "__lib__core");
    /// ```
    pub fn to_file_name(&self) -> String {
        let id = self
            .ga()
            .or_else(|| self.project_path().map(str::to_owned))
            .unwrap_or_default()
            .replace(':', "__");

        let extra = self.non_default_capabilities();
        if extra.is_empty() {
            id
        } else {
            format!("{}__{}", id, capabilities_fingerprint(extra))
        }
    }

    /// Collapses an included-build reference into its project when the project
    /// lives in `build_path`. Everything else is returned unchanged.
    pub fn maybe_project_coordinates(&self, build_path: &str) -> Coordinates {
        match self {
            Self::IncludedBuild(i) if i.target_build_path() == build_path => {
                Self::Project(i.resolved_project.clone())
            }
            other => other.clone(),
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<ModuleCoordinates> for Coordinates {
    fn from(value: ModuleCoordinates) -> Self {
        Self::Module(value)
    }
}

impl From<ProjectCoordinates> for Coordinates {
    fn from(value: ProjectCoordinates) -> Self {
        Self::Project(value)
    }
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), ConstructionError> {
    if value.is_empty() {
        return Err(ConstructionError::EmptyField { field });
    }
    Ok(())
}

fn require_path(field: &'static str, value: &str) -> Result<(), ConstructionError> {
    let well_formed = value == ":"
        || value
            .strip_prefix(':')
            .is_some_and(|rest| rest.split(':').all(|segment| !segment.is_empty()));
    if !well_formed {
        return Err(ConstructionError::NotAPath {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn require_project_matches_artifact(
    project_path: &str,
    artifact: &str,
) -> Result<(), ConstructionError> {
    let consistent = project_path == ":"
        || project_path
            .strip_suffix(artifact)
            .is_some_and(|rest| rest.ends_with(':'));
    if !consistent {
        return Err(ConstructionError::ArtifactMismatch {
            project_path: project_path.to_string(),
            artifact: artifact.to_string(),
        });
    }
    Ok(())
}

// Wire shape. Kept separate so that decoding runs the same validation as the
// constructors.

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum CoordinatesRepr {
    Module(ModuleRepr),
    Project(ProjectRepr),
    IncludedBuild(IncludedBuildRepr),
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModuleRepr {
    group: String,
    artifact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    capabilities: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectRepr {
    project_path: String,
    #[serde(default)]
    build_path: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    capabilities: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncludedBuildRepr {
    group: String,
    artifact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    resolved_project: ProjectRepr,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    capabilities: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, String>,
}

impl TryFrom<ProjectRepr> for ProjectCoordinates {
    type Error = ConstructionError;

    fn try_from(repr: ProjectRepr) -> Result<Self, Self::Error> {
        let build_path = repr
            .build_path
            .ok_or_else(|| ConstructionError::MissingBuildPath {
                project_path: repr.project_path.clone(),
            })?;
        Ok(ProjectCoordinates::new(repr.project_path, build_path)?.with_variant(
            VariantIdentification {
                capabilities: repr.capabilities,
                attributes: repr.attributes,
            },
        ))
    }
}

impl From<ProjectCoordinates> for ProjectRepr {
    fn from(p: ProjectCoordinates) -> Self {
        Self {
            project_path: p.project_path,
            build_path: Some(p.build_path),
            capabilities: p.variant.capabilities,
            attributes: p.variant.attributes,
        }
    }
}

impl TryFrom<CoordinatesRepr> for Coordinates {
    type Error = ConstructionError;

    fn try_from(repr: CoordinatesRepr) -> Result<Self, Self::Error> {
        match repr {
            CoordinatesRepr::Module(m) => {
                let mut module = ModuleCoordinates::new(m.group, m.artifact, m.version)?;
                module.variant = VariantIdentification {
                    capabilities: m.capabilities,
                    attributes: m.attributes,
                };
                Ok(Self::Module(module))
            }
            CoordinatesRepr::Project(p) => Ok(Self::Project(p.try_into()?)),
            CoordinatesRepr::IncludedBuild(i) => {
                let resolved = ProjectCoordinates::try_from(i.resolved_project)?;
                let mut included =
                    IncludedBuildCoordinates::new(i.group, i.artifact, i.version, resolved)?;
                included.variant = VariantIdentification {
                    capabilities: i.capabilities,
                    attributes: i.attributes,
                };
                Ok(Self::IncludedBuild(included))
            }
        }
    }
}

impl From<Coordinates> for CoordinatesRepr {
    fn from(c: Coordinates) -> Self {
        match c {
            Coordinates::Module(m) => Self::Module(ModuleRepr {
                group: m.group,
                artifact: m.artifact,
                version: m.version,
                capabilities: m.variant.capabilities,
                attributes: m.variant.attributes,
            }),
            Coordinates::Project(p) => Self::Project(p.into()),
            Coordinates::IncludedBuild(i) => Self::IncludedBuild(IncludedBuildRepr {
                group: i.group,
                artifact: i.artifact,
                version: i.version,
                resolved_project: i.resolved_project.into(),
                capabilities: i.variant.capabilities,
                attributes: i.variant.attributes,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn module(caps: &[&str]) -> Coordinates {
        Coordinates::module("g", "a", None)
            .unwrap()
            .with_variant(VariantIdentification::with_capabilities(caps.iter().copied()))
    }

    fn included(build: &str) -> Coordinates {
        let project = ProjectCoordinates::new(":lib", build).unwrap();
        Coordinates::included_build("com.example", "lib", Some("1.0"), project).unwrap()
    }

    #[test]
    fn test_ga_and_label() {
        let m = Coordinates::module("com.x", "lib", Some("1.0")).unwrap();
        assert_eq!(m.ga().as_deref(), Some("com.x:lib"));
        assert_eq!(m.label(), "com.x:lib:1.0");

        let p = Coordinates::project(":app", ":").unwrap();
        assert_eq!(p.ga(), None);
        assert_eq!(p.label(), ":app");
        assert_eq!(p.artifact(), "app");
    }

    #[test]
    fn test_root_project_artifact_is_empty() {
        let p = ProjectCoordinates::new(":", ":").unwrap();
        assert_eq!(p.artifact(), "");
    }

    #[test]
    fn test_default_capability_normalization() {
        assert!(module(&["g:a"]).matches(&module(&[])));
        assert!(module(&[]).matches(&module(&["g:a"])));
    }

    #[test]
    fn test_non_default_capability_distinctness() {
        let fixtures = module(&["g:a", "g:a-fixtures"]);
        let plain = module(&[]);
        assert!(!fixtures.matches(&plain));
        assert_ne!(fixtures.to_file_name(), plain.to_file_name());
        assert!(fixtures.to_file_name().starts_with("g__a__"));
        assert_eq!(plain.to_file_name(), "g__a");
    }

    #[test]
    fn test_single_non_default_capability_is_kept() {
        let other = module(&["g:other"]);
        assert!(!other.matches(&module(&[])));
        assert_eq!(other.non_default_capabilities().len(), 1);
    }

    #[test]
    fn test_project_default_capability_uses_artifact_suffix() {
        let p = Coordinates::project(":lib", ":")
            .unwrap()
            .with_variant(VariantIdentification::with_capabilities(["com.example:lib"]));
        assert!(p.non_default_capabilities().is_empty());
        assert_eq!(p.to_file_name(), "__lib");

        let libx = Coordinates::project(":lib", ":")
            .unwrap()
            .with_variant(VariantIdentification::with_capabilities(["com.example:xlib"]));
        assert_eq!(libx.non_default_capabilities().len(), 1);
    }

    #[test]
    fn test_attributes_do_not_affect_matching() {
        let a = Coordinates::module("g", "a", Some("1.0"))
            .unwrap()
            .with_variant(VariantIdentification::default().attribute("usage", "java-api"));
        let b = Coordinates::module("g", "a", Some("2.0")).unwrap();
        assert!(a.matches(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_included_build_matches_module_with_same_ga() {
        let inc = included(":other");
        let m = Coordinates::module("com.example", "lib", None).unwrap();
        assert!(inc.matches(&m));
        assert!(m.matches(&inc));
    }

    #[test]
    fn test_included_build_matches_project_in_same_build() {
        let inc = included(":other");
        let p = Coordinates::project(":lib", ":other").unwrap();
        let elsewhere = Coordinates::project(":lib", ":").unwrap();
        assert!(inc.matches(&p));
        assert!(!inc.matches(&elsewhere));
    }

    #[test]
    fn test_module_does_not_match_project() {
        let m = Coordinates::module("g", "app", None).unwrap();
        let p = Coordinates::project(":app", ":").unwrap();
        assert!(!m.matches(&p));
    }

    #[test]
    fn test_matches_id_and_pattern() {
        let m = Coordinates::module("com.x", "lib", Some("1.0")).unwrap();
        assert!(m.matches_id("com.x:lib"));
        assert!(!m.matches_id("com.x:lib:1.0"));

        let p = Coordinates::project(":app", ":").unwrap();
        assert!(p.matches_id(":app"));

        let re = Regex::new(r"^com\.x:.*").unwrap();
        assert!(m.matches_pattern(&re));
        assert!(!p.matches_pattern(&re));
        assert!(p.matches_pattern(&Regex::new(":a.p").unwrap()));
    }

    #[test]
    fn test_preferred_identifier_same_build_uses_project_path() {
        let inc = included(":");
        let from = Coordinates::project(":app", ":").unwrap();
        assert_eq!(inc.preferred_identifier(&from).unwrap(), ":lib");
    }

    #[test]
    fn test_preferred_identifier_other_build_uses_ga() {
        let inc = included(":other");
        let from = Coordinates::project(":app", ":").unwrap();
        assert_eq!(inc.preferred_identifier(&from).unwrap(), "com.example:lib");
    }

    #[test]
    fn test_preferred_identifier_module() {
        let m = Coordinates::module("com.x", "lib", Some("1.0")).unwrap();
        let from = Coordinates::project(":app", ":").unwrap();
        assert_eq!(m.preferred_identifier(&from).unwrap(), "com.x:lib");
    }

    #[test]
    fn test_preferred_identifier_missing_group_fails() {
        let p = Coordinates::project(":app", ":").unwrap();
        let from = Coordinates::module("com.x", "lib", None).unwrap();
        assert_eq!(
            p.preferred_identifier(&from),
            Err(IdentifierError::MissingGroup(":app".to_string()))
        );
    }

    #[test]
    fn test_maybe_project_coordinates() {
        let inc = included(":other");
        assert_eq!(
            inc.maybe_project_coordinates(":other"),
            Coordinates::project(":lib", ":other").unwrap()
        );
        assert_eq!(inc.maybe_project_coordinates(":"), inc);

        let m = Coordinates::module("g", "a", None).unwrap();
        assert_eq!(m.maybe_project_coordinates(":"), m);
    }

    #[test]
    fn test_construction_errors() {
        assert_eq!(
            Coordinates::module("", "a", None),
            Err(ConstructionError::EmptyField { field: "group" })
        );
        assert!(matches!(
            Coordinates::project("app", ":"),
            Err(ConstructionError::NotAPath { field: "projectPath", .. })
        ));
        assert!(matches!(
            Coordinates::project(":app", "root"),
            Err(ConstructionError::NotAPath { field: "buildPath", .. })
        ));

        let project = ProjectCoordinates::new(":core", ":other").unwrap();
        assert!(matches!(
            Coordinates::included_build("g", "lib", None, project),
            Err(ConstructionError::ArtifactMismatch { .. })
        ));
    }

    #[test]
    fn test_included_build_rejects_empty_version() {
        let project = ProjectCoordinates::new(":lib", ":other").unwrap();
        assert_eq!(
            Coordinates::included_build("g", "lib", Some(""), project),
            Err(ConstructionError::EmptyField { field: "version" })
        );
    }

    #[test]
    fn test_without_default_capability() {
        let explicit = module(&["g:a"]);
        let plain = module(&[]);
        assert_ne!(explicit, plain);
        assert_eq!(explicit.without_default_capability(), plain);

        let fixtures = module(&["g:a", "g:a-fixtures"]);
        assert_eq!(fixtures.without_default_capability(), module(&["g:a-fixtures"]));

        let inc = included(":other")
            .with_variant(VariantIdentification::with_capabilities(["com.example:lib"]));
        assert_eq!(inc.without_default_capability(), included(":other"));
    }

    #[test]
    fn test_decoding_project_without_build_path_fails() {
        let json = r#"{"type":"project","projectPath":":app"}"#;
        let err = serde_json::from_str::<Coordinates>(json).unwrap_err();
        assert!(err.to_string().contains("buildPath must also be provided"));
    }

    #[test]
    fn test_serialized_shape() {
        let m = Coordinates::module("com.x", "lib", Some("1.0")).unwrap();
        assert_eq!(
            serde_json::to_string(&m).unwrap(),
            r#"{"type":"module","group":"com.x","artifact":"lib","version":"1.0"}"#
        );
        let p = Coordinates::project(":app", ":").unwrap();
        assert_eq!(
            serde_json::to_string(&p).unwrap(),
            r#"{"type":"project","projectPath":":app","buildPath":":"}"#
        );
    }

    #[test]
    fn test_included_build_serde_keeps_resolved_project() {
        let inc = included(":other");
        let json = serde_json::to_string(&inc).unwrap();
        let back: Coordinates = serde_json::from_str(&json).unwrap();
        assert_eq!(back, inc);
        assert_eq!(back.build_path(), Some(":other"));
    }

    fn arb_capabilities() -> impl Strategy<Value = BTreeSet<String>> {
        prop::collection::btree_set("[a-z]{1,3}:[a-z]{1,3}", 0..3)
    }

    fn arb_build_path() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(":".to_string()),
            "[a-z]{1,4}".prop_map(|b| format!(":{}", b)),
        ]
    }

    /// Random capabilities, sometimes together with the default one.
    fn with_caps(c: Coordinates, mut caps: BTreeSet<String>, add_default: bool) -> Coordinates {
        if add_default {
            if let Some(ga) = c.ga() {
                caps.insert(ga);
            }
        }
        c.with_variant(VariantIdentification::with_capabilities(caps))
    }

    fn arb_coordinates() -> impl Strategy<Value = Coordinates> {
        prop_oneof![
            ("[a-z]{1,5}", "[a-z]{1,5}", arb_capabilities(), any::<bool>()).prop_map(
                |(g, a, caps, add_default)| {
                    with_caps(Coordinates::module(&g, &a, None).unwrap(), caps, add_default)
                }
            ),
            ("[a-z]{1,5}", arb_build_path(), arb_capabilities()).prop_map(|(name, build, caps)| {
                with_caps(
                    Coordinates::project(&format!(":{}", name), &build).unwrap(),
                    caps,
                    false,
                )
            }),
            (
                "[a-z]{1,5}",
                "[a-z]{1,5}",
                arb_build_path(),
                arb_capabilities(),
                any::<bool>()
            )
                .prop_map(|(g, name, build, caps, add_default)| {
                    let project = ProjectCoordinates::new(format!(":{}", name), build).unwrap();
                    let included =
                        Coordinates::included_build(&g, &name, Some("1.0"), project).unwrap();
                    with_caps(included, caps, add_default)
                }),
        ]
    }

    proptest! {
        #[test]
        fn prop_matches_is_reflexive(c in arb_coordinates()) {
            prop_assert!(c.matches(&c));
        }

        #[test]
        fn prop_normalized_coordinates_still_match(c in arb_coordinates()) {
            let normalized = c.clone().without_default_capability();
            prop_assert!(normalized.matches(&c));
            prop_assert_eq!(normalized.to_file_name(), c.to_file_name());
        }

        #[test]
        fn prop_serde_round_trip(c in arb_coordinates()) {
            let json = serde_json::to_string(&c).unwrap();
            let back: Coordinates = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(back, c);
        }

        #[test]
        fn prop_matching_coordinates_share_file_name(c in arb_coordinates()) {
            let stripped = c.clone().with_variant(VariantIdentification::default());
            if c.matches(&stripped) {
                prop_assert_eq!(c.to_file_name(), stripped.to_file_name());
            } else {
                prop_assert_ne!(c.to_file_name(), stripped.to_file_name());
            }
        }
    }
}
