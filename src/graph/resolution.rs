//! Input model: the resolved component tree handed over by the resolution engine.
//!
//! The tree is delivered as a flat list of components plus a root id. Edges
//! refer to components by [`ComponentId`], so a component reached through
//! several paths (a diamond) is described exactly once.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Identity of a resolved component as reported by the resolution engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComponentId {
    /// A published module.
    Module {
        group: String,
        artifact: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        version: Option<String>,
    },
    /// A project of some build participating in the resolution.
    #[serde(rename_all = "camelCase")]
    Project {
        build_path: String,
        project_path: String,
    },
}

impl ComponentId {
    /// Shorthand for a module id.
    pub fn module(group: &str, artifact: &str, version: Option<&str>) -> Self {
        Self::Module {
            group: group.to_string(),
            artifact: artifact.to_string(),
            version: version.map(str::to_owned),
        }
    }

    /// Shorthand for a project id.
    pub fn project(build_path: &str, project_path: &str) -> Self {
        Self::Project {
            build_path: build_path.to_string(),
            project_path: project_path.to_string(),
        }
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module {
                group,
                artifact,
                version: Some(v),
            } => write!(f, "{}:{}:{}", group, artifact, v),
            Self::Module {
                group, artifact, ..
            } => write!(f, "{}:{}", group, artifact),
            Self::Project {
                build_path,
                project_path,
            } => write!(f, "project '{}' of build '{}'", project_path, build_path),
        }
    }
}

/// Published identity of a component, also known for projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleVersion {
    pub group: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// One node of the resolved tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedComponent {
    pub id: ComponentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<ModuleVersion>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<ResolvedDependency>,
}

impl ResolvedComponent {
    /// Creates a component without dependencies.
    pub fn new(id: ComponentId) -> Self {
        Self {
            id,
            module: None,
            dependencies: Vec::new(),
        }
    }

    /// Sets the published module identity.
    pub fn with_module(mut self, group: &str, name: &str, version: Option<&str>) -> Self {
        self.module = Some(ModuleVersion {
            group: group.to_string(),
            name: name.to_string(),
            version: version.map(str::to_owned),
        });
        self
    }

    /// Appends a dependency edge.
    pub fn depends_on(mut self, dependency: ResolvedDependency) -> Self {
        self.dependencies.push(dependency);
        self
    }
}

/// A direct dependency edge from a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDependency {
    /// The request as declared, for diagnostics.
    #[serde(default)]
    pub requested: String,
    /// The selected component; `None` when resolution failed.
    #[serde(default)]
    pub selected: Option<ComponentId>,
    /// Capabilities of the selected variant.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub capabilities: BTreeSet<String>,
    /// Attributes of the selected variant.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    /// Dependency constraints only influence version selection.
    #[serde(default)]
    pub constraint: bool,
}

impl ResolvedDependency {
    /// A resolved, non-constraint edge to `selected`.
    pub fn to(selected: ComponentId) -> Self {
        Self {
            requested: selected.to_string(),
            selected: Some(selected),
            capabilities: BTreeSet::new(),
            attributes: BTreeMap::new(),
            constraint: false,
        }
    }

    /// An edge whose request could not be resolved.
    pub fn unresolved(requested: &str) -> Self {
        Self {
            requested: requested.to_string(),
            selected: None,
            capabilities: BTreeSet::new(),
            attributes: BTreeMap::new(),
            constraint: false,
        }
    }

    /// Sets the selected variant's capabilities.
    pub fn with_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities = capabilities.into_iter().map(Into::into).collect();
        self
    }

    /// Marks the edge as a constraint.
    pub fn as_constraint(mut self) -> Self {
        self.constraint = true;
        self
    }
}

/// A complete resolution of one configuration of one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionResult {
    /// The build the resolved configuration belongs to.
    pub build_path: String,
    /// Id of the root component (the project being analyzed).
    pub root: ComponentId,
    /// Every component reachable from the root.
    pub components: Vec<ResolvedComponent>,
}

impl ResolutionResult {
    /// Looks up a component by id.
    pub fn component(&self, id: &ComponentId) -> Option<&ResolvedComponent> {
        self.components.iter().find(|c| &c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_id_display() {
        assert_eq!(
            ComponentId::module("com.x", "lib", Some("1.0")).to_string(),
            "com.x:lib:1.0"
        );
        assert_eq!(ComponentId::module("com.x", "lib", None).to_string(), "com.x:lib");
        assert_eq!(
            ComponentId::project(":", ":app").to_string(),
            "project ':app' of build ':'"
        );
    }

    #[test]
    fn test_resolution_result_from_json() {
        let json = r#"{
            "buildPath": ":",
            "root": {"type": "project", "buildPath": ":", "projectPath": ":app"},
            "components": [
                {
                    "id": {"type": "project", "buildPath": ":", "projectPath": ":app"},
                    "dependencies": [
                        {"requested": "com.x:lib:1.+", "selected": {"type": "module", "group": "com.x", "artifact": "lib", "version": "1.2"}},
                        {"requested": "com.x:bom", "selected": {"type": "module", "group": "com.x", "artifact": "bom"}, "constraint": true},
                        {"requested": "com.x:missing"}
                    ]
                },
                {"id": {"type": "module", "group": "com.x", "artifact": "lib", "version": "1.2"}}
            ]
        }"#;

        let result: ResolutionResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.components.len(), 2);

        let root = result.component(&result.root).unwrap();
        assert_eq!(root.dependencies.len(), 3);
        assert!(root.dependencies[1].constraint);
        assert_eq!(root.dependencies[2].selected, None);
        assert!(result
            .component(&ComponentId::module("com.x", "lib", Some("1.2")))
            .is_some());
    }
}
