//! Graph construction from a resolved component tree.
//!
//! # Edge Direction
//!
//! An edge `A -> B` means "A directly depends on B", matching the direction of
//! the resolution tree's parent -> child links.
//!
//! # Traversal
//!
//! The walk is memoized by the [`Coordinates`] a tree node converts to. A
//! component reached through many paths is expanded once, so the cost is
//! proportional to distinct nodes plus edges, not to the number of paths.
//! Default capabilities are stripped first, so a component selected with and
//! without its default capability is still one node.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::{debug, instrument};

use super::dependency_graph::DependencyGraph;
use super::resolution::{ComponentId, ResolutionResult, ResolvedComponent};
use crate::coordinates::{
    ConstructionError, Coordinates, IncludedBuildCoordinates, ModuleCoordinates,
    ProjectCoordinates, VariantIdentification,
};

/// Errors that can occur while building a graph from a resolution result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// An edge (or the root) refers to a component missing from the result.
    #[error("{0} is referenced but missing from the resolution result")]
    UnknownComponent(String),

    /// A project of another build has no published identity to refer to it by.
    #[error("{0} belongs to another build but has no module identity")]
    MissingModuleIdentity(String),

    /// A component converted into invalid coordinates.
    #[error(transparent)]
    Construction(#[from] ConstructionError),
}

/// Converts a [`ResolutionResult`] into a [`DependencyGraph`].
///
/// A builder holds only its options and can be shared between threads; every
/// call to [`GraphBuilder::build`] works on its own input.
///
/// # Example
///
/// ```rust
/// use depgraph::graph::{ComponentId, GraphBuilder, ResolutionResult, ResolvedComponent, ResolvedDependency};
///
/// let app = ComponentId::project(":", ":app");
/// let lib = ComponentId::module("com.x", "lib", Some("1.0"));
///
/// let resolution = ResolutionResult {
///     build_path: ":".to_string(),
///     root: app.clone(),
///     components: vec![
///         ResolvedComponent::new(app).depends_on(ResolvedDependency::to(lib.clone())),
///         ResolvedComponent::new(lib),
///     ],
/// };
///
/// let graph = GraphBuilder::new().build(&resolution).unwrap();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.root().unwrap().label(), ":app");
/// ```
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    local_only: bool,
    flat_files: BTreeSet<Coordinates>,
}

impl GraphBuilder {
    /// Creates a builder that keeps every edge and has no flat-file seeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only edges between projects of the current build.
    pub fn local_only(mut self, local_only: bool) -> Self {
        self.local_only = local_only;
        self
    }

    /// Seeds direct dependencies of the root that are not backed by metadata.
    pub fn with_flat_files<I>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = Coordinates>,
    {
        self.flat_files
            .extend(files.into_iter().map(Coordinates::without_default_capability));
        self
    }

    /// Walks `resolution` from its root and returns the dependency graph.
    ///
    /// # Errors
    ///
    /// Fails if the result refers to components it does not contain, or if a
    /// component cannot be turned into valid coordinates. No partial graph is
    /// returned.
    #[instrument(skip_all, fields(build_path = %resolution.build_path, root = %resolution.root, local_only = self.local_only))]
    pub fn build(&self, resolution: &ResolutionResult) -> Result<DependencyGraph, BuildError> {
        let build_path = resolution.build_path.as_str();
        let index: HashMap<&ComponentId, &ResolvedComponent> = resolution
            .components
            .iter()
            .map(|c| (&c.id, c))
            .collect();
        let lookup = |id: &ComponentId| {
            index
                .get(id)
                .copied()
                .ok_or_else(|| BuildError::UnknownComponent(id.to_string()))
        };

        let root_component = lookup(&resolution.root)?;
        let root = to_coordinates(build_path, root_component, VariantIdentification::default())?;

        let mut graph = DependencyGraph::with_capacity(index.len(), index.len());
        graph.add_node(root.clone());

        for file in &self.flat_files {
            if self.keeps_edge(build_path, &root, file) {
                graph.add_edge(root.clone(), file.clone());
            }
        }

        let mut visited: HashSet<Coordinates> = HashSet::from([root.clone()]);
        let mut stack: Vec<(Coordinates, &ResolvedComponent)> = vec![(root, root_component)];

        while let Some((from, component)) = stack.pop() {
            for dependency in &component.dependencies {
                if dependency.constraint {
                    continue;
                }
                let Some(selected_id) = &dependency.selected else {
                    debug!(requested = %dependency.requested, "skipping unresolved dependency");
                    continue;
                };

                let selected = lookup(selected_id)?;
                let variant = VariantIdentification {
                    capabilities: dependency.capabilities.clone(),
                    attributes: dependency.attributes.clone(),
                };
                let to = to_coordinates(build_path, selected, variant)?;

                if !self.keeps_edge(build_path, &from, &to) {
                    continue;
                }

                graph.add_edge(from.clone(), to.clone());
                if visited.insert(to.clone()) {
                    stack.push((to, selected));
                }
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built dependency graph"
        );
        Ok(graph)
    }

    fn keeps_edge(&self, build_path: &str, from: &Coordinates, to: &Coordinates) -> bool {
        let local = |c: &Coordinates| c.is_project() && c.build_path() == Some(build_path);
        !self.local_only || (local(from) && local(to))
    }
}

/// Converts one resolved component, selected as `variant`, into coordinates as
/// seen from `build_path`.
fn to_coordinates(
    build_path: &str,
    component: &ResolvedComponent,
    variant: VariantIdentification,
) -> Result<Coordinates, BuildError> {
    let coordinates = match &component.id {
        ComponentId::Module {
            group,
            artifact,
            version,
        } => Coordinates::Module(ModuleCoordinates::new(
            group.as_str(),
            artifact.as_str(),
            version.clone(),
        )?),
        ComponentId::Project {
            build_path: component_build,
            project_path,
        } if component_build == build_path => {
            Coordinates::Project(ProjectCoordinates::new(project_path.as_str(), build_path)?)
        }
        ComponentId::Project {
            build_path: component_build,
            project_path,
        } => {
            let module = component
                .module
                .as_ref()
                .ok_or_else(|| BuildError::MissingModuleIdentity(component.id.to_string()))?;
            let project = ProjectCoordinates::new(project_path.as_str(), component_build.as_str())?;
            Coordinates::IncludedBuild(IncludedBuildCoordinates::new(
                module.group.as_str(),
                module.name.as_str(),
                module.version.clone(),
                project,
            )?)
        }
    };

    Ok(coordinates.with_variant(variant).without_default_capability())
}
