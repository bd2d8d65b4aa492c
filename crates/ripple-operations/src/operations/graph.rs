use std::path::Path;

use ripple_graph::{FilterPolicy, PackageGraph};
use semver::Version;

use super::filter::effective_filter;
use crate::Result;
use crate::error::OperationError;
use crate::traits::ProjectProvider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEntry {
    pub name: String,
    pub version: Option<Version>,
    /// In-workspace dependencies, in declaration order.
    pub dependencies: Vec<String>,
}

pub struct GraphOperation<P> {
    project_provider: P,
}

impl<P> GraphOperation<P>
where
    P: ProjectProvider,
{
    pub fn new(project_provider: P) -> Self {
        Self { project_provider }
    }

    /// Lists the selected packages, every dependency before its dependents.
    ///
    /// # Errors
    ///
    /// Returns an error if the project cannot be discovered or is empty, or if
    /// the package graph is invalid.
    pub fn execute(&self, start_path: &Path, filter: &FilterPolicy) -> Result<Vec<GraphEntry>> {
        let project = self.project_provider.discover_project(start_path)?;
        if project.packages.is_empty() {
            return Err(OperationError::EmptyProject(project.root));
        }

        let config = self.project_provider.load_config(&project)?;
        let graph = PackageGraph::load(project.packages, &effective_filter(&config, filter))?;

        Ok(graph
            .dependency_order()
            .filter_map(|name| graph.get(name))
            .map(|package| GraphEntry {
                name: package.name.clone(),
                version: package.version.clone(),
                dependencies: graph
                    .dependencies_in_workspace(&package.name)
                    .map(|dep| dep.name.clone())
                    .collect(),
            })
            .collect())
    }
}
