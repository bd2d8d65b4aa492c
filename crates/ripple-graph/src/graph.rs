use std::collections::{BTreeSet, HashSet};

use indexmap::IndexMap;
use ripple_core::Package;
use tracing::debug;

use crate::error::GraphError;
use crate::filter::FilterPolicy;

#[derive(Debug, Clone)]
pub struct PackageGraph {
    /// Selected packages in declaration order.
    packages: IndexMap<String, Package>,
    /// Per package index, the indices of its in-workspace dependencies.
    edges: Vec<Vec<usize>>,
    /// Package indices, dependencies before dependents.
    order: Vec<usize>,
}

impl PackageGraph {
    /// Builds the graph of the packages selected by `policy`.
    ///
    /// Declaration order of `packages` is the tie-break for the traversal
    /// order, so the same input always yields the same order.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::DuplicatePackage` if two packages share a name,
    /// `GraphError::DependencyCycle` if the selected packages depend on each
    /// other in a cycle, and `GraphError::GlobPattern` for an invalid pattern.
    pub fn load(
        packages: impl IntoIterator<Item = Package>,
        policy: &FilterPolicy,
    ) -> Result<Self, GraphError> {
        let filter = policy.compile()?;

        let mut seen = HashSet::new();
        let mut members = IndexMap::new();
        for package in packages {
            if !seen.insert(package.name.clone()) {
                return Err(GraphError::DuplicatePackage { name: package.name });
            }
            if filter.accepts(&package) {
                members.insert(package.name.clone(), package);
            } else {
                debug!(package = %package.name, "package excluded by filter");
            }
        }

        let edges: Vec<Vec<usize>> = members
            .values()
            .map(|package| {
                package
                    .dependency_names()
                    .filter_map(|name| members.get_index_of(name))
                    .collect()
            })
            .collect();

        let order = topological_order(&members, &edges)?;

        Ok(Self {
            packages: members,
            edges,
            order,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    /// Packages in declaration order.
    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    /// Dependencies of `name` that are part of the graph, regular dependencies
    /// first, in declaration order. Empty for unknown packages.
    pub fn dependencies_in_workspace(&self, name: &str) -> impl Iterator<Item = &Package> {
        self.packages
            .get_index_of(name)
            .map(|index| self.edges[index].as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|&dep| self.packages.get_index(dep).map(|(_, package)| package))
    }

    /// Packages of the graph that depend on `name`, in declaration order.
    pub fn dependents_of(&self, name: &str) -> impl Iterator<Item = &Package> {
        let target = self.packages.get_index_of(name);
        self.packages
            .values()
            .zip(&self.edges)
            .filter(move |(_, deps)| target.is_some_and(|t| deps.contains(&t)))
            .map(|(package, _)| package)
    }

    /// Package names, every dependency before its dependents.
    pub fn dependency_order(&self) -> impl Iterator<Item = &str> {
        self.order
            .iter()
            .filter_map(|&index| self.packages.get_index(index).map(|(name, _)| name.as_str()))
    }

    /// Calls `visitor` once per package, after all of that package's
    /// dependencies have been visited. Stops at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `visitor`.
    pub fn visit_in_dependency_order<E, F>(&self, mut visitor: F) -> Result<(), E>
    where
        F: FnMut(&Package) -> Result<(), E>,
    {
        for &index in &self.order {
            if let Some((_, package)) = self.packages.get_index(index) {
                visitor(package)?;
            }
        }
        Ok(())
    }
}

/// Kahn's algorithm with the lowest ready index picked first.
fn topological_order(
    members: &IndexMap<String, Package>,
    edges: &[Vec<usize>],
) -> Result<Vec<usize>, GraphError> {
    let mut remaining: Vec<usize> = edges.iter().map(Vec::len).collect();
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); edges.len()];
    for (index, deps) in edges.iter().enumerate() {
        for &dep in deps {
            dependents[dep].push(index);
        }
    }

    let mut ready: BTreeSet<usize> = remaining
        .iter()
        .enumerate()
        .filter(|(_, count)| **count == 0)
        .map(|(index, _)| index)
        .collect();

    let mut order = Vec::with_capacity(edges.len());
    while let Some(index) = ready.pop_first() {
        order.push(index);
        for &dependent in &dependents[index] {
            remaining[dependent] -= 1;
            if remaining[dependent] == 0 {
                ready.insert(dependent);
            }
        }
    }

    if order.len() < edges.len() {
        let packages = remaining
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .filter_map(|(index, _)| members.get_index(index).map(|(name, _)| name.clone()))
            .collect();
        return Err(GraphError::DependencyCycle { packages });
    }

    Ok(order)
}
