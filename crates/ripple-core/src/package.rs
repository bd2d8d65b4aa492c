use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use semver::Version;

use crate::reference::DependencyReference;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    /// `None` for packages without a declared version. Those are never bumped.
    pub version: Option<Version>,
    /// Directory containing the package manifest.
    pub path: PathBuf,
    /// Every reference per dependency, in declaration order. Build and
    /// target-specific tables are folded in, so one name can carry several.
    pub dependencies: IndexMap<String, Vec<DependencyReference>>,
    pub dev_dependencies: IndexMap<String, Vec<DependencyReference>>,
    /// Set only when the changelog file exists.
    pub changelog: Option<PathBuf>,
    pub publish: bool,
}

impl Package {
    #[must_use]
    pub fn new(name: impl Into<String>, version: Option<Version>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            version,
            path: path.into(),
            dependencies: IndexMap::new(),
            dev_dependencies: IndexMap::new(),
            changelog: None,
            publish: true,
        }
    }

    #[must_use]
    pub fn with_dependency(mut self, name: impl Into<String>, reference: DependencyReference) -> Self {
        self.dependencies.entry(name.into()).or_default().push(reference);
        self
    }

    #[must_use]
    pub fn with_dev_dependency(
        mut self,
        name: impl Into<String>,
        reference: DependencyReference,
    ) -> Self {
        self.dev_dependencies
            .entry(name.into())
            .or_default()
            .push(reference);
        self
    }

    #[must_use]
    pub fn with_changelog(mut self, path: impl Into<PathBuf>) -> Self {
        self.changelog = Some(path.into());
        self
    }

    #[must_use]
    pub fn unpublished(mut self) -> Self {
        self.publish = false;
        self
    }

    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.path.join("Cargo.toml")
    }

    #[must_use]
    pub fn changelog_path(&self) -> Option<&Path> {
        self.changelog.as_deref()
    }

    /// Dependency names in declaration order: regular dependencies first, then
    /// dev-dependencies that were not already listed.
    pub fn dependency_names(&self) -> impl Iterator<Item = &str> {
        self.dependencies.keys().map(String::as_str).chain(
            self.dev_dependencies
                .keys()
                .filter(|name| !self.dependencies.contains_key(*name))
                .map(String::as_str),
        )
    }

    pub fn references_to<'a>(
        &'a self,
        dependency: &'a str,
    ) -> impl Iterator<Item = &'a DependencyReference> + 'a {
        self.dependencies
            .get(dependency)
            .into_iter()
            .chain(self.dev_dependencies.get(dependency))
            .flatten()
    }

    /// Whether every declared reference to `dependency` accepts `version`.
    #[must_use]
    pub fn allows(&self, dependency: &str, version: &Version) -> bool {
        self.references_to(dependency).all(|r| r.allows(version))
    }

    #[must_use]
    pub fn is_locked_to(&self, dependency: &str) -> bool {
        self.references_to(dependency).any(DependencyReference::is_locked)
    }
}
