use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use ripple_changelog::ChangelogPatch;
use ripple_core::{BumpType, DependencyBump, Package};
use ripple_project::{CargoProject, ProjectKind, RippleConfig};
use semver::Version;

use crate::Result;
use crate::error::OperationError;
use crate::traits::{ChangeDetector, ChangelogWriter, ManifestWriter, ProjectProvider};
use crate::types::PackageUpdate;

fn mock_failure(what: &str) -> OperationError {
    OperationError::Io(std::io::Error::other(format!("mock failure: {what}")))
}

pub struct MockProjectProvider {
    project: CargoProject,
    config: RippleConfig,
    detector: MockChangeDetector,
}

impl MockProjectProvider {
    #[must_use]
    pub fn new(project: CargoProject) -> Self {
        Self {
            project,
            config: RippleConfig::default(),
            detector: MockChangeDetector::new(),
        }
    }

    #[must_use]
    pub fn workspace(packages: Vec<Package>) -> Self {
        Self::new(CargoProject {
            root: PathBuf::from("/mock/workspace"),
            kind: ProjectKind::VirtualWorkspace,
            packages,
        })
    }

    #[must_use]
    pub fn with_config(mut self, config: RippleConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_detector(mut self, detector: MockChangeDetector) -> Self {
        self.detector = detector;
        self
    }
}

impl ProjectProvider for MockProjectProvider {
    type Detector = MockChangeDetector;

    fn discover_project(&self, _start_path: &Path) -> Result<CargoProject> {
        Ok(self.project.clone())
    }

    fn load_config(&self, _project: &CargoProject) -> Result<RippleConfig> {
        Ok(self.config.clone())
    }

    fn change_detector(
        &self,
        _project: &CargoProject,
        _config: &RippleConfig,
    ) -> Result<Self::Detector> {
        Ok(self.detector.clone())
    }
}

#[derive(Clone, Default)]
pub struct MockChangeDetector {
    bumps: HashMap<String, BumpType>,
    summaries: HashMap<String, String>,
    asked: Arc<Mutex<Vec<String>>>,
    consumed: Arc<Mutex<bool>>,
}

impl MockChangeDetector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_bump(mut self, package: &str, bump_type: BumpType) -> Self {
        self.bumps.insert(package.to_string(), bump_type);
        self
    }

    #[must_use]
    pub fn with_summary(mut self, package: &str, summary: &str) -> Self {
        self.summaries
            .insert(package.to_string(), summary.to_string());
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn was_consumed(&self) -> bool {
        *self.consumed.lock().expect("lock poisoned")
    }
}

impl ChangeDetector for MockChangeDetector {
    fn try_detect(&self, package: &Package) -> Result<Option<BumpType>> {
        self.asked
            .lock()
            .expect("lock poisoned")
            .push(package.name.clone());
        Ok(self.bumps.get(&package.name).cloned())
    }

    fn changelog_patch(&self, update: &PackageUpdate, date: NaiveDate) -> Option<ChangelogPatch> {
        let path = update.package.changelog_path()?;
        let entries = self
            .summaries
            .get(update.name())
            .map(|summary| vec![summary.clone()])
            .unwrap_or_default();
        Some(
            ChangelogPatch::new(update.name(), path, update.new_version.clone(), date)
                .with_entries(entries)
                .with_dependency_changes(&update.dependency_changes),
        )
    }

    fn consume(&self) -> Result<Vec<PathBuf>> {
        *self.consumed.lock().expect("lock poisoned") = true;
        Ok(self
            .bumps
            .keys()
            .map(|name| PathBuf::from(format!(".changeset/{name}.md")))
            .collect())
    }
}

#[derive(Default)]
pub struct MockManifestWriter {
    written_versions: Mutex<Vec<(String, Version, Vec<DependencyBump>)>>,
    workspace_writes: Mutex<Vec<(PathBuf, Vec<DependencyBump>)>>,
    failing: HashSet<String>,
}

impl MockManifestWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failing_for(mut self, package: &str) -> Self {
        self.failing.insert(package.to_string());
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn written_versions(&self) -> Vec<(String, Version, Vec<DependencyBump>)> {
        self.written_versions.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn workspace_writes(&self) -> Vec<(PathBuf, Vec<DependencyBump>)> {
        self.workspace_writes.lock().expect("lock poisoned").clone()
    }
}

impl ManifestWriter for MockManifestWriter {
    fn write_version(
        &self,
        package: &Package,
        new_version: &Version,
        dependency_changes: &[DependencyBump],
    ) -> Result<()> {
        if self.failing.contains(&package.name) {
            return Err(mock_failure(&package.name));
        }
        self.written_versions.lock().expect("lock poisoned").push((
            package.name.clone(),
            new_version.clone(),
            dependency_changes.to_vec(),
        ));
        Ok(())
    }

    fn write_workspace_dependencies(
        &self,
        root_manifest: &Path,
        bumps: &[DependencyBump],
    ) -> Result<bool> {
        self.workspace_writes
            .lock()
            .expect("lock poisoned")
            .push((root_manifest.to_path_buf(), bumps.to_vec()));
        Ok(!bumps.is_empty())
    }
}

#[derive(Default)]
pub struct MockChangelogWriter {
    applied: Mutex<Vec<ChangelogPatch>>,
    failing: HashSet<String>,
}

impl MockChangelogWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failing_for(mut self, package: &str) -> Self {
        self.failing.insert(package.to_string());
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn applied(&self) -> Vec<ChangelogPatch> {
        self.applied.lock().expect("lock poisoned").clone()
    }
}

impl ChangelogWriter for MockChangelogWriter {
    fn apply(&self, patch: &ChangelogPatch) -> Result<()> {
        if self.failing.contains(patch.package()) {
            return Err(mock_failure(patch.package()));
        }
        self.applied
            .lock()
            .expect("lock poisoned")
            .push(patch.clone());
        Ok(())
    }
}

/// Builders for engine and apply tests.
pub mod fixtures {
    use ripple_core::{DependencyReference, Package};
    use semver::Version;

    /// # Panics
    ///
    /// Panics if `version` is not valid semver.
    #[must_use]
    pub fn package(name: &str, version: &str) -> Package {
        Package::new(
            name,
            Some(version.parse().expect("valid version")),
            format!("/mock/workspace/crates/{name}"),
        )
    }

    #[must_use]
    pub fn unversioned(name: &str) -> Package {
        Package::new(name, None::<Version>, format!("/mock/workspace/crates/{name}"))
    }

    /// # Panics
    ///
    /// Panics if `requirement` is not a valid requirement.
    #[must_use]
    pub fn req(requirement: &str) -> DependencyReference {
        DependencyReference::from_requirement(requirement).expect("valid requirement")
    }
}
