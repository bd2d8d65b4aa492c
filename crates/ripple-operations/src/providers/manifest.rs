use std::path::Path;

use ripple_core::{DependencyBump, Package};
use semver::Version;

use crate::Result;
use crate::traits::ManifestWriter;

pub struct FileSystemManifestWriter;

impl FileSystemManifestWriter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemManifestWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestWriter for FileSystemManifestWriter {
    fn write_version(
        &self,
        package: &Package,
        new_version: &Version,
        dependency_changes: &[DependencyBump],
    ) -> Result<()> {
        Ok(ripple_manifest::write_version(
            &package.manifest_path(),
            new_version,
            dependency_changes,
        )?)
    }

    fn write_workspace_dependencies(
        &self,
        root_manifest: &Path,
        bumps: &[DependencyBump],
    ) -> Result<bool> {
        Ok(ripple_manifest::write_workspace_dependencies(
            root_manifest,
            bumps,
        )?)
    }
}
