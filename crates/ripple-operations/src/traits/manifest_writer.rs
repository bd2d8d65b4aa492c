use std::path::Path;

use ripple_core::{DependencyBump, Package};
use semver::Version;

use crate::Result;

pub trait ManifestWriter: Send + Sync {
    /// Writes `new_version` to the package manifest and rewrites its
    /// requirements on the dependencies in `dependency_changes`.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or written.
    fn write_version(
        &self,
        package: &Package,
        new_version: &Version,
        dependency_changes: &[DependencyBump],
    ) -> Result<()>;

    /// Rewrites matching `[workspace.dependencies]` requirements in the root
    /// manifest. Returns whether anything changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or written.
    fn write_workspace_dependencies(
        &self,
        root_manifest: &Path,
        bumps: &[DependencyBump],
    ) -> Result<bool>;
}
