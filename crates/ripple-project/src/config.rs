use std::path::{Path, PathBuf};

use crate::error::ProjectError;
use crate::manifest::{CargoManifest, RippleMetadata, read_manifest};
use crate::project::{CargoProject, ProjectKind};

pub const DEFAULT_CHANGESET_DIR: &str = ".changeset";
pub const DEFAULT_CHANGELOG: &str = "CHANGELOG.md";

/// Project-wide settings from `[workspace.metadata.ripple]`, or from
/// `[package.metadata.ripple]` in a single-package project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RippleConfig {
    changeset_dir: PathBuf,
    changelog: String,
    include: Vec<String>,
    exclude: Vec<String>,
    include_private: bool,
    keep_changesets: bool,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            changeset_dir: PathBuf::from(DEFAULT_CHANGESET_DIR),
            changelog: DEFAULT_CHANGELOG.to_string(),
            include: Vec::new(),
            exclude: Vec::new(),
            include_private: true,
            keep_changesets: false,
        }
    }
}

impl RippleConfig {
    /// Changeset directory, relative to the project root.
    #[must_use]
    pub fn changeset_dir(&self) -> &Path {
        &self.changeset_dir
    }

    /// File name of the changelog looked up in every package directory.
    #[must_use]
    pub fn changelog(&self) -> &str {
        &self.changelog
    }

    #[must_use]
    pub fn include(&self) -> &[String] {
        &self.include
    }

    #[must_use]
    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    #[must_use]
    pub fn include_private(&self) -> bool {
        self.include_private
    }

    #[must_use]
    pub fn keep_changesets(&self) -> bool {
        self.keep_changesets
    }

    #[must_use]
    pub fn with_keep_changesets(mut self, keep: bool) -> Self {
        self.keep_changesets = keep;
        self
    }

    #[must_use]
    pub fn with_include(mut self, pattern: impl Into<String>) -> Self {
        self.include.push(pattern.into());
        self
    }

    #[must_use]
    pub fn with_exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.push(pattern.into());
        self
    }

    #[must_use]
    pub fn with_include_private(mut self, include_private: bool) -> Self {
        self.include_private = include_private;
        self
    }

    pub(crate) fn from_metadata(metadata: Option<RippleMetadata>) -> Self {
        let defaults = Self::default();
        let Some(meta) = metadata else {
            return defaults;
        };

        Self {
            changeset_dir: meta
                .changeset_dir
                .map_or(defaults.changeset_dir, PathBuf::from),
            changelog: meta.changelog.unwrap_or(defaults.changelog),
            include: meta.include,
            exclude: meta.exclude,
            include_private: meta.include_private.unwrap_or(defaults.include_private),
            keep_changesets: meta.keep_changesets.unwrap_or(defaults.keep_changesets),
        }
    }
}

pub(crate) fn config_from_manifest(manifest: &CargoManifest, kind: &ProjectKind) -> RippleConfig {
    let metadata = match kind {
        ProjectKind::SinglePackage => manifest.package.as_ref().and_then(|p| p.metadata.as_ref()),
        ProjectKind::VirtualWorkspace | ProjectKind::WorkspaceWithRoot => {
            manifest.workspace.as_ref().and_then(|w| w.metadata.as_ref())
        }
    };

    RippleConfig::from_metadata(metadata.and_then(|m| m.ripple.clone()))
}

/// Reads the configuration of a discovered project from its root manifest.
///
/// # Errors
///
/// Returns an error if the root manifest cannot be read or parsed.
pub fn load_config(project: &CargoProject) -> Result<RippleConfig, ProjectError> {
    let manifest = read_manifest(&project.root_manifest_path())?;
    Ok(config_from_manifest(&manifest, &project.kind))
}
