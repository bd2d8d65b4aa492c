use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use ripple_core::DependencyBump;
use semver::Version;

use crate::error::ChangelogError;
use crate::format::{format_dependency_bullets, format_entries, format_version_header};

/// A pending prepend of a new version section to one package's changelog.
///
/// Building a patch performs no I/O; [`ChangelogPatch::apply`] does. Applying
/// the same patch twice prepends the section twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogPatch {
    package: String,
    path: PathBuf,
    version: Version,
    date: NaiveDate,
    entries: Vec<String>,
    dependency_changes: Vec<DependencyBump>,
}

impl ChangelogPatch {
    #[must_use]
    pub fn new(
        package: impl Into<String>,
        path: impl Into<PathBuf>,
        version: Version,
        date: NaiveDate,
    ) -> Self {
        Self {
            package: package.into(),
            path: path.into(),
            version,
            date,
            entries: Vec::new(),
            dependency_changes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_entries(mut self, entries: Vec<String>) -> Self {
        self.entries = entries;
        self
    }

    #[must_use]
    pub fn with_dependency_changes(mut self, changes: &[DependencyBump]) -> Self {
        self.dependency_changes = changes.to_vec();
        self
    }

    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn version(&self) -> &Version {
        &self.version
    }

    #[must_use]
    pub fn dependency_changes(&self) -> &[DependencyBump] {
        &self.dependency_changes
    }

    /// The new section: version header followed by the bullet list.
    #[must_use]
    pub fn section(&self) -> String {
        let bullets: Vec<String> = [
            format_entries(&self.entries),
            format_dependency_bullets(&self.dependency_changes),
        ]
        .into_iter()
        .filter(|block| !block.is_empty())
        .collect();

        format!(
            "{}\n\n{}",
            format_version_header(&self.version, self.date),
            bullets.join("\n")
        )
    }

    /// `existing` with the new section prepended, left otherwise untouched.
    #[must_use]
    pub fn render(&self, existing: &str) -> String {
        format!("{}\n\n{existing}", self.section())
    }

    /// Reads the changelog, prepends the new section and writes it back.
    ///
    /// # Errors
    ///
    /// Returns `ChangelogError::Read` or `ChangelogError::Write`, tagged with
    /// the package name, if the file cannot be read or written.
    pub fn apply(&self) -> Result<(), ChangelogError> {
        let existing =
            std::fs::read_to_string(&self.path).map_err(|source| ChangelogError::Read {
                package: self.package.clone(),
                path: self.path.clone(),
                source,
            })?;

        std::fs::write(&self.path, self.render(&existing)).map_err(|source| {
            ChangelogError::Write {
                package: self.package.clone(),
                path: self.path.clone(),
                source,
            }
        })
    }
}
