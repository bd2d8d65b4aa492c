use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::NaiveDate;
use indexmap::IndexMap;
use ripple_changelog::ChangelogPatch;
use ripple_core::{BumpType, Changeset, Package};
use ripple_parse::{parse_changeset, serialize_changeset};
use ripple_version::max_bump_type;
use tracing::{debug, warn};

use crate::Result;
use crate::error::OperationError;
use crate::traits::ChangeDetector;
use crate::types::PackageUpdate;

/// Direct changes recorded as markdown changeset files.
///
/// Files are read once, in file name order. A package's bump is the largest
/// stable bump among its changesets, or the first pre-release bump if there
/// is no stable one.
#[derive(Debug)]
pub struct ChangesetDetector {
    changesets: Vec<(PathBuf, Changeset)>,
    bumps: IndexMap<String, BumpType>,
    summaries: IndexMap<String, Vec<String>>,
    detected: Mutex<HashSet<String>>,
}

impl ChangesetDetector {
    /// Reads every `*.md` file in `dir`. A missing directory means no
    /// changes.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or parsed, or names a
    /// package that is not in `packages`.
    pub fn load(dir: &Path, packages: &[Package]) -> Result<Self> {
        let known: HashSet<&str> = packages.iter().map(|p| p.name.as_str()).collect();
        let mut changesets = Vec::new();

        for path in list_changeset_files(dir)? {
            let content =
                fs::read_to_string(&path).map_err(|source| OperationError::ChangesetFileRead {
                    path: path.clone(),
                    source,
                })?;
            let changeset =
                parse_changeset(&content).map_err(|source| OperationError::ChangesetParse {
                    path: path.clone(),
                    source,
                })?;

            if let Some(unknown) = changeset
                .releases
                .iter()
                .find(|release| !known.contains(release.name.as_str()))
            {
                return Err(OperationError::UnknownPackage {
                    name: unknown.name.clone(),
                    path,
                });
            }

            debug!(path = %path.display(), releases = changeset.releases.len(), "read changeset");
            changesets.push((path, changeset));
        }

        Ok(Self::from_changesets(changesets))
    }

    fn from_changesets(changesets: Vec<(PathBuf, Changeset)>) -> Self {
        let mut requested: IndexMap<String, Vec<BumpType>> = IndexMap::new();
        let mut summaries: IndexMap<String, Vec<String>> = IndexMap::new();

        for (_, changeset) in &changesets {
            let summary = changeset.summary.trim();
            for release in &changeset.releases {
                requested
                    .entry(release.name.clone())
                    .or_default()
                    .push(release.bump_type.clone());
                if !summary.is_empty() {
                    summaries
                        .entry(release.name.clone())
                        .or_default()
                        .push(summary.to_string());
                }
            }
        }

        let bumps = requested
            .into_iter()
            .filter_map(|(name, bumps)| max_bump_type(&bumps).map(|bump| (name, bump)))
            .collect();

        Self {
            changesets,
            bumps,
            summaries,
            detected: Mutex::new(HashSet::new()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changesets.is_empty()
    }

    /// Changeset files read, in file name order.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.changesets.iter().map(|(path, _)| path.as_path())
    }
}

impl ChangeDetector for ChangesetDetector {
    fn try_detect(&self, package: &Package) -> Result<Option<BumpType>> {
        let bump = self.bumps.get(&package.name).cloned();
        if bump.is_some() {
            self.detected
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(package.name.clone());
        }
        Ok(bump)
    }

    fn changelog_patch(&self, update: &PackageUpdate, date: NaiveDate) -> Option<ChangelogPatch> {
        let path = update.package.changelog_path()?;
        let entries = self
            .summaries
            .get(update.name())
            .cloned()
            .unwrap_or_default();

        Some(
            ChangelogPatch::new(update.name(), path, update.new_version.clone(), date)
                .with_entries(entries)
                .with_dependency_changes(&update.dependency_changes),
        )
    }

    /// Drops the releases of detected packages from their changeset files.
    /// A file left without releases is removed; one that still names other
    /// packages is rewritten with those. Returns the removed files.
    fn consume(&self) -> Result<Vec<PathBuf>> {
        let detected = self
            .detected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut removed = Vec::new();
        for (path, changeset) in &self.changesets {
            let (released, remaining): (Vec<_>, Vec<_>) = changeset
                .releases
                .iter()
                .cloned()
                .partition(|release| detected.contains(&release.name));

            if released.is_empty() {
                continue;
            }

            if remaining.is_empty() {
                fs::remove_file(path).map_err(|source| OperationError::ChangesetRemove {
                    path: path.clone(),
                    source,
                })?;
                debug!(path = %path.display(), "removed changeset");
                removed.push(path.clone());
                continue;
            }

            let rest = Changeset {
                summary: changeset.summary.clone(),
                releases: remaining,
            };
            let content =
                serialize_changeset(&rest).map_err(|source| OperationError::ChangesetSerialize {
                    path: path.clone(),
                    source,
                })?;
            fs::write(path, content).map_err(|source| OperationError::ChangesetWrite {
                path: path.clone(),
                source,
            })?;
            warn!(
                path = %path.display(),
                remaining = rest.releases.len(),
                "kept changeset for packages outside this run"
            );
        }
        Ok(removed)
    }
}

fn list_changeset_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(OperationError::ChangesetList {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| OperationError::ChangesetList {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
