use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rayon::prelude::*;
use ripple_core::DependencyBump;
use tracing::{debug, info, warn};

use crate::error::OperationError;
use crate::traits::{ChangelogWriter, ManifestWriter};
use crate::types::{BumpPlan, PackageUpdate};

/// Target name used for failures of the root `[workspace.dependencies]` write.
pub const WORKSPACE_DEPENDENCIES_TARGET: &str = "[workspace.dependencies]";
/// Target name used for failures while removing consumed changesets.
pub const CHANGESETS_TARGET: &str = "changesets";

#[derive(Debug)]
pub struct ApplyFailure {
    /// Package name, or one of the non-package targets above.
    pub package: String,
    pub error: OperationError,
}

#[derive(Debug, Default)]
pub struct ApplyReport {
    /// Packages written successfully, in plan order.
    pub applied: Vec<String>,
    pub failures: Vec<ApplyFailure>,
    pub workspace_dependencies_updated: bool,
    pub consumed_changesets: Vec<PathBuf>,
}

impl ApplyReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed_packages(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|failure| failure.package.as_str())
    }
}

/// Writes every update of `plan` to disk.
///
/// Packages are written in parallel. Each package writes its changelog first,
/// then its manifest. A failing package does not stop the others; all
/// failures end up in the report. Root `[workspace.dependencies]` are
/// rewritten afterwards.
pub fn apply_plan<M, C>(
    plan: &BumpPlan,
    root_manifest: &Path,
    manifest_writer: &M,
    changelog_writer: &C,
) -> ApplyReport
where
    M: ManifestWriter + ?Sized,
    C: ChangelogWriter + ?Sized,
{
    let updates: Vec<&PackageUpdate> = plan.values().collect();

    let results: Vec<(&str, crate::Result<()>)> = updates
        .par_iter()
        .map(|update| {
            (
                update.name(),
                apply_update(update, manifest_writer, changelog_writer),
            )
        })
        .collect();

    let mut report = ApplyReport::default();
    for (package, result) in results {
        match result {
            Ok(()) => {
                debug!(package, "update written");
                report.applied.push(package.to_string());
            }
            Err(error) => {
                warn!(package, %error, "failed to write update");
                report.failures.push(ApplyFailure {
                    package: package.to_string(),
                    error,
                });
            }
        }
    }

    let bumps = workspace_dependency_bumps(plan, &report.applied);
    if !bumps.is_empty() {
        match manifest_writer.write_workspace_dependencies(root_manifest, &bumps) {
            Ok(updated) => report.workspace_dependencies_updated = updated,
            Err(error) => {
                warn!(%error, "failed to rewrite workspace dependencies");
                report.failures.push(ApplyFailure {
                    package: WORKSPACE_DEPENDENCIES_TARGET.to_string(),
                    error,
                });
            }
        }
    }

    info!(
        applied = report.applied.len(),
        failed = report.failures.len(),
        "apply finished"
    );
    report
}

fn apply_update<M, C>(
    update: &PackageUpdate,
    manifest_writer: &M,
    changelog_writer: &C,
) -> crate::Result<()>
where
    M: ManifestWriter + ?Sized,
    C: ChangelogWriter + ?Sized,
{
    if let Some(patch) = &update.changelog {
        changelog_writer.apply(patch)?;
    }
    manifest_writer.write_version(&update.package, &update.new_version, &update.dependency_changes)
}

/// Dependency changes of the applied updates, first occurrence of each
/// package in plan order.
fn workspace_dependency_bumps(plan: &BumpPlan, applied: &[String]) -> Vec<DependencyBump> {
    let mut bumps: IndexMap<&str, &DependencyBump> = IndexMap::new();
    for update in plan.values().filter(|u| applied.iter().any(|a| a == u.name())) {
        for change in &update.dependency_changes {
            bumps.entry(change.name.as_str()).or_insert(change);
        }
    }
    bumps.into_values().cloned().collect()
}
