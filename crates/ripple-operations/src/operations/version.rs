use std::path::Path;

use chrono::NaiveDate;
use ripple_graph::{FilterPolicy, PackageGraph};
use ripple_project::{CargoProject, RippleConfig};
use tracing::{debug, info, warn};

use super::apply::{ApplyFailure, ApplyReport, CHANGESETS_TARGET, apply_plan};
use super::filter::effective_filter;
use super::propagation::compute_bumps;
use crate::Result;
use crate::error::OperationError;
use crate::traits::{ChangeDetector, ChangelogWriter, ManifestWriter, ProjectProvider};
use crate::types::BumpPlan;

/// A computed plan together with what is needed to apply it.
pub struct ComputeOutput<D> {
    pub project: CargoProject,
    pub config: RippleConfig,
    pub plan: BumpPlan,
    pub detector: D,
}

pub struct VersionOperation<P, M, C> {
    project_provider: P,
    manifest_writer: M,
    changelog_writer: C,
    date: NaiveDate,
    keep_changesets: Option<bool>,
}

impl<P, M, C> VersionOperation<P, M, C>
where
    P: ProjectProvider,
    M: ManifestWriter,
    C: ChangelogWriter,
{
    /// Changelog sections are dated today.
    pub fn new(project_provider: P, manifest_writer: M, changelog_writer: C) -> Self {
        Self {
            project_provider,
            manifest_writer,
            changelog_writer,
            date: chrono::Local::now().date_naive(),
            keep_changesets: None,
        }
    }

    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Overrides the configured `keep-changesets` setting.
    #[must_use]
    pub fn with_keep_changesets(mut self, keep: bool) -> Self {
        self.keep_changesets = Some(keep);
        self
    }

    /// Discovers the project at `start_path` and computes its bump plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the project cannot be discovered or is empty, if
    /// the package graph is invalid, or if changes cannot be detected.
    pub fn compute(
        &self,
        start_path: &Path,
        filter: &FilterPolicy,
    ) -> Result<ComputeOutput<P::Detector>> {
        let project = self.project_provider.discover_project(start_path)?;
        if project.packages.is_empty() {
            return Err(OperationError::EmptyProject(project.root));
        }

        let config = self.project_provider.load_config(&project)?;
        let filter = effective_filter(&config, filter);
        debug!(?filter, "package selection");

        let graph = PackageGraph::load(project.packages.iter().cloned(), &filter)?;
        let detector = self.project_provider.change_detector(&project, &config)?;
        let plan = compute_bumps(&graph, &detector, self.date)?;

        info!(
            packages = graph.len(),
            updates = plan.len(),
            "computed bump plan"
        );

        Ok(ComputeOutput {
            project,
            config,
            plan,
            detector,
        })
    }

    /// Writes the plan of `output` and, after a fully successful write,
    /// consumes the detected changes unless they are kept.
    pub fn apply(&self, output: &ComputeOutput<P::Detector>) -> ApplyReport {
        let mut report = apply_plan(
            &output.plan,
            &output.project.root_manifest_path(),
            &self.manifest_writer,
            &self.changelog_writer,
        );

        let keep = self
            .keep_changesets
            .unwrap_or_else(|| output.config.keep_changesets());

        if output.plan.is_empty() || keep {
            return report;
        }
        if !report.is_success() {
            warn!("not consuming changesets after failed writes");
            return report;
        }

        match output.detector.consume() {
            Ok(consumed) => report.consumed_changesets = consumed,
            Err(error) => report.failures.push(ApplyFailure {
                package: CHANGESETS_TARGET.to_string(),
                error,
            }),
        }
        report
    }
}
