use ripple_operations::operations::{ApplyReport, GraphEntry};
use ripple_operations::{BumpPlan, PackageUpdate};
use serde::Serialize;

use super::{ReportFormatter, error_chain};
use crate::error::Result;

pub(crate) struct JsonFormatter;

#[derive(Serialize)]
struct DependencyJson<'a> {
    name: &'a str,
    new_version: String,
}

#[derive(Serialize)]
struct UpdateJson<'a> {
    name: &'a str,
    current_version: String,
    new_version: String,
    bump: String,
    origin: String,
    dependency_changes: Vec<DependencyJson<'a>>,
}

impl<'a> From<&'a PackageUpdate> for UpdateJson<'a> {
    fn from(update: &'a PackageUpdate) -> Self {
        Self {
            name: update.name(),
            current_version: update.current_version.to_string(),
            new_version: update.new_version.to_string(),
            bump: update.bump_type.to_string(),
            origin: update.origin.to_string(),
            dependency_changes: update
                .dependency_changes
                .iter()
                .map(|change| DependencyJson {
                    name: &change.name,
                    new_version: change.new_version.to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct PlanJson<'a> {
    updates: Vec<UpdateJson<'a>>,
}

#[derive(Serialize)]
struct FailureJson<'a> {
    target: &'a str,
    error: String,
}

#[derive(Serialize)]
struct AppliedJson<'a> {
    updates: Vec<UpdateJson<'a>>,
    applied: &'a [String],
    failures: Vec<FailureJson<'a>>,
    workspace_dependencies_updated: bool,
    consumed_changesets: Vec<String>,
}

#[derive(Serialize)]
struct GraphEntryJson<'a> {
    name: &'a str,
    version: Option<String>,
    dependencies: &'a [String],
}

fn updates(plan: &BumpPlan) -> Vec<UpdateJson<'_>> {
    plan.values().map(UpdateJson::from).collect()
}

impl ReportFormatter for JsonFormatter {
    fn format_plan(&self, plan: &BumpPlan) -> Result<String> {
        Ok(serde_json::to_string_pretty(&PlanJson {
            updates: updates(plan),
        })? + "\n")
    }

    fn shows_plan_before_apply(&self) -> bool {
        false
    }

    fn format_applied(&self, plan: &BumpPlan, report: &ApplyReport) -> Result<String> {
        let document = AppliedJson {
            updates: updates(plan),
            applied: &report.applied,
            failures: report
                .failures
                .iter()
                .map(|failure| FailureJson {
                    target: &failure.package,
                    error: error_chain(&failure.error),
                })
                .collect(),
            workspace_dependencies_updated: report.workspace_dependencies_updated,
            consumed_changesets: report
                .consumed_changesets
                .iter()
                .map(|path| path.display().to_string())
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&document)? + "\n")
    }

    fn format_graph(&self, entries: &[GraphEntry]) -> Result<String> {
        let document: Vec<GraphEntryJson<'_>> = entries
            .iter()
            .map(|entry| GraphEntryJson {
                name: &entry.name,
                version: entry.version.as_ref().map(ToString::to_string),
                dependencies: &entry.dependencies,
            })
            .collect();
        Ok(serde_json::to_string_pretty(&document)? + "\n")
    }
}
