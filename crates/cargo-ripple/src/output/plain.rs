use ripple_changelog::format_dependency_bullets;
use ripple_operations::BumpPlan;
use ripple_operations::operations::{ApplyReport, GraphEntry};

use super::{ReportFormatter, error_chain};
use crate::error::Result;

pub(crate) const NO_UPDATES: &str = "No packages have been updated.";

pub(crate) struct PlainTextFormatter;

impl PlainTextFormatter {
    fn format_failures(output: &mut String, report: &ApplyReport) {
        if report.failures.is_empty() {
            return;
        }

        output.push_str("\nFailed to update:\n");
        for failure in &report.failures {
            output.push_str(&format!(
                "  {}: {}\n",
                failure.package,
                error_chain(&failure.error)
            ));
        }
    }
}

impl ReportFormatter for PlainTextFormatter {
    fn format_plan(&self, plan: &BumpPlan) -> Result<String> {
        if plan.is_empty() {
            return Ok(format!("{NO_UPDATES}\n"));
        }

        let mut output = String::new();
        for update in plan.values() {
            output.push_str(&format!(
                "{}: {} -> {} ({})\n",
                update.name(),
                update.current_version,
                update.new_version,
                update.bump_type
            ));
            let bullets = format_dependency_bullets(&update.dependency_changes);
            for line in bullets.lines() {
                output.push_str(&format!("  {line}\n"));
            }
        }
        Ok(output)
    }

    fn shows_plan_before_apply(&self) -> bool {
        true
    }

    fn format_applied(&self, _plan: &BumpPlan, report: &ApplyReport) -> Result<String> {
        let mut output = format!("\nUpdated {} package(s).\n", report.applied.len());

        if report.workspace_dependencies_updated {
            output.push_str("Updated [workspace.dependencies] in the root manifest.\n");
        }
        if !report.consumed_changesets.is_empty() {
            output.push_str(&format!(
                "Removed {} changeset(s).\n",
                report.consumed_changesets.len()
            ));
        }
        Self::format_failures(&mut output, report);

        Ok(output)
    }

    fn format_graph(&self, entries: &[GraphEntry]) -> Result<String> {
        let mut output = String::new();
        for entry in entries {
            match &entry.version {
                Some(version) => output.push_str(&format!("{} {version}\n", entry.name)),
                None => output.push_str(&format!("{} (unversioned)\n", entry.name)),
            }
            for dependency in &entry.dependencies {
                output.push_str(&format!("  -> {dependency}\n"));
            }
        }
        Ok(output)
    }
}
