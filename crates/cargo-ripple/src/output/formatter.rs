use ripple_operations::BumpPlan;
use ripple_operations::operations::{ApplyReport, GraphEntry};

use crate::error::Result;

pub(crate) trait ReportFormatter {
    /// The planned updates, shown before anything is written.
    fn format_plan(&self, plan: &BumpPlan) -> Result<String>;

    /// Whether the plan is shown ahead of the confirmation prompt.
    fn shows_plan_before_apply(&self) -> bool;

    fn format_applied(&self, plan: &BumpPlan, report: &ApplyReport) -> Result<String>;

    fn format_graph(&self, entries: &[GraphEntry]) -> Result<String>;
}
