use std::path::Path;

use ripple_operations::operations::VersionOperation;
use ripple_operations::providers::{
    FileSystemChangelogWriter, FileSystemManifestWriter, FileSystemProjectProvider,
};
use tracing::debug;

use super::VersionArgs;
use crate::error::{CliError, Result};
use crate::interaction;

pub(crate) fn run(args: VersionArgs, start_path: &Path) -> Result<()> {
    let mut operation = VersionOperation::new(
        FileSystemProjectProvider::new(),
        FileSystemManifestWriter::new(),
        FileSystemChangelogWriter::new(),
    );
    if args.keep_changesets {
        operation = operation.with_keep_changesets(true);
    }

    let formatter = args.format.formatter();
    let output = operation.compute(start_path, &args.filter.policy())?;

    if output.plan.is_empty() || args.dry_run {
        print!("{}", formatter.format_plan(&output.plan)?);
        return Ok(());
    }

    if formatter.shows_plan_before_apply() {
        print!("{}", formatter.format_plan(&output.plan)?);
    }

    if args.yes || !interaction::is_interactive() {
        debug!("writing without confirmation");
    } else if !interaction::confirm_apply(output.plan.len())? {
        return Err(CliError::Cancelled);
    }

    let report = operation.apply(&output);
    print!("{}", formatter.format_applied(&output.plan, &report)?);

    if report.is_success() {
        Ok(())
    } else {
        Err(CliError::ApplyFailed {
            packages: report.failed_packages().map(str::to_string).collect(),
        })
    }
}
