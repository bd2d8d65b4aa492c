use std::path::Path;

use ripple_operations::operations::GraphOperation;
use ripple_operations::providers::FileSystemProjectProvider;

use super::GraphArgs;
use crate::error::Result;

pub(crate) fn run(args: GraphArgs, start_path: &Path) -> Result<()> {
    let operation = GraphOperation::new(FileSystemProjectProvider::new());
    let entries = operation.execute(start_path, &args.filter.policy())?;

    print!("{}", args.format.formatter().format_graph(&entries)?);
    Ok(())
}
