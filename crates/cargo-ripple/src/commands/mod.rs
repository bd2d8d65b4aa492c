mod graph;
mod version;

use std::path::Path;

use clap::{Args, Subcommand};
use ripple_graph::FilterPolicy;

use crate::error::Result;
use crate::output::OutputFormat;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Compute version bumps from changesets and write them to the workspace
    Version(VersionArgs),
    /// Print workspace packages in dependency order
    Graph(GraphArgs),
}

impl Commands {
    pub(crate) fn execute(self, start_path: &Path) -> Result<()> {
        match self {
            Self::Version(args) => version::run(args, start_path),
            Self::Graph(args) => graph::run(args, start_path),
        }
    }
}

/// Package selection shared by all commands. Non-empty pattern lists replace
/// the configured ones.
#[derive(Args, Debug, Default)]
pub(crate) struct FilterArgs {
    /// Only consider packages whose name matches this glob (repeatable)
    #[arg(long = "include", value_name = "GLOB")]
    pub include: Vec<String>,

    /// Skip packages whose name matches this glob (repeatable)
    #[arg(long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Skip packages with `publish = false`
    #[arg(long)]
    pub no_private: bool,
}

impl FilterArgs {
    pub(crate) fn policy(&self) -> FilterPolicy {
        FilterPolicy {
            include: self.include.clone(),
            exclude: self.exclude.clone(),
            include_private: !self.no_private,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct VersionArgs {
    /// Print the planned updates without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Write without asking for confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Keep changeset files after a successful update
    #[arg(long)]
    pub keep_changesets: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Args, Debug)]
pub(crate) struct GraphArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub filter: FilterArgs,
}
