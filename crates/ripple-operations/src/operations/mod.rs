mod apply;
mod filter;
mod graph;
mod propagation;
mod version;

pub use apply::{
    ApplyFailure, ApplyReport, CHANGESETS_TARGET, WORKSPACE_DEPENDENCIES_TARGET, apply_plan,
};
pub use filter::effective_filter;
pub use graph::{GraphEntry, GraphOperation};
pub use propagation::compute_bumps;
pub use version::{ComputeOutput, VersionOperation};
