//! In-memory graph of the workspace packages selected for a run.
//!
//! Only dependencies between selected packages become edges; everything else
//! is invisible to the graph. The dependency relation must be acyclic, and
//! traversal always visits a package after all of its dependencies.

mod error;
mod filter;
mod graph;

pub use error::GraphError;
pub use filter::FilterPolicy;
pub use graph::PackageGraph;

pub type Result<T> = std::result::Result<T, GraphError>;
