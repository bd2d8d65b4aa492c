//! Format-preserving reads and writes of `Cargo.toml` files.

mod error;
mod reader;
mod writer;

pub use error::ManifestError;
pub use reader::{read_document, read_version};
pub use writer::{write_version, write_workspace_dependencies};
