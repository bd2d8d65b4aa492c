pub mod error;
mod package;
mod reference;
pub mod types;

pub use error::*;
pub use package::Package;
pub use reference::DependencyReference;
pub use types::*;
