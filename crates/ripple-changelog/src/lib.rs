mod error;
mod format;
mod patch;

pub use error::ChangelogError;
pub use format::{format_dependency_bullets, format_entries, format_version_header};
pub use patch::ChangelogPatch;

pub type Result<T> = std::result::Result<T, ChangelogError>;
