//! Cargo workspace discovery.
//!
//! Finds the project root from any directory inside it, reads every member
//! manifest into a [`ripple_core::Package`] and loads the project settings.

mod config;
mod error;
mod manifest;
mod project;

pub use config::{DEFAULT_CHANGELOG, DEFAULT_CHANGESET_DIR, RippleConfig, load_config};
pub use error::ProjectError;
pub use project::{CargoProject, ProjectKind, discover_project};

pub type Result<T> = std::result::Result<T, ProjectError>;
