//! Changeset files: YAML front matter mapping package names to bumps,
//! followed by a markdown summary.
//!
//! ```text
//! ---
//! "my-crate": minor
//! "other-crate": { prerelease: beta }
//! ---
//! Add streaming support.
//! ```

mod error;
mod parse;
mod serialize;

pub use error::{FormatError, FrontMatterError, ValidationError};
pub use parse::parse_changeset;
pub use serialize::serialize_changeset;
