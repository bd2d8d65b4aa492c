use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChangelogError {
    #[error("failed to read changelog of '{package}' at '{path}'")]
    Read {
        package: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write changelog of '{package}' at '{path}'")]
    Write {
        package: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ChangelogError {
    #[must_use]
    pub fn package(&self) -> &str {
        match self {
            Self::Read { package, .. } | Self::Write { package, .. } => package,
        }
    }
}
