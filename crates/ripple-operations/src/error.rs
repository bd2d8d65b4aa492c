use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Project(#[from] ripple_project::ProjectError),

    #[error(transparent)]
    Graph(#[from] ripple_graph::GraphError),

    #[error(transparent)]
    Manifest(#[from] ripple_manifest::ManifestError),

    #[error(transparent)]
    Changelog(#[from] ripple_changelog::ChangelogError),

    #[error("failed to compute the new version of '{package}'")]
    VersionCalculation {
        package: String,
        #[source]
        source: ripple_version::VersionError,
    },

    #[error("failed to read changeset file '{path}'")]
    ChangesetFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse changeset file '{path}'")]
    ChangesetParse {
        path: PathBuf,
        #[source]
        source: ripple_parse::FormatError,
    },

    #[error("failed to list changeset files in '{path}'")]
    ChangesetList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to rewrite changeset file '{path}'")]
    ChangesetWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render remaining releases of changeset '{path}'")]
    ChangesetSerialize {
        path: PathBuf,
        #[source]
        source: ripple_parse::FormatError,
    },

    #[error("failed to remove changeset file '{path}'")]
    ChangesetRemove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("changeset '{path}' names unknown package '{name}'")]
    UnknownPackage { name: String, path: PathBuf },

    #[error("no packages found in project at '{0}'")]
    EmptyProject(PathBuf),

    #[error("IO error")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OperationError>;
