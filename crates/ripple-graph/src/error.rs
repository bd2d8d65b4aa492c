use thiserror::Error;

/// Configuration errors that abort a run before any bump is computed.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("package '{name}' is defined more than once in the workspace")]
    DuplicatePackage { name: String },

    #[error("dependency cycle detected among: {}", packages.join(", "))]
    DependencyCycle { packages: Vec<String> },

    #[error("invalid package filter pattern '{pattern}'")]
    GlobPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}
