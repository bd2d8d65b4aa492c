use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("invalid version requirement '{requirement}'")]
    InvalidRequirement {
        requirement: String,
        #[source]
        source: semver::Error,
    },
}

pub type Result<T> = std::result::Result<T, ReferenceError>;
