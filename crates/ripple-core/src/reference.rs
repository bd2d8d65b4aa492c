use semver::{Op, Version, VersionReq};

use crate::error::ReferenceError;

/// How a dependent declares its dependency on another package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyReference {
    /// Any version is acceptable, e.g. a path-only dependency.
    Unconstrained,
    Ranged(VersionReq),
    /// Pinned to exactly one version (`=1.2.3`).
    Locked(Version),
}

impl DependencyReference {
    /// Classifies a Cargo version requirement string.
    ///
    /// A requirement made of a single `=MAJOR.MINOR.PATCH` comparator is locked;
    /// everything else is ranged.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::InvalidRequirement` if the requirement does not parse.
    pub fn from_requirement(requirement: &str) -> Result<Self, ReferenceError> {
        let req = VersionReq::parse(requirement).map_err(|source| {
            ReferenceError::InvalidRequirement {
                requirement: requirement.to_string(),
                source,
            }
        })?;

        if let [comparator] = req.comparators.as_slice() {
            if let (Op::Exact, Some(minor), Some(patch)) =
                (comparator.op, comparator.minor, comparator.patch)
            {
                let mut version = Version::new(comparator.major, minor, patch);
                version.pre = comparator.pre.clone();
                return Ok(Self::Locked(version));
            }
        }

        Ok(Self::Ranged(req))
    }

    #[must_use]
    pub fn allows(&self, version: &Version) -> bool {
        match self {
            Self::Unconstrained => true,
            Self::Ranged(req) => req.matches(version),
            Self::Locked(locked) => locked == version,
        }
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        match self {
            Self::Locked(_) => true,
            Self::Unconstrained | Self::Ranged(_) => false,
        }
    }
}
