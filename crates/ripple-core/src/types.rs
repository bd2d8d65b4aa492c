use std::fmt;

use semver::Version;

/// The increment applied to a package version.
///
/// Two bump types are only compatible when they are structurally equal, which
/// is what the derived `PartialEq` expresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BumpType {
    Major,
    Minor,
    Patch,
    PreRelease(String),
    /// Forced by a dependency upgrade. `base` is the dependent's version at
    /// the time the bump was decided.
    DependencyChange {
        base: Version,
        prerelease: Option<String>,
    },
}

impl BumpType {
    #[must_use]
    pub fn prerelease_flag(&self) -> Option<&str> {
        match self {
            Self::PreRelease(flag) => Some(flag.as_str()),
            Self::DependencyChange {
                prerelease: Some(flag),
                ..
            } => Some(flag.as_str()),
            Self::Major | Self::Minor | Self::Patch | Self::DependencyChange { .. } => None,
        }
    }

    /// Rank of the stable bump kinds, `None` for pre-release and
    /// dependency-driven bumps.
    #[must_use]
    pub fn stable_rank(&self) -> Option<u8> {
        match self {
            Self::Patch => Some(0),
            Self::Minor => Some(1),
            Self::Major => Some(2),
            Self::PreRelease(_) | Self::DependencyChange { .. } => None,
        }
    }
}

impl fmt::Display for BumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Major => write!(f, "major"),
            Self::Minor => write!(f, "minor"),
            Self::Patch => write!(f, "patch"),
            Self::PreRelease(flag) => write!(f, "prerelease ({flag})"),
            Self::DependencyChange {
                prerelease: Some(flag),
                ..
            } => write!(f, "dependency change ({flag})"),
            Self::DependencyChange { .. } => write!(f, "dependency change"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRelease {
    pub name: String,
    pub bump_type: BumpType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changeset {
    pub summary: String,
    pub releases: Vec<PackageRelease>,
}

/// A finalized dependency update as seen by one of its dependents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyBump {
    pub name: String,
    pub bump_type: BumpType,
    pub new_version: Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structurally_equal_bumps_are_compatible() {
        assert_eq!(BumpType::Major, BumpType::Major);
        assert_eq!(
            BumpType::PreRelease("beta".to_string()),
            BumpType::PreRelease("beta".to_string())
        );
    }

    #[test]
    fn different_bumps_conflict() {
        assert_ne!(BumpType::Major, BumpType::Minor);
        assert_ne!(
            BumpType::PreRelease("alpha".to_string()),
            BumpType::PreRelease("beta".to_string())
        );
        assert_ne!(
            BumpType::DependencyChange {
                base: Version::new(1, 0, 0),
                prerelease: None,
            },
            BumpType::DependencyChange {
                base: Version::new(2, 0, 0),
                prerelease: None,
            }
        );
    }

    #[test]
    fn prerelease_flag_reads_both_carriers() {
        assert_eq!(
            BumpType::PreRelease("rc".to_string()).prerelease_flag(),
            Some("rc")
        );
        let forced = BumpType::DependencyChange {
            base: Version::new(1, 0, 0),
            prerelease: Some("beta".to_string()),
        };
        assert_eq!(forced.prerelease_flag(), Some("beta"));
        assert_eq!(BumpType::Patch.prerelease_flag(), None);
    }

    #[test]
    fn stable_rank_orders_patch_minor_major() {
        assert!(BumpType::Patch.stable_rank() < BumpType::Minor.stable_rank());
        assert!(BumpType::Minor.stable_rank() < BumpType::Major.stable_rank());
        assert_eq!(BumpType::PreRelease("beta".to_string()).stable_rank(), None);
    }

    #[test]
    fn display_is_lowercase() {
        assert_eq!(BumpType::Minor.to_string(), "minor");
        assert_eq!(
            BumpType::PreRelease("beta".to_string()).to_string(),
            "prerelease (beta)"
        );
        let forced = BumpType::DependencyChange {
            base: Version::new(1, 0, 0),
            prerelease: None,
        };
        assert_eq!(forced.to_string(), "dependency change");
    }
}
