use indexmap::IndexMap;
use ripple_changelog::ChangelogPatch;
use ripple_core::{BumpType, DependencyBump, Package};
use semver::Version;

/// Why a package is updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOrigin {
    /// The package changed itself.
    Direct,
    /// The package pins a dependency exactly and takes over its bump type.
    Locked,
    /// A dependency moved outside of the package's declared requirement.
    Dependency,
}

impl std::fmt::Display for UpdateOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => f.write_str("direct"),
            Self::Locked => f.write_str("locked"),
            Self::Dependency => f.write_str("dependency"),
        }
    }
}

/// A planned version change of one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageUpdate {
    pub package: Package,
    pub bump_type: BumpType,
    pub origin: UpdateOrigin,
    pub current_version: Version,
    pub new_version: Version,
    /// Updated dependencies the package's requirements no longer allow, in
    /// dependency order.
    pub dependency_changes: Vec<DependencyBump>,
    pub changelog: Option<ChangelogPatch>,
}

impl PackageUpdate {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.package.name
    }

    /// The update as seen by a dependent.
    #[must_use]
    pub fn as_dependency_bump(&self) -> DependencyBump {
        DependencyBump {
            name: self.package.name.clone(),
            bump_type: self.bump_type.clone(),
            new_version: self.new_version.clone(),
        }
    }
}

/// Planned updates keyed by package name, in dependency order.
pub type BumpPlan = IndexMap<String, PackageUpdate>;
