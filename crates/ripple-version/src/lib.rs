use ripple_core::BumpType;
use semver::{BuildMetadata, Prerelease, Version};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("invalid pre-release flag '{flag}'")]
    InvalidPrerelease {
        flag: String,
        #[source]
        source: Option<semver::Error>,
    },
}

/// Computes the version that results from applying `bump_type` to `version`.
///
/// Dependency-driven bumps are computed from the base version they carry:
/// a patch bump, or a pre-release bump when a flag was inherited.
///
/// # Errors
///
/// Returns `VersionError::InvalidPrerelease` if a pre-release flag is empty or
/// not a valid semver identifier.
pub fn bump_version(version: &Version, bump_type: &BumpType) -> Result<Version, VersionError> {
    let mut new_version = match bump_type {
        BumpType::Major => bump_major(version),
        BumpType::Minor => bump_minor(version),
        BumpType::Patch => bump_patch(version),
        BumpType::PreRelease(flag) => bump_prerelease(version, flag)?,
        BumpType::DependencyChange { base, prerelease } => match prerelease {
            Some(flag) => bump_prerelease(base, flag)?,
            None => bump_patch(base),
        },
    };
    new_version.build = BuildMetadata::EMPTY;
    Ok(new_version)
}

/// Picks the bump a package receives from several pending changes.
///
/// The largest stable bump wins. Without any stable bump the first
/// pre-release bump is used.
#[must_use]
pub fn max_bump_type(bumps: &[BumpType]) -> Option<BumpType> {
    bumps
        .iter()
        .filter(|b| b.stable_rank().is_some())
        .max_by_key(|b| b.stable_rank())
        .or_else(|| bumps.iter().find(|b| b.prerelease_flag().is_some()))
        .cloned()
}

#[must_use]
pub fn is_prerelease(version: &Version) -> bool {
    !version.pre.is_empty()
}

fn bump_major(version: &Version) -> Version {
    if is_prerelease(version) && version.minor == 0 && version.patch == 0 {
        return Version::new(version.major, 0, 0);
    }
    Version::new(version.major + 1, 0, 0)
}

fn bump_minor(version: &Version) -> Version {
    if is_prerelease(version) && version.patch == 0 {
        return Version::new(version.major, version.minor, 0);
    }
    Version::new(version.major, version.minor + 1, 0)
}

fn bump_patch(version: &Version) -> Version {
    if is_prerelease(version) {
        return Version::new(version.major, version.minor, version.patch);
    }
    Version::new(version.major, version.minor, version.patch + 1)
}

fn bump_prerelease(version: &Version, flag: &str) -> Result<Version, VersionError> {
    if flag.is_empty() || flag.contains('.') {
        return Err(VersionError::InvalidPrerelease {
            flag: flag.to_string(),
            source: None,
        });
    }

    let (mut new_version, number) = if is_prerelease(version) {
        let base = Version::new(version.major, version.minor, version.patch);
        (base, next_prerelease_number(&version.pre, flag))
    } else {
        (bump_patch(version), 1)
    };

    new_version.pre = Prerelease::new(&format!("{flag}.{number}")).map_err(|source| {
        VersionError::InvalidPrerelease {
            flag: flag.to_string(),
            source: Some(source),
        }
    })?;
    Ok(new_version)
}

fn next_prerelease_number(pre: &Prerelease, flag: &str) -> u64 {
    let mut parts = pre.as_str().split('.');
    if parts.next() != Some(flag) {
        return 1;
    }
    match (parts.next().map(str::parse::<u64>), parts.next()) {
        (Some(Ok(n)), None) => n + 1,
        _ => 1,
    }
}
