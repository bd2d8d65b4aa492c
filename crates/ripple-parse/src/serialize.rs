use indexmap::IndexMap;
use serde::Serialize;

use ripple_core::{BumpType, Changeset};

use crate::error::{FormatError, ValidationError};
use crate::parse::FRONT_MATTER_DELIMITER;

#[derive(Serialize)]
#[serde(untagged)]
enum ReleaseOutput<'a> {
    Stable(&'static str),
    PreRelease { prerelease: &'a str },
}

fn to_output<'a>(
    name: &str,
    bump_type: &'a BumpType,
) -> Result<ReleaseOutput<'a>, ValidationError> {
    match bump_type {
        BumpType::Major => Ok(ReleaseOutput::Stable("major")),
        BumpType::Minor => Ok(ReleaseOutput::Stable("minor")),
        BumpType::Patch => Ok(ReleaseOutput::Stable("patch")),
        BumpType::PreRelease(flag) => Ok(ReleaseOutput::PreRelease { prerelease: flag }),
        BumpType::DependencyChange { .. } => Err(ValidationError::UnsupportedBump {
            package: name.to_string(),
        }),
    }
}

/// Renders a changeset in the format [`parse_changeset`](crate::parse_changeset)
/// reads back.
///
/// # Errors
///
/// Returns an error if the changeset has no releases or a release carries a
/// dependency-change bump, which changeset files cannot express.
#[must_use = "serialization result should be handled"]
pub fn serialize_changeset(changeset: &Changeset) -> Result<String, FormatError> {
    if changeset.releases.is_empty() {
        return Err(ValidationError::NoReleases.into());
    }

    let releases = changeset
        .releases
        .iter()
        .map(|r| Ok((r.name.as_str(), to_output(&r.name, &r.bump_type)?)))
        .collect::<Result<IndexMap<&str, ReleaseOutput<'_>>, ValidationError>>()?;

    let yaml = serde_yml::to_string(&releases)?;

    let mut output = String::new();
    output.push_str(FRONT_MATTER_DELIMITER);
    output.push('\n');
    output.push_str(&yaml);
    output.push_str(FRONT_MATTER_DELIMITER);
    output.push('\n');

    if !changeset.summary.is_empty() {
        output.push_str(&changeset.summary);
        output.push('\n');
    }

    Ok(output)
}
