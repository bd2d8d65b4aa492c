use indexmap::IndexMap;
use serde::Deserialize;
use serde_with::{MapPreventDuplicates, serde_as};

use ripple_core::{BumpType, Changeset, PackageRelease};

use crate::error::{FormatError, FrontMatterError, ValidationError};

pub(crate) const FRONT_MATTER_DELIMITER: &str = "---";

const MAX_INPUT_SIZE: usize = 100 * 1024 * 1024;

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum StableBump {
    Major,
    Minor,
    Patch,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ReleaseKind {
    Stable(StableBump),
    PreRelease { prerelease: String },
}

#[serde_as]
#[derive(Deserialize)]
struct ReleasesMap {
    #[serde(flatten)]
    #[serde_as(as = "MapPreventDuplicates<_, _>")]
    releases: IndexMap<String, ReleaseKind>,
}

fn strip_line_ending(s: &str) -> &str {
    s.strip_prefix("\r\n")
        .or_else(|| s.strip_prefix('\n'))
        .unwrap_or(s)
}

fn find_closing_delimiter(content: &str) -> Option<usize> {
    if content.starts_with(FRONT_MATTER_DELIMITER) {
        return Some(0);
    }
    if let Some(pos) = content.find("\r\n---") {
        return Some(pos + 2);
    }
    if let Some(pos) = content.find("\n---") {
        return Some(pos + 1);
    }
    None
}

fn extract_front_matter(content: &str) -> Result<(&str, &str), FormatError> {
    let trimmed = content.trim_start();

    if !trimmed.starts_with(FRONT_MATTER_DELIMITER) {
        return Err(FrontMatterError::MissingOpeningDelimiter.into());
    }

    let after_opening = &trimmed[FRONT_MATTER_DELIMITER.len()..];
    let after_opening = strip_line_ending(after_opening);

    let Some(closing_pos) = find_closing_delimiter(after_opening) else {
        return Err(FrontMatterError::MissingClosingDelimiter.into());
    };

    let yaml_content = &after_opening[..closing_pos];
    let yaml_content = yaml_content.trim_end_matches('\r');
    if yaml_content.trim().is_empty() {
        return Err(FrontMatterError::EmptyFrontMatter.into());
    }

    let after_closing = &after_opening[closing_pos + FRONT_MATTER_DELIMITER.len()..];
    let body = strip_line_ending(after_closing);

    Ok((yaml_content, body))
}

fn to_bump_type(name: &str, kind: ReleaseKind) -> Result<BumpType, ValidationError> {
    match kind {
        ReleaseKind::Stable(StableBump::Major) => Ok(BumpType::Major),
        ReleaseKind::Stable(StableBump::Minor) => Ok(BumpType::Minor),
        ReleaseKind::Stable(StableBump::Patch) => Ok(BumpType::Patch),
        ReleaseKind::PreRelease { prerelease } => {
            let flag = prerelease.trim();
            if flag.is_empty() {
                return Err(ValidationError::EmptyPrereleaseFlag {
                    package: name.to_string(),
                });
            }
            Ok(BumpType::PreRelease(flag.to_string()))
        }
    }
}

#[must_use = "parsing result should be handled"]
pub fn parse_changeset(content: &str) -> Result<Changeset, FormatError> {
    if content.len() > MAX_INPUT_SIZE {
        return Err(ValidationError::InputTooLarge {
            max_bytes: MAX_INPUT_SIZE,
        }
        .into());
    }

    let (yaml_content, body) = extract_front_matter(content)?;

    let parsed: ReleasesMap = serde_yml::from_str(yaml_content)?;
    let releases_map = parsed.releases;

    if releases_map.is_empty() {
        return Err(ValidationError::NoReleases.into());
    }

    let releases = releases_map
        .into_iter()
        .map(|(name, kind)| {
            let bump_type = to_bump_type(&name, kind)?;
            Ok(PackageRelease { name, bump_type })
        })
        .collect::<Result<Vec<_>, ValidationError>>()?;

    Ok(Changeset {
        summary: body.trim().to_string(),
        releases,
    })
}
