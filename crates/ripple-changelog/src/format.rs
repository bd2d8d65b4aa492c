use chrono::NaiveDate;
use ripple_core::DependencyBump;
use semver::Version;

#[must_use]
pub fn format_version_header(version: &Version, date: NaiveDate) -> String {
    format!("## [{version}] - {date}")
}

/// One `- <entry>` bullet per entry. Continuation lines of multi-line
/// entries are indented under their bullet.
#[must_use]
pub fn format_entries(entries: &[String]) -> String {
    entries
        .iter()
        .map(|entry| format!("- {}", entry.trim().lines().collect::<Vec<_>>().join("\n  ")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per dependency change, in the given order.
#[must_use]
pub fn format_dependency_bullets(changes: &[DependencyBump]) -> String {
    changes
        .iter()
        .map(|change| format!("- `{}` upgraded to `{}`", change.name, change.new_version))
        .collect::<Vec<_>>()
        .join("\n")
}
