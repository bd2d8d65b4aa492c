use std::path::Path;

use ripple_core::DependencyBump;
use semver::Version;
use toml_edit::{DocumentMut, Item, Value, value};
use tracing::warn;

use crate::error::ManifestError;
use crate::reader::read_document;

const DEPENDENCY_SECTIONS: [&str; 3] = ["dependencies", "dev-dependencies", "build-dependencies"];

/// Writes a package's new version and rewrites its requirements on the
/// dependencies in `bumps`, in a single pass over the manifest.
///
/// An inherited `version.workspace = true` is replaced by the literal version.
/// Dependency entries that inherit from the workspace are left untouched.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read, parsed, or written, or if
/// it has no `[package]` table.
pub fn write_version(
    path: &Path,
    version: &Version,
    bumps: &[DependencyBump],
) -> Result<(), ManifestError> {
    let mut doc = read_document(path)?;

    let package = doc
        .get_mut("package")
        .ok_or_else(|| ManifestError::MissingField {
            path: path.to_path_buf(),
            field: "package".to_string(),
        })?;

    let package_table = package
        .as_table_like_mut()
        .ok_or_else(|| ManifestError::MissingField {
            path: path.to_path_buf(),
            field: "package (as table)".to_string(),
        })?;

    package_table.insert("version", value(version.to_string()));
    update_dependency_requirements(&mut doc, bumps);

    write_document(path, &doc)
}

/// Rewrites requirements in the root `[workspace.dependencies]` table.
///
/// Returns whether any entry changed. The file is only written when one did.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read, parsed, or written.
pub fn write_workspace_dependencies(
    path: &Path,
    bumps: &[DependencyBump],
) -> Result<bool, ManifestError> {
    let mut doc = read_document(path)?;

    let changed = doc
        .get_mut("workspace")
        .and_then(Item::as_table_like_mut)
        .and_then(|workspace| workspace.get_mut("dependencies"))
        .is_some_and(|deps| update_dependency_table(deps, bumps));

    if changed {
        write_document(path, &doc)?;
    }
    Ok(changed)
}

/// Rewrites every dependency section, including `[target.*]` ones.
fn update_dependency_requirements(doc: &mut DocumentMut, bumps: &[DependencyBump]) {
    for section in DEPENDENCY_SECTIONS {
        if let Some(deps) = doc.get_mut(section) {
            update_dependency_table(deps, bumps);
        }
    }

    if let Some(targets) = doc.get_mut("target").and_then(Item::as_table_like_mut) {
        for (_, target) in targets.iter_mut() {
            let Some(target) = target.as_table_like_mut() else {
                continue;
            };
            for section in DEPENDENCY_SECTIONS {
                if let Some(deps) = target.get_mut(section) {
                    update_dependency_table(deps, bumps);
                }
            }
        }
    }
}

fn update_dependency_table(deps: &mut Item, bumps: &[DependencyBump]) -> bool {
    let Some(table) = deps.as_table_like_mut() else {
        return false;
    };

    let mut changed = false;
    for (key, entry) in table.iter_mut() {
        let package = entry
            .as_table_like()
            .and_then(|t| t.get("package"))
            .and_then(Item::as_str)
            .unwrap_or(key.get());
        let Some(bump) = bumps.iter().find(|b| b.name == package) else {
            continue;
        };
        changed |= update_dep_entry(&bump.name, entry, &bump.new_version);
    }
    changed
}

fn update_dep_entry(dependency: &str, entry: &mut Item, new_version: &Version) -> bool {
    if let Some(requirement) = entry.as_str() {
        let rewritten = rewrite_requirement(dependency, requirement, new_version);
        return set_requirement(entry, rewritten);
    }

    let Some(table) = entry.as_table_like_mut() else {
        return false;
    };

    let has_workspace_true = table
        .get("workspace")
        .and_then(Item::as_bool)
        .unwrap_or(false);
    if has_workspace_true {
        return false;
    }

    let Some(version) = table.get_mut("version") else {
        return false;
    };
    let Some(requirement) = version.as_str() else {
        return false;
    };
    let rewritten = rewrite_requirement(dependency, requirement, new_version);
    set_requirement(version, rewritten)
}

/// Keeps the leading `=`, `^` or `~` operator of `current`. Anything else is
/// replaced by a plain (caret) requirement on the new version.
fn rewrite_requirement(dependency: &str, current: &str, new_version: &Version) -> String {
    if is_compound(current) {
        warn!(
            dependency,
            requirement = current,
            new = %new_version,
            "replacing compound requirement, its bounds are not kept"
        );
        return new_version.to_string();
    }

    match current.trim_start().chars().next() {
        Some(op @ ('=' | '^' | '~')) => format!("{op}{new_version}"),
        _ => new_version.to_string(),
    }
}

/// Several comparators, or a single comparator whose bounds a plain caret
/// requirement cannot express.
fn is_compound(requirement: &str) -> bool {
    let requirement = requirement.trim();
    requirement.contains(',') || requirement.starts_with(['<', '>', '*'])
}

fn set_requirement(item: &mut Item, requirement: String) -> bool {
    let Some(current) = item.as_value_mut() else {
        return false;
    };
    let decor = current.decor().clone();
    *current = Value::from(requirement);
    *current.decor_mut() = decor;
    true
}

fn write_document(path: &Path, doc: &DocumentMut) -> Result<(), ManifestError> {
    std::fs::write(path, doc.to_string()).map_err(|source| ManifestError::Write {
        path: path.to_path_buf(),
        source,
    })
}
