use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use ripple_core::{DependencyReference, Package};
use semver::Version;
use tracing::debug;

use crate::config::config_from_manifest;
use crate::error::ProjectError;
use crate::manifest::{CargoManifest, DependencySpec, DependencyTable, VersionField, read_manifest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectKind {
    VirtualWorkspace,
    WorkspaceWithRoot,
    SinglePackage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CargoProject {
    pub root: PathBuf,
    pub kind: ProjectKind,
    /// Packages in discovery order: root package first, then members in the
    /// order of the `members` patterns, sorted by path within a pattern.
    pub packages: Vec<Package>,
}

impl CargoProject {
    #[must_use]
    pub fn root_manifest_path(&self) -> PathBuf {
        self.root.join("Cargo.toml")
    }
}

/// Settings of the root manifest that member manifests may inherit from.
struct WorkspaceContext<'a> {
    version: Option<&'a str>,
    dependencies: Option<&'a DependencyTable>,
    changelog: &'a str,
}

/// # Errors
///
/// Returns `ProjectError` if no project root can be found or if manifest parsing fails.
pub fn discover_project(start_dir: &Path) -> Result<CargoProject, ProjectError> {
    let start_dir = start_dir
        .canonicalize()
        .map_err(|source| ProjectError::ManifestRead {
            path: start_dir.to_path_buf(),
            source,
        })?;

    let (root, manifest) = find_project_root(&start_dir)?;
    let kind = determine_project_kind(&manifest);
    let packages = collect_packages(&root, &manifest, &kind)?;
    debug!(root = %root.display(), packages = packages.len(), "discovered project");

    Ok(CargoProject {
        root,
        kind,
        packages,
    })
}

fn find_project_root(start_dir: &Path) -> Result<(PathBuf, CargoManifest), ProjectError> {
    let mut current = start_dir.to_path_buf();
    let mut fallback_single_package: Option<(PathBuf, CargoManifest)> = None;

    loop {
        let manifest_path = current.join("Cargo.toml");

        if manifest_path.exists() {
            let manifest = read_manifest(&manifest_path)?;

            if manifest.workspace.is_some() {
                return Ok((current, manifest));
            }

            if manifest.package.is_some() && fallback_single_package.is_none() {
                fallback_single_package = Some((current.clone(), manifest));
            }
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => {
                return fallback_single_package.ok_or_else(|| ProjectError::NotFound {
                    start_dir: start_dir.to_path_buf(),
                });
            }
        }
    }
}

fn determine_project_kind(manifest: &CargoManifest) -> ProjectKind {
    match (&manifest.workspace, &manifest.package) {
        (Some(_), Some(_)) => ProjectKind::WorkspaceWithRoot,
        (None, Some(_)) => ProjectKind::SinglePackage,
        (Some(_) | None, None) => ProjectKind::VirtualWorkspace,
    }
}

fn collect_packages(
    root: &Path,
    manifest: &CargoManifest,
    kind: &ProjectKind,
) -> Result<Vec<Package>, ProjectError> {
    let config = config_from_manifest(manifest, kind);
    let context = WorkspaceContext {
        version: manifest
            .workspace
            .as_ref()
            .and_then(|ws| ws.package.as_ref())
            .and_then(|pkg| pkg.version.as_deref()),
        dependencies: manifest.workspace.as_ref().map(|ws| &ws.dependencies),
        changelog: config.changelog(),
    };

    let mut packages = Vec::new();

    if let Some(package) = build_package(root, manifest, &context)? {
        packages.push(package);
    }

    if let Some(workspace) = &manifest.workspace {
        let members = workspace.members.as_deref().unwrap_or(&[]);
        let excludes = workspace.exclude.as_deref().unwrap_or(&[]);
        let mut seen: Vec<PathBuf> = vec![root.to_path_buf()];

        for pattern in members {
            for member_dir in expand_glob_pattern(root, pattern, excludes)? {
                if seen.contains(&member_dir) {
                    continue;
                }
                seen.push(member_dir.clone());

                let member_manifest_path = member_dir.join("Cargo.toml");
                if !member_manifest_path.exists() {
                    continue;
                }

                let member_manifest = read_manifest(&member_manifest_path)?;
                if let Some(package) = build_package(&member_dir, &member_manifest, &context)? {
                    packages.push(package);
                }
            }
        }
    }

    Ok(packages)
}

fn build_package(
    dir: &Path,
    manifest: &CargoManifest,
    context: &WorkspaceContext<'_>,
) -> Result<Option<Package>, ProjectError> {
    let Some(section) = &manifest.package else {
        return Ok(None);
    };
    let manifest_path = dir.join("Cargo.toml");

    let version = resolve_version(section.version.as_ref(), context.version, &manifest_path)?;
    let mut package = Package::new(section.name.clone(), version, dir);

    for table in manifest.normal_tables() {
        for (key, spec) in table {
            let (name, reference) = resolve_reference(key, spec, context, &manifest_path)?;
            package.dependencies.entry(name).or_default().push(reference);
        }
    }
    for table in manifest.dev_tables() {
        for (key, spec) in table {
            let (name, reference) = resolve_reference(key, spec, context, &manifest_path)?;
            package.dev_dependencies.entry(name).or_default().push(reference);
        }
    }

    if section
        .publish
        .as_ref()
        .is_some_and(|publish| !publish.is_publishable())
    {
        package = package.unpublished();
    }

    let changelog = dir.join(context.changelog);
    if changelog.is_file() {
        package = package.with_changelog(changelog);
    }

    Ok(Some(package))
}

/// A missing version leaves the package unversioned.
fn resolve_version(
    version_field: Option<&VersionField>,
    workspace_version: Option<&str>,
    manifest_path: &Path,
) -> Result<Option<Version>, ProjectError> {
    let version_str = match version_field {
        None => return Ok(None),
        Some(VersionField::Literal(v)) => v.as_str(),
        Some(VersionField::Inherited(inherited)) if inherited.workspace => workspace_version
            .ok_or_else(|| ProjectError::MissingField {
                path: manifest_path.to_path_buf(),
                field: "workspace.package.version",
            })?,
        Some(VersionField::Inherited(_)) => {
            return Err(ProjectError::MissingField {
                path: manifest_path.to_path_buf(),
                field: "package.version",
            });
        }
    };

    version_str
        .parse()
        .map(Some)
        .map_err(|source| ProjectError::InvalidVersion {
            path: manifest_path.to_path_buf(),
            version: version_str.to_string(),
            source,
        })
}

/// Maps one dependency entry to the real package name it refers to and the
/// constraint it places on that package.
fn resolve_reference(
    key: &str,
    spec: &DependencySpec,
    context: &WorkspaceContext<'_>,
    manifest_path: &Path,
) -> Result<(String, DependencyReference), ProjectError> {
    let parse = |requirement: &str| {
        DependencyReference::from_requirement(requirement).map_err(|source| {
            ProjectError::InvalidRequirement {
                path: manifest_path.to_path_buf(),
                dependency: key.to_string(),
                source,
            }
        })
    };

    let detailed = match spec {
        DependencySpec::Requirement(requirement) => {
            return Ok((key.to_string(), parse(requirement)?));
        }
        DependencySpec::Detailed(detailed) => detailed,
    };

    let (inherited_package, version) = if detailed.workspace {
        let inherited = context
            .dependencies
            .and_then(|deps| deps.get(key))
            .ok_or_else(|| ProjectError::UnresolvedWorkspaceDependency {
                path: manifest_path.to_path_buf(),
                dependency: key.to_string(),
            })?;
        match inherited {
            DependencySpec::Requirement(requirement) => (None, Some(requirement.as_str())),
            DependencySpec::Detailed(root) => (root.package.as_deref(), root.version.as_deref()),
        }
    } else {
        (None, detailed.version.as_deref())
    };

    let name = detailed
        .package
        .as_deref()
        .or(inherited_package)
        .unwrap_or(key)
        .to_string();
    let reference = match version {
        Some(requirement) => parse(requirement)?,
        None => DependencyReference::Unconstrained,
    };

    Ok((name, reference))
}

fn expand_glob_pattern(
    root: &Path,
    pattern: &str,
    excludes: &[String],
) -> Result<Vec<PathBuf>, ProjectError> {
    let glob = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|source| ProjectError::GlobPattern {
            pattern: pattern.to_string(),
            source,
        })?
        .compile_matcher();

    let exclude_matchers = excludes
        .iter()
        .map(|ex| {
            GlobBuilder::new(ex)
                .literal_separator(true)
                .build()
                .map(|g| g.compile_matcher())
                .map_err(|source| ProjectError::GlobPattern {
                    pattern: ex.clone(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut dirs = Vec::new();
    collect_matching_dirs(root, root, &glob, &exclude_matchers, &mut dirs)?;
    dirs.sort();

    Ok(dirs)
}

fn collect_matching_dirs(
    base: &Path,
    current: &Path,
    glob: &GlobMatcher,
    excludes: &[GlobMatcher],
    results: &mut Vec<PathBuf>,
) -> Result<(), ProjectError> {
    for entry in std::fs::read_dir(current)? {
        let path = entry?.path();

        if !path.is_dir() || is_skipped_dir(&path) {
            continue;
        }

        let relative = path.strip_prefix(base).unwrap_or(&path);

        if excludes.iter().any(|ex| ex.is_match(relative)) {
            continue;
        }

        if glob.is_match(relative) {
            results.push(path.clone());
        }

        collect_matching_dirs(base, &path, glob, excludes, results)?;
    }

    Ok(())
}

fn is_skipped_dir(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.') || name == "target")
}
