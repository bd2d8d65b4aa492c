use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ProjectError;

pub(crate) type DependencyTable = IndexMap<String, DependencySpec>;

#[derive(Debug, Deserialize)]
pub(crate) struct CargoManifest {
    pub(crate) package: Option<PackageSection>,
    pub(crate) workspace: Option<WorkspaceSection>,
    #[serde(default)]
    pub(crate) dependencies: DependencyTable,
    #[serde(default, rename = "dev-dependencies")]
    pub(crate) dev_dependencies: DependencyTable,
    #[serde(default, rename = "build-dependencies")]
    pub(crate) build_dependencies: DependencyTable,
    #[serde(default)]
    pub(crate) target: IndexMap<String, TargetSection>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PackageSection {
    pub(crate) name: String,
    pub(crate) version: Option<VersionField>,
    pub(crate) publish: Option<PublishField>,
    pub(crate) metadata: Option<Metadata>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum VersionField {
    Literal(String),
    Inherited(InheritedField),
}

#[derive(Debug, Deserialize)]
pub(crate) struct InheritedField {
    pub(crate) workspace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum PublishField {
    Flag(bool),
    Registries(Vec<String>),
}

impl PublishField {
    pub(crate) fn is_publishable(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Registries(registries) => !registries.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum DependencySpec {
    Requirement(String),
    Detailed(DetailedDependency),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct DetailedDependency {
    pub(crate) version: Option<String>,
    #[serde(default)]
    pub(crate) workspace: bool,
    pub(crate) package: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TargetSection {
    #[serde(default)]
    pub(crate) dependencies: DependencyTable,
    #[serde(default, rename = "dev-dependencies")]
    pub(crate) dev_dependencies: DependencyTable,
    #[serde(default, rename = "build-dependencies")]
    pub(crate) build_dependencies: DependencyTable,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorkspaceSection {
    pub(crate) members: Option<Vec<String>>,
    pub(crate) exclude: Option<Vec<String>>,
    pub(crate) package: Option<WorkspacePackage>,
    #[serde(default)]
    pub(crate) dependencies: DependencyTable,
    pub(crate) metadata: Option<Metadata>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorkspacePackage {
    pub(crate) version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Metadata {
    pub(crate) ripple: Option<RippleMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct RippleMetadata {
    pub(crate) changeset_dir: Option<String>,
    pub(crate) changelog: Option<String>,
    #[serde(default)]
    pub(crate) include: Vec<String>,
    #[serde(default)]
    pub(crate) exclude: Vec<String>,
    pub(crate) include_private: Option<bool>,
    pub(crate) keep_changesets: Option<bool>,
}

impl CargoManifest {
    /// Regular and build dependencies, target-specific tables last.
    pub(crate) fn normal_tables(&self) -> impl Iterator<Item = &DependencyTable> {
        [&self.dependencies, &self.build_dependencies]
            .into_iter()
            .chain(
                self.target
                    .values()
                    .flat_map(|t| [&t.dependencies, &t.build_dependencies]),
            )
    }

    pub(crate) fn dev_tables(&self) -> impl Iterator<Item = &DependencyTable> {
        std::iter::once(&self.dev_dependencies)
            .chain(self.target.values().map(|t| &t.dev_dependencies))
    }
}

pub(crate) fn read_manifest(path: &Path) -> Result<CargoManifest, ProjectError> {
    let content = std::fs::read_to_string(path).map_err(|source| ProjectError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| ProjectError::ManifestParse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_tables_keep_declaration_order() {
        let manifest: CargoManifest = toml::from_str(
            r#"
[package]
name = "app"
version = "1.0.0"

[dependencies]
zeta = "1"
alpha = { path = "../alpha", version = "0.2" }
mid = { workspace = true }
"#,
        )
        .expect("valid manifest");

        let names: Vec<_> = manifest.dependencies.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn publish_field_variants() {
        assert!(PublishField::Flag(true).is_publishable());
        assert!(!PublishField::Flag(false).is_publishable());
        assert!(!PublishField::Registries(Vec::new()).is_publishable());
        assert!(PublishField::Registries(vec!["internal".to_string()]).is_publishable());
    }

    #[test]
    fn target_tables_are_collected() {
        let manifest: CargoManifest = toml::from_str(
            r#"
[package]
name = "app"

[target.'cfg(unix)'.dependencies]
sys = { path = "../sys" }

[target.'cfg(unix)'.dev-dependencies]
harness = { path = "../harness" }
"#,
        )
        .expect("valid manifest");

        assert_eq!(manifest.normal_tables().filter(|t| t.contains_key("sys")).count(), 1);
        assert_eq!(
            manifest
                .dev_tables()
                .filter(|t| t.contains_key("harness"))
                .count(),
            1
        );
    }
}
