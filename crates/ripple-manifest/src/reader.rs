use std::path::Path;

use semver::Version;
use toml_edit::DocumentMut;

use crate::error::ManifestError;

/// # Errors
///
/// Returns `ManifestError::Read` if the file cannot be read, or
/// `ManifestError::Parse` if the TOML is malformed.
pub fn read_document(path: &Path) -> Result<DocumentMut, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    content
        .parse::<DocumentMut>()
        .map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// # Errors
///
/// Returns `ManifestError::MissingField` if required fields are absent, or
/// `ManifestError::InvalidVersion` if the version string is not valid semver.
pub fn read_version(path: &Path) -> Result<Version, ManifestError> {
    let doc = read_document(path)?;

    let package = doc
        .get("package")
        .ok_or_else(|| ManifestError::MissingField {
            path: path.to_path_buf(),
            field: "package".to_string(),
        })?;

    let version_item = package
        .get("version")
        .ok_or_else(|| ManifestError::MissingField {
            path: path.to_path_buf(),
            field: "package.version".to_string(),
        })?;

    let version_str = version_item
        .as_str()
        .ok_or_else(|| ManifestError::MissingField {
            path: path.to_path_buf(),
            field: "package.version (as string)".to_string(),
        })?;

    Version::parse(version_str).map_err(|source| ManifestError::InvalidVersion {
        path: path.to_path_buf(),
        version: version_str.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_version_extracts_semver() {
        let toml = r#"
[package]
name = "test-crate"
version = "1.2.3"
"#;
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("Cargo.toml");
        std::fs::write(&path, toml).expect("write test file");

        let version = read_version(&path).expect("read version");
        assert_eq!(version, Version::new(1, 2, 3));
    }

    #[test]
    fn read_version_rejects_inherited_version() {
        let toml = r#"
[package]
name = "test-crate"
version.workspace = true
"#;
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("Cargo.toml");
        std::fs::write(&path, toml).expect("write test file");

        let result = read_version(&path);
        assert!(matches!(result, Err(ManifestError::MissingField { .. })));
    }

    #[test]
    fn read_document_reports_parse_errors() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("Cargo.toml");
        std::fs::write(&path, "[package\nname = ").expect("write test file");

        let result = read_document(&path);
        assert!(matches!(result, Err(ManifestError::Parse { .. })));
    }
}
