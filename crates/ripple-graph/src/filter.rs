use globset::{Glob, GlobSet, GlobSetBuilder};
use ripple_core::Package;

use crate::error::GraphError;

/// Selects which workspace packages take part in a run.
///
/// A package is selected when it matches an include pattern (or no include
/// patterns are given), matches no exclude pattern, and is publishable unless
/// `include_private` is set. Patterns are globs over package names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPolicy {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub include_private: bool,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
            include_private: true,
        }
    }
}

impl FilterPolicy {
    #[must_use]
    pub fn with_include(mut self, pattern: impl Into<String>) -> Self {
        self.include.push(pattern.into());
        self
    }

    #[must_use]
    pub fn with_exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.push(pattern.into());
        self
    }

    #[must_use]
    pub fn without_private(mut self) -> Self {
        self.include_private = false;
        self
    }

    pub(crate) fn compile(&self) -> Result<CompiledFilter, GraphError> {
        let include = if self.include.is_empty() {
            None
        } else {
            Some(build_glob_set(&self.include)?)
        };

        Ok(CompiledFilter {
            include,
            exclude: build_glob_set(&self.exclude)?,
            include_private: self.include_private,
        })
    }
}

pub(crate) struct CompiledFilter {
    include: Option<GlobSet>,
    exclude: GlobSet,
    include_private: bool,
}

impl CompiledFilter {
    pub(crate) fn accepts(&self, package: &Package) -> bool {
        let included = self
            .include
            .as_ref()
            .is_none_or(|set| set.is_match(&package.name));

        included
            && !self.exclude.is_match(&package.name)
            && (self.include_private || package.publish)
    }
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet, GraphError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| GraphError::GlobPattern {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| GraphError::GlobPattern {
        pattern: patterns.join(", "),
        source,
    })
}
