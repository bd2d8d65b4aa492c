use std::path::PathBuf;

use chrono::NaiveDate;
use ripple_changelog::ChangelogPatch;
use ripple_core::{BumpType, Package};

use crate::Result;
use crate::types::PackageUpdate;

pub trait ChangeDetector: Send + Sync {
    /// The bump `package` needs for its own changes, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the pending changes cannot be evaluated.
    fn try_detect(&self, package: &Package) -> Result<Option<BumpType>>;

    /// Changelog section for a direct update. Detectors without change
    /// descriptions leave direct updates without a changelog entry.
    fn changelog_patch(
        &self,
        _update: &PackageUpdate,
        _date: NaiveDate,
    ) -> Option<ChangelogPatch> {
        None
    }

    /// Marks the detected changes as released. Returns the removed files.
    ///
    /// # Errors
    ///
    /// Returns an error if a change record cannot be removed or rewritten.
    fn consume(&self) -> Result<Vec<PathBuf>> {
        Ok(Vec::new())
    }
}
