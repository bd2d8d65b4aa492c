use ripple_changelog::ChangelogPatch;

use crate::Result;
use crate::traits::ChangelogWriter;

pub struct FileSystemChangelogWriter;

impl FileSystemChangelogWriter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemChangelogWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangelogWriter for FileSystemChangelogWriter {
    fn apply(&self, patch: &ChangelogPatch) -> Result<()> {
        Ok(patch.apply()?)
    }
}
