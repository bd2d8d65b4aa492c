use ripple_changelog::ChangelogPatch;

use crate::Result;

pub trait ChangelogWriter: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the changelog cannot be read or written.
    fn apply(&self, patch: &ChangelogPatch) -> Result<()>;
}
