use std::path::Path;

use ripple_project::{CargoProject, RippleConfig};

use super::ChangeDetector;
use crate::Result;

pub trait ProjectProvider: Send + Sync {
    type Detector: ChangeDetector;

    /// # Errors
    ///
    /// Returns an error if no project can be found from the given path.
    fn discover_project(&self, start_path: &Path) -> Result<CargoProject>;

    /// # Errors
    ///
    /// Returns an error if the project configuration cannot be loaded.
    fn load_config(&self, project: &CargoProject) -> Result<RippleConfig>;

    /// The source of direct changes for `project`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pending changes cannot be read.
    fn change_detector(
        &self,
        project: &CargoProject,
        config: &RippleConfig,
    ) -> Result<Self::Detector>;
}
