use std::path::Path;

use ripple_project::{CargoProject, RippleConfig, discover_project, load_config};

use super::ChangesetDetector;
use crate::Result;
use crate::traits::ProjectProvider;

pub struct FileSystemProjectProvider;

impl FileSystemProjectProvider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemProjectProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectProvider for FileSystemProjectProvider {
    type Detector = ChangesetDetector;

    fn discover_project(&self, start_path: &Path) -> Result<CargoProject> {
        Ok(discover_project(start_path)?)
    }

    fn load_config(&self, project: &CargoProject) -> Result<RippleConfig> {
        Ok(load_config(project)?)
    }

    fn change_detector(
        &self,
        project: &CargoProject,
        config: &RippleConfig,
    ) -> Result<Self::Detector> {
        ChangesetDetector::load(
            &project.root.join(config.changeset_dir()),
            &project.packages,
        )
    }
}
