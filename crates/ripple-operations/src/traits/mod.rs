mod change_detector;
mod changelog_writer;
mod manifest_writer;
mod project_provider;

pub use change_detector::ChangeDetector;
pub use changelog_writer::ChangelogWriter;
pub use manifest_writer::ManifestWriter;
pub use project_provider::ProjectProvider;
