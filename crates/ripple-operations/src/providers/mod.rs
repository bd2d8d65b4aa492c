mod changelog;
mod changeset;
mod manifest;
mod project;

pub use changelog::FileSystemChangelogWriter;
pub use changeset::ChangesetDetector;
pub use manifest::FileSystemManifestWriter;
pub use project::FileSystemProjectProvider;
