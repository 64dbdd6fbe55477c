//! Plugin adapter implementations.

mod changelog;
mod commit_analyzer;
mod docker_buildx;
mod git_commit;
mod github;
pub mod mock_plugin;
mod release_notes;

pub use changelog::{prepend_notes, ChangelogWriter};
pub use commit_analyzer::{CommitAnalyzer, NO_RELEVANT_CHANGES};
pub use docker_buildx::DockerBuildxPlugin;
pub use git_commit::GitCommitter;
pub use github::GitHubPlugin;
pub use mock_plugin::MockPlugin;
pub use release_notes::{render_notes, ReleaseNotesGenerator};
