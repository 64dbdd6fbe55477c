//! Plugin kind enumeration for determining which adapter to use.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginKind {
    CommitAnalyzer,
    ReleaseNotes,
    Changelog,
    Git,
    DockerBuildx,
    GitHub,
}

impl PluginKind {
    pub const ALL: [PluginKind; 6] = [
        Self::CommitAnalyzer,
        Self::ReleaseNotes,
        Self::Changelog,
        Self::Git,
        Self::DockerBuildx,
        Self::GitHub,
    ];

    /// Resolve a configured plugin name.
    ///
    /// Both the full package name and the short alias are accepted.
    ///
    /// # Examples
    ///
    /// ```
    /// use rk_core::plugins::PluginKind;
    ///
    /// assert_eq!(
    ///     PluginKind::from_name("@semantic-release/changelog"),
    ///     Some(PluginKind::Changelog)
    /// );
    /// assert_eq!(PluginKind::from_name("docker-buildx"), Some(PluginKind::DockerBuildx));
    /// assert_eq!(PluginKind::from_name("@semantic-release/npm"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name || kind.alias() == name)
    }

    /// Canonical package name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CommitAnalyzer => "@semantic-release/commit-analyzer",
            Self::ReleaseNotes => "@semantic-release/release-notes-generator",
            Self::Changelog => "@semantic-release/changelog",
            Self::Git => "@semantic-release/git",
            Self::DockerBuildx => "semantic-release-docker-buildx",
            Self::GitHub => "@semantic-release/github",
        }
    }

    /// Short alias accepted in configuration.
    pub fn alias(&self) -> &'static str {
        match self {
            Self::CommitAnalyzer => "commit-analyzer",
            Self::ReleaseNotes => "release-notes-generator",
            Self::Changelog => "changelog",
            Self::Git => "git",
            Self::DockerBuildx => "docker-buildx",
            Self::GitHub => "github",
        }
    }

    /// Whether the plugin may appear in `publish`.
    pub fn can_publish(&self) -> bool {
        matches!(self, Self::DockerBuildx | Self::GitHub)
    }
}
