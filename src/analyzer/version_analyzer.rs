use crate::config::ConventionalCommitsConfig;
use crate::domain::{ParsedCommit, VersionBump};

/// Analyzes commits to determine version bump type
pub struct VersionAnalyzer {
    config: ConventionalCommitsConfig,
}

impl VersionAnalyzer {
    /// Create a new version analyzer
    pub fn new(config: ConventionalCommitsConfig) -> Self {
        VersionAnalyzer { config }
    }

    /// Bump implied by a single commit message, if any
    pub fn classify(&self, message: &str) -> Option<VersionBump> {
        let parsed =
            ParsedCommit::parse_with_indicators(message, &self.config.breaking_change_indicators);

        if parsed.is_breaking_change {
            return Some(VersionBump::Major);
        }

        let is_type = |types: &[String]| {
            types
                .iter()
                .any(|t| t.eq_ignore_ascii_case(&parsed.r#type))
        };

        if is_type(&self.config.minor_types) {
            Some(VersionBump::Minor)
        } else if is_type(&self.config.patch_types) {
            Some(VersionBump::Patch)
        } else {
            None
        }
    }

    /// Analyze commit messages and determine version bump
    ///
    /// Returns `None` when no message qualifies for a bump.
    pub fn analyze_messages<S: AsRef<str>>(&self, messages: &[S]) -> Option<VersionBump> {
        let mut highest = None;

        for message in messages {
            let bump = self.classify(message.as_ref());
            if bump == Some(VersionBump::Major) {
                return bump;
            }
            highest = highest.max(bump);
        }

        highest
    }
}
