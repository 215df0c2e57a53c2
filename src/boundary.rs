use std::fmt;

use crate::domain::SemVer;

/// Warnings that occur when resolving versions near repository boundaries.
/// These are non-fatal issues that should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No version tag is reachable from HEAD, so resolution starts at 0.0.0
    NoVersionTag,
    /// Tag exists but does not name a release version under the configured pattern
    UnparsableTag { tag: String, pattern: String },
    /// Commits exist since the last tag, but none of them qualifies for a bump
    NoQualifyingCommits { version: SemVer, commit_count: usize },
    /// Tag was created locally but pushing is disabled by configuration
    PushDisabled { tag: String, remote: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoVersionTag => {
                write!(f, "No version tag reachable from HEAD, starting at 0.0.0")
            }
            BoundaryWarning::UnparsableTag { tag, pattern } => {
                write!(
                    f,
                    "Ignoring tag '{}': does not match pattern '{}'",
                    tag, pattern
                )
            }
            BoundaryWarning::NoQualifyingCommits {
                version,
                commit_count,
            } => write!(
                f,
                "{} commit(s) since {} but none qualifies for a version bump",
                commit_count, version
            ),
            BoundaryWarning::PushDisabled { tag, remote } => write!(
                f,
                "Pushing is disabled; run 'git push {} {}' to publish the tag",
                remote, tag
            ),
        }
    }
}
