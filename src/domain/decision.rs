use std::fmt;

use crate::domain::SemVer;
use crate::error::MreleaserError;

/// Reason reported when the working copy has uncommitted changes
pub const DIRTY_REPOSITORY: &str = "dirty repository";

/// Snapshot of the facts a release decision is made from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryState {
    pub working_directory_clean: bool,
    pub current_version: SemVer,
    pub next_version: SemVer,
}

impl RepositoryState {
    /// Decide whether a release can be cut from this state
    pub fn decide(&self) -> ReleaseDecision {
        if !self.working_directory_clean {
            ReleaseDecision::Blocked(DIRTY_REPOSITORY.to_string())
        } else if self.next_version <= self.current_version {
            ReleaseDecision::NoBumpNeeded
        } else {
            ReleaseDecision::BumpAvailable
        }
    }
}

/// Outcome of comparing the current and next versions of a clean working copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseDecision {
    NoBumpNeeded,
    BumpAvailable,
    Blocked(String),
}

impl ReleaseDecision {
    pub fn is_bump_available(&self) -> bool {
        matches!(self, ReleaseDecision::BumpAvailable)
    }

    /// Plain one-line description naming the versions involved
    pub fn summary(&self, current: SemVer, next: SemVer) -> String {
        match self {
            ReleaseDecision::BumpAvailable => format!("{}: {} -> {}", self, current, next),
            ReleaseDecision::NoBumpNeeded => format!("{} (at {})", self, current),
            ReleaseDecision::Blocked(_) => self.to_string(),
        }
    }

    /// Convert a non-releasable decision into the error `tag` fails with.
    ///
    /// Returns `None` for `BumpAvailable`.
    pub fn into_error(self, current: SemVer) -> Option<MreleaserError> {
        match self {
            ReleaseDecision::BumpAvailable => None,
            ReleaseDecision::NoBumpNeeded => Some(MreleaserError::NoBumpAvailable {
                version: current.to_string(),
            }),
            ReleaseDecision::Blocked(reason) if reason == DIRTY_REPOSITORY => {
                Some(MreleaserError::DirtyRepository)
            }
            ReleaseDecision::Blocked(reason) => Some(MreleaserError::tag(reason)),
        }
    }
}

impl fmt::Display for ReleaseDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseDecision::NoBumpNeeded => write!(f, "no bump needed"),
            ReleaseDecision::BumpAvailable => write!(f, "bump available"),
            ReleaseDecision::Blocked(reason) => write!(f, "blocked: {}", reason),
        }
    }
}
