//! Domain logic - pure business rules independent of git operations

pub mod commit;
pub mod decision;
pub mod tag;
pub mod version;

pub use commit::ParsedCommit;
pub use decision::{ReleaseDecision, RepositoryState};
pub use tag::TagPattern;
pub use version::{SemVer, VersionBump};
