//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the git operations the
//! version procedure needs, allowing for a real libgit2-backed repository and
//! an in-memory mock for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations are:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! Most code should depend on the [Repository] trait rather than concrete
//! implementations.
//!
//! ```rust
//! # use mreleaser::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> mreleaser::Result<()> {
//! if let Some(head) = repo.head_oid()? {
//!     for commit in repo.history(head, None)? {
//!         println!("{}: {}", commit.short_id(), commit.summary());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::config::TaggerConfig;
use crate::error::Result;
use git2::Oid;

/// Commit information for analysis
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// The commit id
    pub oid: Oid,
    /// The full commit message
    pub message: String,
}

impl CommitInfo {
    pub fn short_id(&self) -> String {
        self.oid.to_string().chars().take(7).collect()
    }

    /// First line of the message
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}

/// A tag name together with the commit it ultimately points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
    pub name: String,
    pub target: Oid,
}

/// Git operations needed to resolve versions and publish release tags
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// underlying errors (like `git2::Error`) to the appropriate
/// [crate::error::MreleaserError] variants.
///
/// ## Implementations
///
/// - [Git2Repository](repository::Git2Repository): Real Git implementation using the `git2` crate
/// - [MockRepository](mock::MockRepository): Test implementation for mocking Git operations
pub trait Repository: Send {
    /// Commit `HEAD` points at, or `None` for an unborn branch
    fn head_oid(&self) -> Result<Option<Oid>>;

    /// All tags in the repository, peeled to the commits they point at
    ///
    /// Tags that do not point at a commit are skipped.
    fn list_tags(&self) -> Result<Vec<TagRef>>;

    /// Commits reachable from `from` and not reachable from `hide`
    ///
    /// Returned newest first (topological, then commit time).
    fn history(&self, from: Oid, hide: Option<Oid>) -> Result<Vec<CommitInfo>>;

    /// Whether the working copy differs from `HEAD`
    ///
    /// Counts tracked modifications, staged changes (submodule gitlinks
    /// included) and untracked files.
    /// Ignored files do not count.
    fn is_dirty(&self) -> Result<bool>;

    /// Create an annotated tag pointing at `target`
    ///
    /// `tagger` is used when the repository has no configured identity.
    /// Fails if a tag with the same name already exists.
    fn create_annotated_tag(
        &self,
        name: &str,
        target: Oid,
        message: &str,
        tagger: &TaggerConfig,
    ) -> Result<()>;

    /// Delete a local tag
    fn delete_tag(&self, name: &str) -> Result<()>;

    /// Push a single tag to `remote`
    ///
    /// `token`, when present, is offered as HTTPS credentials.
    fn push_tag(&self, remote: &str, name: &str, token: Option<&str>) -> Result<()>;
}
