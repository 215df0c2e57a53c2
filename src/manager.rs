//! Version resolution and release decisions for a single working copy.
//!
//! [`VersionManager`] answers four questions about the repository it wraps:
//! which release version `HEAD` currently carries, which version the commits
//! since that release call for, whether the working copy is clean, and
//! whether a release tag may therefore be cut. [`VersionManager::tag`] acts
//! on that answer by creating and pushing an annotated tag.
//!
//! Every call resolves state afresh from git; nothing is cached or persisted.

use std::collections::HashMap;
use std::path::Path;

use git2::Oid;
use tracing::{debug, info, warn};

use crate::analyzer::VersionAnalyzer;
use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::decision::DIRTY_REPOSITORY;
use crate::domain::{ReleaseDecision, RepositoryState, SemVer, TagPattern};
use crate::error::{MreleaserError, Result};
use crate::git::{Git2Repository, Repository};

/// Versions resolved from history, before cleanliness is considered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Resolution {
    head: Option<Oid>,
    current: SemVer,
    next: SemVer,
}

impl Resolution {
    fn state(&self, working_directory_clean: bool) -> RepositoryState {
        RepositoryState {
            working_directory_clean,
            current_version: self.current,
            next_version: self.next,
        }
    }
}

/// Resolves versions and publishes release tags for one repository
pub struct VersionManager<R: Repository> {
    repo: R,
    config: Config,
    pattern: TagPattern,
    analyzer: VersionAnalyzer,
}

impl VersionManager<Git2Repository> {
    /// Open the working copy containing `path` and build a manager for it.
    ///
    /// Fails with [`MreleaserError::NotAGitRepository`] when no repository is
    /// found between `path` and the filesystem root.
    pub fn discover(path: &Path, config: Config) -> Result<Self> {
        let repo = Git2Repository::open(path)?;
        Self::new(repo, config)
    }
}

impl<R: Repository> VersionManager<R> {
    pub fn new(repo: R, config: Config) -> Result<Self> {
        let pattern = config.tag_pattern()?;
        let analyzer = VersionAnalyzer::new(config.conventional_commits.clone());

        Ok(VersionManager {
            repo,
            config,
            pattern,
            analyzer,
        })
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Tag name a version is published under
    pub fn tag_name(&self, version: &SemVer) -> String {
        self.pattern.format(version)
    }

    /// Latest release version reachable from `HEAD`, or 0.0.0 if there is none
    pub fn current_version(&self) -> Result<SemVer> {
        Ok(self.resolve()?.current)
    }

    /// Version the commits since the last release call for
    ///
    /// Equal to [`current_version`](Self::current_version) when no commit qualifies.
    pub fn next_version(&self) -> Result<SemVer> {
        Ok(self.resolve()?.next)
    }

    /// Whether the working copy has uncommitted or untracked changes
    pub fn is_dirty(&self) -> Result<bool> {
        self.repo.is_dirty()
    }

    /// Current facts about the working copy
    pub fn state(&self) -> Result<RepositoryState> {
        let clean = !self.is_dirty()?;
        Ok(self.resolve()?.state(clean))
    }

    /// Decide whether a release tag may be created
    pub fn decide(&self) -> Result<ReleaseDecision> {
        Ok(self.evaluate()?.0)
    }

    /// Create and push the release tag for [`next_version`](Self::next_version).
    ///
    /// Fails with the decision's reason unless a bump is available. If the
    /// push fails the local tag is removed again, so a failed call leaves no
    /// tag behind. Nothing is retried.
    pub fn tag(&self) -> Result<SemVer> {
        let (decision, resolution) = self.evaluate()?;

        let resolution = match (decision, resolution) {
            (ReleaseDecision::BumpAvailable, Some(resolution)) => resolution,
            (decision, resolution) => {
                let current = resolution.map(|r| r.current).unwrap_or_default();
                warn!(%decision, "refusing to tag");
                return Err(decision
                    .into_error(current)
                    .unwrap_or_else(|| MreleaserError::tag("no version resolved")));
            }
        };

        let head = resolution
            .head
            .ok_or_else(|| MreleaserError::tag("HEAD has no commit to tag"))?;
        let version = resolution.next;
        let name = self.tag_name(&version);

        info!(tag = %name, from = %resolution.current, "creating annotated tag");
        self.repo.create_annotated_tag(
            &name,
            head,
            &format!("Release {}", version),
            &self.config.tagger,
        )?;

        if !self.config.push {
            report(&BoundaryWarning::PushDisabled {
                tag: name,
                remote: self.config.remote.clone(),
            });
            return Ok(version);
        }

        info!(tag = %name, remote = %self.config.remote, "pushing tag");
        if let Err(e) =
            self.repo
                .push_tag(&self.config.remote, &name, self.config.ci.token.as_deref())
        {
            warn!(tag = %name, error = %e, "push failed, removing local tag");
            if let Err(delete_err) = self.repo.delete_tag(&name) {
                warn!(tag = %name, error = %delete_err, "could not remove local tag");
            }
            return Err(e);
        }

        Ok(version)
    }

    /// Decision plus the resolution it was made from.
    ///
    /// A dirty working copy short-circuits before history is inspected.
    fn evaluate(&self) -> Result<(ReleaseDecision, Option<Resolution>)> {
        if self.is_dirty()? {
            debug!("working copy has uncommitted changes");
            return Ok((ReleaseDecision::Blocked(DIRTY_REPOSITORY.to_string()), None));
        }

        let resolution = self.resolve()?;
        Ok((resolution.state(true).decide(), Some(resolution)))
    }

    fn resolve(&self) -> Result<Resolution> {
        let Some(head) = self.repo.head_oid()? else {
            report(&BoundaryWarning::NoVersionTag);
            return Ok(Resolution {
                head: None,
                current: SemVer::default(),
                next: SemVer::default(),
            });
        };

        let versions = self.version_tags()?;
        let history = self.repo.history(head, None)?;

        let latest = history
            .iter()
            .find_map(|commit| versions.get(&commit.oid).map(|v| (commit.oid, *v)));

        let (current, since) = match latest {
            Some((oid, version)) => {
                debug!(%version, commit = %oid, "latest version tag");
                let since = self.repo.history(head, Some(oid))?;
                (version, since)
            }
            None => {
                report(&BoundaryWarning::NoVersionTag);
                (SemVer::default(), history)
            }
        };

        let messages: Vec<&str> = since.iter().map(|c| c.message.as_str()).collect();
        let next = match self.analyzer.analyze_messages(&messages) {
            Some(bump) => {
                debug!(%bump, commits = since.len(), "bump from commits");
                current.bump(bump)?
            }
            None => {
                if !since.is_empty() {
                    report(&BoundaryWarning::NoQualifyingCommits {
                        version: current,
                        commit_count: since.len(),
                    });
                }
                current
            }
        };

        Ok(Resolution {
            head: Some(head),
            current,
            next,
        })
    }

    /// Release version per tagged commit; the highest wins when a commit has several
    fn version_tags(&self) -> Result<HashMap<Oid, SemVer>> {
        let mut versions: HashMap<Oid, SemVer> = HashMap::new();

        for tag in self.repo.list_tags()? {
            match self.pattern.parse(&tag.name) {
                Some(version) => {
                    let entry = versions.entry(tag.target).or_insert(version);
                    *entry = (*entry).max(version);
                }
                None => report(&BoundaryWarning::UnparsableTag {
                    tag: tag.name,
                    pattern: self.pattern.to_string(),
                }),
            }
        }

        Ok(versions)
    }
}

fn report(warning: &BoundaryWarning) {
    match warning {
        BoundaryWarning::UnparsableTag { .. } => debug!("{}", warning),
        BoundaryWarning::PushDisabled { .. } => warn!("{}", warning),
        _ => info!("{}", warning),
    }
}
