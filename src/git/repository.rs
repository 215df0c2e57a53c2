use crate::config::TaggerConfig;
use crate::error::{MreleaserError, Result};
use crate::git::{CommitInfo, TagRef};
use git2::{ErrorCode, ObjectType, Oid, Repository as Git2Repo, Signature, Sort, StatusOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Discover the working copy containing `path`, walking up to the filesystem root.
    ///
    /// Bare repositories are rejected: the version procedure needs a working copy.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Git2Repo::discover(path).map_err(|e| {
            debug!(error = %e, "repository discovery failed");
            MreleaserError::NotAGitRepository {
                path: path.to_path_buf(),
            }
        })?;

        if repo.is_bare() {
            return Err(MreleaserError::NotAGitRepository {
                path: path.to_path_buf(),
            });
        }

        debug!(workdir = ?repo.workdir(), "opened repository");
        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    pub fn workdir(&self) -> Option<PathBuf> {
        self.repo.workdir().map(Path::to_path_buf)
    }

    fn signature(&self, tagger: &TaggerConfig) -> Result<Signature<'static>> {
        match self.repo.signature() {
            Ok(signature) => Ok(signature.to_owned()),
            Err(e) => {
                debug!(error = %e, "no git identity configured, using tagger from config");
                Ok(Signature::now(&tagger.name, &tagger.email)?)
            }
        }
    }
}

fn ssh_key_paths() -> Vec<PathBuf> {
    let Some(home) = dirs::home_dir() else {
        return Vec::new();
    };

    ["id_ed25519", "id_rsa", "id_ecdsa"]
        .iter()
        .map(|name| home.join(".ssh").join(name))
        .filter(|path| path.exists())
        .collect()
}

/// Where a push credential comes from
#[derive(Clone, PartialEq, Eq)]
enum CredentialSource<'a> {
    Token(&'a str),
    SshKey(PathBuf),
    SshAgent,
    Default,
}

impl std::fmt::Debug for CredentialSource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialSource::Token(_) => write!(f, "Token(<redacted>)"),
            CredentialSource::SshKey(path) => write!(f, "SshKey({})", path.display()),
            CredentialSource::SshAgent => write!(f, "SshAgent"),
            CredentialSource::Default => write!(f, "Default"),
        }
    }
}

impl CredentialSource<'_> {
    fn credential(&self, username: &str) -> std::result::Result<git2::Cred, git2::Error> {
        match self {
            CredentialSource::Token(token) => git2::Cred::userpass_plaintext("x-access-token", token),
            CredentialSource::SshKey(path) => git2::Cred::ssh_key(username, None, path, None),
            CredentialSource::SshAgent => git2::Cred::ssh_key_from_agent(username),
            CredentialSource::Default => git2::Cred::default(),
        }
    }
}

/// Credential candidates in order: token, SSH keys, SSH agent, default.
///
/// Each candidate is handed out at most once, so a rejected credential makes
/// libgit2's next request move on to the following one.
struct CredentialChain<'a> {
    token: Option<&'a str>,
    ssh_keys: std::vec::IntoIter<PathBuf>,
    agent_tried: bool,
    default_tried: bool,
}

impl<'a> CredentialChain<'a> {
    fn new(token: Option<&'a str>, ssh_keys: Vec<PathBuf>) -> Self {
        CredentialChain {
            token,
            ssh_keys: ssh_keys.into_iter(),
            agent_tried: false,
            default_tried: false,
        }
    }

    fn next(&mut self, allowed: git2::CredentialType) -> Option<CredentialSource<'a>> {
        if allowed.contains(git2::CredentialType::USER_PASS_PLAINTEXT) {
            if let Some(token) = self.token.take() {
                return Some(CredentialSource::Token(token));
            }
        }

        if allowed.contains(git2::CredentialType::SSH_KEY) {
            if let Some(path) = self.ssh_keys.next() {
                return Some(CredentialSource::SshKey(path));
            }
            if !self.agent_tried {
                self.agent_tried = true;
                return Some(CredentialSource::SshAgent);
            }
        }

        if allowed.contains(git2::CredentialType::DEFAULT) && !self.default_tried {
            self.default_tried = true;
            return Some(CredentialSource::Default);
        }

        None
    }
}

impl super::Repository for Git2Repository {
    fn head_oid(&self) -> Result<Option<Oid>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?.id())),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                debug!("HEAD is unborn, repository has no commits");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn list_tags(&self) -> Result<Vec<TagRef>> {
        let names = self.repo.tag_names(None)?;
        let mut tags = Vec::new();

        for name in names.iter().flatten() {
            let target = self
                .repo
                .find_reference(&format!("refs/tags/{}", name))
                .and_then(|reference| reference.peel(ObjectType::Commit));

            match target {
                Ok(commit) => tags.push(TagRef {
                    name: name.to_string(),
                    target: commit.id(),
                }),
                Err(e) => trace!(tag = name, error = %e, "skipping tag without commit target"),
            }
        }

        Ok(tags)
    }

    fn history(&self, from: Oid, hide: Option<Oid>) -> Result<Vec<CommitInfo>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(from)?;
        if let Some(hide) = hide {
            revwalk.hide(hide)?;
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;
            commits.push(CommitInfo {
                oid,
                message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
            });
        }

        Ok(commits)
    }

    fn is_dirty(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false)
            .exclude_submodules(false);

        let statuses = self.repo.statuses(Some(&mut options))?;
        for entry in statuses.iter() {
            trace!(path = ?entry.path(), status = ?entry.status(), "uncommitted change");
        }

        Ok(!statuses.is_empty())
    }

    fn create_annotated_tag(
        &self,
        name: &str,
        target: Oid,
        message: &str,
        tagger: &TaggerConfig,
    ) -> Result<()> {
        let object = self
            .repo
            .find_object(target, Some(ObjectType::Commit))
            .map_err(|e| MreleaserError::tag(format!("Cannot find commit {}: {}", target, e)))?;
        let signature = self.signature(tagger)?;

        self.repo
            .tag(name, &object, &signature, message, false)
            .map_err(|e| match e.code() {
                ErrorCode::Exists => MreleaserError::tag(format!("Tag '{}' already exists", name)),
                _ => MreleaserError::tag(format!("Cannot create tag '{}': {}", name, e)),
            })?;

        Ok(())
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        self.repo
            .tag_delete(name)
            .map_err(|e| MreleaserError::tag(format!("Cannot delete tag '{}': {}", name, e)))
    }

    fn push_tag(&self, remote: &str, name: &str, token: Option<&str>) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote)
            .map_err(|_| MreleaserError::remote(format!("No remote named '{}' found", remote)))?;

        let mut chain = CredentialChain::new(token, ssh_key_paths());
        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(move |_url, username_from_url, allowed_types| {
            let username = username_from_url.unwrap_or("git");
            if allowed_types.contains(git2::CredentialType::USERNAME) {
                return git2::Cred::username(username);
            }
            while let Some(source) = chain.next(allowed_types) {
                match source.credential(username) {
                    Ok(cred) => {
                        debug!(?source, "offering credentials");
                        return Ok(cred);
                    }
                    Err(e) => trace!(?source, error = %e, "credential source unavailable"),
                }
            }
            Err(git2::Error::from_str("authentication failed"))
        });

        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => {
                warn!(reference = refname, status, "remote rejected reference");
                Err(git2::Error::from_str(&format!(
                    "Push rejected for {}: {}",
                    refname, status
                )))
            }
            None => Ok(()),
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        let refspec = format!("refs/tags/{0}:refs/tags/{0}", name);
        remote
            .push(&[refspec.as_str()], Some(&mut push_options))
            .map_err(|e| match e.class() {
                git2::ErrorClass::Net => {
                    MreleaserError::remote(format!("Network error during push: {}", e))
                }
                git2::ErrorClass::Reference => {
                    MreleaserError::remote(format!("Reference error during push: {}", e))
                }
                _ => MreleaserError::remote(format!("Failed to push tag '{}': {}", name, e)),
            })
    }
}
