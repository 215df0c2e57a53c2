use crate::config::TaggerConfig;
use crate::error::{MreleaserError, Result};
use crate::git::{CommitInfo, Repository, TagRef};
use git2::Oid;
use std::sync::Mutex;

/// Mock repository for testing without actual git operations
///
/// History is a single linear branch; `HEAD` is the last commit added.
#[derive(Default)]
pub struct MockRepository {
    commits: Vec<CommitInfo>,
    tags: Mutex<Vec<TagRef>>,
    pushed: Mutex<Vec<(String, String)>>,
    dirty: bool,
    fail_push: bool,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a commit on top of `HEAD` and return its id
    pub fn commit(&mut self, message: impl Into<String>) -> Oid {
        let index = (self.commits.len() % 255) as u8 + 1;
        let oid = Oid::from_bytes(&[index; 20]).unwrap_or_else(|_| Oid::zero());
        self.commits.push(CommitInfo {
            oid,
            message: message.into(),
        });
        oid
    }

    /// Add a tag pointing to an OID
    pub fn add_tag(&mut self, name: impl Into<String>, target: Oid) {
        self.tags_mut().push(TagRef {
            name: name.into(),
            target,
        });
    }

    /// Tag the current `HEAD`
    pub fn tag_head(&mut self, name: impl Into<String>) {
        if let Some(head) = self.commits.last().map(|c| c.oid) {
            self.add_tag(name, head);
        }
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    pub fn set_fail_push(&mut self, fail: bool) {
        self.fail_push = fail;
    }

    pub fn tag_names(&self) -> Vec<String> {
        self.tags
            .lock()
            .map(|tags| tags.iter().map(|t| t.name.clone()).collect())
            .unwrap_or_default()
    }

    /// `(remote, tag)` pairs pushed so far
    pub fn pushed(&self) -> Vec<(String, String)> {
        self.pushed
            .lock()
            .map(|pushed| pushed.clone())
            .unwrap_or_default()
    }

    fn tags_mut(&mut self) -> &mut Vec<TagRef> {
        self.tags.get_mut().unwrap_or_else(|e| e.into_inner())
    }

    fn position(&self, oid: Oid) -> Result<usize> {
        self.commits
            .iter()
            .position(|c| c.oid == oid)
            .ok_or_else(|| MreleaserError::version(format!("Unknown commit {}", oid)))
    }
}

fn poisoned<T>(_: T) -> MreleaserError {
    MreleaserError::tag("mock state poisoned")
}

impl Repository for MockRepository {
    fn head_oid(&self) -> Result<Option<Oid>> {
        Ok(self.commits.last().map(|c| c.oid))
    }

    fn list_tags(&self) -> Result<Vec<TagRef>> {
        Ok(self.tags.lock().map_err(poisoned)?.clone())
    }

    fn history(&self, from: Oid, hide: Option<Oid>) -> Result<Vec<CommitInfo>> {
        let end = self.position(from)?;
        let start = match hide {
            Some(hide) => self.position(hide)? + 1,
            None => 0,
        };

        Ok(self
            .commits
            .get(start..=end)
            .unwrap_or_default()
            .iter()
            .rev()
            .cloned()
            .collect())
    }

    fn is_dirty(&self) -> Result<bool> {
        Ok(self.dirty)
    }

    fn create_annotated_tag(
        &self,
        name: &str,
        target: Oid,
        _message: &str,
        _tagger: &TaggerConfig,
    ) -> Result<()> {
        let mut tags = self.tags.lock().map_err(poisoned)?;
        if tags.iter().any(|t| t.name == name) {
            return Err(MreleaserError::tag(format!("Tag '{}' already exists", name)));
        }
        tags.push(TagRef {
            name: name.to_string(),
            target,
        });
        Ok(())
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        self.tags.lock().map_err(poisoned)?.retain(|t| t.name != name);
        Ok(())
    }

    fn push_tag(&self, remote: &str, name: &str, _token: Option<&str>) -> Result<()> {
        if self.fail_push {
            return Err(MreleaserError::remote("Push failed: connection refused"));
        }
        self.pushed
            .lock()
            .map_err(poisoned)?
            .push((remote.to_string(), name.to_string()));
        Ok(())
    }
}
