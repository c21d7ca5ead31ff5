use crate::error::Result;
use crate::git::{GitMetadata, SHORT_SHA_LEN};
use git2::Repository as Git2Repo;
use std::path::{Path, PathBuf};

/// Wrapper around git2::Repository with our trait interface.
///
/// May hold no repository at all, in which case every query answers `None`.
pub struct Git2Repository {
    repo: Option<Git2Repo>,
}

impl Git2Repository {
    /// Open the repository containing `path`, failing if there is none
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo: Some(repo) })
    }

    /// Open the repository containing `path`, or an empty provider if there is none
    pub fn discover<P: AsRef<Path>>(path: P) -> Self {
        Git2Repository {
            repo: Git2Repo::discover(path).ok(),
        }
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo: Some(repo) }
    }

    pub fn is_repository(&self) -> bool {
        self.repo.is_some()
    }

    /// Root of the working tree, `None` for bare repositories or no repository
    pub fn workdir(&self) -> Option<PathBuf> {
        self.repo
            .as_ref()
            .and_then(|repo| repo.workdir())
            .map(Path::to_path_buf)
    }
}

impl GitMetadata for Git2Repository {
    fn commit_sha(&self) -> Option<String> {
        let repo = self.repo.as_ref()?;
        let commit = repo.head().ok()?.peel_to_commit().ok()?;

        let hex = commit.id().to_string();
        Some(hex[..SHORT_SHA_LEN].to_string())
    }

    fn branch_name(&self) -> Option<String> {
        let repo = self.repo.as_ref()?;
        let head = repo.head().ok()?;

        if !head.is_branch() {
            return None;
        }

        head.shorthand().map(str::to_string)
    }

    fn commit_count(&self) -> Option<usize> {
        let repo = self.repo.as_ref()?;

        let mut revwalk = repo.revwalk().ok()?;
        revwalk.push_head().ok()?;

        let mut count = 0;
        for oid in revwalk {
            oid.ok()?;
            count += 1;
        }

        Some(count)
    }
}
