//! Git metadata abstraction layer
//!
//! Versioning needs three facts about the working tree: the short SHA of
//! HEAD, the current branch and the number of commits behind HEAD. All three
//! are best-effort. A provider answers `None` when it cannot tell (no `.git`,
//! unborn HEAD, detached HEAD, shallow history) and [GitInfo::collect] turns
//! that into the `"unknown"` / `0` sentinels, so versioning never aborts
//! because git is unavailable.
//!
//! Implementations:
//!
//! - [repository::Git2Repository]: reads the repository through the `git2` crate
//! - [mock::MockRepository]: canned answers for tests
//!
//! ```rust
//! # use oam_tag::git::{GitInfo, MockRepository};
//! let repo = MockRepository::new().with_sha("abc1234").with_branch("feature/X");
//! let info = GitInfo::collect(&repo);
//! assert_eq!(info.branch.name, "feature-x");
//! assert_eq!(info.commit_count, 0);
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::BranchContext;

/// Placeholder used for any string fact git could not provide
pub const UNKNOWN: &str = "unknown";

/// Length of the abbreviated commit SHA
pub const SHORT_SHA_LEN: usize = 7;

/// Best-effort source of git metadata
///
/// Every method answers `None` instead of failing. Implementations should
/// never panic on a missing or damaged repository.
pub trait GitMetadata {
    /// Abbreviated (7 hex chars) SHA of HEAD
    fn commit_sha(&self) -> Option<String>;

    /// Short name of the checked-out branch; `None` when HEAD is detached
    fn branch_name(&self) -> Option<String>;

    /// Number of commits reachable from HEAD
    fn commit_count(&self) -> Option<usize>;
}

/// Snapshot of git state for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitInfo {
    pub commit_sha: String,
    pub branch: BranchContext,
    pub commit_count: usize,
    /// Names of the queries that fell back to a sentinel
    pub degraded: Vec<&'static str>,
}

impl GitInfo {
    /// Query `provider` and substitute sentinels for whatever it cannot answer
    pub fn collect<G: GitMetadata + ?Sized>(provider: &G) -> Self {
        let mut degraded = Vec::new();

        let commit_sha = provider.commit_sha().unwrap_or_else(|| {
            degraded.push("commit sha");
            UNKNOWN.to_string()
        });

        let raw_branch = provider.branch_name().unwrap_or_else(|| {
            degraded.push("branch");
            UNKNOWN.to_string()
        });

        let commit_count = provider.commit_count().unwrap_or_else(|| {
            degraded.push("commit count");
            0
        });

        GitInfo {
            commit_sha,
            branch: BranchContext::new(&raw_branch),
            commit_count,
            degraded,
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BranchKind;

    #[test]
    fn test_collect_full_answers() {
        let repo = MockRepository::new()
            .with_sha("abc1234")
            .with_branch("release/1.4")
            .with_commit_count(42);

        let info = GitInfo::collect(&repo);
        assert_eq!(info.commit_sha, "abc1234");
        assert_eq!(info.branch.name, "release-1.4");
        assert_eq!(info.branch.kind, BranchKind::Release);
        assert_eq!(info.commit_count, 42);
        assert!(!info.is_degraded());
    }

    #[test]
    fn test_collect_substitutes_sentinels() {
        let info = GitInfo::collect(&MockRepository::new());
        assert_eq!(info.commit_sha, "unknown");
        assert_eq!(info.branch.name, "unknown");
        assert_eq!(info.branch.kind, BranchKind::Feature);
        assert_eq!(info.commit_count, 0);
        assert_eq!(info.degraded, vec!["commit sha", "branch", "commit count"]);
    }

    #[test]
    fn test_collect_through_trait_object() {
        let repo = MockRepository::new().with_sha("fedcba9");
        let provider: &dyn GitMetadata = &repo;
        assert_eq!(GitInfo::collect(provider).commit_sha, "fedcba9");
    }
}
