use crate::git::GitMetadata;

/// Mock repository for testing without actual git operations
#[derive(Debug, Clone, Default)]
pub struct MockRepository {
    sha: Option<String>,
    branch: Option<String>,
    commit_count: Option<usize>,
}

impl MockRepository {
    /// Create a mock that knows nothing, like a directory outside any repository
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sha(mut self, sha: impl Into<String>) -> Self {
        self.sha = Some(sha.into());
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn with_commit_count(mut self, count: usize) -> Self {
        self.commit_count = Some(count);
        self
    }
}

impl GitMetadata for MockRepository {
    fn commit_sha(&self) -> Option<String> {
        self.sha.clone()
    }

    fn branch_name(&self) -> Option<String> {
        self.branch.clone()
    }

    fn commit_count(&self) -> Option<usize> {
        self.commit_count
    }
}
