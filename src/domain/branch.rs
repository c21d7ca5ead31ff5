/// Branch classes that drive which extra tags are published
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Release,
    Hotfix,
    Develop,
    Feature,
}

impl BranchKind {
    /// Classify a branch by its name as git reports it, ignoring case.
    ///
    /// `main`, `master` and `release/*` are release branches, `hotfix/*` are
    /// hotfixes, `develop` is the integration branch; anything else is a
    /// feature branch.
    pub fn classify(branch: &str) -> Self {
        match branch.to_ascii_lowercase().as_str() {
            "main" | "master" => BranchKind::Release,
            "develop" => BranchKind::Develop,
            b if b.starts_with("release/") => BranchKind::Release,
            b if b.starts_with("hotfix/") => BranchKind::Hotfix,
            _ => BranchKind::Feature,
        }
    }

    pub fn is_release(&self) -> bool {
        matches!(self, BranchKind::Release)
    }
}

/// Represents a git branch with context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchContext {
    /// Sanitized name, safe to embed in a container tag
    pub name: String,
    pub kind: BranchKind,
}

impl BranchContext {
    /// Create a branch context from the raw branch name.
    ///
    /// Classification sees the lowercased name with its slashes intact,
    /// because sanitizing turns `release/1.2` into `release-1.2`.
    pub fn new(raw_name: &str) -> Self {
        BranchContext {
            name: sanitize_branch_name(raw_name),
            kind: BranchKind::classify(raw_name),
        }
    }

    pub fn is_release_branch(&self) -> bool {
        self.kind.is_release()
    }
}

/// Lowercase the name and replace every character outside `[a-z0-9._-]`
/// with `-`. The output is plain ASCII, so the function is idempotent.
pub fn sanitize_branch_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}
