use crate::domain::{container_tags, BaseVersion, ImageName};
use crate::git::GitInfo;

/// Combines the persisted base version with live git state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDeriver {
    base: BaseVersion,
    git: GitInfo,
}

impl VersionDeriver {
    /// Create a deriver from an explicit base version and git snapshot
    pub fn new(base: BaseVersion, git: GitInfo) -> Self {
        VersionDeriver { base, git }
    }

    pub fn base(&self) -> BaseVersion {
        self.base
    }

    pub fn git(&self) -> &GitInfo {
        &self.git
    }

    /// `<major>.<minor>.<sha>`
    pub fn semantic_version(&self) -> String {
        self.base.semantic_version(&self.git.commit_sha)
    }

    /// Ordered tag list for `<registry>/<service>`
    pub fn container_tags(&self, registry: &str, service: &str) -> Vec<String> {
        container_tags(
            &self.base,
            &self.git.commit_sha,
            &self.git.branch,
            &ImageName::new(registry, service),
        )
    }

    /// The image reference written into the manifest: `<registry>/<service>:<sha>`
    pub fn commit_image(&self, registry: &str, service: &str) -> String {
        ImageName::new(registry, service).tagged(&self.git.commit_sha)
    }

    pub fn is_release(&self) -> bool {
        self.git.branch.is_release_branch()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;

    fn deriver(branch: &str) -> VersionDeriver {
        let repo = MockRepository::new()
            .with_sha("abc1234")
            .with_branch(branch)
            .with_commit_count(12);
        VersionDeriver::new(BaseVersion::new(3, 0), GitInfo::collect(&repo))
    }

    #[test]
    fn test_semantic_version() {
        assert_eq!(deriver("main").semantic_version(), "3.0.abc1234");
    }

    #[test]
    fn test_commit_image() {
        assert_eq!(
            deriver("main").commit_image("docker.io/socrates12345", "orchestration-service"),
            "docker.io/socrates12345/orchestration-service:abc1234"
        );
    }

    #[test]
    fn test_release_flag() {
        assert!(deriver("master").is_release());
        assert!(!deriver("feature/login").is_release());
    }

    #[test]
    fn test_tags_use_sanitized_branch() {
        let tags = deriver("Feature/Login").container_tags("r.io/acme", "api");
        assert_eq!(tags[2], "r.io/acme/api:feature-login-abc1234");
        assert_eq!(tags.len(), 3);
    }

    #[test]
    fn test_unknown_git_state() {
        let d = VersionDeriver::new(BaseVersion::default(), GitInfo::collect(&MockRepository::new()));
        assert_eq!(d.semantic_version(), "1.1.unknown");
        assert_eq!(
            d.container_tags("r.io", "api"),
            vec!["r.io/api:1.1.unknown", "r.io/api:unknown", "r.io/api:unknown-unknown"]
        );
    }
}
