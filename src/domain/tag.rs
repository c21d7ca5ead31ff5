use crate::domain::{BaseVersion, BranchContext, BranchKind};

/// A container image repository: `<registry>/<service>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageName {
    pub registry: String,
    pub service: String,
}

impl ImageName {
    /// Create a new image name; a trailing `/` on the registry is dropped
    pub fn new(registry: impl Into<String>, service: impl Into<String>) -> Self {
        let registry: String = registry.into();
        ImageName {
            registry: registry.trim_end_matches('/').to_string(),
            service: service.into(),
        }
    }

    /// Full reference for one tag label
    /// Example: registry="docker.io/acme", service="api", label="1.2" -> "docker.io/acme/api:1.2"
    pub fn tagged(&self, label: &str) -> String {
        format!("{}/{}:{}", self.registry, self.service, label)
    }
}

/// Build the ordered tag list for one image.
///
/// Every branch gets `semver`, `sha` and `<branch>-<sha>`. Release branches add
/// `latest`, `<major>` and `<major>.<minor>`; `develop` adds `develop`.
/// Entries are never deduplicated.
pub fn container_tags(
    base: &BaseVersion,
    commit_sha: &str,
    branch: &BranchContext,
    image: &ImageName,
) -> Vec<String> {
    let mut tags = vec![
        image.tagged(&base.semantic_version(commit_sha)),
        image.tagged(commit_sha),
        image.tagged(&format!("{}-{}", branch.name, commit_sha)),
    ];

    match branch.kind {
        BranchKind::Release => {
            tags.push(image.tagged("latest"));
            tags.push(image.tagged(&base.major.to_string()));
            tags.push(image.tagged(&base.to_string()));
        }
        BranchKind::Develop => tags.push(image.tagged("develop")),
        BranchKind::Hotfix | BranchKind::Feature => {}
    }

    tags
}
