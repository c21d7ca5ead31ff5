//! Command workflow logic
//!
//! Everything a command does apart from parsing arguments and printing. The
//! binary resolves a [Workspace] once and calls into it; tests drive the same
//! functions against temporary directories and a mock git provider.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::deriver::VersionDeriver;
use crate::domain::BaseVersion;
use crate::error::Result;
use crate::git::{GitInfo, GitMetadata};
use crate::manifest::{ManifestPatcher, PatchReport, PatchRequest};
use crate::store::{self, LoadedVersion};
use crate::ui::BuildSummary;

/// Which component of the base version to bump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bump {
    Major,
    Minor,
}

/// A deriver plus the warnings raised while building it
#[derive(Debug, Clone)]
pub struct Derivation {
    pub deriver: VersionDeriver,
    pub warnings: Vec<BoundaryWarning>,
}

/// Result of a successful `update-oam`
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    pub image: String,
    pub report: PatchReport,
    pub warnings: Vec<BoundaryWarning>,
}

/// Project root plus the configuration that applies to it
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    config: Config,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Workspace {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn base_version_path(&self) -> PathBuf {
        self.config.base_version_path(&self.root)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.config.manifest_path(&self.root)
    }

    /// The explicit registry if given, else the configured one
    pub fn registry<'a>(&'a self, explicit: Option<&'a str>) -> &'a str {
        explicit.unwrap_or(&self.config.registry)
    }

    /// Load the base version and snapshot git state
    pub fn derive<G: GitMetadata + ?Sized>(&self, git: &G) -> Result<Derivation> {
        let mut warnings = Vec::new();

        let path = self.base_version_path();
        let base = match store::load_base_version(&path)? {
            LoadedVersion::Stored(version) => version,
            LoadedVersion::Default(version) => {
                warnings.push(BoundaryWarning::DefaultBaseVersion {
                    path,
                    version: version.to_string(),
                });
                version
            }
        };

        let info = GitInfo::collect(git);
        if info.is_degraded() {
            warnings.push(BoundaryWarning::GitUnavailable {
                queries: info.degraded.clone(),
            });
        }

        Ok(Derivation {
            deriver: VersionDeriver::new(base, info),
            warnings,
        })
    }

    /// Point the service's image at the current commit and refresh the
    /// version annotations.
    pub fn update_oam(
        &self,
        deriver: &VersionDeriver,
        service: &str,
        registry: Option<&str>,
        dry_run: bool,
    ) -> Result<UpdateOutcome> {
        let image = deriver.commit_image(self.registry(registry), service);
        let annotations = &self.config.annotations;

        let request = PatchRequest {
            service: service.to_string(),
            image: image.clone(),
            annotations: vec![
                (annotations.version_key.clone(), deriver.semantic_version()),
                (
                    annotations.commit_sha_key.clone(),
                    deriver.git().commit_sha.clone(),
                ),
            ],
        };

        let report = ManifestPatcher::new(self.manifest_path()).apply(&request, dry_run)?;

        let mut warnings = Vec::new();
        if report.images_updated == 0 {
            warnings.push(BoundaryWarning::NoImageMatched {
                service: service.to_string(),
            });
        }
        if !report.annotations_updated {
            warnings.push(BoundaryWarning::AnnotationsMissing {
                path: report.path.clone(),
            });
        }

        Ok(UpdateOutcome {
            image,
            report,
            warnings,
        })
    }

    /// Bump and persist the base version, returning `(old, new)`
    pub fn increment(&self, bump: Bump) -> Result<(BaseVersion, BaseVersion)> {
        let path = self.base_version_path();
        let current = store::load_base_version(&path)?.version();

        let next = match bump {
            Bump::Major => current.increment_major(),
            Bump::Minor => current.increment_minor(),
        };

        store::save_base_version(&path, &next)?;
        Ok((current, next))
    }
}

/// Gather everything the `summary` command prints
pub fn build_summary(
    deriver: &VersionDeriver,
    service: &str,
    registry: &str,
    timestamp: DateTime<Utc>,
) -> BuildSummary {
    BuildSummary {
        service: service.to_string(),
        version: deriver.semantic_version(),
        commit_sha: deriver.git().commit_sha.clone(),
        branch: deriver.git().branch.name.clone(),
        build_number: deriver.git().commit_count,
        is_release: deriver.is_release(),
        tags: deriver.container_tags(registry, service),
        timestamp,
    }
}
