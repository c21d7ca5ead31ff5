use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{OamTagError, Result};

/// Name of the project-level configuration file
pub const CONFIG_FILE_NAME: &str = "oamtag.toml";

/// Represents the complete configuration for oam-tag.
///
/// Contains the image registry, the locations of the persisted base version and
/// the OAM manifest, and the annotation keys written into the manifest.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_registry")]
    pub registry: String,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub annotations: AnnotationsConfig,
}

/// Returns the default container registry prefix.
fn default_registry() -> String {
    "docker.io/socrates12345".to_string()
}

fn default_base_version_file() -> PathBuf {
    PathBuf::from(".version")
}

fn default_manifest() -> PathBuf {
    PathBuf::from("oam/applications/application.yaml")
}

/// File locations, relative to the project root unless absolute.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PathsConfig {
    #[serde(default = "default_base_version_file")]
    pub base_version_file: PathBuf,

    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            base_version_file: default_base_version_file(),
            manifest: default_manifest(),
        }
    }
}

fn default_version_key() -> String {
    "app.version".to_string()
}

fn default_commit_sha_key() -> String {
    "app.commit-sha".to_string()
}

/// Annotation keys upserted into the manifest's `annotations:` block.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AnnotationsConfig {
    #[serde(default = "default_version_key")]
    pub version_key: String,

    #[serde(default = "default_commit_sha_key")]
    pub commit_sha_key: String,
}

impl Default for AnnotationsConfig {
    fn default() -> Self {
        AnnotationsConfig {
            version_key: default_version_key(),
            commit_sha_key: default_commit_sha_key(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            registry: default_registry(),
            paths: PathsConfig::default(),
            annotations: AnnotationsConfig::default(),
        }
    }
}

impl Config {
    /// Absolute location of the base version file under `project_root`
    pub fn base_version_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.paths.base_version_file)
    }

    /// Absolute location of the OAM manifest under `project_root`
    pub fn manifest_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.paths.manifest)
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `oamtag.toml` in the project root
/// 3. `.oamtag.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>, project_root: &Path) -> Result<Config> {
    let path = if let Some(path) = config_path {
        path.to_path_buf()
    } else if project_root.join(CONFIG_FILE_NAME).exists() {
        project_root.join(CONFIG_FILE_NAME)
    } else if let Some(config_dir) = dirs::config_dir() {
        let user_config = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if user_config.exists() {
            user_config
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config_str = fs::read_to_string(&path).map_err(|e| {
        OamTagError::config(format!("cannot read {}: {}", path.display(), e))
    })?;

    toml::from_str(&config_str)
        .map_err(|e| OamTagError::config(format!("cannot parse {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.registry, "docker.io/socrates12345");
        assert_eq!(config.paths.base_version_file, PathBuf::from(".version"));
        assert_eq!(
            config.paths.manifest,
            PathBuf::from("oam/applications/application.yaml")
        );
        assert_eq!(config.annotations.version_key, "app.version");
        assert_eq!(config.annotations.commit_sha_key, "app.commit-sha");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str("registry = \"ghcr.io/acme\"").unwrap();
        assert_eq!(config.registry, "ghcr.io/acme");
        assert_eq!(config.paths, PathsConfig::default());
        assert_eq!(config.annotations, AnnotationsConfig::default());
    }

    #[test]
    fn test_paths_resolve_against_root() {
        let config = Config::default();
        let root = Path::new("/srv/project");
        assert_eq!(
            config.manifest_path(root),
            PathBuf::from("/srv/project/oam/applications/application.yaml")
        );
        assert_eq!(
            config.base_version_path(root),
            PathBuf::from("/srv/project/.version")
        );
    }

    #[test]
    fn test_absolute_paths_win() {
        let mut config = Config::default();
        config.paths.manifest = PathBuf::from("/etc/oam/app.yaml");
        assert_eq!(
            config.manifest_path(Path::new("/srv/project")),
            PathBuf::from("/etc/oam/app.yaml")
        );
    }
}
