use std::fmt;
use std::path::PathBuf;

/// Non-fatal conditions met while deriving versions or patching the manifest.
/// These are reported to the user but never stop the command.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Git could not answer some queries; sentinels were used instead
    GitUnavailable { queries: Vec<&'static str> },
    /// The base version file does not exist yet
    DefaultBaseVersion { path: PathBuf, version: String },
    /// The service block exists but none of its images belong to the service
    NoImageMatched { service: String },
    /// The manifest has no document-level `annotations:` block
    AnnotationsMissing { path: PathBuf },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::GitUnavailable { queries } => {
                write!(
                    f,
                    "Git metadata unavailable ({}); using placeholder values",
                    queries.join(", ")
                )
            }
            BoundaryWarning::DefaultBaseVersion { path, version } => {
                write!(
                    f,
                    "No base version file at '{}'; assuming {}",
                    path.display(),
                    version
                )
            }
            BoundaryWarning::NoImageMatched { service } => {
                write!(
                    f,
                    "Component '{}' has no image whose repository ends in '/{}'",
                    service, service
                )
            }
            BoundaryWarning::AnnotationsMissing { path } => {
                write!(
                    f,
                    "No 'annotations:' block in '{}'; annotations not written",
                    path.display()
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_unavailable_lists_queries() {
        let warning = BoundaryWarning::GitUnavailable {
            queries: vec!["commit sha", "branch"],
        };
        assert_eq!(
            warning.to_string(),
            "Git metadata unavailable (commit sha, branch); using placeholder values"
        );
    }

    #[test]
    fn test_default_base_version_display() {
        let warning = BoundaryWarning::DefaultBaseVersion {
            path: PathBuf::from(".version"),
            version: "1.1".to_string(),
        };
        let msg = warning.to_string();
        assert!(msg.contains(".version"));
        assert!(msg.contains("1.1"));
    }

    #[test]
    fn test_no_image_matched_display() {
        let warning = BoundaryWarning::NoImageMatched {
            service: "api".to_string(),
        };
        assert!(warning.to_string().contains("'/api'"));
    }

    #[test]
    fn test_annotations_missing_display() {
        let warning = BoundaryWarning::AnnotationsMissing {
            path: PathBuf::from("app.yaml"),
        };
        assert!(warning.to_string().contains("app.yaml"));
    }
}
