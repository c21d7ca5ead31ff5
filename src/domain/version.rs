use std::fmt;
use std::str::FromStr;

/// The persisted `<major>.<minor>` pair that every derived version starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BaseVersion {
    pub major: u32,
    pub minor: u32,
}

impl BaseVersion {
    /// Create a new base version
    pub fn new(major: u32, minor: u32) -> Self {
        BaseVersion { major, minor }
    }

    /// Bump the major component; minor restarts at 0
    pub fn increment_major(&self) -> Self {
        BaseVersion {
            major: self.major + 1,
            minor: 0,
        }
    }

    /// Bump the minor component
    pub fn increment_minor(&self) -> Self {
        BaseVersion {
            major: self.major,
            minor: self.minor + 1,
        }
    }

    /// Docker-tag-compatible version string: `<major>.<minor>.<sha>`.
    ///
    /// The third component is the short commit SHA, not a patch number, so
    /// the result is deliberately not strict semver.
    pub fn semantic_version(&self, commit_sha: &str) -> String {
        format!("{}.{}.{}", self.major, self.minor, commit_sha)
    }
}

impl Default for BaseVersion {
    fn default() -> Self {
        BaseVersion::new(1, 1)
    }
}

impl fmt::Display for BaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Returned when text is not a `<major>.<minor>` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBaseVersionError;

impl fmt::Display for ParseBaseVersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected <major>.<minor>")
    }
}

impl std::error::Error for ParseBaseVersionError {}

impl FromStr for BaseVersion {
    type Err = ParseBaseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (major, minor) = s.trim().split_once('.').ok_or(ParseBaseVersionError)?;

        let major = major.parse::<u32>().map_err(|_| ParseBaseVersionError)?;
        let minor = minor.parse::<u32>().map_err(|_| ParseBaseVersionError)?;

        Ok(BaseVersion { major, minor })
    }
}
