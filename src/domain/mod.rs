//! Domain logic - pure versioning and tagging rules independent of git and files

pub mod branch;
pub mod tag;
pub mod version;

pub use branch::{sanitize_branch_name, BranchContext, BranchKind};
pub use tag::{container_tags, ImageName};
pub use version::{BaseVersion, ParseBaseVersionError};
