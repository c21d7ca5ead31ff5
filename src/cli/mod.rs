//! Command-line workflows shared by the binary and the integration tests

pub mod orchestration;

pub use orchestration::{build_summary, Bump, Derivation, UpdateOutcome, Workspace};
