//! User interface module - console output.
//!
//! - `formatter` - Status line helpers and the Markdown summary renderer

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_error, display_patch_changes, display_status,
    display_success, format_timestamp, render_summary, BuildSummary,
};
