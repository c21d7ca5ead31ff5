pub mod boundary;
pub mod cli;
pub mod config;
pub mod deriver;
pub mod domain;
pub mod error;
pub mod git;
pub mod manifest;
pub mod store;
pub mod ui;

pub use error::{OamTagError, Result};
