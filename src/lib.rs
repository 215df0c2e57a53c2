pub mod analyzer;
pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod manager;
pub mod output;
pub mod ui;

pub use error::{MreleaserError, Result};
pub use manager::VersionManager;
