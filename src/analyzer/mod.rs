//! Commit analysis for version bump decisions

pub mod version_analyzer;

pub use version_analyzer::VersionAnalyzer;
