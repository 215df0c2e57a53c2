//! Command-line surface: argument parsing, `version` actions and usage text.

pub mod orchestration;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::ArgAction;

use crate::config::{Config, OutputMode};
use crate::error::MreleaserError;

#[derive(Debug, clap::Parser)]
#[command(
    name = "mreleaser",
    version,
    about = "Resolve semantic versions from git history and publish release tags"
)]
pub struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(
        short = 'C',
        long,
        global = true,
        help = "Run as if started in this directory"
    )]
    pub directory: Option<PathBuf>,

    #[arg(long, value_enum, global = true, help = "How results are reported")]
    pub output: Option<OutputMode>,

    #[arg(long, global = true, help = "Remote to push release tags to")]
    pub remote: Option<String>,

    #[arg(long, global = true, help = "Create release tags locally without pushing")]
    pub no_push: bool,

    #[arg(short, long, action = ArgAction::Count, global = true, help = "Increase log verbosity")]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Print the current version, check whether a release is needed, or tag it
    #[command(disable_help_flag = true)]
    Version {
        #[arg(allow_hyphen_values = true, value_name = "needs|tag|help")]
        action: Option<String>,
    },
}

impl Args {
    pub fn working_directory(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Apply command-line overrides on top of file configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(remote) = &self.remote {
            config.remote = remote.clone();
        }
        if self.no_push {
            config.push = false;
        }
    }
}

/// What `version` was asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionAction {
    Show,
    Needs,
    Tag,
    Help,
}

impl VersionAction {
    pub fn parse(action: Option<&str>) -> Result<Self, MreleaserError> {
        match action {
            None => Ok(VersionAction::Show),
            Some(action) => action.parse(),
        }
    }
}

impl FromStr for VersionAction {
    type Err = MreleaserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "needs" => Ok(VersionAction::Needs),
            "tag" => Ok(VersionAction::Tag),
            "help" | "-h" | "--help" => Ok(VersionAction::Help),
            other => Err(MreleaserError::invalid_command(other)),
        }
    }
}

impl fmt::Display for VersionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionAction::Show => write!(f, "version"),
            VersionAction::Needs => write!(f, "version needs"),
            VersionAction::Tag => write!(f, "version tag"),
            VersionAction::Help => write!(f, "version help"),
        }
    }
}

/// Usage text for the `version` sub-commands
pub fn usage() -> &'static str {
    "\
Usage: mreleaser [OPTIONS] version [needs|tag|help]

  version          print the current version
  version needs    report whether a release is needed; fails when blocked or nothing changed
  version tag      create and push an annotated tag for the next version
  version help     show this help (also -h, --help)

Outputs: BUMPED=true|false and VERSION=<semver>, exported for CI steps."
}

/// One-line description of the version-resolution engine
pub fn engine_description() -> String {
    let (major, minor, patch) = git2::Version::get().libgit2_version();
    format!(
        "mreleaser {}: semantic versions from git tags and conventional commits (libgit2 {}.{}.{})",
        env!("CARGO_PKG_VERSION"),
        major,
        minor,
        patch
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_version_actions() {
        assert_eq!(VersionAction::parse(None).unwrap(), VersionAction::Show);
        assert_eq!(VersionAction::parse(Some("needs")).unwrap(), VersionAction::Needs);
        assert_eq!(VersionAction::parse(Some("tag")).unwrap(), VersionAction::Tag);
        for help in ["help", "-h", "--help"] {
            assert_eq!(VersionAction::parse(Some(help)).unwrap(), VersionAction::Help);
        }
    }

    #[test]
    fn test_unknown_action_is_invalid_command() {
        let err = VersionAction::parse(Some("publish")).unwrap_err();
        assert!(matches!(err, MreleaserError::InvalidCommand { .. }));
        assert_eq!(err.to_string(), "invalid command: publish");
    }

    #[test]
    fn test_parse_help_action_through_clap() {
        let args = Args::try_parse_from(["mreleaser", "version", "--help"]).unwrap();
        let Command::Version { action } = args.command;
        assert_eq!(action.as_deref(), Some("--help"));

        let args = Args::try_parse_from(["mreleaser", "version", "-h"]).unwrap();
        let Command::Version { action } = args.command;
        assert_eq!(action.as_deref(), Some("-h"));
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "mreleaser",
            "--remote",
            "upstream",
            "--no-push",
            "--output",
            "github",
            "version",
            "tag",
        ])
        .unwrap();

        let mut config = Config::default();
        args.apply_overrides(&mut config);
        assert_eq!(config.remote, "upstream");
        assert!(!config.push);
        assert_eq!(config.output, OutputMode::Github);
    }

    #[test]
    fn test_usage_lists_actions() {
        let text = usage();
        assert!(text.contains("version needs"));
        assert!(text.contains("version tag"));
        assert!(engine_description().starts_with("mreleaser "));
    }
}
