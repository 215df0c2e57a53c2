//! Output sinks for reporting results to the caller.
//!
//! The CLI picks one sink per invocation: [`PlainSink`] for terminals and
//! `make`, [`GithubActionsSink`] when running as a GitHub Actions step.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::{Config, OutputMode};
use crate::domain::{ReleaseDecision, SemVer};
use crate::error::{MreleaserError, Result};
use crate::ui;

/// Key telling downstream steps whether a new version was tagged
pub const BUMPED: &str = "BUMPED";
/// Key carrying the resolved semantic version
pub const VERSION: &str = "VERSION";

/// Destination for structured outputs and human messages
pub trait OutputSink {
    /// Publish a key/value pair for downstream automation.
    fn set_output(&mut self, key: &str, value: &str) -> Result<()>;

    /// Informational message for a human.
    fn notice(&mut self, message: &str);

    /// Error message for a human.
    fn error(&mut self, message: &str);

    /// Release decision for a human.
    fn decision(&mut self, decision: &ReleaseDecision, current: SemVer, next: SemVer) {
        self.notice(&decision.summary(current, next));
    }
}

/// Publish the `BUMPED` and `VERSION` pair.
pub fn report_release(sink: &mut dyn OutputSink, bumped: bool, version: &SemVer) -> Result<()> {
    sink.set_output(BUMPED, if bumped { "true" } else { "false" })?;
    sink.set_output(VERSION, &version.to_string())
}

/// Build the sink selected by the configuration.
pub fn sink_for(config: &Config) -> Box<dyn OutputSink> {
    match config.effective_output() {
        OutputMode::Github => Box::new(GithubActionsSink::new(
            config.ci.github_output.clone(),
            config.ci.github_env.clone(),
            io::stdout(),
        )),
        _ => Box::new(PlainSink::new(io::stdout(), io::stderr())),
    }
}

/// `KEY=value` lines on `out`, styled messages on `err`
pub struct PlainSink<O: Write, E: Write> {
    out: O,
    err: E,
}

impl<O: Write, E: Write> PlainSink<O, E> {
    pub fn new(out: O, err: E) -> Self {
        PlainSink { out, err }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> OutputSink for PlainSink<O, E> {
    fn set_output(&mut self, key: &str, value: &str) -> Result<()> {
        writeln!(self.out, "{}={}", key, value)?;
        Ok(())
    }

    fn notice(&mut self, message: &str) {
        let _ = writeln!(self.err, "{}", ui::status_line(message));
    }

    fn error(&mut self, message: &str) {
        let _ = writeln!(self.err, "{}", ui::error_line(message));
    }

    fn decision(&mut self, decision: &ReleaseDecision, current: SemVer, next: SemVer) {
        let _ = writeln!(self.err, "{}", ui::decision_line(decision, current, next));
    }
}

/// GitHub Actions workflow commands and output files
///
/// Outputs go to the `GITHUB_OUTPUT` file as step outputs and to the
/// `GITHUB_ENV` file as environment exports. Without an output file they are
/// printed on `out` instead.
pub struct GithubActionsSink<W: Write> {
    output_file: Option<PathBuf>,
    env_file: Option<PathBuf>,
    out: W,
}

impl<W: Write> GithubActionsSink<W> {
    pub fn new(output_file: Option<PathBuf>, env_file: Option<PathBuf>, out: W) -> Self {
        GithubActionsSink {
            output_file,
            env_file,
            out,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn command(&mut self, name: &str, message: &str) {
        let _ = writeln!(self.out, "::{}::{}", name, escape_data(message));
    }
}

fn append_line(path: &Path, line: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            MreleaserError::config(format!("Cannot open {}: {}", path.display(), e))
        })?;
    writeln!(file, "{}", line)?;
    Ok(())
}

/// Escape a workflow command message so it stays on one line.
fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

impl<W: Write> OutputSink for GithubActionsSink<W> {
    fn set_output(&mut self, key: &str, value: &str) -> Result<()> {
        let line = format!("{}={}", key, value);

        match &self.output_file {
            Some(path) => append_line(path, &line)?,
            None => writeln!(self.out, "{}", line)?,
        }
        if let Some(path) = &self.env_file {
            append_line(path, &line)?;
        }

        Ok(())
    }

    fn notice(&mut self, message: &str) {
        self.command("notice", message);
    }

    fn error(&mut self, message: &str) {
        self.command("error", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_plain_sink_writes_key_value_lines() {
        let mut sink = PlainSink::new(Vec::new(), Vec::new());
        report_release(&mut sink, true, &SemVer::new(0, 0, 1)).unwrap();
        sink.notice("hello");

        let (out, err) = sink.into_inner();
        assert_eq!(String::from_utf8(out).unwrap(), "BUMPED=true\nVERSION=0.0.1\n");
        assert!(String::from_utf8(err).unwrap().contains("hello"));
    }

    #[test]
    fn test_plain_sink_keeps_decision_off_stdout() {
        let mut sink = PlainSink::new(Vec::new(), Vec::new());
        sink.decision(
            &ReleaseDecision::BumpAvailable,
            SemVer::new(0, 1, 0),
            SemVer::new(0, 2, 0),
        );
        report_release(&mut sink, true, &SemVer::new(0, 2, 0)).unwrap();

        let (out, err) = sink.into_inner();
        assert_eq!(String::from_utf8(out).unwrap(), "BUMPED=true\nVERSION=0.2.0\n");
        let err = String::from_utf8(err).unwrap();
        assert!(err.contains("bump available"));
        assert!(err.contains("0.2.0"));
    }

    #[test]
    fn test_github_sink_reports_decision_as_notice() {
        let mut sink = GithubActionsSink::new(None, None, Vec::new());
        sink.decision(&ReleaseDecision::NoBumpNeeded, SemVer::new(1, 0, 0), SemVer::new(1, 0, 0));

        let printed = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(printed, "::notice::no bump needed (at 1.0.0)\n");
    }

    #[test]
    fn test_github_sink_appends_to_output_and_env_files() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("output");
        let env = dir.path().join("env");
        std::fs::write(&output, "EXISTING=1\n").unwrap();

        let mut sink = GithubActionsSink::new(Some(output.clone()), Some(env.clone()), Vec::new());
        report_release(&mut sink, false, &SemVer::new(1, 2, 3)).unwrap();

        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "EXISTING=1\nBUMPED=false\nVERSION=1.2.3\n"
        );
        assert_eq!(
            std::fs::read_to_string(&env).unwrap(),
            "BUMPED=false\nVERSION=1.2.3\n"
        );
        assert!(sink.into_inner().is_empty());
    }

    #[test]
    fn test_github_sink_without_files_prints_outputs() {
        let mut sink = GithubActionsSink::new(None, None, Vec::new());
        sink.set_output(BUMPED, "true").unwrap();
        sink.error("dirty repository\nsecond line");

        let printed = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            printed,
            "BUMPED=true\n::error::dirty repository%0Asecond line\n"
        );
    }

    #[test]
    fn test_sink_selection_follows_ci_environment() {
        let mut config = Config::default();
        assert_eq!(config.effective_output(), OutputMode::Plain);
        config.ci.github_actions = true;
        assert_eq!(config.effective_output(), OutputMode::Github);
        let _ = sink_for(&config);
    }
}
