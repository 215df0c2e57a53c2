//! Workflow orchestration for the `version` sub-commands
//!
//! Keeps clap and process concerns in `main.rs`; everything here takes an
//! explicit configuration, an output sink and a writer, so it can be driven
//! programmatically and from tests.

use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::cli::{engine_description, usage, VersionAction};
use crate::config::Config;
use crate::error::Result;
use crate::manager::VersionManager;
use crate::output::{report_release, OutputSink};

/// Run one `version` action against the working copy at `directory`.
///
/// `version` and `help` text is written to `out`; decisions, notices and
/// `BUMPED`/`VERSION` go to `sink`.
/// Errors are returned for the caller to report and map to an exit code.
pub fn run(
    action: VersionAction,
    directory: &Path,
    config: Config,
    sink: &mut dyn OutputSink,
    out: &mut dyn Write,
) -> Result<()> {
    debug!(%action, directory = %directory.display(), "running");

    let open = move || VersionManager::discover(directory, config);

    match action {
        VersionAction::Help => {
            writeln!(out, "{}", usage())?;
            writeln!(out, "{}", engine_description())?;
            Ok(())
        }
        VersionAction::Show => {
            writeln!(out, "{}", open()?.current_version()?)?;
            Ok(())
        }
        VersionAction::Needs => {
            let state = open()?.state()?;
            let decision = state.decide();

            sink.decision(&decision, state.current_version, state.next_version);
            let version = if decision.is_bump_available() {
                state.next_version
            } else {
                state.current_version
            };
            report_release(sink, decision.is_bump_available(), &version)?;

            match decision.into_error(state.current_version) {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
        VersionAction::Tag => {
            let manager = open()?;
            match manager.tag() {
                Ok(version) => {
                    let name = manager.tag_name(&version);
                    sink.notice(&format!("Created release tag {}", name));
                    report_release(sink, true, &version)
                }
                Err(e) => {
                    // Outputs are best effort here; the tag error is what gets reported.
                    if let Ok(current) = manager.current_version() {
                        let _ = report_release(sink, false, &current);
                    }
                    Err(e)
                }
            }
        }
    }
}
