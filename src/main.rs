use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use mreleaser::cli::orchestration;
use mreleaser::cli::{usage, Args, Command, VersionAction};
use mreleaser::config::{self, CiEnvironment, Config};
use mreleaser::output;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let ci = CiEnvironment::from_process();
    let directory = args.working_directory();

    // Reports anything that happens before the configuration is usable.
    let mut fallback = Config::default().with_ci(ci.clone());
    args.apply_overrides(&mut fallback);

    let Command::Version { action } = &args.command;
    let action = match VersionAction::parse(action.as_deref()) {
        Ok(action) => action,
        Err(e) => {
            output::sink_for(&fallback).error(&e.to_string());
            eprintln!("{}", usage());
            return ExitCode::from(e.exit_code());
        }
    };

    let loaded = config::load_config(args.config.as_deref(), &directory)
        .context("Error loading config");
    let config = match loaded {
        Ok(config) => {
            let mut config = config.with_ci(ci);
            args.apply_overrides(&mut config);
            config
        }
        Err(e) if action == VersionAction::Help => {
            debug!(error = %format!("{:#}", e), "ignoring configuration for help");
            fallback
        }
        Err(e) => {
            output::sink_for(&fallback).error(&format!("{:#}", e));
            return ExitCode::FAILURE;
        }
    };
    debug!(output = ?config.effective_output(), remote = %config.remote, "configuration loaded");

    let mut sink = output::sink_for(&config);
    let mut stdout = io::stdout();

    match orchestration::run(action, &directory, config, sink.as_mut(), &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            sink.error(&e.to_string());
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mreleaser={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}
