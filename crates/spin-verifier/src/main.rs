// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! CLI for spin-verifier
//!
//! Checks a captured `PrintAssembly` log for the `Thread.onSpinWait()` intrinsic.
//!
//! # Usage
//!
//! ```bash
//! java -XX:+UnlockDiagnosticVMOptions -XX:+PrintAssembly \
//!      -XX:OnSpinWaitInst=isb -XX:OnSpinWaitInstCount=3 ... > out.log
//! spin-verifier --log out.log isb 3
//!
//! # Counter-delay idiom, log on stdin
//! cat out.log | spin-verifier counter 14
//! ```

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use spin_verifier::{ExpectedPattern, Markers, OutputLog, Verifier};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "spin-verifier", version, about)]
struct Cli {
    /// Spin wait instruction: nop, isb, yield or counter.
    kind: String,

    /// Instruction count, or the delay for `counter`. Defaults to 1 for hints.
    value: Option<String>,

    /// Log file to read. Reads stdin when omitted.
    #[arg(long)]
    log: Option<PathBuf>,

    /// Full method signature that starts the body.
    #[arg(long)]
    method_header: Option<String>,

    /// Qualified class name that starts the body in counter mode.
    #[arg(long)]
    method_name: Option<String>,

    /// Comment marking the onSpinWait call site.
    #[arg(long)]
    call_site: Option<String>,

    /// Scope line expected right after the call site.
    #[arg(long)]
    call_site_continuation: Option<String>,

    /// Suppress all logging output.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Enable debug-level logging.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn markers(&self) -> Markers {
        let defaults = Markers::default();
        Markers {
            method_header: self.method_header.clone().unwrap_or(defaults.method_header),
            method_name: self.method_name.clone().unwrap_or(defaults.method_name),
            call_site: self.call_site.clone().unwrap_or(defaults.call_site),
            call_site_continuation: self
                .call_site_continuation
                .clone()
                .unwrap_or(defaults.call_site_continuation),
            body_terminators: defaults.body_terminators,
        }
    }

    fn read_log(&self) -> Result<OutputLog> {
        match &self.log {
            Some(path) => OutputLog::from_path(path)
                .with_context(|| format!("failed to read {}", path.display())),
            None => OutputLog::read(io::stdin().lock())
                .context("failed to read stdin"),
        }
    }
}

/// Initialize tracing subscriber with environment-based filtering.
fn init_tracing(quiet: bool, verbose: bool) {
    let filter = if quiet {
        EnvFilter::new("off")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    if let Err(err) = run(&cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let pattern = ExpectedPattern::from_args(&cli.kind, cli.value.as_deref())?;
    let log = cli.read_log()?;
    info!(lines = log.len(), %pattern, "verifying");

    Verifier::with_markers(&log, cli.markers())
        .verify(&pattern)
        .with_context(|| format!("{pattern} not found in compiler output"))?;

    println!("ok: {pattern}");
    Ok(())
}
