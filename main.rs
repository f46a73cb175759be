use std::env;
use std::io::{self, Write};
use std::process;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use hapax::{cli, TallyConfig};

fn main() -> Result<()> {
    // logs go to stderr; stdout carries only the report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hapax=error")),
        )
        .with_writer(io::stderr)
        .init();

    let config = TallyConfig::from_env().context("reading configuration")?;

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();
    let status = cli::run(env::args().skip(1), &config, &mut out, &mut err)?;
    out.flush()?;

    process::exit(status);
}
