use std::process::ExitCode;

use anyhow::Context;
use shell::NativePlatform;
use skeleton::{driver, Config, Session};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let argv: Vec<String> = std::env::args().collect();
    let mut session = Session::new(NativePlatform::new(), Config::default(), argv);

    session.load().context("failed to load")?;
    driver::run(&mut session).context("frame failed")?;
    session.unload();

    Ok(())
}
