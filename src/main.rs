use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let (header_path, output_path) = parse_args()?;

    let header = fs::read_to_string(&header_path)
        .with_context(|| format!("failed to read {}", header_path.display()))?;

    let module = meos_bindgen::generate_bindings(&header)?;

    match output_path {
        Some(path) => {
            fs::write(&path, &module.source)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(output = %path.display(), "wrote generated module");
        }
        None => print!("{}", module.source),
    }

    Ok(())
}

fn parse_args() -> Result<(PathBuf, Option<PathBuf>)> {
    let mut args = std::env::args_os().skip(1);
    let header = args
        .next()
        .map(PathBuf::from)
        .context("usage: meos-bindgen <header.h> [output.rs]")?;
    let output = args.next().map(PathBuf::from);
    anyhow::ensure!(
        args.next().is_none(),
        "usage: meos-bindgen <header.h> [output.rs]"
    );
    Ok((header, output))
}
