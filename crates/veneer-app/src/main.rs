//! VENEER terminal driver.
//!
//! Reads lines from stdin, submits each one to the interaction engine, and
//! writes the resulting output batch to stdout. `--json` switches to one JSON
//! object per output line for embedding in another UI.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use veneer_terminal::InteractionEngine;
use veneer_types::config::ShellConfig;
use veneer_types::output::{OutputBatch, OutputKind};

const USAGE: &str = "usage: veneer [--config <path>] [--json]";

struct Options {
    config: Option<PathBuf>,
    json: bool,
}

fn parse_args() -> Result<Options> {
    let mut opts = Options {
        config: None,
        json: false,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => opts.json = true,
            "--config" => {
                let path = args.next().context("--config needs a path")?;
                opts.config = Some(PathBuf::from(path));
            },
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            },
            other => bail!("unknown argument: {other}\n{USAGE}"),
        }
    }
    // Fall back to VENEER_CONFIG when no --config was given.
    if opts.config.is_none() {
        opts.config = std::env::var_os("VENEER_CONFIG").map(PathBuf::from);
    }
    Ok(opts)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let opts = parse_args()?;
    let config = match &opts.config {
        Some(path) => ShellConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ShellConfig::default(),
    };
    log::info!("Starting VENEER as {}@{}", config.user, config.hostname);

    let mut engine = InteractionEngine::new(config)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    if !opts.json {
        write_prompt(&mut stdout, &engine)?;
    }
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        let batch = engine.submit(&line);
        if opts.json {
            write_json(&mut stdout, &batch)?;
        } else {
            write_plain(&mut stdout, &batch)?;
            write_prompt(&mut stdout, &engine)?;
        }
    }
    log::info!("stdin closed after {} lines", engine.history().len());
    Ok(())
}

fn write_prompt(out: &mut impl Write, engine: &InteractionEngine) -> Result<()> {
    write!(out, "{}", engine.prompt())?;
    out.flush()?;
    Ok(())
}

/// Output lines only; the typed line is already on screen.
fn write_plain(out: &mut impl Write, batch: &OutputBatch) -> Result<()> {
    for line in batch {
        match line.kind {
            OutputKind::CommandEcho | OutputKind::InputEcho => {},
            OutputKind::System | OutputKind::Error => writeln!(out, "{}", line.text)?,
        }
    }
    Ok(())
}

fn write_json(out: &mut impl Write, batch: &OutputBatch) -> Result<()> {
    for line in batch {
        serde_json::to_writer(&mut *out, line)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}
