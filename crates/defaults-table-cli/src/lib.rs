use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use defaults_table_config::{Config, LoadOptions};
use defaults_table_core::DefaultsTable;
use defaults_table_format::OutputFormat;
use defaults_table_ops::{
    GenerateOptions, GenerateOutcome, OperationError, Operations, SyncMode, SyncOptions,
    SyncOutcome,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "DEFAULTS_TABLE_LOG";

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut load = LoadOptions::default();
    if let Some(path) = cli.config {
        load = load.with_override_path(path);
    }
    let config = Config::load(load)?;

    let engine = DefaultsTable::bootstrap(config);
    let ops = engine.operations();
    for layer in &ops.config().sources.layers {
        debug!(kind = %layer.kind, path = ?layer.path, "config layer");
    }

    match cli.command {
        None => handle_render(ops, RenderArgs::default()),
        Some(Command::Render(args)) => handle_render(ops, args),
        Some(Command::Sync(args)) => handle_sync(ops, args),
        Some(Command::List) => handle_list(ops),
    }
}

/// Maps `-v` occurrences to a tracing directive; `DEFAULTS_TABLE_LOG` wins when set.
fn init_logging(verbosity: u8) {
    let directive = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .try_init();
}

fn handle_render(ops: &Operations, args: RenderArgs) -> Result<i32> {
    let RenderArgs { format, output } = args;

    let format = match format.unwrap_or(FormatValue::Markdown) {
        FormatValue::Markdown => OutputFormat::Markdown,
        FormatValue::Json => OutputFormat::Json,
    };

    let options = GenerateOptions {
        format,
        output_path: output,
    };
    let GenerateOutcome {
        rendered,
        written_to,
        ..
    } = ops.generate(options)?;

    if written_to.is_none() {
        emit(&rendered)?;
    }
    Ok(0)
}

fn handle_sync(ops: &Operations, args: SyncArgs) -> Result<i32> {
    let SyncArgs {
        path,
        check: _,
        update,
        diff,
        quiet,
    } = args;

    let mode = if update {
        SyncMode::Update
    } else if diff {
        SyncMode::Diff
    } else {
        SyncMode::Check
    };

    let options = SyncOptions { path, mode, quiet };
    match ops.sync(options) {
        Ok(SyncOutcome {
            rendered,
            exit_code,
            ..
        }) => {
            if !rendered.is_empty() {
                emit(&rendered)?;
            }
            Ok(exit_code)
        }
        Err(err @ OperationError::MarkersNotFound { .. }) => {
            eprintln!("{err}");
            Ok(2)
        }
        Err(err @ OperationError::Io { .. }) => {
            eprintln!("{err}");
            Ok(4)
        }
        Err(err) => Err(err.into()),
    }
}

fn handle_list(ops: &Operations) -> Result<i32> {
    let mut listing = String::new();
    for entry in ops.entries() {
        listing.push_str(entry.name);
        listing.push('\n');
    }
    emit(&listing)?;
    Ok(0)
}

fn emit(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    let mut write = || -> io::Result<()> {
        handle.write_all(content.as_bytes())?;
        if !content.ends_with('\n') {
            handle.write_all(b"\n")?;
        }
        handle.flush()
    };

    match write() {
        Ok(()) => Ok(()),
        Err(err) if should_ignore_pipe_error(&err) => Ok(()),
        Err(err) => Err(err).context("Failed to write to stdout"),
    }
}

fn should_ignore_pipe_error(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::BrokenPipe | io::ErrorKind::WouldBlock
    )
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Generate the tsconfig option defaults table",
    propagate_version = true
)]
struct Cli {
    /// Load this config file on top of discovered `.defaults-table.toml` layers
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the defaults table (the default when no command is given)
    Render(RenderArgs),
    /// Synchronise the generated block embedded in a markdown document
    Sync(SyncArgs),
    /// List option names in table order
    List,
}

#[derive(Args, Default)]
struct RenderArgs {
    /// Output format (markdown or json)
    #[arg(long, value_enum)]
    format: Option<FormatValue>,
    /// Write to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct SyncArgs {
    /// Markdown document containing the marker block
    #[arg(value_name = "FILE")]
    path: PathBuf,
    /// Report whether the block is stale without modifying it (default)
    #[arg(long, conflicts_with_all = ["update", "diff"])]
    check: bool,
    /// Rewrite the block in place
    #[arg(long, conflicts_with_all = ["check", "diff"])]
    update: bool,
    /// Print a unified diff for a stale block
    #[arg(long, conflicts_with_all = ["check", "update"])]
    diff: bool,
    /// Suppress output when nothing changes
    #[arg(long)]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatValue {
    Markdown,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_render() {
        let cli = Cli::try_parse_from(["defaults-table"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn sync_modes_conflict() {
        assert!(Cli::try_parse_from(["defaults-table", "sync", "README.md", "--update", "--diff"]).is_err());
    }

    #[test]
    fn verbosity_counts_repeats() {
        let cli = Cli::try_parse_from(["defaults-table", "-vv", "list"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
