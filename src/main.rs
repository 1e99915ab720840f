//! `logbus` command-line front end.
//!
//! Logs its arguments, or each line of stdin when none are given, through the
//! sinks named in the configuration file.
//!
//! ```text
//! logbus [--config FILE] [--channel NAME] [--level SIGNAL] [MESSAGE...]
//! ```

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use logbus::config::{load_config, LogbusConfig};
use logbus::lifecycle::signals::wait_for_signal;
use logbus::observability::logging::init_diagnostics;
use logbus::{ConsoleSink, FileSink, LevelRegistry, LogLevel, Logger, Provider, Shutdown, Sink};

#[derive(Debug, Parser)]
#[command(name = "logbus", version, about = "Leveled logging to console and files")]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Channel name; overrides the configured one.
    #[arg(long)]
    channel: Option<String>,

    /// Level signal (case-insensitive).
    #[arg(short, long, default_value = "INFO")]
    level: String,

    /// Messages joined into one record. Reads stdin when empty.
    messages: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("logbus: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => LogbusConfig::default(),
    };
    init_diagnostics(&config.diagnostics.filter)?;

    let level = LevelRegistry::default()
        .lookup(&cli.level)
        .cloned()
        .ok_or_else(|| format!("unknown level '{}'", cli.level))?;

    let provider = Provider::new(config.format.provider_options());
    let shutdown = Shutdown::new();

    let _console = config.console.enabled.then(|| {
        let sink = ConsoleSink::new(config.console.to_options());
        sink.on(&provider);
        sink
    });

    if config.file.enabled {
        let sink = Arc::new(FileSink::new(config.file.to_options())?);
        sink.on(&provider);
        shutdown.on_shutdown("file", sink);
    }

    tracing::debug!(
        console = config.console.enabled,
        file = config.file.enabled,
        style = ?config.format.style,
        "Sinks attached"
    );

    let channel = cli.channel.or(config.channel);
    let logger = provider.create_logger(channel.as_deref());

    if cli.messages.is_empty() {
        log_stdin(&logger, &level).await?;
    } else {
        logger.log(&level, cli.messages);
    }

    shutdown.drain().await?;
    Ok(())
}

/// Log each stdin line until EOF or a stop signal.
async fn log_stdin(logger: &Logger, level: &LogLevel) -> io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let stop = wait_for_signal();
    tokio::pin!(stop);

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => logger.log(level, [line]),
                None => return Ok(()),
            },
            signal = &mut stop => {
                let signal = signal?;
                tracing::info!(?signal, "Stopping");
                return Ok(());
            }
        }
    }
}
