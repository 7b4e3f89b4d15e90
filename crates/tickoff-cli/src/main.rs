mod cli;
mod config;
mod storage;
mod tasks;
mod tui;

use std::{
    fs::{self, OpenOptions},
    io,
    sync::Mutex,
};

use crate::cli::{Command, ConfigCommand};
use clap::Parser;
use color_eyre::Result;
use tickoff_core::storage::KeyValueStore;
use tickoff_task::TaskBoard;
use tracing_subscriber::{
    fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const LOG_FILE: &str = "tickoff.log";

/// Entry point wiring the CLI to the TUI and the scripting commands.
fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = cli::Cli::parse();
    let mut config = config::load()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }
    let command = cli.command.unwrap_or(Command::Tui);
    init_tracing(&config, command == Command::Tui);

    match command {
        Command::Tui => tui::launch(open_board(&config, cli.ephemeral)?)?,
        Command::Version => print_version(),
        Command::Health => run_health_check(&config, cli.ephemeral)?,
        Command::Config(ConfigCommand::Init) => init_config(&config)?,
        Command::Task(cmd) => {
            let mut board = open_board(&config, cli.ephemeral)?;
            tasks::handle(cmd, &mut board, &mut io::stdout().lock())?
        }
        Command::Theme(cmd) => {
            let mut board = open_board(&config, cli.ephemeral)?;
            tasks::handle_theme(cmd, &mut board, &mut io::stdout().lock())?
        }
    }

    Ok(())
}

/// The TUI owns the terminal, so its logs go to a file in the data dir.
fn init_tracing(config: &config::Config, tui: bool) {
    let default_level = config
        .log_level
        .clone()
        .unwrap_or_else(|| if tui { "info" } else { "warn" }.to_string());
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let (writer, ansi) = if tui {
        (tui_log_writer(config), false)
    } else {
        (BoxMakeWriter::new(io::stderr), true)
    };
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(writer);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn tui_log_writer(config: &config::Config) -> BoxMakeWriter {
    let file = storage::resolve_data_dir(config).ok().and_then(|dir| {
        fs::create_dir_all(&dir).ok()?;
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(LOG_FILE))
            .ok()
    });
    match file {
        Some(file) => BoxMakeWriter::new(Mutex::new(file)),
        None => BoxMakeWriter::new(io::sink),
    }
}

fn print_version() {
    println!("tickoff {}", env!("CARGO_PKG_VERSION"));
}

fn open_board(config: &config::Config, ephemeral: bool) -> Result<TaskBoard<storage::SharedStore>> {
    let store = storage::store_from_config(config, ephemeral)?;
    Ok(TaskBoard::open(store))
}

/// Runs a quick write/read/remove probe against the configured store.
fn run_health_check(config: &config::Config, ephemeral: bool) -> Result<()> {
    let store = storage::store_from_config(config, ephemeral)?;
    run_store_health(store.as_ref())?;
    if !ephemeral {
        println!("Data dir: {}", storage::resolve_data_dir(config)?.display());
    }
    println!("Storage: ok");
    Ok(())
}

fn run_store_health(store: &dyn KeyValueStore) -> Result<()> {
    let probe_key = "health-probe";
    let payload = "ok";
    store.set(probe_key, payload)?;
    let round_trip = store.get(probe_key)?;
    store.remove(probe_key)?;

    if round_trip != payload {
        color_eyre::eyre::bail!("storage round-trip failed");
    }
    Ok(())
}

fn init_config(config: &config::Config) -> Result<()> {
    let path = config::write_default_if_missing(config)?;
    println!("Config initialized at {}", path.display());
    Ok(())
}
