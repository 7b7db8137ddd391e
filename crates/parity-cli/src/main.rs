mod cli;
mod commands;
mod config;
mod storage;

use std::io;

use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Command, ConfigCommand};

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = cli::Cli::parse();
    let overrides = config::Overrides {
        dir: cli.dir,
        file_name: cli.file_name,
    };
    match cli.command.unwrap_or(Command::Status) {
        Command::Version => print_version(),
        Command::Config(ConfigCommand::Init) => init_config()?,
        command => {
            let keystore = config::load(&overrides)?;
            let mut store = storage::open_store(&keystore)?;
            let stdout = io::stdout();
            commands::run(command, &mut store, &mut stdout.lock())?;
        }
    }

    Ok(())
}

fn init_tracing() {
    // Respect user-provided filters; logs go to stderr so stdout stays pipeable.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(io::stderr);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn print_version() {
    println!("parity {}", env!("CARGO_PKG_VERSION"));
}

fn init_config() -> Result<()> {
    let (path, created) = config::init(&config::Config::default())?;
    if created {
        println!("Config initialized at {}", path.display());
    } else {
        println!("Config already exists at {}", path.display());
    }
    Ok(())
}
