use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dp_cli::commands::{add, edit, list, summarize, timesheet};
use dp_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    match command {
        Commands::Summarize(args) => summarize::run(args, &config)?,
        Commands::Timesheet(args) => timesheet::run(args, &config)?,
        Commands::Add(args) => add::run(args, &config)?,
        Commands::List(args) => list::run(args, &config)?,
        Commands::Split(args) => edit::run_split(args, &config)?,
        Commands::Move(args) => edit::run_move(args, &config)?,
        Commands::Resize(args) => edit::run_resize(args, &config)?,
        Commands::Remove(args) => edit::run_remove(args, &config)?,
    }

    Ok(())
}
