use anyhow::Context;
use booksearch_core::Config;
use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;
use std::fs::File;
use std::path::{Path, PathBuf};

mod get;
mod query;
mod tui;

#[derive(Parser)]
#[command(name = "booksearch")]
#[command(about = "Search-as-you-type client for a book search service", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging (the interactive UI only logs with --log-file)
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    /// Write logs to this file instead of stderr
    #[arg(long = "log-file", global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Config file (defaults to ~/.booksearch/config.toml)
    #[arg(long = "config", global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Base URL of the search service (overrides config and BOOKSEARCH_API_URL)
    #[arg(long = "api-url", global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Quiet period before a search is sent, in milliseconds
    #[arg(long = "debounce-ms", global = true, value_name = "MS")]
    debounce_ms: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive search (default)
    Tui,

    /// Run a single search and print the matches
    #[command(alias = "q")]
    Query(query::QueryArgs),

    /// Print the full record for a record id
    Get(get::GetArgs),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let mut cli = Cli::parse();
    let command = cli.command.take().unwrap_or(Commands::Tui);

    init_logger(
        cli.debug,
        cli.log_file.as_deref(),
        matches!(command, Commands::Tui),
    )?;

    let config = resolve_config(&cli)?;
    log::debug!("using {:?}", config);

    match command {
        Commands::Tui => tui::run(&config),
        Commands::Query(args) => query::execute(&args, &config),
        Commands::Get(args) => get::execute(&args, &config),
    }
}

/// Default level is `error` (`debug` with --debug), overridden by RUST_LOG.
/// The interactive UI owns the terminal, so without a log file it stays silent.
fn init_logger(debug: bool, log_file: Option<&Path>, interactive: bool) -> anyhow::Result<()> {
    let default_filter = match (interactive && log_file.is_none(), debug) {
        (true, _) => "off",
        (false, true) => "debug",
        (false, false) => "error",
    };

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter));
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.apply_env();

    if let Some(url) = &cli.api_url {
        config.api_url = url.clone();
    }
    if let Some(ms) = cli.debounce_ms {
        config.debounce_ms = ms;
    }

    config.validate()?;
    Ok(config)
}
