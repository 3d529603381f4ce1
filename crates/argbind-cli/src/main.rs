//! Argbind CLI - check argument lists against positional schemas
//!
//! This is the main entry point for the argbind command-line interface.
//! It loads configuration, sets up logging and dispatches subcommands.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands, OutputFormat};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Configuration feeds logging, so it is loaded first
    let config = match Config::load_with_file(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", error::format_error(&e, cli.use_color()));
            process::exit(e.exit_code());
        }
    };

    // Set up colored output
    control::set_override(config.output.color && cli.use_color());

    // Initialize logging
    if let Err(e) = init_logging(&cli, &config) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    // Run the application
    let result = run(cli, &config);

    // Handle the result
    match result {
        Ok(()) => {
            process::exit(0);
        }
        Err(e) => {
            eprintln!(
                "{}",
                error::format_error(&e, control::SHOULD_COLORIZE.should_colorize())
            );

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip(cli, config), fields(command = ?cli.command))]
fn run(cli: Cli, config: &Config) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let format = output_format(&cli, config);
    let mut output = OutputWriter::new(
        format,
        control::SHOULD_COLORIZE.should_colorize(),
        cli.quiet,
    );

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        format = ?format,
        "Executing command"
    );

    // Handle the subcommand
    match cli.command {
        Commands::Check(args) => handlers::handle_check(args, config, &mut output),
        Commands::Explain(args) => handlers::handle_explain(args, config, &mut output),
        Commands::Config(args) => handlers::handle_config(args, config, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// The `-o` flag wins over the configured format; unknown names fall back to human
fn output_format(cli: &Cli, config: &Config) -> OutputFormat {
    cli.output.unwrap_or_else(|| {
        OutputFormat::from_name(&config.output.format).unwrap_or_else(|| {
            tracing::warn!(format = %config.output.format, "unknown output format in config");
            OutputFormat::Human
        })
    })
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    // Start from CLI verbosity, then layer the config file and environment
    let mut logging_config = LoggingConfig::from_verbosity(cli.verbosity_level());
    logging_config.merge_with_file(&config.logging, cli.verbosity_level());
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}
