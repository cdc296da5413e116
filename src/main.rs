//! cad-prompt-mcp: MCP server that turns free-text shape prompts into CAD geometry.
//!
//! Run without arguments to serve MCP over stdio, or pass `--prompt` to
//! interpret a single prompt and print the result.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use cad_prompt_mcp::config::{self, Config};
use cad_prompt_mcp::mcp::server::McpServer;
use cad_prompt_mcp::prompt::{self, UNKNOWN_SHAPE_HELP};
use cad_prompt_mcp::recipe::recipe_for_parsed;

/// MCP server that turns free-text shape prompts into parametric CAD
/// sketches and features.
#[derive(Parser, Debug)]
#[command(name = "cad-prompt-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Interpret one prompt, print it as JSON and exit
    #[arg(short, long, value_name = "TEXT")]
    prompt: Option<String>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN,
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Prints the interpretation of `text` to stdout.
fn print_prompt(text: &str) -> ExitCode {
    let Some(parsed) = prompt::parse(text) else {
        eprintln!("{UNKNOWN_SHAPE_HELP}");
        return ExitCode::FAILURE;
    };

    let mut value = match serde_json::to_value(parsed) {
        Ok(value) => value,
        Err(e) => {
            error!(error = %e, "Failed to serialise shape");
            return ExitCode::FAILURE;
        }
    };
    value["label"] = recipe_for_parsed(&parsed).label.into();

    match serde_json::to_string_pretty(&value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Failed to serialise shape");
            ExitCode::FAILURE
        }
    }
}

/// Serves MCP over stdio until the client disconnects or a signal arrives.
fn serve(cfg: &Config) -> ExitCode {
    // Display GPL license notice (required by GPLv3 Section 5d)
    eprintln!(
        "cad-prompt-mcp {}  Copyright (C) 2026  The Embedded Society",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!("This program comes with ABSOLUTELY NO WARRANTY.");
    eprintln!("This is free software, licensed under GPL-3.0-or-later.");
    eprintln!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
    eprintln!();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        template = ?cfg.template_path,
        stack_by_default = cfg.session.stack_by_default,
        "Starting cad-prompt-mcp server"
    );

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to create Tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(async {
        let mut server = McpServer::new(cfg);
        info!("MCP server ready, waiting for client connection...");
        server.run().await
    });

    match result {
        Ok(()) => {
            info!("Server shut down gracefully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}

/// Entry point for the cad-prompt-mcp server.
fn main() -> ExitCode {
    let args = Args::parse();

    let config_path = args.config.as_deref();
    let cfg = match config::load_config_or_default(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    match args.prompt.as_deref() {
        Some(text) => print_prompt(text),
        None => serve(&cfg),
    }
}
