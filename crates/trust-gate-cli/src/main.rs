// crates/trust-gate-cli/src/main.rs
// ============================================================================
// Module: Trust Gate CLI Entry Point
// Description: Command dispatch for the trust-gate binary.
// Purpose: Serve the HTTP decision boundary and validate configuration.
// Dependencies: clap, tokio, trust-gate-config, trust-gate-server
// ============================================================================

//! ## Overview
//! `trust-gate` loads a `trust-gate.toml`, builds the HTTP providers, and
//! serves authorization decisions until interrupted. `config validate` checks a
//! file without serving and `config example` prints a starting point.
//!
//! Security posture: config files are untrusted input and are validated before
//! any listener is bound.


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use thiserror::Error;
use tokio::net::TcpListener;
use trust_gate_cli::t;
use trust_gate_config::TrustGateConfig;
use trust_gate_config::config_toml_example;
use trust_gate_server::TrustGateServer;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level command line.
#[derive(Parser, Debug)]
#[command(name = "trust-gate", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print the version and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Subcommand to run.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve authorization decisions over HTTP.
    Serve(ServeCommand),
    /// Configuration utilities.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `serve`.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Optional config file path (defaults to trust-gate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a config file without serving.
    Validate(ConfigValidateCommand),
    /// Print an example config file.
    Example,
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to trust-gate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI failure carrying a rendered message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Rendered message.
    message: String,
}

impl CliError {
    /// Wraps a rendered message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Parses arguments and dispatches.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    if cli.show_version {
        write_stdout_line(&t!("main.version", version = env!("CARGO_PKG_VERSION")))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }
    match cli.command {
        Some(Commands::Serve(command)) => command_serve(command).await,
        Some(Commands::Config {
            command,
        }) => command_config(command),
        None => {
            show_help()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Serve
// ============================================================================

/// Runs the HTTP server until interrupted.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let config = TrustGateConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("serve.config.load_failed", error = err)))?;
    let addr = config
        .server
        .bind_addr()
        .map_err(|err| CliError::new(t!("serve.config.load_failed", error = err)))?;
    let server = TrustGateServer::from_config(config)
        .map_err(|err| CliError::new(t!("serve.init_failed", error = err)))?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|err| CliError::new(t!("serve.failed", error = err)))?;
    let bound = listener.local_addr().unwrap_or(addr);
    write_stderr_line(&t!("serve.listening", bind = bound))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    server
        .serve_listener(listener, shutdown_signal())
        .await
        .map_err(|err| CliError::new(t!("serve.failed", error = err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Resolves on Ctrl-C; never resolves when the signal cannot be installed.
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

// ============================================================================
// SECTION: Config
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
        ConfigCommand::Example => {
            write_stdout_line(config_toml_example().trim_end())
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Loads and validates a config file.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    TrustGateConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    write_stdout_line(&t!("config.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output
// ============================================================================

/// Writes one line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{message}")
}

/// Writes one line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr().lock();
    writeln!(stderr, "{message}")
}

/// Renders an output failure for `stream`.
fn output_error(stream: &str, err: &std::io::Error) -> String {
    let label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = label, error = err)
}

/// Reports `message` on stderr and returns a failing exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
