//! Aion CLI — command-line front end for the Aion Verilog-2001 elaboration engine.
//!
//! Provides `aion elaborate`, which loads a project's configuration, parses
//! its Verilog sources, elaborates the design hierarchy, and reports
//! diagnostics.

#![warn(missing_docs)]

mod elaborate;
mod pipeline;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Aion — a Verilog-2001 elaboration front end.
#[derive(Parser, Debug)]
#[command(name = "aion", version, about = "Aion Verilog-2001 elaboration front end")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output, including elaboration phase timing.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `aion.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse and elaborate the current project.
    Elaborate,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let color = match cli.color {
        ColorChoice::Auto => atty_is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Elaborate => elaborate::run(&global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs a `tracing` subscriber writing to stderr; `-v` enables debug-level
/// elaboration phase spans, otherwise only warnings and above are shown.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::new(if verbose { "debug" } else { "warn" });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Rough terminal detection — checks if stdout is a terminal.
fn atty_is_terminal() -> bool {
    // Use a simple heuristic: check the TERM env var.
    // In a real build we'd use the `is-terminal` crate, but this is
    // sufficient for now.
    std::env::var("TERM").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_elaborate_default() {
        let cli = Cli::parse_from(["aion", "elaborate"]);
        assert!(matches!(cli.command, Command::Elaborate));
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["aion", "--quiet", "--color", "never", "elaborate"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn parse_verbose_flag() {
        let cli = Cli::parse_from(["aion", "--verbose", "elaborate"]);
        assert!(cli.verbose);
        assert!(!cli.quiet);
    }

    #[test]
    fn parse_color_always() {
        let cli = Cli::parse_from(["aion", "--color", "always", "elaborate"]);
        assert_eq!(cli.color, ColorChoice::Always);
    }

    #[test]
    fn parse_color_auto() {
        let cli = Cli::parse_from(["aion", "--color", "auto", "elaborate"]);
        assert_eq!(cli.color, ColorChoice::Auto);
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::parse_from(["aion", "--config", "/path/to/aion.toml", "elaborate"]);
        assert_eq!(cli.config.as_deref(), Some("/path/to/aion.toml"));
    }
}
