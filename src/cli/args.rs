//! CLI argument definitions
//!
//! All Clap derive structs for `enigma` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::observability::LogFormat;
use crate::session::DEFAULT_GROUP_SIZE;

// ============================================================================
// Root CLI
// ============================================================================

/// Rotor cipher machine simulator.
#[derive(Parser, Debug)]
#[command(name = "enigma", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "ENIGMA_COLOR")]
    pub color: ColorChoice,

    /// Log line format on stderr.
    #[arg(long, default_value = "human", global = true, env = "ENIGMA_LOG_FORMAT")]
    pub log_format: LogFormat,
}

// ============================================================================
// Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encode or decode messages with a configured machine.
    Run(RunArgs),

    /// Validate configuration files without encoding anything.
    Validate(ValidateArgs),

    /// List the rotors a configuration defines.
    Rotors(RotorsArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

/// Arguments for `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Machine configuration file.
    #[arg(env = "ENIGMA_CONFIG")]
    pub config: PathBuf,

    /// Input file with setting directives and messages (default: stdin).
    pub input: Option<PathBuf>,

    /// Output file for processed messages (default: stdout).
    pub output: Option<PathBuf>,

    /// Print the signal path of every symbol to stderr.
    #[arg(long)]
    pub trace: bool,

    /// Format of `--trace` output.
    #[arg(long, default_value = "human", requires = "trace")]
    pub trace_format: TraceFormat,

    /// Symbols per output group (0 disables grouping).
    #[arg(long, default_value_t = DEFAULT_GROUP_SIZE)]
    pub group_size: usize,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Configuration files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Enable strict validation (warnings become errors).
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for `rotors`.
#[derive(Args, Debug)]
pub struct RotorsArgs {
    /// Machine configuration file.
    #[arg(env = "ENIGMA_CONFIG")]
    pub config: PathBuf,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Rendering of the per-symbol trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TraceFormat {
    /// `[AXLE] F -> ... -> Q` lines.
    #[default]
    Human,
    /// JSON lines with a sequence number, session events included.
    Json,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(argv: &[&str]) -> RunArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Run(args) => args,
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn run_with_config_only() {
        let args = run_args(&["enigma", "run", "default.conf"]);
        assert_eq!(args.config, PathBuf::from("default.conf"));
        assert!(args.input.is_none());
        assert!(args.output.is_none());
        assert!(!args.trace);
        assert_eq!(args.group_size, 5);
    }

    #[test]
    fn run_with_input_and_output() {
        let args = run_args(&["enigma", "run", "a.conf", "in.txt", "out.txt"]);
        assert_eq!(args.input, Some(PathBuf::from("in.txt")));
        assert_eq!(args.output, Some(PathBuf::from("out.txt")));
    }

    #[test]
    fn run_trace_options() {
        let args = run_args(&[
            "enigma",
            "run",
            "a.conf",
            "--trace",
            "--trace-format",
            "json",
            "--group-size",
            "4",
        ]);
        assert!(args.trace);
        assert_eq!(args.trace_format, TraceFormat::Json);
        assert_eq!(args.group_size, 4);
    }

    #[test]
    fn trace_format_requires_trace() {
        let result = Cli::try_parse_from(["enigma", "run", "a.conf", "--trace-format", "json"]);
        assert!(result.is_err());
    }

    #[test]
    fn validate_requires_files() {
        let result = Cli::try_parse_from(["enigma", "validate"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["enigma", "rotors", "a.conf", "-vv", "--color", "never"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.color, ColorChoice::Never);
        assert_eq!(cli.log_format, LogFormat::Human);
    }

    #[test]
    fn help_output() {
        let err = Cli::try_parse_from(["enigma", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn version_output() {
        let err = Cli::try_parse_from(["enigma", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn completions_shell_names() {
        let cli = Cli::try_parse_from(["enigma", "completions", "powershell"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Completions(CompletionsArgs {
                shell: Shell::PowerShell
            })
        ));
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
