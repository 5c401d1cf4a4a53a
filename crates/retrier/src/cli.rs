//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// retrier - run a command until it succeeds, pausing a fixed delay between attempts
#[derive(Parser, Debug)]
#[command(name = "retrier")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to retrier.yaml config file
    #[arg(short, long, global = true, env = "RETRIER_CONFIG")]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a command with retries
    Run(RunArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

// Run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Named operation whose settings to use from retrier.yaml
    #[arg(short, long)]
    pub operation: Option<String>,

    /// Total number of attempts, the first one included (overrides config)
    #[arg(short = 'n', long)]
    pub attempts: Option<u32>,

    /// Delay between attempts in milliseconds (overrides config)
    #[arg(short, long)]
    pub delay_ms: Option<u64>,

    /// Do not pause after the last failed attempt
    #[arg(long)]
    pub skip_final_pause: bool,

    /// Exit code that counts as success
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub expect_exit: i32,

    /// Text that must appear in the command's stdout for it to count as success
    #[arg(long)]
    pub expect_stdout: Option<String>,

    /// Command to run, followed by its arguments
    #[arg(last = true, required = true, num_args = 1..)]
    pub command: Vec<String>,
}

// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a retrier.yaml with the default settings
    Init(ConfigInitArgs),

    /// Validate a configuration file
    Validate(ConfigValidateArgs),

    /// Show the effective settings
    Show(ConfigShowArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file
    #[arg(short, long, default_value = "retrier.yaml")]
    pub output: Utf8PathBuf,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ConfigValidateArgs {
    /// Config file to validate (defaults to --config or the discovered retrier.yaml)
    pub file: Option<Utf8PathBuf>,
}

#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Show the settings a named operation resolves to
    #[arg(short, long)]
    pub operation: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
