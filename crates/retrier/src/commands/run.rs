//! Run command

use anyhow::{anyhow, Context, Result};
use camino::Utf8Path;
use retrier_core::retry::{RetryPolicyBuilder, TracingObserver};
use retrier_core::{RetryConfig, RetrySettings};
use std::io::{self, Write};
use std::process::{Command, Stdio};

use crate::cli::RunArgs;
use crate::output;

/// Exit code for an interrupted session (128 + SIGINT)
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// What one attempt of the command produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Exit code, `None` if the process was killed by a signal
    pub exit_code: Option<i32>,
    /// Captured stdout, lossily decoded
    pub stdout: String,
}

/// What counts as a successful run
#[derive(Debug, Clone)]
pub struct Expectation {
    pub exit_code: i32,
    pub stdout_contains: Option<String>,
}

impl Expectation {
    pub fn is_met_by(&self, outcome: &CommandOutcome) -> bool {
        outcome.exit_code == Some(self.exit_code)
            && self
                .stdout_contains
                .as_deref()
                .is_none_or(|text| outcome.stdout.contains(text))
    }
}

pub fn run(args: RunArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config =
        RetryConfig::resolve(config_path).context("Failed to load retry configuration")?;
    let settings = effective_settings(config.settings_for(args.operation.as_deref()), &args);

    let (program, program_args) = args
        .command
        .split_first()
        .ok_or_else(|| anyhow!("No command given"))?;
    let operation = args.operation.clone().unwrap_or_else(|| program.clone());
    let expectation = Expectation {
        exit_code: args.expect_exit,
        stdout_contains: args.expect_stdout.clone(),
    };

    tracing::info!(
        operation = %operation,
        max_attempts = settings.max_attempts,
        delay_ms = settings.delay_ms,
        "running with retries"
    );

    let policy = RetryPolicyBuilder::from_settings(&settings)
        .is_valid(move |outcome: &CommandOutcome| expectation.is_met_by(outcome))
        .observer(TracingObserver::new(operation.clone()))
        .build();

    // Without a pause there is nothing to interrupt; keep the default SIGINT behavior
    if can_pause(&settings) {
        let handle = policy.interrupt_handle();
        ctrlc::set_handler(move || handle.interrupt())
            .context("Failed to install Ctrl-C handler")?;
    }

    match policy.execute_with_retry(|| run_once(program, program_args)) {
        Ok(outcome) => {
            io::stdout().write_all(outcome.stdout.as_bytes())?;
            output::success(&format!("{} succeeded", operation));
            Ok(())
        }
        Err(err) if err.is_interrupted() => {
            output::warning(&format!(
                "{} interrupted after {} attempt(s)",
                operation,
                err.attempts()
            ));
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
        Err(err) => {
            output::error(&format!(
                "{} did not succeed within {} attempt(s)",
                operation,
                err.attempts()
            ));
            Err(anyhow::Error::new(err).context(format!("{} failed", operation)))
        }
    }
}

/// Apply command-line overrides on top of the configured settings
fn effective_settings(base: &RetrySettings, args: &RunArgs) -> RetrySettings {
    let mut settings = base.clone();
    if let Some(attempts) = args.attempts {
        settings.max_attempts = attempts;
    }
    if let Some(delay_ms) = args.delay_ms {
        settings.delay_ms = delay_ms;
    }
    if args.skip_final_pause {
        settings.pause_after_final_attempt = false;
    }
    settings
}

/// Whether a session with these settings can ever reach a pause
fn can_pause(settings: &RetrySettings) -> bool {
    settings.delay_ms > 0
        && (settings.max_attempts > 1
            || (settings.max_attempts == 1 && settings.pause_after_final_attempt))
}

/// Run the command once, capturing stdout and passing stderr through
fn run_once(program: &str, args: &[String]) -> io::Result<CommandOutcome> {
    tracing::debug!("Running: {} {}", program, args.join(" "));

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::inherit())
        .output()?;

    Ok(CommandOutcome {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
    })
}
