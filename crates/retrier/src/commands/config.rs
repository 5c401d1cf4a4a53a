//! Config command

use anyhow::{anyhow, Context, Result};
use camino::Utf8Path;
use retrier_core::RetryConfig;
use serde::Serialize;

use crate::cli::{ConfigCommands, ConfigInitArgs, ConfigShowArgs, ConfigValidateArgs};
use crate::output;

pub fn run(cmd: ConfigCommands, config_path: Option<&Utf8Path>) -> Result<()> {
    match cmd {
        ConfigCommands::Init(args) => init(args),
        ConfigCommands::Validate(args) => validate(args, config_path),
        ConfigCommands::Show(args) => show(args, config_path),
    }
}

fn init(args: ConfigInitArgs) -> Result<()> {
    // Check if file exists
    if args.output.exists() && !args.force {
        return Err(anyhow!(
            "File {} already exists. Use --force to overwrite.",
            args.output
        ));
    }

    let content = RetryConfig::default().to_yaml()?;
    std::fs::write(&args.output, content)
        .with_context(|| format!("Failed to write {}", args.output))?;

    output::success(&format!("Created {}", args.output));
    Ok(())
}

fn validate(args: ConfigValidateArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let path = args.file.as_deref().or(config_path);
    let config = RetryConfig::resolve(path)?;

    output::success(&format!(
        "Configuration is valid ({} named operation(s))",
        config.operations.len()
    ));
    Ok(())
}

/// Settings as printed by `config show`
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct ShownSettings<'a> {
    operation: &'a str,
    #[serde(flatten)]
    settings: &'a retrier_core::RetrySettings,
}

fn show(args: ConfigShowArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config = RetryConfig::resolve(config_path)?;
    let operation = args.operation.as_deref();

    if let Some(name) = operation {
        if !config.operations.contains_key(name) {
            output::warning(&format!(
                "No settings for operation '{}', showing defaults",
                name
            ));
        }
    }

    let shown = ShownSettings {
        operation: operation.unwrap_or("default"),
        settings: config.settings_for(operation),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
    } else {
        println!("{}:", shown.operation);
        output::kv("max-attempts", &shown.settings.max_attempts.to_string());
        output::kv("delay-ms", &shown.settings.delay_ms.to_string());
        output::kv(
            "pause-after-final-attempt",
            &shown.settings.pause_after_final_attempt.to_string(),
        );
    }

    Ok(())
}
