//! `validate` command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::{ContractError, InterpKind, PipelineConfig};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::ValidateArgs;

/// Outcome of checking one configuration file
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum ConfigCheck {
    Accepted {
        path: String,
        /// Effective configuration with every default filled in
        config: PipelineConfig,
        notes: Vec<String>,
    },
    Rejected {
        path: String,
        stage: RejectStage,
        #[serde(skip_serializing_if = "Option::is_none")]
        field: Option<String>,
        message: String,
    },
}

/// Where loading stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum RejectStage {
    Read,
    Parse,
    Validate,
}

impl ConfigCheck {
    fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let check = check_config(&args.config);

    if args.json {
        let json =
            serde_json::to_string_pretty(&check).context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_check(&check)?;
    }

    if check.is_accepted() {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn check_config(path: &Path) -> ConfigCheck {
    let display_path = path.display().to_string();

    match ConfigLoader::load_from_path(path) {
        Ok(config) => {
            let notes = review(&config);
            for note in &notes {
                warn!(path = %display_path, "{note}");
            }
            ConfigCheck::Accepted {
                path: display_path,
                config,
                notes,
            }
        }
        Err(err) => {
            let (stage, field) = match &err {
                ContractError::Io(_) => (RejectStage::Read, None),
                ContractError::ConfigValidation { field, .. } => {
                    (RejectStage::Validate, Some(field.clone()))
                }
                _ => (RejectStage::Parse, None),
            };
            ConfigCheck::Rejected {
                path: display_path,
                stage,
                field,
                message: err.to_string(),
            }
        }
    }
}

/// Settings that load fine but are probably not what the user wants
fn review(config: &PipelineConfig) -> Vec<String> {
    let mut notes = Vec::new();

    if config.detect.min_dist == 0.0 {
        notes.push("detect.min_dist is 0: neighbouring blinks are never merged".to_string());
    }
    match config.correct.interp {
        InterpKind::NanMask => {
            notes.push("correct.interp is 'nan': blinks are masked, not interpolated".to_string())
        }
        InterpKind::Spline(order) if order > 3 => notes.push(format!(
            "correct.interp spline-{order} may overshoot around short blinks"
        )),
        _ => {}
    }
    if !config.detect.overwrite {
        notes.push("detect.overwrite is false: the stored blink list is kept".to_string());
    }

    notes
}

fn print_check(check: &ConfigCheck) -> Result<()> {
    match check {
        ConfigCheck::Accepted {
            path,
            config,
            notes,
        } => {
            println!("✓ {path}");
            println!();
            print!("{}", ConfigLoader::to_toml(config)?);
            for note in notes {
                println!("⚠ {note}");
            }
        }
        ConfigCheck::Rejected {
            path,
            stage,
            message,
            ..
        } => {
            println!("✗ {path} ({stage:?} failed)");
            println!("  {message}");
        }
    }
    Ok(())
}
