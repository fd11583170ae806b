//! `events` command implementation.

use anyhow::{Context, Result};
use events::EventLocator;
use ingestion::RecordingLoader;
use tracing::info;

use crate::cli::EventsArgs;
use crate::error::CliError;

/// Execute the `events` command
pub fn run_events(args: &EventsArgs) -> Result<()> {
    if !args.input.exists() {
        return Err(CliError::input_not_found(&args.input).into());
    }

    let locator = EventLocator::new(&args.pattern).context("Invalid event pattern")?;
    let recording = RecordingLoader::new()
        .load(&args.input)
        .with_context(|| format!("Failed to load recording {}", args.input.display()))?;

    let matches = locator
        .find_in(&recording)
        .context("Event search failed")?;
    info!(pattern = %args.pattern, matches = matches.len(), "Events located");

    if args.json {
        let json = if args.messages {
            serde_json::to_string_pretty(&matches)
        } else {
            let times: Vec<f64> = matches.iter().map(|m| m.time).collect();
            serde_json::to_string_pretty(&times)
        }
        .context("Failed to serialize events")?;
        println!("{}", json);
    } else {
        for m in &matches {
            if args.messages {
                println!("{:.6}\t{}", m.time, m.message);
            } else {
                println!("{:.6}", m.time);
            }
        }
    }

    Ok(())
}
