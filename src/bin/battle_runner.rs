//! Headless Battle Runner
//!
//! Spawns the units of a scenario, plays each unit's queued actions in turn
//! order and prints what the render adapter was told to draw.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use skirmish_unit::battle::{
    BattleUnit, CharacterRoster, CharacterTemplate, GridPosition, HexLayout, SceneContext, Side,
    UnitAction, UnitSpec,
};
use skirmish_unit::core::config::UnitConfig;
use skirmish_unit::core::error::Result;
use skirmish_unit::renderer::{RecordingRenderer, RenderCommand, RenderLog};

/// Headless Battle Runner - play scripted unit turns and print the render transcript
#[derive(Parser, Debug)]
#[command(name = "battle_runner")]
#[command(about = "Play scripted unit turns and print the render transcript")]
struct Args {
    /// Scenario JSON file (built-in demo when omitted)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Unit config TOML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Character roster TOML file
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Also log render-level detail (clips played)
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Text,
}

#[derive(Debug, Deserialize)]
struct Scenario {
    units: Vec<ScenarioUnit>,
}

#[derive(Debug, Deserialize)]
struct ScenarioUnit {
    #[serde(flatten)]
    spec: UnitSpec,
    #[serde(default)]
    actions: Vec<UnitAction>,
}

/// JSON output structure
#[derive(Serialize)]
struct RunResult {
    units: Vec<UnitSummary>,
    transcript: Vec<RenderCommand>,
}

#[derive(Serialize)]
struct UnitSummary {
    id: String,
    side: Side,
    position: GridPosition,
    health: f32,
    actions_run: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(args.verbose))
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => UnitConfig::load_from_toml(path)?,
        None => UnitConfig::default(),
    };
    let roster = match &args.roster {
        Some(path) => CharacterRoster::load_from_toml(path)?,
        None => demo_roster(),
    };
    let scenario = match &args.scenario {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => demo_scenario(),
    };

    let scene = SceneContext::new(Arc::new(roster), Arc::new(HexLayout::default())).with_config(config);
    let log = RenderLog::default();

    let mut units = Vec::with_capacity(scenario.units.len());
    for entry in scenario.units {
        let unit = BattleUnit::spawn(
            entry.spec,
            &scene,
            Box::new(RecordingRenderer::with_log(log.clone())),
        )?;
        unit.set_actions(&entry.actions);
        units.push(unit);
    }
    tracing::info!(units = units.len(), "Scenario loaded");

    let mut summaries = Vec::with_capacity(units.len());
    for unit in &units {
        let actions_run = unit.run_queued_actions().await?;
        summaries.push(UnitSummary {
            id: unit.id().to_string(),
            side: unit.side(),
            position: unit.position(),
            health: unit.health(),
            actions_run,
        });
    }

    let result = RunResult {
        units: summaries,
        transcript: log.commands(),
    };

    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        Format::Text => print_text(&result),
    }

    Ok(())
}

/// `RUST_LOG` plus sequencer logging for this crate.
fn log_filter(verbose: bool) -> EnvFilter {
    let directive = if verbose {
        "skirmish_unit=trace"
    } else {
        "skirmish_unit=debug"
    };
    let filter = EnvFilter::from_default_env();
    match directive.parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

fn print_text(result: &RunResult) {
    println!("=== TRANSCRIPT ===");
    for (i, command) in result.transcript.iter().enumerate() {
        println!("{:4}  {:?}", i, command);
    }
    println!();
    println!("=== UNITS ===");
    for unit in &result.units {
        println!(
            "{:<8} {:<5} at ({}, {})  health {:.0}  actions {}",
            unit.id, unit.side, unit.position.x, unit.position.y, unit.health, unit.actions_run
        );
    }
}

fn demo_roster() -> CharacterRoster {
    CharacterRoster::new()
        .with(CharacterTemplate::new("knight", "Knight"))
        .with(CharacterTemplate::new("archer", "Archer"))
}

fn demo_scenario() -> Scenario {
    Scenario {
        units: vec![
            ScenarioUnit {
                spec: UnitSpec::new("knight-1", "knight", Side::Left, 2, 3),
                actions: vec![UnitAction::say("For the realm!"), UnitAction::move_by(1, 0)],
            },
            ScenarioUnit {
                spec: UnitSpec::new("archer-1", "archer", Side::Right, 8, 3),
                actions: vec![UnitAction::move_by(-1, 0), UnitAction::say("Loose!")],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_defaults_to_text() {
        let args = Args::try_parse_from(["battle_runner"]).unwrap();
        assert_eq!(args.format, Format::Text);
    }

    #[test]
    fn test_format_json() {
        let args = Args::try_parse_from(["battle_runner", "--format", "json"]).unwrap();
        assert_eq!(args.format, Format::Json);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Args::try_parse_from(["battle_runner", "--format", "yaml"]).is_err());
    }

    #[test]
    fn test_log_filter_enables_crate_debug() {
        let filter = log_filter(false).to_string();
        assert!(filter.contains("skirmish_unit=debug"), "{filter}");

        let verbose = log_filter(true).to_string();
        assert!(verbose.contains("skirmish_unit=trace"), "{verbose}");
    }
}
