//! Replay command: run a scenario file and print what changed.

use std::path::{Path, PathBuf};

use clap::Args;
use colored::Colorize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::cli::output;
use crate::config::{self, EngineConfig};
use crate::engine::{Flamingo, GroupIcon};
use crate::error::CliError;
use crate::scenario::{Outcome, Scenario, StepReport};

/// Arguments of `flamingo replay`.
#[derive(Args, Debug)]
#[command(after_long_help = r#"Examples:
  flamingo replay snap-left.jsonc           # Deltas per step as tables
  flamingo replay --json snap-left.jsonc    # Step reports as JSON
  flamingo replay --state snap-left.jsonc   # Also print the final layout"#)]
pub struct ReplayArgs {
    /// Scenario file (JSONC).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output in JSON format instead of table format.
    #[arg(long, short = 'j')]
    pub json: bool,

    /// Print the final position, icon and group of every object.
    #[arg(long, short = 's')]
    pub state: bool,
}

/// Execute the replay command.
///
/// # Errors
///
/// Returns an error if the configuration or the scenario cannot be loaded.
pub fn execute(args: &ReplayArgs, config_path: Option<&Path>) -> Result<(), CliError> {
    let scenario = Scenario::load(&args.file)?;
    let config = resolve_config(&scenario, config_path)?;
    tracing::debug!(
        file = %args.file.display(),
        steps = scenario.steps.len(),
        snap_distance = config.snap_distance,
        "replaying scenario"
    );

    let mut engine = Flamingo::with_config(config);
    let reports = scenario.run(&mut engine);

    if args.json {
        output::print_highlighted_json(&serde_json::to_value(&reports)?);
    } else {
        print_reports(&reports);
    }

    if args.state {
        print_state(&engine, args.json)?;
    }
    Ok(())
}

/// The scenario's own configuration wins over the config file.
fn resolve_config(scenario: &Scenario, config_path: Option<&Path>) -> Result<EngineConfig, CliError> {
    if let Some(config) = scenario.config {
        config.validate()?;
        return Ok(config);
    }
    let (config, _) = config::load_or_default(config_path)?;
    Ok(config)
}

fn print_reports(reports: &[StepReport]) {
    #[derive(Tabled)]
    struct DeltaRow {
        #[tabled(rename = "Op")]
        op: String,
        #[tabled(rename = "Fact")]
        predicate: &'static str,
        #[tabled(rename = "Value")]
        value: String,
    }

    for report in reports {
        let header = format!("[{}] {}", report.index, report.step.label());

        match &report.outcome {
            Outcome::Added { oid } => {
                println!("{} {}", header.bold(), format!("→ oid {oid}").dimmed());
            }
            Outcome::Failed { error } => {
                println!("{} {}", header.bold(), error.to_string().red());
            }
            Outcome::Applied { deltas } if deltas.is_empty() => {
                println!("{} {}", header.bold(), "no change".dimmed());
            }
            Outcome::Applied { deltas } => {
                println!("{}", header.bold());
                let rows = deltas.iter().map(|delta| DeltaRow {
                    op: output::format_sign(delta.sign),
                    predicate: delta.predicate().as_str(),
                    value: output::format_values(&delta.fact),
                });
                let table = Table::new(rows)
                    .with(Style::rounded())
                    .with(Modify::new(Columns::first()).with(Alignment::center()))
                    .to_string();
                println!("{table}");
            }
        }
    }
}

fn print_state(engine: &Flamingo, json: bool) -> Result<(), CliError> {
    #[derive(Tabled)]
    struct ObjectRow {
        #[tabled(rename = "ID")]
        oid: u64,
        #[tabled(rename = "Sort")]
        sort: &'static str,
        #[tabled(rename = "Size")]
        size: String,
        #[tabled(rename = "Position")]
        position: String,
        #[tabled(rename = "Icon")]
        icon: &'static str,
        #[tabled(rename = "Grouped")]
        grouped: String,
    }

    if json {
        let facts: Vec<_> = engine.facts().iter().map(ToString::to_string).collect();
        output::print_highlighted_json(&serde_json::to_value(facts)?);
        return Ok(());
    }

    let rows: Vec<ObjectRow> = engine
        .objects()
        .map(|object| ObjectRow {
            oid: object.oid,
            sort: object.sort.as_str(),
            size: format!("{}×{}", object.attributes.width, object.attributes.height),
            position: engine
                .position(object.oid)
                .map_or_else(|| "-".dimmed().to_string(), |p| format!("({}, {})", p.x, p.y)),
            icon: match engine.group_icon(object.oid) {
                GroupIcon::NoIcon => "",
                icon => icon.as_str(),
            },
            grouped: output::format_bool(engine.group_members(object.oid).is_some()),
        })
        .collect();

    if rows.is_empty() {
        println!("{}", "No objects registered.".dimmed());
        return Ok(());
    }

    let count = rows.len();
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::right()))
        .with(Modify::new(Columns::new(2..4)).with(Alignment::right()))
        .with(Modify::new(Columns::new(5..6)).with(Alignment::center()))
        .to_string();

    println!("{}", format!("Objects ({count})").bold());
    println!("{table}");
    Ok(())
}
