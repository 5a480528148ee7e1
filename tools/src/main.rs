//! growth-runner: headless runner for the regional growth projection engine.
//!
//! Usage:
//!   growth-runner --region bangalore --budget 100 --timeframe 10
//!   growth-runner --alloc infrastructure=40,workforce=20,incentives=20,research=20 \
//!                 --policy incubator_network,public_private_hubs --json
//!   growth-runner --list-regions
//!   growth-runner --ipc-mode

use anyhow::{Context, Result};
use growth_core::{
    allocation::{Allocation, Budget},
    command::ScenarioCommand,
    config::SimConfig,
    engine::{ProjectionEngine, ScenarioInputs},
    policy::PolicyToggles,
    projection::Timeframe,
    session::ScenarioSession,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Command { command: ScenarioCommand },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let data_dir = arg_value(&args, "--data-dir").unwrap_or("./data");
    let ipc_mode = has_flag(&args, "--ipc-mode");
    let json_mode = has_flag(&args, "--json");

    let config = SimConfig::load(data_dir)?;

    if has_flag(&args, "--list-regions") {
        for region in config.catalog.iter() {
            println!(
                "{:<12} {:<16} {} asset(s)",
                region.id,
                region.name,
                region.existing_assets.len()
            );
            for asset in &region.existing_assets {
                println!(
                    "    {:<44} {:<15} strength {}",
                    asset.name,
                    asset.kind.name(),
                    asset.strength
                );
            }
        }
        return Ok(());
    }

    let region_id = match arg_value(&args, "--region") {
        Some(id) => id.to_string(),
        None => config
            .catalog
            .first()
            .map(|r| r.id.clone())
            .context("region catalog is empty")?,
    };
    let inputs = parse_inputs(&args)?;

    if !ipc_mode && !json_mode {
        println!("Regional growth projection - growth-runner");
        println!("  data_dir:   {data_dir}");
        println!("  region:     {region_id}");
        println!("  budget:     {:.2} Cr", inputs.budget.amount());
        println!("  timeframe:  {}", inputs.timeframe);
        println!();
    }

    let engine = ProjectionEngine::new(config);
    let mut session = ScenarioSession::with_inputs(engine, region_id, inputs)?;

    if ipc_mode {
        run_ipc_loop(&mut session)?;
    } else if json_mode {
        println!("{}", serde_json::to_string_pretty(session.projection())?);
    } else {
        print_summary(&session);
    }

    Ok(())
}

fn parse_inputs(args: &[String]) -> Result<ScenarioInputs> {
    let defaults = ScenarioInputs::default();

    let budget = match arg_value(args, "--budget") {
        Some(raw) => raw.parse::<Budget>()?,
        None => defaults.budget,
    };
    let timeframe = match arg_value(args, "--timeframe") {
        Some(raw) => raw.parse::<Timeframe>()?,
        None => defaults.timeframe,
    };
    let allocation = match arg_value(args, "--alloc") {
        Some(raw) => parse_allocation(raw)?,
        None => defaults.allocation,
    };
    let policies = match arg_value(args, "--policy") {
        Some(raw) => PolicyToggles::from_names(raw.split(',').filter(|s| !s.trim().is_empty()))?,
        None => defaults.policies,
    };

    Ok(ScenarioInputs {
        allocation,
        edited: None,
        policies,
        timeframe,
        budget,
    })
}

/// "infrastructure=30,workforce=25,..." -> Allocation
fn parse_allocation(raw: &str) -> Result<Allocation> {
    let mut entries = Vec::new();
    for pair in raw.split(',').filter(|s| !s.trim().is_empty()) {
        let (name, amount) = pair
            .split_once('=')
            .with_context(|| format!("Allocation entry '{pair}' must look like name=amount"))?;
        let amount: f64 = amount
            .trim()
            .parse()
            .with_context(|| format!("Allocation amount for '{}' is not a number", name.trim()))?;
        entries.push((name.trim().to_string(), amount));
    }
    Ok(Allocation::from_entries(entries)?)
}

fn run_ipc_loop(session: &mut ScenarioSession) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => {
                writeln!(stdout, "{}", serde_json::to_string(&session.state())?)?;
            }
            IpcCommand::Command { command } => {
                if let Err(e) = session.apply(command).map(|_| ()) {
                    log::warn!("Rejected command: {e}");
                    write_error(&mut stdout, &e.to_string())?;
                    continue;
                }
                writeln!(stdout, "{}", serde_json::to_string(&session.state())?)?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn write_error(stdout: &mut io::Stdout, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(stdout, "{}", err_json)?;
    stdout.flush()?;
    Ok(())
}

fn print_summary(session: &ScenarioSession) {
    let projection = session.projection();

    println!("=== ALLOCATION ===");
    for (category, amount) in projection.allocation.iter() {
        println!("  {:<16} {amount:>8.2} Cr", category.label());
    }
    println!("  {:<16} {:>8.2} Cr", "Total", projection.allocation.total());
    if projection.allocation_underflow() {
        println!(
            "  WARNING: {:.2} Cr over budget could not be rebalanced",
            projection.unabsorbed_excess
        );
    }

    println!();
    println!("=== POLICIES ===");
    let enabled = session.inputs().policies.enabled();
    if enabled.is_empty() {
        println!("  (none enabled)");
    }
    for policy in enabled {
        println!("  {}", policy.label());
    }
    println!("  combined multiplier: {:.5}", projection.policy_multiplier);

    println!();
    println!("=== PROJECTION ===");
    println!(
        "  {:<6} {:>10} {:>10} {:>12} {:>10}",
        "year", "jobs", "companies", "funding Cr", "patents"
    );
    for row in projection.timeline() {
        println!(
            "  {:<6} {:>10.0} {:>10.0} {:>12.0} {:>10.0}",
            row.year, row.values.jobs, row.values.companies, row.values.funding, row.values.patents
        );
    }

    println!();
    println!("=== GROWTH HOTSPOTS (final year) ===");
    if projection.hotspots.is_empty() {
        println!("  (region has no existing assets)");
    }
    for spot in &projection.hotspots {
        println!(
            "  {:<44} intensity {:>5.2} | +{:.0} jobs | +{:.0} companies",
            spot.asset_name, spot.intensity, spot.jobs, spot.companies
        );
    }
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}
