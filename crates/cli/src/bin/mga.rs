use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::warn;
use mga_trajectory::config::{
    ScenarioConfig, default_bodies, load_bodies, load_scenario, merge_bodies,
};
use mga_trajectory::dynamics::BodyEnvironment;
use mga_trajectory::ephemeris::{self, MeanElementEphemeris};
use mga_trajectory::transfer::{
    ManeuverKind, TRANSFER_CASES, TransferReport, run_scenario, write_artifacts,
};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Multi-leg gravity-assist transfer designer with numerical reconciliation"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve the patched-conic trajectory and reconcile it numerically
    Run(RunArgs),
    /// List the selectable intermediate flyby pairs
    Cases,
}

#[derive(Args)]
struct RunArgs {
    /// Scenario manifest (TOML or YAML); built-in defaults when omitted
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Body catalog overriding the built-in one (YAML list, TOML file or directory)
    #[arg(long)]
    bodies: Option<PathBuf>,

    /// Directory receiving per-leg tables and summary.json
    #[arg(long)]
    output: Option<PathBuf>,

    /// Case selector replacing the last entry of the parameter vector
    #[arg(long)]
    case: Option<u8>,

    /// Integrator step in seconds
    #[arg(long)]
    step: Option<f64>,

    /// Analytic samples per leg
    #[arg(long)]
    samples: Option<usize>,

    /// Reconcile legs one after another instead of in parallel
    #[arg(long, default_value_t = false)]
    sequential: bool,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run(args),
        Command::Cases => {
            println!("case  bodies");
            for (index, (first, second)) in TRANSFER_CASES.iter().enumerate() {
                println!("{index:>4}  {first}/{second}");
            }
            Ok(())
        }
    }
}

fn run(args: RunArgs) -> anyhow::Result<()> {
    let mut scenario = match &args.scenario {
        Some(path) => load_scenario(path)
            .with_context(|| format!("loading scenario {}", path.display()))?,
        None => ScenarioConfig::default(),
    };
    apply_overrides(&mut scenario, &args)?;

    let bodies = match &args.bodies {
        Some(path) => merge_bodies(
            default_bodies(),
            load_bodies(path).with_context(|| format!("loading bodies {}", path.display()))?,
        ),
        None => default_bodies(),
    };
    let environment = BodyEnvironment::new(bodies, Arc::new(MeanElementEphemeris::new()));

    let report = run_scenario(&scenario, &environment)?;
    print_report(&report);

    if let Some(dir) = &args.output {
        let artifacts = write_artifacts(&report, dir);
        let failed = artifacts.iter().filter(|a| !a.is_ok()).count();
        println!(
            "Artifacts       : {} written to {} ({failed} failed)",
            artifacts.len() - failed,
            dir.display()
        );
    }
    Ok(())
}

fn apply_overrides(scenario: &mut ScenarioConfig, args: &RunArgs) -> anyhow::Result<()> {
    if let Some(case) = args.case {
        let last = scenario
            .parameters
            .last_mut()
            .ok_or_else(|| anyhow::anyhow!("scenario has an empty parameter vector"))?;
        *last = f64::from(case);
    }
    if let Some(step) = args.step {
        scenario.integrator.step_seconds = step;
    }
    if let Some(samples) = args.samples {
        scenario.analytic_samples_per_leg = samples;
    }
    if args.sequential {
        scenario.parallel = false;
    }
    Ok(())
}

fn print_report(report: &TransferReport) {
    let definition = &report.definition;
    let result = report.result();
    println!("=== Gravity-Assist Transfer ===");
    println!("Sequence        : {}", definition.sequence.bodies().join(" -> "));
    for leg in &definition.legs {
        println!(
            "Leg {}           : {:<9} {} -> {}  {} .. {}  ({:.2} days)",
            leg.index,
            format!("{:?}", leg.leg_type),
            leg.departure_body,
            leg.arrival_body,
            epoch_label(leg.start_epoch_s),
            epoch_label(leg.end_epoch_s),
            leg.duration_s() / 86_400.0
        );
    }
    for maneuver in &result.maneuvers {
        let label = match maneuver.kind {
            ManeuverKind::Departure => "departure (excluded)",
            ManeuverKind::Flyby => "swing-by",
            ManeuverKind::Capture => "capture",
        };
        match maneuver.periapsis_radius_km {
            Some(rp) => println!(
                "Manoeuvre       : {:<8} {label:<20} Δv = {:.4} km/s, rp = {rp:.1} km",
                maneuver.body, maneuver.delta_v_km_s
            ),
            None => println!(
                "Manoeuvre       : {:<8} {label:<20} Δv = {:.4} km/s",
                maneuver.body, maneuver.delta_v_km_s
            ),
        }
    }
    println!("Total Δv        : {:.6} km/s", result.total_delta_v_km_s);
    match result.capture_delta_v() {
        Some(dv) => println!("Capture Δv      : {dv:.6} km/s"),
        None => println!("Capture Δv      : none"),
    }
    println!(
        "Numerical phase : {:.3} s",
        report.numerical_duration.as_secs_f64()
    );
    for (index, outcome) in report.reconciled.iter().enumerate() {
        match outcome {
            Ok(leg) => println!(
                "Propagated leg {index}: {} samples, midpoint {}",
                leg.merged.len(),
                epoch_label(leg.midpoint_epoch_s)
            ),
            Err(err) => {
                warn!("{err}");
                println!("Propagated leg {index}: failed ({err})");
            }
        }
    }
}

fn epoch_label(epoch_s: f64) -> String {
    ephemeris::format_epoch(epoch_s).unwrap_or_else(|_| format!("{epoch_s:.0} s"))
}
