use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use orrery::{ScenarioConfig, Simulation, TickOutcome};

const SECONDS_PER_DAY: f64 = 86_400.0;
const MIN_TIME_SCALE: f64 = 1.0;
const MAX_TIME_SCALE: f64 = SECONDS_PER_DAY * 365.0;

/// Runs an N-body scenario headless and prints a status line as it goes
#[derive(Parser, Debug)]
#[command(version, long_about = None)]
struct Args {
    /// Scenario file (YAML). The built-in solar system is used when omitted.
    #[arg(short, long, value_name = "FILE")]
    scenario: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Wall-clock seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    frame_dt: f64,

    /// Simulated seconds per wall-clock second
    #[arg(short, long, default_value_t = 3600.0)]
    time_scale: f64,

    /// Print a status line every N frames, 0 for none
    #[arg(short, long, default_value_t = 60)]
    report_every: u64,
}

fn load_scenario(path: Option<&PathBuf>) -> Result<ScenarioConfig> {
    match path {
        Some(path) => ScenarioConfig::from_path(path)
            .with_context(|| format!("failed to load scenario {}", path.display())),
        None => {
            log::info!("no scenario given, using the built-in solar system");
            Ok(ScenarioConfig::solar_system())
        }
    }
}

fn status_line(sim: &Simulation, time_scale: f64) -> String {
    format!(
        "Bodies: {}  Time: {:.1} days  Speed: {:.0}x",
        sim.body_count(),
        sim.time_seconds() / SECONDS_PER_DAY,
        time_scale
    )
}

fn print_summary(sim: &Simulation) {
    println!(
        "{:<10} {:>14} {:>14} {:>12} {:>7}",
        "body", "x (m)", "y (m)", "speed (m/s)", "trail"
    );
    for (id, body, trail) in sim.iter() {
        let name = body.name().map_or_else(|| format!("#{}", id.0), str::to_string);
        println!(
            "{:<10} {:>14.4e} {:>14.4e} {:>12.1} {:>7}",
            name,
            body.position.x,
            body.position.y,
            body.speed(),
            trail.len()
        );
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if !(args.frame_dt.is_finite() && args.frame_dt > 0.0) {
        anyhow::bail!("--frame-dt must be a positive number, got {}", args.frame_dt);
    }

    if args.time_scale.is_nan() {
        anyhow::bail!("--time-scale must be a number");
    }
    let time_scale = args.time_scale.clamp(MIN_TIME_SCALE, MAX_TIME_SCALE);
    if time_scale != args.time_scale {
        log::warn!("time scale {} clamped to {}", args.time_scale, time_scale);
    }

    let scenario = load_scenario(args.scenario.as_ref())?;
    let mut sim = Simulation::from_scenario(scenario);
    let dt = time_scale * args.frame_dt;
    log::info!(
        "loaded {} bodies, {} simulated seconds per frame",
        sim.body_count(),
        dt
    );

    let mut skipped = 0u64;
    for frame in 1..=args.frames {
        if let TickOutcome::Skipped(reason) = sim.tick(dt) {
            log::debug!("frame {} skipped: {:?}", frame, reason);
            skipped += 1;
        }

        if args.report_every > 0 && frame % args.report_every == 0 {
            println!("{}", status_line(&sim, time_scale));
        }
    }

    if skipped > 0 {
        log::warn!("{} of {} frames did not advance", skipped, args.frames);
    }

    println!("{}", status_line(&sim, time_scale));
    print_summary(&sim);

    Ok(())
}
