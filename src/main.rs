//! # Particle Detector Simulation
//!
//! Runs the demonstration events through an ATLAS or CMS detector.
//!
//! ## Usage
//!
//! ```bash
//! # All events through ATLAS
//! cargo run --release
//!
//! # Higgs decay through CMS with reproducible smearing
//! cargo run --release -- --detector CMS --event higgs --seed 42
//!
//! # Machine-readable reports
//! cargo run --release -- --event top --json
//!
//! # Show the detector parameter set
//! cargo run --release -- --show-config
//! ```

use clap::Parser;
use particle_detector::{
    process_event, Detector, DetectorConfig, DetectorName, DetectorResult, EventKind, EventReport,
};

/// Particle Detector Simulation
#[derive(Parser, Debug)]
#[command(name = "particle_detector")]
#[command(about = "Simulate particle detection in an ATLAS or CMS style detector")]
struct Args {
    /// Detector to simulate (ATLAS or CMS)
    #[arg(long, short = 'd', default_value = "ATLAS")]
    detector: String,

    /// Event to run (higgs, z, top or all)
    #[arg(long, short = 'e', default_value = "all")]
    event: String,

    /// Seed for reproducible smearing
    #[arg(long, short = 's')]
    seed: Option<u64>,

    /// Print event reports as JSON
    #[arg(long)]
    json: bool,

    /// Print the detector configuration before running
    #[arg(long)]
    show_config: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn selected_events(event: &str) -> DetectorResult<Vec<EventKind>> {
    if event.eq_ignore_ascii_case("all") {
        Ok(EventKind::all().to_vec())
    } else {
        Ok(vec![event.parse()?])
    }
}

fn run(args: &Args) -> DetectorResult<()> {
    let name: DetectorName = args.detector.parse()?;
    let events = selected_events(&args.event)?;

    let mut config = DetectorConfig::for_detector(name);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    let mut detector = Detector::from_config(&config)?;

    if args.show_config {
        if args.json {
            println!("{}", config.to_json_pretty()?);
        } else {
            println!("{}", detector.summary());
        }
    }

    let mut reports: Vec<EventReport> = Vec::with_capacity(events.len());
    for kind in events {
        let event = kind.build()?;
        reports.push(process_event(&mut detector, &event)?);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        println!("╔══════════════════════════════════════════════════════════════╗");
        println!("║          {:^5} Detector Simulation                          ║", name.as_str());
        println!("╚══════════════════════════════════════════════════════════════╝");
        for report in &reports {
            println!();
            println!("{}", report.summary());
        }
    }

    Ok(())
}
