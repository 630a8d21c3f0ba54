// Entry point: headless Kuramoto runner driven by config + CLI overrides.
mod app;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use synchrona::cli::Args;
use synchrona::config::AppConfig;
use synchrona::sim::engine::Simulation;

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = AppConfig::load_or_default(&args.config);
    let mut params = cfg.sim_params();
    if let Some(count) = args.count {
        params.count = count;
    }
    if let Some(k) = args.coupling {
        params.coupling = k.max(0.0);
    }
    if let Some(method) = args.method {
        params.method = method;
    }
    if let Some(kind) = args.topology {
        params.topology = kind;
    }
    if let Some(noise) = args.noise {
        params.noise_amplitude = noise.max(0.0);
    }
    if let Some(speed) = args.speed {
        params.speed = speed.max(0.0);
    }

    let mut sim = Simulation::new(params);
    if let Some(phases) = args.phases.as_deref() {
        sim.seed_phases_text(phases);
    }
    if let Some(freqs) = args.freqs.as_deref() {
        sim.seed_omegas_text(freqs);
    }

    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_for_ctrlc = stop_flag.clone();
    ctrlc::set_handler(move || {
        stop_flag_for_ctrlc.store(true, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");

    app::run(&mut sim, args.duration, stop_flag);

    let order = sim.order();
    info!(
        "run finished: t={:.2} r={:.4} samples={}",
        sim.sim_time(),
        order.r,
        sim.history().len()
    );

    if let Some(path) = args.csv.as_deref() {
        match app::write_csv(path, sim.history()) {
            Ok(()) => info!("synchrony series written to {path}"),
            Err(err) => eprintln!("Failed to write CSV to {path}: {err}"),
        }
    }
}
