//! Headless driver: paces frames against the wall clock and feeds measured
//! elapsed time into the simulation, standing in for a rendering frontend.

use std::fs;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{info, trace};

use synchrona::sim::engine::Simulation;
use synchrona::sim::history::OrderHistory;

/// Driver frame cadence. The engine's stepping is frame-rate independent;
/// this only sets how often we hand it wall time.
const FRAME: Duration = Duration::from_millis(16);

/// Simulated seconds between progress log lines.
const REPORT_INTERVAL: f64 = 1.0;

/// Run until ctrl-c, or until `duration` simulated seconds have elapsed.
pub fn run(sim: &mut Simulation, duration: Option<f32>, stop: Arc<AtomicBool>) {
    sim.set_running(true);
    info!(
        "simulation started: n={} k={} dt={} method={:?} topology={:?}",
        sim.ensemble().len(),
        sim.params().coupling,
        sim.params().dt,
        sim.params().method,
        sim.params().topology
    );

    let mut last_frame = Instant::now();
    let mut next_deadline = last_frame + FRAME;
    let mut next_report = REPORT_INTERVAL;
    loop {
        if stop.load(Ordering::SeqCst) {
            info!("stop requested");
            break;
        }
        let now = Instant::now();
        let elapsed = now - last_frame;
        last_frame = now;
        sim.advance(elapsed);

        if sim.sim_time() >= next_report {
            let order = sim.order();
            info!(
                "t={:.2} r={:.4} psi={:.3}",
                sim.sim_time(),
                order.r,
                order.psi
            );
            next_report = sim.sim_time() + REPORT_INTERVAL;
        }
        if let Some(limit) = duration {
            if sim.sim_time() >= f64::from(limit) {
                info!("duration reached at t={:.2}", sim.sim_time());
                break;
            }
        }

        next_deadline += FRAME;
        let now = Instant::now();
        if now < next_deadline {
            std::thread::sleep(next_deadline - now);
        } else {
            next_deadline = now;
            trace!("frame overrun");
        }
    }
    sim.set_running(false);
}

/// Dump the recorded synchrony series as `time,r` lines.
pub fn write_csv(path: &str, history: &OrderHistory) -> io::Result<()> {
    let mut out = String::with_capacity(history.len() * 16 + 16);
    out.push_str("time,r\n");
    for &(t, r) in history.samples() {
        out.push_str(&format!("{t:.4},{r:.6}\n"));
    }
    fs::write(path, out)
}
