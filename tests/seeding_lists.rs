//! User-supplied phase/frequency lists: filter-and-pad semantics through the
//! Simulation seeding entry points.

use std::f32::consts::PI;
use std::time::Duration;

use synchrona::sim::engine::{SimParams, Simulation};

fn quiet() -> Simulation {
    Simulation::new(SimParams {
        count: 4,
        coupling: 0.0,
        ..SimParams::default()
    })
}

#[test]
fn phase_list_is_wrapped_and_padded() {
    let mut sim = quiet();
    sim.seed_phases_text("0.5, 7.0");
    let phases = sim.ensemble().phases();
    assert!((phases[0] - 0.5).abs() < 1e-6);
    // 7.0 wraps to 7 - 2pi
    let wrapped = 7.0 - 2.0 * PI;
    assert!(
        (phases[1] - wrapped).abs() < 1e-5,
        "expected {wrapped:.5}, got {:.5}",
        phases[1]
    );
    // the short list pads with its last raw value, wrapped
    assert!((phases[2] - wrapped).abs() < 1e-5);
    assert!((phases[3] - wrapped).abs() < 1e-5);
}

#[test]
fn garbage_tokens_fall_back_to_zero_fill() {
    let mut sim = quiet();
    sim.seed_phases_text("alpha beta, gamma");
    assert!(sim.ensemble().phases().iter().all(|&p| p == 0.0));
}

#[test]
fn frequency_list_drives_the_drift() {
    let mut sim = quiet();
    sim.seed_phases_text("0 0 0 0");
    sim.seed_omegas_text("1.0, 0.5, -0.5, -1.0");
    sim.set_running(true);

    // one exact second of simulated time at dt = 0.01
    for _ in 0..10 {
        sim.advance(Duration::from_millis(100));
    }
    let phases = sim.ensemble().phases();
    let expected = [1.0f32, 0.5, -0.5, -1.0];
    for i in 0..4 {
        assert!(
            (phases[i] - expected[i]).abs() < 2e-3,
            "oscillator {i} drifted to {:.4}, expected ~{:.4}",
            phases[i],
            expected[i]
        );
    }
}

#[test]
fn mixed_separators_are_accepted() {
    let mut sim = quiet();
    sim.seed_omegas_text("1,2\t3\n4");
    assert_eq!(sim.ensemble().omegas(), &[1.0, 2.0, 3.0, 4.0]);
}
