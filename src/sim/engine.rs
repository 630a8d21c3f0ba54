//! Simulation driver: owns the ensemble and coupling context, converts
//! wall-clock frame time into a whole number of fixed steps, and records the
//! synchrony time series.

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, trace};

use super::ensemble::Ensemble;
use super::history::OrderHistory;
use super::seeding::FreqDistribution;
use crate::core::integrator::{self, Method, Scratch};
use crate::core::noise::NormalSource;
use crate::core::order::{Order, compute_order};
use crate::core::topology::{Coupling, TopologyKind};

/// Longest wall-clock slice charged to a single frame; anything beyond this
/// (tab suspension, debugger pause) is forgotten rather than replayed.
pub const MAX_FRAME_SECONDS: f64 = 0.5;
/// Hard cap on integrator invocations per frame.
pub const MAX_STEPS_PER_FRAME: u32 = 5000;
/// Minimum simulated seconds between recorded synchrony samples.
pub const SAMPLE_INTERVAL: f64 = 0.05;

/// Immutable-per-step simulation parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct SimParams {
    pub count: usize,
    pub coupling: f32,
    pub dt: f32,
    pub noise_amplitude: f32,
    pub speed: f32,
    pub topology: TopologyKind,
    pub edge_prob: f32,
    pub method: Method,
    pub freq_dist: FreqDistribution,
    pub seed: u64,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            count: 100,
            coupling: 2.0,
            dt: 0.01,
            noise_amplitude: 0.0,
            speed: 1.0,
            topology: TopologyKind::AllToAll,
            edge_prob: 0.1,
            method: Method::Euler,
            freq_dist: FreqDistribution::default(),
            seed: 0,
        }
    }
}

/// Two states: paused (time never advances) and running (wall-clock-driven).
/// Everything here is single-threaded; a step is an atomic, synchronous
/// buffer mutation, so pausing and reseeding can never interleave with one.
#[derive(Clone, Debug)]
pub struct Simulation {
    ensemble: Ensemble,
    coupling: Coupling,
    scratch: Scratch,
    noise: NormalSource,
    history: OrderHistory,
    params: SimParams,
    /// Topology and seeding draws; kept apart from the noise stream so a
    /// graph rebuild never shifts the stochastic trajectory.
    rng: StdRng,
    running: bool,
    sim_time: f64,
    time_debt: f64,
    last_sample_time: f64,
}

impl Simulation {
    pub fn new(mut params: SimParams) -> Self {
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut ensemble = Ensemble::new(params.count);
        params.count = ensemble.len();
        ensemble.seed_phases_random(&mut rng);
        ensemble.seed_omegas(params.freq_dist, &mut rng);
        let coupling = Coupling::build(
            params.topology,
            ensemble.len(),
            params.edge_prob,
            params.coupling,
            &mut rng,
        );
        let scratch = Scratch::new(ensemble.len());
        let noise = NormalSource::seeded(params.seed.wrapping_add(0x9e37_79b9_7f4a_7c15));
        Self {
            ensemble,
            coupling,
            scratch,
            noise,
            history: OrderHistory::default(),
            params,
            rng,
            running: false,
            sim_time: 0.0,
            time_debt: 0.0,
            last_sample_time: 0.0,
        }
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn ensemble(&self) -> &Ensemble {
        &self.ensemble
    }

    pub fn coupling(&self) -> &Coupling {
        &self.coupling
    }

    pub fn history(&self) -> &OrderHistory {
        &self.history
    }

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Current order parameter, computed on demand.
    pub fn order(&self) -> Order {
        compute_order(self.ensemble.phases())
    }

    /// Feed one frame's measured wall time into the loop. Returns the number
    /// of integrator steps taken.
    ///
    /// Elapsed time is clamped to 0.5 s, scaled by the speed multiplier, and
    /// accumulated as time debt; the debt is repaid in whole dt steps, at
    /// most 5000 per frame. When the cap is hit the leftover debt is dropped
    /// silently instead of carrying into the next frame.
    pub fn advance(&mut self, frame_elapsed: Duration) -> u32 {
        if !self.running {
            return 0;
        }
        let elapsed = frame_elapsed.as_secs_f64().min(MAX_FRAME_SECONDS);
        self.time_debt += elapsed * f64::from(self.params.speed.max(0.0));

        let dt = f64::from(self.params.dt);
        let mut steps = 0u32;
        while self.time_debt >= dt && steps < MAX_STEPS_PER_FRAME {
            self.step_once();
            self.time_debt -= dt;
            steps += 1;
        }
        if steps == MAX_STEPS_PER_FRAME && self.time_debt >= dt {
            trace!(dropped_sec = self.time_debt, "step cap hit, dropping backlog");
            self.time_debt = 0.0;
        }

        if steps > 0 && self.sim_time - self.last_sample_time >= SAMPLE_INTERVAL {
            let order = self.order();
            self.history.push(self.sim_time as f32, order.r);
            self.last_sample_time = self.sim_time;
        }
        steps
    }

    /// One fixed-dt integrator invocation, unconditionally.
    pub fn step_once(&mut self) {
        let (phases, omegas) = self.ensemble.split_mut();
        integrator::step(
            self.params.method,
            phases,
            omegas,
            self.params.dt,
            self.params.noise_amplitude,
            &self.coupling,
            &mut self.noise,
            &mut self.scratch,
        );
        self.sim_time += f64::from(self.params.dt);
    }

    /// Resize the ensemble (clamped to [2, 2000]): phases, frequencies,
    /// adjacency, and scratch buffers are all rebuilt before the next step.
    pub fn set_count(&mut self, count: usize) {
        let n = self.ensemble.resize(count);
        self.params.count = n;
        self.ensemble.seed_phases_random(&mut self.rng);
        self.ensemble.seed_omegas(self.params.freq_dist, &mut self.rng);
        self.scratch.ensure_len(n);
        self.rebuild_coupling();
        self.reset_clock();
        debug!(n, "ensemble resized and reseeded");
    }

    pub fn set_coupling_strength(&mut self, k: f32) {
        let k = k.max(0.0);
        self.params.coupling = k;
        self.coupling.set_strength(k);
    }

    pub fn set_topology(&mut self, kind: TopologyKind) {
        if self.params.topology == kind {
            return;
        }
        self.params.topology = kind;
        self.rebuild_coupling();
    }

    pub fn set_edge_prob(&mut self, p: f32) {
        let p = p.clamp(0.0, 1.0);
        if self.params.edge_prob == p {
            return;
        }
        self.params.edge_prob = p;
        if self.params.topology == TopologyKind::Random {
            self.rebuild_coupling();
        }
    }

    pub fn set_method(&mut self, method: Method) {
        self.params.method = method;
    }

    pub fn set_dt(&mut self, dt: f32) {
        self.params.dt = dt.max(1e-6);
    }

    pub fn set_noise_amplitude(&mut self, amplitude: f32) {
        self.params.noise_amplitude = amplitude.max(0.0);
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.params.speed = speed.max(0.0);
    }

    /// Seed phases from a raw numeric list (filter-and-pad, wrapped).
    pub fn seed_phases_text(&mut self, text: &str) {
        self.ensemble.seed_phases_from_list(text);
    }

    /// Seed natural frequencies from a raw numeric list (filter-and-pad).
    pub fn seed_omegas_text(&mut self, text: &str) {
        self.ensemble.seed_omegas_from_list(text);
    }

    /// Redraw natural frequencies from `dist` and remember it for resets.
    pub fn seed_omegas_dist(&mut self, dist: FreqDistribution) {
        self.params.freq_dist = dist;
        self.ensemble.seed_omegas(dist, &mut self.rng);
    }

    /// Scatter phases uniformly at random.
    pub fn randomize_phases(&mut self) {
        self.ensemble.seed_phases_random(&mut self.rng);
    }

    /// Reseed state and start the run over; the pause/run state is kept.
    pub fn reset(&mut self) {
        self.ensemble.seed_phases_random(&mut self.rng);
        self.ensemble.seed_omegas(self.params.freq_dist, &mut self.rng);
        self.reset_clock();
    }

    fn reset_clock(&mut self) {
        self.sim_time = 0.0;
        self.time_debt = 0.0;
        self.last_sample_time = 0.0;
        self.history.clear();
    }

    fn rebuild_coupling(&mut self) {
        self.coupling = Coupling::build(
            self.params.topology,
            self.ensemble.len(),
            self.params.edge_prob,
            self.params.coupling,
            &mut self.rng,
        );
        debug!(
            kind = ?self.params.topology,
            n = self.ensemble.len(),
            "coupling context rebuilt"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_params() -> SimParams {
        SimParams {
            count: 10,
            coupling: 0.0,
            noise_amplitude: 0.0,
            ..SimParams::default()
        }
    }

    #[test]
    fn paused_simulation_never_advances() {
        let mut sim = Simulation::new(quiet_params());
        let before = sim.ensemble().phases().to_vec();
        let steps = sim.advance(Duration::from_secs(1));
        assert_eq!(steps, 0);
        assert_eq!(sim.ensemble().phases(), &before[..]);
        assert_eq!(sim.sim_time(), 0.0);
    }

    #[test]
    fn debt_is_repaid_in_whole_steps() {
        let mut sim = Simulation::new(quiet_params());
        sim.set_running(true);
        // 35 ms at dt = 10 ms: three steps, 5 ms carried over
        let steps = sim.advance(Duration::from_millis(35));
        assert_eq!(steps, 3);
        assert!((sim.sim_time() - 0.03).abs() < 1e-7);
        // another 5 ms combines with the carry for one more step
        let steps = sim.advance(Duration::from_millis(5));
        assert_eq!(steps, 1);
    }

    #[test]
    fn frame_elapsed_is_clamped() {
        let mut sim = Simulation::new(quiet_params());
        sim.set_running(true);
        // 10 s frame clamps to 0.5 s -> 50 steps at dt = 10 ms
        let steps = sim.advance(Duration::from_secs(10));
        assert_eq!(steps, 50);
    }

    #[test]
    fn speed_multiplier_scales_the_debt() {
        let mut params = quiet_params();
        params.speed = 4.0;
        let mut sim = Simulation::new(params);
        sim.set_running(true);
        let steps = sim.advance(Duration::from_millis(100));
        assert_eq!(steps, 40);
    }

    #[test]
    fn step_cap_drops_the_backlog() {
        let mut params = quiet_params();
        params.speed = 10_000.0;
        let mut sim = Simulation::new(params);
        sim.set_running(true);
        let steps = sim.advance(Duration::from_millis(500));
        assert_eq!(steps, MAX_STEPS_PER_FRAME);
        // backlog was dropped: a tiny follow-up frame owes at most one step
        sim.set_speed(1.0);
        let steps = sim.advance(Duration::from_micros(100));
        assert!(steps <= 1, "backlog leaked into the next frame: {steps} steps");
    }

    #[test]
    fn resize_rebuilds_everything_consistently() {
        let mut params = quiet_params();
        params.topology = TopologyKind::Ring;
        let mut sim = Simulation::new(params);
        sim.set_count(37);
        assert_eq!(sim.ensemble().len(), 37);
        match sim.coupling() {
            Coupling::Graph { adjacency, .. } => assert_eq!(adjacency.len(), 37),
            Coupling::Uniform { .. } => panic!("ring topology should keep an adjacency"),
        }
        sim.set_count(5000);
        assert_eq!(sim.ensemble().len(), 2000, "count must clamp to 2000");
    }

    #[test]
    fn coupling_strength_updates_without_rebuild() {
        let mut params = quiet_params();
        params.topology = TopologyKind::Random;
        params.edge_prob = 0.5;
        let mut sim = Simulation::new(params);
        let before = match sim.coupling() {
            Coupling::Graph { adjacency, .. } => adjacency.clone(),
            Coupling::Uniform { .. } => panic!("random topology should keep an adjacency"),
        };
        sim.set_coupling_strength(7.5);
        match sim.coupling() {
            Coupling::Graph { k, adjacency } => {
                assert_eq!(*k, 7.5);
                assert_eq!(*adjacency, before, "strength change must not rebuild edges");
            }
            Coupling::Uniform { .. } => panic!("topology changed unexpectedly"),
        }
    }

    #[test]
    fn negative_coupling_clamps_to_zero() {
        let mut sim = Simulation::new(quiet_params());
        sim.set_coupling_strength(-3.0);
        assert_eq!(sim.params().coupling, 0.0);
    }

    #[test]
    fn sampling_respects_the_cadence() {
        let mut sim = Simulation::new(quiet_params());
        sim.set_running(true);
        // one step of 10 ms: below the 50 ms cadence, nothing recorded yet
        sim.advance(Duration::from_millis(10));
        assert_eq!(sim.history().len(), 0);
        // five more steps crosses the threshold exactly once
        for _ in 0..5 {
            sim.advance(Duration::from_millis(10));
        }
        assert_eq!(sim.history().len(), 1);
    }
}
