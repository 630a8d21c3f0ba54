//! Fixed-step integrators over the phase vector: Euler–Maruyama, midpoint
//! RK2, and classic RK4.
//!
//! All three are deterministic ODE schemes with a single stochastic
//! perturbation applied at the final update; RK2/RK4 do not inject noise at
//! inner stages. Every intermediate state handed back to the field evaluator
//! is wrapped to (-PI, PI] so the trigonometric coupling sums stay
//! well-conditioned.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::field::eval_field;
use super::noise::NormalSource;
use super::phase::wrap_angle;
use super::topology::Coupling;

/// Integration scheme selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    #[default]
    Euler,
    Rk2,
    Rk4,
}

/// Per-step work buffers: four stage-velocity vectors and one stage-phase
/// vector. Reallocated only when the ensemble size changes.
#[derive(Clone, Debug, Default)]
pub struct Scratch {
    k1: Vec<f32>,
    k2: Vec<f32>,
    k3: Vec<f32>,
    k4: Vec<f32>,
    stage: Vec<f32>,
}

impl Scratch {
    pub fn new(n: usize) -> Self {
        let mut scratch = Self::default();
        scratch.ensure_len(n);
        scratch
    }

    /// Resize all buffers to `n`; a no-op when already sized.
    pub fn ensure_len(&mut self, n: usize) {
        if self.k1.len() == n {
            return;
        }
        self.k1.resize(n, 0.0);
        self.k2.resize(n, 0.0);
        self.k3.resize(n, 0.0);
        self.k4.resize(n, 0.0);
        self.stage.resize(n, 0.0);
    }
}

/// Advance `phases` in place by one timestep of the selected scheme.
///
/// The stochastic scale is sqrt(dt)·noise_amplitude; deviates are only drawn
/// when the amplitude is positive, one per oscillator, added at the final
/// update regardless of scheme order.
#[allow(clippy::too_many_arguments)]
pub fn step(
    method: Method,
    phases: &mut [f32],
    omegas: &[f32],
    dt: f32,
    noise_amplitude: f32,
    coupling: &Coupling,
    noise: &mut NormalSource,
    scratch: &mut Scratch,
) {
    debug_assert_eq!(phases.len(), omegas.len());
    scratch.ensure_len(phases.len());
    let sigma = if noise_amplitude > 0.0 {
        dt.sqrt() * noise_amplitude
    } else {
        0.0
    };
    match method {
        Method::Euler => euler(phases, omegas, dt, sigma, coupling, noise, scratch),
        Method::Rk2 => rk2(phases, omegas, dt, sigma, coupling, noise, scratch),
        Method::Rk4 => rk4(phases, omegas, dt, sigma, coupling, noise, scratch),
    }
}

#[inline]
fn perturbation(sigma: f32, noise: &mut NormalSource) -> f32 {
    if sigma > 0.0 { sigma * noise.sample() } else { 0.0 }
}

fn euler(
    phases: &mut [f32],
    omegas: &[f32],
    dt: f32,
    sigma: f32,
    coupling: &Coupling,
    noise: &mut NormalSource,
    scratch: &mut Scratch,
) {
    eval_field(&mut scratch.k1, phases, omegas, coupling);
    for (i, theta) in phases.iter_mut().enumerate() {
        *theta = wrap_angle(*theta + dt * scratch.k1[i] + perturbation(sigma, noise));
    }
}

fn rk2(
    phases: &mut [f32],
    omegas: &[f32],
    dt: f32,
    sigma: f32,
    coupling: &Coupling,
    noise: &mut NormalSource,
    scratch: &mut Scratch,
) {
    eval_field(&mut scratch.k1, phases, omegas, coupling);
    for (i, stage) in scratch.stage.iter_mut().enumerate() {
        *stage = wrap_angle(phases[i] + 0.5 * dt * scratch.k1[i]);
    }
    eval_field(&mut scratch.k2, &scratch.stage, omegas, coupling);
    for (i, theta) in phases.iter_mut().enumerate() {
        *theta = wrap_angle(*theta + dt * scratch.k2[i] + perturbation(sigma, noise));
    }
}

fn rk4(
    phases: &mut [f32],
    omegas: &[f32],
    dt: f32,
    sigma: f32,
    coupling: &Coupling,
    noise: &mut NormalSource,
    scratch: &mut Scratch,
) {
    eval_field(&mut scratch.k1, phases, omegas, coupling);
    for (i, stage) in scratch.stage.iter_mut().enumerate() {
        *stage = wrap_angle(phases[i] + 0.5 * dt * scratch.k1[i]);
    }
    eval_field(&mut scratch.k2, &scratch.stage, omegas, coupling);
    for (i, stage) in scratch.stage.iter_mut().enumerate() {
        *stage = wrap_angle(phases[i] + 0.5 * dt * scratch.k2[i]);
    }
    eval_field(&mut scratch.k3, &scratch.stage, omegas, coupling);
    for (i, stage) in scratch.stage.iter_mut().enumerate() {
        *stage = wrap_angle(phases[i] + dt * scratch.k3[i]);
    }
    eval_field(&mut scratch.k4, &scratch.stage, omegas, coupling);
    let sixth = dt / 6.0;
    for (i, theta) in phases.iter_mut().enumerate() {
        let slope = scratch.k1[i] + 2.0 * scratch.k2[i] + 2.0 * scratch.k3[i] + scratch.k4[i];
        *theta = wrap_angle(*theta + sixth * slope + perturbation(sigma, noise));
    }
}
