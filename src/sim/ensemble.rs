//! Oscillator ensemble: paired phase and natural-frequency vectors.

use std::f32::consts::PI;

use rand::Rng;

use super::seeding::{self, FreqDistribution};
use crate::core::phase::wrap_angle;

pub const MIN_OSCILLATORS: usize = 2;
pub const MAX_OSCILLATORS: usize = 2000;

/// Fixed-size ordered phase/frequency state. The two vectors always resize
/// together and are re-initialized as a pair; nothing outside the simulation
/// mutates them except the explicit seeding operations below.
#[derive(Clone, Debug)]
pub struct Ensemble {
    phases: Vec<f32>,
    omegas: Vec<f32>,
}

impl Ensemble {
    /// Create a zeroed ensemble; `n` is clamped to [2, 2000].
    pub fn new(n: usize) -> Self {
        let n = n.clamp(MIN_OSCILLATORS, MAX_OSCILLATORS);
        Self {
            phases: vec![0.0; n],
            omegas: vec![0.0; n],
        }
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn phases(&self) -> &[f32] {
        &self.phases
    }

    pub fn omegas(&self) -> &[f32] {
        &self.omegas
    }

    /// Mutable phases alongside shared frequencies, for the integrator.
    pub fn split_mut(&mut self) -> (&mut [f32], &[f32]) {
        (&mut self.phases, &self.omegas)
    }

    /// Resize both vectors to `n` (clamped) and zero every entry, not just
    /// the tail. Returns the effective size.
    pub fn resize(&mut self, n: usize) -> usize {
        let n = n.clamp(MIN_OSCILLATORS, MAX_OSCILLATORS);
        self.phases.clear();
        self.phases.resize(n, 0.0);
        self.omegas.clear();
        self.omegas.resize(n, 0.0);
        n
    }

    /// Scatter phases uniformly over (-PI, PI].
    pub fn seed_phases_random<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for p in &mut self.phases {
            *p = rng.random_range(-PI..PI);
        }
    }

    /// Seed phases from a user-supplied numeric list (filter-and-pad
    /// semantics); every value is wrapped to (-PI, PI].
    pub fn seed_phases_from_list(&mut self, text: &str) {
        let values = seeding::parse_values(text, self.len());
        for (p, v) in self.phases.iter_mut().zip(values) {
            *p = wrap_angle(v);
        }
    }

    /// Seed natural frequencies from a user-supplied numeric list.
    pub fn seed_omegas_from_list(&mut self, text: &str) {
        let values = seeding::parse_values(text, self.len());
        self.omegas.copy_from_slice(&values);
    }

    /// Draw natural frequencies from `dist`.
    pub fn seed_omegas<R: Rng + ?Sized>(&mut self, dist: FreqDistribution, rng: &mut R) {
        for w in &mut self.omegas {
            *w = dist.sample(rng);
        }
    }
}
