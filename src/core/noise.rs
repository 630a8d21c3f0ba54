//! Standard-normal deviate source for the stochastic integrator terms.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Polar-method Gaussian source over a seeded generator.
///
/// Each accepted uniform pair yields two deviates; the second is cached and
/// must be handed out before the next pair is drawn.
#[derive(Clone, Debug)]
pub struct NormalSource {
    rng: SmallRng,
    spare: Option<f32>,
}

impl NormalSource {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            spare: None,
        }
    }

    /// Next standard-normal deviate (mean 0, variance 1).
    pub fn sample(&mut self) -> f32 {
        if let Some(z) = self.spare.take() {
            return z;
        }
        loop {
            let u: f32 = self.rng.random_range(-1.0..1.0);
            let v: f32 = self.rng.random_range(-1.0..1.0);
            let s = u * u + v * v;
            if s > 0.0 && s < 1.0 {
                let scale = (-2.0 * s.ln() / s).sqrt();
                self.spare = Some(v * scale);
                return u * scale;
            }
        }
    }
}
