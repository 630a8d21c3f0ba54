//! Seeding-time helpers: tolerant numeric-list parsing and the frequency
//! distributions. None of this runs on the per-step hot path.

use std::f32::consts::PI;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Parse a whitespace/comma-separated list of reals into exactly `n` values.
///
/// Non-numeric tokens are dropped silently. Shorter lists are padded with the
/// last valid value; with no valid values every entry is 0.
pub fn parse_values(text: &str, n: usize) -> Vec<f32> {
    let mut values: Vec<f32> = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|tok| !tok.is_empty())
        .filter_map(|tok| tok.parse::<f32>().ok())
        .collect();
    let fill = values.last().copied().unwrap_or(0.0);
    values.resize(n, fill);
    values
}

/// Natural-frequency distribution used when (re)seeding the ensemble.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FreqDistribution {
    Gaussian { mean: f32, std_dev: f32 },
    /// Lorentzian; heavy tails, the classic analytically-solvable choice.
    Cauchy { location: f32, scale: f32 },
    Uniform { lo: f32, hi: f32 },
}

impl Default for FreqDistribution {
    fn default() -> Self {
        FreqDistribution::Gaussian {
            mean: 0.0,
            std_dev: 1.0,
        }
    }
}

impl FreqDistribution {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        match *self {
            FreqDistribution::Gaussian { mean, std_dev } => mean + std_dev * polar_normal(rng),
            FreqDistribution::Cauchy { location, scale } => {
                // inverse CDF: x0 + γ·tan(π(u − 1/2))
                let u: f32 = rng.random::<f32>();
                location + scale * (PI * (u - 0.5)).tan()
            }
            FreqDistribution::Uniform { lo, hi } => {
                if lo < hi {
                    rng.random_range(lo..hi)
                } else {
                    lo
                }
            }
        }
    }
}

/// One polar-method standard-normal draw from a caller-supplied generator.
/// The hot-path source in `core::noise` caches its spare; this seeding-time
/// variant just discards it.
fn polar_normal<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    loop {
        let u: f32 = rng.random_range(-1.0..1.0);
        let v: f32 = rng.random_range(-1.0..1.0);
        let s = u * u + v * v;
        if s > 0.0 && s < 1.0 {
            return u * (-2.0 * s.ln() / s).sqrt();
        }
    }
}
