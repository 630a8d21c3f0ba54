//! Field evaluator: instantaneous phase velocity dθᵢ/dt for every oscillator.

use super::order::compute_order;
use super::topology::Coupling;

/// Write `out[i] = ωᵢ + coupling term(i)` for the current phase configuration.
///
/// For uniform (all-to-all) coupling the pairwise sum collapses through the
/// order parameter, (K/N)·Σⱼ sin(θⱼ−θᵢ) = K·r·sin(ψ−θᵢ), so the whole pass is
/// O(N) instead of O(N²). Graph coupling normalizes the neighbor sum by
/// degree; isolated oscillators get no coupling term.
pub fn eval_field(out: &mut [f32], phases: &[f32], omegas: &[f32], coupling: &Coupling) {
    debug_assert_eq!(out.len(), phases.len());
    debug_assert_eq!(omegas.len(), phases.len());
    match coupling {
        Coupling::Uniform { k } => {
            let order = compute_order(phases);
            let gain = k * order.r;
            for ((dst, &theta), &omega) in out.iter_mut().zip(phases).zip(omegas) {
                *dst = omega + gain * (order.psi - theta).sin();
            }
        }
        Coupling::Graph { k, adjacency } => {
            for (i, dst) in out.iter_mut().enumerate() {
                let neighbors = &adjacency[i];
                if neighbors.is_empty() {
                    *dst = omegas[i];
                    continue;
                }
                let mut sum = 0.0f32;
                for &j in neighbors {
                    sum += (phases[j] - phases[i]).sin();
                }
                *dst = omegas[i] + k / neighbors.len() as f32 * sum;
            }
        }
    }
}
