//! Kuramoto order parameter: the circular mean of the phase vector,
//! r·e^{iψ} = (1/N)·Σⱼ e^{iθⱼ}.

/// Ensemble synchrony summary. `r` is 1 for perfect alignment and 0 for
/// maximal dispersion; `psi` is the mean phase in (-PI, PI].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Order {
    pub r: f32,
    pub psi: f32,
}

/// Circular mean of a phase vector. Pure, O(N).
pub fn compute_order(phases: &[f32]) -> Order {
    if phases.is_empty() {
        return Order::default();
    }
    let mut sum_cos = 0.0f32;
    let mut sum_sin = 0.0f32;
    for &theta in phases {
        sum_cos += theta.cos();
        sum_sin += theta.sin();
    }
    let n = phases.len() as f32;
    let c = sum_cos / n;
    let s = sum_sin / n;
    Order {
        r: c.hypot(s).min(1.0),
        psi: s.atan2(c),
    }
}
