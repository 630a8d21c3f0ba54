//! Coupling topology: neighbor-relation construction and the coupling
//! context the field evaluator dispatches on.

use clap::ValueEnum;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Shape of the neighbor relation over the ensemble.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TopologyKind {
    /// Every oscillator couples to every other; no adjacency is stored.
    #[default]
    AllToAll,
    /// Each oscillator couples to its two neighbors on a cycle.
    Ring,
    /// Erdős–Rényi graph: each unordered pair is an edge with probability p.
    Random,
}

/// Per-oscillator neighbor lists. No self-loops; ring and random graphs are
/// symmetric.
pub type Adjacency = Vec<Vec<usize>>;

/// Coupling strength plus topology, resolved once per field evaluation.
#[derive(Clone, Debug)]
pub enum Coupling {
    /// All-to-all coupling, folded through the order parameter analytically.
    Uniform { k: f32 },
    /// Explicit adjacency, degree-normalized per oscillator.
    Graph { k: f32, adjacency: Adjacency },
}

impl Coupling {
    /// Build the coupling context for `kind` over `n` oscillators.
    /// `edge_prob` is only consulted for the random kind.
    pub fn build<R: Rng + ?Sized>(
        kind: TopologyKind,
        n: usize,
        edge_prob: f32,
        k: f32,
        rng: &mut R,
    ) -> Self {
        match build_adjacency(kind, n, edge_prob, rng) {
            None => Coupling::Uniform { k },
            Some(adjacency) => Coupling::Graph { k, adjacency },
        }
    }

    pub fn strength(&self) -> f32 {
        match self {
            Coupling::Uniform { k } | Coupling::Graph { k, .. } => *k,
        }
    }

    /// Update the coupling strength without rebuilding the adjacency.
    pub fn set_strength(&mut self, strength: f32) {
        match self {
            Coupling::Uniform { k } | Coupling::Graph { k, .. } => *k = strength,
        }
    }
}

/// Construct neighbor lists for `kind`; `None` is the all-to-all sentinel.
pub fn build_adjacency<R: Rng + ?Sized>(
    kind: TopologyKind,
    n: usize,
    edge_prob: f32,
    rng: &mut R,
) -> Option<Adjacency> {
    match kind {
        TopologyKind::AllToAll => None,
        TopologyKind::Ring => Some(ring_adjacency(n)),
        TopologyKind::Random => Some(random_adjacency(n, edge_prob, rng)),
    }
}

fn ring_adjacency(n: usize) -> Adjacency {
    let mut adj: Adjacency = vec![Vec::with_capacity(2); n];
    if n < 2 {
        return adj;
    }
    for (i, neighbors) in adj.iter_mut().enumerate() {
        let prev = (i + n - 1) % n;
        let next = (i + 1) % n;
        neighbors.push(prev);
        // n == 2: both ring neighbors are the same node, keep a single entry
        if next != prev {
            neighbors.push(next);
        }
    }
    adj
}

fn random_adjacency<R: Rng + ?Sized>(n: usize, edge_prob: f32, rng: &mut R) -> Adjacency {
    let p = f64::from(edge_prob.clamp(0.0, 1.0));
    let mut adj: Adjacency = vec![Vec::new(); n];
    for i in 0..n {
        for j in (i + 1)..n {
            if rng.random_bool(p) {
                adj[i].push(j);
                adj[j].push(i);
            }
        }
    }
    adj
}
