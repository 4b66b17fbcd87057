//! Clique net weights.
//!
//! A net with `k` gate members is expanded into `k·(k−1)/2` pairwise edges.
//! Each edge carries `1/(k−1)` so the total pull of a large net stays
//! bounded. Pins do not count toward `k`; they only anchor. Weights stay
//! `f64` through every later stage.

use crate::ids::NetId;
use crate::netlist::Netlist;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Clique weight for a net with `k` gate members: `1/(k−1)` when `k > 1`,
/// otherwise `k`.
pub fn clique_weight(k: usize) -> f64 {
    if k > 1 {
        1.0 / (k - 1) as f64
    } else {
        k as f64
    }
}

/// One weight per net, indexed by net id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetWeights(Vec<f64>);

impl NetWeights {
    /// Computes the clique weight of every net.
    ///
    /// Nets are independent, so `parallel` only changes scheduling; the
    /// result is identical either way.
    pub fn compute(netlist: &Netlist, parallel: bool) -> Self {
        let nets = netlist.nets();
        let weights = if parallel {
            nets.par_iter().map(|n| clique_weight(n.gate_count())).collect()
        } else {
            nets.iter().map(|n| clique_weight(n.gate_count())).collect()
        };
        NetWeights(weights)
    }

    /// Weight of a net.
    pub fn get(&self, net: NetId) -> f64 {
        self.0[net.index()]
    }

    /// All weights in net id order.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Number of nets covered.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when there are no nets.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
