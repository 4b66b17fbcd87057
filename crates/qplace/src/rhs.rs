//! Right-hand-side vectors, one per axis.

use crate::netlist::Netlist;
use crate::system::anchor_stiffness;
use crate::weights::NetWeights;
use nalgebra::DVector;
use qplace_config::AnchorWeighting;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A placement coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

impl Axis {
    /// Both axes in solve order.
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    /// Index into per-axis arrays.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }

    /// The pin coordinate along this axis.
    pub fn of(self, x: f64, y: f64) -> f64 {
        match self {
            Axis::X => x,
            Axis::Y => y,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Builds `b` for one axis.
///
/// Every pin adds `coord · s(net)` to each gate of its net, where `s` is the
/// same anchor stiffness the system matrix puts on the diagonal. A gate
/// reached by several pins receives the sum of their contributions.
pub fn build_rhs(
    netlist: &Netlist,
    weights: &NetWeights,
    weighting: AnchorWeighting,
    axis: Axis,
) -> DVector<f64> {
    let mut b = DVector::zeros(netlist.gate_count());
    for pin in netlist.pins() {
        let pull = axis.of(pin.x, pin.y) * anchor_stiffness(weighting, weights.get(pin.net));
        for gate in netlist.anchored_gates(pin) {
            b[netlist.row_of(gate)] += pull;
        }
    }
    b
}
