//! The anchored Laplacian `A`.
//!
//! Off-diagonal entries are `−C[i][j]`. The diagonal is the row sum of `C`
//! plus one anchor stiffness term for every pin sharing a net with the gate.
//! Without anchors every row sums to zero and `A` is singular.

use crate::connectivity::ConnectivityMatrix;
use crate::netlist::Netlist;
use crate::weights::NetWeights;
use nalgebra_sparse::{CooMatrix, CscMatrix, CsrMatrix};
use qplace_config::AnchorWeighting;

/// Stiffness of one pin anchor on a net of weight `net_weight`.
///
/// The same value scales the pin coordinate on the right-hand side, so a
/// gate tied only to one pin settles exactly on it under either weighting.
pub fn anchor_stiffness(weighting: AnchorWeighting, net_weight: f64) -> f64 {
    match weighting {
        AnchorWeighting::NetWeight => net_weight,
        AnchorWeighting::Unit => 1.0,
    }
}

/// The placement system matrix plus the anchor part of its diagonal.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemMatrix {
    matrix: CscMatrix<f64>,
    anchors: Vec<f64>,
}

impl SystemMatrix {
    /// Derives `A` from `C` and the pin anchors of `netlist`.
    ///
    /// Anchors are per pin: two pins on the same net add two anchor terms.
    pub fn build(
        connectivity: &ConnectivityMatrix,
        netlist: &Netlist,
        weights: &NetWeights,
        weighting: AnchorWeighting,
    ) -> Self {
        let n = connectivity.dim();
        let mut anchors = vec![0.0; n];
        for pin in netlist.pins() {
            let stiffness = anchor_stiffness(weighting, weights.get(pin.net));
            for gate in netlist.anchored_gates(pin) {
                anchors[netlist.row_of(gate)] += stiffness;
            }
        }

        let degrees = connectivity.row_sums();
        let mut coo = CooMatrix::new(n, n);
        for (i, j, v) in connectivity.entries() {
            if i != j {
                coo.push(i, j, -v);
            }
        }
        for (i, (&degree, &anchor)) in degrees.iter().zip(&anchors).enumerate() {
            coo.push(i, i, degree + anchor);
        }
        log::debug!(
            target: "qplace",
            "system matrix: {n}x{n}, {} anchored rows",
            anchors.iter().filter(|&&a| a > 0.0).count()
        );
        SystemMatrix {
            matrix: CscMatrix::from(&coo),
            anchors,
        }
    }

    /// System dimension.
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// `A[i][j]`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.matrix
            .get_entry(i, j)
            .map(|e| e.into_value())
            .unwrap_or(0.0)
    }

    /// Anchor stiffness included in each diagonal entry.
    pub fn anchors(&self) -> &[f64] {
        &self.anchors
    }

    /// Whether row `i` is tied to at least one pin.
    pub fn is_anchored(&self, i: usize) -> bool {
        self.anchors[i] > 0.0
    }

    /// Iterates `(row, col, value)` over stored entries.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.matrix.triplet_iter().map(|(i, j, &v)| (i, j, v))
    }

    /// The matrix in compressed-column form.
    pub fn as_csc(&self) -> &CscMatrix<f64> {
        &self.matrix
    }

    /// The matrix in compressed-row form, for matrix-vector products.
    pub fn to_csr(&self) -> CsrMatrix<f64> {
        CsrMatrix::from(&self.matrix)
    }
}
