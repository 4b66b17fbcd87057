//! Gate-to-gate connectivity matrix `C`.
//!
//! `C[i][j]` accumulates the clique weight of every net containing both gate
//! `i` and gate `j`. Pins are left out; they only enter through the anchor
//! terms of the system matrix. The diagonal stays zero.

use crate::netlist::Netlist;
use crate::weights::NetWeights;
use nalgebra_sparse::{CooMatrix, CscMatrix};
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Symmetric sparse gate×gate matrix of accumulated net weights.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectivityMatrix {
    matrix: CscMatrix<f64>,
}

impl ConnectivityMatrix {
    /// Expands every net into its clique and accumulates the edge weights.
    ///
    /// Edges are generated per net (in parallel when asked), then reduced in
    /// net order into one entry per unordered gate pair. Each pair is written
    /// to both `(i, j)` and `(j, i)` from the same sum, so the matrix is
    /// exactly symmetric and identical across runs.
    pub fn build(netlist: &Netlist, weights: &NetWeights, parallel: bool) -> Self {
        let n = netlist.gate_count();
        let net_edges = |net: &crate::netlist::Net| -> Vec<(usize, usize, f64)> {
            let w = weights.get(net.id);
            let rows: Vec<usize> = net.gates().map(|g| netlist.row_of(g)).collect();
            let mut edges = Vec::with_capacity(rows.len() * rows.len().saturating_sub(1) / 2);
            for (a, &ra) in rows.iter().enumerate() {
                for &rb in &rows[a + 1..] {
                    edges.push((ra.min(rb), ra.max(rb), w));
                }
            }
            edges
        };
        let edges: Vec<(usize, usize, f64)> = if parallel {
            netlist.nets().par_iter().flat_map_iter(net_edges).collect()
        } else {
            netlist.nets().iter().flat_map(net_edges).collect()
        };

        let mut upper: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        for (i, j, w) in edges {
            *upper.entry((i, j)).or_insert(0.0) += w;
        }

        let mut coo = CooMatrix::new(n, n);
        for (&(i, j), &w) in &upper {
            coo.push(i, j, w);
            coo.push(j, i, w);
        }
        log::debug!(
            target: "qplace",
            "connectivity: {n}x{n}, {} gate pairs",
            upper.len()
        );
        ConnectivityMatrix {
            matrix: CscMatrix::from(&coo),
        }
    }

    /// Number of gates (rows and columns).
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// Stored nonzero entries, counting both triangles.
    pub fn nnz(&self) -> usize {
        self.matrix.nnz()
    }

    /// `C[i][j]`, zero when no net joins the two gates.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.matrix
            .get_entry(i, j)
            .map(|e| e.into_value())
            .unwrap_or(0.0)
    }

    /// Row sums of `C`, the unanchored Laplacian degree of every gate.
    pub fn row_sums(&self) -> Vec<f64> {
        // symmetric, so column sums equal row sums
        self.matrix
            .col_iter()
            .map(|col| col.values().iter().sum())
            .collect()
    }

    /// Iterates `(row, col, value)` over stored entries.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.matrix.triplet_iter().map(|(i, j, &v)| (i, j, v))
    }

    /// Checks `C[i][j] == C[j][i]` exactly for every stored entry.
    pub fn is_symmetric(&self) -> bool {
        self.entries().all(|(i, j, v)| self.get(j, i) == v)
    }

    /// The underlying sparse matrix.
    pub fn as_csc(&self) -> &CscMatrix<f64> {
        &self.matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{PlacementInput, Record};
    use qplace_config::NetlistConfig;
    use qplace_diagnostics::DiagnosticSink;

    fn netlist(num_nets: usize, records: Vec<Record>) -> Netlist {
        Netlist::from_input(
            &PlacementInput::new(num_nets, records),
            &NetlistConfig::default(),
            &DiagnosticSink::new(),
        )
        .unwrap()
    }

    #[test]
    fn two_gate_net() {
        let nl = netlist(1, vec![Record::gate(5, &[0]), Record::gate(6, &[0])]);
        let w = NetWeights::compute(&nl, false);
        let c = ConnectivityMatrix::build(&nl, &w, false);
        assert_eq!(c.dim(), 2);
        assert_eq!(c.get(0, 1), 1.0);
        assert_eq!(c.get(1, 0), 1.0);
        assert_eq!(c.get(0, 0), 0.0);
        assert_eq!(c.nnz(), 2);
    }

    #[test]
    fn clique_expansion_of_four_gates() {
        let records = (0..4).map(|g| Record::gate(g, &[0])).collect();
        let nl = netlist(1, records);
        let w = NetWeights::compute(&nl, false);
        let c = ConnectivityMatrix::build(&nl, &w, false);
        // k(k-1) = 12 directed entries of weight 1/3
        assert_eq!(c.nnz(), 12);
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 0.0 } else { 1.0 / 3.0 };
                assert_eq!(c.get(i, j), expected);
            }
        }
        for sum in c.row_sums() {
            assert!((sum - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn pins_neither_enter_nor_weaken_the_clique() {
        let nl = netlist(
            1,
            vec![
                Record::gate(0, &[0]),
                Record::gate(1, &[0]),
                Record::pin(0, 3.0, 3.0, 0),
            ],
        );
        let w = NetWeights::compute(&nl, false);
        let c = ConnectivityMatrix::build(&nl, &w, false);
        assert_eq!(c.dim(), 2);
        assert_eq!(c.get(0, 1), 1.0);
    }

    #[test]
    fn shared_nets_accumulate() {
        let nl = netlist(
            2,
            vec![
                Record::gate(0, &[0, 1]),
                Record::gate(1, &[0, 1]),
                Record::gate(2, &[1]),
            ],
        );
        let w = NetWeights::compute(&nl, false);
        let c = ConnectivityMatrix::build(&nl, &w, false);
        assert_eq!(c.get(0, 1), 1.5);
        assert_eq!(c.get(0, 2), 0.5);
        assert_eq!(c.get(1, 2), 0.5);
        assert!(c.is_symmetric());
    }

    #[test]
    fn parallel_matches_sequential() {
        let records = (0..20)
            .map(|g| Record::gate(g, &[g % 3, 3 + (g * 7) % 3]))
            .collect();
        let nl = netlist(6, records);
        let w = NetWeights::compute(&nl, true);
        let seq = ConnectivityMatrix::build(&nl, &w, false);
        let par = ConnectivityMatrix::build(&nl, &w, true);
        assert_eq!(seq, par);
    }

    #[test]
    fn isolated_gate_has_empty_row() {
        let nl = netlist(1, vec![Record::gate(0, &[0]), Record::gate(1, &[])]);
        let w = NetWeights::compute(&nl, false);
        let c = ConnectivityMatrix::build(&nl, &w, false);
        assert_eq!(c.row_sums(), [0.0, 0.0]);
        assert_eq!(c.nnz(), 0);
    }
}
