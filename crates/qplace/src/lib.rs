//! Quadratic (analytical) placement.
//!
//! Given movable gates, fixed pins, and the nets connecting them, computes
//! gate coordinates minimizing total quadratic wirelength with pins acting as
//! anchors. Each net of `k` gate members is expanded into a clique of edges
//! weighted `1/(k−1)`. The gate-to-gate weights form a connectivity matrix
//! `C`; its Laplacian plus pin anchor terms is the system matrix `A`. One
//! sparse symmetric solve per axis yields the coordinates.
//!
//! The crate is organized as a staged pipeline:
//!
//! - [`record`]: typed gate and pin records, plus a text adapter
//! - [`netlist`]: the validated in-memory netlist
//! - [`weights`]: clique net weights
//! - [`connectivity`]: the gate connectivity matrix `C`
//! - [`system`]: the anchored system matrix `A`
//! - [`rhs`]: per-axis right-hand sides
//! - [`solver`]: direct and conjugate gradient solves
//! - [`pipeline`]: the stage sequence tying them together
//! - [`placement`] and [`metrics`]: the result and its wirelength

#![warn(missing_docs)]

pub mod connectivity;
pub mod error;
pub mod ids;
pub mod metrics;
pub mod netlist;
pub mod pipeline;
pub mod placement;
pub mod record;
pub mod rhs;
pub mod solver;
pub mod system;
pub mod weights;

pub use connectivity::ConnectivityMatrix;
pub use error::{PlaceError, PlaceResult};
pub use ids::{GateId, NetId, PinId};
pub use netlist::{Gate, Member, Net, Netlist, Pin};
pub use pipeline::{PlacementPipeline, Stage};
pub use placement::{GatePosition, Placement};
pub use record::{GateRecord, PinRecord, PlacementInput, Record};
pub use rhs::Axis;
pub use solver::LinearSolver;
pub use system::SystemMatrix;
pub use weights::NetWeights;

use qplace_config::PlacerConfig;
use qplace_diagnostics::DiagnosticSink;

/// Places `input` under `config`, reporting non-fatal findings to `sink`.
///
/// Any error means no placement was produced.
pub fn place(
    input: PlacementInput,
    config: &PlacerConfig,
    sink: &DiagnosticSink,
) -> PlaceResult<Placement> {
    PlacementPipeline::new(input, config.clone(), sink).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_pin_pulls_every_gate_onto_it() {
        let input = PlacementInput::new(
            1,
            vec![
                Record::gate(0, &[0]),
                Record::gate(1, &[0]),
                Record::gate(2, &[0]),
                Record::pin(0, 10.0, -4.0, 0),
            ],
        );
        let placement = place(input, &PlacerConfig::default(), &DiagnosticSink::new()).unwrap();
        for pos in &placement {
            assert!((pos.x - 10.0).abs() < 1e-9, "{pos:?}");
            assert!((pos.y + 4.0).abs() < 1e-9, "{pos:?}");
        }
    }

    #[test]
    fn empty_netlist_places_nothing() {
        let placement = place(
            PlacementInput::default(),
            &PlacerConfig::default(),
            &DiagnosticSink::new(),
        )
        .unwrap();
        assert!(placement.is_empty());
    }

    #[test]
    fn malformed_input_aborts() {
        let input = PlacementInput::new(1, vec![Record::gate(0, &[3])]);
        let err = place(input, &PlacerConfig::default(), &DiagnosticSink::new()).unwrap_err();
        assert!(matches!(err, PlaceError::OutOfRange { kind: "net", .. }));
    }
}
