//! The solved gate coordinates.

use crate::error::{PlaceError, PlaceResult};
use crate::ids::GateId;
use crate::netlist::Netlist;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// Position of one gate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GatePosition {
    /// The gate.
    pub gate: GateId,
    /// Solved x coordinate.
    pub x: f64,
    /// Solved y coordinate.
    pub y: f64,
}

/// Gate id → (x, y), in ascending gate id order.
///
/// Coordinates share the units of the input pin coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    positions: Vec<GatePosition>,
    gate_offset: u32,
}

impl Placement {
    /// Pairs the per-axis solutions with the gates occupying each row.
    pub fn from_solution(
        netlist: &Netlist,
        x: &DVector<f64>,
        y: &DVector<f64>,
    ) -> PlaceResult<Self> {
        let n = netlist.gate_count();
        for v in [x, y] {
            if v.len() != n {
                return Err(PlaceError::DimensionMismatch {
                    expected: n,
                    actual: v.len(),
                });
            }
        }
        let positions = (0..n)
            .map(|row| GatePosition {
                gate: netlist.gate_at(row),
                x: x[row],
                y: y[row],
            })
            .collect();
        Ok(Placement {
            positions,
            gate_offset: netlist.gate_offset(),
        })
    }

    /// Position of `gate`, if it was placed.
    pub fn get(&self, gate: GateId) -> Option<&GatePosition> {
        let row = gate.as_raw().checked_sub(self.gate_offset)? as usize;
        self.positions.get(row)
    }

    /// Positions in ascending gate id order.
    pub fn iter(&self) -> impl Iterator<Item = &GatePosition> {
        self.positions.iter()
    }

    /// Positions as a slice, indexed by matrix row.
    pub fn as_slice(&self) -> &[GatePosition] {
        &self.positions
    }

    /// Number of placed gates.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` when no gates were placed.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// One `"<gate> <x> <y>"` line per gate, for plotting tools.
    pub fn to_lines(&self) -> Vec<String> {
        self.positions
            .iter()
            .map(|p| format!("{} {} {}", p.gate, p.x, p.y))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Placement {
    type Item = &'a GatePosition;
    type IntoIter = std::slice::Iter<'a, GatePosition>;

    fn into_iter(self) -> Self::IntoIter {
        self.positions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{PlacementInput, Record};
    use qplace_config::NetlistConfig;
    use qplace_diagnostics::DiagnosticSink;

    fn netlist() -> Netlist {
        Netlist::from_input(
            &PlacementInput::new(1, vec![Record::gate(5, &[0]), Record::gate(6, &[0])]),
            &NetlistConfig::default(),
            &DiagnosticSink::new(),
        )
        .unwrap()
    }

    fn placement() -> Placement {
        Placement::from_solution(
            &netlist(),
            &DVector::from_vec(vec![1.5, 2.0]),
            &DVector::from_vec(vec![-1.0, 0.25]),
        )
        .unwrap()
    }

    #[test]
    fn lookup_by_gate_id() {
        let p = placement();
        assert_eq!(p.len(), 2);
        let g6 = p.get(GateId::from_raw(6)).unwrap();
        assert_eq!((g6.x, g6.y), (2.0, 0.25));
        assert!(p.get(GateId::from_raw(4)).is_none());
        assert!(p.get(GateId::from_raw(7)).is_none());
    }

    #[test]
    fn iterates_in_gate_order() {
        let gates: Vec<u32> = placement().iter().map(|p| p.gate.as_raw()).collect();
        assert_eq!(gates, [5, 6]);
    }

    #[test]
    fn text_lines() {
        assert_eq!(placement().to_lines(), ["5 1.5 -1", "6 2 0.25"]);
    }

    #[test]
    fn wrong_length_is_dimension_mismatch() {
        let err = Placement::from_solution(
            &netlist(),
            &DVector::from_vec(vec![1.0]),
            &DVector::from_vec(vec![1.0, 2.0]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PlaceError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn serializes_to_json() {
        let p = placement();
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"gate\":5"));
        let back: Placement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
