//! Wirelength metrics for a finished placement.
//!
//! [`quadratic_wirelength`] is the objective the solve minimizes, so it is
//! the right yardstick for comparing placements of the same netlist.
//! [`total_hpwl`] is the half-perimeter wirelength, the usual quality
//! metric reported alongside it.

use crate::error::{PlaceError, PlaceResult};
use crate::ids::GateId;
use crate::netlist::{Net, Netlist};
use crate::placement::Placement;
use crate::system::anchor_stiffness;
use crate::weights::NetWeights;
use qplace_config::AnchorWeighting;

/// Sum of weighted squared distances over every clique edge and every pin
/// anchor, both axes included.
///
/// Gate pairs on a net contribute `w·d²`; each pin contributes `s·d²` to
/// every gate on its net, with the same stiffness `s` the system matrix uses.
pub fn quadratic_wirelength(
    netlist: &Netlist,
    weights: &NetWeights,
    weighting: AnchorWeighting,
    placement: &Placement,
) -> PlaceResult<f64> {
    check_len(netlist, placement)?;
    let pos = placement.as_slice();
    let point = |gate: GateId| {
        let p = &pos[netlist.row_of(gate)];
        (p.x, p.y)
    };

    let mut total = 0.0;
    for net in netlist.nets() {
        let w = weights.get(net.id);
        let gates: Vec<(f64, f64)> = net.gates().map(point).collect();
        for (a, &(xa, ya)) in gates.iter().enumerate() {
            for &(xb, yb) in &gates[a + 1..] {
                total += w * squared_distance(xa, ya, xb, yb);
            }
        }
    }
    for pin in netlist.pins() {
        let s = anchor_stiffness(weighting, weights.get(pin.net));
        for gate in netlist.anchored_gates(pin) {
            let (x, y) = point(gate);
            total += s * squared_distance(x, y, pin.x, pin.y);
        }
    }
    Ok(total)
}

/// Half-perimeter wirelength summed over all nets.
///
/// Each net's bounding box spans its placed gates and its fixed pins.
pub fn total_hpwl(netlist: &Netlist, placement: &Placement) -> PlaceResult<f64> {
    check_len(netlist, placement)?;
    Ok(netlist
        .nets()
        .iter()
        .map(|net| net_hpwl(netlist, placement, net))
        .sum())
}

fn net_hpwl(netlist: &Netlist, placement: &Placement, net: &Net) -> f64 {
    let pos = placement.as_slice();
    let gates = net.gates().map(|g| {
        let p = &pos[netlist.row_of(g)];
        (p.x, p.y)
    });
    let pins = net
        .pins()
        .filter_map(|p| netlist.pin(p))
        .map(|p| (p.x, p.y));

    let mut bbox: Option<(f64, f64, f64, f64)> = None;
    for (x, y) in gates.chain(pins) {
        bbox = Some(match bbox {
            None => (x, x, y, y),
            Some((min_x, max_x, min_y, max_y)) => {
                (min_x.min(x), max_x.max(x), min_y.min(y), max_y.max(y))
            }
        });
    }
    bbox.map_or(0.0, |(min_x, max_x, min_y, max_y)| {
        (max_x - min_x) + (max_y - min_y)
    })
}

fn squared_distance(xa: f64, ya: f64, xb: f64, yb: f64) -> f64 {
    let (dx, dy) = (xa - xb, ya - yb);
    dx * dx + dy * dy
}

fn check_len(netlist: &Netlist, placement: &Placement) -> PlaceResult<()> {
    if placement.len() != netlist.gate_count() {
        return Err(PlaceError::DimensionMismatch {
            expected: netlist.gate_count(),
            actual: placement.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{PlacementInput, Record};
    use nalgebra::DVector;
    use qplace_config::NetlistConfig;
    use qplace_diagnostics::DiagnosticSink;

    fn pair() -> Netlist {
        // g0 - g1 on net 0, pin at (0, 0) on g0, pin at (20, 4) on g1
        Netlist::from_input(
            &PlacementInput::new(
                3,
                vec![
                    Record::gate(0, &[0, 1]),
                    Record::gate(1, &[0, 2]),
                    Record::pin(0, 0.0, 0.0, 1),
                    Record::pin(1, 20.0, 4.0, 2),
                ],
            ),
            &NetlistConfig::default(),
            &DiagnosticSink::new(),
        )
        .unwrap()
    }

    fn at(netlist: &Netlist, xs: [f64; 2], ys: [f64; 2]) -> Placement {
        Placement::from_solution(
            netlist,
            &DVector::from_row_slice(&xs),
            &DVector::from_row_slice(&ys),
        )
        .unwrap()
    }

    #[test]
    fn quadratic_objective_by_hand() {
        let nl = pair();
        let w = NetWeights::compute(&nl, false);
        let p = at(&nl, [5.0, 15.0], [1.0, 3.0]);
        // edge: 10² + 2², anchors: 5² + 1² and 5² + 1²
        let q = quadratic_wirelength(&nl, &w, AnchorWeighting::NetWeight, &p).unwrap();
        assert_eq!(q, 104.0 + 26.0 + 26.0);
    }

    #[test]
    fn hpwl_by_hand() {
        let nl = pair();
        let p = at(&nl, [5.0, 15.0], [1.0, 3.0]);
        // net 0: 10 + 2, net 1: 5 + 1, net 2: 5 + 1
        assert_eq!(total_hpwl(&nl, &p).unwrap(), 24.0);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let nl = pair();
        let w = NetWeights::compute(&nl, false);
        let empty = Placement::default();
        assert!(matches!(
            total_hpwl(&nl, &empty),
            Err(PlaceError::DimensionMismatch { .. })
        ));
        assert!(quadratic_wirelength(&nl, &w, AnchorWeighting::Unit, &empty).is_err());
    }
}
