//! The in-memory netlist model.
//!
//! A [`Netlist`] is built once from validated [`Record`]s and is read-only
//! afterwards. Gates are stored in ascending id order, so gate
//! `offset + i` is matrix row `i`; nets are stored densely by id so per-net
//! tables can be indexed positionally.

use crate::error::{PlaceError, PlaceResult};
use crate::ids::{GateId, NetId, PinId};
use crate::record::{PlacementInput, Record};
use qplace_config::NetlistConfig;
use qplace_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Subject};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A movable gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// The gate's identity.
    pub id: GateId,
    /// Nets this gate belongs to, in record order.
    pub nets: Vec<NetId>,
}

/// A fixed pin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    /// The pin's identity.
    pub id: PinId,
    /// Fixed x coordinate.
    pub x: f64,
    /// Fixed y coordinate.
    pub y: f64,
    /// The single net this pin belongs to.
    pub net: NetId,
}

/// A member of a net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Member {
    /// A movable gate.
    Gate(GateId),
    /// A fixed pin.
    Pin(PinId),
}

/// A net and its members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Net {
    /// The net's identity.
    pub id: NetId,
    /// Members in record order: gates first, then pins.
    pub members: Vec<Member>,
}

impl Net {
    /// Number of members, gates and pins alike.
    pub fn degree(&self) -> usize {
        self.members.len()
    }

    /// Number of gate members, the `k` of clique weighting.
    pub fn gate_count(&self) -> usize {
        self.gates().count()
    }

    /// Gate members in order.
    pub fn gates(&self) -> impl Iterator<Item = GateId> + '_ {
        self.members.iter().filter_map(|m| match m {
            Member::Gate(g) => Some(*g),
            Member::Pin(_) => None,
        })
    }

    /// Pin members in order.
    pub fn pins(&self) -> impl Iterator<Item = PinId> + '_ {
        self.members.iter().filter_map(|m| match m {
            Member::Pin(p) => Some(*p),
            Member::Gate(_) => None,
        })
    }
}

/// Gates, pins, and nets of one placement problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Netlist {
    gates: Vec<Gate>,
    pins: Vec<Pin>,
    nets: Vec<Net>,
    gate_offset: u32,
}

impl Netlist {
    /// Builds the netlist from an input record stream.
    ///
    /// Fails with [`PlaceError::OutOfRange`] when a net id falls outside
    /// `[0, num_nets)` or gate ids do not form a contiguous range, and with
    /// [`PlaceError::MalformedInput`] on duplicate ids or duplicate
    /// membership. Empty nets, single-member nets, and floating pins are
    /// legal and reported to `sink` as warnings.
    pub fn from_input(
        input: &PlacementInput,
        config: &NetlistConfig,
        sink: &DiagnosticSink,
    ) -> PlaceResult<Self> {
        let num_nets = input.num_nets;
        let upper = i64::try_from(num_nets)
            .map_err(|_| PlaceError::malformed(format!("net count {num_nets} is too large")))?;
        let net_id = |raw: i64| -> PlaceResult<NetId> {
            if (0..upper).contains(&raw) {
                Ok(NetId::from_raw(raw as u32))
            } else {
                Err(PlaceError::OutOfRange {
                    kind: "net",
                    id: raw,
                    lower: 0,
                    upper,
                })
            }
        };

        let mut gates = BTreeMap::new();
        let mut pins = BTreeMap::new();
        for record in &input.records {
            match record {
                Record::Gate(rec) => {
                    let id = raw_id(rec.id, "gate")?;
                    let mut nets = Vec::with_capacity(rec.nets.len());
                    let mut seen = HashSet::with_capacity(rec.nets.len());
                    for &raw in &rec.nets {
                        let net = net_id(raw)?;
                        if !seen.insert(net) {
                            return Err(PlaceError::malformed(format!(
                                "gate {id} lists net {net} more than once"
                            )));
                        }
                        nets.push(net);
                    }
                    let gate = Gate {
                        id: GateId::from_raw(id),
                        nets,
                    };
                    if gates.insert(gate.id, gate).is_some() {
                        return Err(PlaceError::malformed(format!("duplicate gate id {id}")));
                    }
                }
                Record::Pin(rec) => {
                    let id = raw_id(rec.id, "pin")?;
                    let pin = Pin {
                        id: PinId::from_raw(id),
                        x: rec.x,
                        y: rec.y,
                        net: net_id(rec.net)?,
                    };
                    if pins.insert(pin.id, pin).is_some() {
                        return Err(PlaceError::malformed(format!("duplicate pin id {id}")));
                    }
                }
            }
        }

        let gates: Vec<Gate> = gates.into_values().collect();
        let pins: Vec<Pin> = pins.into_values().collect();
        let gate_offset = check_contiguous(&gates, config.gate_id_offset)?;

        // gates in record order first, then pins in record order
        let mut nets: Vec<Net> = (0..num_nets)
            .map(|i| Net {
                id: NetId::from_raw(i as u32),
                members: Vec::new(),
            })
            .collect();
        for record in &input.records {
            if let Record::Gate(rec) = record {
                let gate = GateId::from_raw(rec.id as u32);
                for &raw in &rec.nets {
                    nets[raw as usize].members.push(Member::Gate(gate));
                }
            }
        }
        for record in &input.records {
            if let Record::Pin(rec) = record {
                nets[rec.net as usize]
                    .members
                    .push(Member::Pin(PinId::from_raw(rec.id as u32)));
            }
        }

        let netlist = Netlist {
            gates,
            pins,
            nets,
            gate_offset,
        };
        netlist.report_shape(sink);
        log::debug!(
            target: "qplace",
            "netlist: {} gates (offset {}), {} pins, {} nets",
            netlist.gate_count(),
            netlist.gate_offset,
            netlist.pin_count(),
            netlist.net_count()
        );
        Ok(netlist)
    }

    fn report_shape(&self, sink: &DiagnosticSink) {
        for net in &self.nets {
            match net.degree() {
                0 => sink.emit(Diagnostic::warning(
                    DiagnosticCode::EMPTY_NET,
                    "net has no members",
                    Subject::Net(net.id.as_raw()),
                )),
                1 => sink.emit(
                    Diagnostic::warning(
                        DiagnosticCode::SINGLE_MEMBER_NET,
                        "net has a single member and contributes no edges",
                        Subject::Net(net.id.as_raw()),
                    )
                    .with_note(format!("only member: {}", describe(net.members[0]))),
                ),
                _ => {}
            }
        }
        for pin in &self.pins {
            if self.anchored_gates(pin).next().is_none() {
                sink.emit(
                    Diagnostic::warning(
                        DiagnosticCode::FLOATING_PIN,
                        "pin reaches no gate and anchors nothing",
                        Subject::Pin(pin.id.as_raw()),
                    )
                    .with_note(format!("net {} has no gate members", pin.net)),
                );
            }
        }
    }

    /// Number of gates, which is also the system dimension.
    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// Number of pins.
    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }

    /// Number of declared nets.
    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    /// Id of the first gate.
    pub fn gate_offset(&self) -> u32 {
        self.gate_offset
    }

    /// Gates in ascending id order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Pins in ascending id order.
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    /// Nets in id order.
    pub fn nets(&self) -> &[Net] {
        &self.nets
    }

    /// Returns the net with the given id, if declared.
    pub fn net(&self, id: NetId) -> Option<&Net> {
        self.nets.get(id.index())
    }

    /// Gates sharing a net with `pin`, the gates it anchors.
    pub fn anchored_gates<'a>(&'a self, pin: &Pin) -> impl Iterator<Item = GateId> + 'a {
        self.net(pin.net).into_iter().flat_map(|net| net.gates())
    }

    /// Returns the pin with the given id, if declared.
    pub fn pin(&self, id: PinId) -> Option<&Pin> {
        self.pins
            .binary_search_by_key(&id, |p| p.id)
            .ok()
            .map(|i| &self.pins[i])
    }

    /// Matrix row of a gate.
    pub fn row_of(&self, gate: GateId) -> usize {
        (gate.as_raw() - self.gate_offset) as usize
    }

    /// Gate occupying a matrix row.
    pub fn gate_at(&self, row: usize) -> GateId {
        self.gates[row].id
    }

    /// For every pin, the gates reachable through its net (used for
    /// anchoring), in ascending pin order.
    pub fn pin_membership(&self) -> BTreeMap<PinId, Vec<GateId>> {
        self.pins
            .iter()
            .map(|pin| (pin.id, self.anchored_gates(pin).collect()))
            .collect()
    }
}

fn raw_id(raw: i64, kind: &'static str) -> PlaceResult<u32> {
    u32::try_from(raw).map_err(|_| PlaceError::OutOfRange {
        kind,
        id: raw,
        lower: 0,
        upper: i64::from(u32::MAX) + 1,
    })
}

/// Confirms `gates` (sorted, unique) cover `[offset, offset + len)` and
/// returns the offset.
fn check_contiguous(gates: &[Gate], configured: Option<u32>) -> PlaceResult<u32> {
    let Some(first) = gates.first() else {
        return Ok(configured.unwrap_or(0));
    };
    let offset = configured.unwrap_or(first.id.as_raw());
    let lower = i64::from(offset);
    let upper = lower + gates.len() as i64;
    for (i, gate) in gates.iter().enumerate() {
        if i64::from(gate.id.as_raw()) != lower + i as i64 {
            return Err(PlaceError::OutOfRange {
                kind: "gate",
                id: i64::from(gate.id.as_raw()),
                lower,
                upper,
            });
        }
    }
    Ok(offset)
}

fn describe(member: Member) -> String {
    match member {
        Member::Gate(g) => format!("gate {g}"),
        Member::Pin(p) => format!("pin {p}"),
    }
}
