//! Typed netlist records.
//!
//! The parsing collaborator hands the core a stream of [`Record`]s. Each
//! record is validated for shape here (field count, integer and coordinate
//! syntax); id ranges are checked later by [`Netlist`](crate::Netlist)
//! construction, which knows the declared net count.
//!
//! Text form, one record per line:
//!
//! ```text
//! <id> g <k> <net_1> ... <net_k>     gate on k nets
//! <id> p <x> <y> <net>               pin at (x, y) on one net
//! ```

use crate::error::{PlaceError, PlaceResult};
use serde::{Deserialize, Serialize};

/// Line marker the text format uses as an end-of-section sentinel.
const SENTINEL: &str = "-1";

/// A movable gate and the nets it connects to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateRecord {
    /// Raw gate id.
    pub id: i64,
    /// Raw net ids, in record order.
    pub nets: Vec<i64>,
}

/// A fixed pin, its position, and the single net it drives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinRecord {
    /// Raw pin id.
    pub id: i64,
    /// Fixed x coordinate.
    pub x: f64,
    /// Fixed y coordinate.
    pub y: f64,
    /// Raw net id.
    pub net: i64,
}

/// One netlist input record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Record {
    /// A gate record.
    Gate(GateRecord),
    /// A pin record.
    Pin(PinRecord),
}

impl Record {
    /// Builds a gate record.
    pub fn gate(id: i64, nets: &[i64]) -> Self {
        Record::Gate(GateRecord {
            id,
            nets: nets.to_vec(),
        })
    }

    /// Builds a pin record.
    pub fn pin(id: i64, x: f64, y: f64, net: i64) -> Self {
        Record::Pin(PinRecord { id, x, y, net })
    }

    /// Validates one whitespace-tokenized record.
    pub fn from_fields(fields: &[&str]) -> PlaceResult<Self> {
        if fields.len() < 2 {
            return Err(PlaceError::malformed(format!(
                "expected at least 2 fields, got {}",
                fields.len()
            )));
        }
        let id = parse_int(fields[0], "id")?;
        match fields[1] {
            "g" => {
                if fields.len() < 3 {
                    return Err(PlaceError::malformed(
                        "gate record is missing its connection count",
                    ));
                }
                let count = parse_int(fields[2], "connection count")?;
                let count = usize::try_from(count).map_err(|_| {
                    PlaceError::malformed(format!("negative connection count {count}"))
                })?;
                let expected = count.checked_add(3).ok_or_else(|| {
                    PlaceError::malformed(format!("connection count {count} is too large"))
                })?;
                if fields.len() != expected {
                    return Err(PlaceError::malformed(format!(
                        "gate {id} declares {count} nets: expected {expected} fields, got {}",
                        fields.len()
                    )));
                }
                let nets = fields[3..]
                    .iter()
                    .map(|f| parse_int(f, "net id"))
                    .collect::<PlaceResult<Vec<_>>>()?;
                Ok(Record::Gate(GateRecord { id, nets }))
            }
            "p" => {
                if fields.len() != 5 {
                    return Err(PlaceError::malformed(format!(
                        "pin {id}: expected 5 fields, got {}",
                        fields.len()
                    )));
                }
                Ok(Record::Pin(PinRecord {
                    id,
                    x: parse_coord(fields[2], "x")?,
                    y: parse_coord(fields[3], "y")?,
                    net: parse_int(fields[4], "net id")?,
                }))
            }
            tag => Err(PlaceError::malformed(format!(
                "unknown record tag `{tag}` (expected `g` or `p`)"
            ))),
        }
    }
}

fn parse_int(field: &str, what: &str) -> PlaceResult<i64> {
    field
        .parse::<i64>()
        .map_err(|_| PlaceError::malformed(format!("{what} `{field}` is not an integer")))
}

fn parse_coord(field: &str, axis: &str) -> PlaceResult<f64> {
    match field.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(PlaceError::malformed(format!(
            "{axis} coordinate `{field}` is not a finite number"
        ))),
    }
}

/// A declared net count plus the records that populate it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlacementInput {
    /// Net ids must lie in `[0, num_nets)`.
    pub num_nets: usize,
    /// Gate and pin records in input order.
    pub records: Vec<Record>,
}

impl PlacementInput {
    /// Creates an input from a net count and records.
    pub fn new(num_nets: usize, records: Vec<Record>) -> Self {
        Self { num_nets, records }
    }
}

/// Reads the text placement format into a [`PlacementInput`].
///
/// The first non-blank line is the header; its first integer is the net
/// count (a second integer, when present, is accepted and ignored). Blank
/// lines and `-1` sentinels are skipped.
pub fn parse_str(text: &str) -> PlaceResult<PlacementInput> {
    let mut num_nets = None;
    let mut records = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() || fields == [SENTINEL] {
            continue;
        }
        if num_nets.is_none() {
            num_nets = Some(parse_header(&fields).map_err(|e| e.at_line(line_no))?);
            continue;
        }
        records.push(Record::from_fields(&fields).map_err(|e| e.at_line(line_no))?);
    }

    let num_nets = num_nets.ok_or_else(|| PlaceError::malformed("missing header line"))?;
    Ok(PlacementInput { num_nets, records })
}

fn parse_header(fields: &[&str]) -> PlaceResult<usize> {
    if fields.len() > 2 {
        return Err(PlaceError::malformed(format!(
            "header: expected 1 or 2 fields, got {}",
            fields.len()
        )));
    }
    for field in &fields[1..] {
        parse_int(field, "header field")?;
    }
    let count = parse_int(fields[0], "net count")?;
    usize::try_from(count).map_err(|_| PlaceError::malformed(format!("negative net count {count}")))
}
