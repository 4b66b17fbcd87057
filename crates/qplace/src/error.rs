//! Error types for the placement core.

use crate::ids::GateId;
use crate::netlist::Netlist;
use crate::pipeline::Stage;
use qplace_config::ConfigError;

/// Everything that can stop a placement run.
///
/// No error is recovered inside the core; any of these means no placement
/// was produced.
#[derive(Debug, thiserror::Error)]
pub enum PlaceError {
    /// A record does not have the expected shape.
    #[error("malformed input{}: {reason}", line_suffix(.line))]
    MalformedInput {
        /// 1-based input line, when the record came from text.
        line: Option<usize>,
        /// What is wrong with the record.
        reason: String,
    },

    /// A net or member id falls outside its declared index space.
    #[error("{kind} id {id} out of range [{lower}, {upper})")]
    OutOfRange {
        /// Which id space was violated (`"net"`, `"gate"`).
        kind: &'static str,
        /// The offending id.
        id: i64,
        /// Inclusive lower bound.
        lower: i64,
        /// Exclusive upper bound.
        upper: i64,
    },

    /// Some gates have no path to any fixed pin, so `A` is singular.
    #[error("singular system: rows {rows:?} have no path to a fixed pin")]
    SingularSystem {
        /// The unanchored matrix rows, ascending.
        rows: Vec<usize>,
    },

    /// The solver failed on a structurally sound system.
    #[error("numeric failure: {reason}")]
    NumericFailure {
        /// Description of the failure.
        reason: String,
    },

    /// A vector does not match the system dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The system dimension.
        expected: usize,
        /// The length that was supplied.
        actual: usize,
    },

    /// A pipeline stage was invoked before the stage it depends on.
    #[error("stage `{stage}` requires `{requires}` to complete first")]
    StageOrder {
        /// The stage that was called.
        stage: Stage,
        /// The stage that has not run yet.
        requires: Stage,
    },

    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|l| format!(" at line {l}")).unwrap_or_default()
}

impl PlaceError {
    /// Shorthand for a [`PlaceError::MalformedInput`] without a line number.
    pub fn malformed(reason: impl Into<String>) -> Self {
        PlaceError::MalformedInput {
            line: None,
            reason: reason.into(),
        }
    }

    /// Attaches a line number to a [`PlaceError::MalformedInput`]; other
    /// variants are returned unchanged.
    pub fn at_line(self, line: usize) -> Self {
        match self {
            PlaceError::MalformedInput { reason, .. } => PlaceError::MalformedInput {
                line: Some(line),
                reason,
            },
            other => other,
        }
    }

    /// Maps the rows of a [`PlaceError::SingularSystem`] back to gate ids.
    ///
    /// Returns an empty list for every other variant.
    pub fn unanchored_gates(&self, netlist: &Netlist) -> Vec<GateId> {
        match self {
            PlaceError::SingularSystem { rows } => {
                rows.iter().map(|&row| netlist.gate_at(row)).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// The result type used throughout the placement core.
pub type PlaceResult<T> = Result<T, PlaceError>;
