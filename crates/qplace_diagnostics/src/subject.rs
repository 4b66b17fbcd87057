//! The netlist entity a diagnostic points at.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a diagnostic is about.
///
/// Ids are the raw integers from the netlist input, so rendered diagnostics
/// can be matched against the input records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Subject {
    /// Not tied to a particular entity.
    None,
    /// A net by id.
    Net(u32),
    /// A gate by id.
    Gate(u32),
    /// A pin by id.
    Pin(u32),
    /// A set of system matrix rows.
    Rows(Vec<usize>),
}

impl Subject {
    /// Returns `true` for [`Subject::None`].
    pub fn is_none(&self) -> bool {
        matches!(self, Subject::None)
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::None => Ok(()),
            Subject::Net(id) => write!(f, "net {id}"),
            Subject::Gate(id) => write!(f, "gate {id}"),
            Subject::Pin(id) => write!(f, "pin {id}"),
            Subject::Rows(rows) => {
                write!(f, "rows ")?;
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{row}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_entities() {
        assert_eq!(Subject::Net(3).to_string(), "net 3");
        assert_eq!(Subject::Gate(7).to_string(), "gate 7");
        assert_eq!(Subject::Pin(1).to_string(), "pin 1");
        assert_eq!(Subject::None.to_string(), "");
    }

    #[test]
    fn display_rows() {
        assert_eq!(Subject::Rows(vec![0, 2, 5]).to_string(), "rows 0, 2, 5");
    }
}
