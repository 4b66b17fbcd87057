//! Diagnostic codes with category prefixes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Fatal placement problems, prefixed with `E`.
    Error,
    /// Netlist shape warnings, prefixed with `W`.
    Warning,
    /// Numeric and solver reports, prefixed with `N`.
    Numeric,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
            Category::Numeric => 'N',
        }
    }
}

/// A diagnostic code: category prefix plus a zero-padded 3-digit number
/// (`W101`, `E201`, `N301`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// A net with no members at all.
    pub const EMPTY_NET: Self = Self::new(Category::Warning, 101);
    /// A net with a single member, which contributes no edges.
    pub const SINGLE_MEMBER_NET: Self = Self::new(Category::Warning, 102);
    /// A pin whose net reaches no gate.
    pub const FLOATING_PIN: Self = Self::new(Category::Warning, 103);
    /// A group of gates with no path to any fixed pin.
    pub const UNANCHORED_GATES: Self = Self::new(Category::Error, 201);
    /// Iterative solver statistics.
    pub const SOLVER_REPORT: Self = Self::new(Category::Numeric, 301);

    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_prefixes() {
        assert_eq!(Category::Error.prefix(), 'E');
        assert_eq!(Category::Warning.prefix(), 'W');
        assert_eq!(Category::Numeric.prefix(), 'N');
    }

    #[test]
    fn display_format() {
        assert_eq!(DiagnosticCode::EMPTY_NET.to_string(), "W101");
        assert_eq!(DiagnosticCode::UNANCHORED_GATES.to_string(), "E201");
        assert_eq!(DiagnosticCode::new(Category::Numeric, 7).to_string(), "N007");
    }

    #[test]
    fn serde_roundtrip() {
        let code = DiagnosticCode::FLOATING_PIN;
        let json = serde_json::to_string(&code).unwrap();
        let back: DiagnosticCode = serde_json::from_str(&json).unwrap();
        assert_eq!(code, back);
    }
}
