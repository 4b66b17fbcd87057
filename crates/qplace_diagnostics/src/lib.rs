//! Structured diagnostics for the quadratic placer.
//!
//! Placement stages report non-fatal findings (empty nets, floating pins,
//! solver statistics) as [`Diagnostic`] values with a severity, a code, and
//! the netlist [`Subject`] they concern. The thread-safe [`DiagnosticSink`]
//! accumulates them across stages, and [`TerminalRenderer`] formats them for
//! humans.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;
pub mod subject;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
pub use subject::Subject;
