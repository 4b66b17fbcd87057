//! Linear solve of `A·x = b` per axis.
//!
//! [`LinearSolver::new`] checks the structure of `A` once and prepares the
//! chosen backend; [`LinearSolver::solve`] is then called for each axis and
//! only borrows the solver immutably, so both axes can run concurrently.

pub mod cg;
pub mod direct;
pub mod operator;

use crate::error::{PlaceError, PlaceResult};
use crate::rhs::Axis;
use crate::system::SystemMatrix;
use cg::CgConfig;
use nalgebra::DVector;
use nalgebra_sparse::factorization::CscCholesky;
use nalgebra_sparse::CsrMatrix;
use petgraph::unionfind::UnionFind;
use qplace_config::{SolveMethod, SolverConfig};
use qplace_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Subject};
use std::collections::BTreeMap;
use std::fmt;

/// Groups rows of `A` into connected components and returns the components
/// that contain no anchored row, each sorted, ordered by their first row.
pub fn unanchored_components(system: &SystemMatrix) -> Vec<Vec<usize>> {
    let n = system.dim();
    let mut components = UnionFind::<usize>::new(n);
    for (i, j, v) in system.entries() {
        if i < j && v != 0.0 {
            components.union(i, j);
        }
    }

    let mut anchored = vec![false; n];
    for row in 0..n {
        if system.is_anchored(row) {
            anchored[components.find(row)] = true;
        }
    }

    let mut floating: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for row in 0..n {
        let root = components.find(row);
        if !anchored[root] {
            floating.entry(root).or_default().push(row);
        }
    }
    let mut groups: Vec<Vec<usize>> = floating.into_values().collect();
    groups.sort_by_key(|rows| rows[0]);
    groups
}

/// Fails with [`PlaceError::SingularSystem`] when any component of `A` has
/// no path to a fixed pin, emitting one `E201` per such component.
pub fn check_anchored(system: &SystemMatrix, sink: &DiagnosticSink) -> PlaceResult<()> {
    let groups = unanchored_components(system);
    if groups.is_empty() {
        return Ok(());
    }
    for rows in &groups {
        sink.emit(
            Diagnostic::error(
                DiagnosticCode::UNANCHORED_GATES,
                format!("{} gate(s) have no path to a fixed pin", rows.len()),
                Subject::Rows(rows.clone()),
            )
            .with_help("connect at least one gate of this group to a pin net"),
        );
    }
    let mut rows: Vec<usize> = groups.into_iter().flatten().collect();
    rows.sort_unstable();
    log::warn!(target: "qplace", "system is singular: {} unanchored rows", rows.len());
    Err(PlaceError::SingularSystem { rows })
}

enum Backend {
    Empty,
    Direct(CscCholesky<f64>),
    Iterative {
        matrix: CsrMatrix<f64>,
        inv_diag: Vec<f64>,
        config: CgConfig,
    },
}

/// A system matrix prepared for repeated solves.
pub struct LinearSolver {
    dim: usize,
    backend: Backend,
}

impl LinearSolver {
    /// Checks `system` for unanchored components and prepares the backend
    /// selected by `config`.
    ///
    /// The direct backend factorizes here, so a failed factorization is
    /// reported before any axis is solved.
    pub fn new(
        system: &SystemMatrix,
        config: &SolverConfig,
        sink: &DiagnosticSink,
    ) -> PlaceResult<Self> {
        let dim = system.dim();
        if dim == 0 {
            return Ok(LinearSolver {
                dim,
                backend: Backend::Empty,
            });
        }
        check_anchored(system, sink)?;

        let method = resolve_method(config, dim);
        log::debug!(target: "qplace", "solving {dim}x{dim} system with {method:?}");
        let backend = match method {
            SolveMethod::ConjugateGradient => {
                let diagonal: Vec<f64> = (0..dim).map(|i| system.get(i, i)).collect();
                Backend::Iterative {
                    matrix: system.to_csr(),
                    inv_diag: cg::jacobi(&diagonal),
                    config: CgConfig::from(config),
                }
            }
            SolveMethod::Direct | SolveMethod::Auto => {
                Backend::Direct(direct::factor(system.as_csc())?)
            }
        };
        Ok(LinearSolver { dim, backend })
    }

    /// System dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The backend actually in use (`Auto` is resolved at construction).
    pub fn method(&self) -> SolveMethod {
        match self.backend {
            Backend::Empty | Backend::Direct(_) => SolveMethod::Direct,
            Backend::Iterative { .. } => SolveMethod::ConjugateGradient,
        }
    }

    /// Solves `A·x = b` for one axis.
    ///
    /// Fails with [`PlaceError::DimensionMismatch`] when `b` has the wrong
    /// length, and with [`PlaceError::NumericFailure`] when the iterative
    /// solver does not converge or the solution is not finite.
    pub fn solve(
        &self,
        axis: Axis,
        b: &DVector<f64>,
        sink: &DiagnosticSink,
    ) -> PlaceResult<DVector<f64>> {
        if b.len() != self.dim {
            return Err(PlaceError::DimensionMismatch {
                expected: self.dim,
                actual: b.len(),
            });
        }

        let x = match &self.backend {
            Backend::Empty => DVector::zeros(0),
            Backend::Direct(factor) => direct::solve(factor, b),
            Backend::Iterative {
                matrix,
                inv_diag,
                config,
            } => {
                let result = cg::solve_pcg(matrix, inv_diag, b.as_slice(), config);
                if !result.converged {
                    return Err(PlaceError::NumericFailure {
                        reason: format!(
                            "conjugate gradient did not converge on the {axis} axis after {} \
                             iterations (relative residual {:.3e})",
                            result.iterations, result.residual
                        ),
                    });
                }
                sink.emit(
                    Diagnostic::note(
                        DiagnosticCode::SOLVER_REPORT,
                        format!(
                            "conjugate gradient converged on the {axis} axis in {} iterations",
                            result.iterations
                        ),
                        Subject::None,
                    )
                    .with_note(format!("relative residual {:.3e}", result.residual)),
                );
                DVector::from_vec(result.x)
            }
        };

        if let Some(row) = x.iter().position(|v| !v.is_finite()) {
            return Err(PlaceError::NumericFailure {
                reason: format!("non-finite {axis} coordinate in row {row}"),
            });
        }
        Ok(x)
    }
}

impl fmt::Debug for LinearSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinearSolver")
            .field("dim", &self.dim)
            .field("method", &self.method())
            .finish()
    }
}

fn resolve_method(config: &SolverConfig, dim: usize) -> SolveMethod {
    match config.method {
        SolveMethod::Auto if dim > config.direct_max_gates => SolveMethod::ConjugateGradient,
        SolveMethod::Auto => SolveMethod::Direct,
        method => method,
    }
}
