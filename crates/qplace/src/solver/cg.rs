//! Jacobi-preconditioned conjugate gradient.
//!
//! Solves `A·x = b` for a symmetric positive definite `A` given as a
//! [`LinearOperator`]. Used when the system is too large to factorize.

use super::operator::LinearOperator;
use qplace_config::SolverConfig;

/// Conjugate gradient configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CgConfig {
    /// Maximum number of iterations.
    pub max_iter: usize,
    /// Convergence tolerance on the relative residual `‖r‖ / ‖b‖`.
    pub tol: f64,
}

impl Default for CgConfig {
    fn default() -> Self {
        Self {
            max_iter: 10_000,
            tol: 1e-10,
        }
    }
}

impl From<&SolverConfig> for CgConfig {
    fn from(config: &SolverConfig) -> Self {
        Self {
            max_iter: config.max_iterations,
            tol: config.tolerance,
        }
    }
}

/// Result of a conjugate gradient solve.
#[derive(Debug, Clone)]
pub struct CgResult {
    /// Solution vector.
    pub x: Vec<f64>,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Final relative residual.
    pub residual: f64,
    /// Whether the solver reached the tolerance.
    pub converged: bool,
}

/// Inverse of the operator diagonal, with `1` standing in for empty rows.
pub fn jacobi(diagonal: &[f64]) -> Vec<f64> {
    diagonal
        .iter()
        .map(|&d| if d > 0.0 { 1.0 / d } else { 1.0 })
        .collect()
}

/// Solves `A·x = b` starting from `x = 0`.
///
/// `inv_diag` is the Jacobi preconditioner (see [`jacobi`]). Stops when the
/// relative residual drops to `config.tol`, after `config.max_iter`
/// iterations, or when the search direction loses positive curvature.
/// A `b` or `inv_diag` whose length differs from `op.dim()` is reported as
/// not converged without iterating.
pub fn solve_pcg(
    op: &dyn LinearOperator,
    inv_diag: &[f64],
    b: &[f64],
    config: &CgConfig,
) -> CgResult {
    let n = op.dim();
    let mut x = vec![0.0; n];
    if b.len() != n || inv_diag.len() != n {
        return CgResult {
            x,
            iterations: 0,
            residual: f64::INFINITY,
            converged: false,
        };
    }

    let b_norm = norm(b);
    if b_norm == 0.0 {
        return CgResult {
            x,
            iterations: 0,
            residual: 0.0,
            converged: true,
        };
    }

    let mut r = b.to_vec();
    let mut z: Vec<f64> = r.iter().zip(inv_diag).map(|(ri, mi)| ri * mi).collect();
    let mut p = z.clone();
    let mut ap = vec![0.0; n];
    let mut rz = dot(&r, &z);
    let mut residual = 1.0;

    for iter in 1..=config.max_iter {
        op.apply(&p, &mut ap);
        let curvature = dot(&p, &ap);
        if !(curvature > 0.0 && curvature.is_finite()) {
            return CgResult {
                x,
                iterations: iter - 1,
                residual,
                converged: false,
            };
        }

        let alpha = rz / curvature;
        for i in 0..n {
            x[i] += alpha * p[i];
            r[i] -= alpha * ap[i];
        }

        residual = norm(&r) / b_norm;
        if residual <= config.tol {
            return CgResult {
                x,
                iterations: iter,
                residual,
                converged: true,
            };
        }

        for i in 0..n {
            z[i] = r[i] * inv_diag[i];
        }
        let rz_next = dot(&r, &z);
        let beta = rz_next / rz;
        rz = rz_next;
        for i in 0..n {
            p[i] = z[i] + beta * p[i];
        }
    }

    CgResult {
        x,
        iterations: config.max_iter,
        residual,
        converged: false,
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn norm(v: &[f64]) -> f64 {
    dot(v, v).sqrt()
}
