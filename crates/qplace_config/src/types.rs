//! Configuration types deserialized from `qplace.toml`.

use serde::Deserialize;

/// The top-level placer configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlacerConfig {
    /// How netlist ids are interpreted.
    #[serde(default)]
    pub netlist: NetlistConfig,
    /// How pins anchor the gates on their nets.
    #[serde(default)]
    pub anchors: AnchorConfig,
    /// Linear solver selection and convergence settings.
    #[serde(default)]
    pub solver: SolverConfig,
    /// Threading settings.
    #[serde(default)]
    pub execution: ExecutionConfig,
}

/// Netlist interpretation settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetlistConfig {
    /// The id of the first gate. Gate `offset + i` occupies matrix row `i`.
    /// Inferred as the smallest gate id when absent.
    #[serde(default)]
    pub gate_id_offset: Option<u32>,
}

/// Anchor stiffness settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnchorConfig {
    /// Stiffness of the spring between a pin and each gate on its net.
    #[serde(default)]
    pub weighting: AnchorWeighting,
}

/// Stiffness used for pin anchor terms, on both the diagonal and the RHS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnchorWeighting {
    /// Scale each anchor by the clique weight of the pin's net.
    #[default]
    NetWeight,
    /// Flat stiffness of 1 regardless of net size.
    Unit,
}

/// Which linear solver handles `A·x = b`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SolveMethod {
    /// Direct for systems up to `direct_max_gates`, conjugate gradient above.
    #[default]
    Auto,
    /// Sparse Cholesky factorization.
    Direct,
    /// Jacobi-preconditioned conjugate gradient.
    ConjugateGradient,
}

/// Linear solver settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolverConfig {
    /// Solver selection.
    #[serde(default)]
    pub method: SolveMethod,
    /// Relative residual `‖b − A·x‖ / ‖b‖` at which conjugate gradient stops.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Iteration cap for conjugate gradient.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Largest gate count `Auto` still factorizes directly.
    #[serde(default = "default_direct_max_gates")]
    pub direct_max_gates: usize,
}

fn default_tolerance() -> f64 {
    1e-10
}

fn default_max_iterations() -> usize {
    10_000
}

fn default_direct_max_gates() -> usize {
    20_000
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            method: SolveMethod::default(),
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
            direct_max_gates: default_direct_max_gates(),
        }
    }
}

/// Threading settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutionConfig {
    /// Use rayon for weights, connectivity assembly, and the two axis solves.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_parallel() -> bool {
    true
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PlacerConfig::default();
        assert_eq!(config.netlist.gate_id_offset, None);
        assert_eq!(config.anchors.weighting, AnchorWeighting::NetWeight);
        assert_eq!(config.solver.method, SolveMethod::Auto);
        assert_eq!(config.solver.tolerance, 1e-10);
        assert_eq!(config.solver.max_iterations, 10_000);
        assert!(config.execution.parallel);
    }

    #[test]
    fn kebab_case_enums() {
        let solver: SolverConfig = toml::from_str(r#"method = "conjugate-gradient""#).unwrap();
        assert_eq!(solver.method, SolveMethod::ConjugateGradient);
        let anchors: AnchorConfig = toml::from_str(r#"weighting = "unit""#).unwrap();
        assert_eq!(anchors.weighting, AnchorWeighting::Unit);
    }
}
