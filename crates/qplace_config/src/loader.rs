//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::PlacerConfig;
use std::path::Path;

/// The file [`load_config`] looks for inside a project directory.
pub const CONFIG_FILE_NAME: &str = "qplace.toml";

/// Loads and validates `<project_dir>/qplace.toml`.
pub fn load_config(project_dir: &Path) -> Result<PlacerConfig, ConfigError> {
    let content = std::fs::read_to_string(project_dir.join(CONFIG_FILE_NAME))?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<PlacerConfig, ConfigError> {
    let config: PlacerConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &PlacerConfig) -> Result<(), ConfigError> {
    let tol = config.solver.tolerance;
    if !tol.is_finite() || tol <= 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "solver.tolerance must be a positive finite number, got {tol}"
        )));
    }
    if config.solver.max_iterations == 0 {
        return Err(ConfigError::ValidationError(
            "solver.max_iterations must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnchorWeighting, SolveMethod};

    #[test]
    fn parse_empty_config() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config, PlacerConfig::default());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[netlist]
gate_id_offset = 5

[anchors]
weighting = "unit"

[solver]
method = "direct"
tolerance = 1e-8
max_iterations = 500
direct_max_gates = 1000

[execution]
parallel = false
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.netlist.gate_id_offset, Some(5));
        assert_eq!(config.anchors.weighting, AnchorWeighting::Unit);
        assert_eq!(config.solver.method, SolveMethod::Direct);
        assert_eq!(config.solver.tolerance, 1e-8);
        assert_eq!(config.solver.max_iterations, 500);
        assert_eq!(config.solver.direct_max_gates, 1000);
        assert!(!config.execution.parallel);
    }

    #[test]
    fn partial_section_keeps_defaults() {
        let config = load_config_from_str("[solver]\nmethod = \"conjugate-gradient\"\n").unwrap();
        assert_eq!(config.solver.method, SolveMethod::ConjugateGradient);
        assert_eq!(config.solver.tolerance, 1e-10);
        assert!(config.execution.parallel);
    }

    #[test]
    fn non_positive_tolerance_errors() {
        let err = load_config_from_str("[solver]\ntolerance = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        let err = load_config_from_str("[solver]\ntolerance = -1e-6\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn zero_iterations_errors() {
        let err = load_config_from_str("[solver]\nmax_iterations = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn unknown_method_errors() {
        let err = load_config_from_str("[solver]\nmethod = \"gauss-seidel\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn unknown_key_errors() {
        let err = load_config_from_str("[anchors]\nstiffness = 2.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[anchors]\nweighting = \"unit\"\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.anchors.weighting, AnchorWeighting::Unit);
    }

    #[test]
    fn io_error_from_nonexistent_dir() {
        let err = load_config(Path::new("/nonexistent/dir")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
