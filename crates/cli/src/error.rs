//! CLI errors and their exit codes.
//!
//! - 0:  success
//! - 2:  argument parse error (reported by clap before `run` starts)
//! - 10: invalid simulation or curve configuration
//! - 11: I/O failure (reading a run file, writing a snapshot or export)
//! - 12: malformed user input (bad `--params` JSON, bad color)
//! - 13: JSON output failure

use flipfield_core::EngineError;
use std::fmt;

pub enum CliError {
    Engine(EngineError),
    Io(String),
    Input(String),
    Serialization(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Engine(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Engine(e) => write!(f, "{e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                f.write_str(msg)
            }
        }
    }
}

impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Io(msg) => CliError::Io(msg),
            other => CliError::Engine(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_error_exit_code_is_10() {
        let err = CliError::from(EngineError::invalid_param("speed_cap", "must be > 0"));
        assert_eq!(err.exit_code(), 10);
        assert!(err.to_string().contains("speed_cap"));
    }

    #[test]
    fn engine_io_routes_to_cli_io() {
        let err = CliError::from(EngineError::Io("disk full".into()));
        assert_eq!(err.exit_code(), 11);
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn std_io_routes_to_cli_io() {
        let err = CliError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "run.json not found",
        ));
        assert_eq!(err.exit_code(), 11);
    }

    #[test]
    fn input_error_exit_code_is_12() {
        assert_eq!(CliError::Input("bad color".into()).exit_code(), 12);
    }

    #[test]
    fn serde_json_error_routes_to_serialization() {
        let bad = serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
        assert_eq!(CliError::from(bad).exit_code(), 13);
    }
}
