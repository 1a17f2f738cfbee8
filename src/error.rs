//! Error types.
//!
//! Compilation, engine execution and configuration each have their own enum;
//! [`Error`] is what the public pipeline functions return. Rule conflicts and
//! device-name collisions are not errors: the first is reported through
//! [`RuleSelection::dropped`](crate::RuleSelection) and the second is resolved
//! by suffixing.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

/// The circuit model cannot be turned into a valid program.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Two parts share a name but would be declared differently.
    #[error("part `{name}` declared twice with different definitions: `{first}` vs `{second}`")]
    ConflictingDeclaration { name: String, first: String, second: String },
    /// Not enough scars to separate every unit and close the module.
    #[error("scar pool holds {available} parts but {required} are needed")]
    ScarPoolExhausted { required: usize, available: usize },
    /// A promoter-order index points past the gate's input promoters.
    #[error("gate `{gate}` promoter order index {index} is out of range ({available} input promoters)")]
    PromoterOrderOutOfRange { gate: String, index: usize, available: usize },
}

/// The external engine did not produce a usable result.
///
/// Zero solutions is not an error: it is an `Ok` with an empty collection.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no engine command configured")]
    NotConfigured,
    #[error("failed to start engine `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("lost track of the engine process: {0}")]
    Wait(#[source] std::io::Error),
    #[error("engine exceeded the {0:?} wall-clock limit and was killed")]
    Timeout(Duration),
    #[error("engine exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },
    #[error("engine report is not valid JSON: {0}")]
    Report(#[from] serde_json::Error),
    #[error("engine output has no `{0}` collection")]
    MissingCollection(String),
}

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("program file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("engine result references part `{0}` which is not in the library")]
    UnknownPart(String),
}
