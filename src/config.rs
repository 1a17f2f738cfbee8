//! Options bundle.
//!
//! Options can be built in code or read from TOML:
//!
//! ```toml
//! scars = true
//! include_sequences = false
//! topology_aware_ordering = false
//! max_variants = 5
//! output_directory = "out/"
//! program_file = "circuit.eug"
//!
//! [engine]
//! command = "eugene-run"
//! args = ["--json"]
//! timeout_secs = 600
//! ```
//!
//! The compiler never looks at the boolean switches directly; it consumes the
//! [`EmitFeatures`] set derived from them.

use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_PROGRAM_FILE: &str = "circuit.eug";
pub const DEFAULT_MAX_VARIANTS: usize = 5;
pub const DEFAULT_ENGINE_TIMEOUT_SECS: u64 = 600;

bitflags::bitflags! {
    /// Optional program sections.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EmitFeatures: u8 {
        /// Scar parts between units plus a module-end scar, pinned to even slots.
        const SCARS             = 1 << 0;
        /// Literal `.SEQUENCE(..)` clauses in part declarations.
        const SEQUENCES         = 1 << 1;
        /// Promoter `BEFORE` clauses from each gate's promoter order.
        const TOPOLOGY_ORDERING = 1 << 2;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    pub scars: bool,
    pub include_sequences: bool,
    pub topology_aware_ordering: bool,
    /// Upper bound on returned module variants.
    pub max_variants: usize,
    pub output_directory: PathBuf,
    pub program_file: String,
    pub engine: EngineSettings,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            scars: false,
            include_sequences: false,
            topology_aware_ordering: false,
            max_variants: DEFAULT_MAX_VARIANTS,
            output_directory: PathBuf::from("."),
            program_file: DEFAULT_PROGRAM_FILE.to_string(),
            engine: EngineSettings::default(),
        }
    }
}

/// How to launch the external engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSettings {
    pub command: Option<PathBuf>,
    /// Passed before the program path.
    pub args: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings { command: None, args: Vec::new(), timeout_secs: DEFAULT_ENGINE_TIMEOUT_SECS }
    }
}

impl EngineSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Options {
    /// Parse and validate options from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let options: Options = toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Read options from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_variants == 0 {
            return Err(ConfigError::Invalid("max_variants must be at least 1".to_string()));
        }
        if self.program_file.trim().is_empty() {
            return Err(ConfigError::Invalid("program_file must not be empty".to_string()));
        }
        if self.engine.timeout_secs == 0 {
            return Err(ConfigError::Invalid("engine.timeout_secs must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn features(&self) -> EmitFeatures {
        let mut features = EmitFeatures::empty();
        if self.scars {
            features |= EmitFeatures::SCARS;
        }
        if self.include_sequences {
            features |= EmitFeatures::SEQUENCES;
        }
        if self.topology_aware_ordering {
            features |= EmitFeatures::TOPOLOGY_ORDERING;
        }
        features
    }

    /// Where the emitted program is written.
    pub fn program_path(&self) -> PathBuf {
        self.output_directory.join(&self.program_file)
    }
}
