//! Gate layout compiler.
//!
//! `gatelayout` turns a logic circuit's gates into a Eugene-style program that
//! an external constraint engine can enumerate, and turns the engine's answer
//! back into ordered, directed part lists.
//!
//! ```text
//! gates ──▶ Catalog::build ──▶ emit ──▶ Program ──▶ write_program
//!                                │                      │
//!            RulePools ──────────┘                      v
//!                                               Engine::execute
//!                                                      │
//!                          Vec<ModuleVariant> ◀── extract
//! ```
//!
//! Everything up to [`Program`] is pure and deterministic: the same gates,
//! parts, rules and options always produce the same bytes.

#[macro_use]
mod macros;
mod api;
mod compiler;
mod config;
mod engine;
mod error;

pub use api::{Design, compile, design, run_engine, write_program};
pub use compiler::{DroppedRule, Program, RuleSelection, referenced_names, select_rules, tokenize};
pub use config::{EmitFeatures, EngineSettings, Options};
pub use engine::{DeviceNode, Element, Engine, EngineOutput, Orientation, ProcessEngine, RESULT_COLLECTION, extract};
pub use error::{CompileError, ConfigError, EngineError, Error};

use std::collections::HashMap;
use std::fmt;

// --- Circuit model ------------------------------------------------------------

/// Part type that is referenced generically inside gate devices.
pub const PROMOTER: &str = "promoter";

/// Part type reserved for scars.
pub const SCAR: &str = "scar";

/// Strand a part occurrence sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    pub fn symbol(self) -> &'static str {
        match self {
            Direction::Forward => "+",
            Direction::Reverse => "-",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A named, typed DNA part.
///
/// Library entries are forward by default; the direction of a particular
/// occurrence is set with [`Part::with_direction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub name: String,
    pub part_type: String,
    pub sequence: Option<String>,
    pub direction: Direction,
}

impl Part {
    pub fn new(part_type: impl Into<String>, name: impl Into<String>) -> Self {
        Part { name: name.into(), part_type: part_type.into(), sequence: None, direction: Direction::Forward }
    }

    pub fn with_sequence(mut self, sequence: impl Into<String>) -> Self {
        self.sequence = Some(sequence.into());
        self
    }

    /// Copy of this part placed on `direction`.
    pub fn with_direction(&self, direction: Direction) -> Self {
        Part { direction, ..self.clone() }
    }

    pub fn is_promoter(&self) -> bool {
        self.part_type == PROMOTER
    }
}

/// Ordered parts forming one contiguous device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptionUnit {
    pub parts: Vec<Part>,
}

impl TranscriptionUnit {
    pub fn new(parts: Vec<Part>) -> Self {
        TranscriptionUnit { parts }
    }

    pub fn promoters(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter().filter(|p| p.is_promoter())
    }
}

/// A regulatory unit: one regulator expressed from one or more transcription
/// units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gate {
    pub name: String,
    /// Empty means "same as `name`".
    pub regulator: String,
    pub txn_units: Vec<TranscriptionUnit>,
    /// Regulable promoters of the gates feeding this one, in input order.
    pub input_promoters: Vec<String>,
    /// Indices into `input_promoters`; the first listed promoter must come
    /// before the second when topology-aware ordering is on.
    pub promoter_order: Vec<usize>,
}

impl Gate {
    pub fn new(name: impl Into<String>, txn_units: Vec<TranscriptionUnit>) -> Self {
        Gate { name: name.into(), txn_units, ..Default::default() }
    }

    pub fn with_regulator(mut self, regulator: impl Into<String>) -> Self {
        self.regulator = regulator.into();
        self
    }

    pub fn with_promoter_order(mut self, input_promoters: Vec<String>, promoter_order: Vec<usize>) -> Self {
        self.input_promoters = input_promoters;
        self.promoter_order = promoter_order;
        self
    }

    /// The regulator name, falling back to the gate name.
    pub fn regulator_name(&self) -> &str {
        if self.regulator.is_empty() { &self.name } else { &self.regulator }
    }
}

/// Parts by name plus the ordered pool scars are drawn from.
#[derive(Debug, Clone, Default)]
pub struct PartLibrary {
    parts: HashMap<String, Part>,
    scars: Vec<Part>,
}

impl PartLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, part: Part) {
        self.parts.insert(part.name.clone(), part);
    }

    /// Append a scar to the pool. Scars are also resolvable by name.
    pub fn insert_scar(&mut self, scar: Part) {
        self.insert(scar.clone());
        self.scars.push(scar);
    }

    pub fn get(&self, name: &str) -> Option<&Part> {
        self.parts.get(name)
    }

    pub fn scars(&self) -> &[Part] {
        &self.scars
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl FromIterator<Part> for PartLibrary {
    fn from_iter<I: IntoIterator<Item = Part>>(iter: I) -> Self {
        let mut library = PartLibrary::new();
        for part in iter {
            library.insert(part);
        }
        library
    }
}

/// User constraint pools: one for parts inside gate devices, one for gate
/// devices inside the circuit.
#[derive(Debug, Clone, Default)]
pub struct RulePools {
    pub part_rules: Vec<String>,
    pub gate_rules: Vec<String>,
}

// --- Engine output model ------------------------------------------------------

/// How one gate device was placed in a module variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatePlacement {
    pub name: String,
    pub direction: Direction,
}

/// One fully resolved layout: parts in physical order with their strand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleVariant {
    pub parts: Vec<Part>,
    pub gates: Vec<GatePlacement>,
}

impl ModuleVariant {
    /// `(name, direction)` pairs, the compact form used in reports.
    pub fn layout(&self) -> Vec<(&str, Direction)> {
        self.parts.iter().map(|p| (p.name.as_str(), p.direction)).collect()
    }
}

impl fmt::Display for ModuleVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, part) in self.parts.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}{}", part.direction, part.name)?;
        }
        Ok(())
    }
}
