//! Engine result values.
//!
//! The engine reports each accepted circuit as a tree: the circuit device
//! holds gate devices (and loose parts such as scars), and each gate device
//! holds parts. Every device also carries one orientation per component slot.
//!
//! On the wire (the JSON report read by `process.rs`) an element is
//! externally tagged:
//!
//! ```json
//! {"device": {"name": "circuit",
//!             "components": [{"device": {"name": "gate_A", "components": [{"part": {"name": "pTac"}}],
//!                                        "orientations": ["forward"]}},
//!                            {"part": {"name": "s0"}}],
//!             "orientations": ["reverse", "forward"]}}
//! ```

use crate::Direction;
use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Forward,
    Reverse,
}

impl Orientation {
    pub fn inverted(self) -> Self {
        match self {
            Orientation::Forward => Orientation::Reverse,
            Orientation::Reverse => Orientation::Forward,
        }
    }
}

impl From<Orientation> for Direction {
    fn from(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Forward => Direction::Forward,
            Orientation::Reverse => Direction::Reverse,
        }
    }
}

/// A node of a result tree: either an atomic part or a composite device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Part { name: String },
    Device(DeviceNode),
}

impl Element {
    pub fn part(name: impl Into<String>) -> Self {
        Element::Part { name: name.into() }
    }

    pub fn name(&self) -> &str {
        match self {
            Element::Part { name } => name,
            Element::Device(device) => &device.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceNode {
    pub name: String,
    #[serde(default)]
    pub components: Vec<Element>,
    /// One entry per component slot. Missing entries read as forward.
    #[serde(default)]
    pub orientations: Vec<Orientation>,
}

impl DeviceNode {
    pub fn new(name: impl Into<String>, components: Vec<Element>, orientations: Vec<Orientation>) -> Self {
        DeviceNode { name: name.into(), components, orientations }
    }

    /// Orientation of component `slot`.
    pub fn orientation(&self, slot: usize) -> Orientation {
        self.orientations.get(slot).copied().unwrap_or_default()
    }

    /// The same device read from the other strand: components in reverse
    /// order, each slot's orientation inverted. Nested devices are moved as
    /// whole components and keep their own contents.
    pub fn flip_and_invert(&self) -> DeviceNode {
        let slots = self.components.len();
        let orientations = (0..slots).rev().map(|slot| self.orientation(slot).inverted()).collect();
        let components = self.components.iter().rev().cloned().collect();
        DeviceNode { name: self.name.clone(), components, orientations }
    }
}

/// Named collections bound by an executed program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngineOutput {
    collections: BTreeMap<String, Vec<Element>>,
}

impl EngineOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(mut self, name: impl Into<String>, elements: Vec<Element>) -> Self {
        self.collections.insert(name.into(), elements);
        self
    }

    pub fn get(&self, name: &str) -> Option<&[Element]> {
        self.collections.get(name).map(Vec::as_slice)
    }

    pub fn from_json(report: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(report)?)
    }
}
