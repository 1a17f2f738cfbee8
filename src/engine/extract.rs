//! Result extraction.
//!
//! Walks each enumerated circuit back into a flat, directed part list:
//!
//! ```text
//! circuit ──┬─ part s0                 -> (+s0)
//!           ├─ gate_A [slot: reverse]  -> flip_and_invert(gate_A)
//!           │    └─ parts              -> direction from gate_A's own slots
//!           └─ gate_B [slot: forward]
//!                ├─ part               -> direction from gate_B's own slots
//!                └─ sub-device [slot]  -> flipped if its slot is reverse,
//!                     └─ parts            then expanded the same way
//! ```
//!
//! Loose parts at circuit level are always forward. A part inside a gate or
//! sub-device takes its direction from its parent's slot record after the
//! flip, not from the parent's placement.

use super::value::{DeviceNode, Element, EngineOutput, Orientation};
use crate::error::{EngineError, Error};
use crate::{Direction, GatePlacement, ModuleVariant, Part, PartLibrary};
use tracing::{info, warn};

/// Collection every emitted program binds its accepted circuits to.
pub const RESULT_COLLECTION: &str = "allResults";

/// Rebuild up to `max_variants` module variants from the engine's results.
///
/// Zero results is an empty list, not an error.
pub fn extract(output: &EngineOutput, library: &PartLibrary, max_variants: usize) -> Result<Vec<ModuleVariant>, Error> {
    let results =
        output.get(RESULT_COLLECTION).ok_or_else(|| EngineError::MissingCollection(RESULT_COLLECTION.to_string()))?;

    info!(solutions = results.len(), requested = max_variants, "engine solutions");

    let mut variants = Vec::new();
    for (idx, result) in results.iter().take(max_variants).enumerate() {
        match result {
            Element::Device(circuit) => variants.push(circuit_variant(circuit, library)?),
            Element::Part { name } => warn!(index = idx, part = %name, "result is a bare part, not a circuit; skipped"),
        }
    }

    Ok(variants)
}

fn circuit_variant(circuit: &DeviceNode, library: &PartLibrary) -> Result<ModuleVariant, Error> {
    let mut variant = ModuleVariant::default();

    for (slot, member) in circuit.components.iter().enumerate() {
        match member {
            Element::Part { name } => variant.parts.push(resolve(library, name, Direction::Forward)?),
            Element::Device(gate) => {
                let (gate, direction) = match circuit.orientation(slot) {
                    Orientation::Forward => (gate.clone(), Direction::Forward),
                    Orientation::Reverse => (gate.flip_and_invert(), Direction::Reverse),
                };
                variant.gates.push(GatePlacement { name: gate.name.clone(), direction });
                expand_gate(&gate, library, &mut variant)?;
            }
        }
    }

    Ok(variant)
}

fn expand_gate(device: &DeviceNode, library: &PartLibrary, variant: &mut ModuleVariant) -> Result<(), Error> {
    for (slot, member) in device.components.iter().enumerate() {
        match member {
            Element::Part { name } => variant.parts.push(resolve(library, name, device.orientation(slot).into())?),
            Element::Device(sub) => match device.orientation(slot) {
                Orientation::Forward => expand_gate(sub, library, variant)?,
                Orientation::Reverse => expand_gate(&sub.flip_and_invert(), library, variant)?,
            },
        }
    }
    Ok(())
}

fn resolve(library: &PartLibrary, name: &str, direction: Direction) -> Result<Part, Error> {
    library.get(name).map(|part| part.with_direction(direction)).ok_or_else(|| Error::UnknownPart(name.to_string()))
}
