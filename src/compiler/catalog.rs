//! Transcription-unit catalog.
//!
//! Every transcription unit becomes one Eugene device, so it needs a name that
//! is unique in the program. The name comes from the regulator the unit
//! expresses:
//!
//! ```text
//! gate NOT1 (regulator PhlF, 1 unit)   -> PhlF
//! gate NOT2 (regulator PhlF, 1 unit)   -> PhlF_2
//! gate NOR1 (regulator SrpR, 2 units)  -> SrpR, SrpR_2
//! ```
//!
//! The ordinal counts a regulator's units in encounter order across all gates.
//! If the suffixed name is already taken, the ordinal keeps counting up.
//!
//! While walking the units the catalog also collects the distinct part types
//! and one declaration per part. Declarations are keyed by part name. The same
//! part seen twice collapses to one entry, while a name that would be
//! declared two different ways is rejected.

use crate::config::EmitFeatures;
use crate::error::CompileError;
use crate::{Gate, Part, PartLibrary, SCAR, TranscriptionUnit};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::debug;

#[derive(Debug)]
pub(crate) struct CatalogEntry<'a> {
    pub name: String,
    pub gate: &'a Gate,
    pub unit: &'a TranscriptionUnit,
}

#[derive(Debug, Default)]
pub(crate) struct Catalog<'a> {
    /// Emission order.
    pub entries: Vec<CatalogEntry<'a>>,
    pub part_types: BTreeSet<String>,
    /// Part name -> declaration statement.
    pub declarations: BTreeMap<String, String>,
    /// One per unit, then the module-end scar. Empty unless scars are on.
    pub scars: Vec<Part>,
}

impl<'a> Catalog<'a> {
    pub fn build(gates: &'a [Gate], library: &PartLibrary, features: EmitFeatures) -> Result<Self, CompileError> {
        let mut catalog = Catalog::default();
        let mut ordinals: HashMap<&str, usize> = HashMap::new();
        let mut taken: HashSet<String> = HashSet::new();

        for gate in gates {
            let regulator = gate.regulator_name();
            for unit in &gate.txn_units {
                let ordinal = ordinals.entry(regulator).or_insert(0);
                *ordinal += 1;
                let mut name = device_name(regulator, *ordinal);
                while taken.contains(&name) {
                    *ordinal += 1;
                    name = device_name(regulator, *ordinal);
                }
                taken.insert(name.clone());

                debug!(gate = %gate.name, regulator, device = %name, parts = unit.parts.len(), "catalogued unit");
                catalog.entries.push(CatalogEntry { name, gate, unit });
            }
        }

        let sequences = features.contains(EmitFeatures::SEQUENCES);
        for entry in &catalog.entries {
            for part in &entry.unit.parts {
                catalog.part_types.insert(part.part_type.clone());
                insert_declaration(&mut catalog.declarations, part, sequences)?;
            }
        }

        if features.contains(EmitFeatures::SCARS) {
            catalog.part_types.insert(SCAR.to_string());
            catalog.scars = select_scars(library.scars(), catalog.entries.len())?;
            for scar in &catalog.scars {
                insert_declaration(&mut catalog.declarations, scar, sequences)?;
            }
        }

        Ok(catalog)
    }

    pub fn device_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Declarations sorted alphabetically by statement text.
    pub fn sorted_declarations(&self) -> Vec<&str> {
        let mut declarations: Vec<&str> = self.declarations.values().map(String::as_str).collect();
        declarations.sort_unstable();
        declarations
    }
}

fn device_name(regulator: &str, ordinal: usize) -> String {
    if ordinal == 1 { regulator.to_string() } else { format!("{regulator}_{ordinal}") }
}

/// `<type> <name>;`, or with a literal sequence when asked for and known.
pub(crate) fn declaration(part: &Part, sequences: bool) -> String {
    match &part.sequence {
        Some(seq) if sequences => format!("{} {}(.SEQUENCE(\"{}\"));", part.part_type, part.name, seq),
        _ => format!("{} {};", part.part_type, part.name),
    }
}

fn insert_declaration(
    declarations: &mut BTreeMap<String, String>,
    part: &Part,
    sequences: bool,
) -> Result<(), CompileError> {
    let text = declaration(part, sequences);
    match declarations.entry(part.name.clone()) {
        Entry::Vacant(slot) => {
            slot.insert(text);
            Ok(())
        }
        Entry::Occupied(existing) if *existing.get() == text => Ok(()),
        Entry::Occupied(existing) => Err(CompileError::ConflictingDeclaration {
            name: part.name.clone(),
            first: existing.get().clone(),
            second: text,
        }),
    }
}

/// `pool[0..units]` plus the last pool entry as the module-end scar.
fn select_scars(pool: &[Part], units: usize) -> Result<Vec<Part>, CompileError> {
    let required = units + 1;
    if pool.len() < required {
        return Err(CompileError::ScarPoolExhausted { required, available: pool.len() });
    }

    let mut scars: Vec<Part> = pool[..units].to_vec();
    if let Some(end) = pool.last() {
        scars.push(end.clone());
    }
    Ok(scars)
}
