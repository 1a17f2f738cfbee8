//! Program emission.
//!
//! Renders a [`Catalog`] as Eugene source. Sections always come in this order:
//!
//! ```text
//! PartType ...;                      one per distinct type
//! <type> <part>;                     sorted declarations
//! Device <dev>_device(...);          one per catalogued unit
//! Rule <dev>_rules( ON <dev>_device: ...);
//! <dev>_devices = product(<dev>_device);
//! Device gate_<dev>();               placeholders bound inside the loops
//! Device circuit();
//! Rule allRules( ON circuit: ...);
//! Array allResults;
//! for(...) { for(...) {              one loop per device, over its variants
//!     gate_<dev> = <dev>_devices[iK];
//!     Device circuit(gate_..., scars...);
//!     result = permute(circuit);
//!     allResults = allResults + result;
//! } }
//! ```
//!
//! Every rule block is a list of clauses joined with `AND` and closed by
//! `ALL_FORWARD`, so the block is never empty and never has a dangling `AND`.

use super::applicability::{CLAUSE_SEPARATOR, DroppedRule, select_rules};
use super::catalog::{Catalog, CatalogEntry};
use crate::config::EmitFeatures;
use crate::error::CompileError;
use crate::{Gate, PROMOTER, RulePools};
use tracing::info;

pub(crate) const CIRCUIT: &str = "circuit";
pub(crate) const ALL_FORWARD: &str = "ALL_FORWARD";

/// An emitted program and what went into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub text: String,
    /// Device names in emission order.
    pub devices: Vec<String>,
    /// Scar names in circuit order; empty when scars are off.
    pub scars: Vec<String>,
    /// Rules left out because of a `STARTSWITH` conflict.
    pub dropped_rules: Vec<DroppedRule>,
}

pub(crate) fn gate_device(name: &str) -> String {
    format!("gate_{name}")
}

pub(crate) fn emit(catalog: &Catalog<'_>, rules: &RulePools, features: EmitFeatures) -> Result<Program, CompileError> {
    let mut out = String::new();
    let mut dropped_rules = Vec::new();

    for part_type in &catalog.part_types {
        out.push_str(&format!("PartType {part_type};\n"));
    }
    out.push('\n');

    for declaration in catalog.sorted_declarations() {
        out.push_str(declaration);
        out.push('\n');
    }
    out.push('\n');

    for entry in &catalog.entries {
        emit_device(&mut out, entry);
    }
    out.push('\n');

    for entry in &catalog.entries {
        let clauses = device_clauses(entry, rules, features, &mut dropped_rules)?;
        emit_rule_block(&mut out, &format!("{}_rules", entry.name), &format!("{}_device", entry.name), &clauses);
    }
    out.push('\n');

    for name in catalog.device_names() {
        out.push_str(&format!("{:<15} = product({name}_device);\n", format!("{name}_devices")));
    }
    out.push('\n');

    let gates: Vec<String> = catalog.device_names().map(gate_device).collect();
    for gate in &gates {
        out.push_str(&format!("Device {gate}();\n"));
    }
    out.push('\n');
    out.push_str(&format!("Device {CIRCUIT}();\n\n"));

    let clauses = circuit_clauses(catalog, &gates, rules, features, &mut dropped_rules);
    emit_rule_block(&mut out, "allRules", CIRCUIT, &clauses);
    out.push('\n');

    emit_enumeration(&mut out, catalog, &gates);

    info!(bytes = out.len(), devices = gates.len(), scars = catalog.scars.len(), "program emitted");

    Ok(Program {
        text: out,
        devices: catalog.device_names().map(str::to_string).collect(),
        scars: catalog.scars.iter().map(|scar| scar.name.clone()).collect(),
        dropped_rules,
    })
}

/// Promoters are referenced by type so `product` can pick any of them; every
/// other part is fixed by name.
fn emit_device(out: &mut String, entry: &CatalogEntry<'_>) {
    let members: Vec<String> = entry
        .unit
        .parts
        .iter()
        .map(|part| if part.is_promoter() { format!("   {PROMOTER}") } else { format!("   {}", part.name) })
        .collect();
    out.push_str(&format!("Device {}_device(\n{}\n);\n", entry.name, members.join(",\n")));
}

fn emit_rule_block(out: &mut String, name: &str, target: &str, clauses: &[String]) {
    out.push_str(&format!("Rule {name}( ON {target}:\n   {}\n);\n", clauses.join(CLAUSE_SEPARATOR)));
}

fn device_clauses(
    entry: &CatalogEntry<'_>,
    rules: &RulePools,
    features: EmitFeatures,
    dropped_rules: &mut Vec<DroppedRule>,
) -> Result<Vec<String>, CompileError> {
    let mut clauses: Vec<String> = entry.unit.promoters().map(|p| format!("CONTAINS {}", p.name)).collect();
    let promoter_count = clauses.len();

    if features.contains(EmitFeatures::TOPOLOGY_ORDERING) {
        if let Some(clause) = promoter_order_clause(entry.gate, promoter_count)? {
            clauses.push(clause);
        }
    }

    let members: Vec<&str> = entry.unit.parts.iter().map(|p| p.name.as_str()).collect();
    let selection = select_rules(&entry.name, &members, &rules.part_rules);
    let extra = selection.clause();
    if !extra.is_empty() {
        clauses.push(extra);
    }
    dropped_rules.extend(selection.dropped);

    clauses.push(ALL_FORWARD.to_string());
    Ok(clauses)
}

/// `<first> BEFORE <second>` from the gate's promoter order, when both the
/// order and the unit have at least two promoters.
fn promoter_order_clause(gate: &Gate, promoter_count: usize) -> Result<Option<String>, CompileError> {
    if gate.promoter_order.len() < 2 || promoter_count < 2 {
        return Ok(None);
    }

    let lookup = |index: usize| {
        gate.input_promoters.get(index).ok_or_else(|| CompileError::PromoterOrderOutOfRange {
            gate: gate.name.clone(),
            index,
            available: gate.input_promoters.len(),
        })
    };
    let first = lookup(gate.promoter_order[0])?;
    let second = lookup(gate.promoter_order[1])?;

    Ok(Some(format!("{first} BEFORE {second}")))
}

fn circuit_clauses(
    catalog: &Catalog<'_>,
    gates: &[String],
    rules: &RulePools,
    features: EmitFeatures,
    dropped_rules: &mut Vec<DroppedRule>,
) -> Vec<String> {
    let mut clauses: Vec<String> = gates.iter().map(|gate| format!("{gate:<12} EXACTLY 1")).collect();

    let selection = select_rules(CIRCUIT, gates, &rules.gate_rules);
    let extra = selection.clause();
    if !extra.is_empty() {
        clauses.push(extra);
    }
    dropped_rules.extend(selection.dropped);

    clauses.push(ALL_FORWARD.to_string());

    if features.contains(EmitFeatures::SCARS) {
        clauses.extend(catalog.scars.iter().map(|scar| format!("{:<12} EXACTLY 1", scar.name)));
        clauses.extend(catalog.scars.iter().map(|scar| format!("FORWARD {}", scar.name)));
        clauses.extend(catalog.scars.iter().enumerate().map(|(i, scar)| format!("[{}] EQUALS {}", i * 2, scar.name)));
    }

    clauses
}

/// Nested loops over each device's variants; the innermost body rebuilds the
/// circuit from the current bindings and collects its permutations.
fn emit_enumeration(out: &mut String, catalog: &Catalog<'_>, gates: &[String]) {
    out.push_str("Array allResults;\n\n");

    let indices: Vec<String> = (1..=gates.len()).map(|k| format!("i{k}")).collect();

    for (name, idx) in catalog.device_names().zip(&indices) {
        let condition = format!("{idx}<sizeof({name}_devices);");
        out.push_str(&format!("for(num {idx}=0;  {condition:<28}{idx}={idx}+1) {{\n"));
    }

    if !gates.is_empty() {
        out.push('\n');
        for ((name, gate), idx) in catalog.device_names().zip(gates).zip(&indices) {
            out.push_str(&format!("{gate:<12} = {name}_devices[{idx}];\n"));
        }
        out.push('\n');
    }

    let members: Vec<String> = gates
        .iter()
        .map(String::as_str)
        .chain(catalog.scars.iter().map(|scar| scar.name.as_str()))
        .map(|member| format!("   {member}"))
        .collect();
    if members.is_empty() {
        out.push_str(&format!("Device {CIRCUIT}(\n);\n\n"));
    } else {
        out.push_str(&format!("Device {CIRCUIT}(\n{}\n);\n\n", members.join(",\n")));
    }

    out.push_str(&format!("result = permute({CIRCUIT});\n\n"));
    out.push_str("allResults = allResults + result;\n");

    for _ in &indices {
        out.push_str("}\n");
    }
}
