//! Circuit-to-program compiler.
//!
//! This module turns gates and user rules into the text of a Eugene program.
//! It is split into four submodules, leaf first:
//!
//! ```text
//! rule text ── tokenize::referenced_names ──┐          (tokenize.rs)
//!                                           v
//!                        applicability::select_rules    (applicability.rs)
//!                                           │
//! gates ── Catalog::build ──────────────────┤           (catalog.rs)
//!          - unique device names            │
//!          - part types + declarations      │
//!          - scar selection                 v
//!                                       emit::emit      (emit.rs)
//!                                           │
//!                                           v
//!                                        Program
//! ```
//!
//! ## Determinism
//!
//! Catalog entries keep gate/unit order and types and declarations are kept
//! sorted, so the output depends only on the input. Replaying a
//! circuit means re-running this with the same input and diffing the text.
//!
//! ## Responsibilities by module
//!
//! - `tokenize.rs`: splits a rule into tokens and strips Eugene keywords.
//! - `applicability.rs`: picks the rules that only mention a device's members
//!   and refuses a second `STARTSWITH`.
//! - `catalog.rs`: names devices and deduplicates declarations.
//! - `emit.rs`: writes the sections in fixed order.

#[path = "compiler/applicability.rs"]
mod applicability;
#[path = "compiler/catalog.rs"]
mod catalog;
#[path = "compiler/emit.rs"]
mod emit;
#[path = "compiler/tokenize.rs"]
mod tokenize;


pub use applicability::{DroppedRule, RuleSelection, select_rules};
pub use emit::Program;
pub use tokenize::{referenced_names, tokenize};

use catalog::Catalog;
use crate::config::EmitFeatures;
use crate::error::CompileError;
use crate::{Gate, PartLibrary, RulePools};

/// Catalog `gates` and render the program.
pub(crate) fn compile(
    gates: &[Gate],
    library: &PartLibrary,
    rules: &RulePools,
    features: EmitFeatures,
) -> Result<Program, CompileError> {
    let catalog = Catalog::build(gates, library, features)?;
    emit::emit(&catalog, rules, features)
}
