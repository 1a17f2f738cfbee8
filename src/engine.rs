//! External engine boundary.
//!
//! The enumeration itself is somebody else's job. This module only defines
//! the contract with whatever executes the emitted program, and the walk that
//! turns its answer into [`ModuleVariant`](crate::ModuleVariant)s:
//!
//! ```text
//! program file ── Engine::execute ──▶ EngineOutput      (process.rs / any impl)
//!                                          │
//!                         "allResults" ────┤
//!                                          v
//!                                 extract (extract.rs)
//!                                   - cap at max_variants
//!                                   - flip reversed gates
//!                                   - per-slot directions
//!                                          │
//!                                          v
//!                                  Vec<ModuleVariant>
//! ```
//!
//! ## Responsibilities by module
//!
//! - `value.rs`: the result tree (`Element`, `DeviceNode`, `Orientation`) and
//!   `EngineOutput`, the named collections a run produced.
//! - `process.rs`: `ProcessEngine`, which shells out with a hard timeout.
//! - `extract.rs`: reconstruction of directed part lists.
//!
//! ## Failure model
//!
//! Every way the engine can fail is an [`EngineError`]. A run that finds no
//! circuit is a success with an empty `allResults`.

#[path = "engine/extract.rs"]
mod extract;
#[path = "engine/process.rs"]
mod process;
#[path = "engine/value.rs"]
mod value;

#[cfg(test)]
#[path = "engine/tests.rs"]
mod tests;

pub use extract::{RESULT_COLLECTION, extract};
pub use process::ProcessEngine;
pub use value::{DeviceNode, Element, EngineOutput, Orientation};

use crate::error::EngineError;
use std::path::Path;

/// Something that can execute an emitted program and report the collections
/// it bound.
pub trait Engine {
    fn execute(&self, program: &Path) -> Result<EngineOutput, EngineError>;
}

impl<E: Engine + ?Sized> Engine for &E {
    fn execute(&self, program: &Path) -> Result<EngineOutput, EngineError> {
        (**self).execute(program)
    }
}
