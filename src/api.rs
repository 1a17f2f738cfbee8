use crate::compiler::{self, Program};
use crate::config::Options;
use crate::engine::{self, Engine};
use crate::error::Error;
use crate::{Gate, ModuleVariant, PartLibrary, RulePools};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Compile `gates` into a program. Nothing is written or executed.
///
/// # Example
/// ```
/// use gatelayout::{Gate, Options, Part, PartLibrary, RulePools, TranscriptionUnit, compile};
///
/// let unit = TranscriptionUnit::new(vec![Part::new("promoter", "pTac"), Part::new("cds", "YFP")]);
/// let gates = vec![Gate::new("A", vec![unit])];
///
/// let program = compile(&gates, &PartLibrary::new(), &RulePools::default(), &Options::default()).unwrap();
/// assert!(program.text.contains("Device A_device("));
/// assert_eq!(program.devices, vec!["A"]);
/// ```
pub fn compile(gates: &[Gate], library: &PartLibrary, rules: &RulePools, options: &Options) -> Result<Program, Error> {
    Ok(compiler::compile(gates, library, rules, options.features())?)
}

/// Write `program` to `output_directory/program_file`, replacing any
/// previous file. Returns the path written.
pub fn write_program(program: &Program, options: &Options) -> Result<PathBuf, Error> {
    let path = options.program_path();
    fs::create_dir_all(&options.output_directory)
        .map_err(|source| Error::Io { path: options.output_directory.clone(), source })?;
    fs::write(&path, &program.text).map_err(|source| Error::Io { path: path.clone(), source })?;

    info!(path = %path.display(), bytes = program.text.len(), "program written");
    Ok(path)
}

/// Execute a written program and rebuild at most `options.max_variants`
/// module variants from its results.
pub fn run_engine<E: Engine + ?Sized>(
    engine: &E,
    program: &Path,
    library: &PartLibrary,
    options: &Options,
) -> Result<Vec<ModuleVariant>, Error> {
    let output = engine.execute(program)?;
    engine::extract(&output, library, options.max_variants)
}

/// The program that was run and the layouts it produced.
#[derive(Debug, Clone)]
pub struct Design {
    pub program: Program,
    pub path: PathBuf,
    pub variants: Vec<ModuleVariant>,
}

/// Compile, write and run in one go.
pub fn design<E: Engine + ?Sized>(
    engine: &E,
    gates: &[Gate],
    library: &PartLibrary,
    rules: &RulePools,
    options: &Options,
) -> Result<Design, Error> {
    let program = compile(gates, library, rules, options)?;
    let path = write_program(&program, options)?;
    let variants = run_engine(engine, &path, library, options)?;
    Ok(Design { program, path, variants })
}
