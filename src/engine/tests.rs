use super::{DeviceNode, Element, Engine, EngineOutput, Orientation, RESULT_COLLECTION, extract};
use crate::error::{EngineError, Error};
use crate::{
    Direction, Gate, GatePlacement, Options, Part, PartLibrary, RulePools, SCAR, TranscriptionUnit, design, run_engine,
};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use Direction::{Forward as Fwd, Reverse as Rev};
use Orientation::{Forward, Reverse};

/// Hands back a canned report and remembers which program it was given.
struct StubEngine {
    output: Result<EngineOutput, String>,
    seen: RefCell<Option<(PathBuf, String)>>,
}

impl StubEngine {
    fn solutions(circuits: Vec<Element>) -> Self {
        let output = EngineOutput::new().with_collection(RESULT_COLLECTION, circuits);
        StubEngine { output: Ok(output), seen: RefCell::new(None) }
    }

    fn failing(message: &str) -> Self {
        StubEngine { output: Err(message.to_string()), seen: RefCell::new(None) }
    }
}

impl Engine for StubEngine {
    fn execute(&self, program: &Path) -> Result<EngineOutput, EngineError> {
        let text = fs::read_to_string(program).unwrap_or_default();
        *self.seen.borrow_mut() = Some((program.to_path_buf(), text));
        match &self.output {
            Ok(output) => Ok(output.clone()),
            Err(message) => Err(EngineError::MissingCollection(message.clone())),
        }
    }
}

fn library(parts: &[(&str, &str)]) -> PartLibrary {
    parts.iter().map(|(t, n)| Part::new(*t, *n)).collect()
}

fn gate_device(name: &str, parts: &[(&str, Orientation)]) -> Element {
    let components = parts.iter().map(|(n, _)| Element::part(*n)).collect();
    let orientations = parts.iter().map(|(_, o)| *o).collect();
    Element::Device(DeviceNode::new(name, components, orientations))
}

fn circuit(members: Vec<Element>, orientations: Vec<Orientation>) -> Element {
    Element::Device(DeviceNode::new("circuit", members, orientations))
}

fn options_in(dir: &Path, max_variants: usize) -> Options {
    Options { max_variants, output_directory: dir.to_path_buf(), ..Options::default() }
}

#[test]
fn single_unit_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let lib = library(&[("promoter", "promoterX"), ("cds", "cdsY")]);
    let gates = vec![Gate::new("G", vec![TranscriptionUnit::new(vec![
        Part::new("promoter", "promoterX"),
        Part::new("cds", "cdsY"),
    ])])];
    let engine = StubEngine::solutions(vec![circuit(
        vec![gate_device("gate_G", &[("promoterX", Forward), ("cdsY", Forward)])],
        vec![Forward],
    )]);

    let result = design(&engine, &gates, &lib, &RulePools::default(), &options_in(dir.path(), 1)).unwrap();

    assert_eq!(result.variants.len(), 1);
    assert_eq!(result.variants[0].layout(), vec![("promoterX", Fwd), ("cdsY", Fwd)]);
    assert_eq!(result.variants[0].gates, vec![GatePlacement { name: "gate_G".into(), direction: Fwd }]);
    assert_eq!(result.variants[0].to_string(), "+promoterX +cdsY");

    let (path, text) = engine.seen.borrow().clone().unwrap();
    assert_eq!(path, dir.path().join("circuit.eug"));
    assert_eq!(text, result.program.text);
}

#[test]
fn results_are_capped_at_available_count() {
    let lib = library(&[("promoter", "pTac"), ("cds", "YFP")]);
    let solution = circuit(vec![gate_device("gate_A", &[("pTac", Forward), ("YFP", Forward)])], vec![Forward]);
    let output = EngineOutput::new().with_collection(RESULT_COLLECTION, vec![solution.clone(), solution]);

    assert_eq!(extract(&output, &lib, 5).unwrap().len(), 2);
    assert_eq!(extract(&output, &lib, 1).unwrap().len(), 1);
}

#[test]
fn zero_solutions_is_not_an_error() {
    let output = EngineOutput::new().with_collection(RESULT_COLLECTION, vec![]);
    assert!(extract(&output, &PartLibrary::new(), 5).unwrap().is_empty());
}

#[test]
fn missing_result_collection_is_an_engine_error() {
    let err = extract(&EngineOutput::new(), &PartLibrary::new(), 5).unwrap_err();
    assert!(matches!(err, Error::Engine(EngineError::MissingCollection(ref name)) if name == RESULT_COLLECTION));
}

#[test]
fn reversed_gate_is_flipped_before_expansion() {
    let lib = library(&[("promoter", "pTac"), ("ribozyme", "RiboJ"), ("cds", "YFP"), ("cds", "PhlF")]);
    let output = EngineOutput::new().with_collection(RESULT_COLLECTION, vec![circuit(
        vec![
            gate_device("gate_A", &[("pTac", Forward), ("RiboJ", Forward), ("YFP", Forward)]),
            gate_device("gate_B", &[("PhlF", Forward)]),
        ],
        vec![Reverse, Forward],
    )]);

    let variants = extract(&output, &lib, 1).unwrap();

    assert_eq!(variants[0].layout(), vec![("YFP", Rev), ("RiboJ", Rev), ("pTac", Rev), ("PhlF", Fwd)]);
    assert_eq!(variants[0].gates[0], GatePlacement { name: "gate_A".into(), direction: Rev });
    assert_eq!(variants[0].gates[1].direction, Fwd);
}

#[test]
fn part_direction_comes_from_its_own_gate() {
    let lib = library(&[("promoter", "pTac"), ("cds", "YFP")]);
    let output = EngineOutput::new().with_collection(RESULT_COLLECTION, vec![circuit(
        vec![gate_device("gate_A", &[("pTac", Forward), ("YFP", Reverse)])],
        vec![Forward],
    )]);

    let variants = extract(&output, &lib, 1).unwrap();
    assert_eq!(variants[0].layout(), vec![("pTac", Fwd), ("YFP", Rev)]);
}

#[test]
fn loose_circuit_parts_are_forward() {
    let lib = library(&[("promoter", "pTac"), (SCAR, "s0"), (SCAR, "s1")]);
    let output = EngineOutput::new().with_collection(RESULT_COLLECTION, vec![circuit(
        vec![Element::part("s0"), gate_device("gate_A", &[("pTac", Forward)]), Element::part("s1")],
        vec![Reverse, Forward, Reverse],
    )]);

    let variants = extract(&output, &lib, 1).unwrap();
    assert_eq!(variants[0].layout(), vec![("s0", Fwd), ("pTac", Fwd), ("s1", Fwd)]);
}

#[test]
fn bare_part_result_is_skipped() {
    let lib = library(&[("promoter", "pTac")]);
    let output = EngineOutput::new().with_collection(RESULT_COLLECTION, vec![
        Element::part("pTac"),
        circuit(vec![gate_device("gate_A", &[("pTac", Forward)])], vec![Forward]),
    ]);

    let variants = extract(&output, &lib, 5).unwrap();
    assert_eq!(variants.len(), 1);
}

#[test]
fn unknown_part_is_reported() {
    let output = EngineOutput::new().with_collection(RESULT_COLLECTION, vec![circuit(
        vec![gate_device("gate_A", &[("pGhost", Forward)])],
        vec![Forward],
    )]);

    let err = extract(&output, &PartLibrary::new(), 1).unwrap_err();
    assert!(matches!(err, Error::UnknownPart(ref name) if name == "pGhost"));
}

#[test]
fn engine_failure_is_surfaced() {
    let dir = tempfile::tempdir().unwrap();
    let program = dir.path().join("circuit.eug");
    fs::write(&program, "").unwrap();

    let err = run_engine(&StubEngine::failing("boom"), &program, &PartLibrary::new(), &Options::default()).unwrap_err();
    assert!(matches!(err, Error::Engine(_)));
}

#[test]
fn program_file_is_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let options = Options { output_directory: dir.path().join("nested"), ..Options::default() };
    let lib = library(&[("cds", "YFP")]);
    let gates = vec![Gate::new("A", vec![TranscriptionUnit::new(vec![Part::new("cds", "YFP")])])];
    fs::create_dir_all(&options.output_directory).unwrap();
    fs::write(options.program_path(), "stale").unwrap();

    let result = design(&StubEngine::solutions(vec![]), &gates, &lib, &RulePools::default(), &options).unwrap();

    assert_eq!(fs::read_to_string(&result.path).unwrap(), result.program.text);
    assert!(result.variants.is_empty());
}

#[test]
fn scarred_design_expands_gates_between_scars() {
    let dir = tempfile::tempdir().unwrap();
    let mut lib = library(&[("promoter", "pTac"), ("cds", "YFP"), ("promoter", "pBad"), ("cds", "PhlF")]);
    for name in ["s0", "s1", "s2"] {
        lib.insert_scar(Part::new(SCAR, name));
    }
    let gates = vec![
        Gate::new("A", vec![TranscriptionUnit::new(vec![Part::new("promoter", "pTac"), Part::new("cds", "YFP")])]),
        Gate::new("B", vec![TranscriptionUnit::new(vec![Part::new("promoter", "pBad"), Part::new("cds", "PhlF")])]),
    ];
    let options = Options { scars: true, ..options_in(dir.path(), 5) };
    let engine = StubEngine::solutions(vec![circuit(
        vec![
            Element::part("s0"),
            gate_device("gate_B", &[("pBad", Forward), ("PhlF", Forward)]),
            Element::part("s1"),
            gate_device("gate_A", &[("pTac", Forward), ("YFP", Forward)]),
            Element::part("s2"),
        ],
        vec![Forward, Reverse, Forward, Forward, Forward],
    )]);

    let result = design(&engine, &gates, &lib, &RulePools::default(), &options).unwrap();

    assert_eq!(result.program.scars, vec!["s0", "s1", "s2"]);
    assert_eq!(result.variants[0].layout(), vec![
        ("s0", Fwd),
        ("PhlF", Rev),
        ("pBad", Rev),
        ("s1", Fwd),
        ("pTac", Fwd),
        ("YFP", Fwd),
        ("s2", Fwd),
    ]);
}

#[test]
fn nested_sub_devices_are_expanded_in_order() {
    let lib = library(&[("promoter", "pTac"), ("cds", "YFP"), ("promoter", "pBad"), ("terminator", "L3S2P21")]);
    let forward_tu = gate_device("tu_1", &[("pTac", Forward), ("YFP", Forward)]);
    let reversed_tu = gate_device("tu_2", &[("pBad", Forward), ("L3S2P21", Reverse)]);
    let gate = Element::Device(DeviceNode::new("gate_A", vec![forward_tu, reversed_tu], vec![Forward, Reverse]));
    let output = EngineOutput::new().with_collection(RESULT_COLLECTION, vec![circuit(vec![gate], vec![Forward])]);

    let variants = extract(&output, &lib, 1).unwrap();

    assert_eq!(variants[0].layout(), vec![("pTac", Fwd), ("YFP", Fwd), ("L3S2P21", Fwd), ("pBad", Rev)]);
    assert_eq!(variants[0].gates, vec![GatePlacement { name: "gate_A".into(), direction: Fwd }]);
}

#[test]
fn sub_device_is_not_resolved_as_a_part() {
    // A library part sharing the sub-device's name must not stand in for it.
    let lib = library(&[("promoter", "pTac"), ("cds", "YFP"), ("cds", "tu")]);
    let output = EngineOutput::new().with_collection(RESULT_COLLECTION, vec![circuit(
        vec![Element::Device(DeviceNode::new(
            "gate_A",
            vec![gate_device("tu", &[("pTac", Forward), ("YFP", Forward)])],
            vec![Forward],
        ))],
        vec![Reverse],
    )]);

    let variants = extract(&output, &lib, 1).unwrap();

    // The reversed gate flips its only slot, which in turn flips the sub-device.
    assert_eq!(variants[0].layout(), vec![("YFP", Rev), ("pTac", Rev)]);
}
