use dcaspt2_input::caspt2::render_caspt2_input;
use dcaspt2_input::category::Category;
use dcaspt2_input::controller::{Controller, Event, LimitField, SummaryField, TextSummary};
use dcaspt2_input::parser::{parse_input, parse_input_str};
use dcaspt2_input::validation::{validate_caspt2_input, validate_input_data, ErrorCategory};
use dcaspt2_input::{io, range};
use std::fs::{self, File};
use std::io::Write;
use std::sync::mpsc;
use tempfile::TempDir;

const SCENARIO: &str = r#"
electron_number = 4
point_group = C1

*ORBITALS
E1 1 ras1
E1 2 ras1
E1 3 unused
E1 4 active
E1 5 active
E1 6 unused
*
"#;

fn load_scenario(dir: &TempDir) -> dcaspt2_input::parser::InputData {
    let path = dir.path().join("scenario.inp");
    let mut file = File::create(&path).unwrap();
    write!(file, "{}", SCENARIO).unwrap();
    parse_input(&path).unwrap()
}

#[test]
fn test_end_to_end_scenario() {
    let dir = TempDir::new().unwrap();
    let input_data = load_scenario(&dir);
    let ivo_path = dir.path().join("active.ivo.inp");

    let mut controller = Controller::new(
        input_data.info,
        input_data.user_input,
        TextSummary::default(),
        &ivo_path,
    );

    let (sender, receiver) = mpsc::channel();
    sender
        .send(Event::ClassificationChanged(input_data.snapshot))
        .unwrap();
    drop(sender);
    controller.run(receiver).unwrap();

    let derived = controller.derived().unwrap();
    assert_eq!(derived.tally.count(Category::Ras1), 4);
    assert_eq!(derived.tally.count(Category::Active), 4);
    assert_eq!(derived.tally.total(), 8);

    let ranges = derived.usage.ranges();
    assert_eq!(ranges.len(), 1);
    assert_eq!(ranges[0].1, "1..2 4..5");
    assert_eq!(range::expand(&ranges[0].1).unwrap(), vec![1, 2, 4, 5]);

    let view = controller.view();
    assert_eq!(view.text(SummaryField::Count(Category::Ras1)), Some("ras1: 4"));
    assert_eq!(
        view.text(SummaryField::Count(Category::Active)),
        Some("active, ras2: 4")
    );
    assert_eq!(
        view.text(SummaryField::RecommendedMoltra),
        Some("Recommended MOLTRA setting: \n E1 1..2 4..5")
    );
    assert!(view
        .text(SummaryField::PointGroupMemory)
        .unwrap()
        .starts_with("Point group: C1"));
    assert_eq!(view.top(LimitField::Ras1MaxHole), Some(4));
    assert_eq!(view.top(LimitField::Ras3MaxElectron), Some(0));

    let ivo = fs::read_to_string(&ivo_path).unwrap();
    assert_eq!(
        ivo,
        ".ninact\n0\n.nact\n4\n.nsec\n4\n.nelec\n4\n.nocc\n4\n.nvcut\n2\n\
         .totsym\n1\n.diracver\n21\n.subprograms\nIVO\n.end\n"
    );
}

#[test]
fn test_caspt2_input_for_scenario() {
    let dir = TempDir::new().unwrap();
    let input_data = load_scenario(&dir);
    let mut controller = Controller::new(
        input_data.info,
        input_data.user_input,
        TextSummary::default(),
        dir.path().join("active.ivo.inp"),
    );
    controller
        .handle(Event::ClassificationChanged(input_data.snapshot))
        .unwrap();

    let derived = controller.derived().unwrap();
    validate_caspt2_input(controller.info(), controller.input(), &derived.tally).unwrap();

    let text = render_caspt2_input(
        controller.snapshot(),
        &derived.tally,
        controller.info(),
        controller.input(),
    );
    assert!(text.starts_with(".ninact\n0\n.nact\n8\n.nsec\n0\n.nelec\n4\n"));
    assert!(text.contains(".caspt2_ciroots\n1 1\n"));
    assert!(text.contains(".ras1\n1..4\n0\n"));
    assert!(text.contains(".ras2\n5..8\n"));
    assert!(text.ends_with(".diracver\n21\n.end\n"));

    let caspt2_path = dir.path().join("active.inp");
    io::write_caspt2_input(&text, &caspt2_path).unwrap();
    assert_eq!(fs::read_to_string(&caspt2_path).unwrap(), text);
}

#[test]
fn test_user_input_change_rewrites_ivo_and_clamps_limits() {
    let dir = TempDir::new().unwrap();
    let input_data = load_scenario(&dir);
    let ivo_path = dir.path().join("active.ivo.inp");
    let mut controller = Controller::new(
        input_data.info,
        input_data.user_input.clone(),
        TextSummary::default(),
        &ivo_path,
    );
    controller
        .handle(Event::ClassificationChanged(input_data.snapshot))
        .unwrap();

    let mut changed = input_data.user_input;
    changed.totsym = 3;
    changed.ras1_max_hole.set(10);
    controller.handle(Event::UserInputChanged(changed)).unwrap();

    assert_eq!(controller.input().ras1_max_hole.value(), 4);
    let ivo = fs::read_to_string(&ivo_path).unwrap();
    assert!(ivo.contains(".totsym\n3\n"));
}

#[test]
fn test_summary_json() {
    let dir = TempDir::new().unwrap();
    let input_data = load_scenario(&dir);
    let mut controller = Controller::new(
        input_data.info,
        input_data.user_input,
        TextSummary::default(),
        dir.path().join("active.ivo.inp"),
    );
    controller
        .handle(Event::ClassificationChanged(input_data.snapshot))
        .unwrap();

    let json_path = dir.path().join("scenario_summary.json");
    io::write_summary_json(controller.derived().unwrap(), &json_path).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value["ivo"]["nact"], 4);
    assert_eq!(value["ivo"]["nelec"], 4);
}

#[test]
fn test_ras3_limit_beyond_partition_is_rejected() {
    let content = r#"
electron_number = 2
ras3_max_electron = 5

*ORBITALS
E1 1 active
E1 2 ras3
E1 3 secondary
*
"#;
    let input_data = parse_input_str(content).unwrap();
    assert_eq!(input_data.user_input.ras3_max_electron.value(), 5);

    let err = validate_input_data(&input_data).unwrap_err();
    assert_eq!(err.category, ErrorCategory::LimitExceeded);
    assert!(err.message.contains("exceeds the 2 RAS3 spinors"));

    let dir = TempDir::new().unwrap();
    let mut controller = Controller::new(
        input_data.info,
        input_data.user_input,
        TextSummary::default(),
        dir.path().join("active.ivo.inp"),
    );
    controller
        .handle(Event::ClassificationChanged(input_data.snapshot))
        .unwrap();
    assert_eq!(controller.input().ras3_max_electron.value(), 2);
}
