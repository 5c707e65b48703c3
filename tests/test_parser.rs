use dcaspt2_input::category::Category;
use dcaspt2_input::memory::PointGroup;
use dcaspt2_input::parser::{parse_input, ParseError};
use std::fs::File;
use std::io::Write;
use tempfile::TempDir;

fn write_input(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = File::create(&path).unwrap();
    write!(file, "{}", content).unwrap();
    path
}

#[test]
fn test_parse_gerade_ungerade_input() {
    let input = r#"
electron_number = 6
point_group = D2h
moltra_scheme = 4
totsym = 33
diracver = 22
eshift = 0.25

*ORBITALS
E1g 1 inactive  -20.1
E1u 1 ras1       -1.4
E1g 2 active     -0.6
E1u 2 active     -0.2
E1g 3 ras3        0.3
E1u 3 secondary   0.9
*
"#;
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "gu.inp", input);

    let input_data = parse_input(&path).unwrap();
    assert_eq!(input_data.info.electron_number, 6);
    assert_eq!(input_data.info.point_group, Some(PointGroup::D2h));
    assert_eq!(input_data.info.moltra_scheme.as_deref(), Some("4"));
    assert_eq!(input_data.user_input.totsym, 33);
    assert_eq!(input_data.user_input.diracver, 22);
    assert_eq!(input_data.user_input.eshift, 0.25);

    let labels: Vec<&str> = input_data.snapshot.symmetry_labels().into_iter().collect();
    assert_eq!(labels, vec!["E1g", "E1u"]);
    assert_eq!(input_data.snapshot.category_of("E1u", 1), Some(Category::Ras1));
}

#[test]
fn test_case_insensitive_sections_and_aliases() {
    let input = "nelec = 2\n*orbitals\nA 1 RAS2\nA 2 Not_Used\n*\n";
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "alias.inp", input);

    let input_data = parse_input(&path).unwrap();
    assert_eq!(input_data.snapshot.category_of("A", 1), Some(Category::Active));
    assert_eq!(input_data.snapshot.category_of("A", 2), Some(Category::Unused));
}

#[test]
fn test_duplicate_orbital_is_rejected() {
    let input = "electron_number = 2\n*ORBITALS\nE1 1 active\nE1 1 secondary\n*\n";
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "dup.inp", input);

    assert!(matches!(parse_input(&path), Err(ParseError::Table(_))));
}

#[test]
fn test_bad_range_in_classify() {
    let input = "electron_number = 2\n*ORBITALS\nE1 1 active\nE1 2 active\n*\n*CLASSIFY\nE1 ras1 2..1\n*\n";
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "range.inp", input);

    match parse_input(&path) {
        Err(ParseError::Parse { line, .. }) => assert_eq!(line, 7),
        other => panic!("expected a parse error, got {:?}", other.map(|d| d.snapshot.len())),
    }
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.inp");
    assert!(matches!(parse_input(&path), Err(ParseError::Io(_))));
}
