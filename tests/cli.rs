mod common;

use assert_cmd::Command;
use common::TestWorkspace;
use predicates::str::contains;

const RIDERS_CSV: &str = "\
nom,equipe,homme,age
Hinault,,true,30
Lemond,,true,20
,,,
";

fn tabular() -> Command {
    Command::cargo_bin("tabular").expect("binary exists")
}

#[test]
fn show_prints_space_delimited_table() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("riders.csv", "planet,star\nMars,Sun\n");

    tabular()
        .args(["show", "-i", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout("planet   star\nMars     Sun \n");
}

#[test]
fn show_cleans_up_before_printing() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("riders.csv", RIDERS_CSV);

    tabular()
        .args([
            "show",
            "-i",
            path.to_str().unwrap(),
            "--delete-blank-rows",
            "--delete-blank-columns",
            "--delete-homogenous-columns",
            "--except",
            "homme",
        ])
        .assert()
        .success()
        .stdout("nom       homme   age\nHinault   true    30 \nLemond    true    20 \n");
}

#[test]
fn show_applies_column_map() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("riders.csv", "nom,equipe\nHinault,Renault\n");
    let map = workspace.write("columns.yml", "nom: name\nequipe: team\n");

    tabular()
        .args([
            "show",
            "-i",
            path.to_str().unwrap(),
            "-m",
            map.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(contains("name      team"))
        .stdout(contains("Hinault   Renault"));
}

#[test]
fn columns_lists_keys_types_and_widths() {
    let workspace = TestWorkspace::new();
    let path = workspace.write(
        "results.csv",
        "Place,Last Name,Date,Member?\n1,Hinault,7/22/85,1\n",
    );

    tabular()
        .args(["columns", "-i", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("0\tplace\tstring\t5"))
        .stdout(contains("1\tlast_name\tstring\t9"))
        .stdout(contains("2\tdate\tdate\t10"))
        .stdout(contains("3\tmember?\tboolean\t7"));
}

#[test]
fn invalid_date_fails_with_row_context() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("launches.csv", "date\n99/z/99\n");

    tabular()
        .args(["show", "-i", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("'date' row 0 '99/z/99' is not a valid date"));
}

#[test]
fn missing_input_is_reported() {
    let workspace = TestWorkspace::new();
    let path = workspace.path().join("absent.csv");

    tabular()
        .args(["show", "-i", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("Could not find"));
}

#[test]
fn reads_csv_from_stdin() {
    tabular()
        .args(["show", "-i", "-"])
        .write_stdin("planet,star\nMars,Sun\n")
        .assert()
        .success()
        .stdout(contains("Mars     Sun"));
}

#[test]
fn except_keys_are_normalized() {
    let workspace = TestWorkspace::new();
    let path = workspace.write(
        "riders.csv",
        "Nom,Equipe,First Name\nHinault,,\nLemond,,\n",
    );

    tabular()
        .args([
            "show",
            "-i",
            path.to_str().unwrap(),
            "--delete-blank-columns",
            "--except",
            "Equipe,First Name",
        ])
        .assert()
        .success()
        .stdout(contains("nom       equipe   first_name"));
}
