//! Integration tests for the perflogic command line
#![allow(deprecated)] // suppress assert_cmd::Command::cargo_bin deprecation in tests

mod utils;

use perflogic::formula::{Formula, Sign};
use predicates::prelude::*;
use std::path::PathBuf;
use utils::{annotation, around, compare, declare, Fixture};

fn write_formulas(fixture: &Fixture, formulas: Vec<(&str, Formula)>) -> PathBuf {
    let annotations = vec![annotation(
        "Sort.quick",
        formulas
            .into_iter()
            .map(|(text, formula)| declare(text, formula))
            .collect(),
    )];
    let path = fixture.dir.path().join("formulas.json");
    std::fs::write(&path, serde_json::to_string_pretty(&annotations).unwrap()).unwrap();
    path
}

fn evaluate_cmd(fixture: &Fixture, formulas: &PathBuf) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("perflogic");
    cmd.arg("evaluate")
        .arg("--samples")
        .arg(fixture.store.root())
        .arg("--formulas")
        .arg(formulas);
    cmd
}

#[test]
fn test_evaluate_text_report() {
    let fixture = Fixture::new(&[("Quick", around(1.0)), ("Bubble", around(9.0))]);
    let formulas = write_formulas(
        &fixture,
        vec![("quick < bubble", compare("Quick", Sign::Lt, "Bubble"))],
    );

    evaluate_cmd(&fixture, &formulas)
        .assert()
        .success()
        .stdout(predicate::str::contains("📍 Sort.quick: TRUE"))
        .stdout(predicate::str::contains("✅ TRUE  quick < bubble"))
        .stdout(predicate::str::contains("t-test: HOLDS"))
        .stdout(predicate::str::contains("1 formula(s): 1 true, 0 false, 0 unknown"));
}

#[test]
fn test_false_formula_exit_code() {
    let fixture = Fixture::new(&[("Quick", around(1.0)), ("Bubble", around(9.0))]);
    let formulas = write_formulas(
        &fixture,
        vec![
            ("quick < bubble", compare("Quick", Sign::Lt, "Bubble")),
            ("bubble < quick", compare("Bubble", Sign::Lt, "Quick")),
        ],
    );

    evaluate_cmd(&fixture, &formulas)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("❌ FALSE  bubble < quick"));
}

#[test]
fn test_unknown_formula_is_not_failure() {
    let fixture = Fixture::new(&[("Quick", around(1.0))]);
    let formulas = write_formulas(
        &fixture,
        vec![("quick < gone", compare("Quick", Sign::Lt, "Gone"))],
    );

    evaluate_cmd(&fixture, &formulas)
        .assert()
        .success()
        .stdout(predicate::str::contains("UNKNOWN"))
        .stdout(predicate::str::contains("no sample data for Gone"));
}

#[test]
fn test_evaluate_json_output() {
    let fixture = Fixture::new(&[("Quick", around(1.0)), ("Bubble", around(9.0))]);
    let formulas = write_formulas(
        &fixture,
        vec![(
            "chain",
            Formula::and(
                compare("Quick", Sign::Lt, "Bubble"),
                Formula::and(
                    compare("Bubble", Sign::Gt, "Quick"),
                    compare("Quick", Sign::Le, "Bubble"),
                ),
            ),
        )],
    );

    let output = evaluate_cmd(&fixture, &formulas)
        .arg("--format")
        .arg("json")
        .arg("--jobs")
        .arg("2")
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["format"], "perflogic-json-v1");
    assert_eq!(parsed["summary"]["true"], 1);

    let tree = &parsed["annotations"][0]["formulas"][0]["tree"];
    assert_eq!(tree["type"], "logical");
    assert_eq!(tree["operator"], "and");
    assert_eq!(tree["operands"].as_array().unwrap().len(), 3);
    assert_eq!(tree["operands"][0]["tests"][0]["test"], "t_test");
}

#[test]
fn test_evaluate_with_config_file() {
    let fixture = Fixture::new(&[("Quick", around(1.0)), ("Bubble", around(9.0))]);
    let formulas = write_formulas(
        &fixture,
        vec![("quick < bubble", compare("Quick", Sign::Lt, "Bubble"))],
    );
    let config = fixture.dir.path().join("perflogic.toml");
    std::fs::write(
        &config,
        "confidence = 0.99\nprimary_test = \"all\"\ngraphs = [\"histogram\"]\n",
    )
    .unwrap();

    evaluate_cmd(&fixture, &formulas)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Mann-Whitney U: HOLDS"))
        .stdout(predicate::str::contains("n=10"));
}

#[test]
fn test_invalid_config_rejected() {
    let fixture = Fixture::new(&[]);
    let formulas = write_formulas(&fixture, vec![]);
    let config = fixture.dir.path().join("bad.toml");
    std::fs::write(&config, "confidence = 7.0\n").unwrap();

    evaluate_cmd(&fixture, &formulas)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("confidence"));
}

#[test]
fn test_invalid_formulas_file() {
    let fixture = Fixture::new(&[]);
    let path = fixture.dir.path().join("formulas.json");
    std::fs::write(&path, "{ not json").unwrap();

    evaluate_cmd(&fixture, &path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid formulas file"));
}

#[test]
fn test_inspect_with_quantile_clip() {
    let dir = tempfile::TempDir::new().unwrap();
    let file = dir.path().join("run.samples");
    std::fs::write(
        &file,
        "# nightly\n# date=2024-03-01\n# warmup=3\nBEGIN-SAMPLES\n1\n2\n3\n4\n100\nEND-SAMPLES\n",
    )
    .unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("perflogic");
    cmd.arg("inspect")
        .arg(&file)
        .arg("--quantile")
        .arg("0")
        .arg("80")
        .assert()
        .success()
        .stdout(predicate::str::contains("Identification: nightly"))
        .stdout(predicate::str::contains("Date: 2024-03-01"))
        .stdout(predicate::str::contains("Declared samples: unknown"))
        .stdout(predicate::str::contains("Declared warm-up: 3"))
        .stdout(predicate::str::contains("count:  5"))
        .stdout(predicate::str::contains("Clipped (1 removed)"));
}

#[test]
fn test_inspect_rejects_malformed_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let file = dir.path().join("bad.samples");
    std::fs::write(&file, "# id\nBEGIN-SAMPLES\n1\nxyz\n").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("perflogic");
    cmd.arg("inspect")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid sample file"));
}

#[test]
fn test_import_then_evaluate() {
    let fixture = Fixture::new(&[("Bubble", around(9.0))]);
    let source = fixture.dir.path().join("quick.samples");
    std::fs::write(
        &source,
        "# quick\nBEGIN-SAMPLES\n0.8\n1.0\n1.2\n0.9\n1.1\nEND-SAMPLES\n",
    )
    .unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("perflogic");
    cmd.arg("import")
        .arg("--samples")
        .arg(fixture.store.root())
        .arg("--method")
        .arg("Quick")
        .arg("--generator")
        .arg("random-1k")
        .arg("--machine")
        .arg("lab-01")
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 5 samples for Quick[random-1k]@lab-01"));

    let formulas = write_formulas(
        &fixture,
        vec![("quick < bubble", compare("Quick", Sign::Lt, "Bubble"))],
    );
    evaluate_cmd(&fixture, &formulas).assert().success();
}
