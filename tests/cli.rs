//! Runs the compiled binary against a fixture store.

mod common;

use std::fs;
use std::process::{Command, Output};

use common::sample_store;

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_citavi-bib"))
        .args(args)
        .env_remove("CITAVI_BIB_STORE")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn keys_lists_every_citekey_sorted() {
    let store = sample_store();
    let output = run(&["keys", "--store", store.path.to_str().unwrap()]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "duo2020\nsmith2020\nsolo2021\ntrio2019\n");
}

#[test]
fn store_can_come_from_environment() {
    let store = sample_store();
    let output = Command::new(env!("CARGO_BIN_EXE_citavi-bib"))
        .arg("keys")
        .env("CITAVI_BIB_STORE", &store.path)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(stdout(&output).contains("smith2020\n"));
}

#[test]
fn entries_json_uses_store_field_names() {
    let store = sample_store();
    let output = run(&["entries", "--json", "--store", store.path.to_str().unwrap()]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["trio2019"]["authors"], "Ada et al.");
    assert_eq!(json["smith2020"]["shortTitle"], "Smith2020–A Study");
    assert_eq!(json["duo2020"]["type"], "Book");
    assert_eq!(json["duo2020"]["year"], 2020);
}

#[test]
fn show_prints_one_reference() {
    let store = sample_store();
    let output = run(&["show", "@smith2020", "--store", store.path.to_str().unwrap()]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("title:       A Study of Things"));
    assert!(out.contains("bib:         Smith2020– A Study of Things"));
}

#[test]
fn show_fails_for_unknown_key() {
    let store = sample_store();
    let output = run(&["show", "nobody", "--store", store.path.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nobody"));
}

#[test]
fn bib_reads_document_file() {
    let store = sample_store();
    let document = store.path.with_file_name("paper.md");
    fs::write(&document, "Prior work [@trio2019; @solo2021] and @unknown.").unwrap();

    let output = run(&[
        "bib",
        document.to_str().unwrap(),
        "--store",
        store.path.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "solo2021\tNotes2021– Anonymous Notes\ntrio2019\tLovelace2019– Computing Machinery\n"
    );
}

#[test]
fn missing_store_prints_nothing_and_succeeds() {
    let store = sample_store();
    let missing = store.missing_path();
    let output = run(&["keys", "--store", missing.to_str().unwrap()]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
}

#[test]
fn no_store_is_an_error() {
    let output = run(&["keys"]);
    assert!(!output.status.success());
}
