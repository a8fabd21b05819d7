use andy_analyzer::{run_request, serve, RequestError};
use serde_json::Value;
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;
use tempfile::TempDir;
use test_log::test;

fn write(dir: &TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).unwrap();
    path
}

fn reports(output: &[u8]) -> Vec<Value> {
    String::from_utf8(output.to_vec())
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).expect("not json"))
        .collect()
}

#[test]
fn one_shot_report_shape() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(&dir, "main.andy", "class Main {}\nvar greeting = \"hi\"  \n");
    let mut output = vec![];
    run_request(&input, &input, &mut output).unwrap();

    let reports = reports(&output);
    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    for key in ["tokens", "linter", "declarations", "errors", "elapsed"] {
        assert!(report.get(key).is_some(), "missing {key}");
    }

    let file = input.canonicalize().unwrap().display().to_string();
    assert_eq!(report["tokens"][0]["type"], "keyword");
    assert_eq!(report["tokens"][0]["location"]["file"], file.as_str());

    let rules: Vec<_> = report["linter"]
        .as_array()
        .unwrap()
        .iter()
        .map(|warning| warning["type"].as_str().unwrap())
        .collect();
    assert_eq!(
        rules,
        vec!["trailing-whitespace", "string-default-single-quotes"]
    );

    assert_eq!(report["declarations"][0]["type"], "class");
    assert_eq!(report["declarations"][0]["name"], "Main");
    assert_eq!(report["declarations"][0]["location"]["column"], 6);
    assert_eq!(report["errors"], Value::Array(vec![]));
}

#[test]
fn temp_file_text_is_reported_under_input_name() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(&dir, "main.andy", "class Saved {}");
    let temp = write(&dir, "unsaved", "class Unsaved {}");
    let mut output = vec![];
    run_request(&input, &temp, &mut output).unwrap();

    let report = &reports(&output)[0];
    assert_eq!(report["declarations"][0]["name"], "Unsaved");
    assert_eq!(
        report["declarations"][0]["location"]["file"],
        input.canonicalize().unwrap().display().to_string().as_str()
    );
}

#[test]
fn missing_input_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.andy");
    let error = run_request(&missing, &missing, vec![]).unwrap_err();
    assert!(matches!(error, RequestError::MissingInput(_)));
    assert!(error.to_string().contains("does not exist"));
}

#[test]
fn directory_input_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let error = run_request(dir.path(), dir.path(), vec![]).unwrap_err();
    assert!(matches!(error, RequestError::NotAFile(_)));
}

#[test]
fn server_answers_each_request() {
    let dir = tempfile::tempdir().unwrap();
    let first = write(&dir, "first.andy", "class A {}");
    let second = write(&dir, "second.andy", "fn bar(");
    let requests = format!(
        "{0}\n{0}\n{1}\n{1}\n",
        first.display(),
        second.display()
    );
    let mut output = vec![];
    let answered = serve(Cursor::new(requests), &mut output).unwrap();
    assert_eq!(answered, 2);

    let reports = reports(&output);
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["declarations"][0]["name"], "A");
    assert_eq!(
        reports[1]["errors"][0]["message"],
        "unexpected end of input, expected identifier"
    );
    assert_eq!(reports[1]["errors"][0]["location"]["column"], 7);
}

#[test]
fn server_rejects_half_a_request() {
    let error = serve(Cursor::new("main.andy\n"), vec![]).unwrap_err();
    assert!(matches!(error, RequestError::IncompleteRequest(input) if input == "main.andy"));
}

#[test]
fn server_with_no_requests() {
    let answered = serve(Cursor::new(""), vec![]).unwrap();
    assert_eq!(answered, 0);
}
