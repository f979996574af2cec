use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../tests/fixtures").join(name)
}

fn copy_fixture(name: &str, dir: &Path) -> PathBuf {
    let target = dir.join(name);
    fs::copy(fixture(name), &target).expect("fixture should be copied");
    target
}

fn stdout_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).expect("stdout should contain valid json")
}

fn inside_flags(value: &Value) -> Vec<bool> {
    value
        .as_array()
        .expect("classification should be an array")
        .iter()
        .map(|point| point["inside"].as_bool().expect("inside flag"))
        .collect()
}

#[test]
fn info_emits_stable_json_contract() {
    let output = cargo_bin_cmd!("ruler-cli")
        .arg("info")
        .arg(fixture("triangle.roi.json"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).expect("stdout should be utf-8");
    insta::assert_snapshot!(stdout.trim_end(), @r#"
    {
      "left": {
        "polygon_vertices": 3,
        "support_rects": 0,
        "closed": true
      },
      "top": {
        "polygon_vertices": 0,
        "support_rects": 1,
        "closed": false
      },
      "right": {
        "polygon_vertices": 0,
        "support_rects": 0,
        "closed": false
      }
    }
    "#);
}

#[test]
fn classify_drops_non_positive_points_and_uses_polygon() {
    let temp = tempfile::tempdir().expect("temp dir should be created");
    let output = cargo_bin_cmd!("ruler-cli")
        .env("RULER_DATA_DIR", temp.path())
        .arg("classify")
        .arg(fixture("triangle.roi.json"))
        .arg("--side")
        .arg("left")
        .arg("--points")
        .arg(fixture("points.json"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value = stdout_json(&output);
    assert_eq!(inside_flags(&value), vec![true, false, false]);
    assert_eq!(value[0]["x"], 200.0);
    assert_eq!(value[0]["y"], 200.0);
}

#[test]
fn classify_counts_support_only_when_requested() {
    let temp = tempfile::tempdir().expect("temp dir should be created");
    let classify = |with_support: bool| {
        let mut command = cargo_bin_cmd!("ruler-cli");
        command
            .env("RULER_DATA_DIR", temp.path())
            .arg("classify")
            .arg(fixture("triangle.roi.json"))
            .arg("--side")
            .arg("top")
            .arg("--points")
            .arg(fixture("points.json"));
        if with_support {
            command.arg("--with-support");
        }
        stdout_json(&command.assert().success().get_output().stdout)
    };

    assert_eq!(inside_flags(&classify(false)), vec![false, false, false]);
    assert_eq!(inside_flags(&classify(true)), vec![false, true, false]);
}

#[test]
fn classify_rejects_unknown_side() {
    cargo_bin_cmd!("ruler-cli")
        .arg("classify")
        .arg(fixture("triangle.roi.json"))
        .arg("--side")
        .arg("bottom")
        .arg("--points")
        .arg(fixture("points.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid side"));
}

#[test]
fn init_writes_empty_document_and_refuses_to_overwrite() {
    let temp = tempfile::tempdir().expect("temp dir should be created");
    let path = temp.path().join("part.roi.json");

    cargo_bin_cmd!("ruler-cli").arg("init").arg(&path).assert().success();

    let value: Value =
        serde_json::from_str(&fs::read_to_string(&path).expect("roi file should exist"))
            .expect("roi file should be json");
    for side in ["left", "top", "right"] {
        assert_eq!(value[side]["support"], serde_json::json!([]));
        assert_eq!(value[side]["polygon"], serde_json::json!([]));
    }

    cargo_bin_cmd!("ruler-cli")
        .arg("init")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("file already exists"));
}

#[test]
fn add_point_keeps_polygon_in_canonical_order() {
    let temp = tempfile::tempdir().expect("temp dir should be created");
    let path = copy_fixture("triangle.roi.json", temp.path());

    for (x, y) in [("30", "5"), ("10", "20"), ("20", "1")] {
        cargo_bin_cmd!("ruler-cli")
            .arg("add-point")
            .arg(&path)
            .args(["--side", "right", "--x", x, "--y", y])
            .assert()
            .success();
    }

    let value: Value = serde_json::from_str(&fs::read_to_string(&path).expect("roi file"))
        .expect("roi file should be json");
    let xs: Vec<f64> = value["right"]["polygon"]
        .as_array()
        .expect("polygon array")
        .iter()
        .map(|point| point["x"].as_f64().expect("numeric x"))
        .collect();
    assert_eq!(xs, vec![10.0, 20.0, 30.0]);

    // Other sides survive the edit untouched.
    assert_eq!(value["top"]["support"].as_array().map(Vec::len), Some(1));
    assert_eq!(value["left"]["polygon"].as_array().map(Vec::len), Some(3));
}

#[test]
fn move_point_resorts_and_saves() {
    let temp = tempfile::tempdir().expect("temp dir should be created");
    let path = copy_fixture("triangle.roi.json", temp.path());

    let output = cargo_bin_cmd!("ruler-cli")
        .arg("move-point")
        .arg(&path)
        .args(["--side", "left", "--index", "0", "--x", "350", "--y", "250"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value = stdout_json(&output);
    assert_eq!(value["side"], "left");
    assert_eq!(value["polygon"][2]["x"], 350.0);

    let saved: Value = serde_json::from_str(&fs::read_to_string(&path).expect("roi file"))
        .expect("roi file should be json");
    assert_eq!(saved["left"]["polygon"], value["polygon"]);
}

#[test]
fn add_point_rejects_non_finite_coordinates() {
    let temp = tempfile::tempdir().expect("temp dir should be created");
    let path = copy_fixture("triangle.roi.json", temp.path());
    let before = fs::read_to_string(&path).expect("roi file");

    for value in ["inf", "NaN"] {
        cargo_bin_cmd!("ruler-cli")
            .arg("add-point")
            .arg(&path)
            .args(["--side", "left", "--x", value, "--y", "5"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("coordinate must be a finite number"));
    }

    assert_eq!(fs::read_to_string(&path).expect("roi file"), before);
    cargo_bin_cmd!("ruler-cli").arg("info").arg(&path).assert().success();
}

#[test]
fn move_point_fails_for_missing_vertex() {
    let temp = tempfile::tempdir().expect("temp dir should be created");
    let path = copy_fixture("triangle.roi.json", temp.path());
    let before = fs::read_to_string(&path).expect("roi file");

    cargo_bin_cmd!("ruler-cli")
        .arg("move-point")
        .arg(&path)
        .args(["--side", "right", "--index", "0", "--x", "1", "--y", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no vertex 0 on side right"));

    assert_eq!(fs::read_to_string(&path).expect("roi file"), before);
}

#[test]
fn info_fails_for_missing_file() {
    cargo_bin_cmd!("ruler-cli")
        .arg("info")
        .arg(fixture("missing.roi.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("file does not exist"));
}

#[test]
fn info_fails_for_malformed_document() {
    cargo_bin_cmd!("ruler-cli")
        .arg("info")
        .arg(fixture("invalid.roi.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed ROI record"));
}

#[test]
fn locate_clamps_position_and_remembers_directory() {
    let temp = tempfile::tempdir().expect("temp dir should be created");

    let output = cargo_bin_cmd!("ruler-cli")
        .env("RULER_DATA_DIR", temp.path())
        .args(["locate", "--dir", "/scans/run-1", "--file", "99", "--line", "3", "--remember"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value = stdout_json(&output);
    assert_eq!(value["status"], "/scans/run-1 / 29 / 3");
    assert_eq!(value["files"]["left"], "/scans/run-1/scan_29_left.dat");
    assert_eq!(value["roi"], "/scans/run-1/scan_29.roi.json");

    cargo_bin_cmd!("ruler-cli")
        .env("RULER_DATA_DIR", temp.path())
        .arg("prefs")
        .assert()
        .success()
        .stdout(predicate::str::contains("/scans/run-1"));
}

#[test]
fn locate_requires_a_directory() {
    let temp = tempfile::tempdir().expect("temp dir should be created");

    cargo_bin_cmd!("ruler-cli")
        .env("RULER_DATA_DIR", temp.path())
        .arg("locate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no scan directory given"));
}

#[test]
fn version_prints_package_version() {
    cargo_bin_cmd!("ruler-cli")
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
