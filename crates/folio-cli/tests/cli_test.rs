use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture(parts: &[&str]) -> PathBuf {
    let mut path = repo_root().join("fixtures");
    for p in parts {
        path = path.join(p);
    }
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

fn folio() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("folio"));
    cmd.current_dir(repo_root()).env_remove("FOLIO_LOG");
    cmd
}

fn stdout_json(output: std::process::Output) -> Value {
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn layout_prints_entries_and_skipped_records() {
    let portfolio = fixture(&["experience", "portfolio.json"]);
    let output = folio()
        .args(["layout", "--today", "2024-06", portfolio.to_string_lossy().as_ref()])
        .output()
        .expect("run folio");
    let json = stdout_json(output);

    assert_eq!(json["layout"]["entries"].as_array().map(Vec::len), Some(6));
    assert_eq!(json["skipped"][0]["index"], 6);
    assert_eq!(json["skipped"][0]["reason"], "invalidStartDate");
    assert_eq!(json["skipped"][0]["value"], "TBD");
}

#[test]
fn layout_reads_stdin() {
    let output = folio()
        .args(["layout", "--today", "2024-06", "-"])
        .write_stdin(r#"[{"type":"job","title":"Engineer","company":"Acme","startDate":"2022-01"}]"#)
        .output()
        .expect("run folio");
    let json = stdout_json(output);
    assert_eq!(json["layout"]["lanes"], 1);
    assert_eq!(json["layout"]["entries"][0]["label"], "Engineer");
    assert_eq!(json["layout"]["entries"][0]["is_current"], true);
}

#[test]
fn render_writes_svg_to_out_path() {
    let portfolio = fixture(&["experience", "portfolio.json"]);
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("timeline.svg");

    folio()
        .args([
            "render",
            "--today",
            "2024-06",
            "--id",
            "resume",
            "--out",
            out.to_string_lossy().as_ref(),
            portfolio.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let svg = fs::read_to_string(&out).expect("read svg");
    assert!(svg.starts_with(r#"<svg id="resume""#));
    assert_eq!(svg.matches(r#"class="timeline-entry""#).count(), 6);
}

#[test]
fn render_of_an_empty_feed_is_the_empty_state() {
    let output = folio()
        .args(["render", "--today", "2024-06"])
        .write_stdin(r#"{"data":[]}"#)
        .output()
        .expect("run folio");
    assert!(output.status.success());
    let svg = String::from_utf8(output.stdout).expect("utf8");
    assert!(svg.contains("No experience to show yet."));
}

#[test]
fn simulate_is_deterministic_for_a_seed() {
    let skills = fixture(&["skills", "skills.json"]);
    let run = || {
        folio()
            .args([
                "simulate",
                "--frames",
                "30",
                "--seed",
                "7",
                skills.to_string_lossy().as_ref(),
            ])
            .output()
            .expect("run folio")
    };
    let first = stdout_json(run());
    let second = stdout_json(run());

    assert_eq!(first, second);
    assert_eq!(first["circles"], 8);
    assert_eq!(first["frames"], 30);
    let transforms = first["transforms"].as_array().expect("transforms");
    assert_eq!(transforms.len(), 8);
    for t in transforms {
        let (x, r) = (t["x"].as_f64().unwrap_or(-1.0), t["radius"].as_f64().unwrap_or(0.0));
        assert!(x >= r - 1e-9 && x <= 1280.0 - r + 1e-9);
    }
}

#[test]
fn yaml_config_overrides_defaults() {
    let skills = fixture(&["skills", "skills.json"]);
    let config = fixture(&["config", "folio.yaml"]);
    let output = folio()
        .args([
            "simulate",
            "--frames",
            "10",
            "--config",
            config.to_string_lossy().as_ref(),
            skills.to_string_lossy().as_ref(),
        ])
        .output()
        .expect("run folio");
    let json = stdout_json(output);
    for t in json["transforms"].as_array().expect("transforms") {
        let (y, r) = (t["y"].as_f64().unwrap_or(-1.0), t["radius"].as_f64().unwrap_or(0.0));
        assert!(y + r <= 540.0 + 1e-9);
    }

    let portfolio = fixture(&["experience", "portfolio.json"]);
    let output = folio()
        .args([
            "layout",
            "--today",
            "2024-06",
            "--config",
            config.to_string_lossy().as_ref(),
            portfolio.to_string_lossy().as_ref(),
        ])
        .output()
        .expect("run folio");
    let json = stdout_json(output);
    assert_eq!(json["layout"]["entries"][0]["card"]["width"], 280.0);
}

#[test]
fn invalid_config_exits_with_one() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = tmp.path().join("bad.json");
    fs::write(&config, r#"{"timeline":{"card_width":-5}}"#).expect("write config");

    folio()
        .args(["layout", "--config", config.to_string_lossy().as_ref(), "-"])
        .write_stdin("[]")
        .assert()
        .code(1);
}

#[test]
fn malformed_feed_exits_with_one() {
    folio()
        .args(["layout", "-"])
        .write_stdin("\"not a feed\"")
        .assert()
        .code(1);
}

#[test]
fn usage_errors_exit_with_two() {
    folio().args(["--bogus"]).assert().code(2);
    folio().args(["layout", "--today", "June"]).assert().code(2);
    folio().args(["simulate", "--frames"]).assert().code(2);
    folio().args(["a.json", "b.json"]).assert().code(2);
}
