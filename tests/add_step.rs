mod common;

use common::{stderr, stdout, ScenarioFixture};
use serde_json::json;

#[test]
fn inserting_in_the_middle_renumbers_later_steps() {
    let fixture = ScenarioFixture::two_steps();
    let output = fixture.run(&["add", "--title", "New Step", "--at", "2"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_eq!(fixture.read("step1.md"), "# Step 1\n");
    assert_eq!(fixture.read("step2/step2.md"), "# New Step\n");
    assert_eq!(fixture.read("step3/step3.md"), "# Step 2\n");
    assert!(fixture.path("step2/background.sh").is_file());
    assert!(fixture.path("step2/foreground.sh").is_file());
    assert!(!fixture.path("step3/step2.md").exists());

    let manifest = fixture.manifest();
    assert_eq!(
        manifest["steps"],
        json!([
            {"title": "Step 1", "text": "step1.md"},
            {
                "title": "New Step",
                "text": "step2/step2.md",
                "background": "step2/background.sh",
                "foreground": "step2/foreground.sh"
            },
            {"title": "Step 2", "text": "step3/step3.md"}
        ])
    );

    let out = stdout(&output);
    assert!(out.contains("moved step2 -> step3"), "stdout: {out}");
    assert!(out.contains("--- Before changes"), "stdout: {out}");
}

#[test]
fn appending_leaves_existing_steps_in_place() {
    let fixture = ScenarioFixture::two_steps();
    let output = fixture.run(&["add", "--title", "Check", "--at", "3", "--kind", "verify"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_eq!(fixture.read("step1.md"), "# Step 1\n");
    assert_eq!(fixture.read("step2/step2.md"), "# Step 2\n");
    assert_eq!(fixture.read("step3/step3.md"), "# Check\n");
    assert!(fixture.path("step3/verify.sh").is_file());
    assert!(!fixture.path("step3/background.sh").exists());
    assert_eq!(
        fixture.manifest()["steps"][2],
        json!({"title": "Check", "text": "step3/step3.md", "verify": "step3/verify.sh"})
    );
}

#[test]
fn invalid_positions_change_nothing() {
    let fixture = ScenarioFixture::two_steps();
    let before = fixture.snapshot();
    for at in ["0", "4"] {
        let output = fixture.run(&["add", "--title", "x", "--at", at]);
        assert!(!output.status.success());
        assert!(
            stderr(&output).contains("invalid position"),
            "stderr: {}",
            stderr(&output)
        );
    }
    assert_eq!(fixture.snapshot(), before);
}

#[test]
fn manifest_without_steps_is_rejected_without_changes() {
    let fixture = ScenarioFixture::empty();
    fixture.write("step1.md", "# Step 1\n");
    fixture.write("index.json", "{\"title\": \"no steps here\"}\n");
    let before = fixture.snapshot();

    let output = fixture.run(&["add", "--title", "x", "--at", "1"]);
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("missing `steps` key"),
        "stderr: {}",
        stderr(&output)
    );
    assert_eq!(fixture.snapshot(), before);
}

#[test]
fn blank_titles_are_rejected() {
    let fixture = ScenarioFixture::two_steps();
    let before = fixture.snapshot();
    let output = fixture.run(&["add", "--title", "   ", "--at", "1"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("must not be blank"));
    assert_eq!(fixture.snapshot(), before);
}

#[test]
fn dry_run_previews_without_writing() {
    let fixture = ScenarioFixture::two_steps();
    let before = fixture.snapshot();
    let output = fixture.run(&["add", "--title", "New Step", "--at", "1", "--dry-run", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(fixture.snapshot(), before);

    let report: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("dry run json");
    assert_eq!(report["dry_run"], true);
    assert_eq!(report["ordinals"], json!([1, 2, 3]));
    let moves: Vec<(String, String)> = report["plan"]["moves"]
        .as_array()
        .expect("moves")
        .iter()
        .map(|mv| {
            (
                mv["from_path"].as_str().expect("from").to_string(),
                mv["to_path"].as_str().expect("to").to_string(),
            )
        })
        .collect();
    assert_eq!(
        moves,
        vec![
            ("step2".to_string(), "step3".to_string()),
            ("step1.md".to_string(), "step2.md".to_string()),
        ]
    );
    assert!(report["tree_diff"]
        .as_str()
        .expect("diff")
        .contains("+step3/"));
}

#[test]
fn plan_prints_json_and_never_writes() {
    let fixture = ScenarioFixture::two_steps();
    let before = fixture.snapshot();
    let output = fixture.run(&["plan", "--title", "Later", "--at", "2", "--kind", "v"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(fixture.snapshot(), before);

    let plan: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("plan json");
    assert_eq!(plan["new_step"]["ordinal"], 2);
    assert_eq!(plan["new_step"]["kind"], "verify");
    assert_eq!(plan["manifest"]["steps"][2]["text"], "step3/step3.md");
}

#[test]
fn platform_manifest_keeps_its_other_keys() {
    let fixture = ScenarioFixture::empty();
    fixture.write("step1/step1.md", "# One\n");
    fixture.write("step1/background.sh", "echo one\n");
    fixture.write(
        "index.json",
        r#"{
  "title": "Demo",
  "details": {
    "intro": {"text": "intro.md"},
    "steps": [{"title": "One", "text": "step1/step1.md", "background": "step1/background.sh"}]
  },
  "backend": {"imageid": "ubuntu"}
}
"#,
    );
    let output = fixture.run(&["add", "--title", "Zero", "--at", "1"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let manifest = fixture.manifest();
    assert!(manifest.get("steps").is_none());
    assert_eq!(manifest["title"], "Demo");
    assert_eq!(manifest["backend"]["imageid"], "ubuntu");
    assert_eq!(manifest["details"]["intro"]["text"], "intro.md");
    assert_eq!(manifest["details"]["steps"][0]["title"], "Zero");
    assert_eq!(
        manifest["details"]["steps"][1],
        json!({"title": "One", "text": "step2/step2.md", "background": "step2/background.sh"})
    );
    assert_eq!(fixture.read("step2/background.sh"), "echo one\n");
}

#[test]
fn manifest_out_of_step_with_the_layout_is_rejected() {
    let fixture = ScenarioFixture::empty();
    fixture.write("step1.md", "# content of A\n");
    fixture.write("step2.md", "# content of B\n");
    fixture.write(
        "index.json",
        r#"{"steps": [{"title": "B", "text": "step2.md"}, {"title": "A", "text": "step1.md"}]}"#,
    );
    let before = fixture.snapshot();

    let output = fixture.run(&["add", "--title", "C", "--at", "3"]);
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("manifest step 1 points at step2.md"),
        "stderr: {}",
        stderr(&output)
    );
    assert_eq!(fixture.snapshot(), before);
}

#[test]
fn inserting_first_shifts_every_step_with_its_scripts() {
    let fixture = ScenarioFixture::empty();
    fixture.write("step1/step1.md", "# one\n");
    fixture.write("step1/verify.sh", "test -f /tmp/one\n");
    fixture.write("step2.md", "# two\n");
    fixture.write("step3/step3.md", "# three\n");
    fixture.write("step3/background.sh", "touch /tmp/three\n");
    fixture.write("step4.md", "# four\n");
    fixture.write(
        "index.json",
        r#"{"steps": [
  {"title": "One", "text": "step1/step1.md", "verify": "step1/verify.sh"},
  {"title": "Two", "text": "step2.md"},
  {"title": "Three", "text": "step3/step3.md", "background": "step3/background.sh"},
  {"title": "Four", "text": "step4.md"}
]}
"#,
    );

    let output = fixture.run(&["add", "--title", "Zero", "--at", "1"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_eq!(fixture.read("step1/step1.md"), "# Zero\n");
    assert_eq!(fixture.read("step2/step2.md"), "# one\n");
    assert_eq!(fixture.read("step2/verify.sh"), "test -f /tmp/one\n");
    assert_eq!(fixture.read("step3.md"), "# two\n");
    assert_eq!(fixture.read("step4/step4.md"), "# three\n");
    assert_eq!(fixture.read("step4/background.sh"), "touch /tmp/three\n");
    assert_eq!(fixture.read("step5.md"), "# four\n");

    let manifest = fixture.manifest();
    let steps = manifest["steps"].as_array().expect("steps");
    let titles: Vec<&str> = steps
        .iter()
        .map(|step| step["title"].as_str().expect("title"))
        .collect();
    assert_eq!(titles, vec!["Zero", "One", "Two", "Three", "Four"]);
    for step in steps {
        for key in ["text", "background", "foreground", "verify"] {
            if let Some(rel) = step.get(key).and_then(|value| value.as_str()) {
                assert!(fixture.path(rel).is_file(), "{rel} should exist");
            }
        }
    }

    let output = fixture.run(&["validate"]);
    assert!(output.status.success(), "stdout: {}", stdout(&output));
}
