//! Read-only validation report for a scenario directory.
//!
//! Checks run in a fixed order and stop at the first structural failure
//! (missing, empty, or unparsable manifest); per-step checks all run so one
//! report lists every missing file.
use super::error::StepError;
use super::layout::read_layout;
use super::manifest::Manifest;
use super::paths::ScenarioPaths;
use super::renumber::check_alignment;
use serde::Serialize;
use serde_json::Value;
use std::fs;

const CHECK_WIDTH: usize = 50;

/// Outcome of one named check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub check: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckResult {
    fn pass(check: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            ok: true,
            message: None,
        }
    }

    fn fail(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            ok: false,
            message: Some(message.into()),
        }
    }
}

/// Per-check results plus the overall status.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub location: String,
    pub passed: bool,
    pub checks: Vec<CheckResult>,
}

impl ValidationReport {
    fn finish(paths: &ScenarioPaths, checks: Vec<CheckResult>) -> Self {
        Self {
            location: paths.root().display().to_string(),
            passed: checks.iter().all(|check| check.ok),
            checks,
        }
    }

    /// Human-readable rendering, one line per check.
    pub fn render_text(&self) -> String {
        let mut out = String::from("\n=== Scenario Validation ===\n");
        for check in &self.checks {
            let symbol = if check.ok { "[+]" } else { "[-]" };
            let result = if check.ok { "ok" } else { "failed" };
            match &check.message {
                Some(message) => out.push_str(&format!(
                    "{symbol}{:<CHECK_WIDTH$} {result} - {message}\n",
                    check.check
                )),
                None => out.push_str(&format!("{symbol}{:<CHECK_WIDTH$} {result}\n", check.check)),
            }
        }
        let status = if self.passed { "PASSED" } else { "FAILED" };
        out.push_str(&format!("\nValidation Status: {status}\n"));
        out.push_str(&format!("Location: {}\n", self.location));
        out
    }
}

/// Validate the scenario rooted at `paths` without modifying it.
pub fn validate_scenario(paths: &ScenarioPaths) -> Result<ValidationReport, StepError> {
    let mut checks = Vec::new();
    let index_path = paths.index_path();

    if !index_path.exists() {
        let mut entries = fs::read_dir(paths.root()).map_err(|err| StepError::io(paths.root(), err))?;
        if entries.next().is_none() {
            checks.push(CheckResult::pass("empty-directory"));
        } else {
            checks.push(CheckResult::fail("index.json", "File not found"));
        }
        return Ok(ValidationReport::finish(paths, checks));
    }

    let text = match fs::read_to_string(&index_path) {
        Ok(text) => text,
        Err(err) => {
            checks.push(CheckResult::fail("index.json", err.to_string()));
            return Ok(ValidationReport::finish(paths, checks));
        }
    };
    if text.trim().is_empty() {
        checks.push(CheckResult::fail("index.json", "Empty file"));
        return Ok(ValidationReport::finish(paths, checks));
    }
    let value: Value = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(err) => {
            checks.push(CheckResult::fail("json-syntax", format!("Invalid JSON: {err}")));
            return Ok(ValidationReport::finish(paths, checks));
        }
    };
    checks.push(CheckResult::pass("json-syntax"));

    let manifest = match Manifest::from_value(&index_path, value) {
        Ok(manifest) => manifest,
        Err(StepError::ManifestFormat { reason, .. }) => {
            checks.push(CheckResult::fail("steps-structure", reason));
            return Ok(ValidationReport::finish(paths, checks));
        }
        Err(err) => return Err(err),
    };
    checks.push(CheckResult::pass("steps-structure"));

    for (idx, record) in manifest.steps().iter().enumerate() {
        let missing: Vec<&str> = record
            .referenced_paths()
            .into_iter()
            .filter(|rel| !paths.resolve(rel).is_file())
            .collect();
        let name = format!("step-{}", idx + 1);
        if missing.is_empty() {
            checks.push(CheckResult::pass(name));
        } else {
            checks.push(CheckResult::fail(name, format!("Missing {}", missing.join(", "))));
        }
    }

    match read_layout(paths.root()).and_then(|layout| check_alignment(&layout, &manifest)) {
        Ok(()) => checks.push(CheckResult::pass("layout")),
        Err(StepError::Layout { issue }) => {
            checks.push(CheckResult::fail("layout", issue.to_string()))
        }
        Err(err) => return Err(err),
    }

    let report = ValidationReport::finish(paths, checks);
    tracing::debug!(passed = report.passed, checks = report.checks.len(), "validated scenario");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write_file(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directory");
        }
        fs::write(path, contents).expect("write file");
    }

    fn validate(root: &Path) -> ValidationReport {
        validate_scenario(&ScenarioPaths::new(root.to_path_buf())).expect("validate")
    }

    fn failed_checks(report: &ValidationReport) -> Vec<(String, String)> {
        report
            .checks
            .iter()
            .filter(|check| !check.ok)
            .map(|check| (check.check.clone(), check.message.clone().unwrap_or_default()))
            .collect()
    }

    #[test]
    fn empty_directory_passes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let report = validate(dir.path());
        assert!(report.passed);
        assert_eq!(report.checks, vec![CheckResult::pass("empty-directory")]);
    }

    #[test]
    fn missing_index_fails_when_directory_has_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(dir.path(), "step1.md", "# 1\n");
        let report = validate(dir.path());
        assert!(!report.passed);
        assert_eq!(
            failed_checks(&report),
            vec![("index.json".to_string(), "File not found".to_string())]
        );
    }

    #[test]
    fn invalid_json_stops_validation() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(dir.path(), "index.json", "{ nope");
        let report = validate(dir.path());
        assert!(!report.passed);
        assert_eq!(report.checks.len(), 1);
        assert_eq!(report.checks[0].check, "json-syntax");
    }

    #[test]
    fn missing_steps_key_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(dir.path(), "index.json", r#"{"details": {}}"#);
        let report = validate(dir.path());
        assert_eq!(
            failed_checks(&report),
            vec![("steps-structure".to_string(), "missing `steps` key".to_string())]
        );
    }

    #[test]
    fn valid_scenario_passes_every_check() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(dir.path(), "step1.md", "# 1\n");
        write_file(dir.path(), "step2/step2.md", "# 2\n");
        write_file(dir.path(), "step2/verify.sh", "exit 0\n");
        write_file(
            dir.path(),
            "index.json",
            r#"{"details": {"steps": [
                {"title": "One", "text": "step1.md"},
                {"title": "Two", "text": "step2/step2.md", "verify": "step2/verify.sh"}
            ]}}"#,
        );
        let report = validate(dir.path());
        assert!(report.passed, "{}", report.render_text());
        let names: Vec<&str> = report.checks.iter().map(|c| c.check.as_str()).collect();
        assert_eq!(
            names,
            vec!["json-syntax", "steps-structure", "step-1", "step-2", "layout"]
        );
        assert!(report.render_text().contains("Validation Status: PASSED"));
    }

    #[test]
    fn reports_missing_files_and_layout_problems() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(dir.path(), "step1.md", "# 1\n");
        write_file(dir.path(), "step3.md", "# 3\n");
        write_file(
            dir.path(),
            "index.json",
            r#"{"steps": [
                {"title": "One", "text": "step1.md", "background": "step1/background.sh"},
                {"title": "Two", "text": "step2.md"}
            ]}"#,
        );
        let report = validate(dir.path());
        assert!(!report.passed);
        assert_eq!(
            failed_checks(&report),
            vec![
                ("step-1".to_string(), "Missing step1/background.sh".to_string()),
                ("step-2".to_string(), "Missing step2.md".to_string()),
                (
                    "layout".to_string(),
                    "step ordinals are not contiguous: expected step2, found step3".to_string()
                ),
            ]
        );
        let text = report.render_text();
        assert!(text.contains("[-]step-2"));
        assert!(text.contains("failed - Missing step2.md"));
        assert!(text.contains("Validation Status: FAILED"));
    }

    #[test]
    fn swapped_manifest_records_fail_the_layout_check() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(dir.path(), "step1.md", "# A\n");
        write_file(dir.path(), "step2.md", "# B\n");
        write_file(
            dir.path(),
            "index.json",
            r#"{"steps": [
                {"title": "B", "text": "step2.md"},
                {"title": "A", "text": "step1.md"}
            ]}"#,
        );
        let report = validate(dir.path());
        assert_eq!(
            failed_checks(&report),
            vec![(
                "layout".to_string(),
                "manifest step 1 points at step2.md but the layout has step1.md".to_string()
            )]
        );
    }
}
