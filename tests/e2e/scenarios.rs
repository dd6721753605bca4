use super::helpers::{stderr, stdout, TestProject};

const GPL_GRANT: &str = "# This program is free software: you can redistribute it and/or modify\n\
# it under the terms of the GNU General Public License as published by\n\
# the Free Software Foundation, either version 3 of the License.\n";

#[test]
fn test_applied_gpl_blocks_scan() {
    let project = TestProject::new();
    project.write("src/vendored.py", GPL_GRANT);

    let output = project.run(&["scan"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("build blocked"));

    let snapshot = project.snapshot();
    let findings = snapshot["findings"].as_array().unwrap();
    let errors: Vec<_> = findings.iter().filter(|f| f["severity"] == "error").collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["rule_id"], "blocked-license/GPL");
    assert_eq!(snapshot["summary"]["overall_status"], "blocked");
}

#[test]
fn test_bare_mention_does_not_block() {
    let project = TestProject::new();
    project.write("src/notes.js", "// comparable to GPL in spirit\n");

    let output = project.run(&["scan"]);

    assert_eq!(output.status.code(), Some(0));
    let snapshot = project.snapshot();
    assert_eq!(snapshot["summary"]["error_count"], 0);
    assert_eq!(snapshot["summary"]["overall_status"], "ok");
}

#[test]
fn test_bare_mention_warns_when_configured() {
    let project = TestProject::new();
    project.write("src/notes.js", "// SPDX-License-Identifier: MIT\n// comparable to GPL in spirit\n");
    project.write(".license-gate.toml", "[catalog]\nbare_mention = \"warn\"\n");

    let output = project.run(&["scan"]);

    assert_eq!(output.status.code(), Some(0));
    let snapshot = project.snapshot();
    assert_eq!(snapshot["summary"]["warning_count"], 1);
    assert_eq!(snapshot["summary"]["error_count"], 0);
}

#[test]
fn test_blocked_dependency_in_manifest() {
    let project = TestProject::new();
    project.write("requirements.txt", "requests==2.31.0\nsomegplpkg>=1.0\n");
    project.write(".license-gate.toml", "[packages]\nsomegplpkg = \"GPL\"\n");

    let output = project.run(&["scan"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("somegplpkg"));

    let snapshot = project.snapshot();
    let requirements = &snapshot["requirements_check"];
    assert_eq!(requirements["has_blocked_packages"], true);
    assert_eq!(requirements["status"], "blocked");

    let packages = requirements["manifests"][0]["packages"].as_array().unwrap();
    let blocked: Vec<_> = packages.iter().filter(|p| p["status"] == "blocked").collect();
    assert_eq!(blocked.len(), 1);
    assert_eq!(blocked[0]["package"], "somegplpkg");
    assert_eq!(snapshot["summary"]["overall_status"], "blocked");
}

#[test]
fn test_empty_workspace() {
    let project = TestProject::new();

    let output = project.run(&["scan"]);

    assert_eq!(output.status.code(), Some(0));
    let snapshot = project.snapshot();
    assert_eq!(snapshot["summary"]["total_files"], 0);
    assert_eq!(snapshot["summary"]["compliance_rate"], 0.0);
    assert_eq!(snapshot["summary"]["overall_status"], "ok");
    assert!(snapshot["requirements_check"].is_null());
}

#[test]
fn test_injected_staged_files_limit_the_scan() {
    let project = TestProject::new();
    project.write("src/clean.py", "# SPDX-License-Identifier: MIT\nprint('ok')\n");
    project.write("src/vendored.py", GPL_GRANT);

    let output = project.run(&["scan", "--staged-files", "src/clean.py"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("commit allowed"));

    let snapshot = project.snapshot();
    assert_eq!(snapshot["mode"], "staged");
    assert_eq!(snapshot["summary"]["total_files"], 1);
    assert_eq!(snapshot["files_checked"][0]["file"], "src/clean.py");
}

#[test]
fn test_injected_staged_violation_blocks_commit() {
    let project = TestProject::new();
    project.write("src/vendored.py", GPL_GRANT);

    let output = project.run(&["scan", "--staged-files", "src/vendored.py"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("commit blocked"));
}

#[test]
fn test_staged_only_outside_git_checks_nothing() {
    let project = TestProject::new();
    project.write("src/vendored.py", GPL_GRANT);

    let output = project.run(&["scan", "--staged-only"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("no files were checked"));

    let snapshot = project.snapshot();
    assert_eq!(snapshot["summary"]["total_files"], 0);
    assert_eq!(snapshot["warnings"].as_array().unwrap().len(), 1);
}

#[test]
fn test_staged_only_in_repository_subdirectory() {
    let project = TestProject::new();
    project.write("app/src/model.py", "# SPDX-License-Identifier: MIT\n# Weights are not for commercial use.\n");
    project.git(&["init", "-q"]);
    project.git(&["add", "app/src/model.py"]);

    let output = project.run(&["scan", "--staged-only", "--workspace", "app"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("commit blocked"));
}

#[test]
fn test_rule_definitions_are_not_flagged() {
    let project = TestProject::new();
    project.write("tools/builtin_rules.rs", GPL_GRANT);
    project.write("scripts/license_checker.py", GPL_GRANT);

    let output = project.run(&["scan"]);

    assert_eq!(output.status.code(), Some(0));
    let snapshot = project.snapshot();
    assert_eq!(snapshot["summary"]["error_count"], 0);
}

#[test]
fn test_marker_comment_cannot_hide_restriction() {
    let project = TestProject::new();
    project.write(
        "src/model.py",
        "# SPDX-License-Identifier: MIT\n# license-gate:rules\n# Weights are not for commercial use.\n",
    );

    let output = project.run(&["scan"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("commercial-restriction"));
}

#[test]
fn test_commercial_restriction_blocks() {
    let project = TestProject::new();
    project.write("src/model.py", "# SPDX-License-Identifier: MIT\n# Weights are not for commercial use.\n");

    let output = project.run(&["scan"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("commercial-restriction"));
}

#[test]
fn test_json_format_and_no_snapshot() {
    let project = TestProject::new();
    project.write("app.py", "# SPDX-License-Identifier: Apache-2.0\n");

    let output = project.run(&["scan", "--format", "json", "--no-snapshot"]);

    assert_eq!(output.status.code(), Some(0));
    let result: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(result["summary"]["compliance_rate"], 100.0);
    assert!(!project.path().join("license_scan_results.json").exists());
}

#[test]
fn test_quiet_reports_violations_on_stderr() {
    let project = TestProject::new();
    project.write("src/vendored.py", GPL_GRANT);

    let output = project.run(&["--quiet", "scan", "--no-snapshot"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("1 license violation(s) found"));
}

#[test]
fn test_init_then_scan_ignores_generated_policy() {
    let project = TestProject::new();

    let init = project.run(&["init"]);
    assert!(init.status.success());
    assert!(project.path().join(".license-gate.toml").exists());

    let again = project.run(&["init"]);
    assert_eq!(again.status.code(), Some(2));
    assert!(stderr(&again).contains("--force"));

    let scan = project.run(&["scan"]);
    assert_eq!(scan.status.code(), Some(0));
}

#[test]
fn test_config_validate_rejects_bad_pattern() {
    let project = TestProject::new();
    project.write(
        ".license-gate.toml",
        "[[catalog.blocked_rules]]\nid = \"BROKEN\"\npattern = \"(unclosed\"\ncategory = \"blocked\"\n",
    );

    let output = project.run(&["config", "--validate"]);
    assert_eq!(output.status.code(), Some(2));

    let scan = project.run(&["scan"]);
    assert_eq!(scan.status.code(), Some(2));
}

#[test]
fn test_config_show_prints_effective_policy() {
    let project = TestProject::new();

    let output = project.run(&["config", "--show"]);

    assert!(output.status.success());
    let config: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(config["snapshot_file"], "license_scan_results.json");
    assert!(config["catalog"]["blocked_rules"].as_array().unwrap().len() >= 5);
}
