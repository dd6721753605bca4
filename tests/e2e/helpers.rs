use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

pub struct TestProject {
    pub dir: TempDir,
    pub binary_path: String,
}

impl TestProject {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let binary_path = env!("CARGO_BIN_EXE_license-gate").to_string();

        Self { dir, binary_path }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(path, content).expect("Failed to write fixture");
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(&self.binary_path)
            .args(args)
            .current_dir(self.dir.path())
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to run license-gate")
    }

    pub fn git(&self, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(self.dir.path())
            .status()
            .expect("Failed to run git");
        assert!(status.success(), "git {:?} failed", args);
    }

    pub fn snapshot(&self) -> serde_json::Value {
        let content = fs::read_to_string(self.dir.path().join("license_scan_results.json"))
            .expect("Snapshot was not written");
        serde_json::from_str(&content).expect("Snapshot is not valid JSON")
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
