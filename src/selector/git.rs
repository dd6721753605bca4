use anyhow::{bail, Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Source of the files currently staged for commit.
pub trait StagedFiles {
    /// Workspace-relative (or absolute) paths of staged files.
    ///
    /// # Errors
    /// Returns an error if the version-control query fails.
    fn staged_files(&self, workspace: &Path) -> Result<Vec<PathBuf>>;
}

/// Queries `git diff --cached` for added, copied and modified files.
#[derive(Debug, Clone)]
pub struct GitStagedFiles {
    timeout: Duration,
}

impl GitStagedFiles {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for GitStagedFiles {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

impl StagedFiles for GitStagedFiles {
    /// Paths come back relative to `workspace`, which may be any directory
    /// inside the repository. Files staged outside it are not reported.
    fn staged_files(&self, workspace: &Path) -> Result<Vec<PathBuf>> {
        let mut child = Command::new("git")
            .args([
                "-c",
                "core.quotepath=false",
                "diff",
                "--cached",
                "--name-only",
                "--relative",
                "--diff-filter=ACM",
            ])
            .current_dir(workspace)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .context("Failed to run git")?;

        let mut stdout = child.stdout.take().context("git stdout was not captured")?;
        let mut stderr = child.stderr.take().context("git stderr was not captured")?;

        // Both pipes are drained concurrently so a chatty stderr cannot stall git
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = String::new();
            let read = stdout.read_to_string(&mut buf).map(|_| buf);
            let _ = tx.send(read);
        });
        let stderr_reader = thread::spawn(move || {
            let mut buf = String::new();
            let _ = stderr.read_to_string(&mut buf);
            buf
        });

        let output = match rx.recv_timeout(self.timeout) {
            Ok(read) => read.context("Failed to read git output")?,
            Err(_) => {
                let _ = child.kill();
                let _ = child.wait();
                bail!("git did not answer within {}s", self.timeout.as_secs());
            }
        };

        let status = child.wait().context("Failed to wait for git")?;
        let stderr = stderr_reader.join().unwrap_or_default();
        if !status.success() {
            bail!("git exited with {}: {}", status, stderr.trim());
        }

        let files = parse_name_list(&output);
        debug!("git reported {} staged files", files.len());
        Ok(files)
    }
}

/// A fixed staged-file list, for callers that already know what is staged
#[derive(Debug, Clone, Default)]
pub struct StaticStagedFiles {
    files: Vec<PathBuf>,
}

impl StaticStagedFiles {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }
}

impl StagedFiles for StaticStagedFiles {
    fn staged_files(&self, _workspace: &Path) -> Result<Vec<PathBuf>> {
        Ok(self.files.clone())
    }
}

/// Newline-separated path list, blank lines dropped
pub fn parse_name_list(output: &str) -> Vec<PathBuf> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}
