use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const ENV_NAMES: [&str; 4] = [
    "CSI_RM_REPORTER",
    "CSI_RM_OUTPUT",
    "CSI_RM_TEMPLATE",
    "CSI_RM_MICROSECONDS",
];

pub const HEADER: &str = r#"{"ts":1700000000000,"type":"header","entry":{"version":"1.2.0"}}"#;

#[must_use]
pub fn metrics_line(ts: u64, url: &str, et: u64, status: u16) -> String {
    format!(
        r#"{{"ts":{},"type":"metrics","entry":{{"method":"GET","protocol":"http","host":"a","port":80,"url":"{}","et":{},"statusCode":{}}}}}"#,
        ts, url, et, status
    )
}

/// A scratch directory holding one log file.
pub struct Workspace {
    dir: TempDir,
    log: PathBuf,
}

impl Workspace {
    /// Writes `lines` to `route-metrics.log` inside a new temp dir.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created.
    pub fn with_log(lines: &[String]) -> Result<Self, String> {
        let dir = tempfile::tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let log = dir.path().join("route-metrics.log");
        let mut content = lines.join("\n");
        content.push('\n');
        fs::write(&log, content).map_err(|err| format!("write log failed: {}", err))?;
        Ok(Self { dir, log })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    #[must_use]
    pub fn log(&self) -> &Path {
        &self.log
    }

    /// Writes a sibling file and returns its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self, name: &str, content: &str) -> Result<PathBuf, String> {
        let path = self.dir.path().join(name);
        fs::write(&path, content).map_err(|err| format!("write {} failed: {}", name, err))?;
        Ok(path)
    }

    /// Runs the binary inside the workspace with a clean `CSI_RM_*`
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    pub fn run<I, S>(&self, args: I, env: &[(&str, &str)]) -> Result<Output, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(route_metrics_bin()?);
        command
            .args(args)
            .current_dir(self.dir.path())
            .env("RUST_LOG", "warn")
            .env_remove("ROUTE_METRICS_LOG");
        for name in ENV_NAMES {
            command.env_remove(name);
        }
        for (name, value) in env {
            command.env(name, value);
        }
        command
            .output()
            .map_err(|err| format!("run route-metrics failed: {}", err))
    }
}

/// Fails with both streams when the process did not exit cleanly.
///
/// # Errors
///
/// Returns an error describing the failed run.
pub fn expect_success(output: &Output) -> Result<(String, String), String> {
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    if !output.status.success() {
        return Err(format!("stdout: {}\nstderr: {}", stdout, stderr));
    }
    Ok((stdout, stderr))
}

fn route_metrics_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_route-metrics").map_or_else(
        || Err("CARGO_BIN_EXE_route-metrics missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}
