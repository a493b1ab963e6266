//! Running `otool` and `install_name_tool`.
//!
//! [`LinkEditor`] is the seam between the orchestration in
//! [`crate::frameworkify`] and the external tools, so the orchestration can be
//! driven by a fake in tests.

use std::ffi::{OsStr, OsString};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::analyze::parse_otool_output;
use crate::error::{Error, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Inspects and rewrites the libraries an executable links against.
pub trait LinkEditor {
    /// Linked library references of `executable`, in load command order.
    fn list_linked_libraries(&self, executable: &Path) -> Result<Vec<String>>;

    /// Change the reference `old` to `new` inside `executable`, in place.
    fn rewrite_linked_library(&self, executable: &Path, old: &str, new: &str) -> Result<()>;
}

/// Which tools to run and how long to wait for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    pub otool: OsString,
    pub install_name_tool: OsString,
    /// `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            otool: "otool".into(),
            install_name_tool: "install_name_tool".into(),
            timeout: None,
        }
    }
}

/// [`LinkEditor`] backed by the Xcode command line tools.
#[derive(Debug, Clone, Default)]
pub struct Cctools {
    config: ToolConfig,
}

impl Cctools {
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }
}

impl LinkEditor for Cctools {
    fn list_linked_libraries(&self, executable: &Path) -> Result<Vec<String>> {
        let failed = |reason: String| Error::InspectionFailed {
            executable: executable.to_path_buf(),
            reason,
        };

        let output = run_tool(
            &self.config.otool,
            &[OsStr::new("-L"), executable.as_os_str()],
            self.config.timeout,
        )
        .map_err(failed)?;

        if !output.status.success() {
            return Err(failed(format!(
                "otool exited with {}: {}",
                output.status,
                output.stderr.trim()
            )));
        }

        let libs = parse_otool_output(&output.stdout);
        debug!("{} links {} libraries", executable.display(), libs.len());
        Ok(libs)
    }

    fn rewrite_linked_library(&self, executable: &Path, old: &str, new: &str) -> Result<()> {
        let failed = |reason: String| Error::PatchFailed {
            executable: executable.to_path_buf(),
            old: old.to_string(),
            new: new.to_string(),
            reason,
        };

        let output = run_tool(
            &self.config.install_name_tool,
            &[
                OsStr::new("-change"),
                OsStr::new(old),
                OsStr::new(new),
                executable.as_os_str(),
            ],
            self.config.timeout,
        )
        .map_err(failed)?;

        if !output.status.success() {
            debug!("install_name_tool failed on {}", executable.display());
            return Err(failed(format!(
                "install_name_tool exited with {}: {}",
                output.status,
                output.stderr.trim()
            )));
        }

        Ok(())
    }
}

/// Captured result of a finished tool.
#[derive(Debug)]
struct ToolOutput {
    status: ExitStatus,
    stdout: String,
    stderr: String,
}

/// Run `program` with `args` and collect its output.
///
/// The error is a human readable reason; callers wrap it in the error for
/// their step.
fn run_tool(
    program: &OsStr,
    args: &[&OsStr],
    timeout: Option<Duration>,
) -> std::result::Result<ToolOutput, String> {
    let name = Path::new(program).display().to_string();
    let exe = resolve_tool(program)?;
    debug!("running {} {:?}", exe.display(), args);

    let mut child = Command::new(&exe)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("failed to run {name}: {e}"))?;

    // Drain both pipes off-thread so a full pipe cannot stall the wait below.
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = wait(&mut child, timeout).map_err(|e| match e.kind() {
        io::ErrorKind::TimedOut => format!("{name} timed out"),
        _ => format!("failed to wait for {name}: {e}"),
    })?;

    Ok(ToolOutput {
        status,
        stdout: collect(stdout),
        stderr: collect(stderr),
    })
}

fn resolve_tool(program: &OsStr) -> std::result::Result<PathBuf, String> {
    which::which(program).map_err(|e| {
        format!(
            "{} not found ({e}): install the Xcode command line tools",
            Path::new(program).display()
        )
    })
}

fn wait(child: &mut Child, timeout: Option<Duration>) -> io::Result<ExitStatus> {
    let Some(timeout) = timeout else {
        return child.wait();
    };

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            child.kill()?;
            child.wait()?;
            return Err(io::Error::new(io::ErrorKind::TimedOut, "deadline exceeded"));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            // A read error just truncates what we report.
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|buf| String::from_utf8_lossy(&buf).into_owned())
        .unwrap_or_default()
}
