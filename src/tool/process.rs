//! External tool execution with timeout, cancellation, and output capture.
//!
//! stdout and stderr are drained on background threads while the process
//! runs, so a chatty tool can never block on a full pipe. The child is
//! killed on timeout, on cancellation, and on every early return.

use crate::cancel::CancellationToken;
use crate::error::CheckError;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How long to wait for the pipes to close after a normal exit.
const EXIT_GRACE: Duration = Duration::from_secs(2);

/// How long to wait for the pipes to close after a kill.
const KILL_GRACE: Duration = Duration::from_millis(200);

/// A fully resolved tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub timeout: Duration,
}

impl ToolCommand {
    /// Build an invocation from a command prefix such as `"pwsh"` or
    /// `"sh -c"` plus trailing arguments.
    ///
    /// The prefix is split with shell-words so quoted program paths work.
    pub fn from_command_line(
        command_line: &str,
        args: Vec<String>,
        working_dir: &Path,
        timeout: Duration,
    ) -> Result<Self, CheckError> {
        let mut words = shell_words::split(command_line).map_err(|e| {
            CheckError::Tool(format!(
                "failed to parse command '{}': {}\n\
                 Fix: check for unmatched quotes or invalid escape sequences.",
                command_line, e
            ))
        })?;

        if words.is_empty() {
            return Err(CheckError::Tool(format!(
                "command is empty after parsing: '{}'",
                command_line
            )));
        }

        let program = words.remove(0);
        words.extend(args);

        Ok(Self {
            program,
            args: words,
            working_dir: working_dir.to_path_buf(),
            timeout,
        })
    }

    /// Shell-quoted rendering, for log lines.
    pub fn display(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(self.program.as_str());
        parts.extend(self.args.iter().map(String::as_str));
        shell_words::join(parts)
    }
}

/// Captured result of a finished (or killed) tool run.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// None if the process was killed or terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub duration: Duration,
    pub timed_out: bool,
}

impl ToolOutput {
    pub fn is_success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}

/// Kills the child on drop unless it has already been reaped.
///
/// On Unix the child leads its own process group, and the whole group is
/// killed so grandchildren (a shell's own children) cannot keep the output
/// pipes open.
struct ChildGuard {
    child: Child,
    reaped: bool,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        Self {
            child,
            reaped: false,
        }
    }

    fn kill(&mut self) {
        #[cfg(unix)]
        kill_group(&self.child);
        // SIGKILL on Unix, TerminateProcess on Windows.
        let _ = self.child.kill();
        let _ = self.child.wait();
        self.reaped = true;
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if !self.reaped {
            self.kill();
        }
    }
}

#[cfg(unix)]
fn kill_group(child: &Child) {
    if let Ok(pid) = libc::pid_t::try_from(child.id()) {
        // SAFETY: kill(2) has no memory-safety preconditions. The child was
        // spawned with process_group(0), so its pid is also its group id.
        unsafe {
            libc::kill(-pid, libc::SIGKILL);
        }
    }
}

/// Run a tool to completion, timeout, or cancellation.
///
/// Returns `Err(CheckError::Cancelled)` if the token trips while the tool is
/// running, and `Err(CheckError::Tool)` if it cannot be launched. A timeout
/// is not an error: the output carries `timed_out = true`.
pub fn run_tool(command: &ToolCommand, cancel: &CancellationToken) -> Result<ToolOutput, CheckError> {
    let start = Instant::now();

    let mut process = Command::new(&command.program);
    process
        .args(&command.args)
        .current_dir(&command.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        process.process_group(0);
    }

    let child = process.spawn().map_err(|e| {
        CheckError::Tool(format!(
            "failed to execute '{}': {}\n\
             Fix: ensure the command is installed and in PATH.",
            command.program, e
        ))
    })?;

    let mut guard = ChildGuard::new(child);
    let stdout = guard.child.stdout.take().map(Drain::spawn);
    let stderr = guard.child.stderr.take().map(Drain::spawn);

    let mut timed_out = false;
    let exit_code = loop {
        match guard.child.try_wait() {
            Ok(Some(status)) => {
                guard.reaped = true;
                break status.code();
            }
            Ok(None) => {
                if cancel.is_cancelled() {
                    guard.kill();
                    return Err(CheckError::Cancelled);
                }
                if start.elapsed() >= command.timeout {
                    guard.kill();
                    timed_out = true;
                    break None;
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                return Err(CheckError::Tool(format!(
                    "failed to check process status: {}",
                    e
                )));
            }
        }
    };

    let grace = if timed_out { KILL_GRACE } else { EXIT_GRACE };
    Ok(ToolOutput {
        exit_code,
        stdout: Drain::collect(stdout, grace),
        stderr: Drain::collect(stderr, grace),
        duration: start.elapsed(),
        timed_out,
    })
}

/// Background reader for one output pipe.
///
/// Bytes are appended to a shared buffer as they arrive, so output read
/// before a kill is kept even if the pipe never reaches EOF.
struct Drain {
    buf: Arc<Mutex<Vec<u8>>>,
    done: Receiver<()>,
}

impl Drain {
    fn spawn<R: Read + Send + 'static>(mut reader: R) -> Self {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&buf);
        let (tx, done) = mpsc::channel();

        std::thread::spawn(move || {
            let mut chunk = [0u8; 8192];
            loop {
                match reader.read(&mut chunk) {
                    Ok(0) => break,
                    Ok(n) => lock(&sink).extend_from_slice(&chunk[..n]),
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(_) => break,
                }
            }
            let _ = tx.send(());
        });

        Self { buf, done }
    }

    /// Wait at most `grace` for EOF, then take whatever has been read.
    fn collect(drain: Option<Self>, grace: Duration) -> Vec<u8> {
        let Some(drain) = drain else {
            return Vec::new();
        };
        let _ = drain.done.recv_timeout(grace);
        std::mem::take(&mut *lock(&drain.buf))
    }
}

fn lock(buf: &Mutex<Vec<u8>>) -> MutexGuard<'_, Vec<u8>> {
    buf.lock().unwrap_or_else(|poison| poison.into_inner())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sh(script: &str, dir: &Path, timeout: Duration) -> ToolCommand {
        ToolCommand::from_command_line("sh -c", vec![script.to_string()], dir, timeout).unwrap()
    }

    #[test]
    fn test_from_command_line_splits_prefix() {
        let temp = TempDir::new().unwrap();
        let cmd = ToolCommand::from_command_line(
            "\"/opt/power shell/pwsh\" -NoProfile",
            vec!["-File".to_string(), "x.ps1".to_string()],
            temp.path(),
            Duration::from_secs(1),
        )
        .unwrap();

        assert_eq!(cmd.program, "/opt/power shell/pwsh");
        assert_eq!(cmd.args, vec!["-NoProfile", "-File", "x.ps1"]);
        assert!(cmd.display().starts_with("'/opt/power shell/pwsh'"));
    }

    #[test]
    fn test_from_command_line_rejects_bad_input() {
        let temp = TempDir::new().unwrap();
        let err = ToolCommand::from_command_line(
            "pwsh \"unmatched",
            Vec::new(),
            temp.path(),
            Duration::from_secs(1),
        )
        .unwrap_err();
        assert!(err.to_string().contains("failed to parse"));

        let err = ToolCommand::from_command_line("   ", Vec::new(), temp.path(), Duration::from_secs(1))
            .unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_captures_both_streams() {
        let temp = TempDir::new().unwrap();
        let cmd = sh("echo out; echo err >&2", temp.path(), Duration::from_secs(10));

        let output = run_tool(&cmd, &CancellationToken::new()).unwrap();

        assert!(output.is_success());
        assert_eq!(String::from_utf8_lossy(&output.stdout), "out\n");
        assert_eq!(String::from_utf8_lossy(&output.stderr), "err\n");
    }

    #[test]
    fn test_runs_in_working_dir() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("marker.txt"), "here").unwrap();
        let cmd = sh("cat marker.txt", temp.path(), Duration::from_secs(10));

        let output = run_tool(&cmd, &CancellationToken::new()).unwrap();
        assert_eq!(String::from_utf8_lossy(&output.stdout), "here");
    }

    #[test]
    fn test_nonzero_exit() {
        let temp = TempDir::new().unwrap();
        let cmd = sh("exit 3", temp.path(), Duration::from_secs(10));

        let output = run_tool(&cmd, &CancellationToken::new()).unwrap();
        assert!(!output.is_success());
        assert_eq!(output.exit_code, Some(3));
        assert!(!output.timed_out);
    }

    #[test]
    fn test_large_output_does_not_deadlock() {
        let temp = TempDir::new().unwrap();
        let cmd = sh(
            "head -c 300000 /dev/zero; head -c 200000 /dev/zero >&2",
            temp.path(),
            Duration::from_secs(30),
        );

        let output = run_tool(&cmd, &CancellationToken::new()).unwrap();
        assert!(output.is_success());
        assert_eq!(output.stdout.len(), 300_000);
        assert_eq!(output.stderr.len(), 200_000);
    }

    #[test]
    fn test_timeout_kills_process() {
        let temp = TempDir::new().unwrap();
        let cmd = ToolCommand::from_command_line(
            "sleep 10",
            Vec::new(),
            temp.path(),
            Duration::from_millis(300),
        )
        .unwrap();

        let start = Instant::now();
        let output = run_tool(&cmd, &CancellationToken::new()).unwrap();

        assert!(output.timed_out);
        assert!(!output.is_success());
        assert_eq!(output.exit_code, None);
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_cancellation_kills_process() {
        let temp = TempDir::new().unwrap();
        let cmd = ToolCommand::from_command_line(
            "sleep 10",
            Vec::new(),
            temp.path(),
            Duration::from_secs(60),
        )
        .unwrap();

        let token = CancellationToken::new();
        let remote = token.clone();
        let canceller = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(200));
            remote.cancel();
        });

        let start = Instant::now();
        let result = run_tool(&cmd, &token);
        canceller.join().unwrap();

        assert!(matches!(result, Err(CheckError::Cancelled)));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_timeout_kills_grandchildren() {
        let temp = TempDir::new().unwrap();
        // Not exec'd: sleep is a child of the shell and shares its pipes.
        let cmd = sh(
            "echo started; sleep 6; echo done",
            temp.path(),
            Duration::from_millis(300),
        );

        let start = Instant::now();
        let output = run_tool(&cmd, &CancellationToken::new()).unwrap();

        assert!(output.timed_out);
        assert!(start.elapsed() < Duration::from_secs(3));
        assert_eq!(String::from_utf8_lossy(&output.stdout), "started\n");
    }

    #[test]
    fn test_cancellation_kills_grandchildren() {
        let temp = TempDir::new().unwrap();
        let cmd = sh("sleep 6; echo done", temp.path(), Duration::from_secs(60));

        let token = CancellationToken::new();
        let remote = token.clone();
        let canceller = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(200));
            remote.cancel();
        });

        let start = Instant::now();
        let result = run_tool(&cmd, &token);
        canceller.join().unwrap();

        assert!(matches!(result, Err(CheckError::Cancelled)));
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn test_nonexistent_program() {
        let temp = TempDir::new().unwrap();
        let cmd = ToolCommand::from_command_line(
            "nonexistent_command_xyz_123",
            Vec::new(),
            temp.path(),
            Duration::from_secs(1),
        )
        .unwrap();

        let err = run_tool(&cmd, &CancellationToken::new()).unwrap_err();
        assert!(matches!(err, CheckError::Tool(_)));
        assert!(err.to_string().contains("failed to execute"));
    }
}
