//! Deadline-bound plugin execution.
//!
//! Stdout and stderr share one pipe so the combined output keeps the order in
//! which the plugin wrote it. The pipe is drained while the child runs, so a
//! chatty plugin can't fill it and stall.

use std::ffi::OsStr;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, trace, warn};

/// Exit code reported for a plugin killed by the deadline or a signal.
pub const KILLED_EXIT_CODE: i32 = -1;

/// Default cap on captured output.
pub const DEFAULT_MAX_OUTPUT: usize = 1024 * 1024;

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const CHUNK_SIZE: usize = 8192;

/// Point in time after which a probe must stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now() + timeout,
        }
    }

    /// Deadline at a fixed instant.
    pub fn at(at: Instant) -> Self {
        Self { at }
    }

    /// Time left; zero once expired.
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    pub fn instant(&self) -> Instant {
        self.at
    }
}

/// Errors starting or supervising the plugin process.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to start {path}: {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create output pipe: {0}")]
    Pipe(#[source] std::io::Error),

    #[error("failed to wait for plugin: {0}")]
    Wait(#[source] std::io::Error),
}

/// Captured result of one plugin run.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    /// Combined stdout and stderr, lossily decoded.
    pub output: String,
    /// Exit code, or [`KILLED_EXIT_CODE`].
    pub exit_code: i32,
    pub timed_out: bool,
    /// Output exceeded the cap and was cut.
    pub truncated: bool,
    pub duration: Duration,
}

/// Proxy variables handed to a plugin when a proxy is configured.
pub fn proxy_env_vars(proxy: &str) -> Vec<(&'static str, String)> {
    vec![
        ("HTTPS_PROXY", proxy.to_string()),
        ("HTTP_PROXY", proxy.to_string()),
        ("https_proxy", proxy.to_string()),
        ("http_proxy", proxy.to_string()),
        ("USE_PROXY", "yes".to_string()),
        ("use_proxy", "yes".to_string()),
    ]
}

/// Runs plugin binaries.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    max_output: usize,
}

impl Default for ProcessExecutor {
    fn default() -> Self {
        Self {
            max_output: DEFAULT_MAX_OUTPUT,
        }
    }
}

impl ProcessExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output cap in bytes.
    pub fn with_max_output(mut self, max_output: usize) -> Self {
        self.max_output = max_output;
        self
    }

    pub fn max_output(&self) -> usize {
        self.max_output
    }

    /// Run `path` with `args` until it exits or `deadline` passes.
    ///
    /// The parent environment is inherited; `proxy` adds the proxy variables.
    pub fn run<S: AsRef<OsStr>>(
        &self,
        path: &Path,
        args: &[S],
        proxy: Option<&str>,
        deadline: Deadline,
    ) -> Result<ExecOutput, ExecError> {
        let started = Instant::now();
        let (mut reader, writer) = std::io::pipe().map_err(ExecError::Pipe)?;
        let writer_err = writer.try_clone().map_err(ExecError::Pipe)?;

        let mut command = Command::new(path);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(writer)
            .stderr(writer_err);
        if let Some(proxy) = proxy {
            command.envs(proxy_env_vars(proxy));
        }

        let mut child = command.spawn().map_err(|source| ExecError::Spawn {
            path: path.display().to_string(),
            source,
        })?;
        // The command holds the parent's copies of the write ends; without
        // dropping them the pipe never reports end of file.
        drop(command);
        trace!(pid = child.id(), "plugin started");

        let mut buf = Vec::with_capacity(self.max_output.min(65536));
        let mut truncated = false;
        let (exit_code, timed_out) =
            self.supervise(&mut child, &mut reader, &mut buf, &mut truncated, deadline)?;

        if truncated {
            warn!(max_output = self.max_output, "plugin output truncated");
        }

        Ok(ExecOutput {
            output: String::from_utf8_lossy(&buf).into_owned(),
            exit_code,
            timed_out,
            truncated,
            duration: started.elapsed(),
        })
    }

    #[cfg(unix)]
    fn supervise(
        &self,
        child: &mut Child,
        reader: &mut std::io::PipeReader,
        buf: &mut Vec<u8>,
        truncated: &mut bool,
        deadline: Deadline,
    ) -> Result<(i32, bool), ExecError> {
        let mut chunk = vec![0u8; CHUNK_SIZE];

        loop {
            if deadline.is_expired() {
                warn!(pid = child.id(), "plugin exceeded deadline, killing");
                let _ = child.kill();
                let _ = child.wait();
                self.drain(reader, buf, truncated, &mut chunk);
                return Ok((KILLED_EXIT_CODE, true));
            }

            let did_read = match try_read_nonblocking(reader, &mut chunk) {
                Ok(n) if n > 0 => {
                    self.append(buf, &chunk[..n], truncated);
                    true
                }
                // Read errors are not fatal; whatever arrived is kept.
                _ => false,
            };

            match child.try_wait() {
                Ok(Some(status)) => {
                    self.drain(reader, buf, truncated, &mut chunk);
                    let exit_code = status.code().unwrap_or(KILLED_EXIT_CODE);
                    debug!(exit_code, "plugin exited");
                    return Ok((exit_code, false));
                }
                Ok(None) => {
                    if !did_read {
                        thread::sleep(POLL_INTERVAL);
                    }
                }
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ExecError::Wait(e));
                }
            }
        }
    }

    /// Blocking fallback: read to end of file, then collect the status.
    ///
    /// The deadline is only checked after the plugin closes its output.
    #[cfg(not(unix))]
    fn supervise(
        &self,
        child: &mut Child,
        reader: &mut std::io::PipeReader,
        buf: &mut Vec<u8>,
        truncated: &mut bool,
        deadline: Deadline,
    ) -> Result<(i32, bool), ExecError> {
        let mut raw = Vec::new();
        let _ = reader.read_to_end(&mut raw);
        self.append(buf, &raw, truncated);

        if deadline.is_expired() {
            let _ = child.kill();
            let _ = child.wait();
            return Ok((KILLED_EXIT_CODE, true));
        }
        let status = child.wait().map_err(ExecError::Wait)?;
        Ok((status.code().unwrap_or(KILLED_EXIT_CODE), false))
    }

    /// Read whatever is immediately available after the child is gone.
    ///
    /// Non-blocking so an orphaned grandchild holding the pipe can't hang us.
    #[cfg(unix)]
    fn drain(
        &self,
        reader: &mut std::io::PipeReader,
        buf: &mut Vec<u8>,
        truncated: &mut bool,
        chunk: &mut [u8],
    ) {
        while !*truncated {
            match try_read_nonblocking(reader, chunk) {
                Ok(0) | Err(_) => break,
                Ok(n) => self.append(buf, &chunk[..n], truncated),
            }
        }
    }

    fn append(&self, buf: &mut Vec<u8>, data: &[u8], truncated: &mut bool) {
        let space = self.max_output.saturating_sub(buf.len());
        let to_copy = data.len().min(space);
        buf.extend_from_slice(&data[..to_copy]);
        if data.len() > space {
            *truncated = true;
        }
    }
}

/// Read without blocking; `Ok(0)` means nothing is available right now.
#[cfg(unix)]
fn try_read_nonblocking<R: Read + std::os::unix::io::AsRawFd>(
    stream: &mut R,
    buf: &mut [u8],
) -> std::io::Result<usize> {
    let fd = stream.as_raw_fd();

    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(std::io::Error::last_os_error());
    }
    if flags & libc::O_NONBLOCK == 0 {
        let result = unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) };
        if result < 0 {
            return Err(std::io::Error::last_os_error());
        }
    }

    match stream.read(buf) {
        Ok(n) => Ok(n),
        Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(0),
        Err(e) => Err(e),
    }
}
