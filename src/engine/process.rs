//! External engine process.
//!
//! Runs `<command> <args..> <program>` and reads a JSON report of the
//! program's named collections from stdout (see `value.rs` for the shape).
//!
//! Emitted enumeration loops have no internal bound, so the only guard
//! against a runaway search is the wall-clock limit enforced here: the child
//! is polled until it exits or the deadline passes, at which point it is
//! killed. Stdout and stderr are drained on helper threads so a chatty engine
//! cannot block on a full pipe while we wait. The same deadline bounds the
//! wait for those pipes to close, so a background process left holding them
//! open still ends in a timeout.

use super::Engine;
use super::value::EngineOutput;
use crate::config::EngineSettings;
use crate::error::EngineError;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEngine {
    command: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl ProcessEngine {
    pub fn new(command: impl Into<PathBuf>, timeout: Duration) -> Self {
        ProcessEngine { command: command.into(), args: Vec::new(), timeout }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn from_settings(settings: &EngineSettings) -> Result<Self, EngineError> {
        let command = settings.command.clone().ok_or(EngineError::NotConfigured)?;
        Ok(ProcessEngine { command, args: settings.args.clone(), timeout: settings.timeout() })
    }

    fn spawn(&self, program: &Path) -> Result<Child, EngineError> {
        Command::new(&self.command)
            .args(&self.args)
            .arg(program)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| EngineError::Spawn { command: self.command.display().to_string(), source })
    }

    fn wait(&self, child: &mut Child, deadline: Instant) -> Result<ExitStatus, EngineError> {
        loop {
            if let Some(status) = child.try_wait().map_err(EngineError::Wait)? {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                warn!(command = %self.command.display(), timeout = ?self.timeout, "engine timed out, killing it");
                // The child may have exited between the poll and the kill.
                let _ = child.kill();
                let _ = child.wait();
                return Err(EngineError::Timeout(self.timeout));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Wait for a drained pipe until `deadline`. The pipe closes when every
    /// process holding it has exited, not just the direct child.
    fn collect(&self, pipe: &Receiver<String>, deadline: Instant) -> Result<String, EngineError> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match pipe.recv_timeout(remaining) {
            Ok(text) => Ok(text),
            Err(mpsc::RecvTimeoutError::Timeout) => {
                warn!(command = %self.command.display(), timeout = ?self.timeout, "engine pipes open at deadline");
                Err(EngineError::Timeout(self.timeout))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Ok(String::new()),
        }
    }
}

impl Engine for ProcessEngine {
    fn execute(&self, program: &Path) -> Result<EngineOutput, EngineError> {
        debug!(command = %self.command.display(), program = %program.display(), "starting engine");

        let deadline = Instant::now() + self.timeout;
        let mut child = self.spawn(program)?;
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = self.wait(&mut child, deadline)?;
        let stdout = self.collect(&stdout, deadline)?;
        let stderr = self.collect(&stderr, deadline)?;

        if !status.success() {
            return Err(EngineError::Failed { status, stderr: stderr.trim().to_string() });
        }

        debug!(bytes = stdout.len(), "engine report received");
        EngineOutput::from_json(&stdout)
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            // A read error leaves whatever arrived before it.
            let _ = pipe.read_to_end(&mut buf);
        }
        let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
    });
    rx
}
