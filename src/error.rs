//! Error types for the home controller.
//!
//! Every subsystem has its own small error enum.  Nothing in here is
//! process-fatal: role loops log and carry on, and only the binary's
//! startup path turns these into an exit (through `anyhow`).

use core::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use nix::errno::Errno;

// ---------------------------------------------------------------------------
// Bus lock errors
// ---------------------------------------------------------------------------

/// Failure to obtain the advisory lock guarding a hardware bus.
///
/// `Open` and `Lock` are raised immediately; only contention is waited
/// out, and `Timeout` is returned when a configured maximum wait elapses.
#[derive(Debug)]
pub enum LockError {
    /// The lock file could not be opened or created.
    Open { path: PathBuf, source: io::Error },
    /// `flock(2)` failed for a reason other than contention.
    Lock { path: PathBuf, errno: Errno },
    /// Another holder kept the lock for longer than the allowed wait.
    Timeout { path: PathBuf, waited: Duration },
}

impl fmt::Display for LockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "cannot open lock file {}: {source}", path.display())
            }
            Self::Lock { path, errno } => {
                write!(f, "flock on {} failed: {errno}", path.display())
            }
            Self::Timeout { path, waited } => {
                write!(f, "lock {} still held after {:?}", path.display(), waited)
            }
        }
    }
}

impl std::error::Error for LockError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Lock { errno, .. } => Some(errno),
            Self::Timeout { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Driver errors (single physical read attempt)
// ---------------------------------------------------------------------------

/// One failed attempt of the opaque physical read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// The device did not answer in time (protocol timing miss).
    Timeout,
    /// The device node returned an I/O error.
    Io(io::ErrorKind),
    /// The device answered with something that is not a number.
    Malformed,
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "device timed out"),
            Self::Io(kind) => write!(f, "device I/O error: {kind}"),
            Self::Malformed => write!(f, "malformed device value"),
        }
    }
}

impl std::error::Error for DriverError {}

impl From<io::Error> for DriverError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::TimedOut => Self::Timeout,
            kind => Self::Io(kind),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors (one logical acquisition)
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum SensorError {
    /// The bus lock could not be taken; no read was attempted.
    Lock(LockError),
    /// Every attempt inside the held lock failed.
    ReadFailed { attempts: u8, last: DriverError },
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lock(e) => write!(f, "{e}"),
            Self::ReadFailed { attempts, last } => {
                write!(f, "read failed after {attempts} attempts: {last}")
            }
        }
    }
}

impl std::error::Error for SensorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Lock(e) => Some(e),
            Self::ReadFailed { last, .. } => Some(last),
        }
    }
}

impl From<LockError> for SensorError {
    fn from(e: LockError) -> Self {
        Self::Lock(e)
    }
}

// ---------------------------------------------------------------------------
// External collaborator errors
// ---------------------------------------------------------------------------

/// Failures of the I/O shims: CLI tools, HTTP endpoints, GPIO lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// The external command could not be spawned or exited non-zero.
    Command(String),
    /// The command or endpoint answered with unexpected output.
    Output(String),
    /// The HTTP request failed before a response arrived.
    Http(String),
    /// The HTTP endpoint answered with a non-success status.
    Status(u16),
    /// A GPIO line could not be read.
    Gpio,
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command(msg) => write!(f, "command failed: {msg}"),
            Self::Output(msg) => write!(f, "unexpected output: {msg}"),
            Self::Http(msg) => write!(f, "HTTP request failed: {msg}"),
            Self::Status(code) => write!(f, "HTTP status {code}"),
            Self::Gpio => write!(f, "GPIO read failed"),
        }
    }
}

impl std::error::Error for AdapterError {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    Io(io::Error),
    /// The config file is not valid JSON for [`SystemConfig`](crate::config::SystemConfig).
    Parse(serde_json::Error),
    /// A field failed range validation.
    /// The `&'static str` names the field and the rule.
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "cannot read config: {e}"),
            Self::Parse(e) => write!(f, "cannot parse config: {e}"),
            Self::Invalid(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}
