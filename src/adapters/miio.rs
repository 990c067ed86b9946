//! Xiaomi gateway devices through the `miio` Node.js CLI.
//!
//! `node miio control <id> <property> [value]` prints a banner line, the
//! property value (`true`/`false`), and a trailing newline.  Anything else
//! is rejected as [`AdapterError::Output`].

use std::path::PathBuf;
use std::process::Command;

use log::{debug, info};

use crate::app::ports::{ContactSensor, LightSwitch};
use crate::config::MiioConfig;
use crate::error::AdapterError;
use crate::events::DoorState;

/// The CLI invocation shared by every device.
#[derive(Debug, Clone)]
pub struct MiioCli {
    node: PathBuf,
    script: PathBuf,
}

impl MiioCli {
    pub fn new(config: &MiioConfig) -> Self {
        Self {
            node: config.node.clone(),
            script: config.script.clone(),
        }
    }

    /// Run `control <device> <args..>` and return stdout.
    fn control(&self, device: &str, args: &[&str]) -> Result<String, AdapterError> {
        debug!("miio: control {device} {}", args.join(" "));
        let out = Command::new(&self.node)
            .arg(&self.script)
            .args(["control", device])
            .args(args)
            .output()
            .map_err(|e| AdapterError::Command(format!("{}: {e}", self.node.display())))?;
        if !out.status.success() {
            return Err(AdapterError::Command(format!(
                "miio exited with {}: {}",
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }

    fn query_bool(&self, device: &str, property: &str) -> Result<bool, AdapterError> {
        parse_bool_output(&self.control(device, &[property])?)
    }
}

/// Expect exactly three newline-separated fields with the value second.
pub(crate) fn parse_bool_output(stdout: &str) -> Result<bool, AdapterError> {
    let lines: Vec<&str> = stdout.split('\n').collect();
    if lines.len() != 3 {
        return Err(AdapterError::Output(format!("unexpected miio output: {stdout:?}")));
    }
    match lines[1].trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(AdapterError::Output(format!("unexpected value: {other:?}"))),
    }
}

// ───────────────────────────────────────────────────────────────
// Magnet contact sensor
// ───────────────────────────────────────────────────────────────

pub struct MiioContact {
    cli: MiioCli,
    id: String,
}

impl MiioContact {
    pub fn new(cli: MiioCli, id: impl Into<String>) -> Self {
        Self { cli, id: id.into() }
    }
}

impl ContactSensor for MiioContact {
    fn read_contact(&mut self) -> Result<DoorState, AdapterError> {
        self.cli.query_bool(&self.id, "contact").map(DoorState::from_contact)
    }
}

// ───────────────────────────────────────────────────────────────
// Smart plug
// ───────────────────────────────────────────────────────────────

pub struct MiioPlug {
    cli: MiioCli,
    id: String,
}

impl MiioPlug {
    pub fn new(cli: MiioCli, id: impl Into<String>) -> Self {
        Self { cli, id: id.into() }
    }
}

impl LightSwitch for MiioPlug {
    fn is_on(&mut self) -> Result<bool, AdapterError> {
        self.cli.query_bool(&self.id, "power")
    }

    fn set_power(&mut self, on: bool) -> Result<(), AdapterError> {
        info!("Plug[{}]: power {}", self.id, if on { "on" } else { "off" });
        self.cli
            .control(&self.id, &["power", if on { "true" } else { "false" }])
            .map(|_| ())
    }
}
