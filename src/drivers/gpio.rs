//! Sysfs GPIO input line as an `embedded-hal` [`InputPin`].
//!
//! Reads `/sys/class/gpio/gpioN/value`.  The line must be exported and
//! set to `in` beforehand.

use std::fs;
use std::path::{Path, PathBuf};

use embedded_hal::digital::{ErrorKind, ErrorType, InputPin};

pub struct SysfsInputPin {
    value: PathBuf,
}

impl SysfsInputPin {
    pub fn new(line: u32) -> Self {
        Self::at(&Path::new("/sys/class/gpio").join(format!("gpio{line}")))
    }

    /// Line directory given explicitly (tests, non-standard mounts).
    pub fn at(line_dir: &Path) -> Self {
        Self {
            value: line_dir.join("value"),
        }
    }
}

impl ErrorType for SysfsInputPin {
    type Error = ErrorKind;
}

impl InputPin for SysfsInputPin {
    fn is_high(&mut self) -> Result<bool, ErrorKind> {
        match fs::read_to_string(&self.value).map_err(|_| ErrorKind::Other)?.trim() {
            "1" => Ok(true),
            "0" => Ok(false),
            _ => Err(ErrorKind::Other),
        }
    }

    fn is_low(&mut self) -> Result<bool, ErrorKind> {
        self.is_high().map(|high| !high)
    }
}
