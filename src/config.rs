//! System configuration parameters
//!
//! All tunable parameters for the home controller, grouped by role.
//! Loaded from a JSON file; any field left out takes its default.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::colour::{AQI_BUCKETS, Colour, ColourRamp, MAROON, RampError, TEMPERATURE_ANCHORS, ThresholdRamp};
use crate::error::ConfigError;
use crate::sensors::lock::BusLock;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub bus: BusConfig,
    pub climate: SensorConfig,
    pub light_sensor: SensorConfig,
    pub miio: MiioConfig,
    pub led: LedConfig,
    pub light: LightConfig,
    pub door: DoorConfig,
    pub notify: NotifyConfig,
    pub aqi: AqiConfig,
    pub logger: LoggerConfig,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            bus: BusConfig::default(),
            climate: SensorConfig::climate(),
            light_sensor: SensorConfig::light(),
            miio: MiioConfig::default(),
            led: LedConfig::default(),
            light: LightConfig::default(),
            door: DoorConfig::default(),
            notify: NotifyConfig::default(),
            aqi: AqiConfig::default(),
            logger: LoggerConfig::default(),
        }
    }
}

// ── Bus locking ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Directory holding `<bus>.lock` files
    pub lock_dir: PathBuf,
    /// Wait between contended lock attempts (milliseconds)
    pub poll_interval_ms: u32,
    /// Give up after this long; `null` waits indefinitely
    pub max_wait_ms: Option<u32>,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            lock_dir: PathBuf::from("/var/lock"),
            poll_interval_ms: 100,
            max_wait_ms: None,
        }
    }
}

impl BusConfig {
    pub fn lock(&self, bus: &str) -> BusLock {
        BusLock::for_bus(&self.lock_dir, bus)
            .with_poll_interval(ms(self.poll_interval_ms))
            .with_max_wait(self.max_wait_ms.map(ms))
    }
}

// ── Sensors ───────────────────────────────────────────────────

/// One bus-locked IIO sensor.  A section given in the file must be
/// complete; an absent section takes the per-sensor defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    /// IIO device directory
    pub iio_device: PathBuf,
    /// Lock name of the bus the sensor sits on
    pub bus: String,
    /// Read attempts inside one lock hold
    pub read_attempts: u8,
    /// Gap between attempts (milliseconds)
    pub retry_delay_ms: u32,
}

impl SensorConfig {
    /// DHT22 on the single-wire bus.
    pub fn climate() -> Self {
        Self {
            iio_device: PathBuf::from("/sys/bus/iio/devices/iio:device0"),
            bus: "dht22".into(),
            read_attempts: 30,
            retry_delay_ms: 2000,
        }
    }

    /// TSL2561 on I2C.
    pub fn light() -> Self {
        Self {
            iio_device: PathBuf::from("/sys/bus/iio/devices/iio:device1"),
            bus: "tsl2561".into(),
            read_attempts: 3,
            retry_delay_ms: 500,
        }
    }

    pub fn retry_delay(&self) -> Duration {
        ms(self.retry_delay_ms)
    }
}

// ── Xiaomi gateway CLI ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiioConfig {
    pub node: PathBuf,
    pub script: PathBuf,
}

impl Default for MiioConfig {
    fn default() -> Self {
        Self {
            node: PathBuf::from("/usr/local/bin/node"),
            script: PathBuf::from("/usr/local/bin/miio"),
        }
    }
}

// ── LED role ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedConfig {
    /// sysfs PWM chip directory
    pub pwm_chip: PathBuf,
    /// R, G, B channel indices on the chip
    pub channels: [u32; 3],
    /// PWM period (nanoseconds)
    pub period_ns: u32,
    /// Temperature update interval (seconds)
    pub update_interval_secs: u32,
    /// AQI/temperature alternations after each update
    pub cycles: u8,
    /// How long each colour of an alternation is held (milliseconds)
    pub half_period_ms: u32,
    /// AQI refresh interval (seconds)
    pub aqi_interval_secs: u32,
    pub temperature_ramp: RampConfig,
    pub aqi_ramp: ThresholdConfig,
}

impl Default for LedConfig {
    fn default() -> Self {
        Self {
            pwm_chip: PathBuf::from("/sys/class/pwm/pwmchip0"),
            channels: [0, 1, 2],
            period_ns: 1_000_000, // 1 kHz
            update_interval_secs: 60,
            cycles: 10,
            half_period_ms: 500,
            aqi_interval_secs: 3600,
            temperature_ramp: RampConfig::default(),
            aqi_ramp: ThresholdConfig::default(),
        }
    }
}

/// Evenly spaced interpolating ramp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RampConfig {
    pub anchors: Vec<Colour>,
    pub min_value: f32,
    pub max_value: f32,
    /// Global dimming factor in [0, 1]
    pub brightness: f32,
}

impl Default for RampConfig {
    fn default() -> Self {
        Self {
            anchors: TEMPERATURE_ANCHORS.to_vec(),
            min_value: 8.0,
            max_value: 32.0,
            brightness: 1.0,
        }
    }
}

impl RampConfig {
    pub fn build(&self) -> Result<ColourRamp, RampError> {
        ColourRamp::new(&self.anchors, self.min_value, self.max_value)?
            .with_brightness(self.brightness)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    /// Inclusive upper bound
    pub max: f64,
    pub colour: Colour,
}

/// Ordered `<=` bucket lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub buckets: Vec<Bucket>,
    /// Colour above every bucket
    pub overflow: Colour,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            buckets: AQI_BUCKETS.iter().map(|&(max, colour)| Bucket { max, colour }).collect(),
            overflow: MAROON,
        }
    }
}

impl ThresholdConfig {
    pub fn build(&self) -> Result<ThresholdRamp, RampError> {
        let buckets: Vec<(f64, Colour)> = self.buckets.iter().map(|b| (b.max, b.colour)).collect();
        ThresholdRamp::new(&buckets, self.overflow)
    }
}

// ── Light role ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    /// Smart plug device id
    pub plug_id: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Check interval (seconds)
    pub check_interval_secs: u32,
    /// Switch on at or below this illuminance
    pub on_at_or_below_lux: f32,
    /// Switch off above this illuminance
    pub off_above_lux: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            plug_id: "158d0002498b8e".into(),
            latitude: -37.8114,
            longitude: 145.2306,
            check_interval_secs: 10,
            on_at_or_below_lux: 15.0,
            off_above_lux: 120.0,
        }
    }
}

// ── Door role ─────────────────────────────────────────────────

/// Where the door contact is read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContactSource {
    /// Zigbee magnet sensor through the gateway CLI
    Miio { id: String },
    /// Wired reed switch on a sysfs GPIO line
    Gpio { line: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorConfig {
    pub contact: ContactSource,
    /// Contact poll interval (seconds)
    pub poll_interval_secs: u32,
    /// How long the door may stay open before an alert (seconds)
    pub warn_after_secs: u32,
    pub title: String,
    pub message: String,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            contact: ContactSource::Miio {
                id: "158d0002676aec".into(),
            },
            poll_interval_secs: 30,
            warn_after_secs: 120,
            title: "Rear Door Warning".into(),
            message: "Door left open for too long".into(),
        }
    }
}

// ── Remote services ───────────────────────────────────────────

/// IFTTT webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub base_url: String,
    pub event: String,
    pub key: String,
    pub timeout_secs: u32,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            base_url: "https://maker.ifttt.com".into(),
            event: "door_open".into(),
            key: String::new(),
            timeout_secs: 10,
        }
    }
}

/// World Air Quality Index feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AqiConfig {
    pub base_url: String,
    /// `lat;lon`
    pub geo: String,
    pub token: String,
    pub timeout_secs: u32,
}

impl Default for AqiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.waqi.info".into(),
            geo: "-37;145".into(),
            token: String::new(),
            timeout_secs: 10,
        }
    }
}

// ── Logger role ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Sampling interval (seconds)
    pub interval_secs: u32,
    /// Row append attempts per sample
    pub append_attempts: u8,
    /// JSON POST endpoint; rows are only logged when unset
    pub webhook_url: Option<String>,
    pub timeout_secs: u32,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            interval_secs: 600,
            append_attempts: 3,
            webhook_url: None,
            timeout_secs: 10,
        }
    }
}

// ── Load / validate ───────────────────────────────────────────

impl SystemConfig {
    /// Read, parse and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject out-of-range values.  Nothing is clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |what| Err(ConfigError::Invalid(what));

        if self.bus.poll_interval_ms == 0 {
            return invalid("bus.poll_interval_ms must be > 0");
        }
        if self.climate.read_attempts == 0 || self.light_sensor.read_attempts == 0 {
            return invalid("read_attempts must be > 0");
        }

        let led = &self.led;
        if led.update_interval_secs == 0 || led.aqi_interval_secs == 0 {
            return invalid("led intervals must be > 0");
        }
        match led.temperature_ramp.build() {
            Err(RampError::TooFewAnchors) => return invalid("led.temperature_ramp needs >= 2 anchors"),
            Err(RampError::TooManyAnchors) => return invalid("led.temperature_ramp has too many anchors"),
            Err(RampError::EmptyDomain) => return invalid("led.temperature_ramp min_value must be < max_value"),
            Err(RampError::Brightness) => return invalid("led.temperature_ramp brightness must be within 0..=1"),
            Err(RampError::Unordered) | Ok(_) => {}
        }
        match led.aqi_ramp.build() {
            Err(RampError::Unordered) => return invalid("led.aqi_ramp bounds must be strictly ascending"),
            Err(RampError::TooFewAnchors) => return invalid("led.aqi_ramp needs >= 1 bucket"),
            Err(RampError::TooManyAnchors) => return invalid("led.aqi_ramp has too many buckets"),
            _ => {}
        }

        if self.light.check_interval_secs == 0 {
            return invalid("light.check_interval_secs must be > 0");
        }
        let band = self.light.on_at_or_below_lux.partial_cmp(&self.light.off_above_lux);
        if band != Some(Ordering::Less) {
            return invalid("light.on_at_or_below_lux must be < off_above_lux");
        }
        if self.door.poll_interval_secs == 0 {
            return invalid("door.poll_interval_secs must be > 0");
        }
        if self.logger.interval_secs == 0 || self.logger.append_attempts == 0 {
            return invalid("logger interval and append_attempts must be > 0");
        }
        Ok(())
    }
}

pub fn ms(millis: u32) -> Duration {
    Duration::from_millis(u64::from(millis))
}

pub fn secs(seconds: u32) -> Duration {
    Duration::from_secs(u64::from(seconds))
}
