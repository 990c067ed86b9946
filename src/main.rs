//! Home controller: one binary, one role per process.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                        │
//! │                                                                  │
//! │  IioClimateSensor  IioLightSensor  PwmRgbLed   MiioContact/Plug  │
//! │  WaqiSource        SolarDaylight   IftttNotifier  Row sinks      │
//! │                                                                  │
//! │  ──────────────── Port Trait Boundary ───────────────────        │
//! │                                                                  │
//! │  led:    TemperatureLed + AqiRefresher (one local executor)      │
//! │  light:  LightService                                            │
//! │  door:   ContactMonitor ─▶ DoorController ─▶ DelayedNotifier     │
//! │  logger: LoggerService                                           │
//! │                                                                  │
//! │  SensorReader + BusLock: one reader per I2C bus across processes │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! SIGINT/SIGTERM cancel the role; loops stop at their next tick.
#![deny(unused_must_use)]

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures_lite::future;
use log::{info, warn};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;

use smarthome::adapters::aqi::WaqiSource;
use smarthome::adapters::ifttt::IftttNotifier;
use smarthome::adapters::log_sink::LogEventSink;
use smarthome::adapters::miio::{MiioCli, MiioContact, MiioPlug};
use smarthome::adapters::row_sink::{LogRowSink, WebhookRowSink};
use smarthome::adapters::time::SolarDaylight;
use smarthome::app::led_service::{AqiRefresher, SharedColour, TemperatureLed};
use smarthome::app::light_service::{LightBand, LightService};
use smarthome::app::logger_service::LoggerService;
use smarthome::app::ports::{ContactSensor, RowSink};
use smarthome::cancel::CancelToken;
use smarthome::colour::OFF;
use smarthome::config::{BusConfig, ContactSource, SensorConfig, SystemConfig, ms, secs};
use smarthome::door::{ContactMonitor, DelayedNotifier, DoorController};
use smarthome::drivers::gpio::SysfsInputPin;
use smarthome::drivers::led_patterns::AlternatingSequence;
use smarthome::drivers::status_led::PwmRgbLed;
use smarthome::events::DoorEventChannel;
use smarthome::scheduler::Every;
use smarthome::sensors::climate::IioClimateSensor;
use smarthome::sensors::contact::GpioContact;
use smarthome::sensors::light::IioLightSensor;
use smarthome::sensors::{BusDriver, SensorReader};

// ── CLI ───────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "smarthome")]
#[command(version)]
#[command(about = "Home sensors, status LED, lamp and door alerts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    role: Role,

    /// JSON config file; built-in defaults when omitted
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging for this crate
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Role {
    /// Temperature colour on the RGB LED with air-quality flashes
    Led,
    /// Switch the lamp at dusk by room brightness
    Light,
    /// Alert when the door stays open too long
    Door,
    /// Periodically record climate and light readings
    Logger,
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter_directives = if cli.debug { "info,smarthome=debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter_directives));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("smarthome v{} role={:?}", env!("CARGO_PKG_VERSION"), cli.role);

    let config = match &cli.config {
        Some(path) => SystemConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => {
            warn!("No --config given, using defaults");
            SystemConfig::default()
        }
    };

    let cancel = Arc::new(CancelToken::new());
    install_signal_handler(Arc::clone(&cancel))?;

    match cli.role {
        Role::Led => run_led(&config, &cancel),
        Role::Light => run_light(&config, &cancel),
        Role::Door => run_door(&config, &cancel),
        Role::Logger => run_logger(&config, &cancel),
    }
}

/// First SIGINT/SIGTERM cancels the role.
fn install_signal_handler(cancel: Arc<CancelToken>) -> Result<()> {
    let mut signals = Signals::new([SIGINT, SIGTERM]).context("installing signal handlers")?;
    std::thread::Builder::new()
        .name("signals".into())
        .spawn(move || {
            if let Some(sig) = signals.forever().next() {
                info!("Signal {sig} received, shutting down");
                cancel.cancel();
            }
        })
        .context("spawning signal thread")?;
    Ok(())
}

fn reader<D: BusDriver>(bus: &BusConfig, sensor: &SensorConfig, driver: D) -> SensorReader<D> {
    SensorReader::new(
        bus.lock(&sensor.bus),
        driver,
        sensor.read_attempts,
        sensor.retry_delay(),
    )
}

// ── Roles ─────────────────────────────────────────────────────

fn run_led(config: &SystemConfig, cancel: &CancelToken) -> Result<()> {
    let led_cfg = &config.led;
    let led = PwmRgbLed::open(&led_cfg.pwm_chip, led_cfg.channels, led_cfg.period_ns)
        .context("opening PWM LED")?;
    let ramp = led_cfg.temperature_ramp.build().context("temperature ramp")?;
    let aqi_ramp = led_cfg.aqi_ramp.build().context("air-quality ramp")?;

    let aqi_colour: SharedColour = Rc::new(Cell::new(OFF));
    let mut temperature = TemperatureLed::new(
        reader(&config.bus, &config.climate, IioClimateSensor::new(&config.climate.iio_device)),
        led,
        ramp,
        AlternatingSequence::new(led_cfg.cycles, ms(led_cfg.half_period_ms)),
        Every::new(secs(led_cfg.update_interval_secs)),
        Rc::clone(&aqi_colour),
    );
    let mut refresher = AqiRefresher::new(
        WaqiSource::new(&config.aqi),
        aqi_ramp,
        Every::new(secs(led_cfg.aqi_interval_secs)),
        aqi_colour,
    );

    let executor: edge_executor::LocalExecutor<'_, 4> = edge_executor::LocalExecutor::new();
    let temperature_task = executor.spawn(async move {
        temperature.run(&mut LogEventSink::new(), cancel).await;
        temperature
    });
    let aqi_task = executor.spawn(async move {
        refresher.run(&mut LogEventSink::new(), cancel).await;
    });

    let (mut temperature, ()) = future::block_on(executor.run(future::zip(temperature_task, aqi_task)));
    temperature.led_mut().off();
    Ok(())
}

fn run_light(config: &SystemConfig, cancel: &CancelToken) -> Result<()> {
    let cfg = &config.light;
    let band = LightBand::new(cfg.on_at_or_below_lux, cfg.off_above_lux)
        .context("light band: on threshold must be below off threshold")?;
    let mut service = LightService::new(
        reader(
            &config.bus,
            &config.light_sensor,
            IioLightSensor::new(&config.light_sensor.iio_device),
        ),
        MiioPlug::new(MiioCli::new(&config.miio), cfg.plug_id.clone()),
        SolarDaylight::new(cfg.latitude, cfg.longitude),
        band,
        Every::new(secs(cfg.check_interval_secs)),
    );
    future::block_on(service.run(&mut LogEventSink::new(), cancel));
    Ok(())
}

fn run_door(config: &SystemConfig, cancel: &CancelToken) -> Result<()> {
    let cfg = &config.door;
    let contact: Box<dyn ContactSensor> = match &cfg.contact {
        ContactSource::Miio { id } => Box::new(MiioContact::new(MiioCli::new(&config.miio), id.clone())),
        ContactSource::Gpio { line } => Box::new(GpioContact::new(SysfsInputPin::new(*line))),
    };
    if config.notify.key.is_empty() {
        warn!("Door: notify.key is empty, alerts will be rejected");
    }

    let template = DelayedNotifier::new(secs(cfg.warn_after_secs), cfg.title.clone(), cfg.message.clone());
    let mut controller = DoorController::new(template, Arc::new(IftttNotifier::new(&config.notify)));
    let mut monitor = ContactMonitor::new(contact, secs(cfg.poll_interval_secs));

    let channel = DoorEventChannel::new();
    let mut events = LogEventSink::new();
    future::block_on(future::or(
        monitor.run(channel.sender(), cancel),
        controller.run(channel.receiver(), &mut events),
    ));
    controller.shutdown();
    Ok(())
}

fn run_logger(config: &SystemConfig, cancel: &CancelToken) -> Result<()> {
    let cfg = &config.logger;
    let rows: Box<dyn RowSink> = match &cfg.webhook_url {
        Some(url) => Box::new(WebhookRowSink::new(url.clone(), cfg)),
        None => Box::new(LogRowSink),
    };
    let mut service = LoggerService::new(
        reader(&config.bus, &config.climate, IioClimateSensor::new(&config.climate.iio_device)),
        reader(
            &config.bus,
            &config.light_sensor,
            IioLightSensor::new(&config.light_sensor.iio_device),
        ),
        rows,
        Every::new(secs(cfg.interval_secs)),
    );
    future::block_on(service.run(&mut LogEventSink::new(), cancel));
    Ok(())
}
