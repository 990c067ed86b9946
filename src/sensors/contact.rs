//! Wired reed-switch door contact on a GPIO input.
//!
//! The switch shorts the line to ground while the magnet is present, so
//! the pin reads low when the door is closed (internal pull-up enabled).

use embedded_hal::digital::InputPin;
use log::debug;

use crate::app::ports::ContactSensor;
use crate::error::AdapterError;
use crate::events::DoorState;

pub struct GpioContact<P> {
    pin: P,
}

impl<P: InputPin> GpioContact<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: InputPin> ContactSensor for GpioContact<P> {
    fn read_contact(&mut self) -> Result<DoorState, AdapterError> {
        let closed = self.pin.is_low().map_err(|e| {
            debug!("Contact: GPIO read failed: {e:?}");
            AdapterError::Gpio
        })?;
        Ok(DoorState::from_contact(closed))
    }
}
