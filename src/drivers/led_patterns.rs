//! Post-read LED sequence: alternate two colours, then settle on one.
//!
//! After every temperature tick the LED flashes the air-quality colour
//! and the temperature colour in turn, so both readings are visible on a
//! single LED, and then holds the temperature colour.
//!
//! ```text
//!   ┌ cycles × ─────────────────────┐
//!   │ alert ──half──▶ base ──half──▶│ ──▶ base (solid)
//!   └───────────────────────────────┘
//! ```

use core::time::Duration;

use crate::app::ports::LedPort;
use crate::cancel::CancelToken;
use crate::colour::Colour;
use crate::scheduler::Every;

#[derive(Debug, Clone, Copy)]
pub struct AlternatingSequence {
    cycles: u8,
    half_period: Duration,
}

impl AlternatingSequence {
    pub fn new(cycles: u8, half_period: Duration) -> Self {
        Self {
            cycles,
            half_period,
        }
    }

    /// Every colour the sequence shows, in order.  The last entry is the
    /// colour left on.
    pub fn steps(&self, alert: Colour, base: Colour) -> impl Iterator<Item = Colour> {
        (0..self.cycles)
            .flat_map(move |_| [alert, base])
            .chain(core::iter::once(base))
    }

    /// Play the sequence on `led`.  On cancellation the LED is left on
    /// `base` and `false` is returned.
    pub async fn play<L: LedPort>(
        &self,
        led: &mut L,
        alert: Colour,
        base: Colour,
        cancel: &CancelToken,
    ) -> bool {
        let every = Every::new(self.half_period);
        let total = usize::from(self.cycles) * 2;
        for (i, colour) in self.steps(alert, base).enumerate() {
            led.set_colour(colour);
            if i < total && !every.tick(cancel).await {
                led.set_colour(base);
                return false;
            }
        }
        true
    }
}
