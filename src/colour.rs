//! Scalar-to-colour mapping for the status LED.
//!
//! Two ramps are provided:
//!
//! | Ramp            | Domain            | Method                          |
//! |-----------------|-------------------|---------------------------------|
//! | [`ColourRamp`]    | temperature (°C)  | piecewise-linear interpolation  |
//! | [`ThresholdRamp`] | air-quality index | ordered `<=` bucket lookup      |
//!
//! Both are pure and total: out-of-range input saturates to the end
//! colours, NaN maps to the lowest anchor.

use heapless::Vec;
use serde::{Deserialize, Serialize};

/// Upper bound on anchors or buckets in one ramp (stack-allocated).
pub const MAX_RAMP_LEN: usize = 16;

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale all three channels by `factor` in [0, 1], truncating.
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            r: (f32::from(self.r) * factor) as u8,
            g: (f32::from(self.g) * factor) as u8,
            b: (f32::from(self.b) * factor) as u8,
        }
    }
}

pub const PURPLE: Colour = Colour::new(255, 0, 255);
pub const BLUE: Colour = Colour::new(0, 0, 255);
pub const CYAN: Colour = Colour::new(0, 255, 255);
pub const GREEN: Colour = Colour::new(0, 255, 0);
pub const YELLOW: Colour = Colour::new(255, 255, 0);
pub const ORANGE: Colour = Colour::new(255, 127, 0);
pub const RED: Colour = Colour::new(255, 0, 0);
pub const MAROON: Colour = Colour::new(126, 0, 35);
pub const OFF: Colour = Colour::new(0, 0, 0);

/// Why a ramp could not be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampError {
    /// Fewer than two anchors (or no buckets).
    TooFewAnchors,
    /// More entries than [`MAX_RAMP_LEN`].
    TooManyAnchors,
    /// `min_value` is not strictly below `max_value`, or either is not finite.
    EmptyDomain,
    /// Brightness outside [0, 1].
    Brightness,
    /// Bucket bounds are not strictly ascending.
    Unordered,
}

impl core::fmt::Display for RampError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::TooFewAnchors => write!(f, "ramp needs at least two anchors"),
            Self::TooManyAnchors => write!(f, "ramp has more than {MAX_RAMP_LEN} entries"),
            Self::EmptyDomain => write!(f, "ramp min must be below max"),
            Self::Brightness => write!(f, "brightness must be within 0..=1"),
            Self::Unordered => write!(f, "bucket bounds must be strictly ascending"),
        }
    }
}

impl std::error::Error for RampError {}

// ───────────────────────────────────────────────────────────────
// Interpolating ramp
// ───────────────────────────────────────────────────────────────

pub const TEMPERATURE_ANCHORS: [Colour; 6] = [PURPLE, BLUE, CYAN, GREEN, YELLOW, RED];

/// Inclusive AQI upper bounds; above 300 is [`MAROON`].
pub const AQI_BUCKETS: [(f64, Colour); 5] = [
    (50.0, GREEN),
    (100.0, YELLOW),
    (150.0, ORANGE),
    (200.0, RED),
    (300.0, PURPLE),
];

/// Evenly spaced anchors between `min_value` and `max_value`, blended
/// linearly and then dimmed by a global brightness factor.
#[derive(Debug, Clone)]
pub struct ColourRamp {
    anchors: Vec<Colour, MAX_RAMP_LEN>,
    min_value: f32,
    max_value: f32,
    brightness: f32,
}

impl ColourRamp {
    pub fn new(anchors: &[Colour], min_value: f32, max_value: f32) -> Result<Self, RampError> {
        if anchors.len() < 2 {
            return Err(RampError::TooFewAnchors);
        }
        if !min_value.is_finite() || !max_value.is_finite() || min_value >= max_value {
            return Err(RampError::EmptyDomain);
        }
        let anchors = Vec::from_slice(anchors).map_err(|_| RampError::TooManyAnchors)?;
        Ok(Self {
            anchors,
            min_value,
            max_value,
            brightness: 1.0,
        })
    }

    pub fn with_brightness(mut self, brightness: f32) -> Result<Self, RampError> {
        if !(0.0..=1.0).contains(&brightness) {
            return Err(RampError::Brightness);
        }
        self.brightness = brightness;
        Ok(self)
    }

    /// Room temperature ramp: purple at 8 °C through red at 32 °C.
    pub fn temperature() -> Result<Self, RampError> {
        Self::new(&TEMPERATURE_ANCHORS, 8.0, 32.0)
    }

    pub fn anchors(&self) -> &[Colour] {
        &self.anchors
    }

    /// Map `value` onto the ramp.
    ///
    /// The continuous position `p` sits between anchors `lo = floor(p)` and
    /// `hi = ceil(p)`; the result moves from `anchor[lo]` toward
    /// `anchor[hi]` by `p - lo`, so the output is continuous across every
    /// breakpoint and an integral `p` returns its anchor exactly.
    pub fn map(&self, value: f32) -> Colour {
        let last = self.anchors.len() - 1;
        if value.is_nan() || value < self.min_value {
            return self.anchors[0];
        }
        if value > self.max_value {
            return self.anchors[last];
        }

        let span = f64::from(self.max_value - self.min_value);
        let p = f64::from(value - self.min_value) / span * last as f64;
        let lo = (p.floor() as usize).min(last);
        let hi = (p.ceil() as usize).min(last);
        let t = p - lo as f64;

        let (a, b) = (self.anchors[lo], self.anchors[hi]);
        Colour {
            r: blend(a.r, b.r, t),
            g: blend(a.g, b.g, t),
            b: blend(a.b, b.b, t),
        }
        .scaled(self.brightness)
    }
}

/// `from + (to - from) * t`, truncated toward zero.
fn blend(from: u8, to: u8, t: f64) -> u8 {
    let from = f64::from(from);
    (from + (f64::from(to) - from) * t) as u8
}

// ───────────────────────────────────────────────────────────────
// Bucket ramp
// ───────────────────────────────────────────────────────────────

/// Non-interpolating lookup: the first bucket whose upper bound is `>=`
/// the value wins, anything above every bound gets `overflow`.
#[derive(Debug, Clone)]
pub struct ThresholdRamp {
    buckets: Vec<(f64, Colour), MAX_RAMP_LEN>,
    overflow: Colour,
}

impl ThresholdRamp {
    pub fn new(buckets: &[(f64, Colour)], overflow: Colour) -> Result<Self, RampError> {
        if buckets.is_empty() {
            return Err(RampError::TooFewAnchors);
        }
        if buckets.windows(2).any(|w| w[0].0.partial_cmp(&w[1].0) != Some(core::cmp::Ordering::Less)) {
            return Err(RampError::Unordered);
        }
        let buckets = Vec::from_slice(buckets).map_err(|_| RampError::TooManyAnchors)?;
        Ok(Self { buckets, overflow })
    }

    /// US EPA AQI bands.
    pub fn air_quality() -> Result<Self, RampError> {
        Self::new(&AQI_BUCKETS, MAROON)
    }

    pub fn map(&self, value: f64) -> Colour {
        self.buckets
            .iter()
            .find(|(bound, _)| value <= *bound)
            .map_or(self.overflow, |(_, colour)| *colour)
    }
}
