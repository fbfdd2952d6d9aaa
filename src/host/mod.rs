//! Host boundary for custom chips.
//!
//! ```text
//!   host scheduler ──▶ TimerHandler::on_timer ──▶ chip ──▶ ChipHost (pins, attributes)
//! ```
//!
//! The simulator that loads a chip owns pins, attributes and timers. A chip
//! only ever sees them through [`ChipHost`], and the host calls back into the
//! chip through [`TimerHandler`], so the same chip code runs against the
//! real plugin API and against [`SimHost`] in tests.

pub mod sim;

use std::fmt;

use crate::error::Result;

pub use sim::SimHost;

/// Handle to a pin registered with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PinId(pub u32);

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Handle to an attribute registered with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttrId(pub u32);

impl fmt::Display for AttrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A{}", self.0)
    }
}

/// Handle to a timer started on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u32);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// Electrical mode of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PinMode {
    /// Digital input
    Input,
    /// Digital output
    Output,
    /// Analog input/output (ADC reads, DAC writes)
    #[default]
    Analog,
}

impl PinMode {
    /// Numeric mode code used by the plugin ABI.
    pub fn code(self) -> u32 {
        match self {
            PinMode::Input => 0,
            PinMode::Output => 1,
            PinMode::Analog => 4,
        }
    }
}

/// Services a host provides to a chip.
pub trait ChipHost {
    /// Register a pin by name.
    fn pin_init(&mut self, name: &str, mode: PinMode) -> Result<PinId>;

    /// Read the voltage on an analog pin.
    fn pin_adc_read(&mut self, pin: PinId) -> f32;

    /// Drive an analog pin to `voltage`.
    fn pin_dac_write(&mut self, pin: PinId, voltage: f32);

    /// Register a float attribute with its default value.
    fn attr_init_float(&mut self, name: &str, default: f32) -> Result<AttrId>;

    /// Read the current value of a float attribute.
    fn attr_read_float(&self, attr: AttrId) -> f32;

    /// Start a timer that fires after `period_us` microseconds of simulated
    /// time, and keeps firing at that period when `repeat` is set.
    fn timer_start(&mut self, period_us: u32, repeat: bool) -> Result<TimerId>;
}

/// Receiver of timer callbacks from a host of type `H`.
pub trait TimerHandler<H: ?Sized> {
    /// Called by the host each time `timer` fires.
    fn on_timer(&mut self, host: &mut H, timer: TimerId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_mode_codes() {
        assert_eq!(PinMode::Input.code(), 0);
        assert_eq!(PinMode::Output.code(), 1);
        assert_eq!(PinMode::Analog.code(), 4);
    }

    #[test]
    fn test_handle_display() {
        assert_eq!(PinId(2).to_string(), "P2");
        assert_eq!(AttrId(0).to_string(), "A0");
        assert_eq!(TimerId(7).to_string(), "T7");
    }
}
