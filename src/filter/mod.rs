//! RC low-pass filter model.
//!
//! The filter is a first-order RC network simulated one timer tick at a
//! time. With `dt` the tick period and `tau = R * C`, the exact response of
//! the network to an input held constant over the tick is
//!
//! ```text
//! v_out(t + dt) = v_in + (v_out(t) - v_in) * exp(-dt / tau)
//! ```
//!
//! which is what [`FilterModel::tick`] applies. Two guards keep the state
//! usable: an output that is NaN or outside `[0, MAX_OUTPUT_VOLTAGE]` is
//! reset to the input, and a time constant at or below
//! [`MIN_TIME_CONSTANT`] turns the filter into a plain wire.

mod model;
mod params;

pub use model::{FilterConfig, FilterModel};
pub use params::{fractional_approach, ComponentValues};

/// Default timer period in microseconds.
pub const DEFAULT_TICK_PERIOD_US: u32 = 1000;

/// Default number of ticks between periodic diagnostic lines.
pub const DEFAULT_LOG_INTERVAL_TICKS: u32 = 1000;

/// Time constants at or below this (seconds) are treated as zero.
pub const MIN_TIME_CONSTANT: f64 = 1e-8;

/// Upper bound of a plausible output voltage.
pub const MAX_OUTPUT_VOLTAGE: f64 = 1024.0;
