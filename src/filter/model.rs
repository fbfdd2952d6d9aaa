//! The RC filter state and its per-tick update.

use log::info;

use crate::error::{RcFilterError, Result};

use super::params::{fractional_approach, ComponentValues};
use super::{DEFAULT_LOG_INTERVAL_TICKS, DEFAULT_TICK_PERIOD_US, MAX_OUTPUT_VOLTAGE, MIN_TIME_CONSTANT};

/// Configuration for the filter model.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    /// Timer period in microseconds of simulated time.
    pub tick_period_us: u32,
    /// Emit diagnostic log lines.
    pub verbose: bool,
    /// Ticks between periodic diagnostic lines when verbose.
    pub log_interval_ticks: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            tick_period_us: DEFAULT_TICK_PERIOD_US,
            verbose: false,
            log_interval_ticks: DEFAULT_LOG_INTERVAL_TICKS,
        }
    }
}

impl FilterConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timer period in microseconds.
    pub fn with_tick_period_us(mut self, tick_period_us: u32) -> Self {
        self.tick_period_us = tick_period_us;
        self
    }

    /// Enable or disable diagnostic logging.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set how many ticks pass between periodic diagnostic lines.
    pub fn with_log_interval_ticks(mut self, log_interval_ticks: u32) -> Self {
        self.log_interval_ticks = log_interval_ticks;
        self
    }

    /// Tick period in seconds.
    pub fn tick_period_s(&self) -> f64 {
        f64::from(self.tick_period_us) * 1e-6
    }

    /// Check that the configuration can drive a filter.
    pub fn validate(&self) -> Result<()> {
        if self.tick_period_us == 0 {
            return Err(RcFilterError::invalid_config("tick period must be at least 1 us"));
        }
        if self.log_interval_ticks == 0 {
            return Err(RcFilterError::invalid_config("log interval must be at least 1 tick"));
        }
        Ok(())
    }
}

/// Discrete-time RC low-pass filter.
///
/// Each tick moves the output toward the input by a fixed fraction of the
/// remaining gap:
///
/// ```text
/// v_out += (v_in - v_out) * (1 - exp(-dt / tau))
/// ```
///
/// `tau` and the fraction are derived from the component values and cached.
/// They are recomputed only when the values seen on a tick differ from the
/// last values used.
#[derive(Debug, Clone)]
pub struct FilterModel {
    config: FilterConfig,
    /// Input voltage sampled on the most recent tick
    input_voltage: f64,
    /// Output voltage, carried across ticks
    output_voltage: f64,
    /// Values the derived constants were computed from (`None` = stale)
    last_values: Option<ComponentValues>,
    /// Time constant in seconds
    time_constant: f64,
    /// Fraction of the gap closed per tick
    fractional_approach: f64,
    recompute_count: u64,
    /// Ticks since the last periodic diagnostic line
    log_counter: u32,
}

impl FilterModel {
    /// Create a new filter model with its output at 0 V.
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            input_voltage: 0.0,
            output_voltage: 0.0,
            last_values: None,
            time_constant: 0.0,
            fractional_approach: 0.0,
            recompute_count: 0,
            log_counter: 0,
        }
    }

    /// Advance the filter by one tick and return the new output voltage.
    pub fn tick(&mut self, input_voltage: f64, values: ComponentValues) -> f64 {
        self.input_voltage = input_voltage;

        if self.refresh_constants(values) && self.config.verbose {
            info!(
                "Tau:{:.6} s {:.4} {:.4} V",
                self.time_constant, self.input_voltage, self.output_voltage
            );
        }

        if !self.output_in_range() {
            self.output_voltage = self.input_voltage;
        }

        if self.time_constant > MIN_TIME_CONSTANT {
            self.output_voltage += (self.input_voltage - self.output_voltage) * self.fractional_approach;
            self.log_periodic();
        } else {
            self.output_voltage = self.input_voltage;
        }

        self.output_voltage
    }

    /// Recompute the derived constants if `values` changed.
    ///
    /// Returns `true` when a recomputation happened.
    fn refresh_constants(&mut self, values: ComponentValues) -> bool {
        if self.last_values == Some(values) {
            return false;
        }

        self.last_values = Some(values);
        self.time_constant = values.time_constant();
        self.fractional_approach = fractional_approach(self.config.tick_period_s(), self.time_constant);
        self.recompute_count += 1;
        true
    }

    fn output_in_range(&self) -> bool {
        // NaN fails both comparisons
        self.output_voltage >= 0.0 && self.output_voltage <= MAX_OUTPUT_VOLTAGE
    }

    fn log_periodic(&mut self) {
        if !self.config.verbose {
            return;
        }
        self.log_counter += 1;
        if self.log_counter >= self.config.log_interval_ticks {
            info!(
                "Tau:{:.6} {:.4} {:.4} V",
                self.time_constant, self.input_voltage, self.output_voltage
            );
            self.log_counter = 0;
        }
    }

    /// Overwrite the output state, e.g. to restore a saved voltage.
    ///
    /// Out-of-band values are accepted here and corrected on the next tick.
    pub fn set_output_voltage(&mut self, voltage: f64) {
        self.output_voltage = voltage;
    }

    /// Force the derived constants to be recomputed on the next tick.
    pub fn invalidate(&mut self) {
        self.last_values = None;
    }

    /// Whether the derived constants need recomputing before use.
    pub fn is_stale(&self) -> bool {
        self.last_values.is_none()
    }

    /// Current output voltage.
    pub fn output_voltage(&self) -> f64 {
        self.output_voltage
    }

    /// Input voltage sampled on the most recent tick.
    pub fn input_voltage(&self) -> f64 {
        self.input_voltage
    }

    /// Current time constant in seconds.
    pub fn time_constant(&self) -> f64 {
        self.time_constant
    }

    /// Current fraction of the gap closed per tick.
    pub fn fractional_approach(&self) -> f64 {
        self.fractional_approach
    }

    /// Component values the constants were last computed from.
    pub fn last_values(&self) -> Option<ComponentValues> {
        self.last_values
    }

    /// Number of times the derived constants have been recomputed.
    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    /// The configuration this model runs with.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }
}

impl Default for FilterModel {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}
