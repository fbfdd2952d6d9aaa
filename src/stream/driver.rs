//! Chip running on a private simulated host.

use crate::chip::{RcFilterChip, ATTR_C, ATTR_C_EXP, ATTR_R, ATTR_R_EXP, PIN_IN, PIN_OUT};
use crate::error::Result;
use crate::filter::{ComponentValues, FilterConfig};
use crate::host::SimHost;

/// An [`RcFilterChip`] wired to its own [`SimHost`], stepped one tick at a
/// time.
pub struct ChipDriver {
    host: SimHost,
    chip: RcFilterChip,
    tick_period_us: u64,
}

impl ChipDriver {
    /// Create a driver whose attributes start at `values`.
    pub fn new(values: ComponentValues, config: FilterConfig) -> Result<Self> {
        let tick_period_us = u64::from(config.tick_period_us);
        let mut host = SimHost::new()
            .with_attribute(ATTR_R, values.resistance as f32)
            .with_attribute(ATTR_R_EXP, values.resistance_exp as f32)
            .with_attribute(ATTR_C, values.capacitance as f32)
            .with_attribute(ATTR_C_EXP, values.capacitance_exp as f32);
        let chip = RcFilterChip::initialize(&mut host, config)?;

        Ok(Self {
            host,
            chip,
            tick_period_us,
        })
    }

    /// Apply `input` to `IN`, run one tick, and return the voltage on `OUT`.
    pub fn step(&mut self, input: f32) -> Result<f32> {
        self.host.set_input(PIN_IN, input)?;
        self.host.advance(self.tick_period_us, &mut self.chip);
        Ok(self.host.voltage(PIN_OUT).unwrap_or_default())
    }

    /// Run one tick per input sample.
    pub fn process_block(&mut self, input: &[f32], output: &mut [f32]) -> Result<()> {
        for (out, &sample) in output.iter_mut().zip(input) {
            *out = self.step(sample)?;
        }
        Ok(())
    }

    /// Change the component attributes between ticks.
    pub fn set_values(&mut self, values: ComponentValues) -> Result<()> {
        self.host.set_attribute(ATTR_R, values.resistance as f32)?;
        self.host.set_attribute(ATTR_R_EXP, values.resistance_exp as f32)?;
        self.host.set_attribute(ATTR_C, values.capacitance as f32)?;
        self.host.set_attribute(ATTR_C_EXP, values.capacitance_exp as f32)?;
        Ok(())
    }

    /// The simulated host.
    pub fn host(&self) -> &SimHost {
        &self.host
    }

    /// The chip being driven.
    pub fn chip(&self) -> &RcFilterChip {
        &self.chip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_values_seed_attributes() {
        let values = ComponentValues::new(4.7, 3.0, 100.0, -9.0);
        let driver = ChipDriver::new(values, FilterConfig::default()).unwrap();

        assert_eq!(driver.host().attribute(ATTR_R), Some(4.7));
        assert_eq!(driver.host().attribute(ATTR_C_EXP), Some(-9.0));
    }

    #[test]
    fn test_step_advances_clock() {
        let config = FilterConfig::new().with_tick_period_us(250);
        let mut driver = ChipDriver::new(ComponentValues::default(), config).unwrap();

        driver.step(1.0).unwrap();
        driver.step(1.0).unwrap();
        assert_eq!(driver.host().now_us(), 500);
        assert_eq!(driver.host().dac_writes(), 2);
    }

    #[test]
    fn test_set_values_switches_to_pass_through() {
        let mut driver = ChipDriver::new(ComponentValues::default(), FilterConfig::default()).unwrap();
        let first = driver.step(5.0).unwrap();
        assert!(first < 5.0);

        driver
            .set_values(ComponentValues { resistance: 0.0, ..ComponentValues::default() })
            .unwrap();
        for input in [2.0f32, 4.5, 0.5] {
            assert_eq!(driver.step(input).unwrap(), input);
        }
        assert_relative_eq!(driver.chip().model().time_constant(), 0.0);
    }
}
