//! The RC filter packaged as a custom chip.
//!
//! [`RcFilterChip::initialize`] registers the chip's pins, attributes and
//! timer with a host; every timer callback then runs one filter tick:
//!
//! 1. sample `IN`
//! 2. read `R`, `Rexp`, `C`, `Cexp` (the model recomputes tau only if they changed)
//! 3. apply the output guard and one exponential-approach step
//! 4. write `OUT`

use log::debug;

use crate::error::Result;
use crate::filter::{ComponentValues, FilterConfig, FilterModel};
use crate::host::{AttrId, ChipHost, PinId, PinMode, TimerHandler, TimerId};

/// Name of the analog input pin.
pub const PIN_IN: &str = "IN";
/// Name of the analog output pin.
pub const PIN_OUT: &str = "OUT";

/// Attribute holding the resistance mantissa.
pub const ATTR_R: &str = "R";
/// Attribute holding the resistance exponent.
pub const ATTR_R_EXP: &str = "Rexp";
/// Attribute holding the capacitance mantissa.
pub const ATTR_C: &str = "C";
/// Attribute holding the capacitance exponent.
pub const ATTR_C_EXP: &str = "Cexp";

/// Host handles for the four component attributes.
#[derive(Debug, Clone, Copy)]
struct ComponentAttrs {
    resistance: AttrId,
    resistance_exp: AttrId,
    capacitance: AttrId,
    capacitance_exp: AttrId,
}

impl ComponentAttrs {
    fn register<H: ChipHost + ?Sized>(host: &mut H) -> Result<Self> {
        let defaults = ComponentValues::default();
        Ok(Self {
            resistance: host.attr_init_float(ATTR_R, defaults.resistance as f32)?,
            resistance_exp: host.attr_init_float(ATTR_R_EXP, defaults.resistance_exp as f32)?,
            capacitance: host.attr_init_float(ATTR_C, defaults.capacitance as f32)?,
            capacitance_exp: host.attr_init_float(ATTR_C_EXP, defaults.capacitance_exp as f32)?,
        })
    }

    fn read<H: ChipHost + ?Sized>(&self, host: &H) -> ComponentValues {
        ComponentValues::new(
            f64::from(host.attr_read_float(self.resistance)),
            f64::from(host.attr_read_float(self.resistance_exp)),
            f64::from(host.attr_read_float(self.capacitance)),
            f64::from(host.attr_read_float(self.capacitance_exp)),
        )
    }
}

/// RC low-pass filter chip bound to a host.
#[derive(Debug, Clone)]
pub struct RcFilterChip {
    pin_in: PinId,
    pin_out: PinId,
    attrs: ComponentAttrs,
    timer: TimerId,
    model: FilterModel,
}

impl RcFilterChip {
    /// Register the chip with `host` and start its tick timer.
    pub fn initialize<H: ChipHost + ?Sized>(host: &mut H, config: FilterConfig) -> Result<Self> {
        config.validate()?;

        let pin_in = host.pin_init(PIN_IN, PinMode::Analog)?;
        let pin_out = host.pin_init(PIN_OUT, PinMode::Analog)?;
        let attrs = ComponentAttrs::register(host)?;
        let timer = host.timer_start(config.tick_period_us, true)?;

        debug!(
            "rc filter: in={} out={} timer={} every {} us",
            pin_in, pin_out, timer, config.tick_period_us
        );

        Ok(Self {
            pin_in,
            pin_out,
            attrs,
            timer,
            model: FilterModel::new(config),
        })
    }

    /// Run one filter tick against `host`.
    pub fn tick<H: ChipHost + ?Sized>(&mut self, host: &mut H) -> f32 {
        let input = f64::from(host.pin_adc_read(self.pin_in));
        let values = self.attrs.read(host);
        let output = self.model.tick(input, values) as f32;
        host.pin_dac_write(self.pin_out, output);
        output
    }

    /// Component values currently set on the host.
    pub fn component_values<H: ChipHost + ?Sized>(&self, host: &H) -> ComponentValues {
        self.attrs.read(host)
    }

    /// Timer driving this chip.
    pub fn timer(&self) -> TimerId {
        self.timer
    }

    /// The underlying filter model.
    pub fn model(&self) -> &FilterModel {
        &self.model
    }

    /// Mutable access to the filter model.
    pub fn model_mut(&mut self) -> &mut FilterModel {
        &mut self.model
    }
}

impl<H: ChipHost + ?Sized> TimerHandler<H> for RcFilterChip {
    fn on_timer(&mut self, host: &mut H, timer: TimerId) {
        if timer == self.timer {
            self.tick(host);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SimHost;
    use approx::assert_relative_eq;

    fn setup() -> (SimHost, RcFilterChip) {
        let mut host = SimHost::new();
        let chip = RcFilterChip::initialize(&mut host, FilterConfig::default()).unwrap();
        (host, chip)
    }

    #[test]
    fn test_initialize_registers_defaults() {
        let (host, chip) = setup();

        assert_eq!(host.pin_mode(PIN_IN), Some(PinMode::Analog));
        assert_eq!(host.pin_mode(PIN_OUT), Some(PinMode::Analog));
        assert_eq!(host.attribute(ATTR_R), Some(10.0));
        assert_eq!(host.attribute(ATTR_R_EXP), Some(2.0));
        assert_eq!(host.attribute(ATTR_C), Some(1.0));
        assert_eq!(host.attribute(ATTR_C_EXP), Some(-6.0));
        assert_eq!(host.active_timers(), 1);
        assert_eq!(chip.model().output_voltage(), 0.0);
        assert_eq!(chip.component_values(&host), ComponentValues::default());
    }

    #[test]
    fn test_initialize_rejects_bad_config() {
        let mut host = SimHost::new();
        let config = FilterConfig::new().with_tick_period_us(0);
        assert!(RcFilterChip::initialize(&mut host, config).is_err());
    }

    #[test]
    fn test_second_chip_on_same_host_fails() {
        let (mut host, _chip) = setup();
        assert!(RcFilterChip::initialize(&mut host, FilterConfig::default()).is_err());
    }

    #[test]
    fn test_timer_drives_output() {
        let (mut host, mut chip) = setup();
        host.set_input(PIN_IN, 5.0).unwrap();

        assert_eq!(host.advance(1000, &mut chip), 1);
        assert_relative_eq!(host.voltage(PIN_OUT).unwrap(), 3.1606, epsilon = 1e-3);

        assert_eq!(host.advance(1000, &mut chip), 1);
        assert_relative_eq!(host.voltage(PIN_OUT).unwrap(), 4.3233, epsilon = 1e-3);
        assert_eq!(host.dac_writes(), 2);
    }

    #[test]
    fn test_attribute_change_is_picked_up() {
        let (mut host, mut chip) = setup();
        host.set_input(PIN_IN, 1.0).unwrap();
        host.advance(1000, &mut chip);
        assert_eq!(chip.model().recompute_count(), 1);

        host.advance(5000, &mut chip);
        assert_eq!(chip.model().recompute_count(), 1);

        host.set_attribute(ATTR_C_EXP, -3.0).unwrap();
        host.advance(1000, &mut chip);
        assert_eq!(chip.model().recompute_count(), 2);
        assert_relative_eq!(chip.model().time_constant(), 1.0, max_relative = 1e-6);
    }

    #[test]
    fn test_foreign_timer_ignored() {
        let (mut host, mut chip) = setup();
        let other = host.timer_start(10, false).unwrap();
        chip.on_timer(&mut host, other);
        assert_eq!(host.dac_writes(), 0);
    }
}
