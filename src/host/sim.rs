//! In-memory host with a simulated microsecond clock.
//!
//! [`SimHost`] stands in for the circuit simulator: it stores pin voltages
//! and attribute values by name and fires timers as simulated time is
//! advanced. Diagram-level attribute overrides can be seeded before a chip
//! registers its attributes, the same way a netlist overrides a chip's
//! declared defaults.

use std::collections::HashMap;

use log::debug;

use crate::error::{RcFilterError, Result};

use super::{AttrId, ChipHost, PinId, PinMode, TimerHandler, TimerId};

#[derive(Debug, Clone)]
struct SimPin {
    name: String,
    mode: PinMode,
    voltage: f32,
}

#[derive(Debug, Clone)]
struct SimAttr {
    name: String,
    value: f32,
}

#[derive(Debug, Clone)]
struct SimTimer {
    period_us: u64,
    repeat: bool,
    /// Absolute due time, `None` once a one-shot timer has fired
    next_due_us: Option<u64>,
}

/// Simulated chip host.
#[derive(Debug, Clone, Default)]
pub struct SimHost {
    pins: Vec<SimPin>,
    attrs: Vec<SimAttr>,
    overrides: HashMap<String, f32>,
    timers: Vec<SimTimer>,
    now_us: u64,
    dac_writes: usize,
}

impl SimHost {
    /// Create an empty host at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an attribute value that overrides the chip's default when the
    /// chip registers `name`.
    pub fn with_attribute(mut self, name: impl Into<String>, value: f32) -> Self {
        self.overrides.insert(name.into(), value);
        self
    }

    /// Current simulated time in microseconds.
    pub fn now_us(&self) -> u64 {
        self.now_us
    }

    /// Number of analog writes performed by chips so far.
    pub fn dac_writes(&self) -> usize {
        self.dac_writes
    }

    /// Drive the voltage seen by the chip on pin `name`.
    pub fn set_input(&mut self, name: &str, voltage: f32) -> Result<()> {
        let pin = self.find_pin_mut(name)?;
        pin.voltage = voltage;
        Ok(())
    }

    /// Voltage currently on pin `name`.
    pub fn voltage(&self, name: &str) -> Option<f32> {
        self.pins.iter().find(|p| p.name == name).map(|p| p.voltage)
    }

    /// Mode pin `name` was registered with.
    pub fn pin_mode(&self, name: &str) -> Option<PinMode> {
        self.pins.iter().find(|p| p.name == name).map(|p| p.mode)
    }

    /// Change a registered attribute, as a user editing the part would.
    pub fn set_attribute(&mut self, name: &str, value: f32) -> Result<()> {
        let attr = self
            .attrs
            .iter_mut()
            .find(|a| a.name == name)
            .ok_or_else(|| RcFilterError::UnknownAttribute {
                name: name.to_string(),
            })?;
        attr.value = value;
        Ok(())
    }

    /// Current value of attribute `name`.
    pub fn attribute(&self, name: &str) -> Option<f32> {
        self.attrs.iter().find(|a| a.name == name).map(|a| a.value)
    }

    /// Number of timers that are still armed.
    pub fn active_timers(&self) -> usize {
        self.timers.iter().filter(|t| t.next_due_us.is_some()).count()
    }

    /// Advance simulated time by `elapsed_us`, firing every timer that
    /// falls due on the way.
    ///
    /// Timers fire in due-time order (ties by creation order), with the
    /// clock set to each timer's due time during its callback. Returns the
    /// number of callbacks fired.
    pub fn advance<T>(&mut self, elapsed_us: u64, handler: &mut T) -> usize
    where
        T: TimerHandler<Self> + ?Sized,
    {
        let end = self.now_us.saturating_add(elapsed_us);
        let mut fired = 0;

        while let Some((idx, due)) = self.next_due(end) {
            self.now_us = due;
            let timer = &mut self.timers[idx];
            timer.next_due_us = if timer.repeat {
                Some(due + timer.period_us)
            } else {
                None
            };

            handler.on_timer(self, TimerId(idx as u32));
            fired += 1;
        }

        self.now_us = end;
        fired
    }

    fn next_due(&self, end: u64) -> Option<(usize, u64)> {
        self.timers
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.next_due_us.filter(|&due| due <= end).map(|due| (i, due)))
            .min_by_key(|&(i, due)| (due, i))
    }

    fn find_pin_mut(&mut self, name: &str) -> Result<&mut SimPin> {
        self.pins
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| RcFilterError::UnknownPin {
                name: name.to_string(),
            })
    }
}

fn check_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains('\0') {
        return Err(RcFilterError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

impl ChipHost for SimHost {
    fn pin_init(&mut self, name: &str, mode: PinMode) -> Result<PinId> {
        check_name(name)?;
        if self.pins.iter().any(|p| p.name == name) {
            return Err(RcFilterError::DuplicatePin {
                name: name.to_string(),
            });
        }

        let id = PinId(self.pins.len() as u32);
        self.pins.push(SimPin {
            name: name.to_string(),
            mode,
            voltage: 0.0,
        });
        debug!("sim: pin {} registered as {}", name, id);
        Ok(id)
    }

    fn pin_adc_read(&mut self, pin: PinId) -> f32 {
        self.pins.get(pin.0 as usize).map_or(0.0, |p| p.voltage)
    }

    fn pin_dac_write(&mut self, pin: PinId, voltage: f32) {
        if let Some(p) = self.pins.get_mut(pin.0 as usize) {
            p.voltage = voltage;
            self.dac_writes += 1;
        }
    }

    fn attr_init_float(&mut self, name: &str, default: f32) -> Result<AttrId> {
        check_name(name)?;
        if self.attrs.iter().any(|a| a.name == name) {
            return Err(RcFilterError::DuplicateAttribute {
                name: name.to_string(),
            });
        }

        let value = self.overrides.get(name).copied().unwrap_or(default);
        let id = AttrId(self.attrs.len() as u32);
        self.attrs.push(SimAttr {
            name: name.to_string(),
            value,
        });
        debug!("sim: attribute {}={} registered as {}", name, value, id);
        Ok(id)
    }

    fn attr_read_float(&self, attr: AttrId) -> f32 {
        self.attrs.get(attr.0 as usize).map_or(0.0, |a| a.value)
    }

    fn timer_start(&mut self, period_us: u32, repeat: bool) -> Result<TimerId> {
        if period_us == 0 {
            return Err(RcFilterError::invalid_timer("period must be at least 1 us"));
        }

        let period_us = u64::from(period_us);
        let id = TimerId(self.timers.len() as u32);
        self.timers.push(SimTimer {
            period_us,
            repeat,
            next_due_us: Some(self.now_us + period_us),
        });
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records which timer fired at what time.
    #[derive(Default)]
    struct Recorder {
        fired: Vec<(TimerId, u64)>,
    }

    impl TimerHandler<SimHost> for Recorder {
        fn on_timer(&mut self, host: &mut SimHost, timer: TimerId) {
            self.fired.push((timer, host.now_us()));
        }
    }

    #[test]
    fn test_pins_read_back() {
        let mut host = SimHost::new();
        let input = host.pin_init("IN", PinMode::Analog).unwrap();
        let output = host.pin_init("OUT", PinMode::Analog).unwrap();

        host.set_input("IN", 3.3).unwrap();
        assert_eq!(host.pin_adc_read(input), 3.3);

        host.pin_dac_write(output, 1.25);
        assert_eq!(host.voltage("OUT"), Some(1.25));
        assert_eq!(host.dac_writes(), 1);
        assert_eq!(host.pin_mode("OUT"), Some(PinMode::Analog));
    }

    #[test]
    fn test_duplicate_and_invalid_names() {
        let mut host = SimHost::new();
        host.pin_init("IN", PinMode::Analog).unwrap();
        assert!(matches!(
            host.pin_init("IN", PinMode::Analog),
            Err(RcFilterError::DuplicatePin { .. })
        ));
        assert!(matches!(
            host.pin_init("", PinMode::Analog),
            Err(RcFilterError::InvalidName { .. })
        ));

        host.attr_init_float("R", 1.0).unwrap();
        assert!(matches!(
            host.attr_init_float("R", 2.0),
            Err(RcFilterError::DuplicateAttribute { .. })
        ));
        assert!(matches!(
            host.attr_init_float("R\0", 2.0),
            Err(RcFilterError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_attribute_override_wins_over_default() {
        let mut host = SimHost::new().with_attribute("C", 4.7);
        let c = host.attr_init_float("C", 1.0).unwrap();
        let r = host.attr_init_float("R", 10.0).unwrap();

        assert_eq!(host.attr_read_float(c), 4.7);
        assert_eq!(host.attr_read_float(r), 10.0);

        host.set_attribute("R", 22.0).unwrap();
        assert_eq!(host.attr_read_float(r), 22.0);
        assert!(host.set_attribute("L", 1.0).is_err());
    }

    #[test]
    fn test_repeating_timer_fires_each_period() {
        let mut host = SimHost::new();
        let timer = host.timer_start(1000, true).unwrap();
        let mut recorder = Recorder::default();

        assert_eq!(host.advance(999, &mut recorder), 0);
        assert_eq!(host.advance(1, &mut recorder), 1);
        assert_eq!(host.advance(3000, &mut recorder), 3);

        let times: Vec<u64> = recorder.fired.iter().map(|&(_, t)| t).collect();
        assert_eq!(times, vec![1000, 2000, 3000, 4000]);
        assert!(recorder.fired.iter().all(|&(id, _)| id == timer));
        assert_eq!(host.now_us(), 4000);
    }

    #[test]
    fn test_timers_fire_in_due_order() {
        let mut host = SimHost::new();
        let slow = host.timer_start(300, true).unwrap();
        let fast = host.timer_start(200, false).unwrap();
        let mut recorder = Recorder::default();

        host.advance(600, &mut recorder);

        assert_eq!(
            recorder.fired,
            vec![(fast, 200), (slow, 300), (slow, 600)]
        );
        assert_eq!(host.active_timers(), 1);
    }

    #[test]
    fn test_zero_period_rejected() {
        let mut host = SimHost::new();
        assert!(matches!(
            host.timer_start(0, true),
            Err(RcFilterError::InvalidTimer { .. })
        ));
    }

    #[test]
    fn test_unknown_handles_are_inert() {
        let mut host = SimHost::new();
        assert_eq!(host.pin_adc_read(PinId(9)), 0.0);
        host.pin_dac_write(PinId(9), 1.0);
        assert_eq!(host.dac_writes(), 0);
        assert_eq!(host.attr_read_float(AttrId(3)), 0.0);
        assert!(host.set_input("IN", 1.0).is_err());
    }
}
