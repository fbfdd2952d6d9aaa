//! C ABI chip surface for hosts that load the filter as a wasm32 module.
//!
//! The host imports below are provided by the simulator at load time; the
//! module exports `chip_init`, which the simulator calls once. From there
//! the chip runs entirely from its timer callback.
//!
//! The chip is leaked on purpose: it lives as long as the simulation and the
//! host holds its address as timer user data.

use std::ffi::{c_char, c_void, CString};

use log::error;

use crate::chip::RcFilterChip;
use crate::error::{RcFilterError, Result};
use crate::filter::FilterConfig;
use crate::host::{AttrId, ChipHost, PinId, PinMode, TimerId};

#[repr(C)]
struct TimerConfig {
    user_data: *mut c_void,
    callback: Option<unsafe extern "C" fn(*mut c_void)>,
    reserved: [u32; 8],
}

extern "C" {
    fn pin_init(name: *const c_char, mode: u32) -> u32;
    fn pin_adc_read(pin: u32) -> f32;
    fn pin_dac_write(pin: u32, voltage: f32);
    fn attr_init_float(name: *const c_char, default_value: f32) -> u32;
    fn attr_read_float(attr_id: u32) -> f32;
    fn timer_init(config: *const TimerConfig) -> u32;
    fn timer_start(timer_id: u32, micros: u32, repeat: bool);
}

/// Storage for the chip, filled in once `chip_init` has registered it.
struct ChipSlot {
    chip: Option<RcFilterChip>,
}

/// [`ChipHost`] backed by the imported simulator API.
struct WokwiHost {
    /// Passed back to [`on_timer_event`] by every timer started through this host
    user_data: *mut c_void,
}

fn c_name(name: &str) -> Result<CString> {
    if name.is_empty() {
        return Err(RcFilterError::InvalidName {
            name: name.to_string(),
        });
    }
    CString::new(name).map_err(|_| RcFilterError::InvalidName {
        name: name.to_string(),
    })
}

impl ChipHost for WokwiHost {
    fn pin_init(&mut self, name: &str, mode: PinMode) -> Result<PinId> {
        let name = c_name(name)?;
        // SAFETY: `name` is a valid NUL-terminated string for the duration of the call.
        let id = unsafe { pin_init(name.as_ptr(), mode.code()) };
        Ok(PinId(id))
    }

    fn pin_adc_read(&mut self, pin: PinId) -> f32 {
        // SAFETY: plain value call into the host.
        unsafe { pin_adc_read(pin.0) }
    }

    fn pin_dac_write(&mut self, pin: PinId, voltage: f32) {
        // SAFETY: plain value call into the host.
        unsafe { pin_dac_write(pin.0, voltage) }
    }

    fn attr_init_float(&mut self, name: &str, default: f32) -> Result<AttrId> {
        let name = c_name(name)?;
        // SAFETY: `name` is a valid NUL-terminated string for the duration of the call.
        let id = unsafe { attr_init_float(name.as_ptr(), default) };
        Ok(AttrId(id))
    }

    fn attr_read_float(&self, attr: AttrId) -> f32 {
        // SAFETY: plain value call into the host.
        unsafe { attr_read_float(attr.0) }
    }

    fn timer_start(&mut self, period_us: u32, repeat: bool) -> Result<TimerId> {
        if period_us == 0 {
            return Err(RcFilterError::invalid_timer("period must be at least 1 us"));
        }

        let config = TimerConfig {
            user_data: self.user_data,
            callback: Some(on_timer_event),
            reserved: [0; 8],
        };
        // SAFETY: `config` outlives `timer_init`, which copies it.
        let id = unsafe {
            let id = timer_init(&config);
            timer_start(id, period_us, repeat);
            id
        };
        Ok(TimerId(id))
    }
}

unsafe extern "C" fn on_timer_event(user_data: *mut c_void) {
    // SAFETY: `user_data` is the leaked `ChipSlot` from `chip_init`, and the
    // host never runs two callbacks at once.
    let slot = unsafe { &mut *user_data.cast::<ChipSlot>() };
    if let Some(chip) = slot.chip.as_mut() {
        let mut host = WokwiHost { user_data };
        chip.tick(&mut host);
    }
}

/// ABI version handshake read by the simulator.
#[no_mangle]
pub extern "C" fn __wokwi_api_version_1() -> u32 {
    1
}

/// Chip entry point, called once by the simulator.
#[no_mangle]
pub extern "C" fn chip_init() {
    let slot = Box::into_raw(Box::new(ChipSlot { chip: None }));
    let mut host = WokwiHost {
        user_data: slot.cast(),
    };

    match RcFilterChip::initialize(&mut host, FilterConfig::default()) {
        // SAFETY: `slot` was just allocated and no timer can fire before `chip_init` returns.
        Ok(chip) => unsafe { (*slot).chip = Some(chip) },
        Err(e) => error!("rc filter: chip_init failed: {}", e),
    }
}
