//! WASM bindings for the RC filter.
//!
//! Drives the filter model directly from JavaScript, without a chip host:
//!
//! ```javascript
//! import init, { WasmRcFilter } from 'rc_filter_chip';
//!
//! await init();
//!
//! const filter = new WasmRcFilter();
//! filter.set_resistance(10, 3);     // 10 kOhm
//! filter.set_capacitance(100, -9);  // 100 nF
//!
//! const out = new Float32Array(input.length);
//! filter.process_block(input, out);
//! ```

use wasm_bindgen::prelude::*;

use crate::filter::{ComponentValues, FilterConfig, FilterModel, DEFAULT_TICK_PERIOD_US};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// WASM-compatible RC filter.
#[wasm_bindgen]
pub struct WasmRcFilter {
    model: FilterModel,
    values: ComponentValues,
}

#[wasm_bindgen]
impl WasmRcFilter {
    /// Create a filter with the default 1 kOhm / 1 uF network and 1 ms ticks.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmRcFilter {
        WasmRcFilter {
            model: FilterModel::default(),
            values: ComponentValues::default(),
        }
    }

    /// Create a filter with a custom tick period.
    #[wasm_bindgen]
    pub fn with_tick_period(tick_period_us: u32) -> Result<WasmRcFilter, JsValue> {
        let config = FilterConfig::new().with_tick_period_us(tick_period_us);
        config.validate().map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmRcFilter {
            model: FilterModel::new(config),
            values: ComponentValues::default(),
        })
    }

    /// Set the resistance as `value * 10^exponent` ohms.
    #[wasm_bindgen]
    pub fn set_resistance(&mut self, value: f64, exponent: f64) {
        self.values.resistance = value;
        self.values.resistance_exp = exponent;
    }

    /// Set the capacitance as `value * 10^exponent` farads.
    #[wasm_bindgen]
    pub fn set_capacitance(&mut self, value: f64, exponent: f64) {
        self.values.capacitance = value;
        self.values.capacitance_exp = exponent;
    }

    /// Run one tick with `input` volts and return the output voltage.
    #[wasm_bindgen]
    pub fn tick(&mut self, input: f32) -> f32 {
        self.model.tick(f64::from(input), self.values) as f32
    }

    /// Run one tick per input sample, writing into `output`.
    #[wasm_bindgen]
    pub fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        for (out, &sample) in output.iter_mut().zip(input) {
            *out = self.tick(sample);
        }
    }

    /// Time constant in seconds (0 before the first tick).
    #[wasm_bindgen(getter)]
    pub fn time_constant(&self) -> f64 {
        self.model.time_constant()
    }

    /// Fraction of the gap closed per tick.
    #[wasm_bindgen(getter)]
    pub fn fractional_approach(&self) -> f64 {
        self.model.fractional_approach()
    }

    /// Current output voltage.
    #[wasm_bindgen(getter)]
    pub fn output_voltage(&self) -> f64 {
        self.model.output_voltage()
    }
}

impl Default for WasmRcFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Get the default tick period in microseconds.
#[wasm_bindgen]
pub fn default_tick_period_us() -> u32 {
    DEFAULT_TICK_PERIOD_US
}
