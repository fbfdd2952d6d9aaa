//! # RC Filter Chip
//!
//! A resistor-capacitor low-pass filter packaged as a "custom chip" for
//! circuit-simulation hosts.
//!
//! The chip has one analog input (`IN`), one analog output (`OUT`) and four
//! float attributes describing the network: `R`/`Rexp` and `C`/`Cexp`, read
//! as `R * 10^Rexp` ohms and `C * 10^Cexp` farads. A repeating 1 ms timer
//! samples the input and moves the output toward it by
//! `1 - exp(-dt / RC)` of the remaining gap.
//!
//! ## Architecture
//!
//! - [`filter`] - Filter state, cached constants, guards and the tick update
//! - [`host`] - Host boundary traits and the in-memory [`SimHost`]
//! - [`chip`] - The filter bound to host pins, attributes and a timer
//! - [`units`] - Engineering-notation component values (`10k`, `4.7u`)
//! - [`stream`] - Raw `f32le` sample streams, one sample per tick (CLI)
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! rcfilter -R 10k -C 100n < in.f32 > out.f32
//! rcfilter --step 5 --ticks 10
//! ```
//!
//! ### Library
//!
//! ```
//! use rc_filter_chip::{FilterConfig, RcFilterChip, SimHost};
//!
//! let mut host = SimHost::new();
//! let mut chip = RcFilterChip::initialize(&mut host, FilterConfig::default())?;
//!
//! host.set_input("IN", 5.0)?;
//! host.advance(1000, &mut chip);
//! assert!(host.voltage("OUT").unwrap() > 3.0);
//! # Ok::<(), rc_filter_chip::RcFilterError>(())
//! ```
//!
//! ### Simulator plugin
//!
//! Build for `wasm32` with the `wokwi` feature; the module exports
//! `chip_init` and talks to the simulator through its imported pin,
//! attribute and timer API.

pub mod chip;
pub mod error;
pub mod filter;
pub mod host;
pub mod stream;
pub mod units;

// Re-export main types for convenience
pub use chip::RcFilterChip;
pub use error::{RcFilterError, Result};
pub use filter::{ComponentValues, FilterConfig, FilterModel};
pub use host::{ChipHost, SimHost, TimerHandler};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmRcFilter;

// Simulator plugin ABI
#[cfg(feature = "wokwi")]
mod wokwi;

pub use filter::DEFAULT_TICK_PERIOD_US;
