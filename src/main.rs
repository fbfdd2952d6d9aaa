//! rcfilter - RC low-pass filter chip runner
//!
//! Runs the filter chip on a simulated host, one tick per input sample.
//!
//! # Usage
//!
//! ```bash
//! rcfilter -R 10k -C 100n < in.f32 > out.f32
//! rcfilter --step 5 --ticks 10
//! ```

use std::io::{self, Write};

use clap::Parser;
use log::info;
use rc_filter_chip::{
    error::{RcFilterError, Result},
    stream::{process_stream, ChipDriver},
    units::ComponentValue,
    ComponentValues, FilterConfig, DEFAULT_TICK_PERIOD_US,
};

/// RC low-pass filter chip runner
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Resistance in ohms, engineering notation allowed (e.g. 10k) [default: 1k]
    #[arg(short = 'R', long, value_name = "VALUE")]
    resistance: Option<String>,

    /// Capacitance in farads, engineering notation allowed (e.g. 100n) [default: 1u]
    #[arg(short = 'C', long, value_name = "VALUE")]
    capacitance: Option<String>,

    /// Tick period in microseconds
    #[arg(long, value_name = "US", default_value_t = DEFAULT_TICK_PERIOD_US)]
    tick_us: u32,

    /// Hold the input at this voltage and print the response as text
    /// instead of streaming f32le samples from stdin
    #[arg(long, value_name = "VOLTS")]
    step: Option<f32>,

    /// Number of ticks to run in --step mode
    #[arg(long, default_value_t = 10)]
    ticks: u64,

    /// Log filter diagnostics
    #[arg(short, long)]
    verbose: bool,
}

fn parse_component(component: &str, text: Option<&str>, default: ComponentValue) -> Result<ComponentValue> {
    match text {
        Some(text) => ComponentValue::parse(text)
            .ok_or_else(|| RcFilterError::invalid_component_value(component, text)),
        None => Ok(default),
    }
}

fn component_values(args: &Args) -> Result<ComponentValues> {
    let defaults = ComponentValues::default();
    let resistance = parse_component(
        "resistance",
        args.resistance.as_deref(),
        ComponentValue::new(defaults.resistance, defaults.resistance_exp),
    )?;
    let capacitance = parse_component(
        "capacitance",
        args.capacitance.as_deref(),
        ComponentValue::new(defaults.capacitance, defaults.capacitance_exp),
    )?;
    Ok(ComponentValues::from_parts(resistance, capacitance))
}

fn run_step(driver: &mut ChipDriver, volts: f32, ticks: u64) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let to_err = |e: io::Error| RcFilterError::StreamOutput {
        message: e.to_string(),
    };

    writeln!(out, "tick,input,output").map_err(to_err)?;
    for tick in 1..=ticks {
        let v_out = driver.step(volts)?;
        writeln!(out, "{},{:.6},{:.6}", tick, volts, v_out).map_err(to_err)?;
    }
    out.flush().map_err(to_err)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let values = component_values(&args)?;
    let config = FilterConfig::new()
        .with_tick_period_us(args.tick_us)
        .with_verbose(args.verbose);

    info!(
        "R={} ohm C={} F tau={} s tick={} us",
        values.ohms(),
        values.farads(),
        values.time_constant(),
        config.tick_period_us
    );

    let mut driver = ChipDriver::new(values, config)?;

    match args.step {
        Some(volts) => run_step(&mut driver, volts, args.ticks)?,
        None => {
            let ticks = process_stream(&mut driver, io::stdin().lock(), io::stdout().lock())?;
            info!("processed {} ticks", ticks);
        }
    }

    Ok(())
}
