//! Component values of the RC network.

use crate::units::ComponentValue;

/// The four host attributes that describe the RC network.
///
/// Resistance and capacitance are each split into a mantissa and a
/// power-of-ten exponent, so `R = resistance * 10^resistance_exp` ohms and
/// `C = capacitance * 10^capacitance_exp` farads.
///
/// Equality is exact float equality. A NaN field therefore never compares
/// equal, which keeps the derived constants stale until the value is fixed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentValues {
    pub resistance: f64,
    pub resistance_exp: f64,
    pub capacitance: f64,
    pub capacitance_exp: f64,
}

impl ComponentValues {
    /// Default resistance mantissa (10 x 10^2 = 1 kOhm).
    pub const DEFAULT_RESISTANCE: f64 = 10.0;
    /// Default resistance exponent.
    pub const DEFAULT_RESISTANCE_EXP: f64 = 2.0;
    /// Default capacitance mantissa (1 x 10^-6 = 1 uF).
    pub const DEFAULT_CAPACITANCE: f64 = 1.0;
    /// Default capacitance exponent.
    pub const DEFAULT_CAPACITANCE_EXP: f64 = -6.0;

    /// Create a new set of component values.
    pub fn new(resistance: f64, resistance_exp: f64, capacitance: f64, capacitance_exp: f64) -> Self {
        Self {
            resistance,
            resistance_exp,
            capacitance,
            capacitance_exp,
        }
    }

    /// Build the attribute pairs from two engineering values.
    pub fn from_parts(resistance: ComponentValue, capacitance: ComponentValue) -> Self {
        Self::new(
            resistance.mantissa,
            resistance.exponent,
            capacitance.mantissa,
            capacitance.exponent,
        )
    }

    /// Time constant tau = R * C in seconds.
    pub fn time_constant(&self) -> f64 {
        self.resistance * self.capacitance * 10f64.powf(self.resistance_exp + self.capacitance_exp)
    }

    /// Effective resistance in ohms.
    pub fn ohms(&self) -> f64 {
        self.resistance * 10f64.powf(self.resistance_exp)
    }

    /// Effective capacitance in farads.
    pub fn farads(&self) -> f64 {
        self.capacitance * 10f64.powf(self.capacitance_exp)
    }
}

impl Default for ComponentValues {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_RESISTANCE,
            Self::DEFAULT_RESISTANCE_EXP,
            Self::DEFAULT_CAPACITANCE,
            Self::DEFAULT_CAPACITANCE_EXP,
        )
    }
}

/// Fraction of the remaining gap closed in one tick: `1 - exp(-dt / tau)`.
pub fn fractional_approach(tick_period_s: f64, time_constant: f64) -> f64 {
    let step_ratio = tick_period_s / time_constant;
    1.0 - (-step_ratio).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_time_constant() {
        let values = ComponentValues::default();
        assert_relative_eq!(values.time_constant(), 1e-3, max_relative = 1e-12);
        assert_relative_eq!(values.ohms(), 1_000.0, max_relative = 1e-12);
        assert_relative_eq!(values.farads(), 1e-6, max_relative = 1e-12);
    }

    #[test]
    fn test_fractional_approach_one_tau() {
        let frac = fractional_approach(1e-3, 1e-3);
        assert_relative_eq!(frac, 1.0 - (-1.0f64).exp(), max_relative = 1e-12);
        assert_relative_eq!(frac, 0.6321, epsilon = 1e-4);
    }

    #[test]
    fn test_fractional_approach_limits() {
        // Very slow filter barely moves, very fast filter closes the whole gap.
        assert!(fractional_approach(1e-3, 1e3) < 1e-5);
        assert_relative_eq!(fractional_approach(1e-3, 1e-7), 1.0);
    }

    #[test]
    fn test_nan_values_never_equal() {
        let values = ComponentValues::new(f64::NAN, 2.0, 1.0, -6.0);
        assert_ne!(values, values);
    }
}
