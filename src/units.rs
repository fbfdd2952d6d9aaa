//! Engineering-notation component values.
//!
//! Hosts describe a component as a mantissa plus a power-of-ten exponent
//! (`R=10`, `Rexp=2`). People write `1k`. This module converts between the
//! two.

/// Parse a value with an optional SI suffix.
///
/// Supported suffixes: `p`, `n`, `u`/`µ`, `m`, `k`/`K`, `M`, `G`.
pub fn parse_value(text: &str) -> Option<f64> {
    let value = ComponentValue::parse(text)?;
    Some(value.value())
}

/// Power-of-ten exponent for an SI suffix character.
fn suffix_exponent(c: char) -> Option<i32> {
    match c {
        'p' => Some(-12),
        'n' => Some(-9),
        'u' | 'µ' => Some(-6),
        'm' => Some(-3),
        'k' | 'K' => Some(3),
        'M' => Some(6),
        'G' => Some(9),
        _ => None,
    }
}

/// A component value split into mantissa and decimal exponent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentValue {
    pub mantissa: f64,
    pub exponent: f64,
}

impl ComponentValue {
    /// Create a new value from its parts.
    pub fn new(mantissa: f64, exponent: f64) -> Self {
        Self { mantissa, exponent }
    }

    /// Parse engineering notation, keeping the suffix as the exponent.
    ///
    /// `"4.7u"` becomes mantissa 4.7 and exponent -6. A plain number keeps
    /// exponent 0.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let last = text.chars().last()?;

        let (num_str, exponent) = match suffix_exponent(last) {
            Some(exp) => (&text[..text.len() - last.len_utf8()], exp),
            None => (text, 0),
        };

        let mantissa = num_str.parse::<f64>().ok()?;
        if !mantissa.is_finite() {
            return None;
        }
        Some(Self::new(mantissa, f64::from(exponent)))
    }

    /// The combined value `mantissa * 10^exponent`.
    pub fn value(&self) -> f64 {
        self.mantissa * 10f64.powf(self.exponent)
    }
}
