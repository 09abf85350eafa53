//! Options controlling how projections are reported.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Largest number of decimal places honoured. Larger settings are clamped.
pub const MAX_DECIMALS: u32 = 15;

/// Tie-breaking rule applied when rounding reported values.
///
/// Rounding works on the exact binary value of the `f64`, so only values
/// that are exact ties in binary (such as `0.0625`) are affected by the
/// rule. `1.0005` is stored as `1.000499999...` and rounds down to `1.0` at
/// three places under both rules; `2.0005` is stored as `2.000500...01` and
/// rounds up to `2.001` under both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// `x.5` rounds away from zero (`0.0625` -> `0.063` at 3 places).
    #[default]
    HalfAwayFromZero,
    /// `x.5` rounds to the even neighbour (`0.0625` -> `0.062` at 3 places).
    HalfToEven,
}

impl Rounding {
    fn strategy(self) -> RoundingStrategy {
        match self {
            Rounding::HalfAwayFromZero => RoundingStrategy::MidpointAwayFromZero,
            Rounding::HalfToEven => RoundingStrategy::MidpointNearestEven,
        }
    }

    /// Rounds `value` to `decimals` places (at most [`MAX_DECIMALS`]).
    /// Non-finite values and values too large to carry a fraction are
    /// returned unchanged.
    pub fn apply(self, value: f64, decimals: u32) -> f64 {
        let Some(exact) = Decimal::from_f64_retain(value) else {
            return value;
        };
        let rounded = exact.round_dp_with_strategy(decimals.min(MAX_DECIMALS), self.strategy());
        // Adding zero folds `-0.0` into `0.0`.
        rounded
            .to_string()
            .parse::<f64>()
            .map_or(value, |v| v + 0.0)
    }

    /// Parses a rounding mode name. Case insensitive.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "half-away" | "half_away_from_zero" | "away" => Some(Self::HalfAwayFromZero),
            "half-even" | "half_to_even" | "even" | "bankers" => Some(Self::HalfToEven),
            _ => None,
        }
    }
}

/// What a reported chainage is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainageReference {
    /// Arc length from the first centerline vertex.
    #[default]
    ArcLength,
    /// Stored vertex chainages, interpolated linearly along each segment.
    Stored,
}

/// Settings for a projection run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionOptions {
    /// Decimal places kept in chainage and offset, clamped to
    /// [`MAX_DECIMALS`].
    pub decimals: u32,
    pub rounding: Rounding,
    pub chainage_reference: ChainageReference,
    /// Spread the per-point loop over the rayon thread pool. Ignored when
    /// the crate is built without the `parallel` feature.
    pub parallel: bool,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            decimals: 3,
            rounding: Rounding::HalfAwayFromZero,
            chainage_reference: ChainageReference::ArcLength,
            parallel: false,
        }
    }
}

impl ProjectionOptions {
    /// Decimal places actually applied.
    pub fn decimals(&self) -> u32 {
        self.decimals.min(MAX_DECIMALS)
    }

    pub fn round(&self, value: f64) -> f64 {
        self.rounding.apply(value, self.decimals())
    }

    /// Formats a value with exactly `decimals` places.
    pub fn format(&self, value: f64) -> String {
        format!("{:.*}", self.decimals() as usize, self.round(value))
    }
}
