/// Ticks in one in-game day.
pub const TICKS_PER_DAY: i64 = 24_000;

/// Only documents carrying this `schemaVersion` are migrated.
pub const SOURCE_SCHEMA_VERSION: i64 = 2;

/// `schemaVersion` written to migrated documents.
pub const TARGET_SCHEMA_VERSION: i64 = 1;

/// Default fade-in/fade-out margin around a loop range, in ticks.
pub const DEFAULT_TRANSITION_TICKS: f64 = 20.0;

/// Loops spanning more days than this are not unrolled.
pub const MAX_LOOP_DAYS: f64 = 100_000.0;

/// Default `maxAlpha` of a fade.
pub const DEFAULT_MAX_ALPHA: f64 = 1.0;

/// Default `minAlpha` of a fade.
pub const DEFAULT_MIN_ALPHA: f64 = 0.0;

/// Absolute in-game time, in ticks. Not bounded above.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Tick(pub i64);

impl Tick {
    /// Tick zero.
    pub const ZERO: Tick = Tick(0);

    /// Truncates a JSON number to a tick (toward zero).
    pub fn from_f64(v: f64) -> Self {
        Self(v.trunc() as i64)
    }

    /// The tick as a float, for range comparisons.
    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }
}

impl std::fmt::Display for Tick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
