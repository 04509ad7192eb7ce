use serde_json::{Map, Value};

use crate::animation::keyframes::KeyFrames;
use crate::document::json::number;
use crate::foundation::core::{DEFAULT_MAX_ALPHA, DEFAULT_MIN_ALPHA, Tick};

/// Legacy time-of-day fade boundaries from `properties.fade`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeBounds {
    pub start_fade_in: Tick,
    pub end_fade_in: Tick,
    pub start_fade_out: Tick,
    pub end_fade_out: Tick,
    pub max_alpha: f64,
    pub min_alpha: f64,
}

impl FadeBounds {
    pub const BOUNDARY_KEYS: [&'static str; 4] =
        ["startFadeIn", "endFadeIn", "startFadeOut", "endFadeOut"];

    pub const ALPHA_KEYS: [&'static str; 2] = ["maxAlpha", "minAlpha"];

    /// Whether all four boundary keys are present, whatever their values.
    pub fn has_boundaries(fade: &Map<String, Value>) -> bool {
        Self::BOUNDARY_KEYS.iter().all(|k| fade.contains_key(*k))
    }

    /// Reads the boundaries from a fade object.
    ///
    /// Returns `None` unless all four boundary keys are present and numeric; a partial or
    /// malformed set is not an error. Non-numeric alphas fall back to their defaults.
    pub fn from_fade(fade: &Map<String, Value>) -> Option<Self> {
        let tick = |key: &str| fade.get(key).and_then(Value::as_f64).map(Tick::from_f64);
        Some(Self {
            start_fade_in: tick("startFadeIn")?,
            end_fade_in: tick("endFadeIn")?,
            start_fade_out: tick("startFadeOut")?,
            end_fade_out: tick("endFadeOut")?,
            max_alpha: number(fade, "maxAlpha").unwrap_or(DEFAULT_MAX_ALPHA),
            min_alpha: number(fade, "minAlpha").unwrap_or(DEFAULT_MIN_ALPHA),
        })
    }

    /// Boundaries paired with the alpha each one pins, in assignment order.
    pub fn stops(&self) -> [(Tick, f64); 4] {
        [
            (self.start_fade_in, self.min_alpha),
            (self.end_fade_in, self.max_alpha),
            (self.start_fade_out, self.max_alpha),
            (self.end_fade_out, self.min_alpha),
        ]
    }

    /// One fade cycle: in, hold, out. Coinciding boundaries resolve to the later stop.
    pub fn single_cycle(&self) -> KeyFrames {
        let mut kf = KeyFrames::new();
        for (tick, alpha) in self.stops() {
            kf.set(tick, alpha);
        }
        kf
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/fade.rs"]
mod tests;
