//! Expansion of a legacy `conditions.loop` into an explicit multi-day fade timeline.
//!
//! A loop says "repeat this fade for `days` days, but only while inside `ranges`". The
//! newer schema has no such condition, so the whole loop is unrolled into absolute ticks
//! spanning `[0, duration)`, filtered to the ranges, and pinned to `minAlpha` just outside
//! each range so the layer fades out between active windows.

use serde_json::{Map, Value};

use crate::animation::fade::FadeBounds;
use crate::animation::keyframes::KeyFrames;
use crate::document::json::number;
use crate::foundation::core::{DEFAULT_TRANSITION_TICKS, MAX_LOOP_DAYS, TICKS_PER_DAY, Tick};

/// A `{min, max}` pair. Day-relative in the input, absolute ticks after rescaling.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimeRange {
    pub min: f64,
    pub max: f64,
}

impl TimeRange {
    /// Inclusive on both ends. An inverted range contains nothing.
    pub fn contains(&self, tick: Tick) -> bool {
        let t = tick.as_f64();
        self.min <= t && t <= self.max
    }
}

/// Legacy `conditions.loop` object.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LoopCondition {
    #[serde(default)]
    pub days: f64,
    #[serde(default)]
    pub ranges: Vec<TimeRange>,
}

impl LoopCondition {
    /// Parses a loop object. A malformed loop is logged and read as having no ranges.
    pub fn from_json(v: &Value) -> Self {
        serde_json::from_value(v.clone()).unwrap_or_else(|err| {
            tracing::warn!("malformed conditions.loop treated as no loop: {err}");
            Self {
                days: 0.0,
                ranges: Vec::new(),
            }
        })
    }

    /// Zero, negative or absurdly many days, or no ranges: nothing to unroll.
    pub fn is_degenerate(&self) -> bool {
        !(self.days.is_finite() && self.days > 0.0)
            || self.days > MAX_LOOP_DAYS
            || self.ranges.is_empty()
    }

    /// Total loop length in ticks, truncated.
    pub fn fade_duration(&self) -> Tick {
        Tick((TICKS_PER_DAY as f64 * self.days).floor() as i64)
    }

    /// Number of day iterations; a fractional last day still counts.
    pub fn day_count(&self) -> i64 {
        self.days.ceil() as i64
    }

    /// Ranges rescaled from day fractions to absolute ticks across the whole loop.
    pub fn rescaled_ranges(&self) -> Vec<TimeRange> {
        let duration = self.fade_duration().as_f64();
        self.ranges
            .iter()
            .map(|r| TimeRange {
                min: duration * (r.min / self.days),
                max: duration * (r.max / self.days),
            })
            .collect()
    }
}

/// Margins added before and after every active range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transitions {
    pub in_ticks: f64,
    pub out_ticks: f64,
}

impl Default for Transitions {
    fn default() -> Self {
        Self {
            in_ticks: DEFAULT_TRANSITION_TICKS,
            out_ticks: DEFAULT_TRANSITION_TICKS,
        }
    }
}

impl Transitions {
    /// Reads `transitionInDuration`/`transitionOutDuration` from `properties`.
    /// Non-numeric values fall back to the default.
    pub fn from_properties(props: &Map<String, Value>) -> Self {
        let d = Self::default();
        Self {
            in_ticks: number(props, "transitionInDuration").unwrap_or(d.in_ticks),
            out_ticks: number(props, "transitionOutDuration").unwrap_or(d.out_ticks),
        }
    }
}

/// Result of unrolling a loop.
#[derive(Clone, Debug, PartialEq)]
pub struct LoopExpansion {
    pub duration: Tick,
    pub ranges: Vec<TimeRange>,
    pub key_frames: KeyFrames,
}

/// Maps a time-of-day boundary onto day `day` (1-based) of the loop.
///
/// Midnight on day 1 is tick 0; midnight on any later day maps to `24000 * day - 1`.
/// Any other time of day is scaled by the day index rather than offset by whole days; the
/// resulting curve is only exact for day 1, which is why expanded documents get flagged
/// for a manual check.
pub fn absolute_tick(t: Tick, day: i64) -> Tick {
    match (t.0, day) {
        (0, 1) => Tick::ZERO,
        (0, _) => Tick(TICKS_PER_DAY * day - 1),
        (t, d) => Tick(t * d),
    }
}

/// Unrolls `cond` into absolute keyframes. Returns `None` for a degenerate loop.
pub fn expand(
    cond: &LoopCondition,
    bounds: &FadeBounds,
    transitions: Transitions,
) -> Option<LoopExpansion> {
    if cond.is_degenerate() {
        if cond.days > MAX_LOOP_DAYS {
            tracing::warn!(
                days = cond.days,
                "loop longer than {MAX_LOOP_DAYS} days treated as no loop"
            );
        }
        return None;
    }

    let duration = cond.fade_duration();
    let ranges = cond.rescaled_ranges();

    let mut key_frames = KeyFrames::new();
    for day in 1..=cond.day_count() {
        for (t, alpha) in bounds.stops() {
            key_frames.set(absolute_tick(t, day), alpha);
        }
    }

    key_frames.retain(|tick, _| ranges.iter().any(|r| r.contains(tick)));

    // Margins are pinned regardless of what survived filtering.
    let last = Tick(duration.0 - 1);
    for r in &ranges {
        let lead_in = r.min - transitions.in_ticks;
        let start = if lead_in < 0.0 {
            Tick::ZERO
        } else {
            Tick::from_f64(lead_in)
        };
        let tail = r.max + transitions.out_ticks;
        let end = if tail > last.as_f64() {
            last
        } else {
            Tick::from_f64(tail)
        };
        key_frames.set(start, bounds.min_alpha);
        key_frames.set(end, bounds.min_alpha);
    }

    Some(LoopExpansion {
        duration,
        ranges,
        key_frames,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/animation/loop_expand.rs"]
mod tests;
