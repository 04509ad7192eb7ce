use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::foundation::core::Tick;

/// One entry of a [`KeyFrames`] map.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe {
    pub tick: Tick,
    pub alpha: f64,
}

/// Fade opacity curve: absolute tick -> alpha.
///
/// Keys are unique and kept sorted by tick. Setting an existing tick overwrites it
/// (last write wins).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyFrames {
    keys: BTreeMap<Tick, f64>,
}

impl KeyFrames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, tick: Tick, alpha: f64) {
        self.keys.insert(tick, alpha);
    }

    pub fn get(&self, tick: Tick) -> Option<f64> {
        self.keys.get(&tick).copied()
    }

    pub fn contains(&self, tick: Tick) -> bool {
        self.keys.contains_key(&tick)
    }

    /// Drops every key for which `keep` returns false.
    pub fn retain(&mut self, mut keep: impl FnMut(Tick, f64) -> bool) {
        self.keys.retain(|t, a| keep(*t, *a));
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in ascending tick order.
    pub fn iter(&self) -> impl Iterator<Item = Keyframe> + '_ {
        self.keys
            .iter()
            .map(|(tick, alpha)| Keyframe { tick: *tick, alpha: *alpha })
    }

    /// JSON object form: decimal tick strings to float alphas.
    pub fn to_json(&self) -> Value {
        let mut out = Map::with_capacity(self.keys.len());
        for (tick, alpha) in &self.keys {
            out.insert(tick.to_string(), Value::from(*alpha));
        }
        Value::Object(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/keyframes.rs"]
mod tests;
