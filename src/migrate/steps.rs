use serde_json::{Map, Value, json};

use crate::animation::fade::FadeBounds;
use crate::animation::loop_expand::{LoopCondition, Transitions, expand};
use crate::document::json::{Document, object, object_mut, rename_key, schema_version};
use crate::foundation::core::{SOURCE_SCHEMA_VERSION, TARGET_SCHEMA_VERSION};
use crate::foundation::error::{MigrateError, MigrateResult};
use crate::migrate::step::{Change, MigrationCtx, MigrationStep, ReviewFlag};

/// Old sky type names and their replacements.
pub const TYPE_RENAMES: [(&str, &str); 2] = [
    ("single-sprite-square-textured", "square-textured"),
    ("multi-texture", "multi-textured"),
];

/// Types that need no rename and no manual attention.
pub const UNCHANGED_TYPES: [&str; 3] = ["monocolor", "overworld", "end"];

fn renamed_type(old: &str) -> Option<&'static str> {
    TYPE_RENAMES
        .iter()
        .find(|(from, _)| *from == old)
        .map(|(_, to)| *to)
}

fn is_known_type(t: &str) -> bool {
    renamed_type(t).is_some() || UNCHANGED_TYPES.contains(&t)
}

fn conditions(doc: &Document) -> Option<&Map<String, Value>> {
    object(doc, "conditions")
}

fn fade(doc: &Document) -> Option<&Map<String, Value>> {
    object(doc, "properties").and_then(|p| p.get("fade")?.as_object())
}

pub struct VersionBump;

impl MigrationStep for VersionBump {
    fn name(&self) -> &'static str {
        "version-bump"
    }

    fn applies(&self, doc: &Document, _ctx: &MigrationCtx) -> bool {
        schema_version(doc) == Some(SOURCE_SCHEMA_VERSION as f64)
    }

    fn apply(&self, doc: &mut Document, ctx: &mut MigrationCtx) -> MigrateResult<()> {
        let from = schema_version(doc).unwrap_or(SOURCE_SCHEMA_VERSION as f64);
        doc["schemaVersion"] = json!(TARGET_SCHEMA_VERSION);
        ctx.record(Change::SchemaVersion {
            from,
            to: TARGET_SCHEMA_VERSION,
        });
        Ok(())
    }
}

pub struct TypeRename;

impl MigrationStep for TypeRename {
    fn name(&self) -> &'static str {
        "type-rename"
    }

    fn applies(&self, doc: &Document, _ctx: &MigrationCtx) -> bool {
        doc.get("type")
            .and_then(Value::as_str)
            .and_then(renamed_type)
            .is_some()
    }

    fn apply(&self, doc: &mut Document, ctx: &mut MigrationCtx) -> MigrateResult<()> {
        let Some(from) = doc.get("type").and_then(Value::as_str).map(str::to_owned) else {
            return Ok(());
        };
        let Some(to) = renamed_type(&from) else {
            return Ok(());
        };
        doc["type"] = json!(to);
        ctx.record(Change::TypeRenamed {
            from,
            to: to.to_owned(),
        });
        Ok(())
    }
}

/// Marks documents whose `type` is not recognized. The value itself is left alone.
pub struct TypeFlag;

impl MigrationStep for TypeFlag {
    fn name(&self) -> &'static str {
        "type-flag"
    }

    fn applies(&self, _doc: &Document, ctx: &MigrationCtx) -> bool {
        matches!(ctx.original_type(), Some(t) if !t.is_empty() && !is_known_type(t))
    }

    fn apply(&self, _doc: &mut Document, ctx: &mut MigrationCtx) -> MigrateResult<()> {
        let value = ctx.original_type().unwrap_or_default().to_owned();
        ctx.flag(ReviewFlag::UnknownType);
        ctx.record(Change::TypeFlagged { value });
        Ok(())
    }
}

/// `animations` -> `animatableTextures` and `uvRanges` -> `uvRange` for multi-texture skies.
pub struct TextureRestructure;

impl MigrationStep for TextureRestructure {
    fn name(&self) -> &'static str {
        "texture-restructure"
    }

    fn applies(&self, _doc: &Document, ctx: &MigrationCtx) -> bool {
        ctx.original_type() == Some("multi-texture")
    }

    fn apply(&self, doc: &mut Document, ctx: &mut MigrationCtx) -> MigrateResult<()> {
        let Some(root) = doc.as_object_mut() else {
            return Ok(());
        };

        if rename_key(root, "uvRanges", "uvRange") {
            ctx.record(Change::KeyRenamed {
                from: "uvRanges".to_owned(),
                to: "uvRange".to_owned(),
            });
        }

        if rename_key(root, "animations", "animatableTextures") {
            ctx.record(Change::KeyRenamed {
                from: "animations".to_owned(),
                to: "animatableTextures".to_owned(),
            });
        }

        if let Some(textures) = root
            .get_mut("animatableTextures")
            .and_then(Value::as_array_mut)
        {
            for (i, texture) in textures.iter_mut().enumerate() {
                let Some(texture) = texture.as_object_mut() else {
                    continue;
                };
                if rename_key(texture, "uvRanges", "uvRange") {
                    ctx.record(Change::KeyRenamed {
                        from: format!("animatableTextures[{i}].uvRanges"),
                        to: format!("animatableTextures[{i}].uvRange"),
                    });
                }
            }
        }
        Ok(())
    }
}

pub struct PriorityRename;

impl MigrationStep for PriorityRename {
    fn name(&self) -> &'static str {
        "priority-rename"
    }

    fn applies(&self, doc: &Document, _ctx: &MigrationCtx) -> bool {
        object(doc, "properties").is_some_and(|p| p.contains_key("priority"))
    }

    fn apply(&self, doc: &mut Document, ctx: &mut MigrationCtx) -> MigrateResult<()> {
        if let Some(props) = object_mut(doc, "properties") {
            if rename_key(props, "priority", "layer") {
                ctx.record(Change::KeyRenamed {
                    from: "properties.priority".to_owned(),
                    to: "properties.layer".to_owned(),
                });
            }
        }
        Ok(())
    }
}

pub struct BlendRename;

impl MigrationStep for BlendRename {
    fn name(&self) -> &'static str {
        "blend-rename"
    }

    fn applies(&self, doc: &Document, _ctx: &MigrationCtx) -> bool {
        object(doc, "blend").and_then(|b| b.get("type")?.as_str()) == Some("alpha")
    }

    fn apply(&self, doc: &mut Document, ctx: &mut MigrationCtx) -> MigrateResult<()> {
        if let Some(blend) = object_mut(doc, "blend") {
            blend.insert("type".to_owned(), json!("normal"));
            ctx.record(Change::BlendRemapped {
                from: "alpha".to_owned(),
                to: "normal".to_owned(),
            });
        }
        Ok(())
    }
}

/// Replaces the four fade boundaries with `keyFrames`, unrolling `conditions.loop` when
/// present. Must run before [`LoopRemoval`].
pub struct FadeMigration;

impl MigrationStep for FadeMigration {
    fn name(&self) -> &'static str {
        "fade-migration"
    }

    fn applies(&self, doc: &Document, _ctx: &MigrationCtx) -> bool {
        fade(doc).is_some_and(FadeBounds::has_boundaries)
    }

    fn apply(&self, doc: &mut Document, ctx: &mut MigrationCtx) -> MigrateResult<()> {
        let Some(bounds) = fade(doc).and_then(FadeBounds::from_fade) else {
            tracing::warn!("non-numeric fade boundary, leaving properties.fade as is");
            return Ok(());
        };

        let expansion = match conditions(doc).and_then(|c| c.get("loop")) {
            Some(raw) => {
                let cond = LoopCondition::from_json(raw);
                let transitions = object(doc, "properties")
                    .map(Transitions::from_properties)
                    .unwrap_or_default();
                expand(&cond, &bounds, transitions)
            }
            None => None,
        };

        let fade = object_mut(doc, "properties")
            .and_then(|p| p.get_mut("fade"))
            .and_then(Value::as_object_mut)
            .ok_or_else(|| MigrateError::document("properties.fade vanished during migration"))?;

        for key in FadeBounds::BOUNDARY_KEYS
            .iter()
            .chain(FadeBounds::ALPHA_KEYS.iter())
        {
            fade.remove(*key);
        }

        let looped = expansion.is_some();
        let key_frames = match expansion {
            Some(exp) => {
                fade.insert("duration".to_owned(), json!(exp.duration.0));
                exp.key_frames
            }
            None => bounds.single_cycle(),
        };
        fade.insert("keyFrames".to_owned(), key_frames.to_json());

        if looped {
            ctx.flag(ReviewFlag::LoopCheck);
        }
        ctx.record(Change::FadeMigrated {
            key_frames: key_frames.len(),
            looped,
        });
        Ok(())
    }
}

pub struct LoopRemoval;

impl MigrationStep for LoopRemoval {
    fn name(&self) -> &'static str {
        "loop-removal"
    }

    fn applies(&self, doc: &Document, _ctx: &MigrationCtx) -> bool {
        conditions(doc).is_some_and(|c| c.contains_key("loop"))
    }

    fn apply(&self, doc: &mut Document, ctx: &mut MigrationCtx) -> MigrateResult<()> {
        if let Some(c) = object_mut(doc, "conditions") {
            if c.remove("loop").is_some() {
                ctx.record(Change::LoopRemoved);
            }
        }
        Ok(())
    }
}

pub struct WeatherRename;

impl MigrationStep for WeatherRename {
    fn name(&self) -> &'static str {
        "weather-rename"
    }

    fn applies(&self, doc: &Document, _ctx: &MigrationCtx) -> bool {
        conditions(doc).is_some_and(|c| c.contains_key("weather"))
    }

    fn apply(&self, doc: &mut Document, ctx: &mut MigrationCtx) -> MigrateResult<()> {
        if let Some(c) = object_mut(doc, "conditions") {
            if rename_key(c, "weather", "weathers") {
                ctx.record(Change::KeyRenamed {
                    from: "conditions.weather".to_owned(),
                    to: "conditions.weathers".to_owned(),
                });
            }
        }
        Ok(())
    }
}

/// Every array under `conditions` becomes `{ "entries": [...] }`.
pub struct ConditionArrayWrap;

impl MigrationStep for ConditionArrayWrap {
    fn name(&self) -> &'static str {
        "condition-array-wrap"
    }

    fn applies(&self, doc: &Document, _ctx: &MigrationCtx) -> bool {
        conditions(doc).is_some_and(|c| c.values().any(Value::is_array))
    }

    fn apply(&self, doc: &mut Document, ctx: &mut MigrationCtx) -> MigrateResult<()> {
        let Some(c) = object_mut(doc, "conditions") else {
            return Ok(());
        };
        for (key, value) in c.iter_mut() {
            if value.is_array() {
                let entries = value.take();
                *value = json!({ "entries": entries });
                ctx.record(Change::ConditionWrapped { key: key.clone() });
            }
        }
        Ok(())
    }
}

/// The ten steps in the order they must run.
pub fn standard_steps() -> Vec<Box<dyn MigrationStep>> {
    vec![
        Box::new(VersionBump),
        Box::new(TypeRename),
        Box::new(TypeFlag),
        Box::new(TextureRestructure),
        Box::new(PriorityRename),
        Box::new(BlendRename),
        Box::new(FadeMigration),
        Box::new(LoopRemoval),
        Box::new(WeatherRename),
        Box::new(ConditionArrayWrap),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/migrate/steps.rs"]
mod tests;
