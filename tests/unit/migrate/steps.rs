use super::*;
use serde_json::json;

fn run(step: &dyn MigrationStep, doc: &mut Document) -> MigrationCtx {
    let mut ctx = MigrationCtx::for_document(doc);
    if step.applies(doc, &ctx) {
        step.apply(doc, &mut ctx).unwrap();
    }
    ctx
}

#[test]
fn version_bump_only_touches_version_two() {
    let mut doc = json!({ "schemaVersion": 2 });
    let ctx = run(&VersionBump, &mut doc);
    assert_eq!(doc["schemaVersion"], json!(1));
    assert_eq!(ctx.changes, vec![Change::SchemaVersion { from: 2.0, to: 1 }]);

    let mut doc = json!({ "schemaVersion": 3 });
    let ctx = run(&VersionBump, &mut doc);
    assert_eq!(doc["schemaVersion"], json!(3));
    assert!(ctx.changes.is_empty());
}

#[test]
fn type_rename_maps_old_names() {
    for (from, to) in TYPE_RENAMES {
        let mut doc = json!({ "type": from });
        run(&TypeRename, &mut doc);
        assert_eq!(doc["type"], json!(to));
    }

    let mut doc = json!({ "type": "overworld" });
    let ctx = run(&TypeRename, &mut doc);
    assert_eq!(doc["type"], json!("overworld"));
    assert!(ctx.changes.is_empty());
}

#[test]
fn type_flag_marks_unknown_types_without_mutating() {
    let mut doc = json!({ "type": "aurora" });
    let ctx = run(&TypeFlag, &mut doc);
    assert_eq!(doc["type"], json!("aurora"));
    assert!(ctx.has_flag(ReviewFlag::UnknownType));

    for known in ["single-sprite-square-textured", "multi-texture", "monocolor", "overworld", "end"] {
        let mut doc = json!({ "type": known });
        assert!(!run(&TypeFlag, &mut doc).has_flag(ReviewFlag::UnknownType));
    }

    let mut empty = json!({ "type": "" });
    assert!(run(&TypeFlag, &mut empty).flags.is_empty());
    let mut absent = json!({});
    assert!(run(&TypeFlag, &mut absent).flags.is_empty());
}

#[test]
fn new_type_names_are_flagged_as_unknown_input() {
    // Already-migrated names are not valid v2 types.
    let mut doc = json!({ "type": "square-textured" });
    assert!(run(&TypeFlag, &mut doc).has_flag(ReviewFlag::UnknownType));
}

#[test]
fn texture_restructure_renames_nested_uv_ranges() {
    let mut doc = json!({
        "type": "multi-textured",
        "uvRanges": [0, 1],
        "animations": [
            { "texture": "a.png", "uvRanges": { "minU": 0 } },
            { "texture": "b.png" },
            7
        ]
    });
    let mut ctx = MigrationCtx {
        original_type: Some("multi-texture".to_owned()),
        ..MigrationCtx::default()
    };
    assert!(TextureRestructure.applies(&doc, &ctx));
    TextureRestructure.apply(&mut doc, &mut ctx).unwrap();

    assert_eq!(
        doc,
        json!({
            "type": "multi-textured",
            "uvRange": [0, 1],
            "animatableTextures": [
                { "texture": "a.png", "uvRange": { "minU": 0 } },
                { "texture": "b.png" },
                7
            ]
        })
    );
    assert_eq!(ctx.changes.len(), 3);
}

#[test]
fn texture_restructure_ignores_other_types() {
    let doc = json!({ "type": "monocolor", "animations": [] });
    let ctx = MigrationCtx::for_document(&doc);
    assert!(!TextureRestructure.applies(&doc, &ctx));
}

#[test]
fn priority_becomes_layer() {
    let mut doc = json!({ "properties": { "priority": 5, "rotation": {} } });
    run(&PriorityRename, &mut doc);
    assert_eq!(doc, json!({ "properties": { "layer": 5, "rotation": {} } }));
}

#[test]
fn blend_alpha_becomes_normal() {
    let mut doc = json!({ "blend": { "type": "alpha", "redAlphaOnly": false } });
    run(&BlendRename, &mut doc);
    assert_eq!(doc["blend"], json!({ "type": "normal", "redAlphaOnly": false }));

    let mut doc = json!({ "blend": { "type": "add" } });
    let ctx = run(&BlendRename, &mut doc);
    assert_eq!(doc["blend"]["type"], json!("add"));
    assert!(ctx.changes.is_empty());
}

#[test]
fn fade_without_loop_is_single_cycle() {
    let mut doc = json!({
        "properties": {
            "fade": {
                "startFadeIn": 1000,
                "endFadeIn": 2000,
                "startFadeOut": 10000,
                "endFadeOut": 11000,
                "alwaysOn": false
            }
        }
    });
    let ctx = run(&FadeMigration, &mut doc);
    assert_eq!(
        doc["properties"]["fade"],
        json!({
            "alwaysOn": false,
            "keyFrames": { "1000": 0.0, "2000": 1.0, "10000": 1.0, "11000": 0.0 }
        })
    );
    assert!(!ctx.has_flag(ReviewFlag::LoopCheck));
}

#[test]
fn fade_with_loop_is_expanded_and_flagged() {
    let mut doc = json!({
        "properties": {
            "fade": {
                "startFadeIn": 0,
                "endFadeIn": 1000,
                "startFadeOut": 2000,
                "endFadeOut": 3000,
                "maxAlpha": 1.0,
                "minAlpha": 0.0
            }
        },
        "conditions": { "loop": { "days": 2, "ranges": [{ "min": 0, "max": 1 }] } }
    });
    let ctx = run(&FadeMigration, &mut doc);

    assert_eq!(
        doc["properties"]["fade"],
        json!({
            "duration": 48000,
            "keyFrames": {
                "0": 0.0,
                "1000": 1.0,
                "2000": 1.0,
                "3000": 0.0,
                "4000": 1.0,
                "6000": 0.0,
                "24020": 0.0
            }
        })
    );
    assert!(ctx.has_flag(ReviewFlag::LoopCheck));
    // The loop itself is removed by a later step.
    assert!(doc["conditions"].get("loop").is_some());
}

#[test]
fn degenerate_loop_falls_back_to_single_cycle() {
    let mut doc = json!({
        "properties": {
            "fade": { "startFadeIn": 1, "endFadeIn": 2, "startFadeOut": 3, "endFadeOut": 4 }
        },
        "conditions": { "loop": { "days": 0, "ranges": [{ "min": 0, "max": 1 }] } }
    });
    let ctx = run(&FadeMigration, &mut doc);
    assert_eq!(
        doc["properties"]["fade"]["keyFrames"],
        json!({ "1": 0.0, "2": 1.0, "3": 1.0, "4": 0.0 })
    );
    assert!(doc["properties"]["fade"].get("duration").is_none());
    assert!(ctx.flags.is_empty());
}

#[test]
fn loop_reads_transition_overrides_from_properties() {
    let mut doc = json!({
        "properties": {
            "transitionInDuration": 100,
            "transitionOutDuration": 300,
            "fade": { "startFadeIn": 5000, "endFadeIn": 7000, "startFadeOut": 11000, "endFadeOut": 13000 }
        },
        "conditions": { "loop": { "days": 1, "ranges": [{ "min": 0.25, "max": 0.5 }] } }
    });
    run(&FadeMigration, &mut doc);
    assert_eq!(
        doc["properties"]["fade"]["keyFrames"],
        json!({ "5900": 0.0, "7000": 1.0, "11000": 1.0, "12300": 0.0 })
    );
}

#[test]
fn partial_fade_is_left_alone() {
    let mut doc = json!({ "properties": { "fade": { "startFadeIn": 1, "endFadeIn": 2 } } });
    let before = doc.clone();
    let ctx = run(&FadeMigration, &mut doc);
    assert_eq!(doc, before);
    assert!(ctx.changes.is_empty());
}

#[test]
fn malformed_loop_falls_back_to_single_cycle() {
    let mut doc = json!({
        "properties": {
            "fade": { "startFadeIn": 1, "endFadeIn": 2, "startFadeOut": 3, "endFadeOut": 4 }
        },
        "conditions": { "loop": { "days": "forever" } }
    });
    let ctx = run(&FadeMigration, &mut doc);
    assert_eq!(
        doc["properties"]["fade"],
        json!({ "keyFrames": { "1": 0.0, "2": 1.0, "3": 1.0, "4": 0.0 } })
    );
    assert!(ctx.flags.is_empty());
    assert_eq!(
        ctx.changes,
        vec![Change::FadeMigrated {
            key_frames: 4,
            looped: false
        }]
    );
}

#[test]
fn oversized_loop_falls_back_to_single_cycle() {
    let mut doc = json!({
        "properties": {
            "fade": { "startFadeIn": 1, "endFadeIn": 2, "startFadeOut": 3, "endFadeOut": 4 }
        },
        "conditions": { "loop": { "days": 1e12, "ranges": [{ "min": 0, "max": 1 }] } }
    });
    let ctx = run(&FadeMigration, &mut doc);
    assert_eq!(
        doc["properties"]["fade"],
        json!({ "keyFrames": { "1": 0.0, "2": 1.0, "3": 1.0, "4": 0.0 } })
    );
    assert!(!ctx.has_flag(ReviewFlag::LoopCheck));
}

#[test]
fn non_numeric_boundary_leaves_fade_untouched() {
    let mut doc = json!({
        "properties": {
            "fade": { "startFadeIn": "dawn", "endFadeIn": 2, "startFadeOut": 3, "endFadeOut": 4 }
        }
    });
    let before = doc.clone();
    let ctx = run(&FadeMigration, &mut doc);
    assert_eq!(doc, before);
    assert!(ctx.changes.is_empty());
}

#[test]
fn non_numeric_transition_uses_default_margin() {
    let mut doc = json!({
        "properties": {
            "transitionInDuration": "fast",
            "fade": { "startFadeIn": 5000, "endFadeIn": 7000, "startFadeOut": 11000, "endFadeOut": 13000 }
        },
        "conditions": { "loop": { "days": 1, "ranges": [{ "min": 0.25, "max": 0.5 }] } }
    });
    let ctx = run(&FadeMigration, &mut doc);
    assert_eq!(
        doc["properties"]["fade"]["keyFrames"],
        json!({ "5980": 0.0, "7000": 1.0, "11000": 1.0, "12020": 0.0 })
    );
    assert!(ctx.has_flag(ReviewFlag::LoopCheck));
}

#[test]
fn loop_removal_and_weather_rename() {
    let mut doc = json!({
        "conditions": { "loop": { "days": 1 }, "weather": ["rain", "thunder"] }
    });
    run(&LoopRemoval, &mut doc);
    run(&WeatherRename, &mut doc);
    assert_eq!(doc, json!({ "conditions": { "weathers": ["rain", "thunder"] } }));
}

#[test]
fn condition_arrays_are_wrapped_in_order() {
    let mut doc = json!({
        "conditions": {
            "biomes": ["minecraft:plains", "minecraft:desert"],
            "worlds": ["minecraft:overworld"],
            "heights": { "entries": [] }
        }
    });
    let ctx = run(&ConditionArrayWrap, &mut doc);
    assert_eq!(
        doc["conditions"],
        json!({
            "biomes": { "entries": ["minecraft:plains", "minecraft:desert"] },
            "worlds": { "entries": ["minecraft:overworld"] },
            "heights": { "entries": [] }
        })
    );
    assert_eq!(ctx.changes.len(), 2);
}

#[test]
fn standard_steps_run_in_declared_order() {
    let names: Vec<&str> = standard_steps().iter().map(|s| s.name()).collect();
    assert_eq!(
        names,
        vec![
            "version-bump",
            "type-rename",
            "type-flag",
            "texture-restructure",
            "priority-rename",
            "blend-rename",
            "fade-migration",
            "loop-removal",
            "weather-rename",
            "condition-array-wrap",
        ]
    );
}
