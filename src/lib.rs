//! Migration of sky effect asset documents from schema version 2 to the revised version 1 shape.
//!
//! Sky documents are JSON files found under `assets/<namespace>/sky/**`. The migration is a
//! fixed pipeline of independent rewrite steps (see [`standard_steps`]); the only step with
//! real arithmetic is the fade migration, which turns legacy time-of-day fade boundaries into
//! an absolute `keyFrames` map and, when a legacy `conditions.loop` is present, unrolls the
//! whole multi-day loop (see [`expand`]).
//!
//! # Pipeline overview
//!
//! 1. **Discover**: `root -> [path]` ([`discover`])
//! 2. **Migrate**: `Document -> Document` per file, version-gated ([`Migrator`])
//! 3. **Report**: advisory lists of files needing a human look ([`BatchReport`])
//!
//! Documents that are not schema version 2 are never rewritten, so runs are repeatable.
#![forbid(unsafe_code)]

mod animation;
mod batch;
mod document;
mod foundation;
mod migrate;

pub use animation::fade::FadeBounds;
pub use animation::keyframes::{Keyframe, KeyFrames};
pub use animation::loop_expand::{
    LoopCondition, LoopExpansion, TimeRange, Transitions, absolute_tick, expand,
};
pub use batch::discover::discover;
pub use batch::report::BatchReport;
pub use batch::runner::{FileOutcome, RunOpts, migrate_file, migrate_file_with, run};
pub use document::json::{Document, has_schema_version, schema_version};
pub use foundation::core::{
    DEFAULT_MAX_ALPHA, DEFAULT_MIN_ALPHA, DEFAULT_TRANSITION_TICKS, MAX_LOOP_DAYS,
    SOURCE_SCHEMA_VERSION, TARGET_SCHEMA_VERSION, TICKS_PER_DAY, Tick,
};
pub use foundation::error::{MigrateError, MigrateResult};
pub use migrate::pipeline::{
    MigrationOutcome, MigrationReport, Migrator, SkipReason, migrate_document,
};
pub use migrate::step::{Change, MigrationCtx, MigrationStep, ReviewFlag};
pub use migrate::steps::{
    BlendRename, ConditionArrayWrap, FadeMigration, LoopRemoval, PriorityRename,
    TextureRestructure, TypeFlag, TypeRename, VersionBump, WeatherRename, standard_steps,
};
