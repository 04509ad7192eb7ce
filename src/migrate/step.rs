use std::fmt;

use crate::document::json::Document;
use crate::foundation::error::MigrateResult;

/// One rewrite of the v2 -> v1 migration.
///
/// Steps are independent: `applies` is the precondition, `apply` the rewrite. A step whose
/// precondition does not hold is skipped silently.
pub trait MigrationStep {
    /// Short stable identifier, used in logs.
    fn name(&self) -> &'static str;

    /// Whether the step has anything to do on `doc`.
    fn applies(&self, doc: &Document, ctx: &MigrationCtx) -> bool;

    /// Rewrites `doc`, recording what changed in `ctx`.
    fn apply(&self, doc: &mut Document, ctx: &mut MigrationCtx) -> MigrateResult<()>;
}

/// Advisory marker for a document whose migration needs a human look.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum ReviewFlag {
    /// `type` is not one of the known sky types.
    UnknownType,
    /// A loop condition was unrolled into keyframes.
    LoopCheck,
}

/// A single applied rewrite.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub enum Change {
    SchemaVersion { from: f64, to: i64 },
    TypeRenamed { from: String, to: String },
    TypeFlagged { value: String },
    KeyRenamed { from: String, to: String },
    BlendRemapped { from: String, to: String },
    FadeMigrated { key_frames: usize, looped: bool },
    LoopRemoved,
    ConditionWrapped { key: String },
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaVersion { from, to } => write!(f, "updated schemaVersion from {from} to {to}"),
            Self::TypeRenamed { from, to } => write!(f, "updated type from {from} to {to}"),
            Self::TypeFlagged { value } => {
                write!(f, "unrecognized type '{value}', needs manual fix")
            }
            Self::KeyRenamed { from, to } => write!(f, "renamed {from} to {to}"),
            Self::BlendRemapped { from, to } => {
                write!(f, "changed blend.type from {from} to {to}")
            }
            Self::FadeMigrated {
                key_frames,
                looped: false,
            } => write!(f, "migrated properties.fade ({key_frames} keyframes)"),
            Self::FadeMigrated {
                key_frames,
                looped: true,
            } => write!(
                f,
                "migrated properties.fade from conditions.loop ({key_frames} keyframes)"
            ),
            Self::LoopRemoved => write!(f, "removed conditions.loop"),
            Self::ConditionWrapped { key } => {
                write!(f, "wrapped conditions.{key} as {{entries: [...]}}")
            }
        }
    }
}

/// Per-document state threaded through the steps.
#[derive(Clone, Debug, Default)]
pub struct MigrationCtx {
    /// `type` as it was before any step ran; `None` when absent.
    pub original_type: Option<String>,
    pub changes: Vec<Change>,
    pub flags: Vec<ReviewFlag>,
}

impl MigrationCtx {
    pub fn for_document(doc: &Document) -> Self {
        let original_type = doc.get("type").map(|t| match t.as_str() {
            Some(s) => s.to_owned(),
            None => t.to_string(),
        });
        Self {
            original_type,
            ..Self::default()
        }
    }

    pub fn original_type(&self) -> Option<&str> {
        self.original_type.as_deref()
    }

    pub fn record(&mut self, change: Change) {
        self.changes.push(change);
    }

    /// Adds `flag` once.
    pub fn flag(&mut self, flag: ReviewFlag) {
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
    }

    pub fn has_flag(&self, flag: ReviewFlag) -> bool {
        self.flags.contains(&flag)
    }
}
