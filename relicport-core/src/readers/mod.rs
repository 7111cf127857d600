//! Per-record readers, one per supported snapshot schema.
//!
//! A reader turns one raw entry into a canonical record or explains why it
//! could not. Unresolved records are never fatal: the pipeline drops them and
//! reports a warning.

mod relic;
mod v3;
mod v4;

pub use relic::{clamp_enhance, clamp_grade, precision_round, reconstruct_main_value, resolve_slot, MIN_SLOT_RATING};
pub use v3::V3Reader;
pub use v4::V4Reader;

use crate::catalog::GameCatalog;
use crate::config::ScannerConfig;
use crate::models::{CanonicalCharacter, CanonicalRelic, RawCharacter, RawLightCone, RawRelic};
use crate::stats::{Slot, Stat};
use crate::trailblazer::TrailblazerContext;
use crate::version::SchemaVersion;
use thiserror::Error;

/// Why a single record could not be mapped to canonical identifiers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Unresolved {
    #[error("character has no identifier")]
    MissingCharacterId,

    #[error("unknown character '{0}'")]
    UnknownCharacter(String),

    #[error("no slot matches '{0}'")]
    UnknownSlot(String),

    #[error("relic has no set")]
    MissingRelicSet,

    #[error("unknown relic set '{0}'")]
    UnknownRelicSet(String),

    #[error("unknown main stat '{0}'")]
    UnknownMainStat(String),

    #[error("no main affix tier for grade {grade} {slot}")]
    MissingAffixTier { grade: u8, slot: Slot },

    #[error("main affix tier for grade {grade} {slot} has no {stat} progression")]
    MissingAffixProperty { grade: u8, slot: Slot, stat: Stat },

    #[error("relic rejected by augmenter")]
    AugmentRejected,

    #[error("malformed entry: {0}")]
    Malformed(String),
}

pub type Resolution<T> = std::result::Result<T, Unresolved>;

/// Everything a reader may consult besides the raw entry itself.
#[derive(Debug, Clone, Copy)]
pub struct ReadContext<'a> {
    pub catalog: &'a GameCatalog,
    pub config: &'a ScannerConfig,
    pub trailblazer: &'a TrailblazerContext,
}

pub trait SnapshotReader {
    fn schema_version(&self) -> SchemaVersion;

    fn read_character(
        &self,
        character: &RawCharacter,
        light_cones: &[RawLightCone],
        ctx: &ReadContext<'_>,
    ) -> Resolution<CanonicalCharacter>;

    fn read_relic(&self, relic: &RawRelic, ctx: &ReadContext<'_>) -> Resolution<CanonicalRelic>;
}

/// Reader bound to a snapshot's declared schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderStrategy {
    V3(V3Reader),
    V4(V4Reader),
}

impl ReaderStrategy {
    pub fn for_version(version: SchemaVersion) -> Self {
        match version {
            SchemaVersion::V3 => Self::V3(V3Reader),
            SchemaVersion::V4 => Self::V4(V4Reader),
        }
    }
}

impl SnapshotReader for ReaderStrategy {
    fn schema_version(&self) -> SchemaVersion {
        match self {
            Self::V3(reader) => reader.schema_version(),
            Self::V4(reader) => reader.schema_version(),
        }
    }

    fn read_character(
        &self,
        character: &RawCharacter,
        light_cones: &[RawLightCone],
        ctx: &ReadContext<'_>,
    ) -> Resolution<CanonicalCharacter> {
        match self {
            Self::V3(reader) => reader.read_character(character, light_cones, ctx),
            Self::V4(reader) => reader.read_character(character, light_cones, ctx),
        }
    }

    fn read_relic(&self, relic: &RawRelic, ctx: &ReadContext<'_>) -> Resolution<CanonicalRelic> {
        match self {
            Self::V3(reader) => reader.read_relic(relic, ctx),
            Self::V4(reader) => reader.read_relic(relic, ctx),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
