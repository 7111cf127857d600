//! Snapshot import: route a snapshot to its reader, normalize every record
//! and collect what could not be normalized.

use crate::catalog::GameCatalog;
use crate::config::ScannerConfig;
use crate::error::Result;
use crate::file_utils::read_utf8_file;
use crate::models::{CanonicalCharacter, CanonicalRelic, ImportSnapshot, RawEntry, RawLightCone, RawRelic};
use crate::readers::{ReadContext, ReaderStrategy, Resolution, SnapshotReader, Unresolved};
use crate::trailblazer::TrailblazerContext;
use crate::version::{StaleVersionAdvisory, VersionRouter};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Avatar name assumed when a snapshot does not declare one.
pub const DEFAULT_TRAILBLAZER: &str = "Stelle";

/// Post-processing hook applied to every resolved relic. Returning `None`
/// drops the relic with a warning.
pub trait RelicAugmenter: Send + Sync {
    fn augment(&self, relic: CanonicalRelic) -> Option<CanonicalRelic>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughAugmenter;

impl RelicAugmenter for PassthroughAugmenter {
    fn augment(&self, relic: CanonicalRelic) -> Option<CanonicalRelic> {
        Some(relic)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Character,
    LightCone,
    Relic,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Character => f.write_str("character"),
            Self::LightCone => f.write_str("light cone"),
            Self::Relic => f.write_str("relic"),
        }
    }
}

/// A record dropped from the output, located by its position in the
/// snapshot's list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordWarning {
    pub kind: RecordKind,
    pub index: usize,
    pub reason: String,
}

impl RecordWarning {
    fn new(kind: RecordKind, index: usize, reason: &Unresolved) -> Self {
        Self {
            kind,
            index,
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputMetadata {
    pub trailblazer: String,
    pub current_trailblazer_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportOutput {
    pub metadata: OutputMetadata,
    pub characters: Vec<CanonicalCharacter>,
    pub relics: Vec<CanonicalRelic>,
    pub advisories: Vec<StaleVersionAdvisory>,
    pub warnings: Vec<RecordWarning>,
}

impl ImportOutput {
    pub fn dropped(&self, kind: RecordKind) -> usize {
        self.warnings.iter().filter(|w| w.kind == kind).count()
    }
}

/// Running totals over one or more imports.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub snapshots: usize,
    pub failed: usize,
    pub characters: usize,
    pub relics: usize,
    pub dropped_characters: usize,
    pub dropped_relics: usize,
    pub advisories: usize,
}

impl ImportSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_output(&mut self, output: &ImportOutput) {
        self.snapshots += 1;
        self.characters += output.characters.len();
        self.relics += output.relics.len();
        self.dropped_characters += output.dropped(RecordKind::Character);
        self.dropped_relics += output.dropped(RecordKind::Relic);
        self.advisories += output.advisories.len();
    }

    pub fn add_failure(&mut self) {
        self.snapshots += 1;
        self.failed += 1;
    }
}

pub struct ImportPipeline {
    catalog: Arc<GameCatalog>,
    config: ScannerConfig,
    augmenter: Box<dyn RelicAugmenter>,
}

impl ImportPipeline {
    pub fn new(catalog: Arc<GameCatalog>, config: ScannerConfig) -> Self {
        Self {
            catalog,
            config,
            augmenter: Box::new(PassthroughAugmenter),
        }
    }

    pub fn with_augmenter(mut self, augmenter: impl RelicAugmenter + 'static) -> Self {
        self.augmenter = Box::new(augmenter);
        self
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Import a snapshot JSON file.
    pub fn parse_file(&self, path: &Path) -> Result<ImportOutput> {
        debug!("Importing snapshot {:?}", path);
        let content = read_utf8_file(path)?;
        self.parse_str(&content)
    }

    /// Import a snapshot from its JSON text.
    pub fn parse_str(&self, content: &str) -> Result<ImportOutput> {
        let snapshot: ImportSnapshot = serde_json::from_str(content)?;
        self.parse(&snapshot)
    }

    /// Normalize a snapshot.
    ///
    /// Signature and version mismatches abort the import with no output.
    /// Records that cannot be resolved are dropped and reported in
    /// `warnings`; accepted records keep their input order.
    pub fn parse(&self, snapshot: &ImportSnapshot) -> Result<ImportOutput> {
        let route = VersionRouter::new(&self.config).route(snapshot)?;
        for advisory in &route.advisories {
            warn!("{}", advisory);
        }

        let metadata = OutputMetadata {
            trailblazer: non_empty(snapshot.metadata.trailblazer.as_deref())
                .unwrap_or(DEFAULT_TRAILBLAZER)
                .to_string(),
            current_trailblazer_path: non_empty(snapshot.metadata.current_trailblazer_path.as_deref())
                .map(str::to_string),
        };
        let trailblazer = TrailblazerContext::new(&metadata.trailblazer, metadata.current_trailblazer_path.as_deref());
        let ctx = ReadContext {
            catalog: self.catalog.as_ref(),
            config: &self.config,
            trailblazer: &trailblazer,
        };

        let mut warnings = Vec::new();

        // Malformed light cones are reported here; readers only see the parsed ones.
        let mut light_cones: Vec<RawLightCone> = Vec::with_capacity(snapshot.light_cones.len());
        for (index, entry) in snapshot.light_cones.iter().enumerate() {
            match parsed_entry(entry) {
                Ok(light_cone) => light_cones.push(light_cone.clone()),
                Err(reason) => {
                    warn!("Dropping {} #{}: {}", RecordKind::LightCone, index, reason);
                    warnings.push(RecordWarning::new(RecordKind::LightCone, index, &reason));
                }
            }
        }

        let mut relics = Vec::with_capacity(snapshot.relics.len());
        for (index, entry) in snapshot.relics.iter().enumerate() {
            match parsed_entry(entry).and_then(|raw| self.read_relic(&route.strategy, raw, &ctx)) {
                Ok(relic) => relics.push(relic),
                Err(reason) => {
                    warn!("Dropping {} #{}: {}", RecordKind::Relic, index, reason);
                    warnings.push(RecordWarning::new(RecordKind::Relic, index, &reason));
                }
            }
        }

        let mut characters = Vec::with_capacity(snapshot.characters.len());
        for (index, entry) in snapshot.characters.iter().enumerate() {
            match parsed_entry(entry).and_then(|raw| route.strategy.read_character(raw, &light_cones, &ctx)) {
                Ok(character) => characters.push(character),
                Err(reason) => {
                    warn!("Dropping {} #{}: {}", RecordKind::Character, index, reason);
                    warnings.push(RecordWarning::new(RecordKind::Character, index, &reason));
                }
            }
        }

        info!(
            "Imported {} characters and {} relics from {} v{} ({} dropped, {} advisories)",
            characters.len(),
            relics.len(),
            self.config.name,
            route.strategy.schema_version().tag(),
            warnings.len(),
            route.advisories.len()
        );

        Ok(ImportOutput {
            metadata,
            characters,
            relics,
            advisories: route.advisories,
            warnings,
        })
    }

    fn read_relic(&self, strategy: &ReaderStrategy, raw: &RawRelic, ctx: &ReadContext<'_>) -> Resolution<CanonicalRelic> {
        let relic = strategy.read_relic(raw, ctx)?;
        self.augmenter.augment(relic).ok_or(Unresolved::AugmentRejected)
    }
}

fn parsed_entry<T>(entry: &RawEntry<T>) -> Resolution<&T> {
    match entry {
        RawEntry::Parsed(value) => Ok(value),
        RawEntry::Malformed(reason) => Err(Unresolved::Malformed(reason.clone())),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
