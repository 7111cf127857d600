//! Read-only game catalog: characters, light cones, relic sets and the
//! main-affix tier tables. Loaded once and shared by every import.

use crate::error::{ImportError, Result};
use crate::fuzzy::find_best_match;
use crate::stats::{Slot, Stat};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

lazy_static! {
    static ref NON_ALPHANUMERIC: Regex = Regex::new(r"[^a-z0-9]").unwrap();
}

/// Lower-case a name and strip everything but ASCII letters and digits.
pub fn lower_alpha_numeric(value: &str) -> String {
    NON_ALPHANUMERIC
        .replace_all(&value.to_lowercase(), "")
        .into_owned()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(deserialize_with = "required_id")]
    pub id: String,
    pub name: String,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

fn required_id<'de, D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    crate::models::de::lenient_id(deserializer)?
        .ok_or_else(|| serde::de::Error::custom("catalog entry id must not be null"))
}

/// One main-stat progression within a tier: the value at enhance level 0 and
/// the increment per level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffixEntry {
    #[serde(default, deserialize_with = "crate::models::de::lenient_id")]
    pub affix_id: Option<String>,
    pub property: String,
    pub base: f64,
    pub step: f64,
}

/// Main-stat progressions available for one `(grade, slot)` pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AffixTier {
    #[serde(default)]
    pub affixes: Vec<AffixEntry>,
}

impl AffixTier {
    pub fn find(&self, stat: Stat) -> Option<&AffixEntry> {
        let property = stat.affix_property();
        self.affixes.iter().find(|a| a.property == property)
    }
}

/// Key of a tier in the main-affix table: grade digit followed by the slot
/// index, e.g. `"53"` for a 5-star body.
pub fn affix_tier_key(grade: u8, slot: Slot) -> String {
    format!("{}{}", grade, slot.index())
}

/// On-disk catalog layout.
#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    characters: Vec<CatalogEntry>,
    #[serde(default)]
    light_cones: Vec<CatalogEntry>,
    #[serde(default)]
    relic_sets: Vec<CatalogEntry>,
    #[serde(default)]
    main_affixes: HashMap<String, AffixTier>,
}

/// Name and id index over one entry list. The first entry wins on duplicates.
#[derive(Debug, Clone, Default)]
struct EntryIndex {
    entries: Vec<CatalogEntry>,
    by_id: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl EntryIndex {
    fn new(entries: Vec<CatalogEntry>) -> Self {
        let mut by_id = HashMap::new();
        let mut by_name = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            by_id.entry(entry.id.clone()).or_insert(i);
            by_name.entry(entry.name.clone()).or_insert(i);
        }
        Self {
            entries,
            by_id,
            by_name,
        }
    }

    fn by_id(&self, id: &str) -> Option<&CatalogEntry> {
        self.by_id.get(id).map(|&i| &self.entries[i])
    }

    fn by_name(&self, name: &str) -> Option<&CatalogEntry> {
        self.by_name.get(name).map(|&i| &self.entries[i])
    }
}

#[derive(Debug, Clone, Default)]
pub struct GameCatalog {
    characters: EntryIndex,
    light_cones: EntryIndex,
    relic_sets: EntryIndex,
    /// Normalized relic set names, in `relic_sets` order.
    relic_set_matchers: Vec<String>,
    main_affixes: HashMap<String, AffixTier>,
}

impl GameCatalog {
    pub fn new(
        characters: Vec<CatalogEntry>,
        light_cones: Vec<CatalogEntry>,
        relic_sets: Vec<CatalogEntry>,
        main_affixes: HashMap<String, AffixTier>,
    ) -> Self {
        let relic_set_matchers = relic_sets
            .iter()
            .map(|s| lower_alpha_numeric(&s.name))
            .collect();

        Self {
            characters: EntryIndex::new(characters),
            light_cones: EntryIndex::new(light_cones),
            relic_sets: EntryIndex::new(relic_sets),
            relic_set_matchers,
            main_affixes,
        }
    }

    /// Load a catalog from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ImportError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read catalog from {:?}: {}", path, e),
            ))
        })?;

        Self::from_str(&content)
    }

    /// Parse a catalog from a JSON string.
    pub fn from_str(content: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(content)
            .map_err(|e| ImportError::Catalog(format!("Failed to parse catalog JSON: {}", e)))?;

        let catalog = Self::new(file.characters, file.light_cones, file.relic_sets, file.main_affixes);
        tracing::debug!(
            "Loaded catalog: {} characters, {} light cones, {} relic sets, {} affix tiers",
            catalog.characters().len(),
            catalog.light_cones().len(),
            catalog.relic_sets().len(),
            catalog.main_affixes.len()
        );
        Ok(catalog)
    }

    pub fn characters(&self) -> &[CatalogEntry] {
        &self.characters.entries
    }

    pub fn light_cones(&self) -> &[CatalogEntry] {
        &self.light_cones.entries
    }

    pub fn relic_sets(&self) -> &[CatalogEntry] {
        &self.relic_sets.entries
    }

    pub fn character_by_id(&self, id: &str) -> Option<&CatalogEntry> {
        self.characters.by_id(id)
    }

    pub fn character_by_name(&self, name: &str) -> Option<&CatalogEntry> {
        self.characters.by_name(name)
    }

    pub fn light_cone_by_id(&self, id: &str) -> Option<&CatalogEntry> {
        self.light_cones.by_id(id)
    }

    pub fn light_cone_by_name(&self, name: &str) -> Option<&CatalogEntry> {
        self.light_cones.by_name(name)
    }

    pub fn relic_set_by_id(&self, id: &str) -> Option<&CatalogEntry> {
        self.relic_sets.by_id(id)
    }

    /// Closest relic set by normalized name similarity, with its rating.
    /// `None` only when the catalog has no relic sets.
    pub fn match_relic_set(&self, name: &str) -> Option<(&CatalogEntry, f64)> {
        let query = lower_alpha_numeric(name);
        find_best_match(&query, &self.relic_set_matchers)
            .map(|best| (&self.relic_sets.entries[best.index], best.rating))
    }

    pub fn main_affix(&self, grade: u8, slot: Slot) -> Option<&AffixTier> {
        self.main_affixes.get(&affix_tier_key(grade, slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_catalog;
    use std::io::Write;

    #[test]
    fn test_lower_alpha_numeric() {
        assert_eq!(lower_alpha_numeric("Musketeer of Wild Wheat"), "musketeerofwildwheat");
        assert_eq!(lower_alpha_numeric("Pan-Cosmic Commercial Enterprise"), "pancosmiccommercialenterprise");
        assert_eq!(lower_alpha_numeric("Eagle of Twilight Line!"), "eagleoftwilightline");
    }

    #[test]
    fn test_lookups() {
        let catalog = sample_catalog();
        assert_eq!(catalog.character_by_name("Seele").unwrap().id, "1102");
        assert_eq!(catalog.character_by_id("1001").unwrap().name, "March 7th");
        assert!(catalog.character_by_name("seele").is_none());
        assert_eq!(catalog.light_cone_by_name("In the Night").unwrap().id, "23001");
        assert_eq!(catalog.relic_set_by_id("102").unwrap().name, "Musketeer of Wild Wheat");
    }

    #[test]
    fn test_match_relic_set_normalizes_names() {
        let catalog = sample_catalog();
        let (set, rating) = catalog.match_relic_set("musketeer of wild wheat").unwrap();
        assert_eq!(set.id, "102");
        assert_eq!(rating, 1.0);

        let (set, _) = catalog.match_relic_set("Space Sealing Statoin").unwrap();
        assert_eq!(set.id, "301");
    }

    #[test]
    fn test_match_relic_set_empty_catalog() {
        let catalog = GameCatalog::default();
        assert!(catalog.match_relic_set("Anything").is_none());
    }

    #[test]
    fn test_main_affix_lookup() {
        let catalog = sample_catalog();
        let tier = catalog.main_affix(5, Slot::Hands).unwrap();
        let entry = tier.find(Stat::Atk).unwrap();
        assert_eq!(entry.property, "AttackDelta");
        assert!(tier.find(Stat::Hp).is_none());
        assert!(catalog.main_affix(3, Slot::Hands).is_none());
        assert_eq!(affix_tier_key(4, Slot::LinkRope), "46");
    }

    #[test]
    fn test_duplicate_names_keep_first_entry() {
        let catalog = GameCatalog::new(
            vec![CatalogEntry::new("1", "Twin"), CatalogEntry::new("2", "Twin")],
            vec![],
            vec![],
            HashMap::new(),
        );
        assert_eq!(catalog.character_by_name("Twin").unwrap().id, "1");
    }

    #[test]
    fn test_from_str_accepts_numeric_ids() {
        let json = r#"{
            "characters": [{"id": 1001, "name": "March 7th"}],
            "relic_sets": [{"id": "101", "name": "Passerby of Wandering Cloud"}],
            "main_affixes": {"52": {"affixes": [{"affix_id": 1, "property": "AttackDelta", "base": 56.448, "step": 19.7568}]}}
        }"#;
        let catalog = GameCatalog::from_str(json).unwrap();
        assert_eq!(catalog.character_by_id("1001").unwrap().name, "March 7th");
        assert!(catalog.light_cones().is_empty());
        assert!(catalog.main_affix(5, Slot::Hands).is_some());
    }

    #[test]
    fn test_from_str_rejects_malformed_json() {
        let result = GameCatalog::from_str("{\"characters\": [");
        assert!(matches!(result, Err(ImportError::Catalog(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"light_cones": [{{"id": "20000", "name": "Arrows"}}]}}"#).unwrap();

        let catalog = GameCatalog::from_file(file.path()).unwrap();
        assert_eq!(catalog.light_cone_by_id("20000").unwrap().name, "Arrows");
    }

    #[test]
    fn test_from_missing_file() {
        let result = GameCatalog::from_file(Path::new("/nonexistent/catalog.json"));
        assert!(matches!(result, Err(ImportError::Io(_))));
    }
}
