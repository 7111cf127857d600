//! In-memory fixtures shared by unit tests.

use crate::catalog::{AffixEntry, AffixTier, CatalogEntry, GameCatalog};
use crate::trailblazer::TrailblazerContext;
use std::collections::HashMap;

fn tier(entries: &[(&str, f64, f64)]) -> AffixTier {
    AffixTier {
        affixes: entries
            .iter()
            .enumerate()
            .map(|(i, (property, base, step))| AffixEntry {
                affix_id: Some((i + 1).to_string()),
                property: property.to_string(),
                base: *base,
                step: *step,
            })
            .collect(),
    }
}

pub fn sample_catalog() -> GameCatalog {
    let characters = vec![
        CatalogEntry::new("1001", "March 7th"),
        CatalogEntry::new("1102", "Seele"),
        CatalogEntry::new("8001", "Trailblazer"),
        CatalogEntry::new("8002", "Trailblazer"),
        CatalogEntry::new("8003", "Trailblazer"),
        CatalogEntry::new("8004", "Trailblazer"),
        CatalogEntry::new("8005", "Trailblazer"),
        CatalogEntry::new("8006", "Trailblazer"),
    ];
    let light_cones = vec![
        CatalogEntry::new("20000", "Arrows"),
        CatalogEntry::new("21001", "Good Night and Sleep Well"),
        CatalogEntry::new("23001", "In the Night"),
    ];
    let relic_sets = vec![
        CatalogEntry::new("101", "Passerby of Wandering Cloud"),
        CatalogEntry::new("102", "Musketeer of Wild Wheat"),
        CatalogEntry::new("104", "Hunter of Glacial Forest"),
        CatalogEntry::new("301", "Space Sealing Station"),
    ];

    let mut main_affixes = HashMap::new();
    main_affixes.insert("51".to_string(), tier(&[("HPDelta", 112.896, 39.5136)]));
    main_affixes.insert("52".to_string(), tier(&[("AttackDelta", 56.448, 19.7568)]));
    main_affixes.insert(
        "53".to_string(),
        tier(&[
            ("HPAddedRatio", 0.06912, 0.024192),
            ("AttackAddedRatio", 0.06912, 0.024192),
            ("CriticalChanceBase", 0.05184, 0.018144),
            ("CriticalDamageBase", 0.10368, 0.036288),
        ]),
    );
    main_affixes.insert(
        "54".to_string(),
        tier(&[("AttackAddedRatio", 0.06912, 0.024192), ("SpeedDelta", 4.032, 1.4)]),
    );
    main_affixes.insert("55".to_string(), tier(&[("FireAddedRatio", 0.062208, 0.021773)]));
    main_affixes.insert(
        "56".to_string(),
        tier(&[
            ("BreakDamageAddedRatioBase", 0.10368, 0.036288),
            ("SPRatioBase", 0.031104, 0.010886),
        ]),
    );
    main_affixes.insert("42".to_string(), tier(&[("AttackDelta", 45.1584, 15.8054)]));

    GameCatalog::new(characters, light_cones, relic_sets, main_affixes)
}

/// Female avatar whose snapshot declares no current path.
pub fn trailblazer_context() -> TrailblazerContext {
    TrailblazerContext::new("Stelle", None)
}

/// Name-keyed snapshot from an outdated scanner schema: one unknown
/// character and one relic without a resolvable slot.
pub const V3_SNAPSHOT: &str = r#"{
    "source": "HSR-Scanner",
    "build": "v1.0.0",
    "version": 3,
    "metadata": {"uid": 700000001, "trailblazer": "Stelle", "current_trailblazer_path": "Destruction"},
    "characters": [
        {"key": "March 7th", "level": "80", "ascension": 6, "eidolon": 6},
        {"key": "TrailblazerDestruction", "level": 70, "ascension": 5, "eidolon": 0},
        {"key": "Unknown Hero", "level": 1}
    ],
    "light_cones": [
        {"key": "Arrows", "level": 80, "ascension": 6, "superimposition": 5, "location": "March 7th", "lock": true},
        {"key": "In the Night", "level": 70, "ascension": 5, "superimposition": 1, "location": "TrailblazerDestruction"}
    ],
    "relics": [
        {"set": "Musketeer of Wild Wheat", "slot": "Body", "rarity": 5, "level": 15, "mainstat": "CRIT Rate",
         "substats": [{"key": "SPD", "value": 2.6}, {"key": "CRIT DMG_", "value": 5.8}], "location": "March 7th", "lock": true},
        {"set": "Passerby of Wandering Cloud", "slot": "Hand", "rarity": 5, "level": 15, "mainstat": "ATK",
         "substats": [], "location": "TrailblazerDestruction"},
        {"set": "Space Sealing Station", "slot": "Weapon", "rarity": 5, "level": 0, "mainstat": "HP",
         "substats": [], "location": ""}
    ]
}"#;

/// Id-keyed snapshot that resolves completely.
pub const V4_SNAPSHOT: &str = r#"{
    "source": "reliquary_archiver",
    "build": "v0.1.0",
    "version": 4,
    "metadata": {"uid": 700000002, "trailblazer": "Caelus", "current_trailblazer_path": "Harmony"},
    "characters": [
        {"id": "1102", "name": "Seele", "path": "Hunt", "level": 80, "ascension": 6, "eidolon": 2},
        {"id": 8005, "name": "Trailblazer", "path": "Harmony", "level": 50, "ascension": 3, "eidolon": 0}
    ],
    "light_cones": [
        {"id": "23001", "name": "In the Night", "level": 80, "ascension": 6, "superimposition": 1,
         "location": "1102", "lock": true, "_uid": "light_cone_1"}
    ],
    "relics": [
        {"set_id": "104", "name": "Hunter's Ice Dragon Boots", "slot": "Feet", "rarity": 5, "level": 15,
         "mainstat": "SPD", "substats": [{"key": "CRIT DMG_", "value": 12.96}], "location": "1102",
         "lock": true, "discard": false, "_uid": "relic_1"},
        {"set_id": "301", "slot": "Planar Sphere", "rarity": 5, "level": 6, "mainstat": "Fire DMG Boost",
         "substats": [], "location": "8005", "_uid": "relic_2"},
        {"set_id": 301, "slot": "Link Rope", "rarity": 5, "level": 0, "mainstat": "Energy Regeneration Rate",
         "substats": [], "location": "", "_uid": "relic_3"}
    ]
}"#;
