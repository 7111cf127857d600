//! Stat and slot identifiers, and the static tables mapping scanner display
//! strings onto them.
//!
//! Every mapping is driven by a single row table per enumeration; the reverse
//! indexes are built once on first use. Scanners name the same stat three
//! different ways (main-stat display name, substat key with a trailing `_` for
//! percentages, and the affix property used by the tier tables), so each row
//! carries all of them.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    #[serde(rename = "HP")]
    Hp,
    #[serde(rename = "HP%")]
    HpPercent,
    #[serde(rename = "ATK")]
    Atk,
    #[serde(rename = "ATK%")]
    AtkPercent,
    #[serde(rename = "DEF")]
    Def,
    #[serde(rename = "DEF%")]
    DefPercent,
    #[serde(rename = "SPD")]
    Spd,
    #[serde(rename = "CRIT Rate")]
    CritRate,
    #[serde(rename = "CRIT DMG")]
    CritDmg,
    #[serde(rename = "Effect Hit Rate")]
    EffectHitRate,
    #[serde(rename = "Effect RES")]
    EffectRes,
    #[serde(rename = "Break Effect")]
    BreakEffect,
    #[serde(rename = "Energy Regeneration Rate")]
    EnergyRegenerationRate,
    #[serde(rename = "Outgoing Healing Boost")]
    OutgoingHealingBoost,
    #[serde(rename = "Physical DMG Boost")]
    PhysicalDmg,
    #[serde(rename = "Fire DMG Boost")]
    FireDmg,
    #[serde(rename = "Ice DMG Boost")]
    IceDmg,
    #[serde(rename = "Lightning DMG Boost")]
    LightningDmg,
    #[serde(rename = "Wind DMG Boost")]
    WindDmg,
    #[serde(rename = "Quantum DMG Boost")]
    QuantumDmg,
    #[serde(rename = "Imaginary DMG Boost")]
    ImaginaryDmg,
}

struct StatRow {
    stat: Stat,
    id: &'static str,
    affix_property: &'static str,
    main_stat_name: Option<&'static str>,
    substat_key: Option<&'static str>,
    flat: bool,
}

const fn row(
    stat: Stat,
    id: &'static str,
    affix_property: &'static str,
    main_stat_name: Option<&'static str>,
    substat_key: Option<&'static str>,
    flat: bool,
) -> StatRow {
    StatRow {
        stat,
        id,
        affix_property,
        main_stat_name,
        substat_key,
        flat,
    }
}

// Row order must follow the declaration order of `Stat`.
const STAT_TABLE: [StatRow; 21] = [
    row(Stat::Hp, "HP", "HPDelta", None, Some("HP"), true),
    row(Stat::HpPercent, "HP%", "HPAddedRatio", Some("HP"), Some("HP_"), false),
    row(Stat::Atk, "ATK", "AttackDelta", None, Some("ATK"), true),
    row(Stat::AtkPercent, "ATK%", "AttackAddedRatio", Some("ATK"), Some("ATK_"), false),
    row(Stat::Def, "DEF", "DefenceDelta", None, Some("DEF"), true),
    row(Stat::DefPercent, "DEF%", "DefenceAddedRatio", Some("DEF"), Some("DEF_"), false),
    row(Stat::Spd, "SPD", "SpeedDelta", Some("SPD"), Some("SPD"), true),
    row(Stat::CritRate, "CRIT Rate", "CriticalChanceBase", Some("CRIT Rate"), Some("CRIT Rate_"), false),
    row(Stat::CritDmg, "CRIT DMG", "CriticalDamageBase", Some("CRIT DMG"), Some("CRIT DMG_"), false),
    row(Stat::EffectHitRate, "Effect Hit Rate", "StatusProbabilityBase", Some("Effect Hit Rate"), Some("Effect Hit Rate_"), false),
    row(Stat::EffectRes, "Effect RES", "StatusResistanceBase", None, Some("Effect RES_"), false),
    row(Stat::BreakEffect, "Break Effect", "BreakDamageAddedRatioBase", Some("Break Effect"), Some("Break Effect_"), false),
    row(Stat::EnergyRegenerationRate, "Energy Regeneration Rate", "SPRatioBase", Some("Energy Regeneration Rate"), None, false),
    row(Stat::OutgoingHealingBoost, "Outgoing Healing Boost", "HealRatioBase", Some("Outgoing Healing Boost"), None, false),
    row(Stat::PhysicalDmg, "Physical DMG Boost", "PhysicalAddedRatio", Some("Physical DMG Boost"), None, false),
    row(Stat::FireDmg, "Fire DMG Boost", "FireAddedRatio", Some("Fire DMG Boost"), None, false),
    row(Stat::IceDmg, "Ice DMG Boost", "IceAddedRatio", Some("Ice DMG Boost"), None, false),
    row(Stat::LightningDmg, "Lightning DMG Boost", "ThunderAddedRatio", Some("Lightning DMG Boost"), None, false),
    row(Stat::WindDmg, "Wind DMG Boost", "WindAddedRatio", Some("Wind DMG Boost"), None, false),
    row(Stat::QuantumDmg, "Quantum DMG Boost", "QuantumAddedRatio", Some("Quantum DMG Boost"), None, false),
    row(Stat::ImaginaryDmg, "Imaginary DMG Boost", "ImaginaryAddedRatio", Some("Imaginary DMG Boost"), None, false),
];

lazy_static! {
    static ref STATS_BY_ID: HashMap<&'static str, Stat> =
        STAT_TABLE.iter().map(|r| (r.id, r.stat)).collect();
    static ref STATS_BY_AFFIX: HashMap<&'static str, Stat> =
        STAT_TABLE.iter().map(|r| (r.affix_property, r.stat)).collect();
    static ref STATS_BY_MAIN_NAME: HashMap<&'static str, Stat> = STAT_TABLE
        .iter()
        .filter_map(|r| r.main_stat_name.map(|name| (name, r.stat)))
        .collect();
    static ref STATS_BY_SUBSTAT_KEY: HashMap<&'static str, Stat> = STAT_TABLE
        .iter()
        .filter_map(|r| r.substat_key.map(|key| (key, r.stat)))
        .collect();
}

impl Stat {
    fn row(self) -> &'static StatRow {
        &STAT_TABLE[self as usize]
    }

    /// Canonical identifier used in output records.
    pub fn as_str(self) -> &'static str {
        self.row().id
    }

    /// Property name of this stat in the main-affix tier tables.
    pub fn affix_property(self) -> &'static str {
        self.row().affix_property
    }

    /// Flat stats keep their tier value as-is; everything else is a ratio
    /// that is reported as a percentage.
    pub fn is_flat(self) -> bool {
        self.row().flat
    }

    pub fn from_id(id: &str) -> Option<Self> {
        STATS_BY_ID.get(id).copied()
    }

    pub fn from_affix_property(property: &str) -> Option<Self> {
        STATS_BY_AFFIX.get(property).copied()
    }

    /// Resolve a scanner main-stat display name. Bare `ATK`/`HP`/`DEF` denote
    /// the percentage variants here; the flat ones only appear on fixed slots.
    pub fn from_main_stat_name(name: &str) -> Option<Self> {
        STATS_BY_MAIN_NAME.get(name).copied()
    }

    pub fn from_substat_key(key: &str) -> Option<Self> {
        STATS_BY_SUBSTAT_KEY.get(key).copied()
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A substat identity that may not have resolved. Serializes to the canonical
/// stat id, or to `"unresolved"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatRef {
    Known(Stat),
    Unresolved(String),
}

impl StatRef {
    pub const UNRESOLVED: &'static str = "unresolved";

    pub fn from_substat_key(key: &str) -> Self {
        match Stat::from_substat_key(key) {
            Some(stat) => Self::Known(stat),
            None => Self::Unresolved(key.to_string()),
        }
    }

    pub fn stat(&self) -> Option<Stat> {
        match self {
            Self::Known(stat) => Some(*stat),
            Self::Unresolved(_) => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Known(stat) => stat.as_str(),
            Self::Unresolved(_) => Self::UNRESOLVED,
        }
    }
}

impl Serialize for StatRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    Head,
    Hands,
    Body,
    Feet,
    PlanarSphere,
    LinkRope,
}

struct SlotRow {
    slot: Slot,
    id: &'static str,
    display_name: &'static str,
    index: u8,
}

// Row order must follow the declaration order of `Slot`.
const SLOT_TABLE: [SlotRow; 6] = [
    SlotRow { slot: Slot::Head, id: "Head", display_name: "Head", index: 1 },
    SlotRow { slot: Slot::Hands, id: "Hands", display_name: "Hands", index: 2 },
    SlotRow { slot: Slot::Body, id: "Body", display_name: "Body", index: 3 },
    SlotRow { slot: Slot::Feet, id: "Feet", display_name: "Feet", index: 4 },
    SlotRow { slot: Slot::PlanarSphere, id: "PlanarSphere", display_name: "Planar Sphere", index: 5 },
    SlotRow { slot: Slot::LinkRope, id: "LinkRope", display_name: "Link Rope", index: 6 },
];

lazy_static! {
    static ref SLOTS_BY_ID: HashMap<&'static str, Slot> =
        SLOT_TABLE.iter().map(|r| (r.id, r.slot)).collect();
    static ref SLOT_DISPLAY_NAMES: Vec<&'static str> =
        SLOT_TABLE.iter().map(|r| r.display_name).collect();
}

impl Slot {
    pub const ALL: [Slot; 6] = [
        Slot::Head,
        Slot::Hands,
        Slot::Body,
        Slot::Feet,
        Slot::PlanarSphere,
        Slot::LinkRope,
    ];

    fn row(self) -> &'static SlotRow {
        &SLOT_TABLE[self as usize]
    }

    pub fn as_str(self) -> &'static str {
        self.row().id
    }

    pub fn display_name(self) -> &'static str {
        self.row().display_name
    }

    /// 1-based position used to key the main-affix tier tables.
    pub fn index(self) -> u8 {
        self.row().index
    }

    pub fn from_id(id: &str) -> Option<Self> {
        SLOTS_BY_ID.get(id).copied()
    }

    /// Display names in `Slot::ALL` order, for similarity matching.
    pub fn display_names() -> &'static [&'static str] {
        &SLOT_DISPLAY_NAMES
    }

    /// Main stat every piece in this slot carries regardless of what the
    /// scanner declared.
    pub fn fixed_main_stat(self) -> Option<Stat> {
        match self {
            Slot::Hands => Some(Stat::Atk),
            Slot::Head => Some(Stat::Hp),
            _ => None,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
