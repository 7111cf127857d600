//! Snapshot input schema and canonical output records.

use crate::stats::{Slot, Stat, StatRef};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Scanner snapshot as found on disk. Every field is optional except where
/// the importer cannot work without it; defaults are applied by the readers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportSnapshot {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub build: Option<String>,
    /// Schema version; missing is read as 0 and rejected by the router.
    #[serde(default, deserialize_with = "de::version_tag")]
    pub version: Option<VersionTag>,
    #[serde(default)]
    pub metadata: SnapshotMetadata,
    #[serde(default, deserialize_with = "de::null_as_empty")]
    pub characters: Vec<RawEntry<RawCharacter>>,
    #[serde(default, deserialize_with = "de::null_as_empty")]
    pub light_cones: Vec<RawEntry<RawLightCone>>,
    #[serde(default, deserialize_with = "de::null_as_empty")]
    pub relics: Vec<RawEntry<RawRelic>>,
}

/// Declared schema tag. Only whole numbers can name a schema; anything else
/// is kept verbatim for the error report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionTag {
    Integer(i64),
    Other(String),
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(tag) => write!(f, "{}", tag),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

/// One entry of a snapshot list. An entry that does not fit its record
/// schema is kept as `Malformed` with the decode error, so the rest of the
/// snapshot still imports.
#[derive(Debug, Clone)]
pub enum RawEntry<T> {
    Parsed(T),
    Malformed(String),
}

impl<T> RawEntry<T> {
    pub fn parsed(&self) -> Option<&T> {
        match self {
            Self::Parsed(value) => Some(value),
            Self::Malformed(_) => None,
        }
    }
}

impl<T> From<T> for RawEntry<T> {
    fn from(value: T) -> Self {
        Self::Parsed(value)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for RawEntry<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match serde_json::from_value(value) {
            Ok(parsed) => Self::Parsed(parsed),
            Err(e) => Self::Malformed(e.to_string()),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotMetadata {
    #[serde(default, deserialize_with = "de::lenient_int")]
    pub uid: Option<i64>,
    #[serde(default)]
    pub trailblazer: Option<String>,
    #[serde(default)]
    pub current_trailblazer_path: Option<String>,
}

/// Character entry. v4 scanners fill `id`, v3 scanners fill `key` with the
/// display name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCharacter {
    #[serde(default, deserialize_with = "de::lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_int")]
    pub level: Option<i64>,
    #[serde(default, deserialize_with = "de::lenient_int")]
    pub ascension: Option<i64>,
    #[serde(default, deserialize_with = "de::lenient_int")]
    pub eidolon: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLightCone {
    #[serde(default, deserialize_with = "de::lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_int")]
    pub level: Option<i64>,
    #[serde(default, deserialize_with = "de::lenient_int")]
    pub ascension: Option<i64>,
    #[serde(default, deserialize_with = "de::lenient_int")]
    pub superimposition: Option<i64>,
    #[serde(default, deserialize_with = "de::lenient_id")]
    pub location: Option<String>,
    #[serde(default)]
    pub lock: bool,
    #[serde(default, rename = "_uid", deserialize_with = "de::lenient_id")]
    pub uid: Option<String>,
}

impl RawLightCone {
    pub fn location(&self) -> &str {
        self.location.as_deref().unwrap_or("")
    }
}

/// Relic entry. v4 scanners fill `set_id`, v3 scanners fill `set` with the
/// set display name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRelic {
    #[serde(default, deserialize_with = "de::lenient_id")]
    pub set_id: Option<String>,
    #[serde(default)]
    pub set: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slot: String,
    #[serde(default, deserialize_with = "de::lenient_int")]
    pub rarity: Option<i64>,
    #[serde(default, deserialize_with = "de::lenient_int")]
    pub level: Option<i64>,
    #[serde(default)]
    pub mainstat: Option<String>,
    #[serde(default, deserialize_with = "de::null_as_empty")]
    pub substats: Vec<RawSubstat>,
    #[serde(default, deserialize_with = "de::lenient_id")]
    pub location: Option<String>,
    #[serde(default)]
    pub lock: bool,
    #[serde(default)]
    pub discard: bool,
    #[serde(default, rename = "_uid", deserialize_with = "de::lenient_id")]
    pub uid: Option<String>,
}

impl RawRelic {
    /// Equipping character reference, if the relic is equipped at all.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref().filter(|l| !l.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSubstat {
    #[serde(default)]
    pub key: String,
    #[serde(default, deserialize_with = "de::lenient_float")]
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalCharacter {
    pub character_id: String,
    pub character_level: u32,
    pub character_eidolon: u32,
    pub light_cone: Option<String>,
    pub light_cone_level: u32,
    pub light_cone_superimposition: u32,
}

impl CanonicalCharacter {
    pub const DEFAULT_LEVEL: u32 = 80;
    pub const DEFAULT_EIDOLON: u32 = 0;
    pub const DEFAULT_LIGHT_CONE_LEVEL: u32 = 80;
    pub const DEFAULT_SUPERIMPOSITION: u32 = 1;

    /// Build a record, substituting defaults for absent or zero values.
    pub fn new(
        character_id: String,
        character: &RawCharacter,
        light_cone: Option<&RawLightCone>,
        light_cone_id: Option<String>,
    ) -> Self {
        Self {
            character_id,
            character_level: positive(character.level).unwrap_or(Self::DEFAULT_LEVEL),
            character_eidolon: positive(character.eidolon).unwrap_or(Self::DEFAULT_EIDOLON),
            light_cone: light_cone_id,
            light_cone_level: light_cone
                .and_then(|lc| positive(lc.level))
                .unwrap_or(Self::DEFAULT_LIGHT_CONE_LEVEL),
            light_cone_superimposition: light_cone
                .and_then(|lc| positive(lc.superimposition))
                .unwrap_or(Self::DEFAULT_SUPERIMPOSITION),
        }
    }
}

fn positive(value: Option<i64>) -> Option<u32> {
    value.filter(|v| *v > 0).and_then(|v| u32::try_from(v).ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MainStat {
    pub stat: Stat,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Substat {
    pub stat: StatRef,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRelic {
    pub part: Slot,
    pub set_id: String,
    pub set: String,
    pub enhance: u8,
    pub grade: u8,
    pub main: MainStat,
    pub substats: Vec<Substat>,
    pub equipped_by: Option<String>,
    pub verified: bool,
}

/// Lenient deserializers for scanner fields that have been emitted both as
/// numbers and as strings.
pub(crate) mod de {
    use super::VersionTag;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Int(i64),
        Float(f64),
        Str(String),
    }

    /// Integer field; numeric strings parse, fractional values truncate and
    /// garbage reads as absent.
    pub fn lenient_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        let value = Option::<NumberOrString>::deserialize(deserializer)?;
        Ok(value.and_then(|v| match v {
            NumberOrString::Int(i) => Some(i),
            NumberOrString::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            NumberOrString::Float(_) => None,
            NumberOrString::Str(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            }
        }))
    }

    /// Schema tag; integral numbers and integer strings are tags, every
    /// other value is kept as written.
    pub fn version_tag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<VersionTag>, D::Error> {
        let value = Option::<NumberOrString>::deserialize(deserializer)?;
        Ok(value.map(|v| match v {
            NumberOrString::Int(i) => VersionTag::Integer(i),
            NumberOrString::Float(f) if f.is_finite() && f.fract() == 0.0 => VersionTag::Integer(f as i64),
            NumberOrString::Float(f) => VersionTag::Other(f.to_string()),
            NumberOrString::Str(s) => match s.trim().parse::<i64>() {
                Ok(i) => VersionTag::Integer(i),
                Err(_) => VersionTag::Other(s),
            },
        }))
    }

    pub fn lenient_float<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        let value = Option::<NumberOrString>::deserialize(deserializer)?;
        Ok(value
            .and_then(|v| match v {
                NumberOrString::Int(i) => Some(i as f64),
                NumberOrString::Float(f) => Some(f),
                NumberOrString::Str(s) => s.trim().parse::<f64>().ok(),
            })
            .unwrap_or(0.0))
    }

    /// Identifier field; numbers are kept in their decimal string form.
    pub fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let value = Option::<NumberOrString>::deserialize(deserializer)?;
        Ok(value.map(|v| match v {
            NumberOrString::Int(i) => i.to_string(),
            NumberOrString::Float(f) => f.to_string(),
            NumberOrString::Str(s) => s,
        }))
    }

    pub fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
    }
}
