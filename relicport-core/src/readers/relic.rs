use super::{ReadContext, Resolution, Unresolved};
use crate::catalog::{AffixEntry, CatalogEntry, GameCatalog};
use crate::fuzzy::find_best_match;
use crate::models::{CanonicalRelic, MainStat, RawRelic, Substat};
use crate::stats::{Slot, Stat, StatRef};

/// Slot strings rating below this against every slot name are rejected.
pub const MIN_SLOT_RATING: f64 = 0.5;

const MAIN_STAT_DECIMALS: i32 = 4;

lazy_static::lazy_static! {
    static ref SLOT_MATCHERS: Vec<String> = Slot::display_names()
        .iter()
        .map(|name| name.to_lowercase())
        .collect();
}

/// Resolve a scanner slot string, tolerating casing and small misspellings.
pub fn resolve_slot(raw: &str) -> Resolution<Slot> {
    let query = raw.to_lowercase();
    match find_best_match(&query, &SLOT_MATCHERS) {
        Some(best) if best.rating >= MIN_SLOT_RATING => Ok(Slot::ALL[best.index]),
        _ => Err(Unresolved::UnknownSlot(raw.to_string())),
    }
}

pub fn clamp_grade(rarity: Option<i64>) -> u8 {
    rarity.unwrap_or(0).clamp(2, 5) as u8
}

pub fn clamp_enhance(level: Option<i64>) -> u8 {
    level.unwrap_or(0).clamp(0, 15) as u8
}

/// Round half-up to `decimals` places.
pub fn precision_round(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Main-stat value at `enhance` from its tier progression. Ratio stats are
/// reported as percentages.
pub fn reconstruct_main_value(entry: &AffixEntry, stat: Stat, enhance: u8) -> f64 {
    let raw = entry.base + entry.step * f64::from(enhance);
    let scaled = if stat.is_flat() { raw } else { raw * 100.0 };
    precision_round(scaled, MAIN_STAT_DECIMALS)
}

fn main_stat_identity(relic: &RawRelic, slot: Slot) -> Resolution<Stat> {
    if let Some(stat) = slot.fixed_main_stat() {
        return Ok(stat);
    }
    let name = relic.mainstat.as_deref().unwrap_or("");
    Stat::from_main_stat_name(name).ok_or_else(|| Unresolved::UnknownMainStat(name.to_string()))
}

fn read_main_stat(relic: &RawRelic, slot: Slot, grade: u8, enhance: u8, catalog: &GameCatalog) -> Resolution<MainStat> {
    let stat = main_stat_identity(relic, slot)?;
    let tier = catalog
        .main_affix(grade, slot)
        .ok_or(Unresolved::MissingAffixTier { grade, slot })?;
    let entry = tier
        .find(stat)
        .ok_or(Unresolved::MissingAffixProperty { grade, slot, stat })?;

    Ok(MainStat {
        stat,
        value: reconstruct_main_value(entry, stat, enhance),
    })
}

fn read_substats(relic: &RawRelic) -> Vec<Substat> {
    relic
        .substats
        .iter()
        .map(|s| Substat {
            stat: StatRef::from_substat_key(&s.key),
            value: s.value,
        })
        .collect()
}

/// Assemble a relic once the version-specific parts (slot, set, wearer) are
/// known.
pub(super) fn build_relic(
    relic: &RawRelic,
    slot: Slot,
    set: &CatalogEntry,
    equipped_by: Option<String>,
    ctx: &ReadContext<'_>,
) -> Resolution<CanonicalRelic> {
    let grade = clamp_grade(relic.rarity);
    let enhance = clamp_enhance(relic.level);
    let main = read_main_stat(relic, slot, grade, enhance, ctx.catalog)?;

    Ok(CanonicalRelic {
        part: slot,
        set_id: set.id.clone(),
        set: set.name.clone(),
        enhance,
        grade,
        main,
        substats: read_substats(relic),
        equipped_by,
        verified: ctx.config.speed_verified,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawSubstat;

    fn entry(property: &str, base: f64, step: f64) -> AffixEntry {
        AffixEntry {
            affix_id: None,
            property: property.to_string(),
            base,
            step,
        }
    }

    #[test]
    fn test_clamp_grade() {
        assert_eq!(clamp_grade(Some(7)), 5);
        assert_eq!(clamp_grade(Some(0)), 2);
        assert_eq!(clamp_grade(Some(-3)), 2);
        assert_eq!(clamp_grade(Some(4)), 4);
        assert_eq!(clamp_grade(None), 2);
    }

    #[test]
    fn test_clamp_enhance() {
        assert_eq!(clamp_enhance(Some(20)), 15);
        assert_eq!(clamp_enhance(Some(-1)), 0);
        assert_eq!(clamp_enhance(Some(9)), 9);
        assert_eq!(clamp_enhance(None), 0);
    }

    #[test]
    fn test_reconstruct_flat_and_percent() {
        let tier_entry = entry("AttackDelta", 42.0, 3.0);
        assert_eq!(reconstruct_main_value(&tier_entry, Stat::Atk, 10), 72.0);
        assert_eq!(reconstruct_main_value(&tier_entry, Stat::CritDmg, 10), 7200.0);
    }

    #[test]
    fn test_reconstruct_rounds_to_four_places() {
        let tier_entry = entry("CriticalChanceBase", 0.05184, 0.018144);
        assert_eq!(reconstruct_main_value(&tier_entry, Stat::CritRate, 15), 32.4);

        let tier_entry = entry("SpeedDelta", 4.032, 1.4);
        assert_eq!(reconstruct_main_value(&tier_entry, Stat::Spd, 15), 25.032);
    }

    #[test]
    fn test_precision_round_half_up() {
        assert_eq!(precision_round(1.03125, 4), 1.0313);
        assert_eq!(precision_round(2.5, 0), 3.0);
        assert_eq!(precision_round(0.00004, 4), 0.0);
    }

    #[test]
    fn test_resolve_slot() {
        assert_eq!(resolve_slot("Hand"), Ok(Slot::Hands));
        assert_eq!(resolve_slot("hands"), Ok(Slot::Hands));
        assert_eq!(resolve_slot("BODY"), Ok(Slot::Body));
        assert_eq!(resolve_slot("Planar Sphere"), Ok(Slot::PlanarSphere));
        assert_eq!(resolve_slot("LinkRope"), Ok(Slot::LinkRope));
        assert_eq!(resolve_slot("Planar Spere"), Ok(Slot::PlanarSphere));
    }

    #[test]
    fn test_resolve_slot_rejects_unrelated_strings() {
        assert_eq!(resolve_slot("Weapon"), Err(Unresolved::UnknownSlot("Weapon".to_string())));
        assert!(resolve_slot("").is_err());
    }

    #[test]
    fn test_fixed_slot_ignores_declared_main_stat() {
        let relic = RawRelic {
            mainstat: Some("CRIT DMG".to_string()),
            ..Default::default()
        };
        assert_eq!(main_stat_identity(&relic, Slot::Hands), Ok(Stat::Atk));
        assert_eq!(main_stat_identity(&relic, Slot::Head), Ok(Stat::Hp));
        assert_eq!(main_stat_identity(&relic, Slot::Body), Ok(Stat::CritDmg));
    }

    #[test]
    fn test_unknown_main_stat() {
        let relic = RawRelic {
            mainstat: Some("Luck".to_string()),
            ..Default::default()
        };
        assert_eq!(
            main_stat_identity(&relic, Slot::Feet),
            Err(Unresolved::UnknownMainStat("Luck".to_string()))
        );
    }

    #[test]
    fn test_substats_keep_unknown_values() {
        let relic = RawRelic {
            substats: vec![
                RawSubstat { key: "SPD".to_string(), value: 2.6 },
                RawSubstat { key: "Mystery_".to_string(), value: 1.5 },
            ],
            ..Default::default()
        };
        let substats = read_substats(&relic);
        assert_eq!(substats.len(), 2);
        assert_eq!(substats[0].stat, StatRef::Known(Stat::Spd));
        assert_eq!(substats[1].stat, StatRef::Unresolved("Mystery_".to_string()));
        assert_eq!(substats[1].value, 1.5);
    }
}
