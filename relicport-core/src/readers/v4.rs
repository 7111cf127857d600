//! Id-keyed schema. Characters, light cones and relic sets carry stable
//! catalog ids, and equip locations are character ids.

use super::relic::{build_relic, resolve_slot};
use super::{non_empty, ReadContext, Resolution, SnapshotReader, Unresolved};
use crate::models::{CanonicalCharacter, CanonicalRelic, RawCharacter, RawLightCone, RawRelic};
use crate::version::SchemaVersion;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct V4Reader;

impl SnapshotReader for V4Reader {
    fn schema_version(&self) -> SchemaVersion {
        SchemaVersion::V4
    }

    fn read_character(
        &self,
        character: &RawCharacter,
        light_cones: &[RawLightCone],
        ctx: &ReadContext<'_>,
    ) -> Resolution<CanonicalCharacter> {
        let id = non_empty(character.id.as_deref()).ok_or(Unresolved::MissingCharacterId)?;
        let entry = ctx
            .catalog
            .character_by_id(id)
            .ok_or_else(|| Unresolved::UnknownCharacter(id.to_string()))?;

        // TODO: index light cones by location once per snapshot instead of a scan per character
        let light_cone = light_cones.iter().find(|lc| lc.location() == id);
        let light_cone_id = light_cone
            .and_then(|lc| lc.id.as_deref())
            .and_then(|lc_id| ctx.catalog.light_cone_by_id(lc_id))
            .map(|lc| lc.id.clone());

        Ok(CanonicalCharacter::new(entry.id.clone(), character, light_cone, light_cone_id))
    }

    fn read_relic(&self, relic: &RawRelic, ctx: &ReadContext<'_>) -> Resolution<CanonicalRelic> {
        let slot = resolve_slot(&relic.slot)?;

        let set_id = non_empty(relic.set_id.as_deref()).ok_or(Unresolved::MissingRelicSet)?;
        let set = ctx
            .catalog
            .relic_set_by_id(set_id)
            .ok_or_else(|| Unresolved::UnknownRelicSet(set_id.to_string()))?;

        let equipped_by = relic
            .location()
            .and_then(|location| ctx.catalog.character_by_id(location))
            .map(|c| c.id.clone());

        build_relic(relic, slot, set, equipped_by, ctx)
    }
}
