//! Legacy name-keyed schema. Characters, light cones and relic sets are
//! referenced by display name, and the player avatar by a `Trailblazer*` key.

use super::relic::{build_relic, resolve_slot};
use super::{non_empty, ReadContext, Resolution, SnapshotReader, Unresolved};
use crate::models::{CanonicalCharacter, CanonicalRelic, RawCharacter, RawLightCone, RawRelic};
use crate::trailblazer::TrailblazerContext;
use crate::version::SchemaVersion;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct V3Reader;

impl V3Reader {
    fn find_light_cone<'a>(key: &str, light_cones: &'a [RawLightCone]) -> Option<&'a RawLightCone> {
        let exact = light_cones.iter().find(|lc| lc.location() == key);
        if exact.is_some() || !TrailblazerContext::is_trailblazer_key(key) {
            return exact;
        }
        // Avatar light cones may be filed under a different path's key.
        light_cones
            .iter()
            .find(|lc| TrailblazerContext::is_trailblazer_key(lc.location()))
    }
}

impl SnapshotReader for V3Reader {
    fn schema_version(&self) -> SchemaVersion {
        SchemaVersion::V3
    }

    fn read_character(
        &self,
        character: &RawCharacter,
        light_cones: &[RawLightCone],
        ctx: &ReadContext<'_>,
    ) -> Resolution<CanonicalCharacter> {
        let key = non_empty(character.key.as_deref()).ok_or(Unresolved::MissingCharacterId)?;

        let character_id = if TrailblazerContext::is_trailblazer_key(key) {
            ctx.trailblazer.resolve(key).to_string()
        } else {
            ctx.catalog
                .character_by_name(key)
                .map(|c| c.id.clone())
                .ok_or_else(|| Unresolved::UnknownCharacter(key.to_string()))?
        };

        let light_cone = Self::find_light_cone(key, light_cones);
        let light_cone_id = light_cone
            .and_then(|lc| lc.key.as_deref())
            .and_then(|name| ctx.catalog.light_cone_by_name(name))
            .map(|lc| lc.id.clone());

        if light_cone.is_some() && light_cone_id.is_none() {
            tracing::debug!("Light cone equipped by '{}' is not in the catalog", key);
        }

        Ok(CanonicalCharacter::new(character_id, character, light_cone, light_cone_id))
    }

    fn read_relic(&self, relic: &RawRelic, ctx: &ReadContext<'_>) -> Resolution<CanonicalRelic> {
        let slot = resolve_slot(&relic.slot)?;

        let set_name = non_empty(relic.set.as_deref()).ok_or(Unresolved::MissingRelicSet)?;
        let (set, rating) = ctx
            .catalog
            .match_relic_set(set_name)
            .ok_or_else(|| Unresolved::UnknownRelicSet(set_name.to_string()))?;
        tracing::debug!("Matched relic set '{}' to '{}' ({:.3})", set_name, set.name, rating);

        let equipped_by = relic.location().and_then(|location| {
            ctx.catalog
                .character_by_name(location)
                .map(|c| c.id.clone())
                .or_else(|| {
                    TrailblazerContext::is_trailblazer_key(location)
                        .then(|| ctx.trailblazer.resolve(location).to_string())
                })
        });

        build_relic(relic, slot, set, equipped_by, ctx)
    }
}
