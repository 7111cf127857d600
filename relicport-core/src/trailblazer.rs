//! Resolution of the player avatar to its path- and gender-specific
//! character id.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix scanners use for every reference to the player avatar.
pub const TRAILBLAZER_PREFIX: &str = "Trailblazer";

/// Id returned when neither the reference nor the snapshot names a known path.
/// This is the female Destruction id and is used for either declared gender,
/// not the male id 8001.
pub const FALLBACK_TRAILBLAZER_ID: &str = "8002";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const FEMALE_NAME: &'static str = "Stelle";

    /// Scanners report the avatar by its default name; only the female
    /// avatar's name is checked.
    pub fn from_trailblazer_name(name: &str) -> Self {
        if name == Self::FEMALE_NAME {
            Self::Female
        } else {
            Self::Male
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrailblazerPath {
    Destruction,
    Preservation,
    Harmony,
}

impl TrailblazerPath {
    pub const ALL: [TrailblazerPath; 3] = [
        TrailblazerPath::Destruction,
        TrailblazerPath::Preservation,
        TrailblazerPath::Harmony,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Destruction => "Destruction",
            Self::Preservation => "Preservation",
            Self::Harmony => "Harmony",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == name)
    }

    /// Parse a path-qualified avatar key such as `TrailblazerHarmony`.
    pub fn from_key(key: &str) -> Option<Self> {
        key.strip_prefix(TRAILBLAZER_PREFIX).and_then(Self::from_name)
    }

    /// Catalog id of this path's avatar for the given gender.
    pub fn character_id(&self, gender: Gender) -> &'static str {
        match (self, gender) {
            (Self::Destruction, Gender::Male) => "8001",
            (Self::Destruction, Gender::Female) => "8002",
            (Self::Preservation, Gender::Male) => "8003",
            (Self::Preservation, Gender::Female) => "8004",
            (Self::Harmony, Gender::Male) => "8005",
            (Self::Harmony, Gender::Female) => "8006",
        }
    }
}

impl fmt::Display for TrailblazerPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Avatar context declared by a snapshot's metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailblazerContext {
    pub gender: Gender,
    pub current_path: Option<TrailblazerPath>,
}

impl TrailblazerContext {
    pub fn new(trailblazer: &str, current_path: Option<&str>) -> Self {
        Self {
            gender: Gender::from_trailblazer_name(trailblazer),
            current_path: current_path.and_then(TrailblazerPath::from_name),
        }
    }

    pub fn is_trailblazer_key(key: &str) -> bool {
        key.starts_with(TRAILBLAZER_PREFIX)
    }

    /// Resolve an avatar reference to a character id. An explicit path in
    /// the key wins over the declared current path.
    pub fn resolve(&self, key: &str) -> &'static str {
        match TrailblazerPath::from_key(key).or(self.current_path) {
            Some(path) => path.character_id(self.gender),
            None => FALLBACK_TRAILBLAZER_ID,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destruction_by_gender() {
        let stelle = TrailblazerContext::new("Stelle", None);
        assert_eq!(stelle.resolve("TrailblazerDestruction"), "8002");

        let caelus = TrailblazerContext::new("Caelus", None);
        assert_eq!(caelus.resolve("TrailblazerDestruction"), "8001");
    }

    #[test]
    fn test_explicit_path_wins_over_declared_path() {
        let ctx = TrailblazerContext::new("Stelle", Some("Harmony"));
        assert_eq!(ctx.resolve("TrailblazerPreservation"), "8004");
        assert_eq!(ctx.resolve("TrailblazerHarmony"), "8006");
    }

    #[test]
    fn test_falls_back_to_declared_path() {
        let ctx = TrailblazerContext::new("Caelus", Some("Preservation"));
        assert_eq!(ctx.resolve("Trailblazer"), "8003");
        assert_eq!(ctx.resolve("TrailblazerUnknown"), "8003");
    }

    #[test]
    fn test_unknown_path_uses_fallback_id() {
        let ctx = TrailblazerContext::new("Caelus", Some("Stelle"));
        assert_eq!(ctx.current_path, None);
        assert_eq!(ctx.resolve("Trailblazer"), FALLBACK_TRAILBLAZER_ID);
        assert_eq!(
            FALLBACK_TRAILBLAZER_ID,
            TrailblazerPath::Destruction.character_id(Gender::Female)
        );
        assert_eq!(TrailblazerContext::new("Stelle", None).resolve("Trailblazer"), "8002");
    }

    #[test]
    fn test_from_key() {
        assert_eq!(TrailblazerPath::from_key("TrailblazerHarmony"), Some(TrailblazerPath::Harmony));
        assert_eq!(TrailblazerPath::from_key("Harmony"), None);
        assert!(TrailblazerContext::is_trailblazer_key("TrailblazerPreservation"));
        assert!(!TrailblazerContext::is_trailblazer_key("March 7th"));
    }
}
