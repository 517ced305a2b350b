//! Actor blueprint loader.

use std::collections::HashSet;
use std::path::Path;

use tactics_core::ActorSpec;

use crate::loaders::{LoadResult, read_file};

/// Loader for actor blueprints from RON files.
pub struct ActorLoader;

impl ActorLoader {
    /// Load actor blueprints from a RON file.
    ///
    /// RON format: `Vec<(String, ActorSpec)>`, keyed by a content id that
    /// spawn commands refer to.
    ///
    /// # Returns
    ///
    /// Returns the blueprints in file order.
    pub fn load(path: &Path) -> LoadResult<Vec<(String, ActorSpec)>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<(String, ActorSpec)>> {
        let actors: Vec<(String, ActorSpec)> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse actor catalog RON: {}", e))?;

        let mut seen = HashSet::new();
        for (key, spec) in &actors {
            if !seen.insert(key.as_str()) {
                anyhow::bail!("Duplicate actor id '{}'", key);
            }
            if spec.movement < 0.0 {
                anyhow::bail!("Actor '{}' has negative movement {}", key, spec.movement);
            }
        }

        Ok(actors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use tactics_core::{ActorKind, Locomotion};

    #[test]
    fn loads_blueprints_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                ("hero", (name: "Aria", kind: Player, initiative_modifier: 3, movement: 6.0, health: 24, spell_slots: 2)),
                ("bat", (name: "Bat", kind: Monster, locomotion: Flying, movement: 8.0, health: 4)),
            ]"#
        )
        .unwrap();

        let actors = ActorLoader::load(file.path()).unwrap();
        assert_eq!(actors.len(), 2);

        let (key, hero) = &actors[0];
        assert_eq!(key, "hero");
        assert_eq!(hero.kind, ActorKind::Player);
        assert_eq!(hero.locomotion, Locomotion::Walking);
        assert_eq!(hero.spell_slots, 2);

        assert_eq!(actors[1].1.locomotion, Locomotion::Flying);
        assert_eq!(actors[1].1.initiative_modifier, 0);
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let content = r#"[
            ("a", (name: "A", kind: Monster, movement: 6.0, health: 1)),
            ("a", (name: "B", kind: Monster, movement: 6.0, health: 1)),
        ]"#;
        assert!(ActorLoader::parse(content).is_err());
    }
}
