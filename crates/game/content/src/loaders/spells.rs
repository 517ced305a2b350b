//! Spell catalogue loader.

use std::path::Path;

use tactics_core::SpellDescriptor;

use crate::loaders::{LoadResult, read_file};
use crate::spells::SpellTable;

/// Loader for spell catalogues from RON files.
pub struct SpellLoader;

impl SpellLoader {
    /// Load a spell catalogue from a RON file.
    ///
    /// RON format: `Vec<SpellDescriptor>`. Duplicate ids, multi-target
    /// spells with `max_targets == 0` and projectile speeds that are not a
    /// positive finite number are errors.
    pub fn load(path: &Path) -> LoadResult<SpellTable> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<SpellTable> {
        let spells: Vec<SpellDescriptor> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse spell catalogue RON: {}", e))?;

        let mut table = SpellTable::new();
        for spell in spells {
            if spell.max_targets == 0 {
                anyhow::bail!("Spell '{}' ({}) has max_targets = 0", spell.name, spell.id);
            }
            if let Some(speed) = spell.projectile_speed
                && (speed <= 0.0 || !speed.is_finite())
            {
                anyhow::bail!(
                    "Spell '{}' ({}) has invalid projectile_speed {}",
                    spell.name,
                    spell.id,
                    speed
                );
            }
            let (id, name) = (spell.id, spell.name.clone());
            if table.insert(spell).is_some() {
                anyhow::bail!("Duplicate spell id {} ('{}')", id, name);
            }
        }

        Ok(table)
    }
}
