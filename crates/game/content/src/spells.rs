//! In-memory spell table served through [`tactics_core::SpellOracle`].
use std::collections::BTreeMap;

use tactics_core::{SpellDescriptor, SpellId, SpellOracle};

/// Immutable spell catalogue, loaded once and shared by reference.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpellTable {
    spells: BTreeMap<SpellId, SpellDescriptor>,
}

impl SpellTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a spell, returning the one it replaced if the id was taken.
    pub fn insert(&mut self, spell: SpellDescriptor) -> Option<SpellDescriptor> {
        self.spells.insert(spell.id, spell)
    }

    pub fn get(&self, id: SpellId) -> Option<&SpellDescriptor> {
        self.spells.get(&id)
    }

    /// Case-insensitive lookup by display name, for the command layer.
    pub fn by_name(&self, name: &str) -> Option<&SpellDescriptor> {
        self.spells
            .values()
            .find(|spell| spell.name.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpellDescriptor> + '_ {
        self.spells.values()
    }
}

impl FromIterator<SpellDescriptor> for SpellTable {
    fn from_iter<I: IntoIterator<Item = SpellDescriptor>>(iter: I) -> Self {
        let mut table = Self::new();
        for spell in iter {
            table.insert(spell);
        }
        table
    }
}

impl SpellOracle for SpellTable {
    fn spell(&self, id: SpellId) -> Option<&SpellDescriptor> {
        self.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::SpellPattern;

    #[test]
    fn lookup_by_id_and_name() {
        let table: SpellTable = [
            SpellDescriptor::new(SpellId(1), "Fire Bolt", SpellPattern::SingleTarget),
            SpellDescriptor::new(SpellId(2), "Burning Hands", SpellPattern::Cone),
        ]
        .into_iter()
        .collect();

        assert_eq!(table.len(), 2);
        assert_eq!(table.spell(SpellId(2)).map(|s| s.pattern), Some(SpellPattern::Cone));
        assert_eq!(table.by_name("fire bolt").map(|s| s.id), Some(SpellId(1)));
        assert!(table.spell(SpellId(9)).is_none());
    }
}
