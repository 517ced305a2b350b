use crate::spell::{SpellDescriptor, SpellId};

/// Read-only spell table, loaded once at startup and shared by reference.
pub trait SpellOracle: Send + Sync {
    fn spell(&self, id: SpellId) -> Option<&SpellDescriptor>;
}
