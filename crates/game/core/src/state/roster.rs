use std::collections::BTreeMap;

use super::{Actor, ActorId};

/// Every actor currently in grid mode, keyed by id.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ActorRoster {
    actors: BTreeMap<ActorId, Actor>,
    next_id: u32,
}

impl ActorRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next inserted actor should take. Ids are never reused
    /// within a session, and only an insert consumes one.
    pub(crate) fn next_id(&self) -> ActorId {
        ActorId(self.next_id)
    }

    pub(crate) fn insert(&mut self, actor: Actor) {
        self.next_id = self.next_id.max(actor.id().0 + 1);
        self.actors.insert(actor.id(), actor);
    }

    pub(crate) fn remove(&mut self, id: ActorId) -> Option<Actor> {
        self.actors.remove(&id)
    }

    pub(crate) fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.actors.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Actor> + '_ {
        self.actors.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.actors.keys().copied()
    }
}
