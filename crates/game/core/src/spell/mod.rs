//! Spells: descriptors, area patterns and the casting state machine.
mod descriptor;
mod error;
mod pattern;
mod session;

pub use descriptor::{DamageKind, SpellDescriptor, SpellEffect, SpellId};
pub use error::CastError;
pub use pattern::{SpellPattern, pattern_cells};
pub use session::{
    CastingRegistry, CastingSession, ConfirmOutcome, ResolvedCast, SessionState,
};
