//! Applying resolved spell effects to the actors standing in their cells.
//!
//! Resolution is deterministic: cells are visited in grid order and no
//! randomness is involved. Damage saturates at zero health and heals clamp
//! at the actor's maximum.

mod resolve;
mod result;

pub use resolve::resolve_cast;
pub use result::{EffectKind, EffectOutcome};
