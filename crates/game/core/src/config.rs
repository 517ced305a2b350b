/// Tactics configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TacticsConfig {
    /// Width of one grid cell in world units.
    pub cell_size: f32,

    /// A step whose ground rises by this much or more is too steep to climb.
    pub climb_limit: f32,

    /// A step whose ground drops by more than this is too steep to descend.
    pub drop_limit: f32,

    /// Budget cost of a step along one axis.
    pub cardinal_cost: f32,

    /// Budget cost of a step that changes both axes.
    pub diagonal_cost: f32,

    /// Casting sessions older than this are discarded on next use.
    pub cast_timeout_secs: u64,

    /// Ring radius searched for a free cell when an actor is spawned.
    pub spawn_search_radius: u32,

    /// How long a resolved or cancelled preview stays on screen.
    pub overlay_linger_ms: u64,
}

impl TacticsConfig {
    // ===== compile-time constants =====
    /// Upper bound on confirmed targets for any multi-target spell.
    pub const MAX_TARGETS: usize = 8;
    /// Sides of the initiative die.
    pub const INITIATIVE_DIE: u32 = 20;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_CELL_SIZE: f32 = 2.0;
    pub const DEFAULT_CLIMB_LIMIT: f32 = 3.0;
    pub const DEFAULT_DROP_LIMIT: f32 = 4.0;
    pub const DEFAULT_CARDINAL_COST: f32 = 1.0;
    pub const DEFAULT_DIAGONAL_COST: f32 = 1.5;
    pub const DEFAULT_CAST_TIMEOUT_SECS: u64 = 60;
    pub const DEFAULT_SPAWN_SEARCH_RADIUS: u32 = 3;
    pub const DEFAULT_OVERLAY_LINGER_MS: u64 = 1500;

    pub fn new() -> Self {
        Self {
            cell_size: Self::DEFAULT_CELL_SIZE,
            climb_limit: Self::DEFAULT_CLIMB_LIMIT,
            drop_limit: Self::DEFAULT_DROP_LIMIT,
            cardinal_cost: Self::DEFAULT_CARDINAL_COST,
            diagonal_cost: Self::DEFAULT_DIAGONAL_COST,
            cast_timeout_secs: Self::DEFAULT_CAST_TIMEOUT_SECS,
            spawn_search_radius: Self::DEFAULT_SPAWN_SEARCH_RADIUS,
            overlay_linger_ms: Self::DEFAULT_OVERLAY_LINGER_MS,
        }
    }

    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn with_cast_timeout_secs(mut self, secs: u64) -> Self {
        self.cast_timeout_secs = secs;
        self
    }

    pub fn with_overlay_linger_ms(mut self, ms: u64) -> Self {
        self.overlay_linger_ms = ms;
        self
    }

    pub fn cast_timeout(&self) -> core::time::Duration {
        core::time::Duration::from_secs(self.cast_timeout_secs)
    }

    pub fn overlay_linger(&self) -> core::time::Duration {
        core::time::Duration::from_millis(self.overlay_linger_ms)
    }
}

impl Default for TacticsConfig {
    fn default() -> Self {
        Self::new()
    }
}
