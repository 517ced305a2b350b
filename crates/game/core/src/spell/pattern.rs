//! Spell area geometry on the integer grid.
//!
//! Everything here is pure: a pattern kind, a facing, an origin and two sizes
//! go in, a set of cells comes out.

use std::collections::BTreeSet;

use crate::grid::{Facing, GridCell};

/// Shape of the area a spell affects.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SpellPattern {
    SingleTarget,
    Cone,
    Line,
    Sphere,
    Cylinder,
    Cube,
    #[strum(serialize = "self")]
    SelfOnly,
    Aura,
    Chain,
    Wall,
}

impl SpellPattern {
    /// Origin-anchored patterns are laid out from the caster's own cell and
    /// facing; the rest are centered on a separately aimed cell.
    pub fn is_origin_anchored(self) -> bool {
        matches!(
            self,
            SpellPattern::SelfOnly
                | SpellPattern::Aura
                | SpellPattern::Cone
                | SpellPattern::Line
                | SpellPattern::Wall
        )
    }

    pub fn requires_aim(self) -> bool {
        !self.is_origin_anchored()
    }

    /// Whether preparing this pattern holds the caster's avatar in place.
    ///
    /// Cones and lines lock the body so the shape cannot swing mid-cast even
    /// though their preview never follows the player's feet.
    pub fn freezes_caster(self) -> bool {
        match self {
            SpellPattern::Cone | SpellPattern::Line => true,
            SpellPattern::SelfOnly | SpellPattern::Aura | SpellPattern::Wall => false,
            _ => self.requires_aim(),
        }
    }
}

/// Cells covered by `kind` laid out from `origin`.
///
/// `area` sizes the shape. Lines and cones fall back to `range` for their
/// length when `area` is zero.
///
/// - `Line`: `1..=length` cells straight along `facing`; the origin is excluded
/// - `Cone`: row `d` (1-based) is `d` cells wide, stepped to one side so the
///   far edge runs diagonal to the facing axis; `N(N+1)/2` cells in total
/// - `Sphere`, `Cylinder`, `Aura`: disc `dx² + dz² <= area²`
/// - `Cube`: square of Chebyshev radius `area`
/// - `Wall`: `area` cells centered on origin, perpendicular to `facing`
/// - `SelfOnly`, `SingleTarget`, `Chain`: the origin only. Chain hop
///   selection is left to the caller.
pub fn pattern_cells(
    kind: SpellPattern,
    facing: Facing,
    origin: GridCell,
    range: u32,
    area: u32,
) -> BTreeSet<GridCell> {
    let reach = (if area > 0 { area } else { range }) as i32;
    match kind {
        SpellPattern::Line => line(facing, origin, reach),
        SpellPattern::Cone => cone(facing, origin, reach),
        SpellPattern::Sphere | SpellPattern::Cylinder | SpellPattern::Aura => {
            disc(origin, area as i32)
        }
        SpellPattern::Cube => square(origin, area as i32),
        SpellPattern::Wall => wall(facing, origin, area as i32),
        SpellPattern::SelfOnly | SpellPattern::SingleTarget | SpellPattern::Chain => {
            BTreeSet::from([origin])
        }
    }
}

fn line(facing: Facing, origin: GridCell, length: i32) -> BTreeSet<GridCell> {
    (1..=length).map(|d| origin.step(facing, d)).collect()
}

fn cone(facing: Facing, origin: GridCell, length: i32) -> BTreeSet<GridCell> {
    let (fx, fz) = facing.delta();
    let mut cells = BTreeSet::new();

    if facing.is_diagonal() {
        // Row d is the anti-diagonal i + j = d + 1 inside the facing quadrant.
        for d in 1..=length {
            for i in 1..=d {
                let j = d + 1 - i;
                cells.insert(origin.offset(fx * i, fz * j));
            }
        }
    } else {
        let side = facing.perpendicular();
        for d in 1..=length {
            let row_start = origin.step(facing, d);
            for k in 0..d {
                cells.insert(row_start.step(side, k));
            }
        }
    }
    cells
}

fn disc(origin: GridCell, radius: i32) -> BTreeSet<GridCell> {
    let radius_sq = radius * radius;
    let mut cells = BTreeSet::new();
    for dx in -radius..=radius {
        for dz in -radius..=radius {
            if dx * dx + dz * dz <= radius_sq {
                cells.insert(origin.offset(dx, dz));
            }
        }
    }
    cells
}

fn square(origin: GridCell, radius: i32) -> BTreeSet<GridCell> {
    (-radius..=radius)
        .flat_map(|dx| (-radius..=radius).map(move |dz| origin.offset(dx, dz)))
        .collect()
}

fn wall(facing: Facing, origin: GridCell, length: i32) -> BTreeSet<GridCell> {
    let side = facing.perpendicular();
    let half = length / 2;
    (0..length).map(|k| origin.step(side, k - half)).collect()
}
