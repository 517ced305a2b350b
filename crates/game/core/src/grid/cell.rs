use std::fmt;

/// Discrete grid cell expressed in integer (x, z) coordinates.
///
/// The world's vertical axis is `y`; the grid lies on the horizontal plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCell {
    pub x: i32,
    pub z: i32,
}

impl GridCell {
    pub const ORIGIN: Self = Self { x: 0, z: 0 };

    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Returns the cell offset by `(dx, dz)`.
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.z + dz)
    }

    /// Returns the cell `distance` steps away along `facing`.
    pub fn step(self, facing: Facing, distance: i32) -> Self {
        let (dx, dz) = facing.delta();
        self.offset(dx * distance, dz * distance)
    }

    /// Chebyshev distance to `other`.
    pub fn distance(self, other: GridCell) -> u32 {
        chebyshev(self, other)
    }
}

impl Default for GridCell {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Canonical range and adjacency metric: `max(|dx|, |dz|)`.
///
/// A diagonal neighbour is one step away, matching the tabletop convention
/// used for range checks everywhere in the crate.
pub fn chebyshev(a: GridCell, b: GridCell) -> u32 {
    let dx = a.x.abs_diff(b.x);
    let dz = a.z.abs_diff(b.z);
    dx.max(dz)
}

/// Continuous position in world space.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldPoint {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// One of the eight compass directions an actor can face.
///
/// North is `+z`, east is `+x`.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Facing {
    #[default]
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Facing {
    /// All directions in clockwise order starting from north.
    pub const ALL: [Facing; 8] = [
        Facing::North,
        Facing::NorthEast,
        Facing::East,
        Facing::SouthEast,
        Facing::South,
        Facing::SouthWest,
        Facing::West,
        Facing::NorthWest,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Facing::North => (0, 1),
            Facing::NorthEast => (1, 1),
            Facing::East => (1, 0),
            Facing::SouthEast => (1, -1),
            Facing::South => (0, -1),
            Facing::SouthWest => (-1, -1),
            Facing::West => (-1, 0),
            Facing::NorthWest => (-1, 1),
        }
    }

    /// Direction of travel for a step of `(dx, dz)`; `None` for no movement.
    pub fn from_delta(dx: i32, dz: i32) -> Option<Facing> {
        let facing = match (dx.signum(), dz.signum()) {
            (0, 1) => Facing::North,
            (1, 1) => Facing::NorthEast,
            (1, 0) => Facing::East,
            (1, -1) => Facing::SouthEast,
            (0, -1) => Facing::South,
            (-1, -1) => Facing::SouthWest,
            (-1, 0) => Facing::West,
            (-1, 1) => Facing::NorthWest,
            _ => return None,
        };
        Some(facing)
    }

    pub fn is_diagonal(self) -> bool {
        let (dx, dz) = self.delta();
        dx != 0 && dz != 0
    }

    /// Rotates clockwise by `eighths` eighth-turns.
    pub fn rotate(self, eighths: i32) -> Facing {
        let index = Self::ALL.iter().position(|f| *f == self).unwrap_or(0) as i32;
        Self::ALL[(index + eighths).rem_euclid(8) as usize]
    }

    /// The direction a quarter turn clockwise from this one.
    pub fn perpendicular(self) -> Facing {
        self.rotate(2)
    }
}
