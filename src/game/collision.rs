use crate::game::Direction;

/// One-dimensional interval test used by every footprint check.
///
/// Only one cross-comparison is made per branch. For well-formed intervals this
/// is an ordinary intersection test; call sites that pass the same value for
/// both ends of the second interval get a point-containment test instead.
pub fn overlap(a: f32, a_end: f32, b: f32, b_end: f32) -> bool {
    if a <= b {
        b <= a_end
    } else {
        a <= b_end
    }
}

/// Axis-aligned rectangle on the ground plane, stored as centre and half-extents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
    pub x: f32,
    pub z: f32,
    pub half_x: f32,
    pub half_z: f32,
}

impl Footprint {
    pub fn new(x: f32, z: f32, half_x: f32, half_z: f32) -> Self {
        Footprint { x, z, half_x, half_z }
    }

    pub fn x_range(&self) -> (f32, f32) {
        (self.x - self.half_x, self.x + self.half_x)
    }

    pub fn z_range(&self) -> (f32, f32) {
        (self.z - self.half_z, self.z + self.half_z)
    }

    pub fn overlaps(&self, other: &Footprint) -> bool {
        let (ax, ax_end) = self.x_range();
        let (bx, bx_end) = other.x_range();
        let (az, az_end) = self.z_range();
        let (bz, bz_end) = other.z_range();
        overlap(ax, ax_end, bx, bx_end) && overlap(az, az_end, bz, bz_end)
    }
}

/// What obstacles and lanes get to see of the player during a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerProbe {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub half: f32,
    pub jumping: bool,
    pub sinking: bool,
}

impl PlayerProbe {
    pub fn footprint(&self) -> Footprint {
        Footprint::new(self.x, self.z, self.half, self.half)
    }

    pub fn grounded(&self) -> bool {
        self.y <= GROUND_TOLERANCE
    }
}

const GROUND_TOLERANCE: f32 = 1e-3;

/// Everything the world reports about the player for one frame. Filled in
/// evaluation order, so later checks can read what earlier ones wrote.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Interactions {
    pub hit_by_car: Option<Direction>,
    pub on_log: bool,
    pub on_lilypad: bool,
    /// Sideways carry from logs accumulated this frame.
    pub log_shift: f32,
    pub sinking: bool,
    pub hazard: bool,
}
