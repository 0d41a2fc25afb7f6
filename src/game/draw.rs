use crate::game::pose::Pose;

/// Shapes the renderer knows how to draw. Every shape is unit-sized and
/// centred on its origin; the pose carries position, orientation and size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    Cube,
    Pad,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Material {
    Grass,
    Road,
    RoadMarking,
    Water,
    Hazard,
    Car,
    CarHit,
    CarCabin,
    Log,
    LilyPad,
    Trunk,
    Leaves,
    Player,
    PlayerBeak,
}

impl Material {
    pub fn color(&self) -> (f32, f32, f32) {
        match self {
            Material::Grass => (0.22, 0.5, 0.22),
            Material::Road => (0.3, 0.3, 0.3),
            Material::RoadMarking => (0.85, 0.85, 0.5),
            Material::Water => (0.2, 0.4, 0.8),
            Material::Hazard => (0.8, 0.1, 0.1),
            Material::Car => (0.2, 0.5, 0.9),
            Material::CarHit => (0.95, 0.8, 0.2),
            Material::CarCabin => (0.55, 0.7, 0.85),
            Material::Log => (0.45, 0.25, 0.1),
            Material::LilyPad => (0.2, 0.55, 0.25),
            Material::Trunk => (0.4, 0.2, 0.0),
            Material::Leaves => (0.15, 0.45, 0.15),
            Material::Player => (0.1, 0.62, 0.98),
            Material::PlayerBeak => (0.95, 0.6, 0.1),
        }
    }
}

/// Anything that can put a primitive on screen. The simulation calls this once
/// per visible part per frame and never reads anything back.
pub trait DrawPrimitive {
    fn draw_primitive(&mut self, primitive: Primitive, pose: &Pose, material: Material);
}
