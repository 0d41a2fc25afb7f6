use crate::game::collision::{overlap, Footprint, Interactions, PlayerProbe};
use crate::game::config::HitboxConfig;
use crate::game::draw::{DrawPrimitive, Material, Primitive};
use crate::game::pose::Pose;
use crate::game::Direction;

/// Something that travels along a lane at a constant per-frame step.
#[derive(Clone, Debug, PartialEq)]
pub struct Mover {
    pub pose: Pose,
    pub direction: Direction,
    pub dx: f32,
    pub collided: bool,
}

/// Something placed once and left where it is.
#[derive(Clone, Debug, PartialEq)]
pub struct Fixture {
    pub pose: Pose,
    pub collided: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Obstacle {
    Car(Mover),
    Log(Mover),
    LilyPad(Fixture),
    Tree(Fixture),
}

impl Obstacle {
    pub fn car(x: f32, z: f32, direction: Direction, dx: f32) -> Self {
        Obstacle::Car(Mover::new(x, z, direction, dx))
    }

    pub fn log(x: f32, z: f32, direction: Direction, dx: f32) -> Self {
        Obstacle::Log(Mover::new(x, z, direction, dx))
    }

    pub fn lily_pad(x: f32, z: f32) -> Self {
        Obstacle::LilyPad(Fixture::new(x, z))
    }

    pub fn tree(x: f32, z: f32) -> Self {
        Obstacle::Tree(Fixture::new(x, z))
    }

    pub fn pose(&self) -> &Pose {
        match self {
            Obstacle::Car(m) | Obstacle::Log(m) => &m.pose,
            Obstacle::LilyPad(f) | Obstacle::Tree(f) => &f.pose,
        }
    }

    pub fn x(&self) -> f32 {
        self.pose().x()
    }

    pub fn collided(&self) -> bool {
        match self {
            Obstacle::Car(m) | Obstacle::Log(m) => m.collided,
            Obstacle::LilyPad(f) | Obstacle::Tree(f) => f.collided,
        }
    }

    fn set_collided(&mut self, value: bool) {
        match self {
            Obstacle::Car(m) | Obstacle::Log(m) => m.collided = value,
            Obstacle::LilyPad(f) | Obstacle::Tree(f) => f.collided = value,
        }
    }

    /// Moves the obstacle along Z together with the lane it sits on.
    pub fn shift(&mut self, dz: f32) {
        match self {
            Obstacle::Car(m) | Obstacle::Log(m) => m.pose = m.pose.translated(0.0, 0.0, dz),
            Obstacle::LilyPad(f) | Obstacle::Tree(f) => f.pose = f.pose.translated(0.0, 0.0, dz),
        }
    }

    /// Moves cars and logs by one frame step. `step` is 1.0 except on
    /// fast-forwarded frames. Fixtures ignore it.
    pub fn advance(&mut self, step: f32) {
        if let Obstacle::Car(m) | Obstacle::Log(m) = self {
            m.pose = m.pose.translated(m.direction.sign() * m.dx * step, 0.0, 0.0);
        }
    }

    pub fn footprint(&self, hitbox: &HitboxConfig) -> Footprint {
        let p = self.pose().position();
        let (half_x, half_z) = match self {
            Obstacle::Car(_) => (hitbox.car[0], hitbox.car[1]),
            Obstacle::Log(_) => (hitbox.log[0], hitbox.log[1]),
            Obstacle::LilyPad(_) => (hitbox.lily_pad, hitbox.lily_pad),
            Obstacle::Tree(_) => (hitbox.tree, hitbox.tree),
        };
        Footprint::new(p.x, p.z, half_x, half_z)
    }

    /// Whether a mover has left the visible strip in its direction of travel.
    pub fn is_off_screen(&self, bound: f32) -> bool {
        match self {
            Obstacle::Car(m) | Obstacle::Log(m) => match m.direction {
                Direction::Right => m.pose.x() > bound,
                Direction::Left => m.pose.x() < -bound,
            },
            Obstacle::LilyPad(_) | Obstacle::Tree(_) => false,
        }
    }

    /// Tests this obstacle against the player and records the outcome.
    /// `collided` is recomputed from scratch every call.
    pub fn interact(&mut self, player: &PlayerProbe, hitbox: &HitboxConfig, step: f32, report: &mut Interactions) {
        let me = self.footprint(hitbox);
        let you = player.footprint();
        let (pz, pz_end) = you.z_range();
        let (oz, oz_end) = me.z_range();
        let z_hit = overlap(oz, oz_end, pz, pz_end);

        let hit = match self {
            Obstacle::Car(car) => {
                let hit = me.overlaps(&you);
                if hit && report.hit_by_car.is_none() {
                    report.hit_by_car = Some(car.direction);
                }
                hit
            }
            Obstacle::Log(log) => {
                let (px, px_end) = you.x_range();
                let hit = !player.sinking
                    && !report.on_lilypad
                    && z_hit
                    && overlap(me.x - me.half_x - hitbox.log_margin, me.x + me.half_x + hitbox.log_margin, px, px_end);
                if hit {
                    report.on_log = true;
                    report.log_shift += log.direction.sign() * log.dx * step;
                }
                hit
            }
            Obstacle::LilyPad(_) => {
                let hit = !report.on_log && me.overlaps(&you);
                if hit {
                    report.on_lilypad = true;
                }
                hit
            }
            Obstacle::Tree(_) => me.overlaps(&you),
        };
        self.set_collided(hit);
    }

    pub fn draw(&self, canvas: &mut dyn DrawPrimitive, hitbox: &HitboxConfig) {
        match self {
            Obstacle::Car(car) => {
                let heading = match car.direction {
                    Direction::Right => 0.0,
                    Direction::Left => std::f32::consts::PI,
                };
                let body = car.pose.rotated_y(heading).translated(0.0, 0.5, 0.0);
                let material = if car.collided { Material::CarHit } else { Material::Car };
                canvas.draw_primitive(
                    Primitive::Cube,
                    &body.scaled(hitbox.car[0] * 2.0, 0.8, hitbox.car[1] * 2.0),
                    material,
                );
                canvas.draw_primitive(
                    Primitive::Cube,
                    &body.translated(-0.2, 0.6, 0.0).scaled(hitbox.car[0], 0.5, hitbox.car[1] * 1.6),
                    Material::CarCabin,
                );
            }
            Obstacle::Log(log) => {
                canvas.draw_primitive(
                    Primitive::Cube,
                    &log.pose.translated(0.0, 0.1, 0.0).scaled(hitbox.log[0] * 2.0, 0.5, hitbox.log[1] * 2.0),
                    Material::Log,
                );
            }
            Obstacle::LilyPad(pad) => {
                canvas.draw_primitive(
                    Primitive::Pad,
                    &pad.pose.scaled(hitbox.lily_pad * 2.0, 0.1, hitbox.lily_pad * 2.0),
                    Material::LilyPad,
                );
            }
            Obstacle::Tree(tree) => {
                canvas.draw_primitive(
                    Primitive::Cube,
                    &tree.pose.translated(0.0, 0.5, 0.0).scaled(0.4, 1.0, 0.4),
                    Material::Trunk,
                );
                canvas.draw_primitive(
                    Primitive::Cube,
                    &tree.pose.translated(0.0, 1.6, 0.0).scaled(hitbox.tree * 2.0, 1.4, hitbox.tree * 2.0),
                    Material::Leaves,
                );
            }
        }
    }
}

impl Mover {
    pub fn new(x: f32, z: f32, direction: Direction, dx: f32) -> Self {
        Mover { pose: Pose::translation(x, 0.0, z), direction, dx, collided: false }
    }
}

impl Fixture {
    pub fn new(x: f32, z: f32) -> Self {
        Fixture { pose: Pose::translation(x, 0.0, z), collided: false }
    }
}
