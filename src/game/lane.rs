use rand::seq::SliceRandom;
use rand::Rng;

use crate::game::collision::{overlap, Interactions, PlayerProbe};
use crate::game::config::{GameConfig, HitboxConfig, TrafficConfig, WorldConfig};
use crate::game::draw::{DrawPrimitive, Material, Primitive};
use crate::game::obstacle::Obstacle;
use crate::game::pose::Pose;
use crate::game::section::Terrain;
use crate::game::Direction;

/// What floats on a water lane. A lane carries one or the other, never both.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaterCover {
    Logs,
    LilyPads,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LaneKind {
    Grass,
    Road,
    Water(WaterCover),
    Hazard,
}

pub struct Lane {
    pub z: f32,
    pub width: f32,
    pub kind: LaneKind,
    pub direction: Direction,
    /// Per-frame step given to everything this lane spawns.
    pub speed: f32,
    /// Spawn order: the last entry is the most recently spawned.
    pub obstacles: Vec<Obstacle>,
}

impl Lane {
    pub fn new(z: f32, width: f32, kind: LaneKind, direction: Direction) -> Self {
        Lane { z, width, kind, direction, speed: 0.0, obstacles: Vec::new() }
    }

    /// Builds a lane of the given terrain with its random direction, speed and
    /// any fixtures that are placed up front (trees, lily pads).
    pub fn generate(terrain: Terrain, z: f32, config: &GameConfig, rng: &mut impl Rng) -> Self {
        let traffic = &config.traffic;
        let direction = Direction::random(rng);
        let kind = match terrain {
            Terrain::Grass => LaneKind::Grass,
            Terrain::Road => LaneKind::Road,
            Terrain::Hazard => LaneKind::Hazard,
            Terrain::Water => {
                if rng.gen::<f32>() < traffic.lily_pad_chance {
                    LaneKind::Water(WaterCover::LilyPads)
                } else {
                    LaneKind::Water(WaterCover::Logs)
                }
            }
        };

        let mut lane = Lane::new(z, config.world.lane_width, kind, direction);
        lane.speed = match kind {
            LaneKind::Road => rng.gen_range(traffic.car_speed[0]..=traffic.car_speed[1]),
            LaneKind::Water(WaterCover::Logs) => rng.gen_range(traffic.log_speed[0]..=traffic.log_speed[1]),
            _ => 0.0,
        };

        match kind {
            LaneKind::Grass => {
                // Keep the starting column clear of trees.
                let cells: Vec<f32> = grid_cells(&config.world)
                    .into_iter()
                    .filter(|x| x.abs() >= lane.width / 2.0)
                    .collect();
                let count = rng.gen_range(0..=traffic.max_trees);
                for &x in cells.choose_multiple(rng, count) {
                    lane.obstacles.push(Obstacle::tree(x, z));
                }
            }
            LaneKind::Water(WaterCover::LilyPads) => {
                let cells: Vec<f32> = grid_cells(&config.world)
                    .into_iter()
                    .filter(|x| x.abs() > traffic.lily_pad_exclusion)
                    .collect();
                let [lo, hi] = traffic.lily_pad_count;
                let count = rng.gen_range(lo..=hi);
                for &x in cells.choose_multiple(rng, count) {
                    lane.obstacles.push(Obstacle::lily_pad(x, z));
                }
            }
            _ => {}
        }
        lane
    }

    pub fn pose(&self) -> Pose {
        Pose::translation(0.0, 0.0, self.z)
    }

    pub fn terrain(&self) -> Terrain {
        match self.kind {
            LaneKind::Grass => Terrain::Grass,
            LaneKind::Road => Terrain::Road,
            LaneKind::Water(_) => Terrain::Water,
            LaneKind::Hazard => Terrain::Hazard,
        }
    }

    /// X where new obstacles enter, on the side they travel away from.
    pub fn spawn_x(&self, traffic: &TrafficConfig) -> f32 {
        match self.direction {
            Direction::Right => -traffic.spawn_edge,
            Direction::Left => traffic.spawn_edge,
        }
    }

    fn spawn_rule(&self, traffic: &TrafficConfig) -> Option<(f32, [f32; 2])> {
        match self.kind {
            LaneKind::Road => Some((traffic.car_spawn_chance, traffic.car_gap)),
            LaneKind::Water(WaterCover::Logs) => Some((traffic.log_spawn_chance, traffic.log_gap)),
            _ => None,
        }
    }

    /// How far `x` has moved away from the spawn edge.
    fn distance_from_edge(&self, x: f32, traffic: &TrafficConfig) -> f32 {
        match self.direction {
            Direction::Right => x - self.spawn_x(traffic),
            Direction::Left => self.spawn_x(traffic) - x,
        }
    }

    pub fn shift(&mut self, dz: f32) {
        self.z += dz;
        for obstacle in &mut self.obstacles {
            obstacle.shift(dz);
        }
    }

    /// Moves, retires and spawns obstacles for one frame. Returns true when
    /// an obstacle was spawned.
    pub fn advance(&mut self, step: f32, traffic: &TrafficConfig, rng: &mut impl Rng) -> bool {
        for obstacle in &mut self.obstacles {
            obstacle.advance(step);
        }
        self.obstacles.retain(|o| !o.is_off_screen(traffic.despawn_bound));
        self.try_spawn(traffic, rng)
    }

    /// Returns true when an obstacle was added.
    pub fn try_spawn(&mut self, traffic: &TrafficConfig, rng: &mut impl Rng) -> bool {
        let Some((chance, gaps)) = self.spawn_rule(traffic) else {
            return false;
        };
        if rng.gen::<f32>() >= chance || self.obstacles.len() >= traffic.max_obstacles {
            return false;
        }
        let gap = match self.direction {
            Direction::Right => gaps[0],
            Direction::Left => gaps[1],
        };
        if let Some(last) = self.obstacles.last() {
            if self.distance_from_edge(last.x(), traffic) < gap {
                return false;
            }
        }

        let x = self.spawn_x(traffic);
        let obstacle = match self.kind {
            LaneKind::Road => Obstacle::car(x, self.z, self.direction, self.speed),
            _ => Obstacle::log(x, self.z, self.direction, self.speed),
        };
        log::debug!("spawned {:?} at z={} heading {:?}", self.kind, self.z, self.direction);
        self.obstacles.push(obstacle);
        true
    }

    pub fn interact_obstacles(&mut self, player: &PlayerProbe, hitbox: &HitboxConfig, step: f32, report: &mut Interactions) {
        for obstacle in &mut self.obstacles {
            obstacle.interact(player, hitbox, step, report);
        }
    }

    /// Checks the lane surface itself: open water and the hazard strip.
    /// Runs after every obstacle has reported for the frame.
    pub fn interact_surface(&self, player: &PlayerProbe, report: &mut Interactions) {
        let half = self.width / 2.0;
        let under_player = overlap(self.z - half, self.z + half, player.z, player.z);
        match self.kind {
            LaneKind::Water(_) => {
                if under_player && player.grounded() && !report.on_log && !report.on_lilypad {
                    report.sinking = true;
                }
            }
            LaneKind::Hazard => {
                if under_player && !player.jumping {
                    report.hazard = true;
                }
            }
            LaneKind::Grass | LaneKind::Road => {}
        }
    }

    pub fn draw(&self, canvas: &mut dyn DrawPrimitive, world: &WorldConfig, hitbox: &HitboxConfig) {
        let material = match self.kind {
            LaneKind::Grass => Material::Grass,
            LaneKind::Road => Material::Road,
            LaneKind::Water(_) => Material::Water,
            LaneKind::Hazard => Material::Hazard,
        };
        let ground = self.pose().translated(0.0, -0.25, 0.0);
        canvas.draw_primitive(Primitive::Cube, &ground.scaled(world.lane_length, 0.5, self.width), material);

        if self.kind == LaneKind::Road {
            for edge in [-1.0, 1.0] {
                let marking = ground.translated(0.0, 0.26, edge * (self.width / 2.0 - 0.1));
                canvas.draw_primitive(Primitive::Cube, &marking.scaled(world.lane_length, 0.02, 0.08), Material::RoadMarking);
            }
        }

        for obstacle in &self.obstacles {
            obstacle.draw(canvas, hitbox);
        }
    }
}

/// Lane-width spaced X positions inside the lateral bound, centred on 0.
fn grid_cells(world: &WorldConfig) -> Vec<f32> {
    let n = (world.lateral_bound / world.lane_width).floor() as i32;
    (-n..=n).map(|i| i as f32 * world.lane_width).collect()
}
