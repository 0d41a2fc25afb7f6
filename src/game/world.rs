use std::collections::VecDeque;

use rand::Rng;

use crate::game::collision::{Interactions, PlayerProbe};
use crate::game::config::GameConfig;
use crate::game::draw::DrawPrimitive;
use crate::game::lane::Lane;
use crate::game::section::{Section, Terrain};

/// The streamed strip of terrain around the player.
///
/// Sections are kept oldest-first. New sections are appended beyond the
/// farthest lane while the live lane count is below `lanes_ahead`, and lanes
/// are retired from the front once they fall `retire_distance` behind the
/// player. The hazard section trails the oldest lane and moves up one lane
/// width every time a lane is retired.
pub struct World {
    pub sections: VecDeque<Section>,
    pub hazard: Section,
    live_lanes: usize,
    last_terrain: Terrain,
    /// Z of the next lane to be generated.
    next_z: f32,
}

impl World {
    pub fn new(config: &GameConfig, rng: &mut impl Rng) -> Self {
        let w = config.world.lane_width;
        let count = config.world.initial_lanes;
        let start_z = (count / 2) as f32 * w;

        let start = Section::generate(Terrain::Grass, start_z, count, config, rng);
        let hazard_count = config.world.hazard_lanes;
        let hazard = Section::generate(
            Terrain::Hazard,
            start_z + hazard_count as f32 * w,
            hazard_count,
            config,
            rng,
        );

        let mut sections = VecDeque::new();
        sections.push_back(start);
        World {
            sections,
            hazard,
            live_lanes: count,
            last_terrain: Terrain::Grass,
            next_z: start_z - count as f32 * w,
        }
    }

    pub fn live_lanes(&self) -> usize {
        self.live_lanes
    }

    pub fn lanes(&self) -> impl Iterator<Item = &Lane> {
        self.sections.iter().flat_map(|section| section.lanes.iter())
    }

    pub fn lanes_mut(&mut self) -> impl Iterator<Item = &mut Lane> {
        self.sections.iter_mut().flat_map(|section| section.lanes.iter_mut())
    }

    /// The lane whose strip contains `z`, if it is live.
    pub fn lane_at_mut(&mut self, z: f32) -> Option<&mut Lane> {
        self.lanes_mut().find(|lane| (lane.z - z).abs() <= lane.width / 2.0)
    }

    /// Appends new sections ahead, retires lanes behind and drops empty sections.
    pub fn stream(&mut self, player_z: f32, config: &GameConfig, rng: &mut impl Rng) {
        let w = config.world.lane_width;
        while self.live_lanes < config.world.lanes_ahead {
            let terrain = Terrain::next_after(self.last_terrain, rng);
            let count = rng.gen_range(config.world.min_section_lanes..=config.world.max_section_lanes);
            let section = Section::generate(terrain, self.next_z, count, config, rng);
            log::debug!("appending {:?} section of {} lanes at z={}", terrain, count, self.next_z);
            self.next_z -= count as f32 * w;
            self.live_lanes += count;
            self.last_terrain = terrain;
            self.sections.push_back(section);
        }

        let bound = player_z + config.world.retire_distance;
        while let Some(front) = self.sections.front_mut() {
            match front.front_z() {
                Some(z) if z > bound => {
                    if let Some(lane) = front.retire_front() {
                        log::debug!("retiring {:?} lane at z={}", lane.kind, lane.z);
                        self.live_lanes -= 1;
                        self.hazard.shift(-lane.width);
                    }
                    if front.is_empty() {
                        self.sections.pop_front();
                    }
                }
                Some(_) => break,
                None => {
                    self.sections.pop_front();
                }
            }
        }
    }

    pub fn advance(&mut self, step: f32, config: &GameConfig, rng: &mut impl Rng) {
        for lane in self.lanes_mut() {
            lane.advance(step, &config.traffic, rng);
        }
    }

    /// Runs every collision check for the frame in a fixed order: all
    /// obstacles first, then lane surfaces, then the hazard strip.
    pub fn interact(&mut self, player: &PlayerProbe, config: &GameConfig, step: f32) -> Interactions {
        let mut report = Interactions::default();
        for lane in self.lanes_mut() {
            lane.interact_obstacles(player, &config.hitbox, step, &mut report);
        }
        for lane in self.lanes() {
            lane.interact_surface(player, &mut report);
        }
        for lane in &self.hazard.lanes {
            lane.interact_surface(player, &mut report);
        }
        report
    }

    pub fn draw(&self, canvas: &mut dyn DrawPrimitive, config: &GameConfig) {
        for lane in self.lanes().chain(self.hazard.lanes.iter()) {
            lane.draw(canvas, &config.world, &config.hitbox);
        }
    }
}
