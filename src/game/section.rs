use std::collections::VecDeque;

use rand::Rng;

use crate::game::config::GameConfig;
use crate::game::lane::Lane;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Terrain {
    Grass,
    Road,
    Water,
    Hazard,
}

impl Terrain {
    /// Picks the terrain for the next section. Road and water are equally
    /// likely; a repeat of `previous` falls back to grass.
    pub fn next_after(previous: Terrain, rng: &mut impl Rng) -> Terrain {
        let pick = if rng.gen_bool(0.5) { Terrain::Road } else { Terrain::Water };
        if pick == previous {
            Terrain::Grass
        } else {
            pick
        }
    }
}

/// A run of same-terrain lanes, front (nearest the player's back) first.
pub struct Section {
    pub terrain: Terrain,
    pub lane_width: f32,
    pub lanes: VecDeque<Lane>,
}

impl Section {
    /// Lays out `count` lanes starting at `start_z` and stepping forward (-Z).
    pub fn generate(terrain: Terrain, start_z: f32, count: usize, config: &GameConfig, rng: &mut impl Rng) -> Self {
        let lane_width = config.world.lane_width;
        let mut lanes = VecDeque::with_capacity(count);
        for i in 0..count {
            lanes.push_back(Lane::generate(terrain, start_z - i as f32 * lane_width, config, rng));
        }
        Section { terrain, lane_width, lanes }
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn front_z(&self) -> Option<f32> {
        self.lanes.front().map(|lane| lane.z)
    }

    pub fn back_z(&self) -> Option<f32> {
        self.lanes.back().map(|lane| lane.z)
    }

    pub fn retire_front(&mut self) -> Option<Lane> {
        self.lanes.pop_front()
    }

    /// Moves every lane (and whatever sits on it) by `dz`.
    pub fn shift(&mut self, dz: f32) {
        for lane in &mut self.lanes {
            lane.shift(dz);
        }
    }
}
