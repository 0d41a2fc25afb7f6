use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tunables for the whole simulation. Loaded from `/assets/config.json`;
/// any field left out keeps its default.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub jump: JumpConfig,
    pub world: WorldConfig,
    pub traffic: TrafficConfig,
    pub hitbox: HitboxConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct JumpConfig {
    /// Distance covered by one hop.
    pub length: f32,
    /// Apex of the hop arc.
    pub height: f32,
    /// Seconds per hop; also the duration of the sink and fall-over animations.
    pub duration: f32,
    /// Facing change per turn input, in radians.
    pub turn_step: f32,
    pub sink_depth: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub lane_width: f32,
    /// Visual length of a lane strip along X.
    pub lane_length: f32,
    pub initial_lanes: usize,
    /// Streaming keeps at least this many live lanes.
    pub lanes_ahead: usize,
    /// Lanes further than this behind the player are retired.
    pub retire_distance: f32,
    pub hazard_lanes: usize,
    pub min_section_lanes: usize,
    pub max_section_lanes: usize,
    pub lateral_bound: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrafficConfig {
    pub car_spawn_chance: f32,
    pub log_spawn_chance: f32,
    pub max_obstacles: usize,
    pub spawn_edge: f32,
    pub despawn_bound: f32,
    /// Minimum distance the newest car must be from the spawn edge,
    /// as `[moving right, moving left]`.
    pub car_gap: [f32; 2],
    pub log_gap: [f32; 2],
    pub car_speed: [f32; 2],
    pub log_speed: [f32; 2],
    pub lily_pad_chance: f32,
    pub lily_pad_count: [usize; 2],
    /// Half-width of the band around x = 0 where no lily pad is placed.
    pub lily_pad_exclusion: f32,
    pub max_trees: usize,
}

/// Half-extents of each footprint on the ground plane.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HitboxConfig {
    pub player: f32,
    pub car: [f32; 2],
    pub log: [f32; 2],
    pub log_margin: f32,
    pub lily_pad: f32,
    pub tree: f32,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            length: 2.0,
            height: 1.0,
            duration: 1.0,
            turn_step: PI / 12.0,
            sink_depth: 4.0,
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            lane_width: 2.0,
            lane_length: 80.0,
            initial_lanes: 5,
            lanes_ahead: 20,
            retire_distance: 6.0,
            hazard_lanes: 2,
            min_section_lanes: 1,
            max_section_lanes: 7,
            lateral_bound: 14.0,
        }
    }
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            car_spawn_chance: 0.01,
            log_spawn_chance: 0.008,
            max_obstacles: 4,
            spawn_edge: 30.0,
            despawn_bound: 40.0,
            car_gap: [8.0, 9.0],
            log_gap: [10.0, 11.0],
            car_speed: [0.08, 0.2],
            log_speed: [0.05, 0.1],
            lily_pad_chance: 0.3,
            lily_pad_count: [1, 5],
            lily_pad_exclusion: 1.0,
            max_trees: 3,
        }
    }
}

impl Default for HitboxConfig {
    fn default() -> Self {
        Self {
            player: 0.5,
            car: [1.5, 0.8],
            log: [2.0, 0.8],
            log_margin: 0.5,
            lily_pad: 0.8,
            tree: 0.5,
        }
    }
}

impl GameConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("jump.length", self.jump.length)?;
        positive("jump.duration", self.jump.duration)?;
        positive("world.lane_width", self.world.lane_width)?;
        positive("world.lateral_bound", self.world.lateral_bound)?;
        positive("traffic.despawn_bound", self.traffic.despawn_bound)?;
        positive("hitbox.player", self.hitbox.player)?;

        if self.world.initial_lanes == 0 {
            return Err(invalid("world.initial_lanes", "must be at least 1"));
        }
        if self.world.lanes_ahead < self.world.initial_lanes {
            return Err(invalid("world.lanes_ahead", "must not be below world.initial_lanes"));
        }
        if self.world.min_section_lanes == 0 || self.world.min_section_lanes > self.world.max_section_lanes {
            return Err(invalid("world.min_section_lanes", "must be in 1..=max_section_lanes"));
        }
        if self.traffic.spawn_edge >= self.traffic.despawn_bound {
            return Err(invalid("traffic.spawn_edge", "must lie inside traffic.despawn_bound"));
        }
        ordered("traffic.car_speed", self.traffic.car_speed)?;
        ordered("traffic.log_speed", self.traffic.log_speed)?;
        let [lo, hi] = self.traffic.lily_pad_count;
        if lo == 0 || lo > hi {
            return Err(invalid("traffic.lily_pad_count", "must be a non-empty range starting at 1 or more"));
        }
        for (field, chance) in [
            ("traffic.car_spawn_chance", self.traffic.car_spawn_chance),
            ("traffic.log_spawn_chance", self.traffic.log_spawn_chance),
            ("traffic.lily_pad_chance", self.traffic.lily_pad_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(invalid(field, "must be a probability"));
            }
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field, reason: reason.to_string() }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: format!("must be positive, got {value}") })
    }
}

fn ordered(field: &'static str, [lo, hi]: [f32; 2]) -> Result<(), ConfigError> {
    if lo >= 0.0 && lo <= hi {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: format!("expected 0 <= {lo} <= {hi}") })
    }
}
