pub mod collision;
pub mod config;
pub mod draw;
pub mod lane;
pub mod obstacle;
pub mod player;
pub mod pose;
pub mod section;
pub mod world;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::game::config::{ConfigError, GameConfig};
use crate::game::draw::DrawPrimitive;
use crate::game::player::{DeathCause, Player};
use crate::game::pose::Pose;
use crate::game::world::World;

/// Travel direction of a lane's traffic along X.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        if rng.gen_bool(0.5) {
            Direction::Right
        } else {
            Direction::Left
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CameraView {
    Overhead,
    FirstPerson,
}

/// What the HUD needs each frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub score: u32,
    pub deaths: u32,
    pub last_death: Option<DeathCause>,
    pub queued_jumps: u32,
    pub jumping: bool,
    pub sinking: bool,
    pub hit_by_car: bool,
    pub on_log: bool,
    pub on_lilypad: bool,
    pub live_lanes: usize,
    pub sections: usize,
    pub camera: CameraView,
}

/// The whole simulation: config, random source, world and player. One call to
/// `frame` per display refresh.
pub struct Game {
    pub config: GameConfig,
    rng: SmallRng,
    pub world: World,
    pub player: Player,
    pub camera: CameraView,
    pub deaths: u32,
    pub last_death: Option<DeathCause>,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::from_rng(config, SmallRng::from_entropy())
    }

    /// Deterministic game for replays and tests.
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::from_rng(config, SmallRng::seed_from_u64(seed))
    }

    fn from_rng(config: GameConfig, mut rng: SmallRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let world = World::new(&config, &mut rng);
        Ok(Game {
            config,
            rng,
            world,
            player: Player::new(),
            camera: CameraView::Overhead,
            deaths: 0,
            last_death: None,
        })
    }

    /// Advances one frame. `time` is the absolute clock in seconds and `dt`
    /// the time since the previous frame. Returns the cause when the player
    /// died this frame, in which case the game has already been reset.
    pub fn frame(&mut self, time: f32, dt: f32) -> Option<DeathCause> {
        // Skipped hop animation also skips most of the world's motion.
        let step = if self.player.queued_jumps > 1 {
            (dt / self.config.jump.duration).min(1.0)
        } else {
            1.0
        };

        self.world.stream(self.player.pose().z(), &self.config, &mut self.rng);
        self.world.advance(step, &self.config, &mut self.rng);

        let probe = self.player.probe(&self.config);
        let report = self.world.interact(&probe, &self.config, step);
        self.player.update(time, &report, &self.config);

        let cause = self.player.dead?;
        log::info!("player died ({:?}) with score {}", cause, self.player.score);
        self.deaths += 1;
        self.last_death = Some(cause);
        self.restart();
        Some(cause)
    }

    /// Rebuilds the world and the player from scratch. Config, camera choice
    /// and death statistics survive.
    pub fn restart(&mut self) {
        self.world = World::new(&self.config, &mut self.rng);
        self.player = Player::new();
    }

    pub fn jump_forward(&mut self) {
        self.player.queue_jump();
    }

    pub fn jump_backward(&mut self) {
        self.player.queue_jump_back();
    }

    pub fn turn_left(&mut self) {
        self.player.turn(self.config.jump.turn_step);
    }

    pub fn turn_right(&mut self) {
        self.player.turn(-self.config.jump.turn_step);
    }

    pub fn toggle_camera(&mut self) {
        self.camera = match self.camera {
            CameraView::Overhead => CameraView::FirstPerson,
            CameraView::FirstPerson => CameraView::Overhead,
        };
    }

    pub fn score(&self) -> u32 {
        self.player.score
    }

    /// Pose of the active camera in world space.
    pub fn camera_pose(&self) -> Pose {
        match self.camera {
            CameraView::Overhead => Pose::translation(0.0, 14.0, self.player.rest_z() + 12.0)
                .times(&Pose::rotation_x(-0.85)),
            CameraView::FirstPerson => self.player.pose().translated(0.0, 1.6, -1.0),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            score: self.player.score,
            deaths: self.deaths,
            last_death: self.last_death,
            queued_jumps: self.player.queued_jumps,
            jumping: self.player.jumping,
            sinking: self.player.sinking,
            hit_by_car: self.player.hit_by_car,
            on_log: self.player.on_log,
            on_lilypad: self.player.on_lilypad,
            live_lanes: self.world.live_lanes(),
            sections: self.world.sections.len(),
            camera: self.camera,
        }
    }

    pub fn render(&self, canvas: &mut dyn DrawPrimitive) {
        self.world.draw(canvas, &self.config);
        if self.camera == CameraView::Overhead {
            self.player.draw(canvas);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::draw::{Material, Primitive};

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(Primitive, Material)>,
    }

    impl DrawPrimitive for Recorder {
        fn draw_primitive(&mut self, primitive: Primitive, _pose: &Pose, material: Material) {
            self.calls.push((primitive, material));
        }
    }

    #[test]
    fn ride_flags_are_never_both_set() {
        let mut config = GameConfig::default();
        config.traffic.log_spawn_chance = 0.05;
        let mut game = Game::with_seed(config, 99).unwrap();
        let mut time = 0.0;
        for i in 0..5000 {
            if i % 40 == 0 {
                game.jump_forward();
            }
            time += 0.05;
            game.frame(time, 0.05);
            assert!(!(game.player.on_log && game.player.on_lilypad));
        }
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut game = Game::with_seed(GameConfig::default(), 5).unwrap();
        game.jump_forward();
        for i in 0..=4 {
            game.frame(i as f32 * 0.25, 0.25);
        }
        assert_eq!(game.score(), 2);
        game.toggle_camera();

        game.restart();
        assert_eq!(game.score(), 0);
        assert_eq!(game.world.sections.len(), 1);
        assert_eq!(game.world.live_lanes(), 5);
        assert_eq!(game.player.queued_jumps, 0);
        assert!(!game.player.jumping && !game.player.sinking && !game.player.hit_by_car);
        assert_eq!(game.camera, CameraView::FirstPerson);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let mut config = GameConfig::default();
        config.traffic.car_speed = [0.2, 0.08];
        assert!(matches!(
            Game::with_seed(config, 1),
            Err(ConfigError::Invalid { field: "traffic.car_speed", .. })
        ));
    }

    #[test]
    fn world_step_is_foreshortened_while_fast_forwarding() {
        let mut config = GameConfig::default();
        config.traffic.car_spawn_chance = 0.0;
        let mut game = Game::with_seed(config, 8).unwrap();
        game.world.sections[0].lanes[0]
            .obstacles
            .push(obstacle::Obstacle::car(0.0, 4.0, Direction::Right, 0.2));
        game.jump_forward();
        game.jump_forward();
        game.frame(0.0, 0.1);
        let car_x = game.world.sections[0].lanes[0].obstacles.last().unwrap().x();
        assert!((car_x - 0.02).abs() < 1e-5);
    }

    #[test]
    fn render_draws_lanes_obstacles_and_player() {
        let mut game = Game::with_seed(GameConfig::default(), 12).unwrap();
        game.world.sections[0].lanes[0]
            .obstacles
            .push(obstacle::Obstacle::car(-10.0, 4.0, Direction::Left, 0.1));
        let mut canvas = Recorder::default();
        game.render(&mut canvas);
        let grass = canvas.calls.iter().filter(|(_, m)| *m == Material::Grass).count();
        assert_eq!(grass, 5);
        assert_eq!(canvas.calls.iter().filter(|(_, m)| *m == Material::Hazard).count(), 2);
        assert!(canvas.calls.iter().any(|(_, m)| *m == Material::Car));
        assert!(canvas.calls.iter().any(|(_, m)| *m == Material::Player));

        game.toggle_camera();
        let mut first_person = Recorder::default();
        game.render(&mut first_person);
        assert!(!first_person.calls.iter().any(|(_, m)| *m == Material::Player));
    }

    #[test]
    fn cameras_track_the_player() {
        let mut game = Game::with_seed(GameConfig::default(), 3).unwrap();
        let overhead = game.camera_pose().position();
        assert!(overhead.y > 0.0 && overhead.z > 0.0);
        game.toggle_camera();
        let eye = game.camera_pose().position();
        assert!(eye.z < 0.0 && eye.y > 0.0);
    }
}
