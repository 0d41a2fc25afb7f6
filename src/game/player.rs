use std::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::game::collision::{Interactions, PlayerProbe};
use crate::game::config::{GameConfig, JumpConfig};
use crate::game::draw::{DrawPrimitive, Material, Primitive};
use crate::game::pose::Pose;
use crate::game::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum DeathCause {
    HitByCar,
    Drowned,
    Hazard,
    OutOfBounds,
}

/// Height and forward offset of a hop at normalized time `u`, in the
/// player's facing frame. The arc is zero at both ends and peaks at `height`
/// halfway through.
pub fn jump_arc(u: f32, length: f32, height: f32) -> (f32, f32) {
    let z = -u * length;
    let y = -4.0 * height * z * (z + length) / (length * length);
    (y, z)
}

pub struct Player {
    /// Forward progress from completed hops. Never rotated.
    rest: Pose,
    /// Sideways carry from logs and diagonal hops.
    drift: Pose,
    /// World pose produced by the last update.
    pose: Pose,
    /// Hop offset in the facing frame as of the last update.
    flight: Pose,
    pub facing: f32,
    pub queued_jumps: u32,
    jump_started: Option<f32>,
    /// When the current sink or fall-over animation began.
    terminal_started: Option<f32>,
    pub jumping: bool,
    pub sinking: bool,
    pub hit_by_car: bool,
    pub on_log: bool,
    pub on_lilypad: bool,
    pub dead: Option<DeathCause>,
    pub hit_direction: Option<Direction>,
    pub score: u32,
}

impl Default for Player {
    fn default() -> Self {
        Player::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Player {
            rest: Pose::identity(),
            drift: Pose::identity(),
            pose: Pose::identity(),
            flight: Pose::identity(),
            facing: 0.0,
            queued_jumps: 0,
            jump_started: None,
            terminal_started: None,
            jumping: false,
            sinking: false,
            hit_by_car: false,
            on_log: false,
            on_lilypad: false,
            dead: None,
            hit_direction: None,
            score: 0,
        }
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn drift_x(&self) -> f32 {
        self.drift.x()
    }

    /// Z of the last landing spot, ignoring any hop in flight.
    pub fn rest_z(&self) -> f32 {
        self.rest.z()
    }

    pub fn is_dead(&self) -> bool {
        self.dead.is_some()
    }

    fn in_terminal_motion(&self) -> bool {
        self.sinking || self.hit_by_car
    }

    pub fn queue_jump(&mut self) {
        if !self.in_terminal_motion() {
            self.queued_jumps += 1;
        }
    }

    pub fn queue_jump_back(&mut self) {
        if !self.in_terminal_motion() {
            self.turn(PI);
            self.queued_jumps += 1;
        }
    }

    pub fn turn(&mut self, delta: f32) {
        self.facing = (self.facing + delta).rem_euclid(TAU);
    }

    pub fn probe(&self, config: &GameConfig) -> PlayerProbe {
        let p = self.pose.position();
        PlayerProbe {
            x: p.x,
            y: p.y,
            z: p.z,
            half: config.hitbox.player,
            jumping: self.jumping,
            sinking: self.sinking,
        }
    }

    /// Folds this frame's interactions into the player's state and produces
    /// the new world pose.
    pub fn update(&mut self, time: f32, report: &Interactions, config: &GameConfig) {
        let jump = &config.jump;

        self.on_log = report.on_log;
        self.on_lilypad = report.on_lilypad;
        if report.on_log {
            self.drift = Pose::translation(report.log_shift, 0.0, 0.0).times(&self.drift);
        }

        if !self.in_terminal_motion() {
            if let Some(direction) = report.hit_by_car {
                self.abandon_jump();
                self.hit_by_car = true;
                self.hit_direction = Some(direction);
                self.terminal_started = Some(time);
            } else if report.sinking {
                self.abandon_jump();
                self.sinking = true;
                self.terminal_started = Some(time);
            }
        }
        if report.hazard {
            self.die(DeathCause::Hazard);
        }

        let local = if self.in_terminal_motion() {
            self.terminal_motion(time, jump)
        } else {
            let flight = self.jump_motion(time, jump);
            self.flight = flight;
            flight
        };
        self.pose = self.drift.times(&self.rest).rotated_y(self.facing).times(&local);

        if self.pose.x().abs() > config.world.lateral_bound {
            self.die(DeathCause::OutOfBounds);
        }
    }

    fn die(&mut self, cause: DeathCause) {
        if self.dead.is_none() {
            self.dead = Some(cause);
        }
    }

    /// Freezes the player where the hop in flight has carried it and drops
    /// every pending hop.
    fn abandon_jump(&mut self) {
        let offset = Pose::rotation_y(self.facing).times(&self.flight).position();
        self.rest = self.rest.translated(0.0, offset.y, offset.z);
        self.drift = Pose::translation(offset.x, 0.0, 0.0).times(&self.drift);
        self.flight = Pose::identity();
        self.jump_started = None;
        self.queued_jumps = 0;
        self.jumping = false;
    }

    fn jump_motion(&mut self, time: f32, jump: &JumpConfig) -> Pose {
        if self.queued_jumps == 0 {
            return Pose::identity();
        }
        self.jumping = true;
        let started = *self.jump_started.get_or_insert(time);
        let u = if self.queued_jumps > 1 {
            1.0
        } else {
            (time - started) / jump.duration
        };
        if u >= 1.0 {
            self.land(jump);
            return Pose::identity();
        }
        let (y, z) = jump_arc(u, jump.length, jump.height);
        Pose::translation(0.0, y, z)
    }

    fn land(&mut self, jump: &JumpConfig) {
        let lateral = -jump.length * self.facing.sin();
        let forward = jump.length * self.facing.cos();
        self.rest = self.rest.translated(0.0, 0.0, -forward);
        self.drift = Pose::translation(lateral, 0.0, 0.0).times(&self.drift);
        self.jump_started = None;
        self.queued_jumps -= 1;
        self.jumping = false;

        let gained = forward.round();
        if gained > 0.0 {
            self.score += gained as u32;
        }
    }

    fn terminal_motion(&mut self, time: f32, jump: &JumpConfig) -> Pose {
        let started = self.terminal_started.unwrap_or(time);
        let u = ((time - started) / jump.duration).max(0.0);
        let done = u >= 1.0;
        let u = u.min(1.0);

        let pose = if self.sinking {
            if done {
                self.sinking = false;
                self.die(DeathCause::Drowned);
            }
            Pose::translation(0.0, -u * jump.sink_depth, 0.0)
        } else {
            if done {
                self.hit_by_car = false;
                self.die(DeathCause::HitByCar);
            }
            let sign = self.hit_direction.map_or(1.0, |d| -d.sign());
            Pose::rotation_z(sign * u * FRAC_PI_2)
        };
        if done {
            self.terminal_started = None;
        }
        pose
    }

    pub fn draw(&self, canvas: &mut dyn DrawPrimitive) {
        let body = self.pose.translated(0.0, 0.75, 0.0);
        canvas.draw_primitive(Primitive::Cube, &body.scaled(1.0, 1.5, 1.0), Material::Player);
        let head = body.translated(0.0, 0.6, -0.7);
        canvas.draw_primitive(Primitive::Cube, &head.scaled(0.5, 0.5, 0.5), Material::Player);
        canvas.draw_primitive(
            Primitive::Cube,
            &head.translated(0.0, 0.0, -0.3).scaled(0.2, 0.15, 0.2),
            Material::PlayerBeak,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_jump(player: &mut Player, config: &GameConfig, start: f32) {
        let quiet = Interactions::default();
        for i in 0..=4 {
            player.update(start + i as f32 * 0.25, &quiet, config);
        }
    }

    #[test]
    fn arc_is_symmetric_and_grounded_at_ends() {
        for &length in &[1.0, 2.0, 3.5] {
            let (y0, _) = jump_arc(0.0, length, 1.0);
            let (y1, _) = jump_arc(1.0, length, 1.0);
            assert!(y0.abs() < 1e-6 && y1.abs() < 1e-6);
            let (mid, _) = jump_arc(0.5, length, 1.0);
            assert!((mid - 1.0).abs() < 1e-6);
            for i in 1..10 {
                let u = i as f32 / 10.0;
                let (a, _) = jump_arc(u, length, 1.0);
                let (b, _) = jump_arc(1.0 - u, length, 1.0);
                assert!((a - b).abs() < 1e-5);
                assert!(a <= mid + 1e-6);
            }
        }
    }

    #[test]
    fn forward_jump_lands_one_length_ahead() {
        let config = GameConfig::default();
        let mut player = Player::new();
        player.queue_jump();
        run_jump(&mut player, &config, 0.0);
        assert_eq!(player.queued_jumps, 0);
        assert!(!player.jumping);
        let p = player.pose().position();
        assert!((p.z + 2.0).abs() < 1e-5);
        assert!(p.y.abs() < 1e-6);
        assert_eq!(player.score, 2);
    }

    #[test]
    fn mid_jump_is_airborne() {
        let config = GameConfig::default();
        let mut player = Player::new();
        player.queue_jump();
        player.update(0.0, &Interactions::default(), &config);
        player.update(0.5, &Interactions::default(), &config);
        assert!(player.jumping);
        let p = player.pose().position();
        assert!((p.y - 1.0).abs() < 1e-5);
        assert!((p.z + 1.0).abs() < 1e-5);
    }

    #[test]
    fn sideways_and_backward_jumps_score_nothing() {
        let config = GameConfig::default();
        let mut player = Player::new();
        player.turn(FRAC_PI_2);
        player.queue_jump();
        run_jump(&mut player, &config, 0.0);
        assert_eq!(player.score, 0);
        assert!((player.drift_x() + 2.0).abs() < 1e-5);

        player.facing = 0.0;
        player.queue_jump_back();
        run_jump(&mut player, &config, 10.0);
        assert_eq!(player.score, 0);
        assert!((player.rest_z() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn score_never_decreases_while_turning() {
        let config = GameConfig::default();
        let mut player = Player::new();
        let mut last = 0;
        for i in 0..30 {
            if i % 3 == 0 {
                player.turn(config.jump.turn_step * 5.0);
            }
            player.queue_jump();
            run_jump(&mut player, &config, i as f32 * 2.0);
            assert!(player.score >= last);
            last = player.score;
        }
    }

    #[test]
    fn queued_jumps_fast_forward_one_per_frame() {
        let config = GameConfig::default();
        let mut player = Player::new();
        for _ in 0..3 {
            player.queue_jump();
        }
        let quiet = Interactions::default();
        player.update(0.0, &quiet, &config);
        assert_eq!(player.queued_jumps, 2);
        player.update(0.016, &quiet, &config);
        assert_eq!(player.queued_jumps, 1);
        assert!((player.rest_z() + 4.0).abs() < 1e-5);
        assert_eq!(player.score, 4);
    }

    #[test]
    fn turning_wraps_around() {
        let mut player = Player::new();
        player.turn(-PI / 12.0);
        assert!(player.facing > 0.0 && player.facing < TAU);
        assert!((player.facing - (TAU - PI / 12.0)).abs() < 1e-5);
        player.turn(PI / 12.0);
        assert!(player.facing.abs() < 1e-5 || (player.facing - TAU).abs() < 1e-5);
    }

    #[test]
    fn sinking_runs_its_course_then_kills() {
        let config = GameConfig::default();
        let mut player = Player::new();
        let water = Interactions { sinking: true, ..Default::default() };
        player.update(0.0, &water, &config);
        assert!(player.sinking);
        player.update(0.5, &Interactions::default(), &config);
        assert!((player.pose().position().y + 2.0).abs() < 1e-5);
        assert!(!player.is_dead());
        player.update(1.0, &Interactions::default(), &config);
        assert!(!player.sinking);
        assert_eq!(player.dead, Some(DeathCause::Drowned));
    }

    #[test]
    fn car_hit_suppresses_jumping_and_rolls_the_player() {
        let config = GameConfig::default();
        let mut player = Player::new();
        let hit = Interactions { hit_by_car: Some(Direction::Right), ..Default::default() };
        player.update(0.0, &hit, &config);
        player.queue_jump();
        assert_eq!(player.queued_jumps, 0);
        player.update(0.5, &Interactions::default(), &config);
        assert!(player.hit_by_car);
        assert!(!player.is_dead());
        player.update(1.2, &Interactions::default(), &config);
        assert!(!player.hit_by_car);
        assert_eq!(player.dead, Some(DeathCause::HitByCar));
    }

    #[test]
    fn car_hit_mid_jump_stops_where_the_player_was() {
        let config = GameConfig::default();
        let mut player = Player::new();
        player.queue_jump();
        player.queue_jump();
        player.update(0.0, &Interactions::default(), &config);
        assert_eq!(player.queued_jumps, 1);
        player.update(1.0, &Interactions::default(), &config);
        player.update(1.5, &Interactions::default(), &config);
        let airborne = player.pose().position();
        assert!((airborne.y - 1.0).abs() < 1e-5);
        assert!((airborne.z + 3.0).abs() < 1e-5);

        let hit = Interactions { hit_by_car: Some(Direction::Left), ..Default::default() };
        player.update(1.51, &hit, &config);
        assert!(player.hit_by_car);
        assert!(!player.jumping);
        assert_eq!(player.queued_jumps, 0);
        let p = player.pose().position();
        assert!((p.y - airborne.y).abs() < 1e-5);
        assert!((p.z - airborne.z).abs() < 1e-5);

        player.update(2.0, &Interactions::default(), &config);
        assert!(!player.jumping);
        assert_eq!(player.queued_jumps, 0);
        assert!((player.pose().position().z - airborne.z).abs() < 1e-5);
    }

    #[test]
    fn riding_accumulates_drift() {
        let config = GameConfig::default();
        let mut player = Player::new();
        let ride = Interactions { on_log: true, log_shift: -0.1, ..Default::default() };
        for i in 0..5 {
            player.update(i as f32 * 0.016, &ride, &config);
            assert!(player.on_log);
        }
        assert!((player.drift_x() + 0.5).abs() < 1e-5);
    }

    #[test]
    fn leaving_the_lateral_bound_kills() {
        let config = GameConfig::default();
        let mut player = Player::new();
        let ride = Interactions { on_log: true, log_shift: 15.0, ..Default::default() };
        player.update(0.0, &ride, &config);
        assert_eq!(player.dead, Some(DeathCause::OutOfBounds));
    }
}
