use lane_hopper::game::config::GameConfig;
use lane_hopper::game::lane::{Lane, LaneKind, WaterCover};
use lane_hopper::game::obstacle::Obstacle;
use lane_hopper::game::player::DeathCause;
use lane_hopper::game::{Direction, Game};

const FRAME: f32 = 1.0 / 60.0;

fn game(seed: u64) -> Game {
    Game::with_seed(GameConfig::default(), seed).expect("default config is valid")
}

fn flood_player_lane(game: &mut Game) -> &mut Lane {
    let lane = game.world.lane_at_mut(0.0).expect("start lane");
    *lane = Lane::new(0.0, 2.0, LaneKind::Water(WaterCover::Logs), Direction::Right);
    lane
}

fn assert_initial(game: &Game) {
    assert_eq!(game.world.sections.len(), 1);
    assert_eq!(game.world.sections[0].len(), 5);
    assert_eq!(game.score(), 0);
    let player = &game.player;
    assert_eq!(player.queued_jumps, 0);
    assert!(!player.jumping);
    assert!(!player.sinking);
    assert!(!player.hit_by_car);
    assert!(!player.on_log);
    assert!(!player.on_lilypad);
    assert!(!player.is_dead());
}

#[test]
fn idle_on_grass_is_safe() {
    let mut game = game(1);
    for i in 0..10 {
        assert_eq!(game.frame(i as f32 * FRAME, FRAME), None);
    }
    let p = game.player.pose().position();
    assert_eq!((p.x, p.z), (0.0, 0.0));
    assert_eq!(game.score(), 0);
    assert!(!game.player.is_dead());
}

#[test]
fn single_forward_jump() {
    let mut game = game(2);
    game.jump_forward();
    for i in 0..=11 {
        assert_eq!(game.frame(i as f32 * 0.1, 0.1), None);
    }
    let p = game.player.pose().position();
    assert!((p.z + 2.0).abs() < 1e-5);
    assert!(p.y.abs() < 1e-6);
    assert_eq!(game.player.queued_jumps, 0);
    assert_eq!(game.score(), 2);
}

#[test]
fn car_hit_rolls_over_then_resets_the_world() {
    let mut game = game(3);
    let lane = game.world.lane_at_mut(0.0).expect("start lane");
    lane.obstacles.push(Obstacle::car(0.0, 0.0, Direction::Right, 0.0));

    assert_eq!(game.frame(0.0, FRAME), None);
    assert!(game.player.hit_by_car);
    let car = game.world.lane_at_mut(0.0).and_then(|lane| lane.obstacles.last()).cloned();
    assert!(car.map_or(false, |car| car.collided()));

    assert_eq!(game.frame(0.5, 0.5), None);
    assert!(game.player.hit_by_car);
    assert_eq!(game.frame(1.0, 0.5), Some(DeathCause::HitByCar));
    assert_initial(&game);
    assert_eq!(game.deaths, 1);
}

#[test]
fn open_water_sinks_the_player() {
    let mut game = game(4);
    flood_player_lane(&mut game);

    assert_eq!(game.frame(0.0, FRAME), None);
    assert!(game.player.sinking);
    assert_eq!(game.frame(0.5, 0.5), None);
    assert!(game.player.pose().position().y < 0.0);
    assert_eq!(game.frame(1.0, 0.5), Some(DeathCause::Drowned));
    assert_initial(&game);
}

#[test]
fn riding_a_log_carries_the_player() {
    let mut game = game(5);
    flood_player_lane(&mut game)
        .obstacles
        .push(Obstacle::log(0.0, 0.0, Direction::Right, 0.1));

    for i in 1..=5 {
        assert_eq!(game.frame(i as f32 * FRAME, FRAME), None);
        assert!(game.player.on_log);
        assert!(!game.player.sinking);
        assert!((game.player.drift_x() - 0.1 * i as f32).abs() < 1e-4);
    }
}

#[test]
fn landing_on_the_hazard_strip_is_fatal() {
    let mut game = game(6);
    game.jump_backward();
    game.jump_forward();
    game.jump_forward();

    let mut t = 0.0;
    let mut outcome = None;
    while t < 3.0 && outcome.is_none() {
        outcome = game.frame(t, 0.05);
        t += 0.05;
    }
    assert_eq!(outcome, Some(DeathCause::Hazard));
    assert_initial(&game);
}

#[test]
fn long_run_keeps_streaming_invariants() {
    let mut game = game(7);
    let mut t = 0.0;
    let mut best = 0;
    for i in 0..4000 {
        if i % 70 == 0 {
            game.jump_forward();
        }
        let player_z = game.player.pose().z();
        let died = game.frame(t, 0.02).is_some();
        t += 0.02;

        if died {
            assert_initial(&game);
            best = 0;
            continue;
        }
        let bound = player_z + game.config.world.retire_distance;
        assert!(game.world.lanes().all(|lane| lane.z <= bound));
        assert!(game.world.sections.iter().all(|section| !section.is_empty()));
        assert!(game.score() >= best);
        best = game.score();
    }
}
