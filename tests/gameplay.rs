//! End-to-end sessions driven through the public API

use brickfall::persistence::{HighScoreStore, MemoryStore};
use brickfall::sim::{
    Ball, EventKind, GamePhase, GameState, LevelDef, TickInput, builtin_levels, levels_from_json,
    tick,
};
use brickfall::{Game, HighScore, Tuning};
use glam::Vec2;

const SIM_DT: f32 = 1.0 / 60.0;

fn start() -> TickInput {
    TickInput {
        start: true,
        ..Default::default()
    }
}

fn autopilot() -> TickInput {
    TickInput {
        autopilot: true,
        ..Default::default()
    }
}

#[test]
fn test_custom_tuning_and_levels_from_json() {
    let tuning = Tuning::from_json(r#"{ "start_lives": 5, "ball_base_speed": 280.0 }"#)
        .expect("tuning json");
    let levels = levels_from_json(
        r#"[
            { "rows": 1, "cols": 3, "palette": [16711680], "pattern": [[1, 2, 1]] },
            { "rows": 2, "cols": 2, "pattern": [[1, 1], [2, 2]] }
        ]"#,
    )
    .expect("level json");

    let mut state = GameState::with_levels(tuning, levels, 9, 0);
    tick(&mut state, &start(), SIM_DT);
    assert_eq!(state.lives, 5);
    assert_eq!(state.level_count(), 2);
    assert_eq!(state.grid.remaining(), 3);
    assert_eq!(state.balls[0].speed(), 280.0);
    assert!(state.grid.bricks().all(|(_, _, b)| b.color == 0xFF0000));
}

#[test]
fn test_bad_tuning_json_is_an_error() {
    assert!(Tuning::from_json(r#"{ "start_lives": "many" }"#).is_err());
    assert!(levels_from_json("[{ \"rows\": 1 }]").is_err());
}

#[test]
fn test_zero_brick_pitch_tuning_still_plays() {
    let tuning = Tuning::from_json(r#"{ "brick_height": 0.0, "brick_padding": 0.0 }"#)
        .expect("tuning json");
    let mut state = GameState::with_levels(tuning, builtin_levels(), 3, 0);
    tick(&mut state, &start(), SIM_DT);
    for _ in 0..5 {
        tick(&mut state, &TickInput::default(), SIM_DT);
    }
    assert_eq!(state.phase, GamePhase::Playing);
    assert!(state.grid.cell_pitch().y > 0.0);
}

#[test]
fn test_speedup_after_fifth_paddle_hit() {
    let mut state = GameState::new(4);
    tick(&mut state, &start(), 0.0);
    let paddle_y = state.paddle.y;
    let center = state.paddle.center_x();

    for hit in 1..=5 {
        let ball = &mut state.balls[0];
        ball.pos = Vec2::new(center, paddle_y - 10.0);
        ball.set_direction(Vec2::new(0.0, 1.0));
        tick(&mut state, &TickInput::default(), SIM_DT);
        let ball = &state.balls[0];
        assert_eq!(ball.paddle_hits, hit);
        let expected = if hit < 5 { 320.0 } else { 340.0 };
        assert_eq!(ball.speed(), expected, "after hit {hit}");
    }
}

#[test]
fn test_multi_ball_lives_only_end_with_last_ball() {
    let mut state = GameState::new(8);
    tick(&mut state, &start(), 0.0);
    let id = state.next_entity_id();
    let below = Vec2::new(200.0, state.tuning.world_height + 30.0);
    state.balls.push(Ball::new(id, below, Vec2::new(0.0, 1.0), 320.0, 8.0));
    let id = state.next_entity_id();
    state.balls.push(Ball::new(id, below, Vec2::new(0.0, 1.0), 320.0, 8.0));

    tick(&mut state, &TickInput::default(), SIM_DT);
    assert_eq!(state.balls.len(), 1);
    assert_eq!(state.lives, 3);
    assert!(
        !state
            .drain_events()
            .iter()
            .any(|e| e.kind == EventKind::LifeLost)
    );
}

#[test]
fn test_session_runs_to_an_end_and_restarts() {
    let mut state = GameState::new(77);
    tick(&mut state, &start(), SIM_DT);

    // 30 minutes of simulated play is plenty to win or lose
    let mut ended = false;
    for _ in 0..(60 * 60 * 30) {
        tick(&mut state, &autopilot(), SIM_DT);
        if matches!(state.phase, GamePhase::GameOver | GamePhase::Win) {
            ended = true;
            break;
        }
    }
    assert!(ended, "session never ended");
    if state.phase == GamePhase::GameOver {
        assert_eq!(state.lives, 0);
        assert!(state.balls.is_empty());
    } else {
        assert_eq!(state.level, state.level_count());
        assert_eq!(state.grid.remaining(), 0);
    }
    let final_score = state.score;
    assert_eq!(state.high_score, final_score);

    let restart = TickInput {
        restart: true,
        ..Default::default()
    };
    tick(&mut state, &restart, SIM_DT);
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.score, 0);
    assert_eq!(state.level, 1);
    assert_eq!(state.lives, 3);
    assert_eq!(state.high_score, final_score);
}

#[test]
fn test_new_high_score_announced_once() {
    let mut game = Game::new(
        Tuning::default(),
        builtin_levels(),
        31,
        MemoryStore::with_record(HighScore { score: 25, level: 1 }),
    );
    game.input_mut().start = true;
    game.input_mut().autopilot = true;

    let mut announced = 0;
    for _ in 0..(60 * 60) {
        announced += game
            .step(SIM_DT)
            .iter()
            .filter(|e| e.kind == EventKind::NewHighScore)
            .count();
        if game.state().phase != GamePhase::Playing {
            break;
        }
    }
    assert!(game.state().score > 25, "autopilot should beat 25 in a minute");
    assert_eq!(announced, 1);
}

#[test]
fn test_quit_persists_and_next_session_starts_from_record() {
    let mut game = Game::new(Tuning::default(), builtin_levels(), 13, MemoryStore::new());
    game.input_mut().start = true;
    game.input_mut().autopilot = true;
    for _ in 0..(60 * 10) {
        game.step(SIM_DT);
    }
    let best = game.state().high_score;
    assert!(best > 0);

    game.input_mut().quit = true;
    game.step(SIM_DT);
    assert_eq!(game.state().phase, GamePhase::Start);
    assert_eq!(game.state().score, 0);

    let stored = game.store().load().expect("load");
    assert_eq!(stored.score, best);
    assert!(stored.level >= 1);

    let next = Game::new(
        Tuning::default(),
        builtin_levels(),
        14,
        game.store().clone(),
    );
    assert_eq!(next.state().high_score, best);
}

#[test]
fn test_equal_seeds_give_equal_snapshots() {
    let run = |seed: u64| {
        let mut game = Game::new(Tuning::default(), builtin_levels(), seed, MemoryStore::new());
        game.input_mut().start = true;
        game.input_mut().autopilot = true;
        for _ in 0..(60 * 30) {
            game.step(SIM_DT);
        }
        game.snapshot()
    };
    assert_eq!(run(555), run(555));
}

#[test]
fn test_single_level_set_wins_directly() {
    let level = LevelDef {
        rows: 1,
        cols: 1,
        palette: Vec::new(),
        pattern: vec![vec![1]],
    };
    let tuning = Tuning {
        powerup_drop_chance: 0.0,
        ..Tuning::default()
    };
    let mut state = GameState::with_levels(tuning, vec![level], 2, 0);
    tick(&mut state, &start(), SIM_DT);
    for _ in 0..(60 * 60) {
        tick(&mut state, &autopilot(), SIM_DT);
        if state.phase != GamePhase::Playing {
            break;
        }
    }
    assert_eq!(state.phase, GamePhase::Win);
    let events = state.drain_events();
    assert!(events.iter().any(|e| e.kind == EventKind::Win));
    assert!(!events.iter().any(|e| e.kind == EventKind::LevelComplete));
}
