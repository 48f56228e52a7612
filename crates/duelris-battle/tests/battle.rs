use std::{rc::Rc, time::Duration};

use duelris_battle::{BattleConfig, BattleCoordinator, EndReason, PlayerId};
use duelris_engine::{BlockSeed, Command, GameMode, ManualClock};

const SEED: BlockSeed = BlockSeed::from_bytes([0x5E; 16]);

fn config(mode: GameMode) -> BattleConfig {
    BattleConfig {
        seed: Some(SEED),
        ..BattleConfig::new(mode)
    }
}

fn start(config: BattleConfig) -> (BattleCoordinator, ManualClock) {
    let clock = ManualClock::new();
    let mut battle = BattleCoordinator::new(config, Rc::new(clock.clone())).unwrap();
    battle.start_battle();
    (battle, clock)
}

fn step(battle: &mut BattleCoordinator, clock: &ManualClock, by: Duration) {
    clock.advance(by);
    battle.advance();
}

#[test]
fn countdown_ticks_once_per_second() {
    let (mut battle, clock) = start(config(GameMode::TimeLimit));
    assert_eq!(battle.remaining_seconds(), 300);

    step(&mut battle, &clock, Duration::from_millis(999));
    assert_eq!(battle.remaining_seconds(), 300);
    step(&mut battle, &clock, Duration::from_millis(1));
    assert_eq!(battle.remaining_seconds(), 299);
    step(&mut battle, &clock, Duration::from_secs(10));
    assert_eq!(battle.remaining_seconds(), 289);
}

#[test]
fn countdown_is_frozen_while_paused() {
    let (mut battle, clock) = start(config(GameMode::TimeLimit));
    step(&mut battle, &clock, Duration::from_millis(2500));
    assert_eq!(battle.remaining_seconds(), 298);

    battle.force_pause();
    assert!(battle.is_paused());
    assert!(battle.engine(PlayerId::One).is_paused());
    let block = *battle.engine(PlayerId::One).current_block();
    step(&mut battle, &clock, Duration::from_secs(60));
    assert_eq!(battle.remaining_seconds(), 298);
    assert_eq!(*battle.engine(PlayerId::One).current_block(), block);
    assert!(!battle.command(PlayerId::One, Command::MoveLeft));

    // Resuming restarts the countdown with a full second.
    battle.resume();
    step(&mut battle, &clock, Duration::from_millis(999));
    assert_eq!(battle.remaining_seconds(), 298);
    step(&mut battle, &clock, Duration::from_millis(1));
    assert_eq!(battle.remaining_seconds(), 297);
}

#[test]
fn toggle_pause_round_trips() {
    let (mut battle, _clock) = start(config(GameMode::Normal));
    battle.toggle_pause();
    assert!(battle.is_paused());
    battle.toggle_pause();
    assert!(!battle.is_paused());
    assert!(!battle.engine(PlayerId::Two).is_paused());
}

#[test]
fn time_up_with_equal_scores_goes_to_player_one() {
    let config = BattleConfig {
        time_limit_secs: 3,
        // Slow gravity so nothing locks before time runs out.
        gravity_interval: Duration::from_secs(60),
        ..config(GameMode::TimeLimit)
    };
    let (mut battle, clock) = start(config);
    step(&mut battle, &clock, Duration::from_secs(3));

    let outcome = battle.outcome().unwrap();
    assert_eq!(outcome.reason, EndReason::TimeUp);
    assert_eq!(outcome.scores, [0, 0]);
    assert_eq!(outcome.winner, PlayerId::One);
    assert!(battle.phase().is_finished());

    // Nothing moves after the end.
    assert!(!battle.command(PlayerId::One, Command::HardDrop));
    step(&mut battle, &clock, Duration::from_secs(5));
    assert_eq!(battle.remaining_seconds(), 0);
}

#[test]
fn higher_score_wins_on_time_up() {
    let config = BattleConfig {
        time_limit_secs: 1,
        gravity_interval: Duration::from_secs(60),
        ..config(GameMode::TimeLimit)
    };
    let (mut battle, clock) = start(config);
    assert!(battle.command(PlayerId::Two, Command::MoveDown));
    step(&mut battle, &clock, Duration::from_secs(1));

    let outcome = battle.outcome().unwrap();
    assert_eq!(outcome.scores, [0, 1]);
    assert_eq!(outcome.winner, PlayerId::Two);
}

#[test]
fn engines_are_independent() {
    let (mut battle, _clock) = start(config(GameMode::Normal));
    let before = *battle.engine(PlayerId::Two).current_block();

    assert!(battle.command(PlayerId::One, Command::MoveLeft));
    assert!(battle.command(PlayerId::One, Command::HardDrop));

    assert_eq!(*battle.engine(PlayerId::Two).current_block(), before);
    assert_eq!(battle.engine(PlayerId::Two).score(), 0);
    assert_eq!(battle.engine(PlayerId::One).stats().completed_blocks(), 1);
}

#[test]
fn ai_player_rejects_human_commands() {
    let (mut battle, _clock) = start(config(GameMode::PlayerVsAi));
    assert!(battle.command(PlayerId::One, Command::MoveRight));
    assert!(!battle.command(PlayerId::Two, Command::MoveRight));
}

#[test]
fn ai_acts_once_per_think_delay() {
    let config = BattleConfig {
        gravity_interval: Duration::from_secs(60),
        ..config(GameMode::PlayerVsAi)
    };
    let (mut battle, clock) = start(config);

    // Normal difficulty thinks for 500 ms per command.
    let idle = *battle.engine(PlayerId::Two).current_block();
    step(&mut battle, &clock, Duration::from_millis(499));

    assert_eq!(*battle.engine(PlayerId::Two).current_block(), idle);

    // No plan needs more than 3 rotations, 9 shifts and a drop.
    step(&mut battle, &clock, Duration::from_millis(13 * 500));
    assert!(battle.engine(PlayerId::Two).stats().completed_blocks() >= 1);
    assert_eq!(battle.engine(PlayerId::One).stats().completed_blocks(), 0);
}

#[test]
fn ai_vs_ai_runs_to_completion() {
    // Gravity far outpaces the AI, so blocks pile up in the middle.
    let config = BattleConfig {
        gravity_interval: Duration::from_millis(10),
        ..config(GameMode::AiVsAi)
    };
    let (mut battle, clock) = start(config);
    for _ in 0..10_000 {
        if battle.outcome().is_some() {
            break;
        }
        step(&mut battle, &clock, Duration::from_millis(50));
    }

    let outcome = battle.outcome().expect("AI battle should end under fast gravity");
    assert!(outcome.reason.is_game_over());
    assert!(PlayerId::ALL.iter().any(|&p| battle.engine(p).is_game_over()));
    let [winner, loser] =
        [outcome.winner, outcome.winner.opponent()].map(|p| outcome.scores[p.index()]);
    assert!(winner >= loser);
}

#[test]
fn dispose_is_idempotent_and_final() {
    let (mut battle, clock) = start(config(GameMode::TimeLimit));
    battle.dispose();
    battle.dispose();
    assert!(battle.phase().is_disposed());

    step(&mut battle, &clock, Duration::from_secs(10));
    assert_eq!(battle.remaining_seconds(), 300);
    assert!(!battle.command(PlayerId::One, Command::MoveLeft));
    battle.resume();
    battle.start_battle();
    assert!(battle.phase().is_disposed());
}

#[test]
fn dispose_before_start_is_safe() {
    let clock = ManualClock::new();
    let mut battle =
        BattleCoordinator::new(config(GameMode::AiVsAi), Rc::new(clock.clone())).unwrap();
    assert!(battle.phase().is_ready());
    battle.dispose();
    battle.dispose();
    assert!(battle.phase().is_disposed());

    let boards = PlayerId::ALL.map(|p| battle.engine(p).board().clone());
    step(&mut battle, &clock, Duration::from_secs(10));
    battle.start_battle();
    step(&mut battle, &clock, Duration::from_secs(10));
    assert!(battle.phase().is_disposed());
    assert!(battle.outcome().is_none());
    for p in PlayerId::ALL {
        assert_eq!(*battle.engine(p).board(), boards[p.index()]);
        assert_eq!(battle.engine(p).current_block().y(), 0);
    }
}

#[test]
fn cleared_rows_are_consumed_once() {
    let (mut battle, _clock) = start(config(GameMode::Normal));
    for _ in 0..3 {
        battle.command(PlayerId::One, Command::HardDrop);
    }
    // Three blocks cannot fill a ten-wide row.
    assert!(battle.consume_last_cleared_rows(PlayerId::One).is_empty());
    assert!(battle.consume_last_cleared_rows(PlayerId::Two).is_empty());
}
