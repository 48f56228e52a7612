use std::{path::PathBuf, rc::Rc, time::Duration};

use chrono::{DateTime, Utc};
use duelris_battle::{BattleConfig, BattleCoordinator, MatchOutcome, PlayerId};
use duelris_engine::{Clock as _, GameEngine, GameMode, ManualClock};
use serde::Serialize;

use crate::{command::MatchArgs, util};

/// Simulated time advanced between two coordinator steps.
const STEP: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    match_args: MatchArgs,
    /// Number of battles to run
    #[clap(long, default_value_t = 1)]
    count: usize,
    /// Simulated seconds after which an undecided battle is abandoned
    #[clap(long, default_value_t = 3600)]
    max_secs: u64,
    /// Output file path (JSON format, stdout if omitted)
    #[clap(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    generated_at: DateTime<Utc>,
    config: BattleConfig,
    /// Decided battles won by each player.
    wins: [usize; 2],
    /// Battles abandoned at the time cap.
    undecided: usize,
    battles: Vec<BattleRecord>,
}

#[derive(Debug, Serialize)]
struct BattleRecord {
    index: usize,
    outcome: Option<MatchOutcome>,
    simulated_ms: u64,
    scores: [usize; 2],
    completed_blocks: [usize; 2],
    cleared_lines: [usize; 2],
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        match_args,
        count,
        max_secs,
        output,
    } = arg;

    let mut config = match_args.resolve()?;
    if config.mode != GameMode::AiVsAi {
        tracing::info!(mode = %config.mode, "simulation always runs AI vs AI");
        config.mode = GameMode::AiVsAi;
    }
    let max_duration = Duration::from_secs(*max_secs);

    let mut battles = Vec::with_capacity(*count);
    for index in 0..*count {
        let record = simulate_battle(index, &config, max_duration)?;
        match record.outcome {
            Some(outcome) => tracing::info!(
                battle = index,
                winner = %outcome.winner,
                scores = ?outcome.scores,
                "battle decided"
            ),
            None => tracing::warn!(battle = index, "battle undecided at time cap"),
        }
        battles.push(record);
    }

    let mut wins = [0; 2];
    for outcome in battles.iter().filter_map(|b| b.outcome) {
        wins[outcome.winner.index()] += 1;
    }
    let undecided = battles.iter().filter(|b| b.outcome.is_none()).count();

    let report = SimulationReport {
        generated_at: Utc::now(),
        config,
        wins,
        undecided,
        battles,
    };
    util::save_json(&report, output.as_deref())?;
    Ok(())
}

fn simulate_battle(
    index: usize,
    config: &BattleConfig,
    max_duration: Duration,
) -> anyhow::Result<BattleRecord> {
    let clock = ManualClock::new();
    let mut battle = BattleCoordinator::new(config.clone(), Rc::new(clock.clone()))?;

    battle.start_battle();
    while battle.outcome().is_none() && clock.now() < max_duration {
        clock.advance(STEP);
        battle.advance();
    }

    let record = BattleRecord {
        index,
        outcome: battle.outcome().copied(),
        simulated_ms: u64::try_from(clock.now().as_millis()).unwrap_or(u64::MAX),
        scores: per_player(&battle, GameEngine::score),
        completed_blocks: per_player(&battle, |engine| engine.stats().completed_blocks()),
        cleared_lines: per_player(&battle, |engine| engine.stats().total_cleared_lines()),
    };
    battle.dispose();
    Ok(record)
}

fn per_player(battle: &BattleCoordinator, f: impl Fn(&GameEngine) -> usize) -> [usize; 2] {
    PlayerId::ALL.map(|player| f(battle.engine(player)))
}

#[cfg(test)]
mod tests {
    use duelris_engine::BlockSeed;

    use super::*;

    #[test]
    fn test_simulated_battle_ends() {
        let config = BattleConfig {
            seed: Some(BlockSeed::from_bytes([7; 16])),
            gravity_interval: Duration::from_millis(10),
            ..BattleConfig::new(GameMode::AiVsAi)
        };
        let record = simulate_battle(0, &config, Duration::from_secs(3600)).unwrap();

        let outcome = record.outcome.expect("battle should be decided");
        assert!(outcome.reason.is_game_over());
        assert_eq!(outcome.scores, record.scores);
        assert!(record.completed_blocks.iter().all(|&n| n > 0));
    }

    #[test]
    fn test_time_cap_leaves_battle_undecided() {
        let config = BattleConfig {
            seed: Some(BlockSeed::from_bytes([1; 16])),
            ..BattleConfig::new(GameMode::AiVsAi)
        };
        let record = simulate_battle(0, &config, Duration::from_secs(1)).unwrap();
        assert!(record.outcome.is_none());
        assert_eq!(record.simulated_ms, 1000);
    }
}
