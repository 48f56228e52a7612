use std::{rc::Rc, time::Duration};

use duelris_ai::{AiController, Difficulty, HeuristicEvaluator, TurnEvaluator};
use duelris_engine::{Clock, Command, GameEngine, GameMode};
use rand::Rng as _;

use crate::{
    attack::attack_for,
    config::{BattleConfig, ConfigError},
    player::{EndReason, MatchOutcome, PlayerId},
    timer::IntervalTimer,
};

const COUNTDOWN_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug)]
struct AiSeat {
    controller: AiController,
    timer: IntervalTimer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerEvent {
    Gravity,
    Ai(PlayerId),
    Countdown,
}

/// Lifecycle of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum BattlePhase {
    /// Built, waiting for [`BattleCoordinator::start_battle`].
    Ready,
    Running,
    Paused,
    /// A winner has been decided.
    Finished,
    Disposed,
}

/// Runs a two-player battle: engines, AI seats, timers and attacks.
///
/// The coordinator is driven from outside. A front end calls
/// [`advance`](Self::advance) often (every frame, or after moving a manual
/// clock) and forwards human input through [`command`](Self::command). All
/// timers are deadlines on the injected [`Clock`]; `advance` fires whatever
/// is due in deadline order, with ties broken as gravity, AI of player 1,
/// AI of player 2, countdown.
///
/// Every line clear is turned into garbage for the opponent within the call
/// that produced it.
///
/// # Example
///
/// ```
/// use std::{rc::Rc, time::Duration};
/// use duelris_battle::{BattleConfig, BattleCoordinator};
/// use duelris_engine::{GameMode, ManualClock};
///
/// let clock = ManualClock::new();
/// let config = BattleConfig::new(GameMode::TimeLimit);
/// let mut battle = BattleCoordinator::new(config, Rc::new(clock.clone())).unwrap();
///
/// battle.start_battle();
/// clock.advance(Duration::from_secs(3));
/// battle.advance();
/// assert_eq!(battle.remaining_seconds(), 297);
/// ```
#[derive(Debug)]
pub struct BattleCoordinator {
    config: BattleConfig,
    clock: Rc<dyn Clock>,
    engines: [GameEngine; 2],
    ai_seats: [Option<AiSeat>; 2],
    gravity: IntervalTimer,
    countdown: Option<IntervalTimer>,
    remaining_seconds: u32,
    phase: BattlePhase,
    outcome: Option<MatchOutcome>,
}

impl BattleCoordinator {
    /// Builds both engines and the AI seats the mode calls for.
    ///
    /// Both players draw the same block sequence.
    pub fn new(config: BattleConfig, clock: Rc<dyn Clock>) -> Result<Self, ConfigError> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let engine = || {
            GameEngine::new(config.mode, seed, Rc::clone(&clock)).with_item_effect(config.item_effect)
        };
        let engines = [engine(), engine()];

        let seat = |difficulty: Difficulty| {
            let evaluator = HeuristicEvaluator::new(config.ai_weights);
            let controller =
                AiController::with_evaluator(difficulty, TurnEvaluator::new(Box::new(evaluator)));
            let timer = IntervalTimer::new(controller.think_delay());
            Some(AiSeat { controller, timer })
        };
        let ai_seats = match config.mode {
            GameMode::Normal | GameMode::Item | GameMode::TimeLimit => [None, None],
            GameMode::PlayerVsAi => [None, seat(config.difficulty)],
            GameMode::AiVsAi => [seat(Difficulty::Hard), seat(Difficulty::Hard)],
        };

        let countdown = config
            .mode
            .has_countdown()
            .then(|| IntervalTimer::new(COUNTDOWN_INTERVAL));

        Ok(Self {
            gravity: IntervalTimer::new(config.gravity_interval),
            remaining_seconds: config.time_limit_secs,
            config,
            clock,
            engines,
            ai_seats,
            countdown,
            phase: BattlePhase::Ready,
            outcome: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.config.mode
    }

    #[must_use]
    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    #[must_use]
    pub fn engine(&self, player: PlayerId) -> &GameEngine {
        &self.engines[player.index()]
    }

    #[must_use]
    pub fn is_ai(&self, player: PlayerId) -> bool {
        self.ai_seats[player.index()].is_some()
    }

    #[must_use]
    pub fn ai_difficulty(&self, player: PlayerId) -> Option<Difficulty> {
        self.ai_seats[player.index()]
            .as_ref()
            .map(|seat| seat.controller.difficulty())
    }

    /// Seconds left on the countdown; only decreases in [`GameMode::TimeLimit`].
    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.phase.is_paused()
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&MatchOutcome> {
        self.outcome.as_ref()
    }

    /// Rows cleared by `player` since the previous call, for line-clear effects.
    pub fn consume_last_cleared_rows(&mut self, player: PlayerId) -> Vec<usize> {
        self.engines[player.index()].consume_last_cleared_rows()
    }

    /// Starts every timer. Only the first call on a fresh battle has an effect.
    pub fn start_battle(&mut self) {
        if !self.phase.is_ready() {
            return;
        }
        self.phase = BattlePhase::Running;
        self.start_timers();
        tracing::info!(
            mode = %self.config.mode,
            ai_players = self.config.mode.ai_players(),
            "battle started"
        );
        // A board that cannot even spawn ends the battle immediately.
        self.check_end();
    }

    pub fn force_pause(&mut self) {
        if !self.phase.is_running() {
            return;
        }
        self.phase = BattlePhase::Paused;
        self.stop_timers();
        for engine in &mut self.engines {
            engine.set_paused(true);
        }
        tracing::info!(remaining_seconds = self.remaining_seconds, "battle paused");
    }

    /// Resumes a paused battle; every timer restarts with a full interval.
    pub fn resume(&mut self) {
        if !self.phase.is_paused() {
            return;
        }
        self.phase = BattlePhase::Running;
        for engine in &mut self.engines {
            engine.set_paused(false);
        }
        self.start_timers();
        tracing::info!(remaining_seconds = self.remaining_seconds, "battle resumed");
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            BattlePhase::Running => self.force_pause(),
            BattlePhase::Paused => self.resume(),
            BattlePhase::Ready | BattlePhase::Finished | BattlePhase::Disposed => {}
        }
    }

    /// Stops all timers for good. Safe to call any number of times.
    pub fn dispose(&mut self) {
        if self.phase.is_disposed() {
            return;
        }
        self.stop_timers();
        self.phase = BattlePhase::Disposed;
        tracing::debug!("battle disposed");
    }

    /// Applies a human command to `player`'s engine.
    ///
    /// Rejected for AI-driven players and whenever the battle is not running.
    pub fn command(&mut self, player: PlayerId, command: Command) -> bool {
        if !self.phase.is_running() || self.is_ai(player) {
            return false;
        }
        let accepted = self.engines[player.index()].apply(command);
        self.send_attacks(player);
        self.check_end();
        accepted
    }

    /// Fires every timer that is due at the clock's current time.
    pub fn advance(&mut self) {
        let now = self.clock.now();
        while self.phase.is_running() {
            let Some(event) = self.next_due_event(now) else {
                break;
            };
            self.fire(event);
            self.check_end();
        }
    }

    fn timers(&self) -> [(TimerEvent, Option<&IntervalTimer>); 4] {
        [
            (TimerEvent::Gravity, Some(&self.gravity)),
            (
                TimerEvent::Ai(PlayerId::One),
                self.ai_seats[0].as_ref().map(|seat| &seat.timer),
            ),
            (
                TimerEvent::Ai(PlayerId::Two),
                self.ai_seats[1].as_ref().map(|seat| &seat.timer),
            ),
            (TimerEvent::Countdown, self.countdown.as_ref()),
        ]
    }

    fn timer_mut(&mut self, event: TimerEvent) -> Option<&mut IntervalTimer> {
        match event {
            TimerEvent::Gravity => Some(&mut self.gravity),
            TimerEvent::Ai(player) => self.ai_seats[player.index()]
                .as_mut()
                .map(|seat| &mut seat.timer),
            TimerEvent::Countdown => self.countdown.as_mut(),
        }
    }

    fn next_due_event(&self, now: Duration) -> Option<TimerEvent> {
        self.timers()
            .into_iter()
            .filter_map(|(event, timer)| Some((event, timer?.due(now)?)))
            .min_by_key(|(_, deadline)| *deadline)
            .map(|(event, _)| event)
    }

    fn start_timers(&mut self) {
        let now = self.clock.now();
        for event in [
            TimerEvent::Gravity,
            TimerEvent::Ai(PlayerId::One),
            TimerEvent::Ai(PlayerId::Two),
            TimerEvent::Countdown,
        ] {
            if let Some(timer) = self.timer_mut(event) {
                timer.start(now);
            }
        }
    }

    fn stop_timers(&mut self) {
        self.gravity.stop();
        for seat in self.ai_seats.iter_mut().flatten() {
            seat.timer.stop();
        }
        if let Some(countdown) = &mut self.countdown {
            countdown.stop();
        }
    }

    fn fire(&mut self, event: TimerEvent) {
        if let Some(timer) = self.timer_mut(event) {
            timer.fire();
        }
        match event {
            TimerEvent::Gravity => {
                for player in PlayerId::ALL {
                    self.engines[player.index()].tick();
                    self.send_attacks(player);
                }
            }
            TimerEvent::Ai(player) => self.step_ai(player),
            TimerEvent::Countdown => {
                self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
                tracing::trace!(remaining_seconds = self.remaining_seconds, "countdown");
            }
        }
    }

    fn step_ai(&mut self, player: PlayerId) {
        let engine = &mut self.engines[player.index()];
        let Some(seat) = &mut self.ai_seats[player.index()] else {
            return;
        };
        let Some(command) = seat.controller.next_command(engine) else {
            return;
        };
        let accepted = engine.apply(command);
        seat.controller.command_result(command, accepted);
        self.send_attacks(player);
    }

    fn send_attacks(&mut self, attacker: PlayerId) {
        let clears = self.engines[attacker.index()].take_line_clears();
        let defender = attacker.opponent();
        for clear in &clears {
            let Some(batch) = attack_for(clear) else {
                continue;
            };
            tracing::debug!(
                from = %attacker,
                to = %defender,
                rows = batch.len(),
                "garbage sent"
            );
            self.engines[defender.index()].receive_garbage(&batch);
        }
    }

    fn check_end(&mut self) {
        if !self.phase.is_running() {
            return;
        }
        let reason = if let Some(player) = PlayerId::ALL
            .into_iter()
            .find(|p| self.engines[p.index()].is_game_over())
        {
            EndReason::GameOver(player)
        } else if self.countdown.is_some() && self.remaining_seconds == 0 {
            EndReason::TimeUp
        } else {
            return;
        };

        let scores = self.engines.each_ref().map(GameEngine::score);
        let outcome = MatchOutcome::decide(scores, reason);
        self.stop_timers();
        self.phase = BattlePhase::Finished;
        self.outcome = Some(outcome);
        tracing::info!(
            winner = %outcome.winner,
            score_1 = scores[0],
            score_2 = scores[1],
            ?reason,
            "battle finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use duelris_engine::{Block, BlockKind, BlockSeed, Board, Cell, ManualClock, Rotation};

    use super::*;

    fn battle(mode: GameMode) -> (BattleCoordinator, ManualClock) {
        let clock = ManualClock::new();
        let config = BattleConfig {
            seed: Some(duelris_engine::BlockSeed::from_bytes([5; 16])),
            ..BattleConfig::new(mode)
        };
        let battle = BattleCoordinator::new(config, Rc::new(clock.clone())).unwrap();
        (battle, clock)
    }

    #[test]
    fn test_ai_seats_follow_mode() {
        let (b, _) = battle(GameMode::Normal);
        assert!(!b.is_ai(PlayerId::One) && !b.is_ai(PlayerId::Two));

        let (b, _) = battle(GameMode::PlayerVsAi);
        assert!(!b.is_ai(PlayerId::One));
        assert_eq!(b.ai_difficulty(PlayerId::Two), Some(Difficulty::Normal));

        let (b, _) = battle(GameMode::AiVsAi);
        assert_eq!(b.ai_difficulty(PlayerId::One), Some(Difficulty::Hard));
        assert_eq!(b.ai_difficulty(PlayerId::Two), Some(Difficulty::Hard));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = BattleConfig {
            gravity_interval: Duration::ZERO,
            ..BattleConfig::default()
        };
        let result = BattleCoordinator::new(config, Rc::new(ManualClock::new()));
        assert_eq!(result.unwrap_err(), ConfigError::ZeroGravityInterval);
    }

    #[test]
    fn test_nothing_happens_before_start() {
        let (mut b, clock) = battle(GameMode::TimeLimit);
        clock.advance(Duration::from_secs(5));
        b.advance();
        assert_eq!(b.remaining_seconds(), 300);
        assert!(!b.command(PlayerId::One, Command::MoveLeft));
        assert!(b.phase().is_ready());
    }

    #[test]
    fn test_due_events_fire_in_deadline_order() {
        let (mut b, clock) = battle(GameMode::Normal);
        b.start_battle();
        let now = Duration::from_millis(2500);
        clock.set(now);
        assert_eq!(b.next_due_event(now), Some(TimerEvent::Gravity));
        b.advance();
        assert_eq!(b.next_due_event(now), None);
        assert_eq!(b.gravity.deadline(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_gravity_moves_both_blocks() {
        let (mut b, clock) = battle(GameMode::Normal);
        b.start_battle();
        clock.advance(Duration::from_secs(2));
        b.advance();
        assert_eq!(b.engine(PlayerId::One).current_block().y(), 2);
        assert_eq!(b.engine(PlayerId::Two).current_block().y(), 2);
    }

    #[test]
    fn test_multi_clear_sends_garbage_to_opponent() {
        let (mut b, clock) = battle(GameMode::Normal);
        let well = Board::from_ascii(&".#########\n".repeat(4));
        b.engines[0] = GameEngine::with_board(
            GameMode::Normal,
            BlockSeed::from_bytes([5; 16]),
            Rc::new(clock.clone()),
            well,
        );
        b.engines[0]
            .set_current_block(Block::at(BlockKind::I, Rotation::ALL[1], 0, 0))
            .unwrap();
        b.start_battle();

        let defender_block = *b.engine(PlayerId::Two).current_block();
        assert!(b.command(PlayerId::One, Command::HardDrop));
        assert_eq!(b.engine(PlayerId::One).stats().total_cleared_lines(), 4);

        // Four rows cleared, three garbage rows with the well column open.
        let board = b.engine(PlayerId::Two).board();
        for y in 0..17 {
            assert!(board.row(y).is_empty(), "row {y} should be empty");
        }
        for y in 17..Board::HEIGHT {
            assert!(board.cell(0, y).is_empty());
            for x in 1..Board::WIDTH {
                assert_eq!(board.cell(x, y), Cell::Garbage);
            }
        }
        assert_eq!(b.engine(PlayerId::Two).score(), 0);
        assert_eq!(*b.engine(PlayerId::Two).current_block(), defender_block);
        assert!(b.phase().is_running());
    }

    #[test]
    fn test_single_clear_sends_nothing() {
        let (mut b, clock) = battle(GameMode::Normal);
        b.engines[0] = GameEngine::with_board(
            GameMode::Normal,
            BlockSeed::from_bytes([5; 16]),
            Rc::new(clock.clone()),
            Board::from_ascii(".#########"),
        );
        b.engines[0]
            .set_current_block(Block::at(BlockKind::I, Rotation::ALL[1], 0, 0))
            .unwrap();
        b.start_battle();

        assert!(b.command(PlayerId::One, Command::HardDrop));
        assert_eq!(b.engine(PlayerId::One).stats().total_cleared_lines(), 1);
        assert_eq!(*b.engine(PlayerId::Two).board(), Board::EMPTY);
    }
}
