use std::time::Duration;

use duelris_engine::{Block, Command, GameEngine};

use crate::{
    difficulty::Difficulty,
    turn_evaluator::{TurnEvaluator, TurnPlan},
};

/// Turns placement plans into one command at a time.
///
/// The controller owns no engine. Each call to
/// [`next_command`](Self::next_command) borrows one read-only, plans a
/// placement for the falling block if needed and returns the next step
/// toward it: rotate until the rotation matches, then shift horizontally,
/// then hard drop. The caller applies the command and reports the outcome
/// through [`command_result`](Self::command_result); a rejected step drops
/// the plan so the next call re-plans from the current position.
///
/// Pacing is the caller's job: issue at most one command per
/// [`think_delay`](Self::think_delay).
#[derive(Debug)]
pub struct AiController {
    difficulty: Difficulty,
    turn_evaluator: TurnEvaluator<'static>,
    best_turn: Option<TurnPlan>,
    planned_turn: usize,
    last_rejected: Option<Command>,
}

impl AiController {
    #[must_use]
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_evaluator(difficulty, TurnEvaluator::default())
    }

    #[must_use]
    pub fn with_evaluator(difficulty: Difficulty, turn_evaluator: TurnEvaluator<'static>) -> Self {
        Self {
            difficulty,
            turn_evaluator,
            best_turn: None,
            planned_turn: 0,
            last_rejected: None,
        }
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn think_delay(&self) -> Duration {
        self.difficulty.think_delay()
    }

    /// Current plan, if one has been made for the falling block.
    #[must_use]
    pub fn plan(&self) -> Option<&TurnPlan> {
        self.best_turn.as_ref()
    }

    /// Decides the next command for `engine`, or `None` if it takes no input.
    pub fn next_command(&mut self, engine: &GameEngine) -> Option<Command> {
        if engine.is_game_over() || engine.is_paused() {
            return None;
        }

        // A lock since the last plan means a new block is falling.
        let turn = engine.stats().completed_blocks();
        if turn != self.planned_turn || self.best_turn.is_none() {
            self.best_turn = self.turn_evaluator.select_best_turn(
                engine.board(),
                engine.current_block(),
                engine.next_block(),
                self.difficulty,
            );
            self.planned_turn = turn;
            if self.best_turn.is_none() {
                tracing::trace!("no placement found, dropping in place");
            }
        }

        let command = match &self.best_turn {
            Some(target) => step_toward(engine.current_block(), &target.placement()),
            None => Command::HardDrop,
        };

        // Repeating a step that was just rejected cannot make progress.
        if self.last_rejected.take() == Some(command) {
            return Some(Command::HardDrop);
        }
        Some(command)
    }

    /// Records whether the engine accepted `command`.
    pub fn command_result(&mut self, command: Command, accepted: bool) {
        if accepted {
            self.last_rejected = None;
            if command == Command::HardDrop {
                self.best_turn = None;
            }
        } else {
            tracing::trace!(%command, "command rejected, re-planning");
            self.best_turn = None;
            self.last_rejected = Some(command);
        }
    }
}

fn step_toward(current: &Block, target: &Block) -> Command {
    if current.rotation() != target.rotation() {
        return Command::Rotate;
    }
    if current.x() < target.x() {
        return Command::MoveRight;
    }
    if current.x() > target.x() {
        return Command::MoveLeft;
    }
    Command::HardDrop
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use duelris_engine::{BlockKind, BlockSeed, Board, GameMode, ManualClock};

    use super::*;

    fn engine_with(board: Board, kind: BlockKind) -> GameEngine {
        let clock = Rc::new(ManualClock::new());
        let mut engine = GameEngine::with_board(
            GameMode::PlayerVsAi,
            BlockSeed::from_bytes([9; 16]),
            clock,
            board,
        );
        engine.set_current_block(Block::spawn(kind)).unwrap();
        engine
    }

    fn right_well() -> Board {
        Board::from_ascii(&"#########.\n".repeat(4))
    }

    fn run_turn(controller: &mut AiController, engine: &mut GameEngine) -> Vec<Command> {
        let turn = engine.stats().completed_blocks();
        let mut commands = vec![];
        while engine.stats().completed_blocks() == turn {
            let command = controller.next_command(engine).unwrap();
            let accepted = engine.apply(command);
            controller.command_result(command, accepted);
            commands.push(command);
            assert!(commands.len() < 20, "controller made no progress: {commands:?}");
        }
        commands
    }

    #[test]
    fn test_fills_well_with_vertical_i() {
        let mut engine = engine_with(right_well(), BlockKind::I);
        let mut controller = AiController::new(Difficulty::Normal);

        let commands = run_turn(&mut controller, &mut engine);

        assert_eq!(commands[0], Command::Rotate);
        assert_eq!(commands.last(), Some(&Command::HardDrop));
        assert_eq!(engine.stats().total_cleared_lines(), 4);
        assert_eq!(*engine.board(), Board::EMPTY);
    }

    #[test]
    fn test_rejected_step_falls_back_to_hard_drop() {
        let engine = engine_with(right_well(), BlockKind::I);
        let mut controller = AiController::new(Difficulty::Hard);

        assert_eq!(controller.next_command(&engine), Some(Command::Rotate));
        controller.command_result(Command::Rotate, false);
        assert!(controller.plan().is_none());
        assert_eq!(controller.next_command(&engine), Some(Command::HardDrop));
    }

    #[test]
    fn test_replans_after_each_lock() {
        let mut engine = engine_with(Board::EMPTY, BlockKind::O);
        let mut controller = AiController::new(Difficulty::Hard);
        for _ in 0..5 {
            run_turn(&mut controller, &mut engine);
            assert!(!engine.is_game_over());
        }
        assert_eq!(engine.stats().completed_blocks(), 5);
    }

    #[test]
    fn test_idle_when_paused_or_over() {
        let mut engine = engine_with(Board::EMPTY, BlockKind::T);
        let mut controller = AiController::new(Difficulty::Normal);
        engine.set_paused(true);
        assert_eq!(controller.next_command(&engine), None);

        let full = Board::from_ascii(&"##########\n".repeat(Board::HEIGHT));
        let over = GameEngine::with_board(
            GameMode::AiVsAi,
            BlockSeed::from_bytes([0; 16]),
            Rc::new(ManualClock::new()),
            full,
        );
        assert!(over.is_game_over());
        assert_eq!(controller.next_command(&over), None);
    }

    #[test]
    fn test_think_delay_follows_difficulty() {
        assert_eq!(
            AiController::new(Difficulty::Hard).think_delay(),
            Duration::from_millis(200)
        );
    }
}
