use crossterm::event::{Event, KeyCode};
use duelris_battle::{BattleCoordinator, BattlePhase, MatchOutcome, PlayerId};
use duelris_engine::Command;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};

use crate::{
    tui::{App, Tui},
    ui::widgets::{PlayerDisplay, PlayerStatus},
};

const FPS: f64 = 60.0;

/// Number of ticks a cleared row stays highlighted.
const FLASH_TICKS: u8 = 12;

#[derive(Debug, Default)]
struct ClearFlash {
    rows: Vec<usize>,
    ticks_left: u8,
}

impl ClearFlash {
    fn update(&mut self, cleared_rows: Vec<usize>) {
        if !cleared_rows.is_empty() {
            self.rows = cleared_rows;
            self.ticks_left = FLASH_TICKS;
        } else if self.ticks_left > 0 {
            self.ticks_left -= 1;
            if self.ticks_left == 0 {
                self.rows.clear();
            }
        }
    }
}

#[derive(Debug)]
pub(crate) struct BattleApp {
    battle: BattleCoordinator,
    flashes: [ClearFlash; 2],
    is_exiting: bool,
}

impl BattleApp {
    pub(crate) fn new(battle: BattleCoordinator) -> Self {
        Self {
            battle,
            flashes: Default::default(),
            is_exiting: false,
        }
    }

    /// Tears the battle down and returns its result, if one was reached.
    pub(crate) fn finish(mut self) -> Option<MatchOutcome> {
        let outcome = self.battle.outcome().copied();
        self.battle.dispose();
        outcome
    }

    fn key_command(code: KeyCode) -> Option<(PlayerId, Command)> {
        let binding = match code {
            KeyCode::Char('a') => (PlayerId::One, Command::MoveLeft),
            KeyCode::Char('d') => (PlayerId::One, Command::MoveRight),
            KeyCode::Char('s') => (PlayerId::One, Command::MoveDown),
            KeyCode::Char('w') => (PlayerId::One, Command::Rotate),
            KeyCode::Char(' ') => (PlayerId::One, Command::HardDrop),
            KeyCode::Left => (PlayerId::Two, Command::MoveLeft),
            KeyCode::Right => (PlayerId::Two, Command::MoveRight),
            KeyCode::Down => (PlayerId::Two, Command::MoveDown),
            KeyCode::Up => (PlayerId::Two, Command::Rotate),
            KeyCode::Enter => (PlayerId::Two, Command::HardDrop),
            _ => return None,
        };
        Some(binding)
    }

    fn player_status(&self, player: PlayerId) -> PlayerStatus {
        if let Some(outcome) = self.battle.outcome() {
            return if outcome.winner == player {
                PlayerStatus::Won
            } else {
                PlayerStatus::Lost
            };
        }
        if self.battle.engine(player).is_game_over() {
            PlayerStatus::ToppedOut
        } else if self.battle.is_paused() {
            PlayerStatus::Paused
        } else {
            PlayerStatus::Playing
        }
    }

    fn player_title(&self, player: PlayerId) -> String {
        let title = match self.battle.ai_difficulty(player) {
            Some(difficulty) => format!("{player} (AI {difficulty})"),
            None => player.to_string(),
        };
        title.to_uppercase()
    }

    fn header_text(&self) -> String {
        let mode = self.battle.mode().to_string().to_uppercase();
        if self.battle.mode().has_countdown() {
            let secs = self.battle.remaining_seconds();
            format!("{mode}  {}:{:02}", secs / 60, secs % 60)
        } else {
            mode
        }
    }

    fn help_text(&self) -> &'static str {
        match self.battle.phase() {
            BattlePhase::Ready | BattlePhase::Running if self.battle.is_ai(PlayerId::One) => {
                "P (Pause) | Q (Quit)"
            }
            BattlePhase::Ready | BattlePhase::Running if self.battle.is_ai(PlayerId::Two) => {
                "A D (Move) | S (Down) | W (Rotate) | Space (Drop) | P (Pause) | Q (Quit)"
            }
            BattlePhase::Ready | BattlePhase::Running => {
                "P1: A D S W Space | P2: ← → ↓ ↑ Enter | P (Pause) | Q (Quit)"
            }
            BattlePhase::Paused => "P (Resume) | Q (Quit)",
            BattlePhase::Finished | BattlePhase::Disposed => "Q (Quit)",
        }
    }
}

impl App for BattleApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_rate(FPS);
        tui.set_frame_rate(FPS);
        self.battle.start_battle();
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: Event) {
        let Some(event) = event.as_key_press_event() else {
            return;
        };
        match event.code {
            KeyCode::Char('q') | KeyCode::Esc => self.is_exiting = true,
            KeyCode::Char('p') => self.battle.toggle_pause(),
            code => {
                if let Some((player, command)) = Self::key_command(code) {
                    _ = self.battle.command(player, command);
                }
            }
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let header = Text::from(self.header_text()).centered();
        let help = Text::from(self.help_text())
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [header_area, main_area, help_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(22),
            Constraint::Length(1),
        ])
        .spacing(1)
        .areas(frame.area());
        let player_areas: [_; 2] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).areas(main_area);

        frame.render_widget(header, header_area);
        for (player, area) in PlayerId::ALL.into_iter().zip(player_areas) {
            let display = PlayerDisplay::new(self.battle.engine(player), self.player_title(player))
                .status(self.player_status(player))
                .flash_rows(&self.flashes[player.index()].rows);
            frame.render_widget(display, area);
        }
        frame.render_widget(help, help_area);
    }

    fn update(&mut self, _tui: &mut Tui) {
        self.battle.advance();
        for player in PlayerId::ALL {
            let cleared_rows = self.battle.consume_last_cleared_rows(player);
            self.flashes[player.index()].update(cleared_rows);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{rc::Rc, time::Duration};

    use crossterm::event::{KeyEvent, KeyModifiers};
    use duelris_battle::BattleConfig;
    use duelris_engine::{GameMode, ManualClock};

    use super::*;

    fn app(mode: GameMode) -> (BattleApp, ManualClock) {
        let clock = ManualClock::new();
        let battle = BattleCoordinator::new(BattleConfig::new(mode), Rc::new(clock.clone())).unwrap();
        let mut app = BattleApp::new(battle);
        app.battle.start_battle();
        (app, clock)
    }

    fn press(app: &mut BattleApp, code: KeyCode) {
        let event = Event::Key(KeyEvent::new(code, KeyModifiers::NONE));
        app.handle_event(&mut Tui::new(), event);
    }

    #[test]
    fn test_key_bindings() {
        let table = [
            (KeyCode::Char('a'), Some((PlayerId::One, Command::MoveLeft))),
            (KeyCode::Char(' '), Some((PlayerId::One, Command::HardDrop))),
            (KeyCode::Up, Some((PlayerId::Two, Command::Rotate))),
            (KeyCode::Enter, Some((PlayerId::Two, Command::HardDrop))),
            (KeyCode::Char('x'), None),
        ];
        for (code, expected) in table {
            assert_eq!(BattleApp::key_command(code), expected, "{code:?}");
        }
    }

    #[test]
    fn test_keys_drive_each_player() {
        let (mut app, _clock) = app(GameMode::Normal);
        let before = PlayerId::ALL.map(|p| app.battle.engine(p).current_block().x());

        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Right);

        assert_eq!(app.battle.engine(PlayerId::One).current_block().x(), before[0] - 1);
        assert_eq!(app.battle.engine(PlayerId::Two).current_block().x(), before[1] + 1);
    }

    #[test]
    fn test_pause_key_toggles() {
        let (mut app, _clock) = app(GameMode::TimeLimit);
        press(&mut app, KeyCode::Char('p'));
        assert!(app.battle.is_paused());
        assert_eq!(app.player_status(PlayerId::One), PlayerStatus::Paused);
        assert_eq!(app.help_text(), "P (Resume) | Q (Quit)");

        press(&mut app, KeyCode::Char('p'));
        assert!(!app.battle.is_paused());
    }

    #[test]
    fn test_header_shows_countdown() {
        let (mut app, clock) = app(GameMode::TimeLimit);
        clock.advance(Duration::from_secs(61));
        app.update(&mut Tui::new());
        assert_eq!(app.header_text(), "TIMELIMIT  3:59");
    }

    #[test]
    fn test_ai_player_title() {
        let (app, _clock) = app(GameMode::AiVsAi);
        assert_eq!(app.player_title(PlayerId::Two), "PLAYER 2 (AI HARD)");
    }

    #[test]
    fn test_help_lists_only_seats_with_humans() {
        let cases = [
            (GameMode::AiVsAi, "P (Pause) | Q (Quit)"),
            (
                GameMode::PlayerVsAi,
                "A D (Move) | S (Down) | W (Rotate) | Space (Drop) | P (Pause) | Q (Quit)",
            ),
            (
                GameMode::Normal,
                "P1: A D S W Space | P2: ← → ↓ ↑ Enter | P (Pause) | Q (Quit)",
            ),
        ];
        for (mode, expected) in cases {
            let (app, _clock) = app(mode);
            assert_eq!(app.help_text(), expected, "{mode}");
        }
    }

    #[test]
    fn test_quit_disposes_battle() {
        let (mut app, _clock) = app(GameMode::Normal);
        press(&mut app, KeyCode::Esc);
        assert!(app.should_exit());
        assert_eq!(app.finish(), None);
    }

    #[test]
    fn test_flash_expires() {
        let mut flash = ClearFlash::default();
        flash.update(vec![18, 19]);
        assert_eq!(flash.rows, [18, 19]);
        for _ in 0..FLASH_TICKS {
            flash.update(Vec::new());
        }
        assert!(flash.rows.is_empty());
    }
}
