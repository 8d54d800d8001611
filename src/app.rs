//! App: terminal init, fixed-rate frame loop, key handling.

use crate::GameConfig;
use crate::game::{GameState, Snapshot, Status};
use crate::input::{Action, key_to_action};
use crate::rng::UniformShapes;
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};

/// Outcome of one frame's input handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct App {
    theme: Theme,
    state: GameState<UniformShapes>,
    frame_duration: Duration,
}

impl App {
    pub fn new(config: &GameConfig, theme: Theme) -> Self {
        let state = GameState::new(UniformShapes::new(config.seed), config, Instant::now());
        Self {
            theme,
            state,
            frame_duration: config.frame_duration,
        }
    }

    /// Final (or current) game figures, for the exit summary.
    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    fn apply_action(&mut self, action: Action, now: Instant) -> Flow {
        match action {
            Action::Quit => return Flow::Quit,
            Action::Restart => self.state.restart(now),
            Action::Pause => self.state.toggle_pause(),
            Action::MoveLeft => self.state.move_left(),
            Action::MoveRight => self.state.move_right(),
            Action::Rotate => self.state.rotate(),
            Action::SoftDrop => self.state.soft_drop(),
            Action::HardDrop => self.state.hard_drop(),
            Action::None => {}
        }
        Flow::Continue
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal = DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;

        let result = self.run_loop(&mut terminal);

        // Restore
        let _ = terminal.show_cursor();
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let frame_start = Instant::now();

            // Drain everything queued since the last frame; only presses act
            while event::poll(Duration::ZERO)? {
                let Event::Key(key) = event::read()? else {
                    continue;
                };
                if key.kind == KeyEventKind::Press
                    && self.apply_action(key_to_action(key), Instant::now()) == Flow::Quit
                {
                    return Ok(());
                }
            }

            self.state.tick(Instant::now());

            let snapshot = self.state.snapshot();
            terminal.draw(|f| crate::ui::draw(f, &snapshot, &self.theme))?;

            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_duration {
                std::thread::sleep(self.frame_duration - elapsed);
            }
        }
    }
}

/// One-line summary printed after the terminal is restored.
pub fn summary(snapshot: &Snapshot) -> String {
    let outcome = match snapshot.status {
        Status::Won => "won",
        Status::Lost => "game over",
        Status::Playing | Status::Paused => "quit",
    };
    format!(
        "{outcome}: score {}, {} lines, stage {}/{}",
        snapshot.score, snapshot.lines_cleared, snapshot.stage, snapshot.max_stage
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let config = GameConfig {
            seed: Some(7),
            ..GameConfig::default()
        };
        App::new(&config, Theme::default())
    }

    #[test]
    fn test_frame_duration_follows_frame_rate() {
        let app = app();
        assert_eq!(app.frame_duration, Duration::from_secs_f64(1.0 / 60.0));
    }

    #[test]
    fn test_quit_stops_the_loop_and_other_keys_continue() {
        let mut app = app();
        let now = Instant::now();
        assert_eq!(app.apply_action(Action::Quit, now), Flow::Quit);
        assert_eq!(app.apply_action(Action::MoveLeft, now), Flow::Continue);
        assert_eq!(app.apply_action(Action::None, now), Flow::Continue);
    }

    #[test]
    fn test_pause_and_restart_actions() {
        let mut app = app();
        let now = Instant::now();
        app.apply_action(Action::Pause, now);
        assert_eq!(app.snapshot().status, Status::Paused);
        app.apply_action(Action::Pause, now);
        assert_eq!(app.snapshot().status, Status::Playing);

        app.apply_action(Action::HardDrop, now);
        assert!(app.snapshot().grid.rows().flatten().any(|c| c.is_filled()));
        app.apply_action(Action::Restart, now);
        let snap = app.snapshot();
        assert!(!snap.grid.rows().flatten().any(|c| c.is_filled()));
        assert_eq!((snap.score, snap.stage, snap.status), (0, 1, Status::Playing));
    }

    #[test]
    fn test_summary_names_the_outcome() {
        let mut snap = app().snapshot();
        snap.score = 500;
        snap.lines_cleared = 5;
        snap.stage = 6;
        assert_eq!(summary(&snap), "quit: score 500, 5 lines, stage 6/10");
        snap.status = Status::Won;
        assert!(summary(&snap).starts_with("won:"));
        snap.status = Status::Lost;
        assert!(summary(&snap).starts_with("game over:"));
    }
}
