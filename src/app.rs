use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::charset::{CharPicker, RandomPicker};
use crate::exposure::ExposureDuration;
use crate::round::{GameSession, Phase, RoundController};

/// What the event loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// UI-shell state around the round controller: the exposure slider and the
/// single-character guess field.
#[derive(Debug)]
pub struct App {
    pub controller: RoundController,
    pub exposure: ExposureDuration,
    pub guess: String,
}

impl App {
    pub fn new(exposure: ExposureDuration) -> Self {
        Self::with_picker(exposure, Box::new(RandomPicker::new()))
    }

    pub fn with_picker(exposure: ExposureDuration, picker: Box<dyn CharPicker>) -> Self {
        Self {
            controller: RoundController::new(picker),
            exposure,
            guess: String::new(),
        }
    }

    pub fn session(&self) -> &GameSession {
        self.controller.session()
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    pub fn start_game(&mut self) {
        self.controller.reset_game();
        tracing::info!(exposure = %self.exposure, "new game");
        self.next_round();
    }

    pub fn next_round(&mut self) {
        self.guess.clear();
        self.controller.start_round();
    }

    /// Returns true if the screen needs redrawing
    pub fn on_tick(&mut self, now: Instant) -> bool {
        self.controller.tick(now, self.exposure)
    }

    pub fn hide_deadline(&self) -> Option<Instant> {
        self.controller.hide_deadline(self.exposure)
    }

    fn submit(&mut self) {
        // empty or over-long input never reaches the controller
        if self.guess.chars().count() != 1 {
            return;
        }
        if self.controller.submit_guess(&self.guess) {
            self.guess.clear();
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Flow {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return Flow::Quit;
        }

        match key.code {
            KeyCode::Up => {
                self.exposure.increase();
                return Flow::Continue;
            }
            KeyCode::Down => {
                self.exposure.decrease();
                return Flow::Continue;
            }
            _ => {}
        }

        match self.phase() {
            Phase::Idle => match key.code {
                KeyCode::Enter | KeyCode::Char('s') => self.start_game(),
                KeyCode::Char('+') => self.exposure.increase(),
                KeyCode::Char('-') => self.exposure.decrease(),
                _ => {}
            },
            Phase::Displaying => match key.code {
                KeyCode::Char('+') => self.exposure.increase(),
                KeyCode::Char('-') => self.exposure.decrease(),
                _ => {}
            },
            Phase::AwaitingInput => match key.code {
                KeyCode::Char(c)
                    if key.modifiers == KeyModifiers::NONE
                        || key.modifiers == KeyModifiers::SHIFT =>
                {
                    // the field holds one character; typing replaces it
                    self.guess.clear();
                    self.guess.push(c);
                }
                KeyCode::Backspace | KeyCode::Delete => self.guess.clear(),
                KeyCode::Enter => self.submit(),
                _ => {}
            },
            Phase::Resolved => match key.code {
                KeyCode::Enter | KeyCode::Char('n') => self.next_round(),
                KeyCode::Char('r') => self.start_game(),
                KeyCode::Char('+') => self.exposure.increase(),
                KeyCode::Char('-') => self.exposure.decrease(),
                _ => {}
            },
        }

        Flow::Continue
    }
}
