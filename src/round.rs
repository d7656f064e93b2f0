use std::time::{Duration, Instant};

use crate::charset::{CharPicker, RandomPicker};
use crate::exposure::ExposureDuration;

pub const CORRECT_MESSAGE: &str = "correct";

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Displaying,
    AwaitingInput,
    Resolved,
}

#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// Inputs to the round state machine
#[derive(Debug, Clone, PartialEq)]
pub enum RoundEvent {
    Start { target: char, at: Instant },
    Tick { now: Instant, exposure: Duration },
    Guess(String),
    Reset,
}

/// State of one player's game. Fields are only changed through `apply`, which
/// keeps `target` set exactly when the phase is not `Idle`.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    score: u32,
    rounds_played: u32,
    phase: Phase,
    target: Option<char>,
    display_started_at: Option<Instant>,
    last_message: String,
    last_outcome: Option<Outcome>,
    last_guess: Option<String>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self {
            score: 0,
            rounds_played: 0,
            phase: Phase::Idle,
            target: None,
            display_started_at: None,
            last_message: String::new(),
            last_outcome: None,
            last_guess: None,
        }
    }
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn target(&self) -> Option<char> {
        self.target
    }

    pub fn display_started_at(&self) -> Option<Instant> {
        self.display_started_at
    }

    pub fn last_message(&self) -> &str {
        &self.last_message
    }

    pub fn last_outcome(&self) -> Option<Outcome> {
        self.last_outcome
    }

    pub fn last_guess(&self) -> Option<&str> {
        self.last_guess.as_deref()
    }

    /// Advance the state machine by one event. Events that are not valid in
    /// the current phase leave the session untouched.
    pub fn apply(self, event: RoundEvent) -> GameSession {
        match event {
            RoundEvent::Start { target, at } => GameSession {
                phase: Phase::Displaying,
                target: Some(target),
                display_started_at: Some(at),
                last_message: String::new(),
                last_outcome: None,
                last_guess: None,
                ..self
            },
            RoundEvent::Tick { now, exposure } => match (self.phase, self.display_started_at) {
                (Phase::Displaying, Some(started))
                    if now.saturating_duration_since(started) >= exposure =>
                {
                    GameSession {
                        phase: Phase::AwaitingInput,
                        ..self
                    }
                }
                _ => self,
            },
            RoundEvent::Guess(input) => self.resolve(input),
            RoundEvent::Reset => GameSession::default(),
        }
    }

    fn resolve(self, input: String) -> GameSession {
        let target = match (self.phase, self.target) {
            (Phase::AwaitingInput, Some(target)) => target,
            _ => return self,
        };

        let mut chars = input.chars();
        let guess = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => return self,
        };

        let outcome = if guess.to_lowercase().eq(target.to_lowercase()) {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        };

        let (score, last_message) = match outcome {
            Outcome::Correct => (self.score + 1, CORRECT_MESSAGE.to_string()),
            Outcome::Incorrect => (self.score, format!("incorrect, answer was {target}")),
        };

        GameSession {
            score,
            rounds_played: self.rounds_played + 1,
            phase: Phase::Resolved,
            last_message,
            last_outcome: Some(outcome),
            last_guess: Some(input),
            ..self
        }
    }

    /// Instant at which the current display ends
    pub fn hide_deadline(&self, exposure: Duration) -> Option<Instant> {
        match (self.phase, self.display_started_at) {
            (Phase::Displaying, Some(started)) => Some(started + exposure),
            _ => None,
        }
    }
}

/// Owns the session and the glyph source, and exposes the round transitions
pub struct RoundController {
    session: GameSession,
    picker: Box<dyn CharPicker>,
}

impl std::fmt::Debug for RoundController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundController")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl Default for RoundController {
    fn default() -> Self {
        Self::new(Box::new(RandomPicker::new()))
    }
}

impl RoundController {
    pub fn new(picker: Box<dyn CharPicker>) -> Self {
        Self {
            session: GameSession::default(),
            picker,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    fn step(&mut self, event: RoundEvent) {
        let session = std::mem::take(&mut self.session);
        self.session = session.apply(event);
    }

    pub fn start_round(&mut self) {
        self.start_round_at(Instant::now());
    }

    pub fn start_round_at(&mut self, now: Instant) {
        let target = self.picker.pick();
        self.step(RoundEvent::Start { target, at: now });
        tracing::debug!(%target, round = self.session.rounds_played() + 1, "round started");
    }

    /// Hide the glyph once the exposure has elapsed. Returns true if the
    /// phase changed.
    pub fn tick(&mut self, now: Instant, exposure: ExposureDuration) -> bool {
        let before = self.session.phase();
        self.step(RoundEvent::Tick {
            now,
            exposure: exposure.as_duration(),
        });
        let changed = before != self.session.phase();
        if changed {
            tracing::debug!(%exposure, "glyph hidden, awaiting input");
        }
        changed
    }

    /// Returns true if the guess resolved the round.
    pub fn submit_guess(&mut self, input: &str) -> bool {
        let before = self.session.phase();
        self.step(RoundEvent::Guess(input.to_string()));
        let resolved = before == Phase::AwaitingInput && self.session.phase() == Phase::Resolved;
        if resolved {
            tracing::info!(
                outcome = ?self.session.last_outcome(),
                score = self.session.score(),
                rounds = self.session.rounds_played(),
                "round resolved"
            );
        }
        resolved
    }

    pub fn reset_game(&mut self) {
        self.step(RoundEvent::Reset);
    }

    pub fn hide_deadline(&self, exposure: ExposureDuration) -> Option<Instant> {
        self.session.hide_deadline(exposure.as_duration())
    }
}
