//! Game controller
//!
//! Owns the session and the Running/Paused/GameOver state machine, turns DOM
//! style input into tick input, and keeps exactly one frame request alive
//! while the game needs frames.

use glam::Vec2;
use rand::Rng;

use crate::audio::{AudioBackend, SoundId};
use crate::consts::SHOT_VOLUME;
use crate::highscores::{HighScoreStore, record_final_score};
use crate::platform::input::{HeldKeys, Key};
use crate::platform::scheduler::{FrameHost, FrameScheduler};
use crate::renderer::{FrameSnapshot, Presenter};
use crate::sim::{GamePhase, GameSession, TickInput, TickOutcome, tick};
use crate::tuning::Tuning;

/// One player's game, wired to its collaborators
pub struct Game<A, S, F, P> {
    pub session: GameSession,
    phase: GamePhase,
    /// Personal best as of the last game over
    best: u64,
    keys: HeldKeys,
    /// Last pointer position, canvas coordinates
    pointer: Vec2,
    scheduler: FrameScheduler,

    pub audio: A,
    pub scores: S,
    pub frames: F,
    pub presenter: P,
}

impl<A, S, F, P> Game<A, S, F, P>
where
    A: AudioBackend,
    S: HighScoreStore,
    F: FrameHost,
    P: Presenter,
{
    /// Start a running game and request the first frame
    pub fn new(tuning: Tuning, seed: u64, audio: A, scores: S, frames: F, presenter: P) -> Self {
        let session = GameSession::new(tuning, seed, frames.now());
        let best = scores.load_high_score();
        let pointer = session.bounds() / 2.0;

        let mut game = Self {
            session,
            phase: GamePhase::Running,
            best,
            keys: HeldKeys::default(),
            pointer,
            scheduler: FrameScheduler::new(),
            audio,
            scores,
            frames,
            presenter,
        };
        game.presenter.hide_game_over();
        game.presenter.show_paused(false);
        game.scheduler.arm(&mut game.frames);
        log::info!("Game started, personal best {best}");
        game
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// A frame request is outstanding
    pub fn is_armed(&self) -> bool {
        self.scheduler.is_armed()
    }

    pub fn key_down(&mut self, key: &str) {
        match Key::from_dom(key) {
            Key::Pause => self.toggle_pause(),
            Key::Other => {}
            movement => {
                if self.phase == GamePhase::Running {
                    self.keys.set(movement, true);
                }
            }
        }
    }

    pub fn key_up(&mut self, key: &str) {
        self.keys.set(Key::from_dom(key), false);
    }

    /// Pointer position in canvas coordinates; tracked in every phase
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.pointer = Vec2::new(x, y);
    }

    /// Fire toward the pointer
    pub fn click(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }
        self.session.fire(self.pointer);
        // Shot is fire-and-forget; no handle to keep
        let _ = self.audio.play(SoundId::Shot, SHOT_VOLUME, false);
    }

    /// Escape: Running <-> Paused. Ignored after game over.
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Running => self.pause(),
            GamePhase::Paused => self.resume(),
            GamePhase::GameOver => {}
        }
    }

    /// Pause a running game (window blur, tab hidden, Escape)
    pub fn pause(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }
        self.phase = GamePhase::Paused;
        self.audio.suspend();
        self.presenter.show_paused(true);
        self.scheduler.arm(&mut self.frames);
        log::info!("Paused");
    }

    pub fn resume(&mut self) {
        if self.phase != GamePhase::Paused {
            return;
        }
        self.phase = GamePhase::Running;
        self.session.rebase_spawn_timers(self.frames.now());
        self.audio.resume();
        self.presenter.show_paused(false);
        self.scheduler.arm(&mut self.frames);
        log::info!("Resumed");
    }

    /// Frame callback. Returns the tick outcome if the simulation ran.
    pub fn on_frame(&mut self, now: f64) -> Option<TickOutcome> {
        self.scheduler.on_fired();

        match self.phase {
            GamePhase::GameOver => None,
            GamePhase::Paused => {
                // Keep the loop alive without simulating
                self.scheduler.arm(&mut self.frames);
                None
            }
            GamePhase::Running => {
                let input = TickInput {
                    pointer: self.pointer,
                    movement: self.keys.axis(),
                };
                let outcome = tick(&mut self.session, &input, now, &mut self.audio);
                self.presenter
                    .draw(&FrameSnapshot::capture(&self.session, self.best));

                if outcome.player_died {
                    self.game_over();
                } else {
                    self.scheduler.arm(&mut self.frames);
                }
                Some(outcome)
            }
        }
    }

    fn game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        self.scheduler.cancel(&mut self.frames);

        let score = self.session.score;
        self.best = record_final_score(&mut self.scores, self.best, score);
        self.audio.suspend();
        self.presenter.show_game_over(score, self.best);
        log::info!("Game over: score {score}, best {}", self.best);
    }

    /// Throw the current run away and start a fresh one
    pub fn restart(&mut self) {
        self.session.release_audio(&mut self.audio);

        let seed = self.session.rng.random::<u64>();
        let tuning = self.session.tuning.clone();
        self.session = GameSession::new(tuning, seed, self.frames.now());

        self.phase = GamePhase::Running;
        self.keys.clear();
        self.audio.resume();
        self.presenter.hide_game_over();
        self.presenter.show_paused(false);
        self.scheduler.arm(&mut self.frames);
        log::info!("Restarted");
    }
}
