//! Rendering module
//!
//! The game hands the presenter a [`FrameSnapshot`] after each tick; the
//! browser build draws it on a 2D canvas and drives the DOM overlays.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod snapshot;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasPresenter;
pub use snapshot::{CircleSprite, FrameSnapshot, PlayerSprite, RectSprite, ZombieSprite};

/// Output side of the game
pub trait Presenter {
    /// Clear and draw one frame
    fn draw(&mut self, frame: &FrameSnapshot);
    fn show_paused(&mut self, paused: bool);
    /// End-of-run summary
    fn show_game_over(&mut self, score: u64, best: u64);
    fn hide_game_over(&mut self);
}

/// Presenter that draws nothing (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn draw(&mut self, _frame: &FrameSnapshot) {}
    fn show_paused(&mut self, _paused: bool) {}
    fn show_game_over(&mut self, _score: u64, _best: u64) {}
    fn hide_game_over(&mut self) {}
}
