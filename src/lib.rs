//! Fence & Fang - A top-down zombie survival shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions)
//! - `game`: Running/Paused/GameOver state machine and frame scheduling
//! - `renderer`: Frame snapshots and the canvas presenter
//! - `audio`: Sound playback collaborator
//! - `platform`: Browser/native platform abstraction
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod game;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use highscores::{HighScoreStore, LocalHighScoreStore};
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Circle hits register while the edge gap is below this (generous on purpose)
    pub const COLLISION_EPSILON: f32 = 1.0;

    /// Zombie opacity while its center is inside a bush
    pub const BUSH_ALPHA: f32 = 0.3;

    /// Zombie groan volume cap
    pub const MAX_ZOMBIE_VOLUME: f32 = 0.3;
    /// Zombies further than this are silent
    pub const MAX_HEARING_DISTANCE: f32 = 400.0;
    /// Zombies closer than this play at full volume
    pub const MIN_DISTANCE_FOR_MAX_VOL: f32 = 50.0;
    /// Volume ramp time (seconds)
    pub const VOLUME_RAMP_SECS: f64 = 0.1;
    /// Gunshot volume
    pub const SHOT_VOLUME: f32 = 0.4;

    /// Colors (CSS)
    pub const PLAYER_COLOR: &str = "blue";
    pub const BULLET_COLOR: &str = "yellow";
    pub const ZOMBIE_COLOR: &str = "green";
    pub const MISSILE_COLOR: &str = "red";
    pub const FENCE_COLOR: &str = "#8B4513";
    pub const BUSH_COLOR: &str = "#228B22";
}

/// Bearing (radians) from `from` toward `to`
#[inline]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Unit vector for an angle
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Groan volume for a zombie at `distance` from the player
///
/// Full volume up to `MIN_DISTANCE_FOR_MAX_VOL`, falling linearly to silence
/// at `MAX_HEARING_DISTANCE`.
pub fn zombie_volume(distance: f32) -> f32 {
    use consts::*;
    if distance >= MAX_HEARING_DISTANCE {
        return 0.0;
    }
    let falloff = (distance - MIN_DISTANCE_FOR_MAX_VOL).max(0.0)
        / (MAX_HEARING_DISTANCE - MIN_DISTANCE_FOR_MAX_VOL);
    (MAX_ZOMBIE_VOLUME * (1.0 - falloff)).clamp(0.0, MAX_ZOMBIE_VOLUME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_bearing() {
        let origin = Vec2::new(400.0, 300.0);
        assert!((bearing(origin, Vec2::new(500.0, 300.0))).abs() < 1e-6);
        assert!((bearing(origin, Vec2::new(400.0, 200.0)) + FRAC_PI_2).abs() < 1e-6);
        assert!((bearing(origin, Vec2::new(300.0, 300.0)).abs() - PI).abs() < 1e-6);
    }

    #[test]
    fn test_zombie_volume_falloff() {
        assert_eq!(zombie_volume(0.0), consts::MAX_ZOMBIE_VOLUME);
        assert_eq!(zombie_volume(50.0), consts::MAX_ZOMBIE_VOLUME);
        assert!((zombie_volume(225.0) - 0.15).abs() < 1e-5);
        assert_eq!(zombie_volume(400.0), 0.0);
        assert_eq!(zombie_volume(1000.0), 0.0);
    }
}
