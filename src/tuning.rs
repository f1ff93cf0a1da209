//! Data-driven game balance
//!
//! Every number a designer might want to tweak lives here. Partial JSON is
//! accepted; missing fields keep their defaults.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub canvas_width: f32,
    pub canvas_height: f32,

    // === Player ===
    pub player_radius: f32,
    /// Units per tick
    pub player_speed: f32,
    /// Attempts to find a fence-free start before falling back to center
    pub player_placement_attempts: u32,

    // === Bullets ===
    pub bullet_radius: f32,
    /// Units per tick
    pub bullet_speed: f32,
    /// Muzzle distance from player center, in player radii
    pub muzzle_offset: f32,

    // === Zombies ===
    pub zombie_radius_min: f32,
    pub zombie_radius_max: f32,
    pub zombie_speed_min: f32,
    pub zombie_speed_max: f32,
    /// Steering refresh interval range (ms)
    pub zombie_angle_interval_min: f64,
    pub zombie_angle_interval_max: f64,
    /// Max random deviation from the direct bearing (radians)
    pub zombie_max_angle_deviation: f32,
    /// Per-tick chance to move at all
    pub zombie_move_chance: f64,

    // === Spawning ===
    /// Initial zombie spawn interval (ms)
    pub zombie_spawn_interval: f64,
    /// Interval multiplier per kill
    pub zombie_spawn_decay: f64,
    /// Interval floor (ms)
    pub zombie_spawn_floor: f64,
    pub spawn_attempts: u32,

    // === Missile pickup ===
    pub missile_radius: f32,
    /// Cooldown from last spawn or pickup (ms)
    pub missile_cooldown: f64,
    /// Keep-out margin from the canvas edge
    pub missile_margin: f32,

    // === Scoring ===
    pub zombie_kill_score: u64,
    pub missile_pickup_score: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 600.0,

            player_radius: 15.0,
            player_speed: 3.0,
            player_placement_attempts: 10,

            bullet_radius: 5.0,
            bullet_speed: 5.0,
            muzzle_offset: 1.5,

            zombie_radius_min: 10.0,
            zombie_radius_max: 20.0,
            zombie_speed_min: 0.5,
            zombie_speed_max: 1.5,
            zombie_angle_interval_min: 300.0,
            zombie_angle_interval_max: 500.0,
            zombie_max_angle_deviation: std::f32::consts::PI / 12.0,
            zombie_move_chance: 0.98,

            zombie_spawn_interval: 1500.0,
            zombie_spawn_decay: 0.995,
            zombie_spawn_floor: 250.0,
            spawn_attempts: 50,

            missile_radius: 12.0,
            missile_cooldown: 60_000.0,
            missile_margin: 50.0,

            zombie_kill_score: 10,
            missile_pickup_score: 100,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON
    ///
    /// Values that would leave the simulation without a valid range to sample
    /// from are rejected like a syntax error.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning
            .validate()
            .map_err(<serde_json::Error as serde::de::Error>::custom)?;
        Ok(tuning)
    }

    /// Check ranges and sizes the simulation samples from
    pub fn validate(&self) -> Result<(), String> {
        fn range<T: PartialOrd + Display>(name: &str, min: T, max: T) -> Result<(), String> {
            if min < max {
                Ok(())
            } else {
                Err(format!("{name}: min {min} must be below max {max}"))
            }
        }

        range("zombie_radius", self.zombie_radius_min, self.zombie_radius_max)?;
        range("zombie_speed", self.zombie_speed_min, self.zombie_speed_max)?;
        range(
            "zombie_angle_interval",
            self.zombie_angle_interval_min,
            self.zombie_angle_interval_max,
        )?;

        if self.zombie_radius_min <= 0.0 || self.player_radius <= 0.0 {
            return Err("radii must be positive".to_string());
        }
        if self.zombie_max_angle_deviation < 0.0 {
            return Err("zombie_max_angle_deviation must not be negative".to_string());
        }
        if self.missile_margin < 0.0 {
            return Err("missile_margin must not be negative".to_string());
        }

        let min_side = 2.0 * self.missile_margin.max(self.player_radius);
        if self.canvas_width <= min_side || self.canvas_height <= min_side {
            return Err(format!(
                "canvas {}x{} must exceed {min_side} on both sides",
                self.canvas_width, self.canvas_height
            ));
        }
        if self.zombie_spawn_decay <= 0.0 || self.zombie_spawn_decay > 1.0 {
            return Err("zombie_spawn_decay must be in (0, 1]".to_string());
        }
        Ok(())
    }

    /// Next zombie spawn interval after a kill
    pub fn tightened_interval(&self, interval: f64) -> f64 {
        (interval * self.zombie_spawn_decay).max(self.zombie_spawn_floor)
    }
}
