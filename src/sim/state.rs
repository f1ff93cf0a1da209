//! Game session and entity types
//!
//! Everything one run of the game mutates lives in [`GameSession`]. It is
//! rebuilt from scratch on every (re)start.

use glam::Vec2;
use rand::distr::uniform::SampleUniform;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::{entity_blocked_by_fence, resolve_fenced_move};
use super::obstacles::{Obstacle, build_obstacles};
use crate::audio::{AudioBackend, AudioHandle};
use crate::consts::VOLUME_RAMP_SECS;
use crate::tuning::Tuning;
use crate::{bearing, direction, zombie_volume};

/// Uniform in `[min, max)`, or `min` when the range is empty
pub(crate) fn sample_range<T, R>(rng: &mut R, min: T, max: T) -> T
where
    T: SampleUniform + PartialOrd + Copy,
    R: Rng + ?Sized,
{
    if min < max { rng.random_range(min..max) } else { min }
}

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Simulation ticking
    Running,
    /// Simulation frozen, waiting for unpause
    Paused,
    /// Run ended, waiting for restart
    GameOver,
}

/// The player's avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// Units per tick
    pub speed: f32,
    /// Facing (radians), recomputed from the pointer every tick
    pub angle: f32,
}

impl Player {
    pub fn new(pos: Vec2, radius: f32, speed: f32) -> Self {
        Self {
            pos,
            radius,
            speed,
            angle: 0.0,
        }
    }

    /// Aim at the pointer, walk along `movement`, then clamp to the canvas
    ///
    /// `movement` is the raw key axis (-1, 0 or 1 per component); diagonals
    /// are normalized so they are no faster than straight moves.
    pub fn update(&mut self, pointer: Vec2, movement: Vec2, obstacles: &[Obstacle], bounds: Vec2) {
        self.angle = bearing(self.pos, pointer);

        let delta = movement.normalize_or_zero() * self.speed;
        self.pos = resolve_fenced_move(self.pos, delta, self.radius, obstacles);

        let r = Vec2::splat(self.radius);
        self.pos = self.pos.clamp(r, bounds - r);
    }

    /// Where bullets leave the barrel for a given aim
    pub fn muzzle(&self, angle: f32, offset_radii: f32) -> Vec2 {
        self.pos + direction(angle) * self.radius * offset_radii
    }
}

/// A projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    /// Fixed at creation
    pub vel: Vec2,
    pub angle: f32,
}

impl Bullet {
    pub fn update(&mut self) {
        self.pos += self.vel;
    }

    /// Entirely off the canvas
    pub fn out_of_bounds(&self, bounds: Vec2) -> bool {
        self.pos.x + self.radius < 0.0
            || self.pos.x - self.radius > bounds.x
            || self.pos.y + self.radius < 0.0
            || self.pos.y - self.radius > bounds.y
    }
}

/// A pursuing zombie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zombie {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    /// Units per tick
    pub speed: f32,
    /// Heading it currently walks along (may be stale)
    pub target_angle: f32,
    /// Timestamp (ms) of the last heading refresh
    pub last_angle_update: f64,
    /// Per-zombie refresh period (ms), staggered so the herd doesn't turn in unison
    pub angle_update_interval: f64,
    pub max_angle_deviation: f32,
    /// Per-tick chance to move at all
    pub move_chance: f64,
    /// Groan voice, owned by the audio backend
    #[serde(skip)]
    pub sound: Option<AudioHandle>,
}

impl Zombie {
    /// Roll a new zombie's traits
    pub fn spawn(id: u32, pos: Vec2, tuning: &Tuning, rng: &mut impl Rng) -> Self {
        Self {
            id,
            pos,
            radius: sample_range(rng, tuning.zombie_radius_min, tuning.zombie_radius_max),
            speed: sample_range(rng, tuning.zombie_speed_min, tuning.zombie_speed_max),
            target_angle: 0.0,
            last_angle_update: 0.0,
            angle_update_interval: sample_range(
                rng,
                tuning.zombie_angle_interval_min,
                tuning.zombie_angle_interval_max,
            ),
            max_angle_deviation: tuning.zombie_max_angle_deviation,
            move_chance: tuning.zombie_move_chance,
            sound: None,
        }
    }

    /// Shamble toward `target`
    ///
    /// Occasionally hesitates for a tick. The heading is only refreshed every
    /// `angle_update_interval` ms, with a random offset, which makes pursuit
    /// wander instead of homing perfectly.
    pub fn update(
        &mut self,
        target: Vec2,
        now: f64,
        obstacles: &[Obstacle],
        rng: &mut impl Rng,
        audio: &mut dyn AudioBackend,
    ) {
        if rng.random::<f64>() > self.move_chance {
            return;
        }

        if now - self.last_angle_update > self.angle_update_interval {
            let dev = self.max_angle_deviation;
            let offset = if dev > 0.0 { rng.random_range(-dev..=dev) } else { 0.0 };
            self.target_angle = bearing(self.pos, target) + offset;
            self.last_angle_update = now;
        }

        let delta = direction(self.target_angle) * self.speed;
        self.pos = resolve_fenced_move(self.pos, delta, self.radius, obstacles);

        if let Some(handle) = self.sound {
            let volume = zombie_volume(self.pos.distance(target));
            audio.set_volume(handle, volume, VOLUME_RAMP_SECS);
        }
    }

    /// Stop this zombie's groan, if any
    pub fn silence(&mut self, audio: &mut dyn AudioBackend) {
        if let Some(handle) = self.sound.take() {
            audio.stop(handle);
        }
    }
}

/// The single missile power-up slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissilePickup {
    pub pos: Vec2,
    pub radius: f32,
    pub active: bool,
    /// Timestamp (ms) of the last spawn attempt or pickup
    pub last_spawn_time: f64,
}

impl MissilePickup {
    pub fn new(radius: f32, now: f64) -> Self {
        Self {
            pos: Vec2::ZERO,
            radius,
            active: false,
            last_spawn_time: now,
        }
    }
}

/// Everything a single run owns
#[derive(Debug, Clone)]
pub struct GameSession {
    pub tuning: Tuning,
    pub seed: u64,
    pub rng: Pcg32,
    pub player: Player,
    /// Oldest first
    pub bullets: Vec<Bullet>,
    /// Oldest first
    pub zombies: Vec<Zombie>,
    pub obstacles: Vec<Obstacle>,
    pub missile: MissilePickup,
    pub score: u64,
    /// Timestamp (ms) of the last zombie spawn attempt
    pub last_zombie_spawn: f64,
    /// Current zombie spawn interval (ms); only ever shrinks
    pub zombie_spawn_interval: f64,
    next_id: u32,
}

impl GameSession {
    /// Start a fresh run at time `now` (ms)
    pub fn new(tuning: Tuning, seed: u64, now: f64) -> Self {
        let obstacles = build_obstacles(tuning.canvas_width, tuning.canvas_height);
        let start = place_player(&tuning, &obstacles);

        log::info!("New session (seed {seed}), player at ({:.0}, {:.0})", start.x, start.y);

        Self {
            player: Player::new(start, tuning.player_radius, tuning.player_speed),
            bullets: Vec::new(),
            zombies: Vec::new(),
            obstacles,
            missile: MissilePickup::new(tuning.missile_radius, now),
            score: 0,
            last_zombie_spawn: now,
            zombie_spawn_interval: tuning.zombie_spawn_interval,
            rng: Pcg32::seed_from_u64(seed),
            seed,
            tuning,
            next_id: 1,
        }
    }

    /// Canvas size as a vector
    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.tuning.canvas_width, self.tuning.canvas_height)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Fire toward `target` from the muzzle. Returns the bullet id.
    pub fn fire(&mut self, target: Vec2) -> u32 {
        let angle = bearing(self.player.pos, target);
        let id = self.next_entity_id();
        self.bullets.push(Bullet {
            id,
            pos: self.player.muzzle(angle, self.tuning.muzzle_offset),
            radius: self.tuning.bullet_radius,
            vel: direction(angle) * self.tuning.bullet_speed,
            angle,
        });
        id
    }

    /// Push spawn timers forward so time spent paused doesn't count
    pub fn rebase_spawn_timers(&mut self, now: f64) {
        self.last_zombie_spawn = now;
        self.missile.last_spawn_time = now;
    }

    /// Stop every zombie voice. Call before dropping the session.
    pub fn release_audio(&mut self, audio: &mut dyn AudioBackend) {
        for zombie in &mut self.zombies {
            zombie.silence(audio);
        }
    }
}

/// Find a fence-free start near the center
///
/// Steps diagonally from the center; if every attempt collides the player is
/// put at the center anyway so the game always starts.
fn place_player(tuning: &Tuning, obstacles: &[Obstacle]) -> Vec2 {
    let center = Vec2::new(tuning.canvas_width / 2.0, tuning.canvas_height / 2.0);
    let step = Vec2::new(25.0, 10.0);

    let mut candidate = center;
    for _ in 0..tuning.player_placement_attempts {
        if !entity_blocked_by_fence(tuning.player_radius, candidate, obstacles) {
            return candidate;
        }
        log::warn!(
            "Player start ({:.0}, {:.0}) collides with a fence, adjusting",
            candidate.x,
            candidate.y
        );
        candidate += step;
    }

    log::warn!("Could not place player clear of fences, falling back to center");
    center
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::{AudioCall, RecordingAudio};
    use crate::sim::geometry::Rect;

    fn test_zombie(pos: Vec2) -> Zombie {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut zombie = Zombie::spawn(1, pos, &Tuning::default(), &mut rng);
        zombie.move_chance = 1.0;
        zombie.max_angle_deviation = 0.0;
        zombie
    }

    #[test]
    fn test_new_session_defaults() {
        let session = GameSession::new(Tuning::default(), 1, 1000.0);
        assert_eq!(session.score, 0);
        assert!(session.zombies.is_empty());
        assert!(session.bullets.is_empty());
        assert!(!session.missile.active);
        assert_eq!(session.player.pos, Vec2::new(400.0, 300.0));
        assert_eq!(session.zombie_spawn_interval, 1500.0);
        assert_eq!(session.last_zombie_spawn, 1000.0);
        assert_eq!(session.obstacles.len(), 9);
    }

    #[test]
    fn test_player_diagonal_speed_matches_axial() {
        let mut player = Player::new(Vec2::new(100.0, 100.0), 15.0, 3.0);
        player.update(Vec2::ZERO, Vec2::new(1.0, 1.0), &[], Vec2::new(800.0, 600.0));
        let moved = player.pos.distance(Vec2::new(100.0, 100.0));
        assert!((moved - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_player_faces_pointer_while_stationary() {
        let mut player = Player::new(Vec2::new(100.0, 100.0), 15.0, 3.0);
        player.update(Vec2::new(100.0, 200.0), Vec2::ZERO, &[], Vec2::new(800.0, 600.0));
        assert!((player.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(player.pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_player_clamped_to_canvas() {
        let mut player = Player::new(Vec2::new(16.0, 584.0), 15.0, 3.0);
        player.update(Vec2::ZERO, Vec2::new(-1.0, 1.0), &[], Vec2::new(800.0, 600.0));
        assert_eq!(player.pos, Vec2::new(15.0, 585.0));
    }

    #[test]
    fn test_player_stopped_by_fence() {
        let fence = [Obstacle::Fence(Rect::new(120.0, 0.0, 20.0, 600.0))];
        let mut player = Player::new(Vec2::new(104.0, 100.0), 15.0, 3.0);
        player.update(Vec2::ZERO, Vec2::new(1.0, 0.0), &fence, Vec2::new(800.0, 600.0));
        assert_eq!(player.pos.x, 104.0);
    }

    #[test]
    fn test_zombie_traits_within_ranges() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        for id in 0..200 {
            let z = Zombie::spawn(id, Vec2::ZERO, &tuning, &mut rng);
            assert!((10.0..20.0).contains(&z.radius));
            assert!((0.5..1.5).contains(&z.speed));
            assert!((300.0..500.0).contains(&z.angle_update_interval));
        }
    }

    #[test]
    fn test_zombie_keeps_stale_heading_between_refreshes() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut audio = RecordingAudio::default();
        let mut zombie = test_zombie(Vec2::new(100.0, 100.0));
        zombie.angle_update_interval = 400.0;

        // First update refreshes (timestamp 1000 > 0 + 400): heads right
        zombie.update(Vec2::new(500.0, 100.0), 1000.0, &[], &mut rng, &mut audio);
        assert!(zombie.target_angle.abs() < 1e-6);

        // Target jumps below; heading stays stale within the interval
        zombie.update(Vec2::new(100.0, 500.0), 1200.0, &[], &mut rng, &mut audio);
        assert!(zombie.target_angle.abs() < 1e-6);

        // Past the interval it turns
        zombie.update(Vec2::new(100.0, 500.0), 1401.0, &[], &mut rng, &mut audio);
        assert!(zombie.target_angle > 1.0);
    }

    #[test]
    fn test_zombie_heading_deviation_bounded() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut audio = RecordingAudio::default();
        let target = Vec2::new(500.0, 100.0);
        for i in 0..100 {
            let mut zombie = test_zombie(Vec2::new(100.0, 100.0));
            zombie.max_angle_deviation = std::f32::consts::PI / 12.0;
            zombie.update(target, 1000.0 + i as f64, &[], &mut rng, &mut audio);
            assert!(zombie.target_angle.abs() <= std::f32::consts::PI / 12.0 + 1e-6);
        }
    }

    #[test]
    fn test_zombie_hesitation_skips_everything() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut audio = RecordingAudio::default();
        let mut zombie = test_zombie(Vec2::new(100.0, 100.0));
        zombie.move_chance = 0.0;
        zombie.sound = Some(AudioHandle(9));
        zombie.update(Vec2::new(150.0, 100.0), 1000.0, &[], &mut rng, &mut audio);
        assert_eq!(zombie.pos, Vec2::new(100.0, 100.0));
        assert!(audio.calls.is_empty());
    }

    #[test]
    fn test_zombie_volume_follows_distance() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut audio = RecordingAudio::default();
        let mut zombie = test_zombie(Vec2::new(100.0, 100.0));
        zombie.sound = Some(AudioHandle(4));
        zombie.update(Vec2::new(130.0, 100.0), 1000.0, &[], &mut rng, &mut audio);
        assert_eq!(
            audio.calls,
            vec![AudioCall::SetVolume(AudioHandle(4), crate::consts::MAX_ZOMBIE_VOLUME)]
        );
    }

    #[test]
    fn test_fire_spawns_at_muzzle() {
        let mut session = GameSession::new(Tuning::default(), 1, 0.0);
        session.fire(Vec2::new(400.0, 0.0));
        let bullet = &session.bullets[0];
        assert!((bullet.pos - Vec2::new(400.0, 277.5)).length() < 1e-3);
        assert!((bullet.vel - Vec2::new(0.0, -5.0)).length() < 1e-4);
    }

    #[test]
    fn test_bullet_out_of_bounds() {
        let bounds = Vec2::new(800.0, 600.0);
        let mut bullet = Bullet {
            id: 1,
            pos: Vec2::new(-4.0, 300.0),
            radius: 5.0,
            vel: Vec2::ZERO,
            angle: 0.0,
        };
        assert!(!bullet.out_of_bounds(bounds));
        bullet.pos.x = -6.0;
        assert!(bullet.out_of_bounds(bounds));
        bullet.pos = Vec2::new(400.0, 606.0);
        assert!(bullet.out_of_bounds(bounds));
    }

    #[test]
    fn test_release_audio_stops_every_voice() {
        let mut session = GameSession::new(Tuning::default(), 1, 0.0);
        for i in 0..3 {
            let mut zombie = test_zombie(Vec2::new(10.0 * i as f32, 0.0));
            zombie.sound = Some(AudioHandle(i));
            session.zombies.push(zombie);
        }
        let mut audio = RecordingAudio::default();
        session.release_audio(&mut audio);
        assert_eq!(
            audio.stopped(),
            vec![AudioHandle(0), AudioHandle(1), AudioHandle(2)]
        );
        assert!(session.zombies.iter().all(|z| z.sound.is_none()));
    }

    #[test]
    fn test_place_player_falls_back_to_center() {
        let tuning = Tuning::default();
        let wall = [Obstacle::Fence(Rect::new(0.0, 0.0, 800.0, 600.0))];
        assert_eq!(place_player(&tuning, &wall), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_place_player_steps_off_fence() {
        let tuning = Tuning::default();
        let post = [Obstacle::Fence(Rect::new(390.0, 290.0, 20.0, 20.0))];
        let start = place_player(&tuning, &post);
        assert!(!entity_blocked_by_fence(15.0, start, &post));
        assert_ne!(start, Vec2::new(400.0, 300.0));
    }
}
