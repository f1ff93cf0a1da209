//! Time-gated spawning of zombies and the missile pickup
//!
//! Both spawners reject positions that overlap a fence and give up quietly
//! after a bounded number of attempts. Their timers advance either way, so a
//! crowded map can never turn into a retry storm.

use glam::Vec2;
use rand::Rng;

use super::geometry::entity_blocked_by_fence;
use super::obstacles::Obstacle;
use super::state::{GameSession, Zombie, sample_range};
use crate::audio::{AudioBackend, SoundId};

/// Spawn a zombie if the spawn interval has elapsed. Returns its id.
pub fn maybe_spawn_zombie(
    session: &mut GameSession,
    now: f64,
    audio: &mut dyn AudioBackend,
) -> Option<u32> {
    if now - session.last_zombie_spawn <= session.zombie_spawn_interval {
        return None;
    }
    session.last_zombie_spawn = now;
    spawn_zombie(session, audio)
}

/// Spawn one zombie just outside a random canvas edge
pub fn spawn_zombie(session: &mut GameSession, audio: &mut dyn AudioBackend) -> Option<u32> {
    let id = session.next_entity_id();
    let bounds = session.bounds();
    let mut zombie = Zombie::spawn(id, Vec2::ZERO, &session.tuning, &mut session.rng);

    let Some(pos) = find_clear_position(
        &mut session.rng,
        &session.obstacles,
        zombie.radius,
        session.tuning.spawn_attempts,
        |rng| edge_position(rng, bounds, zombie.radius),
    ) else {
        log::debug!("No fence-free edge position for zombie, skipping spawn");
        return None;
    };
    zombie.pos = pos;

    // Starts silent; volume follows distance on the next update
    zombie.sound = audio.play(SoundId::ZombieGroan, 0.0, true);
    session.zombies.push(zombie);
    Some(id)
}

/// Spawn the missile pickup if it is inactive and its cooldown has elapsed
///
/// Returns true if the pickup became active.
pub fn maybe_spawn_missile(session: &mut GameSession, now: f64) -> bool {
    let missile = &session.missile;
    if missile.active || now - missile.last_spawn_time < session.tuning.missile_cooldown {
        return false;
    }
    session.missile.last_spawn_time = now;

    let bounds = session.bounds();
    let margin = session.tuning.missile_margin;
    let radius = session.missile.radius;

    match find_clear_position(
        &mut session.rng,
        &session.obstacles,
        radius,
        session.tuning.spawn_attempts,
        |rng| {
            Vec2::new(
                sample_range(rng, margin, bounds.x - margin),
                sample_range(rng, margin, bounds.y - margin),
            )
        },
    ) {
        Some(pos) => {
            session.missile.pos = pos;
            session.missile.active = true;
            log::info!("Missile pickup spawned at ({:.0}, {:.0})", pos.x, pos.y);
            true
        }
        None => {
            log::debug!("No fence-free position for missile, retrying after cooldown");
            false
        }
    }
}

/// A point just beyond one of the four canvas edges
fn edge_position(rng: &mut impl Rng, bounds: Vec2, radius: f32) -> Vec2 {
    if rng.random_bool(0.5) {
        // Top or bottom
        let x = sample_range(rng, 0.0, bounds.x);
        let y = if rng.random_bool(0.5) {
            -radius
        } else {
            bounds.y + radius
        };
        Vec2::new(x, y)
    } else {
        // Left or right
        let x = if rng.random_bool(0.5) {
            -radius
        } else {
            bounds.x + radius
        };
        let y = sample_range(rng, 0.0, bounds.y);
        Vec2::new(x, y)
    }
}

/// Draw candidates until one is clear of fences or attempts run out
fn find_clear_position<R: Rng>(
    rng: &mut R,
    obstacles: &[Obstacle],
    radius: f32,
    attempts: u32,
    mut candidate: impl FnMut(&mut R) -> Vec2,
) -> Option<Vec2> {
    (0..attempts)
        .map(|_| candidate(&mut *rng))
        .find(|&pos| !entity_blocked_by_fence(radius, pos, obstacles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::{AudioCall, RecordingAudio};
    use crate::sim::geometry::Rect;
    use crate::tuning::Tuning;

    fn session() -> GameSession {
        GameSession::new(Tuning::default(), 42, 0.0)
    }

    fn on_edge(pos: Vec2, radius: f32) -> bool {
        (pos.x + radius).abs() < 1e-3
            || (pos.x - 800.0 - radius).abs() < 1e-3
            || (pos.y + radius).abs() < 1e-3
            || (pos.y - 600.0 - radius).abs() < 1e-3
    }

    #[test]
    fn test_zombie_waits_for_interval() {
        let mut s = session();
        let mut audio = RecordingAudio::default();
        assert!(maybe_spawn_zombie(&mut s, 1500.0, &mut audio).is_none());
        assert!(s.zombies.is_empty());
        assert!(maybe_spawn_zombie(&mut s, 1501.0, &mut audio).is_some());
        assert_eq!(s.zombies.len(), 1);
        assert_eq!(s.last_zombie_spawn, 1501.0);
    }

    #[test]
    fn test_spawned_zombie_on_edge_and_clear_of_fences() {
        let mut s = session();
        let mut audio = RecordingAudio::default();
        for _ in 0..100 {
            spawn_zombie(&mut s, &mut audio);
        }
        assert_eq!(s.zombies.len(), 100);
        for z in &s.zombies {
            assert!(on_edge(z.pos, z.radius), "zombie at {:?}", z.pos);
            assert!(!entity_blocked_by_fence(z.radius, z.pos, &s.obstacles));
        }
    }

    #[test]
    fn test_spawned_zombie_gets_looping_groan() {
        let mut s = session();
        let mut audio = RecordingAudio::default();
        spawn_zombie(&mut s, &mut audio);
        assert_eq!(
            audio.calls,
            vec![AudioCall::Play(SoundId::ZombieGroan, true)]
        );
        assert!(s.zombies[0].sound.is_some());
    }

    #[test]
    fn test_blocked_map_skips_zombie_but_advances_timer() {
        let mut s = session();
        // One fence covering the canvas and its surroundings
        s.obstacles = vec![Obstacle::Fence(Rect::new(-100.0, -100.0, 1000.0, 800.0))];
        let mut audio = RecordingAudio::default();
        assert!(maybe_spawn_zombie(&mut s, 2000.0, &mut audio).is_none());
        assert!(s.zombies.is_empty());
        assert_eq!(s.last_zombie_spawn, 2000.0);
        assert!(audio.calls.is_empty());
    }

    #[test]
    fn test_missile_cooldown() {
        let mut s = session();
        assert!(!maybe_spawn_missile(&mut s, 59_999.0));
        assert!(!s.missile.active);
        assert!(maybe_spawn_missile(&mut s, 60_000.0));
        assert!(s.missile.active);
        let pos = s.missile.pos;
        assert!(pos.x >= 50.0 && pos.x < 750.0);
        assert!(pos.y >= 50.0 && pos.y < 550.0);
        assert!(!entity_blocked_by_fence(s.missile.radius, pos, &s.obstacles));
    }

    #[test]
    fn test_active_missile_never_respawns() {
        let mut s = session();
        assert!(maybe_spawn_missile(&mut s, 60_000.0));
        let pos = s.missile.pos;
        assert!(!maybe_spawn_missile(&mut s, 200_000.0));
        assert_eq!(s.missile.pos, pos);
        assert_eq!(s.missile.last_spawn_time, 60_000.0);
    }

    #[test]
    fn test_blocked_missile_resets_cooldown() {
        let mut s = session();
        s.obstacles = vec![Obstacle::Fence(Rect::new(0.0, 0.0, 800.0, 600.0))];
        assert!(!maybe_spawn_missile(&mut s, 60_000.0));
        assert_eq!(s.missile.last_spawn_time, 60_000.0);
        // Not retried on the very next tick
        assert!(!maybe_spawn_missile(&mut s, 60_016.0));
        assert_eq!(s.missile.last_spawn_time, 60_000.0);
    }
}
