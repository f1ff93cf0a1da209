//! Collision and scoring resolution
//!
//! Runs once per tick after every entity has moved. The order of the passes
//! matters: bullets stopped by fences are gone before they can hit anything
//! behind the fence, and a dead player never collects a pickup.

use super::geometry::{circles_overlap, entity_blocked_by_fence};
use super::state::GameSession;
use crate::audio::AudioBackend;

/// What happened during one resolution pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    /// Ids of zombies shot this tick
    pub kills: Vec<u32>,
    /// Missile pickup collected this tick
    pub pickup_collected: bool,
    /// Zombies cleared by the pickup
    pub cleared: usize,
    /// A zombie reached the player
    pub player_died: bool,
}

/// Resolve all collisions for this tick, updating score and entity sets
pub fn resolve_collisions(
    session: &mut GameSession,
    now: f64,
    audio: &mut dyn AudioBackend,
) -> TickOutcome {
    let mut outcome = TickOutcome::default();

    cull_bullets(session);
    resolve_bullet_hits(session, audio, &mut outcome);

    let player = &session.player;
    if session
        .zombies
        .iter()
        .any(|z| circles_overlap(player.pos, player.radius, z.pos, z.radius))
    {
        outcome.player_died = true;
        return outcome;
    }

    collect_missile(session, now, audio, &mut outcome);
    outcome
}

/// Drop bullets that hit a fence or left the canvas
fn cull_bullets(session: &mut GameSession) {
    let bounds = session.bounds();
    let obstacles = &session.obstacles;
    session
        .bullets
        .retain(|b| !b.out_of_bounds(bounds) && !entity_blocked_by_fence(b.radius, b.pos, obstacles));
}

/// Each bullet kills at most one zombie: the first live one it overlaps, in
/// spawn order. A zombie already killed this tick can't be hit again, so a
/// second bullet on the same zombie flies on.
fn resolve_bullet_hits(
    session: &mut GameSession,
    audio: &mut dyn AudioBackend,
    outcome: &mut TickOutcome,
) {
    let mut bullet_spent = vec![false; session.bullets.len()];
    let mut zombie_dead = vec![false; session.zombies.len()];

    for (bi, bullet) in session.bullets.iter().enumerate() {
        let hit = session.zombies.iter().enumerate().find(|(zi, z)| {
            !zombie_dead[*zi] && circles_overlap(bullet.pos, bullet.radius, z.pos, z.radius)
        });
        if let Some((zi, _)) = hit {
            bullet_spent[bi] = true;
            zombie_dead[zi] = true;
        }
    }

    if !zombie_dead.contains(&true) {
        return;
    }

    for (zombie, _) in session
        .zombies
        .iter_mut()
        .zip(&zombie_dead)
        .filter(|(_, dead)| **dead)
    {
        zombie.silence(audio);
        outcome.kills.push(zombie.id);
        session.score += session.tuning.zombie_kill_score;
        session.zombie_spawn_interval = session
            .tuning
            .tightened_interval(session.zombie_spawn_interval);
    }

    let mut spent = bullet_spent.iter();
    session.bullets.retain(|_| !spent.next().copied().unwrap_or(false));
    let mut dead = zombie_dead.iter();
    session.zombies.retain(|_| !dead.next().copied().unwrap_or(false));
}

/// Player touches the active missile: score it and wipe out every zombie
fn collect_missile(
    session: &mut GameSession,
    now: f64,
    audio: &mut dyn AudioBackend,
    outcome: &mut TickOutcome,
) {
    let missile = &session.missile;
    let player = &session.player;
    if !missile.active || !circles_overlap(player.pos, player.radius, missile.pos, missile.radius) {
        return;
    }

    session.missile.active = false;
    session.missile.last_spawn_time = now;
    session.score += session.tuning.missile_pickup_score;

    session.release_audio(audio);
    outcome.cleared = session.zombies.len();
    session.zombies.clear();
    outcome.pickup_collected = true;

    log::info!("Missile collected, cleared {} zombies", outcome.cleared);
}
