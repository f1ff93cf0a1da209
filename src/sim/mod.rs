//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time comes in as a timestamp argument
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies; audio only through a trait

pub mod geometry;
pub mod obstacles;
pub mod resolve;
pub mod spawner;
pub mod state;
pub mod tick;

pub use geometry::{
    Rect, circles_overlap, entity_blocked_by_fence, point_in_bush, rects_overlap,
    resolve_fenced_move,
};
pub use obstacles::{Obstacle, build_obstacles};
pub use resolve::{TickOutcome, resolve_collisions};
pub use spawner::{maybe_spawn_missile, maybe_spawn_zombie};
pub use state::{Bullet, GamePhase, GameSession, MissilePickup, Player, Zombie};
pub use tick::{TickInput, tick};
