//! Read-only view of a session, captured after the tick

use glam::Vec2;

use crate::consts::*;
use crate::direction;
use crate::sim::{GameSession, Obstacle, Rect, point_in_bush};

/// Barrel length as a multiple of the player radius
pub const BARREL_LENGTH: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectSprite {
    pub rect: Rect,
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleSprite {
    pub pos: Vec2,
    pub radius: f32,
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSprite {
    pub body: CircleSprite,
    /// Facing, radians
    pub angle: f32,
}

impl PlayerSprite {
    pub fn barrel_end(&self) -> Vec2 {
        self.body.pos + direction(self.angle) * self.body.radius * BARREL_LENGTH
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZombieSprite {
    pub body: CircleSprite,
    /// Center inside a bush: drawn faded
    pub concealed: bool,
}

impl ZombieSprite {
    pub fn alpha(&self) -> f32 {
        if self.concealed { BUSH_ALPHA } else { 1.0 }
    }
}

/// Everything the presenter needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub width: f32,
    pub height: f32,
    pub obstacles: Vec<RectSprite>,
    pub missile: Option<CircleSprite>,
    pub player: PlayerSprite,
    pub zombies: Vec<ZombieSprite>,
    pub bullets: Vec<CircleSprite>,
    pub score: u64,
    pub best: u64,
}

impl FrameSnapshot {
    pub fn capture(session: &GameSession, best: u64) -> Self {
        let obstacles = session
            .obstacles
            .iter()
            .map(|o| RectSprite {
                rect: o.rect(),
                color: match o {
                    Obstacle::Fence(_) => FENCE_COLOR,
                    Obstacle::Bush(_) => BUSH_COLOR,
                },
            })
            .collect();

        let missile = session.missile.active.then(|| CircleSprite {
            pos: session.missile.pos,
            radius: session.missile.radius,
            color: MISSILE_COLOR,
        });

        let player = PlayerSprite {
            body: CircleSprite {
                pos: session.player.pos,
                radius: session.player.radius,
                color: PLAYER_COLOR,
            },
            angle: session.player.angle,
        };

        let zombies = session
            .zombies
            .iter()
            .map(|z| ZombieSprite {
                body: CircleSprite {
                    pos: z.pos,
                    radius: z.radius,
                    color: ZOMBIE_COLOR,
                },
                concealed: point_in_bush(z.pos, &session.obstacles),
            })
            .collect();

        let bullets = session
            .bullets
            .iter()
            .map(|b| CircleSprite {
                pos: b.pos,
                radius: b.radius,
                color: BULLET_COLOR,
            })
            .collect();

        let bounds = session.bounds();
        Self {
            width: bounds.x,
            height: bounds.y,
            obstacles,
            missile,
            player,
            zombies,
            bullets,
            score: session.score,
            best: best.max(session.score),
        }
    }
}
