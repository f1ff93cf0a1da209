//! Static obstacle field
//!
//! Fences block movement for every entity. Bushes are purely visual: zombies
//! standing in one are drawn faded.

use serde::{Deserialize, Serialize};

use super::geometry::Rect;

/// A static map obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Obstacle {
    /// Blocks player, zombies and bullets
    Fence(Rect),
    /// Conceals zombies, never blocks
    Bush(Rect),
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        match *self {
            Obstacle::Fence(rect) | Obstacle::Bush(rect) => rect,
        }
    }

    pub fn is_fence(&self) -> bool {
        matches!(self, Obstacle::Fence(_))
    }
}

/// Layout is authored against an 800x600 field and scaled to the real canvas
const REFERENCE_WIDTH: f32 = 800.0;
const REFERENCE_HEIGHT: f32 = 600.0;

#[derive(Clone, Copy)]
enum Kind {
    Fence,
    Bush,
}

/// (kind, x, y, width, height) in reference units
const LAYOUT: [(Kind, f32, f32, f32, f32); 9] = [
    // Fences: two long bars, two vertical posts guarding the top/bottom lanes,
    // and a short bar left of center
    (Kind::Fence, 100.0, 150.0, 150.0, 20.0),
    (Kind::Fence, 550.0, 430.0, 150.0, 20.0),
    (Kind::Fence, 390.0, 50.0, 20.0, 100.0),
    (Kind::Fence, 390.0, 450.0, 20.0, 100.0),
    (Kind::Fence, 200.0, 290.0, 100.0, 20.0),
    // Bushes
    (Kind::Bush, 200.0, 500.0, 100.0, 80.0),
    (Kind::Bush, 500.0, 80.0, 120.0, 60.0),
    (Kind::Bush, 50.0, 260.0, 80.0, 80.0),
    (Kind::Bush, 650.0, 250.0, 100.0, 100.0),
];

/// Build the obstacle field for a canvas: 5 fences followed by 4 bushes
pub fn build_obstacles(canvas_width: f32, canvas_height: f32) -> Vec<Obstacle> {
    let sx = canvas_width / REFERENCE_WIDTH;
    let sy = canvas_height / REFERENCE_HEIGHT;

    let obstacles: Vec<Obstacle> = LAYOUT
        .iter()
        .map(|&(kind, x, y, w, h)| {
            let rect = Rect::new(x * sx, y * sy, w * sx, h * sy);
            match kind {
                Kind::Fence => Obstacle::Fence(rect),
                Kind::Bush => Obstacle::Bush(rect),
            }
        })
        .collect();

    log::debug!(
        "Built {} obstacles for {}x{} canvas",
        obstacles.len(),
        canvas_width,
        canvas_height
    );
    obstacles
}
