//! 2D canvas presenter
//!
//! Draws snapshots with `CanvasRenderingContext2d` and toggles the DOM
//! overlays (`#paused`, `#game-over`) the page provides.

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement};

use super::snapshot::{CircleSprite, FrameSnapshot, PlayerSprite};
use super::Presenter;

const BARREL_COLOR: &str = "black";
const BARREL_WIDTH: f64 = 4.0;
const HUD_COLOR: &str = "white";
const HUD_FONT: &str = "18px sans-serif";

pub struct CanvasPresenter {
    ctx: CanvasRenderingContext2d,
    document: Document,
}

impl CanvasPresenter {
    /// Wrap the canvas' 2D context. `None` if the browser refuses one.
    pub fn new(canvas: &HtmlCanvasElement, document: Document) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { ctx, document })
    }

    fn circle(&self, sprite: &CircleSprite) {
        self.ctx.set_fill_style_str(sprite.color);
        self.ctx.begin_path();
        let _ = self.ctx.arc(
            sprite.pos.x as f64,
            sprite.pos.y as f64,
            sprite.radius as f64,
            0.0,
            TAU,
        );
        self.ctx.fill();
    }

    fn player(&self, player: &PlayerSprite) {
        self.circle(&player.body);

        let end = player.barrel_end();
        self.ctx.set_stroke_style_str(BARREL_COLOR);
        self.ctx.set_line_width(BARREL_WIDTH);
        self.ctx.begin_path();
        self.ctx
            .move_to(player.body.pos.x as f64, player.body.pos.y as f64);
        self.ctx.line_to(end.x as f64, end.y as f64);
        self.ctx.stroke();
        self.ctx.set_line_width(1.0);
    }

    fn hud(&self, frame: &FrameSnapshot) {
        self.ctx.set_fill_style_str(HUD_COLOR);
        self.ctx.set_font(HUD_FONT);
        let _ = self
            .ctx
            .fill_text(&format!("Score: {}", frame.score), 10.0, 24.0);
        let _ = self
            .ctx
            .fill_text(&format!("Best: {}", frame.best), 10.0, 46.0);

        if let Some(el) = self.document.get_element_by_id("score") {
            el.set_text_content(Some(&frame.score.to_string()));
        }
    }

    fn overlay(&self, id: &str, visible: bool) {
        let Some(el) = self
            .document
            .get_element_by_id(id)
            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };
        let display = if visible { "flex" } else { "none" };
        let _ = el.style().set_property("display", display);
    }
}

impl Presenter for CanvasPresenter {
    fn draw(&mut self, frame: &FrameSnapshot) {
        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, frame.width as f64, frame.height as f64);

        for obstacle in &frame.obstacles {
            let r = obstacle.rect;
            ctx.set_fill_style_str(obstacle.color);
            ctx.fill_rect(r.x as f64, r.y as f64, r.width as f64, r.height as f64);
        }

        if let Some(missile) = &frame.missile {
            self.circle(missile);
        }

        self.player(&frame.player);

        let base_alpha = ctx.global_alpha();
        for zombie in &frame.zombies {
            ctx.set_global_alpha(zombie.alpha() as f64);
            self.circle(&zombie.body);
        }
        ctx.set_global_alpha(base_alpha);

        for bullet in &frame.bullets {
            self.circle(bullet);
        }

        self.hud(frame);
    }

    fn show_paused(&mut self, paused: bool) {
        self.overlay("paused", paused);
    }

    fn show_game_over(&mut self, score: u64, best: u64) {
        if let Some(el) = self.document.get_element_by_id("final-score") {
            el.set_text_content(Some(&score.to_string()));
        }
        if let Some(el) = self.document.get_element_by_id("best-score") {
            el.set_text_content(Some(&best.to_string()));
        }
        self.overlay("game-over", true);
    }

    fn hide_game_over(&mut self) {
        self.overlay("game-over", false);
    }
}
