//! Fence & Fang entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, Window};

    use fence_and_fang::audio::WebAudio;
    use fence_and_fang::platform::{FrameHost, FrameToken, Key, LocalStorage};
    use fence_and_fang::renderer::CanvasPresenter;
    use fence_and_fang::{Game, LocalHighScoreStore, Settings, Tuning};

    type WebGame = Game<WebAudio, LocalHighScoreStore<LocalStorage>, WebFrameHost, CanvasPresenter>;
    /// Filled once the game exists; frame and input callbacks go through it
    type GameSlot = Rc<RefCell<Option<WebGame>>>;

    /// `requestAnimationFrame` host; every request reuses one callback
    struct WebFrameHost {
        window: Window,
        callback: Closure<dyn FnMut(f64)>,
    }

    impl FrameHost for WebFrameHost {
        fn request_frame(&mut self) -> FrameToken {
            match self
                .window
                .request_animation_frame(self.callback.as_ref().unchecked_ref())
            {
                Ok(id) => FrameToken(id),
                Err(e) => {
                    log::error!("requestAnimationFrame failed: {e:?}");
                    FrameToken(0)
                }
            }
        }

        fn cancel_frame(&mut self, token: FrameToken) {
            let _ = self.window.cancel_animation_frame(token.0);
        }

        fn now(&self) -> f64 {
            self.window
                .performance()
                .map(|p| p.now())
                .unwrap_or_else(js_sys::Date::now)
        }
    }

    /// Optional balance overrides from `<script id="tuning" type="application/json">`
    fn load_tuning(document: &Document) -> Tuning {
        let Some(json) = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
        else {
            return Tuning::default();
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Bad tuning JSON, using defaults: {e}");
                Tuning::default()
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Fence & Fang starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        let tuning = load_tuning(&document);
        canvas.set_width(tuning.canvas_width as u32);
        canvas.set_height(tuning.canvas_height as u32);

        let Some(presenter) = CanvasPresenter::new(&canvas, document.clone()) else {
            log::error!("Canvas 2D context unavailable");
            return;
        };

        let settings = Settings::load_or_init(&mut LocalStorage);
        let audio = WebAudio::new(settings.effective_volume());
        let scores = LocalHighScoreStore::new(LocalStorage);

        let slot: GameSlot = Rc::new(RefCell::new(None));
        let callback = {
            let slot = slot.clone();
            Closure::<dyn FnMut(f64)>::new(move |time: f64| {
                if let Some(game) = slot.borrow_mut().as_mut() {
                    game.on_frame(time);
                }
            })
        };
        let frames = WebFrameHost {
            window: window.clone(),
            callback,
        };

        // The first frame fires asynchronously, after the slot is filled
        let seed = js_sys::Date::now() as u64;
        let game = Game::new(tuning, seed, audio, scores, frames, presenter);
        *slot.borrow_mut() = Some(game);
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&window, &canvas, slot.clone());
        setup_restart_button(&document, slot.clone());
        if settings.pause_on_blur {
            setup_auto_pause(&window, &document, slot);
        }

        log::info!("Fence & Fang running!");
    }

    fn setup_input_handlers(window: &Window, canvas: &HtmlCanvasElement, slot: GameSlot) {
        // Keyboard down
        {
            let slot = slot.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if Key::from_dom(&key) != Key::Other {
                    event.prevent_default();
                }
                if let Some(g) = slot.borrow_mut().as_mut() {
                    g.audio.unlock();
                    g.key_down(&key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard up
        {
            let slot = slot.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(g) = slot.borrow_mut().as_mut() {
                    g.key_up(&event.key());
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move - canvas coordinates, corrected for CSS scaling
        {
            let slot = slot.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                if rect.width() <= 0.0 || rect.height() <= 0.0 {
                    return;
                }
                let sx = canvas_clone.width() as f64 / rect.width();
                let sy = canvas_clone.height() as f64 / rect.height();
                let x = (event.client_x() as f64 - rect.left()) * sx;
                let y = (event.client_y() as f64 - rect.top()) * sy;
                if let Some(g) = slot.borrow_mut().as_mut() {
                    g.pointer_move(x as f32, y as f32);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click to fire
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                if let Some(g) = slot.borrow_mut().as_mut() {
                    g.audio.unlock();
                    g.click();
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(document: &Document, slot: GameSlot) {
        if let Some(btn) = document.get_element_by_id("restart-button") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                if let Some(g) = slot.borrow_mut().as_mut() {
                    g.audio.unlock();
                    g.restart();
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(window: &Window, document: &Document, slot: GameSlot) {
        // Visibility change (tab switch, minimize)
        {
            let slot = slot.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    if let Some(g) = slot.borrow_mut().as_mut() {
                        g.pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                if let Some(g) = slot.borrow_mut().as_mut() {
                    g.pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Fence & Fang (native) starting...");
    log::info!("Native mode runs a headless demo - serve the wasm build for the real game");

    let tuning = match std::env::args().nth(1) {
        Some(path) => load_tuning_file(&path),
        None => fence_and_fang::Tuning::default(),
    };
    demo::run(tuning, 7);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning_file(path: &str) -> fence_and_fang::Tuning {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| fence_and_fang::Tuning::from_json(&json).map_err(|e| e.to_string()));
    match parsed {
        Ok(tuning) => {
            log::info!("Loaded tuning from {path}");
            tuning
        }
        Err(e) => {
            log::warn!("Could not load tuning from {path}, using defaults: {e}");
            fence_and_fang::Tuning::default()
        }
    }
}

/// Scripted headless session
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use fence_and_fang::audio::NullAudio;
    use fence_and_fang::platform::{FrameHost, ManualFrameHost, MemoryStore};
    use fence_and_fang::renderer::NullPresenter;
    use fence_and_fang::sim::GamePhase;
    use fence_and_fang::{Game, LocalHighScoreStore, Tuning};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Two minutes of game time
    const MAX_FRAMES: usize = 60 * 120;
    const FIRE_EVERY: usize = 12;

    pub fn run(tuning: Tuning, seed: u64) {
        let mut game = Game::new(
            tuning,
            seed,
            NullAudio,
            LocalHighScoreStore::new(MemoryStore::new()),
            ManualFrameHost::new(0.0),
            NullPresenter,
        );

        let mut kills = 0;
        let mut frame = 0;
        while frame < MAX_FRAMES {
            frame += 1;
            game.frames.advance(FRAME_MS);
            if game.frames.take_due().is_none() {
                break;
            }

            // Aim at the closest zombie and fire on a fixed cadence
            let player = game.session.player.pos;
            let nearest = game
                .session
                .zombies
                .iter()
                .map(|z| z.pos)
                .min_by(|a, b| a.distance(player).total_cmp(&b.distance(player)));
            if let Some(target) = nearest {
                game.pointer_move(target.x, target.y);
                if frame % FIRE_EVERY == 0 {
                    game.click();
                }
            }

            let now = game.frames.now();
            if let Some(outcome) = game.on_frame(now) {
                kills += outcome.kills.len();
                if outcome.pickup_collected {
                    log::info!("Missile collected at {:.1}s", now / 1000.0);
                }
            }
            if game.phase() == GamePhase::GameOver {
                break;
            }
        }

        log::info!(
            "Demo finished after {:.1}s: score {}, kills {}, {}",
            frame as f64 * FRAME_MS / 1000.0,
            game.session.score,
            kills,
            if game.phase() == GamePhase::GameOver {
                "player died"
            } else {
                "player survived"
            }
        );
    }

}
