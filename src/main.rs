//! Face Bop entry point
//!
//! Browser: wires the DOM to a `GameSession` and drives it from requestAnimationFrame.
//! Native: plays one headless round with a scripted tapper and prints the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlImageElement, PointerEvent};

    use face_bop::audio::WebAudio;
    use face_bop::persistence::LocalStorageBestScore;
    use face_bop::platform::{Viewport, WebViewport, detect_device};
    use face_bop::renderer::{CanvasPainter, FrameView};
    use face_bop::{GameSession, Settings};

    /// Game instance holding the session and the page handles it draws into
    struct Game {
        session: GameSession,
        painter: CanvasPainter,
        viewport: WebViewport,
        /// An animation frame is scheduled
        loop_active: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        last_time: f64,
    }

    impl Game {
        fn render(&mut self) {
            self.painter.fit(self.viewport.size());
            let Some(round) = self.session.round() else {
                return;
            };
            let jitter = Vec2::new(
                (js_sys::Math::random() * 2.0 - 1.0) as f32,
                (js_sys::Math::random() * 2.0 - 1.0) as f32,
            );
            let view = FrameView::build(round, self.session.settings(), jitter);
            self.painter.paint(&view);
        }

        fn track_fps(&mut self, time: f64) {
            if self.last_time > 0.0 {
                self.frame_times[self.frame_index] = time - self.last_time;
                self.frame_index = (self.frame_index + 1) % self.frame_times.len();
                let avg = self.frame_times.iter().sum::<f64>() / self.frame_times.len() as f64;
                if avg > 0.0 {
                    self.fps = (1000.0 / avg).round() as u32;
                }
            }
            self.last_time = time;
        }

        fn update_hud(&self, document: &Document) {
            let Some(round) = self.session.round() else {
                return;
            };
            let view = FrameView::build(round, self.session.settings(), Vec2::ZERO);
            set_text(document, "score", &view.score().to_string());
            set_text(document, "time", &view.time_text());
            if self.session.settings().show_fps {
                set_text(document, "fps", &format!("{} FPS", self.fps));
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = if hidden {
                el.class_list().add_1("hidden")
            } else {
                el.class_list().remove_1("hidden")
            };
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Face Bop starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;

        let settings = Settings::load();
        let detected = detect_device();
        let audio = WebAudio::new(&settings);
        let session = GameSession::new(
            settings,
            detected,
            Box::new(WebViewport),
            Box::new(audio),
            Box::new(LocalStorageBestScore),
        );

        let mut painter = CanvasPainter::new(canvas.clone())?;
        painter.fit(WebViewport.size());

        let game = Rc::new(RefCell::new(Game {
            session,
            painter,
            viewport: WebViewport,
            loop_active: false,
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
            last_time: 0.0,
        }));

        // Initial overlay
        set_text(&document, "title", "Atack Oohigashi!!");
        set_text(&document, "result", "STARTを押してね");
        set_text(&document, "start-btn", "START");
        set_text(&document, "best", &game.borrow().session.best_score().to_string());
        set_hidden(&document, "overlay", false);
        set_hidden(&document, "result-img", true);
        set_hidden(&document, "fps", !game.borrow().session.settings().show_fps);

        setup_input_handlers(&canvas, game.clone());
        setup_start_button(&document, game.clone())?;
        setup_resize(game.clone());

        log::info!("Face Bop ready!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let target = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
            event.prevent_default();
            let rect = target.get_bounding_client_rect();
            let pos = Vec2::new(
                (event.client_x() as f64 - rect.left()) as f32,
                (event.client_y() as f64 - rect.top()) as f32,
            );
            game.borrow_mut().session.queue_tap(pos);
        });
        let _ = canvas
            .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_start_button(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let btn = document
            .get_element_by_id("start-btn")
            .ok_or_else(|| JsValue::from_str("no start button"))?;

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            set_hidden(&document, "overlay", true);

            let seed = js_sys::Date::now() as u64;
            let schedule = {
                let mut g = game.borrow_mut();
                g.session.start_game(seed);
                g.update_hud(&document);
                let idle = !g.loop_active;
                g.loop_active = true;
                idle
            };
            if schedule {
                request_animation_frame(game.clone());
            }
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
        Ok(())
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            // The loop refits every frame; this keeps the frozen end frame sharp
            if let Ok(mut g) = game.try_borrow_mut() {
                if !g.loop_active {
                    g.render();
                }
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let keep_going = {
            let mut g = game.borrow_mut();
            g.track_fps(time);
            g.session.frame(time);
            g.render();
            g.update_hud(&document);

            if g.session.is_running() {
                true
            } else {
                g.loop_active = false;
                show_result(&document, &g.session);
                false
            }
        };

        if keep_going {
            request_animation_frame(game);
        }
    }

    fn show_result(document: &Document, session: &GameSession) {
        let Some(summary) = session.summary() else {
            return;
        };
        set_text(document, "title", summary.title());
        set_text(document, "result", &summary.to_string());
        set_text(document, "comment", summary.comment);
        set_text(document, "best", &summary.best.to_string());
        set_text(document, "start-btn", "RETRY");

        let img = document
            .get_element_by_id("result-img")
            .and_then(|el| el.dyn_into::<HtmlImageElement>().ok());
        if let (Some(img), Some(pack)) = (img, summary.result) {
            img.set_src(pack.img);
            set_hidden(document, "result-img", false);
        }
        set_hidden(document, "overlay", false);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Face Bop (native) starting...");
    log::info!("Native mode plays a headless round - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

    let summary = headless::play_round(seed);
    println!("{}", summary.title());
    println!("{}", summary);
    if !summary.comment.is_empty() {
        println!("{}", summary.comment);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use face_bop::persistence::JsonFileBestScore;
    use face_bop::platform::{FixedViewport, LogAudio, detect_device};
    use face_bop::{GameSession, RoundSummary, Settings};

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);
    /// 60 Hz display
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Chance per frame that the bot taps
    const TAP_CHANCE: f64 = 0.2;
    /// Chance a tap lands on the face
    const ACCURACY: f64 = 0.85;

    /// Run one round against a scripted tapper
    pub fn play_round(seed: u64) -> RoundSummary {
        let mut session = GameSession::new(
            Settings::load(),
            detect_device(),
            Box::new(FixedViewport(VIEWPORT)),
            Box::new(LogAudio::default()),
            Box::new(JsonFileBestScore::in_temp_dir()),
        );
        let mut bot = Pcg32::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15);

        session.start_game(seed);
        let mut now = 0.0;
        while session.is_running() {
            if let Some(face) = session.round().map(|r| r.face.clone()) {
                if bot.random_bool(TAP_CHANCE) {
                    let tap = if bot.random_bool(ACCURACY) {
                        face.pos
                    } else {
                        face.pos + Vec2::splat(face.radius * 3.0)
                    };
                    session.queue_tap(tap);
                }
            }
            session.frame(now);
            now += FRAME_MS;
        }

        match session.summary() {
            Some(summary) => summary.clone(),
            None => RoundSummary {
                score: 0,
                best: session.best_score(),
                new_best: false,
                result: None,
                comment: "",
            },
        }
    }
}
