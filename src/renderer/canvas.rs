//! Canvas 2D painter (WASM only)

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::view::{CountdownView, FrameView};

const BG_COLOR: &str = "#d6dbe3";
const HUD_FILL: &str = "rgba(15,15,15,0.95)";
const HUD_STROKE: &str = "rgba(255,255,255,0.20)";
const FACE_SRC: &str = "./assets/face.png";
const FACE_HIT_SRC: &str = "./assets/face_hit.png";
/// Backing store never exceeds 2x CSS pixels
const MAX_DPR: f64 = 2.0;

pub struct CanvasPainter {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    face: HtmlImageElement,
    face_hit: HtmlImageElement,
    size: Vec2,
}

impl CanvasPainter {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let face = HtmlImageElement::new()?;
        face.set_src(FACE_SRC);
        let face_hit = HtmlImageElement::new()?;
        face_hit.set_src(FACE_HIT_SRC);

        Ok(Self {
            canvas,
            ctx,
            face,
            face_hit,
            size: Vec2::ZERO,
        })
    }

    /// Match the backing store to `viewport` (CSS pixels) at the capped DPR
    pub fn fit(&mut self, viewport: Vec2) {
        if viewport == self.size {
            return;
        }
        self.size = viewport;

        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0)
            .clamp(1.0, MAX_DPR);
        self.canvas.set_width((viewport.x as f64 * dpr) as u32);
        self.canvas.set_height((viewport.y as f64 * dpr) as u32);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", viewport.x));
        let _ = style.set_property("height", &format!("{}px", viewport.y));
        let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
        log::debug!("Canvas fit to {}x{} @{}x", viewport.x, viewport.y, dpr);
    }

    pub fn paint(&self, view: &FrameView<'_>) {
        let ctx = &self.ctx;
        let (w, h) = (self.size.x as f64, self.size.y as f64);

        ctx.save();
        let _ = ctx.translate(view.shake_offset.x as f64, view.shake_offset.y as f64);
        ctx.clear_rect(-20.0, -20.0, w + 40.0, h + 40.0);
        ctx.set_fill_style_str(BG_COLOR);
        ctx.fill_rect(0.0, 0.0, w, h);

        // Particles
        ctx.set_fill_style_str("#ffffff");
        for p in view.particles() {
            ctx.set_global_alpha(p.alpha as f64);
            ctx.begin_path();
            let _ = ctx.arc(
                p.pos.x as f64,
                p.pos.y as f64,
                p.radius as f64,
                0.0,
                std::f64::consts::TAU,
            );
            ctx.fill();
        }
        ctx.set_global_alpha(1.0);

        // Floaters
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        for f in view.floaters() {
            ctx.set_global_alpha(f.alpha as f64);
            ctx.set_font(&format!("{} {}px system-ui, sans-serif", f.weight, f.size));
            self.text(f.text, f.pos.x as f64, f.pos.y as f64, 6.0, view.stroke_text);
        }
        ctx.set_global_alpha(1.0);

        self.paint_face(view);

        if let Some(countdown) = &view.countdown {
            self.paint_countdown(countdown, view.stroke_text, w, h);
        }
        ctx.restore();

        // HUD sits outside the shake
        ctx.save();
        ctx.set_global_alpha(0.98);
        ctx.set_text_align("right");
        ctx.set_text_baseline("top");
        let hud_x = w - 14.0;
        if let Some(combo) = view.combo_text() {
            ctx.set_font("900 20px system-ui, sans-serif");
            self.text(&combo, hud_x, 60.0, 6.0, view.stroke_text);
        }
        if let Some(fever) = view.fever_text() {
            ctx.set_font("900 22px system-ui, sans-serif");
            self.text(&fever, hud_x, 88.0, 6.0, view.stroke_text);
        }
        ctx.restore();
    }

    fn paint_face(&self, view: &FrameView<'_>) {
        let ctx = &self.ctx;
        let face = &view.face;
        let (x, y, r) = (face.center.x as f64, face.center.y as f64, face.radius as f64);

        // Shadow
        ctx.set_global_alpha(0.10);
        ctx.begin_path();
        let _ = ctx.ellipse(x, y + r * 0.78, r * 0.95, r * 0.35, 0.0, 0.0, std::f64::consts::TAU);
        ctx.set_fill_style_str("#000");
        ctx.fill();
        ctx.set_global_alpha(1.0);

        let img = if face.hit { &self.face_hit } else { &self.face };
        ctx.save();
        ctx.begin_path();
        let _ = ctx.arc(x, y, r, 0.0, std::f64::consts::TAU);
        ctx.clip();
        if img.complete() && img.natural_width() > 0 {
            let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                img,
                x - r,
                y - r,
                r * 2.0,
                r * 2.0,
            );
        } else {
            // Sprite not loaded yet
            ctx.set_fill_style_str(if face.hit { "#f2a0a0" } else { "#f5d6b8" });
            ctx.fill_rect(x - r, y - r, r * 2.0, r * 2.0);
        }
        ctx.restore();

        // Rim
        ctx.set_line_width(4.0);
        ctx.set_stroke_style_str("rgba(0,0,0,0.12)");
        ctx.begin_path();
        let _ = ctx.arc(x, y, r, 0.0, std::f64::consts::TAU);
        ctx.stroke();
    }

    fn paint_countdown(&self, countdown: &CountdownView, stroke: bool, w: f64, h: f64) {
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_global_alpha(0.98);
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");

        ctx.set_font("900 24px system-ui, sans-serif");
        self.text(CountdownView::HEADING, w / 2.0, h / 2.0 - 110.0, 6.0, stroke);

        if let Some(text) = countdown.text() {
            let base = if stroke { 120.0 } else { 100.0 };
            ctx.set_font(&format!(
                "{}px system-ui, sans-serif",
                (base * countdown.pulse).floor()
            ));
            self.text(&text, w / 2.0, h / 2.0, 10.0, stroke);
        }
        ctx.restore();
    }

    /// Filled text with an optional light outline
    fn text(&self, text: &str, x: f64, y: f64, line_width: f64, stroke: bool) {
        if stroke {
            self.ctx.set_line_width(line_width);
            self.ctx.set_stroke_style_str(HUD_STROKE);
            let _ = self.ctx.stroke_text(text, x, y);
        }
        self.ctx.set_fill_style_str(HUD_FILL);
        let _ = self.ctx.fill_text(text, x, y);
    }
}
