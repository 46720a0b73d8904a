//! Rendering module
//!
//! `view` turns a round into drawable data; `canvas` paints it with Canvas 2D.

pub mod view;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasPainter;
pub use view::{CountdownView, FaceView, FloaterView, FrameView, ParticleView};
