// sprite_gl
// copyright sprite_gl contributors 2024~2026

//! sprite_gl is the rendering core of a 2D sprite layer over an OpenGL-ES
//! class API. Applications author content against a fixed virtual coordinate
//! system; the core computes the letterboxed mapping onto the real device
//! viewport, keeps a fixed-function style modelview stack, tracks the
//! ownership edges of compound GPU objects for ordered teardown, and places
//! sprite instances along Bezier and Catmull-Rom paths.
//!
//! All mutable state lives in a [`SpriteGl`] context passed to every
//! operation alongside a [`GpuApi`] implementation; `GlGpu` backs the surface
//! with glow for real contexts. The core is single-threaded by design: one
//! context per rendering thread, no interior locking.
//!
//! Modules: `render` holds the transform, stack, viewport, ledger, sprite and
//! GPU adapter pieces; `algorithm` the curve math; `context` the flat entry
//! point surface; `log` the optional log4rs initialization.

pub mod algorithm;
pub mod context;
#[cfg(feature = "log4rs")]
pub mod log;
pub mod render;
pub mod util;

pub use context::SpriteGl;
pub use render::adapter::gl::GlGpu;
pub use render::adapter::{BlendMode, GpuApi, GpuError, Handle, ShaderStage};
pub use render::transform::Matrix;
pub use util::PointF32;
