// sprite_gl
// copyright sprite_gl contributors 2024~2026

//! Rendering subsystem: transforms, the modelview stack, the virtual screen
//! mapping, resource teardown bookkeeping, the sprite compositor and the GPU
//! capability surface.

pub mod adapter;
pub mod ledger;
pub mod shader_source;
pub mod sprite;
pub mod stack;
pub mod transform;
pub mod viewport;
