// sprite_gl
// copyright sprite_gl contributors 2024~2026

//! Small shared value types.

use serde::{Deserialize, Serialize};

/// A 2D point in virtual coordinates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointF32 {
    pub x: f32,
    pub y: f32,
}

impl PointF32 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
