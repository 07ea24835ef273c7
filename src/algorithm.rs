// sprite_gl
// copyright sprite_gl contributors 2024~2026

//! Path math: Bezier and Catmull-Rom evaluation.

pub mod curve;
