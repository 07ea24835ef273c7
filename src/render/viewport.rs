// sprite_gl
// copyright sprite_gl contributors 2024~2026

//! Mapping between the virtual screen and the physical device viewport.
//!
//! Content is authored against a fixed virtual width/height; the derived
//! matrix scales it uniformly into the device viewport, flips the Y axis
//! (virtual space is top-down, clip space bottom-up) and centers the result,
//! leaving letterbox bars on whichever axis has slack. The matrix is rebuilt
//! only on an explicit compute call, never implicitly per frame.

use crate::render::transform::Matrix;
use log::{info, warn};

pub struct VirtualViewport {
    virtual_w: i32,
    virtual_h: i32,
    physical_w: i32,
    physical_h: i32,
    transform: Matrix,
}

impl Default for VirtualViewport {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualViewport {
    pub fn new() -> Self {
        Self {
            virtual_w: 1,
            virtual_h: 1,
            physical_w: 0,
            physical_h: 0,
            transform: Matrix::new(),
        }
    }

    pub fn set_virtual_dimensions(&mut self, w: i32, h: i32) {
        self.virtual_w = w;
        self.virtual_h = h;
    }

    pub fn virtual_dimensions(&self) -> (i32, i32) {
        (self.virtual_w, self.virtual_h)
    }

    pub fn set_physical_dimensions(&mut self, w: i32, h: i32) {
        self.physical_w = w;
        self.physical_h = h;
    }

    pub fn physical_dimensions(&self) -> (i32, i32) {
        (self.physical_w, self.physical_h)
    }

    /// Uniform virtual-to-device scale factor for the current dimensions.
    pub fn scale_factor(&self) -> f32 {
        let sw = self.physical_w as f32 / self.virtual_w as f32;
        let sh = self.physical_h as f32 / self.virtual_h as f32;
        sw.min(sh)
    }

    /// Letterbox offset in device pixels; nonzero on exactly one axis unless
    /// the aspect ratios match.
    pub fn letterbox_offset(&self) -> (f32, f32) {
        let s = self.scale_factor();
        let dx = 0.5 * (self.physical_w as f32 - s * self.virtual_w as f32);
        let dy = 0.5 * (self.physical_h as f32 - s * self.virtual_h as f32);
        (dx, dy)
    }

    /// Rebuilds the virtual-to-clip matrix in one shot. A zero or negative
    /// dimension on either screen leaves the previous matrix untouched.
    pub fn compute(&mut self) {
        if self.virtual_w <= 0 || self.virtual_h <= 0 {
            warn!(
                "virtual transform not computed: degenerate virtual size {}x{}",
                self.virtual_w, self.virtual_h
            );
            return;
        }
        if self.physical_w <= 0 || self.physical_h <= 0 {
            warn!(
                "virtual transform not computed: degenerate physical size {}x{}",
                self.physical_w, self.physical_h
            );
            return;
        }

        let pw = self.physical_w as f32;
        let ph = self.physical_h as f32;
        let s = self.scale_factor();
        let (dx, dy) = self.letterbox_offset();

        let mut m = Matrix::new();
        m.scale(2.0 / pw, 2.0 / ph, 1.0);
        m.translate(-pw / 2.0, ph / 2.0, 0.0);
        m.scale(1.0, -1.0, 1.0);
        m.translate(dx, dy, 0.0);
        m.scale(s, s, 1.0);
        self.transform = m;

        info!(
            "virtual transform: {}x{} -> {}x{} scale {} offset ({}, {})",
            self.virtual_w, self.virtual_h, self.physical_w, self.physical_h, s, dx, dy
        );
    }

    pub fn transform(&self) -> &Matrix {
        &self.transform
    }

    /// Overwrites the derived matrix wholesale, bypassing the computation.
    pub fn set_transform(&mut self, elems: &[f32; 16]) {
        self.transform.data_mut().copy_from_slice(elems);
    }

    pub fn get_transform(&self, out: &mut [f32; 16]) {
        out.copy_from_slice(self.transform.data());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn wide_screen_letterboxes_horizontally() {
        let mut v = VirtualViewport::new();
        v.set_virtual_dimensions(100, 100);
        v.set_physical_dimensions(200, 100);
        assert!(approx(v.scale_factor(), 1.0));
        let (dx, dy) = v.letterbox_offset();
        assert!(approx(dx, 50.0));
        assert!(approx(dy, 0.0));
    }

    #[test]
    fn matching_aspect_has_no_offset() {
        let mut v = VirtualViewport::new();
        v.set_virtual_dimensions(100, 100);
        v.set_physical_dimensions(100, 100);
        assert!(approx(v.scale_factor(), 1.0));
        let (dx, dy) = v.letterbox_offset();
        assert!(approx(dx, 0.0));
        assert!(approx(dy, 0.0));
    }

    #[test]
    fn tall_screen_letterboxes_vertically() {
        let mut v = VirtualViewport::new();
        v.set_virtual_dimensions(100, 100);
        v.set_physical_dimensions(100, 300);
        assert!(approx(v.scale_factor(), 1.0));
        let (dx, dy) = v.letterbox_offset();
        assert!(approx(dx, 0.0));
        assert!(approx(dy, 100.0));
    }

    #[test]
    fn transform_maps_virtual_corners_to_clip() {
        let mut v = VirtualViewport::new();
        v.set_virtual_dimensions(100, 100);
        v.set_physical_dimensions(200, 100);
        v.compute();

        // Top-left of the virtual screen sits at the top of clip space,
        // half a letterbox in from the left edge.
        let (x, y) = v.transform().transform_point(0.0, 0.0);
        assert!(approx(x, -0.5) && approx(y, 1.0), "got ({}, {})", x, y);

        // Bottom-right, symmetric.
        let (x, y) = v.transform().transform_point(100.0, 100.0);
        assert!(approx(x, 0.5) && approx(y, -1.0), "got ({}, {})", x, y);

        // Center maps to the clip-space origin.
        let (x, y) = v.transform().transform_point(50.0, 50.0);
        assert!(approx(x, 0.0) && approx(y, 0.0), "got ({}, {})", x, y);
    }

    #[test]
    fn degenerate_dimensions_keep_previous_matrix() {
        let mut v = VirtualViewport::new();
        v.set_virtual_dimensions(100, 100);
        v.set_physical_dimensions(200, 100);
        v.compute();
        let before = *v.transform();

        v.set_virtual_dimensions(0, 100);
        v.compute();
        assert_eq!(v.transform().data, before.data);

        v.set_virtual_dimensions(100, 100);
        v.set_physical_dimensions(0, 0);
        v.compute();
        assert_eq!(v.transform().data, before.data);
    }

    #[test]
    fn set_transform_overrides_computation() {
        let mut v = VirtualViewport::new();
        let mut elems = [0.0f32; 16];
        elems[0] = 2.0;
        elems[15] = 1.0;
        v.set_transform(&elems);
        let mut out = [0.0f32; 16];
        v.get_transform(&mut out);
        assert_eq!(out, elems);
    }
}
