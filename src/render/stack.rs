// sprite_gl
// copyright sprite_gl contributors 2024~2026

//! Save/restore stack over a current transform, emulating the fixed-function
//! current-matrix register. Depth never drops below 1; only the top entry is
//! ever read or mutated.

use crate::render::transform::Matrix;

pub struct TransformStack {
    mats: Vec<Matrix>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStack {
    pub fn new() -> Self {
        Self {
            mats: vec![Matrix::new()],
        }
    }

    pub fn depth(&self) -> usize {
        self.mats.len()
    }

    /// Duplicates the current top.
    pub fn push(&mut self) {
        let top = *self.top();
        self.mats.push(top);
    }

    /// Discards the top. Popping the sole remaining entry is a no-op.
    pub fn pop(&mut self) {
        if self.mats.len() > 1 {
            self.mats.pop();
        }
    }

    /// Collapses to depth 1 and resets the remaining matrix to identity.
    pub fn reset(&mut self) {
        self.mats.truncate(1);
        self.mats[0].identity();
    }

    pub fn top(&self) -> &Matrix {
        // depth >= 1 always holds
        self.mats.last().unwrap()
    }

    pub fn top_mut(&mut self) -> &mut Matrix {
        self.mats.last_mut().unwrap()
    }

    /// Copies the top's 16 floats out, for marshaling to a uniform.
    pub fn get_elems(&self, out: &mut [f32; 16]) {
        out.copy_from_slice(self.top().data());
    }

    /// Overwrites the top's 16 floats.
    pub fn set_elems(&mut self, elems: &[f32; 16]) {
        self.top_mut().data_mut().copy_from_slice(elems);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_depth_one_with_identity() {
        let s = TransformStack::new();
        assert_eq!(s.depth(), 1);
        assert_eq!(*s.top(), Matrix::new());
    }

    #[test]
    fn push_then_pop_restores_top() {
        let mut s = TransformStack::new();
        s.top_mut().translate(4.0, 5.0, 6.0);
        let before = *s.top();

        s.push();
        assert_eq!(s.depth(), 2);
        s.top_mut().rotate2d(45.0);
        s.top_mut().scale(2.0, 2.0, 1.0);
        s.pop();

        assert_eq!(s.depth(), 1);
        assert_eq!(s.top().data, before.data);
    }

    #[test]
    fn pop_at_depth_one_is_noop() {
        let mut s = TransformStack::new();
        s.top_mut().translate(1.0, 0.0, 0.0);
        let before = *s.top();
        s.pop();
        assert_eq!(s.depth(), 1);
        assert_eq!(s.top().data, before.data);
    }

    #[test]
    fn push_duplicates_current_top() {
        let mut s = TransformStack::new();
        s.top_mut().translate(7.0, 8.0, 9.0);
        let top = *s.top();
        s.push();
        assert_eq!(s.top().data, top.data);
    }

    #[test]
    fn reset_collapses_and_reidentities() {
        let mut s = TransformStack::new();
        s.push();
        s.push();
        s.top_mut().scale(3.0, 3.0, 3.0);
        s.reset();
        assert_eq!(s.depth(), 1);
        assert_eq!(*s.top(), Matrix::new());
    }

    #[test]
    fn elems_round_trip() {
        let mut s = TransformStack::new();
        let mut elems = [0.0f32; 16];
        for (i, e) in elems.iter_mut().enumerate() {
            *e = i as f32;
        }
        s.set_elems(&elems);
        let mut out = [0.0f32; 16];
        s.get_elems(&mut out);
        assert_eq!(out, elems);
    }
}
