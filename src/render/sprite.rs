// sprite_gl
// copyright sprite_gl contributors 2024~2026

//! Sprite compositing: the draw-bitmap family and path instancing.
//!
//! Every variant produces one per-draw matrix on a pushed stack entry, binds
//! a texture and a shader, and funnels into the same quad primitive. The unit
//! quad is anchored at its center and sized in caller units by folding
//! translate(-w/2, -h/2) and scale(w, h) under the sprite transform.
//!
//! The alpha register is process-wide, not per draw: a draw that sets it puts
//! it back to 1.0 before returning.

use crate::algorithm::curve::{eval_bezier, eval_bezier_scratch, eval_catmull_rom};
use crate::context::SpriteGl;
use crate::render::adapter::{GpuApi, Handle};
use crate::render::transform::Matrix;
use crate::util::PointF32;

impl SpriteGl {
    /// Draws one textured quad under the current modelview and bound shader.
    ///
    /// Binds the fixed unit-quad buffers, resolves the bound program's
    /// position attribute (a program without one still draws; the attribute
    /// setup is just skipped), uploads the projection/modelview/alpha
    /// uniforms, issues the 4-vertex strip and unbinds.
    pub fn textured_quad<G: GpuApi>(&mut self, gpu: &mut G) {
        gpu.bind_vertex_buffer(Some(self.quad_vbo));
        gpu.bind_index_buffer(Some(self.quad_ibo));

        let mut attrib = None;
        if let Some(program) = self.bound_shader {
            gpu.set_uniform_matrix(program, "uProjection", 4, self.viewport.transform().data());
            gpu.set_uniform_matrix(program, "uModelView", 4, self.stack.top().data());
            gpu.set_uniform_i32(program, "uTexture", 0);
            gpu.set_uniform_f32s(program, "uAlpha", &[self.alpha]);

            if let Some(loc) = gpu.attrib_location(program, "aPosition") {
                gpu.position_attrib_pointer(loc);
                attrib = Some(loc);
            }
        }

        gpu.draw_indexed_quad();

        if let Some(loc) = attrib {
            gpu.disable_attrib(loc);
        }
        gpu.bind_index_buffer(None);
        gpu.bind_vertex_buffer(None);
    }

    // ----- current-shader variants ----------------------------------------

    /// Draws `tex` under the current modelview and bound shader.
    pub fn draw_bitmap<G: GpuApi>(&mut self, gpu: &mut G, tex: Handle, w: f32, h: f32) {
        gpu.bind_texture(Some(tex));
        self.draw_anchored(gpu, w, h, 1.0, |_| {});
        gpu.bind_texture(None);
    }

    pub fn draw_bitmap_translated<G: GpuApi>(
        &mut self,
        gpu: &mut G,
        tex: Handle,
        w: f32,
        h: f32,
        x: f32,
        y: f32,
        alpha: f32,
    ) {
        gpu.bind_texture(Some(tex));
        self.draw_anchored(gpu, w, h, alpha, |m| {
            m.translate(x, y, 0.0);
        });
        gpu.bind_texture(None);
    }

    pub fn draw_bitmap_transformed<G: GpuApi>(
        &mut self,
        gpu: &mut G,
        tex: Handle,
        w: f32,
        h: f32,
        x: f32,
        y: f32,
        rot: f32,
        xscale: f32,
        yscale: f32,
        alpha: f32,
    ) {
        gpu.bind_texture(Some(tex));
        self.draw_anchored(gpu, w, h, alpha, |m| {
            m.translate(x, y, 0.0);
            m.rotate2d(rot);
            m.scale(xscale, yscale, 1.0);
        });
        gpu.bind_texture(None);
    }

    /// Draws with a caller-supplied matrix loaded in place of the current
    /// modelview.
    pub fn draw_bitmap_matrix<G: GpuApi>(
        &mut self,
        gpu: &mut G,
        tex: Handle,
        w: f32,
        h: f32,
        matrix: &Matrix,
        alpha: f32,
    ) {
        gpu.bind_texture(Some(tex));
        self.draw_anchored(gpu, w, h, alpha, |m| {
            *m = *matrix;
        });
        gpu.bind_texture(None);
    }

    // ----- explicit-shader variants ---------------------------------------

    /// The given shader is bound in place of any previously bound one and
    /// stays bound afterwards.
    pub fn draw_bitmap_with_shader<G: GpuApi>(
        &mut self,
        gpu: &mut G,
        tex: Handle,
        w: f32,
        h: f32,
        shader: Handle,
    ) {
        self.use_shader(gpu, shader);
        self.draw_bitmap(gpu, tex, w, h);
    }

    pub fn draw_bitmap_with_shader_translated<G: GpuApi>(
        &mut self,
        gpu: &mut G,
        tex: Handle,
        w: f32,
        h: f32,
        shader: Handle,
        x: f32,
        y: f32,
        alpha: f32,
    ) {
        self.use_shader(gpu, shader);
        self.draw_bitmap_translated(gpu, tex, w, h, x, y, alpha);
    }

    pub fn draw_bitmap_with_shader_transformed<G: GpuApi>(
        &mut self,
        gpu: &mut G,
        tex: Handle,
        w: f32,
        h: f32,
        shader: Handle,
        x: f32,
        y: f32,
        rot: f32,
        xscale: f32,
        yscale: f32,
        alpha: f32,
    ) {
        self.use_shader(gpu, shader);
        self.draw_bitmap_transformed(gpu, tex, w, h, x, y, rot, xscale, yscale, alpha);
    }

    // ----- built-in-shader variants ---------------------------------------

    /// Any custom shader is displaced by the built-in quad shader.
    pub fn draw_bitmap_without_shader<G: GpuApi>(
        &mut self,
        gpu: &mut G,
        tex: Handle,
        w: f32,
        h: f32,
    ) {
        let quad = self.quad_shader;
        self.use_shader(gpu, quad);
        self.draw_bitmap(gpu, tex, w, h);
    }

    pub fn draw_bitmap_without_shader_translated<G: GpuApi>(
        &mut self,
        gpu: &mut G,
        tex: Handle,
        w: f32,
        h: f32,
        x: f32,
        y: f32,
        alpha: f32,
    ) {
        let quad = self.quad_shader;
        self.use_shader(gpu, quad);
        self.draw_bitmap_translated(gpu, tex, w, h, x, y, alpha);
    }

    pub fn draw_bitmap_without_shader_transformed<G: GpuApi>(
        &mut self,
        gpu: &mut G,
        tex: Handle,
        w: f32,
        h: f32,
        x: f32,
        y: f32,
        rot: f32,
        xscale: f32,
        yscale: f32,
        alpha: f32,
    ) {
        let quad = self.quad_shader;
        self.use_shader(gpu, quad);
        self.draw_bitmap_transformed(gpu, tex, w, h, x, y, rot, xscale, yscale, alpha);
    }

    // ----- path instancing ------------------------------------------------

    /// Draws `steps + 1` instances evenly spaced on the segment from
    /// (x0, y0) to (x1, y1), endpoints inclusive, front to back.
    pub fn instance_bitmap_linear<G: GpuApi>(
        &mut self,
        gpu: &mut G,
        tex: Handle,
        w: f32,
        h: f32,
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        steps: usize,
        rot: f32,
        xscale: f32,
        yscale: f32,
        alpha: f32,
    ) {
        let quad = self.quad_shader;
        self.use_shader(gpu, quad);
        gpu.bind_texture(Some(tex));
        self.alpha = alpha;

        let dt = if steps > 0 { 1.0 / steps as f32 } else { 0.0 };
        for i in 0..=steps {
            let t = i as f32 * dt;
            let x = x0 + (x1 - x0) * t;
            let y = y0 + (y1 - y0) * t;
            self.draw_instance(gpu, x, y, w, h, rot, xscale, yscale);
        }

        self.alpha = 1.0;
        gpu.bind_texture(None);
    }

    /// Draws `steps + 1` instances along a Bezier path of arbitrary degree.
    ///
    /// The parameter runs from 1 down to 0, so instances are issued from the
    /// path's end back to its start; overlapping instances therefore stack
    /// with the start of the path on top. One scratch buffer is reused for
    /// every sample; the caller's control points are untouched.
    pub fn instance_bitmap_bezier<G: GpuApi>(
        &mut self,
        gpu: &mut G,
        tex: Handle,
        w: f32,
        h: f32,
        points: &[PointF32],
        steps: usize,
        rot: f32,
        xscale: f32,
        yscale: f32,
        alpha: f32,
    ) {
        if points.is_empty() {
            return;
        }
        let quad = self.quad_shader;
        self.use_shader(gpu, quad);
        gpu.bind_texture(Some(tex));
        self.alpha = alpha;

        let mut scratch = points.to_vec();
        let dt = if steps > 0 { 1.0 / steps as f32 } else { 0.0 };
        for i in 0..=steps {
            let t = 1.0 - i as f32 * dt;
            scratch.copy_from_slice(points);
            let p = eval_bezier_scratch(&mut scratch, t);
            self.draw_instance(gpu, p.x, p.y, w, h, rot, xscale, yscale);
        }

        self.alpha = 1.0;
        gpu.bind_texture(None);
    }

    /// Draws `steps + 1` instances along a Catmull-Rom segment, front to back.
    pub fn instance_bitmap_catmull_rom<G: GpuApi>(
        &mut self,
        gpu: &mut G,
        tex: Handle,
        w: f32,
        h: f32,
        points: &[PointF32; 4],
        steps: usize,
        rot: f32,
        xscale: f32,
        yscale: f32,
        alpha: f32,
    ) {
        let quad = self.quad_shader;
        self.use_shader(gpu, quad);
        gpu.bind_texture(Some(tex));
        self.alpha = alpha;

        let dt = if steps > 0 { 1.0 / steps as f32 } else { 0.0 };
        for i in 0..=steps {
            let t = i as f32 * dt;
            let p = eval_catmull_rom(points, t);
            self.draw_instance(gpu, p.x, p.y, w, h, rot, xscale, yscale);
        }

        self.alpha = 1.0;
        gpu.bind_texture(None);
    }

    /// Draws a single instance at parameter `t` of a Bezier path.
    pub fn draw_along_bezier_path<G: GpuApi>(
        &mut self,
        gpu: &mut G,
        tex: Handle,
        w: f32,
        h: f32,
        points: &[PointF32],
        t: f32,
        rot: f32,
        xscale: f32,
        yscale: f32,
        alpha: f32,
    ) {
        if points.is_empty() {
            return;
        }
        let quad = self.quad_shader;
        self.use_shader(gpu, quad);
        gpu.bind_texture(Some(tex));
        self.alpha = alpha;

        let p = eval_bezier(points, t);
        self.draw_instance(gpu, p.x, p.y, w, h, rot, xscale, yscale);

        self.alpha = 1.0;
        gpu.bind_texture(None);
    }

    // ----- shared internals -----------------------------------------------

    /// Pushes the stack, lets `build` fold the sprite transform onto the
    /// copy, anchors and sizes the unit quad, draws, pops, and puts the alpha
    /// register back.
    fn draw_anchored<G: GpuApi>(
        &mut self,
        gpu: &mut G,
        w: f32,
        h: f32,
        alpha: f32,
        build: impl FnOnce(&mut Matrix),
    ) {
        self.stack.push();
        {
            let top = self.stack.top_mut();
            build(top);
            top.translate(-0.5 * w, -0.5 * h, 0.0);
            top.scale(w, h, 1.0);
        }
        self.alpha = alpha;
        self.textured_quad(gpu);
        self.alpha = 1.0;
        self.stack.pop();
    }

    /// One instance of an instancing run: position plus the shared
    /// rotation/scale, alpha already staged in the register.
    fn draw_instance<G: GpuApi>(
        &mut self,
        gpu: &mut G,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        rot: f32,
        xscale: f32,
        yscale: f32,
    ) {
        self.stack.push();
        {
            let top = self.stack.top_mut();
            top.translate(x, y, 0.0);
            top.rotate2d(rot);
            top.scale(xscale, yscale, 1.0);
            top.translate(-0.5 * w, -0.5 * h, 0.0);
            top.scale(w, h, 1.0);
        }
        self.textured_quad(gpu);
        self.stack.pop();
    }
}
