// sprite_gl
// copyright sprite_gl contributors 2024~2026

//! The rendering context: every piece of state the sprite layer mutates lives
//! here, in one explicit object passed to each operation together with the GPU
//! surface. One context per rendering thread; the core adds no locking of its
//! own.
//!
//! The flat entry-point surface is grouped the way callers use it: lifecycle,
//! virtual screen, shaders, uniforms, textures, frame bracket, framebuffers,
//! and the modelview stack. The sprite-drawing family lives in
//! `render::sprite` on the same type.

use crate::render::adapter::{BlendMode, GpuApi, GpuError, Handle, ShaderStage};
use crate::render::ledger::ResourceLedger;
use crate::render::shader_source::{QUAD_FRAGMENT_SRC, QUAD_VERTEX_SRC};
use crate::render::stack::TransformStack;
use crate::render::viewport::VirtualViewport;
use log::info;

/// Unit quad, anchored at the origin; positions double as texcoords.
const QUAD_VERTICES: [f32; 8] = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0];
const QUAD_INDICES: [u16; 4] = [0, 1, 2, 3];

pub struct SpriteGl {
    pub(crate) stack: TransformStack,
    pub(crate) viewport: VirtualViewport,
    pub(crate) ledger: ResourceLedger,

    pub(crate) quad_vbo: Handle,
    pub(crate) quad_ibo: Handle,
    pub(crate) quad_shader: Handle,

    pub(crate) bound_shader: Option<Handle>,
    pub(crate) clear_color: (f32, f32, f32),
    pub(crate) alpha: f32,
    pub(crate) blend_mode: BlendMode,

    // (handle, width, height) of every live framebuffer, for viewport switches
    pub(crate) fbo_sizes: Vec<(Handle, i32, i32)>,
}

impl SpriteGl {
    /// Builds the context for 2D rendering against a `w` x `h` virtual screen:
    /// uploads the unit-quad geometry and compiles the built-in quad shader.
    /// A broken driver or shader fails fast here instead of handing back dead
    /// handles.
    pub fn initialize_2d<G: GpuApi>(gpu: &mut G, w: i32, h: i32) -> Result<Self, GpuError> {
        let mut ctx = Self {
            stack: TransformStack::new(),
            viewport: VirtualViewport::new(),
            ledger: ResourceLedger::new(),
            quad_vbo: 0,
            quad_ibo: 0,
            quad_shader: 0,
            bound_shader: None,
            clear_color: (0.0, 0.0, 0.0),
            alpha: 1.0,
            blend_mode: BlendMode::Alpha,
            fbo_sizes: Vec::new(),
        };

        ctx.quad_vbo = gpu.create_vertex_buffer(&QUAD_VERTICES)?;
        ctx.quad_ibo = gpu.create_index_buffer(&QUAD_INDICES)?;
        ctx.quad_shader = ctx.load_shader(gpu, QUAD_VERTEX_SRC, QUAD_FRAGMENT_SRC)?;
        ctx.viewport.set_virtual_dimensions(w, h);

        info!("sprite renderer initialized, virtual screen {}x{}", w, h);
        Ok(ctx)
    }

    /// Releases everything the context still tracks: remaining shader
    /// programs, live framebuffers with their attachments, the quad geometry
    /// and the built-in shader. The context is unusable afterwards.
    pub fn cleanup<G: GpuApi>(&mut self, gpu: &mut G) {
        let fbos: Vec<Handle> = self.fbo_sizes.iter().map(|&(f, _, _)| f).collect();
        for fbo in fbos {
            self.delete_fbo(gpu, fbo);
        }

        let mut programs: Vec<Handle> = Vec::new();
        for (prog, stage) in self.ledger.drain_stages() {
            gpu.detach_stage(prog, stage);
            gpu.delete_stage(stage);
            if !programs.contains(&prog) {
                programs.push(prog);
            }
        }
        for prog in programs {
            gpu.delete_program(prog);
        }
        self.quad_shader = 0;

        gpu.delete_buffer(self.quad_vbo);
        gpu.delete_buffer(self.quad_ibo);
        self.quad_vbo = 0;
        self.quad_ibo = 0;

        self.bound_shader = None;
        self.stack.reset();
        info!("sprite renderer cleaned up");
    }

    // ----- virtual screen -------------------------------------------------

    pub fn set_virtual_dimensions(&mut self, w: i32, h: i32) {
        self.viewport.set_virtual_dimensions(w, h);
    }

    pub fn virtual_dimensions(&self) -> (i32, i32) {
        self.viewport.virtual_dimensions()
    }

    /// Records the live device viewport size; call on surface (re)size before
    /// recomputing the virtual transform.
    pub fn set_physical_dimensions(&mut self, w: i32, h: i32) {
        self.viewport.set_physical_dimensions(w, h);
    }

    /// Recomputes the virtual-to-clip mapping from the current dimensions.
    /// Explicit by design; nothing recomputes it per frame.
    pub fn compute_virtual_transform(&mut self) {
        self.viewport.compute();
    }

    pub fn get_virtual_transform(&self, out: &mut [f32; 16]) {
        self.viewport.get_transform(out);
    }

    pub fn set_virtual_transform(&mut self, elems: &[f32; 16]) {
        self.viewport.set_transform(elems);
    }

    // ----- shaders --------------------------------------------------------

    /// Compiles both stages and links them. On success the ledger remembers
    /// the program -> stage edges for ordered teardown; on failure every
    /// stage compiled so far is deleted before the error is returned, so no
    /// half-built program leaks.
    pub fn load_shader<G: GpuApi>(
        &mut self,
        gpu: &mut G,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<Handle, GpuError> {
        let vs = gpu.compile_shader(ShaderStage::Vertex, vertex_src)?;
        let fs = match gpu.compile_shader(ShaderStage::Fragment, fragment_src) {
            Ok(fs) => fs,
            Err(e) => {
                gpu.delete_stage(vs);
                return Err(e);
            }
        };
        let prog = match gpu.link_program(vs, fs) {
            Ok(prog) => prog,
            Err(e) => {
                gpu.delete_stage(vs);
                gpu.delete_stage(fs);
                return Err(e);
            }
        };

        self.ledger.record_stage(prog, vs);
        self.ledger.record_stage(prog, fs);
        info!("shader program {} loaded", prog);
        Ok(prog)
    }

    pub fn use_shader<G: GpuApi>(&mut self, gpu: &mut G, shader: Handle) {
        gpu.use_program(Some(shader));
        self.bound_shader = Some(shader);
    }

    pub fn clear_shader<G: GpuApi>(&mut self, gpu: &mut G) {
        gpu.use_program(None);
        self.bound_shader = None;
    }

    /// Detaches and deletes the program's recorded stages, then the program.
    /// Deleting a program that was never recorded still deletes the program;
    /// only the bookkeeping entries are absent.
    pub fn delete_shader<G: GpuApi>(&mut self, gpu: &mut G, shader: Handle) {
        for stage in self.ledger.release_stages(shader) {
            gpu.detach_stage(shader, stage);
            gpu.delete_stage(stage);
        }
        gpu.delete_program(shader);
        if self.bound_shader == Some(shader) {
            self.bound_shader = None;
        }
    }

    // ----- uniforms -------------------------------------------------------

    pub fn set_uniform_f32<G: GpuApi>(&mut self, gpu: &mut G, shader: Handle, name: &str, v: f32) {
        gpu.set_uniform_f32s(shader, name, &[v]);
    }

    pub fn set_uniform_vec2<G: GpuApi>(
        &mut self,
        gpu: &mut G,
        shader: Handle,
        name: &str,
        v: &[f32; 2],
    ) {
        gpu.set_uniform_f32s(shader, name, v);
    }

    pub fn set_uniform_vec3<G: GpuApi>(
        &mut self,
        gpu: &mut G,
        shader: Handle,
        name: &str,
        v: &[f32; 3],
    ) {
        gpu.set_uniform_f32s(shader, name, v);
    }

    pub fn set_uniform_vec4<G: GpuApi>(
        &mut self,
        gpu: &mut G,
        shader: Handle,
        name: &str,
        v: &[f32; 4],
    ) {
        gpu.set_uniform_f32s(shader, name, v);
    }

    pub fn set_uniform_i32<G: GpuApi>(&mut self, gpu: &mut G, shader: Handle, name: &str, v: i32) {
        gpu.set_uniform_i32(shader, name, v);
    }

    pub fn set_uniform_mat2<G: GpuApi>(
        &mut self,
        gpu: &mut G,
        shader: Handle,
        name: &str,
        v: &[f32; 4],
    ) {
        gpu.set_uniform_matrix(shader, name, 2, v);
    }

    pub fn set_uniform_mat3<G: GpuApi>(
        &mut self,
        gpu: &mut G,
        shader: Handle,
        name: &str,
        v: &[f32; 9],
    ) {
        gpu.set_uniform_matrix(shader, name, 3, v);
    }

    pub fn set_uniform_mat4<G: GpuApi>(
        &mut self,
        gpu: &mut G,
        shader: Handle,
        name: &str,
        v: &[f32; 16],
    ) {
        gpu.set_uniform_matrix(shader, name, 4, v);
    }

    // ----- textures -------------------------------------------------------

    /// Creates a w x h color texture with undefined contents. The texture is
    /// left bound so it can be uploaded to or attached to a framebuffer
    /// immediately.
    pub fn create_texture<G: GpuApi>(
        &mut self,
        gpu: &mut G,
        w: i32,
        h: i32,
    ) -> Result<Handle, GpuError> {
        gpu.create_texture(w, h)
    }

    /// Creates a texture with no storage; the caller uploads data later.
    pub fn create_empty_texture<G: GpuApi>(&mut self, gpu: &mut G) -> Result<Handle, GpuError> {
        gpu.create_empty_texture()
    }

    pub fn bind_texture<G: GpuApi>(&mut self, gpu: &mut G, tex: Handle) {
        gpu.bind_texture(Some(tex));
    }

    pub fn unbind_texture<G: GpuApi>(&mut self, gpu: &mut G) {
        gpu.bind_texture(None);
    }

    pub fn delete_texture<G: GpuApi>(&mut self, gpu: &mut G, tex: Handle) {
        gpu.delete_texture(tex);
    }

    // ----- frame bracket and raster state ---------------------------------

    pub fn set_clear_color(&mut self, r: f32, g: f32, b: f32) {
        self.clear_color = (r, g, b);
    }

    pub fn begin_frame<G: GpuApi>(&mut self, gpu: &mut G) {
        gpu.set_blend_mode(self.blend_mode);
        let (r, g, b) = self.clear_color;
        gpu.clear(r, g, b, 1.0);
    }

    pub fn end_frame<G: GpuApi>(&mut self, gpu: &mut G) {
        gpu.bind_texture(None);
        gpu.use_program(None);
        self.bound_shader = None;
    }

    pub fn set_blend_mode<G: GpuApi>(&mut self, gpu: &mut G, mode: BlendMode) {
        self.blend_mode = mode;
        gpu.set_blend_mode(mode);
    }

    /// Restricts rendering to a rectangle given in virtual coordinates.
    pub fn set_clip<G: GpuApi>(&mut self, gpu: &mut G, x: f32, y: f32, w: f32, h: f32) {
        let s = self.viewport.scale_factor();
        let (dx, dy) = self.viewport.letterbox_offset();
        let (_, ph) = self.viewport.physical_dimensions();

        // scissor rectangles are window coordinates from the bottom-left;
        // virtual space hangs from the top
        let px = dx + s * x;
        let py = ph as f32 - (dy + s * (y + h));
        gpu.set_scissor(Some((
            px.round() as i32,
            py.round() as i32,
            (s * w).round() as i32,
            (s * h).round() as i32,
        )));
    }

    pub fn clear_clip<G: GpuApi>(&mut self, gpu: &mut G) {
        gpu.set_scissor(None);
    }

    // ----- framebuffers ---------------------------------------------------

    /// Creates a framebuffer with a fresh depth attachment. The depth edge is
    /// recorded for teardown; color textures attach separately.
    pub fn create_fbo<G: GpuApi>(
        &mut self,
        gpu: &mut G,
        w: i32,
        h: i32,
    ) -> Result<Handle, GpuError> {
        let fbo = gpu.create_framebuffer()?;
        let depth = match gpu.attach_depth_buffer(fbo, w, h) {
            Ok(depth) => depth,
            Err(e) => {
                gpu.delete_framebuffer(fbo);
                return Err(e);
            }
        };
        self.ledger.record_depth(fbo, depth);
        self.fbo_sizes.push((fbo, w, h));
        Ok(fbo)
    }

    /// Attaches a color texture; each call records another ownership edge,
    /// so deleting the framebuffer deletes every texture ever attached.
    pub fn attach_to_fbo<G: GpuApi>(&mut self, gpu: &mut G, fbo: Handle, tex: Handle) {
        gpu.attach_color_texture(fbo, tex);
        self.ledger.record_color(fbo, tex);
    }

    /// Deletes the framebuffer and everything the ledger says it owns, parts
    /// first. An untracked handle is legal: the framebuffer alone is deleted.
    pub fn delete_fbo<G: GpuApi>(&mut self, gpu: &mut G, fbo: Handle) {
        for depth in self.ledger.release_depth(fbo) {
            gpu.delete_depth_buffer(depth);
        }
        for tex in self.ledger.release_colors(fbo) {
            gpu.delete_texture(tex);
        }
        gpu.delete_framebuffer(fbo);
        self.fbo_sizes.retain(|&(f, _, _)| f != fbo);
    }

    pub fn begin_offscreen_render<G: GpuApi>(&mut self, gpu: &mut G, fbo: Handle) {
        gpu.bind_framebuffer(Some(fbo));
        if let Some(&(_, w, h)) = self.fbo_sizes.iter().find(|&&(f, _, _)| f == fbo) {
            gpu.set_viewport(0, 0, w, h);
        }
    }

    pub fn end_offscreen_render<G: GpuApi>(&mut self, gpu: &mut G) {
        gpu.bind_framebuffer(None);
        let (pw, ph) = self.viewport.physical_dimensions();
        if pw > 0 && ph > 0 {
            gpu.set_viewport(0, 0, pw, ph);
        }
    }

    // ----- modelview stack ------------------------------------------------

    pub fn push_matrix(&mut self) {
        self.stack.push();
    }

    pub fn pop_matrix(&mut self) {
        self.stack.pop();
    }

    pub fn load_identity(&mut self) {
        self.stack.top_mut().identity();
    }

    pub fn load_matrix(&mut self, elems: &[f32; 16]) {
        self.stack.set_elems(elems);
    }

    pub fn get_matrix(&self, out: &mut [f32; 16]) {
        self.stack.get_elems(out);
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.stack.top_mut().translate(x, y, z);
    }

    pub fn rotate(&mut self, angle: f32) {
        self.stack.top_mut().rotate2d(angle);
    }

    pub fn scale(&mut self, sx: f32, sy: f32, sz: f32) {
        self.stack.top_mut().scale(sx, sy, sz);
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }
}
