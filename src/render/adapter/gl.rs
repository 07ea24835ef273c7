// sprite_gl
// copyright sprite_gl contributors 2024~2026

//! glow-backed implementation of the GPU capability surface.
//!
//! Handles round-trip through the GL object names glow wraps; the GLES2
//! subset is used throughout (no VAOs), so the quad draw binds its buffers
//! and attribute pointer every time.

use crate::render::adapter::{BlendMode, GpuApi, GpuError, Handle, ShaderStage};
use glow::HasContext;
use log::warn;
use std::num::NonZeroU32;

pub struct GlGpu<'a> {
    gl: &'a glow::Context,
}

impl<'a> GlGpu<'a> {
    pub fn new(gl: &'a glow::Context) -> Self {
        Self { gl }
    }
}

fn nz(handle: Handle) -> NonZeroU32 {
    // handles are GL object names we handed out; 0 never escapes
    NonZeroU32::new(handle).unwrap()
}

fn shader(handle: Handle) -> glow::NativeShader {
    glow::NativeShader(nz(handle))
}

fn program(handle: Handle) -> glow::NativeProgram {
    glow::NativeProgram(nz(handle))
}

fn texture(handle: Handle) -> glow::NativeTexture {
    glow::NativeTexture(nz(handle))
}

fn buffer(handle: Handle) -> glow::NativeBuffer {
    glow::NativeBuffer(nz(handle))
}

fn framebuffer(handle: Handle) -> glow::NativeFramebuffer {
    glow::NativeFramebuffer(nz(handle))
}

fn renderbuffer(handle: Handle) -> glow::NativeRenderbuffer {
    glow::NativeRenderbuffer(nz(handle))
}

impl GpuApi for GlGpu<'_> {
    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<Handle, GpuError> {
        let gl = self.gl;
        unsafe {
            let kind = match stage {
                ShaderStage::Vertex => glow::VERTEX_SHADER,
                ShaderStage::Fragment => glow::FRAGMENT_SHADER,
            };
            let sh = gl.create_shader(kind).map_err(GpuError::Alloc)?;
            gl.shader_source(sh, source);
            gl.compile_shader(sh);
            if !gl.get_shader_compile_status(sh) {
                let info = gl.get_shader_info_log(sh);
                gl.delete_shader(sh);
                return Err(match stage {
                    ShaderStage::Vertex => GpuError::VertexCompile(info),
                    ShaderStage::Fragment => GpuError::FragmentCompile(info),
                });
            }
            Ok(sh.0.get())
        }
    }

    fn link_program(&mut self, vertex: Handle, fragment: Handle) -> Result<Handle, GpuError> {
        let gl = self.gl;
        unsafe {
            let prog = gl.create_program().map_err(GpuError::Alloc)?;
            gl.attach_shader(prog, shader(vertex));
            gl.attach_shader(prog, shader(fragment));
            gl.link_program(prog);
            if !gl.get_program_link_status(prog) {
                let info = gl.get_program_info_log(prog);
                gl.detach_shader(prog, shader(vertex));
                gl.detach_shader(prog, shader(fragment));
                gl.delete_program(prog);
                return Err(GpuError::Link(info));
            }
            // stages stay attached; teardown detaches them via the ledger
            Ok(prog.0.get())
        }
    }

    fn use_program(&mut self, prog: Option<Handle>) {
        unsafe {
            self.gl.use_program(prog.map(program));
        }
    }

    fn detach_stage(&mut self, prog: Handle, stage: Handle) {
        unsafe {
            self.gl.detach_shader(program(prog), shader(stage));
        }
    }

    fn delete_stage(&mut self, stage: Handle) {
        unsafe {
            self.gl.delete_shader(shader(stage));
        }
    }

    fn delete_program(&mut self, prog: Handle) {
        unsafe {
            self.gl.delete_program(program(prog));
        }
    }

    fn attrib_location(&mut self, prog: Handle, name: &str) -> Option<u32> {
        unsafe { self.gl.get_attrib_location(program(prog), name) }
    }

    fn set_uniform_f32s(&mut self, prog: Handle, name: &str, values: &[f32]) {
        let gl = self.gl;
        unsafe {
            let loc = gl.get_uniform_location(program(prog), name);
            match values.len() {
                1 => gl.uniform_1_f32(loc.as_ref(), values[0]),
                2 => gl.uniform_2_f32_slice(loc.as_ref(), values),
                3 => gl.uniform_3_f32_slice(loc.as_ref(), values),
                4 => gl.uniform_4_f32_slice(loc.as_ref(), values),
                n => warn!("uniform {}: unsupported component count {}", name, n),
            }
        }
    }

    fn set_uniform_i32(&mut self, prog: Handle, name: &str, value: i32) {
        let gl = self.gl;
        unsafe {
            let loc = gl.get_uniform_location(program(prog), name);
            gl.uniform_1_i32(loc.as_ref(), value);
        }
    }

    fn set_uniform_matrix(&mut self, prog: Handle, name: &str, dim: usize, values: &[f32]) {
        let gl = self.gl;
        unsafe {
            let loc = gl.get_uniform_location(program(prog), name);
            match dim {
                2 => gl.uniform_matrix_2_f32_slice(loc.as_ref(), false, values),
                3 => gl.uniform_matrix_3_f32_slice(loc.as_ref(), false, values),
                4 => gl.uniform_matrix_4_f32_slice(loc.as_ref(), false, values),
                n => warn!("uniform {}: unsupported matrix dimension {}", name, n),
            }
        }
    }

    fn create_texture(&mut self, w: i32, h: i32) -> Result<Handle, GpuError> {
        let gl = self.gl;
        unsafe {
            let tex = gl.create_texture().map_err(GpuError::Alloc)?;
            gl.active_texture(glow::TEXTURE0);
            gl.bind_texture(glow::TEXTURE_2D, Some(tex));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                w,
                h,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                None,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::NEAREST as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::NEAREST as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                glow::CLAMP_TO_EDGE as i32,
            );
            // stays bound so the caller can upload or attach right away
            Ok(tex.0.get())
        }
    }

    fn create_empty_texture(&mut self) -> Result<Handle, GpuError> {
        let gl = self.gl;
        unsafe {
            let tex = gl.create_texture().map_err(GpuError::Alloc)?;
            gl.active_texture(glow::TEXTURE0);
            gl.bind_texture(glow::TEXTURE_2D, Some(tex));
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::NEAREST as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::NEAREST as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                glow::CLAMP_TO_EDGE as i32,
            );
            Ok(tex.0.get())
        }
    }

    fn bind_texture(&mut self, tex: Option<Handle>) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0);
            self.gl.bind_texture(glow::TEXTURE_2D, tex.map(texture));
        }
    }

    fn delete_texture(&mut self, tex: Handle) {
        unsafe {
            self.gl.delete_texture(texture(tex));
        }
    }

    fn create_vertex_buffer(&mut self, data: &[f32]) -> Result<Handle, GpuError> {
        let gl = self.gl;
        unsafe {
            let vbo = gl.create_buffer().map_err(GpuError::Alloc)?;
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, data.align_to::<u8>().1, glow::STATIC_DRAW);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            Ok(vbo.0.get())
        }
    }

    fn create_index_buffer(&mut self, data: &[u16]) -> Result<Handle, GpuError> {
        let gl = self.gl;
        unsafe {
            let ibo = gl.create_buffer().map_err(GpuError::Alloc)?;
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                data.align_to::<u8>().1,
                glow::STATIC_DRAW,
            );
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
            Ok(ibo.0.get())
        }
    }

    fn bind_vertex_buffer(&mut self, buf: Option<Handle>) {
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, buf.map(buffer));
        }
    }

    fn bind_index_buffer(&mut self, buf: Option<Handle>) {
        unsafe {
            self.gl
                .bind_buffer(glow::ELEMENT_ARRAY_BUFFER, buf.map(buffer));
        }
    }

    fn delete_buffer(&mut self, buf: Handle) {
        unsafe {
            self.gl.delete_buffer(buffer(buf));
        }
    }

    fn position_attrib_pointer(&mut self, location: u32) {
        unsafe {
            self.gl.enable_vertex_attrib_array(location);
            self.gl
                .vertex_attrib_pointer_f32(location, 2, glow::FLOAT, false, 8, 0);
        }
    }

    fn disable_attrib(&mut self, location: u32) {
        unsafe {
            self.gl.disable_vertex_attrib_array(location);
        }
    }

    fn draw_indexed_quad(&mut self) {
        unsafe {
            self.gl
                .draw_elements(glow::TRIANGLE_STRIP, 4, glow::UNSIGNED_SHORT, 0);
        }
    }

    fn create_framebuffer(&mut self) -> Result<Handle, GpuError> {
        unsafe {
            let fbo = self.gl.create_framebuffer().map_err(GpuError::Alloc)?;
            Ok(fbo.0.get())
        }
    }

    fn attach_depth_buffer(&mut self, fbo: Handle, w: i32, h: i32) -> Result<Handle, GpuError> {
        let gl = self.gl;
        unsafe {
            let rb = gl.create_renderbuffer().map_err(GpuError::Alloc)?;
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(framebuffer(fbo)));
            gl.bind_renderbuffer(glow::RENDERBUFFER, Some(rb));
            gl.renderbuffer_storage(glow::RENDERBUFFER, glow::DEPTH_COMPONENT16, w, h);
            gl.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                glow::DEPTH_ATTACHMENT,
                glow::RENDERBUFFER,
                Some(rb),
            );
            gl.bind_renderbuffer(glow::RENDERBUFFER, None);
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            Ok(rb.0.get())
        }
    }

    fn attach_color_texture(&mut self, fbo: Handle, tex: Handle) {
        let gl = self.gl;
        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(framebuffer(fbo)));
            gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(texture(tex)),
                0,
            );
            if gl.check_framebuffer_status(glow::FRAMEBUFFER) != glow::FRAMEBUFFER_COMPLETE {
                warn!("framebuffer {} incomplete after color attach", fbo);
            }
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
        }
    }

    fn bind_framebuffer(&mut self, fbo: Option<Handle>) {
        unsafe {
            self.gl
                .bind_framebuffer(glow::FRAMEBUFFER, fbo.map(framebuffer));
        }
    }

    fn delete_framebuffer(&mut self, fbo: Handle) {
        unsafe {
            self.gl.delete_framebuffer(framebuffer(fbo));
        }
    }

    fn delete_depth_buffer(&mut self, depth: Handle) {
        unsafe {
            self.gl.delete_renderbuffer(renderbuffer(depth));
        }
    }

    fn set_viewport(&mut self, x: i32, y: i32, w: i32, h: i32) {
        unsafe {
            self.gl.viewport(x, y, w, h);
        }
    }

    fn set_scissor(&mut self, rect: Option<(i32, i32, i32, i32)>) {
        unsafe {
            match rect {
                Some((x, y, w, h)) => {
                    self.gl.enable(glow::SCISSOR_TEST);
                    self.gl.scissor(x, y, w, h);
                }
                None => self.gl.disable(glow::SCISSOR_TEST),
            }
        }
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        unsafe {
            self.gl.enable(glow::BLEND);
            match mode {
                BlendMode::Alpha => self
                    .gl
                    .blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA),
                BlendMode::Premultiplied => {
                    self.gl.blend_func(glow::ONE, glow::ONE_MINUS_SRC_ALPHA)
                }
            }
        }
    }

    fn clear(&mut self, r: f32, g: f32, b: f32, a: f32) {
        unsafe {
            self.gl.clear_color(r, g, b, a);
            self.gl
                .clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }
}
