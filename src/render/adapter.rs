// sprite_gl
// copyright sprite_gl contributors 2024~2026

//! The GPU capability surface the core draws through.
//!
//! The core composes transforms, tracks resource ownership and decides what to
//! draw; everything that actually touches the driver goes through [`GpuApi`].
//! Handles are plain integers (GL object names); the trait owner is expected
//! to keep them opaque. The `gl` module provides the glow-backed
//! implementation used in production.

pub mod gl;

use thiserror::Error;

/// GPU object name. 0 is never handed out.
pub type Handle = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// Framebuffer blend equation selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    /// Straight-alpha blending, the default.
    Alpha,
    /// Source colors already multiplied by their alpha.
    Premultiplied,
}

/// GPU-side failures that carry a driver diagnostic. Compile and link errors
/// are returned to the caller instead of being logged and swallowed; the
/// caller decides whether a broken shader is fatal.
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("vertex shader compilation failed: {0}")]
    VertexCompile(String),
    #[error("fragment shader compilation failed: {0}")]
    FragmentCompile(String),
    #[error("shader program link failed: {0}")]
    Link(String),
    #[error("gpu object allocation failed: {0}")]
    Alloc(String),
}

pub trait GpuApi {
    // shader stages and programs
    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<Handle, GpuError>;
    fn link_program(&mut self, vertex: Handle, fragment: Handle) -> Result<Handle, GpuError>;
    fn use_program(&mut self, program: Option<Handle>);
    fn detach_stage(&mut self, program: Handle, stage: Handle);
    fn delete_stage(&mut self, stage: Handle);
    fn delete_program(&mut self, program: Handle);
    fn attrib_location(&mut self, program: Handle, name: &str) -> Option<u32>;

    // uniforms, resolved by name; a name the program does not declare is
    // silently ignored
    fn set_uniform_f32s(&mut self, program: Handle, name: &str, values: &[f32]);
    fn set_uniform_i32(&mut self, program: Handle, name: &str, value: i32);
    fn set_uniform_matrix(&mut self, program: Handle, name: &str, dim: usize, values: &[f32]);

    // textures
    fn create_texture(&mut self, w: i32, h: i32) -> Result<Handle, GpuError>;
    fn create_empty_texture(&mut self) -> Result<Handle, GpuError>;
    fn bind_texture(&mut self, tex: Option<Handle>);
    fn delete_texture(&mut self, tex: Handle);

    // fixed quad geometry
    fn create_vertex_buffer(&mut self, data: &[f32]) -> Result<Handle, GpuError>;
    fn create_index_buffer(&mut self, data: &[u16]) -> Result<Handle, GpuError>;
    fn bind_vertex_buffer(&mut self, buf: Option<Handle>);
    fn bind_index_buffer(&mut self, buf: Option<Handle>);
    fn delete_buffer(&mut self, buf: Handle);
    /// Points `location` at tightly packed vec2 positions in the bound buffer.
    fn position_attrib_pointer(&mut self, location: u32);
    fn disable_attrib(&mut self, location: u32);
    /// One indexed triangle-strip draw of 4 vertices.
    fn draw_indexed_quad(&mut self);

    // framebuffers
    fn create_framebuffer(&mut self) -> Result<Handle, GpuError>;
    /// Creates a depth renderbuffer, attaches it to `fbo` and returns its handle.
    fn attach_depth_buffer(&mut self, fbo: Handle, w: i32, h: i32) -> Result<Handle, GpuError>;
    fn attach_color_texture(&mut self, fbo: Handle, tex: Handle);
    fn bind_framebuffer(&mut self, fbo: Option<Handle>);
    fn delete_framebuffer(&mut self, fbo: Handle);
    fn delete_depth_buffer(&mut self, depth: Handle);

    // raster state
    fn set_viewport(&mut self, x: i32, y: i32, w: i32, h: i32);
    fn set_scissor(&mut self, rect: Option<(i32, i32, i32, i32)>);
    fn set_blend_mode(&mut self, mode: BlendMode);
    fn clear(&mut self, r: f32, g: f32, b: f32, a: f32);
}

/// A recording GPU for tests: sequential handles, a flat call log, and the
/// modelview translation plus alpha captured at every quad draw.
#[cfg(test)]
pub(crate) mod mock {
    use super::*;

    pub struct MockGpu {
        next_handle: u32,
        pub log: Vec<String>,
        /// (x, y) translation of the last uploaded modelview, per draw.
        pub draws: Vec<(f32, f32)>,
        pub draw_alphas: Vec<f32>,
        last_modelview: [f32; 16],
        last_alpha: f32,
        pub fail_vertex: bool,
        pub fail_fragment: bool,
        pub fail_link: bool,
        pub missing_position_attrib: bool,
    }

    impl MockGpu {
        pub fn new() -> Self {
            Self {
                next_handle: 0,
                log: Vec::new(),
                draws: Vec::new(),
                draw_alphas: Vec::new(),
                last_modelview: [0.0; 16],
                last_alpha: 1.0,
                fail_vertex: false,
                fail_fragment: false,
                fail_link: false,
                missing_position_attrib: false,
            }
        }

        fn alloc(&mut self) -> Handle {
            self.next_handle += 1;
            self.next_handle
        }

        pub fn count(&self, prefix: &str) -> usize {
            self.log.iter().filter(|e| e.starts_with(prefix)).count()
        }
    }

    impl GpuApi for MockGpu {
        fn compile_shader(&mut self, stage: ShaderStage, _source: &str) -> Result<Handle, GpuError> {
            match stage {
                ShaderStage::Vertex if self.fail_vertex => {
                    Err(GpuError::VertexCompile("mock vertex error".into()))
                }
                ShaderStage::Fragment if self.fail_fragment => {
                    Err(GpuError::FragmentCompile("mock fragment error".into()))
                }
                _ => {
                    let h = self.alloc();
                    self.log.push(format!("compile_shader {:?} {}", stage, h));
                    Ok(h)
                }
            }
        }

        fn link_program(&mut self, vertex: Handle, fragment: Handle) -> Result<Handle, GpuError> {
            if self.fail_link {
                return Err(GpuError::Link("mock link error".into()));
            }
            let h = self.alloc();
            self.log.push(format!("link_program {} {} -> {}", vertex, fragment, h));
            Ok(h)
        }

        fn use_program(&mut self, program: Option<Handle>) {
            match program {
                Some(p) => self.log.push(format!("use_program {}", p)),
                None => self.log.push("use_program none".into()),
            }
        }

        fn detach_stage(&mut self, program: Handle, stage: Handle) {
            self.log.push(format!("detach_stage {} {}", program, stage));
        }

        fn delete_stage(&mut self, stage: Handle) {
            self.log.push(format!("delete_stage {}", stage));
        }

        fn delete_program(&mut self, program: Handle) {
            self.log.push(format!("delete_program {}", program));
        }

        fn attrib_location(&mut self, _program: Handle, name: &str) -> Option<u32> {
            if self.missing_position_attrib && name == "aPosition" {
                None
            } else {
                Some(0)
            }
        }

        fn set_uniform_f32s(&mut self, _program: Handle, name: &str, values: &[f32]) {
            if name == "uAlpha" {
                self.last_alpha = values[0];
            }
            self.log.push(format!("uniform {} {:?}", name, values));
        }

        fn set_uniform_i32(&mut self, _program: Handle, name: &str, value: i32) {
            self.log.push(format!("uniform {} {}", name, value));
        }

        fn set_uniform_matrix(&mut self, _program: Handle, name: &str, _dim: usize, values: &[f32]) {
            if name == "uModelView" {
                self.last_modelview.copy_from_slice(values);
            }
            self.log.push(format!("uniform_matrix {}", name));
        }

        fn create_texture(&mut self, w: i32, h: i32) -> Result<Handle, GpuError> {
            let handle = self.alloc();
            self.log.push(format!("create_texture {}x{} -> {}", w, h, handle));
            Ok(handle)
        }

        fn create_empty_texture(&mut self) -> Result<Handle, GpuError> {
            let handle = self.alloc();
            self.log.push(format!("create_empty_texture -> {}", handle));
            Ok(handle)
        }

        fn bind_texture(&mut self, tex: Option<Handle>) {
            match tex {
                Some(t) => self.log.push(format!("bind_texture {}", t)),
                None => self.log.push("bind_texture none".into()),
            }
        }

        fn delete_texture(&mut self, tex: Handle) {
            self.log.push(format!("delete_texture {}", tex));
        }

        fn create_vertex_buffer(&mut self, _data: &[f32]) -> Result<Handle, GpuError> {
            let handle = self.alloc();
            self.log.push(format!("create_vertex_buffer -> {}", handle));
            Ok(handle)
        }

        fn create_index_buffer(&mut self, _data: &[u16]) -> Result<Handle, GpuError> {
            let handle = self.alloc();
            self.log.push(format!("create_index_buffer -> {}", handle));
            Ok(handle)
        }

        fn bind_vertex_buffer(&mut self, buf: Option<Handle>) {
            self.log.push(format!("bind_vertex_buffer {:?}", buf));
        }

        fn bind_index_buffer(&mut self, buf: Option<Handle>) {
            self.log.push(format!("bind_index_buffer {:?}", buf));
        }

        fn delete_buffer(&mut self, buf: Handle) {
            self.log.push(format!("delete_buffer {}", buf));
        }

        fn position_attrib_pointer(&mut self, location: u32) {
            self.log.push(format!("position_attrib_pointer {}", location));
        }

        fn disable_attrib(&mut self, location: u32) {
            self.log.push(format!("disable_attrib {}", location));
        }

        fn draw_indexed_quad(&mut self) {
            self.log.push("draw_indexed_quad".into());
            self.draws
                .push((self.last_modelview[12], self.last_modelview[13]));
            self.draw_alphas.push(self.last_alpha);
        }

        fn create_framebuffer(&mut self) -> Result<Handle, GpuError> {
            let handle = self.alloc();
            self.log.push(format!("create_framebuffer -> {}", handle));
            Ok(handle)
        }

        fn attach_depth_buffer(&mut self, fbo: Handle, w: i32, h: i32) -> Result<Handle, GpuError> {
            let handle = self.alloc();
            self.log
                .push(format!("attach_depth_buffer {} {}x{} -> {}", fbo, w, h, handle));
            Ok(handle)
        }

        fn attach_color_texture(&mut self, fbo: Handle, tex: Handle) {
            self.log.push(format!("attach_color_texture {} {}", fbo, tex));
        }

        fn bind_framebuffer(&mut self, fbo: Option<Handle>) {
            match fbo {
                Some(f) => self.log.push(format!("bind_framebuffer {}", f)),
                None => self.log.push("bind_framebuffer none".into()),
            }
        }

        fn delete_framebuffer(&mut self, fbo: Handle) {
            self.log.push(format!("delete_framebuffer {}", fbo));
        }

        fn delete_depth_buffer(&mut self, depth: Handle) {
            self.log.push(format!("delete_depth_buffer {}", depth));
        }

        fn set_viewport(&mut self, x: i32, y: i32, w: i32, h: i32) {
            self.log.push(format!("viewport {} {} {} {}", x, y, w, h));
        }

        fn set_scissor(&mut self, rect: Option<(i32, i32, i32, i32)>) {
            self.log.push(format!("scissor {:?}", rect));
        }

        fn set_blend_mode(&mut self, mode: BlendMode) {
            self.log.push(format!("blend {:?}", mode));
        }

        fn clear(&mut self, r: f32, g: f32, b: f32, a: f32) {
            self.log.push(format!("clear {} {} {} {}", r, g, b, a));
        }
    }
}
