// sprite_gl
// copyright sprite_gl contributors 2024~2026

//! GLSL sources for the built-in quad shader.
//!
//! The unit quad's positions double as its texture coordinates, so the vertex
//! stage only needs the one attribute. Sprites that want anything fancier load
//! their own program and draw through the with-shader entry points; such a
//! program receives the same uniforms and may declare any subset of them.

pub const QUAD_VERTEX_SRC: &str = "
attribute vec2 aPosition;

uniform mat4 uProjection;
uniform mat4 uModelView;

varying vec2 vTexCoord;

void main() {
    vTexCoord = aPosition;
    gl_Position = uProjection * uModelView * vec4(aPosition, 0.0, 1.0);
}
";

pub const QUAD_FRAGMENT_SRC: &str = "
precision mediump float;

varying vec2 vTexCoord;

uniform sampler2D uTexture;
uniform float uAlpha;

void main() {
    vec4 color = texture2D(uTexture, vTexCoord);
    gl_FragColor = vec4(color.rgb, color.a * uAlpha);
}
";
