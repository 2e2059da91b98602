//! `wgpu` backend for the shader-lines renderer.
//!
//! - `context` owns instance/device/surface wiring, reconfigures the
//!   swapchain on resize, and watches for device loss.
//! - `uniforms` mirrors the std140 `ShaderLinesParams` block; byte offsets
//!   stand in for GL uniform locations.
//! - `program` compiles both stages and links them into a pipeline, turning
//!   validation errors into [`crate::ShaderError`]s.
//! - `quad` holds the persistent four-vertex triangle strip.
//! - `backend` implements [`crate::GraphicsBackend`] on top of the above.

mod backend;
mod context;
mod program;
mod quad;
mod uniforms;

pub use backend::WgpuBackend;
pub use program::ShaderProgram;
pub use uniforms::UniformLocation;
