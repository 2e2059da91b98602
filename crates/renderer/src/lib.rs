//! Renderer crate for shaderlines.
//!
//! Draws an animated field of concentric, mosaic-quantised ring lines with a
//! single full-screen fragment shader. The flow is:
//!
//! ```text
//!   CLI / shaderlines
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ window (winit host) ──▶ SurfaceCallbacks
//!                                                   │
//!                         ShaderLinesRenderer ◀─────┘
//!                           │ created  ─▶ compile + link (ShaderError on failure)
//!                           │ changed  ─▶ resolution uniform
//!                           └ draw     ─▶ AnimationClock ─▶ time uniform ─▶ quad
//! ```
//!
//! [`ShaderLinesRenderer`] is generic over [`GraphicsBackend`]; the `wgpu`
//! implementation lives in `gpu`. [`shading`] mirrors the fragment shader on
//! the CPU so individual pixels can be checked without a GPU.

use anyhow::Result;

mod clock;
mod compile;
mod error;
mod gpu;
mod host;
pub mod shading;
mod types;
mod window;

pub use clock::{AnimationClock, ClockMode, DEFAULT_TIME_STEP};
pub use compile::{builtin_source, validate_stage, FRAGMENT_SHADER_GLSL, VERTEX_SHADER_GLSL};
pub use error::{FrameError, ShaderError, ShaderStage};
pub use gpu::{ShaderProgram, UniformLocation, WgpuBackend};
pub use host::{GraphicsBackend, ShaderLinesRenderer, SurfaceCallbacks, SuspendedRenderer, Viewport};
pub use types::{ClearColor, PresentMode, RendererConfig};

/// Entry point that owns the configuration and runs the window host.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Opens the window and renders until it is closed or the GPU context
    /// cannot be rebuilt.
    pub fn run(&mut self) -> Result<()> {
        tracing::info!(
            width = self.config.surface_size.0,
            height = self.config.surface_size.1,
            present = ?self.config.present_mode,
            "starting shader lines renderer"
        );
        window::run(&self.config)
    }
}
