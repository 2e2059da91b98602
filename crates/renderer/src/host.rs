//! The seam between a surface host and the shader-lines program.
//!
//! A host (the `winit` window in [`crate::window`], or a test harness)
//! drives [`SurfaceCallbacks`]; [`ShaderLinesRenderer`] turns those callbacks
//! into calls on a [`GraphicsBackend`]:
//!
//! ```text
//!   host ── created ──▶ create_program ─▶ (re-push last viewport)
//!        ── changed ──▶ set_viewport ─▶ push_resolution
//!        ── draw    ──▶ clock.advance ─▶ push_time ─▶ draw_quad
//!                                        (or clear(fallback) if setup failed)
//! ```

use std::time::Instant;

use crate::clock::{AnimationClock, ClockMode};
use crate::compile::{FRAGMENT_SHADER_GLSL, VERTEX_SHADER_GLSL};
use crate::error::{FrameError, ShaderError};
use crate::types::ClearColor;

/// Lifecycle entry points a surface host invokes, all from the render thread.
pub trait SurfaceCallbacks {
    /// Called once per surface lifetime, before any other callback.
    fn on_surface_created(&mut self) -> Result<(), ShaderError>;
    /// Called whenever the surface's pixel dimensions change.
    fn on_surface_changed(&mut self, width: u32, height: u32);
    /// Called continuously at the display cadence.
    fn on_draw_frame(&mut self) -> Result<(), FrameError>;
}

/// GPU operations the renderer needs; one implementation per graphics API.
pub trait GraphicsBackend {
    /// Linked program plus whatever it needs to receive uniforms.
    type Program;

    fn create_program(&mut self, vertex: &str, fragment: &str)
        -> Result<Self::Program, ShaderError>;
    fn set_viewport(&mut self, width: u32, height: u32);
    fn push_resolution(&mut self, program: &Self::Program, width: f32, height: f32);
    fn push_time(&mut self, program: &Self::Program, time: f32);
    /// Draws the full-screen quad with `program` and presents the frame.
    fn draw_quad(&mut self, program: &Self::Program) -> Result<(), FrameError>;
    /// Presents a frame cleared to `color` without running any program.
    fn clear(&mut self, color: ClearColor) -> Result<(), FrameError>;
}

/// Surface dimensions in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

enum ProgramState<P> {
    Uninitialised,
    Ready(P),
    Failed(ShaderError),
}

/// Owns the program, clock, and viewport for one shader-lines surface.
pub struct ShaderLinesRenderer<B: GraphicsBackend> {
    backend: B,
    program: ProgramState<B::Program>,
    clock: AnimationClock,
    viewport: Option<Viewport>,
    fallback: ClearColor,
}

/// Renderer state that outlives a surface: clock, last viewport, and
/// fallback colour. Produced by [`ShaderLinesRenderer::suspend`] when the
/// graphics context has to be torn down and rebuilt.
#[derive(Debug, Clone)]
pub struct SuspendedRenderer {
    clock: AnimationClock,
    viewport: Option<Viewport>,
    fallback: ClearColor,
}

impl SuspendedRenderer {
    pub fn new(clock_mode: ClockMode, fallback: ClearColor) -> Self {
        Self {
            clock: AnimationClock::new(clock_mode),
            viewport: None,
            fallback,
        }
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    /// Attaches a fresh backend. Call `on_surface_created` next.
    pub fn resume<B: GraphicsBackend>(self, backend: B) -> ShaderLinesRenderer<B> {
        ShaderLinesRenderer {
            backend,
            program: ProgramState::Uninitialised,
            clock: self.clock,
            viewport: self.viewport,
            fallback: self.fallback,
        }
    }
}

impl<B: GraphicsBackend> ShaderLinesRenderer<B> {
    pub fn new(backend: B, clock_mode: ClockMode, fallback: ClearColor) -> Self {
        SuspendedRenderer::new(clock_mode, fallback).resume(backend)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Releases the backend and program, keeping what the next surface needs
    /// to resume the animation where it stopped.
    pub fn suspend(self) -> (B, SuspendedRenderer) {
        let suspended = SuspendedRenderer {
            clock: self.clock,
            viewport: self.viewport,
            fallback: self.fallback,
        };
        // The program references backend resources; release it first.
        drop(self.program);
        (self.backend, suspended)
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Setup failure from the last `on_surface_created`, if any.
    pub fn program_error(&self) -> Option<&ShaderError> {
        match &self.program {
            ProgramState::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.program, ProgramState::Ready(_))
    }
}

impl<B: GraphicsBackend> SurfaceCallbacks for ShaderLinesRenderer<B> {
    fn on_surface_created(&mut self) -> Result<(), ShaderError> {
        match self
            .backend
            .create_program(VERTEX_SHADER_GLSL, FRAGMENT_SHADER_GLSL)
        {
            Ok(program) => {
                if let Some(viewport) = self.viewport {
                    self.backend.set_viewport(viewport.width, viewport.height);
                    self.backend.push_resolution(
                        &program,
                        viewport.width as f32,
                        viewport.height as f32,
                    );
                }
                tracing::info!("shader lines program ready");
                self.program = ProgramState::Ready(program);
                Ok(())
            }
            Err(err) => {
                tracing::error!(
                    error = %err,
                    "shader lines program setup failed; drawing fallback colour"
                );
                self.program = ProgramState::Failed(err.clone());
                Err(err)
            }
        }
    }

    fn on_surface_changed(&mut self, width: u32, height: u32) {
        tracing::debug!(width, height, "surface changed");
        self.viewport = Some(Viewport { width, height });
        self.backend.set_viewport(width, height);
        if let ProgramState::Ready(program) = &self.program {
            self.backend
                .push_resolution(program, width as f32, height as f32);
        }
    }

    fn on_draw_frame(&mut self) -> Result<(), FrameError> {
        let time = self.clock.advance(Instant::now());
        match &self.program {
            ProgramState::Ready(program) => {
                self.backend.push_time(program, time);
                self.backend.draw_quad(program)
            }
            ProgramState::Uninitialised | ProgramState::Failed(_) => {
                self.backend.clear(self.fallback)
            }
        }
    }
}
