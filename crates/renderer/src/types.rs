use crate::clock::ClockMode;

/// RGBA colour presented when the shader program is unavailable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl ClearColor {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for ClearColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<ClearColor> for wgpu::Color {
    fn from(color: ClearColor) -> Self {
        wgpu::Color {
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        }
    }
}

/// Presentation pacing requested for the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentMode {
    /// Wait for vertical blank; one frame per display refresh.
    #[default]
    Vsync,
    /// Present as soon as a frame is ready (immediate, or mailbox if that is
    /// all the surface offers).
    Immediate,
}

/// Immutable configuration passed to the renderer at start-up.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Initial window size in physical pixels.
    pub surface_size: (u32, u32),
    pub title: String,
    pub present_mode: PresentMode,
    /// How the `time` uniform advances between frames.
    pub clock: ClockMode,
    pub fallback_color: ClearColor,
    /// Consecutive rebuild attempts allowed after the GPU context is lost.
    pub max_context_rebuilds: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            surface_size: (1280, 720),
            title: "Shader Lines".to_string(),
            present_mode: PresentMode::default(),
            clock: ClockMode::default(),
            fallback_color: ClearColor::default(),
            max_context_rebuilds: 3,
        }
    }
}
