use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::error::FrameError;
use crate::gpu::WgpuBackend;
use crate::host::{ShaderLinesRenderer, SuspendedRenderer, SurfaceCallbacks};
use crate::types::{PresentMode, RendererConfig};

/// Opens the window and drives the shader-lines callbacks until it closes.
pub(crate) fn run(config: &RendererConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to initialize event loop")?;
    let (width, height) = config.surface_size;
    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(PhysicalSize::new(width, height))
        .build(&event_loop)
        .context("failed to create window")?;
    let window = Arc::new(window);

    let mut state = WindowState::new(window, config)?;
    let mut fatal: Option<anyhow::Error> = None;
    state.window.request_redraw();

    event_loop
        .run(|event, elwt| {
            // Continuous rendering: redraw as soon as the previous frame is out.
            elwt.set_control_flow(ControlFlow::Poll);

            match event {
                Event::WindowEvent { window_id, event } if window_id == state.window.id() => {
                    match event {
                        WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                            elwt.exit();
                        }
                        WindowEvent::Resized(new_size) => {
                            state.resize(new_size);
                        }
                        WindowEvent::RedrawRequested => {
                            if let Err(err) = state.render_frame() {
                                fatal = Some(err);
                                elwt.exit();
                            }
                        }
                        _ => {}
                    }
                }
                Event::AboutToWait => {
                    state.window.request_redraw();
                }
                _ => {}
            }
        })
        .map_err(|err| anyhow!("event loop error: {err}"))?;

    match fatal {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

enum SurfaceSlot {
    Active(ShaderLinesRenderer<WgpuBackend>),
    Suspended(SuspendedRenderer),
}

/// Window-side surface host.
///
/// Field order matters: the renderer (and its surface) must drop before the
/// window it was created from.
struct WindowState {
    slot: Option<SurfaceSlot>,
    present_mode: PresentMode,
    max_rebuilds: u32,
    rebuild_failures: u32,
    window: Arc<Window>,
}

impl WindowState {
    fn new(window: Arc<Window>, config: &RendererConfig) -> Result<Self> {
        let size = window.inner_size();
        let backend = WgpuBackend::new(window.as_ref(), size, config.present_mode)?;
        let mut renderer = ShaderLinesRenderer::new(backend, config.clock, config.fallback_color);
        if renderer.on_surface_created().is_err() {
            tracing::warn!("continuing with fallback colour");
        }
        if size.width > 0 && size.height > 0 {
            renderer.on_surface_changed(size.width, size.height);
        }
        tracing::info!(
            width = size.width,
            height = size.height,
            clock = ?config.clock,
            "shader lines surface ready"
        );

        Ok(Self {
            slot: Some(SurfaceSlot::Active(renderer)),
            present_mode: config.present_mode,
            max_rebuilds: config.max_context_rebuilds.max(1),
            rebuild_failures: 0,
            window,
        })
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        // Minimised windows report zero; keep the last real size.
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        if let Some(SurfaceSlot::Active(renderer)) = self.slot.as_mut() {
            renderer.on_surface_changed(new_size.width, new_size.height);
        }
    }

    fn render_frame(&mut self) -> Result<()> {
        match self.slot.take() {
            Some(SurfaceSlot::Active(mut renderer)) => {
                match renderer.on_draw_frame() {
                    Ok(()) => {
                        self.rebuild_failures = 0;
                        self.slot = Some(SurfaceSlot::Active(renderer));
                    }
                    Err(FrameError::ContextLost(reason)) => {
                        tracing::error!(%reason, "GPU context lost; rebuilding surface");
                        let (backend, suspended) = renderer.suspend();
                        drop(backend);
                        self.slot = Some(SurfaceSlot::Suspended(suspended));
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "frame skipped");
                        self.slot = Some(SurfaceSlot::Active(renderer));
                    }
                }
                Ok(())
            }
            Some(SurfaceSlot::Suspended(suspended)) => self.rebuild(suspended),
            None => Ok(()),
        }
    }

    fn rebuild(&mut self, suspended: SuspendedRenderer) -> Result<()> {
        let size = self.window.inner_size();
        match WgpuBackend::new(self.window.as_ref(), size, self.present_mode) {
            Ok(backend) => {
                let mut renderer = suspended.resume(backend);
                if renderer.on_surface_created().is_err() {
                    tracing::warn!("rebuilt surface is using the fallback colour");
                }
                if size.width > 0 && size.height > 0 {
                    renderer.on_surface_changed(size.width, size.height);
                }
                tracing::info!("surface rebuilt after context loss");
                self.slot = Some(SurfaceSlot::Active(renderer));
                Ok(())
            }
            Err(err) => {
                self.rebuild_failures += 1;
                if self.rebuild_failures >= self.max_rebuilds {
                    return Err(err.context(format!(
                        "GPU context could not be rebuilt after {} attempts",
                        self.rebuild_failures
                    )));
                }
                tracing::warn!(
                    error = %err,
                    attempt = self.rebuild_failures,
                    "failed to rebuild GPU context; retrying next frame"
                );
                self.slot = Some(SurfaceSlot::Suspended(suspended));
                Ok(())
            }
        }
    }
}
