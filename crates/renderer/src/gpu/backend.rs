use anyhow::Result;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use winit::dpi::PhysicalSize;

use crate::error::{FrameError, ShaderError};
use crate::host::GraphicsBackend;
use crate::types::{ClearColor, PresentMode};

use super::context::GpuContext;
use super::program::ShaderProgram;
use super::quad::QuadGeometry;
use super::uniforms::write_uniform;

/// `wgpu` implementation of [`GraphicsBackend`] for one window surface.
pub struct WgpuBackend {
    context: GpuContext,
    quad: QuadGeometry,
}

impl WgpuBackend {
    /// Builds the device, surface, and persistent quad buffer for `target`.
    pub fn new<T>(target: &T, size: PhysicalSize<u32>, present: PresentMode) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, size, present)?;
        let quad = QuadGeometry::new(&context.device);
        Ok(Self { context, quad })
    }

    fn check_device(&self) -> Result<(), FrameError> {
        match self.context.device_loss.check() {
            Some(reason) => Err(FrameError::ContextLost(reason)),
            None => Ok(()),
        }
    }

    fn acquire_frame(&mut self) -> Result<wgpu::SurfaceTexture, FrameError> {
        self.check_device()?;
        match self.context.surface.get_current_texture() {
            Ok(frame) => Ok(frame),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.context.reconfigure();
                Err(FrameError::SurfaceLost)
            }
            Err(wgpu::SurfaceError::Timeout) => Err(FrameError::Timeout),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                Err(FrameError::ContextLost("out of memory".to_string()))
            }
            Err(other) => Err(FrameError::Other(other.to_string())),
        }
    }

    /// Records one pass that clears to `clear` and optionally draws the quad.
    fn present(
        &mut self,
        clear: ClearColor,
        program: Option<&ShaderProgram>,
    ) -> Result<(), FrameError> {
        let frame = self.acquire_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("shader lines frame"),
                });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("shader lines pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear.into()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            if let Some(program) = program {
                render_pass.set_pipeline(&program.pipeline);
                render_pass.set_bind_group(0, &program.uniform_bind_group, &[]);
                self.quad.draw(&mut render_pass);
            }
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        self.check_device()
    }
}

impl GraphicsBackend for WgpuBackend {
    type Program = ShaderProgram;

    fn create_program(&mut self, vertex: &str, fragment: &str) -> Result<ShaderProgram, ShaderError> {
        ShaderProgram::new(
            &self.context.device,
            self.context.surface_format,
            vertex,
            fragment,
        )
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        // The pass viewport always spans the surface; resizing the surface is
        // the viewport change.
        self.context.resize(PhysicalSize::new(width, height));
    }

    fn push_resolution(&mut self, program: &ShaderProgram, width: f32, height: f32) {
        write_uniform(
            &self.context.queue,
            &program.uniform_buffer,
            program.resolution_location(),
            &[width, height],
        );
    }

    fn push_time(&mut self, program: &ShaderProgram, time: f32) {
        write_uniform(
            &self.context.queue,
            &program.uniform_buffer,
            program.time_location(),
            &time,
        );
    }

    fn draw_quad(&mut self, program: &ShaderProgram) -> Result<(), FrameError> {
        self.present(ClearColor::BLACK, Some(program))
    }

    fn clear(&mut self, color: ClearColor) -> Result<(), FrameError> {
        self.present(color, None)
    }
}
