use bytemuck::Zeroable;
use wgpu::util::DeviceExt;

use crate::compile::compile_stage;
use crate::error::{ShaderError, ShaderStage};

use super::quad::QuadGeometry;
use super::uniforms::{
    ShaderLinesUniforms, UniformLocation, RESOLUTION_LOCATION, TIME_LOCATION, UNIFORM_BLOCK_SIZE,
};

/// Linked shader-lines program: both stages, the pipeline that joins them,
/// and the uniform block they read.
pub struct ShaderProgram {
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) uniform_bind_group: wgpu::BindGroup,
    _vertex_module: wgpu::ShaderModule,
    _fragment_module: wgpu::ShaderModule,
}

impl ShaderProgram {
    /// Compiles both stages and links them into a pipeline targeting
    /// `surface_format`.
    pub(crate) fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, ShaderError> {
        let vertex_module = compile_stage(device, ShaderStage::Vertex, vertex_source)?;
        let fragment_module = compile_stage(device, ShaderStage::Fragment, fragment_source)?;

        // Zeroed so frames drawn before the first resize see resolution (0, 0).
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("shader lines uniforms"),
            contents: bytemuck::bytes_of(&ShaderLinesUniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("shader lines uniform layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(UNIFORM_BLOCK_SIZE),
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shader lines uniform bind group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("shader lines pipeline layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("shader lines pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("main"),
                buffers: &[QuadGeometry::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(ShaderError::Link {
                log: err.to_string(),
            });
        }

        tracing::debug!(?surface_format, "linked shader lines pipeline");

        Ok(Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            _vertex_module: vertex_module,
            _fragment_module: fragment_module,
        })
    }

    /// Location of the `time` uniform, resolved when the program is linked.
    pub fn time_location(&self) -> UniformLocation {
        TIME_LOCATION
    }

    pub fn resolution_location(&self) -> UniformLocation {
        RESOLUTION_LOCATION
    }
}
