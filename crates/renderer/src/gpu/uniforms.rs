use std::mem::{offset_of, size_of};

use bytemuck::{Pod, Zeroable};

/// CPU image of the `ShaderLinesParams` std140 block.
#[repr(C, align(16))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct ShaderLinesUniforms {
    pub resolution: [f32; 2],
    pub time: f32,
    pub padding: f32,
}

unsafe impl Zeroable for ShaderLinesUniforms {}
unsafe impl Pod for ShaderLinesUniforms {}

/// Byte offset of a uniform inside the block; plays the role of a GL
/// uniform location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformLocation(pub u64);

pub(crate) const RESOLUTION_LOCATION: UniformLocation =
    UniformLocation(offset_of!(ShaderLinesUniforms, resolution) as u64);
pub(crate) const TIME_LOCATION: UniformLocation =
    UniformLocation(offset_of!(ShaderLinesUniforms, time) as u64);
pub(crate) const UNIFORM_BLOCK_SIZE: u64 = size_of::<ShaderLinesUniforms>() as u64;

/// Uploads `value` into the uniform block at `location`.
pub(crate) fn write_uniform<T: Pod>(
    queue: &wgpu::Queue,
    buffer: &wgpu::Buffer,
    location: UniformLocation,
    value: &T,
) {
    queue.write_buffer(buffer, location.0, bytemuck::bytes_of(value));
}
