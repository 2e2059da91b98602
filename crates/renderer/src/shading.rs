//! CPU mirror of the shader-lines fragment program.
//!
//! Every function here follows the GLSL in [`crate::compile`] operation for
//! operation, in `f32`, so individual pixels can be reasoned about and
//! checked without a GPU. The pipeline per fragment is:
//!
//! ```text
//!   gl_FragCoord ─▶ normalize_uv ─▶ quantize_uv ─▶ phase ─▶ ring_sums ─▶ (b, g, r) swizzle
//! ```

/// Virtual screen the mosaic grid is derived from.
pub const MOSAIC_SCREEN_SIZE: [f32; 2] = [256.0, 256.0];
/// Divisor applied to [`MOSAIC_SCREEN_SIZE`]; yields 64 × 128 cells per uv unit.
pub const MOSAIC_SCALE: [f32; 2] = [4.0, 2.0];
/// Rate at which the animation clock drives the ring phase.
pub const PHASE_RATE: f32 = 0.06;
/// Weight of the per-column hash in the ring phase.
pub const HASH_WEIGHT: f32 = 0.4;
pub const LINE_WIDTH: f32 = 0.0008;
pub const RING_COUNT: usize = 5;
pub const RING_SPACING: f32 = 0.01;
/// Phase lag between consecutive colour channels.
pub const CHANNEL_OFFSET: f32 = 0.01;
pub const CHANNEL_COUNT: usize = 3;

/// GLSL `fract`: `x - floor(x)`, always in `[0, 1)` for finite input.
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// One-dimensional hash `fract(sin(x) * 1e4)`.
pub fn hash1(x: f32) -> f32 {
    fract(x.sin() * 1e4)
}

/// Cells per uv unit along each axis.
pub fn mosaic_cells() -> [f32; 2] {
    [
        MOSAIC_SCREEN_SIZE[0] / MOSAIC_SCALE[0],
        MOSAIC_SCREEN_SIZE[1] / MOSAIC_SCALE[1],
    ]
}

/// Centres the fragment and scales by the short side of the surface.
pub fn normalize_uv(frag_coord: [f32; 2], resolution: [f32; 2]) -> [f32; 2] {
    let short_side = resolution[0].min(resolution[1]);
    [
        (frag_coord[0] * 2.0 - resolution[0]) / short_side,
        (frag_coord[1] * 2.0 - resolution[1]) / short_side,
    ]
}

/// Snaps uv down onto the mosaic grid (1/64 horizontally, 1/128 vertically).
pub fn quantize_uv(uv: [f32; 2]) -> [f32; 2] {
    let cells = mosaic_cells();
    [
        (uv[0] * cells[0]).floor() / cells[0],
        (uv[1] * cells[1]).floor() / cells[1],
    ]
}

/// Ring phase for a mosaic column at the given clock value.
pub fn phase(time: f32, column: f32) -> f32 {
    time * PHASE_RATE + hash1(column) * HASH_WEIGHT
}

/// Accumulated ring intensity for each colour channel at `radius`.
///
/// Index 0 is the channel with no phase lag; it ends up in the blue output.
pub fn ring_sums(phase: f32, radius: f32) -> [f32; CHANNEL_COUNT] {
    let mut sums = [0.0_f32; CHANNEL_COUNT];
    for (channel, sum) in sums.iter_mut().enumerate() {
        for ring in 0..RING_COUNT {
            let weight = (ring * ring) as f32;
            let ring_phase = phase - CHANNEL_OFFSET * channel as f32 + ring as f32 * RING_SPACING;
            *sum += LINE_WIDTH * weight / (fract(ring_phase) - radius).abs();
        }
    }
    sums
}

/// Every intermediate value computed for one fragment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSample {
    pub uv: [f32; 2],
    pub quantized: [f32; 2],
    pub phase: f32,
    pub sums: [f32; CHANNEL_COUNT],
    pub color: [f32; 4],
}

/// Evaluates the fragment program for one pixel.
pub fn shade_pixel(frag_coord: [f32; 2], resolution: [f32; 2], time: f32) -> PixelSample {
    let uv = normalize_uv(frag_coord, resolution);
    let quantized = quantize_uv(uv);
    let phase = phase(time, quantized[0]);
    let radius = (quantized[0] * quantized[0] + quantized[1] * quantized[1]).sqrt();
    let sums = ring_sums(phase, radius);
    PixelSample {
        uv,
        quantized,
        phase,
        sums,
        color: [sums[2], sums[1], sums[0], 1.0],
    }
}
