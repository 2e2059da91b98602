use std::borrow::Cow;

use crate::error::{ShaderError, ShaderStage};

/// Passthrough vertex stage; clip-space corners arrive in `aPosition`.
pub const VERTEX_SHADER_GLSL: &str = r"#version 450
layout(location = 0) in vec2 aPosition;

void main() {
    gl_Position = vec4(aPosition, 0.0, 1.0);
}
";

/// Concentric mosaic ring lines. Mirrors [`crate::shading`] step for step.
///
/// The uniform block layout must match `ShaderLinesUniforms` in
/// `gpu/uniforms.rs`.
pub const FRAGMENT_SHADER_GLSL: &str = r"#version 450
layout(location = 0) out vec4 outColor;

layout(std140, set = 0, binding = 0) uniform ShaderLinesParams {
    vec2 resolution;
    float time;
    float padding;
} params;

const vec2 MOSAIC_SCALE = vec2(4.0, 2.0);
const vec2 SCREEN_SIZE = vec2(256.0, 256.0);
const float LINE_WIDTH = 0.0008;

float hash1(float x) {
    return fract(sin(x) * 1e4);
}

float ring_sum(float t, float radius, float channel) {
    float sum = 0.0;
    for (int i = 0; i < 5; i++) {
        sum += LINE_WIDTH * float(i * i) /
               abs(fract(t - 0.01 * channel + float(i) * 0.01) - radius);
    }
    return sum;
}

void main() {
    // Framebuffer origin is top-left; the effect is defined bottom-left.
    vec2 fragCoord = vec2(gl_FragCoord.x, params.resolution.y - gl_FragCoord.y);
    vec2 uv = (fragCoord * 2.0 - params.resolution) / min(params.resolution.x, params.resolution.y);

    vec2 cells = SCREEN_SIZE / MOSAIC_SCALE;
    uv = floor(uv * cells) / cells;

    float t = params.time * 0.06 + hash1(uv.x) * 0.4;
    float radius = length(uv);

    float c0 = ring_sum(t, radius, 0.0);
    float c1 = ring_sum(t, radius, 1.0);
    float c2 = ring_sum(t, radius, 2.0);

    outColor = vec4(c2, c1, c0, 1.0);
}
";

/// Source text for a stage of the built-in program.
pub fn builtin_source(stage: ShaderStage) -> &'static str {
    match stage {
        ShaderStage::Vertex => VERTEX_SHADER_GLSL,
        ShaderStage::Fragment => FRAGMENT_SHADER_GLSL,
    }
}

/// Parses and validates GLSL for `stage` without touching a GPU.
///
/// Front-end and validator diagnostics are folded into
/// [`ShaderError::Compile`] so they surface as the stage's info log.
pub fn validate_stage(stage: ShaderStage, source: &str) -> Result<(), ShaderError> {
    use wgpu::naga::front::glsl::{Frontend, Options};
    use wgpu::naga::valid::{Capabilities, ValidationFlags, Validator};

    let module = Frontend::default()
        .parse(&Options::from(stage.to_naga()), source)
        .map_err(|errors| ShaderError::Compile {
            stage,
            log: errors.to_string(),
        })?;

    Validator::new(ValidationFlags::all(), Capabilities::default())
        .validate(&module)
        .map_err(|err| ShaderError::Compile {
            stage,
            log: err.into_inner().to_string(),
        })?;

    Ok(())
}

/// Compiles one stage into a module, reporting validation failures.
pub(crate) fn compile_stage(
    device: &wgpu::Device,
    stage: ShaderStage,
    source: &str,
) -> Result<wgpu::ShaderModule, ShaderError> {
    validate_stage(stage, source)?;

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(match stage {
            ShaderStage::Vertex => "shader lines vertex",
            ShaderStage::Fragment => "shader lines fragment",
        }),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(source.to_owned()),
            stage: stage.to_naga(),
            defines: &[],
        },
    });
    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        return Err(ShaderError::Compile {
            stage,
            log: err.to_string(),
        });
    }

    Ok(module)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_vertex_stage_validates() {
        validate_stage(ShaderStage::Vertex, VERTEX_SHADER_GLSL).expect("vertex stage");
    }

    #[test]
    fn builtin_fragment_stage_validates() {
        validate_stage(ShaderStage::Fragment, FRAGMENT_SHADER_GLSL).expect("fragment stage");
    }

    #[test]
    fn broken_fragment_reports_stage() {
        let source = r"#version 450
layout(location = 0) out vec4 outColor;
void main() {
    outColor = vec4(undeclared_value, 0.0, 0.0, 1.0);
}
";
        let err = validate_stage(ShaderStage::Fragment, source).unwrap_err();
        match err {
            ShaderError::Compile { stage, log } => {
                assert_eq!(stage, ShaderStage::Fragment);
                assert!(!log.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    fn fragment_line(needle: &str) {
        assert!(
            FRAGMENT_SHADER_GLSL
                .lines()
                .any(|line| line.trim() == needle),
            "fragment shader is missing `{needle}`"
        );
    }

    #[test]
    fn fragment_constants_match_cpu_mirror() {
        use crate::shading::{LINE_WIDTH, MOSAIC_SCALE, MOSAIC_SCREEN_SIZE, RING_COUNT};

        fragment_line(&format!(
            "const vec2 MOSAIC_SCALE = vec2({:?}, {:?});",
            MOSAIC_SCALE[0], MOSAIC_SCALE[1]
        ));
        fragment_line(&format!(
            "const vec2 SCREEN_SIZE = vec2({:?}, {:?});",
            MOSAIC_SCREEN_SIZE[0], MOSAIC_SCREEN_SIZE[1]
        ));
        fragment_line(&format!("const float LINE_WIDTH = {LINE_WIDTH:?};"));
        fragment_line(&format!("for (int i = 0; i < {RING_COUNT}; i++) {{"));
    }

    #[test]
    fn fragment_formulas_match_cpu_mirror() {
        use crate::shading::{CHANNEL_OFFSET, HASH_WEIGHT, PHASE_RATE, RING_SPACING};

        fragment_line("vec2 fragCoord = vec2(gl_FragCoord.x, params.resolution.y - gl_FragCoord.y);");
        fragment_line(
            "vec2 uv = (fragCoord * 2.0 - params.resolution) / min(params.resolution.x, params.resolution.y);",
        );
        fragment_line("vec2 cells = SCREEN_SIZE / MOSAIC_SCALE;");
        fragment_line("uv = floor(uv * cells) / cells;");
        fragment_line(&format!(
            "float t = params.time * {PHASE_RATE:?} + hash1(uv.x) * {HASH_WEIGHT:?};"
        ));
        fragment_line("return fract(sin(x) * 1e4);");
        fragment_line("sum += LINE_WIDTH * float(i * i) /");
        fragment_line(&format!(
            "abs(fract(t - {CHANNEL_OFFSET:?} * channel + float(i) * {RING_SPACING:?}) - radius);"
        ));
        fragment_line("float radius = length(uv);");
    }

    #[test]
    fn fragment_output_reverses_channels() {
        fragment_line("float c0 = ring_sum(t, radius, 0.0);");
        fragment_line("float c1 = ring_sum(t, radius, 1.0);");
        fragment_line("float c2 = ring_sum(t, radius, 2.0);");
        fragment_line("outColor = vec4(c2, c1, c0, 1.0);");
    }

    #[test]
    fn fragment_declares_the_two_uniforms() {
        assert!(FRAGMENT_SHADER_GLSL.contains("vec2 resolution;"));
        assert!(FRAGMENT_SHADER_GLSL.contains("float time;"));
        assert!(VERTEX_SHADER_GLSL.contains("in vec2 aPosition"));
    }
}
