use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use renderer::{ClearColor, ClockMode, PresentMode, RendererConfig};
use serde::{Deserialize, Serialize};

use crate::cli::RunArgs;

/// Kept as `f64` so the printed TOML shows the literal value.
const DEFAULT_STEP: f64 = 0.05;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,
    pub animation: AnimationSettings,
    pub fallback: FallbackSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub vsync: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Shader Lines".to_string(),
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationMode {
    #[default]
    FrameStep,
    WallClock,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    pub mode: AnimationMode,
    /// Clock units per frame in `frame-step` mode.
    pub step: f64,
    /// Clock units per second in `wall-clock` mode.
    pub units_per_second: f64,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            mode: AnimationMode::default(),
            step: DEFAULT_STEP,
            // Matches frame-step speed on a 60 Hz display.
            units_per_second: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackSettings {
    pub clear_color: [f64; 4],
}

impl Default for FallbackSettings {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl Settings {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(input)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads `path`, or returns defaults when `required` is false and the
    /// file does not exist.
    pub fn load(path: &Path, required: bool) -> Result<Self> {
        if !required && !path.exists() {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {}", path.display()))?;
        let settings = Self::from_toml_str(&contents)
            .with_context(|| format!("failed to load config file at {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(
                "window dimensions must be greater than zero".to_string(),
            ));
        }
        // Checked after narrowing: the clock runs in f32, where tiny values
        // collapse to zero.
        let step = self.animation.step as f32;
        let units_per_second = self.animation.units_per_second as f32;
        if !step.is_finite() || step <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "animation step must be a positive number, got {}",
                self.animation.step
            )));
        }
        if !units_per_second.is_finite() || units_per_second <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "animation units_per_second must be a positive number, got {}",
                self.animation.units_per_second
            )));
        }
        if let Some(component) = self
            .fallback
            .clear_color
            .iter()
            .find(|c| !(0.0..=1.0).contains(*c))
        {
            return Err(ConfigError::Invalid(format!(
                "fallback clear_color components must be within 0..=1, got {component}"
            )));
        }
        Ok(())
    }

    /// Applies command-line overrides and re-validates.
    pub fn apply_overrides(&mut self, args: &RunArgs) -> Result<()> {
        if let Some(size) = args.size.as_deref() {
            let (width, height) = parse_surface_size(size)?;
            self.window.width = width;
            self.window.height = height;
        }
        if let Some(step) = args.time_step {
            self.animation.step = step;
        }
        if args.wall_clock {
            self.animation.mode = AnimationMode::WallClock;
        }
        if args.no_vsync {
            self.window.vsync = false;
        }
        if let Some(title) = args.title.as_ref() {
            self.window.title = title.clone();
        }
        self.validate()?;
        Ok(())
    }

    pub fn clock_mode(&self) -> ClockMode {
        match self.animation.mode {
            AnimationMode::FrameStep => ClockMode::FrameStep {
                step: self.animation.step as f32,
            },
            AnimationMode::WallClock => ClockMode::WallClock {
                units_per_second: self.animation.units_per_second as f32,
            },
        }
    }

    pub fn renderer_config(&self) -> RendererConfig {
        let [r, g, b, a] = self.fallback.clear_color;
        RendererConfig {
            surface_size: (self.window.width, self.window.height),
            title: self.window.title.clone(),
            present_mode: if self.window.vsync {
                PresentMode::Vsync
            } else {
                PresentMode::Immediate
            },
            clock: self.clock_mode(),
            fallback_color: ClearColor::new(r, g, b, a),
            ..RendererConfig::default()
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize configuration to TOML")
    }
}

pub fn parse_surface_size(spec: &str) -> Result<(u32, u32)> {
    let trimmed = spec.trim();
    let (width, height) = trimmed
        .split_once(['x', 'X', '×'])
        .ok_or_else(|| anyhow::anyhow!("expected WxH format, e.g. 1280x720"))?;

    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid width in size specification"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid height in size specification"))?;

    if width == 0 || height == 0 {
        anyhow::bail!("surface dimensions must be greater than zero");
    }

    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_step_matches_renderer() {
        assert_eq!(DEFAULT_STEP as f32, renderer::DEFAULT_TIME_STEP);
    }

    #[test]
    fn empty_file_yields_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(
            settings.clock_mode(),
            ClockMode::FrameStep { step: 0.05 }
        );
    }

    #[test]
    fn parses_all_sections() {
        let settings = Settings::from_toml_str(
            r#"
[window]
width = 800
height = 600
title = "Rings"
vsync = false

[animation]
mode = "wall-clock"
units_per_second = 2.5

[fallback]
clear_color = [0.2, 0.0, 0.0, 1.0]
"#,
        )
        .unwrap();

        let config = settings.renderer_config();
        assert_eq!(config.surface_size, (800, 600));
        assert_eq!(config.title, "Rings");
        assert_eq!(config.present_mode, PresentMode::Immediate);
        assert_eq!(
            config.clock,
            ClockMode::WallClock {
                units_per_second: 2.5
            }
        );
        assert_eq!(config.fallback_color, ClearColor::new(0.2, 0.0, 0.0, 1.0));
    }

    #[test]
    fn rejects_non_positive_step() {
        let err = Settings::from_toml_str("[animation]\nstep = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_step_that_vanishes_in_f32() {
        let err = Settings::from_toml_str("[animation]\nstep = 1e-50\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err =
            Settings::from_toml_str("[animation]\nunits_per_second = 1e-50\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = Settings::from_toml_str("[animation]\nstep = 1e300\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn smallest_accepted_step_still_advances_clock() {
        let settings = Settings::from_toml_str("[animation]\nstep = 1e-30\n").unwrap();
        let mut clock = renderer::AnimationClock::new(settings.clock_mode());
        let now = std::time::Instant::now();
        let first = clock.advance(now);
        let second = clock.advance(now);
        assert!(first > 0.0);
        assert!(second > first);
    }

    #[test]
    fn rejects_out_of_range_colour() {
        let err =
            Settings::from_toml_str("[fallback]\nclear_color = [1.5, 0.0, 0.0, 1.0]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_values() {
        let err = Settings::from_toml_str("[window]\nwidth = \"wide\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn overrides_take_precedence() {
        let mut settings = Settings::default();
        let args = RunArgs {
            size: Some("1024x768".to_string()),
            time_step: Some(0.1),
            wall_clock: false,
            no_vsync: true,
            title: Some("Override".to_string()),
            config: None,
        };
        settings.apply_overrides(&args).unwrap();
        assert_eq!((settings.window.width, settings.window.height), (1024, 768));
        assert_eq!(settings.clock_mode(), ClockMode::FrameStep { step: 0.1 });
        assert!(!settings.window.vsync);
        assert_eq!(settings.window.title, "Override");
    }

    #[test]
    fn negative_step_override_is_rejected() {
        let mut settings = Settings::default();
        let args = RunArgs {
            time_step: Some(-1.0),
            ..RunArgs::default()
        };
        assert!(settings.apply_overrides(&args).is_err());
    }

    #[test]
    fn surface_size_parsing() {
        assert_eq!(parse_surface_size("1920x1080").unwrap(), (1920, 1080));
        assert_eq!(parse_surface_size(" 640 X 480 ").unwrap(), (640, 480));
        assert!(parse_surface_size("0x10").is_err());
        assert!(parse_surface_size("wide").is_err());
    }

    #[test]
    fn toml_round_trip_preserves_settings() {
        let mut settings = Settings::default();
        settings.animation.mode = AnimationMode::WallClock;
        let rendered = settings.to_toml().unwrap();
        assert!(rendered.contains("mode = \"wall-clock\""));
        assert_eq!(Settings::from_toml_str(&rendered).unwrap(), settings);
    }
}
