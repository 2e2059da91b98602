use anyhow::{bail, Result};
use renderer::{builtin_source, validate_stage, Renderer, ShaderStage};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, RunArgs};
use crate::config::Settings;
use crate::paths::AppPaths;

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Command::Config) => print_config(&cli.run),
        Some(Command::Check) => check_shaders(),
        None => run_renderer(&cli.run),
    }
}

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Logs go to stderr so `shaderlines config` output stays valid TOML.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the config file (explicit `--config` must exist) and applies CLI
/// overrides on top.
pub fn resolve_settings(args: &RunArgs) -> Result<Settings> {
    let mut settings = match args.config.as_ref() {
        Some(path) => Settings::load(path, true)?,
        None => {
            let paths = AppPaths::discover()?;
            tracing::debug!(config = %paths.config_dir().display(), "resolved shaderlines paths");
            Settings::load(&paths.config_file(), false)?
        }
    };
    settings.apply_overrides(args)?;
    Ok(settings)
}

fn run_renderer(args: &RunArgs) -> Result<()> {
    let settings = resolve_settings(args)?;
    tracing::debug!(?settings, "resolved configuration");
    let mut renderer = Renderer::new(settings.renderer_config());
    renderer.run()
}

fn print_config(args: &RunArgs) -> Result<()> {
    let settings = resolve_settings(args)?;
    print!("{}", settings.to_toml()?);
    Ok(())
}

fn check_shaders() -> Result<()> {
    let mut failures = 0usize;
    for stage in [ShaderStage::Vertex, ShaderStage::Fragment] {
        match validate_stage(stage, builtin_source(stage)) {
            Ok(()) => println!("{stage:<8} ok"),
            Err(err) => {
                failures += 1;
                println!("{stage:<8} FAILED");
                eprintln!("{err}");
            }
        }
    }
    if failures > 0 {
        bail!("{failures} shader stage(s) failed validation");
    }
    Ok(())
}
