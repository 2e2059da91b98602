use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "shaderlines",
    author,
    version,
    about = "Animated full-screen shader lines",
    arg_required_else_help = false
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Configuration file; defaults to `shaderlines.toml` in the config directory.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT")]
    pub size: Option<String>,

    /// Clock units added per frame.
    #[arg(long, value_name = "UNITS")]
    pub time_step: Option<f64>,

    /// Advance the animation with elapsed time instead of per frame.
    #[arg(long)]
    pub wall_clock: bool,

    /// Present frames without waiting for vertical blank.
    #[arg(long)]
    pub no_vsync: bool,

    /// Window title.
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Print the resolved configuration as TOML and exit.
    Config,
    /// Validate the built-in shaders without opening a window.
    Check,
}

pub fn parse() -> Cli {
    Cli::parse()
}
