//! CLI module for Memograph.
//!
//! Subcommands:
//! - `render2d`: Render a rotating 2D scene
//! - `render3d`: Render a rotating 3D scene
//! - `log-views`: Log settled camera viewpoints read from stdin

mod log_views;
mod render;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::context::Context;

pub use log_views::{parse_camera_event, LogViewsCommand};
pub use render::{parse_vec3, Render2dCommand, Render3dCommand, SceneArgs};

/// Memograph - rotating node-link graph scenes
#[derive(Parser)]
#[command(name = "memograph")]
#[command(about = "Render rotating graph scenes and log chosen viewpoints")]
#[command(version)]
pub struct App {
    /// Run in verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render a 2D graph with a rotation animation
    Render2d(Render2dCommand),

    /// Render a 3D graph with a rotation animation
    Render3d(Render3dCommand),

    /// Log camera changes (JSON lines on stdin) after each quiet period
    LogViews(LogViewsCommand),
}

impl App {
    /// Run the CLI application.
    pub async fn run(self) -> color_eyre::Result<()> {
        let config = Config::load()?;
        let ctx = Context::new(config);

        match self.command {
            Command::Render2d(cmd) => cmd.run(&ctx).await,
            Command::Render3d(cmd) => cmd.run(&ctx).await,
            Command::LogViews(cmd) => cmd.run(&ctx).await,
        }
    }
}
