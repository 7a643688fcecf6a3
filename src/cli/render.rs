//! Render subcommands - build a scene from edge and layout files.

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::context::Context;
use crate::loader::GraphSource;
use crate::models::{Camera, Vec3};
use crate::render::RenderOptions;
use crate::surface::{FileSurface, OutputFormat};

/// Inputs and output shared by both render commands.
#[derive(Args, Debug)]
pub struct SceneArgs {
    /// Semicolon-delimited edge file with `from` and `to` columns.
    pub edges: PathBuf,

    /// Semicolon-delimited layout file with `x`, `y` (and `z`) columns.
    pub layout: PathBuf,

    /// Plot target id; also the output file stem.
    #[arg(short, long, default_value = "graph")]
    pub target: String,

    /// Output format.
    #[arg(long, value_enum, default_value = "html")]
    pub format: OutputFormat,

    /// Output directory.
    #[arg(short, long, default_value = ".")]
    pub out: PathBuf,

    /// Color the seed nodes with the configured highlight styles.
    #[arg(long)]
    pub highlight: bool,
}

impl SceneArgs {
    fn source(&self) -> GraphSource {
        GraphSource::new(&self.edges, &self.layout)
    }

    fn surface(&self) -> FileSurface {
        FileSurface::new(&self.out, self.format)
    }
}

/// Parses `x,y,z` into a vector.
pub fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in '{s}': {e}"))?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!("expected three comma-separated numbers, got '{s}'")),
    }
}

/// Render a 2D graph.
#[derive(Parser, Debug)]
pub struct Render2dCommand {
    #[command(flatten)]
    pub scene: SceneArgs,

    /// Start the animation from a random frame.
    #[arg(long)]
    pub random_view: bool,

    /// Start the animation from this frame (0-based).
    #[arg(long)]
    pub start_index: Option<usize>,
}

impl Render2dCommand {
    pub async fn run(self, ctx: &Context) -> color_eyre::Result<()> {
        let options = RenderOptions {
            random_view: self.random_view,
            fixed_start_index: self.start_index,
            highlights: self
                .scene
                .highlight
                .then(|| ctx.config.style.highlights.clone()),
            ..RenderOptions::planar()
        };

        let mut surface = self.scene.surface();
        let rendered = ctx
            .renderer()
            .render_source(&self.scene.source(), &self.scene.target, &options, &mut surface)
            .await?;

        println!("{}", surface.path_for(&self.scene.target)?.display());
        tracing::debug!(start_index = rendered.start_index, "2D render complete");
        Ok(())
    }
}

/// Render a 3D graph.
#[derive(Parser, Debug)]
pub struct Render3dCommand {
    #[command(flatten)]
    pub scene: SceneArgs,

    /// Place the camera at a random point on a sphere.
    #[arg(long)]
    pub random_view: bool,

    /// Explicit camera eye as `x,y,z`; wins over --random-view.
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    pub eye: Option<Vec3>,

    /// Camera up vector as `x,y,z` (needs --eye).
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true, requires = "eye")]
    pub up: Option<Vec3>,

    /// Collection for logged viewpoints; renders cycle through separated start frames.
    #[arg(long)]
    pub graph_id: Option<String>,
}

impl Render3dCommand {
    pub async fn run(self, ctx: &Context) -> color_eyre::Result<()> {
        let options = RenderOptions {
            random_view: self.random_view,
            camera: self.eye.map(|eye| Camera::new(eye, self.up)),
            telemetry_graph_id: self.graph_id.clone(),
            highlights: self
                .scene
                .highlight
                .then(|| ctx.config.style.highlights.clone()),
            ..RenderOptions::spatial()
        };

        let mut surface = self.scene.surface();
        let rendered = ctx
            .renderer()
            .render_source(&self.scene.source(), &self.scene.target, &options, &mut surface)
            .await?;

        println!("{}", surface.path_for(&self.scene.target)?.display());
        if let Some(graph_id) = &rendered.telemetry_graph_id {
            if ctx.telemetry.is_none() {
                tracing::warn!(graph_id, "Telemetry is not configured; viewpoints will not be logged");
            } else {
                tracing::info!(graph_id, "Pipe camera events into `memograph log-views --graph-id {}`", graph_id);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{App, Command};

    #[test]
    fn test_parse_vec3() {
        assert_eq!(parse_vec3("1, -2.5,3").unwrap(), Vec3::new(1.0, -2.5, 3.0));
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("1,a,3").is_err());
    }

    #[test]
    fn test_render3d_args() {
        let app = App::try_parse_from([
            "memograph",
            "render3d",
            "edges.csv",
            "layout.csv",
            "--eye",
            "-1,0,2",
            "--graph-id",
            "karate",
            "--format",
            "json",
        ])
        .unwrap();

        match app.command {
            Command::Render3d(cmd) => {
                assert_eq!(cmd.eye, Some(Vec3::new(-1.0, 0.0, 2.0)));
                assert_eq!(cmd.graph_id.as_deref(), Some("karate"));
                assert_eq!(cmd.scene.format, OutputFormat::Json);
                assert_eq!(cmd.scene.target, "graph");
            }
            _ => panic!("expected render3d"),
        }
    }

    #[test]
    fn test_up_requires_eye() {
        let result = App::try_parse_from([
            "memograph",
            "render3d",
            "edges.csv",
            "layout.csv",
            "--up",
            "0,0,1",
        ]);
        assert!(result.is_err());
    }
}
