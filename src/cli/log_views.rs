//! Log-views subcommand - debounce camera events and log settled viewpoints.

use clap::Parser;
use serde_json::Value as JsonValue;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::context::Context;
use crate::models::Camera;

/// Read camera-change events as JSON lines from stdin and log each
/// viewpoint the user settles on.
///
/// Accepts the plotting surface's relayout payload
/// (`{"scene.camera": {"eye": {...}, "up": {...}}}`) or a bare camera.
#[derive(Parser, Debug)]
pub struct LogViewsCommand {
    /// Collection that receives the logged viewpoints.
    #[arg(short, long)]
    pub graph_id: String,
}

/// Extracts the camera from one event line; `None` for unrelated events.
pub fn parse_camera_event(line: &str) -> Option<Camera> {
    let value: JsonValue = serde_json::from_str(line).ok()?;
    let camera = match value.get("scene.camera") {
        Some(camera) => camera.clone(),
        None => value,
    };
    serde_json::from_value(camera).ok()
}

impl LogViewsCommand {
    pub async fn run(self, ctx: &Context) -> color_eyre::Result<()> {
        let mut logger = ctx.interaction_logger(&self.graph_id).ok_or_else(|| {
            color_eyre::eyre::eyre!(
                "Telemetry is not configured; set telemetry.api_key and telemetry.project_id"
            )
        })?;
        tracing::info!(graph_id = %self.graph_id, "Waiting for camera events on stdin");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse_camera_event(line) {
                Some(camera) => {
                    tracing::debug!(eye = ?camera.eye, "Camera changed");
                    logger.on_camera_change(camera);
                }
                None => tracing::debug!(line, "Ignoring non-camera event"),
            }
        }

        logger.flush().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Vec3;

    #[test]
    fn test_parse_relayout_event() {
        let camera = parse_camera_event(
            r#"{"scene.camera":{"up":{"x":0,"y":0,"z":1},"center":{"x":0,"y":0,"z":0},"eye":{"x":1.1,"y":-0.4,"z":0.9}}}"#,
        )
        .unwrap();
        assert_eq!(camera.eye, Vec3::new(1.1, -0.4, 0.9));
        assert_eq!(camera.up, Some(Vec3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_parse_bare_camera() {
        let camera = parse_camera_event(r#"{"eye":{"x":1,"y":2,"z":3}}"#).unwrap();
        assert_eq!(camera, Camera::looking_from(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_ignores_other_events() {
        assert!(parse_camera_event(r#"{"xaxis.range[0]":0.5}"#).is_none());
        assert!(parse_camera_event("not json").is_none());
    }
}
