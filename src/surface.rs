//! Plotting surfaces that accept scene descriptors and animation frames.
//!
//! A surface is created with `new_plot` and then receives its keyframes
//! through `add_frames`, matching the two-call contract of browser
//! plotting libraries. [`FileSurface`] persists both as JSON or as a
//! standalone HTML page that drives plotly.js.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use clap::ValueEnum;
use serde::Serialize;

use crate::error::SurfaceError;
use crate::scene::{SceneDescriptor, TraceFrame};

/// Receives scenes and keyframes for a named plot target.
#[async_trait]
pub trait PlottingSurface: Send {
    /// Creates (or replaces) the plot for `target`.
    async fn new_plot(&mut self, target: &str, scene: &SceneDescriptor)
        -> Result<(), SurfaceError>;

    /// Registers keyframes for an existing plot, in playback order.
    async fn add_frames(&mut self, target: &str, frames: &[TraceFrame])
        -> Result<(), SurfaceError>;
}

/// On-disk representation of one plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `<target>.json`: `{data, layout, config, frames}`.
    Json,
    /// `<target>.html`: a page that loads plotly.js and plays the frames.
    Html,
}

impl OutputFormat {
    fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Html => "html",
        }
    }
}

#[derive(Serialize)]
struct PlotDocument<'a> {
    #[serde(flatten)]
    scene: &'a SceneDescriptor,
    frames: &'a [TraceFrame],
}

/// Writes every plot target to a file in `out_dir`.
///
/// The file is rewritten on each call, so after `add_frames` it holds the
/// scene and the frames together.
pub struct FileSurface {
    out_dir: PathBuf,
    format: OutputFormat,
    plots: HashMap<String, (SceneDescriptor, Vec<TraceFrame>)>,
}

impl FileSurface {
    pub fn new(out_dir: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            out_dir: out_dir.into(),
            format,
            plots: HashMap::new(),
        }
    }

    /// Path the plot for `target` is written to.
    ///
    /// Targets are plain file stems; anything that could resolve outside
    /// `out_dir` is rejected.
    pub fn path_for(&self, target: &str) -> Result<PathBuf, SurfaceError> {
        let is_stem = !target.is_empty()
            && target != "."
            && target != ".."
            && !target.contains(|c: char| c == '/' || c == '\\')
            && !Path::new(target).is_absolute();
        if !is_stem {
            return Err(SurfaceError::InvalidTarget(target.to_string()));
        }
        Ok(self
            .out_dir
            .join(format!("{}.{}", target, self.format.extension())))
    }

    async fn write(&self, target: &str) -> Result<PathBuf, SurfaceError> {
        let (scene, frames) = self
            .plots
            .get(target)
            .ok_or_else(|| SurfaceError::UnknownTarget(target.to_string()))?;
        let document = PlotDocument { scene, frames };

        let contents = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&document)?,
            OutputFormat::Html => html_page(target, &serde_json::to_string(&document)?)?,
        };

        let path = self.path_for(target)?;
        write_file(&path, contents).await?;
        Ok(path)
    }
}

async fn write_file(path: &Path, contents: String) -> Result<(), SurfaceError> {
    let io_err = |source| SurfaceError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    tokio::fs::write(path, contents).await.map_err(io_err)
}

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Standalone page: creates the plot, registers frames, and prints camera
/// changes to the console as JSON lines for `memograph log-views`.
fn html_page(target: &str, document_json: &str) -> Result<String, SurfaceError> {
    let target_js = serde_json::to_string(target)?;
    let document_js = document_json.replace("</", "<\\/");
    let title = target
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;");

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{PLOTLY_CDN}"></script>
</head>
<body style="margin:0">
<div id="{title}" style="width:100vw;height:100vh"></div>
<script>
const target = {target_js};
const doc = {document_js};
Plotly.newPlot(target, doc.data, doc.layout, doc.config)
  .then(() => Plotly.addFrames(target, doc.frames))
  .then(() => {{
    document.getElementById(target).on("plotly_relayout", (event) => {{
      if ("scene.camera" in event) console.log(JSON.stringify(event));
    }});
  }});
</script>
</body>
</html>
"#
    ))
}

#[async_trait]
impl PlottingSurface for FileSurface {
    async fn new_plot(
        &mut self,
        target: &str,
        scene: &SceneDescriptor,
    ) -> Result<(), SurfaceError> {
        self.path_for(target)?;
        self.plots
            .insert(target.to_string(), (scene.clone(), Vec::new()));
        let path = self.write(target).await?;
        tracing::info!(target, path = %path.display(), "Created plot");
        Ok(())
    }

    async fn add_frames(
        &mut self,
        target: &str,
        frames: &[TraceFrame],
    ) -> Result<(), SurfaceError> {
        let (_, registered) = self
            .plots
            .get_mut(target)
            .ok_or_else(|| SurfaceError::UnknownTarget(target.to_string()))?;
        registered.extend_from_slice(frames);
        let path = self.write(target).await?;
        tracing::info!(target, frames = frames.len(), path = %path.display(), "Registered frames");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::AxisRange;
    use crate::models::{Edge, Frame, Graph, Point2};
    use crate::scene::{Axis, DragMode, Layout, Margin, PlotConfig};
    use crate::trace::{build_traces, LineStyle, MarkerStyle, TraceStyle};
    use tempfile::tempdir;

    fn scene() -> SceneDescriptor {
        let graph = Graph::new(
            vec![Edge::new(0, 1)],
            vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)],
        )
        .unwrap();
        let style = TraceStyle::new(LineStyle::default(), MarkerStyle::new("#1f77b4", 5.0));
        SceneDescriptor {
            traces: build_traces(&graph, &style),
            layout: Layout {
                margin: Margin::default(),
                dragmode: DragMode::Pan,
                showlegend: false,
                xaxis: Some(Axis::hidden(AxisRange(-0.05, 1.05))),
                yaxis: Some(Axis::hidden(AxisRange(-0.05, 1.05))),
                scene: None,
                sliders: Vec::new(),
                updatemenus: Vec::new(),
            },
            config: PlotConfig::default(),
        }
    }

    #[tokio::test]
    async fn test_json_surface_writes_scene_then_frames() {
        let dir = tempdir().unwrap();
        let mut surface = FileSurface::new(dir.path(), OutputFormat::Json);
        let scene = scene();

        surface.new_plot("plot", &scene).await.unwrap();
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("plot.json")).unwrap())
                .unwrap();
        assert_eq!(written["data"].as_array().unwrap().len(), 2);
        assert_eq!(written["frames"], serde_json::json!([]));

        let frames = vec![Frame::new("frame1", scene.traces.clone())];
        surface.add_frames("plot", &frames).await.unwrap();
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(surface.path_for("plot").unwrap()).unwrap())
                .unwrap();
        assert_eq!(written["frames"][0]["name"], "frame1");
        assert_eq!(written["layout"]["dragmode"], "pan");
        assert_eq!(written["config"]["displaylogo"], false);
    }

    #[tokio::test]
    async fn test_add_frames_requires_plot() {
        let dir = tempdir().unwrap();
        let mut surface = FileSurface::new(dir.path(), OutputFormat::Json);
        let err = surface.add_frames("missing", &[]).await.unwrap_err();
        assert!(matches!(err, SurfaceError::UnknownTarget(ref t) if t == "missing"));
    }

    #[tokio::test]
    async fn test_rejects_targets_outside_out_dir() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        let mut surface = FileSurface::new(&out, OutputFormat::Json);

        for target in ["../escape", "nested/plot", "..", "", r"win\plot"] {
            let err = surface.new_plot(target, &scene()).await.unwrap_err();
            assert!(
                matches!(err, SurfaceError::InvalidTarget(ref t) if t == target),
                "{target:?} was accepted"
            );
        }
        assert!(!dir.path().join("escape.json").exists());
        assert!(!out.exists());
        assert_eq!(surface.path_for("plot-1").unwrap(), out.join("plot-1.json"));
    }

    #[tokio::test]
    async fn test_html_surface_embeds_plotly_calls() {
        let dir = tempdir().unwrap();
        let mut surface = FileSurface::new(dir.path(), OutputFormat::Html);
        surface.new_plot("graph-a", &scene()).await.unwrap();
        surface.add_frames("graph-a", &[]).await.unwrap();

        let page = std::fs::read_to_string(dir.path().join("graph-a.html")).unwrap();
        assert!(page.contains("Plotly.newPlot(target"));
        assert!(page.contains("Plotly.addFrames(target, doc.frames)"));
        assert!(page.contains(r#"const target = "graph-a";"#));
        assert!(page.contains("plotly_relayout"));
    }
}
