//! End-to-end tests: files on disk through to the plotting surface.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use memograph::config::Config;
use memograph::error::{AppError, LoadError, SurfaceError};
use memograph::loader::GraphSource;
use memograph::models::{Camera, Vec3};
use memograph::render::Renderer;
use memograph::scene::{SceneDescriptor, TraceFrame};
use memograph::surface::PlottingSurface;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::NamedTempFile;

/// Records every call in order.
#[derive(Default)]
struct MemorySurface {
    calls: Vec<String>,
    scenes: HashMap<String, SceneDescriptor>,
    frames: HashMap<String, Vec<TraceFrame>>,
}

#[async_trait]
impl PlottingSurface for MemorySurface {
    async fn new_plot(
        &mut self,
        target: &str,
        scene: &SceneDescriptor,
    ) -> Result<(), SurfaceError> {
        self.calls.push(format!("new_plot:{target}"));
        self.scenes.insert(target.to_string(), scene.clone());
        Ok(())
    }

    async fn add_frames(
        &mut self,
        target: &str,
        frames: &[TraceFrame],
    ) -> Result<(), SurfaceError> {
        self.calls.push(format!("add_frames:{target}"));
        self.frames
            .entry(target.to_string())
            .or_default()
            .extend_from_slice(frames);
        Ok(())
    }
}

fn write_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

/// Compares a serialized trace column, with gaps, up to rounding.
fn assert_column(actual: &serde_json::Value, expected: &[Option<f64>]) {
    let actual = actual.as_array().unwrap();
    assert_eq!(actual.len(), expected.len());
    for (got, want) in actual.iter().zip(expected) {
        match want {
            Some(want) => assert!((got.as_f64().unwrap() - want).abs() < 1e-9, "{got} != {want}"),
            None => assert!(got.is_null(), "{got} is not a gap"),
        }
    }
}

fn renderer(frames: usize) -> Renderer<StdRng> {
    let mut config = Config::default();
    config.animation.frames = frames;
    Renderer::with_rng(Arc::new(config), StdRng::seed_from_u64(5))
}

#[tokio::test]
async fn test_render_2d_path_graph() {
    let edges = write_file("from;to\n0;1\n1;2\n");
    let layout = write_file("x;y\n0;0\n1;0\n1;1\n");
    let source = GraphSource::new(edges.path(), layout.path());
    let mut surface = MemorySurface::default();

    let rendered = renderer(4)
        .render_2d(&source, "plot", false, None, &mut surface)
        .await
        .unwrap();

    assert_eq!(surface.calls, vec!["new_plot:plot", "add_frames:plot"]);
    assert_eq!(surface.frames["plot"].len(), 5);
    assert_eq!(surface.frames["plot"], rendered.frames);

    // Frame 1 is the unrotated graph.
    let json = serde_json::to_value(&surface.scenes["plot"]).unwrap();
    assert_column(
        &json["data"][0]["x"],
        &[Some(0.0), Some(1.0), None, Some(1.0), Some(1.0), None],
    );
    assert_column(
        &json["data"][0]["y"],
        &[Some(0.0), Some(0.0), None, Some(0.0), Some(1.0), None],
    );
    assert_eq!(json["data"][1]["text"][2], "Node 2");
    assert_eq!(json["layout"]["sliders"][0]["steps"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_render_2d_start_index_closes_loop() {
    let edges = write_file("from;to\n0;1\n1;2\n");
    let layout = write_file("x;y\n0;0\n1;0\n1;1\n");
    let source = GraphSource::new(edges.path(), layout.path());
    let mut surface = MemorySurface::default();

    let rendered = renderer(4)
        .render_2d(&source, "plot", false, Some(2), &mut surface)
        .await
        .unwrap();

    let names: Vec<&str> = rendered.frames.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["frame1", "frame2", "frame3", "frame4", "frame5"]);
    assert_eq!(rendered.frames[4].data, rendered.frames[0].data);
    assert_eq!(rendered.scene.traces, rendered.frames[0].data);
}

#[tokio::test]
async fn test_render_3d_explicit_camera() {
    let edges = write_file("from;to\n0;1\n");
    let layout = write_file("x;y;z\n0;0;0\n1;1;1\n");
    let source = GraphSource::new(edges.path(), layout.path());
    let mut surface = MemorySurface::default();
    let camera = Camera::new(Vec3::new(0.0, -2.0, 0.5), Some(Vec3::new(0.0, 0.0, 1.0)));

    let rendered = renderer(36)
        .render_3d(&source, "cube", true, Some(camera), None, &mut surface)
        .await
        .unwrap();

    assert_eq!(rendered.camera, Some(camera));
    let json = serde_json::to_value(&surface.scenes["cube"]).unwrap();
    assert_eq!(json["layout"]["dragmode"], "orbit");
    assert_eq!(json["layout"]["scene"]["camera"]["eye"]["y"], -2.0);
    assert_eq!(json["data"][0]["type"], "scatter3d");
    assert_column(&json["data"][0]["z"], &[Some(0.0), Some(1.0), None]);
    assert_eq!(surface.frames["cube"].len(), 37);
}

#[tokio::test]
async fn test_load_error_aborts_before_surface() {
    let edges = write_file("from;to\n0;5\n");
    let layout = write_file("x;y\n0;0\n1;0\n");
    let source = GraphSource::new(edges.path(), layout.path());
    let mut surface = MemorySurface::default();

    let err = renderer(4)
        .render_2d(&source, "plot", false, None, &mut surface)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Load(LoadError::EdgeOutOfRange { to: 5, node_count: 2, .. })
    ));
    assert!(surface.calls.is_empty());
}

#[tokio::test]
async fn test_empty_layout_renders_empty_scene() {
    let edges = write_file("from;to\n");
    let layout = write_file("x;y\n");
    let source = GraphSource::new(edges.path(), layout.path());
    let mut surface = MemorySurface::default();

    let rendered = renderer(4)
        .render_2d(&source, "plot", true, None, &mut surface)
        .await
        .unwrap();

    assert_eq!(surface.calls, vec!["new_plot:plot", "add_frames:plot"]);
    assert_eq!(rendered.frames.len(), 5);
    let json = serde_json::to_value(&surface.scenes["plot"]).unwrap();
    assert_eq!(json["data"][1]["x"], serde_json::json!([]));
    assert_eq!(json["layout"]["xaxis"]["range"], serde_json::json!([-1.0, 1.0]));
}
