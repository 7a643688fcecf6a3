//! Render orchestration: load → pivot → start frame → frame cycle → bounds
//! → scene → plotting surface.
//!
//! Every variant (2D or 3D, fixed or random start, highlighted seeds,
//! telemetry) is a [`RenderOptions`] value fed through one pipeline.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Config;
use crate::error::AppError;
use crate::geometry::{compute_bounds, compute_centroid, padded_range, random_eye, AxisRange};
use crate::loader::GraphSource;
use crate::models::{Camera, Dimensionality, Graph, Point2, Point3, Position};
use crate::scene::{
    play_controls, slider_for, Axis, DragMode, Layout, Margin, Playback, PlotConfig,
    SceneAxes, SceneDescriptor, TraceFrame,
};
use crate::sequencer::{build_frame_cycle, generate_angles, StartFrame, ViewRotation};
use crate::surface::PlottingSurface;
use crate::telemetry::{InteractionLogger, TelemetryStore};
use crate::trace::{build_traces_at, Highlight};

/// One render request.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub dimensionality: Dimensionality,
    /// 2D: start from a random frame. 3D: place the camera at random.
    pub random_view: bool,
    /// Start from this frame; overrides every other start choice.
    pub fixed_start_index: Option<usize>,
    /// Per-node style overrides.
    pub highlights: Option<Vec<Highlight>>,
    /// Collection that receives logged viewpoints. Setting it also makes
    /// consecutive renders start from well-separated frames.
    pub telemetry_graph_id: Option<String>,
    /// Explicit 3D camera; wins over `random_view`.
    pub camera: Option<Camera>,
}

impl RenderOptions {
    pub fn planar() -> Self {
        Self::new(Dimensionality::Planar)
    }

    pub fn spatial() -> Self {
        Self::new(Dimensionality::Spatial)
    }

    fn new(dimensionality: Dimensionality) -> Self {
        Self {
            dimensionality,
            random_view: false,
            fixed_start_index: None,
            highlights: None,
            telemetry_graph_id: None,
            camera: None,
        }
    }

    /// Start-frame policy implied by these options.
    pub fn start_frame(&self) -> StartFrame {
        if let Some(index) = self.fixed_start_index {
            StartFrame::Index(index)
        } else if self.telemetry_graph_id.is_some() {
            StartFrame::Separated
        } else if self.random_view && self.dimensionality == Dimensionality::Planar {
            StartFrame::Random
        } else {
            StartFrame::Fixed
        }
    }
}

/// A fully assembled scene plus the choices made while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedScene {
    pub scene: SceneDescriptor,
    /// Closed keyframe cycle; the last frame repeats the first.
    pub frames: Vec<TraceFrame>,
    pub start_index: usize,
    /// Initial camera, for 3D scenes.
    pub camera: Option<Camera>,
    pub telemetry_graph_id: Option<String>,
}

impl RenderedScene {
    /// A logger for this scene's viewpoint changes, when telemetry was asked for.
    pub fn interaction_logger<S: TelemetryStore + 'static>(
        &self,
        store: Arc<S>,
        quiet_period: Duration,
    ) -> Option<InteractionLogger<S>> {
        self.telemetry_graph_id
            .as_ref()
            .map(|id| InteractionLogger::new(store, id.clone(), quiet_period))
    }
}

/// Builds scenes and hands them to plotting surfaces.
///
/// Holds the random source and the separated-view rotation, so repeated
/// renders from one `Renderer` cycle through well-spaced start frames.
pub struct Renderer<R = StdRng> {
    config: Arc<Config>,
    rng: R,
    views: ViewRotation,
}

impl Renderer<StdRng> {
    /// Renderer seeded from OS entropy.
    pub fn new(config: Arc<Config>) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng + Send> Renderer<R> {
    pub fn with_rng(config: Arc<Config>, rng: R) -> Self {
        let animation = &config.animation;
        let views = ViewRotation::new(
            animation.frames.max(1),
            animation.min_gap,
            animation.max_attempts,
        );
        Self { config, rng, views }
    }

    fn frame_count(&self) -> usize {
        self.config.animation.frames.max(1)
    }

    /// Resolves the start frame for a render.
    pub fn start_index(&mut self, options: &RenderOptions) -> Result<usize, AppError> {
        let frames = self.frame_count();
        match options.start_frame() {
            StartFrame::Fixed => Ok(0),
            StartFrame::Index(index) if index < frames => Ok(index),
            StartFrame::Index(index) => Err(AppError::StartIndexOutOfRange { index, frames }),
            StartFrame::Random => Ok(self.rng.gen_range(0..frames)),
            StartFrame::Separated => Ok(self.views.next_start(&mut self.rng)),
        }
    }

    /// Initial 3D camera: explicit, then random, then the configured default.
    pub fn resolve_camera(&mut self, options: &RenderOptions) -> Camera {
        if let Some(camera) = options.camera {
            camera
        } else if options.random_view {
            Camera::looking_from(random_eye(&mut self.rng, self.config.camera.radius))
        } else {
            Camera::looking_from(self.config.camera.default_eye)
        }
    }

    /// Builds the scene and frame cycle for a loaded graph.
    pub fn build_scene<P: Position>(
        &mut self,
        graph: &Graph<P>,
        options: &RenderOptions,
    ) -> Result<RenderedScene, AppError> {
        // An empty layout still renders; it just has nothing to turn.
        let pivot = compute_centroid(graph.nodes())
            .unwrap_or_else(|| P::from_components(&vec![0.0; P::dims()]));
        let start_index = self.start_index(options)?;
        let spatial = Dimensionality::of::<P>().is_spatial();

        let mut style = self.config.style.trace_style(spatial);
        if let Some(highlights) = &options.highlights {
            style = style.with_highlights(highlights.clone());
        }

        let angles = generate_angles(self.frame_count());
        let frames = build_frame_cycle(&angles, start_index, |theta| {
            build_traces_at(graph, theta, &pivot, &style)
        });

        // Bounds span every frame so the viewport never clips mid-rotation.
        let ranges: Vec<AxisRange> = (0..P::dims())
            .map(|axis| {
                let (min, max) =
                    compute_bounds(frames.iter().flat_map(|f| f.data.nodes().axis_values(axis)))
                        .unwrap_or((0.0, 0.0));
                padded_range(min, max, self.config.bounds)
            })
            .collect();

        let camera = spatial.then(|| self.resolve_camera(options));
        let layout = self.layout(&frames, &ranges, camera, spatial);
        let scene = SceneDescriptor {
            traces: frames[0].data.clone(),
            layout,
            config: PlotConfig::default(),
        };

        Ok(RenderedScene {
            scene,
            frames,
            start_index,
            camera,
            telemetry_graph_id: options.telemetry_graph_id.clone(),
        })
    }

    fn layout(
        &self,
        frames: &[TraceFrame],
        ranges: &[AxisRange],
        camera: Option<Camera>,
        spatial: bool,
    ) -> Layout {
        let animation = &self.config.animation;
        let playback = Playback {
            frame_duration_ms: animation.frame_duration_ms,
            transition_ms: animation.transition_ms,
            redraw: spatial,
        };

        let mut layout = Layout {
            margin: Margin::default(),
            dragmode: DragMode::Pan,
            showlegend: false,
            xaxis: None,
            yaxis: None,
            scene: None,
            sliders: vec![slider_for(frames, playback)],
            updatemenus: vec![play_controls(playback)],
        };

        match (camera, ranges) {
            (Some(camera), [x, y, z]) => {
                layout.dragmode = DragMode::Orbit;
                layout.scene = Some(SceneAxes {
                    xaxis: Axis::hidden(*x),
                    yaxis: Axis::hidden(*y),
                    zaxis: Axis::hidden(*z),
                    camera,
                });
            }
            (_, [x, y, ..]) => {
                layout.xaxis = Some(Axis::hidden(*x).anchored_to("y"));
                layout.yaxis = Some(Axis::hidden(*y));
            }
            _ => {}
        }
        layout
    }

    /// Loads, builds, and hands the scene to `surface`, then registers the
    /// frames for playback.
    pub async fn render<P: Position, S: PlottingSurface + ?Sized>(
        &mut self,
        source: &GraphSource,
        target: &str,
        options: &RenderOptions,
        surface: &mut S,
    ) -> Result<RenderedScene, AppError> {
        let graph: Graph<P> = source.load().await?;
        let rendered = self.build_scene(&graph, options)?;

        surface.new_plot(target, &rendered.scene).await?;
        surface.add_frames(target, &rendered.frames).await?;

        tracing::info!(
            target,
            nodes = graph.node_count(),
            edges = graph.edges().len(),
            frames = rendered.frames.len(),
            start_index = rendered.start_index,
            "Rendered scene"
        );
        Ok(rendered)
    }

    /// Renders with the node type picked by `options.dimensionality`.
    pub async fn render_source<S: PlottingSurface + ?Sized>(
        &mut self,
        source: &GraphSource,
        target: &str,
        options: &RenderOptions,
        surface: &mut S,
    ) -> Result<RenderedScene, AppError> {
        match options.dimensionality {
            Dimensionality::Planar => self.render::<Point2, S>(source, target, options, surface).await,
            Dimensionality::Spatial => self.render::<Point3, S>(source, target, options, surface).await,
        }
    }

    /// 2D entry point.
    pub async fn render_2d<S: PlottingSurface + ?Sized>(
        &mut self,
        source: &GraphSource,
        target: &str,
        random_view: bool,
        start_index: Option<usize>,
        surface: &mut S,
    ) -> Result<RenderedScene, AppError> {
        let options = RenderOptions {
            random_view,
            fixed_start_index: start_index,
            ..RenderOptions::planar()
        };
        self.render::<Point2, S>(source, target, &options, surface).await
    }

    /// 3D entry point.
    pub async fn render_3d<S: PlottingSurface + ?Sized>(
        &mut self,
        source: &GraphSource,
        target: &str,
        random_view: bool,
        camera: Option<Camera>,
        telemetry_graph_id: Option<String>,
        surface: &mut S,
    ) -> Result<RenderedScene, AppError> {
        let options = RenderOptions {
            random_view,
            camera,
            telemetry_graph_id,
            ..RenderOptions::spatial()
        };
        self.render::<Point3, S>(source, target, &options, surface).await
    }
}
