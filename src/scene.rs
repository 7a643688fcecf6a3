//! Declarative scene descriptors handed to a plotting surface.
//!
//! The shapes mirror plotly's `newPlot(data, layout, config)` arguments and
//! its animation API, so a scene serializes straight into a page script.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::geometry::AxisRange;
use crate::models::{Camera, Frame};
use crate::trace::TracePair;

/// Keyframe type used by rendered scenes.
pub type TraceFrame = Frame<TracePair>;

/// Plot margins in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
    pub pad: u32,
}

/// Pointer drag behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragMode {
    Pan,
    Orbit,
}

/// One hidden, fixed-range axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub visible: bool,
    pub showgrid: bool,
    pub range: AxisRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaleanchor: Option<String>,
}

impl Axis {
    pub fn hidden(range: AxisRange) -> Self {
        Self {
            visible: false,
            showgrid: false,
            range,
            scaleanchor: None,
        }
    }

    /// Locks this axis's scale to another axis, e.g. `"y"`.
    pub fn anchored_to(mut self, axis: &str) -> Self {
        self.scaleanchor = Some(axis.to_string());
        self
    }
}

/// 3D scene settings: three axes and the initial camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneAxes {
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub zaxis: Axis,
    pub camera: Camera,
}

/// One slider step; clicking it plays the named frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderStep {
    pub label: String,
    pub method: String,
    pub args: JsonValue,
}

/// Frame scrubber shown under the plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slider {
    pub active: usize,
    pub steps: Vec<SliderStep>,
}

/// A play/pause button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub method: String,
    pub args: JsonValue,
}

/// Button row above the plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateMenu {
    #[serde(rename = "type")]
    pub kind: String,
    pub showactive: bool,
    pub buttons: Vec<Button>,
}

/// Plot layout.
///
/// 2D scenes fill `xaxis`/`yaxis`; 3D scenes fill `scene`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub margin: Margin,
    pub dragmode: DragMode,
    pub showlegend: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene: Option<SceneAxes>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sliders: Vec<Slider>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub updatemenus: Vec<UpdateMenu>,
}

/// Surface-level options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    pub responsive: bool,
    #[serde(rename = "displaylogo")]
    pub display_logo: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            responsive: true,
            display_logo: false,
        }
    }
}

/// Everything `newPlot` needs: base traces, layout, and config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescriptor {
    #[serde(rename = "data")]
    pub traces: TracePair,
    pub layout: Layout,
    pub config: PlotConfig,
}

/// Playback timing for animate commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Playback {
    pub frame_duration_ms: u64,
    pub transition_ms: u64,
    /// 3D traces must be redrawn on every frame.
    pub redraw: bool,
}

impl Playback {
    fn options(&self, mode: &str) -> JsonValue {
        json!({
            "mode": mode,
            "fromcurrent": true,
            "frame": { "duration": self.frame_duration_ms, "redraw": self.redraw },
            "transition": { "duration": self.transition_ms },
        })
    }
}

/// One slider step per frame, labelled with the 1-based frame number.
pub fn slider_for(frames: &[TraceFrame], playback: Playback) -> Slider {
    let steps = frames
        .iter()
        .enumerate()
        .map(|(k, frame)| SliderStep {
            label: (k + 1).to_string(),
            method: "animate".to_string(),
            args: json!([[frame.name], playback.options("immediate")]),
        })
        .collect();
    Slider { active: 0, steps }
}

/// Play and pause buttons for the registered frames.
pub fn play_controls(playback: Playback) -> UpdateMenu {
    let pause = Playback {
        frame_duration_ms: 0,
        transition_ms: 0,
        redraw: false,
    };
    UpdateMenu {
        kind: "buttons".to_string(),
        showactive: false,
        buttons: vec![
            Button {
                label: "Play".to_string(),
                method: "animate".to_string(),
                args: json!([null, playback.options("next")]),
            },
            Button {
                label: "Pause".to_string(),
                method: "animate".to_string(),
                args: json!([[null], pause.options("immediate")]),
            },
        ],
    }
}
