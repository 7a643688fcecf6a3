//! Configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. User config: `~/.config/memograph/config.toml` (XDG) or platform config dir
//! 2. Project config: `.memograph.toml`
//! 3. Environment variables: `MEMOGRAPH_*`, nested keys split on `__`
//!
//! Every field has a default, so a missing config file is fine.
//!
//! **Telemetry** (usually in the user config, kept out of the repo):
//! ```toml
//! [telemetry]
//! api_key = "..."
//! project_id = "graph-memorability"
//! quiet_period_secs = 10
//! ```
//!
//! **Animation and style** (usually per project):
//! ```toml
//! [animation]
//! frames = 36
//! frame_duration_ms = 100
//!
//! [style]
//! edge = { width = 1.0, color = "#888" }
//!
//! [[style.highlights]]
//! index = 0
//! color = "red"
//! size = 8.0
//! ```

use std::ops::Deref;
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::geometry::Padding;
use crate::models::Vec3;
use crate::trace::{seed_highlights, Highlight, LineStyle, MarkerStyle, TraceStyle};

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub animation: AnimationConfig,
    pub camera: CameraConfig,
    pub bounds: Padding,
    pub style: StyleConfig,
    pub telemetry: TelemetryConfig,
}

/// Rotation animation and start-view sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Keyframes per full turn.
    pub frames: usize,
    /// Minimum spacing, in frames, between separated start views.
    pub min_gap: usize,
    /// Single-slot repairs tried before accepting a crowded triple.
    pub max_attempts: usize,
    /// How long each keyframe is shown during playback.
    pub frame_duration_ms: u64,
    /// Tween duration between keyframes.
    pub transition_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            frames: 36,
            min_gap: 3,
            max_attempts: 5,
            frame_duration_ms: 100,
            transition_ms: 0,
        }
    }
}

/// 3D viewpoint defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Distance of randomized eye positions from the origin.
    pub radius: f64,
    /// Eye position when neither an explicit nor a random view is asked for.
    pub default_eye: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            radius: 2.0,
            default_eye: Vec3::new(1.25, 1.25, 1.25),
        }
    }
}

/// Trace appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub edge: LineStyle,
    /// Default marker of 2D nodes.
    pub planar_node: MarkerStyle,
    /// Default marker of 3D nodes.
    pub spatial_node: MarkerStyle,
    /// Overrides applied when a render asks for highlighted seed nodes.
    pub highlights: Vec<Highlight>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            edge: LineStyle::default(),
            planar_node: MarkerStyle::new("#1f77b4", 5.0),
            spatial_node: MarkerStyle::new("#1f77b4", 3.0),
            highlights: seed_highlights(),
        }
    }
}

impl StyleConfig {
    /// Trace style for 2D or 3D nodes, without highlights.
    pub fn trace_style(&self, spatial: bool) -> TraceStyle {
        let node = if spatial {
            self.spatial_node.clone()
        } else {
            self.planar_node.clone()
        };
        TraceStyle::new(self.edge.clone(), node)
    }
}

/// Anonymous-auth document store for viewpoint logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Web API key used for anonymous sign-up.
    pub api_key: Option<String>,
    /// Store project that owns the viewpoint collections.
    pub project_id: Option<String>,
    /// Seconds without camera movement before a viewpoint is logged.
    pub quiet_period_secs: u64,
    /// Base URL of the identity service.
    pub identity_endpoint: String,
    /// Base URL of the document service.
    pub firestore_endpoint: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            project_id: None,
            quiet_period_secs: 10,
            identity_endpoint: "https://identitytoolkit.googleapis.com/v1".to_string(),
            firestore_endpoint: "https://firestore.googleapis.com/v1".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// The debounce quiet period.
    pub fn quiet_period(&self) -> Duration {
        Duration::from_secs(self.quiet_period_secs)
    }
}

impl Config {
    /// Load config with layered resolution (user → project → env).
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// The layered provider stack, exposed for tests and embedding.
    pub fn figment() -> Figment {
        Figment::new()
            // Layer 1: User config (lowest priority)
            .merge(Toml::file(Self::user_config_path()))
            // Layer 2: Project config
            .merge(Toml::file(".memograph.toml"))
            // Layer 3: Environment variables (highest priority)
            .merge(Env::prefixed("MEMOGRAPH_").split("__"))
    }

    /// User config path: ~/.config/memograph/config.toml (XDG) or platform config dir.
    fn user_config_path() -> PathBuf {
        // Prefer XDG config location (~/.config) on all platforms
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home.join(".config").join("memograph").join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        // Fall back to platform-specific config dir
        dirs::config_dir()
            .map(|p| p.join("memograph").join("config.toml"))
            .unwrap_or_default()
    }
}
