//! Camera viewpoint descriptors for 3D scenes.

use serde::{Deserialize, Serialize};

/// A 3-component vector in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean length.
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// A viewpoint: where the eye sits and, optionally, which way is up.
///
/// Built once per render and never mutated afterwards. The interaction
/// logger receives fresh copies as the user drags the view around.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub eye: Vec3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up: Option<Vec3>,
}

impl Camera {
    pub fn new(eye: Vec3, up: Option<Vec3>) -> Self {
        Self { eye, up }
    }

    /// Camera looking at the origin from `eye` with no up vector.
    pub fn looking_from(eye: Vec3) -> Self {
        Self { eye, up: None }
    }
}
