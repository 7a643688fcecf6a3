//! Pure numeric transforms: pivot rotation, centroids, padded bounds, and
//! spherical camera placement.

use std::f64::consts::{PI, TAU};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::{Position, Vec3};

/// Rotates `(x, y)` counter-clockwise by `theta` radians about `(cx, cy)`.
pub fn rotate_point_2d(x: f64, y: f64, theta: f64, cx: f64, cy: f64) -> (f64, f64) {
    let (sin, cos) = theta.sin_cos();
    let (dx, dy) = (x - cx, y - cy);
    (cx + cos * dx - sin * dy, cy + sin * dx + cos * dy)
}

/// Rotates a 3D point about the vertical line through `(cx, cy)`.
///
/// `z` is untouched, so a spinning 3D graph keeps its height profile.
pub fn rotate_point_3d(
    (x, y, z): (f64, f64, f64),
    theta: f64,
    (cx, cy): (f64, f64),
) -> (f64, f64, f64) {
    let (x, y) = rotate_point_2d(x, y, theta, cx, cy);
    (x, y, z)
}

/// Arithmetic mean of all node positions, or `None` for an empty slice.
pub fn compute_centroid<P: Position>(nodes: &[P]) -> Option<P> {
    if nodes.is_empty() {
        return None;
    }

    let n = nodes.len() as f64;
    let sums: Vec<f64> = (0..P::dims())
        .map(|i| nodes.iter().map(|p| p.component(i)).sum::<f64>() / n)
        .collect();
    Some(P::from_components(&sums))
}

/// Minimum and maximum of a flattened sequence, or `None` when it is empty.
///
/// NaN values are skipped.
pub fn compute_bounds(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Axis padding policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    /// Fraction of the data span added on each side.
    pub ratio: f64,
    /// Padding used instead when the span is zero.
    pub degenerate: f64,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            ratio: 0.05,
            degenerate: 1.0,
        }
    }
}

/// A closed axis range, serialized as `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange(pub f64, pub f64);

impl AxisRange {
    pub fn min(&self) -> f64 {
        self.0
    }

    pub fn max(&self) -> f64 {
        self.1
    }
}

/// Pads `[min, max]` on both sides.
///
/// A zero-width span gets `padding.degenerate` instead, so an axis never
/// collapses to a single value.
pub fn padded_range(min: f64, max: f64, padding: Padding) -> AxisRange {
    let span = max - min;
    let pad = if span > 0.0 {
        padding.ratio * span
    } else {
        padding.degenerate
    };
    AxisRange(min - pad, max + pad)
}

/// Converts spherical coordinates to a cartesian vector.
///
/// `theta` is the azimuth in the x-y plane, `phi` the polar angle from +z.
pub fn spherical_to_cartesian(r: f64, theta: f64, phi: f64) -> Vec3 {
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    Vec3::new(r * sin_phi * cos_theta, r * sin_phi * sin_theta, r * cos_phi)
}

/// Samples an eye position uniformly in angle on a sphere of radius `r`.
pub fn random_eye<R: Rng + ?Sized>(rng: &mut R, r: f64) -> Vec3 {
    let theta = rng.gen_range(0.0..TAU);
    let phi = rng.gen_range(0.0..PI);
    spherical_to_cartesian(r, theta, phi)
}
