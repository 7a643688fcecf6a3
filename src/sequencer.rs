//! Frame sequencing for rotation animations.
//!
//! A full turn is split into evenly spaced angles, the list is rotated so
//! the chosen start frame comes first, and the first frame is repeated at
//! the end so playback loops without a visible seam.
//!
//! For viewpoint studies the sequencer can also pick three start frames
//! that sit well apart on the circle; [`ViewRotation`] hands them out one
//! per render.

use std::f64::consts::TAU;

use rand::Rng;

use crate::models::Frame;

/// `n_frames` angles evenly spaced over `[0, 2π)`, starting at zero.
pub fn generate_angles(n_frames: usize) -> Vec<f64> {
    (0..n_frames)
        .map(|k| TAU * k as f64 / n_frames as f64)
        .collect()
}

/// Builds a closed animation cycle starting at `angles[start_index]`.
///
/// The angles are rotated left by `start_index` (wrapping), `build` is
/// called once per angle, and a copy of the first frame's payload is
/// appended as frame `n + 1`. Names run `frame1..=frame{n+1}`.
pub fn build_frame_cycle<T, F>(angles: &[f64], start_index: usize, mut build: F) -> Vec<Frame<T>>
where
    T: Clone,
    F: FnMut(f64) -> T,
{
    if angles.is_empty() {
        return Vec::new();
    }

    let start = start_index % angles.len();
    let mut frames: Vec<Frame<T>> = angles[start..]
        .iter()
        .chain(&angles[..start])
        .enumerate()
        .map(|(k, &theta)| Frame::new(format!("frame{}", k + 1), build(theta)))
        .collect();

    let closing = Frame::new(format!("frame{}", frames.len() + 1), frames[0].data.clone());
    frames.push(closing);
    frames
}

/// Three ascending frame indices picked as candidate start views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTriple {
    indices: [usize; 3],
    separated: bool,
}

impl FrameTriple {
    /// The indices, ascending.
    pub fn indices(&self) -> [usize; 3] {
        self.indices
    }

    /// Whether both adjacent gaps met the minimum when sampling stopped.
    pub fn is_separated(&self) -> bool {
        self.separated
    }
}

/// Which adjacent gap of a sorted triple is too narrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gap {
    Low,
    High,
}

fn narrow_gaps(t: &[usize; 3], min_gap: usize) -> Vec<Gap> {
    let mut gaps = Vec::with_capacity(2);
    if t[1] - t[0] < min_gap {
        gaps.push(Gap::Low);
    }
    if t[2] - t[1] < min_gap {
        gaps.push(Gap::High);
    }
    gaps
}

/// Picks three frame indices in `[0, n_frames)` whose adjacent gaps are at
/// least `min_gap`, best effort.
///
/// Each retry repairs a single slot: one narrow gap is chosen (at random
/// when both are narrow) and one of its two endpoints is redrawn. After
/// `max_attempts` repairs the current triple is returned as is, possibly
/// still crowded; [`FrameTriple::is_separated`] reports which case
/// happened. The wrap-around gap between the last and first index is not
/// checked.
pub fn select_separated_frame_triple<R: Rng + ?Sized>(
    rng: &mut R,
    n_frames: usize,
    min_gap: usize,
    max_attempts: usize,
) -> FrameTriple {
    let n = n_frames.max(1);
    let mut triple = [rng.gen_range(0..n), rng.gen_range(0..n), rng.gen_range(0..n)];
    triple.sort_unstable();

    let mut attempt = 0;
    loop {
        let narrow = narrow_gaps(&triple, min_gap);
        if narrow.is_empty() {
            return FrameTriple {
                indices: triple,
                separated: true,
            };
        }
        if attempt == max_attempts {
            tracing::debug!(?triple, min_gap, "Frame triple still crowded after retries");
            return FrameTriple {
                indices: triple,
                separated: false,
            };
        }

        let gap = narrow[rng.gen_range(0..narrow.len())];
        let slot = match gap {
            Gap::Low => rng.gen_range(0..=1),
            Gap::High => rng.gen_range(1..=2),
        };
        triple[slot] = rng.gen_range(0..n);
        triple.sort_unstable();
        attempt += 1;
    }
}

/// Where an animation cycle starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartFrame {
    /// Always the first angle (zero).
    Fixed,
    /// A caller-chosen frame index.
    Index(usize),
    /// A uniformly random frame.
    Random,
    /// The next view from a separated triple; see [`ViewRotation`].
    Separated,
}

/// Hands out the members of one separated triple across repeated renders.
///
/// The triple is drawn on first use and then cycled, so consecutive
/// renders start from views that are far apart on the circle.
#[derive(Debug, Clone)]
pub struct ViewRotation {
    n_frames: usize,
    min_gap: usize,
    max_attempts: usize,
    triple: Option<FrameTriple>,
    cursor: usize,
}

impl ViewRotation {
    pub fn new(n_frames: usize, min_gap: usize, max_attempts: usize) -> Self {
        Self {
            n_frames,
            min_gap,
            max_attempts,
            triple: None,
            cursor: 0,
        }
    }

    /// The triple being cycled, if one has been drawn.
    pub fn triple(&self) -> Option<FrameTriple> {
        self.triple
    }

    /// Next start index.
    ///
    /// The first call draws the triple and picks a random member to begin
    /// with; later calls walk the triple in order.
    pub fn next_start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let triple = match self.triple {
            Some(triple) => triple,
            None => {
                let triple = select_separated_frame_triple(
                    rng,
                    self.n_frames,
                    self.min_gap,
                    self.max_attempts,
                );
                self.cursor = rng.gen_range(0..3);
                *self.triple.insert(triple)
            }
        };
        let index = triple.indices()[self.cursor % 3];
        self.cursor += 1;
        index
    }
}
