//! Named animation keyframes.

use serde::Serialize;

/// One animation keyframe: a unique name and the payload drawn at that step.
///
/// The payload is generic so the sequencer can be exercised with plain
/// angles; the renderer instantiates it with trace pairs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame<T> {
    /// Frame name (`frame1`, `frame2`, ...), used by slider steps.
    pub name: String,
    /// What the plotting surface draws for this frame.
    pub data: T,
}

impl<T> Frame<T> {
    pub fn new(name: impl Into<String>, data: T) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}
