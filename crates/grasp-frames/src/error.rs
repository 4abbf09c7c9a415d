// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use grasp_geom::GeomError;
use thiserror::Error;

/// Errors raised by frame synthesis.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    /// A derived frame was requested before the frame it hangs off exists.
    #[error("frame `{frame}` requires parent frame `{parent}`, which does not exist")]
    MissingParentFrame {
        /// Frame being derived.
        frame: String,
        /// Missing dependency.
        parent: String,
    },
    /// A store operation named a frame that was never derived.
    #[error("unknown frame `{0}`")]
    UnknownFrame(String),
    /// Forward kinematics has no such link.
    #[error("unknown link `{0}`")]
    UnknownLink(String),
    /// The sensed object carries no button geometry.
    #[error("object pose has no button geometry")]
    MissingButtonGeometry,
    /// Geometry input was malformed.
    #[error(transparent)]
    Geometry(#[from] GeomError),
}

impl FrameError {
    pub(crate) fn missing_parent(frame: &str, parent: &str) -> Self {
        Self::MissingParentFrame {
            frame: frame.to_owned(),
            parent: parent.to_owned(),
        }
    }
}
