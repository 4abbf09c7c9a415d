// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use grasp_geom::RigidTransform;

/// A rigid transform with an identity.
///
/// `parent` and `visible` are presentation hints only; they never influence
/// how the transform is computed.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedFrame {
    /// Unique frame name.
    pub name: String,
    /// World pose.
    pub transform: RigidTransform,
    /// Presentation grouping.
    pub parent: Option<String>,
    /// Presentation visibility.
    pub visible: bool,
}

impl NamedFrame {
    /// Creates a visible frame with no parent.
    pub fn new(name: impl Into<String>, transform: RigidTransform) -> Self {
        Self {
            name: name.into(),
            transform,
            parent: None,
            visible: true,
        }
    }

    /// Sets the presentation parent.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Marks the frame hidden.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}
