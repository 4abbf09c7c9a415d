// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use std::collections::BTreeMap;

use grasp_geom::RigidTransform;

/// Frames declared to move together.
///
/// Each member is stored as a fixed offset from a shared group anchor. When
/// one member moves, the anchor is re-solved from that member and every other
/// member is recomputed from its offset, so the relative transform between
/// any two members is identical before and after.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameGroup {
    name: String,
    anchor: RigidTransform,
    offsets: BTreeMap<String, RigidTransform>,
}

impl FrameGroup {
    /// Creates an empty group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            anchor: RigidTransform::identity(),
            offsets: BTreeMap::new(),
        }
    }

    /// Group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if `frame` is a member.
    pub fn contains(&self, frame: &str) -> bool {
        self.offsets.contains_key(frame)
    }

    /// Member names in canonical (sorted) order.
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.offsets.keys().map(String::as_str)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Returns `true` if the group has no members.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Adds `frame` at `transform`, or records a new offset if it is already a
    /// member.
    ///
    /// Re-joining is how a frame gets re-derived from its parent: its offset
    /// to the rest of the group is redefined instead of the group following it.
    pub fn join(&mut self, frame: &str, transform: &RigidTransform) {
        if self.offsets.is_empty() {
            self.anchor = *transform;
        }
        self.offsets
            .insert(frame.to_owned(), self.anchor.relative(transform));
    }

    /// Removes `frame`; returns `true` if it was a member.
    pub fn leave(&mut self, frame: &str) -> bool {
        self.offsets.remove(frame).is_some()
    }

    /// `changed` now sits at `transform`; returns the new pose of every other
    /// member.
    ///
    /// Returns an empty list if `changed` is not a member.
    pub fn resynchronize(
        &mut self,
        changed: &str,
        transform: &RigidTransform,
    ) -> Vec<(String, RigidTransform)> {
        let Some(offset) = self.offsets.get(changed) else {
            return Vec::new();
        };
        self.anchor = RigidTransform::concatenate(&offset.inverse(), transform);
        self.offsets
            .iter()
            .filter(|(name, _)| name.as_str() != changed)
            .map(|(name, offset)| {
                (
                    name.clone(),
                    RigidTransform::concatenate(offset, &self.anchor),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grasp_geom::Vec3;

    fn pose(x: f64, yaw: f64) -> RigidTransform {
        RigidTransform::from_position_and_rpy(Vec3::new(x, 0.0, 0.0), [0.0, 0.0, yaw])
    }

    #[test]
    fn resynchronize_ignores_non_members() {
        let mut group = FrameGroup::new("g");
        group.join("a", &pose(0.0, 0.0));
        assert!(group.resynchronize("b", &pose(1.0, 0.0)).is_empty());
    }

    #[test]
    fn moving_one_member_carries_the_other() {
        let mut group = FrameGroup::new("g");
        group.join("a", &pose(0.0, 0.0));
        group.join("b", &pose(1.0, 0.0));

        // Rotate `a` by 90° in place: `b` swings round to +y.
        let moved = group.resynchronize("a", &pose(0.0, 90.0));
        assert_eq!(moved.len(), 1);
        let (name, b) = &moved[0];
        assert_eq!(name, "b");
        assert!(b.translation().approx_eq(&Vec3::new(0.0, 1.0, 0.0), 1e-12));
    }

    #[test]
    fn rejoin_redefines_offset() {
        let mut group = FrameGroup::new("g");
        group.join("a", &pose(0.0, 0.0));
        group.join("b", &pose(1.0, 0.0));
        group.join("b", &pose(2.0, 0.0));
        let moved = group.resynchronize("a", &pose(1.0, 0.0));
        assert!(moved[0].1.translation().approx_eq(&Vec3::new(3.0, 0.0, 0.0), 1e-12));
    }
}
