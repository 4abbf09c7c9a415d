// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use grasp_geom::RigidTransform;
use tracing::{debug, trace};

use crate::{FrameError, FrameGroup, NamedFrame};

/// Derived frames plus the groups that tie them together.
///
/// Two ways to write a frame:
/// - [`FrameStore::derive`] records a freshly computed frame and redefines its
///   offset inside any group it belongs to. Nothing else moves.
/// - [`FrameStore::move_frame`] treats the new pose as an external update and
///   resynchronizes every group the frame belongs to, cascading through
///   frames that sit in more than one group.
#[derive(Debug, Clone, Default)]
pub struct FrameStore {
    frames: BTreeMap<String, NamedFrame>,
    groups: BTreeMap<String, FrameGroup>,
}

impl FrameStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a frame.
    pub fn get(&self, name: &str) -> Option<&NamedFrame> {
        self.frames.get(name)
    }

    /// Looks up a frame's pose.
    pub fn transform(&self, name: &str) -> Option<RigidTransform> {
        self.frames.get(name).map(|f| f.transform)
    }

    /// Returns `parent`'s pose or a `MissingParentFrame` error naming `frame`.
    pub fn require(&self, parent: &str, frame: &str) -> Result<RigidTransform, FrameError> {
        self.transform(parent)
            .ok_or_else(|| FrameError::missing_parent(frame, parent))
    }

    /// All frames in name order.
    pub fn frames(&self) -> impl Iterator<Item = &NamedFrame> {
        self.frames.values()
    }

    /// Looks up a group.
    pub fn group(&self, name: &str) -> Option<&FrameGroup> {
        self.groups.get(name)
    }

    /// Inserts or replaces a derived frame without moving anything else.
    pub fn derive(&mut self, frame: NamedFrame) {
        for group in self.groups.values_mut() {
            if group.contains(&frame.name) {
                group.join(&frame.name, &frame.transform);
            }
        }
        debug!(
            frame = %frame.name,
            position = ?frame.transform.translation().to_array(),
            "derived frame"
        );
        self.frames.insert(frame.name.clone(), frame);
    }

    /// Adds an existing frame to `group`, creating the group on first use.
    pub fn join_group(&mut self, group: &str, frame: &str) -> Result<(), FrameError> {
        let transform = self
            .transform(frame)
            .ok_or_else(|| FrameError::UnknownFrame(frame.to_owned()))?;
        self.groups
            .entry(group.to_owned())
            .or_insert_with(|| FrameGroup::new(group))
            .join(frame, &transform);
        Ok(())
    }

    /// Replaces `group` with a fresh group made of `members`.
    pub fn regroup<'a>(
        &mut self,
        group: &str,
        members: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), FrameError> {
        self.groups.remove(group);
        for member in members {
            self.join_group(group, member)?;
        }
        Ok(())
    }

    /// Moves `name` to `transform` and resynchronizes its groups.
    ///
    /// Returns the number of other frames that moved with it.
    pub fn move_frame(&mut self, name: &str, transform: RigidTransform) -> Result<usize, FrameError> {
        let frame = self
            .frames
            .get_mut(name)
            .ok_or_else(|| FrameError::UnknownFrame(name.to_owned()))?;
        frame.transform = transform;

        let mut visited = BTreeSet::from([name.to_owned()]);
        let mut pending = VecDeque::from([(name.to_owned(), transform)]);
        let mut moved = 0;
        while let Some((changed, pose)) = pending.pop_front() {
            for group in self.groups.values_mut() {
                for (member, member_pose) in group.resynchronize(&changed, &pose) {
                    if !visited.insert(member.clone()) {
                        continue;
                    }
                    trace!(group = group.name(), frame = %member, via = %changed, "resynchronized");
                    if let Some(f) = self.frames.get_mut(&member) {
                        f.transform = member_pose;
                        moved += 1;
                    }
                    pending.push_back((member, member_pose));
                }
            }
        }
        debug!(frame = name, moved, "moved frame");
        Ok(moved)
    }

    /// Removes a frame and its group memberships.
    pub fn remove(&mut self, name: &str) -> Option<NamedFrame> {
        for group in self.groups.values_mut() {
            group.leave(name);
        }
        self.frames.remove(name)
    }
}
