// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use grasp_geom::{RigidTransform, Vec3};
use tracing::{debug, info};

use crate::names::{
    BUTTON_FRAME, GRASP_FRAME, OBJECT, OBJECT_FRAME, OBJECT_GROUP, SAMPLE_GRASP_FRAME,
    STANCE_FRAME, TIP_FRAME,
};
use crate::{
    ButtonGeometry, FrameError, FrameOffsets, FrameStore, GraspStyle, JointConfiguration,
    Kinematics, NamedFrame, ObjectPose,
};

/// Derives task frames from robot pose and sensed object pose.
///
/// All derived frames are built in local coordinates and concatenated onto
/// their anchor. Frames hanging off the object join [`OBJECT_GROUP`], so an
/// updated object pose carries them along.
pub struct FrameSynthesis {
    kinematics: Box<dyn Kinematics>,
    offsets: FrameOffsets,
    store: FrameStore,
    button: Option<ButtonGeometry>,
}

impl FrameSynthesis {
    /// Creates a synthesizer with an empty frame store.
    pub fn new(kinematics: Box<dyn Kinematics>, offsets: FrameOffsets) -> Self {
        Self {
            kinematics,
            offsets,
            store: FrameStore::new(),
            button: None,
        }
    }

    /// Derived frames.
    pub fn store(&self) -> &FrameStore {
        &self.store
    }

    /// Offsets in use.
    pub fn offsets(&self) -> &FrameOffsets {
        &self.offsets
    }

    /// Switches the grasp style used by the next grasp computation.
    pub fn set_grasp_style(&mut self, style: GraspStyle) {
        self.offsets.grasp_style = style;
    }

    /// Pose of a derived frame.
    pub fn transform(&self, name: &str) -> Option<RigidTransform> {
        self.store.transform(name)
    }

    /// Frame between the feet, on the ground, z up, x along the pelvis.
    ///
    /// The pelvis forward direction is projected onto the ground plane, so the
    /// z axis is world-up whatever the robot's lean.
    pub fn ground_frame(&self, pose: &JointConfiguration) -> Result<RigidTransform, FrameError> {
        let links = &self.offsets.links;
        let left = self.kinematics.link_frame(pose, &links.left_foot)?;
        let right = self.kinematics.link_frame(pose, &links.right_foot)?;
        let pelvis = self.kinematics.link_frame(pose, &links.pelvis)?;

        let frame = upright_frame(pelvis.x_axis())?;
        let stance_position = left.translation().midpoint(&right.translation());
        Ok(frame
            .translated(stance_position)
            .translated(Vec3::new(0.0, 0.0, -self.offsets.foot_height)))
    }

    /// Places the object at its nominal spawn offset from the ground frame.
    ///
    /// Spawning again moves the existing object and its group with it.
    pub fn spawn_object_frame(
        &mut self,
        pose: &JointConfiguration,
    ) -> Result<RigidTransform, FrameError> {
        let ground = self.ground_frame(pose)?;
        let t = RigidTransform::concatenate(&self.offsets.object_spawn.to_transform(), &ground);
        self.place_object(t)?;
        Ok(t)
    }

    /// Records a fitted object pose.
    ///
    /// If the object frame already exists it is moved and every frame in its
    /// group follows; otherwise it is created.
    pub fn set_object_pose(&mut self, object: &ObjectPose) -> Result<(), FrameError> {
        self.button = object.button;
        self.place_object(object.transform)
    }

    /// Creates the object frame, or moves it and its group rigidly.
    fn place_object(&mut self, transform: RigidTransform) -> Result<(), FrameError> {
        if self.store.get(OBJECT_FRAME).is_some() {
            let moved = self.store.move_frame(OBJECT_FRAME, transform)?;
            info!(moved, "object moved, dependent frames resynchronized");
        } else {
            self.store.derive(
                NamedFrame::new(OBJECT_FRAME, transform)
                    .with_parent(OBJECT)
                    .hidden(),
            );
        }
        Ok(())
    }

    /// Grasp frame from the object frame and the configured grasp style.
    ///
    /// Re-derives the object group from the grasp frame, its hidden sample and
    /// the object frame. Frames derived later rejoin it.
    pub fn compute_grasp_frame(&mut self) -> Result<RigidTransform, FrameError> {
        let object = self.store.require(OBJECT_FRAME, GRASP_FRAME)?;
        let style = self.offsets.grasp_style;
        let t = RigidTransform::concatenate(&self.offsets.grasp().to_transform(), &object);

        let hidden = style == GraspStyle::Rotary;
        let grasp = NamedFrame::new(GRASP_FRAME, t).with_parent(OBJECT);
        self.store
            .derive(if hidden { grasp.hidden() } else { grasp });

        let mut members = vec![GRASP_FRAME.to_owned(), OBJECT_FRAME.to_owned()];
        if style == GraspStyle::Barrel {
            self.store.derive(
                NamedFrame::new(SAMPLE_GRASP_FRAME, t)
                    .with_parent(OBJECT)
                    .hidden(),
            );
            members.push(SAMPLE_GRASP_FRAME.to_owned());
        } else {
            self.store.remove(SAMPLE_GRASP_FRAME);
        }
        // Frames derived earlier (stance, tip, button) stay attached.
        if let Some(group) = self.store.group(OBJECT_GROUP) {
            for member in group.members() {
                if member != SAMPLE_GRASP_FRAME && !members.iter().any(|m| m == member) {
                    members.push(member.to_owned());
                }
            }
        }
        self.store
            .regroup(OBJECT_GROUP, members.iter().map(String::as_str))?;
        debug!(?style, "grasp frame computed");
        Ok(t)
    }

    /// Where the robot should stand to reach the grasp frame.
    ///
    /// Two stages: build a ground-level frame under the grasp whose x axis is
    /// the grasp frame's y axis (the approach direction) projected flat, then
    /// apply the stance standoff in that frame.
    pub fn compute_stance_frame(
        &mut self,
        pose: &JointConfiguration,
    ) -> Result<RigidTransform, FrameError> {
        let grasp = self.store.require(GRASP_FRAME, STANCE_FRAME)?;
        let ground_height = self.ground_frame(pose)?.translation().z();

        let grasp_position = grasp.translation();
        let grasp_ground = upright_frame(grasp.y_axis())?.translated(Vec3::new(
            grasp_position.x(),
            grasp_position.y(),
            ground_height,
        ));
        let t = RigidTransform::concatenate(&self.offsets.stance.to_transform(), &grasp_ground);

        self.store
            .derive(NamedFrame::new(STANCE_FRAME, t).with_parent(OBJECT).hidden());
        self.attach(STANCE_FRAME)?;
        Ok(t)
    }

    /// Tool-tip frame.
    pub fn compute_tip_frame(&mut self) -> Result<RigidTransform, FrameError> {
        let object = self.store.require(OBJECT_FRAME, TIP_FRAME)?;
        let t = RigidTransform::concatenate(&self.offsets.tip.to_transform(), &object);
        self.store
            .derive(NamedFrame::new(TIP_FRAME, t).with_parent(OBJECT).hidden());
        self.attach(TIP_FRAME)?;
        Ok(t)
    }

    /// Button frame: y axis into the button, x axis along the object's z.
    pub fn compute_button_frame(&mut self) -> Result<RigidTransform, FrameError> {
        let object = self.store.require(OBJECT_FRAME, BUTTON_FRAME)?;
        let button = self.button.ok_or(FrameError::MissingButtonGeometry)?;

        let y = button.normal.neg();
        let z = y.cross(&Vec3::UNIT_Z);
        let x = z.cross(&y);
        let local = RigidTransform::from_axes(x, y, z)?.translated(button.position);
        let t = RigidTransform::concatenate(&local, &object);

        self.store
            .derive(NamedFrame::new(BUTTON_FRAME, t).with_parent(OBJECT));
        self.attach(BUTTON_FRAME)?;
        Ok(t)
    }

    fn attach(&mut self, frame: &str) -> Result<(), FrameError> {
        if self.store.group(OBJECT_GROUP).is_none() {
            self.store.join_group(OBJECT_GROUP, OBJECT_FRAME)?;
        }
        self.store.join_group(OBJECT_GROUP, frame)
    }
}

/// Rotation with z = world up and x = `forward` projected onto the ground.
fn upright_frame(forward: Vec3) -> Result<RigidTransform, FrameError> {
    let z = Vec3::UNIT_Z;
    let y = z.cross(&forward);
    let x = y.cross(&z);
    Ok(RigidTransform::from_axes(x, y, z)?)
}
