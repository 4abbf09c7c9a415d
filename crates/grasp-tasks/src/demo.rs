// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Drill grasp task context.

use anyhow::Result;
use grasp_frames::names::{BUTTON_FRAME, GRASP_FRAME, OBJECT_FRAME, STANCE_FRAME};
use grasp_frames::{FrameError, FrameSynthesis, JointConfiguration, PoseSource};
use grasp_geom::RigidTransform;
use grasp_sched::{Step, TaskQueue};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    Behavior, Collaborators, FootstepPlanner, HandDriver, ManipGoal, ManipPlanner, ObjectFitter,
    PlanArtifact, RobotDriver, ScenarioConfig, SensorHead, Side,
};

/// Scenario-level failures.
#[derive(Debug, Error)]
pub enum DemoError {
    /// A step needs a plan no earlier step produced.
    #[error("no {0} plan has been computed")]
    MissingPlan(&'static str),
    /// The object has been neither spawned nor fitted.
    #[error("object has not been located")]
    MissingObject,
    /// Frame synthesis failed.
    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Plans the scenario keeps for later commit or preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanSlot {
    /// Footstep plan to the stance frame.
    Footsteps,
    /// Walking trajectory for the footstep plan.
    Walking,
    /// Arm-up pre-grasp posture.
    PreGrasp,
    /// Reach to the grasp frame.
    Grasp,
    /// Return to nominal posture.
    Stand,
    /// Whole-body pose with the hand on the grasp frame.
    EndPose,
}

impl PlanSlot {
    /// Name used in logs and errors.
    pub fn name(self) -> &'static str {
        match self {
            Self::Footsteps => "footstep",
            Self::Walking => "walking",
            Self::PreGrasp => "pre-grasp",
            Self::Grasp => "grasp",
            Self::Stand => "stand",
            Self::EndPose => "end pose",
        }
    }
}

/// Posture database entries used by the scenario.
mod postures {
    pub const DRILL: &str = "drill";
    pub const RAISE_TO_CAMERA: &str = "drill in camera";
    pub const POINTER_RAISE: &str = "drill in camera pointer";
}

/// State shared by every step of a drill scenario.
///
/// Owns frame synthesis and every collaborator; step actions borrow it
/// mutably from the [`TaskQueue`], one step at a time.
pub struct DrillDemo {
    config: ScenarioConfig,
    frames: FrameSynthesis,
    pose: Box<dyn PoseSource>,
    footsteps: Box<dyn FootstepPlanner>,
    manip: Box<dyn ManipPlanner>,
    robot: Box<dyn RobotDriver>,
    hand: Box<dyn HandDriver>,
    sensor: Box<dyn SensorHead>,
    fitter: Box<dyn ObjectFitter>,
    plan_from_current_state: bool,
    plans: Vec<PlanArtifact>,
    footstep_plan: Option<PlanArtifact>,
    walking_plan: Option<PlanArtifact>,
    pre_grasp_plan: Option<PlanArtifact>,
    grasp_plan: Option<PlanArtifact>,
    stand_plan: Option<PlanArtifact>,
    end_pose_plan: Option<PlanArtifact>,
}

impl DrillDemo {
    /// Wires the scenario to its collaborators.
    pub fn new(collaborators: Collaborators, config: ScenarioConfig) -> Self {
        let Collaborators {
            pose,
            kinematics,
            footsteps,
            manip,
            robot,
            hand,
            sensor,
            fitter,
        } = collaborators;
        Self {
            frames: FrameSynthesis::new(kinematics, config.offsets.clone()),
            plan_from_current_state: config.plan_from_current_state,
            config,
            pose,
            footsteps,
            manip,
            robot,
            hand,
            sensor,
            fitter,
            plans: Vec::new(),
            footstep_plan: None,
            walking_plan: None,
            pre_grasp_plan: None,
            grasp_plan: None,
            stand_plan: None,
            end_pose_plan: None,
        }
    }

    /// Scenario configuration.
    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Frame synthesis state.
    pub fn frames(&self) -> &FrameSynthesis {
        &self.frames
    }

    /// Plans added for preview, oldest first.
    pub fn plans(&self) -> &[PlanArtifact] {
        &self.plans
    }

    /// Whether planning starts from the estimated robot state.
    pub fn plan_from_current_state(&self) -> bool {
        self.plan_from_current_state
    }

    /// Chooses where planning starts; see [`DrillDemo::planning_start_pose`].
    pub fn set_plan_from_current_state(&mut self, value: bool) {
        self.plan_from_current_state = value;
    }

    /// Hand that grasps the object.
    pub fn grasping_hand(&self) -> Side {
        self.config.grasping_hand
    }

    /// Hand that presses the button.
    pub fn pointer_hand(&self) -> Side {
        self.config.grasping_hand.opposite()
    }

    /// Estimated robot state.
    pub fn estimated_pose(&self) -> JointConfiguration {
        self.pose.current_pose()
    }

    /// Start pose for the next plan.
    ///
    /// The estimated state when planning from the current state; otherwise
    /// the end pose of the most recent preview plan, falling back to the
    /// estimated state when there is none.
    pub fn planning_start_pose(&self) -> JointConfiguration {
        if !self.plan_from_current_state {
            if let Some(end) = self.plans.last().and_then(|p| p.end_pose.clone()) {
                return end;
            }
        }
        self.estimated_pose()
    }

    /// Most recent plan in `slot`.
    pub fn plan(&self, slot: PlanSlot) -> Option<&PlanArtifact> {
        match slot {
            PlanSlot::Footsteps => self.footstep_plan.as_ref(),
            PlanSlot::Walking => self.walking_plan.as_ref(),
            PlanSlot::PreGrasp => self.pre_grasp_plan.as_ref(),
            PlanSlot::Grasp => self.grasp_plan.as_ref(),
            PlanSlot::Stand => self.stand_plan.as_ref(),
            PlanSlot::EndPose => self.end_pose_plan.as_ref(),
        }
    }

    fn require_plan(&self, slot: PlanSlot) -> Result<&PlanArtifact, DemoError> {
        self.plan(slot).ok_or(DemoError::MissingPlan(slot.name()))
    }

    fn add_plan(&mut self, plan: PlanArtifact) {
        debug!(label = %plan.label, kind = ?plan.kind, "plan added");
        self.plans.push(plan);
    }

    fn target(&self, frame: &str, goal: &str) -> Result<RigidTransform, DemoError> {
        Ok(self.frames.store().require(frame, goal)?)
    }

    // -- perception and frames ----------------------------------------------

    /// Places the object at its nominal offset from the robot and derives
    /// grasp, stance and tip frames, without sensing.
    pub fn spawn_object(&mut self) -> Result<()> {
        let pose = self.estimated_pose();
        self.frames.spawn_object_frame(&pose)?;
        self.compute_grasp_frame()?;
        self.compute_stance_frame()?;
        self.compute_tip_frame()?;
        Ok(())
    }

    /// Fits the object to sensor data and records its pose.
    pub fn fit_object(&mut self) -> Result<()> {
        let fitted = self.fitter.fit()?;
        self.frames.set_object_pose(&fitted)?;
        info!(position = ?fitted.transform.translation().to_array(), "object fitted");
        Ok(())
    }

    /// Fails with [`DemoError::MissingObject`] until the object is located.
    pub fn require_object(&self) -> Result<(), DemoError> {
        if self.frames.transform(OBJECT_FRAME).is_some() {
            Ok(())
        } else {
            Err(DemoError::MissingObject)
        }
    }

    /// Grasp frame for the configured style.
    pub fn compute_grasp_frame(&mut self) -> Result<RigidTransform, DemoError> {
        Ok(self.frames.compute_grasp_frame()?)
    }

    /// Stance frame from the grasp frame and the current ground frame.
    pub fn compute_stance_frame(&mut self) -> Result<RigidTransform, DemoError> {
        let pose = self.estimated_pose();
        Ok(self.frames.compute_stance_frame(&pose)?)
    }

    /// Tool-tip frame.
    pub fn compute_tip_frame(&mut self) -> Result<RigidTransform, DemoError> {
        Ok(self.frames.compute_tip_frame()?)
    }

    /// Button frame from the fitted button geometry.
    pub fn compute_button_frame(&mut self) -> Result<RigidTransform, DemoError> {
        Ok(self.frames.compute_button_frame()?)
    }

    /// Lidar revolutions shown so far.
    pub fn sensor_revolution(&self) -> u64 {
        self.sensor.revolution()
    }

    // -- planning -----------------------------------------------------------

    /// Footstep plan to the stance frame.
    pub fn compute_footstep_plan(&mut self) -> Result<()> {
        let start = self.planning_start_pose();
        let goal = self.target(STANCE_FRAME, "footstep goal")?;
        self.footstep_plan = Some(self.footsteps.plan_footsteps(&start, &goal)?);
        Ok(())
    }

    /// Walking trajectory for the footstep plan; added for preview.
    pub fn compute_walking_plan(&mut self) -> Result<()> {
        let footsteps = self.require_plan(PlanSlot::Footsteps)?.clone();
        let start = self.planning_start_pose();
        let plan = self.footsteps.plan_walking(&footsteps, &start)?;
        self.walking_plan = Some(plan.clone());
        self.add_plan(plan);
        Ok(())
    }

    /// Arm-up pre-grasp posture for the grasp frame.
    ///
    /// Starts from the estimated state, or from the end of the walking plan
    /// when previewing.
    pub fn compute_pre_grasp_plan(&mut self) -> Result<()> {
        let start = if self.plan_from_current_state {
            self.estimated_pose()
        } else {
            self.require_plan(PlanSlot::Walking)?
                .end_pose
                .clone()
                .unwrap_or_else(|| self.estimated_pose())
        };
        let goal = ManipGoal::PreGrasp {
            side: self.grasping_hand(),
            target: self.target(GRASP_FRAME, "pre-grasp goal")?,
        };
        self.pre_grasp_plan = Some(self.manip.plan(&start, &goal)?);
        Ok(())
    }

    /// Torso-locked reach to the grasp frame; added for preview.
    pub fn compute_grasp_plan(&mut self) -> Result<()> {
        let start = self.planning_start_pose();
        let goal = ManipGoal::EndEffector {
            side: self.grasping_hand(),
            target: self.target(GRASP_FRAME, "grasp goal")?,
            lock_torso: true,
        };
        let plan = self.manip.plan(&start, &goal)?;
        self.grasp_plan = Some(plan.clone());
        self.add_plan(plan);
        Ok(())
    }

    /// Return to the nominal posture; added for preview.
    pub fn compute_stand_plan(&mut self) -> Result<()> {
        let start = self.planning_start_pose();
        let plan = self.manip.plan(&start, &ManipGoal::Nominal)?;
        self.stand_plan = Some(plan.clone());
        self.add_plan(plan);
        Ok(())
    }

    /// Whole-body end pose with the grasping hand's base link on the grasp
    /// frame, solved from the estimated state and shown for review. Not added
    /// to the preview chain.
    pub fn compute_end_pose_plan(&mut self) -> Result<()> {
        let start = self.estimated_pose();
        let side = self.grasping_hand();
        let goal = ManipGoal::EndPose {
            side,
            target: self.target(GRASP_FRAME, "end pose goal")?,
        };
        let plan = self.manip.plan(&start, &goal)?;
        info!(link = side.hand_base_link(), label = %plan.label, "end pose");
        self.end_pose_plan = Some(plan);
        Ok(())
    }

    fn compute_posture_plan(&mut self, name: &str, side: Side) -> Result<()> {
        let start = self.planning_start_pose();
        let goal = ManipGoal::Posture {
            group: postures::DRILL.into(),
            name: name.into(),
            side,
        };
        let plan = self.manip.plan(&start, &goal)?;
        self.add_plan(plan);
        Ok(())
    }

    /// Raise the held object in front of the camera; added for preview.
    pub fn compute_raise_plan(&mut self) -> Result<()> {
        self.compute_posture_plan(postures::RAISE_TO_CAMERA, self.grasping_hand())
    }

    /// Raise the pointer hand next to the object; added for preview.
    pub fn compute_pointer_raise_plan(&mut self) -> Result<()> {
        self.compute_posture_plan(postures::POINTER_RAISE, self.pointer_hand())
    }

    /// Pointer press on the button, gazing at it; added for preview.
    pub fn compute_pointer_press_plan(&mut self) -> Result<()> {
        let start = self.planning_start_pose();
        let goal = ManipGoal::Gaze {
            side: self.pointer_hand(),
            target: self.target(BUTTON_FRAME, "pointer press goal")?,
        };
        let plan = self.manip.plan(&start, &goal)?;
        self.add_plan(plan);
        Ok(())
    }

    /// Logs one plan for operator review.
    pub fn preview(&self, slot: PlanSlot) -> Result<(), DemoError> {
        let plan = self.require_plan(slot)?;
        info!(slot = slot.name(), label = %plan.label, kind = ?plan.kind, "preview plan");
        Ok(())
    }

    /// Logs every plan added so far, in order.
    pub fn preview_plans(&self) {
        for (index, plan) in self.plans.iter().enumerate() {
            info!(index, label = %plan.label, kind = ?plan.kind, "preview plan");
        }
    }

    // -- commits and commands -------------------------------------------------

    /// Sends the footstep plan.
    pub fn commit_footstep_plan(&mut self) -> Result<()> {
        let plan = self.require_plan(PlanSlot::Footsteps)?.clone();
        info!(label = %plan.label, "committing footstep plan");
        self.footsteps.commit(&plan)
    }

    /// Sends a manipulation plan.
    pub fn commit_manip_plan(&mut self, slot: PlanSlot) -> Result<()> {
        let plan = self.require_plan(slot)?.clone();
        info!(slot = slot.name(), label = %plan.label, "committing manip plan");
        self.manip.commit(&plan)
    }

    /// Requests the stand behavior.
    pub fn send_stand(&mut self) -> Result<()> {
        self.robot.send_stand()
    }

    /// Requests manipulation mode.
    pub fn send_manip(&mut self) -> Result<()> {
        self.robot.send_manip()
    }

    /// Lets plans use the controller's own pelvis height.
    pub fn send_plan_with_height_mode(&mut self) -> Result<()> {
        self.robot.send_plan_with_height_mode(true)
    }

    /// Lowers the pelvis.
    pub fn send_pelvis_crouch(&mut self) -> Result<()> {
        self.robot.send_pelvis_height(self.config.pelvis.crouch)
    }

    /// Raises the pelvis to standing height.
    pub fn send_pelvis_stand(&mut self) -> Result<()> {
        self.robot.send_pelvis_height(self.config.pelvis.stand)
    }

    /// `true` when the robot reports `behavior`.
    pub fn behavior_is(&self, behavior: Behavior) -> bool {
        self.robot.current_behavior() == Some(behavior)
    }

    /// Opens the grasping hand.
    pub fn open_hand(&mut self) -> Result<()> {
        self.hand.open()
    }

    /// Closes the grasping hand at the configured strength.
    pub fn close_hand(&mut self) -> Result<()> {
        self.hand.close(self.config.close_strength)
    }

    /// Tilts the head down at the workspace.
    pub fn look_down(&mut self) -> Result<()> {
        self.sensor.set_neck_pitch(self.config.neck_pitch.look_down)
    }

    /// Tilts the head forward.
    pub fn look_forward(&mut self) -> Result<()> {
        self.sensor.set_neck_pitch(self.config.neck_pitch.look_forward)
    }

    /// Wraps `steps` in a queue with the configured cycle and prompt policy.
    pub fn into_queue(self, steps: Vec<Step<Self>>) -> TaskQueue<Self> {
        let policy = self.config.confirm_policy();
        let tick = self.config.tick();
        let mut queue = TaskQueue::new(self).with_policy(policy).with_interval(tick);
        queue.extend(steps);
        queue
    }
}
