// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Simulated robot implementing every collaborator port.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{bail, Result};
use grasp_frames::{FrameError, JointConfiguration, Kinematics, ObjectPose, PoseSource};
use grasp_geom::{RigidTransform, Vec3};
use grasp_tasks::{
    Behavior, Collaborators, DrillDemo, FootstepPlanner, HandDriver, ManipGoal, ManipPlanner,
    ObjectFitter, PlanArtifact, PlanKind, RobotDriver, ScenarioConfig, SensorHead,
};

/// Foot link height above the sole in the simulated model.
pub const SIM_FOOT_HEIGHT: f64 = 0.0811;
/// Lateral distance of each foot from the robot base.
pub const SIM_HALF_STANCE: f64 = 0.1;
/// Pelvis height above the ground.
pub const SIM_PELVIS_HEIGHT: f64 = 0.9;

/// Every command the rig received, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Stand behavior requested.
    Stand,
    /// Manipulation behavior requested.
    Manip,
    /// Plan height mode selected.
    PlanWithHeightMode(bool),
    /// Pelvis height commanded.
    PelvisHeight(f64),
    /// Hand opened.
    OpenHand,
    /// Hand closed with strength.
    CloseHand(u8),
    /// Neck pitch commanded.
    NeckPitch(f64),
    /// Footstep plan committed.
    CommitFootsteps(String),
    /// Manipulation plan committed.
    CommitManip(String),
}

#[derive(Debug)]
struct RigState {
    pose: JointConfiguration,
    behavior: Behavior,
    pending_behaviors: VecDeque<Behavior>,
    revolution: u64,
    object: ObjectPose,
    commands: Vec<Command>,
    footstep_goals: Vec<RigidTransform>,
    manip_goals: Vec<ManipGoal>,
    plan_starts: Vec<JointConfiguration>,
    plans_issued: usize,
    fits: usize,
    fail_fit: bool,
    fail_planning: bool,
}

/// A robot that obeys instantly.
///
/// Joint configurations are `[x, y, yaw_degrees, ..]`: the base pose on the
/// ground plane, followed by opaque arm joints the planners append to.
/// Committing a footstep plan moves the base to the plan's end pose and
/// reports `step` for two polls, then `stand`. Each read of the lidar
/// revolution counter advances it by one.
#[derive(Debug, Clone)]
pub struct SimRig {
    state: Arc<Mutex<RigState>>,
}

impl Default for SimRig {
    fn default() -> Self {
        Self::new()
    }
}

impl SimRig {
    /// Rig standing at the origin facing +x, with the default drill in view.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(RigState {
                pose: Self::base_pose(0.0, 0.0, 0.0),
                behavior: Behavior::Freeze,
                pending_behaviors: VecDeque::new(),
                revolution: 0,
                object: Self::default_object(),
                commands: Vec::new(),
                footstep_goals: Vec::new(),
                manip_goals: Vec::new(),
                plan_starts: Vec::new(),
                plans_issued: 0,
                fits: 0,
                fail_fit: false,
                fail_planning: false,
            })),
        }
    }

    /// Configuration with the base at `(x, y)` facing `yaw_degrees`.
    pub fn base_pose(x: f64, y: f64, yaw_degrees: f64) -> JointConfiguration {
        JointConfiguration::new(vec![x, y, yaw_degrees])
    }

    /// Drill on a table ahead and to the left, button facing +x.
    pub fn default_object() -> ObjectPose {
        ObjectPose::new(RigidTransform::from_position_and_rpy(
            Vec3::new(1.6, 0.5, 0.95),
            [0.0, 0.0, 10.0],
        ))
        .with_button(Vec3::new(0.05, 0.0, 0.1), Vec3::UNIT_X)
    }

    /// Collaborator bundle backed by this rig.
    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            pose: Box::new(self.clone()),
            kinematics: Box::new(self.clone()),
            footsteps: Box::new(self.clone()),
            manip: Box::new(self.clone()),
            robot: Box::new(self.clone()),
            hand: Box::new(self.clone()),
            sensor: Box::new(self.clone()),
            fitter: Box::new(self.clone()),
        }
    }

    /// A drill scenario wired to this rig.
    pub fn demo(&self, config: ScenarioConfig) -> DrillDemo {
        DrillDemo::new(self.collaborators(), config)
    }

    /// Places the robot.
    pub fn set_pose(&self, pose: JointConfiguration) {
        self.lock().pose = pose;
    }

    /// Object pose returned by subsequent fits.
    pub fn set_object(&self, object: ObjectPose) {
        self.lock().object = object;
    }

    /// Makes object fitting fail.
    pub fn set_fail_fit(&self, fail: bool) {
        self.lock().fail_fit = fail;
    }

    /// Makes every planning request fail.
    pub fn set_fail_planning(&self, fail: bool) {
        self.lock().fail_planning = fail;
    }

    /// Commands received so far.
    pub fn commands(&self) -> Vec<Command> {
        self.lock().commands.clone()
    }

    /// Footstep goals requested so far.
    pub fn footstep_goals(&self) -> Vec<RigidTransform> {
        self.lock().footstep_goals.clone()
    }

    /// Manipulation goals requested so far.
    pub fn manip_goals(&self) -> Vec<ManipGoal> {
        self.lock().manip_goals.clone()
    }

    /// Start pose of every planning request, in order.
    pub fn plan_starts(&self) -> Vec<JointConfiguration> {
        self.lock().plan_starts.clone()
    }

    /// Number of object fits performed.
    pub fn fits(&self) -> usize {
        self.lock().fits
    }

    /// Current base configuration.
    pub fn pose(&self) -> JointConfiguration {
        self.lock().pose.clone()
    }

    /// Last behavior reported.
    pub fn behavior(&self) -> Behavior {
        self.lock().behavior
    }

    fn lock(&self) -> MutexGuard<'_, RigState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, command: Command) {
        self.lock().commands.push(command);
    }

    fn issue(
        &self,
        kind: PlanKind,
        start: &JointConfiguration,
        end_pose: JointConfiguration,
    ) -> Result<PlanArtifact> {
        let mut state = self.lock();
        if state.fail_planning {
            bail!("simulated planner failure");
        }
        state.plans_issued += 1;
        state.plan_starts.push(start.clone());
        let label = format!("{kind:?} plan #{}", state.plans_issued).to_lowercase();
        Ok(PlanArtifact::new(kind, label, end_pose))
    }
}

fn base_transform(pose: &JointConfiguration) -> RigidTransform {
    let at = |i: usize| pose.positions.get(i).copied().unwrap_or(0.0);
    RigidTransform::from_position_and_rpy(Vec3::new(at(0), at(1), 0.0), [0.0, 0.0, at(2)])
}

impl PoseSource for SimRig {
    fn current_pose(&self) -> JointConfiguration {
        self.pose()
    }
}

impl Kinematics for SimRig {
    fn link_frame(
        &self,
        pose: &JointConfiguration,
        link: &str,
    ) -> Result<RigidTransform, FrameError> {
        let local = match link {
            "l_foot" => Vec3::new(0.0, SIM_HALF_STANCE, SIM_FOOT_HEIGHT),
            "r_foot" => Vec3::new(0.0, -SIM_HALF_STANCE, SIM_FOOT_HEIGHT),
            "pelvis" => Vec3::new(0.0, 0.0, SIM_PELVIS_HEIGHT),
            other => return Err(FrameError::UnknownLink(other.to_owned())),
        };
        Ok(RigidTransform::concatenate(
            &RigidTransform::from_translation(local),
            &base_transform(pose),
        ))
    }
}

impl FootstepPlanner for SimRig {
    fn plan_footsteps(
        &mut self,
        start: &JointConfiguration,
        goal: &RigidTransform,
    ) -> Result<PlanArtifact> {
        self.lock().footstep_goals.push(*goal);
        let forward = goal.x_axis();
        let yaw = forward.y().atan2(forward.x()).to_degrees();
        let end = Self::base_pose(goal.translation().x(), goal.translation().y(), yaw);
        self.issue(PlanKind::Footsteps, start, end)
    }

    fn plan_walking(
        &mut self,
        footsteps: &PlanArtifact,
        start: &JointConfiguration,
    ) -> Result<PlanArtifact> {
        let end = footsteps.end_pose.clone().unwrap_or_else(|| start.clone());
        self.issue(PlanKind::Walking, start, end)
    }

    fn commit(&mut self, footsteps: &PlanArtifact) -> Result<()> {
        let mut state = self.lock();
        state
            .commands
            .push(Command::CommitFootsteps(footsteps.label.clone()));
        if let Some(end) = &footsteps.end_pose {
            state.pose = end.clone();
        }
        state.pending_behaviors = VecDeque::from([Behavior::Step, Behavior::Step, Behavior::Stand]);
        Ok(())
    }
}

impl ManipPlanner for SimRig {
    fn plan(&mut self, start: &JointConfiguration, goal: &ManipGoal) -> Result<PlanArtifact> {
        self.lock().manip_goals.push(goal.clone());
        let kind = match goal {
            ManipGoal::Posture { .. } | ManipGoal::PreGrasp { .. } | ManipGoal::Nominal => {
                PlanKind::Posture
            }
            ManipGoal::EndEffector { .. } | ManipGoal::Gaze { .. } => PlanKind::Manipulation,
            ManipGoal::EndPose { .. } => PlanKind::EndPose,
        };
        // Arm joints are opaque; each plan appends one so chaining is observable.
        let mut end = start.clone();
        end.positions.push(1.0);
        self.issue(kind, start, end)
    }

    fn commit(&mut self, plan: &PlanArtifact) -> Result<()> {
        self.record(Command::CommitManip(plan.label.clone()));
        Ok(())
    }
}

impl RobotDriver for SimRig {
    fn send_stand(&mut self) -> Result<()> {
        self.record(Command::Stand);
        self.lock().behavior = Behavior::Stand;
        Ok(())
    }

    fn send_manip(&mut self) -> Result<()> {
        self.record(Command::Manip);
        self.lock().behavior = Behavior::Manip;
        Ok(())
    }

    fn send_plan_with_height_mode(&mut self, controller_height: bool) -> Result<()> {
        self.record(Command::PlanWithHeightMode(controller_height));
        Ok(())
    }

    fn send_pelvis_height(&mut self, height: f64) -> Result<()> {
        self.record(Command::PelvisHeight(height));
        Ok(())
    }

    fn current_behavior(&self) -> Option<Behavior> {
        let mut state = self.lock();
        if let Some(next) = state.pending_behaviors.pop_front() {
            state.behavior = next;
        }
        Some(state.behavior)
    }
}

impl HandDriver for SimRig {
    fn open(&mut self) -> Result<()> {
        self.record(Command::OpenHand);
        Ok(())
    }

    fn close(&mut self, strength: u8) -> Result<()> {
        self.record(Command::CloseHand(strength));
        Ok(())
    }
}

impl SensorHead for SimRig {
    fn set_neck_pitch(&mut self, degrees: f64) -> Result<()> {
        self.record(Command::NeckPitch(degrees));
        Ok(())
    }

    fn revolution(&self) -> u64 {
        let mut state = self.lock();
        let shown = state.revolution;
        state.revolution += 1;
        shown
    }
}

impl ObjectFitter for SimRig {
    fn fit(&mut self) -> Result<ObjectPose> {
        let mut state = self.lock();
        if state.fail_fit {
            bail!("no object found in sensor data");
        }
        state.fits += 1;
        Ok(state.object)
    }
}
