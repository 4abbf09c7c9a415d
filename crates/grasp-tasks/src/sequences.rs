// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Drill scenario scripts.
//!
//! Each builder returns the ordered step list for one scenario. Every
//! irreversible phase is preceded by a confirmation, so an abort always
//! leaves the robot between phases.

use grasp_sched::Step;

use crate::config::seconds;
use crate::{Behavior, DrillDemo, PlanSlot};

type DemoStep = Step<DrillDemo>;

fn wait_for_behavior(behavior: Behavior) -> DemoStep {
    Step::polling(format!("wait for behavior {behavior}"), move |demo: &mut DrillDemo| {
        Ok(demo.behavior_is(behavior))
    })
}

/// Waits for `sweeps` lidar revolutions after the step starts.
fn wait_for_clean_sweep(sweeps: u64) -> DemoStep {
    let mut target = None;
    Step::polling("wait for clean lidar sweep", move |demo: &mut DrillDemo| {
        let revolution = demo.sensor_revolution();
        let goal = *target.get_or_insert(revolution.saturating_add(sweeps));
        Ok(revolution >= goal)
    })
}

fn perceive(steps: &mut Vec<DemoStep>, sweeps: u64) {
    steps.push(Step::log("waiting for clean lidar sweep"));
    steps.push(wait_for_clean_sweep(sweeps));
    steps.push(Step::log("fitting drill affordance"));
    steps.push(Step::immediate("fit object", DrillDemo::fit_object));
    steps.push(Step::immediate("find object", |demo: &mut DrillDemo| {
        Ok(demo.require_object()?)
    }));
}

fn step<F>(name: &str, action: F) -> DemoStep
where
    F: FnMut(&mut DrillDemo) -> anyhow::Result<()> + Send + 'static,
{
    Step::immediate(name, action)
}

impl DrillDemo {
    /// The full autonomous grasp: walk to the drill, reach, grasp and stand.
    ///
    /// Plans from the estimated robot state.
    pub fn autonomous_sequence(&mut self) -> Vec<DemoStep> {
        self.set_plan_from_current_state(true);
        let cfg = self.config().clone();
        let dwell = cfg.dwell;
        let mut s = Vec::new();

        // stand and open hand
        s.push(Step::confirm("stand and open hand. continue? y/n: "));
        s.push(step("send stand", DrillDemo::send_stand));
        s.push(step("open hand", DrillDemo::open_hand));
        s.push(step("plan with height mode", DrillDemo::send_plan_with_height_mode));

        s.push(Step::confirm("sending neck pitch forward. continue? y/n: "));
        s.push(Step::log("neck pitch forward"));
        s.push(step("look forward", DrillDemo::look_forward));
        s.push(Step::delay(seconds(dwell.neck)));

        s.push(Step::confirm("perception and fitting. continue? y/n: "));
        perceive(&mut s, cfg.clean_sweeps);

        s.push(Step::log("computing grasp and stance frames"));
        s.push(step("grasp frame", |d| {
            d.compute_grasp_frame()?;
            Ok(())
        }));
        s.push(step("stance frame", |d| {
            d.compute_stance_frame()?;
            Ok(())
        }));

        s.push(Step::log("compute footstep plan"));
        s.push(step("footstep plan", DrillDemo::compute_footstep_plan));

        s.push(Step::confirm("sending footstep plan. continue? y/n: "));
        s.push(Step::log("walking"));
        s.push(step("commit footsteps", DrillDemo::commit_footstep_plan));
        s.push(wait_for_behavior(Behavior::Step));
        s.push(wait_for_behavior(Behavior::Stand));

        s.push(Step::confirm("sending neck pitch. continue? y/n: "));
        s.push(Step::log("neck pitch down"));
        s.push(step("look down", DrillDemo::look_down));
        s.push(Step::delay(seconds(dwell.neck)));

        if cfg.crouch_before_pre_grasp {
            s.push(Step::confirm("crouch. continue? y/n: "));
            s.push(Step::log("send manip mode"));
            s.push(step("manip mode", DrillDemo::send_manip));
            s.push(Step::delay(seconds(dwell.manip_mode)));
            s.push(Step::log("crouching"));
            s.push(step("crouch", DrillDemo::send_pelvis_crouch));
            s.push(Step::delay(seconds(dwell.crouch)));
        }

        s.push(Step::confirm("plan pre grasp. continue? y/n: "));
        s.push(Step::log("computing pre grasp plan"));
        s.push(step("pre-grasp plan", DrillDemo::compute_pre_grasp_plan));
        s.push(step("preview pre-grasp", |d| Ok(d.preview(PlanSlot::PreGrasp)?)));

        s.push(Step::confirm("commit manip plan. continue? y/n: "));
        s.push(step("manip mode", DrillDemo::send_manip));
        s.push(Step::delay(seconds(dwell.manip_mode)));
        s.push(Step::log("commit pre grasp plan"));
        s.push(step("commit pre-grasp", |d| d.commit_manip_plan(PlanSlot::PreGrasp)));
        s.push(Step::delay(seconds(dwell.pre_grasp_commit)));

        s.push(Step::confirm("perception and fitting. continue? y/n: "));
        perceive(&mut s, cfg.clean_sweeps);

        s.push(Step::log("computing grasp frame"));
        s.push(step("grasp frame", |d| {
            d.compute_grasp_frame()?;
            Ok(())
        }));

        s.push(Step::log("computing grasp plan"));
        s.push(step("grasp plan", DrillDemo::compute_grasp_plan));
        s.push(step("preview grasp", |d| Ok(d.preview(PlanSlot::Grasp)?)));

        s.push(Step::confirm("commit manip plan. continue? y/n: "));
        s.push(Step::log("commit grasp plan"));
        s.push(step("commit grasp", |d| d.commit_manip_plan(PlanSlot::Grasp)));
        s.push(Step::delay(seconds(dwell.grasp_commit)));

        s.push(Step::log("recompute grasp plan"));
        s.push(step("grasp plan", DrillDemo::compute_grasp_plan));
        s.push(step("preview grasp", |d| Ok(d.preview(PlanSlot::Grasp)?)));

        s.push(Step::confirm("commit manip plan. continue? y/n: "));
        s.push(Step::log("commit grasp plan"));
        s.push(step("commit grasp", |d| d.commit_manip_plan(PlanSlot::Grasp)));
        s.push(Step::delay(seconds(dwell.refine_commit)));

        s.push(Step::confirm("closing hand. continue? y/n: "));
        s.push(Step::log("close hand"));
        s.push(step("close hand", DrillDemo::close_hand));
        s.push(Step::delay(seconds(dwell.hand_close)));

        s.push(Step::confirm("send stand command. continue? y/n: "));
        if cfg.crouch_before_pre_grasp {
            s.push(step("pelvis stand", DrillDemo::send_pelvis_stand));
        }
        s.push(step("send stand", DrillDemo::send_stand));
        s.push(Step::delay(seconds(dwell.stand)));
        s.push(step("manip mode", DrillDemo::send_manip));
        s.push(Step::delay(seconds(dwell.manip_mode)));

        s.push(Step::log("done!"));
        s
    }

    /// Plans the whole approach without commanding the robot.
    ///
    /// Each plan starts from the end of the previous one; the plans are logged
    /// for review at the end.
    pub fn nominal_preview_sequence(&mut self) -> Vec<DemoStep> {
        self.set_plan_from_current_state(false);
        vec![
            Step::log("computing nominal plan"),
            step("find object", |d| Ok(d.require_object()?)),
            step("grasp frame", |d| {
                d.compute_grasp_frame()?;
                Ok(())
            }),
            step("stance frame", |d| {
                d.compute_stance_frame()?;
                Ok(())
            }),
            step("footstep plan", DrillDemo::compute_footstep_plan),
            step("walking plan", DrillDemo::compute_walking_plan),
            step("pre-grasp plan", DrillDemo::compute_pre_grasp_plan),
            step("grasp plan", DrillDemo::compute_grasp_plan),
            step("preview plans", |d| {
                d.preview_plans();
                Ok(())
            }),
        ]
    }

    /// Plans switching the held drill on with the other hand.
    pub fn turn_on_preview_sequence(&mut self) -> Vec<DemoStep> {
        self.set_plan_from_current_state(false);
        vec![
            Step::log("computing turn-on plan"),
            step("fit object", DrillDemo::fit_object),
            step("button frame", |d| {
                d.compute_button_frame()?;
                Ok(())
            }),
            step("raise to camera", DrillDemo::compute_raise_plan),
            step("pointer raise", DrillDemo::compute_pointer_raise_plan),
            step("pointer press", DrillDemo::compute_pointer_press_plan),
            step("pointer raise", DrillDemo::compute_pointer_raise_plan),
            step("stand plan", DrillDemo::compute_stand_plan),
            step("preview plans", |d| {
                d.preview_plans();
                Ok(())
            }),
        ]
    }
}
