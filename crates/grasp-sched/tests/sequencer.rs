// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
//! Queue ordering, timing and abort behaviour under a paused tokio clock.

use std::time::Duration;

use grasp_sched::{
    AbortCause, ConfirmPolicy, Progress, QueueOutcome, ScriptedOperator, Step, StepState,
    TaskQueue,
};
use tokio::time::Instant;

#[derive(Default)]
struct Trace {
    events: Vec<&'static str>,
    stamps: Vec<Instant>,
}

fn mark(label: &'static str) -> Step<Trace> {
    Step::immediate(label, move |t: &mut Trace| {
        t.events.push(label);
        t.stamps.push(Instant::now());
        Ok(())
    })
}

#[tokio::test(start_paused = true)]
async fn immediates_run_in_enqueue_order() {
    let mut queue = TaskQueue::new(Trace::default());
    queue.extend(["a", "b", "c", "d", "e"].map(mark));
    assert!(queue.run().await.is_completed());
    assert_eq!(queue.context().events, vec!["a", "b", "c", "d", "e"]);
}

#[tokio::test(start_paused = true)]
async fn timed_step_separates_its_neighbours() {
    let dwell = Duration::from_secs(3);
    let mut queue = TaskQueue::new(Trace::default()).with_interval(Duration::from_millis(50));
    queue.enqueue(mark("before"));
    queue.enqueue(Step::delay(dwell));
    queue.enqueue(mark("after"));

    assert!(queue.run().await.is_completed());
    let stamps = &queue.context().stamps;
    let gap = stamps[1] - stamps[0];
    assert!(gap >= dwell, "gap {gap:?}");
    assert!(gap < dwell + Duration::from_millis(100), "gap {gap:?}");
}

#[tokio::test(start_paused = true)]
async fn zero_interval_still_ticks() {
    let mut queue = TaskQueue::new(Trace::default()).with_interval(Duration::ZERO);
    queue.enqueue(mark("first"));
    queue.enqueue(Step::delay(Duration::from_millis(5)));
    queue.enqueue(mark("second"));

    assert!(queue.run().await.is_completed());
    assert_eq!(queue.context().events, vec!["first", "second"]);
    let stamps = &queue.context().stamps;
    assert!(stamps[1] - stamps[0] >= Duration::from_millis(5));
}

#[tokio::test(start_paused = true)]
async fn polling_step_waits_for_hardware_state() {
    let mut queue = TaskQueue::new(Trace::default());
    let ready_at = Instant::now() + Duration::from_millis(400);
    queue.enqueue(Step::polling("wait for stand", move |_| {
        Ok(Instant::now() >= ready_at)
    }));
    queue.enqueue(mark("standing"));

    assert!(queue.run().await.is_completed());
    assert!(queue.context().stamps[0] >= ready_at);
    assert!(queue.cycles() > 1);
}

#[test]
fn satisfied_predicate_costs_no_extra_cycle() {
    let mut queue = TaskQueue::new(Trace::default());
    queue.enqueue(Step::polling("already there", |_| Ok(true)));
    queue.enqueue(mark("next"));
    assert!(matches!(queue.tick(), Progress::Finished(QueueOutcome::Completed)));
    assert_eq!(queue.cycles(), 1);
    assert_eq!(queue.context().events, vec!["next"]);
}

#[tokio::test(start_paused = true)]
async fn accepted_confirmation_lets_the_queue_continue() {
    let operator = ScriptedOperator::new(["y"]);
    let mut queue = TaskQueue::new(Trace::default()).with_operator(operator.clone());
    queue.enqueue(mark("a"));
    queue.enqueue(Step::confirm("walk to drill?"));
    queue.enqueue(mark("b"));

    assert!(queue.run().await.is_completed());
    assert_eq!(queue.context().events, vec!["a", "b"]);
    assert_eq!(operator.prompts(), vec!["walk to drill?".to_owned()]);
}

#[tokio::test(start_paused = true)]
async fn rejected_confirmation_aborts_the_rest() {
    let operator = ScriptedOperator::new(["n"]);
    let mut queue = TaskQueue::new(Trace::default()).with_operator(operator);
    queue.enqueue(Step::confirm("grasp?"));
    queue.enqueue(mark("a"));
    queue.enqueue(mark("b"));

    let outcome = queue.run().await;
    let abort = outcome.abort().unwrap();
    assert_eq!(abort.index, 0);
    match &abort.cause {
        AbortCause::User(user) => {
            assert_eq!(user.prompt, "grasp?");
            assert_eq!(user.answer.as_deref(), Some("n"));
        }
        other => panic!("unexpected cause {other:?}"),
    }
    assert!(queue.context().events.is_empty());
    assert_eq!(queue.states(), vec![StepState::Aborted; 3]);
}

#[test]
fn confirmation_waits_for_a_late_answer() {
    let operator = ScriptedOperator::default();
    let mut queue = TaskQueue::new(Trace::default()).with_operator(operator.clone());
    queue.enqueue(Step::confirm("ready?"));
    queue.enqueue(mark("go"));

    assert!(matches!(queue.tick(), Progress::Suspended));
    assert!(matches!(queue.tick(), Progress::Suspended));
    assert_eq!(operator.prompts().len(), 1);
    operator.push_answer(" y\n");
    assert!(matches!(queue.tick(), Progress::Finished(QueueOutcome::Completed)));
    assert_eq!(queue.context().events, vec!["go"]);
}

#[test]
fn disabled_prompts_skip_confirmation() {
    let mut queue = TaskQueue::new(Trace::default()).with_policy(ConfirmPolicy::disabled());
    queue.enqueue(Step::confirm("ready?"));
    queue.enqueue(mark("go"));
    assert!(matches!(queue.tick(), Progress::Finished(QueueOutcome::Completed)));
    assert_eq!(queue.context().events, vec!["go"]);
}

#[test]
fn confirmation_without_operator_is_refused() {
    let mut queue = TaskQueue::new(Trace::default());
    queue.enqueue(Step::confirm("ready?"));
    let Progress::Finished(QueueOutcome::Aborted(abort)) = queue.tick() else {
        panic!("expected abort");
    };
    assert!(matches!(abort.cause, AbortCause::User(ref u) if u.answer.is_none()));
}

#[test]
fn failing_action_aborts_with_invocation_error() {
    let mut queue = TaskQueue::new(Trace::default());
    queue.enqueue(mark("a"));
    queue.enqueue(Step::immediate("plan walk", |_| {
        Err(anyhow::anyhow!("planner unavailable"))
    }));
    queue.enqueue(mark("b"));

    let Progress::Finished(outcome) = queue.tick() else {
        panic!("expected the queue to finish");
    };
    let abort = outcome.into_result().unwrap_err();
    assert_eq!(abort.index, 1);
    assert_eq!(abort.step, "plan walk");
    assert!(matches!(abort.cause, AbortCause::Invocation(_)));
    assert!(abort.to_string().contains("planner unavailable"));
    assert_eq!(queue.context().events, vec!["a"]);
    assert_eq!(
        queue.states(),
        vec![StepState::Completed, StepState::Aborted, StepState::Aborted]
    );
}

#[test]
fn queue_can_be_rebuilt_from_its_context() {
    let mut first = TaskQueue::new(Trace::default());
    first.enqueue(Step::immediate("fail", |_| Err(anyhow::anyhow!("boom"))));
    assert!(matches!(first.tick(), Progress::Finished(QueueOutcome::Aborted(_))));

    let mut second = TaskQueue::new(first.into_context());
    second.enqueue(mark("retry"));
    assert!(matches!(second.tick(), Progress::Finished(QueueOutcome::Completed)));
    assert_eq!(second.context().events, vec!["retry"]);
}
