// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, instrument, trace, warn};

use crate::{
    Abort, AbortCause, ConfirmPolicy, Operator, QueueOutcome, Step, StepInvocationError,
    StepKind, StepState, UserAbort,
};

/// Shortest period [`TaskQueue::run`] will tick at.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Result of one scheduler cycle.
#[derive(Debug, Clone)]
pub enum Progress {
    /// The current step is waiting; call again next cycle.
    Suspended,
    /// The queue is done.
    Finished(QueueOutcome),
}

struct Entry<C> {
    step: Step<C>,
    state: StepState,
    started: Option<Instant>,
}

/// Ordered list of steps run against a context `C`.
///
/// Only one step is ever active. A cycle ([`TaskQueue::tick`]) starts the
/// current step if it is pending, checks its completion condition and, while
/// steps complete, moves straight on to the next one. It returns once a step
/// has to wait, or the queue is exhausted or aborted.
pub struct TaskQueue<C> {
    context: C,
    entries: Vec<Entry<C>>,
    cursor: usize,
    operator: Option<Box<dyn Operator>>,
    policy: ConfirmPolicy,
    interval: Duration,
    cycles: u64,
    outcome: Option<QueueOutcome>,
}

impl<C> TaskQueue<C> {
    /// Empty queue over `context`, 50 ms cycle, prompts enabled, no operator.
    pub fn new(context: C) -> Self {
        Self {
            context,
            entries: Vec::new(),
            cursor: 0,
            operator: None,
            policy: ConfirmPolicy::default(),
            interval: Duration::from_millis(50),
            cycles: 0,
            outcome: None,
        }
    }

    /// Attaches the operator consulted by confirmation steps.
    #[must_use]
    pub fn with_operator(mut self, operator: impl Operator + 'static) -> Self {
        self.operator = Some(Box::new(operator));
        self
    }

    /// Sets the confirmation policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ConfirmPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the period used by [`TaskQueue::run`], at least one millisecond.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_INTERVAL);
        self
    }

    /// Appends a step. Ignored once the queue has finished.
    pub fn enqueue(&mut self, step: Step<C>) {
        if self.outcome.is_some() {
            warn!(step = step.name(), "queue already finished; step dropped");
            return;
        }
        self.entries.push(Entry {
            step,
            state: StepState::Pending,
            started: None,
        });
    }

    /// Appends several steps in order.
    pub fn extend<I: IntoIterator<Item = Step<C>>>(&mut self, steps: I) {
        for step in steps {
            self.enqueue(step);
        }
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when no step has been enqueued.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// State of every step, in queue order.
    pub fn states(&self) -> Vec<StepState> {
        self.entries.iter().map(|e| e.state).collect()
    }

    /// Step names, in queue order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.step.name()).collect()
    }

    /// Index of the current step.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Cycles run so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Final outcome, once finished.
    pub fn outcome(&self) -> Option<&QueueOutcome> {
        self.outcome.as_ref()
    }

    /// Shared context.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Mutable context, for setup between cycles.
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    /// Consumes the queue and returns its context.
    pub fn into_context(self) -> C {
        self.context
    }

    /// Runs one scheduler cycle.
    pub fn tick(&mut self) -> Progress {
        if let Some(outcome) = &self.outcome {
            return Progress::Finished(outcome.clone());
        }
        self.cycles += 1;

        loop {
            let index = self.cursor;
            let Some(entry) = self.entries.get_mut(index) else {
                info!(steps = self.entries.len(), "queue completed");
                return self.finish(QueueOutcome::Completed);
            };

            let done = advance(
                entry,
                &mut self.context,
                self.operator.as_deref_mut(),
                &self.policy,
            );
            match done {
                Ok(true) => {
                    entry.state = StepState::Completed;
                    debug!(index, step = entry.step.name(), "step completed");
                    self.cursor += 1;
                }
                Ok(false) => {
                    trace!(index, step = entry.step.name(), "step waiting");
                    return Progress::Suspended;
                }
                Err(cause) => {
                    let abort = Abort {
                        index,
                        step: entry.step.name().to_owned(),
                        cause,
                    };
                    warn!(%abort, "queue aborted");
                    for rest in &mut self.entries[index..] {
                        rest.state = StepState::Aborted;
                    }
                    return self.finish(QueueOutcome::Aborted(abort));
                }
            }
        }
    }

    /// Drives the queue at the configured interval until it finishes.
    #[instrument(skip(self), fields(steps = self.entries.len()))]
    pub async fn run(&mut self) -> QueueOutcome {
        let mut interval = time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Sequencer started. Tick interval: {:?}", self.interval);

        loop {
            interval.tick().await;
            if let Progress::Finished(outcome) = self.tick() {
                return outcome;
            }
        }
    }

    fn finish(&mut self, outcome: QueueOutcome) -> Progress {
        self.outcome = Some(outcome.clone());
        Progress::Finished(outcome)
    }
}

/// Starts `entry` if pending, then reports whether it is complete.
fn advance<C>(
    entry: &mut Entry<C>,
    context: &mut C,
    operator: Option<&mut (dyn Operator + 'static)>,
    policy: &ConfirmPolicy,
) -> Result<bool, AbortCause> {
    let starting = entry.state == StepState::Pending;
    if starting {
        entry.state = StepState::Running;
        entry.started = Some(Instant::now());
        info!(step = entry.step.name(), "step started");
    }
    let name = entry.step.name().to_owned();
    let invocation = |error: anyhow::Error| StepInvocationError {
        step: name.clone(),
        error: Arc::new(error),
    };

    match entry.step.kind_mut() {
        StepKind::Immediate(action) => {
            action(context).map_err(invocation)?;
            Ok(true)
        }
        StepKind::Polling(predicate) => predicate(context).map_err(|e| invocation(e).into()),
        StepKind::Timed(duration) => Ok(entry
            .started
            .is_none_or(|started| started.elapsed() >= *duration)),
        StepKind::Confirmation(prompt) => {
            if !policy.enabled {
                return Ok(true);
            }
            let Some(operator) = operator else {
                return Err(UserAbort {
                    prompt: prompt.clone(),
                    answer: None,
                }
                .into());
            };
            if starting {
                operator.request(prompt);
            }
            match operator.poll_answer() {
                None => Ok(false),
                Some(answer) if policy.accepts(&answer) => Ok(true),
                Some(answer) => Err(UserAbort {
                    prompt: prompt.clone(),
                    answer: Some(answer),
                }
                .into()),
            }
        }
    }
}
