// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Grasp Scheduler
//!
//! A cooperative task sequencer. Blocking calls, hardware-state polls, dwell
//! times and operator checkpoints are all [`Step`]s drained in strict order by
//! one [`TaskQueue`] loop.

mod operator;
mod outcome;
mod queue;
mod step;

pub use operator::{ChannelOperator, ConfirmPolicy, Operator, ScriptedOperator};
pub use outcome::{Abort, AbortCause, QueueOutcome, StepInvocationError, UserAbort};
pub use queue::{Progress, TaskQueue};
pub use step::{Step, StepKind, StepState};
