// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use std::sync::Arc;

use thiserror::Error;

/// A step's action or predicate returned an error.
#[derive(Debug, Clone, Error)]
#[error("step `{step}` failed: {error:#}")]
pub struct StepInvocationError {
    /// Name of the failing step.
    pub step: String,
    /// Error raised by the step.
    pub error: Arc<anyhow::Error>,
}

/// The operator declined a confirmation prompt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("operator declined {prompt:?} (answer: {answer:?})")]
pub struct UserAbort {
    /// Prompt text.
    pub prompt: String,
    /// Answer received, or `None` when no operator was attached.
    pub answer: Option<String>,
}

/// Why a queue aborted.
#[derive(Debug, Clone, Error)]
pub enum AbortCause {
    /// Confirmation rejected.
    #[error(transparent)]
    User(#[from] UserAbort),
    /// Step action or predicate failed.
    #[error(transparent)]
    Invocation(#[from] StepInvocationError),
}

/// Where and why a queue stopped early.
#[derive(Debug, Clone, Error)]
#[error("aborted at step {index} (`{step}`): {cause}")]
pub struct Abort {
    /// Queue position of the aborting step.
    pub index: usize,
    /// Name of the aborting step.
    pub step: String,
    /// Underlying cause.
    #[source]
    pub cause: AbortCause,
}

/// How a queue finished.
#[derive(Debug, Clone)]
pub enum QueueOutcome {
    /// Every step completed.
    Completed,
    /// A step aborted; remaining steps never ran.
    Aborted(Abort),
}

impl QueueOutcome {
    /// `true` when every step completed.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// The abort, if any.
    pub fn abort(&self) -> Option<&Abort> {
        match self {
            Self::Completed => None,
            Self::Aborted(abort) => Some(abort),
        }
    }

    /// Converts into a `Result`.
    pub fn into_result(self) -> Result<(), Abort> {
        match self {
            Self::Completed => Ok(()),
            Self::Aborted(abort) => Err(abort),
        }
    }
}
