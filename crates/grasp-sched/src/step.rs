// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use std::fmt;
use std::time::Duration;

use tracing::info;

/// One-shot action run against the queue context.
pub type Action<C> = Box<dyn FnMut(&mut C) -> anyhow::Result<()> + Send>;

/// Completion predicate re-evaluated every cycle.
pub type Predicate<C> = Box<dyn FnMut(&mut C) -> anyhow::Result<bool> + Send>;

/// What a step does and when it is done.
pub enum StepKind<C> {
    /// Done once the action returns.
    Immediate(Action<C>),
    /// Done once the predicate returns `true`.
    Polling(Predicate<C>),
    /// Done once the duration has elapsed since the step started.
    Timed(Duration),
    /// Done once the operator answers with the accept token.
    Confirmation(String),
}

impl<C> fmt::Debug for StepKind<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Immediate(_) => f.write_str("Immediate"),
            Self::Polling(_) => f.write_str("Polling"),
            Self::Timed(d) => f.debug_tuple("Timed").field(d).finish(),
            Self::Confirmation(p) => f.debug_tuple("Confirmation").field(p).finish(),
        }
    }
}

/// Lifecycle of a queued step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    /// Not reached yet.
    Pending,
    /// Started, waiting on its completion condition.
    Running,
    /// Completion condition satisfied.
    Completed,
    /// Abandoned because this or an earlier step aborted.
    Aborted,
}

/// The atomic unit of work in a [`crate::TaskQueue`].
#[derive(Debug)]
pub struct Step<C> {
    name: String,
    kind: StepKind<C>,
}

impl<C> Step<C> {
    /// Wraps a kind under a display name.
    pub fn new(name: impl Into<String>, kind: StepKind<C>) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Runs `action` once.
    pub fn immediate<F>(name: impl Into<String>, action: F) -> Self
    where
        F: FnMut(&mut C) -> anyhow::Result<()> + Send + 'static,
    {
        Self::new(name, StepKind::Immediate(Box::new(action)))
    }

    /// Waits until `predicate` holds.
    pub fn polling<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: FnMut(&mut C) -> anyhow::Result<bool> + Send + 'static,
    {
        Self::new(name, StepKind::Polling(Box::new(predicate)))
    }

    /// Dwells for `duration`.
    pub fn delay(duration: Duration) -> Self {
        Self::new(
            format!("delay {:.1}s", duration.as_secs_f64()),
            StepKind::Timed(duration),
        )
    }

    /// Suspends until the operator accepts `prompt`.
    pub fn confirm(prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        Self::new(format!("confirm: {prompt}"), StepKind::Confirmation(prompt))
    }

    /// Logs a progress message.
    pub fn log(message: impl Into<String>) -> Self {
        let message = message.into();
        let logged = message.clone();
        Self::immediate(message, move |_| {
            info!("{logged}");
            Ok(())
        })
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Step kind.
    pub fn kind(&self) -> &StepKind<C> {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut StepKind<C> {
        &mut self.kind
    }
}
