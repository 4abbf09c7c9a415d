// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Operator channel for confirmation steps.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::warn;

/// Human in the loop.
///
/// The queue calls [`Operator::request`] once when a confirmation step starts
/// and [`Operator::poll_answer`] once per cycle until an answer arrives.
pub trait Operator: Send {
    /// Presents a prompt.
    fn request(&mut self, prompt: &str);
    /// Returns the answer if one is available. Must not block.
    fn poll_answer(&mut self) -> Option<String>;
}

/// How confirmation steps are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPolicy {
    /// When `false`, confirmation steps complete without asking.
    pub enabled: bool,
    /// Answer that accepts a prompt (compared after trimming).
    pub accept_token: String,
}

impl Default for ConfirmPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            accept_token: "y".into(),
        }
    }
}

impl ConfirmPolicy {
    /// Policy with prompts disabled.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub(crate) fn accepts(&self, answer: &str) -> bool {
        answer.trim() == self.accept_token
    }
}

#[derive(Debug, Default)]
struct Script {
    answers: VecDeque<String>,
    prompts: Vec<String>,
}

/// Operator answering from a fixed script.
///
/// Clones share the same script, so a test can keep a handle after moving one
/// into a queue.
#[derive(Debug, Clone, Default)]
pub struct ScriptedOperator {
    script: Arc<Mutex<Script>>,
}

impl ScriptedOperator {
    /// Operator that will give `answers` in order.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let op = Self::default();
        for answer in answers {
            op.push_answer(answer);
        }
        op
    }

    /// Queues another answer.
    pub fn push_answer(&self, answer: impl Into<String>) {
        self.lock().answers.push_back(answer.into());
    }

    /// Prompts presented so far.
    pub fn prompts(&self) -> Vec<String> {
        self.lock().prompts.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Operator for ScriptedOperator {
    fn request(&mut self, prompt: &str) {
        self.lock().prompts.push(prompt.to_owned());
    }

    fn poll_answer(&mut self) -> Option<String> {
        self.lock().answers.pop_front()
    }
}

/// Operator backed by a pair of channels.
///
/// Prompts go out on one channel; answers (e.g. lines read from a terminal)
/// come back on the other.
#[derive(Debug)]
pub struct ChannelOperator {
    prompts: mpsc::UnboundedSender<String>,
    answers: mpsc::UnboundedReceiver<String>,
}

impl ChannelOperator {
    /// Wires the operator to its channels.
    pub fn new(
        prompts: mpsc::UnboundedSender<String>,
        answers: mpsc::UnboundedReceiver<String>,
    ) -> Self {
        Self { prompts, answers }
    }
}

impl Operator for ChannelOperator {
    fn request(&mut self, prompt: &str) {
        if self.prompts.send(prompt.to_owned()).is_err() {
            warn!(prompt, "prompt channel closed");
        }
    }

    fn poll_answer(&mut self) -> Option<String> {
        match self.answers.try_recv() {
            Ok(answer) => Some(answer),
            Err(TryRecvError::Empty) => None,
            // No one left to answer: treat as a refusal.
            Err(TryRecvError::Disconnected) => Some(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_token_is_trimmed() {
        let policy = ConfirmPolicy::default();
        assert!(policy.accepts("y\n"));
        assert!(policy.accepts("  y "));
        assert!(!policy.accepts("yes"));
        assert!(!policy.accepts("Y"));
    }

    #[test]
    fn scripted_operator_shares_state_across_clones() {
        let handle = ScriptedOperator::new(["y"]);
        let mut op = handle.clone();
        op.request("go?");
        assert_eq!(op.poll_answer().as_deref(), Some("y"));
        assert_eq!(op.poll_answer(), None);
        handle.push_answer("n");
        assert_eq!(op.poll_answer().as_deref(), Some("n"));
        assert_eq!(handle.prompts(), vec!["go?".to_owned()]);
    }

    #[test]
    fn closed_answer_channel_reads_as_refusal() {
        let (prompt_tx, mut prompt_rx) = mpsc::unbounded_channel();
        let (answer_tx, answer_rx) = mpsc::unbounded_channel::<String>();
        let mut op = ChannelOperator::new(prompt_tx, answer_rx);
        op.request("continue?");
        assert_eq!(prompt_rx.try_recv().as_deref(), Ok("continue?"));
        assert_eq!(op.poll_answer(), None);
        answer_tx.send("y".into()).unwrap();
        assert_eq!(op.poll_answer().as_deref(), Some("y"));
        drop(answer_tx);
        assert_eq!(op.poll_answer().as_deref(), Some(""));
    }
}
