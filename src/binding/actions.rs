//! Action surface of a mounted instance.
//!
//! Three ways to feed the intent channel:
//!
//! - [`Actions::call`]: run a registered creator and send its intent now;
//! - [`Actions::from_event`]: send an already available intent now;
//! - [`Actions::from_future`]: send the intent a future resolves to, once it
//!   resolves. Unmounting the instance first cancels the send.

use std::convert::Infallible;
use std::fmt::Display;
use std::future::Future;

use serde_json::Value;
use tokio::task::JoinHandle;

use crate::binding::connect::ActionTable;
use crate::binding::lifecycle::LifecycleHandle;
use crate::error::EngineError;
use crate::intent::{Intent, IntentSender};

/// Final state of a future-sourced action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The intent was sent.
    Delivered,
    /// The future resolved to an error; nothing was sent.
    Rejected,
    /// The instance unmounted (or the task was aborted) first.
    Cancelled,
}

/// Handle to an in-flight future-sourced action.
pub struct PendingAction {
    task: JoinHandle<ActionOutcome>,
}

impl PendingAction {
    /// Wait for the action to settle.
    pub async fn wait(self) -> ActionOutcome {
        self.task.await.unwrap_or(ActionOutcome::Cancelled)
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Drop the action without sending.
    pub fn abort(&self) {
        self.task.abort();
    }
}

#[derive(Clone)]
pub struct Actions {
    instance: String,
    creators: ActionTable,
    sender: IntentSender,
    lifecycle: LifecycleHandle,
}

impl Actions {
    pub(crate) fn new(
        instance: String,
        creators: ActionTable,
        sender: IntentSender,
        lifecycle: LifecycleHandle,
    ) -> Self {
        Self {
            instance,
            creators,
            sender,
            lifecycle,
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.creators.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.creators.contains_key(name)
    }

    /// Build the intent for `name` without sending it.
    pub fn create(&self, name: &str, args: impl Into<Value>) -> Result<Intent, EngineError> {
        let creator = self.creators.get(name).ok_or_else(|| {
            self.refused(EngineError::UnknownAction {
                name: name.to_string(),
            })
        })?;
        Ok(creator(args.into()))
    }

    /// Run the creator registered as `name` and send its intent immediately.
    pub fn call(&self, name: &str, args: impl Into<Value>) -> Result<(), EngineError> {
        let intent = self.create(name, args)?;
        self.from_event(intent)
    }

    /// Send an intent that is already available.
    pub fn from_event(&self, intent: Intent) -> Result<(), EngineError> {
        self.ensure_mounted()?;
        tracing::debug!(instance = %self.instance, intent = %intent.kind(), "Action sent");
        self.sender.send(intent);
        Ok(())
    }

    /// Send the intent `future` resolves to, once it resolves.
    ///
    /// Runs on the current tokio runtime.
    pub fn from_future<F>(&self, future: F) -> Result<PendingAction, EngineError>
    where
        F: Future<Output = Intent> + Send + 'static,
    {
        self.from_result_future(async move { Ok::<_, Infallible>(future.await) })
    }

    /// Like [`Actions::from_future`], for futures that can fail. A failure is
    /// logged and nothing is sent.
    pub fn from_result_future<F, E>(&self, future: F) -> Result<PendingAction, EngineError>
    where
        F: Future<Output = Result<Intent, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|_| self.refused(EngineError::NoRuntime))?;
        self.ensure_mounted()?;

        let sender = self.sender.clone();
        let lifecycle = self.lifecycle.clone();
        let instance = self.instance.clone();

        let task = runtime.spawn(async move {
            tokio::select! {
                biased;
                _ = lifecycle.wait() => {
                    tracing::debug!(instance = %instance, "Pending action cancelled by unmount");
                    ActionOutcome::Cancelled
                }
                resolved = future => match resolved {
                    Ok(intent) => {
                        tracing::debug!(
                            instance = %instance,
                            intent = %intent.kind(),
                            "Future-sourced action resolved"
                        );
                        sender.send(intent);
                        ActionOutcome::Delivered
                    }
                    Err(err) => {
                        tracing::warn!(
                            instance = %instance,
                            error = %err,
                            "Future-sourced action rejected"
                        );
                        ActionOutcome::Rejected
                    }
                },
            }
        });

        Ok(PendingAction { task })
    }

    fn ensure_mounted(&self) -> Result<(), EngineError> {
        if self.lifecycle.is_unmounted() {
            return Err(self.refused(EngineError::Unmounted {
                instance: self.instance.clone(),
            }));
        }
        Ok(())
    }

    fn refused(&self, err: EngineError) -> EngineError {
        tracing::debug!(
            instance = %self.instance,
            error_type = err.error_type(),
            error = %err,
            "Action refused"
        );
        err
    }
}
