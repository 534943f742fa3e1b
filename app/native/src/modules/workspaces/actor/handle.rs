//! Handle for communicating with the state actor.
//!
//! The `StateActorHandle` provides a cloneable interface for sending
//! commands and events to the state actor and subscribing to its output.

use std::time::Duration;

use eyeball::Subscriber;
use tokio::sync::{broadcast, mpsc, oneshot};

use super::messages::{Command, QueryResult, StateMessage, StateQuery};
use crate::config::{AppRef, SpacesConfig};
use crate::error::SpacesResult;
use crate::events::EngineEvent;
use crate::modules::workspaces::state::{
    ActiveMap, CycleDirection, Direction, Pid, WorkspaceRef,
};

/// Error types for actor communication.
#[derive(Debug, thiserror::Error)]
pub enum ActorError {
    /// Failed to send message to actor.
    #[error("Failed to send message to actor: channel closed")]
    SendFailed,

    /// Failed to receive response from actor.
    #[error("Failed to receive response from actor: channel closed")]
    ReceiveFailed,

    /// Query timed out.
    #[error("Query timed out after {0:?}")]
    Timeout(Duration),
}

/// Handle for communicating with the state actor.
///
/// This handle is cheap to clone and can be shared across threads.
#[derive(Clone)]
pub struct StateActorHandle {
    sender: mpsc::Sender<StateMessage>,
    events: broadcast::Sender<EngineEvent>,
}

impl StateActorHandle {
    pub(crate) const fn new(
        sender: mpsc::Sender<StateMessage>,
        events: broadcast::Sender<EngineEvent>,
    ) -> Self {
        Self { sender, events }
    }

    // ========================================================================
    // Fire-and-forget sending
    // ========================================================================

    /// Send a message to the actor without waiting for delivery.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed or full.
    pub fn send(&self, msg: StateMessage) -> Result<(), ActorError> {
        self.sender.try_send(msg).map_err(|_| ActorError::SendFailed)
    }

    /// Send a message to the actor and wait for delivery.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    pub async fn send_async(&self, msg: StateMessage) -> Result<(), ActorError> {
        self.sender.send(msg).await.map_err(|_| ActorError::SendFailed)
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Run a command and wait for its outcome.
    ///
    /// # Errors
    ///
    /// Returns the command's failure, or [`crate::error::SpacesError::ActorError`]
    /// if the actor cannot be reached.
    pub async fn execute(&self, command: Command) -> SpacesResult<()> {
        let (tx, rx) = oneshot::channel();
        self.send_async(StateMessage::Execute {
            command,
            respond_to: Some(tx),
        })
        .await?;

        rx.await.map_err(|_| ActorError::ReceiveFailed)?
    }

    /// Queue a command without waiting for it. Failures are only logged.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed or full.
    pub fn dispatch(&self, command: Command) -> Result<(), ActorError> {
        self.send(StateMessage::Execute {
            command,
            respond_to: None,
        })
    }

    /// Activate a workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if the workspace cannot be activated.
    pub async fn activate(&self, workspace: WorkspaceRef) -> SpacesResult<()> {
        self.execute(Command::Activate(workspace)).await
    }

    /// Activate the next or previous workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if no workspace can be activated.
    pub async fn activate_relative(
        &self,
        direction: CycleDirection,
        skip_empty: Option<bool>,
    ) -> SpacesResult<()> {
        self.execute(Command::ActivateRelative { direction, skip_empty }).await
    }

    /// Return to the previously shown workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no previous workspace.
    pub async fn activate_recent(&self) -> SpacesResult<()> {
        self.execute(Command::ActivateRecent).await
    }

    /// Assign an app (default: frontmost) to a workspace (default: the
    /// active one on the app's display).
    ///
    /// # Errors
    ///
    /// Returns an error if the app or workspace cannot be determined.
    pub async fn assign_app(
        &self,
        app: Option<AppRef>,
        workspace: Option<WorkspaceRef>,
    ) -> SpacesResult<()> {
        self.execute(Command::AssignApp { app, workspace }).await
    }

    /// Remove an app (default: frontmost) from every workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if the app is not assigned.
    pub async fn unassign_app(&self, app: Option<AppRef>) -> SpacesResult<()> {
        self.execute(Command::UnassignApp(app)).await
    }

    /// Move focus to the nearest window in a direction.
    ///
    /// # Errors
    ///
    /// Returns an error if no window is focused.
    pub async fn focus(&self, direction: Direction) -> SpacesResult<()> {
        self.execute(Command::Focus(direction)).await
    }

    // ========================================================================
    // Window system events
    // ========================================================================

    /// Report that an app became frontmost.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed or full.
    pub fn app_activated(&self, pid: Pid) -> Result<(), ActorError> {
        self.send(StateMessage::AppActivated { pid })
    }

    /// Report that a relocated app moved focus off its PiP window.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed or full.
    pub fn pip_focus_lost(&self, pid: Pid) -> Result<(), ActorError> {
        self.send(StateMessage::PipFocusLost { pid })
    }

    /// Report that an app exited.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed or full.
    pub fn app_terminated(&self, pid: Pid, app: AppRef) -> Result<(), ActorError> {
        self.send(StateMessage::AppTerminated { pid, app })
    }

    /// Report a display topology change.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed or full.
    pub fn displays_changed(&self) -> Result<(), ActorError> {
        self.send(StateMessage::DisplaysChanged)
    }

    /// Hand a reloaded configuration to the engine.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed or full.
    pub fn config_reloaded(&self, config: SpacesConfig) -> Result<(), ActorError> {
        self.send(StateMessage::ConfigReloaded(Box::new(config)))
    }

    /// Restore relocated windows and stop the actor.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed or full.
    pub fn shutdown(&self) -> Result<(), ActorError> { self.send(StateMessage::Shutdown) }

    // ========================================================================
    // Queries and subscriptions
    // ========================================================================

    /// Execute a query and wait for the result.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed, or
    /// [`ActorError::ReceiveFailed`] if the response channel is closed.
    pub async fn query(&self, query: StateQuery) -> Result<QueryResult, ActorError> {
        let (tx, rx) = oneshot::channel();

        self.send_async(StateMessage::Query { query, respond_to: tx }).await?;

        rx.await.map_err(|_| ActorError::ReceiveFailed)
    }

    /// Execute a query with a timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::Timeout`] if the query doesn't complete in time,
    /// or any error from [`Self::query`].
    pub async fn query_timeout(
        &self,
        query: StateQuery,
        timeout: Duration,
    ) -> Result<QueryResult, ActorError> {
        tokio::time::timeout(timeout, self.query(query))
            .await
            .map_err(|_| ActorError::Timeout(timeout))?
    }

    /// Active workspace per display.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn active_workspaces(&self) -> Result<ActiveMap, ActorError> {
        let result = self.query(StateQuery::ActiveWorkspaces).await?;
        Ok(result.into_displays().unwrap_or_default())
    }

    /// Follow changes of the active workspace map.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn subscribe_active(&self) -> Result<Subscriber<ActiveMap>, ActorError> {
        let (tx, rx) = oneshot::channel();
        self.send_async(StateMessage::SubscribeActive { respond_to: tx }).await?;
        rx.await.map_err(|_| ActorError::ReceiveFailed)
    }

    /// Receive every event emitted from now on.
    #[must_use]
    pub fn subscribe_events(&self) -> broadcast::Receiver<EngineEvent> { self.events.subscribe() }

    /// Check if the actor is still running (channel is open).
    #[must_use]
    pub fn is_alive(&self) -> bool { !self.sender.is_closed() }
}
