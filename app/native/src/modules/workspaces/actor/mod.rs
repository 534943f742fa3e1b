//! State actor module.
//!
//! The state actor owns the [`Engine`] and processes messages sequentially,
//! so every mutation of workspace state happens on one task without locks.
//!
//! After each message the actor drains the engine's outbox: events go out on
//! a broadcast channel and timers become `tokio::time::sleep` tasks that post
//! [`StateMessage::TimerFired`] back. Timer tasks only hold a weak sender, so
//! pending timers never keep the actor alive.
//!
//! # Panic Recovery
//!
//! If a message handler panics, the panic is caught and logged and the actor
//! keeps processing subsequent messages.

mod handle;
mod messages;

use std::panic::{AssertUnwindSafe, catch_unwind};

pub use handle::{ActorError, StateActorHandle};
pub use messages::{Command, QueryResult, StateMessage, StateQuery};
use tokio::sync::{broadcast, mpsc};

use super::engine::Engine;
use crate::error::SpacesResult;
use crate::events::EngineEvent;

/// Channel buffer size for the state actor.
const CHANNEL_BUFFER_SIZE: usize = 256;

/// Events kept for slow subscribers before they start lagging.
const EVENT_BUFFER_SIZE: usize = 64;

/// The state actor that owns the workspace engine.
pub struct StateActor {
    engine: Engine,
    receiver: mpsc::Receiver<StateMessage>,
    /// Used by timer tasks to post back into the actor.
    sender: mpsc::WeakSender<StateMessage>,
    events: broadcast::Sender<EngineEvent>,
}

impl StateActor {
    /// Spawn the actor on the current tokio runtime and return a handle.
    #[must_use]
    pub fn spawn(engine: Engine) -> StateActorHandle {
        tracing::debug!("spaces: spawning state actor");
        let (sender, receiver) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let (events, _) = broadcast::channel(EVENT_BUFFER_SIZE);

        let actor = Self {
            engine,
            receiver,
            sender: sender.downgrade(),
            events: events.clone(),
        };
        tokio::spawn(actor.run());

        StateActorHandle::new(sender, events)
    }

    /// Run the actor's message loop until shutdown or until every handle is gone.
    async fn run(mut self) {
        tracing::trace!("spaces: actor message loop starting");

        while let Some(msg) = self.receiver.recv().await {
            if matches!(msg, StateMessage::Shutdown) {
                tracing::debug!("spaces: state actor received shutdown message");
                break;
            }

            let msg_name = msg.name();
            let result = catch_unwind(AssertUnwindSafe(|| {
                self.handle_message(msg);
            }));

            if let Err(panic_info) = result {
                let panic_msg = panic_info
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic_info.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());

                tracing::error!(handler = msg_name, "spaces: PANIC in actor: {panic_msg}");
                tracing::error!("spaces: actor recovered from panic, state may be inconsistent");
            }

            self.flush();
        }

        self.engine.shutdown();
        self.flush();
        tracing::debug!("spaces: state actor exiting");
    }

    fn handle_message(&mut self, msg: StateMessage) {
        match msg {
            StateMessage::Execute { command, respond_to } => {
                let name = command.name();
                let result = self.execute(command);
                if let Err(err) = &result {
                    tracing::debug!(command = name, error = %err, "spaces: command failed");
                }
                if let Some(tx) = respond_to {
                    let _ = tx.send(result);
                }
            }
            StateMessage::AppActivated { pid } => self.engine.on_app_activated(pid),
            StateMessage::PipFocusLost { pid } => self.engine.on_pip_focus_lost(pid),
            StateMessage::AppTerminated { pid, app } => self.engine.on_app_terminated(pid, &app),
            StateMessage::DisplaysChanged => self.engine.on_displays_changed(),
            StateMessage::ConfigReloaded(config) => self.engine.on_config_reloaded(&config),
            StateMessage::TimerFired(timer) => self.engine.on_timer(timer),
            StateMessage::Query { query, respond_to } => {
                let _ = respond_to.send(self.handle_query(query));
            }
            StateMessage::SubscribeActive { respond_to } => {
                let _ = respond_to.send(self.engine.state().subscribe_active());
            }
            StateMessage::Shutdown => {}
        }
    }

    fn execute(&mut self, command: Command) -> SpacesResult<()> {
        let engine = &mut self.engine;
        match command {
            Command::Activate(workspace) => engine.activate(&workspace),
            Command::ActivateRelative { direction, skip_empty } => {
                engine.activate_relative(direction, skip_empty)
            }
            Command::ActivateRecent => engine.activate_recent(),
            Command::AssignApp { app, workspace } => engine.assign_app(app, workspace.as_ref()),
            Command::UnassignApp(app) => engine.unassign_app(app),
            Command::FloatApp(app) => engine.float_app(app),
            Command::UnfloatApp(app) => engine.unfloat_app(app),
            Command::Focus(direction) => engine.focus_direction(direction),
            Command::CycleApp(direction) => engine.cycle_app(direction),
            Command::CycleWindow(direction) => engine.cycle_window(direction),
            Command::SwitchProfile(name) => engine.switch_profile(&name),
        }
    }

    fn handle_query(&self, query: StateQuery) -> QueryResult {
        let state = self.engine.state();
        match query {
            StateQuery::ActiveWorkspaces => QueryResult::Displays(state.active_workspaces()),
            StateQuery::MostRecentWorkspaces => QueryResult::Displays(state.most_recent()),
            StateQuery::Workspaces => QueryResult::Workspaces(state.workspaces().to_vec()),
            StateQuery::ActiveProfile => QueryResult::Profile(state.profile().name.clone()),
            StateQuery::LastFocusedApp { workspace_id } => {
                QueryResult::App(state.last_focused(workspace_id).cloned())
            }
            StateQuery::RelocatedApps => QueryResult::Pids(self.engine.pip().relocated_apps()),
        }
    }

    /// Publish pending events and arm pending timers.
    fn flush(&mut self) {
        for event in self.engine.take_events() {
            tracing::trace!(event = event.name(), "spaces: emitting event");
            // No receivers is fine.
            let _ = self.events.send(event);
        }

        for timer in self.engine.take_timers() {
            let sender = self.sender.clone();
            tokio::spawn(async move {
                tokio::time::sleep(timer.delay()).await;
                if let Some(sender) = sender.upgrade() {
                    let _ = sender.send(StateMessage::TimerFired(timer)).await;
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::error::SpacesError;
    use crate::modules::workspaces::clock::SystemClock;
    use crate::modules::workspaces::engine::fixtures::{
        CHROME, MAIL, SLACK, XCODE, default_config, single_display_world,
    };
    use crate::modules::workspaces::state::{Point, Rect, WorkspaceRef};
    use crate::modules::workspaces::testing::FakeWindowSystem;

    fn spawn_with(ws: &Arc<FakeWindowSystem>) -> StateActorHandle {
        let engine = Engine::new(&default_config(), ws.clone(), Arc::new(SystemClock));
        StateActor::spawn(engine)
    }

    fn w(name: &str) -> WorkspaceRef { WorkspaceRef::Name(name.to_string()) }

    #[tokio::test]
    async fn test_execute_reports_outcome() {
        let ws = single_display_world();
        let handle = spawn_with(&ws);

        handle.activate(w("W1")).await.unwrap();
        assert_eq!(ws.frontmost(), Some(SLACK));
        assert!(ws.is_hidden(XCODE));

        let result = handle.activate(w("Nope")).await;
        assert_eq!(result, Err(SpacesError::WorkspaceNotFound("Nope".to_string())));

        handle.shutdown().unwrap();
    }

    #[tokio::test]
    async fn test_events_are_broadcast() {
        let ws = single_display_world();
        let handle = spawn_with(&ws);
        let mut events = handle.subscribe_events();

        handle.activate(w("W2")).await.unwrap();

        let event = events.recv().await.unwrap();
        assert!(matches!(
            event,
            EngineEvent::WorkspaceActivated { ref workspace_name, .. } if workspace_name == "W2"
        ));
    }

    #[tokio::test]
    async fn test_queries_and_active_subscription() {
        let ws = single_display_world();
        let handle = spawn_with(&ws);
        let subscriber = handle.subscribe_active().await.unwrap();
        assert!(subscriber.get().is_empty());

        handle.activate(w("W1")).await.unwrap();

        let active = handle.active_workspaces().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(subscriber.get().len(), 1);

        let workspaces = handle.query(StateQuery::Workspaces).await.unwrap();
        assert_eq!(workspaces.into_workspaces().map(|w| w.len()), Some(3));

        let profile = handle.query(StateQuery::ActiveProfile).await.unwrap();
        assert_eq!(profile.into_profile().as_deref(), Some("Default"));
    }

    #[tokio::test]
    async fn test_rehide_timer_fires() {
        let ws = single_display_world();
        ws.ignore_hide(MAIL);
        let handle = spawn_with(&ws);

        handle.activate(w("W2")).await.unwrap();
        assert!(!ws.is_hidden(MAIL));

        ws.complete_hide(MAIL);
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert!(ws.is_hidden(MAIL));
    }

    #[tokio::test]
    async fn test_shutdown_restores_relocated_windows() {
        let ws = single_display_world();
        ws.add_window(CHROME, 6, "Picture in Picture", Rect::new(1100.0, 700.0, 320.0, 180.0));
        let handle = spawn_with(&ws);

        handle.activate(w("W1")).await.unwrap();
        let relocated = handle.query(StateQuery::RelocatedApps).await.unwrap();
        assert_eq!(relocated.into_pids(), Some(vec![CHROME]));

        handle.shutdown().unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!handle.is_alive());
        assert_eq!(ws.frame_of(5).map(|f| f.origin()), Some(Point::new(50.0, 50.0)));
    }
}
