//! Home screen controller.
//!
//! One event-loop task owns the state. The store subscription, the periodic
//! refresh timer, spawned refreshes and user intents all feed it through a
//! single channel, and every transition is published as a fresh snapshot on a
//! `watch` channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::db::DEFAULT_LIST_MODE;
use crate::remote::RemoteSource;
use crate::services::PreferenceStore;
use crate::state::{reduce, HomeAction, HomeEvent, HomeState};
use crate::sync::{ProcessedItems, SyncRepository};
use crate::{Error, Result};

/// Default spacing between periodic refresh initiations.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Tunables for [`HomeController::start`].
#[derive(Debug, Clone, Copy)]
pub struct ControllerOptions {
    refresh_interval: Duration,
}

impl ControllerOptions {
    /// Options with a custom spacing between periodic refreshes. Rejects a
    /// zero interval.
    pub fn with_refresh_interval(refresh_interval: Duration) -> Result<Self> {
        if refresh_interval.is_zero() {
            return Err(Error::InvalidInput(
                "refresh interval must be greater than zero".to_string(),
            ));
        }
        Ok(Self { refresh_interval })
    }

    /// Spacing between periodic refresh initiations.
    pub const fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

enum Message {
    Intent(HomeAction),
    Event(HomeEvent),
}

type MessageSender = mpsc::UnboundedSender<Message>;

/// Owner of the home screen state machine and its background tasks.
///
/// Dropping the controller aborts the event loop, the store subscription and
/// the periodic timer. Refreshes already in flight may finish, but their
/// outcome is discarded. Layout writes already queued still land.
pub struct HomeController {
    messages: MessageSender,
    state: watch::Receiver<HomeState>,
    tasks: Vec<JoinHandle<()>>,
}

impl HomeController {
    /// Seed the layout from the preference store, subscribe to the processed
    /// view and start the periodic refresh loop (first tick fires at once).
    pub async fn start<R: RemoteSource>(
        repository: SyncRepository<R>,
        preferences: PreferenceStore,
        options: ControllerOptions,
    ) -> Self {
        let is_list_mode = match preferences.layout_mode().await {
            Ok(is_list_mode) => is_list_mode,
            Err(e) => {
                tracing::warn!("Failed to read layout preference, using default: {e}");
                DEFAULT_LIST_MODE
            }
        };

        let (state_tx, state_rx) = watch::channel(HomeState::with_layout(is_list_mode));
        let (messages, inbox) = mpsc::unbounded_channel();

        let (layout_writes, pending_writes) = mpsc::unbounded_channel();
        // Not aborted on drop: it drains queued writes once the event loop
        // (the only sender) is gone, then exits.
        tokio::spawn(run_layout_persistence(preferences, pending_writes));

        let items = repository.processed_items();
        let tasks = vec![
            tokio::spawn(run_event_loop(
                repository,
                inbox,
                messages.clone(),
                layout_writes,
                state_tx,
            )),
            tokio::spawn(run_subscription(items, messages.clone())),
            tokio::spawn(run_periodic_refresh(
                options.refresh_interval,
                messages.clone(),
            )),
        ];

        tracing::debug!(
            is_list_mode,
            interval_secs = options.refresh_interval.as_secs_f64(),
            "Home controller started"
        );

        Self {
            messages,
            state: state_rx,
            tasks,
        }
    }

    /// Receiver of every published state, starting with the current one.
    pub fn subscribe(&self) -> watch::Receiver<HomeState> {
        self.state.clone()
    }

    /// Snapshot of the latest published state.
    pub fn current_state(&self) -> HomeState {
        self.state.borrow().clone()
    }

    /// Queue a user intent. Returns immediately; the outcome shows up as a
    /// published state. Ignored after shutdown.
    pub fn dispatch(&self, action: HomeAction) {
        if self.messages.send(Message::Intent(action)).is_err() {
            tracing::debug!("Ignoring {action:?}: controller has shut down");
        }
    }

    /// Shorthand for dispatching [`HomeAction::Refresh`].
    pub fn refresh(&self) {
        self.dispatch(HomeAction::Refresh);
    }

    /// Flip between list and grid layout and persist the choice.
    pub fn toggle_layout(&self) {
        self.dispatch(HomeAction::ToggleLayout);
    }

    /// Show the records of `group_id`, even if no record carries it.
    pub fn select_group(&self, group_id: i64) {
        self.dispatch(HomeAction::SelectGroup(group_id));
    }

    /// Stop every background task. Idempotent.
    pub fn shutdown(&self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

impl Drop for HomeController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run_event_loop<R: RemoteSource>(
    repository: SyncRepository<R>,
    mut inbox: mpsc::UnboundedReceiver<Message>,
    messages: MessageSender,
    layout_writes: mpsc::UnboundedSender<bool>,
    state: watch::Sender<HomeState>,
) {
    while let Some(message) = inbox.recv().await {
        match message {
            Message::Intent(HomeAction::Refresh) => {
                apply(&state, HomeEvent::RefreshRequested);
                spawn_refresh(&repository, &messages);
            }
            Message::Intent(HomeAction::ToggleLayout) => {
                apply(&state, HomeEvent::LayoutToggled);
                let is_list_mode = state.borrow().is_list_mode;
                layout_writes.send(is_list_mode).ok();
            }
            Message::Intent(HomeAction::SelectGroup(group_id)) => {
                apply(&state, HomeEvent::GroupSelected(group_id));
            }
            Message::Event(event) => apply(&state, event),
        }
    }
}

fn apply(state: &watch::Sender<HomeState>, event: HomeEvent) {
    let next = reduce(&state.borrow(), event);
    state.send_replace(next);
}

/// Writes layout changes in the order they were toggled.
async fn run_layout_persistence(
    preferences: PreferenceStore,
    mut pending: mpsc::UnboundedReceiver<bool>,
) {
    while let Some(is_list_mode) = pending.recv().await {
        if let Err(e) = preferences.set_layout_mode(is_list_mode).await {
            tracing::warn!("Failed to persist layout preference: {e}");
        }
    }
}

fn spawn_refresh<R: RemoteSource>(repository: &SyncRepository<R>, messages: &MessageSender) {
    let repository = repository.clone();
    let messages = messages.clone();
    tokio::spawn(async move {
        if let Err(e) = repository.refresh_items().await {
            tracing::warn!("Refresh failed: {e}");
            messages
                .send(Message::Event(HomeEvent::RefreshFailed(Arc::new(e))))
                .ok();
        }
    });
}

async fn run_subscription(mut items: ProcessedItems, messages: MessageSender) {
    while let Some(snapshot) = items.next().await {
        match snapshot {
            Ok(items) => {
                tracing::debug!("Processed view emitted {} records", items.len());
                if messages
                    .send(Message::Event(HomeEvent::ItemsLoaded(items)))
                    .is_err()
                {
                    return;
                }
            }
            Err(e) => {
                tracing::error!("Reading local records failed, stopping updates: {e}");
                messages
                    .send(Message::Event(HomeEvent::ItemsFailed(Arc::new(e))))
                    .ok();
                return;
            }
        }
    }
}

async fn run_periodic_refresh(period: Duration, messages: MessageSender) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        tracing::debug!("Periodic refresh tick");
        if messages.send(Message::Intent(HomeAction::Refresh)).is_err() {
            return;
        }
    }
}
