//! Home screen view state and its transition function.

use std::sync::Arc;

use crate::models::{distinct_group_ids, records_in_group, Record};
use crate::Error;

/// Immutable snapshot of what the home screen shows.
#[derive(Debug, Clone)]
pub struct HomeState {
    /// Processed view, ordered by `(group_id, display_name)`.
    pub items: Vec<Record>,
    /// Distinct group ids in first-seen order of `items`.
    pub group_ids: Vec<i64>,
    pub selected_group_id: Option<i64>,
    pub selected_group_items: Vec<Record>,
    pub is_list_mode: bool,
    pub is_loading: bool,
    pub error: Option<Arc<Error>>,
}

impl Default for HomeState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            group_ids: Vec::new(),
            selected_group_id: None,
            selected_group_items: Vec::new(),
            is_list_mode: true,
            is_loading: false,
            error: None,
        }
    }
}

impl HomeState {
    /// Initial state seeded with the stored layout preference.
    pub fn with_layout(is_list_mode: bool) -> Self {
        Self {
            is_list_mode,
            ..Self::default()
        }
    }

    /// Human readable error message, if any.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }
}

/// User intents accepted by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeAction {
    Refresh,
    ToggleLayout,
    SelectGroup(i64),
}

/// Everything that can move the state machine.
#[derive(Debug, Clone)]
pub enum HomeEvent {
    /// The processed view emitted a new snapshot.
    ItemsLoaded(Vec<Record>),
    /// Reading the local store failed; the subscription is over.
    ItemsFailed(Arc<Error>),
    /// A refresh (user or periodic) has been initiated.
    RefreshRequested,
    /// An explicit refresh failed.
    RefreshFailed(Arc<Error>),
    GroupSelected(i64),
    LayoutToggled,
}

/// Pure transition: `(previous state, event) -> next state`.
pub fn reduce(state: &HomeState, event: HomeEvent) -> HomeState {
    match event {
        HomeEvent::ItemsLoaded(items) => {
            let group_ids = distinct_group_ids(&items);
            let selected_group_id = state
                .selected_group_id
                .filter(|id| group_ids.contains(id))
                .or_else(|| items.first().map(|record| record.group_id));
            let selected_group_items = records_in_group(&items, selected_group_id);
            HomeState {
                items,
                group_ids,
                selected_group_id,
                selected_group_items,
                is_list_mode: state.is_list_mode,
                is_loading: false,
                error: None,
            }
        }
        HomeEvent::ItemsFailed(error) => HomeState {
            is_loading: false,
            error: Some(error),
            ..state.clone()
        },
        HomeEvent::RefreshRequested => HomeState {
            is_loading: true,
            error: None,
            ..state.clone()
        },
        HomeEvent::RefreshFailed(error) => HomeState {
            is_loading: state.is_loading && !state.items.is_empty(),
            error: Some(error),
            ..state.clone()
        },
        HomeEvent::GroupSelected(group_id) => HomeState {
            selected_group_id: Some(group_id),
            selected_group_items: records_in_group(&state.items, Some(group_id)),
            ..state.clone()
        },
        HomeEvent::LayoutToggled => HomeState {
            is_list_mode: !state.is_list_mode,
            ..state.clone()
        },
    }
}
