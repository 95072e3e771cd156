/// UI state persistence
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::StorageResult;
use crate::models::Filter;
use crate::store::kv::KeyValueStore;

/// Key of the persisted UI state.
pub const UI_STATE_KEY: &str = "ui-state";

/// UI state restored at startup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiState {
    /// Active filter of the task list
    pub active_filter: Filter,
    /// Selected row within the filtered list
    pub selected: usize,
}

/// Extract the UI state from the app
pub fn extract_state(app: &crate::app::App) -> UiState {
    UiState {
        active_filter: app.active_filter,
        selected: app.selected,
    }
}

pub fn save_state<S: KeyValueStore>(store: &mut S, state: &UiState) -> StorageResult<()> {
    let json = serde_json::to_string(state)?;
    store.set(UI_STATE_KEY, &json)
}

/// Load the UI state; unreadable state is ignored.
pub fn load_state<S: KeyValueStore>(store: &S) -> UiState {
    match store.get(UI_STATE_KEY) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("event=ui_state_load status=corrupt error={}", e);
            UiState::default()
        }),
        Ok(None) => UiState::default(),
        Err(e) => {
            warn!("event=ui_state_load status=read_failed error={}", e);
            UiState::default()
        }
    }
}

/// Apply a loaded state to the app, clamping the selection to the list.
pub fn apply_state(app: &mut crate::app::App, state: UiState) {
    app.active_filter = state.active_filter;
    app.selected = state.selected;
    app.clamp_selection();
}
