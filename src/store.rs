//! Global Board Store
//!
//! Uses Leptos reactive_stores so components subscribe per field
//! (`store.tasks()`, `store.selected_project()`, ...).

use leptos::prelude::*;
use reactive_stores::Store;

use crate::board::{BoardState, Patch};

pub use crate::board::BoardStateStoreFields;
use crate::models::RecordId;

/// Type alias for the store
pub type AppStore = Store<BoardState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

pub fn store_apply(store: &AppStore, patch: Patch) {
    store.update(|state| state.apply(patch));
}

pub fn store_select_project(store: &AppStore, id: RecordId) {
    store.update(|state| state.select_project(id));
}

pub fn store_toggle_collapsed(store: &AppStore, id: &RecordId) {
    store.update(|state| state.toggle_collapsed(id));
}

pub fn store_dismiss_error(store: &AppStore) {
    store.update(BoardState::dismiss_error);
}

/// Drop everything cached for the signed-out user
pub fn store_reset(store: &AppStore) {
    store.set(BoardState::default());
}
