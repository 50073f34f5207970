//! Error Banner Component

use leptos::prelude::*;

use crate::store::{store_dismiss_error, use_app_store, BoardStateStoreFields};

/// Last failed operation, until dismissed
#[component]
pub fn ErrorBanner() -> impl IntoView {
    let store = use_app_store();

    move || {
        store.error().get().map(|message| {
            view! {
                <div class="error-banner" role="alert">
                    <span class="error-text">{message}</span>
                    <button class="error-dismiss" on:click=move |_| store_dismiss_error(&store)>
                        "×"
                    </button>
                </div>
            }
        })
    }
}
