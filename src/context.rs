//! Application Context
//!
//! Shared state provided via Leptos Context API.

use std::future::Future;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{browser_client, BrowserApi};
use crate::board::Patch;
use crate::config::AppConfig;
use crate::models::RecordId;
use crate::session::{AuthSession, SessionState};
use crate::store::{store_apply, store_reset, AppStore};

/// Where the new-project form adds to
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectDraft {
    Root,
    Under(RecordId),
}

impl ProjectDraft {
    pub fn parent_id(&self) -> Option<RecordId> {
        match self {
            ProjectDraft::Root => None,
            ProjectDraft::Under(id) => Some(id.clone()),
        }
    }
}

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    pub session: ReadSignal<SessionState>,
    set_session: WriteSignal<SessionState>,
    pub store: AppStore,
    config: StoredValue<AppConfig>,
    /// Open new-project form, if any
    pub adding_project: ReadSignal<Option<ProjectDraft>>,
    set_adding_project: WriteSignal<Option<ProjectDraft>>,
    /// Bumped to move focus into the new-task input
    pub task_input_focus: ReadSignal<u32>,
    set_task_input_focus: WriteSignal<u32>,
    /// Bumped whenever the cached board is thrown away
    generation: StoredValue<u64>,
}

/// Board generation an operation started in; its patch is dropped if the
/// board was reset meanwhile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardTicket(u64);

impl AppContext {
    pub fn new(
        session: (ReadSignal<SessionState>, WriteSignal<SessionState>),
        store: AppStore,
        config: AppConfig,
    ) -> Self {
        let (adding_project, set_adding_project) = signal(None);
        let (task_input_focus, set_task_input_focus) = signal(0);
        Self {
            session: session.0,
            set_session: session.1,
            store,
            config: StoredValue::new(config),
            adding_project,
            set_adding_project,
            task_input_focus,
            set_task_input_focus,
            generation: StoredValue::new(0),
        }
    }

    pub fn config(&self) -> AppConfig {
        self.config.get_value()
    }

    /// Fresh client over browser fetch and localStorage
    pub fn api(&self) -> BrowserApi {
        self.config.with_value(browser_client)
    }

    pub fn apply(&self, patch: Patch) {
        store_apply(&self.store, patch);
    }

    pub fn ticket(&self) -> BoardTicket {
        BoardTicket(self.generation.get_value())
    }

    /// Apply `patch` unless the board was reset after `ticket` was taken.
    pub fn apply_for(&self, ticket: BoardTicket, patch: Patch) -> bool {
        if ticket != self.ticket() {
            tracing::debug!("dropping patch from a previous session: {:?}", patch);
            return false;
        }
        self.apply(patch);
        true
    }

    /// Run a board operation in the background and apply its patch.
    pub fn dispatch<F, Fut>(&self, op: F)
    where
        F: FnOnce(BrowserApi) -> Fut + 'static,
        Fut: Future<Output = Patch> + 'static,
    {
        self.dispatch_then(op, |_| {});
    }

    /// Like `dispatch`; `after` sees the patch first, and neither runs if
    /// the board was reset while the request was in flight.
    pub fn dispatch_then<F, Fut, A>(&self, op: F, after: A)
    where
        F: FnOnce(BrowserApi) -> Fut + 'static,
        Fut: Future<Output = Patch> + 'static,
        A: FnOnce(&Patch) + 'static,
    {
        let ctx = *self;
        let ticket = ctx.ticket();
        spawn_local(async move {
            let patch = op(ctx.api()).await;
            if ticket == ctx.ticket() {
                after(&patch);
            }
            ctx.apply_for(ticket, patch);
        });
    }

    pub fn set_session(&self, state: SessionState) {
        self.set_session.set(state);
    }

    /// Local sign-out: tokens and cached board go, no request is made.
    pub fn logout(&self) {
        let mut session = AuthSession::new(self.api());
        session.logout();
        tracing::info!("signed out");
        self.reset_board();
        self.set_session.set(session.state().clone());
    }

    /// Empty the cached board; patches still in flight are discarded.
    pub fn reset_board(&self) {
        self.generation.update_value(|g| *g += 1);
        store_reset(&self.store);
        self.set_adding_project.set(None);
    }

    pub fn set_adding_project(&self, draft: Option<ProjectDraft>) {
        self.set_adding_project.set(draft);
    }

    pub fn focus_task_input(&self) {
        self.set_task_input_focus.update(|v| *v += 1);
    }
}

pub fn use_app_context() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}
