//! Mini Focus Frontend
//!
//! Projects and tasks over a REST backend. The plain-Rust core (`models`,
//! `tree`, `api`, `session`, `board`) is tested natively; `components` and
//! `app` render it with Leptos.

pub mod api;
pub mod app;
pub mod board;
pub mod components;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod models;
pub mod session;
pub mod store;
pub mod tree;
