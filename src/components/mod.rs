//! UI Components
//!
//! Leptos components for the signed-in board and the login screen.

mod delete_confirm_button;
mod error_banner;
mod home;
mod login_form;
mod new_project_form;
mod project_row;
mod project_tree;
mod task_item;
mod task_list;
mod toolbar;

pub use delete_confirm_button::DeleteConfirmButton;
pub use error_banner::ErrorBanner;
pub use home::Home;
pub use login_form::LoginForm;
pub use new_project_form::NewProjectForm;
pub use project_row::ProjectRow;
pub use project_tree::ProjectTree;
pub use task_item::TaskItem;
pub use task_list::TaskList;
pub use toolbar::Toolbar;
