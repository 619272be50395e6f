//! Reusable presentational widgets

pub mod action_button;
pub mod budget_bar;
pub mod toast;

pub use action_button::ActionButton;
pub use budget_bar::BudgetBar;
pub use toast::{Toast, ToastQueue, ToastWidget};
