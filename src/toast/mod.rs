pub mod toast_models;
pub mod toast_scheduler;

pub use toast_models::{DismissReason, Toast, ToastId};
pub use toast_scheduler::ToastScheduler;
