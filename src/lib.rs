pub mod ambient;
pub mod console;
pub mod dropdown;
pub mod error;
pub mod events;
pub mod notification;
pub mod state;
pub mod toast;

mod sync;
