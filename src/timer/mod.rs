pub mod accounting;
pub mod commands;
pub mod controller;
pub mod error;
pub mod locks;
pub mod state;
pub mod store;

pub use controller::{StopSummary, TimerController, TimerSnapshot};
pub use error::{StoreError, TimerError};
pub use state::TimerStatus;
pub use store::TimerStore;
