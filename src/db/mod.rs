mod connection;
pub mod helpers;
mod migrations;
pub mod models;
mod repositories;

pub use connection::{Database, DatabaseUnavailable};
pub use models::{Folder, NewFolder, NewTask, NewTimer, Task, Timer, TimerFields, TimerId};
