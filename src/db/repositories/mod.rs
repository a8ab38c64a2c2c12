pub mod folders;
pub mod tasks;
pub mod timers;
