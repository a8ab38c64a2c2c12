pub mod folder;
pub mod task;
pub mod timer;

pub use folder::{Folder, NewFolder};
pub use task::{NewTask, Task};
pub use timer::{NewTimer, Timer, TimerFields, TimerId};
