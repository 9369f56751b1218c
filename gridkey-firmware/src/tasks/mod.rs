//! Embassy async tasks
//!
//! All bus I/O for the touch controller happens in task context; the
//! interrupt line only wakes the task.

pub mod touch;

pub use touch::touch_task;
