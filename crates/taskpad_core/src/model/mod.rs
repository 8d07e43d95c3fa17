mod task;

pub use task::{Category, DATE_FORMAT, NewTask, Priority, Task};
