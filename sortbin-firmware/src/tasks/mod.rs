//! Embassy async tasks

pub mod arbiter;

pub use arbiter::arbiter_task;
