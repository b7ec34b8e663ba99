//! BDD step definitions for the homework watcher

pub mod lifecycle_steps;
