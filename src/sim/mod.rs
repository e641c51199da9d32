pub mod engine;
pub mod event;
pub mod field;
pub mod level;
pub mod step;
