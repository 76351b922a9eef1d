pub mod calendar;
pub mod capture;
pub mod celebration;
pub mod commands;
pub mod config;
pub mod gesture;
pub mod model;
pub mod parser;
pub mod services;
pub mod storage;
pub mod store;
pub mod timer;

pub use capture::CaptureInput;
pub use commands::delete_tasks;
pub use config::AppConfig;
pub use model::*;
pub use services::{Board, BoardEvent, TabBadges, ViewSnapshot};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use store::TaskStore;
