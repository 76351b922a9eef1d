pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod tui;

pub use clearloop_core as core;
pub use clearloop_core::calendar;
pub use clearloop_core::capture;
pub use clearloop_core::model;
pub use clearloop_core::parser;

pub use clearloop_core::AppConfig;
