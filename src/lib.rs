pub use clearloop_tui::cli;
pub use clearloop_tui::commands;
pub use clearloop_tui::config;
pub use clearloop_tui::logging;
pub use clearloop_tui::tui;
pub use clearloop_tui::AppConfig;

pub use clearloop_core as core;
pub use clearloop_core::calendar;
pub use clearloop_core::capture;
pub use clearloop_core::model;
pub use clearloop_core::parser;
