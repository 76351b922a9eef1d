pub mod board;

pub use board::{Board, BoardEvent, TabBadges, ViewSnapshot};
