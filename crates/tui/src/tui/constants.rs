use std::time::Duration;

pub(crate) const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
/// Short enough for drag feedback and exit animations to look smooth.
pub(crate) const TICK_RATE: Duration = Duration::from_millis(50);
pub(crate) const STATUS_TTL: Duration = Duration::from_secs(5);

/// Pointer units one terminal column stands for; a full 120 unit drag spans
/// 20 columns.
pub(crate) const POINTER_UNITS_PER_COLUMN: f32 = 6.0;
/// Rows each card occupies in the list, borders included.
pub(crate) const CARD_HEIGHT: u16 = 4;

pub(crate) const STATUS_ENTER_ADD: &str = "What needs to be done today? Enter to add • Esc to cancel";
pub(crate) const STATUS_ADD_TODAY_ONLY: &str = "Switch to the Today tab to add tasks";
pub(crate) const STATUS_EMPTY_TITLE: &str = "Type a task before pressing Enter";
pub(crate) const STATUS_NO_DATE: &str = "Pick a date first (press c)";
pub(crate) const STATUS_CALENDAR: &str =
    "Arrows move • [/] change month • Enter select • t today • Esc close";
pub(crate) const STATUS_HELP: &str = "Keyboard reference • Enter/Esc to close";
pub(crate) const STATUS_NOTHING_SELECTED: &str = "No task selected";
pub(crate) const STATUS_NOT_SWIPEABLE: &str = "Completed tasks stay put";
pub(crate) const STATUS_NO_LEFT_SWIPE: &str = "Drafts can only be completed";
pub(crate) const STATUS_BUSY: &str = "That card is already on its way";
