//! Month grids and the date-picker state.

use chrono::{Datelike, Days, Local, Months, NaiveDate};
use thiserror::Error;

/// A month grid always spans six weeks.
pub const GRID_CELLS: usize = 42;

pub const WEEKDAY_LABELS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    Malformed(String),
    #[error("invalid month {month} of {year}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("{0}")]
    Unrecognized(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub in_month: bool,
}

impl DayCell {
    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn is_selectable(&self) -> bool {
        self.in_month
    }
}

/// `YYYY-MM-DD` from the date's own calendar fields.
pub fn format_date_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

pub fn parse_date_key(raw: &str) -> Result<NaiveDate, DateError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| DateError::Malformed(raw.to_string()))
}

/// `Monday, October 19, 2026`
pub fn format_long(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// `Oct 19`
pub fn format_short(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

pub fn month_title(year: i32, month: u32) -> String {
    let name = MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("");
    format!("{name} {year}")
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, DateError> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(DateError::InvalidMonth { year, month })
}

pub fn days_in_month(year: i32, month: u32) -> Result<u32, DateError> {
    let first = first_of_month(year, month)?;
    let next = first
        .checked_add_months(Months::new(1))
        .ok_or(DateError::InvalidMonth { year, month })?;
    Ok(next.signed_duration_since(first).num_days() as u32)
}

/// Six-week grid for the month: leading days of the previous month (one per
/// weekday before the 1st, Sunday first), the month itself, then days of the
/// next month until [`GRID_CELLS`] are filled.
pub fn month_grid(year: i32, month: u32) -> Result<Vec<DayCell>, DateError> {
    let first = first_of_month(year, month)?;
    let leading = first.weekday().num_days_from_sunday() as u64;
    let start = first
        .checked_sub_days(Days::new(leading))
        .ok_or(DateError::InvalidMonth { year, month })?;

    let mut cells = Vec::with_capacity(GRID_CELLS);
    let mut current = Some(start);
    while cells.len() < GRID_CELLS {
        let Some(date) = current else {
            return Err(DateError::InvalidMonth { year, month });
        };
        cells.push(DayCell {
            date,
            in_month: date.year() == year && date.month() == month,
        });
        current = date.succ_opt();
    }
    Ok(cells)
}

/// Modal date picker: which month is displayed and which day the keyboard
/// cursor rests on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePicker {
    year: i32,
    month: u32,
    cursor: NaiveDate,
    selected: Option<NaiveDate>,
}

impl DatePicker {
    /// Opens on the month of the currently selected date (or today).
    pub fn open(selected: Option<NaiveDate>, today: NaiveDate) -> Self {
        let anchor = selected.unwrap_or(today);
        Self {
            year: anchor.year(),
            month: anchor.month(),
            cursor: anchor,
            selected,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn cursor(&self) -> NaiveDate {
        self.cursor
    }

    pub fn title(&self) -> String {
        month_title(self.year, self.month)
    }

    pub fn grid(&self) -> Result<Vec<DayCell>, DateError> {
        month_grid(self.year, self.month)
    }

    pub fn is_selected(&self, date: NaiveDate) -> bool {
        self.selected == Some(date)
    }

    pub fn prev_month(&mut self) {
        self.shift_month(-1);
    }

    pub fn next_month(&mut self) {
        self.shift_month(1);
    }

    fn shift_month(&mut self, delta: i32) {
        let index = self.year * 12 + self.month as i32 - 1 + delta;
        self.year = index.div_euclid(12);
        self.month = index.rem_euclid(12) as u32 + 1;
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        let Ok(days) = days_in_month(self.year, self.month) else {
            return;
        };
        let day = self.cursor.day().min(days);
        if let Some(date) = NaiveDate::from_ymd_opt(self.year, self.month, day) {
            self.cursor = date;
        }
    }

    /// Moves the keyboard cursor by whole days; leaving the month flips the
    /// displayed month with it.
    pub fn move_cursor(&mut self, days: i64) {
        let moved = if days >= 0 {
            self.cursor.checked_add_days(Days::new(days as u64))
        } else {
            self.cursor.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        if let Some(date) = moved {
            self.cursor = date;
            self.year = date.year();
            self.month = date.month();
        }
    }

    /// Selects a grid cell; out-of-month cells are ignored.
    pub fn select(&mut self, cell: DayCell) -> Option<String> {
        if !cell.is_selectable() {
            return None;
        }
        self.select_date(cell.date)
    }

    pub fn select_cursor(&mut self) -> Option<String> {
        self.select_date(self.cursor)
    }

    pub fn select_today(&mut self, today: NaiveDate) -> String {
        self.year = today.year();
        self.month = today.month();
        self.cursor = today;
        self.selected = Some(today);
        format_date_key(today)
    }

    fn select_date(&mut self, date: NaiveDate) -> Option<String> {
        if date.year() != self.year || date.month() != self.month {
            return None;
        }
        self.cursor = date;
        self.selected = Some(date);
        Some(format_date_key(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(2024, 2, 29)]
    #[case(2023, 2, 28)]
    #[case(2026, 10, 31)]
    #[case(2026, 11, 30)]
    #[case(2015, 2, 28)] // starts on a Sunday
    #[case(2000, 1, 31)]
    fn grid_has_fixed_size_and_month_days(#[case] year: i32, #[case] month: u32, #[case] days: usize) {
        let grid = month_grid(year, month).unwrap();
        let in_month = grid.iter().filter(|cell| cell.in_month).count();

        assert_eq!(grid.len(), GRID_CELLS);
        assert_eq!(in_month, days);
        assert_eq!(grid.len() - in_month, GRID_CELLS - days);
    }

    #[test]
    fn leading_cells_come_from_previous_month() {
        // October 2026 starts on a Thursday.
        let grid = month_grid(2026, 10).unwrap();
        assert_eq!(grid[0].date, date(2026, 9, 27));
        assert_eq!(grid[3].date, date(2026, 9, 30));
        assert!(!grid[3].in_month);
        assert_eq!(grid[4].date, date(2026, 10, 1));
        assert!(grid[4].in_month);
        assert_eq!(grid[41].date, date(2026, 11, 7));
    }

    #[test]
    fn sunday_start_has_no_leading_cells() {
        let grid = month_grid(2015, 2).unwrap();
        assert_eq!(grid[0].date, date(2015, 2, 1));
        assert!(grid[0].in_month);
    }

    #[test]
    fn january_backfills_from_december() {
        let grid = month_grid(2027, 1).unwrap();
        assert_eq!(grid[0].date, date(2026, 12, 27));
    }

    #[test]
    fn rejects_invalid_month() {
        assert_eq!(
            month_grid(2024, 13),
            Err(DateError::InvalidMonth {
                year: 2024,
                month: 13
            })
        );
    }

    #[test]
    fn date_keys_are_zero_padded() {
        assert_eq!(format_date_key(date(2024, 3, 5)), "2024-03-05");
        assert_eq!(parse_date_key("2024-03-05").unwrap(), date(2024, 3, 5));
        assert!(parse_date_key("2024-3-5x").is_err());
    }

    #[test]
    fn formats_for_display() {
        assert_eq!(format_long(date(2026, 10, 19)), "Monday, October 19, 2026");
        assert_eq!(format_short(date(2026, 10, 9)), "Oct 9");
        assert_eq!(month_title(2026, 10), "October 2026");
    }

    #[test]
    fn picker_selects_only_in_month_cells() {
        let mut picker = DatePicker::open(Some(date(2026, 10, 19)), date(2026, 10, 19));
        let grid = picker.grid().unwrap();

        assert_eq!(picker.select(grid[0]), None);
        assert_eq!(picker.select(grid[10]).as_deref(), Some("2026-10-07"));
        assert!(picker.is_selected(date(2026, 10, 7)));
    }

    #[test]
    fn picker_navigation_wraps_years() {
        let mut picker = DatePicker::open(Some(date(2026, 1, 31)), date(2026, 1, 31));
        picker.prev_month();
        assert_eq!((picker.year(), picker.month()), (2025, 12));
        picker.next_month();
        picker.next_month();
        assert_eq!((picker.year(), picker.month()), (2026, 2));
        assert_eq!(picker.cursor(), date(2026, 2, 28));
    }

    #[test]
    fn picker_cursor_crosses_month_boundary() {
        let mut picker = DatePicker::open(Some(date(2026, 10, 30)), date(2026, 10, 30));
        picker.move_cursor(7);
        assert_eq!(picker.cursor(), date(2026, 11, 6));
        assert_eq!(picker.title(), "November 2026");
        assert_eq!(picker.select_cursor().as_deref(), Some("2026-11-06"));
    }

    #[test]
    fn select_today_jumps_month() {
        let mut picker = DatePicker::open(Some(date(2020, 5, 5)), date(2026, 10, 19));
        assert_eq!(picker.select_today(date(2026, 10, 19)), "2026-10-19");
        assert_eq!(picker.title(), "October 2026");
    }
}
