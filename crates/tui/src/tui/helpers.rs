use std::cmp::min;

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::celebration::ParticleKind;
use crate::core::gesture::{SwipeAction, SwipeHint};
use crate::model::TaskView;
use crate::tui::constants::POINTER_UNITS_PER_COLUMN;

pub const BG_BASE: Color = Color::Rgb(14, 17, 23);
pub const BG_PANEL: Color = Color::Rgb(22, 26, 34);
pub const BG_ACCENT: Color = Color::Rgb(32, 37, 47);
pub const FG_ACCENT: Color = Color::Rgb(120, 161, 255);
pub const FG_COMPLETE: Color = Color::Rgb(74, 222, 128);
pub const FG_DRAFT: Color = Color::Rgb(251, 191, 36);

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = min(width, area.width);
    let h = min(height, area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(w)) / 2,
        y: area.y + (area.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    }
}

pub fn inset_rect(area: Rect, padding: u16) -> Rect {
    if area.width == 0 || area.height == 0 {
        return area;
    }
    let px = padding.min(area.width / 2);
    let py = padding.min(area.height / 2);
    Rect {
        x: area.x + px,
        y: area.y + py,
        width: area.width.saturating_sub(px * 2),
        height: area.height.saturating_sub(py * 2),
    }
}

pub fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

/// Slides a card horizontally inside its slot; whatever falls outside the
/// slot is cut off.
pub fn shift_rect(area: Rect, columns: i32) -> Rect {
    let shift = columns.unsigned_abs().min(area.width as u32) as u16;
    if columns >= 0 {
        Rect {
            x: area.x + shift,
            width: area.width - shift,
            ..area
        }
    } else {
        Rect {
            width: area.width - shift,
            ..area
        }
    }
}

pub fn column_to_pointer(column: u16) -> f32 {
    column as f32 * POINTER_UNITS_PER_COLUMN
}

pub fn pointer_to_columns(offset: f32) -> i32 {
    (offset / POINTER_UNITS_PER_COLUMN).round() as i32
}

/// Columns a card has travelled through its exit animation.
pub fn exit_columns(action: SwipeAction, progress: f32, width: u16) -> i32 {
    let travel = (progress.clamp(0.0, 1.0) * width as f32).round() as i32;
    match action {
        SwipeAction::Complete => travel,
        SwipeAction::Draft => -travel,
    }
}

/// Tab caption; the count badge is hidden when zero.
pub fn tab_title(view: TaskView, count: usize) -> String {
    let icon = match view {
        TaskView::Today => "☀",
        TaskView::Draft => "✎",
        TaskView::Completed => "✓",
    };
    if count == 0 {
        format!("{} {}", icon, view.label())
    } else {
        format!("{} {} ({})", icon, view.label(), count)
    }
}

pub fn hint_color(hint: SwipeHint) -> Color {
    match hint {
        SwipeHint::Complete => FG_COMPLETE,
        SwipeHint::Draft => FG_DRAFT,
        SwipeHint::None => Color::DarkGray,
    }
}

pub fn action_color(action: SwipeAction) -> Color {
    match action {
        SwipeAction::Complete => FG_COMPLETE,
        SwipeAction::Draft => FG_DRAFT,
    }
}

pub fn particle_glyph(kind: ParticleKind) -> &'static str {
    match kind {
        ParticleKind::Sparkle => "✦",
        ParticleKind::Star => "★",
        ParticleKind::Check => "✓",
    }
}

pub fn build_help_lines() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Tab / Shift+Tab", "Switch between Today, Drafts and Completed"),
        ("1 / 2 / 3", "Jump to a tab"),
        ("j / k or ↓ / ↑", "Move selection"),
        ("l / →", "Swipe right: complete"),
        ("h / ←", "Swipe left: move to drafts (Today only)"),
        ("x / Delete", "Delete task"),
        ("a", "Add a task for the selected date"),
        ("c", "Open the calendar"),
        ("t", "Jump back to today"),
        ("Mouse drag", "Swipe a card past the halfway mark"),
        ("?", "Toggle this help overlay"),
        ("Esc", "Cancel or close overlays"),
        ("q", "Quit"),
    ]
}

pub fn accent_title(text: &str) -> Line<'static> {
    Line::from(vec![Span::styled(
        text.to_owned(),
        Style::default().fg(FG_ACCENT).add_modifier(Modifier::BOLD),
    )])
}
