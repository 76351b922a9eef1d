use std::time::Instant;

use chrono::NaiveDate;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};

use super::buffer::TextBuffer;
use super::constants::*;
use crate::calendar::{self, format_long, DayCell};
use crate::core::gesture::SwipeAction;
use crate::core::store::now_millis;
use crate::core::{Board, BoardEvent, FileStore, KeyValueStore};
use crate::model::{Task, TaskView};

mod input;
mod render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    Add,
    Calendar,
    Help,
}

#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    kind: StatusKind,
    created_at: Instant,
}

impl StatusMessage {
    fn new<T: Into<String>>(text: T, kind: StatusKind) -> Self {
        Self {
            text: text.into(),
            kind,
            created_at: Instant::now(),
        }
    }

    fn style(&self) -> Style {
        match self.kind {
            StatusKind::Info => Style::default().fg(Color::Cyan),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Info,
    Error,
}

/// Screen regions recorded while drawing, used to route mouse input.
#[derive(Debug, Clone, Default)]
struct HitAreas {
    tabs: Vec<(TaskView, Rect)>,
    cards: Vec<(String, Rect)>,
    picker_cells: Vec<(DayCell, Rect)>,
    date_button: Option<Rect>,
    add_bar: Option<Rect>,
}

pub(crate) struct App<S = FileStore> {
    board: Board<S>,
    store_label: String,
    /// Source of the local calendar date, read at each use so the app
    /// follows midnight.
    clock: fn() -> NaiveDate,
    first_run: bool,
    selected: usize,
    input_mode: InputMode,
    input: TextBuffer,
    status: Option<StatusMessage>,
    /// Card currently held by the mouse.
    dragging: Option<String>,
    last_created_at: i64,
    hits: HitAreas,
    should_quit: bool,
}

impl<S: KeyValueStore> App<S> {
    pub(crate) fn new(board: Board<S>, store_label: String) -> Self {
        let first_run = board.store().is_empty();
        Self {
            board,
            store_label,
            clock: calendar::today,
            first_run,
            selected: 0,
            input_mode: InputMode::Normal,
            input: TextBuffer::new(),
            status: None,
            dragging: None,
            last_created_at: 0,
            hits: HitAreas::default(),
            should_quit: false,
        }
    }

    /// Runs due timers, reports their outcomes and expires stale status lines.
    pub(crate) fn on_tick(&mut self, now: Instant) {
        for event in self.board.tick(now) {
            self.report(event);
        }
        self.clamp_selection();

        if let Some(status) = &self.status {
            if now.saturating_duration_since(status.created_at) > STATUS_TTL {
                self.status = None;
            }
        }
    }

    fn report(&mut self, event: BoardEvent) {
        match event {
            BoardEvent::Completed { title, .. } => {
                self.first_run = false;
                self.set_status_info(format!("Completed “{}” 🎉", title));
            }
            BoardEvent::Drafted { title, .. } => {
                self.set_status_info(format!("Moved “{}” to drafts", title));
            }
            BoardEvent::PersistFailed { error, .. } => {
                self.set_status_error(format!("Could not save: {}", error));
            }
            BoardEvent::AnimationComplete { .. } | BoardEvent::CelebrationDismissed => {}
        }
    }

    pub(crate) fn next_wakeup(&self) -> Option<Instant> {
        self.board.next_wakeup()
    }

    fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    /// Abandons a mouse drag when the terminal loses focus mid-gesture.
    pub(crate) fn on_focus_lost(&mut self) {
        if let Some(id) = self.dragging.take() {
            self.board.pointer_cancel(&id);
        }
    }

    pub(crate) fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub(crate) fn set_status_info<T: Into<String>>(&mut self, text: T) {
        self.status = Some(StatusMessage::new(text, StatusKind::Info));
    }

    pub(crate) fn set_status_error<T: Into<String>>(&mut self, text: T) {
        self.status = Some(StatusMessage::new(text, StatusKind::Error));
    }

    fn visible_tasks(&self) -> Vec<Task> {
        self.board.snapshot().tasks
    }

    fn selected_task_id(&self) -> Option<String> {
        self.visible_tasks()
            .get(self.selected)
            .map(|task| task.id.clone())
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_tasks().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    fn select_next(&mut self) {
        let len = self.visible_tasks().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn select_task_by_id(&mut self, id: &str) {
        if let Some(idx) = self.visible_tasks().iter().position(|task| task.id == id) {
            self.selected = idx;
        }
    }

    fn switch_view(&mut self, view: TaskView) {
        if self.board.view() == view {
            return;
        }
        self.board.set_view(view);
        self.selected = 0;
        self.dragging = None;
        if self.input_mode == InputMode::Add && view != TaskView::Today {
            self.input_mode = InputMode::Normal;
        }
    }

    fn next_tab(&mut self) {
        let index = (self.board.view().index() + 1) % TaskView::ALL.len();
        self.switch_view(TaskView::ALL[index]);
    }

    fn prev_tab(&mut self) {
        let len = TaskView::ALL.len();
        let index = (self.board.view().index() + len - 1) % len;
        self.switch_view(TaskView::ALL[index]);
    }

    fn begin_add(&mut self) {
        if self.board.view() != TaskView::Today {
            self.set_status_info(STATUS_ADD_TODAY_ONLY);
            return;
        }
        self.input_mode = InputMode::Add;
        self.set_status_info(STATUS_ENTER_ADD);
    }

    fn add_task(&mut self) {
        if self.input.is_blank() {
            self.set_status_info(STATUS_EMPTY_TITLE);
            return;
        }
        if self.board.selected_date().is_none() {
            self.set_status_info(STATUS_NO_DATE);
            return;
        }

        // Rapid adds within one millisecond still sort newest first.
        let created_at = now_millis().max(self.last_created_at + 1);
        let title = self.input.take();
        match self.board.add_task(&title, created_at) {
            Ok(Some(outcome)) => {
                self.last_created_at = created_at;
                self.first_run = false;
                self.input_mode = InputMode::Normal;
                self.select_task_by_id(&outcome.id);
                self.set_status_info(format!(
                    "Added “{}” for {}",
                    outcome.title,
                    format_long(outcome.date)
                ));
            }
            Ok(None) => self.set_status_info(STATUS_EMPTY_TITLE),
            Err(err) => {
                self.input.set(title);
                self.set_status_error(format!("Could not save: {}", err));
            }
        }
    }

    fn swipe_selected(&mut self, action: SwipeAction, now: Instant) {
        let Some(id) = self.selected_task_id() else {
            self.set_status_info(STATUS_NOTHING_SELECTED);
            return;
        };
        if self.board.swipe(&id, action, now).is_some() {
            return;
        }

        let policy = self.board.view().swipe_policy();
        let busy = self.board.card(&id).is_some_and(|card| card.is_animating());
        let message = if busy {
            STATUS_BUSY
        } else if !policy.is_swipeable() {
            STATUS_NOT_SWIPEABLE
        } else {
            STATUS_NO_LEFT_SWIPE
        };
        self.set_status_info(message);
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.selected_task_id() else {
            self.set_status_info(STATUS_NOTHING_SELECTED);
            return;
        };
        if self.dragging.as_deref() == Some(id.as_str()) {
            self.dragging = None;
        }
        match self.board.delete(&id) {
            Ok(result) if result.deleted => self.set_status_info("Deleted task"),
            Ok(_) => self.set_status_info("Task already gone"),
            Err(err) => self.set_status_error(format!("Could not delete: {}", err)),
        }
        self.clamp_selection();
    }

    fn jump_to_today(&mut self) {
        let today = self.today();
        self.board.select_date(Some(today));
        self.selected = 0;
        self.set_status_info(format!("Showing {}", format_long(today)));
    }

    fn open_calendar(&mut self) {
        self.board.open_picker(self.today());
        self.input_mode = InputMode::Calendar;
        self.set_status_info(STATUS_CALENDAR);
    }

    fn close_calendar(&mut self) {
        self.board.close_picker();
        self.input_mode = InputMode::Normal;
        self.status = None;
    }

    /// Called after the picker produced a date.
    fn date_picked(&mut self, picked: Option<NaiveDate>) {
        if let Some(date) = picked {
            self.input_mode = InputMode::Normal;
            self.selected = 0;
            self.set_status_info(format!("Showing {}", format_long(date)));
        }
    }

    fn show_help_overlay(&mut self) {
        self.input_mode = InputMode::Help;
        self.set_status_info(STATUS_HELP);
    }
}
