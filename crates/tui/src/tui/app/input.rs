use std::time::Instant;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::core::gesture::SwipeAction;
use crate::core::KeyValueStore;
use crate::model::TaskView;
use crate::tui::helpers::{column_to_pointer, contains};

use super::{App, InputMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NormalAction {
    Quit,
    EnterAdd,
    OpenCalendar,
    JumpToToday,
    ShowHelp,
    Dismiss,
    Swipe(SwipeAction),
    Delete,
    SelectNext,
    SelectPrev,
    PrevTab,
    NextTab,
    ShowTab(TaskView),
}

impl NormalAction {
    fn from_event(key: &KeyEvent) -> Option<Self> {
        if matches!(key.code, KeyCode::Char('c')) && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Self::Quit);
        }

        match key.code {
            KeyCode::Char('q') => Some(Self::Quit),
            KeyCode::Char('a') => Some(Self::EnterAdd),
            KeyCode::Char('c') => Some(Self::OpenCalendar),
            KeyCode::Char('t') => Some(Self::JumpToToday),
            KeyCode::Char('?') => Some(Self::ShowHelp),
            KeyCode::Esc => Some(Self::Dismiss),
            KeyCode::Char('l') | KeyCode::Right => Some(Self::Swipe(SwipeAction::Complete)),
            KeyCode::Char('h') | KeyCode::Left => Some(Self::Swipe(SwipeAction::Draft)),
            KeyCode::Char('x') | KeyCode::Delete => Some(Self::Delete),
            KeyCode::Char('j') | KeyCode::Down => Some(Self::SelectNext),
            KeyCode::Char('k') | KeyCode::Up => Some(Self::SelectPrev),
            KeyCode::BackTab => Some(Self::PrevTab),
            KeyCode::Tab => Some(Self::NextTab),
            KeyCode::Char('1') => Some(Self::ShowTab(TaskView::Today)),
            KeyCode::Char('2') => Some(Self::ShowTab(TaskView::Draft)),
            KeyCode::Char('3') => Some(Self::ShowTab(TaskView::Completed)),
            _ => None,
        }
    }
}

impl<S: KeyValueStore> App<S> {
    pub(crate) fn on_key(&mut self, key: KeyEvent, now: Instant) -> Result<()> {
        match self.input_mode {
            InputMode::Normal => self.handle_normal_mode(key, now),
            InputMode::Add => self.handle_add_mode(key),
            InputMode::Calendar => self.handle_calendar_mode(key),
            InputMode::Help => self.handle_help_mode(key),
        }
        Ok(())
    }

    fn handle_normal_mode(&mut self, key: KeyEvent, now: Instant) {
        if let Some(action) = NormalAction::from_event(&key) {
            self.execute_normal_action(action, now);
        }
    }

    fn execute_normal_action(&mut self, action: NormalAction, now: Instant) {
        match action {
            NormalAction::Quit => self.should_quit = true,
            NormalAction::EnterAdd => self.begin_add(),
            NormalAction::OpenCalendar => self.open_calendar(),
            NormalAction::JumpToToday => self.jump_to_today(),
            NormalAction::ShowHelp => self.show_help_overlay(),
            NormalAction::Dismiss => {
                self.board.dismiss_celebration();
                self.status = None;
            }
            NormalAction::Swipe(swipe) => self.swipe_selected(swipe, now),
            NormalAction::Delete => self.delete_selected(),
            NormalAction::SelectNext => self.select_next(),
            NormalAction::SelectPrev => self.select_prev(),
            NormalAction::PrevTab => self.prev_tab(),
            NormalAction::NextTab => self.next_tab(),
            NormalAction::ShowTab(view) => self.switch_view(view),
        }
    }

    fn handle_add_mode(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.add_task(),
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.status = None;
            }
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete_char(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            KeyCode::Char(c) => self.input.insert_char(c),
            _ => {}
        }
    }

    fn handle_calendar_mode(&mut self, key: KeyEvent) {
        let today = self.today();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.close_calendar(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let picked = self.board.pick_cursor();
                self.date_picked(picked);
            }
            KeyCode::Char('t') => {
                let picked = self.board.pick_today(today);
                self.date_picked(picked);
            }
            KeyCode::Char('[') | KeyCode::PageUp => {
                if let Some(picker) = self.board.picker_mut() {
                    picker.prev_month();
                }
            }
            KeyCode::Char(']') | KeyCode::PageDown => {
                if let Some(picker) = self.board.picker_mut() {
                    picker.next_month();
                }
            }
            code => {
                let days = match code {
                    KeyCode::Left | KeyCode::Char('h') => -1,
                    KeyCode::Right | KeyCode::Char('l') => 1,
                    KeyCode::Up | KeyCode::Char('k') => -7,
                    KeyCode::Down | KeyCode::Char('j') => 7,
                    _ => return,
                };
                if let Some(picker) = self.board.picker_mut() {
                    picker.move_cursor(days);
                }
            }
        }
    }

    fn handle_help_mode(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('?')) {
            self.input_mode = InputMode::Normal;
            self.status = None;
        }
    }

    pub(crate) fn on_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.mouse_down(column, row),
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(id) = self.dragging.clone() {
                    self.board.pointer_move(&id, column_to_pointer(column));
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(id) = self.dragging.take() {
                    self.board.pointer_up(&id, now);
                }
            }
            MouseEventKind::ScrollDown => self.select_next(),
            MouseEventKind::ScrollUp => self.select_prev(),
            _ => {}
        }
    }

    fn mouse_down(&mut self, column: u16, row: u16) {
        match self.input_mode {
            InputMode::Calendar => {
                let hit = self
                    .hits
                    .picker_cells
                    .iter()
                    .find(|(_, area)| contains(*area, column, row))
                    .map(|(cell, _)| *cell);
                if let Some(cell) = hit {
                    let picked = self.board.pick(cell);
                    self.date_picked(picked);
                }
                return;
            }
            InputMode::Help => {
                self.input_mode = InputMode::Normal;
                return;
            }
            InputMode::Normal | InputMode::Add => {}
        }

        if self.board.celebration().is_visible() {
            self.board.dismiss_celebration();
        }

        let tab = self
            .hits
            .tabs
            .iter()
            .find(|(_, area)| contains(*area, column, row))
            .map(|(view, _)| *view);
        if let Some(view) = tab {
            self.switch_view(view);
            return;
        }

        if self
            .hits
            .date_button
            .is_some_and(|area| contains(area, column, row))
        {
            self.open_calendar();
            return;
        }

        if self
            .hits
            .add_bar
            .is_some_and(|area| contains(area, column, row))
        {
            self.begin_add();
            return;
        }

        let card = self
            .hits
            .cards
            .iter()
            .find(|(_, area)| contains(*area, column, row))
            .map(|(id, _)| id.clone());
        if let Some(id) = card {
            self.select_task_by_id(&id);
            if self.board.pointer_down(&id, column_to_pointer(column)) {
                self.dragging = Some(id);
            }
        }
    }
}
