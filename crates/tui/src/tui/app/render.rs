use std::cmp::min;
use std::time::Instant;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap};
use ratatui::Frame;

use crate::calendar::{format_long, format_short, WEEKDAY_LABELS};
use crate::core::celebration::ParticleKind;
use crate::core::KeyValueStore;
use crate::model::{Task, TaskStatus, TaskView};
use crate::tui::constants::{APP_VERSION, CARD_HEIGHT};
use crate::tui::helpers::{
    accent_title, action_color, build_help_lines, centered_rect, exit_columns, hint_color,
    inset_rect, particle_glyph, pointer_to_columns, shift_rect, tab_title, BG_ACCENT, BG_BASE,
    BG_PANEL, FG_ACCENT, FG_COMPLETE, FG_DRAFT,
};

use super::{App, HitAreas, InputMode};

const DATE_BUTTON_WIDTH: u16 = 16;
const PICKER_CELL_WIDTH: u16 = 4;

impl<S: KeyValueStore> App<S> {
    pub(crate) fn draw(&mut self, f: &mut Frame<'_>, now: Instant) {
        self.hits = HitAreas::default();

        let size = f.size();
        f.render_widget(Clear, size);
        f.render_widget(Block::default().style(Style::default().bg(BG_BASE)), size);
        let add_bar_height = if self.board.view() == TaskView::Today {
            3
        } else {
            0
        };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(add_bar_height),
                Constraint::Min(CARD_HEIGHT),
                Constraint::Length(2),
            ])
            .split(size);

        self.draw_header(f, chunks[0]);
        self.draw_tabs(f, chunks[1]);
        if add_bar_height > 0 {
            self.draw_add_bar(f, chunks[2]);
        }
        self.draw_cards(f, chunks[3], now);
        self.draw_footer(f, chunks[4]);

        match self.input_mode {
            InputMode::Calendar => self.draw_picker_overlay(f, size),
            InputMode::Help => self.draw_help_overlay(f, size),
            InputMode::Normal | InputMode::Add => {}
        }

        if self.board.celebration().is_visible() {
            self.draw_celebration(f, size, now);
        }
    }

    fn draw_header(&self, f: &mut Frame<'_>, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
            .split(area);

        let context = match self.board.view() {
            TaskView::Today => self
                .board
                .selected_date()
                .map(format_long)
                .unwrap_or_else(|| String::from("No date selected")),
            TaskView::Draft => String::from("Parked for later"),
            TaskView::Completed => String::from("Done and dusted"),
        };
        let left_line = Line::from(vec![
            Span::styled(
                format!(" clearloop v{} ", APP_VERSION),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("· {}", context)),
            Span::raw("  "),
            Span::styled(
                format!("💾 {}", self.store_label),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        f.render_widget(
            Paragraph::new(left_line).style(Style::default().bg(BG_BASE)),
            cols[0],
        );

        let right_line = Line::from(vec![
            Span::styled("↻ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                "loop",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        f.render_widget(
            Paragraph::new(right_line)
                .alignment(Alignment::Right)
                .style(Style::default().bg(BG_BASE)),
            cols[1],
        );
    }

    fn draw_tabs(&mut self, f: &mut Frame<'_>, area: Rect) {
        let badges = self.board.badges();
        let titles: Vec<Line> = TaskView::ALL
            .iter()
            .map(|view| Line::from(tab_title(*view, badges.get(*view))))
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("Views"))
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(area);

        // Tabs lays titles out as " title " separated by a one column divider.
        let mut x = inner.x;
        for (view, title) in TaskView::ALL.iter().zip(&titles) {
            let width = title.width() as u16 + 2;
            let hit = Rect {
                x,
                y: inner.y,
                width: width.min(inner.right().saturating_sub(x)),
                height: inner.height.min(1),
            };
            self.hits.tabs.push((*view, hit));
            x = x.saturating_add(width + 1);
        }

        let tabs = Tabs::new(titles)
            .select(self.board.view().index())
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(Color::Green)
                    .bg(BG_ACCENT)
                    .add_modifier(Modifier::BOLD),
            );
        f.render_widget(tabs, area);
    }

    fn draw_add_bar(&mut self, f: &mut Frame<'_>, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(10), Constraint::Length(DATE_BUTTON_WIDTH)])
            .split(area);

        let editing = self.input_mode == InputMode::Add;
        let border = if editing { FG_ACCENT } else { Color::DarkGray };
        let input_block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("➕ Add task"))
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(BG_PANEL));
        let input_area = input_block.inner(cols[0]);
        f.render_widget(input_block, cols[0]);

        let text = if self.input.as_str().is_empty() && !editing {
            Line::from(Span::styled(
                "What needs to be done today? (a)",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from(self.input.as_str().to_string())
        };
        f.render_widget(
            Paragraph::new(text).style(Style::default().bg(BG_PANEL)),
            input_area,
        );
        if editing && input_area.width > 0 {
            let column = min(
                self.input.cursor_column() as u16,
                input_area.width.saturating_sub(1),
            );
            f.set_cursor(input_area.x + column, input_area.y);
        }
        self.hits.add_bar = Some(cols[0]);

        let label = self
            .board
            .selected_date()
            .map(|date| format!("📅 {}", format_short(date)))
            .unwrap_or_else(|| String::from("📅 Pick date"));
        let button = Paragraph::new(Line::from(Span::styled(
            label,
            Style::default().fg(FG_ACCENT).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .style(Style::default().bg(BG_PANEL)),
        );
        f.render_widget(button, cols[1]);
        self.hits.date_button = Some(cols[1]);
    }

    fn draw_cards(&mut self, f: &mut Frame<'_>, area: Rect, now: Instant) {
        let snapshot = self.board.snapshot();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(area);
        f.render_widget(block, area);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if snapshot.is_empty() {
            let lines = self.empty_state(snapshot.view);
            let height = (lines.len() as u16).saturating_add(2).min(inner.height);
            let content_area = centered_rect(inner.width.min(80), height, inner);
            f.render_widget(
                Paragraph::new(lines)
                    .wrap(Wrap { trim: true })
                    .alignment(Alignment::Center)
                    .style(Style::default().bg(BG_PANEL)),
                content_area,
            );
            return;
        }

        let capacity = (inner.height / CARD_HEIGHT).max(1) as usize;
        let first = self.selected.saturating_sub(capacity - 1);
        for (slot, (index, task)) in snapshot
            .tasks
            .iter()
            .enumerate()
            .skip(first)
            .take(capacity)
            .enumerate()
        {
            let slot_area = Rect {
                x: inner.x,
                y: inner.y + slot as u16 * CARD_HEIGHT,
                width: inner.width,
                height: CARD_HEIGHT.min(inner.height),
            };
            self.hits.cards.push((task.id.clone(), slot_area));
            self.draw_card(f, slot_area, task, index == self.selected, now);
        }
    }

    fn draw_card(&self, f: &mut Frame<'_>, area: Rect, task: &Task, selected: bool, now: Instant) {
        let (shift, tint) = match self.board.card(&task.id) {
            Some(card) => match card.animation(now) {
                Some((action, progress)) => (
                    exit_columns(action, progress, area.width),
                    Some(action_color(action)),
                ),
                None if card.is_dragging() => (
                    pointer_to_columns(card.offset()),
                    Some(hint_color(card.hint())),
                ),
                None => (0, None),
            },
            None => (0, None),
        };

        if shift != 0 {
            let (label, color, alignment) = if shift > 0 {
                ("✓ Complete", FG_COMPLETE, Alignment::Left)
            } else {
                ("Draft ✎", FG_DRAFT, Alignment::Right)
            };
            let backdrop = Rect {
                y: area.y + area.height / 2,
                height: 1,
                ..inset_rect(area, 1)
            };
            f.render_widget(
                Paragraph::new(Span::styled(
                    label,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ))
                .alignment(alignment),
                backdrop,
            );
        }

        let card_area = shift_rect(area, shift);
        if card_area.width < 4 {
            return;
        }

        let border = match tint {
            Some(color) => color,
            None if selected => FG_ACCENT,
            None => Color::DarkGray,
        };
        let background = if selected { BG_ACCENT } else { BG_PANEL };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(background));

        let title_style = match task.status {
            TaskStatus::Completed => Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT),
            TaskStatus::Active | TaskStatus::Draft => Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        };
        let marker = if selected { "▶ " } else { "  " };
        let detail = match task.status {
            TaskStatus::Active => Span::styled(
                "→ complete   ← draft",
                Style::default().fg(Color::DarkGray),
            ),
            TaskStatus::Draft => Span::styled(
                format!("Originally assigned on {}", format_long(task.assigned_date)),
                Style::default().fg(FG_DRAFT),
            ),
            TaskStatus::Completed => Span::styled(
                format!("✓ Originally assigned on {}", format_long(task.assigned_date)),
                Style::default().fg(FG_COMPLETE),
            ),
        };
        let lines = vec![
            Line::from(vec![
                Span::styled(marker, Style::default().fg(FG_ACCENT)),
                Span::styled(task.title.clone(), title_style),
            ]),
            Line::from(vec![Span::raw("  "), detail]),
        ];

        f.render_widget(Clear, card_area);
        f.render_widget(Paragraph::new(lines).block(block), card_area);
    }

    fn empty_state(&self, view: TaskView) -> Vec<Line<'static>> {
        let (heading, hint) = match view {
            TaskView::Today => (
                "Nothing planned ☀",
                "Press 'a' to add a task, or 'c' to look at another day.",
            ),
            TaskView::Draft => (
                "No drafts ✎",
                "Swipe a Today card left (h) to park it here.",
            ),
            TaskView::Completed => (
                "No wins yet ✓",
                "Swipe a card right (l) once it's done.",
            ),
        };

        let mut lines: Vec<Line<'static>> = vec![
            Line::from(Span::styled(
                heading,
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(Span::styled(
                hint,
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::BOLD),
            )),
        ];

        if self.first_run {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                format!(
                    "Your clearloop data lives in `{}` (adjust with `--data-dir` or `CLEARLOOP_DATA_DIR`).",
                    self.store_label
                ),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )));
        }

        lines
    }

    fn draw_footer(&self, f: &mut Frame<'_>, area: Rect) {
        let lines = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.style())])
        } else {
            Line::from(vec![Span::raw("Ready")])
        };
        f.render_widget(Paragraph::new(status_line), lines[0]);

        let help = match self.input_mode {
            InputMode::Normal => {
                "tab views | j/k move | l/→ complete | h/← draft | x delete | a add | c calendar | t today | ? help | q quit"
            }
            InputMode::Add => "Enter to add ✍️ • Esc to cancel",
            InputMode::Calendar => "arrows move • [ ] month • Enter select • t today • Esc close",
            InputMode::Help => "Enter/Esc to close ❔",
        };
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                help,
                Style::default().fg(Color::DarkGray),
            ))),
            lines[1],
        );
    }

    fn draw_picker_overlay(&mut self, f: &mut Frame<'_>, area: Rect) {
        let today = self.today();
        let Some(picker) = self.board.picker() else {
            return;
        };
        let Ok(grid) = picker.grid() else {
            return;
        };

        let width = PICKER_CELL_WIDTH * 7 + 2;
        let popup_area = centered_rect(width, 11, area);
        f.render_widget(Clear, popup_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title(&format!("‹ {} ›", picker.title())))
            .border_style(Style::default().fg(FG_ACCENT))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);
        if inner.height < 2 {
            return;
        }

        let weekdays: Vec<Span> = WEEKDAY_LABELS
            .iter()
            .map(|label| Span::styled(format!(" {:>2} ", label), Style::default().fg(Color::Gray)))
            .collect();
        f.render_widget(
            Paragraph::new(Line::from(weekdays)),
            Rect { height: 1, ..inner },
        );

        for (i, cell) in grid.iter().enumerate() {
            let rect = Rect {
                x: inner.x + (i % 7) as u16 * PICKER_CELL_WIDTH,
                y: inner.y + 1 + (i / 7) as u16,
                width: PICKER_CELL_WIDTH,
                height: 1,
            };
            if rect.bottom() > inner.bottom() || rect.right() > inner.right() {
                continue;
            }

            let mut style = if cell.in_month {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            if cell.in_month && picker.is_selected(cell.date) {
                style = style
                    .fg(Color::Black)
                    .bg(FG_COMPLETE)
                    .add_modifier(Modifier::BOLD);
            }
            if cell.date == picker.cursor() {
                style = style.add_modifier(Modifier::REVERSED);
            }
            if cell.date == today {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            f.render_widget(
                Paragraph::new(Span::styled(format!(" {:>2} ", cell.day()), style)),
                rect,
            );
            self.hits.picker_cells.push((*cell, rect));
        }

        let hint_row = inner.y + 8;
        if hint_row < inner.bottom() {
            f.render_widget(
                Paragraph::new(Span::styled(
                    "t today • [ ] month",
                    Style::default().fg(Color::DarkGray),
                ))
                .alignment(Alignment::Center),
                Rect {
                    y: hint_row,
                    height: 1,
                    ..inner
                },
            );
        }
    }

    fn draw_help_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let lines = build_help_lines();
        let width = min(area.width.saturating_sub(10), 80);
        let height = min(lines.len() as u16 + 4, area.height.saturating_sub(2)).max(10);
        let popup_area = centered_rect(width, height, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("⌨️ Keyboard Reference"))
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        if inner.width < 3 || inner.height < 3 {
            return;
        }

        let help_lines: Vec<Line> = lines
            .into_iter()
            .map(|(combo, desc)| {
                Line::from(vec![
                    Span::styled(format!("{:<16}", combo), Style::default().fg(Color::Cyan)),
                    Span::raw("  "),
                    Span::raw(desc),
                ])
            })
            .collect();
        f.render_widget(
            Paragraph::new(help_lines)
                .wrap(Wrap { trim: true })
                .style(Style::default().bg(BG_PANEL)),
            inset_rect(inner, 1),
        );
    }

    fn draw_celebration(&self, f: &mut Frame<'_>, area: Rect, now: Instant) {
        let celebration = self.board.celebration();
        let Some(title) = celebration.title() else {
            return;
        };

        let width = min(area.width.saturating_sub(4), 48);
        let popup_area = centered_rect(width, 11, area);
        f.render_widget(Clear, popup_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("🎉 Nice work"))
            .border_style(Style::default().fg(FG_COMPLETE))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let elapsed = celebration.elapsed(now);
        for particle in celebration.particles() {
            if !particle.is_visible(elapsed) {
                continue;
            }
            let x = inner.x + ((particle.x / 100.0) * inner.width as f32) as u16;
            let y = inner.y + ((particle.y / 100.0) * inner.height as f32) as u16;
            let color = match particle.kind() {
                ParticleKind::Sparkle => FG_DRAFT,
                ParticleKind::Star => FG_ACCENT,
                ParticleKind::Check => FG_COMPLETE,
            };
            f.buffer_mut().set_string(
                x.min(inner.right() - 1),
                y.min(inner.bottom() - 1),
                particle_glyph(particle.kind()),
                Style::default().fg(color),
            );
        }

        let text_area = centered_rect(inner.width, 3, inner);
        f.render_widget(Clear, text_area);
        f.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(
                    "Task completed!",
                    Style::default()
                        .fg(FG_COMPLETE)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::default(),
                Line::from(Span::styled(
                    title.to_string(),
                    Style::default().fg(Color::White),
                )),
            ])
            .alignment(Alignment::Center)
            .style(Style::default().bg(BG_PANEL)),
            text_area,
        );
    }
}
