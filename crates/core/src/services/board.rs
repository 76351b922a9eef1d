use std::collections::HashMap;
use std::time::Instant;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::calendar::{parse_date_key, DateError, DatePicker, DayCell};
use crate::celebration::Celebration;
use crate::gesture::{CardIntent, SwipeAction, SwipeCard};
use crate::model::{sort_recent_first, AddOutcome, DeleteResult, Task, TaskView};
use crate::storage::{KeyValueStore, StoreError};
use crate::store::TaskStore;
use crate::timer::earliest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub view: TaskView,
    pub selected_date: Option<NaiveDate>,
    pub tasks: Vec<Task>,
}

impl ViewSnapshot {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabBadges {
    pub today: usize,
    pub draft: usize,
    pub completed: usize,
}

impl TabBadges {
    pub fn get(&self, view: TaskView) -> usize {
        match view {
            TaskView::Today => self.today,
            TaskView::Draft => self.draft,
            TaskView::Completed => self.completed,
        }
    }
}

/// Things that happened while the board processed timers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    Completed { id: String, title: String },
    Drafted { id: String, title: String },
    AnimationComplete { id: String },
    CelebrationDismissed,
    PersistFailed { id: String, error: String },
}

/// Owns the task collection and everything the task list screen derives
/// from it: the active tab, the selected date, per-card gestures, the date
/// picker overlay and the celebration overlay.
#[derive(Debug)]
pub struct Board<S> {
    store: TaskStore<S>,
    view: TaskView,
    selected_date: Option<NaiveDate>,
    cards: HashMap<String, SwipeCard>,
    picker: Option<DatePicker>,
    celebration: Celebration,
}

impl<S: KeyValueStore> Board<S> {
    pub fn new(store: TaskStore<S>, today: NaiveDate) -> Self {
        Self {
            store,
            view: TaskView::Today,
            selected_date: Some(today),
            cards: HashMap::new(),
            picker: None,
            celebration: Celebration::new(),
        }
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    pub fn view(&self) -> TaskView {
        self.view
    }

    pub fn set_view(&mut self, view: TaskView) {
        if self.view != view {
            debug!(view = view.as_str(), "switched view");
            self.view = view;
            self.prune_cards();
        }
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn select_date(&mut self, date: Option<NaiveDate>) {
        self.selected_date = date;
        self.prune_cards();
    }

    pub fn select_date_key(&mut self, key: &str) -> Result<NaiveDate, DateError> {
        let date = parse_date_key(key)?;
        self.select_date(Some(date));
        Ok(date)
    }

    /// Tasks for a tab, newest first.
    pub fn subset(&self, view: TaskView) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .store
            .tasks()
            .iter()
            .filter(|task| view.matches(task, self.selected_date))
            .cloned()
            .collect();
        sort_recent_first(&mut tasks);
        tasks
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            view: self.view,
            selected_date: self.selected_date,
            tasks: self.subset(self.view),
        }
    }

    pub fn badges(&self) -> TabBadges {
        let mut badges = TabBadges::default();
        for task in self.store.tasks() {
            if TaskView::Today.matches(task, self.selected_date) {
                badges.today += 1;
            } else if TaskView::Draft.matches(task, self.selected_date) {
                badges.draft += 1;
            } else if TaskView::Completed.matches(task, self.selected_date) {
                badges.completed += 1;
            }
        }
        badges
    }

    /// Adds a task on the selected date. Empty titles or a missing date are
    /// silently ignored.
    pub fn add_task(&mut self, title: &str, created_at: i64) -> Result<Option<AddOutcome>, StoreError> {
        let Some(date) = self.selected_date else {
            return Ok(None);
        };
        self.store.add_task(title, date, created_at)
    }

    fn is_visible(&self, id: &str) -> bool {
        self.store
            .get(id)
            .is_some_and(|task| self.view.matches(task, self.selected_date))
    }

    pub fn card(&self, id: &str) -> Option<&SwipeCard> {
        self.cards.get(id)
    }

    /// Gesture state for a visible task, created on first touch.
    fn card_mut(&mut self, id: &str) -> Option<&mut SwipeCard> {
        if !self.is_visible(id) {
            return None;
        }
        let policy = self.view.swipe_policy();
        let card = self
            .cards
            .entry(id.to_string())
            .or_insert_with(|| SwipeCard::new(id, policy));
        card.set_policy(policy);
        Some(card)
    }

    pub fn pointer_down(&mut self, id: &str, x: f32) -> bool {
        self.card_mut(id).is_some_and(|card| card.pointer_down(x))
    }

    pub fn pointer_move(&mut self, id: &str, x: f32) -> f32 {
        self.card_mut(id)
            .map(|card| card.pointer_move(x))
            .unwrap_or(0.0)
    }

    pub fn pointer_up(&mut self, id: &str, now: Instant) -> Option<SwipeAction> {
        self.card_mut(id).and_then(|card| card.pointer_up(now))
    }

    pub fn pointer_cancel(&mut self, id: &str) {
        if let Some(card) = self.cards.get_mut(id) {
            card.pointer_cancel();
        }
    }

    pub fn swipe(&mut self, id: &str, action: SwipeAction, now: Instant) -> Option<SwipeAction> {
        self.card_mut(id).and_then(|card| card.swipe(action, now))
    }

    /// Deletes immediately; dropping the card discards any gesture in flight.
    pub fn delete(&mut self, id: &str) -> Result<DeleteResult, StoreError> {
        self.cards.remove(id);
        self.store.delete(id)
    }

    /// Runs due animation and celebration timers. Cards that finish in the
    /// same tick are applied in deadline order, ties broken by task id.
    pub fn tick(&mut self, now: Instant) -> Vec<BoardEvent> {
        let mut finished: Vec<(Instant, String, Vec<CardIntent>)> = Vec::new();
        for (id, card) in self.cards.iter_mut() {
            let Some(deadline) = card.next_deadline() else {
                continue;
            };
            let intents = card.poll(now);
            if !intents.is_empty() {
                finished.push((deadline, id.clone(), intents));
            }
        }
        finished.sort_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));

        let mut events = Vec::new();
        for intent in finished.into_iter().flat_map(|(_, _, intents)| intents) {
            if let Some(event) = self.apply_intent(intent, now) {
                events.push(event);
            }
        }

        if self.celebration.poll(now) {
            events.push(BoardEvent::CelebrationDismissed);
        }

        self.prune_cards();
        events
    }

    fn apply_intent(&mut self, intent: CardIntent, now: Instant) -> Option<BoardEvent> {
        match intent {
            CardIntent::Complete(id) => match self.store.complete(&id) {
                Ok(update) if update.changed => {
                    let title = self.title_of(&id);
                    self.celebration.show(title.clone(), now);
                    Some(BoardEvent::Completed { id, title })
                }
                Ok(_) => None,
                Err(err) => Some(persist_failed(id, &err)),
            },
            CardIntent::Draft(id) => match self.store.move_to_draft(&id) {
                Ok(update) if update.changed => {
                    let title = self.title_of(&id);
                    Some(BoardEvent::Drafted { id, title })
                }
                Ok(_) => None,
                Err(err) => Some(persist_failed(id, &err)),
            },
            CardIntent::AnimationComplete(id) => Some(BoardEvent::AnimationComplete { id }),
        }
    }

    fn title_of(&self, id: &str) -> String {
        self.store
            .get(id)
            .map(|task| task.title.clone())
            .unwrap_or_default()
    }

    /// Cards whose task left the visible subset are torn down; a pending
    /// animation on them never fires.
    fn prune_cards(&mut self) {
        let visible: Vec<String> = self
            .cards
            .keys()
            .filter(|id| self.is_visible(id))
            .cloned()
            .collect();
        self.cards.retain(|id, _| visible.contains(id));
    }

    pub fn next_wakeup(&self) -> Option<Instant> {
        self.cards
            .values()
            .map(SwipeCard::next_deadline)
            .fold(self.celebration.next_deadline(), earliest)
    }

    pub fn celebration(&self) -> &Celebration {
        &self.celebration
    }

    pub fn dismiss_celebration(&mut self) {
        self.celebration.dismiss();
    }

    pub fn open_picker(&mut self, today: NaiveDate) {
        self.picker = Some(DatePicker::open(self.selected_date, today));
    }

    pub fn picker(&self) -> Option<&DatePicker> {
        self.picker.as_ref()
    }

    pub fn picker_mut(&mut self) -> Option<&mut DatePicker> {
        self.picker.as_mut()
    }

    pub fn close_picker(&mut self) {
        self.picker = None;
    }

    /// Applies a picked cell and closes the picker; out-of-month cells leave
    /// it open.
    pub fn pick(&mut self, cell: DayCell) -> Option<NaiveDate> {
        let key = self.picker.as_mut()?.select(cell)?;
        self.commit_pick(&key)
    }

    pub fn pick_cursor(&mut self) -> Option<NaiveDate> {
        let key = self.picker.as_mut()?.select_cursor()?;
        self.commit_pick(&key)
    }

    pub fn pick_today(&mut self, today: NaiveDate) -> Option<NaiveDate> {
        let key = self.picker.as_mut()?.select_today(today);
        self.commit_pick(&key)
    }

    fn commit_pick(&mut self, key: &str) -> Option<NaiveDate> {
        match self.select_date_key(key) {
            Ok(date) => {
                self.picker = None;
                Some(date)
            }
            Err(err) => {
                warn!(%err, "picker produced an unusable date");
                None
            }
        }
    }
}

fn persist_failed(id: String, err: &StoreError) -> BoardEvent {
    warn!(task_id = id.as_str(), error = %err, "failed to persist change");
    BoardEvent::PersistFailed {
        id,
        error: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{COMPLETE_ANIMATION, DRAFT_ANIMATION};
    use crate::model::TaskStatus;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn board() -> Board<MemoryStore> {
        Board::new(TaskStore::open(MemoryStore::new()).unwrap(), day(19))
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|task| task.id.as_str()).collect()
    }

    #[test]
    fn subsets_filter_by_status_and_date() {
        let mut board = board();
        let today_a = board.add_task("Today A", 10).unwrap().unwrap().id;
        let today_b = board.add_task("Today B", 20).unwrap().unwrap().id;
        board.select_date(Some(day(20)));
        let tomorrow = board.add_task("Tomorrow", 30).unwrap().unwrap().id;
        let drafted = board.add_task("Drafted", 40).unwrap().unwrap().id;
        board.select_date(Some(day(19)));

        let now = Instant::now();
        board.set_view(TaskView::Today);
        board.swipe(&today_a, SwipeAction::Complete, now);
        board.tick(now + COMPLETE_ANIMATION);

        board.select_date(Some(day(20)));
        board.swipe(&drafted, SwipeAction::Draft, now);
        board.tick(now + DRAFT_ANIMATION);
        board.select_date(Some(day(19)));

        assert_eq!(ids(&board.subset(TaskView::Today)), vec![today_b.as_str()]);
        assert_eq!(ids(&board.subset(TaskView::Draft)), vec![drafted.as_str()]);
        assert_eq!(ids(&board.subset(TaskView::Completed)), vec![today_a.as_str()]);

        board.select_date(Some(day(20)));
        assert_eq!(ids(&board.subset(TaskView::Today)), vec![tomorrow.as_str()]);
        assert_eq!(board.subset(TaskView::Draft).len(), 1);
        assert_eq!(board.subset(TaskView::Completed).len(), 1);
        assert_eq!(
            board.badges(),
            TabBadges {
                today: 1,
                draft: 1,
                completed: 1
            }
        );
    }

    #[test]
    fn subsets_are_newest_first() {
        let mut board = board();
        board.add_task("Old", 100).unwrap();
        board.add_task("Newest", 300).unwrap();
        board.add_task("Middle", 200).unwrap();

        let titles: Vec<String> = board
            .snapshot()
            .tasks
            .into_iter()
            .map(|task| task.title)
            .collect();
        assert_eq!(titles, vec!["Newest", "Middle", "Old"]);
    }

    #[test]
    fn add_task_requires_a_selected_date() {
        let mut board = board();
        board.select_date(None);
        assert_eq!(board.add_task("Orphan", 1).unwrap(), None);
        assert!(board.store().is_empty());
    }

    #[test]
    fn completion_fires_after_animation_and_celebrates() {
        let mut board = board();
        let id = board.add_task("Finish slides", 1).unwrap().unwrap().id;
        let start = Instant::now();

        assert!(board.pointer_down(&id, 100.0));
        board.pointer_move(&id, 170.0);
        assert_eq!(board.pointer_up(&id, start), Some(SwipeAction::Complete));
        assert_eq!(board.next_wakeup(), Some(start + COMPLETE_ANIMATION));

        assert!(board.tick(start + Duration::from_millis(599)).is_empty());
        assert_eq!(board.store().get(&id).unwrap().status, TaskStatus::Active);

        let events = board.tick(start + COMPLETE_ANIMATION);
        assert_eq!(
            events,
            vec![
                BoardEvent::Completed {
                    id: id.clone(),
                    title: "Finish slides".into()
                },
                BoardEvent::AnimationComplete { id: id.clone() },
            ]
        );
        assert_eq!(board.store().get(&id).unwrap().status, TaskStatus::Completed);
        assert_eq!(board.celebration().title(), Some("Finish slides"));
        assert!(board.card(&id).is_none());

        let dismissed = board.tick(start + COMPLETE_ANIMATION + Duration::from_secs(2));
        assert_eq!(dismissed, vec![BoardEvent::CelebrationDismissed]);
        assert_eq!(board.next_wakeup(), None);
    }

    #[test]
    fn simultaneous_finishes_apply_in_deadline_order() {
        let mut board = board();
        let later = board.add_task("Swiped second", 1).unwrap().unwrap().id;
        let first = board.add_task("Swiped first", 2).unwrap().unwrap().id;
        let start = Instant::now();

        board.swipe(&first, SwipeAction::Complete, start);
        board.swipe(&later, SwipeAction::Complete, start + Duration::from_millis(100));

        let events = board.tick(start + Duration::from_secs(1));
        assert_eq!(
            events,
            vec![
                BoardEvent::Completed {
                    id: first.clone(),
                    title: "Swiped first".into()
                },
                BoardEvent::AnimationComplete { id: first },
                BoardEvent::Completed {
                    id: later.clone(),
                    title: "Swiped second".into()
                },
                BoardEvent::AnimationComplete { id: later },
            ]
        );
        assert_eq!(board.celebration().title(), Some("Swiped second"));
    }

    #[test]
    fn draft_cards_cannot_swipe_left() {
        let mut board = board();
        let id = board.add_task("Someday", 1).unwrap().unwrap().id;
        let start = Instant::now();
        board.swipe(&id, SwipeAction::Draft, start);
        board.tick(start + DRAFT_ANIMATION);

        board.set_view(TaskView::Draft);
        assert_eq!(board.swipe(&id, SwipeAction::Draft, start), None);
        assert_eq!(
            board.swipe(&id, SwipeAction::Complete, start),
            Some(SwipeAction::Complete)
        );
    }

    #[test]
    fn completed_cards_ignore_gestures() {
        let mut board = board();
        let id = board.add_task("Done", 1).unwrap().unwrap().id;
        let start = Instant::now();
        board.swipe(&id, SwipeAction::Complete, start);
        board.tick(start + COMPLETE_ANIMATION);

        board.set_view(TaskView::Completed);
        assert!(!board.pointer_down(&id, 0.0));
    }

    #[test]
    fn switching_tabs_mid_animation_drops_the_outcome() {
        let mut board = board();
        let id = board.add_task("Flaky", 1).unwrap().unwrap().id;
        let start = Instant::now();
        board.swipe(&id, SwipeAction::Complete, start);

        board.set_view(TaskView::Draft);
        assert!(board.tick(start + COMPLETE_ANIMATION).is_empty());
        assert_eq!(board.store().get(&id).unwrap().status, TaskStatus::Active);
    }

    #[test]
    fn delete_bypasses_pending_animation() {
        let mut board = board();
        let id = board.add_task("Gone", 1).unwrap().unwrap().id;
        let start = Instant::now();
        board.swipe(&id, SwipeAction::Complete, start);

        assert!(board.delete(&id).unwrap().deleted);
        assert!(board.tick(start + COMPLETE_ANIMATION).is_empty());
        assert!(board.store().is_empty());
        assert!(!board.celebration().is_visible());
    }

    #[test]
    fn picker_updates_selected_date() {
        let mut board = board();
        board.open_picker(day(19));
        board.picker_mut().unwrap().next_month();
        let grid = board.picker().unwrap().grid().unwrap();

        // Trailing cells of the grid belong to December and are ignored.
        assert_eq!(board.pick(grid[41]), None);
        assert!(board.picker().is_some());

        let first_in_month = grid.iter().copied().find(|cell| cell.in_month).unwrap();
        assert_eq!(
            board.pick(first_in_month),
            NaiveDate::from_ymd_opt(2026, 11, 1)
        );
        assert!(board.picker().is_none());
        assert_eq!(board.selected_date(), NaiveDate::from_ymd_opt(2026, 11, 1));
    }
}
