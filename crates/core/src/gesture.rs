//! Swipe interpretation for a single task card.
//!
//! A card moves `Idle → Dragging → Animating → Idle`. Pointer movement is
//! reduced to one horizontal offset, clamped to [`MAX_DRAG`]. Releasing past
//! [`SWIPE_THRESHOLD`] commits to an action, and the action's intent is only
//! emitted once the exit animation has run, from [`SwipeCard::poll`].

use std::time::{Duration, Instant};

use tracing::debug;

use crate::model::SwipePolicy;
use crate::timer::Timer;

/// Maximum drag distance in pointer units.
pub const MAX_DRAG: f32 = 120.0;
/// Offset that must be exceeded (strictly) to commit a swipe.
pub const SWIPE_THRESHOLD: f32 = 60.0;
pub const COMPLETE_ANIMATION: Duration = Duration::from_millis(600);
pub const DRAFT_ANIMATION: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeAction {
    Complete,
    Draft,
}

impl SwipeAction {
    pub fn animation(&self) -> Duration {
        match self {
            SwipeAction::Complete => COMPLETE_ANIMATION,
            SwipeAction::Draft => DRAFT_ANIMATION,
        }
    }

    fn synthetic_offset(&self) -> f32 {
        match self {
            SwipeAction::Complete => MAX_DRAG,
            SwipeAction::Draft => -MAX_DRAG,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GesturePhase {
    Idle,
    Dragging { start_x: f32, offset: f32 },
    Animating { action: SwipeAction, timer: Timer },
}

/// Background tint shown while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeHint {
    None,
    Complete,
    Draft,
}

/// What a card asks its owner to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardIntent {
    Complete(String),
    Draft(String),
    AnimationComplete(String),
}

#[derive(Debug, Clone)]
pub struct SwipeCard {
    task_id: String,
    policy: SwipePolicy,
    phase: GesturePhase,
}

impl SwipeCard {
    pub fn new(task_id: impl Into<String>, policy: SwipePolicy) -> Self {
        Self {
            task_id: task_id.into(),
            policy,
            phase: GesturePhase::Idle,
        }
    }

    /// The policy can change when a task moves between tabs; a card that is
    /// mid-gesture keeps its current phase.
    pub fn set_policy(&mut self, policy: SwipePolicy) {
        self.policy = policy;
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, GesturePhase::Animating { .. })
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, GesturePhase::Dragging { .. })
    }

    /// Current clamped drag offset; zero unless dragging.
    pub fn offset(&self) -> f32 {
        match self.phase {
            GesturePhase::Dragging { offset, .. } => offset,
            _ => 0.0,
        }
    }

    pub fn hint(&self) -> SwipeHint {
        let offset = self.offset();
        if offset > SWIPE_THRESHOLD && self.policy.complete {
            SwipeHint::Complete
        } else if offset < -SWIPE_THRESHOLD && self.policy.draft {
            SwipeHint::Draft
        } else {
            SwipeHint::None
        }
    }

    /// Running exit animation and its progress in `[0, 1]`.
    pub fn animation(&self, now: Instant) -> Option<(SwipeAction, f32)> {
        match self.phase {
            GesturePhase::Animating { action, timer } => Some((action, timer.progress(now))),
            _ => None,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match self.phase {
            GesturePhase::Animating { timer, .. } => Some(timer.deadline()),
            _ => None,
        }
    }

    /// Starts a drag. Rejected while the exit animation is running and for
    /// cards that accept no swipe at all.
    pub fn pointer_down(&mut self, x: f32) -> bool {
        if self.is_animating() || !self.policy.is_swipeable() {
            return false;
        }
        self.phase = GesturePhase::Dragging {
            start_x: x,
            offset: 0.0,
        };
        true
    }

    pub fn pointer_move(&mut self, x: f32) -> f32 {
        if let GesturePhase::Dragging { start_x, offset } = &mut self.phase {
            *offset = (x - *start_x).clamp(-MAX_DRAG, MAX_DRAG);
            return *offset;
        }
        0.0
    }

    /// Ends a drag. Returns the committed action, if any; its intent is
    /// delivered later by [`SwipeCard::poll`].
    pub fn pointer_up(&mut self, now: Instant) -> Option<SwipeAction> {
        let GesturePhase::Dragging { offset, .. } = self.phase else {
            return None;
        };

        let action = if offset > SWIPE_THRESHOLD && self.policy.complete {
            Some(SwipeAction::Complete)
        } else if offset < -SWIPE_THRESHOLD && self.policy.draft {
            Some(SwipeAction::Draft)
        } else {
            None
        };

        self.phase = match action {
            Some(action) => {
                debug!(task_id = self.task_id.as_str(), ?action, offset, "swipe committed");
                GesturePhase::Animating {
                    action,
                    timer: Timer::start(now, action.animation()),
                }
            }
            None => GesturePhase::Idle,
        };
        action
    }

    /// Abandons a drag without committing (pointer left the window, focus lost).
    pub fn pointer_cancel(&mut self) {
        if self.is_dragging() {
            self.phase = GesturePhase::Idle;
        }
    }

    /// Runs a full drag to the maximum offset in one step, for keyboard input.
    pub fn swipe(&mut self, action: SwipeAction, now: Instant) -> Option<SwipeAction> {
        if !self.pointer_down(0.0) {
            return None;
        }
        self.pointer_move(action.synthetic_offset());
        self.pointer_up(now)
    }

    /// Delivers intents whose animation has finished and returns the card to idle.
    pub fn poll(&mut self, now: Instant) -> Vec<CardIntent> {
        let GesturePhase::Animating { action, timer } = self.phase else {
            return Vec::new();
        };
        if !timer.is_due(now) {
            return Vec::new();
        }

        self.phase = GesturePhase::Idle;
        let id = self.task_id.clone();
        match action {
            SwipeAction::Complete => vec![
                CardIntent::Complete(id.clone()),
                CardIntent::AnimationComplete(id),
            ],
            SwipeAction::Draft => vec![CardIntent::Draft(id)],
        }
    }
}
