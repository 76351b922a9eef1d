//! Self-dismissing completion overlay.

use std::time::{Duration, Instant};

use rand::Rng;

use crate::timer::Timer;

pub const CELEBRATION_DURATION: Duration = Duration::from_millis(2000);
pub const PARTICLE_COUNT: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Sparkle,
    Star,
    Check,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub id: usize,
    /// Horizontal position in percent of the overlay width.
    pub x: f32,
    /// Vertical position in percent of the overlay height.
    pub y: f32,
    pub delay: Duration,
}

impl Particle {
    pub fn kind(&self) -> ParticleKind {
        match self.id % 3 {
            0 => ParticleKind::Sparkle,
            1 => ParticleKind::Star,
            _ => ParticleKind::Check,
        }
    }

    pub fn is_visible(&self, elapsed: Duration) -> bool {
        elapsed >= self.delay
    }
}

#[derive(Debug, Clone)]
struct Showing {
    title: String,
    particles: Vec<Particle>,
    timer: Timer,
}

#[derive(Debug, Clone, Default)]
pub struct Celebration {
    showing: Option<Showing>,
}

impl Celebration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, title: impl Into<String>, now: Instant) {
        self.show_with_rng(title, now, &mut rand::rng());
    }

    /// Showing again while visible restarts the dismissal timer.
    pub fn show_with_rng<R: Rng>(
        &mut self,
        title: impl Into<String>,
        now: Instant,
        rng: &mut R,
    ) {
        let particles = (0..PARTICLE_COUNT)
            .map(|id| Particle {
                id,
                x: rng.random_range(0.0..100.0),
                y: rng.random_range(0.0..100.0),
                delay: Duration::from_secs_f32(rng.random_range(0.0..0.5)),
            })
            .collect();
        self.showing = Some(Showing {
            title: title.into(),
            particles,
            timer: Timer::start(now, CELEBRATION_DURATION),
        });
    }

    pub fn is_visible(&self) -> bool {
        self.showing.is_some()
    }

    pub fn title(&self) -> Option<&str> {
        self.showing.as_ref().map(|showing| showing.title.as_str())
    }

    pub fn particles(&self) -> &[Particle] {
        self.showing
            .as_ref()
            .map(|showing| showing.particles.as_slice())
            .unwrap_or(&[])
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        self.showing
            .as_ref()
            .map(|showing| showing.timer.elapsed(now))
            .unwrap_or_default()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.showing.as_ref().map(|showing| showing.timer.deadline())
    }

    /// Hides the overlay once its time is up; returns `true` on that transition.
    pub fn poll(&mut self, now: Instant) -> bool {
        let due = self
            .showing
            .as_ref()
            .is_some_and(|showing| showing.timer.is_due(now));
        if due {
            self.showing = None;
        }
        due
    }

    pub fn dismiss(&mut self) {
        self.showing = None;
    }
}
