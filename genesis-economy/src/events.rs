//! Fire-and-forget notifications emitted while a simulation runs.
use serde::{Deserialize, Serialize};

/// Something a game master would want surfaced while the economy ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NotableEvent {
    /// Lump-sum deposit landed on `day`.
    Impulse { day: u32, amount: f64 },
    /// A trend window opened on `day`.
    TrendStarted { day: u32, intensity: f64 },
}

impl NotableEvent {
    #[must_use]
    pub const fn day(&self) -> u32 {
        match *self {
            Self::Impulse { day, .. } | Self::TrendStarted { day, .. } => day,
        }
    }
}

/// Observer for notable events. Listeners cannot influence the simulation.
pub trait EventListener {
    fn on_event(&mut self, event: &NotableEvent);
}

/// No-op listener for callers that do not care about notifications.
impl EventListener for () {
    fn on_event(&mut self, _event: &NotableEvent) {}
}

/// Collects every event, mostly useful for tests and reports.
impl EventListener for Vec<NotableEvent> {
    fn on_event(&mut self, event: &NotableEvent) {
        self.push(*event);
    }
}

impl<L: EventListener + ?Sized> EventListener for &mut L {
    fn on_event(&mut self, event: &NotableEvent) {
        (**self).on_event(event);
    }
}
