//! Countdown timers driven by one tick per time unit
//!
//! A session owns a single [`TimerSlot`]. Starting a countdown replaces
//! whatever was running, so two countdowns can never decrement at once.

/// What a countdown is timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    MainRound,
    BonusIntro,
    Unscramble,
    SentencePuzzle,
}

/// Visual urgency of a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Urgency {
    Calm,
    Warning,
    Critical,
}

/// Remaining time at or below which a countdown is a warning
pub const WARNING_AT: u32 = 5;
/// Remaining time at or below which a countdown is critical
pub const CRITICAL_AT: u32 = 3;

/// A running countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    pub kind: TimerKind,
    pub duration: u32,
    pub remaining: u32,
    /// Identifies this countdown among all started by the slot
    pub generation: u64,
}

impl Countdown {
    pub fn elapsed(&self) -> u32 {
        self.duration - self.remaining
    }

    pub fn urgency(&self) -> Urgency {
        if self.remaining <= CRITICAL_AT {
            Urgency::Critical
        } else if self.remaining <= WARNING_AT {
            Urgency::Warning
        } else {
            Urgency::Calm
        }
    }
}

/// Holds at most one active countdown.
#[derive(Debug, Clone, Default)]
pub struct TimerSlot {
    active: Option<Countdown>,
    generation: u64,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a countdown, cancelling any running one. Durations below one
    /// unit are raised to one.
    pub fn start(&mut self, kind: TimerKind, duration: u32) -> u64 {
        if let Some(previous) = &self.active {
            log::debug!("cancelling {:?} timer to start {:?}", previous.kind, kind);
        }
        let duration = duration.max(1);
        self.generation += 1;
        self.active = Some(Countdown {
            kind,
            duration,
            remaining: duration,
            generation: self.generation,
        });
        self.generation
    }

    /// Stop the running countdown, if any.
    pub fn cancel(&mut self) -> Option<Countdown> {
        self.active.take()
    }

    /// Advance one unit. Returns the countdown that just reached zero; it is
    /// removed from the slot.
    pub fn tick(&mut self) -> Option<Countdown> {
        let countdown = self.active.as_mut()?;
        countdown.remaining = countdown.remaining.saturating_sub(1);
        if countdown.remaining == 0 {
            self.active.take()
        } else {
            None
        }
    }

    /// Expire the running countdown immediately.
    pub fn force_expire(&mut self) -> Option<Countdown> {
        let mut countdown = self.active.take()?;
        countdown.remaining = 0;
        Some(countdown)
    }

    pub fn active(&self) -> Option<&Countdown> {
        self.active.as_ref()
    }

    /// Number of running countdowns: 0 or 1.
    pub fn active_count(&self) -> usize {
        usize::from(self.active.is_some())
    }

    pub fn remaining(&self) -> u32 {
        self.active.as_ref().map_or(0, |c| c.remaining)
    }
}

/// Format seconds as `m:ss`.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_expires_after_duration() {
        let mut slot = TimerSlot::new();
        slot.start(TimerKind::MainRound, 3);

        assert!(slot.tick().is_none());
        assert!(slot.tick().is_none());
        let expired = slot.tick().unwrap();
        assert_eq!(expired.kind, TimerKind::MainRound);
        assert_eq!(slot.active_count(), 0);
        assert!(slot.tick().is_none());
    }

    #[test]
    fn test_starting_replaces_running_timer() {
        let mut slot = TimerSlot::new();
        let first = slot.start(TimerKind::MainRound, 60);
        slot.tick();
        let second = slot.start(TimerKind::BonusIntro, 5);

        assert_ne!(first, second);
        assert_eq!(slot.active_count(), 1);
        assert_eq!(slot.active().unwrap().kind, TimerKind::BonusIntro);
        // One tick decrements exactly once
        slot.tick();
        assert_eq!(slot.remaining(), 4);
    }

    #[test]
    fn test_zero_duration_clamped() {
        let mut slot = TimerSlot::new();
        slot.start(TimerKind::Unscramble, 0);
        assert_eq!(slot.remaining(), 1);
        assert!(slot.tick().is_some());
    }

    #[test]
    fn test_cancel_and_force_expire() {
        let mut slot = TimerSlot::new();
        slot.start(TimerKind::MainRound, 10);
        assert!(slot.cancel().is_some());
        assert!(slot.force_expire().is_none());

        slot.start(TimerKind::SentencePuzzle, 10);
        let expired = slot.force_expire().unwrap();
        assert_eq!(expired.remaining, 0);
        assert_eq!(expired.elapsed(), 10);
        assert_eq!(slot.active_count(), 0);
    }

    #[test]
    fn test_urgency_thresholds() {
        let mut slot = TimerSlot::new();
        slot.start(TimerKind::SentencePuzzle, 10);
        let mut seen = Vec::new();
        while let Some(c) = slot.active() {
            seen.push((c.remaining, c.urgency()));
            slot.tick();
        }
        assert!(seen.contains(&(6, Urgency::Calm)));
        assert!(seen.contains(&(5, Urgency::Warning)));
        assert!(seen.contains(&(4, Urgency::Warning)));
        assert!(seen.contains(&(3, Urgency::Critical)));
        assert!(seen.contains(&(1, Urgency::Critical)));
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(60), "1:00");
        assert_eq!(format_clock(9), "0:09");
        assert_eq!(format_clock(125), "2:05");
    }
}
