//! Short-lived toast messages derived from game events.
//!
//! Pure: callers pass `now`, so tests never sleep.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::core::GameEvent;

/// Seconds-remaining values that get a countdown warning.
pub const COUNTDOWN_WARNINGS: [u32; 5] = [10, 5, 3, 2, 1];

const DEFAULT_TTL: Duration = Duration::from_millis(2_500);
const DEFAULT_CAPACITY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Good,
    Bad,
    Warn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub tone: Tone,
    pub expires_at: Instant,
}

#[derive(Debug, Clone)]
pub struct MessageLog {
    entries: VecDeque<Message>,
    capacity: usize,
    ttl: Duration,
    /// Last countdown value announced; the clock repeats values while frozen.
    last_countdown: Option<u32>,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }
}

impl MessageLog {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            ttl,
            last_countdown: None,
        }
    }

    pub fn push(&mut self, text: impl Into<String>, tone: Tone, now: Instant) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(Message {
            text: text.into(),
            tone,
            expires_at: now + self.ttl,
        });
    }

    /// Turn an event into zero or one messages.
    pub fn push_event(&mut self, event: &GameEvent, now: Instant) {
        let (text, tone) = match event {
            GameEvent::SessionStart { mode, .. } => {
                self.entries.clear();
                self.last_countdown = None;
                (format!("{} - go!", mode.display_name()), Tone::Info)
            }
            GameEvent::CorrectSort { points, item } => {
                (format!("+{} {}", points, item.name()), Tone::Good)
            }
            GameEvent::WrongSort {
                item,
                correct_category,
            } => (
                format!("{} goes in {}", item.name(), correct_category.bin_name()),
                Tone::Bad,
            ),
            GameEvent::LevelUp { new_level } => (format!("Level {}!", new_level), Tone::Good),
            GameEvent::ComboMilestone { combo } => (format!("{}x combo!", combo), Tone::Good),
            GameEvent::PowerUpAwarded { kind } => {
                (format!("Earned {}", kind.display_name()), Tone::Info)
            }
            GameEvent::PowerUpActivated { kind } => {
                (format!("{} activated", kind.display_name()), Tone::Info)
            }
            GameEvent::PowerUpExpired { kind } => {
                (format!("{} wore off", kind.display_name()), Tone::Info)
            }
            GameEvent::HintOffered {
                item,
                correct_category,
            } => (
                format!("Hint: {} -> [{}] {}", item.name(), correct_category.shortcut(), correct_category.bin_name()),
                Tone::Info,
            ),
            GameEvent::TimeRemaining { seconds } => {
                if !COUNTDOWN_WARNINGS.contains(seconds) || self.last_countdown == Some(*seconds) {
                    return;
                }
                self.last_countdown = Some(*seconds);
                let unit = if *seconds == 1 { "second" } else { "seconds" };
                (format!("{} {} left!", seconds, unit), Tone::Warn)
            }
            GameEvent::NewBestScore { score } => (format!("New best score: {}!", score), Tone::Good),
            GameEvent::GameOver(_) => ("Game over".to_string(), Tone::Info),
            GameEvent::ItemSelected { .. } | GameEvent::Paused | GameEvent::Resumed => return,
        };
        self.push(text, tone, now);
    }

    /// Drop expired messages.
    pub fn prune(&mut self, now: Instant) {
        self.entries.retain(|m| m.expires_at > now);
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GameMode, PowerUpKind};

    fn texts(log: &MessageLog) -> Vec<&str> {
        log.iter().map(|m| m.text.as_str()).collect()
    }

    #[test]
    fn test_countdown_warnings() {
        let now = Instant::now();
        let mut log = MessageLog::new(10, DEFAULT_TTL);
        for s in (0..=12).rev() {
            log.push_event(&GameEvent::TimeRemaining { seconds: s }, now);
        }
        assert_eq!(
            texts(&log),
            vec![
                "10 seconds left!",
                "5 seconds left!",
                "3 seconds left!",
                "2 seconds left!",
                "1 second left!"
            ]
        );
        assert!(log.iter().all(|m| m.tone == Tone::Warn));
    }

    #[test]
    fn test_frozen_clock_warns_once() {
        let now = Instant::now();
        let mut log = MessageLog::default();
        for _ in 0..4 {
            log.push_event(&GameEvent::TimeRemaining { seconds: 5 }, now);
        }
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_session_start_resets() {
        let now = Instant::now();
        let mut log = MessageLog::default();
        log.push_event(&GameEvent::TimeRemaining { seconds: 3 }, now);
        log.push_event(
            &GameEvent::SessionStart {
                mode: GameMode::Blitz,
                time_remaining: Some(30),
            },
            now,
        );
        assert_eq!(texts(&log), vec!["Blitz - go!"]);
        log.push_event(&GameEvent::TimeRemaining { seconds: 3 }, now);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_expiry_and_capacity() {
        let now = Instant::now();
        let mut log = MessageLog::new(2, Duration::from_secs(1));
        log.push_event(&GameEvent::LevelUp { new_level: 2 }, now);
        log.push_event(
            &GameEvent::PowerUpAwarded {
                kind: PowerUpKind::SkipItem,
            },
            now,
        );
        log.push_event(&GameEvent::ComboMilestone { combo: 5 }, now);
        assert_eq!(texts(&log), vec!["Earned Skip Item", "5x combo!"]);

        log.prune(now + Duration::from_millis(999));
        assert_eq!(log.len(), 2);
        log.prune(now + Duration::from_secs(1));
        assert!(log.is_empty());
    }

    #[test]
    fn test_quiet_events() {
        let now = Instant::now();
        let mut log = MessageLog::default();
        log.push_event(&GameEvent::Paused, now);
        log.push_event(&GameEvent::Resumed, now);
        assert!(log.is_empty());
    }
}
