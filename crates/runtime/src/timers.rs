//! Cancellable timers keyed by purpose.
//!
//! Each timer is a spawned task that sends a message back to the driver's
//! inbox when it fires. Scheduling a key that is already live replaces it.
//! Everything still pending is aborted when the set is dropped.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::types::PowerUpKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKey {
    /// The one-second session clock.
    Tick,
    /// Expiry of a timed power-up.
    Effect(PowerUpKind),
    /// Delayed hint after a wrong sort.
    Hint,
}

pub struct TimerSet<T> {
    handles: HashMap<TimerKey, JoinHandle<()>>,
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> TimerSet<T> {
    pub fn new(tx: mpsc::UnboundedSender<T>) -> Self {
        Self {
            handles: HashMap::new(),
            tx,
        }
    }

    /// Send `msg` once after `after`.
    pub fn once(&mut self, key: TimerKey, after: Duration, msg: T) {
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            time::sleep(after).await;
            let _ = tx.send(msg);
        });
        self.replace(key, handle);
    }

    /// Send a clone of `msg` every `period`, first after one full period.
    pub fn every(&mut self, key: TimerKey, period: Duration, msg: T)
    where
        T: Clone,
    {
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(msg.clone()).is_err() {
                    break;
                }
            }
        });
        self.replace(key, handle);
    }

    fn replace(&mut self, key: TimerKey, handle: JoinHandle<()>) {
        if let Some(old) = self.handles.insert(key, handle) {
            old.abort();
        }
    }

    /// Abort a timer. Returns false if nothing was pending under `key`.
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        match self.handles.remove(&key) {
            Some(handle) => {
                let pending = !handle.is_finished();
                handle.abort();
                pending
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }

    /// Whether a timer under `key` has not fired (or is repeating).
    pub fn is_scheduled(&self, key: TimerKey) -> bool {
        self.handles
            .get(&key)
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Number of timers still pending.
    pub fn pending(&self) -> usize {
        self.handles.values().filter(|h| !h.is_finished()).count()
    }
}

impl<T> Drop for TimerSet<T> {
    fn drop(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }
}
