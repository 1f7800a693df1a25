//! Power-ups - owned counts and the set of timed effects in play
//!
//! Activation is split in two: the session consumes a unit and applies the
//! effect, then hands back an [`Activation`] so whoever owns the clock can
//! schedule the expiry. Expiries carry the token they were issued with, so a
//! late callback from an earlier activation cannot cut a newer one short.

use arrayvec::ArrayVec;

use crate::rng::SimpleRng;
use crate::types::PowerUpKind;

/// Owned count per power-up kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PowerUpInventory {
    counts: [u32; 5],
}

impl PowerUpInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, kind: PowerUpKind) -> u32 {
        self.counts[kind.index()]
    }

    pub fn grant(&mut self, kind: PowerUpKind) {
        let c = &mut self.counts[kind.index()];
        *c = c.saturating_add(1);
    }

    /// Grant one unit of a uniformly chosen kind.
    pub fn grant_random(&mut self, rng: &mut SimpleRng) -> PowerUpKind {
        let kind = rng
            .pick(&PowerUpKind::ALL)
            .copied()
            .unwrap_or(PowerUpKind::TimeFreeze);
        self.grant(kind);
        kind
    }

    /// Take one unit. Returns false (and changes nothing) at zero.
    pub fn try_consume(&mut self, kind: PowerUpKind) -> bool {
        let c = &mut self.counts[kind.index()];
        if *c == 0 {
            return false;
        }
        *c -= 1;
        true
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PowerUpKind, u32)> + '_ {
        PowerUpKind::ALL.into_iter().map(|k| (k, self.count(k)))
    }
}

/// A timed effect that was just switched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    pub kind: PowerUpKind,
    /// Identifies this activation; pass it back to expire it.
    pub token: u64,
    pub duration_ms: u32,
}

/// Timed effects currently in play.
#[derive(Debug, Clone, Default)]
pub struct ActiveEffects {
    /// Token of the live activation per kind, `None` when inactive.
    live: [Option<u64>; 5],
    next_token: u64,
}

impl ActiveEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, kind: PowerUpKind) -> bool {
        self.live[kind.index()].is_some()
    }

    /// Switch a timed effect on, replacing any live activation of that kind.
    ///
    /// Returns `None` for one-shot kinds.
    pub fn activate(&mut self, kind: PowerUpKind) -> Option<Activation> {
        let duration_ms = kind.duration_ms()?;
        self.next_token = self.next_token.wrapping_add(1);
        let token = self.next_token;
        self.live[kind.index()] = Some(token);
        Some(Activation {
            kind,
            token,
            duration_ms,
        })
    }

    /// Remove an effect if `token` is still its live activation.
    pub fn expire(&mut self, kind: PowerUpKind, token: u64) -> bool {
        let slot = &mut self.live[kind.index()];
        if *slot == Some(token) {
            *slot = None;
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.live = [None; 5];
    }

    pub fn is_empty(&self) -> bool {
        self.live.iter().all(Option::is_none)
    }

    /// Active kinds in declaration order. Does not allocate.
    pub fn kinds(&self) -> ArrayVec<PowerUpKind, 5> {
        PowerUpKind::ALL
            .into_iter()
            .filter(|k| self.contains(*k))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_requires_stock() {
        let mut inv = PowerUpInventory::new();
        assert!(!inv.try_consume(PowerUpKind::SkipItem));
        assert_eq!(inv.count(PowerUpKind::SkipItem), 0);

        inv.grant(PowerUpKind::SkipItem);
        assert!(inv.try_consume(PowerUpKind::SkipItem));
        assert_eq!(inv.count(PowerUpKind::SkipItem), 0);
        assert!(!inv.try_consume(PowerUpKind::SkipItem));
    }

    #[test]
    fn grant_random_adds_exactly_one() {
        let mut inv = PowerUpInventory::new();
        let mut rng = SimpleRng::new(8);
        let kind = inv.grant_random(&mut rng);
        assert_eq!(inv.total(), 1);
        assert_eq!(inv.count(kind), 1);
    }

    #[test]
    fn grant_random_reaches_every_kind() {
        let mut inv = PowerUpInventory::new();
        let mut rng = SimpleRng::new(2024);
        for _ in 0..500 {
            inv.grant_random(&mut rng);
        }
        for (kind, count) in inv.iter() {
            assert!(count > 0, "{:?} never granted", kind);
        }
    }

    #[test]
    fn one_shot_kinds_do_not_activate_effects() {
        let mut fx = ActiveEffects::new();
        assert!(fx.activate(PowerUpKind::SkipItem).is_none());
        assert!(fx.activate(PowerUpKind::ExtraLife).is_none());
        assert!(fx.is_empty());
    }

    #[test]
    fn expiry_matches_token() {
        let mut fx = ActiveEffects::new();
        let a = fx.activate(PowerUpKind::DoublePoints).unwrap();
        assert_eq!(a.duration_ms, 10_000);
        assert!(fx.contains(PowerUpKind::DoublePoints));

        assert!(fx.expire(PowerUpKind::DoublePoints, a.token));
        assert!(!fx.contains(PowerUpKind::DoublePoints));
        assert!(!fx.expire(PowerUpKind::DoublePoints, a.token));
    }

    #[test]
    fn reactivation_outlives_stale_expiry() {
        let mut fx = ActiveEffects::new();
        let first = fx.activate(PowerUpKind::TimeFreeze).unwrap();
        let second = fx.activate(PowerUpKind::TimeFreeze).unwrap();
        assert_ne!(first.token, second.token);

        assert!(!fx.expire(PowerUpKind::TimeFreeze, first.token));
        assert!(fx.contains(PowerUpKind::TimeFreeze));
        assert!(fx.expire(PowerUpKind::TimeFreeze, second.token));
    }

    #[test]
    fn kinds_lists_active_effects() {
        let mut fx = ActiveEffects::new();
        fx.activate(PowerUpKind::ShowHints);
        fx.activate(PowerUpKind::TimeFreeze);
        assert_eq!(
            fx.kinds().as_slice(),
            &[PowerUpKind::TimeFreeze, PowerUpKind::ShowHints]
        );
        fx.clear();
        assert!(fx.kinds().is_empty());
    }
}
