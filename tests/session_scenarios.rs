//! Integration tests for the session state machine

use std::collections::HashSet;
use std::sync::Arc;

use ecosort::core::scoring::{accuracy, display_points};
use ecosort::core::{Catalog, GameEvent, Session, Stats};
use ecosort::types::{Category, GameMode, PowerUpKind, SessionPhase, ITEMS_ON_SCREEN};

fn started(mode: GameMode, seed: u32) -> Session {
    let mut s = Session::new(Arc::new(Catalog::standard().unwrap()), seed);
    s.start(mode, Stats::default());
    s
}

fn correct_bin(s: &Session) -> Category {
    s.selected_item().unwrap().category()
}

fn wrong_bin(s: &Session) -> Category {
    let right = correct_bin(s);
    Category::ALL.into_iter().find(|c| *c != right).unwrap()
}

/// Select slot 0 and sort it, correctly or not. Returns the points awarded.
fn sort_first(s: &mut Session, correct: bool) -> u32 {
    assert!(s.select_first());
    let bin = if correct { correct_bin(s) } else { wrong_bin(s) };
    s.sort_selected(bin).unwrap().points
}

#[test]
fn test_start_time_trial() {
    let mut s = started(GameMode::TimeTrial, 12345);
    assert_eq!(s.time_remaining(), Some(60));
    assert_eq!(s.level(), 1);
    assert_eq!(s.score(), 0);
    assert_eq!(s.phase(), SessionPhase::Active);

    let ids: HashSet<_> = s.visible_items().iter().map(|i| i.instance_id).collect();
    assert_eq!(ids.len(), ITEMS_ON_SCREEN);
    assert!(matches!(
        s.drain_events().first(),
        Some(GameEvent::SessionStart {
            mode: GameMode::TimeTrial,
            time_remaining: Some(60)
        })
    ));
}

#[test]
fn test_correct_sort_awards_display_points() {
    let mut s = started(GameMode::Zen, 7);
    s.drain_events();

    assert!(s.select_first());
    let item = *s.selected_item().unwrap();
    let outcome = s.sort_selected(item.category()).unwrap();

    assert!(outcome.correct);
    assert_eq!(outcome.points, item.display_points);
    assert_eq!(s.score(), item.display_points);
    assert_eq!(s.combo(), 1);
    assert_eq!(s.max_combo(), 1);
    assert_ne!(s.visible_items()[0].instance_id, item.instance_id);
    assert!(s.selected_item().is_none());

    let events = s.drain_events();
    assert!(events.contains(&GameEvent::CorrectSort {
        points: item.display_points,
        item
    }));
}

#[test]
fn test_fifth_correct_sort_gets_combo_bonus() {
    let mut s = started(GameMode::Zen, 99);
    for _ in 0..4 {
        sort_first(&mut s, true);
    }
    assert_eq!(s.combo(), 4);

    s.select_first();
    let dp = s.selected_item().unwrap().display_points;
    let before = s.score();
    let points = s.sort_selected(correct_bin(&s)).unwrap().points;

    assert_eq!(points, (dp as f64 * 1.5).floor() as u32);
    assert_eq!(s.score() - before, points);
    assert!(s
        .drain_events()
        .contains(&GameEvent::ComboMilestone { combo: 5 }));
}

#[test]
fn test_survival_ends_when_lives_run_out() {
    let mut s = started(GameMode::Survival, 3);
    sort_first(&mut s, false);
    sort_first(&mut s, false);
    assert_eq!(s.lives(), Some(1));
    assert!(s.is_active());
    s.drain_events();

    let points = sort_first(&mut s, false);
    assert_eq!(points, 0);
    assert_eq!(s.lives(), Some(0));
    assert_eq!(s.phase(), SessionPhase::Ended);
    // The slot is still refilled.
    assert_eq!(s.visible_items().len(), ITEMS_ON_SCREEN);

    let events = s.drain_events();
    let names: Vec<_> = events.iter().map(|e| e.name()).collect();
    assert_eq!(names.first(), Some(&"wrong-sort"));
    assert_eq!(names.last(), Some(&"game-over"));
}

#[test]
fn test_time_freeze_holds_clock() {
    let mut s = started(GameMode::TimeTrial, 1);
    s.tick();
    assert_eq!(s.time_remaining(), Some(59));

    s.inventory_mut().grant(PowerUpKind::TimeFreeze);
    let activation = s.activate_power_up(PowerUpKind::TimeFreeze).unwrap();
    assert_eq!(activation.duration_ms, 5_000);

    for _ in 0..5 {
        s.tick();
        assert_eq!(s.time_remaining(), Some(59));
    }

    assert!(s.expire_effect(PowerUpKind::TimeFreeze, activation.token));
    s.tick();
    assert_eq!(s.time_remaining(), Some(58));
}

#[test]
fn test_tenth_sort_levels_up_once() {
    let mut s = started(GameMode::Zen, 2024);
    let mut level_ups = 0;
    for n in 1..=10 {
        sort_first(&mut s, true);
        let events = s.drain_events();
        let ups = events
            .iter()
            .filter(|e| matches!(e, GameEvent::LevelUp { .. }))
            .count();
        if n < 10 {
            assert_eq!(ups, 0, "no level-up before the tenth sort");
        }
        level_ups += ups;
    }
    assert_eq!(level_ups, 1);
    assert_eq!(s.level(), 2);
    assert_eq!(s.inventory().total(), 1);
}

#[test]
fn test_incorrect_tenth_sort_does_not_level_up() {
    let mut s = started(GameMode::Zen, 5);
    for _ in 0..9 {
        sort_first(&mut s, true);
    }
    sort_first(&mut s, false);
    assert_eq!(s.stats().items_sorted, 10);
    assert_eq!(s.level(), 1);
}

#[test]
fn test_points_monotonic_in_level() {
    for base in [1u32, 10, 12, 15, 25, 100, 500] {
        let mut prev = 0;
        for level in 1..=50 {
            let dp = display_points(base, level);
            assert!(dp >= prev, "base {} level {}", base, level);
            prev = dp;
        }
    }
}

#[test]
fn test_combo_reset_and_max_combo_never_drops() {
    let mut s = started(GameMode::Zen, 77);
    // Fixed pattern of right/wrong sorts.
    let pattern = [true, true, false, true, true, true, false, false, true];
    let mut max_seen = 0;
    for correct in pattern {
        sort_first(&mut s, correct);
        if !correct {
            assert_eq!(s.combo(), 0);
        }
        assert!(s.max_combo() >= max_seen);
        max_seen = s.max_combo();
    }
    assert_eq!(s.max_combo(), 3);
}

#[test]
fn test_every_sort_replaces_its_slot() {
    let mut s = started(GameMode::Zen, 404);
    for i in 0..30 {
        let slot = i % ITEMS_ON_SCREEN;
        assert!(s.select_slot(slot));
        let before = s.visible_items()[slot].instance_id;
        let bin = if i % 4 == 0 { wrong_bin(&s) } else { correct_bin(&s) };
        s.sort_selected(bin).unwrap();
        assert_eq!(s.visible_items().len(), ITEMS_ON_SCREEN);
        assert_ne!(s.visible_items()[slot].instance_id, before);
    }
}

#[test]
fn test_accuracy_bounds() {
    assert_eq!(accuracy(0, 0), 0.0);
    for c in 0..20 {
        for i in 0..20 {
            let a = accuracy(c, i);
            assert!((0.0..=1.0).contains(&a));
        }
    }
    assert_eq!(accuracy(3, 1), 0.75);
}

#[test]
fn test_empty_inventory_activation_changes_nothing() {
    let mut s = started(GameMode::TimeTrial, 8);
    s.drain_events();
    for kind in PowerUpKind::ALL {
        let items_before = s.visible_items().to_vec();
        assert!(s.activate_power_up(kind).is_none());
        assert!(s.active_effects().is_empty());
        assert_eq!(s.inventory().total(), 0);
        assert_eq!(s.visible_items(), &items_before[..]);
    }
    assert!(s.events().is_empty());
}

#[test]
fn test_seeded_sessions_replay() {
    let a = started(GameMode::Zen, 31337);
    let b = started(GameMode::Zen, 31337);
    let names_a: Vec<_> = a.visible_items().iter().map(|i| i.def.id).collect();
    let names_b: Vec<_> = b.visible_items().iter().map(|i| i.def.id).collect();
    assert_eq!(names_a, names_b);
}
