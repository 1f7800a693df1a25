//! Timer behaviour of the game driver, on tokio's paused clock

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::sleep;

use ecosort::core::{Catalog, Game, GameEvent, MemoryStore, StatsStore};
use ecosort::runtime::{DriverHandle, DriverOptions, GameDriver};
use ecosort::types::{Category, GameMode, PlayerAction, PowerUpKind, SessionPhase};

fn game() -> Game<MemoryStore> {
    Game::new(
        Arc::new(Catalog::standard().unwrap()),
        MemoryStore::new(),
        4242,
    )
}

fn drained(rx: &mut broadcast::Receiver<GameEvent>) -> Vec<GameEvent> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        out.push(event);
    }
    out
}

async fn time_left(handle: &DriverHandle) -> Option<u32> {
    handle.snapshot().await.unwrap().time_remaining
}

#[tokio::test(start_paused = true)]
async fn test_time_freeze_expires_after_five_seconds() {
    let mut g = game();
    g.grant_power_up(PowerUpKind::TimeFreeze);
    let (handle, _task) = GameDriver::spawn(g, DriverOptions::default());
    let mut events = handle.subscribe();

    handle.start(GameMode::TimeTrial).await.unwrap();
    sleep(Duration::from_millis(500)).await;
    handle
        .send(PlayerAction::Activate(PowerUpKind::TimeFreeze))
        .await
        .unwrap();

    // Ticks at 1s..5s land inside the freeze.
    sleep(Duration::from_millis(4_700)).await;
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.time_remaining, Some(60));
    assert!(snap.effect_active(PowerUpKind::TimeFreeze));

    // Expiry at 5.5s, then ticks at 6s and 7s count down.
    sleep(Duration::from_millis(2_000)).await;
    let snap = handle.snapshot().await.unwrap();
    assert!(!snap.effect_active(PowerUpKind::TimeFreeze));
    assert_eq!(snap.time_remaining, Some(58));

    let expired = drained(&mut events)
        .iter()
        .filter(|e| matches!(e, GameEvent::PowerUpExpired { kind: PowerUpKind::TimeFreeze }))
        .count();
    assert_eq!(expired, 1);
}

#[tokio::test(start_paused = true)]
async fn test_pause_stops_the_clock() {
    let (handle, _task) = GameDriver::spawn(game(), DriverOptions::default());
    handle.start(GameMode::TimeTrial).await.unwrap();

    sleep(Duration::from_millis(2_500)).await;
    assert_eq!(time_left(&handle).await, Some(58));

    handle.send(PlayerAction::TogglePause).await.unwrap();
    sleep(Duration::from_secs(5)).await;
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.phase, SessionPhase::Paused);
    assert_eq!(snap.time_remaining, Some(58));

    handle.send(PlayerAction::TogglePause).await.unwrap();
    sleep(Duration::from_millis(1_500)).await;
    assert_eq!(time_left(&handle).await, Some(57));
}

#[tokio::test(start_paused = true)]
async fn test_end_cancels_timers_and_persists() {
    let (handle, task) = GameDriver::spawn(game(), DriverOptions::default());
    handle.start(GameMode::Blitz).await.unwrap();
    sleep(Duration::from_millis(1_500)).await;

    handle.send(PlayerAction::End).await.unwrap();
    let at_end = time_left(&handle).await;
    assert_eq!(at_end, Some(29));

    sleep(Duration::from_secs(10)).await;
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.phase, SessionPhase::Ended);
    assert_eq!(snap.time_remaining, at_end);

    let recent = handle.recent_sessions(5).await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].mode, GameMode::Blitz);

    handle.shutdown().await.unwrap();
    let game = task.await.unwrap();
    assert_eq!(game.store().load_stats().games_played, 1);
}

#[tokio::test(start_paused = true)]
async fn test_clock_runs_out_in_blitz() {
    let (handle, _task) = GameDriver::spawn(game(), DriverOptions::default());
    let mut events = handle.subscribe();
    handle.start(GameMode::Blitz).await.unwrap();

    sleep(Duration::from_millis(30_500)).await;
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.phase, SessionPhase::Ended);
    assert_eq!(snap.time_remaining, Some(0));

    let game_overs = drained(&mut events)
        .iter()
        .filter(|e| matches!(e, GameEvent::GameOver(_)))
        .count();
    assert_eq!(game_overs, 1);
}

#[tokio::test(start_paused = true)]
async fn test_hint_follows_wrong_sort() {
    let (handle, _task) = GameDriver::spawn(game(), DriverOptions::default());
    let mut events = handle.subscribe();
    handle.start(GameMode::Zen).await.unwrap();

    handle.send(PlayerAction::SelectFirst).await.unwrap();
    let snap = handle.snapshot().await.unwrap();
    let item = snap.items[0];
    let wrong = Category::ALL
        .into_iter()
        .find(|c| *c != item.category())
        .unwrap();
    handle.send(PlayerAction::Sort(wrong)).await.unwrap();

    sleep(Duration::from_millis(2_800)).await;
    let _ = handle.snapshot().await.unwrap();
    assert!(!drained(&mut events)
        .iter()
        .any(|e| matches!(e, GameEvent::HintOffered { .. })));

    sleep(Duration::from_millis(400)).await;
    let _ = handle.snapshot().await.unwrap();
    let hints: Vec<_> = drained(&mut events)
        .into_iter()
        .filter_map(|e| match e {
            GameEvent::HintOffered {
                item,
                correct_category,
            } => Some((item.instance_id, correct_category)),
            _ => None,
        })
        .collect();
    assert_eq!(hints, vec![(item.instance_id, item.category())]);
}

#[tokio::test(start_paused = true)]
async fn test_restart_resets_clock() {
    let (handle, _task) = GameDriver::spawn(game(), DriverOptions::default());
    handle.start(GameMode::TimeTrial).await.unwrap();

    sleep(Duration::from_millis(10_500)).await;
    assert_eq!(time_left(&handle).await, Some(50));

    handle.send(PlayerAction::Restart).await.unwrap();
    assert_eq!(time_left(&handle).await, Some(60));

    sleep(Duration::from_millis(1_500)).await;
    assert_eq!(time_left(&handle).await, Some(59));
}
