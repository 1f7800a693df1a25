//! Key mapping from terminal events to player actions.

use crate::types::{Category, PlayerAction, PowerUpKind, ITEMS_ON_SCREEN};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map keyboard input to player actions.
pub fn handle_key_event(key: KeyEvent) -> Option<PlayerAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }

    let KeyCode::Char(c) = key.code else {
        return None;
    };

    // Slots
    if let Some(d) = c.to_digit(10) {
        let slot = d as usize;
        return (1..=ITEMS_ON_SCREEN)
            .contains(&slot)
            .then_some(PlayerAction::SelectSlot(slot - 1));
    }
    if c == ' ' {
        return Some(PlayerAction::SelectFirst);
    }

    // Bins
    if let Some(bin) = Category::ALL
        .into_iter()
        .find(|cat| cat.shortcut().eq_ignore_ascii_case(&c))
    {
        return Some(PlayerAction::Sort(bin));
    }

    // Power-ups
    if let Some(kind) = PowerUpKind::ALL
        .into_iter()
        .find(|k| k.shortcut().eq_ignore_ascii_case(&c))
    {
        return Some(PlayerAction::Activate(kind));
    }

    match c.to_ascii_lowercase() {
        'p' => Some(PlayerAction::TogglePause),
        'r' => Some(PlayerAction::Restart),
        'x' => Some(PlayerAction::End),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
