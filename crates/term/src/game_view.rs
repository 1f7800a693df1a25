//! GameView: maps a `SessionSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{GameSummary, SessionSnapshot, SpawnedItem};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::messages::{MessageLog, Tone};
use crate::types::{Category, PowerUpKind, Rarity, SessionPhase};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

const PANEL_W: u16 = 64;
const PANEL_H: u16 = 22;

const TEXT: Rgb = Rgb::new(220, 220, 220);
const MUTED: Rgb = Rgb::new(120, 130, 125);
const ACCENT: Rgb = Rgb::new(120, 200, 120);
const GOOD: Rgb = Rgb::new(110, 220, 110);
const BAD: Rgb = Rgb::new(235, 95, 85);
const WARN: Rgb = Rgb::new(240, 190, 70);
const SELECTED_BG: Rgb = Rgb::new(40, 70, 45);

pub fn category_color(category: Category) -> Rgb {
    match category {
        Category::Organic => Rgb::new(140, 200, 90),
        Category::Recyclable => Rgb::new(90, 160, 235),
        Category::Hazardous => Rgb::new(235, 110, 80),
    }
}

pub fn rarity_color(rarity: Rarity) -> Rgb {
    match rarity {
        Rarity::Common => Rgb::new(200, 200, 200),
        Rarity::Uncommon => Rgb::new(110, 210, 120),
        Rarity::Rare => Rgb::new(90, 150, 240),
        Rarity::Epic => Rgb::new(190, 110, 235),
        Rarity::Legendary => Rgb::new(245, 185, 60),
    }
}

fn tone_color(tone: Tone) -> Rgb {
    match tone {
        Tone::Info => TEXT,
        Tone::Good => GOOD,
        Tone::Bad => BAD,
        Tone::Warn => WARN,
    }
}

/// `m:ss`.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Renders the play screen.
#[derive(Debug, Default, Clone, Copy)]
pub struct GameView;

impl GameView {
    pub fn new() -> Self {
        Self
    }

    /// Render one frame into an existing framebuffer.
    ///
    /// `summary` is drawn as an overlay once the session has ended.
    pub fn render_into(
        &self,
        snap: &SessionSnapshot,
        messages: &MessageLog,
        summary: Option<&GameSummary>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let base = CellStyle::default();
        let x0 = viewport.width.saturating_sub(PANEL_W) / 2;
        let y0 = viewport.height.saturating_sub(PANEL_H) / 2;
        let inner = x0 + 2;

        fb.draw_box(x0, y0, PANEL_W, PANEL_H, base.with_fg(MUTED));
        fb.put_str(x0 + 2, y0, " EcoSort ", base.with_fg(ACCENT).bold());

        if snap.phase == SessionPhase::Idle {
            fb.put_str(inner, y0 + 2, "Press R to start", base.bold());
            self.draw_help(fb, inner, y0 + PANEL_H - 2);
            return;
        }

        self.draw_status(fb, snap, inner, y0 + 1);
        fb.hline(x0 + 1, y0 + 3, PANEL_W - 2, base.with_fg(MUTED));

        for (slot, item) in snap.items.iter().enumerate() {
            self.draw_item(fb, snap, item, slot, inner, y0 + 4 + slot as u16);
        }

        fb.hline(x0 + 1, y0 + 8, PANEL_W - 2, base.with_fg(MUTED));
        self.draw_bins(fb, inner, y0 + 9);
        self.draw_power_ups(fb, snap, inner, y0 + 11);

        fb.hline(x0 + 1, y0 + 14, PANEL_W - 2, base.with_fg(MUTED));
        for (row, msg) in messages.iter().enumerate().take(5) {
            fb.put_str(inner, y0 + 15 + row as u16, &msg.text, base.with_fg(tone_color(msg.tone)));
        }

        self.draw_help(fb, inner, y0 + PANEL_H - 2);

        match snap.phase {
            SessionPhase::Paused => self.draw_paused(fb, x0, y0),
            SessionPhase::Ended => {
                if let Some(summary) = summary {
                    self.draw_summary(fb, summary, x0, y0);
                }
            }
            _ => {}
        }
    }

    fn draw_status(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, x: u16, y: u16) {
        let base = CellStyle::default();
        let mut cx = fb.put_str(x, y, snap.mode.display_name(), base.with_fg(ACCENT).bold());
        cx = fb.put_str(cx + 3, y, &format!("Best {}", snap.best_score), base.with_fg(MUTED));
        if let Some(t) = snap.time_remaining {
            let style = if t <= 10 {
                base.with_fg(WARN).bold()
            } else {
                base
            };
            let frozen = if snap.effect_active(PowerUpKind::TimeFreeze) {
                " (frozen)"
            } else {
                ""
            };
            fb.put_str(cx + 3, y, &format!("Time {}{}", format_clock(t), frozen), style);
        }

        let y = y + 1;
        let mut cx = fb.put_str(x, y, &format!("Score {}", snap.score), base.bold());
        cx = fb.put_str(cx + 3, y, &format!("Level {}", snap.level), base);
        let combo_style = if snap.combo >= 5 {
            base.with_fg(GOOD).bold()
        } else {
            base
        };
        cx = fb.put_str(cx + 3, y, &format!("Combo x{}", snap.combo), combo_style);
        if let Some(lives) = snap.lives {
            let hearts: String = std::iter::repeat('♥').take(lives as usize).collect();
            fb.put_str(cx + 3, y, &format!("Lives {}", hearts), base.with_fg(BAD));
        }
    }

    fn draw_item(
        &self,
        fb: &mut FrameBuffer,
        snap: &SessionSnapshot,
        item: &SpawnedItem,
        slot: usize,
        x: u16,
        y: u16,
    ) {
        let selected = snap.is_selected(item);
        let mut style = CellStyle::default().with_fg(rarity_color(item.rarity()));
        if selected {
            style = style.with_bg(SELECTED_BG).bold();
            fb.put_str(x.saturating_sub(1), y, ">", style);
        }

        // Rarity shows as colour only.
        let label = format!("[{}] {:<19} {:>4} pts", slot + 1, item.name(), item.display_points);
        let cx = fb.put_str(x, y, &label, style);

        if snap.hints_visible {
            let cat = item.category();
            fb.put_str(
                cx + 2,
                y,
                &format!("-> {} {}", cat.shortcut(), cat.bin_name()),
                CellStyle::default().with_fg(category_color(cat)),
            );
        }
    }

    fn draw_bins(&self, fb: &mut FrameBuffer, x: u16, y: u16) {
        let mut cx = x;
        for cat in Category::ALL {
            let style = CellStyle::default().with_fg(category_color(cat)).bold();
            cx = fb.put_str(cx, y, &format!("[{}] {}", cat.shortcut(), cat.bin_name()), style) + 3;
        }
    }

    fn draw_power_ups(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, x: u16, y: u16) {
        let base = CellStyle::default();
        let mut cx = x;
        let mut row = y;
        for (i, (kind, count)) in snap.inventory.iter().enumerate() {
            if i == 3 {
                cx = x;
                row += 1;
            }
            let active = snap.effect_active(kind);
            let style = if active {
                base.with_fg(GOOD).bold()
            } else if count == 0 {
                base.with_fg(MUTED).dim()
            } else {
                base
            };
            let marker = if active { "*" } else { "" };
            let text = format!("[{}] {} x{}{}", kind.shortcut(), kind.display_name(), count, marker);
            cx = fb.put_str(cx, row, &text, style) + 2;
        }
    }

    fn draw_help(&self, fb: &mut FrameBuffer, x: u16, y: u16) {
        fb.put_str(
            x,
            y,
            "1-3/Space select  P pause  R restart  X end  Esc quit",
            CellStyle::default().with_fg(MUTED),
        );
    }

    fn draw_paused(&self, fb: &mut FrameBuffer, x0: u16, y0: u16) {
        let w = 28;
        let x = x0 + (PANEL_W - w) / 2;
        let y = y0 + 6;
        let style = CellStyle::default().with_fg(WARN);
        fb.fill_rect(x, y, w, 3, CellStyle::default().into_cell(' '));
        fb.draw_box(x, y, w, 3, style);
        fb.put_str(x + 3, y + 1, "PAUSED - press P", style.bold());
    }

    fn draw_summary(&self, fb: &mut FrameBuffer, summary: &GameSummary, x0: u16, y0: u16) {
        let w = 40;
        let h = 11;
        let x = x0 + (PANEL_W - w) / 2;
        let y = y0 + 4;
        let base = CellStyle::default();
        fb.fill_rect(x, y, w, h, base.into_cell(' '));
        fb.draw_box(x, y, w, h, base.with_fg(ACCENT));

        let tx = x + 3;
        fb.put_str(tx, y + 1, "GAME OVER", base.with_fg(ACCENT).bold());
        fb.put_str(tx, y + 2, &format!("Score      {}", summary.score), base.bold());
        if summary.new_best {
            fb.put_str(tx + 20, y + 2, "New best!", base.with_fg(GOOD).bold());
        }
        fb.put_str(tx, y + 3, &format!("Level      {}", summary.level), base);
        fb.put_str(tx, y + 4, &format!("Max combo  {}", summary.max_combo), base);
        fb.put_str(
            tx,
            y + 5,
            &format!("Accuracy   {:.0}%", summary.accuracy * 100.0),
            base,
        );
        fb.put_str(
            tx,
            y + 6,
            &format!("This game  {:.0}%", summary.session_accuracy * 100.0),
            base.with_fg(MUTED),
        );
        let impact = summary.stats.impact();
        fb.put_str(
            tx,
            y + 7,
            &format!("Lifetime: {:.1} kg CO2 saved", impact.co2_kg),
            base.with_fg(MUTED),
        );
        fb.put_str(tx, y + 9, "R restart   Esc quit", base.with_fg(MUTED));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Catalog, Session, Stats};
    use crate::types::GameMode;
    use std::sync::Arc;
    use std::time::Instant;

    fn session(mode: GameMode) -> Session {
        let mut s = Session::new(Arc::new(Catalog::standard().unwrap()), 21);
        s.start(mode, Stats::default());
        s
    }

    fn render(snap: &SessionSnapshot, summary: Option<&GameSummary>) -> FrameBuffer {
        let mut fb = FrameBuffer::new(1, 1);
        GameView::new().render_into(
            snap,
            &MessageLog::default(),
            summary,
            Viewport::new(80, 24),
            &mut fb,
        );
        fb
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(60), "1:00");
        assert_eq!(format_clock(9), "0:09");
        assert_eq!(format_clock(180), "3:00");
    }

    #[test]
    fn test_renders_status_and_items() {
        let s = session(GameMode::TimeTrial);
        let snap = s.snapshot();
        let fb = render(&snap, None);

        assert_eq!((fb.width(), fb.height()), (80, 24));
        assert!(fb.contains_text("Time Trial"));
        assert!(fb.contains_text("Time 1:00"));
        assert!(fb.contains_text("Score 0"));
        for item in &snap.items {
            assert!(fb.contains_text(item.name()));
        }
        assert!(fb.contains_text("[Q] Organic Waste"));
        assert!(!fb.contains_text("Lives"));
    }

    #[test]
    fn test_survival_shows_lives() {
        let fb = render(&session(GameMode::Survival).snapshot(), None);
        assert!(fb.contains_text("Lives ♥♥♥"));
        let clock_shown = (0..fb.height()).any(|y| {
            fb.row_text(y)
                .split("Time ")
                .skip(1)
                .any(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
        });
        assert!(!clock_shown);
    }

    #[test]
    fn test_hints_reveal_bins() {
        let mut s = session(GameMode::Zen);
        let fb = render(&s.snapshot(), None);
        assert!(!fb.contains_text("-> "));

        s.inventory_mut().grant(PowerUpKind::ShowHints);
        s.activate_power_up(PowerUpKind::ShowHints);
        let snap = s.snapshot();
        let fb = render(&snap, None);
        let first = snap.items[0].category();
        assert!(fb.contains_text(&format!("-> {} {}", first.shortcut(), first.bin_name())));
    }

    #[test]
    fn test_paused_and_game_over_overlays() {
        let mut s = session(GameMode::Blitz);
        s.pause();
        assert!(render(&s.snapshot(), None).contains_text("PAUSED"));

        let summary = s.end().unwrap();
        let fb = render(&s.snapshot(), Some(&summary));
        assert!(fb.contains_text("GAME OVER"));
        assert!(fb.contains_text("Accuracy   0%"));
        assert!(fb.contains_text("This game  0%"));
    }

    #[test]
    fn test_messages_drawn() {
        let s = session(GameMode::Zen);
        let mut log = MessageLog::default();
        log.push_event(&crate::core::GameEvent::LevelUp { new_level: 2 }, Instant::now());
        let mut fb = FrameBuffer::new(1, 1);
        GameView::new().render_into(&s.snapshot(), &log, None, Viewport::new(80, 24), &mut fb);
        assert!(fb.contains_text("Level 2!"));
    }
}
