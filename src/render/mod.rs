//! Drawing the board. Renderers only ever see a [`Snapshot`]; nothing flows
//! back into the game.

mod canvas;
mod layout;
mod tiles;

use macroquad::prelude::*;

use crate::config::Variant;
use crate::game::{EndReason, Phase, Snapshot, WallMode};

pub use canvas::CanvasRenderer;
pub use layout::Board;
pub use tiles::TileRenderer;

pub const HUD_HEIGHT: f32 = 40.0;

pub trait Renderer {
    fn draw(&self, snapshot: &Snapshot);
}

pub fn for_variant(variant: Variant) -> Box<dyn Renderer> {
    match variant {
        Variant::Canvas => Box::new(CanvasRenderer),
        Variant::Tiles => Box::new(TileRenderer),
    }
}

/// Board placement for the current window.
pub fn board_for(snapshot: &Snapshot) -> Board {
    Board::fit(screen_width(), screen_height(), snapshot.grid_size, HUD_HEIGHT)
}

pub fn status_line(snapshot: &Snapshot, show_speed: bool) -> String {
    let walls = match snapshot.wall_mode {
        WallMode::Wrap => "wrap",
        WallMode::Solid => "solid",
    };
    let mut line = format!(
        "Score: {}  Best: {}  Walls: {}",
        snapshot.score, snapshot.high_score, walls
    );
    if show_speed {
        line.push_str(&format!("  Speed: {:.1}", snapshot.speed));
    }
    line
}

/// Title and hint for the overlay, or `None` while playing.
pub fn overlay_text(phase: Phase, end_reason: Option<EndReason>) -> Option<(&'static str, &'static str)> {
    match phase {
        Phase::Running => None,
        Phase::Paused => Some(("PAUSED", "Space: play  T: walls  R: reset  Q: quit")),
        Phase::Over => {
            let title = match end_reason {
                Some(EndReason::BoardFull) => "BOARD CLEARED",
                Some(EndReason::HitWall) => "GAME OVER - hit the wall",
                Some(EndReason::HitSelf) | None => "GAME OVER",
            };
            Some((title, "Space: play again  R: reset  Q: quit"))
        }
    }
}

pub fn draw_hud(snapshot: &Snapshot, show_speed: bool, color: Color) {
    draw_text(&status_line(snapshot, show_speed), 8.0, 26.0, 24.0, color);
}

pub fn draw_overlay(snapshot: &Snapshot, title_color: Color) {
    let Some((title, hint)) = overlay_text(snapshot.phase, snapshot.end_reason) else {
        return;
    };
    let sw = screen_width();
    let sh = screen_height();
    draw_rectangle(0.0, 0.0, sw, sh, Color::new(0.0, 0.0, 0.0, 0.4));

    let tm = measure_text(title, None, 36, 1.0);
    draw_text(title, (sw - tm.width) * 0.5, sh * 0.4, 36.0, title_color);
    let hm = measure_text(hint, None, 22, 1.0);
    draw_text(hint, (sw - hm.width) * 0.5, sh * 0.4 + 56.0, 22.0, WHITE);
}
