use macroquad::prelude::*;

use super::{Renderer, board_for, draw_hud, draw_overlay};
use crate::game::{Snapshot, WallMode};

const BOARD_BG: Color = Color::new(0.08, 0.09, 0.12, 1.0);
const GRID_LINE: Color = Color::new(0.16, 0.18, 0.23, 1.0);
const BORDER: Color = Color::new(0.85, 0.3, 0.3, 1.0);
const SNAKE_HEAD: Color = Color::new(0.55, 0.95, 0.45, 1.0);
const SNAKE_BODY: Color = Color::new(0.25, 0.7, 0.3, 1.0);
const FOOD: Color = Color::new(0.95, 0.35, 0.35, 1.0);
const TEXT: Color = Color::new(0.85, 0.88, 0.92, 1.0);

/// Immediate-mode drawing: a lined board with filled rectangles.
pub struct CanvasRenderer;

impl Renderer for CanvasRenderer {
    fn draw(&self, snapshot: &Snapshot) {
        let board = board_for(snapshot);
        let bounds = board.bounds();

        draw_rectangle(bounds.x, bounds.y, bounds.w, bounds.h, BOARD_BG);
        for i in 1..board.grid_size {
            let offset = i as f32 * board.tile;
            draw_line(bounds.x + offset, bounds.y, bounds.x + offset, bounds.bottom(), 1.0, GRID_LINE);
            draw_line(bounds.x, bounds.y + offset, bounds.right(), bounds.y + offset, 1.0, GRID_LINE);
        }
        if snapshot.wall_mode == WallMode::Solid {
            draw_rectangle_lines(bounds.x - 2.0, bounds.y - 2.0, bounds.w + 4.0, bounds.h + 4.0, 4.0, BORDER);
        }

        if let Some(food) = snapshot.food {
            let rect = board.cell_rect(food);
            let center = rect.center();
            draw_circle(center.x, center.y, rect.w * 0.4, FOOD);
        }

        // Tail first so the head is drawn on top.
        let inset = (board.tile * 0.08).max(1.0);
        for (i, cell) in snapshot.snake.iter().enumerate().rev() {
            let rect = board.cell_rect(*cell);
            let color = if i == 0 { SNAKE_HEAD } else { SNAKE_BODY };
            draw_rectangle(rect.x + inset, rect.y + inset, rect.w - 2.0 * inset, rect.h - 2.0 * inset, color);
        }

        draw_hud(snapshot, true, TEXT);
        draw_overlay(snapshot, SNAKE_HEAD);
    }
}
