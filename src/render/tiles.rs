use macroquad::prelude::*;

use super::{Board, Renderer, board_for, draw_hud, draw_overlay};
use crate::game::{Cell, Direction, Snapshot, WallMode};

// Matrix-style palette
const MATRIX_HEAD: Color = Color::new(0.64, 1.0, 0.64, 1.0);
const MATRIX_BODY: Color = Color::new(0.25, 0.9, 0.25, 1.0);
const MATRIX_WALL: Color = Color::new(0.08, 0.4, 0.08, 1.0);
const MATRIX_FOOD: Color = Color::new(0.9, 1.0, 0.9, 1.0);
const TILE_BG: Color = Color::new(0.0, 0.12, 0.0, 1.0);

const MATRIX_GLYPHS: &[u8] = b"01<>[]{}()/\\|-=+*;:.,^~ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Stable glyph for a cell, so a body segment keeps its character while the
/// snake passes over it.
fn glyph_for_cell(c: Cell) -> char {
    let hx = (c.x as i64).wrapping_mul(73_856_093);
    let hy = (c.y as i64).wrapping_mul(19_349_663);
    let h = (hx ^ hy).unsigned_abs() as usize;
    MATRIX_GLYPHS[h % MATRIX_GLYPHS.len()] as char
}

fn head_glyph(direction: Direction) -> char {
    match direction {
        Direction::Up => '^',
        Direction::Down => 'v',
        Direction::Left => '<',
        Direction::Right => '>',
    }
}

/// One positioned tile per occupied cell; empty cells are not drawn.
pub struct TileRenderer;

impl TileRenderer {
    fn draw_tile(board: &Board, cell: Cell, glyph: char, color: Color) {
        let rect = board.cell_rect(cell);
        draw_rectangle(rect.x + 1.0, rect.y + 1.0, rect.w - 2.0, rect.h - 2.0, TILE_BG);
        let size = rect.w.max(6.0);
        let params = TextParams {
            font_size: size as u16,
            font_scale: 1.0,
            font_scale_aspect: 1.0,
            color,
            ..Default::default()
        };
        let text = glyph.to_string();
        let dims = measure_text(&text, None, size as u16, 1.0);
        let x = rect.x + (rect.w - dims.width) * 0.5;
        let y = rect.y + (rect.h + dims.offset_y) * 0.5;
        draw_text_ex(&text, x, y, params);
    }
}

impl Renderer for TileRenderer {
    fn draw(&self, snapshot: &Snapshot) {
        let board = board_for(snapshot);
        let bounds = board.bounds();

        let wall = match snapshot.wall_mode {
            WallMode::Solid => MATRIX_WALL,
            WallMode::Wrap => Color::new(MATRIX_WALL.r, MATRIX_WALL.g, MATRIX_WALL.b, 0.35),
        };
        draw_rectangle_lines(bounds.x - 2.0, bounds.y - 2.0, bounds.w + 4.0, bounds.h + 4.0, 2.0, wall);

        if let Some(food) = snapshot.food {
            Self::draw_tile(&board, food, '*', MATRIX_FOOD);
        }
        for (i, cell) in snapshot.snake.iter().enumerate() {
            if i == 0 {
                Self::draw_tile(&board, *cell, head_glyph(snapshot.direction), MATRIX_HEAD);
            } else {
                Self::draw_tile(&board, *cell, glyph_for_cell(*cell), MATRIX_BODY);
            }
        }

        draw_hud(snapshot, false, MATRIX_BODY);
        draw_overlay(snapshot, MATRIX_HEAD);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_is_stable_per_cell() {
        let cell = Cell::new(4, 7);
        assert_eq!(glyph_for_cell(cell), glyph_for_cell(cell));
        assert!(MATRIX_GLYPHS.contains(&(glyph_for_cell(Cell::new(19, 0)) as u8)));
    }

    #[test]
    fn test_head_glyph_points_along_direction() {
        assert_eq!(head_glyph(Direction::Left), '<');
        assert_eq!(head_glyph(Direction::Up), '^');
    }
}
