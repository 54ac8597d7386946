use macroquad::prelude::Rect;

use crate::game::Cell;

/// Where the grid sits on screen: a square of `grid_size` tiles, centred
/// below the HUD strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Board {
    pub grid_size: i32,
    pub tile: f32,
    pub off_x: f32,
    pub off_y: f32,
}

impl Board {
    pub fn fit(screen_w: f32, screen_h: f32, grid_size: i32, hud_height: f32) -> Self {
        let avail_h = (screen_h - hud_height).max(0.0);
        // Whole pixels per tile keeps grid lines crisp.
        let tile = (screen_w.min(avail_h) / grid_size as f32).floor().max(1.0);
        let side = tile * grid_size as f32;
        Self {
            grid_size,
            tile,
            off_x: (screen_w - side) * 0.5,
            off_y: hud_height + (avail_h - side).max(0.0) * 0.5,
        }
    }

    pub fn side(&self) -> f32 {
        self.tile * self.grid_size as f32
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.off_x, self.off_y, self.side(), self.side())
    }

    pub fn cell_rect(&self, cell: Cell) -> Rect {
        Rect::new(
            self.off_x + cell.x as f32 * self.tile,
            self.off_y + cell.y as f32 * self.tile,
            self.tile,
            self.tile,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_square_window() {
        let board = Board::fit(440.0, 440.0, 20, 40.0);
        assert_eq!(board.tile, 20.0);
        assert_eq!(board.side(), 400.0);
        assert_eq!(board.off_x, 20.0);
        assert_eq!(board.off_y, 40.0);
    }

    #[test]
    fn test_fit_wide_window_centres_horizontally() {
        let board = Board::fit(1000.0, 540.0, 10, 40.0);
        assert_eq!(board.tile, 50.0);
        assert_eq!(board.off_x, 250.0);
        assert_eq!(board.off_y, 40.0);
    }

    #[test]
    fn test_tiny_window_keeps_one_pixel_tiles() {
        let board = Board::fit(5.0, 45.0, 20, 40.0);
        assert_eq!(board.tile, 1.0);
    }

    #[test]
    fn test_cell_rect_position() {
        let board = Board::fit(440.0, 440.0, 20, 40.0);
        let rect = board.cell_rect(Cell::new(3, 2));
        assert_eq!(rect, Rect::new(80.0, 80.0, 20.0, 20.0));
        assert!(board.bounds().contains(rect.center()));
    }
}
