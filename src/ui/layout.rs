//! Screen geometry and hit testing. Shared by drawing and mouse input so
//! a click always lands on what was drawn.

use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};

pub const TILES_PER_ROW: usize = 5;
pub const TILE_WIDTH: u16 = 10;
pub const TILE_HEIGHT: u16 = 5;
const TILE_GAP: u16 = 2;
const START_OVER_WIDTH: u16 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenLayout {
    pub title: Rect,
    pub numeral: Rect,
    pub prompt: Rect,
    pub grid: Rect,
    pub progress: Rect,
    pub start_over: Rect,
    pub footer: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Tile(usize),
    StartOver,
}

pub fn grid_rows(count: usize) -> usize {
    count.div_ceil(TILES_PER_ROW).max(1)
}

impl ScreenLayout {
    pub fn compute(area: Rect, max_level: usize) -> Self {
        let grid_height = grid_rows(max_level) as u16 * (TILE_HEIGHT + 1);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(5),
                Constraint::Length(2),
                Constraint::Min(grid_height.min(area.height)),
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(area);

        let start_over = centered(chunks[5], START_OVER_WIDTH, chunks[5].height);

        Self {
            title: chunks[0],
            numeral: centered(chunks[1], 11, chunks[1].height),
            prompt: chunks[2],
            grid: chunks[3],
            progress: chunks[4],
            start_over,
            footer: chunks[6],
        }
    }

    pub fn tiles(&self, count: usize) -> Vec<Rect> {
        tile_rects(self.grid, count)
    }

    pub fn hit_test(&self, count: usize, column: u16, row: u16) -> Option<Hit> {
        let pos = Position::new(column, row);
        if self.start_over.contains(pos) {
            return Some(Hit::StartOver);
        }
        self.tiles(count)
            .iter()
            .position(|r| r.contains(pos))
            .map(Hit::Tile)
    }
}

/// Lay out `count` tiles, up to five per row, centered in `grid`.
/// Tiles that would fall outside `grid` are clipped to it.
pub fn tile_rects(grid: Rect, count: usize) -> Vec<Rect> {
    let mut rects = Vec::with_capacity(count);
    let grid_bottom = grid.y.saturating_add(grid.height);
    let grid_right = grid.x.saturating_add(grid.width);

    for row in 0..grid_rows(count) {
        let in_row = (count - row * TILES_PER_ROW).min(TILES_PER_ROW) as u16;
        let row_width = in_row * TILE_WIDTH + in_row.saturating_sub(1) * TILE_GAP;
        let x0 = grid.x + grid.width.saturating_sub(row_width) / 2;
        let y = grid.y + row as u16 * (TILE_HEIGHT + 1);

        for col in 0..in_row {
            let x = x0 + col * (TILE_WIDTH + TILE_GAP);
            let width = TILE_WIDTH.min(grid_right.saturating_sub(x));
            let height = TILE_HEIGHT.min(grid_bottom.saturating_sub(y));
            rects.push(Rect::new(x, y, width, height));
        }
    }

    rects
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
