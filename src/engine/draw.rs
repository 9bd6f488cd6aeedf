//! Grid mutation algorithms.
//!
//! Entry points take 1-indexed command coordinates that validation has
//! already accepted; the translation to 0-indexed cells happens here and
//! nowhere else.

use crate::geometry::Point;
use crate::grid::Grid;

/// Glyph used for line and rectangle strokes. Flood fill treats it as an
/// impassable boundary.
pub const STROKE: char = 'x';

fn cell(p: Point) -> (u16, u16) {
    (p.x - 1, p.y - 1)
}

/// Stroke an axis-aligned segment between two accepted endpoints.
///
/// Symmetric in its arguments; a zero-length segment strokes a single cell.
/// Returns the number of cells written.
pub fn stroke_line(grid: &mut Grid, from: Point, to: Point) -> usize {
    let (x1, y1) = cell(from);
    let (x2, y2) = cell(to);
    debug_assert!(x1 == x2 || y1 == y2);

    let mut touched = 0;
    if x1 == x2 {
        for y in y1.min(y2)..=y1.max(y2) {
            if grid.set(x1, y, STROKE) {
                touched += 1;
            }
        }
    } else {
        for x in x1.min(x2)..=x1.max(x2) {
            if grid.set(x, y1, STROKE) {
                touched += 1;
            }
        }
    }
    touched
}

/// Stroke the outline of the rectangle spanned by two accepted corners.
///
/// Corners may coincide on either axis; the outline then degenerates to a
/// segment or a single cell. Returns the number of distinct cells stroked,
/// counting each corner once.
pub fn outline_rect(grid: &mut Grid, corner_a: Point, corner_b: Point) -> usize {
    let left = corner_a.x.min(corner_b.x);
    let right = corner_a.x.max(corner_b.x);
    let top = corner_a.y.min(corner_b.y);
    let bottom = corner_a.y.max(corner_b.y);

    stroke_line(grid, Point::new(left, top), Point::new(right, top));
    stroke_line(grid, Point::new(right, top), Point::new(right, bottom));
    stroke_line(grid, Point::new(right, bottom), Point::new(left, bottom));
    stroke_line(grid, Point::new(left, bottom), Point::new(left, top));

    let w = (right - left) as usize + 1;
    let h = (bottom - top) as usize + 1;
    if w == 1 || h == 1 { w * h } else { 2 * (w + h) - 4 }
}

/// Flood fill the 4-connected region holding the seed's current character.
///
/// Stroke cells are an impassable boundary. Seeding on a stroke cell, or on
/// a cell already holding `glyph`, leaves the grid untouched, which makes
/// the operation idempotent. An explicit worklist bounds the fill by heap
/// space rather than call-stack depth, so a fully open canvas is safe.
/// Returns the number of repainted cells.
pub fn flood_fill(grid: &mut Grid, seed: Point, glyph: char) -> usize {
    let (seed_x, seed_y) = cell(seed);
    let Some(origin) = grid.get(seed_x, seed_y) else {
        return 0;
    };
    if origin == STROKE || origin == glyph {
        return 0;
    }

    let mut touched = 0;
    let mut worklist = vec![(seed_x, seed_y)];
    while let Some((x, y)) = worklist.pop() {
        if grid.get(x, y) != Some(origin) {
            continue;
        }
        grid.set(x, y, glyph);
        touched += 1;

        // Up, right, down, left.
        if y > 0 {
            worklist.push((x, y - 1));
        }
        if x + 1 < grid.width() {
            worklist.push((x + 1, y));
        }
        if y + 1 < grid.height() {
            worklist.push((x, y + 1));
        }
        if x > 0 {
            worklist.push((x - 1, y));
        }
    }
    touched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::BLANK;

    fn stroked(grid: &Grid) -> Vec<(u16, u16)> {
        let mut cells = Vec::new();
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                if grid.get(x, y) == Some(STROKE) {
                    cells.push((x, y));
                }
            }
        }
        cells
    }

    #[test]
    fn horizontal_line_is_endpoint_symmetric() {
        let mut forward = Grid::new(10, 4);
        let mut backward = Grid::new(10, 4);
        assert_eq!(
            stroke_line(&mut forward, Point::new(2, 3), Point::new(7, 3)),
            6
        );
        assert_eq!(
            stroke_line(&mut backward, Point::new(7, 3), Point::new(2, 3)),
            6
        );
        assert_eq!(forward, backward);
        assert_eq!(stroked(&forward).len(), 6);
    }

    #[test]
    fn vertical_line_covers_inclusive_range() {
        let mut grid = Grid::new(5, 5);
        assert_eq!(stroke_line(&mut grid, Point::new(3, 1), Point::new(3, 5)), 5);
        assert_eq!(stroked(&grid), vec![(2, 0), (2, 1), (2, 2), (2, 3), (2, 4)]);
    }

    #[test]
    fn zero_length_line_strokes_one_cell() {
        let mut grid = Grid::new(5, 5);
        assert_eq!(stroke_line(&mut grid, Point::new(2, 2), Point::new(2, 2)), 1);
        assert_eq!(stroked(&grid), vec![(1, 1)]);
    }

    #[test]
    fn rectangle_outline_leaves_interior_blank() {
        let mut grid = Grid::new(6, 5);
        assert_eq!(
            outline_rect(&mut grid, Point::new(2, 2), Point::new(5, 4)),
            10
        );
        assert_eq!(grid.get(2, 2), Some(BLANK));
        assert_eq!(grid.get(3, 2), Some(BLANK));
        assert_eq!(grid.get(1, 1), Some(STROKE));
        assert_eq!(grid.get(4, 3), Some(STROKE));
        assert_eq!(stroked(&grid).len(), 10);
    }

    #[test]
    fn degenerate_rectangle_collapses_to_a_segment() {
        let mut grid = Grid::new(6, 5);
        assert_eq!(outline_rect(&mut grid, Point::new(2, 3), Point::new(5, 3)), 4);
        let mut single = Grid::new(6, 5);
        assert_eq!(outline_rect(&mut single, Point::new(4, 4), Point::new(4, 4)), 1);
    }

    #[test]
    fn fill_stops_at_stroke_boundary() {
        let mut grid = Grid::new(6, 5);
        outline_rect(&mut grid, Point::new(1, 1), Point::new(6, 5));
        let inside = flood_fill(&mut grid, Point::new(3, 3), '#');
        assert_eq!(inside, 12);
        assert_eq!(grid.get(2, 2), Some('#'));
        assert_eq!(grid.get(0, 0), Some(STROKE));
        // Nothing outside the outline changed (it is flush with the canvas).
        assert_eq!(stroked(&grid).len(), 18);
    }

    #[test]
    fn fill_is_idempotent_per_cell() {
        let mut grid = Grid::new(4, 4);
        assert_eq!(flood_fill(&mut grid, Point::new(1, 1), '*'), 16);
        let snapshot = grid.clone();
        assert_eq!(flood_fill(&mut grid, Point::new(1, 1), '*'), 0);
        assert_eq!(grid, snapshot);
    }

    #[test]
    fn fill_seeded_on_a_stroke_cell_is_a_no_op() {
        let mut grid = Grid::new(4, 4);
        stroke_line(&mut grid, Point::new(1, 1), Point::new(4, 1));
        let snapshot = grid.clone();
        assert_eq!(flood_fill(&mut grid, Point::new(2, 1), '#'), 0);
        assert_eq!(grid, snapshot);
    }

    #[test]
    fn fill_replaces_only_the_seed_component() {
        let mut grid = Grid::new(7, 3);
        // Wall down the middle splits the canvas in two.
        stroke_line(&mut grid, Point::new(4, 1), Point::new(4, 3));
        assert_eq!(flood_fill(&mut grid, Point::new(2, 2), 'o'), 9);
        assert_eq!(grid.get(1, 1), Some('o'));
        assert_eq!(grid.get(4, 1), Some(BLANK));
        assert_eq!(grid.get(6, 2), Some(BLANK));
    }
}
