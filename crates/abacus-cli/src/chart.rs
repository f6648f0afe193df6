//! ASCII rendering of sampled plots.

use abacus_core::{PlotPoint, Viewport};

/// Draw `points` into a `viewport.width` x `viewport.height` character grid
/// with axes and integer tick marks.
pub fn render(points: &[PlotPoint], viewport: &Viewport) -> String {
    let cols = viewport.width as usize;
    let rows = viewport.height as usize;
    if cols == 0 || rows == 0 {
        return String::new();
    }
    let mut grid = vec![vec![' '; cols]; rows];
    let cell = |(sx, sy): (f64, f64)| {
        let col = (sx.floor() as isize).clamp(0, cols as isize - 1) as usize;
        let row = (sy.floor() as isize).clamp(0, rows as isize - 1) as usize;
        (col, row)
    };

    let origin = PlotPoint { x: 0.0, y: 0.0 };
    let (axis_col, axis_row) = cell(viewport.to_screen(origin));
    let x_axis_visible = viewport.y_min <= 0.0 && viewport.y_max >= 0.0;
    let y_axis_visible = viewport.x_min <= 0.0 && viewport.x_max >= 0.0;

    if x_axis_visible {
        grid[axis_row].fill('-');
        for x in viewport.x_ticks() {
            let (col, _) = cell(viewport.to_screen(PlotPoint { x, y: 0.0 }));
            grid[axis_row][col] = '+';
        }
    }
    if y_axis_visible {
        for line in grid.iter_mut() {
            line[axis_col] = '|';
        }
        for y in viewport.y_ticks() {
            let (_, row) = cell(viewport.to_screen(PlotPoint { x: 0.0, y }));
            grid[row][axis_col] = '+';
        }
    }

    for segment in viewport.segments(points) {
        let mut previous: Option<(usize, usize)> = None;
        for &screen in &segment {
            let (col, row) = cell(screen);
            // fill steep stretches so the curve stays connected
            if let Some((_, prev_row)) = previous {
                let (lo, hi) = if prev_row < row { (prev_row, row) } else { (row, prev_row) };
                for r in lo..=hi {
                    grid[r][col] = '*';
                }
            }
            grid[row][col] = '*';
            previous = Some((col, row));
        }
    }

    let mut out = String::with_capacity((cols + 1) * rows);
    for line in grid {
        out.extend(line.iter().collect::<String>().trim_end().chars());
        out.push('\n');
    }
    out
}
