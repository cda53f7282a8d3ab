//! ASCII preview of the fitted layout, printed for `--graphview`.
//!
//! Stands in for an on-screen view: each element shows up as a `*` marker
//! with its display name beside it, on a character grid scaled down from
//! the map canvas. Purely local; never touches the network.

const GRID_COLS: usize = 96;
const GRID_ROWS: usize = 28;
const NAME_CHARS: usize = 12;

/// Render node markers onto a character grid scaled from `width`×`height`.
/// `names` and `positions` are parallel, in node order.
#[must_use]
pub fn render(names: &[&str], positions: &[(i64, i64)], width: u32, height: u32) -> String {
    let mut grid = vec![vec![' '; GRID_COLS]; GRID_ROWS];

    for (name, &(x, y)) in names.iter().zip(positions) {
        let col = cell(x, width, GRID_COLS);
        let row = cell(y, height, GRID_ROWS);
        grid[row][col] = '*';
        for (offset, ch) in name.chars().take(NAME_CHARS).enumerate() {
            let c = col + 1 + offset;
            if c >= GRID_COLS {
                break;
            }
            if grid[row][c] == ' ' {
                grid[row][c] = ch;
            }
        }
    }

    let mut out = String::new();
    for row in grid {
        let line: String = row.into_iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn cell(value: i64, extent: u32, cells: usize) -> usize {
    let clamped = value.clamp(0, i64::from(extent));
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = (clamped as f64 / f64::from(extent) * (cells - 1) as f64).round() as usize;
    index.min(cells - 1)
}

#[cfg(test)]
#[path = "preview_test.rs"]
mod tests;
