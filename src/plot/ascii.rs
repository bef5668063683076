//! ASCII plotting for terminal output.
//!
//! A fixed-size character grid, deterministic so it can be golden tested.
//! Points are spaced evenly by index (one slot per measurement, oldest on the
//! left), the way a category-axis line chart lays them out.
//!
//! Plot elements:
//! - measurements: `o`
//! - connecting line: `-`

/// Render one exercise's series as a line chart.
///
/// `labels` are the x-axis labels (timestamps); only the first and last are
/// printed, under the chart.
pub fn render_series_plot(values: &[f64], labels: &[String], units: &str, width: usize, height: usize) -> String {
    let Some((y_min, y_max)) = y_range(values) else {
        return "Plot: no data\n".to_string();
    };

    let width = width.max(10);
    let height = height.max(5);
    let (y_min, y_max) = if y_max > y_min {
        pad_range(y_min, y_max, 0.05)
    } else {
        (y_min - 1.0, y_max + 1.0)
    };

    let mut grid = vec![vec![' '; width]; height];

    let cells: Vec<(usize, usize)> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| (map_x(i, values.len(), width), map_y(v, y_min, y_max, height)))
        .collect();

    // Line first so points overlay it.
    for pair in cells.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        draw_line(&mut grid, x0, y0, x1, y1, '-');
    }
    for &(x, y) in &cells {
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    let units = units.trim();
    if units.is_empty() {
        out.push_str(&format!("Plot: {} points | y=[{y_min:.2}, {y_max:.2}]\n", values.len()));
    } else {
        out.push_str(&format!(
            "Plot: {} points | y=[{y_min:.2}, {y_max:.2}] {units}\n",
            values.len()
        ));
    }

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    if let Some(footer) = axis_footer(labels, width) {
        out.push_str(&footer);
        out.push('\n');
    }

    out
}

fn y_range(values: &[f64]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &v in values.iter().filter(|v| v.is_finite()) {
        min_y = min_y.min(v);
        max_y = max_y.max(v);
    }
    if min_y.is_finite() && max_y.is_finite() {
        Some((min_y, max_y))
    } else {
        None
    }
}

/// First label on the left, last label flush right when both fit.
fn axis_footer(labels: &[String], width: usize) -> Option<String> {
    let first = labels.first()?;
    let last = labels.last()?;
    if labels.len() == 1 {
        return Some(first.clone());
    }
    let used = first.chars().count() + last.chars().count();
    if used < width {
        Some(format!("{first}{}{last}", " ".repeat(width - used)))
    } else {
        Some(format!("{first} {last}"))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(index: usize, count: usize, width: usize) -> usize {
    if count < 2 {
        return 0;
    }
    let u = index as f64 / (count as f64 - 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Never overwrites a filled cell.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let txt = render_series_plot(&[24.0, 26.0], &labels(&["2024-01-01", "2024-02-01"]), "inch", 10, 5);
        let expected = concat!(
            "Plot: 2 points | y=[23.90, 26.10] inch\n",
            "        -o\n",
            "      --  \n",
            "    --    \n",
            "  --      \n",
            "o-        \n",
            "2024-01-01 2024-02-01\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn flat_series_gets_unit_range() {
        let txt = render_series_plot(&[5.0, 5.0, 5.0], &labels(&["a", "b", "c"]), "", 11, 5);
        let expected = concat!(
            "Plot: 3 points | y=[4.00, 6.00]\n",
            "           \n",
            "           \n",
            "o----o----o\n",
            "           \n",
            "           \n",
            "a         c\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn single_point_sits_on_the_left() {
        let txt = render_series_plot(&[7.5], &labels(&["2024-03-01"]), "kg", 10, 5);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0], "Plot: 1 points | y=[6.50, 8.50] kg");
        assert_eq!(lines[3], "o         ");
        assert_eq!(lines[6], "2024-03-01");
    }

    #[test]
    fn empty_series_has_placeholder() {
        assert_eq!(render_series_plot(&[], &[], "inch", 40, 10), "Plot: no data\n");
    }
}
