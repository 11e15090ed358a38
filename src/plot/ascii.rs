//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal or a cron mail
//! - deterministic output (helpful for golden tests)
//!
//! Each channel is drawn as a line of `.` with its data points marked by the
//! channel's glyph (first letter of its name, or a digit on collisions).

use crate::view::ChartView;

/// Render a prepared view.
pub fn render_ascii_plot(view: &ChartView, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);
    let table = &view.table;
    let glyphs = series_glyphs(&table.channels);

    let (y_min, y_max) = (view.y_bounds[0], view.y_bounds[1]);
    let (y_min, y_max) = if y_max > y_min { (y_min, y_max) } else { (0.0, 1.0) };

    let mut grid = vec![vec![' '; width]; height];
    let n = table.rows.len();

    // Lines first so markers can overlay them.
    for ch_idx in 0..table.channels.len() {
        let mut prev = None;
        for (i, row) in table.rows.iter().enumerate() {
            let x = map_x(i, n, width);
            let y = map_y(row.counts[ch_idx] as f64, y_min, y_max, height);
            if let Some((x0, y0)) = prev {
                draw_line(&mut grid, x0, y0, x, y, '.');
            }
            prev = Some((x, y));
        }
    }

    for (ch_idx, glyph) in glyphs.iter().enumerate() {
        for (i, row) in table.rows.iter().enumerate() {
            let x = map_x(i, n, width);
            let y = map_y(row.counts[ch_idx] as f64, y_min, y_max, height);
            grid[y][x] = *glyph;
        }
    }

    let mut out = String::new();
    let span = match (table.first_date(), table.last_date()) {
        (Some(a), Some(b)) => format!("{a}..{b}"),
        _ => "-".to_string(),
    };
    let legend: Vec<String> = glyphs
        .iter()
        .zip(&table.channels)
        .map(|(g, name)| format!("{g}={name}"))
        .collect();
    out.push_str(&format!(
        "Plot: dates=[{span}] | y=[{y_min:.0}, {y_max:.0}] | {}\n",
        legend.join(" ")
    ));

    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }

    out
}

/// One marker character per channel.
fn series_glyphs(channels: &[String]) -> Vec<char> {
    let mut used = Vec::with_capacity(channels.len());
    for (idx, name) in channels.iter().enumerate() {
        let first = name
            .chars()
            .find(|c| c.is_alphanumeric())
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('*');
        let glyph = if used.contains(&first) {
            char::from_digit(((idx + 1) % 10) as u32, 10).unwrap_or('*')
        } else {
            first
        };
        used.push(glyph);
    }
    used
}

fn map_x(i: usize, n: usize, width: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    let u = i as f64 / (n as f64 - 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Only fills blank cells.
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
    use chrono::NaiveDate;
    use crate::domain::{CombinedRow, MentionTable, ViewOptions};

    #[test]
    fn plot_golden_snapshot_small() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let view = ChartView {
            options: ViewOptions::default(),
            table: MentionTable {
                channels: vec!["Twitter".into(), "News".into()],
                rows: vec![
                    CombinedRow { date: d(1), counts: vec![0, 4] },
                    CombinedRow { date: d(2), counts: vec![4, 4] },
                ],
            },
            y_bounds: [0.0, 4.0],
        };

        let txt = render_ascii_plot(&view, 10, 5);
        let expected = concat!(
            "Plot: dates=[2024-01-01..2024-01-02] | y=[0, 4] | T=Twitter N=News\n",
            "N........N\n",
            "      ..\n",
            "    ..\n",
            "  ..\n",
            "T.\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn glyphs_fall_back_to_digits_on_collision() {
        let names = vec!["News".to_string(), "Newsletters".to_string(), "blog".to_string()];
        assert_eq!(series_glyphs(&names), vec!['N', '2', 'B']);
    }
}
