//! Plotters-powered mentions chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.
//! The x axis is a day number (`NaiveDate::num_days_from_ce`), which keeps the
//! coordinate system plain `f64` and leaves date formatting to the tick formatter.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color as TermColor, Style},
    widgets::Widget,
};

/// One channel, ready to draw.
pub struct ChartSeries {
    pub points: Vec<(f64, f64)>,
    pub color: RGBColor,
}

/// A lightweight, render-only chart description.
///
/// All series and bounds are computed outside the render call.
pub struct MentionsChart<'a> {
    pub series: &'a [ChartSeries],
    /// Fill each series down to zero.
    pub fill: bool,
    /// Hover cursor position (same units as x).
    pub cursor_x: Option<f64>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for MentionsChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to lay out a chart in a tiny area; show a hint instead.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(TermColor::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Horizontal grid only, like the web dashboard.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .light_line_style(&RGBColor(60, 60, 60))
                .bold_line_style(&RGBColor(90, 90, 90))
                .draw()?;

            // 1) Fills underneath everything.
            if self.fill {
                for s in self.series {
                    chart.draw_series(AreaSeries::new(
                        s.points.iter().copied(),
                        0.0,
                        s.color.mix(0.2),
                    ))?;
                }
            }

            // 2) Lines.
            for s in self.series {
                chart.draw_series(LineSeries::new(s.points.iter().copied(), &s.color))?;
            }

            // 3) Markers.
            //
            // `Circle` radii are mis-scaled by the ratatui backend (pixel radius
            // -> normalized canvas units), so a coloured `Pixel` is the marker.
            for s in self.series {
                chart.draw_series(s.points.iter().map(|&(x, y)| Pixel::new((x, y), s.color)))?;
            }

            // 4) Hover cursor.
            if let Some(cx) = self.cursor_x {
                chart.draw_series(LineSeries::new(
                    [(cx, y0), (cx, y1)],
                    &RGBColor(160, 160, 160),
                ))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
