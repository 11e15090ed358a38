//! Ratatui-based terminal UI.
//!
//! The TUI keeps the fetched rows in memory and offers a settings panel for the
//! time range, granularity and axis mode. The chart shows one line per channel
//! with a hover cursor; zoom and pan are only available with a dynamic axis.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use plotters::style::RGBColor;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Terminal,
};

use crate::app::pipeline::{self, FetchedChannels, RunOutput};
use crate::cli::DashArgs;
use crate::data::DataSource;
use crate::domain::{AxisMode, ChannelSpec, CombinedRow, ViewOptions};
use crate::error::AppError;
use crate::view::{self, ChartView};

mod plotters_chart;

use plotters_chart::{ChartSeries, MentionsChart};

const EXPORT_FILE: &str = "mentions_view.csv";
const DEBUG_DIR: &str = "debug";
/// Zooming in stops at this many visible points.
const MIN_VISIBLE_ROWS: usize = 7;

/// Start the TUI.
pub fn run(args: &DashArgs) -> Result<(), AppError> {
    let source = crate::data::open_source(&args.source_settings())?;

    // Fetch before taking over the screen so a failing first query is printed normally.
    let mut app = App::new(source, args.channel_specs()?, args.view_options())?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::io(format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::io(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::io(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Visible slice of the view rows, as `[start, start + len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Viewport {
    start: usize,
    len: usize,
}

impl Viewport {
    fn full(n: usize) -> Self {
        Self { start: 0, len: n }
    }

    fn end(&self) -> usize {
        self.start + self.len
    }

    fn zoom_in(&mut self, n: usize) {
        if self.len <= MIN_VISIBLE_ROWS {
            return;
        }
        let len = (self.len / 2).max(MIN_VISIBLE_ROWS).min(n);
        self.recenter(len, n);
    }

    fn zoom_out(&mut self, n: usize) {
        let len = (self.len * 2).min(n);
        self.recenter(len, n);
    }

    fn recenter(&mut self, len: usize, n: usize) {
        let center = self.start + self.len / 2;
        self.start = center.saturating_sub(len / 2).min(n.saturating_sub(len));
        self.len = len;
    }

    fn pan(&mut self, delta: isize, n: usize) {
        let max_start = n.saturating_sub(self.len) as isize;
        self.start = (self.start as isize + delta).clamp(0, max_start) as usize;
    }
}

struct App {
    source: Box<dyn DataSource>,
    specs: Vec<ChannelSpec>,
    options: ViewOptions,
    selected_field: usize,
    visible: Vec<bool>,
    fill: bool,
    status: String,
    fetched: FetchedChannels,
    run: RunOutput,
    view: ChartView,
    viewport: Viewport,
    cursor: usize,
}

impl App {
    fn new(source: Box<dyn DataSource>, specs: Vec<ChannelSpec>, options: ViewOptions) -> Result<Self, AppError> {
        let now = Local::now().naive_local();
        let fetched = pipeline::fetch_channels(source.as_ref(), &specs, now)?;
        let run = pipeline::build_table(&fetched, now.date(), source.describe())?;
        let view = view::prepare(&run.table, options, now);

        let mut app = Self {
            visible: vec![true; specs.len()],
            source,
            specs,
            options,
            selected_field: 0,
            fill: true,
            status: format!("Loaded {} mentions.", run.total_mentions()),
            fetched,
            run,
            view,
            viewport: Viewport::full(0),
            cursor: 0,
        };
        app.reset_viewport();
        Ok(app)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::io(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::io(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::io(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_field < 2 {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Char('h') | KeyCode::Char(',') => self.move_cursor(-1),
            KeyCode::Char('l') | KeyCode::Char('.') => self.move_cursor(1),
            KeyCode::Home => self.cursor = self.viewport.start,
            KeyCode::End => self.cursor = self.viewport.end().saturating_sub(1),
            KeyCode::Char('+') | KeyCode::Char('=') => self.zoom(true),
            KeyCode::Char('-') => self.zoom(false),
            KeyCode::Char('<') => self.pan(-1),
            KeyCode::Char('>') => self.pan(1),
            KeyCode::Char('0') => {
                self.reset_viewport();
                self.status = "View reset.".to_string();
            }
            KeyCode::Char(c @ '1'..='9') => {
                let idx = c as usize - '1' as usize;
                self.toggle_channel(idx);
            }
            KeyCode::Char('f') => {
                self.fill = !self.fill;
                self.status = format!("fill: {}", if self.fill { "on" } else { "off" });
            }
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Char('e') => {
                let path = Path::new(EXPORT_FILE);
                self.status = match crate::io::write_view_csv(path, &self.view) {
                    Ok(()) => format!("Exported {} rows to {}", self.view.table.rows.len(), path.display()),
                    Err(err) => format!("Export failed: {err}"),
                };
            }
            KeyCode::Char('d') => {
                self.status = match crate::debug::write_ingest_report(&self.run, &PathBuf::from(DEBUG_DIR)) {
                    Ok(path) => format!("Wrote ingest report: {}", path.display()),
                    Err(err) => format!("Debug write failed: {err}"),
                };
            }
            _ => {}
        }

        false
    }

    fn adjust_field(&mut self, delta: i32) {
        match self.selected_field {
            0 => {
                self.options.range = if delta > 0 { self.options.range.next() } else { self.options.range.prev() };
                self.status = format!("range: {}", self.options.range.display_name());
            }
            1 => {
                self.options.granularity = if delta > 0 {
                    self.options.granularity.next()
                } else {
                    self.options.granularity.prev()
                };
                self.status = format!("granularity: {}", self.options.granularity.display_name());
            }
            _ => {
                self.options.axis = self.options.axis.toggle();
                self.status = format!("axis: {}", axis_label(self.options.axis));
            }
        }
        self.rebuild_view();
    }

    /// Recompute the view from the in-memory rows. Rolls the window forward if
    /// the date changed since the last build.
    fn rebuild_view(&mut self) {
        let now = Local::now().naive_local();
        if now.date() != self.run.window.end {
            match pipeline::build_table(&self.fetched, now.date(), self.run.source.clone()) {
                Ok(run) => self.run = run,
                Err(err) => log::warn!("keeping previous table: {err}"),
            }
        }
        self.view = view::prepare(&self.run.table, self.options, now);
        self.reset_viewport();
    }

    fn reset_viewport(&mut self) {
        let n = self.view.table.rows.len();
        self.viewport = Viewport::full(n);
        self.cursor = n.saturating_sub(1);
    }

    fn refresh(&mut self) {
        let now = Local::now().naive_local();
        let result = pipeline::fetch_channels(self.source.as_ref(), &self.specs, now).and_then(|fetched| {
            let run = pipeline::build_table(&fetched, now.date(), self.source.describe())?;
            Ok((fetched, run))
        });

        match result {
            Ok((fetched, run)) => {
                self.fetched = fetched;
                self.run = run;
                self.rebuild_view();
                self.status = format!("Refreshed: {} mentions.", self.run.total_mentions());
            }
            Err(err) => {
                log::error!("refresh failed: {err}");
                self.status = format!("Refresh failed, showing previous data: {err}");
            }
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.viewport.len == 0 {
            return;
        }
        let lo = self.viewport.start as isize;
        let hi = self.viewport.end() as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(lo, hi) as usize;
    }

    fn zoom(&mut self, zoom_in: bool) {
        if !self.view.zoomable() {
            self.status = "Zoom is off with a fixed axis; switch Axis to Dynamic.".to_string();
            return;
        }
        let n = self.view.table.rows.len();
        if zoom_in {
            self.viewport.zoom_in(n);
        } else {
            self.viewport.zoom_out(n);
        }
        self.move_cursor(0);
        self.status = format!("showing {} of {} points", self.viewport.len, n);
    }

    fn pan(&mut self, dir: isize) {
        if !self.view.zoomable() {
            self.status = "Pan is off with a fixed axis; switch Axis to Dynamic.".to_string();
            return;
        }
        let step = (self.viewport.len / 4).max(1) as isize;
        self.viewport.pan(dir * step, self.view.table.rows.len());
        self.move_cursor(0);
    }

    fn toggle_channel(&mut self, idx: usize) {
        let Some(flag) = self.visible.get_mut(idx) else {
            return;
        };
        *flag = !*flag;
        let name = self.view.table.channels.get(idx).map(String::as_str).unwrap_or("?");
        self.status = format!("{name}: {}", if *flag { "shown" } else { "hidden" });
    }

    fn visible_rows(&self) -> &[CombinedRow] {
        let rows = &self.view.table.rows;
        let end = self.viewport.end().min(rows.len());
        &rows[self.viewport.start.min(end)..end]
    }

    /// The fixed axis uses bounds from the whole view; the dynamic axis
    /// autoscales to the visible window and channels.
    fn y_bounds(&self) -> [f64; 2] {
        match self.options.axis {
            AxisMode::Fixed => self.view.y_bounds,
            AxisMode::Dynamic => view::value_bounds_visible(self.visible_rows(), AxisMode::Dynamic, &self.visible),
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("mentions", Style::default().fg(Color::Cyan)),
            Span::raw(" | Mentions Over Time"),
        ]));

        lines.push(Line::from(Span::styled(
            format!(
                "source: {} | window: {} .. {} | fetched: {}",
                self.run.source,
                self.run.window.start,
                self.run.window.end,
                self.run.fetched_at.format("%Y-%m-%d %H:%M"),
            ),
            Style::default().fg(Color::Gray),
        )));

        let mut totals = vec![Span::styled("365d totals: ", Style::default().fg(Color::Gray))];
        for (idx, name) in self.run.table.channels.iter().enumerate() {
            totals.push(Span::styled(
                format!("{name} {}  ", self.run.table.channel_total(idx)),
                Style::default().fg(term_color(channel_color(name, idx))),
            ));
        }
        lines.push(Line::from(totals));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(6)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_settings(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = format!(
            "Mentions Over Time ({} / {})",
            self.options.range.display_name(),
            self.options.granularity.display_name()
        );
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let rows = self.visible_rows();
        let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
            let msg = Paragraph::new("No data in the selected range.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);

        let series = chart_series(&self.view.table.channels, rows, &self.visible);
        let x_bounds = x_bounds(first.date, last.date);
        let cursor_x = self.view.table.rows.get(self.cursor).map(|r| day_x(r.date));

        let widget = MentionsChart {
            series: &series,
            fill: self.fill,
            cursor_x,
            x_bounds,
            y_bounds: self.y_bounds(),
            x_label: "Date",
            y_label: "Number of Mentions",
            fmt_x: fmt_axis_date,
            fmt_y: fmt_axis_count,
        };
        frame.render_widget(widget, chunks[0]);

        if let Some(row) = self.view.table.rows.get(self.cursor) {
            let readout = hover_line(&self.view.table.channels, row, &self.visible);
            frame.render_widget(Paragraph::new(readout), chunks[1]);
        }
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let items = vec![
            ListItem::new(format!("Time Range: {}", self.options.range.display_name())),
            ListItem::new(format!("Granularity: {}", self.options.granularity.display_name())),
            ListItem::new(format!("Axis: {}", axis_label(self.options.axis))),
        ];

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, chunks[0], &mut state);

        let mut lines = Vec::new();
        for (idx, name) in self.view.table.channels.iter().enumerate() {
            let shown = self.visible.get(idx).copied().unwrap_or(true);
            let style = if shown {
                Style::default().fg(term_color(channel_color(name, idx)))
            } else {
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
            };
            lines.push(Line::from(vec![
                Span::raw(format!("[{}] ", idx + 1)),
                Span::styled(name.clone(), style),
            ]));
        }
        let channels = Paragraph::new(Text::from(lines))
            .block(Block::default().title("Channels").borders(Borders::ALL));
        frame.render_widget(channels, chunks[1]);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  h/l cursor  +/- zoom  </> pan  0 reset  1-9 channel  f fill  r refresh  e export  d debug  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn axis_label(axis: AxisMode) -> &'static str {
    match axis {
        AxisMode::Fixed => "Fixed (no zoom)",
        AxisMode::Dynamic => "Dynamic (zoom/pan)",
    }
}

/// Twitter red, News blue, Blog green; other channels cycle a fallback palette.
fn channel_color(name: &str, idx: usize) -> RGBColor {
    const PALETTE: [RGBColor; 3] = [RGBColor(230, 200, 60), RGBColor(200, 90, 220), RGBColor(60, 200, 220)];
    match name.to_ascii_lowercase().as_str() {
        "twitter" => RGBColor(235, 70, 70),
        "news" => RGBColor(70, 130, 255),
        "blog" => RGBColor(70, 200, 90),
        _ => PALETTE[idx % PALETTE.len()],
    }
}

fn term_color(c: RGBColor) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}

fn day_x(date: NaiveDate) -> f64 {
    use chrono::Datelike;
    date.num_days_from_ce() as f64
}

fn x_bounds(first: NaiveDate, last: NaiveDate) -> [f64; 2] {
    let (a, b) = (day_x(first), day_x(last));
    if b > a { [a, b] } else { [a - 0.5, a + 0.5] }
}

fn chart_series(channels: &[String], rows: &[CombinedRow], visible: &[bool]) -> Vec<ChartSeries> {
    channels
        .iter()
        .enumerate()
        .filter(|(idx, _)| visible.get(*idx).copied().unwrap_or(true))
        .map(|(idx, name)| ChartSeries {
            points: rows
                .iter()
                .map(|r| (day_x(r.date), r.counts.get(idx).copied().unwrap_or(0) as f64))
                .collect(),
            color: channel_color(name, idx),
        })
        .collect()
}

/// Unified readout for the hovered date: every visible channel's value.
fn hover_line<'a>(channels: &'a [String], row: &CombinedRow, visible: &[bool]) -> Line<'a> {
    let mut spans = vec![Span::styled(
        row.date.format("%Y-%m-%d (%a)").to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for (idx, name) in channels.iter().enumerate() {
        if !visible.get(idx).copied().unwrap_or(true) {
            continue;
        }
        let value = row.counts.get(idx).copied().unwrap_or(0);
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!("{name}: {value}"),
            Style::default().fg(term_color(channel_color(name, idx))),
        ));
    }
    Line::from(spans)
}

fn fmt_axis_date(v: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(v.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn fmt_axis_count(v: f64) -> String {
    format!("{v:.0}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::domain::{FieldValue, RawRecord};

    /// Answers the first `ok_calls` fetches, then fails.
    struct FlakySource {
        calls: Cell<usize>,
        ok_calls: usize,
    }

    impl DataSource for FlakySource {
        fn describe(&self) -> String {
            "flaky".to_string()
        }

        fn fetch(&self, _table: &str) -> Result<Vec<RawRecord>, AppError> {
            let n = self.calls.get();
            self.calls.set(n + 1);
            if n >= self.ok_calls {
                return Err(AppError::io("down"));
            }
            let today = Local::now().date_naive();
            Ok(vec![RawRecord::new().with("Date", FieldValue::Date(today))])
        }
    }

    fn app_with(ok_calls: usize) -> App {
        let source = FlakySource {
            calls: Cell::new(0),
            ok_calls,
        };
        let specs = vec![ChannelSpec::new("News", "news_data", "Date", false)];
        App::new(Box::new(source), specs, ViewOptions::default()).unwrap()
    }

    #[test]
    fn failed_refresh_keeps_previous_data() {
        let mut app = app_with(1);
        assert_eq!(app.run.total_mentions(), 1);

        assert!(!app.handle_key(KeyCode::Char('r')));
        assert_eq!(app.run.total_mentions(), 1);
        assert_eq!(app.fetched.channels[0].1.len(), 1);
        assert!(app.status.starts_with("Refresh failed"));
        assert!(app.status.ends_with("down"));
    }

    #[test]
    fn successful_refresh_replaces_data() {
        let mut app = app_with(2);
        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.status, "Refreshed: 1 mentions.");
    }

    #[test]
    fn rebuild_rolls_the_window_forward() {
        let mut app = app_with(1);
        let today = app.run.window.end;
        let yesterday = today.pred_opt().unwrap();

        // As if the table had been built before midnight.
        app.run = pipeline::build_table(&app.fetched, yesterday, "flaky".into()).unwrap();
        assert_eq!(app.run.total_mentions(), 0);

        app.rebuild_view();
        assert_eq!(app.run.window.end, Local::now().date_naive());
        assert_eq!(app.run.total_mentions(), 1);
    }

    #[test]
    fn fixed_axis_refuses_zoom_and_pan() {
        let mut app = app_with(1);
        let before = app.viewport;
        app.handle_key(KeyCode::Char('+'));
        assert_eq!(app.viewport, before);
        assert!(app.status.starts_with("Zoom is off"));
        app.handle_key(KeyCode::Char('>'));
        assert_eq!(app.viewport, before);

        // Switch the axis setting to dynamic, then zoom works.
        app.selected_field = 2;
        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Char('+'));
        assert!(app.viewport.len < before.len);
    }

    #[test]
    fn viewport_zoom_keeps_center_and_bounds() {
        let n = 100;
        let mut vp = Viewport::full(n);
        vp.zoom_in(n);
        assert_eq!(vp, Viewport { start: 25, len: 50 });
        vp.zoom_in(n);
        assert_eq!(vp, Viewport { start: 38, len: 25 });
        vp.zoom_out(n);
        assert_eq!(vp, Viewport { start: 25, len: 50 });
        vp.zoom_out(n);
        assert_eq!(vp, Viewport::full(n));
    }

    #[test]
    fn viewport_zoom_in_stops_at_minimum() {
        let mut vp = Viewport::full(10);
        vp.zoom_in(10);
        assert_eq!(vp.len, MIN_VISIBLE_ROWS);
        let before = vp;
        vp.zoom_in(10);
        assert_eq!(vp, before);

        let mut tiny = Viewport::full(3);
        tiny.zoom_in(3);
        assert_eq!(tiny, Viewport::full(3));
    }

    #[test]
    fn viewport_pan_clamps() {
        let n = 100;
        let mut vp = Viewport { start: 10, len: 20 };
        vp.pan(-50, n);
        assert_eq!(vp.start, 0);
        vp.pan(500, n);
        assert_eq!(vp.start, 80);
        assert_eq!(vp.end(), n);
    }

    #[test]
    fn channel_colors_follow_names() {
        assert_eq!(channel_color("Twitter", 5), RGBColor(235, 70, 70));
        assert_eq!(channel_color("news", 0), RGBColor(70, 130, 255));
        assert_eq!(channel_color("Blog", 0), RGBColor(70, 200, 90));
        assert_ne!(channel_color("Forum", 0), channel_color("Forum", 1));
    }

    #[test]
    fn axis_dates_round_trip() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(fmt_axis_date(day_x(d)), "2024-02-29");
        assert_eq!(x_bounds(d, d), [day_x(d) - 0.5, day_x(d) + 0.5]);
    }

    #[test]
    fn hidden_channels_are_not_drawn_or_read_out() {
        let channels = vec!["Twitter".to_string(), "News".to_string()];
        let row = CombinedRow {
            date: NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
            counts: vec![4, 9],
        };
        let series = chart_series(&channels, std::slice::from_ref(&row), &[false, true]);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].points, vec![(day_x(row.date), 9.0)]);

        let line = hover_line(&channels, &row, &[false, true]);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "2024-05-03 (Fri) | News: 9");
    }
}
