//! Ratatui-based terminal UI.
//!
//! The TUI shows the six dashboard controls (x field, y field, chart kind,
//! grouping, month slider, season slider) under the chart they produce. Every
//! adjustment goes through the `Controller`, so the chart on screen always
//! matches the controls.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};
use tracing::info;

use crate::app::controller::{ControlEvent, Controller};
use crate::app::pipeline::run_render;
use crate::chart::{ChartSpec, Trace};
use crate::data::Dataset;
use crate::domain::{GroupingMode, InitialControls};
use crate::error::{AppError, ControlError};
use crate::plot::{PlotGeometry, geometry};
use crate::report::format_trace_summary;

mod plotters_chart;

use plotters_chart::DashPlottersChart;

const CONTROL_ROWS: usize = 6;

/// Start the TUI over an already loaded dataset.
pub fn run(dataset: &Dataset, initial: &InitialControls) -> Result<(), AppError> {
    let controller = Controller::with_controls(dataset, initial)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(controller);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
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

struct App<'a> {
    controller: Controller<'a>,
    selected_control: usize,
    status: String,
    geometry: Option<PlotGeometry>,
}

impl<'a> App<'a> {
    fn new(controller: Controller<'a>) -> Self {
        let geometry = geometry(controller.chart());
        Self {
            controller,
            selected_control: 0,
            status: "Ready.".to_string(),
            geometry,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
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
                self.selected_control = self.selected_control.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_control + 1 < CONTROL_ROWS {
                    self.selected_control += 1;
                }
            }
            KeyCode::Left => self.adjust_control(-1),
            KeyCode::Right => self.adjust_control(1),
            KeyCode::Char('d') => {
                self.status = match crate::debug::write_debug_bundle(&self.controller) {
                    Ok(path) => format!("Wrote debug bundle: {}", path.display()),
                    Err(err) => format!("Debug write failed: {err}"),
                };
            }
            KeyCode::Char('e') => {
                self.status = match self.export_view() {
                    Ok(path) => format!("Exported view: {}", path.display()),
                    Err(err) => format!("Export failed: {err}"),
                };
            }
            _ => {}
        }
        false
    }

    fn adjust_control(&mut self, delta: i32) {
        let state = self.controller.state().clone();
        let result = match self.selected_control {
            0 => {
                let fields = self.controller.dataset().available_fields();
                if fields.is_empty() {
                    return;
                }
                let pos = fields.iter().position(|f| *f == state.x_field).unwrap_or(0) as i32;
                let next = fields[(pos + delta).rem_euclid(fields.len() as i32) as usize].clone();
                self.controller.apply(ControlEvent::SetXField(next)).map(|_| ())
            }
            1 => {
                self.status = format!("Y is fixed to {}.", state.y_field);
                return;
            }
            2 => {
                let kind = self.controller.options().cycle(state.chart_kind, delta);
                self.controller.apply(ControlEvent::SetChartKind(kind)).map(|_| ())
            }
            3 => self
                .controller
                .apply(ControlEvent::SetGrouping(state.grouping.toggle()))
                .map(|_| ()),
            4 | 5 => {
                let wanted = if self.selected_control == 4 {
                    GroupingMode::Month
                } else {
                    GroupingMode::Season
                };
                if state.grouping != wanted {
                    self.status = format!("Slider hidden; switch to {}.", wanted.display_name());
                    return;
                }
                self.controller.step_active_slider(i64::from(delta)).map(|_| ())
            }
            _ => return,
        };
        self.after_change(result);
    }

    fn after_change(&mut self, result: Result<(), ControlError>) {
        match result {
            Ok(()) => {
                self.geometry = geometry(self.controller.chart());
                self.status = format_trace_summary(&self.controller.chart().trace);
            }
            Err(err) => {
                self.status = format!("Rejected: {err}");
            }
        }
    }

    fn export_view(&self) -> Result<PathBuf, AppError> {
        let out = run_render(self.controller.dataset(), self.controller.state())?;
        let path = PathBuf::from(format!("bikedash_view_{}.csv", out.view.label()));
        crate::io::export::export_view_csv(&path, &out.view)?;
        info!(path = %path.display(), rows = out.view.len(), "exported view from tui");
        Ok(path)
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let ds = self.controller.dataset();
        let range = ds
            .date_range()
            .map(|(a, b)| format!("{a} .. {b}"))
            .unwrap_or_else(|| "-".to_string());

        let lines = vec![
            Line::from(vec![
                Span::styled("bikedash", Style::default().fg(Color::Cyan)),
                Span::raw(" - bike rental explorer"),
            ]),
            Line::from(Span::styled(
                format!(
                    "rows: {} | dates: {range} | months: {} | seasons: {}",
                    ds.len(),
                    ds.month_keys().len(),
                    ds.season_labels().len()
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(CONTROL_ROWS as u16 + 2)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_controls(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chart = self.controller.chart();
        let block = Block::default()
            .title(format!("{} [{}]", chart.title, chart.kind.display_name()))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if let Some(note) = &chart.annotation {
            let msg = Paragraph::new(note.as_str())
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        }

        if let Trace::Pie { .. } = &chart.trace {
            frame.render_widget(pie_table(chart, inner.width), inner);
            return;
        }

        let Some(g) = &self.geometry else {
            return;
        };

        let (chart_rect, insets) = chart_layout(inner);
        let widget = DashPlottersChart {
            geometry: g,
            x_label: &chart.layout.xaxis.title,
            y_label: &chart.layout.yaxis.title,
        };
        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, g, chart);
        }
    }

    fn draw_controls(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let ds = self.controller.dataset();
        let state = self.controller.state();
        let sliders = self.controller.sliders();
        let kinds: Vec<&str> = self.controller.options().kinds.iter().map(|k| k.as_str()).collect();

        let month = ds
            .month_keys()
            .get(state.month_index)
            .map(|k| k.to_string())
            .unwrap_or_else(|| "-".to_string());
        let season = ds
            .season_labels()
            .get(state.season_index)
            .cloned()
            .unwrap_or_else(|| "-".to_string());

        let dim = Style::default().fg(Color::DarkGray);
        let slider = |label: String, visible: bool| {
            if visible { ListItem::new(label) } else { ListItem::new(label).style(dim) }
        };

        let items = vec![
            ListItem::new(format!("X field: {}", state.x_field)),
            ListItem::new(format!("Y field: {}", state.y_field)),
            ListItem::new(format!("Chart kind: {}  [{}]", state.chart_kind.display_name(), kinds.join(", "))),
            ListItem::new(format!("Grouping: {}", state.grouping.display_name())),
            slider(
                format!("Month: {month}  ({}/{})", state.month_index + 1, ds.month_keys().len()),
                sliders.month,
            ),
            slider(
                format!("Season: {season}  ({}/{})", state.season_index + 1, ds.season_labels().len()),
                sliders.season,
            ),
        ];

        let list = List::new(items)
            .block(Block::default().title("Controls").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut list_state = ListState::default();
        list_state.select(Some(self.selected_control));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  d debug  e export  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Pie charts have no axes; show each slice as a labelled share bar.
fn pie_table(chart: &ChartSpec, width: u16) -> Paragraph<'static> {
    let Trace::Pie { slices } = &chart.trace else {
        return Paragraph::new("");
    };
    let bar_width = (width as usize).saturating_sub(30).max(10);
    let lines: Vec<Line> = slices
        .iter()
        .map(|s| {
            let filled = (s.share * bar_width as f64).round() as usize;
            Line::from(vec![
                Span::raw(format!("{:<16} {:>6.1}% ", s.label, s.share * 100.0)),
                Span::styled("█".repeat(filled), Style::default().fg(Color::Cyan)),
            ])
        })
        .collect();
    Paragraph::new(Text::from(lines))
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

/// Tick labels around the plot area. Categorical x axes get their labels at
/// the integer slots instead of evenly spaced numbers.
fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    g: &PlotGeometry,
    spec: &ChartSpec,
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);
    let [x0, x1] = g.x_bounds;
    let [y0, y1] = g.y_bounds;
    let y_row = chart.y + chart.height;

    let x_ticks: Vec<(f64, String)> = if g.x_categories.is_empty() {
        (0..ticks)
            .map(|i| {
                let u = i as f64 / (ticks as f64 - 1.0);
                (u, format!("{:.1}", x0 + u * (x1 - x0)))
            })
            .collect()
    } else {
        g.x_categories
            .iter()
            .enumerate()
            .map(|(i, label)| ((i as f64 - x0) / (x1 - x0), label.clone()))
            .collect()
    };

    if y_row < inner.y + inner.height - 1 {
        for (u, label) in x_ticks {
            if !(0.0..=1.0).contains(&u) {
                continue;
            }
            let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
            let label_len = label.chars().count() as u16;
            let start = x.saturating_sub(label_len / 2).max(inner.x);
            let width = label_len.min((inner.x + inner.width).saturating_sub(start));
            frame.render_widget(
                Paragraph::new(label).style(style),
                Rect {
                    x: start,
                    y: y_row,
                    width,
                    height: 1,
                },
            );
        }
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y0 + u * (y1 - y0);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = format!("{:.0}", y_val);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new(spec.layout.xaxis.title.as_str())
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new(spec.layout.yaxis.title.as_str())
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChartKind;
    use crate::io::read_dataset;

    const DATA: &str = "\
Date,Rented Bike Count,Hour,Seasons,Holiday,Functioning Day
01/12/2017,254,0,Winter,0,0
01/01/2018,90,2,Winter,1,0
01/03/2018,300,3,Spring,0,0
";

    #[test]
    fn arrow_keys_drive_the_controller() {
        let ds = read_dataset(DATA.as_bytes()).unwrap();
        let mut app = App::new(Controller::new(&ds).unwrap());

        // Kind row: scatter -> heatmap.
        app.selected_control = 2;
        app.handle_key(KeyCode::Right);
        assert_eq!(app.controller.state().chart_kind, ChartKind::Heatmap);

        // X row: Hour -> next field resets the kind to that field's default.
        app.selected_control = 0;
        app.handle_key(KeyCode::Right);
        assert_eq!(app.controller.state().x_field, "Holiday");
        assert_eq!(app.controller.state().chart_kind, ChartKind::Bar);
    }

    #[test]
    fn hidden_slider_is_not_adjustable() {
        let ds = read_dataset(DATA.as_bytes()).unwrap();
        let mut app = App::new(Controller::new(&ds).unwrap());
        app.selected_control = 5;
        app.handle_key(KeyCode::Right);
        assert_eq!(app.controller.state().season_index, 0);
        assert!(app.status.contains("Group by Season"));

        app.selected_control = 3;
        app.handle_key(KeyCode::Left);
        app.selected_control = 5;
        app.handle_key(KeyCode::Right);
        assert_eq!(app.controller.state().season_index, 1);
    }

    #[test]
    fn quit_keys_end_the_loop() {
        let ds = read_dataset(DATA.as_bytes()).unwrap();
        let mut app = App::new(Controller::new(&ds).unwrap());
        assert!(!app.handle_key(KeyCode::Down));
        assert!(app.handle_key(KeyCode::Char('q')));
    }
}
