//! Plotters-powered chart widget for Ratatui.
//!
//! The widget draws a precomputed `PlotGeometry`; all series and bounds are
//! built outside the render call. We render Plotters output into the Ratatui
//! buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::plot::PlotGeometry;

pub struct DashPlottersChart<'a> {
    pub geometry: &'a PlotGeometry,
    pub x_label: &'a str,
    pub y_label: &'a str,
}

impl<'a> Widget for DashPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to build a chart in a tiny area.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let g = self.geometry;
        let [x0, x1] = g.x_bounds;
        let [y0, y1] = g.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Mesh lines are clutter at terminal resolution.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let bar_color = RGBColor(0, 180, 255);
            let box_color = RGBColor(255, 200, 0);
            let line_color = RGBColor(255, 0, 255);
            let point_color = WHITE;

            chart.draw_series(g.rects.iter().map(|r| {
                let style = match r.fill {
                    Some(f) if f >= 1.0 => bar_color.filled(),
                    Some(f) => heat_color(f).filled(),
                    None => box_color.stroke_width(1),
                };
                Rectangle::new([(r.x0, r.y0), (r.x1, r.y1)], style)
            }))?;

            for line in &g.lines {
                chart.draw_series(LineSeries::new(line.iter().copied(), &line_color))?;
            }

            // `Circle` radii are mis-scaled by the ratatui backend; pixels stay crisp.
            chart.draw_series(g.points.iter().map(|&(x, y)| Pixel::new((x, y), point_color)))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Blue-to-red ramp for heat cells, `f` in `0..=1`.
fn heat_color(f: f64) -> RGBColor {
    let f = f.clamp(0.0, 1.0);
    let r = (40.0 + 215.0 * f) as u8;
    let b = (255.0 * (1.0 - f)) as u8;
    RGBColor(r, 60, b)
}
