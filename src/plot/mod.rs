//! Chart geometry shared by the terminal renderers.
//!
//! `geometry` flattens a `ChartSpec` into points, polylines and rectangles in
//! data coordinates. The ASCII plotter and the Plotters TUI widget both draw
//! from this, so they always agree on what a chart looks like. Pie charts have
//! no cartesian geometry and are drawn as share tables instead.

pub mod ascii;

use crate::chart::{BinAxis, ChartSpec, Datum, Trace};

/// Bar width as a fraction of the category slot.
const BAR_WIDTH: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    /// Fill strength in `0..=1`; `None` draws an outline only.
    pub fill: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotGeometry {
    pub points: Vec<(f64, f64)>,
    pub lines: Vec<Vec<(f64, f64)>>,
    pub rects: Vec<PlotRect>,
    /// Category labels at integer x positions, when x is categorical.
    pub x_categories: Vec<String>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

/// Cartesian geometry for a chart. `None` for pie charts and empty charts.
pub fn geometry(spec: &ChartSpec) -> Option<PlotGeometry> {
    if spec.is_empty() {
        return None;
    }

    let mut g = PlotGeometry::default();
    let mut cats = Categories::default();

    match &spec.trace {
        Trace::Pie { .. } => return None,
        Trace::Scatter { points, trend } => {
            for p in points {
                g.points.push((cats.position(&p.x), p.y));
            }
            if let Some(fit) = trend {
                let (lo, hi) = min_max(g.points.iter().map(|p| p.0));
                g.lines.push(vec![(lo, fit.predict(lo)), (hi, fit.predict(hi))]);
            }
        }
        Trace::Bar { bars } => {
            let half = half_width(bars.iter().map(|b| &b.x));
            for b in bars {
                let x = cats.position(&b.x);
                g.rects.push(PlotRect {
                    x0: x - half,
                    y0: 0.0,
                    x1: x + half,
                    y1: b.value,
                    fill: Some(1.0),
                });
            }
        }
        Trace::Box { boxes } => {
            let half = half_width(boxes.iter().map(|b| &b.x)) * 0.6;
            for b in boxes {
                let x = cats.position(&b.x);
                let s = &b.stats;
                g.rects.push(PlotRect {
                    x0: x - half,
                    y0: s.q1,
                    x1: x + half,
                    y1: s.q3,
                    fill: None,
                });
                g.lines.push(vec![(x - half, s.median), (x + half, s.median)]);
                g.lines.push(vec![(x, s.lower_whisker), (x, s.q1)]);
                g.lines.push(vec![(x, s.q3), (x, s.upper_whisker)]);
                g.points.extend(s.outliers.iter().map(|&o| (x, o)));
            }
        }
        Trace::Histogram { bins, counts } => {
            for (i, &count) in counts.iter().enumerate() {
                let (x0, x1) = bin_span(bins, i, &mut cats);
                g.rects.push(PlotRect {
                    x0,
                    y0: 0.0,
                    x1,
                    y1: count as f64,
                    fill: Some(1.0),
                });
            }
        }
        Trace::Heatmap { x, y, counts } => {
            let max = counts.iter().flatten().copied().max().unwrap_or(0).max(1) as f64;
            let x_spans: Vec<(f64, f64)> = (0..x.len()).map(|i| bin_span(x, i, &mut cats)).collect();
            let mut y_cats = Categories::default();
            for (yi, row) in counts.iter().enumerate() {
                let (y0, y1) = bin_span(y, yi, &mut y_cats);
                for (xi, &count) in row.iter().enumerate() {
                    if count == 0 {
                        continue;
                    }
                    let (x0, x1) = x_spans[xi];
                    g.rects.push(PlotRect {
                        x0,
                        y0,
                        x1,
                        y1,
                        fill: Some(count as f64 / max),
                    });
                }
            }
        }
    }

    g.x_categories = cats.labels;
    let xs = g
        .points
        .iter()
        .map(|p| p.0)
        .chain(g.lines.iter().flatten().map(|p| p.0))
        .chain(g.rects.iter().flat_map(|r| [r.x0, r.x1]));
    g.x_bounds = padded(min_max(xs));
    let ys = g
        .points
        .iter()
        .map(|p| p.1)
        .chain(g.lines.iter().flatten().map(|p| p.1))
        .chain(g.rects.iter().flat_map(|r| [r.y0, r.y1]));
    g.y_bounds = padded(min_max(ys));
    Some(g)
}

/// Assigns integer positions to category labels in first-seen order.
#[derive(Default)]
struct Categories {
    labels: Vec<String>,
}

impl Categories {
    fn position(&mut self, d: &Datum) -> f64 {
        match d {
            Datum::Number(v) => *v,
            Datum::Label(s) => self.index_of(s) as f64,
        }
    }

    fn index_of(&mut self, s: &str) -> usize {
        match self.labels.iter().position(|l| l == s) {
            Some(i) => i,
            None => {
                self.labels.push(s.to_string());
                self.labels.len() - 1
            }
        }
    }
}

fn bin_span(axis: &BinAxis, idx: usize, cats: &mut Categories) -> (f64, f64) {
    match axis {
        BinAxis::Edges(e) => (e[idx], e[idx + 1]),
        BinAxis::Categories(c) => {
            let x = cats.index_of(&c[idx]) as f64;
            (x - BAR_WIDTH / 2.0, x + BAR_WIDTH / 2.0)
        }
    }
}

/// Half bar width: 40% of the smallest gap between numeric x values.
fn half_width<'a>(xs: impl Iterator<Item = &'a Datum>) -> f64 {
    let mut nums: Vec<f64> = xs
        .filter_map(|d| match d {
            Datum::Number(v) => Some(*v),
            Datum::Label(_) => None,
        })
        .collect();
    nums.sort_by(f64::total_cmp);
    let gap = nums
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|g| *g > 0.0)
        .fold(f64::INFINITY, f64::min);
    if gap.is_finite() { gap * BAR_WIDTH / 2.0 } else { BAR_WIDTH / 2.0 }
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

fn padded((lo, hi): (f64, f64)) -> [f64; 2] {
    if !lo.is_finite() || !hi.is_finite() {
        return [0.0, 1.0];
    }
    if hi - lo < 1e-12 {
        return [lo - 0.5, hi + 0.5];
    }
    let pad = (hi - lo) * 0.05;
    [lo - pad, hi + pad]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::render;
    use crate::domain::{ChartKind, Selection};
    use crate::io::read_dataset;
    use crate::view::resolve;

    const DATA: &str = "\
Date,Rented Bike Count,Hour,Seasons,Holiday,Functioning Day
01/12/2017,10,0,Winter,0,0
01/12/2017,20,1,Winter,1,0
01/12/2017,30,2,Winter,0,0
";

    #[test]
    fn categorical_bars_sit_on_integer_slots() {
        let ds = read_dataset(DATA.as_bytes()).unwrap();
        let view = resolve(&ds, Selection::Month(0)).unwrap();
        let spec = render(&view, "Holiday", "Rented Bike Count", ChartKind::Bar).unwrap();
        let g = geometry(&spec).unwrap();
        assert_eq!(g.x_categories, vec!["No Holiday", "Holiday"]);
        assert_eq!(g.rects.len(), 2);
        assert!((g.rects[1].x0 - 0.6).abs() < 1e-12);
        assert!(g.y_bounds[0] < 0.0 && g.y_bounds[1] > 40.0);
    }

    #[test]
    fn pie_has_no_cartesian_geometry() {
        let ds = read_dataset(DATA.as_bytes()).unwrap();
        let view = resolve(&ds, Selection::Month(0)).unwrap();
        let spec = render(&view, "Holiday", "Rented Bike Count", ChartKind::Pie).unwrap();
        assert!(geometry(&spec).is_none());
    }

    #[test]
    fn scatter_trend_spans_points() {
        let ds = read_dataset(DATA.as_bytes()).unwrap();
        let view = resolve(&ds, Selection::Month(0)).unwrap();
        let spec = render(&view, "Hour", "Rented Bike Count", ChartKind::Scatter).unwrap();
        let g = geometry(&spec).unwrap();
        assert_eq!(g.points.len(), 3);
        assert_eq!(g.lines[0][0].0, 0.0);
        assert_eq!(g.lines[0][1].0, 2.0);
    }
}
