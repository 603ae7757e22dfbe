//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal or CI log
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - points (scatter, box outliers): `o`
//! - lines (trend, medians, whiskers): `.`
//! - filled rectangles (bars, bins): `#`, heat cells by intensity
//! - outlined rectangles (boxes): `|` and `-`

use crate::chart::{ChartSpec, Trace};
use crate::plot::{PlotGeometry, geometry};

/// Density ramp for heatmap cells, lightest to darkest.
const SHADES: &[u8] = b".:-=+*%@";

/// Render a chart spec as text.
pub fn render_ascii_chart(spec: &ChartSpec, width: usize, height: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} [{}]\n", spec.title, spec.kind.display_name()));

    if let Some(note) = &spec.annotation {
        out.push_str(&format!("({note})\n"));
        return out;
    }

    if let Trace::Pie { slices } = &spec.trace {
        let bar_width = width.saturating_sub(30).max(10);
        for s in slices {
            let filled = (s.share * bar_width as f64).round() as usize;
            out.push_str(&format!(
                "{:<16} {:>6.1}% {}\n",
                truncate(&s.label, 16),
                s.share * 100.0,
                "#".repeat(filled)
            ));
        }
        return out;
    }

    match geometry(spec) {
        Some(g) => {
            out.push_str(&render_grid(&g, width, height));
            out.push_str(&format!(
                "x: {}   y: {}\n",
                spec.layout.xaxis.title, spec.layout.yaxis.title
            ));
        }
        None => out.push_str("(nothing to draw)\n"),
    }
    out
}

fn render_grid(g: &PlotGeometry, width: usize, height: usize) -> String {
    let width = width.max(20);
    let height = height.max(6);
    let mut grid = vec![vec![b' '; width]; height];

    let [x0, x1] = g.x_bounds;
    let [y0, y1] = g.y_bounds;
    let col = |x: f64| -> usize { (((x - x0) / (x1 - x0)) * (width - 1) as f64).round().clamp(0.0, (width - 1) as f64) as usize };
    let row = |y: f64| -> usize {
        let r = (((y - y0) / (y1 - y0)) * (height - 1) as f64).round().clamp(0.0, (height - 1) as f64) as usize;
        height - 1 - r
    };

    for r in &g.rects {
        let (c0, c1) = (col(r.x0.min(r.x1)), col(r.x0.max(r.x1)));
        let (r_top, r_bot) = (row(r.y0.max(r.y1)), row(r.y0.min(r.y1)));
        for (rr, line) in grid.iter_mut().enumerate().take(r_bot + 1).skip(r_top) {
            for (cc, cell) in line.iter_mut().enumerate().take(c1 + 1).skip(c0) {
                match r.fill {
                    Some(f) if f >= 1.0 => *cell = b'#',
                    Some(f) => {
                        let idx = ((f * (SHADES.len() - 1) as f64).round() as usize).min(SHADES.len() - 1);
                        *cell = SHADES[idx];
                    }
                    None => {
                        if cc == c0 || cc == c1 {
                            *cell = b'|';
                        } else if rr == r_top || rr == r_bot {
                            *cell = b'-';
                        }
                    }
                }
            }
        }
    }

    for line in &g.lines {
        for seg in line.windows(2) {
            let (a, b) = (seg[0], seg[1]);
            let steps = width.max(height) * 2;
            for i in 0..=steps {
                let u = i as f64 / steps as f64;
                let (x, y) = (a.0 + (b.0 - a.0) * u, a.1 + (b.1 - a.1) * u);
                let cell = &mut grid[row(y)][col(x)];
                if *cell == b' ' {
                    *cell = b'.';
                }
            }
        }
    }

    for &(x, y) in &g.points {
        grid[row(y)][col(x)] = b'o';
    }

    let mut out = String::new();
    let y_hi = format!("{:.1}", y1);
    let y_lo = format!("{:.1}", y0);
    let pad = y_hi.len().max(y_lo.len());
    for (i, line) in grid.iter().enumerate() {
        let label = if i == 0 {
            y_hi.as_str()
        } else if i == height - 1 {
            y_lo.as_str()
        } else {
            ""
        };
        out.push_str(&format!("{label:>pad$} |"));
        out.push_str(&String::from_utf8_lossy(line));
        out.push('\n');
    }
    out.push_str(&format!("{:>pad$} +{}\n", "", "-".repeat(width)));

    if g.x_categories.is_empty() {
        let lo = format!("{:.1}", x0);
        let hi = format!("{:.1}", x1);
        let gap = width.saturating_sub(lo.len() + hi.len());
        out.push_str(&format!("{:>pad$}  {lo}{}{hi}\n", "", " ".repeat(gap)));
    } else {
        let cats: Vec<String> = g
            .x_categories
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{i}={c}"))
            .collect();
        out.push_str(&format!("{:>pad$}  {}\n", "", cats.join("  ")));
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max.saturating_sub(1)).chain(['…']).collect()
    }
}
