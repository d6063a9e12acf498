//! SVG geometry for the four charts. Everything here is absolute pixel
//! coordinates; `visualizations.html` only draws what it is given.

use serde::Serialize;

use crate::charts::aggregate::{AbsencePoint, BoxStats, CareerCount, Performers};

const WIDTH: f64 = 760.0;
const SCORE_MAX: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub pos: f64,
    pub label: String,
}

/// Maps `[0, max]` onto `[start, end]`; `end < start` flips the axis.
#[derive(Debug, Clone, Copy)]
struct Scale {
    max: f64,
    start: f64,
    end: f64,
}

impl Scale {
    fn map(&self, v: f64) -> f64 {
        let t = if self.max > 0.0 { v.clamp(0.0, self.max) / self.max } else { 0.0 };
        round1(self.start + t * (self.end - self.start))
    }

    fn ticks(&self, step: f64) -> Vec<Tick> {
        let count = (self.max / step).round() as usize;
        (0..=count)
            .map(|i| {
                let v = i as f64 * step;
                Tick {
                    pos: self.map(v),
                    label: format_number(v),
                }
            })
            .collect()
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn format_number(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.1}")
    }
}

/// Smallest 1/2/5 × 10^k step giving at most `max_ticks` intervals up to `max`.
fn nice_step(max: f64, max_ticks: usize) -> f64 {
    if max <= 0.0 {
        return 1.0;
    }
    let raw = max / max_ticks as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|step| *step >= raw)
        .unwrap_or(10.0 * magnitude)
}

/// `max` rounded up to a whole number of nice steps.
fn nice_axis(max: f64, max_ticks: usize) -> (f64, f64) {
    let step = nice_step(max, max_ticks);
    let top = (max / step).ceil().max(1.0) * step;
    (top, step)
}

// ────────────────────────────────────────────────────────────────────────────
// 1. Top vs bottom performers (horizontal bars)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HBar {
    pub y: f64,
    pub width: f64,
    pub label: String,
    pub value: String,
    pub group: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformersPlot {
    pub width: f64,
    pub height: f64,
    pub plot: Rect,
    pub bar_height: f64,
    pub bars: Vec<HBar>,
    pub x_ticks: Vec<Tick>,
}

pub fn performers_plot(performers: &Performers) -> PerformersPlot {
    const ROW: f64 = 22.0;
    let rows = performers.top.len() + performers.bottom.len();
    let plot = Rect {
        x: 200.0,
        y: 40.0,
        w: WIDTH - 240.0,
        h: ROW * rows.max(1) as f64,
    };
    let x = Scale {
        max: SCORE_MAX,
        start: plot.x,
        end: plot.right(),
    };

    let groups = performers
        .top
        .iter()
        .map(|p| (p, "top"))
        .chain(performers.bottom.iter().map(|p| (p, "bottom")));
    let bars = groups
        .enumerate()
        .map(|(i, (p, group))| HBar {
            y: round1(plot.y + i as f64 * ROW + 3.0),
            width: round1(x.map(p.average) - plot.x),
            label: p.name.clone(),
            value: format!("{:.1}", p.average),
            group,
        })
        .collect();

    PerformersPlot {
        width: WIDTH,
        height: plot.bottom() + 40.0,
        plot,
        bar_height: ROW - 6.0,
        bars,
        x_ticks: x.ticks(10.0),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// 2. Absence days vs average score (scatter)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dot {
    pub cx: f64,
    pub cy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPlot {
    pub width: f64,
    pub height: f64,
    pub plot: Rect,
    pub dots: Vec<Dot>,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
}

pub fn scatter_plot(points: &[AbsencePoint]) -> ScatterPlot {
    let plot = Rect {
        x: 60.0,
        y: 30.0,
        w: WIDTH - 100.0,
        h: 300.0,
    };
    let max_absence = points.iter().map(|p| p.absence_days).fold(0.0, f64::max);
    let (x_max, x_step) = nice_axis(max_absence, 10);
    let x = Scale {
        max: x_max,
        start: plot.x,
        end: plot.right(),
    };
    let y = Scale {
        max: SCORE_MAX,
        start: plot.bottom(),
        end: plot.y,
    };

    ScatterPlot {
        width: WIDTH,
        height: plot.bottom() + 50.0,
        plot,
        dots: points
            .iter()
            .map(|p| Dot {
                cx: x.map(p.absence_days),
                cy: y.map(p.average),
            })
            .collect(),
        x_ticks: x.ticks(x_step),
        y_ticks: y.ticks(20.0),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// 3. Career aspirations (vertical bars)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VBar {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareerPlot {
    pub width: f64,
    pub height: f64,
    pub plot: Rect,
    pub bars: Vec<VBar>,
    pub y_ticks: Vec<Tick>,
}

pub fn career_plot(counts: &[CareerCount]) -> CareerPlot {
    let plot = Rect {
        x: 60.0,
        y: 30.0,
        w: WIDTH - 100.0,
        h: 260.0,
    };
    let max_count = counts.iter().map(|c| c.count).max().unwrap_or(0) as f64;
    let (y_max, y_step) = nice_axis(max_count, 8);
    // Counts are whole students; never tick at fractions.
    let y_step = y_step.max(1.0);
    let y = Scale {
        max: y_max,
        start: plot.bottom(),
        end: plot.y,
    };

    let slot = plot.w / counts.len().max(1) as f64;
    let bars = counts
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let top = y.map(c.count as f64);
            VBar {
                x: round1(plot.x + i as f64 * slot + slot * 0.15),
                y: top,
                width: round1(slot * 0.7),
                height: round1(plot.bottom() - top),
                label: c.career.clone(),
                count: c.count,
            }
        })
        .collect();

    CareerPlot {
        width: WIDTH,
        height: plot.bottom() + 120.0,
        plot,
        bars,
        y_ticks: y.ticks(y_step),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// 4. Per-subject score distribution (boxplot)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxGlyph {
    pub label: &'static str,
    pub x: f64,
    pub left: f64,
    pub box_width: f64,
    pub whisker_low: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxPlot {
    pub width: f64,
    pub height: f64,
    pub plot: Rect,
    pub boxes: Vec<BoxGlyph>,
    pub y_ticks: Vec<Tick>,
}

pub fn box_plot(stats: &[BoxStats]) -> BoxPlot {
    let plot = Rect {
        x: 60.0,
        y: 30.0,
        w: WIDTH - 100.0,
        h: 300.0,
    };
    let y = Scale {
        max: SCORE_MAX,
        start: plot.bottom(),
        end: plot.y,
    };
    let slot = plot.w / stats.len().max(1) as f64;
    let box_width = round1(slot * 0.5);

    let boxes = stats
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let x = round1(plot.x + (i as f64 + 0.5) * slot);
            BoxGlyph {
                label: s.subject,
                x,
                left: round1(x - box_width / 2.0),
                box_width,
                whisker_low: y.map(s.whisker_low),
                q1: y.map(s.q1),
                median: y.map(s.median),
                q3: y.map(s.q3),
                whisker_high: y.map(s.whisker_high),
                outliers: s.outliers.iter().map(|v| y.map(*v)).collect(),
            }
        })
        .collect();

    BoxPlot {
        width: WIDTH,
        height: plot.bottom() + 60.0,
        plot,
        boxes,
        y_ticks: y.ticks(20.0),
    }
}
