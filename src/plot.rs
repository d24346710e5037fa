//! Line charts for metric series, drawn on a character grid.
//!
//! A [`ChartViewer`] decides where a chart goes. [`TerminalViewer`] writes it
//! to a terminal and blocks until the user dismisses it with Enter.

use crate::error::KSelectError;
use crate::selection::MetricSeries;
use std::io::{self, BufRead, StdinLock, Stdout, Write};

const MARKER: char = '*';
const TRACE: char = '.';

/// A titled 2-D line chart
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Points in drawing order; consecutive points are joined by a segment
    pub points: Vec<(f64, f64)>,
}

impl LineChart {
    pub fn new(
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
        points: Vec<(f64, f64)>,
    ) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            points,
        }
    }

    /// Render the chart with a plot area of `width` x `height` cells.
    pub fn render<W>(&self, mut w: W, width: usize, height: usize) -> Result<(), KSelectError>
    where
        W: Write,
    {
        if self.points.is_empty() {
            return Err(KSelectError::InvalidChart(format!(
                "\"{}\" has no points",
                self.title
            )));
        }
        if self
            .points
            .iter()
            .any(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(KSelectError::InvalidChart(format!(
                "\"{}\" has non-finite points",
                self.title
            )));
        }
        if width < 8 || height < 3 {
            return Err(KSelectError::InvalidChart(format!(
                "plot area {}x{} is too small",
                width, height
            )));
        }

        let (x_min, x_max) = padded_bounds(self.points.iter().map(|p| p.0));
        let (y_min, y_max) = padded_bounds(self.points.iter().map(|p| p.1));

        let to_cell = |(x, y): (f64, f64)| -> (usize, usize) {
            let col = ((x - x_min) / (x_max - x_min) * (width - 1) as f64).round() as usize;
            let row = ((y_max - y) / (y_max - y_min) * (height - 1) as f64).round() as usize;
            (col.min(width - 1), row.min(height - 1))
        };
        let cells: Vec<(usize, usize)> = self.points.iter().copied().map(to_cell).collect();

        let mut grid = vec![vec![' '; width]; height];
        for pair in cells.windows(2) {
            draw_segment(&mut grid, pair[0], pair[1]);
        }
        for &(col, row) in &cells {
            grid[row][col] = MARKER;
        }

        let y_ticks = [
            (0, y_max),
            ((height - 1) / 2, (y_max + y_min) / 2.0),
            (height - 1, y_min),
        ];
        let tick_width = y_ticks
            .iter()
            .map(|(_, v)| format_value(*v).len())
            .max()
            .unwrap_or(0);

        writeln!(w, "{:^total$}", self.title, total = tick_width + 2 + width)?;
        writeln!(w, "{}", self.y_label)?;

        for (row_idx, row) in grid.iter().enumerate() {
            let line: String = row.iter().collect();
            match y_ticks.iter().find(|(r, _)| *r == row_idx) {
                Some((_, value)) => writeln!(
                    w,
                    "{:>tick_width$} +{}",
                    format_value(*value),
                    line.trim_end()
                )?,
                None => writeln!(w, "{:>tick_width$} |{}", "", line.trim_end())?,
            }
        }

        writeln!(w, "{:>tick_width$} +{}", "", "-".repeat(width))?;
        writeln!(
            w,
            "{:>tick_width$}  {}",
            "",
            x_tick_line(&self.points, &cells, width).trim_end()
        )?;
        writeln!(w, "{:>tick_width$}  {:^width$}", "", self.x_label)?;

        Ok(())
    }
}

impl From<&MetricSeries> for LineChart {
    fn from(series: &MetricSeries) -> Self {
        let metric = series.metric();
        LineChart::new(
            metric.title(),
            "Number of clusters",
            metric.label(),
            series
                .points()
                .iter()
                .map(|&(k, value)| (k as f64, value))
                .collect(),
        )
    }
}

/// Min and max of the values, widened when they coincide
fn padded_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if max > min {
        (min, max)
    } else {
        let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.1 };
        (min - pad, max + pad)
    }
}

fn draw_segment(grid: &mut [Vec<char>], from: (usize, usize), to: (usize, usize)) {
    let (c0, r0) = (from.0 as f64, from.1 as f64);
    let (c1, r1) = (to.0 as f64, to.1 as f64);
    let steps = (c1 - c0).abs().max((r1 - r0).abs()) as usize;

    for step in 1..steps {
        let t = step as f64 / steps as f64;
        let col = (c0 + (c1 - c0) * t).round() as usize;
        let row = (r0 + (r1 - r0) * t).round() as usize;
        grid[row][col] = TRACE;
    }
}

/// Tick labels under each point, skipping labels that would overlap
fn x_tick_line(points: &[(f64, f64)], cells: &[(usize, usize)], width: usize) -> String {
    let mut line = vec![' '; width + 8];
    let mut next_free = 0;

    for (&(x, _), &(col, _)) in points.iter().zip(cells) {
        let label = format_value(x);
        if col < next_free || col + label.len() > line.len() {
            continue;
        }
        for (offset, ch) in label.chars().enumerate() {
            line[col + offset] = ch;
        }
        next_free = col + label.len() + 1;
    }

    line.into_iter().collect()
}

fn format_value(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e9 {
        format!("{}", v as i64)
    } else if v.abs() >= 100.0 {
        format!("{:.1}", v)
    } else {
        format!("{:.3}", v)
    }
}

/// Something that can present a chart to a human
pub trait ChartViewer {
    /// Present `chart`, returning once it has been dismissed
    fn show(&mut self, chart: &LineChart) -> Result<(), KSelectError>;
}

/// Draws charts on a terminal and waits for Enter before returning.
///
/// End of input also dismisses the chart, so a closed stdin never blocks.
pub struct TerminalViewer<R, W> {
    input: R,
    output: W,
    width: usize,
    height: usize,
}

impl TerminalViewer<StdinLock<'static>, Stdout> {
    /// Viewer bound to the process's stdin and stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R, W> TerminalViewer<R, W>
where
    R: BufRead,
    W: Write,
{
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            width: 60,
            height: 20,
        }
    }

    /// Set the plot area size in character cells
    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R, W> ChartViewer for TerminalViewer<R, W>
where
    R: BufRead,
    W: Write,
{
    fn show(&mut self, chart: &LineChart) -> Result<(), KSelectError> {
        chart.render(&mut self.output, self.width, self.height)?;
        writeln!(self.output)?;
        write!(self.output, "Press Enter to continue...")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        writeln!(self.output)?;

        tracing::debug!(title = %chart.title, "chart dismissed");
        Ok(())
    }
}
