// NetPlot: Charts of Throughput, Congestion Window, and RTT from Network Experiment Logs
// Copyright (C) 2024-2025 Roland Schmid <roschmi@ethz.ch> and Tibor Schneider <sctibor@ethz.ch>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//! Charts of one or more labeled time series, rendered into PNG files.
//!
//! A [`Chart`] accumulates series, and is written to a file with [`Chart::render`]. The chart
//! builders in this module ([`RatesChart`], [`CwndChart`], [`BytesInFlightChart`], [`RttChart`],
//! and [`TcpChart`]) read the logs of an experiment and add the matching series to their chart.
use std::{
    fmt::Display,
    ops::Range,
    path::{Path, PathBuf},
};

use plotters::prelude::*;

use crate::{
    series::TimeSeries,
    util::{self, PathBufExt},
    Ingest, PlotError,
};

mod format;
mod qlog;
mod rates;
mod tcp;

pub use format::{eng_format, format_elapsed};
pub use qlog::{BytesInFlightChart, CwndChart, PacketsChart, RttChart};
pub use rates::RatesChart;
pub use tcp::TcpChart;

/// Default resolution of the rendered images.
pub const DEFAULT_DPI: u32 = 400;
/// Font size of all text, in points.
const FONT_PT: f64 = 10.0;
/// Line width of series drawn without an explicit width, in points.
const DEFAULT_LINE_PT: f64 = 1.5;

/// Matplotlib's default color cycle.
const COLORS: [RGBColor; 10] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0x8c, 0x56, 0x4b),
    RGBColor(0xe3, 0x77, 0xc2),
    RGBColor(0x7f, 0x7f, 0x7f),
    RGBColor(0xbc, 0xbd, 0x22),
    RGBColor(0x17, 0xbe, 0xcf),
];

/// How a series is connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeriesStyle {
    /// Straight lines between consecutive samples.
    #[default]
    Line,
    /// Each value is held until the next sample (a step function).
    Step,
}

/// A labeled series on a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    pub label: String,
    pub data: TimeSeries,
    pub style: SeriesStyle,
    /// Line width in points.
    pub line_width: f64,
}

impl PlotSeries {
    /// Points of the polyline to draw.
    fn points(&self) -> Vec<(f64, f64)> {
        match self.style {
            SeriesStyle::Line => self.data.iter().collect(),
            SeriesStyle::Step => {
                let mut points = Vec::with_capacity(self.data.len() * 2);
                let mut last: Option<f64> = None;
                for (time, value) in self.data.iter() {
                    if let Some(prev) = last {
                        points.push((time, prev));
                    }
                    points.push((time, value));
                    last = Some(value);
                }
                points
            }
        }
    }
}

/// Size of the figure in inches, and its resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartSize {
    pub width: f64,
    pub height: f64,
    pub dpi: u32,
}

impl ChartSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            dpi: DEFAULT_DPI,
        }
    }

    pub fn pixels(&self) -> (u32, u32) {
        (
            (self.width * self.dpi as f64).round() as u32,
            (self.height * self.dpi as f64).round() as u32,
        )
    }

    /// Convert a length in points into pixels.
    fn px(&self, pt: f64) -> f64 {
        pt * self.dpi as f64 / 72.0
    }
}

/// A figure holding labeled time series over a common time axis.
#[derive(Debug, Clone)]
pub struct Chart {
    name: String,
    file_name: String,
    x_label: String,
    y_label: String,
    unit: String,
    size: ChartSize,
    series: Vec<PlotSeries>,
}

impl Chart {
    /// Create an empty chart that will be written to `<name>.png`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            file_name: format!("{name}.png"),
            name,
            x_label: "Time".to_string(),
            y_label: String::new(),
            unit: String::new(),
            size: ChartSize::new(8.0, 2.0),
            series: Vec::new(),
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn with_labels(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    /// Set the unit of the y axis, used by the engineering formatter of the tick labels.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_size(mut self, size: ChartSize) -> Self {
        self.size = size;
        self
    }

    pub fn set_dpi(&mut self, dpi: u32) {
        self.size.dpi = dpi;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn size(&self) -> ChartSize {
        self.size
    }

    pub fn series(&self) -> &[PlotSeries] {
        &self.series
    }

    /// Find a series by its label.
    pub fn get(&self, label: &str) -> Option<&TimeSeries> {
        self.series.iter().find(|s| s.label == label).map(|s| &s.data)
    }

    /// Add a series to the chart. Empty series are not added, such that the legend only contains
    /// series that are actually drawn. Returns whether the series was added.
    pub fn add_series(
        &mut self,
        label: impl Into<String>,
        data: TimeSeries,
        style: SeriesStyle,
        line_width: Option<f64>,
    ) -> bool {
        let label = label.into();
        if data.is_empty() {
            log::warn!("{}: no samples for {label}", self.name);
            return false;
        }
        log::debug!("{}: adding {label} with {} samples", self.name, data.len());
        self.series.push(PlotSeries {
            label,
            data,
            style,
            line_width: line_width.unwrap_or(DEFAULT_LINE_PT),
        });
        true
    }

    /// Add the result of a reader as a single series.
    pub(crate) fn ingest(
        &mut self,
        data: Option<TimeSeries>,
        label: impl Into<String>,
        style: SeriesStyle,
        line_width: Option<f64>,
    ) -> Ingest {
        let Some(data) = data else {
            return Ingest::Absent;
        };
        if self.add_series(label, data, style, line_width) {
            Ingest::Added
        } else {
            Ingest::Empty
        }
    }

    fn x_range(&self) -> Range<f64> {
        let range = self
            .series
            .iter()
            .filter_map(|s| s.data.time_range())
            .reduce(|(a0, a1), (b0, b1)| (a0.min(b0), a1.max(b1)));
        match range {
            None => 0.0..1000.0,
            Some((lo, hi)) if hi - lo < 1.0 => lo - 500.0..hi + 500.0,
            Some((lo, hi)) => lo..hi,
        }
    }

    fn y_range(&self) -> Range<f64> {
        let range = self
            .series
            .iter()
            .filter_map(|s| s.data.value_range())
            .reduce(|(a0, a1), (b0, b1)| (a0.min(b0), a1.max(b1)));
        let (lo, hi) = range.unwrap_or((0.0, 1.0));
        let lo = lo.min(0.0);
        let hi = hi.max(0.0);
        if hi - lo <= f64::EPSILON {
            lo..lo + 1.0
        } else {
            lo..hi + (hi - lo) / 20.0
        }
    }

    /// Render the chart into `<output_dir>/<file_name>`, overwriting any existing file. The
    /// output directory must exist. Returns the path of the written image.
    pub fn render(&self, output_dir: impl AsRef<Path>) -> Result<PathBuf, PlotError> {
        let output_dir = output_dir.as_ref();
        if !output_dir.is_dir() {
            return Err(PlotError::MissingOutputDir(output_dir.to_path_buf()));
        }
        let path = output_dir.then(&self.file_name);
        self.draw(&path)?;
        log::info!("Wrote {}", path.display());
        Ok(path)
    }

    /// Draw the chart into the bitmap at `path`. The backend holds on to `path` until it is
    /// dropped at the end of this function.
    fn draw(&self, path: &Path) -> Result<(), PlotError> {
        let text = util::text_available();

        let font_px = self.size.px(FONT_PT).round() as u32;
        let font = ("sans-serif", font_px as f64);

        let root = BitMapBackend::new(path, self.size.pixels()).into_drawing_area();
        root.fill(&WHITE).map_err(drawing)?;

        let mut builder = ChartBuilder::on(&root);
        builder.margin(font_px);
        if text {
            builder
                .x_label_area_size(font_px * 3)
                .y_label_area_size(font_px * 7);
        }
        let mut chart = builder
            .build_cartesian_2d(self.x_range(), self.y_range())
            .map_err(drawing)?;

        if text {
            let unit = self.unit.as_str();
            chart
                .configure_mesh()
                .light_line_style(WHITE)
                .x_desc(self.x_label.as_str())
                .y_desc(self.y_label.as_str())
                .x_label_formatter(&|x| format_elapsed(*x))
                .y_label_formatter(&|y| eng_format(*y, unit))
                .label_style(font)
                .axis_desc_style(font)
                .draw()
                .map_err(drawing)?;
        }

        for (idx, series) in self.series.iter().enumerate() {
            let style = COLORS[idx % COLORS.len()]
                .stroke_width(self.size.px(series.line_width).round().max(1.0) as u32);
            let legend_len = font_px as i32 * 2;
            chart
                .draw_series(LineSeries::new(series.points(), style))
                .map_err(drawing)?
                .label(series.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + legend_len, y)], style));
        }

        if text && !self.series.is_empty() {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .label_font(font)
                .draw()
                .map_err(drawing)?;
        }

        root.present().map_err(drawing)?;
        Ok(())
    }
}

fn drawing(e: impl Display) -> PlotError {
    PlotError::Drawing(e.to_string())
}

#[cfg(test)]
mod test {
    use super::*;

    fn series(points: &[(f64, f64)]) -> TimeSeries {
        points.iter().copied().collect()
    }

    #[test]
    fn empty_series_are_skipped() {
        let mut chart = Chart::new("test");
        assert!(!chart.add_series("empty", TimeSeries::new(), SeriesStyle::Line, None));
        assert!(chart.add_series("one", series(&[(0.0, 1.0)]), SeriesStyle::Line, None));
        assert_eq!(chart.series().len(), 1);
        assert_eq!(chart.ingest(None, "absent", SeriesStyle::Line, None), Ingest::Absent);
        assert_eq!(
            chart.ingest(Some(TimeSeries::new()), "x", SeriesStyle::Line, None),
            Ingest::Empty
        );
        assert_eq!(chart.series().len(), 1);
    }

    #[test]
    fn step_points() {
        let s = PlotSeries {
            label: "Capacity".to_string(),
            data: series(&[(0.0, 1.0), (1000.0, 2.0), (3000.0, 0.5)]),
            style: SeriesStyle::Step,
            line_width: 0.5,
        };
        assert_eq!(
            s.points(),
            vec![
                (0.0, 1.0),
                (1000.0, 1.0),
                (1000.0, 2.0),
                (3000.0, 2.0),
                (3000.0, 0.5)
            ]
        );
    }

    #[test]
    fn ranges() {
        let mut chart = Chart::new("test");
        assert_eq!(chart.x_range(), 0.0..1000.0);
        assert_eq!(chart.y_range(), 0.0..1.0);

        chart.add_series("a", series(&[(0.0, 1000.0)]), SeriesStyle::Line, None);
        assert_eq!(chart.x_range(), -500.0..500.0);
        assert_eq!(chart.y_range(), 0.0..1050.0);

        chart.add_series("b", series(&[(2000.0, -100.0)]), SeriesStyle::Line, None);
        assert_eq!(chart.x_range(), 0.0..2000.0);
        assert_eq!(chart.y_range(), -100.0..1055.0);
    }

    #[test]
    fn pixels() {
        assert_eq!(ChartSize::new(8.0, 2.0).pixels(), (3200, 800));
        let mut chart = Chart::new("rates").with_size(ChartSize::new(9.0, 4.0));
        chart.set_dpi(100);
        assert_eq!(chart.size().pixels(), (900, 400));
        assert_eq!(chart.file_name(), "rates.png");
    }

    #[test]
    fn render_requires_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let chart = Chart::new("test");
        assert!(matches!(
            chart.render(dir.path().join("missing")),
            Err(PlotError::MissingOutputDir(_))
        ));
    }
}
