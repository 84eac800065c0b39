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
//! Throughput of TCP flows measured with iperf, together with the capacity of the bottleneck.
use std::path::{Path, PathBuf};

use super::{Chart, ChartSize, SeriesStyle};
use crate::{readers, Ingest, PlotError};

const LINE_WIDTH: Option<f64> = Some(0.5);

#[derive(Debug, Clone)]
pub struct TcpChart {
    chart: Chart,
}

impl TcpChart {
    /// Create a chart that will be written to `<name>-plot.png`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            chart: Chart::new(name.as_str())
                .with_file_name(format!("{name}-plot.png"))
                .with_labels("Time", "Rate")
                .with_unit("bit/s")
                .with_size(ChartSize::new(8.0, 2.0)),
        }
    }

    /// Add the capacity of the bottleneck link, as logged by the router.
    pub fn add_router(
        &mut self,
        file: impl AsRef<Path>,
        basetime: f64,
    ) -> Result<Ingest, PlotError> {
        let data = readers::read_capacity(file, basetime)?;
        Ok(self
            .chart
            .ingest(data, "Bandwidth", SeriesStyle::Step, LINE_WIDTH))
    }

    /// Add the throughput of an iperf JSON report.
    pub fn add(&mut self, file: impl AsRef<Path>, label: &str) -> Result<Ingest, PlotError> {
        let data = readers::read_iperf(file)?;
        Ok(self.chart.ingest(data, label, SeriesStyle::Line, LINE_WIDTH))
    }

    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    pub fn chart_mut(&mut self) -> &mut Chart {
        &mut self.chart
    }

    pub fn render(&self, output_dir: impl AsRef<Path>) -> Result<PathBuf, PlotError> {
        self.chart.render(output_dir)
    }
}
