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
//! Sent and received RTP rates, together with the target bitrate of the congestion controller and
//! the capacity of the bottleneck link.
use std::path::{Path, PathBuf};

use super::{Chart, ChartSize, SeriesStyle};
use crate::{readers, Ingest, PlotError};

const LINE_WIDTH: Option<f64> = Some(0.5);

#[derive(Debug, Clone)]
pub struct RatesChart {
    chart: Chart,
}

impl RatesChart {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            chart: Chart::new(name)
                .with_labels("time", "rate")
                .with_unit("bit/s")
                .with_size(ChartSize::new(8.0, 2.0)),
        }
    }

    /// Add the rate of an RTP packet log, in bit/s summed per second. `basetime` is the
    /// start of the experiment in milliseconds since the epoch.
    pub fn add_rtp(
        &mut self,
        file: impl AsRef<Path>,
        basetime: f64,
        label: &str,
    ) -> Result<Ingest, PlotError> {
        let data = readers::read_rates(file, basetime)?;
        Ok(self.chart.ingest(data, label, SeriesStyle::Line, LINE_WIDTH))
    }

    /// Add the target bitrate of a congestion controller log.
    pub fn add_cc(&mut self, file: impl AsRef<Path>, basetime: f64) -> Result<Ingest, PlotError> {
        let data = readers::read_target(file, basetime)?;
        Ok(self
            .chart
            .ingest(data, "Target Bitrate", SeriesStyle::Line, LINE_WIDTH))
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
            .ingest(data, "Capacity", SeriesStyle::Step, LINE_WIDTH))
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
