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
//! Library for rendering time-series charts from logged network experiments (RTP rate logs, qlog
//! event logs, and iperf interval reports), and for assembling an HTML index of the charts.
use std::path::PathBuf;

pub mod chart;
pub mod readers;
pub mod report;
pub mod series;
pub mod util;

#[cfg(test)]
mod test;

#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON Error in {path:?} (line {line}): {source}")]
    Json {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },
    #[error("Invalid value {value:?} in column {column} of {path:?}")]
    InvalidValue {
        path: PathBuf,
        column: usize,
        value: String,
    },
    #[error("Missing column {column} in {path:?}")]
    MissingColumn { path: PathBuf, column: usize },
    #[error("Could not read the template {0:?}: {1}")]
    Template(PathBuf, std::io::Error),
    #[error("The output directory {0:?} does not exist")]
    MissingOutputDir(PathBuf),
    #[error("Drawing Error: {0}")]
    Drawing(String),
}

/// Outcome of adding a log file to a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ingest {
    /// At least one series was added to the chart.
    Added,
    /// The file exists, but it contains no matching samples.
    Empty,
    /// The file does not exist.
    Absent,
}

impl Ingest {
    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added)
    }
}

pub mod prelude {
    pub use super::{
        chart::{
            BytesInFlightChart, Chart, CwndChart, PacketsChart, RatesChart, RttChart, SeriesStyle,
            TcpChart,
        },
        report::generate_html,
        series::{Aggregation, Sample, TimeSeries},
        Ingest, PlotError,
    };
}
