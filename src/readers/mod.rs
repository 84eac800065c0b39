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
//! Readers for the different log formats. Each reader returns `Ok(None)` if the input file does
//! not exist, and an error if the file cannot be read or parsed.
use std::path::Path;

mod csv_log;
mod iperf;
mod qlog;

pub use csv_log::{read_capacity, read_column, read_rates, read_target, RATE_COLUMN};
pub use iperf::{read_iperf, IperfInterval, IperfReport, IperfSum};
pub use qlog::{parse_line, read_qlog, QlogData, QlogEvent, QlogFrame, QlogMetrics, QlogRaw};

/// Check whether the input exists, logging skipped files.
pub(crate) fn exists(path: &Path) -> bool {
    if path.exists() {
        log::debug!("Reading {}", path.display());
        true
    } else {
        log::info!("Skipping {}: file does not exist", path.display());
        false
    }
}
