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
//! JSON reports as written by `iperf3 --json`.
use std::{fs, path::Path};

use serde::Deserialize;

use crate::{
    series::{Aggregation, TimeSeries, BUCKET_MS},
    PlotError,
};

#[derive(Debug, Clone, Deserialize)]
pub struct IperfReport {
    pub intervals: Vec<IperfInterval>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IperfInterval {
    pub sum: IperfSum,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IperfSum {
    /// Start of the interval, in seconds since the start of the test.
    pub start: f64,
    pub bits_per_second: f64,
}

/// Read the throughput of an iperf report, averaged per second.
pub fn read_iperf(path: impl AsRef<Path>) -> Result<Option<TimeSeries>, PlotError> {
    let path = path.as_ref();
    if !super::exists(path) {
        return Ok(None);
    }

    let report: IperfReport =
        serde_json::from_str(&fs::read_to_string(path)?).map_err(|source| PlotError::Json {
            path: path.to_path_buf(),
            line: source.line(),
            source,
        })?;

    Ok(Some(
        report
            .intervals
            .iter()
            .map(|i| (i.sum.start * 1000.0, i.sum.bits_per_second))
            .collect::<TimeSeries>()
            .resample(BUCKET_MS, Aggregation::Mean),
    ))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn intervals_are_averaged_per_second() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("iperf.json");
        fs::write(
            &path,
            r#"{
                "start": {"version": "iperf 3.9"},
                "intervals": [
                    {"streams": [], "sum": {"start": 0, "end": 0.5, "bits_per_second": 1000000.0}},
                    {"streams": [], "sum": {"start": 0.5, "end": 1.0, "bits_per_second": 3000000.0}},
                    {"streams": [], "sum": {"start": 1.0, "end": 2.0, "bits_per_second": 5e6}}
                ],
                "end": {}
            }"#,
        )
        .unwrap();

        let series = read_iperf(&path).unwrap().unwrap();
        assert_eq!(
            series.iter().collect::<Vec<_>>(),
            vec![(0.0, 2_000_000.0), (1000.0, 5_000_000.0)]
        );
    }

    #[test]
    fn missing_intervals_are_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("iperf.json");
        fs::write(&path, r#"{"error": "unable to connect to server"}"#).unwrap();
        assert!(matches!(read_iperf(&path), Err(PlotError::Json { .. })));
        assert!(read_iperf(dir.path().join("other.json")).unwrap().is_none());
    }
}
