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
//! Headerless CSV logs whose first column is an epoch timestamp in milliseconds.
use std::path::Path;

use crate::{
    series::{Aggregation, TimeSeries, BUCKET_MS},
    PlotError,
};

/// Column of the RTP packet logs holding the packet size in bytes.
pub const RATE_COLUMN: usize = 6;
/// Column of the capacity and target-bitrate logs holding the rate in bit/s.
const CAPACITY_COLUMN: usize = 1;

/// Read column `column` of a headerless CSV file as a time series, with times relative to
/// `basetime` (in milliseconds). Rows with an empty cell in `column` are skipped.
pub fn read_column(
    path: impl AsRef<Path>,
    column: usize,
    basetime: f64,
) -> Result<Option<TimeSeries>, PlotError> {
    let path = path.as_ref();
    if !super::exists(path) {
        return Ok(None);
    }

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut series = TimeSeries::new();
    for record in rdr.records() {
        let record = record?;
        let time = parse_cell(path, &record, 0)?;
        let value = parse_cell(path, &record, column)?;
        if let (Some(time), Some(value)) = (time, value) {
            series.push(time - basetime, value);
        }
    }
    log::debug!(
        "Read {} samples from column {column} of {}",
        series.len(),
        path.display()
    );
    Ok(Some(series))
}

fn parse_cell(
    path: &Path,
    record: &csv::StringRecord,
    column: usize,
) -> Result<Option<f64>, PlotError> {
    let cell = record
        .get(column)
        .ok_or_else(|| PlotError::MissingColumn {
            path: path.to_path_buf(),
            column,
        })?
        .trim();
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse()
        .map(Some)
        .map_err(|_| PlotError::InvalidValue {
            path: path.to_path_buf(),
            column,
            value: cell.to_string(),
        })
}

/// Read an RTP packet log and compute the rate in bit/s: the packet sizes (in bytes) are
/// converted into bits and summed up per second.
pub fn read_rates(path: impl AsRef<Path>, basetime: f64) -> Result<Option<TimeSeries>, PlotError> {
    Ok(read_column(path, RATE_COLUMN, basetime)?
        .map(|s| s.scale(8.0).resample(BUCKET_MS, Aggregation::Sum)))
}

/// Read a capacity log (e.g., the bandwidth configured on the router). Values are used as is.
pub fn read_capacity(
    path: impl AsRef<Path>,
    basetime: f64,
) -> Result<Option<TimeSeries>, PlotError> {
    read_column(path, CAPACITY_COLUMN, basetime)
}

/// Read the target bitrate log of a congestion controller. Samples without a positive target are
/// dropped.
pub fn read_target(
    path: impl AsRef<Path>,
    basetime: f64,
) -> Result<Option<TimeSeries>, PlotError> {
    Ok(read_capacity(path, basetime)?.map(|s| s.filter(|s| s.value > 0.0)))
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;

    #[test]
    fn rates_are_summed_per_second_in_bits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rtp_out.log");
        fs::write(
            &path,
            "5000,,,,,,100\n5200,,,,,,25\n6000,,,,,,125\n8999,1,2,3,4,5,10\n",
        )
        .unwrap();

        let series = read_rates(&path, 5000.0).unwrap().unwrap();
        assert_eq!(
            series.iter().collect::<Vec<_>>(),
            vec![(0.0, 1000.0), (1000.0, 1000.0), (3000.0, 80.0)]
        );
    }

    #[test]
    fn missing_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_rates(dir.path().join("nope.log"), 0.0).unwrap().is_none());
        assert!(read_capacity(dir.path().join("nope.log"), 0.0)
            .unwrap()
            .is_none());
    }

    #[test]
    fn target_drops_non_positive_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gcc.log");
        fs::write(&path, "1000,0\n2000,500000\n3000,-1\n4000,750000.5\n").unwrap();

        let series = read_target(&path, 1000.0).unwrap().unwrap();
        assert_eq!(
            series.iter().collect::<Vec<_>>(),
            vec![(1000.0, 500000.0), (3000.0, 750000.5)]
        );
    }

    #[test]
    fn malformed_values_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("router.log");
        fs::write(&path, "1000,fast\n").unwrap();
        assert!(matches!(
            read_capacity(&path, 0.0),
            Err(PlotError::InvalidValue { column: 1, .. })
        ));

        fs::write(&path, "1000\n").unwrap();
        assert!(matches!(
            read_capacity(&path, 0.0),
            Err(PlotError::MissingColumn { column: 1, .. })
        ));
    }
}
