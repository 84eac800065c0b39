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
//! Line-delimited qlog files, with one JSON event record per line.
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use serde::Deserialize;

use crate::{series::TimeSeries, PlotError};

pub const METRICS_UPDATED: &str = "recovery:metrics_updated";
pub const PACKET_SENT: &str = "transport:packet_sent";
pub const PACKET_RECEIVED: &str = "transport:packet_received";

/// JSON-SEQ record separator, which may precede each record.
const RECORD_SEPARATOR: char = '\u{1e}';

/// A single qlog event. Only the fields used for plotting are parsed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QlogEvent {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub time: Option<f64>,
    #[serde(default)]
    pub data: Option<QlogData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QlogData {
    pub congestion_window: Option<f64>,
    pub bytes_in_flight: Option<f64>,
    pub smoothed_rtt: Option<f64>,
    pub min_rtt: Option<f64>,
    pub latest_rtt: Option<f64>,
    pub frames: Option<Vec<QlogFrame>>,
    pub raw: Option<QlogRaw>,
}

/// Raw information of a sent or received packet.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QlogRaw {
    pub length: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QlogFrame {
    pub frame_type: Option<String>,
    pub length: Option<f64>,
}

/// Metrics extracted from a qlog file. Times are in milliseconds as logged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QlogMetrics {
    pub cwnd: TimeSeries,
    pub bytes_in_flight: TimeSeries,
    pub smoothed_rtt: TimeSeries,
    pub min_rtt: TimeSeries,
    pub latest_rtt: TimeSeries,
    /// Sum of the lengths of all datagram frames per sent packet.
    pub datagram_bytes: TimeSeries,
    /// Sum of the lengths of all stream frames per sent packet.
    pub stream_bytes: TimeSeries,
    /// Raw length of each sent packet.
    pub packets_sent: TimeSeries,
    /// Raw length of each received packet.
    pub packets_received: TimeSeries,
}

impl QlogMetrics {
    fn update(&mut self, event: QlogEvent) {
        let (Some(name), Some(time), Some(data)) = (event.name, event.time, event.data) else {
            return;
        };
        match name.as_str() {
            METRICS_UPDATED => {
                for (field, series) in [
                    (data.congestion_window, &mut self.cwnd),
                    (data.bytes_in_flight, &mut self.bytes_in_flight),
                    (data.smoothed_rtt, &mut self.smoothed_rtt),
                    (data.min_rtt, &mut self.min_rtt),
                    (data.latest_rtt, &mut self.latest_rtt),
                ] {
                    if let Some(value) = field {
                        series.push(time, value);
                    }
                }
            }
            PACKET_SENT => {
                if let Some(length) = data.raw.and_then(|r| r.length) {
                    self.packets_sent.push(time, length);
                }
                let frames = data.frames.unwrap_or_default();
                for (frame_type, series) in [
                    ("datagram", &mut self.datagram_bytes),
                    ("stream", &mut self.stream_bytes),
                ] {
                    let mut matching = frames
                        .iter()
                        .filter(|f| f.frame_type.as_deref() == Some(frame_type))
                        .peekable();
                    if matching.peek().is_some() {
                        series.push(time, matching.filter_map(|f| f.length).sum());
                    }
                }
            }
            PACKET_RECEIVED => {
                if let Some(length) = data.raw.and_then(|r| r.length) {
                    self.packets_received.push(time, length);
                }
            }
            _ => {}
        }
    }
}

/// Parse a single line of a qlog file. Returns `None` for blank lines.
pub fn parse_line(line: &str) -> Option<Result<QlogEvent, serde_json::Error>> {
    let line = line.trim_matches(|c: char| c.is_whitespace() || c == RECORD_SEPARATOR);
    if line.is_empty() {
        None
    } else {
        Some(serde_json::from_str(line))
    }
}

/// Read all metrics of interest from a qlog file.
pub fn read_qlog(path: impl AsRef<Path>) -> Result<Option<QlogMetrics>, PlotError> {
    let path = path.as_ref();
    if !super::exists(path) {
        return Ok(None);
    }

    let mut metrics = QlogMetrics::default();
    let reader = BufReader::new(File::open(path)?);
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(event) = parse_line(&line) else {
            continue;
        };
        let event = event.map_err(|source| PlotError::Json {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        metrics.update(event);
    }
    Ok(Some(metrics))
}
