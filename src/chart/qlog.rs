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
//! Charts of the congestion control metrics logged in qlog files.
use std::path::{Path, PathBuf};

use super::{Chart, ChartSize, SeriesStyle};
use crate::{
    readers::{self, QlogMetrics},
    series::{Aggregation, TimeSeries, BUCKET_MS},
    Ingest, PlotError,
};

/// Read the qlog file and add every non-empty series returned by `select`.
fn ingest_qlog<'a, F>(chart: &mut Chart, file: &Path, select: F) -> Result<Ingest, PlotError>
where
    F: FnOnce(QlogMetrics) -> Vec<(&'a str, TimeSeries)>,
{
    let Some(metrics) = readers::read_qlog(file)? else {
        return Ok(Ingest::Absent);
    };
    let mut added = false;
    for (label, data) in select(metrics) {
        added |= chart.add_series(label, data, SeriesStyle::Line, None);
    }
    Ok(if added { Ingest::Added } else { Ingest::Empty })
}

/// Congestion window over time.
#[derive(Debug, Clone)]
pub struct CwndChart {
    chart: Chart,
}

impl CwndChart {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            chart: Chart::new(name)
                .with_labels("Time", "CWND")
                .with_unit("Bytes")
                .with_size(ChartSize::new(8.0, 2.0)),
        }
    }

    pub fn add_cwnd(&mut self, file: impl AsRef<Path>) -> Result<Ingest, PlotError> {
        ingest_qlog(&mut self.chart, file.as_ref(), |m| vec![("CWND", m.cwnd)])
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

/// Bytes in flight, together with the number of datagram and stream bytes sent per second.
#[derive(Debug, Clone)]
pub struct BytesInFlightChart {
    chart: Chart,
}

impl BytesInFlightChart {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            chart: Chart::new(name)
                .with_labels("Time", "Bytes in Flight")
                .with_unit("Bytes")
                .with_size(ChartSize::new(9.0, 4.0)),
        }
    }

    /// Add the bytes in flight as logged, and the bytes of datagram frames, stream frames, and
    /// both summed up per second.
    pub fn add_bytes_in_flight(&mut self, file: impl AsRef<Path>) -> Result<Ingest, PlotError> {
        ingest_qlog(&mut self.chart, file.as_ref(), |m| {
            let datagram = m.datagram_bytes.resample(BUCKET_MS, Aggregation::Sum);
            let stream = m.stream_bytes.resample(BUCKET_MS, Aggregation::Sum);
            let total = datagram.add(&stream);
            vec![
                ("Bytes in Flight", m.bytes_in_flight),
                ("Datagram Bytes Sent", datagram),
                ("Stream Bytes Sent", stream),
                ("Total sent", total),
            ]
        })
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

/// Smoothed, minimum, and latest RTT estimates.
#[derive(Debug, Clone)]
pub struct RttChart {
    chart: Chart,
}

impl RttChart {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            chart: Chart::new(name)
                .with_labels("Time", "RTT")
                .with_unit("ms")
                .with_size(ChartSize::new(8.0, 2.0)),
        }
    }

    pub fn add_rtt(&mut self, file: impl AsRef<Path>) -> Result<Ingest, PlotError> {
        ingest_qlog(&mut self.chart, file.as_ref(), |m| {
            vec![
                ("Smoothed RTT", m.smoothed_rtt),
                ("Min RTT", m.min_rtt),
                ("Latest RTT", m.latest_rtt),
            ]
        })
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

/// Raw packet bytes sent and received per second, for one or more endpoints.
#[derive(Debug, Clone)]
pub struct PacketsChart {
    chart: Chart,
}

impl PacketsChart {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            chart: Chart::new(name)
                .with_labels("Time", "Packet Bytes")
                .with_unit("Bytes/s")
                .with_size(ChartSize::new(8.0, 2.0)),
        }
    }

    /// Add the bytes of all packets the `endpoint` sent and received, summed per second.
    pub fn add_packets(
        &mut self,
        file: impl AsRef<Path>,
        endpoint: &str,
    ) -> Result<Ingest, PlotError> {
        let sent = format!("{endpoint} sent");
        let received = format!("{endpoint} received");
        ingest_qlog(&mut self.chart, file.as_ref(), |m| {
            vec![
                (
                    sent.as_str(),
                    m.packets_sent.resample(BUCKET_MS, Aggregation::Sum),
                ),
                (
                    received.as_str(),
                    m.packets_received.resample(BUCKET_MS, Aggregation::Sum),
                ),
            ]
        })
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

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;

    const LOG: &str = concat!(
        r#"{"time":0,"name":"recovery:metrics_updated","data":{"congestion_window":12000,"bytes_in_flight":1200,"latest_rtt":30}}"#,
        "\n",
        r#"{"time":100,"name":"transport:packet_sent","data":{"frames":[{"frame_type":"datagram","length":1000}]}}"#,
        "\n",
        r#"{"time":900,"name":"transport:packet_sent","data":{"frames":[{"frame_type":"datagram","length":500},{"frame_type":"stream","length":300}]}}"#,
        "\n",
        r#"{"time":2100,"name":"transport:packet_sent","data":{"frames":[{"frame_type":"stream","length":700}]}}"#,
        "\n",
        r#"{"time":2500,"name":"recovery:metrics_updated","data":{"congestion_window":14000,"smoothed_rtt":25,"latest_rtt":20}}"#,
        "\n",
    );

    fn write_log(dir: &Path) -> PathBuf {
        let path = dir.join("sender.qlog");
        fs::write(&path, LOG).unwrap();
        path
    }

    #[test]
    fn cwnd() {
        let dir = tempfile::tempdir().unwrap();
        let mut plot = CwndChart::new("qlog-cwnd");
        assert_eq!(plot.add_cwnd(write_log(dir.path())).unwrap(), Ingest::Added);
        assert_eq!(
            plot.chart().get("CWND").unwrap().iter().collect::<Vec<_>>(),
            vec![(0.0, 12000.0), (2500.0, 14000.0)]
        );
    }

    #[test]
    fn bytes_in_flight() {
        let dir = tempfile::tempdir().unwrap();
        let mut plot = BytesInFlightChart::new("qlog-in-flight");
        assert_eq!(
            plot.add_bytes_in_flight(write_log(dir.path())).unwrap(),
            Ingest::Added
        );
        let chart = plot.chart();
        assert_eq!(
            chart.get("Bytes in Flight").unwrap().iter().collect::<Vec<_>>(),
            vec![(0.0, 1200.0)]
        );
        assert_eq!(
            chart.get("Datagram Bytes Sent").unwrap().iter().collect::<Vec<_>>(),
            vec![(0.0, 1500.0)]
        );
        assert_eq!(
            chart.get("Stream Bytes Sent").unwrap().iter().collect::<Vec<_>>(),
            vec![(0.0, 300.0), (2000.0, 700.0)]
        );
        assert_eq!(
            chart.get("Total sent").unwrap().iter().collect::<Vec<_>>(),
            vec![(0.0, 1800.0), (2000.0, 700.0)]
        );
        assert_eq!(chart.size().pixels(), (3600, 1600));
    }

    #[test]
    fn rtt_only_adds_present_estimates() {
        let dir = tempfile::tempdir().unwrap();
        let mut plot = RttChart::new("qlog-rtt");
        assert_eq!(plot.add_rtt(write_log(dir.path())).unwrap(), Ingest::Added);
        let chart = plot.chart();
        assert_eq!(
            chart.series().iter().map(|s| s.label.as_str()).collect::<Vec<_>>(),
            vec!["Smoothed RTT", "Latest RTT"]
        );
        assert_eq!(
            chart.get("Latest RTT").unwrap().iter().collect::<Vec<_>>(),
            vec![(0.0, 30.0), (2500.0, 20.0)]
        );
    }

    #[test]
    fn packets_of_both_endpoints() {
        let dir = tempfile::tempdir().unwrap();
        let sender = dir.path().join("sender.qlog");
        let receiver = dir.path().join("receiver.qlog");
        fs::write(
            &sender,
            concat!(
                r#"{"time":0,"name":"transport:packet_sent","data":{"raw":{"length":1200}}}"#,
                "\n",
                r#"{"time":400,"name":"transport:packet_sent","data":{"raw":{"length":1200}}}"#,
                "\n",
                r#"{"time":1500,"name":"transport:packet_received","data":{"raw":{"length":50}}}"#,
                "\n",
            ),
        )
        .unwrap();
        fs::write(
            &receiver,
            concat!(
                r#"{"time":20,"name":"transport:packet_received","data":{"raw":{"length":1200}}}"#,
                "\n",
            ),
        )
        .unwrap();

        let mut plot = PacketsChart::new("qlog-packets");
        assert_eq!(plot.add_packets(&sender, "Sender").unwrap(), Ingest::Added);
        assert_eq!(plot.add_packets(&receiver, "Receiver").unwrap(), Ingest::Added);
        assert_eq!(
            plot.add_packets(dir.path().join("missing.qlog"), "Relay")
                .unwrap(),
            Ingest::Absent
        );

        let chart = plot.chart();
        assert_eq!(
            chart.series().iter().map(|s| s.label.as_str()).collect::<Vec<_>>(),
            vec!["Sender sent", "Sender received", "Receiver received"]
        );
        assert_eq!(
            chart.get("Sender sent").unwrap().iter().collect::<Vec<_>>(),
            vec![(0.0, 2400.0)]
        );
        assert_eq!(
            chart.get("Sender received").unwrap().iter().collect::<Vec<_>>(),
            vec![(1000.0, 50.0)]
        );
        assert_eq!(chart.name(), "qlog-packets");
    }

    #[test]
    fn no_matching_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receiver.qlog");
        fs::write(
            &path,
            "{\"time\":0,\"name\":\"transport:packet_received\",\"data\":{}}\n",
        )
        .unwrap();
        let mut plot = CwndChart::new("qlog-cwnd");
        assert_eq!(plot.add_cwnd(&path).unwrap(), Ingest::Empty);
        assert_eq!(
            plot.add_cwnd(dir.path().join("missing.qlog")).unwrap(),
            Ingest::Absent
        );
        assert!(plot.chart().series().is_empty());
    }
}
