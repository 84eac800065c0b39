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
use std::{
    error::Error,
    fmt,
    path::{Path, PathBuf},
};

use clap::{Parser, ValueEnum};

use netplot::{
    chart::{
        BytesInFlightChart, Chart, CwndChart, PacketsChart, RatesChart, RttChart, TcpChart,
        DEFAULT_DPI,
    },
    report, util,
    util::PathBufExt,
    Ingest,
};

/// Log directory of the sender, relative to the input directory.
const SENDER: &str = "send_log";
/// Log directory of the receiver, relative to the input directory.
const RECEIVER: &str = "receive_log";

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    /// Type of plot to generate.
    #[arg(value_enum)]
    plot: Plot,
    /// Directory containing the logs of the experiment.
    #[arg(long = "input_dir")]
    input_dir: Option<PathBuf>,
    /// Directory to write the plots to. Must exist.
    #[arg(long = "output_dir")]
    output_dir: Option<PathBuf>,
    /// Start of the experiment as Unix timestamp in seconds.
    #[arg(long, default_value_t = 0)]
    basetime: i64,
    /// Capacity log of the router, relative to the input directory.
    #[arg(long)]
    router: Option<PathBuf>,
    /// HTML template for the index. Its `{{ images }}` placeholder is replaced by the images.
    #[arg(long)]
    template: Option<PathBuf>,
    /// TrueType font used for all text in the plots.
    #[arg(long)]
    font: Option<PathBuf>,
    /// Resolution of the plots.
    #[arg(long, default_value_t = DEFAULT_DPI)]
    dpi: u32,
}

impl Args {
    /// Base time in milliseconds since the epoch.
    fn basetime_ms(&self) -> f64 {
        self.basetime as f64 * 1000.0
    }

    fn input_dir(&self) -> Result<&Path, String> {
        self.input_dir
            .as_deref()
            .ok_or(format!("Plot {} requires --input_dir!", self.plot))
    }

    fn output_dir(&self) -> Result<&Path, String> {
        self.output_dir
            .as_deref()
            .ok_or(format!("Plot {} requires --output_dir!", self.plot))
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Plot {
    /// Sent and received RTP rates, target bitrates, and the link capacity.
    Rates,
    /// Congestion window from the sender's qlog.
    QlogCwnd,
    /// Bytes in flight and bytes sent from the sender's qlog.
    QlogInFlight,
    /// RTT estimates from the sender's qlog.
    QlogRtt,
    /// Packet bytes sent and received per second, from the qlogs of sender and receiver.
    QlogPackets,
    /// Throughput of iperf reports and the link bandwidth.
    Tcp,
    /// Index of all plots in the output directory.
    Html,
}

impl fmt::Display for Plot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Plot::Rates => write!(f, "rates"),
            Plot::QlogCwnd => write!(f, "qlog-cwnd"),
            Plot::QlogInFlight => write!(f, "qlog-in-flight"),
            Plot::QlogRtt => write!(f, "qlog-rtt"),
            Plot::QlogPackets => write!(f, "qlog-packets"),
            Plot::Tcp => write!(f, "tcp"),
            Plot::Html => write!(f, "html"),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    util::init_logging();

    let args = Args::parse();
    log::debug!("{args:?}");
    if args.plot != Plot::Html {
        util::register_font(args.font.as_deref());
    }

    match args.plot {
        Plot::Rates => plot_rates(&args)?,
        Plot::QlogCwnd => {
            if let Some(qlog) = find_qlog(args.input_dir()?, SENDER)? {
                let mut plot = CwndChart::new(args.plot.to_string());
                plot.chart_mut().set_dpi(args.dpi);
                let ingest = plot.add_cwnd(qlog)?;
                render_if_added(plot.chart(), ingest, &args)?;
            }
        }
        Plot::QlogInFlight => {
            if let Some(qlog) = find_qlog(args.input_dir()?, SENDER)? {
                let mut plot = BytesInFlightChart::new(args.plot.to_string());
                plot.chart_mut().set_dpi(args.dpi);
                let ingest = plot.add_bytes_in_flight(qlog)?;
                render_if_added(plot.chart(), ingest, &args)?;
            }
        }
        Plot::QlogRtt => {
            if let Some(qlog) = find_qlog(args.input_dir()?, SENDER)? {
                let mut plot = RttChart::new(args.plot.to_string());
                plot.chart_mut().set_dpi(args.dpi);
                let ingest = plot.add_rtt(qlog)?;
                render_if_added(plot.chart(), ingest, &args)?;
            }
        }
        Plot::QlogPackets => {
            let input_dir = args.input_dir()?;
            let mut plot = PacketsChart::new(args.plot.to_string());
            plot.chart_mut().set_dpi(args.dpi);
            let mut ingest = Ingest::Absent;
            for (dir, endpoint) in [(SENDER, "Sender"), (RECEIVER, "Receiver")] {
                if let Some(qlog) = find_qlog(input_dir, dir)? {
                    if plot.add_packets(qlog, endpoint)?.is_added() {
                        ingest = Ingest::Added;
                    }
                }
            }
            render_if_added(plot.chart(), ingest, &args)?;
        }
        Plot::Tcp => plot_tcp(&args)?,
        Plot::Html => {
            report::generate_html(args.output_dir()?, args.template.as_deref())?;
        }
    }
    Ok(())
}

/// Render a chart, unless nothing could be added to it.
fn render_if_added(chart: &Chart, ingest: Ingest, args: &Args) -> Result<(), Box<dyn Error>> {
    if ingest.is_added() {
        chart.render(args.output_dir()?)?;
    } else {
        log::warn!("Nothing to plot for {}", chart.name());
    }
    Ok(())
}

fn plot_rates(args: &Args) -> Result<(), Box<dyn Error>> {
    let input_dir = args.input_dir()?;
    let basetime = args.basetime_ms();

    let mut plot = RatesChart::new(args.plot.to_string());
    plot.chart_mut().set_dpi(args.dpi);
    plot.add_rtp(
        input_dir.then(SENDER).then("rtp_out.log"),
        basetime,
        "RTP sent",
    )?;
    plot.add_rtp(
        input_dir.then(RECEIVER).then("rtp_in.log"),
        basetime,
        "RTP received",
    )?;
    plot.add_cc(input_dir.then(SENDER).then("gcc.log"), basetime)?;
    plot.add_cc(input_dir.then(SENDER).then("scream.log"), basetime)?;
    if let Some(router) = &args.router {
        plot.add_router(input_dir.then(router), basetime)?;
    }
    plot.render(args.output_dir()?)?;
    Ok(())
}

fn plot_tcp(args: &Args) -> Result<(), Box<dyn Error>> {
    let input_dir = args.input_dir()?;

    let mut plot = TcpChart::new(args.plot.to_string());
    plot.chart_mut().set_dpi(args.dpi);
    if let Some(router) = &args.router {
        plot.add_router(input_dir.then(router), args.basetime_ms())?;
    }
    for file in find_files(input_dir, "*.json")? {
        let label = file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        plot.add(&file, &label)?;
    }
    plot.render(args.output_dir()?)?;
    Ok(())
}

/// All files in `dir` matching `pattern`, in alphabetical order.
fn find_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let glob_path = format!(
        "{}/{pattern}",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    Ok(glob::glob(&glob_path)?.collect::<Result<Vec<_>, _>>()?)
}

/// The first qlog file in the log directory `log_dir` of an endpoint, if any.
fn find_qlog(input_dir: &Path, log_dir: &str) -> Result<Option<PathBuf>, Box<dyn Error>> {
    let dir = input_dir.then(log_dir);
    let qlog = find_files(&dir, "*.qlog")?.into_iter().next();
    if qlog.is_none() {
        log::info!("No qlog file found in {}", dir.display());
    }
    Ok(qlog)
}

#[cfg(test)]
mod test {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn parse_args() {
        let args = Args::try_parse_from([
            "plot",
            "qlog-in-flight",
            "--input_dir",
            "results",
            "--output_dir",
            "plots",
            "--basetime",
            "1700000000",
        ])
        .unwrap();
        assert_eq!(args.plot, Plot::QlogInFlight);
        assert_eq!(args.plot.to_string(), "qlog-in-flight");
        assert_eq!(args.basetime_ms(), 1_700_000_000_000.0);
        assert_eq!(args.input_dir().unwrap(), Path::new("results"));
        assert!(args.router.is_none());
        assert_eq!(args.dpi, DEFAULT_DPI);
    }

    #[test]
    fn unknown_plot_is_rejected() {
        assert!(Args::try_parse_from(["plot", "qlog-pacing"]).is_err());
    }

    #[test]
    fn missing_dirs_are_reported() {
        let args = Args::try_parse_from(["plot", "rates"]).unwrap();
        assert!(args.input_dir().is_err());
        assert!(args.output_dir().is_err());
    }

    #[test]
    fn first_qlog_is_used() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(find_qlog(dir.path(), SENDER).unwrap(), None);
        let send_log = dir.path().join("send_log");
        std::fs::create_dir(&send_log).unwrap();
        std::fs::write(send_log.join("b.qlog"), "").unwrap();
        std::fs::write(send_log.join("a.qlog"), "").unwrap();
        std::fs::write(send_log.join("rtp_out.log"), "").unwrap();
        assert_eq!(
            find_qlog(dir.path(), SENDER).unwrap(),
            Some(send_log.join("a.qlog"))
        );
        assert_eq!(find_qlog(dir.path(), RECEIVER).unwrap(), None);
    }
}
