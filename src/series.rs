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
//! Time series of samples keyed by milliseconds since the start of the experiment.
use std::collections::BTreeMap;

use itertools::Itertools;

/// Width of the buckets used for resampling rates, in milliseconds.
pub const BUCKET_MS: f64 = 1000.0;

/// A single data point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Time in milliseconds relative to the start of the experiment.
    pub time: f64,
    pub value: f64,
}

impl From<(f64, f64)> for Sample {
    fn from((time, value): (f64, f64)) -> Self {
        Self { time, value }
    }
}

/// How samples falling into the same bucket are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Sum,
    Mean,
}

/// Ordered sequence of samples. Times are non-decreasing as read from the logs, but not evenly
/// spaced unless the series was resampled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    samples: Vec<Sample>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, time: f64, value: f64) {
        self.samples.push(Sample { time, value });
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.samples.iter().map(|s| (s.time, s.value))
    }

    /// Move all samples by `offset` milliseconds, e.g., to convert absolute epoch timestamps into
    /// the time elapsed since the start of the experiment.
    pub fn shift(mut self, offset: f64) -> Self {
        self.samples.iter_mut().for_each(|s| s.time += offset);
        self
    }

    /// Multiply every value by `factor`.
    pub fn scale(mut self, factor: f64) -> Self {
        self.samples.iter_mut().for_each(|s| s.value *= factor);
        self
    }

    /// Keep only the samples matching the predicate.
    pub fn filter(mut self, f: impl Fn(&Sample) -> bool) -> Self {
        self.samples.retain(f);
        self
    }

    /// Group all samples into buckets of `width` milliseconds and combine each bucket with the
    /// given aggregation. A bucket is keyed by the start of its interval, i.e., the sample time
    /// truncated to a multiple of `width`. Buckets without samples are not part of the result.
    pub fn resample(&self, width: f64, aggregation: Aggregation) -> Self {
        let mut buckets: BTreeMap<i64, (f64, usize)> = BTreeMap::new();
        for s in &self.samples {
            let key = (s.time / width).floor() as i64;
            let entry = buckets.entry(key).or_insert((0.0, 0));
            entry.0 += s.value;
            entry.1 += 1;
        }
        Self {
            samples: buckets
                .into_iter()
                .map(|(key, (sum, count))| Sample {
                    time: key as f64 * width,
                    value: match aggregation {
                        Aggregation::Sum => sum,
                        Aggregation::Mean => sum / count as f64,
                    },
                })
                .collect(),
        }
    }

    /// Add two resampled series element-wise. A bucket present in only one of the series keeps
    /// its value, such that the result equals resampling the concatenation of both series with
    /// [`Aggregation::Sum`].
    pub fn add(&self, other: &Self) -> Self {
        Self {
            samples: self
                .samples
                .iter()
                .merge_join_by(other.samples.iter(), |a, b| a.time.total_cmp(&b.time))
                .map(|x| match x {
                    itertools::EitherOrBoth::Both(a, b) => Sample {
                        time: a.time,
                        value: a.value + b.value,
                    },
                    itertools::EitherOrBoth::Left(s) | itertools::EitherOrBoth::Right(s) => *s,
                })
                .collect(),
        }
    }

    /// Range of times covered by the series, or `None` if it is empty.
    pub fn time_range(&self) -> Option<(f64, f64)> {
        self.samples
            .iter()
            .map(|s| s.time)
            .minmax_by(f64::total_cmp)
            .into_option()
    }

    /// Range of values of the series, or `None` if it is empty.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.samples
            .iter()
            .map(|s| s.value)
            .minmax_by(f64::total_cmp)
            .into_option()
    }
}

impl FromIterator<(f64, f64)> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().map(Sample::from).collect(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn resample_sum_truncates_to_the_second() {
        let series: TimeSeries = [(0.0, 1.0), (999.9, 2.0), (1000.0, 4.0), (3500.0, 8.0)]
            .into_iter()
            .collect();
        let resampled = series.resample(BUCKET_MS, Aggregation::Sum);
        assert_eq!(
            resampled.iter().collect::<Vec<_>>(),
            vec![(0.0, 3.0), (1000.0, 4.0), (3000.0, 8.0)]
        );
    }

    #[test]
    fn resample_mean() {
        let series: TimeSeries = [(2100.0, 10.0), (2900.0, 20.0), (100.0, 5.0)]
            .into_iter()
            .collect();
        let resampled = series.resample(BUCKET_MS, Aggregation::Mean);
        assert_eq!(
            resampled.iter().collect::<Vec<_>>(),
            vec![(0.0, 5.0), (2000.0, 15.0)]
        );
    }

    #[test]
    fn resample_negative_times() {
        let series: TimeSeries = [(-1.0, 1.0), (-1000.0, 1.0), (0.0, 1.0)].into_iter().collect();
        let resampled = series.resample(BUCKET_MS, Aggregation::Sum);
        assert_eq!(
            resampled.iter().collect::<Vec<_>>(),
            vec![(-1000.0, 2.0), (0.0, 1.0)]
        );
    }

    #[test]
    fn add_matches_joint_resampling() {
        let a: TimeSeries = [(0.0, 1.0), (1500.0, 2.0), (4200.0, 3.0)].into_iter().collect();
        let b: TimeSeries = [(10.0, 10.0), (2100.0, 20.0), (4900.0, 30.0)]
            .into_iter()
            .collect();
        let sum = a
            .resample(BUCKET_MS, Aggregation::Sum)
            .add(&b.resample(BUCKET_MS, Aggregation::Sum));
        let joint: TimeSeries = a.iter().chain(b.iter()).collect();
        assert_eq!(sum, joint.resample(BUCKET_MS, Aggregation::Sum));
        assert_eq!(
            sum.iter().collect::<Vec<_>>(),
            vec![(0.0, 11.0), (1000.0, 2.0), (2000.0, 20.0), (4000.0, 33.0)]
        );
    }

    #[test]
    fn shift_scale_filter() {
        let series: TimeSeries = [(5000.0, 1.0), (6000.0, -1.0)].into_iter().collect();
        let series = series.shift(-5000.0).scale(8.0).filter(|s| s.value > 0.0);
        assert_eq!(series.iter().collect::<Vec<_>>(), vec![(0.0, 8.0)]);
        assert_eq!(series.time_range(), Some((0.0, 0.0)));
        assert_eq!(TimeSeries::new().value_range(), None);
    }
}
