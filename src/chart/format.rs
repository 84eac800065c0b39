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
//! Tick label formatters.

/// SI prefixes by their power of ten.
const PREFIXES: [(i32, &str); 17] = [
    (-24, "y"),
    (-21, "z"),
    (-18, "a"),
    (-15, "f"),
    (-12, "p"),
    (-9, "n"),
    (-6, "µ"),
    (-3, "m"),
    (0, ""),
    (3, "k"),
    (6, "M"),
    (9, "G"),
    (12, "T"),
    (15, "P"),
    (18, "E"),
    (21, "Z"),
    (24, "Y"),
];

/// Format a value in engineering notation with an SI prefix in front of the unit, e.g.,
/// `1500.0` with unit `bit/s` becomes `1.5 kbit/s`.
pub fn eng_format(value: f64, unit: &str) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{} {unit}", if value == 0.0 { 0.0 } else { value });
    }

    let mut exp = (((value.abs().log10() / 3.0).floor() as i32) * 3).clamp(-24, 24);
    let mut mantissa = value / 10f64.powi(exp);
    // rounding to significant digits may carry over into the next prefix (999.9999 -> 1000)
    if exp < 24 && format_significant(mantissa.abs()) == "1000" {
        mantissa /= 1000.0;
        exp += 3;
    }
    let prefix = PREFIXES
        .iter()
        .find(|(e, _)| *e == exp)
        .map(|(_, p)| *p)
        .unwrap_or_default();

    format!("{} {prefix}{unit}", format_significant(mantissa))
}

/// Format a number with at most six significant digits, without trailing zeros.
fn format_significant(x: f64) -> String {
    let magnitude = if x == 0.0 {
        0
    } else {
        x.abs().log10().floor() as i32
    };
    let decimals = (5 - magnitude).max(0) as usize;
    let s = format!("{x:.decimals$}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Format a time in milliseconds as `MM:SS`. Minutes do not wrap at one hour.
pub fn format_elapsed(ms: f64) -> String {
    let sign = if ms < 0.0 { "-" } else { "" };
    let secs = (ms.abs() / 1000.0).floor() as u64;
    format!("{sign}{:02}:{:02}", secs / 60, secs % 60)
}
