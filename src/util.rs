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
//! Utility module collection of functions

use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use plotters::style::FontStyle;

/// Environment variable pointing to a TrueType font used for all text in the charts.
pub const FONT_ENV: &str = "NETPLOT_FONT";

/// Font files tried if neither `--font` nor `NETPLOT_FONT` is given.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static FONT_REGISTERED: OnceLock<bool> = OnceLock::new();

pub fn init_logging() {
    pretty_env_logger::init();
}

/// Register the font used for all text in the charts. Only the first call has an effect: later
/// calls return whether the first one succeeded. Tries `font` first, then the file pointed to by
/// `NETPLOT_FONT`, and finally a list of common system fonts.
pub fn register_font(font: Option<&Path>) -> bool {
    *FONT_REGISTERED.get_or_init(|| {
        let candidates = font
            .map(Path::to_path_buf)
            .into_iter()
            .chain(env::var_os(FONT_ENV).map(PathBuf::from))
            .chain(FONT_CANDIDATES.iter().map(PathBuf::from));

        for path in candidates {
            let Ok(bytes) = fs::read(&path) else {
                continue;
            };
            // plotters keeps registered fonts for the lifetime of the program
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            match plotters::style::register_font("sans-serif", FontStyle::Normal, bytes) {
                Ok(()) => {
                    log::debug!("Using font {}", path.display());
                    return true;
                }
                Err(_) => log::warn!("Cannot use {} as font", path.display()),
            }
        }

        log::warn!(
            "No usable font found! Charts are rendered without text. Pass a TrueType font with \
             --font or {FONT_ENV}."
        );
        false
    })
}

/// Whether text can be drawn, registering a system font if no font was registered so far.
pub fn text_available() -> bool {
    register_font(None)
}

pub trait PathBufExt: Sized {
    fn then(self, p: impl AsRef<Path>) -> PathBuf;
}

impl PathBufExt for PathBuf {
    fn then(mut self, p: impl AsRef<Path>) -> PathBuf {
        self.push(p);
        self
    }
}

impl PathBufExt for &Path {
    fn then(self, p: impl AsRef<Path>) -> PathBuf {
        let mut path = self.to_path_buf();
        path.push(p);
        path
    }
}
