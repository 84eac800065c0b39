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
//! HTML index of all rendered charts in a directory.
use std::{
    fs,
    path::{Path, PathBuf},
};

use itertools::Itertools;

use crate::{util::PathBufExt, PlotError};

/// Template used if no other template is given.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/index.html");
/// Placeholder in the template that is replaced by the list of images.
pub const IMAGES_PLACEHOLDER: &str = "{{ images }}";
pub const INDEX_FILE: &str = "index.html";

/// List the file names of all PNG images directly inside `dir`, in natural sort order.
pub fn list_images(dir: impl AsRef<Path>) -> Result<Vec<String>, PlotError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(PlotError::MissingOutputDir(dir.to_path_buf()));
    }
    let mut images = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "png") {
            if let Some(name) = path.file_name() {
                images.push(name.to_string_lossy().to_string());
            }
        }
    }
    Ok(images
        .into_iter()
        .sorted_by(|a, b| human_sort::compare(a, b))
        .collect())
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render the template, replacing the placeholder with one figure per image.
pub fn render_template(template: &str, images: &[String]) -> String {
    let figures = images
        .iter()
        .map(|image| {
            let image = escape(image);
            format!(
                "  <figure>\n    <img src=\"{image}\" alt=\"{image}\">\n    \
                 <figcaption>{image}</figcaption>\n  </figure>"
            )
        })
        .join("\n");
    template.replace(IMAGES_PLACEHOLDER, &figures)
}

/// Write `index.html` into `output_dir`, showing all PNG images in that directory. Uses the
/// template file if given, or [`DEFAULT_TEMPLATE`] otherwise. Returns the listed images.
pub fn generate_html(
    output_dir: impl AsRef<Path>,
    template: Option<&Path>,
) -> Result<Vec<String>, PlotError> {
    let output_dir = output_dir.as_ref();
    let template = match template {
        Some(path) => fs::read_to_string(path).map_err(|e| PlotError::Template(path.into(), e))?,
        None => DEFAULT_TEMPLATE.to_string(),
    };

    let images = list_images(output_dir)?;
    log::debug!("Images in {}: {images:?}", output_dir.display());

    let index: PathBuf = output_dir.then(INDEX_FILE);
    fs::write(&index, render_template(&template, &images))?;
    log::info!("Wrote {} with {} images", index.display(), images.len());
    Ok(images)
}
