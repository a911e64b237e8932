// SPDX-FileCopyrightText: © 2024 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

const INPUT_SUFFIX: &str = ".gantt";

/// Format of the images produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ImageFormat {
    /// Raster image.
    Png,
    /// Vector image.
    Svg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Files written for a given .gantt input, in the same directory.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    /// Input file name without the .gantt suffix, also used as chart title.
    pub basename: String,
    /// The Gantt chart.
    pub chart: std::path::PathBuf,
    /// The legend.
    pub legend: std::path::PathBuf,
}

impl OutputPaths {
    /// Derive the output file names.
    /// Parameters:
    /// - `input`: path of the .gantt file
    /// - `format`: format of the images
    pub fn new(input: &std::path::Path, format: ImageFormat) -> anyhow::Result<Self> {
        let file_name = input
            .file_name()
            .and_then(|x| x.to_str())
            .ok_or_else(|| anyhow::anyhow!("invalid input file name: {}", input.display()))?;
        let basename = match file_name.strip_suffix(INPUT_SUFFIX) {
            Some(stem) if !stem.is_empty() => stem,
            _ => input
                .file_stem()
                .and_then(|x| x.to_str())
                .unwrap_or(file_name),
        }
        .to_string();

        let directory = match input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => std::path::PathBuf::from("./"),
        };

        Ok(Self {
            chart: directory.join(format!("{}.{}", basename, format.extension())),
            legend: directory.join(format!("{}_legend.{}", basename, format.extension())),
            basename,
        })
    }
}
