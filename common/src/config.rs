use std::{
    fmt,
    fs::read_to_string,
    path::{Path, PathBuf},
};

use eyre::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_RESULTS_DIR: &str = "../results";
pub const DEFAULT_EXTENSION: &str = "json";
pub const DEFAULT_OUTPUT: &str = "payment_processor_evolution.png";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub results_dir: PathBuf,
    pub extension: String,
    pub output: PathBuf,
    pub style: ChartStyle,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            extension: DEFAULT_EXTENSION.to_owned(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            style: ChartStyle::default(),
        }
    }
}

/// Presentation settings handed to every [`crate::plot::Plot`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartStyle {
    pub title: String,
    /// Image size in pixels, 15:18 like a 15 by 18 inch figure
    pub width: u32,
    pub height: u32,
    pub font_family: String,
    pub title_font_size: f64,
    pub caption_font_size: f64,
    pub label_font_size: f64,
    pub value_font_size: f64,
    pub line_width: u32,
    pub marker_size: u32,
    pub grid_alpha: f64,
    /// One colour per chart, reused from the start when there are fewer
    pub palette: Vec<Rgb>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            title: "Payment Processor Results Evolution".to_owned(),
            width: 1500,
            height: 1800,
            font_family: "sans-serif".to_owned(),
            title_font_size: 32.0,
            caption_font_size: 22.0,
            label_font_size: 16.0,
            value_font_size: 14.0,
            line_width: 3,
            marker_size: 8,
            grid_alpha: 0.3,
            palette: vec![
                Rgb(0x1f, 0x77, 0xb4),
                Rgb(0xff, 0x7f, 0x0e),
                Rgb(0x2c, 0xa0, 0x2c),
                Rgb(0xd6, 0x27, 0x28),
                Rgb(0x94, 0x67, 0xbd),
                Rgb(0x8c, 0x56, 0x4b),
            ],
        }
    }
}

impl ChartStyle {
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let data = read_to_string(path).context(format!("Read style {}", path.display()))?;
        serde_yml::from_str(&data).context(format!("Parse style {}", path.display()))
    }

    pub fn color(&self, idx: usize) -> Rgb {
        if self.palette.is_empty() {
            return Rgb(0, 0, 0);
        }
        self.palette[idx % self.palette.len()]
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ColorError {
    #[error("Colour must look like #rrggbb, got {0:?}")]
    Format(String),
}

/// 24-bit colour, written as `#rrggbb` in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl TryFrom<String> for Rgb {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::str::FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.is_ascii())
            .ok_or_else(|| ColorError::Format(s.to_owned()))?;
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ColorError::Format(s.to_owned()))
        };
        Ok(Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}
