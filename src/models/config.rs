use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::models::{Color16, PageRange, Size};

/// Bit depths the grayscale stage can produce.
pub const SUPPORTED_COLOR_DEPTHS: [u8; 5] = [1, 2, 4, 8, 16];

/// Run configuration loaded from a YAML file. Every field has a default, so an
/// empty file (or no file) is a valid configuration.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub reading_direction: ReadingDirection,

    /// Background colors, primary first. `#rrggbb`, `white` or `black`.
    #[serde(default = "default_background")]
    pub background: Vec<String>,

    /// First page to process.
    #[serde(default = "default_start")]
    pub start: u32,

    /// Last page to process (defaults to the last page).
    #[serde(default)]
    pub end: Option<u32>,

    /// Extra page selection, e.g. `"1-20,25"`, combined with `start`/`end`.
    #[serde(default)]
    pub pages: Option<String>,

    #[serde(default)]
    pub trim: TrimSettings,

    #[serde(default)]
    pub spread: SpreadSettings,

    #[serde(default)]
    pub resize: ResizeSettings,

    #[serde(default)]
    pub grayscale: GrayscaleSettings,

    #[serde(default)]
    pub output: OutputSettings,
}

fn default_background() -> Vec<String> {
    vec!["white".to_string()]
}

fn default_start() -> u32 {
    1
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ReadingDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TrimSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Minimum fraction of each dimension kept after trimming (0.0-1.0)
    #[serde(default = "default_min_size")]
    pub min_size: f64,

    /// Safety margin kept around the content (pixels)
    #[serde(default = "default_margin")]
    pub margin: u32,

    /// Color fuzz fraction used to match the background (0.0-1.0)
    #[serde(default = "default_fuzz")]
    pub fuzz: f64,
}

fn default_true() -> bool {
    true
}

fn default_min_size() -> f64 {
    0.85
}

fn default_margin() -> u32 {
    10
}

fn default_fuzz() -> f64 {
    0.1
}

impl Default for TrimSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            min_size: default_min_size(),
            margin: default_margin(),
            fuzz: default_fuzz(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SpreadSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_edge_width")]
    pub edge_width: u32,

    #[serde(default = "default_edge_margin")]
    pub edge_margin: u32,

    /// RMSE threshold per background color; the last value covers any extra colors.
    #[serde(default = "default_background_distortion")]
    pub background_distortion: Vec<f64>,

    #[serde(default = "default_left_right_distortion")]
    pub left_right_distortion: f64,
}

fn default_edge_width() -> u32 {
    10
}

fn default_edge_margin() -> u32 {
    2
}

fn default_background_distortion() -> Vec<f64> {
    vec![0.1]
}

fn default_left_right_distortion() -> f64 {
    0.15
}

impl Default for SpreadSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            edge_width: default_edge_width(),
            edge_margin: default_edge_margin(),
            background_distortion: default_background_distortion(),
            left_right_distortion: default_left_right_distortion(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct ResizeSettings {
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_width() -> u32 {
    1264
}

fn default_height() -> u32 {
    1680
}

impl Default for ResizeSettings {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct GrayscaleSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_color_depth")]
    pub color_depth: u8,

    /// Pages to convert. Defaults to every page except the cover.
    #[serde(default)]
    pub pages: Option<String>,

    #[serde(default)]
    pub serpentine: bool,
}

fn default_color_depth() -> u8 {
    4
}

impl Default for GrayscaleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            color_depth: default_color_depth(),
            pages: None,
            serpentine: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputSettings {
    #[serde(default)]
    pub format: OutputFormat,

    /// Re-compress PNGs with oxipng
    #[serde(default)]
    pub optimize: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Raw,
    Cbz,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" => Ok(OutputFormat::Raw),
            "cbz" => Ok(OutputFormat::Cbz),
            other => Err(format!("unknown format: {other}")),
        }
    }
}

/// Trim stage parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TrimConfig {
    pub enabled: bool,
    pub min_size: f64,
    pub margin: u32,
    pub fuzz: f64,
}

/// Spread detection parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadConfig {
    pub enabled: bool,
    pub edge_width: u32,
    pub edge_margin: u32,
    pub background_distortion: Vec<f64>,
    pub left_right_distortion: f64,
}

impl SpreadConfig {
    /// Threshold for the `index`-th background color.
    pub fn background_threshold(&self, index: usize) -> f64 {
        let last = self.background_distortion.len().saturating_sub(1);
        self.background_distortion
            .get(index.min(last))
            .copied()
            .unwrap_or(0.0)
    }
}

/// Grayscale stage parameters. `pages = None` disables the stage.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayscaleConfig {
    pub pages: Option<PageRange>,
    pub color_depth: u8,
    pub serpentine: bool,
}

/// Validated, immutable configuration for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub reading_direction: ReadingDirection,
    pub background: Vec<Color16>,
    pub total_pages: u32,
    pub selection: PageRange,
    pub trim: TrimConfig,
    pub spread: SpreadConfig,
    pub target: Size,
    pub grayscale: GrayscaleConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            reading_direction: ReadingDirection::default(),
            background: default_background(),
            start: default_start(),
            end: None,
            pages: None,
            trim: TrimSettings::default(),
            spread: SpreadSettings::default(),
            resize: ResizeSettings::default(),
            grayscale: GrayscaleSettings::default(),
            output: OutputSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&content)?;
        tracing::info!(
            path = %path.display(),
            background = config.background.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Check every option and resolve page selections against `total_pages`.
    pub fn validate(&self, total_pages: u32) -> Result<PipelineConfig, ConfigError> {
        if self.background.is_empty() {
            return Err(ConfigError::EmptyBackground);
        }
        let background = self
            .background
            .iter()
            .map(|c| c.parse::<Color16>())
            .collect::<Result<Vec<_>, _>>()?;

        check_fraction("trim.fuzz", self.trim.fuzz)?;
        check_fraction("trim.min_size", self.trim.min_size)?;
        if self.spread.background_distortion.is_empty() {
            return Err(ConfigError::EmptyThresholds);
        }
        for &threshold in &self.spread.background_distortion {
            check_fraction("spread.background_distortion", threshold)?;
        }
        check_fraction("spread.left_right_distortion", self.spread.left_right_distortion)?;

        if !SUPPORTED_COLOR_DEPTHS.contains(&self.grayscale.color_depth) {
            return Err(ConfigError::UnsupportedColorDepth(self.grayscale.color_depth));
        }
        for (name, value) in [
            ("resize.width", self.resize.width),
            ("resize.height", self.resize.height),
        ] {
            if value == 0 {
                return Err(ConfigError::OutOfRange {
                    name,
                    value: 0.0,
                    min: 1.0,
                    max: u32::MAX as f64,
                });
            }
        }

        let selection = self.selection(total_pages)?;
        let grayscale_pages = if self.grayscale.enabled {
            Some(match &self.grayscale.pages {
                Some(pages) => PageRange::parse(pages, total_pages)?,
                None => PageRange::from_bounds(2, total_pages),
            })
        } else {
            None
        };

        Ok(PipelineConfig {
            reading_direction: self.reading_direction,
            background,
            total_pages,
            selection,
            trim: TrimConfig {
                enabled: self.trim.enabled,
                min_size: self.trim.min_size,
                margin: self.trim.margin,
                fuzz: self.trim.fuzz,
            },
            spread: SpreadConfig {
                enabled: self.spread.enabled,
                edge_width: self.spread.edge_width,
                edge_margin: self.spread.edge_margin,
                background_distortion: self.spread.background_distortion.clone(),
                left_right_distortion: self.spread.left_right_distortion,
            },
            target: Size::new(self.resize.width, self.resize.height),
            grayscale: GrayscaleConfig {
                pages: grayscale_pages,
                color_depth: self.grayscale.color_depth,
                serpentine: self.grayscale.serpentine,
            },
        })
    }

    fn selection(&self, total_pages: u32) -> Result<PageRange, ConfigError> {
        if total_pages == 0 {
            return Err(ConfigError::Selection("source has no pages".to_string()));
        }
        let start = self.start.max(1);
        let end = match self.end {
            Some(0) | None => total_pages,
            Some(end) => end.min(total_pages),
        };
        if start > total_pages {
            return Err(ConfigError::Selection(format!(
                "start page {start} exceeds total number of pages({total_pages})"
            )));
        }
        if start > end {
            return Err(ConfigError::Selection(format!(
                "start page {start} is after end page {end}"
            )));
        }

        let bounds = PageRange::from_bounds(start, end);
        let selection = match &self.pages {
            Some(pages) => bounds.intersect(&PageRange::parse(pages, total_pages)?),
            None => bounds,
        };
        if selection.is_empty() {
            return Err(ConfigError::Selection("no pages selected".to_string()));
        }
        Ok(selection)
    }
}

fn check_fraction(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min: 0.0,
            max: 1.0,
        })
    }
}
