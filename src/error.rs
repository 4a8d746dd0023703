use std::path::PathBuf;

use thiserror::Error;

use crate::models::Rect;

/// Invalid configuration. Raised before any page is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unsupported color depth: {0}-bits")]
    UnsupportedColorDepth(u8),

    #[error("Invalid page range '{input}': {reason}")]
    PageRange { input: String, reason: String },

    #[error("Background color list is empty")]
    EmptyBackground,

    #[error("Background distortion threshold list is empty")]
    EmptyThresholds,

    #[error("Invalid color '{0}': expected #rrggbb, white or black")]
    Color(String),

    #[error("{name} must be within {min}..={max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid page selection: {0}")]
    Selection(String),

    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Failure while fetching a page from a [`PageSource`](crate::services::PageSource).
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Page {page} is out of range (1..={total})")]
    OutOfRange { page: u32, total: u32 },

    #[error("Unsupported page source: {0}")]
    Unsupported(PathBuf),

    #[error("Decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure while handing a finished page to a [`PageSink`](crate::services::PageSink).
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Manifest error: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("Sink already finished")]
    Finished,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to load page {page}: {source}")]
    Source {
        page: u32,
        #[source]
        source: SourceError,
    },

    #[error("Failed to write page: {0}")]
    Sink(#[from] SinkError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Page {page}: {operation} failed on {rect}: {reason}")]
    Computation {
        page: u32,
        operation: &'static str,
        rect: Rect,
        reason: String,
    },

    #[error("PNG encode error: {0}")]
    Encode(String),

    #[error("Quantize error: {0}")]
    Quantize(#[from] gray_dither::QuantizeError),

    #[error("Cancelled before page {0}")]
    Cancelled(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_color_depth() {
        let error = ConfigError::UnsupportedColorDepth(3);
        assert_eq!(error.to_string(), "Unsupported color depth: 3-bits");
    }

    #[test]
    fn test_config_error_page_range() {
        let error = ConfigError::PageRange {
            input: "5-2".to_string(),
            reason: "5-2 is invalid range".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid page range '5-2': 5-2 is invalid range"
        );
    }

    #[test]
    fn test_config_error_out_of_range() {
        let error = ConfigError::OutOfRange {
            name: "fuzz",
            value: 1.5,
            min: 0.0,
            max: 1.0,
        };
        assert_eq!(error.to_string(), "fuzz must be within 0..=1, got 1.5");
    }

    #[test]
    fn test_source_error_out_of_range() {
        let error = SourceError::OutOfRange { page: 9, total: 4 };
        assert_eq!(error.to_string(), "Page 9 is out of range (1..=4)");
    }

    #[test]
    fn test_pipeline_error_source_context() {
        let error = PipelineError::Source {
            page: 3,
            source: SourceError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "missing",
            )),
        };
        assert_eq!(error.to_string(), "Failed to load page 3: IO error: missing");
    }

    #[test]
    fn test_pipeline_error_computation() {
        let error = PipelineError::Computation {
            page: 7,
            operation: "crop",
            rect: Rect::new(4, 2, 0, 10),
            reason: "empty rect".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Page 7: crop failed on 0x10+4+2: empty rect"
        );
    }

    #[test]
    fn test_pipeline_error_from_config_error() {
        let error: PipelineError = ConfigError::EmptyBackground.into();
        match error {
            PipelineError::Config(ConfigError::EmptyBackground) => {}
            _ => panic!("Expected Config variant"),
        }
    }

    #[test]
    fn test_pipeline_error_cancelled() {
        assert_eq!(
            PipelineError::Cancelled(12).to_string(),
            "Cancelled before page 12"
        );
    }
}
