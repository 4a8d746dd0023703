pub mod color;
pub mod config;
pub mod geometry;
pub mod page;
pub mod page_range;

pub use color::{Color16, COLOR_RANGE};
pub use config::{
    AppConfig, GrayscaleConfig, OutputFormat, PipelineConfig, ReadingDirection, SpreadConfig,
    TrimConfig,
};
pub use geometry::{Orientation, Point, Rect, Size};
pub use page::Page;
pub use page_range::PageRange;
