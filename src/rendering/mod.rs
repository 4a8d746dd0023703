pub mod compare;
pub mod grayscale;
pub mod pixel_buffer;
pub mod png_encoder;
pub mod resize;
pub mod spread;
pub mod trim;

pub use compare::{is_color_similar, rmse_distortion, squared_distortion};
pub use grayscale::GrayscaleQuantizer;
pub use pixel_buffer::{ColorSampler, PixelBuffer};
pub use png_encoder::{PngEncoder, PNG_MEDIA_TYPE};
pub use resize::Resizer;
pub use spread::{merge, SpreadDetector};
pub use trim::Trimmer;
