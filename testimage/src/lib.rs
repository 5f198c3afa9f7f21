pub mod analysis;
pub mod error;
pub mod expectations;
pub mod font;
pub mod render;
pub mod setup;

pub use analysis::{analyze_test_image, inspect_image, ImageAnalysis};
pub use error::TestImageError;
pub use render::{create_test_image, render_test_image, Element};
pub use setup::{ensure_test_image, test_image_path, validate_test_setup};
