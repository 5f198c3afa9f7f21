use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::{error::TestImageError, render::create_test_image, Element};

pub const TEST_IMAGE_FILE_NAME: &str = "test-image.png";

/// The integration-test directory has to exist before anything is written
/// into it.
pub fn validate_test_setup(test_dir: &Path) -> Result<(), TestImageError> {
    if test_dir.is_dir() {
        debug!("test directory present: {}", test_dir.display());
        Ok(())
    } else {
        Err(TestImageError::MissingTestDir(test_dir.to_path_buf()))
    }
}

/// `override_path` if set, else `<test_dir>/test-image.png`.
pub fn test_image_path(test_dir: &Path, override_path: Option<&Path>) -> PathBuf {
    override_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| test_dir.join(TEST_IMAGE_FILE_NAME))
}

/// Renders the image only when nothing is at `image_path` yet. Returns
/// whether a new file was written.
pub fn ensure_test_image(
    image_path: &Path,
    on_element: impl FnMut(Element),
) -> Result<bool, TestImageError> {
    if image_path.exists() {
        info!("reusing existing test image {}", image_path.display());
        return Ok(false);
    }
    create_test_image(image_path, on_element)?;
    Ok(true)
}
