//! Frame sources that read page images from disk.
//!
//! - `DirectoryFrameSource`: every page image in a directory, in file-name order
//! - `FileFrameSource`: one image file, re-read on every capture

pub mod directory;
pub mod file;

use std::path::Path;

use readaloud_core::capture::Frame;
use readaloud_types::capture::{CaptureError, Rotation};

pub use directory::DirectoryFrameSource;
pub use file::FileFrameSource;

/// File extensions treated as page images (compared case-insensitively).
pub const PAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

pub(crate) fn is_page_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| PAGE_EXTENSIONS.iter().any(|p| ext.eq_ignore_ascii_case(p)))
}

/// Decode an image file and apply the configured rotation.
pub(crate) fn load_frame(path: &Path, rotation: Rotation) -> Result<Frame, CaptureError> {
    let image = image::open(path).map_err(|e| match e {
        image::ImageError::IoError(io) => CaptureError::Io(io),
        other => CaptureError::Decode {
            path: path.display().to_string(),
            message: other.to_string(),
        },
    })?;
    Ok(Frame::new(image).rotated(rotation))
}
