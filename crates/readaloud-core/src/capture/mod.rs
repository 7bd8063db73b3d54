//! Frame type and the FrameSource port.
//!
//! Concrete sources (page image directories, single files) live in
//! readaloud-infra. The core only needs "give me the current page".

use image::DynamicImage;

use readaloud_types::capture::{CaptureError, Rotation};

/// One captured page as an in-memory raster image.
#[derive(Debug, Clone)]
pub struct Frame {
    image: DynamicImage,
}

impl Frame {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Build a frame from a packed RGB8 buffer. Returns `None` when the
    /// buffer length does not match `width * height * 3`.
    pub fn from_rgb8(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        image::RgbImage::from_raw(width, height, pixels).map(|buf| Self {
            image: DynamicImage::ImageRgb8(buf),
        })
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Apply an orientation correction.
    pub fn rotated(self, rotation: Rotation) -> Self {
        let image = match rotation {
            Rotation::None => self.image,
            Rotation::Cw90 => self.image.rotate90(),
            Rotation::Cw180 => self.image.rotate180(),
            Rotation::Cw270 => self.image.rotate270(),
        };
        Self { image }
    }
}

/// Anything that can produce still page images on demand.
///
/// Lifecycle: `open` once, `read_frame` per page cycle, `close` once at
/// session end. `read_frame` returning `Ok(None)` means "no frame right
/// now"; the session treats it as an acquisition failure for that cycle.
pub trait FrameSource: Send {
    /// Short description for banners and logs (e.g. a directory path).
    fn describe(&self) -> String;

    fn open(&mut self) -> Result<(), CaptureError>;

    fn read_frame(&mut self) -> Result<Option<Frame>, CaptureError>;

    fn close(&mut self);
}
