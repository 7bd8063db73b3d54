//! FileFrameSource -- a single page image, re-read on every capture.

use std::path::{Path, PathBuf};

use readaloud_core::capture::{Frame, FrameSource};
use readaloud_types::capture::{CaptureError, Rotation};

use super::load_frame;

pub struct FileFrameSource {
    path: PathBuf,
    rotation: Rotation,
    open: bool,
}

impl FileFrameSource {
    pub fn new(path: impl Into<PathBuf>, rotation: Rotation) -> Self {
        Self {
            path: path.into(),
            rotation,
            open: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSource for FileFrameSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    fn open(&mut self) -> Result<(), CaptureError> {
        if !self.path.is_file() {
            return Err(CaptureError::Unavailable(format!(
                "{} does not exist or is not a file",
                self.path.display()
            )));
        }
        self.open = true;
        Ok(())
    }

    /// Re-reads the file, so an external tool can overwrite it between captures.
    fn read_frame(&mut self) -> Result<Option<Frame>, CaptureError> {
        if !self.open {
            return Err(CaptureError::NotOpen);
        }
        load_frame(&self.path, self.rotation).map(Some)
    }

    fn close(&mut self) {
        self.open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::test_support::write_png;
    use tempfile::TempDir;

    #[test]
    fn test_reads_same_page_repeatedly() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("page.png");
        write_png(&path, 5, 3, 128);

        let mut source = FileFrameSource::new(&path, Rotation::None);
        source.open().unwrap();
        for _ in 0..2 {
            let frame = source.read_frame().unwrap().unwrap();
            assert_eq!((frame.width(), frame.height()), (5, 3));
        }
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let tmp = TempDir::new().unwrap();
        let mut source = FileFrameSource::new(tmp.path().join("missing.jpg"), Rotation::None);
        assert!(matches!(source.open(), Err(CaptureError::Unavailable(_))));
    }

    #[test]
    fn test_closed_source_refuses_reads() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("page.png");
        write_png(&path, 2, 2, 0);

        let mut source = FileFrameSource::new(&path, Rotation::Cw180);
        source.open().unwrap();
        source.close();
        assert!(matches!(source.read_frame(), Err(CaptureError::NotOpen)));
    }
}
