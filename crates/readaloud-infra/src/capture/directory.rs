//! DirectoryFrameSource -- pages from a folder of images.
//!
//! Suits flatbed scanners and camera apps that drop one file per shot. The
//! directory is listed on `open`; files are served in file-name order, one
//! per capture. Once every page has been served, `read_frame` yields `None`.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use tracing::debug;

use readaloud_core::capture::{Frame, FrameSource};
use readaloud_types::capture::{CaptureError, Rotation};

use super::{is_page_image, load_frame};

pub struct DirectoryFrameSource {
    dir: PathBuf,
    rotation: Rotation,
    pending: Option<VecDeque<PathBuf>>,
}

impl DirectoryFrameSource {
    pub fn new(dir: impl Into<PathBuf>, rotation: Rotation) -> Self {
        Self {
            dir: dir.into(),
            rotation,
            pending: None,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Pages not yet served. `None` before `open`.
    pub fn remaining(&self) -> Option<usize> {
        self.pending.as_ref().map(VecDeque::len)
    }
}

impl FrameSource for DirectoryFrameSource {
    fn describe(&self) -> String {
        format!("directory {}", self.dir.display())
    }

    fn open(&mut self) -> Result<(), CaptureError> {
        if !self.dir.is_dir() {
            return Err(CaptureError::Unavailable(format!(
                "{} is not a directory",
                self.dir.display()
            )));
        }

        let mut pages = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() && is_page_image(&path) {
                pages.push(path);
            }
        }
        pages.sort();

        if pages.is_empty() {
            return Err(CaptureError::Unavailable(format!(
                "no page images (jpg, jpeg, png) in {}",
                self.dir.display()
            )));
        }

        debug!(dir = %self.dir.display(), pages = pages.len(), "Page directory opened");
        self.pending = Some(pages.into());
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Option<Frame>, CaptureError> {
        let pending = self.pending.as_mut().ok_or(CaptureError::NotOpen)?;
        let Some(path) = pending.pop_front() else {
            return Ok(None);
        };
        debug!(path = %path.display(), "Loading page");
        load_frame(&path, self.rotation).map(Some)
    }

    fn close(&mut self) {
        self.pending = None;
    }
}
