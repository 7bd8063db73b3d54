//! Frame -> wire representation (JPEG bytes, then base64 text).

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;

use readaloud_types::error::ExtractionError;
use readaloud_types::llm::ImagePayload;

use crate::capture::Frame;

/// Encode a frame as a base64 JPEG payload.
///
/// Alpha is dropped; JPEG has no transparency. `quality` is clamped to 1..=100.
pub fn encode_frame(frame: &Frame, quality: u8) -> Result<ImagePayload, ExtractionError> {
    let rgb = frame.image().to_rgb8();
    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
    rgb.write_with_encoder(encoder)
        .map_err(|e| ExtractionError::Encode(e.to_string()))?;

    Ok(ImagePayload::jpeg(STANDARD.encode(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_frame_produces_jpeg() {
        let frame = Frame::from_rgb8(8, 8, vec![200; 8 * 8 * 3]).unwrap();
        let payload = encode_frame(&frame, 85).unwrap();
        assert_eq!(payload.media_type, "image/jpeg");

        let bytes = STANDARD.decode(&payload.data).unwrap();
        // JPEG SOI marker
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_frame_accepts_out_of_range_quality() {
        let frame = Frame::from_rgb8(4, 4, vec![10; 4 * 4 * 3]).unwrap();
        assert!(encode_frame(&frame, 0).is_ok());
    }
}
