use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;
use shared::{ImageKind, MAX_UPLOAD_BYTES};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DataUrlError {
    #[error("expected a `data:<type>;base64,<payload>` URL")]
    Malformed,
    #[error("frame type {0:?} is not JPEG, PNG or WEBP")]
    UnsupportedType(String),
    #[error("frame payload is not valid base64")]
    InvalidBase64,
    #[error("frame is larger than 10MB")]
    TooLarge,
    #[error("frame content is not a JPEG, PNG or WEBP image")]
    UnrecognisedContent,
}

/// Decodes a canvas data URL into raw image bytes, checking the declared type,
/// the size cap and the actual magic bytes.
pub fn decode_data_url(input: &str) -> Result<(ImageKind, Vec<u8>), DataUrlError> {
    let rest = input.trim().strip_prefix("data:").ok_or(DataUrlError::Malformed)?;
    let (meta, payload) = rest.split_once(',').ok_or(DataUrlError::Malformed)?;
    let mime = meta.strip_suffix(";base64").ok_or(DataUrlError::Malformed)?;
    ImageKind::from_mime(mime).ok_or_else(|| DataUrlError::UnsupportedType(mime.to_string()))?;

    // Every 4 base64 chars carry 3 bytes; refuse before allocating.
    if (payload.len() as u64 / 4) * 3 > MAX_UPLOAD_BYTES + 3 {
        return Err(DataUrlError::TooLarge);
    }
    let bytes = STANDARD.decode(payload).map_err(|_| DataUrlError::InvalidBase64)?;
    if bytes.len() as u64 > MAX_UPLOAD_BYTES {
        return Err(DataUrlError::TooLarge);
    }

    let kind = match image::guess_format(&bytes) {
        Ok(ImageFormat::Jpeg) => ImageKind::Jpeg,
        Ok(ImageFormat::Png) => ImageKind::Png,
        Ok(ImageFormat::WebP) => ImageKind::Webp,
        _ => return Err(DataUrlError::UnrecognisedContent),
    };
    Ok((kind, bytes))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    pub(crate) fn jpeg_data_url() -> String {
        format!("data:image/jpeg;base64,{}", STANDARD.encode(JPEG_BYTES))
    }

    #[test]
    fn decodes_canvas_jpeg() {
        let (kind, bytes) = decode_data_url(&jpeg_data_url()).unwrap();
        assert_eq!(kind, ImageKind::Jpeg);
        assert_eq!(bytes, JPEG_BYTES);
    }

    #[test]
    fn png_magic_is_recognised() {
        let png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
        let url = format!("data:image/png;base64,{}", STANDARD.encode(png));
        assert_eq!(decode_data_url(&url).unwrap().0, ImageKind::Png);
    }

    #[test]
    fn rejects_malformed_urls() {
        assert_eq!(decode_data_url("hello"), Err(DataUrlError::Malformed));
        assert_eq!(decode_data_url("data:image/jpeg,abc"), Err(DataUrlError::Malformed));
        assert_eq!(decode_data_url("data:image/jpeg;base64"), Err(DataUrlError::Malformed));
    }

    #[test]
    fn rejects_other_types_and_bad_payloads() {
        assert_eq!(
            decode_data_url("data:image/gif;base64,R0lGODlh"),
            Err(DataUrlError::UnsupportedType("image/gif".into()))
        );
        assert_eq!(
            decode_data_url("data:image/jpeg;base64,!!!not-base64!!!"),
            Err(DataUrlError::InvalidBase64)
        );
        let text = format!("data:image/jpeg;base64,{}", STANDARD.encode("just some text"));
        assert_eq!(decode_data_url(&text), Err(DataUrlError::UnrecognisedContent));
    }

    #[test]
    fn rejects_oversized_frames_before_decoding() {
        let payload = "A".repeat((MAX_UPLOAD_BYTES as usize / 3 + 2) * 4);
        let url = format!("data:image/jpeg;base64,{}", payload);
        assert_eq!(decode_data_url(&url), Err(DataUrlError::TooLarge));
    }
}
