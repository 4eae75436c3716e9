use derive_more::Display;
use std::str::FromStr;
use strum_macros::EnumString;

pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

pub const ACCEPTED_FORMATS_LABEL: &str = "JPEG, JPG, PNG, WEBP";

/// The closed set of image formats the demo accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ImageKind {
    #[strum(serialize = "jpeg", serialize = "jpg")]
    Jpeg,
    #[strum(serialize = "png")]
    Png,
    #[strum(serialize = "webp")]
    Webp,
}

impl ImageKind {
    /// Parses `image/<subtype>`, ignoring any parameters after `;`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        let (top, sub) = essence.split_once('/')?;
        if !top.eq_ignore_ascii_case("image") {
            return None;
        }
        Self::from_str(sub).ok()
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::from_str(ext.trim_start_matches('.')).ok()
    }

    /// Looks at the extension of a file name such as `photo.JPG`.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        Self::from_extension(ext)
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::Webp => "image/webp",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum UploadRejection {
    #[display(fmt = "Please select an image file (JPG, PNG, WEBP)")]
    UnsupportedType(String),
    #[display(fmt = "Please select an image smaller than 10MB")]
    TooLarge(u64),
}

impl UploadRejection {
    pub fn title(&self) -> &'static str {
        match self {
            UploadRejection::UnsupportedType(_) => "Invalid File",
            UploadRejection::TooLarge(_) => "File Too Large",
        }
    }
}

/// Client-side gate applied before any network call is made.
pub fn validate_upload(mime: &str, size: u64) -> Result<ImageKind, UploadRejection> {
    let kind =
        ImageKind::from_mime(mime).ok_or_else(|| UploadRejection::UnsupportedType(mime.into()))?;
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadRejection::TooLarge(size));
    }
    Ok(kind)
}

/// Server-side gate: extension and MIME type must each be in the accepted set.
pub fn accepts_name_and_mime(file_name: &str, mime: &str) -> bool {
    ImageKind::from_file_name(file_name).is_some() && ImageKind::from_mime(mime).is_some()
}
