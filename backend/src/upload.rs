use crate::errors::ApiError;
use crate::inference::UploadedImage;
use actix_multipart::Multipart;
use futures::TryStreamExt;
use shared::validation::accepts_name_and_mime;
use shared::{ImageKind, MAX_UPLOAD_BYTES};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

pub const IMAGE_FIELD: &str = "image";

/// An upload streamed to disk for the lifetime of one request.
///
/// The file is removed when the guard is dropped, so every early return
/// through `?` cleans up after itself.
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
    file: Option<tokio::fs::File>,
    file_name: String,
    kind: ImageKind,
    size: u64,
}

impl TempUpload {
    async fn create(dir: &Path, file_name: &str, kind: ImageKind) -> Result<Self, ApiError> {
        let path = dir.join(format!("{}_{}", Uuid::new_v4(), sanitize_file_name(file_name)));
        let file = tokio::fs::File::create(&path).await?;
        Ok(Self {
            path,
            file: Some(file),
            file_name: file_name.to_string(),
            kind,
            size: 0,
        })
    }

    async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), ApiError> {
        self.size += chunk.len() as u64;
        if self.size > MAX_UPLOAD_BYTES {
            return Err(ApiError::TooLarge);
        }
        if let Some(file) = self.file.as_mut() {
            file.write_all(chunk).await?;
        }
        Ok(())
    }

    async fn finish(&mut self) -> Result<(), ApiError> {
        if let Some(mut file) = self.file.take() {
            file.flush().await?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Reads the stored bytes back for the predictor.
    pub async fn load(&self) -> Result<UploadedImage, ApiError> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(UploadedImage {
            bytes,
            file_name: self.file_name.clone(),
            kind: self.kind,
        })
    }

    /// Deletes the file now instead of waiting for the guard to drop.
    pub fn remove(mut self) {
        self.remove_file();
    }

    fn remove_file(&mut self) {
        self.file.take();
        match std::fs::remove_file(&self.path) {
            Ok(()) => log::debug!("Removed temporary upload {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to remove temporary upload {}: {}", self.path.display(), e),
        }
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        self.remove_file();
    }
}

/// Pulls the `image` field out of a multipart body into a temporary file.
/// Other fields, and any second `image` field, are drained and ignored.
pub async fn receive_image(mut payload: Multipart, dir: &Path) -> Result<TempUpload, ApiError> {
    let mut upload: Option<TempUpload> = None;

    while let Some(mut field) = payload.try_next().await? {
        if field.name() != Some(IMAGE_FIELD) || upload.is_some() {
            while field.try_next().await?.is_some() {}
            continue;
        }

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or_default()
            .to_string();
        let mime = field
            .content_type()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_default();

        let kind = match ImageKind::from_mime(&mime) {
            Some(kind) if accepts_name_and_mime(&file_name, &mime) => kind,
            _ => return Err(ApiError::InvalidFileType { file_name, mime }),
        };

        let mut temp = TempUpload::create(dir, &file_name, kind).await?;
        while let Some(chunk) = field.try_next().await? {
            temp.write_chunk(&chunk).await?;
        }
        temp.finish().await?;
        upload = Some(temp);
    }

    match upload {
        Some(temp) if temp.size() > 0 => Ok(temp),
        _ => Err(ApiError::MissingImage),
    }
}

/// Keeps only the final path component and replaces anything outside
/// `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .take(100)
        .collect();
    match cleaned.trim_start_matches('.') {
        "" => "upload".to_string(),
        rest => rest.to_string(),
    }
}
