use crate::frame::DataUrlError;
use crate::inference::PredictorError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use shared::ErrorBody;
use shared::validation::ACCEPTED_FORMATS_LABEL;
use thiserror::Error;

const PROCESSING_FAILED: &str = "Failed to process image";
const PROCESSING_FAILED_MESSAGE: &str =
    "An error occurred while processing your image. Please try again.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request carried no image field")]
    MissingImage,
    #[error("rejected upload {file_name:?} with type {mime:?}")]
    InvalidFileType { file_name: String, mime: String },
    #[error("upload exceeded the size limit")]
    TooLarge,
    #[error("invalid frame: {0}")]
    InvalidFrame(#[from] DataUrlError),
    #[error("malformed request: {0}")]
    BadRequest(String),
    #[error("malformed multipart body: {0}")]
    Multipart(#[from] actix_multipart::MultipartError),
    #[error("temporary upload I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Predictor(#[from] PredictorError),
}

impl ApiError {
    fn body(&self) -> ErrorBody {
        let (error, message) = match self {
            ApiError::MissingImage => (
                "No image file provided".to_string(),
                format!("Please upload an image file ({})", ACCEPTED_FORMATS_LABEL),
            ),
            ApiError::InvalidFileType { .. } => (
                "Invalid file type".to_string(),
                format!("Only image files ({}) are allowed", ACCEPTED_FORMATS_LABEL),
            ),
            ApiError::TooLarge => (
                "File too large".to_string(),
                "Images must be 10MB or smaller".to_string(),
            ),
            ApiError::InvalidFrame(err) => ("Invalid frame".to_string(), err.to_string()),
            ApiError::BadRequest(detail) => ("Invalid request".to_string(), detail.clone()),
            ApiError::Multipart(_) => (
                "Invalid request".to_string(),
                "The upload could not be read as multipart form data".to_string(),
            ),
            ApiError::Io(_) | ApiError::Predictor(_) => (
                PROCESSING_FAILED.to_string(),
                PROCESSING_FAILED_MESSAGE.to_string(),
            ),
        };
        ErrorBody { error, message }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingImage
            | ApiError::InvalidFileType { .. }
            | ApiError::InvalidFrame(_)
            | ApiError::BadRequest(_)
            | ApiError::Multipart(_) => StatusCode::BAD_REQUEST,
            ApiError::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Predictor(err) if err.is_upstream() => StatusCode::BAD_GATEWAY,
            ApiError::Io(_) | ApiError::Predictor(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Prediction error: {}", self);
        } else {
            log::warn!("Rejected request: {}", self);
        }
        HttpResponse::build(status).json(self.body())
    }
}
