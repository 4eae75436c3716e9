pub mod mock;
pub mod remote;

use crate::config::Config;
use async_trait::async_trait;
use shared::{ImageKind, PredictionResponse};
use std::sync::Arc;
use thiserror::Error;

pub use mock::MockPredictor;

pub const SUCCESS_MESSAGE: &str = "Object detection completed successfully";
pub use remote::RemotePredictor;

/// An image that passed validation, held in memory for one request.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub kind: ImageKind,
}

#[derive(Debug, Error)]
pub enum PredictorError {
    #[error("model service request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("model service answered with status {0}")]
    Status(reqwest::StatusCode),
    #[error("model service endpoint could not be built: {0}")]
    Endpoint(#[from] url::ParseError),
}

impl PredictorError {
    /// True when the failure happened on the far side of the model service call.
    pub fn is_upstream(&self) -> bool {
        matches!(self, PredictorError::Request(_) | PredictorError::Status(_))
    }
}

/// Image bytes in, detection list out. Handlers only ever see this trait.
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, image: &UploadedImage) -> Result<PredictionResponse, PredictorError>;

    fn name(&self) -> &'static str;
}

pub fn build_predictor(config: &Config) -> Result<Arc<dyn Predictor>, PredictorError> {
    match &config.model_service_url {
        Some(url) => {
            let remote = RemotePredictor::new(url, config.model_timeout)?;
            log::info!("Forwarding predictions to model service at {}", remote.endpoint());
            Ok(Arc::new(remote))
        }
        None => {
            log::info!("No MODEL_SERVICE_URL set, serving mock {} predictions", config.variant);
            Ok(Arc::new(MockPredictor::new(config.variant)))
        }
    }
}
