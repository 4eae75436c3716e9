use super::{Predictor, PredictorError, UploadedImage};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use shared::{Detection, PredictionResponse};
use std::time::Duration;
use url::Url;

/// Forwards images to an external model service speaking `POST /predict`
/// with a multipart `image` field and answering `{"predictions": [...]}`.
#[derive(Debug, Clone)]
pub struct RemotePredictor {
    client: reqwest::Client,
    endpoint: Url,
}

impl RemotePredictor {
    pub fn new(base: &Url, timeout: Duration) -> Result<Self, PredictorError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: predict_endpoint(base)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// `http://host:5000` and `http://host:5000/models/` both become `.../predict`;
/// a base that already ends in `/predict` is used as is.
fn predict_endpoint(base: &Url) -> Result<Url, url::ParseError> {
    if base.path().trim_end_matches('/').ends_with("/predict") {
        return Ok(base.clone());
    }
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join("predict")
}

#[async_trait]
impl Predictor for RemotePredictor {
    async fn predict(&self, image: &UploadedImage) -> Result<PredictionResponse, PredictorError> {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(image.kind.mime())?;
        let form = Form::new().part("image", part);

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PredictorError::Status(status));
        }

        let mut body: PredictionResponse = response.json().await?;
        let received = body.predictions.len();
        body.predictions.retain(Detection::is_well_formed);
        if body.predictions.len() != received {
            log::warn!(
                "Dropped {} malformed detections from model service",
                received - body.predictions.len()
            );
        }
        Ok(body)
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
