use super::{Predictor, PredictorError, SUCCESS_MESSAGE, UploadedImage};
use async_trait::async_trait;
use shared::{DemoVariant, Detection, PredictionResponse};

/// Stands in for the model service: answers every image with a fixed list.
#[derive(Debug, Clone)]
pub struct MockPredictor {
    variant: DemoVariant,
}

impl MockPredictor {
    pub fn new(variant: DemoVariant) -> Self {
        Self { variant }
    }

    pub fn canned_response(&self) -> PredictionResponse {
        match self.variant {
            DemoVariant::AiVision => PredictionResponse {
                predictions: vec![
                    Detection::new("person", 0.952),
                    Detection::new("car", 0.876),
                    Detection::new("bicycle", 0.731),
                ],
                message: Some(SUCCESS_MESSAGE.to_string()),
                ..Default::default()
            },
            DemoVariant::SpaceStation => PredictionResponse {
                predictions: vec![
                    Detection::new("toolbox", 0.942).with_map_score(0.912),
                    Detection::new("oxygen tank", 0.897).with_map_score(0.861),
                    Detection::new("fire extinguisher", 0.921).with_map_score(0.889),
                ],
                message: Some(SUCCESS_MESSAGE.to_string()),
                overall_map: Some(0.847),
                ..Default::default()
            },
        }
    }
}

#[async_trait]
impl Predictor for MockPredictor {
    async fn predict(&self, image: &UploadedImage) -> Result<PredictionResponse, PredictorError> {
        log::debug!(
            "Simulating inference for {} ({} bytes, {:?})",
            image.file_name,
            image.bytes.len(),
            image.kind
        );
        Ok(self.canned_response())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
