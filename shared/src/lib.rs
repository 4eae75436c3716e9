use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

pub mod live;
pub mod validation;
pub mod widget;

pub use validation::{ImageKind, UploadRejection, MAX_UPLOAD_BYTES};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Detection {
    #[serde(rename = "class")]
    pub label: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<[f32; 4]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_score: Option<f64>,
}

impl Detection {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
            bbox: None,
            map_score: None,
        }
    }

    pub fn with_map_score(mut self, map_score: f64) -> Self {
        self.map_score = Some(map_score);
        self
    }

    /// Confidence and mAP must be finite and inside [0, 1].
    pub fn is_well_formed(&self) -> bool {
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        in_unit(self.confidence) && self.map_score.is_none_or(in_unit)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PredictionResponse {
    #[serde(default)]
    pub predictions: Vec<Detection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_map: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<f64>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FrameRequest {
    pub image: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
    pub variant: String,
    pub predictor: String,
    pub timestamp: String,
}

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum DemoVariant {
    #[default]
    AiVision,
    SpaceStation,
}

impl DemoVariant {
    pub fn title(&self) -> &'static str {
        match self {
            DemoVariant::AiVision => "AI Vision",
            DemoVariant::SpaceStation => "Space Station Equipment Detection",
        }
    }

    pub fn api_name(&self) -> &'static str {
        match self {
            DemoVariant::AiVision => "AI Vision API",
            DemoVariant::SpaceStation => "Station Detection API",
        }
    }
}

/// Renders a confidence in [0, 1] as a percentage with one decimal, e.g. `0.892` -> `"89.2%"`.
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}
