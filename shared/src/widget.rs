//! State of the single-image "try it" widget.
//!
//! The component owns one [`UploadWidget`] and feeds it user events and
//! network completions. Every submission is tagged with a [`Ticket`]; only the
//! completion carrying the latest ticket is applied, so a slow earlier
//! response can never overwrite a newer one.

use crate::validation::{UploadRejection, validate_upload};
use crate::{Detection, PredictionResponse, format_confidence};
use serde::{Deserialize, Serialize};

pub type Ticket = u64;

pub const GENERIC_FAILURE_TITLE: &str = "Analysis Failed";
pub const GENERIC_FAILURE_TEXT: &str = "Failed to process image. Please try again.";
pub const DEFAULT_SUCCESS_TEXT: &str = "Image processed successfully";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Completed,
    Failed,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub text: String,
}

impl Notice {
    fn error(title: &str, text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.to_string(),
            text: text.into(),
        }
    }
}

/// A file the user picked, described by what the browser tells us about it.
#[derive(Clone, Debug)]
pub struct FileCandidate {
    pub name: String,
    pub mime: String,
    pub size: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResultRow {
    pub label: String,
    pub confidence: String,
    pub map_score: Option<String>,
}

/// What the widget should currently show.
#[derive(Clone, Debug, PartialEq)]
pub enum View {
    Upload,
    Loading,
    Results(Vec<ResultRow>),
    Empty,
    Failed,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct UploadWidget {
    pub preview: Option<String>,
    pub file_name: Option<String>,
    pub predictions: Vec<Detection>,
    pub overall_map: Option<f64>,
    pub phase: Phase,
    pub notice: Option<Notice>,
    pub is_dragging: bool,
    pending: Option<Ticket>,
    issued: Ticket,
}

impl UploadWidget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `file`; on success installs the preview and returns the ticket
    /// the caller must attach to the one submission it now issues.
    pub fn select(
        &mut self,
        file: &FileCandidate,
        preview: impl Into<String>,
    ) -> Result<Ticket, UploadRejection> {
        self.is_dragging = false;
        if let Err(rejection) = validate_upload(&file.mime, file.size) {
            self.notice = Some(Notice::error(rejection.title(), rejection.to_string()));
            return Err(rejection);
        }

        self.issued += 1;
        self.pending = Some(self.issued);
        self.preview = Some(preview.into());
        self.file_name = Some(file.name.clone());
        self.predictions.clear();
        self.overall_map = None;
        self.phase = Phase::Submitting;
        self.notice = None;
        Ok(self.issued)
    }

    /// Applies a completion. Returns `false` when the ticket is stale and the
    /// result was dropped.
    pub fn resolve(&mut self, ticket: Ticket, outcome: Result<PredictionResponse, String>) -> bool {
        if self.pending != Some(ticket) {
            return false;
        }
        self.pending = None;

        match outcome {
            Ok(response) => {
                self.predictions = response.predictions;
                self.overall_map = response.overall_map;
                self.phase = Phase::Completed;
                self.notice = Some(Notice {
                    kind: NoticeKind::Success,
                    title: "Analysis Complete".to_string(),
                    text: response
                        .message
                        .unwrap_or_else(|| DEFAULT_SUCCESS_TEXT.to_string()),
                });
            }
            Err(_) => {
                self.phase = Phase::Failed;
                self.notice = Some(Notice::error(GENERIC_FAILURE_TITLE, GENERIC_FAILURE_TEXT));
            }
        }
        true
    }

    /// Back to the initial upload state. An in-flight request keeps running
    /// but its completion will be ignored.
    pub fn reset(&mut self) {
        *self = Self {
            issued: self.issued,
            ..Self::default()
        };
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.is_dragging = dragging;
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Submitting
    }

    pub fn view(&self) -> View {
        match self.phase {
            Phase::Idle => View::Upload,
            Phase::Failed => View::Failed,
            Phase::Submitting => View::Loading,
            Phase::Completed if self.predictions.is_empty() => View::Empty,
            Phase::Completed => View::Results(result_rows(&self.predictions)),
        }
    }
}

pub fn result_rows(predictions: &[Detection]) -> Vec<ResultRow> {
    predictions
        .iter()
        .map(|d| ResultRow {
            label: d.label.clone(),
            confidence: format_confidence(d.confidence),
            map_score: d.map_score.map(|m| format!("{m:.3}")),
        })
        .collect()
}
