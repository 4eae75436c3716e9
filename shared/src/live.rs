//! Live camera polling state.
//!
//! While streaming, every tick of a fixed-period timer produces a frame
//! ticket. Responses replace the shown detections wholesale, and only a
//! response newer than the last applied one is accepted.

use crate::widget::Ticket;
use crate::{Detection, PredictionResponse};
use serde::{Deserialize, Serialize};

pub const FRAME_INTERVAL_MS: u32 = 2000;

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct LiveCapture {
    pub streaming: bool,
    pub detections: Vec<Detection>,
    pub overall_map: Option<f64>,
    pub frames_sent: u64,
    pub frames_failed: u64,
    pub error: Option<String>,
    issued: Ticket,
    applied: Ticket,
}

impl LiveCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Camera access granted; ticks start producing frames. Counters start
    /// from zero for each session.
    pub fn start(&mut self) {
        self.streaming = true;
        self.error = None;
        self.frames_sent = 0;
        self.frames_failed = 0;
        self.applied = self.issued;
    }

    /// Timer and camera are released; whatever was shown goes away.
    pub fn stop(&mut self) {
        self.streaming = false;
        self.detections.clear();
        self.overall_map = None;
        self.applied = self.issued;
    }

    pub fn camera_denied(&mut self, reason: impl Into<String>) {
        self.stop();
        self.error = Some(reason.into());
    }

    /// Issues a ticket for the frame captured on this tick, or `None` when the
    /// loop is not running.
    pub fn tick(&mut self) -> Option<Ticket> {
        if !self.streaming {
            return None;
        }
        self.issued += 1;
        self.frames_sent += 1;
        Some(self.issued)
    }

    /// Returns `false` if the response was dropped as stale or arrived after stop.
    pub fn apply(&mut self, ticket: Ticket, response: PredictionResponse) -> bool {
        if !self.streaming || ticket <= self.applied {
            return false;
        }
        self.applied = ticket;
        self.detections = response.predictions;
        self.overall_map = response.overall_map;
        true
    }

    /// A failed frame is counted and otherwise skipped; the loop keeps going.
    /// Failures from a stopped session or older than the shown frame are
    /// ignored, same as in [`LiveCapture::apply`].
    pub fn frame_failed(&mut self, ticket: Ticket) -> bool {
        if !self.streaming || ticket <= self.applied {
            return false;
        }
        self.frames_failed += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(labels: &[&str]) -> PredictionResponse {
        PredictionResponse {
            predictions: labels.iter().map(|l| Detection::new(*l, 0.9)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn idle_loop_issues_no_frames() {
        let mut live = LiveCapture::new();
        assert_eq!(live.tick(), None);
        assert_eq!(live.frames_sent, 0);
    }

    #[test]
    fn responses_replace_detections_wholesale() {
        let mut live = LiveCapture::new();
        live.start();
        let first = live.tick().unwrap();
        assert!(live.apply(first, response(&["toolbox", "toolbox"])));
        assert_eq!(live.detections.len(), 2);

        let second = live.tick().unwrap();
        assert!(live.apply(second, response(&["oxygen tank"])));
        assert_eq!(live.detections.len(), 1);
        assert_eq!(live.detections[0].label, "oxygen tank");
    }

    #[test]
    fn slow_older_frame_does_not_overwrite_newer_one() {
        let mut live = LiveCapture::new();
        live.start();
        let slow = live.tick().unwrap();
        let fast = live.tick().unwrap();
        assert!(live.apply(fast, response(&["fire extinguisher"])));
        assert!(!live.apply(slow, response(&["toolbox"])));
        assert_eq!(live.detections[0].label, "fire extinguisher");
    }

    #[test]
    fn failure_is_skipped_and_loop_continues() {
        let mut live = LiveCapture::new();
        live.start();
        let t1 = live.tick().unwrap();
        assert!(live.frame_failed(t1));
        assert!(live.streaming);
        let t2 = live.tick().unwrap();
        assert!(live.apply(t2, response(&["car"])));
        assert_eq!(live.frames_failed, 1);
        assert_eq!(live.frames_sent, 2);
    }

    #[test]
    fn stop_clears_and_ignores_late_responses() {
        let mut live = LiveCapture::new();
        live.start();
        let ticket = live.tick().unwrap();
        live.stop();
        assert!(!live.apply(ticket, response(&["person"])));
        assert!(live.detections.is_empty());
        assert_eq!(live.tick(), None);
    }

    #[test]
    fn restart_ignores_frames_from_previous_session() {
        let mut live = LiveCapture::new();
        live.start();
        let old = live.tick().unwrap();
        live.stop();
        live.start();
        assert!(!live.apply(old, response(&["person"])));
        let fresh = live.tick().unwrap();
        assert!(live.apply(fresh, response(&["person"])));
    }

    #[test]
    fn failures_from_an_earlier_session_are_not_counted() {
        let mut live = LiveCapture::new();
        live.start();
        let old = live.tick().unwrap();
        live.stop();
        assert!(!live.frame_failed(old));

        live.start();
        assert_eq!(live.frames_sent, 0);
        assert!(!live.frame_failed(old));
        assert_eq!(live.frames_failed, 0);

        let slow = live.tick().unwrap();
        let fast = live.tick().unwrap();
        assert!(live.apply(fast, response(&["toolbox"])));
        assert!(!live.frame_failed(slow));
        assert_eq!(live.frames_failed, 0);
        assert_eq!(live.frames_sent, 2);
    }

    #[test]
    fn denied_camera_leaves_loop_inactive() {
        let mut live = LiveCapture::new();
        live.camera_denied("Permission denied");
        assert!(!live.streaming);
        assert_eq!(live.error.as_deref(), Some("Permission denied"));
    }
}
