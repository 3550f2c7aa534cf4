// src/processing/window.rs
//! Frame-by-frame window controller for progressive detection.
//!
//! Advances a fixed-width window across a conditioned signal, feeding only
//! newly exposed samples to the detector, so overlapping frames never
//! rescan a sample and the refractory state stays continuous. The signal
//! is fully buffered before the run starts, so the detection threshold is
//! estimated once over the whole envelope; a quiet display frame must not
//! lower the threshold down to filter residue. Rendering is a consumer of
//! the emitted [`FrameReport`]s, never an owner of detector state.

use crate::processing::detector::{DetectionSummary, FlexionDetector, FlexionEvent};
use crate::processing::threshold::Threshold;
use tracing::{debug, warn};

/// Lifecycle status of a windowed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Frames are still being produced.
    Running,
    /// The window has reached the end of the signal; no further frames.
    Finished,
}

/// Per-frame state record for the display/telemetry layer.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// First sample index visible in this frame.
    pub start_index: usize,
    /// One past the last visible sample index.
    pub end_index: usize,
    /// The visible slice of the filtered signal.
    pub signal: Vec<f64>,
    /// Detection threshold in effect, fixed for the whole run.
    pub threshold: f64,
    /// Events accepted within this frame.
    pub new_events: usize,
    /// Events accepted over the whole run so far.
    pub total_events: usize,
    /// `start_index / sample_rate`, in seconds.
    pub elapsed_seconds: f64,
    /// Whether this frame was rejected instead of scanned.
    pub skipped: bool,
    /// Cumulative count of rejected frames; skips are never silent.
    pub skipped_frames: u64,
    /// Lifecycle status as of this frame.
    pub status: RunStatus,
}

/// Drives the detector over a sliding window of a conditioned signal.
///
/// For a signal of length `L`, frame width `W` and step `s`, the controller
/// produces exactly `ceil((L - W) / s)` `Running` frames followed by a
/// single `Finished` report, then `None` forever; `Running` is never
/// emitted again after `Finished`.
pub struct WindowController {
    filtered: Vec<f64>,
    envelope: Vec<f64>,
    detector: FlexionDetector,
    sample_rate_hz: f64,
    threshold: f64,
    frame_samples: usize,
    frame_step: usize,
    start: usize,
    /// First sample index the detector has not yet seen.
    cursor: usize,
    skipped_frames: u64,
    status: RunStatus,
    finished_reported: bool,
}

impl WindowController {
    /// Build a controller over an already-conditioned signal.
    pub(crate) fn new(
        filtered: Vec<f64>,
        envelope: Vec<f64>,
        detector: FlexionDetector,
        sample_rate_hz: f64,
        threshold_fraction: f64,
        frame_samples: usize,
        frame_step: usize,
    ) -> Self {
        debug_assert_eq!(filtered.len(), envelope.len());
        // One analysis-pass threshold over the full buffered envelope.
        let threshold = Threshold::estimate(&envelope, threshold_fraction).value;
        Self {
            filtered,
            envelope,
            detector,
            sample_rate_hz,
            threshold,
            frame_samples,
            frame_step,
            start: 0,
            cursor: 0,
            skipped_frames: 0,
            status: RunStatus::Running,
            finished_reported: false,
        }
    }

    /// Produce the next frame, the single terminal report, or `None` once
    /// the run is over.
    pub fn next_frame(&mut self) -> Option<FrameReport> {
        if self.finished_reported {
            return None;
        }

        // Terminal rule: stop once the window can no longer advance past
        // fresh samples, i.e. the next frame's end would exceed the signal.
        if self.start + self.frame_samples >= self.filtered.len() {
            self.status = RunStatus::Finished;
            self.finished_reported = true;
            debug!(
                total_events = self.detector.event_count(),
                skipped_frames = self.skipped_frames,
                "windowed run finished"
            );
            return Some(FrameReport {
                start_index: self.start,
                end_index: self.filtered.len(),
                signal: Vec::new(),
                threshold: self.threshold,
                new_events: 0,
                total_events: self.detector.event_count(),
                elapsed_seconds: self.start as f64 / self.sample_rate_hz,
                skipped: false,
                skipped_frames: self.skipped_frames,
                status: RunStatus::Finished,
            });
        }

        let start = self.start;
        let end = start + self.frame_samples;
        let fresh = &self.envelope[self.cursor..end];

        let (new_events, skipped) = if let Some(bad) = fresh.iter().position(|v| !v.is_finite()) {
            // Reject the frame rather than feed NaN into the refractory
            // state; the skip stays visible in the report.
            self.skipped_frames += 1;
            warn!(
                frame_start = start,
                bad_index = self.cursor + bad,
                "skipping frame with non-finite sample"
            );
            (0, true)
        } else {
            let fired = self.detector.scan(fresh, self.cursor, self.threshold);
            (fired, false)
        };

        // Either way the cursor moves past this frame: rejected samples are
        // never rescanned and never re-enter the detector.
        self.cursor = end;
        self.start += self.frame_step;

        Some(FrameReport {
            start_index: start,
            end_index: end,
            signal: self.filtered[start..end].to_vec(),
            threshold: self.threshold,
            new_events,
            total_events: self.detector.event_count(),
            elapsed_seconds: start as f64 / self.sample_rate_hz,
            skipped,
            skipped_frames: self.skipped_frames,
            status: RunStatus::Running,
        })
    }

    /// Current lifecycle status.
    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Detection threshold for this run, estimated once over the full
    /// envelope before the first frame.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Events accepted so far.
    pub fn events(&self) -> &[FlexionEvent] {
        self.detector.events()
    }

    /// Frames rejected so far.
    pub fn skipped_frames(&self) -> u64 {
        self.skipped_frames
    }

    /// Summary of the run as of now; stable once `Finished` is reached.
    pub fn summary(&self) -> DetectionSummary {
        DetectionSummary::from_events(self.detector.events())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(signal: Vec<f64>, width: usize, step: usize) -> WindowController {
        let envelope = signal.iter().map(|x| x.abs()).collect();
        let detector = FlexionDetector::new(1000.0, 0.5);
        WindowController::new(signal, envelope, detector, 1000.0, 0.5, width, step)
    }

    #[test]
    fn test_frame_count_and_single_finish() {
        let mut ctrl = controller(vec![0.0; 3000], 200, 1);

        let mut running = 0;
        let mut finished = 0;
        while let Some(frame) = ctrl.next_frame() {
            match frame.status {
                RunStatus::Running => {
                    assert_eq!(finished, 0, "Running emitted after Finished");
                    running += 1;
                }
                RunStatus::Finished => finished += 1,
            }
        }

        assert_eq!(running, 2800); // ceil((3000 - 200) / 1)
        assert_eq!(finished, 1);
        assert_eq!(ctrl.status(), RunStatus::Finished);
        assert!(ctrl.next_frame().is_none());
    }

    #[test]
    fn test_frame_count_with_larger_step() {
        let mut ctrl = controller(vec![0.0; 3000], 200, 7);

        let mut running = 0;
        while let Some(frame) = ctrl.next_frame() {
            if frame.status == RunStatus::Running {
                running += 1;
            }
        }
        assert_eq!(running, 400); // ceil(2800 / 7)
    }

    #[test]
    fn test_signal_shorter_than_frame_finishes_immediately() {
        let mut ctrl = controller(vec![0.0; 100], 200, 1);
        let frame = ctrl.next_frame().unwrap();
        assert_eq!(frame.status, RunStatus::Finished);
        assert!(ctrl.next_frame().is_none());
    }

    #[test]
    fn test_frame_exposes_visible_slice_and_elapsed_time() {
        let signal: Vec<f64> = (0..400).map(|i| i as f64).collect();
        let mut ctrl = controller(signal, 100, 10);

        let first = ctrl.next_frame().unwrap();
        assert_eq!(first.start_index, 0);
        assert_eq!(first.end_index, 100);
        assert_eq!(first.signal.len(), 100);
        assert_eq!(first.elapsed_seconds, 0.0);

        let second = ctrl.next_frame().unwrap();
        assert_eq!(second.start_index, 10);
        assert_eq!(second.signal[0], 10.0);
        assert!((second.elapsed_seconds - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_overlapping_frames_never_rescan() {
        // One burst inside heavily overlapping frames must count once:
        // rescanning would re-fire after the refractory lapses.
        let mut signal = vec![0.0; 1000];
        for v in signal.iter_mut().skip(300).take(20) {
            *v = 1.0;
        }
        let mut ctrl = controller(signal, 200, 1);
        while ctrl.next_frame().is_some() {}

        assert_eq!(ctrl.summary().total_events, 1);
        assert_eq!(ctrl.summary().indices, vec![300]);
    }

    #[test]
    fn test_non_finite_frame_is_skipped_not_fatal() {
        let mut signal = vec![1.0; 600];
        signal[250] = f64::NAN;
        let mut ctrl = controller(signal, 200, 200);

        let mut reports = Vec::new();
        while let Some(frame) = ctrl.next_frame() {
            reports.push(frame);
        }

        // Frame [200, 400) contains the NaN and is rejected; the run keeps
        // going and the skip is visible in the status records.
        let skipped: Vec<usize> = reports
            .iter()
            .filter(|f| f.skipped)
            .map(|f| f.start_index)
            .collect();
        assert_eq!(skipped, vec![200]);
        assert_eq!(reports.last().unwrap().skipped_frames, 1);

        // Frames before and after the bad one still detected events
        assert!(ctrl.summary().total_events >= 1);
    }

    #[test]
    fn test_threshold_fixed_over_whole_run() {
        // Quiet frame then loud stretch: the threshold tracks the global
        // envelope peak, not whatever the display window happens to show.
        let mut signal = vec![0.1; 600];
        for v in signal.iter_mut().skip(200) {
            *v = 1.0;
        }
        let mut ctrl = controller(signal, 200, 200);
        assert!((ctrl.threshold() - 0.5).abs() < 1e-12);

        let quiet = ctrl.next_frame().unwrap();
        let loud = ctrl.next_frame().unwrap();
        assert!((quiet.threshold - 0.5).abs() < 1e-12);
        assert!((loud.threshold - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_quiet_frames_fire_nothing_before_a_burst() {
        // Low-level noise everywhere, one genuine burst at 900. The quiet
        // leading frames sit far below the global threshold, so the only
        // event is inside the burst and nothing burns the refractory early.
        let mut signal = vec![0.001; 1200];
        for v in signal.iter_mut().skip(900).take(30) {
            *v = 1.0;
        }
        let mut ctrl = controller(signal, 200, 1);
        while ctrl.next_frame().is_some() {}

        let summary = ctrl.summary();
        assert_eq!(summary.total_events, 1);
        assert_eq!(summary.indices, vec![900]);
    }
}
