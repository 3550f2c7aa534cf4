// src/processing/detector.rs
//! Flexion event detection: a level-crossing detector with debounce.
//!
//! This is deliberately *not* an edge detector. Every envelope sample above
//! threshold fires once the refractory window has elapsed, so a sustained
//! contraction produces a train of events spaced one past the refractory
//! distance, not a single event per excursion. Equality with the threshold
//! never fires.

use serde::Serialize;

/// A detected muscle activation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlexionEvent {
    /// Global sample index at which the envelope crossed threshold.
    pub sample_index: usize,
    /// `sample_index / sample_rate`, in seconds.
    pub time_seconds: f64,
}

/// Final summary of a detection run: total count plus the full index and
/// time lists, in the shape the report/display layer consumes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionSummary {
    /// Total number of accepted events.
    pub total_events: usize,
    /// Sample index of every event, strictly increasing.
    pub indices: Vec<usize>,
    /// Time in seconds of every event, parallel to `indices`.
    pub times: Vec<f64>,
}

impl DetectionSummary {
    pub(crate) fn from_events(events: &[FlexionEvent]) -> Self {
        Self {
            total_events: events.len(),
            indices: events.iter().map(|e| e.sample_index).collect(),
            times: events.iter().map(|e| e.time_seconds).collect(),
        }
    }
}

/// Stateful detector for one detection run.
///
/// Owns the refractory state and the append-only event log; one instance
/// per monitored run, never shared across runs. Event indices are unique
/// and strictly increasing.
#[derive(Debug)]
pub struct FlexionDetector {
    sample_rate_hz: f64,
    refractory_samples: usize,
    last_event_index: Option<usize>,
    events: Vec<FlexionEvent>,
}

impl FlexionDetector {
    /// Create a detector with a refractory period given in seconds.
    pub fn new(sample_rate_hz: f64, refractory_period_seconds: f64) -> Self {
        let refractory_samples = (sample_rate_hz * refractory_period_seconds).round() as usize;
        Self {
            sample_rate_hz,
            refractory_samples,
            last_event_index: None,
            events: Vec::new(),
        }
    }

    /// Scan an envelope slice whose first sample sits at global index
    /// `offset`, appending any accepted events. Returns how many fired.
    ///
    /// Incremental callers hand in only newly exposed samples; the
    /// detector carries the refractory state across calls. Offsets are
    /// expected to be monotonic; samples at or before the last accepted
    /// event are treated as inside the refractory window and never fire.
    pub fn scan(&mut self, envelope: &[f64], offset: usize, threshold: f64) -> usize {
        let before = self.events.len();

        for (i, &value) in envelope.iter().enumerate() {
            let index = offset + i;
            if value > threshold && self.refractory_elapsed(index) {
                self.events.push(FlexionEvent {
                    sample_index: index,
                    time_seconds: index as f64 / self.sample_rate_hz,
                });
                self.last_event_index = Some(index);
            }
        }

        self.events.len() - before
    }

    fn refractory_elapsed(&self, index: usize) -> bool {
        match self.last_event_index {
            None => true,
            // checked_sub: an index at or before the last event can never
            // be past the refractory window.
            Some(last) => index
                .checked_sub(last)
                .map_or(false, |gap| gap > self.refractory_samples),
        }
    }

    /// Events accepted so far, in detection order.
    pub fn events(&self) -> &[FlexionEvent] {
        &self.events
    }

    /// Number of events accepted so far.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Refractory distance in samples.
    pub fn refractory_samples(&self) -> usize {
        self.refractory_samples
    }

    /// Discard the event log and refractory state for a fresh run.
    pub fn reset(&mut self) {
        self.last_event_index = None;
        self.events.clear();
    }
}
