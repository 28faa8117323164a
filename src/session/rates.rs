//! Response-rate tracking for charting
//!
//! Each behavior class keeps a sliding window of 0/1 occurrence flags, one
//! per tick. Once per simulated second the window is converted into a
//! responses-per-minute sample and appended to the chart series.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::behavior::emission::Emission;
use crate::core::types::SimTime;

/// Fixed-length window of per-tick occurrence flags
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OccurrenceWindow {
    flags: VecDeque<u8>,
    capacity: usize,
}

impl OccurrenceWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            flags: VecDeque::with_capacity(capacity + 1),
            capacity: capacity.max(1),
        }
    }

    /// Append one tick, dropping the oldest once over capacity
    pub fn push(&mut self, occurred: bool) {
        self.flags.push_back(occurred as u8);
        while self.flags.len() > self.capacity {
            self.flags.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn count(&self) -> u32 {
        self.flags.iter().map(|f| *f as u32).sum()
    }

    /// Responses per minute over the ticks currently in the window
    pub fn rate_per_minute(&self, dt: f64) -> f64 {
        let minutes = self.flags.len() as f64 * dt / 60.0;
        if minutes > 0.0 {
            self.count() as f64 / minutes
        } else {
            0.0
        }
    }
}

/// Parallel chart series, one entry per simulated second
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateSeries {
    pub times: Vec<SimTime>,
    pub target: Vec<f64>,
    pub alt: Vec<f64>,
}

impl RateSeries {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    fn push(&mut self, time: SimTime, target: f64, alt: f64) {
        self.times.push(time);
        self.target.push(target);
        self.alt.push(alt);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateTracker {
    target_window: OccurrenceWindow,
    alt_window: OccurrenceWindow,
    pub series: RateSeries,
}

impl RateTracker {
    pub fn new(window_steps: usize) -> Self {
        Self {
            target_window: OccurrenceWindow::new(window_steps),
            alt_window: OccurrenceWindow::new(window_steps),
            series: RateSeries::default(),
        }
    }

    pub fn record(&mut self, emission: Emission) {
        self.target_window.push(emission.target());
        self.alt_window.push(emission.alt());
    }

    /// Append a sample if an integer second lies in `(previous, now]`
    ///
    /// `previous` must be the exact value the caller used as `now` on the
    /// prior tick; recomputing it as `now - dt` can double-count a second.
    /// Returns true when a sample was taken.
    pub fn sample_if_second(&mut self, now: SimTime, previous: SimTime, dt: f64) -> bool {
        if now.floor() > previous.floor() {
            self.sample(now, dt);
            true
        } else {
            false
        }
    }

    /// Append a sample unconditionally
    pub fn sample(&mut self, now: SimTime, dt: f64) {
        let target = self.target_window.rate_per_minute(dt);
        let alt = self.alt_window.rate_per_minute(dt);
        self.series.push(now, target, alt);
    }

    pub fn target_window(&self) -> &OccurrenceWindow {
        &self.target_window
    }

    pub fn alt_window(&self) -> &OccurrenceWindow {
        &self.alt_window
    }
}
