//! Rolling-history trend detection
//!
//! A shower is detected from how quickly the sensor temperature moves: each
//! new reading is compared against the reading that falls off the end of a
//! short fixed-length history. A rise of more than `warming_change` means the
//! water was turned on, a drop below `cooling_change` means it was turned off.

use std::collections::VecDeque;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default number of readings kept in the history window
pub const DEFAULT_HISTORY_LENGTH: usize = 6;

/// Default rise (°C) across the window that counts as warming
pub const DEFAULT_WARMING_CHANGE: f64 = 1.5;

/// Default drop (°C) across the window that counts as cooling
pub const DEFAULT_COOLING_CHANGE: f64 = -1.5;

/// Classification of the latest reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Temperature rose by more than the warming threshold
    Warming,
    /// Temperature fell by more than the cooling threshold
    Cooling,
    /// Change stayed within the thresholds (inclusive)
    Stable,
    /// History not yet filled; no comparison possible
    Unknown,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Warming => write!(f, "warming"),
            Trend::Cooling => write!(f, "cooling"),
            Trend::Stable => write!(f, "stable"),
            Trend::Unknown => write!(f, "unknown"),
        }
    }
}

/// Window length and thresholds for the detector
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct TrendSettings {
    #[serde(default = "default_history_length")]
    pub history_length: usize,

    #[serde(default = "default_warming_change")]
    pub warming_change: f64,

    #[serde(default = "default_cooling_change")]
    pub cooling_change: f64,
}

impl Default for TrendSettings {
    fn default() -> Self {
        Self {
            history_length: default_history_length(),
            warming_change: default_warming_change(),
            cooling_change: default_cooling_change(),
        }
    }
}

impl TrendSettings {
    /// Check the window length and thresholds.
    ///
    /// The window must hold at least one reading and `warming_change` must be
    /// greater than `cooling_change`, both finite.
    pub fn validate(&self) -> Result<()> {
        self.capacity().map(|_| ())
    }

    fn capacity(&self) -> Result<NonZeroUsize> {
        let capacity = NonZeroUsize::new(self.history_length).ok_or_else(|| {
            Error::config_invalid("trend.history_length must be at least 1")
        })?;
        if !self.warming_change.is_finite() || !self.cooling_change.is_finite() {
            return Err(Error::config_invalid(
                "trend thresholds must be finite numbers",
            ));
        }
        if self.warming_change <= self.cooling_change {
            return Err(Error::config_invalid(format!(
                "trend.warming_change ({}) must be greater than trend.cooling_change ({})",
                self.warming_change, self.cooling_change
            )));
        }
        Ok(capacity)
    }
}

fn default_history_length() -> usize {
    DEFAULT_HISTORY_LENGTH
}

fn default_warming_change() -> f64 {
    DEFAULT_WARMING_CHANGE
}

fn default_cooling_change() -> f64 {
    DEFAULT_COOLING_CHANGE
}

// ── History ─────────────────────────────────────────────────────────────────

/// Fixed-length history of readings, most recent first.
///
/// Always holds exactly `capacity` slots. Unfilled slots are `None` until
/// enough readings have arrived.
#[derive(Debug, Clone)]
pub struct History {
    slots: VecDeque<Option<f64>>,
}

impl History {
    /// Create a history of `capacity` empty slots.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            slots: std::iter::repeat(None).take(capacity.get()).collect(),
        }
    }

    /// Insert at the front and return the slot evicted from the back.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        self.slots.push_front(Some(value));
        self.slots.pop_back().flatten()
    }

    /// Number of slots (filled or not).
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots still waiting for a reading.
    pub fn empty_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_none()).count()
    }

    /// Iterate over slots from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.slots.iter().copied()
    }

    /// Oldest slot, the one the next push evicts.
    pub fn oldest(&self) -> Option<f64> {
        self.slots.back().copied().flatten()
    }
}

// ── TrendDetector ───────────────────────────────────────────────────────────

/// Stateful warming/cooling detector over a [`History`]
#[derive(Debug, Clone)]
pub struct TrendDetector {
    history: History,
    warming_change: f64,
    cooling_change: f64,
}

impl TrendDetector {
    /// Build a detector, rejecting an empty window or inverted thresholds
    /// with [`Error::ConfigInvalid`].
    pub fn new(settings: TrendSettings) -> Result<Self> {
        let capacity = settings.capacity()?;
        Ok(Self {
            history: History::new(capacity),
            warming_change: settings.warming_change,
            cooling_change: settings.cooling_change,
        })
    }

    /// Record a reading and classify it against the evicted one.
    ///
    /// Returns [`Trend::Unknown`] for the first `capacity` observations.
    /// Thresholds are strict: a delta of exactly `warming_change` or
    /// `cooling_change` is [`Trend::Stable`].
    pub fn observe(&mut self, value: f64) -> Trend {
        let Some(evicted) = self.history.push(value) else {
            return Trend::Unknown;
        };

        let delta = value - evicted;
        if delta > self.warming_change {
            Trend::Warming
        } else if delta < self.cooling_change {
            Trend::Cooling
        } else {
            Trend::Stable
        }
    }

    /// Difference between a new value and the reading it would evict.
    pub fn pending_delta(&self, value: f64) -> Option<f64> {
        self.history.oldest().map(|old| value - old)
    }

    /// Observations still needed before a trend can be computed.
    ///
    /// The observation that fills the last slot still returns
    /// [`Trend::Unknown`]; comparison starts with the one after it.
    pub fn warmup_remaining(&self) -> usize {
        self.history.empty_slots()
    }

    /// Whether the next observation will be compared against a real reading.
    pub fn is_warm(&self) -> bool {
        self.history.oldest().is_some()
    }

    /// Slots from newest to oldest
    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn capacity(&self) -> usize {
        self.history.capacity()
    }
}

const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(DEFAULT_HISTORY_LENGTH) {
    Some(capacity) => capacity,
    None => panic!("DEFAULT_HISTORY_LENGTH must be non-zero"),
};

impl Default for TrendDetector {
    fn default() -> Self {
        Self {
            history: History::new(DEFAULT_CAPACITY),
            warming_change: DEFAULT_WARMING_CHANGE,
            cooling_change: DEFAULT_COOLING_CHANGE,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn warmed_detector(value: f64) -> TrendDetector {
        let mut detector = TrendDetector::default();
        for _ in 0..DEFAULT_HISTORY_LENGTH {
            assert_eq!(detector.observe(value), Trend::Unknown);
        }
        detector
    }

    // ── History ─────────────────────────────────────
    #[test]
    fn test_history_starts_empty_with_fixed_length() {
        let history = History::new(slots(4));
        assert_eq!(history.capacity(), 4);
        assert_eq!(history.empty_slots(), 4);
        assert_eq!(history.oldest(), None);
    }

    #[test]
    fn test_history_push_evicts_oldest() {
        let mut history = History::new(slots(3));
        assert_eq!(history.push(1.0), None);
        assert_eq!(history.push(2.0), None);
        assert_eq!(history.push(3.0), None);
        assert_eq!(history.push(4.0), Some(1.0));
        assert_eq!(history.capacity(), 3);

        let items: Vec<_> = history.iter().collect();
        assert_eq!(items, vec![Some(4.0), Some(3.0), Some(2.0)]);
    }

    #[test]
    fn test_history_sentinel_like_value_is_real_reading() {
        let mut history = History::new(slots(1));
        history.push(-99.0);
        assert_eq!(history.push(20.0), Some(-99.0));
    }

    // ── TrendDetector ───────────────────────────────
    #[test]
    fn test_unknown_for_exactly_first_n_observations() {
        let mut detector = TrendDetector::default();
        for i in 0..DEFAULT_HISTORY_LENGTH {
            assert_eq!(detector.warmup_remaining(), DEFAULT_HISTORY_LENGTH - i);
            assert_eq!(detector.observe(100.0 * i as f64), Trend::Unknown);
        }
        assert!(detector.is_warm());
        assert_ne!(detector.observe(0.0), Trend::Unknown);
    }

    #[test]
    fn test_warming() {
        let mut detector = warmed_detector(20.0);
        assert_eq!(detector.observe(24.0), Trend::Warming);
    }

    #[test]
    fn test_cooling() {
        let mut detector = warmed_detector(20.0);
        assert_eq!(detector.observe(18.0), Trend::Cooling);
    }

    #[test]
    fn test_small_change_is_stable() {
        let mut detector = warmed_detector(20.0);
        assert_eq!(detector.observe(21.0), Trend::Stable);
    }

    #[test]
    fn test_threshold_boundaries_are_stable() {
        let mut detector = warmed_detector(20.0);
        assert_eq!(detector.observe(21.5), Trend::Stable);

        let mut detector = warmed_detector(20.0);
        assert_eq!(detector.observe(18.5), Trend::Stable);
    }

    #[test]
    fn test_compares_against_reading_n_steps_back() {
        let mut detector = TrendDetector::default();
        for v in [20.0, 20.5, 21.0, 21.5, 22.0, 22.5] {
            detector.observe(v);
        }
        // 23.0 - 20.0 = 3.0
        assert_eq!(detector.pending_delta(23.0), Some(3.0));
        assert_eq!(detector.observe(23.0), Trend::Warming);
        // 21.5 - 20.5 = 1.0
        assert_eq!(detector.observe(21.5), Trend::Stable);
    }

    #[test]
    fn test_custom_settings() {
        let mut detector = TrendDetector::new(TrendSettings {
            history_length: 2,
            warming_change: 0.5,
            cooling_change: -0.5,
        })
        .unwrap();
        assert_eq!(detector.observe(10.0), Trend::Unknown);
        assert_eq!(detector.observe(10.0), Trend::Unknown);
        assert_eq!(detector.observe(10.6), Trend::Warming);
        assert_eq!(detector.observe(9.0), Trend::Cooling);
    }

    #[test]
    fn test_pending_delta_none_while_warming_up() {
        let detector = TrendDetector::default();
        assert_eq!(detector.pending_delta(20.0), None);
    }

    #[test]
    fn test_history_accessor_lists_newest_first() {
        let mut detector = TrendDetector::default();
        detector.observe(19.0);
        detector.observe(19.5);

        let slots: Vec<_> = detector.history().iter().collect();
        assert_eq!(
            slots,
            vec![Some(19.5), Some(19.0), None, None, None, None]
        );
        assert_eq!(detector.history().oldest(), None);
    }

    #[test]
    fn test_capacity_follows_settings() {
        assert_eq!(TrendDetector::default().capacity(), DEFAULT_HISTORY_LENGTH);

        let detector = TrendDetector::new(TrendSettings {
            history_length: 3,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(detector.capacity(), 3);
        assert_eq!(detector.warmup_remaining(), 3);
    }

    #[test]
    fn test_zero_length_window_is_rejected() {
        let err = TrendDetector::new(TrendSettings {
            history_length: 0,
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_inverted_thresholds_are_rejected() {
        let settings = TrendSettings {
            warming_change: -1.0,
            cooling_change: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            TrendDetector::new(settings),
            Err(Error::ConfigInvalid { .. })
        ));

        let equal = TrendSettings {
            warming_change: 1.0,
            cooling_change: 1.0,
            ..Default::default()
        };
        assert!(equal.validate().is_err());
    }

    #[test]
    fn test_non_finite_threshold_is_rejected() {
        let settings = TrendSettings {
            warming_change: f64::NAN,
            ..Default::default()
        };
        assert!(TrendDetector::new(settings).is_err());
    }

    #[test]
    fn test_default_settings_validate() {
        assert!(TrendSettings::default().validate().is_ok());
        let detector = TrendDetector::new(TrendSettings::default()).unwrap();
        assert_eq!(detector.capacity(), TrendDetector::default().capacity());
    }
}
