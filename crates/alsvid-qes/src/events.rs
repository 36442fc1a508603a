//! Measurement bookkeeping and detection-event indexing.
//!
//! Both structures are emitter-local state: created fresh per emission,
//! appended to monotonically, never rewound.

use rustc_hash::FxHashMap;

use alsvid_code::QubitId;

use crate::error::{QesError, QesResult};

/// Maps each qubit to the index of its most recent measurement outcome in
/// the emitted instruction stream.
#[derive(Debug, Clone, Default)]
pub struct MeasCounter {
    map: FxHashMap<QubitId, u32>,
    next: u32,
}

impl MeasCounter {
    /// Create an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a measurement of `qubit`, returning its outcome index.
    pub fn record(&mut self, qubit: QubitId) -> u32 {
        let index = self.next;
        self.next += 1;
        self.map.insert(qubit, index);
        index
    }

    /// The most recent outcome index for `qubit`.
    pub fn get(&self, qubit: QubitId) -> QesResult<u32> {
        self.map
            .get(&qubit)
            .copied()
            .ok_or(QesError::MissingMeasurement { qubit })
    }

    /// Total measurements recorded so far.
    pub fn total(&self) -> u32 {
        self.next
    }

    /// A frozen copy, used to reference the previous round's outcomes
    /// while the current round overwrites the map.
    pub fn snapshot(&self) -> MeasCounter {
        self.clone()
    }
}

/// Hands out globally unique, monotonically increasing detection-event and
/// observable indices.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventIndexer {
    next_event: u32,
    next_obs: u32,
}

impl EventIndexer {
    /// Create a fresh indexer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the next detection-event index.
    pub fn next_event(&mut self) -> u32 {
        let index = self.next_event;
        self.next_event += 1;
        index
    }

    /// Claim the next observable index.
    pub fn next_obs(&mut self) -> u32 {
        let index = self.next_obs;
        self.next_obs += 1;
        index
    }

    /// Number of events declared so far.
    pub fn num_events(&self) -> u32 {
        self.next_event
    }
}

/// The `base` property for an event: its offset within a steady-state
/// round, shifted by one round's worth of events when the experiment has a
/// distinct first round to align against.
pub fn base_offset(event: u32, events_per_round: u32, rounds: u32) -> i64 {
    if events_per_round == 0 {
        return 0;
    }
    let mut base = i64::from(event % events_per_round);
    if rounds > 1 {
        base += i64::from(events_per_round);
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_tracks_latest_outcome() {
        let mut meas = MeasCounter::new();
        assert_eq!(meas.record(QubitId(3)), 0);
        assert_eq!(meas.record(QubitId(5)), 1);
        assert_eq!(meas.record(QubitId(3)), 2);
        assert_eq!(meas.get(QubitId(3)).unwrap(), 2);
        assert_eq!(meas.total(), 3);
    }

    #[test]
    fn test_missing_measurement_is_an_error() {
        let meas = MeasCounter::new();
        assert!(matches!(
            meas.get(QubitId(0)),
            Err(QesError::MissingMeasurement { qubit }) if qubit == QubitId(0)
        ));
    }

    #[test]
    fn test_snapshot_is_frozen() {
        let mut meas = MeasCounter::new();
        meas.record(QubitId(1));
        let prev = meas.snapshot();
        meas.record(QubitId(1));
        assert_eq!(prev.get(QubitId(1)).unwrap(), 0);
        assert_eq!(meas.get(QubitId(1)).unwrap(), 1);
    }

    #[test]
    fn test_indexer_is_monotone() {
        let mut events = EventIndexer::new();
        assert_eq!(events.next_event(), 0);
        assert_eq!(events.next_event(), 1);
        assert_eq!(events.next_obs(), 0);
        assert_eq!(events.next_event(), 2);
        assert_eq!(events.num_events(), 3);
    }

    #[test]
    fn test_base_offset() {
        // Single round: raw offset within the round.
        assert_eq!(base_offset(2, 5, 1), 2);
        // Multi-round: shifted past the asymmetric first round.
        assert_eq!(base_offset(7, 5, 3), 7);
        assert_eq!(base_offset(12, 5, 3), 7);
    }
}
