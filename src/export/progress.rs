//! Progress reporting port.
//!
//! Every phase of an export reports a fraction of the whole `[0, 1]` range
//! plus a status line. Phases own fixed sub-ranges; [`PhaseProgress`] maps
//! a phase-local fraction into its range.

use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot download owns the first half of the budget.
pub const DOWNLOAD_RANGE: (f64, f64) = (0.0, 0.5);
/// Marker emitted before decompressing the snapshot.
pub const DECOMPRESS_MARK: f64 = 0.5;
/// Marker emitted before loading the snapshot into the query engine.
pub const LOAD_MARK: f64 = 0.9;
/// Marker emitted while querying the character's notes.
pub const QUERY_MARK: f64 = 0.01;
/// Marker emitted once the notes are listed.
pub const NOTES_LISTED_MARK: f64 = 0.10;
/// Per-note export work is spread linearly across this range.
pub const NOTES_RANGE: (f64, f64) = (0.10, 0.99);
/// Marker emitted before the archive is serialized.
pub const FINALIZE_MARK: f64 = 0.99;
/// Terminal marker.
pub const DONE_MARK: f64 = 1.0;

/// Receiver of `(fraction, status)` updates.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, fraction: f64, status: &str);
}

impl<F> ProgressReporter for F
where
    F: Fn(f64, &str) + Send + Sync,
{
    fn report(&self, fraction: f64, status: &str) {
        self(fraction, status)
    }
}

/// Reporter that drops every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _fraction: f64, _status: &str) {}
}

/// A reporter restricted to a fixed sub-range of the overall progress.
///
/// Within one phase the reported fraction never moves backwards.
pub struct PhaseProgress<'a> {
    reporter: &'a dyn ProgressReporter,
    start: f64,
    end: f64,
    last: AtomicU64,
}

impl<'a> PhaseProgress<'a> {
    pub fn new(reporter: &'a dyn ProgressReporter, (start, end): (f64, f64)) -> Self {
        Self {
            reporter,
            start,
            end,
            last: AtomicU64::new(start.to_bits()),
        }
    }

    /// Report a phase-local fraction in `[0, 1]`.
    pub fn report(&self, local: f64, status: &str) {
        let local = if local.is_finite() {
            local.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let mut overall = self.start + local * (self.end - self.start);

        let previous = f64::from_bits(self.last.load(Ordering::Relaxed));
        if overall < previous {
            overall = previous;
        } else {
            self.last.store(overall.to_bits(), Ordering::Relaxed);
        }

        self.reporter.report(overall, status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_phase_maps_into_range() {
        let events = Mutex::new(Vec::<(f64, String)>::new());
        let reporter = |fraction: f64, status: &str| {
            events.lock().unwrap().push((fraction, status.to_string()));
        };

        let phase = PhaseProgress::new(&reporter, NOTES_RANGE);
        phase.report(0.0, "first");
        phase.report(0.5, "half");
        phase.report(1.0, "last");

        let events = events.lock().unwrap();
        assert!((events[0].0 - 0.10).abs() < 1e-9);
        assert!((events[1].0 - 0.545).abs() < 1e-9);
        assert!((events[2].0 - 0.99).abs() < 1e-9);
        assert_eq!(events[1].1, "half");
    }

    #[test]
    fn test_phase_never_regresses_and_clamps() {
        let events = Mutex::new(Vec::<(f64, String)>::new());
        let reporter = |fraction: f64, _status: &str| {
            events.lock().unwrap().push((fraction, String::new()));
        };

        let phase = PhaseProgress::new(&reporter, DOWNLOAD_RANGE);
        phase.report(0.6, "");
        phase.report(0.2, "");
        phase.report(7.0, "");
        phase.report(f64::NAN, "");

        let fractions: Vec<f64> = events.lock().unwrap().iter().map(|e| e.0).collect();
        assert_eq!(fractions, vec![0.3, 0.3, 0.5, 0.5]);
    }
}
