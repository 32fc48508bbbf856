//! # Timing Normalizer
//!
//! Scales relative event weights to absolute seconds so the sequence lasts
//! exactly the target duration.
//!
//! Durations below the floor are clamped up to it, and the time they took
//! is taken proportionally from the events that are still free. This
//! repeats until no free event is below the floor. If every event ends up
//! floored the total exceeds the target; that case is reported as
//! degenerate rather than treated as an error.

use log::warn;

use crate::diagnostics::Diagnostic;
use crate::mapping::MusicEvent;

/// Tolerance used when comparing summed durations against the target
pub const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub durations: Vec<f64>,
    /// Every event sits at the floor and the total exceeds the target
    pub degenerate: bool,
}

impl Normalized {
    pub fn total(&self) -> f64 {
        self.durations.iter().sum()
    }
}

/// Turn positive relative weights into durations summing to `target`.
///
/// # Example
/// ```
/// use pianotrainer::timing::normalize_weights;
///
/// let result = normalize_weights(&[1.0, 1.0, 2.0], 8.0, 0.05);
/// assert_eq!(result.durations, vec![2.0, 2.0, 4.0]);
/// assert!(!result.degenerate);
/// ```
pub fn normalize_weights(weights: &[f64], target: f64, floor: f64) -> Normalized {
    debug_assert!(weights.iter().all(|w| *w > 0.0), "weights must be positive");

    let mut durations = vec![0.0; weights.len()];
    let mut floored = vec![false; weights.len()];

    loop {
        let floored_count = floored.iter().filter(|f| **f).count();
        let free_weight: f64 = weights
            .iter()
            .zip(&floored)
            .filter(|(_, f)| !**f)
            .map(|(w, _)| *w)
            .sum();
        let remaining = target - floored_count as f64 * floor;

        if floored_count == weights.len() || remaining <= 0.0 || free_weight <= 0.0 {
            floored.iter_mut().for_each(|f| *f = true);
            durations.iter_mut().for_each(|d| *d = floor);
            break;
        }

        let scale = remaining / free_weight;
        let mut newly_floored = false;
        for (i, weight) in weights.iter().enumerate() {
            if floored[i] {
                durations[i] = floor;
                continue;
            }
            durations[i] = weight * scale;
            if durations[i] < floor {
                floored[i] = true;
                newly_floored = true;
            }
        }

        if !newly_floored {
            break;
        }
    }

    let degenerate = !weights.is_empty()
        && floored.iter().all(|f| *f)
        && (durations.iter().sum::<f64>() - target).abs() > EPSILON;

    Normalized {
        durations,
        degenerate,
    }
}

/// Replace each event's weight with its absolute duration and lay the
/// events end to end from zero.
///
/// Returns a diagnostic when the durations could not be fitted to the
/// target.
pub fn normalize_events(
    events: &mut [MusicEvent],
    target: f64,
    floor: f64,
) -> Option<Diagnostic> {
    let weights: Vec<f64> = events.iter().map(|e| e.duration_seconds).collect();
    let normalized = normalize_weights(&weights, target, floor);

    let mut start = 0.0;
    for (event, duration) in events.iter_mut().zip(&normalized.durations) {
        event.duration_seconds = *duration;
        event.start_seconds = start;
        start += duration;
    }

    if normalized.degenerate {
        let total = normalized.total();
        warn!(
            "{} events at the {}s floor last {:.3}s, over the {}s target",
            events.len(),
            floor,
            total,
            target
        );
        return Some(Diagnostic::degenerate_timing(total, target));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-6, "{} != {}", a, b);
    }

    #[test]
    fn test_sum_matches_target() {
        let result = normalize_weights(&[1.0, 0.5, 1.25, 0.25, 1.5], 8.0, 0.05);
        assert_close(result.total(), 8.0);
        assert!(!result.degenerate);
    }

    #[test]
    fn test_proportions_preserved() {
        let result = normalize_weights(&[1.0, 2.0, 3.0], 6.0, 0.0);
        assert_eq!(result.durations, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_single_event_takes_whole_target() {
        let result = normalize_weights(&[0.25], 8.0, 0.05);
        assert_eq!(result.durations, vec![8.0]);
    }

    #[test]
    fn test_floor_redistributes_shortfall() {
        // 1 : 1000 would give the first event about 0.008s
        let result = normalize_weights(&[1.0, 1000.0, 500.0], 8.0, 0.5);
        assert_close(result.durations[0], 0.5);
        assert_close(result.total(), 8.0);
        // The free events keep their 2:1 ratio
        assert_close(result.durations[1] / result.durations[2], 2.0);
        assert!(!result.degenerate);
    }

    #[test]
    fn test_floor_cascades() {
        // Flooring the smallest pushes the next one under the floor too
        let result = normalize_weights(&[1.0, 1.9, 10.0], 3.0, 0.5);
        assert_close(result.durations[0], 0.5);
        assert_close(result.durations[1], 0.5);
        assert_close(result.durations[2], 2.0);
    }

    #[test]
    fn test_zero_floor_disables_flooring() {
        let result = normalize_weights(&[1.0, 999_999.0], 1.0, 0.0);
        assert_close(result.durations[0], 1e-6);
        assert_close(result.total(), 1.0);
    }

    #[test]
    fn test_degenerate_when_everything_floored() {
        let weights = vec![1.0; 200];
        let result = normalize_weights(&weights, 8.0, 0.05);
        assert!(result.degenerate);
        assert!(result.durations.iter().all(|d| *d == 0.05));
        assert_close(result.total(), 10.0);
    }

    #[test]
    fn test_exact_fit_at_floor_is_not_degenerate() {
        let result = normalize_weights(&[1.0, 1.0], 1.0, 0.5);
        assert_eq!(result.durations, vec![0.5, 0.5]);
        assert!(!result.degenerate);
    }

    #[test]
    fn test_idempotent() {
        let weights = [1.0, 0.25, 1.25, 3.0, 0.01, 0.5];
        let first = normalize_weights(&weights, 8.0, 0.05);
        let second = normalize_weights(&first.durations, 8.0, 0.05);
        for (a, b) in first.durations.iter().zip(&second.durations) {
            assert_close(*a, *b);
        }
    }

    #[test]
    fn test_empty_input() {
        let result = normalize_weights(&[], 8.0, 0.05);
        assert!(result.durations.is_empty());
        assert!(!result.degenerate);
    }

    #[test]
    fn test_events_get_start_times() {
        let mut events = vec![
            MusicEvent::rest(1.0, None),
            MusicEvent::rest(3.0, None),
            MusicEvent::rest(4.0, None),
        ];
        assert!(normalize_events(&mut events, 8.0, 0.05).is_none());
        let starts: Vec<_> = events.iter().map(|e| e.start_seconds).collect();
        assert_eq!(starts, vec![0.0, 1.0, 4.0]);
        assert_eq!(events[2].end_seconds(), 8.0);
    }

    #[test]
    fn test_degenerate_events_report_diagnostic() {
        let mut events: Vec<_> = (0..10).map(|_| MusicEvent::rest(1.0, None)).collect();
        let diagnostic = normalize_events(&mut events, 0.1, 0.05).unwrap();
        assert_eq!(diagnostic.kind, DiagnosticKind::DegenerateTiming);
        assert!(events.iter().all(|e| e.duration_seconds == 0.05));
    }
}
