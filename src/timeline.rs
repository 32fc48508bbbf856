//! Read-only time queries over a normalized event list.
//!
//! Players and typewriter-style renderers walk the sequence at their own
//! pace; a `Timeline` answers "what is sounding at t" without touching the
//! events, so a stopped or restarted playback never needs to re-map.

use crate::mapping::MusicEvent;

#[derive(Debug, Clone, Copy)]
pub struct Timeline<'a> {
    events: &'a [MusicEvent],
}

impl<'a> Timeline<'a> {
    /// Wrap events that have already been through `normalize_events`.
    pub fn new(events: &'a [MusicEvent]) -> Self {
        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn end_seconds(&self) -> f64 {
        self.events.last().map(MusicEvent::end_seconds).unwrap_or(0.0)
    }

    /// Index of the event sounding at `seconds`.
    ///
    /// Events are half-open intervals `[start, end)`. Returns `None` before
    /// zero and at or after the end.
    ///
    /// # Example
    /// ```
    /// use pianotrainer::{map_text_to_events, MappingConfig, Timeline};
    ///
    /// let events = map_text_to_events("abcd", &MappingConfig::default()).unwrap();
    /// let timeline = Timeline::new(&events);
    /// assert_eq!(timeline.active_at(0.0), Some(0));
    /// assert_eq!(timeline.active_at(2.5), Some(1));
    /// assert_eq!(timeline.active_at(8.0), None);
    /// ```
    pub fn active_at(&self, seconds: f64) -> Option<usize> {
        if seconds < 0.0 || seconds >= self.end_seconds() {
            return None;
        }
        let index = self
            .events
            .partition_point(|e| e.start_seconds <= seconds)
            .checked_sub(1)?;
        Some(index)
    }

    pub fn event_at(&self, seconds: f64) -> Option<&'a MusicEvent> {
        self.active_at(seconds).map(|i| &self.events[i])
    }

    /// `(start_seconds, event)` pairs in playback order
    pub fn iter(&self) -> impl Iterator<Item = (f64, &'a MusicEvent)> + 'a {
        let events = self.events;
        events.iter().map(|e| (e.start_seconds, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::normalize_events;

    fn events(weights: &[f64]) -> Vec<MusicEvent> {
        let mut events: Vec<_> = weights.iter().map(|w| MusicEvent::rest(*w, None)).collect();
        normalize_events(&mut events, 8.0, 0.05);
        events
    }

    #[test]
    fn test_active_at_boundaries() {
        let events = events(&[1.0, 1.0, 2.0]);
        let timeline = Timeline::new(&events);
        assert_eq!(timeline.active_at(0.0), Some(0));
        assert_eq!(timeline.active_at(1.999), Some(0));
        assert_eq!(timeline.active_at(2.0), Some(1));
        assert_eq!(timeline.active_at(4.0), Some(2));
        assert_eq!(timeline.active_at(7.999), Some(2));
        assert_eq!(timeline.active_at(8.0), None);
        assert_eq!(timeline.active_at(-0.1), None);
    }

    #[test]
    fn test_end_and_iteration() {
        let events = events(&[1.0, 3.0]);
        let timeline = Timeline::new(&events);
        assert_eq!(timeline.end_seconds(), 8.0);
        let starts: Vec<_> = timeline.iter().map(|(start, _)| start).collect();
        assert_eq!(starts, vec![0.0, 2.0]);
        assert_eq!(timeline.len(), 2);
    }

    #[test]
    fn test_empty_timeline() {
        let timeline = Timeline::new(&[]);
        assert!(timeline.is_empty());
        assert_eq!(timeline.end_seconds(), 0.0);
        assert_eq!(timeline.active_at(0.0), None);
    }

    #[test]
    fn test_queries_leave_events_untouched() {
        let events = events(&[1.0, 2.0]);
        let before = events.clone();
        let timeline = Timeline::new(&events);
        let _ = timeline.event_at(3.0);
        assert_eq!(events, before);
    }
}
