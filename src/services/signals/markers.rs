//! Per-source marker merge.

use crate::types::{Marker, MarkerSource};

/// Markers grouped by the indicator that produced them.
///
/// Replacing a source drops its previous markers and appends the new set
/// after the other sources. Reading flattens the groups and orders them by
/// time; markers sharing a time keep their insertion order.
#[derive(Debug, Clone, Default)]
pub struct MarkerBook {
    entries: Vec<(MarkerSource, Vec<Marker>)>,
}

impl MarkerBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a fresh marker set for `source`.
    pub fn replace(&mut self, source: MarkerSource, markers: Vec<Marker>) {
        self.clear(source);
        self.entries.push((source, markers));
    }

    /// Remove every marker of `source`.
    pub fn clear(&mut self, source: MarkerSource) {
        self.entries.retain(|(s, _)| *s != source);
    }

    /// All markers, untagged, ascending by time.
    pub fn markers(&self) -> Vec<Marker> {
        let mut merged: Vec<Marker> = self
            .entries
            .iter()
            .flat_map(|(_, markers)| markers.iter().cloned())
            .collect();
        merged.sort_by_key(|m| m.time);
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MarkerPosition, MarkerShape};

    fn marker(time: i64, text: &str) -> Marker {
        Marker::new(time, MarkerPosition::AboveBar, "#fff", MarkerShape::Circle, text)
    }

    #[test]
    fn test_replace_drops_previous_markers_of_source() {
        let mut book = MarkerBook::new();
        book.replace(MarkerSource::BinaryOptions, vec![marker(60, "a"), marker(120, "b")]);
        book.replace(MarkerSource::BinaryOptions, vec![marker(180, "c")]);
        let markers = book.markers();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].text, "c");
    }

    #[test]
    fn test_replace_keeps_other_sources() {
        let mut book = MarkerBook::new();
        book.replace(MarkerSource::BinaryOptions, vec![marker(60, "call")]);
        book.replace(MarkerSource::By2Bars, vec![marker(60, "buy")]);
        book.replace(MarkerSource::BinaryOptions, vec![marker(60, "put")]);

        let texts: Vec<String> = book.markers().into_iter().map(|m| m.text).collect();
        assert_eq!(texts, vec!["buy", "put"]);
    }

    #[test]
    fn test_clear_source() {
        let mut book = MarkerBook::new();
        book.replace(MarkerSource::By2Bars, vec![marker(60, "buy")]);
        book.clear(MarkerSource::By2Bars);
        book.clear(MarkerSource::BinaryOptions);
        assert!(book.markers().is_empty());
    }

    #[test]
    fn test_markers_sorted_by_time() {
        let mut book = MarkerBook::new();
        book.replace(MarkerSource::BinaryOptions, vec![marker(120, "a"), marker(240, "b")]);
        book.replace(MarkerSource::By2Bars, vec![marker(60, "c"), marker(180, "d")]);
        let times: Vec<i64> = book.markers().iter().map(|m| m.time).collect();
        assert_eq!(times, vec![60, 120, 180, 240]);
    }
}
