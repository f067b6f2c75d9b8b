use std::collections::BTreeSet;
use std::sync::Arc;

use crate::data::filter::{FilterCriteria, FilterSummary, FilteredView, filter};
use crate::data::model::{GlassDataset, GlassRecord};
use crate::data::sizing::marker_sizes;
use crate::selection::{RemoveAction, SelectedPoint, SelectionStore, TableRow};

// ---------------------------------------------------------------------------
// UI events
// ---------------------------------------------------------------------------

/// Everything the widgets can ask of the state during one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    FilterChanged(FilterCriteria),
    PointsSelected(Vec<SelectedPoint>),
    ClearAll,
    Remove(RemoveAction),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Catalog loaded at startup; never mutated.
    pub dataset: Arc<GlassDataset>,

    /// Current filter selections.
    pub criteria: FilterCriteria,

    /// Records passing the current filters (cached).
    pub view: FilteredView,

    /// Marker size per point of `view`.
    pub sizes: Vec<f64>,

    /// Glasses picked on the plot.
    pub selection: SelectionStore,

    /// Currency prefix for formatted costs.
    pub currency_symbol: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: Arc<GlassDataset>, currency_symbol: impl Into<String>) -> Self {
        let mut state = Self {
            dataset,
            criteria: FilterCriteria::default(),
            view: FilteredView::default(),
            sizes: Vec::new(),
            selection: SelectionStore::new(),
            currency_symbol: currency_symbol.into(),
            status_message: None,
        };
        state.refilter();
        state
    }

    /// Recompute `view` and `sizes` after a filter change.
    pub fn refilter(&mut self) {
        let ds = &self.dataset;
        self.view = filter(ds, &self.criteria);
        self.sizes = marker_sizes(self.view.record_indices.iter().filter_map(|&i| ds.get(i)));
        log::debug!(
            "Filter {:?} keeps {} of {} records",
            self.criteria,
            self.view.len(),
            ds.len()
        );
    }

    /// Process the events of one update cycle.
    ///
    /// Order: the last filter change, then "clear all", then merges, then
    /// removals. A clear in the cycle drops every merge of the same cycle.
    pub fn apply(&mut self, events: Vec<UiEvent>) {
        let mut new_criteria = None;
        let mut clear = false;
        let mut merges = Vec::new();
        let mut removals = Vec::new();

        for event in events {
            match event {
                UiEvent::FilterChanged(c) => new_criteria = Some(c),
                UiEvent::ClearAll => clear = true,
                UiEvent::PointsSelected(points) => merges.push(points),
                UiEvent::Remove(action) => removals.push(action),
            }
        }

        if let Some(criteria) = new_criteria {
            if criteria != self.criteria {
                self.criteria = criteria;
                self.refilter();
            }
        }

        if clear {
            if !merges.is_empty() {
                log::debug!("Dropping {} selection batch(es) after clear", merges.len());
            }
            self.selection.clear_all();
        } else {
            for points in merges {
                self.selection.merge_selection(points);
            }
        }

        for action in removals {
            self.selection.remove_by_id(action.entry_id);
        }
    }

    /// Record shown at `point_index` of the current view.
    pub fn visible_record(&self, point_index: usize) -> Option<&GlassRecord> {
        self.view.record(&self.dataset, point_index)
    }

    /// Build a selection payload for a point of the current view.
    pub fn point(&self, point_index: usize) -> Option<SelectedPoint> {
        self.visible_record(point_index).map(|record| SelectedPoint {
            point_index,
            record: record.clone(),
        })
    }

    /// Every point currently on the plot, ready to merge.
    pub fn all_visible_points(&self) -> Vec<SelectedPoint> {
        (0..self.view.len()).filter_map(|i| self.point(i)).collect()
    }

    /// Record keys to draw highlighted. Resolved by key rather than by
    /// point index so highlights follow the glass across filter changes.
    pub fn highlighted_keys(&self) -> BTreeSet<usize> {
        self.selection.highlighted_keys().collect()
    }

    pub fn filter_summary(&self) -> FilterSummary {
        self.criteria.summary()
    }

    pub fn total_message(&self) -> String {
        format!("Total glasses found: {}", self.view.len())
    }

    pub fn table_rows(&self) -> Vec<TableRow> {
        self.selection.to_table_rows(&self.currency_symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::Range;
    use crate::data::model::GlassType;
    use crate::data::model::tests::record;

    fn state() -> AppState {
        let ds = GlassDataset::from_records(vec![
            record(GlassType::Laminated, 20.0, 40.0, Some(100.0)),
            record(GlassType::Insulated, 45.0, 60.0, Some(300.0)),
            record(GlassType::Laminated, 70.0, 80.0, Some(200.0)),
        ]);
        AppState::new(Arc::new(ds), "R$")
    }

    fn only(range: Range) -> FilterCriteria {
        FilterCriteria {
            solar_factor: range,
            ..FilterCriteria::default()
        }
    }

    #[test]
    fn initial_state_shows_everything() {
        let s = state();
        assert_eq!(s.view.record_indices, vec![0, 1, 2]);
        assert_eq!(s.sizes, vec![10.0, 40.0, 25.0]);
        assert_eq!(s.total_message(), "Total glasses found: 3");
        assert!(s.selection.is_empty());
    }

    #[test]
    fn filter_change_resizes_and_keeps_selection() {
        let mut s = state();
        let p = s.point(0).unwrap();
        s.apply(vec![UiEvent::PointsSelected(vec![p])]);

        s.apply(vec![UiEvent::FilterChanged(only(Range::new(40.0, 100.0)))]);
        assert_eq!(s.view.record_indices, vec![1, 2]);
        assert_eq!(s.sizes, vec![40.0, 10.0]);
        assert_eq!(s.selection.len(), 1);
        assert_eq!(s.filter_summary().solar_factor_line, "Solar factor: 40 to 100");
    }

    #[test]
    fn clear_wins_over_merge_in_the_same_cycle() {
        let mut s = state();
        s.apply(vec![UiEvent::PointsSelected(vec![s.point(0).unwrap()])]);

        let p = s.point(1).unwrap();
        s.apply(vec![UiEvent::PointsSelected(vec![p]), UiEvent::ClearAll]);
        assert!(s.selection.is_empty());
        assert!(s.table_rows().is_empty());
    }

    #[test]
    fn clear_applies_after_filter_change() {
        let mut s = state();
        s.apply(vec![UiEvent::PointsSelected(s.all_visible_points())]);
        assert_eq!(s.selection.len(), 3);

        s.apply(vec![
            UiEvent::ClearAll,
            UiEvent::FilterChanged(only(Range::new(0.0, 30.0))),
        ]);
        assert!(s.selection.is_empty());
        assert_eq!(s.view.record_indices, vec![0]);
    }

    #[test]
    fn removal_event_removes_by_id() {
        let mut s = state();
        s.apply(vec![UiEvent::PointsSelected(vec![
            s.point(0).unwrap(),
            s.point(1).unwrap(),
        ])]);
        let rows = s.table_rows();
        s.apply(vec![UiEvent::Remove(rows[0].remove)]);

        let remaining = s.selection.entries();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, 1);
        assert_eq!(s.highlighted_keys(), BTreeSet::from([1]));

        s.apply(vec![UiEvent::Remove(rows[0].remove)]);
        assert_eq!(s.selection.len(), 1);
    }

    #[test]
    fn highlights_follow_record_keys_across_filters() {
        let mut s = state();
        s.apply(vec![UiEvent::PointsSelected(vec![s.point(2).unwrap()])]);
        s.apply(vec![UiEvent::FilterChanged(only(Range::new(50.0, 100.0)))]);

        // The glass moved from point 2 to point 0 of the new view.
        assert_eq!(s.visible_record(0).map(|r| r.key), Some(2));
        assert!(s.highlighted_keys().contains(&2));
    }

    #[test]
    fn empty_view_has_no_points() {
        let mut s = state();
        s.apply(vec![UiEvent::FilterChanged(FilterCriteria {
            transmittance: Range::new(95.0, 100.0),
            ..FilterCriteria::default()
        })]);
        assert!(s.view.is_empty());
        assert!(s.sizes.is_empty());
        assert!(s.all_visible_points().is_empty());
        assert_eq!(s.total_message(), "Total glasses found: 0");
    }
}
